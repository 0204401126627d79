use std::fs;

use rand::seq::SliceRandom;
use tracing::warn;

/// Lines of the quote file, one quote per line.
#[derive(Debug, Clone, Default)]
pub struct QuoteBook {
    quotes: Vec<String>,
}

impl QuoteBook {
    pub fn new(quotes: Vec<String>) -> Self {
        Self { quotes }
    }

    pub fn parse(content: &str) -> Self {
        let quotes = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { quotes }
    }

    /// A missing or unreadable file leaves the book empty.
    pub fn load(path: &str) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) => {
                warn!(path, error = %err, "failed to load quotes");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn random(&self) -> Option<&str> {
        self.quotes.choose(&mut rand::thread_rng()).map(String::as_str)
    }
}
