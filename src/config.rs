use std::collections::HashMap;
use std::fs;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_TIMEZONE: &str = "America/Detroit";
pub const DEFAULT_TEAM: &str = "default";
pub const DEFAULT_PROFILE_FILE: &str = "profiles.json";
pub const DEFAULT_QUOTE_FILE: &str = "quote.txt";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `KEY=value` pairs read from the file named by `CONFIG_FILE`.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Blank lines and `#` comments are skipped; `export ` prefixes and one
    /// level of matching quotes are dropped.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::InvalidLine {
                line: idx + 1,
                content: raw.to_string(),
            })?;
            values.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q)?.strip_suffix(*q))
        .unwrap_or(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Api,
    Cli,
}

#[derive(Debug, Clone)]
pub enum CalendarAuth {
    ApiKey(String),
    AccessToken(String),
}

/// Process settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub discord_token: Option<String>,
    pub calendar_auth: Option<CalendarAuth>,
    pub timezone: Tz,
    pub team: String,
    pub profile_file: String,
    pub quote_file: String,
    pub log_level: String,
}

impl Settings {
    /// `lookup` is consulted for every key; main passes "config file, then
    /// environment".
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = match lookup("RUN_MODE").as_deref() {
            Some("api") => RunMode::Api,
            _ => RunMode::Cli,
        };
        let zone_name = lookup("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = zone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(zone_name.clone()))?;
        let calendar_auth = lookup("GOOGLE_ACCESS_TOKEN")
            .map(CalendarAuth::AccessToken)
            .or_else(|| lookup("GOOGLE_API_KEY").map(CalendarAuth::ApiKey));

        Ok(Self {
            run_mode,
            discord_token: lookup("DISCORD_TOKEN"),
            calendar_auth,
            timezone,
            team: lookup("TEAM").unwrap_or_else(|| DEFAULT_TEAM.to_string()),
            profile_file: lookup("PROFILE_FILE").unwrap_or_else(|| DEFAULT_PROFILE_FILE.to_string()),
            quote_file: lookup("QUOTE_FILE").unwrap_or_else(|| DEFAULT_QUOTE_FILE.to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedCalendar {
    pub name: String,
    pub id: String,
}

/// Per-team settings read from the profiles file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub admins: Vec<String>,
    pub default_channel: String,
    pub default_calendar: String,
    #[serde(default)]
    pub calendars: Vec<NamedCalendar>,
}

impl Profile {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|admin| admin == user_id)
    }

    /// Default calendar first, then every named calendar, without repeats.
    pub fn all_calendar_ids(&self) -> Vec<String> {
        let mut ids = vec![self.default_calendar.clone()];
        for calendar in &self.calendars {
            if !ids.contains(&calendar.id) {
                ids.push(calendar.id.clone());
            }
        }
        ids
    }
}

pub fn load_profile(path: &str, team: &str) -> Result<Profile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_profile(&content, path, team)
}

pub fn parse_profile(content: &str, path: &str, team: &str) -> Result<Profile, ConfigError> {
    let mut profiles: HashMap<String, Profile> =
        serde_json::from_str(content).map_err(|source| ConfigError::Profiles {
            path: path.to_string(),
            source,
        })?;
    profiles
        .remove(team)
        .ok_or_else(|| ConfigError::UnknownTeam(team.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILES: &str = r#"{
        "dx": {
            "admins": ["U1"],
            "default_channel": "42",
            "default_calendar": "main@group.calendar.google.com",
            "calendars": [
                {"name": "CS", "id": "cs@group.calendar.google.com"},
                {"name": "Main", "id": "main@group.calendar.google.com"}
            ]
        }
    }"#;

    #[test]
    fn parses_key_values_with_quotes_and_comments() {
        let config = AppConfig::parse(
            "# comment\nexport TEAM=\"dx\"\nTIMEZONE='America/New_York'\n\nRUN_MODE = api\n",
        )
        .unwrap();
        assert_eq!(config.get("TEAM").as_deref(), Some("dx"));
        assert_eq!(config.get("TIMEZONE").as_deref(), Some("America/New_York"));
        assert_eq!(config.get("RUN_MODE").as_deref(), Some("api"));
    }

    #[test]
    fn rejects_lines_without_equals() {
        let err = AppConfig::parse("TEAM=dx\nnonsense\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("calbot_config_{}", uuid::Uuid::new_v4()));
        let path = path.to_str().unwrap();
        let err = AppConfig::from_file(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { path: ref p, .. } if p == path));
    }

    #[test]
    fn lone_quote_is_kept() {
        let config = AppConfig::parse("QUOTE_FILE=\"\nTEAM='dx\"\n").unwrap();
        assert_eq!(config.get("QUOTE_FILE").as_deref(), Some("\""));
        assert_eq!(config.get("TEAM").as_deref(), Some("'dx\""));
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let settings = Settings::load(|_| None).unwrap();
        assert_eq!(settings.run_mode, RunMode::Cli);
        assert_eq!(settings.timezone, chrono_tz::America::Detroit);
        assert_eq!(settings.team, DEFAULT_TEAM);
        assert!(settings.calendar_auth.is_none());
    }

    #[test]
    fn settings_reject_unknown_zone() {
        let err = Settings::load(|key| (key == "TIMEZONE").then(|| "Mars/Olympus".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimezone(_)));
    }

    #[test]
    fn access_token_wins_over_api_key() {
        let settings = Settings::load(|key| match key {
            "GOOGLE_ACCESS_TOKEN" => Some("token".to_string()),
            "GOOGLE_API_KEY" => Some("key".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(matches!(settings.calendar_auth, Some(CalendarAuth::AccessToken(t)) if t == "token"));
    }

    #[test]
    fn profile_lookup_by_team() {
        let profile = parse_profile(PROFILES, "profiles.json", "dx").unwrap();
        assert!(profile.is_admin("U1"));
        assert!(!profile.is_admin("U2"));
        assert_eq!(
            profile.all_calendar_ids(),
            vec![
                "main@group.calendar.google.com".to_string(),
                "cs@group.calendar.google.com".to_string()
            ]
        );

        let err = parse_profile(PROFILES, "profiles.json", "other").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTeam(team) if team == "other"));
    }
}
