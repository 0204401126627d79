#![allow(non_snake_case)]

use std::env;
use std::process;

use calBot::cli;
use calBot::config::{load_profile, AppConfig, Profile, RunMode, Settings, DEFAULT_LOG_LEVEL};
use calBot::error::ConfigError;
use calBot::logging;
use calBot::runtime;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|err| startup_failure(err)),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let settings = Settings::load(get_prop).unwrap_or_else(|err| startup_failure(err));
    if let Err(err) = logging::init_tracing(&settings.log_level) {
        eprintln!("{err}");
    }

    let profile = load_profile(&settings.profile_file, &settings.team);
    match settings.run_mode {
        RunMode::Api => {
            let profile = profile.unwrap_or_else(|err| {
                error!(error = %err, "failed to load profile");
                process::exit(1);
            });
            let Some(token) = settings.discord_token.clone() else {
                error!(error = %ConfigError::Missing("DISCORD_TOKEN"), "cannot start bot");
                process::exit(1);
            };
            if let Err(err) = runtime::run_api(settings, profile, token).await {
                error!(error = %err, "discord client stopped");
                process::exit(1);
            }
        }
        RunMode::Cli => {
            let profile = profile.unwrap_or_else(|err| {
                warn!(error = %err, "no profile loaded, using an empty one");
                Profile::default()
            });
            cli::cli(settings, profile).await;
        }
    }
}

/// Config errors happen before the configured log level is known, so they
/// are logged at the default level.
fn startup_failure(err: ConfigError) -> ! {
    let _ = logging::init_tracing(DEFAULT_LOG_LEVEL);
    error!(error = %err, "invalid configuration");
    process::exit(1);
}
