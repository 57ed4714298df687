use std::path::Path;

use crate::app_config::{AppConfig, Environment};
use crate::credentials::{load_credentials_file, Credentials, TwitchCredentials};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the credentials file cannot be read.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the credentials file cannot be read.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), load_credentials_file)
}

/// Core parsing/validation logic, decoupled from the process environment and
/// the filesystem so it can be tested with a `HashMap` lookup.
fn build_app_config<F, L>(lookup: F, load_file: L) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    L: Fn(&Path) -> Result<Credentials, ConfigError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("VTSCOUT_ENV", "development"))?;
    let bind_addr = parse_addr("VTSCOUT_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("VTSCOUT_LOG_LEVEL", "info");

    let credentials_path = optional("VTSCOUT_CREDENTIALS_PATH").map(PathBuf::from);
    let file_credentials = match &credentials_path {
        Some(path) => load_file(path)?,
        None => Credentials::default(),
    };

    // Env vars win over the file, field by field.
    let twitch = match (optional("TWITCH_CLIENT_ID"), optional("TWITCH_CLIENT_SECRET")) {
        (Some(client_id), Some(client_secret)) => Some(TwitchCredentials {
            client_id,
            client_secret,
        }),
        (id, secret) => file_credentials.twitch.map(|file| TwitchCredentials {
            client_id: id.unwrap_or(file.client_id),
            client_secret: secret.unwrap_or(file.client_secret),
        }),
    };
    let youtube_api_key = optional("YOUTUBE_API_KEY").or(file_credentials.youtube_api_key);

    let request_timeout_secs = parse_u64("VTSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VTSCOUT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default("VTSCOUT_USER_AGENT", "vtscout/0.1 (performer-discovery)");
    let max_retries = parse_u32("VTSCOUT_MAX_RETRIES", "2")?;
    let retry_backoff_ms = parse_u64("VTSCOUT_RETRY_BACKOFF_MS", "500")?;
    let rate_limit_per_minute = parse_usize("VTSCOUT_RATE_LIMIT_PER_MINUTE", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        credentials_path,
        credentials: Credentials {
            twitch,
            youtube_api_key,
        },
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_ms,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VTSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
