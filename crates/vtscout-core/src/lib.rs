//! Shared configuration and platform vocabulary for vtscout.

pub mod app_config;
pub mod config;
pub mod credentials;
pub mod platform;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{load_credentials_file, Credentials, TwitchCredentials};
pub use platform::Platform;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read credentials file {path}: {source}")]
    CredentialsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credentials file: {0}")]
    CredentialsFileParse(#[source] serde_yaml::Error),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}
