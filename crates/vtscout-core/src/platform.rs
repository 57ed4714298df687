use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A content platform searched by the discovery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
    #[serde(rename = "youtube")]
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Twitch, Platform::YouTube];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Twitch => "twitch",
            Platform::YouTube => "youtube",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitch" => Ok(Platform::Twitch),
            "youtube" => Ok(Platform::YouTube),
            other => Err(ConfigError::UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Twitch".parse::<Platform>().unwrap(), Platform::Twitch);
        assert_eq!(" YOUTUBE ".parse::<Platform>().unwrap(), Platform::YouTube);
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = "kick".parse::<Platform>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlatform(ref p) if p == "kick"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Platform::YouTube).unwrap(),
            "\"youtube\""
        );
        assert_eq!(
            serde_json::to_string(&Platform::Twitch).unwrap(),
            "\"twitch\""
        );
    }
}
