//! Platform credentials: read-only values handed to the platform clients.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TwitchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for TwitchCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

/// Credentials for every platform. A platform without credentials is
/// reported as failed instead of being searched.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub twitch: Option<TwitchCredentials>,
    pub youtube_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("twitch", &self.twitch)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    twitch: Option<TwitchSection>,
    #[serde(default)]
    youtube: Option<YouTubeSection>,
}

#[derive(Debug, Deserialize)]
struct TwitchSection {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct YouTubeSection {
    #[serde(default)]
    api_key: String,
}

/// Load credentials from a YAML file shaped like:
///
/// ```yaml
/// twitch:
///   client_id: abc
///   client_secret: def
/// youtube:
///   api_key: ghi
/// ```
///
/// Blank values are treated as absent.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed.
pub fn load_credentials_file(path: &Path) -> Result<Credentials, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::CredentialsFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
    parse_credentials(&content)
}

pub(crate) fn parse_credentials(content: &str) -> Result<Credentials, ConfigError> {
    let file: CredentialsFile =
        serde_yaml::from_str(content).map_err(ConfigError::CredentialsFileParse)?;

    let twitch = file.twitch.and_then(|t| {
        let id = t.client_id.trim();
        let secret = t.client_secret.trim();
        (!id.is_empty() && !secret.is_empty()).then(|| TwitchCredentials {
            client_id: id.to_string(),
            client_secret: secret.to_string(),
        })
    });
    let youtube_api_key = file
        .youtube
        .map(|y| y.api_key.trim().to_string())
        .filter(|k| !k.is_empty());

    Ok(Credentials {
        twitch,
        youtube_api_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_sections() {
        let yaml = r"
twitch:
  client_id: abc
  client_secret: def
youtube:
  api_key: ghi
";
        let creds = parse_credentials(yaml).unwrap();
        assert_eq!(
            creds.twitch,
            Some(TwitchCredentials {
                client_id: "abc".to_string(),
                client_secret: "def".to_string(),
            })
        );
        assert_eq!(creds.youtube_api_key.as_deref(), Some("ghi"));
    }

    #[test]
    fn blank_values_are_absent() {
        let yaml = r#"
twitch:
  client_id: ""
  client_secret: def
youtube:
  api_key: "  "
"#;
        let creds = parse_credentials(yaml).unwrap();
        assert!(creds.twitch.is_none());
        assert!(creds.youtube_api_key.is_none());
    }

    #[test]
    fn missing_sections_are_absent() {
        let creds = parse_credentials("youtube:\n  api_key: k\n").unwrap();
        assert!(creds.twitch.is_none());
        assert_eq!(creds.youtube_api_key.as_deref(), Some("k"));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_credentials("twitch: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::CredentialsFileParse(_)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials {
            twitch: Some(TwitchCredentials {
                client_id: "id".to_string(),
                client_secret: "super-secret".to_string(),
            }),
            youtube_api_key: Some("yt-secret".to_string()),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("yt-secret"));
    }
}
