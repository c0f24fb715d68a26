use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const ENV_API_URL: &str = "NEWSLY_API_URL";
pub const ENV_BACKEND_URL: &str = "NEWSLY_BACKEND_URL";
pub const ENV_TIMEZONE: &str = "NEWSLY_TZ";
pub const ENV_FAST_FEATURED: &str = "NEWSLY_FAST_FEATURED";
pub const ENV_TIMEOUT_SECS: &str = "NEWSLY_TIMEOUT_SECS";

/// Client configuration.
///
/// Values come from an optional TOML file and are then overridden by
/// environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the main API (auth, newsletters, summarize).
    pub api_base_url: String,
    /// Base URL of the service that stores digest subscriptions.
    pub subscriptions_base_url: String,
    /// IANA zone sent with subscriptions so digests arrive at local evening.
    pub timezone: String,
    /// Ask the featured endpoint for its quick mode.
    pub fast_featured: bool,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            subscriptions_base_url: "http://127.0.0.1:8001".to_string(),
            timezone: "Europe/Istanbul".to_string(),
            fast_featured: false,
            request_timeout_secs: 30,
        }
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => ConfigError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => ConfigError::InvalidValue {
                field: "config_file".to_string(),
                value: format!("{}: {}", path.display(), e),
            },
        })?;
        Self::from_toml_str(&contents)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. `apply_env` passes the process environment.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.subscriptions_base_url = url;
        }
        if let Some(tz) = lookup(ENV_TIMEZONE) {
            self.timezone = tz;
        }
        if let Some(flag) = lookup(ENV_FAST_FEATURED) {
            self.fast_featured = parse_flag(ENV_FAST_FEATURED, &flag)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs =
                secs.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: ENV_TIMEOUT_SECS.to_string(),
                        value: secs.clone(),
                    })?;
        }
        Ok(self)
    }

    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("subscriptions_base_url", &self.subscriptions_base_url),
        ] {
            let parsed = Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
                field: field.to_string(),
                url: value.clone(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl {
                    field: field.to_string(),
                    url: value.clone(),
                });
            }
        }
        if self.timezone.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "timezone".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// File (if given), then environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        let config = base.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            api_base_url = "https://api.newsly.example"
            fast_featured = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.newsly.example");
        assert!(config.fast_featured);
        assert_eq!(config.timezone, "Europe/Istanbul");
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("api_base_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[
                (ENV_API_URL, "http://localhost:9000"),
                (ENV_FAST_FEATURED, "yes"),
                (ENV_TIMEOUT_SECS, "5"),
            ]))
            .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert!(config.fast_featured);
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_bad_overrides_are_rejected() {
        let err = AppConfig::default()
            .with_overrides(lookup(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::default()
            .with_overrides(lookup(&[(ENV_FAST_FEATURED, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let config = AppConfig {
            subscriptions_base_url: "ftp://files.example".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timezone = \"UTC\"").unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timezone, "UTC");

        let missing = AppConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::FileNotFound { .. }));
    }
}
