//! Top-level configuration.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, HttpConfig, LoggingConfig, PlatformConfig, PollingConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Complete suite configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use assay_config::AssayConfig;
///
/// let config = AssayConfig::default();
/// assert_eq!(config.http.timeout_secs, 300);
/// assert_eq!(config.polling.interval_secs, 60);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AssayConfig {
    /// Hosts under test.
    #[serde(default)]
    pub platform: PlatformConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Poll-until-ready settings.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AssayConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - a platform URL is set but is not an `http(s)` URL
    /// - the HTTP timeout is zero
    /// - the attempt budget is zero
    /// - the log level is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, url) in [
            ("platform.portal", &self.platform.portal),
            ("platform.api", &self.platform.api),
        ] {
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("expected an http(s) URL, got {url}"),
                ));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.polling.max_attempts == Some(0) {
            return Err(ConfigError::invalid_value(
                "polling.max_attempts",
                "must be greater than zero when set",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }

    /// API host, or an error when it is not configured.
    pub fn api_host(&self) -> Result<&str, ConfigError> {
        if self.platform.api.is_empty() {
            Err(ConfigError::missing_field("platform.api"))
        } else {
            Ok(&self.platform.api)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AssayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = AssayConfig::default();
        config.platform.api = "ftp://api.example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("platform.api"));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = AssayConfig::default();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_attempts() {
        let mut config = AssayConfig::default();
        config.polling.max_attempts = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level() {
        let mut config = AssayConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_host() {
        let mut config = AssayConfig::default();
        assert!(matches!(
            config.api_host(),
            Err(ConfigError::MissingField { .. })
        ));

        config.platform.api = "https://api.example.com".to_string();
        assert_eq!(config.api_host().unwrap(), "https://api.example.com");
    }
}
