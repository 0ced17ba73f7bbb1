//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::path::PathBuf;
use std::time::Duration;

use assay_http::{PollPolicy, TlsVerify};
use serde::{Deserialize, Serialize};

/// Hosts under test.
///
/// # Example
///
/// ```
/// use assay_config::PlatformConfig;
///
/// let platform = PlatformConfig {
///     portal: "https://portal.example.com".to_string(),
///     api: "https://api.example.com".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Web portal base URL.
    #[serde(default)]
    pub portal: String,

    /// API host base URL.
    #[serde(default)]
    pub api: String,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Exchange timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify server certificates.
    #[serde(default = "default_true")]
    pub verify_tls: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            verify_tls: true,
        }
    }
}

impl HttpConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Certificate verification mode.
    pub fn tls_verify(&self) -> TlsVerify {
        TlsVerify::from(self.verify_tls)
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

/// Poll-until-ready settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Seconds between attempts.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Attempt budget. Unset means poll until ready.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: None,
        }
    }
}

impl PollingConfig {
    /// Policy for [`poll_until_ready`](assay_http::poll_until_ready).
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts,
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (CI ingestion).
    Json,
    /// Human-readable pretty format.
    #[default]
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// File that receives a copy of every log line, appended.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Include ANSI color codes in console output.
    #[serde(default)]
    pub ansi_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
            ansi_enabled: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(300));
        assert_eq!(config.tls_verify(), TlsVerify::Enabled);
    }

    #[test]
    fn test_polling_policy() {
        let config = PollingConfig {
            interval_secs: 5,
            max_attempts: Some(12),
        };
        let policy = config.policy();
        assert_eq!(policy.interval, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, Some(12));

        assert_eq!(PollingConfig::default().policy(), PollPolicy::default());
    }

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<HttpConfig, _> = serde_json::from_str(r#"{"timeout": 5}"#);
        assert!(result.is_err());
    }
}
