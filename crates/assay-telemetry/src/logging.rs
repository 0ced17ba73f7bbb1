//! Console and file logging for test runs.
//!
//! Every log line goes to stdout and, when configured, is appended to a
//! log file so CI keeps a record of the exchanges a suite made.
//!
//! # Example
//!
//! ```rust,ignore
//! use assay_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig {
//!     file: Some("results/log/log.log".into()),
//!     ..LogConfig::default()
//! };
//! init_logging(&config)?;
//!
//! tracing::info!(device_id = "dev-1", "polling sensor data");
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use assay_config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::{TelemetryError, TelemetryResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. "info", "assay_http=debug,warn").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// ANSI colors on the console.
    pub ansi: bool,

    /// File that receives a copy of every line, appended.
    pub file: Option<PathBuf>,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: false,
            ansi: false,
            file: None,
            file_line_info: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Verbose human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            ansi: true,
            file_line_info: true,
            ..Self::default()
        }
    }

    /// JSON lines for CI log ingestion.
    #[must_use]
    pub fn ci() -> Self {
        Self {
            json_format: true,
            ..Self::default()
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            level: config.level.clone(),
            json_format: config.format == LogFormat::Json,
            ansi: config.ansi_enabled,
            file: config.file.clone(),
            ..Self::default()
        }
    }
}

/// Initializes the global subscriber.
///
/// The log file and its parent directories are created if missing.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the level is invalid or a
/// subscriber is already installed, and `TelemetryError::LogFile` if the
/// log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let mut layers: Vec<BoxedLayer> = vec![console_layer(config)?];
    if let Some(path) = &config.file {
        layers.push(file_layer(config, path)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

fn console_layer(config: &LogConfig) -> TelemetryResult<BoxedLayer> {
    let filter = create_env_filter(&config.level)?;

    let layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(config.ansi)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed()
    };
    Ok(layer)
}

fn file_layer(config: &LogConfig, path: &Path) -> TelemetryResult<BoxedLayer> {
    let filter = create_env_filter(&config.level)?;
    let writer = Mutex::new(open_log_file(path)?);

    let layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed()
    };
    Ok(layer)
}

fn open_log_file(path: &Path) -> TelemetryResult<fs::File> {
    let to_error = |source| TelemetryError::LogFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(!config.json_format);
        assert!(config.file.is_none());
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_presets() {
        let dev = LogConfig::development();
        assert_eq!(dev.level, "debug");
        assert!(dev.file_line_info);

        assert!(LogConfig::ci().json_format);
    }

    #[test]
    fn test_from_logging_config() {
        let section = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Json,
            file: Some(PathBuf::from("results/log/log.log")),
            ansi_enabled: true,
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.level, "warn");
        assert!(config.json_format);
        assert!(config.ansi);
        assert_eq!(config.file, Some(PathBuf::from("results/log/log.log")));
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("assay_http=debug,warn").is_ok());
        assert!(create_env_filter("assay_http=[").is_err());
    }

    #[test]
    fn test_open_log_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("log").join("log.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
