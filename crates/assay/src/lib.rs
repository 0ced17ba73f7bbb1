//! # Assay
//!
//! **End-to-end API testing toolkit**
//!
//! - **Fluent Requests** – one builder chain per HTTP exchange
//! - **Structural Assertions** – expected JSON is a subset, values are anchored regexes
//! - **Poll Until Ready** – retry while the backend answers `code: 304`
//! - **Typed Device Client** – token and device data endpoints
//! - **Layered Config** – TOML/JSON files, `.env` and environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assay::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_optional_file("config/assay.toml")?
//!         .with_env_prefix("ASSAY")
//!         .load()?;
//!     init_logging(&LogConfig::from(&config.logging))?;
//!
//!     let api = assay::device_api(&config)?;
//!     let token = api.user_token("secret")?;
//!
//!     api.alert_data(&token, "dev-1", Fetch::UntilReady)?
//!         .assert_status(200)?
//!         .assert_json(&json!({"code": 200, "result": []}))?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/assay/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export member crates
pub use assay_config as config;
pub use assay_core as core;
pub use assay_device as device;
pub use assay_diff as diff;
pub use assay_http as http;
pub use assay_telemetry as telemetry;

use assay_config::{AssayConfig, ConfigError};
use assay_device::DeviceApi;
use assay_http::ReqwestTransport;

/// Builds a [`DeviceApi`] for the configured API host and poll policy.
///
/// # Errors
///
/// Returns `ConfigError::MissingField` if `platform.api` is not set.
pub fn device_api(config: &AssayConfig) -> Result<DeviceApi<ReqwestTransport>, ConfigError> {
    Ok(DeviceApi::new(
        config.api_host()?,
        ReqwestTransport::new(),
        config.polling.policy(),
    ))
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use assay::prelude::*;
/// ```
pub mod prelude {
    pub use assay_config::{AssayConfig, ConfigLoader, TestAccounts};
    pub use assay_core::ContentType;
    pub use assay_device::{DeviceApi, Fetch, InterfaceType, SensorQuery};
    pub use assay_diff::{compare, CompareOptions, JsonPath};
    pub use assay_http::{
        poll_until_ready, ApiRequest, ApiResponse, BodyAssertion, PollPolicy, ReqwestTransport,
        TlsVerify, Transport,
    };
    pub use assay_telemetry::{init_logging, LogConfig};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_api_requires_host() {
        assert!(device_api(&AssayConfig::default()).is_err());
    }

    #[test]
    fn test_device_api_uses_config() {
        let mut config = AssayConfig::default();
        config.platform.api = "https://api.example.com".to_string();
        config.polling.max_attempts = Some(3);

        let api = device_api(&config).unwrap();
        assert_eq!(api.host(), "https://api.example.com");
        assert_eq!(api.policy().max_attempts, Some(3));
    }
}
