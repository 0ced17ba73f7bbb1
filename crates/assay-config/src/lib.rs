//! Typed configuration for Assay suites.
//!
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//! - JSON test account files
//!
//! # Example
//!
//! ```no_run
//! use assay_config::{ConfigLoader, TestAccounts};
//!
//! # fn main() -> Result<(), assay_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("config/assay.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("ASSAY")
//!     .load()?;
//!
//! let accounts = TestAccounts::from_file("resources/test_data/test_account.json")?;
//! println!("{} as {}", config.api_host()?, accounts.common_user()?.user_email);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [platform]
//! portal = "https://portal.example.com"
//! api = "https://api.example.com"
//!
//! [http]
//! timeout_secs = 300
//! verify_tls = true
//!
//! [polling]
//! interval_secs = 60
//! max_attempts = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! file = "results/log/log.log"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY`, for example
//! `ASSAY__PLATFORM__API=https://staging.example.com`.

#![warn(missing_docs)]

mod accounts;
mod config;
mod error;
mod loader;
mod schema;

pub use accounts::{Account, TestAccounts, COMMON_USER};
pub use config::AssayConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
