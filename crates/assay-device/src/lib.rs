//! # Assay Device
//!
//! Typed client for the IoT platform's device endpoints: token issuance and
//! the `findDeviceData` family (sensor readings, alerts, radar settings, LED
//! luminosity).
//!
//! Data endpoints answer `{"code": 304}` while results are being prepared.
//! Calls made with [`Fetch::UntilReady`] keep asking, following the client's
//! [`PollPolicy`](assay_http::PollPolicy).

#![doc(html_root_url = "https://docs.rs/assay-device/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod query;

pub use client::DeviceApi;
pub use error::DeviceError;
pub use query::{Fetch, InterfaceType, SensorQuery};
