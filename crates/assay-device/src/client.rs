//! Device API client.

use assay_http::{poll_until_ready, ApiRequest, ApiResponse, ParamValue, PollPolicy, Transport};

use crate::error::DeviceError;
use crate::query::{Fetch, InterfaceType, SensorQuery};

const TOKEN_PATH: &str = "pxp/iot/Device/jwtGenerate.json";
const DEVICE_DATA_PATH: &str = "pxp/iot/Device/findDeviceData.json";

/// Client for the device data endpoints of one host.
///
/// Every call disables certificate verification, since test environments
/// run with self-signed certificates.
///
/// # Example
///
/// ```
/// use assay_device::{DeviceApi, Fetch};
/// use assay_http::{PollPolicy, RawResponse, StubTransport};
///
/// # fn main() -> Result<(), assay_device::DeviceError> {
/// let transport = StubTransport::with_responses([
///     RawResponse::new(200, r#"{"code": 200, "result": {"idToken": "jwt"}}"#),
///     RawResponse::new(200, r#"{"code": 200, "result": []}"#),
/// ]);
/// let api = DeviceApi::new("https://iot.example.com", transport, PollPolicy::default());
///
/// let token = api.user_token("secret")?;
/// let alerts = api.alert_data(&token, "dev-1", Fetch::UntilReady)?;
/// assert_eq!(alerts.status(), 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceApi<T> {
    host: String,
    transport: T,
    policy: PollPolicy,
}

impl<T: Transport> DeviceApi<T> {
    /// Creates a client for `host`.
    pub fn new(host: impl Into<String>, transport: T, policy: PollPolicy) -> Self {
        Self {
            host: host.into(),
            transport,
            policy,
        }
    }

    /// API host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Poll policy used by [`Fetch::UntilReady`] calls.
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Requests a token for `secret` and returns the raw response.
    pub fn user_token_response(&self, secret: &str) -> Result<ApiResponse, DeviceError> {
        let response = ApiRequest::get(self.host.as_str())
            .add_path(TOKEN_PATH)
            .add_param("info", secret)
            .is_verify(false)
            .send(&self.transport)?;
        Ok(response)
    }

    /// Requests a token for `secret` and extracts `result.idToken`.
    pub fn user_token(&self, secret: &str) -> Result<String, DeviceError> {
        let response = self.user_token_response(secret)?;
        response
            .json()
            .and_then(|json| json.pointer("/result/idToken"))
            .and_then(|token| token.as_str())
            .map(str::to_string)
            .ok_or_else(|| DeviceError::MissingToken {
                body: response.text().to_string(),
            })
    }

    /// Sensor readings for one device and time window.
    pub fn sensor_data(
        &self,
        token: &str,
        query: &SensorQuery,
        fetch: Fetch,
    ) -> Result<ApiResponse, DeviceError> {
        self.fetch(fetch, || {
            self.device_data(token, &query.device_id, query.interface_type)
                .add_param("dataType", query.data_type.as_str())
                .add_param("startTime", query.start_time.as_str())
                .add_param("endTime", query.end_time.as_str())
                .add_param("pageNo", query.page_number)
                .add_param("page_size", query.page_size)
        })
    }

    /// Alert history of one device.
    pub fn alert_data(
        &self,
        token: &str,
        device_id: &str,
        fetch: Fetch,
    ) -> Result<ApiResponse, DeviceError> {
        self.fetch(fetch, || {
            self.device_data(token, device_id, InterfaceType::AlertData)
        })
    }

    /// Sends radar settings to one device. `params` are added as-is.
    pub fn radar_data<K, V>(
        &self,
        token: &str,
        device_id: &str,
        params: &[(K, V)],
        fetch: Fetch,
    ) -> Result<ApiResponse, DeviceError>
    where
        K: AsRef<str>,
        V: ToString,
    {
        self.fetch(fetch, || {
            params.iter().fold(
                self.device_data(token, device_id, InterfaceType::RadarData),
                |request, (key, value)| request.add_param(key.as_ref(), value.to_string()),
            )
        })
    }

    /// Sets the LED luminosity of one device.
    pub fn adjust_led_luminosity(
        &self,
        token: &str,
        device_id: &str,
        dimming: impl ParamValue + Clone,
        fetch: Fetch,
    ) -> Result<ApiResponse, DeviceError> {
        self.fetch(fetch, || {
            self.device_data(token, device_id, InterfaceType::LedLuminosity)
                .add_param("dimming", dimming.clone())
                .set_token(token)
        })
    }

    fn device_data(
        &self,
        token: &str,
        device_id: &str,
        interface_type: InterfaceType,
    ) -> ApiRequest {
        ApiRequest::get(self.host.as_str())
            .add_path(DEVICE_DATA_PATH)
            .add_param("deviceId", device_id)
            .add_param("interfaceType", interface_type)
            .add_header("idToken", token)
            .is_verify(false)
    }

    fn fetch<F>(&self, fetch: Fetch, mut build: F) -> Result<ApiResponse, DeviceError>
    where
        F: FnMut() -> ApiRequest,
    {
        tracing::debug!(host = %self.host, fetch = ?fetch, "fetching device data");
        match fetch {
            Fetch::Once => Ok(build().send(&self.transport)?),
            Fetch::UntilReady => Ok(poll_until_ready(&self.transport, &self.policy, build)?),
        }
    }
}
