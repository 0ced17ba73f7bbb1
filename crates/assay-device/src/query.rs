//! Query parameters of the device data endpoint.

use assay_http::ParamValue;

/// Selector of the data a `findDeviceData` call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    /// Sensor readings over a time window.
    SensorData = 1,
    /// Alert history.
    AlertData = 2,
    /// LED luminosity adjustment.
    LedLuminosity = 3,
    /// Radar settings.
    RadarData = 4,
}

impl InterfaceType {
    /// Wire value.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl ParamValue for InterfaceType {
    fn into_param(self) -> Option<String> {
        Some(self.code().to_string())
    }
}

/// Whether a call is sent once or polled until the data is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fetch {
    /// One request; a `304` envelope is returned as-is.
    Once,
    /// Repeat while the envelope code is `304`.
    #[default]
    UntilReady,
}

/// Sensor data window for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorQuery {
    /// Device identifier.
    pub device_id: String,
    /// Window start, as the backend expects it.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
    /// Metric name.
    pub data_type: String,
    /// Endpoint selector.
    pub interface_type: InterfaceType,
    /// 1-based page number.
    pub page_number: u32,
    /// Page size.
    pub page_size: u32,
}

impl SensorQuery {
    /// Default metric.
    pub const DEFAULT_DATA_TYPE: &'static str = "peopleCnt";

    /// First page of `peopleCnt` readings, 100 per page.
    pub fn new(
        device_id: impl Into<String>,
        start_time: impl ToString,
        end_time: impl ToString,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            data_type: Self::DEFAULT_DATA_TYPE.to_string(),
            interface_type: InterfaceType::SensorData,
            page_number: 1,
            page_size: 100,
        }
    }

    /// Sets the metric.
    #[must_use]
    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Sets the endpoint selector.
    #[must_use]
    pub fn interface_type(mut self, interface_type: InterfaceType) -> Self {
        self.interface_type = interface_type;
        self
    }

    /// Sets the page.
    #[must_use]
    pub fn page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }
}
