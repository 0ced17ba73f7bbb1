//! Values accepted by the builder's parameter and header methods.

use assay_core::ContentType;

/// A value that may be absent.
///
/// Builder methods taking a `ParamValue` silently skip absent values, so
/// optional call-site arguments can be passed straight through:
///
/// ```
/// use assay_http::ApiRequest;
///
/// let page: Option<u32> = None;
/// let prepared = ApiRequest::get("http://localhost")
///     .add_param("deviceId", "dev-1")
///     .add_param("pageNo", page)
///     .prepare()
///     .unwrap();
/// assert!(prepared.params.iter().all(|(k, _)| k != "pageNo"));
/// ```
pub trait ParamValue {
    /// Renders the value, or `None` when absent.
    fn into_param(self) -> Option<String>;
}

impl ParamValue for &str {
    fn into_param(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ParamValue for String {
    fn into_param(self) -> Option<String> {
        Some(self)
    }
}

impl ParamValue for &String {
    fn into_param(self) -> Option<String> {
        Some(self.clone())
    }
}

impl ParamValue for ContentType {
    fn into_param(self) -> Option<String> {
        Some(self.as_str().to_string())
    }
}

impl<T: ParamValue> ParamValue for Option<T> {
    fn into_param(self) -> Option<String> {
        self.and_then(ParamValue::into_param)
    }
}

macro_rules! display_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ParamValue for $ty {
                fn into_param(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_param!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);
