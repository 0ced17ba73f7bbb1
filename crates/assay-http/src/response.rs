//! Response wrapper and assertions.

use std::sync::OnceLock;
use std::time::Duration;

use assay_diff::{compare, CompareOptions};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AssertionError;
use crate::transport::RawResponse;

const DEFAULT_ENCODING: &str = "utf-8";

/// What [`ApiResponse::assert_body`] checks.
///
/// Exactly one check runs, picked in this order:
/// 1. `is_expected == false`: `contains` must be absent from the body
/// 2. `contains`: must be present in the body
/// 3. `json`: structural comparison of the JSON body, using `options`
/// 4. `xml`: not supported yet
#[derive(Debug, Clone)]
pub struct BodyAssertion {
    /// Expected JSON document.
    pub json: Option<Value>,
    /// Substring to look for.
    pub contains: Option<String>,
    /// Expected XML document.
    pub xml: Option<String>,
    /// `false` inverts the `contains` check.
    pub is_expected: bool,
    /// Options for the JSON comparison.
    pub options: CompareOptions,
}

impl Default for BodyAssertion {
    fn default() -> Self {
        Self {
            json: None,
            contains: None,
            xml: None,
            is_expected: true,
            options: CompareOptions::default(),
        }
    }
}

impl BodyAssertion {
    /// Expects the body to match `expected` structurally.
    pub fn json(expected: Value) -> Self {
        Self {
            json: Some(expected),
            ..Self::default()
        }
    }

    /// Expects the body to contain `text`.
    pub fn contains(text: impl Into<String>) -> Self {
        Self {
            contains: Some(text.into()),
            ..Self::default()
        }
    }

    /// Expects the body not to contain `text`.
    pub fn not_contains(text: impl Into<String>) -> Self {
        Self {
            contains: Some(text.into()),
            is_expected: false,
            ..Self::default()
        }
    }

    /// Expects the body to match an XML document.
    pub fn xml(expected: impl Into<String>) -> Self {
        Self {
            xml: Some(expected.into()),
            ..Self::default()
        }
    }

    /// Sets the JSON comparison options.
    #[must_use]
    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }
}

/// An HTTP response with assertion helpers.
///
/// Assertions return `Result<&Self, AssertionError>`, so checks chain with `?`:
///
/// ```
/// use assay_http::{ApiResponse, RawResponse};
/// use serde_json::json;
///
/// # fn main() -> Result<(), assay_http::AssertionError> {
/// let response = ApiResponse::from_raw(
///     RawResponse::new(200, r#"{"code": 200, "message": "ok"}"#)
///         .with_header("Content-Type", "application/json; charset=utf-8"),
/// );
/// response
///     .assert_status(200)?
///     .assert_content_type("application/json")?
///     .assert_json(&json!({"code": 200}))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ApiResponse {
    status: u16,
    headers: HeaderMap,
    url: String,
    encoding: String,
    body: Bytes,
    text: String,
    json: OnceLock<Option<Value>>,
    elapsed: Duration,
}

impl ApiResponse {
    /// Wraps a transport response.
    pub fn from_raw(raw: RawResponse) -> Self {
        let encoding = raw
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset)
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string());
        let text = String::from_utf8_lossy(&raw.body).into_owned();

        Self {
            status: raw.status,
            headers: raw.headers,
            url: raw.url,
            encoding,
            body: raw.body,
            text,
            json: OnceLock::new(),
            elapsed: raw.elapsed,
        }
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers. Lookups are case-insensitive.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Charset declared by the `Content-Type` header, `utf-8` otherwise.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Time the exchange took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Body parsed as JSON, or `None` when it is not JSON. Parsed once.
    pub fn json(&self) -> Option<&Value> {
        self.json
            .get_or_init(|| serde_json::from_str(&self.text).ok())
            .as_ref()
    }

    /// Deserializes the body into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Value of header `key`, if present and valid text.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    /// Checks the status code.
    pub fn assert_status(&self, expected: u16) -> Result<&Self, AssertionError> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(AssertionError::Status {
                expected,
                actual: self.status,
            })
        }
    }

    /// Checks that the `Content-Type` header contains `expected`.
    ///
    /// Accepts a [`ContentType`](assay_core::ContentType) or any string.
    pub fn assert_content_type(
        &self,
        expected: impl AsRef<str>,
    ) -> Result<&Self, AssertionError> {
        let expected = expected.as_ref();
        let actual = self.get_header(CONTENT_TYPE.as_str()).unwrap_or_default();
        if actual.contains(expected) {
            Ok(self)
        } else {
            Err(AssertionError::ContentType {
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Checks header `key`: equality when `strict`, substring otherwise.
    pub fn assert_header(
        &self,
        key: &str,
        value: &str,
        strict: bool,
    ) -> Result<&Self, AssertionError> {
        let actual = self
            .get_header(key)
            .ok_or_else(|| AssertionError::HeaderMissing(key.to_string()))?;

        if strict && actual != value {
            return Err(AssertionError::HeaderValue {
                key: key.to_string(),
                expected: value.to_string(),
                actual: actual.to_string(),
            });
        }
        if !strict && !actual.contains(value) {
            return Err(AssertionError::HeaderContains {
                key: key.to_string(),
                expected: value.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(self)
    }

    /// Runs a body check. See [`BodyAssertion`] for the dispatch order.
    pub fn assert_body(&self, assertion: &BodyAssertion) -> Result<&Self, AssertionError> {
        if !assertion.is_expected {
            let unexpected = assertion.contains.as_deref().ok_or_else(|| {
                AssertionError::Configuration(
                    "is_expected = false requires a `contains` string".to_string(),
                )
            })?;
            if self.text.contains(unexpected) {
                return Err(AssertionError::BodyPresent {
                    unexpected: unexpected.to_string(),
                    body: self.text.clone(),
                });
            }
            return Ok(self);
        }

        if let Some(expected) = &assertion.contains {
            if !self.text.contains(expected.as_str()) {
                return Err(AssertionError::BodyMissing {
                    expected: expected.clone(),
                    body: self.text.clone(),
                });
            }
            return Ok(self);
        }

        if let Some(expected) = &assertion.json {
            let actual = match self.json() {
                Some(actual) => actual,
                None => {
                    let err = serde_json::from_str::<Value>(&self.text)
                        .err()
                        .map(AssertionError::InvalidJson);
                    return Err(err.unwrap_or_else(|| {
                        AssertionError::Configuration("response body is not JSON".to_string())
                    }));
                }
            };
            compare(actual, expected, &assertion.options)?;
            return Ok(self);
        }

        if assertion.xml.is_some() {
            return Err(AssertionError::NotImplemented("XML"));
        }

        Err(AssertionError::Configuration(
            "a body assertion needs `json`, `contains` or `xml`".to_string(),
        ))
    }

    /// Compares the JSON body with `expected` using default options.
    pub fn assert_json(&self, expected: &Value) -> Result<&Self, AssertionError> {
        self.assert_body(&BodyAssertion::json(expected.clone()))
    }

    /// Checks that the body contains `text`.
    pub fn assert_body_contains(&self, text: &str) -> Result<&Self, AssertionError> {
        self.assert_body(&BodyAssertion::contains(text))
    }

    /// Checks that the body does not contain `text`.
    pub fn assert_body_not_contains(&self, text: &str) -> Result<&Self, AssertionError> {
        self.assert_body(&BodyAssertion::not_contains(text))
    }
}

fn charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_core::ContentType;
    use serde_json::json;

    fn json_response(status: u16, body: &Value) -> ApiResponse {
        ApiResponse::from_raw(
            RawResponse::new(status, body.to_string())
                .with_header("Content-Type", "application/json; charset=UTF-8"),
        )
    }

    #[test]
    fn test_accessors() {
        let response = ApiResponse::from_raw(
            RawResponse::new(201, "created")
                .with_header("X-Request-Id", "abc")
                .with_url("http://h/x"),
        );
        assert_eq!(response.status(), 201);
        assert_eq!(response.text(), "created");
        assert_eq!(response.url(), "http://h/x");
        assert_eq!(response.body().as_ref(), b"created");
        assert_eq!(response.get_header("x-request-id"), Some("abc"));
        assert_eq!(response.get_header("missing"), None);
        assert!(response.json().is_none());
    }

    #[test]
    fn test_encoding() {
        assert_eq!(json_response(200, &json!({})).encoding(), "utf-8");
        let latin = ApiResponse::from_raw(
            RawResponse::new(200, "x").with_header("Content-Type", "text/html; charset=\"ISO-8859-1\""),
        );
        assert_eq!(latin.encoding(), "iso-8859-1");
        let none = ApiResponse::from_raw(RawResponse::new(200, "x"));
        assert_eq!(none.encoding(), "utf-8");
    }

    #[test]
    fn test_json_as() {
        #[derive(serde::Deserialize)]
        struct Envelope {
            code: u16,
        }
        let response = json_response(200, &json!({"code": 304}));
        let envelope: Envelope = response.json_as().unwrap();
        assert_eq!(envelope.code, 304);
        assert_eq!(response.json(), Some(&json!({"code": 304})));
    }

    #[test]
    fn test_assert_status() {
        let response = json_response(200, &json!({}));
        assert!(response.assert_status(200).is_ok());

        let err = response.assert_status(404).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("200"));
    }

    #[test]
    fn test_assert_content_type() {
        let response = json_response(200, &json!({}));
        assert!(response.assert_content_type(ContentType::ApplicationJson).is_ok());
        assert!(matches!(
            response.assert_content_type("text/html"),
            Err(AssertionError::ContentType { .. })
        ));
    }

    #[test]
    fn test_assert_header() {
        let response = ApiResponse::from_raw(
            RawResponse::new(200, "").with_header("Cache-Control", "no-cache, no-store"),
        );
        assert!(response.assert_header("cache-control", "no-store", false).is_ok());
        assert!(response
            .assert_header("Cache-Control", "no-cache, no-store", true)
            .is_ok());
        assert!(matches!(
            response.assert_header("Cache-Control", "no-store", true),
            Err(AssertionError::HeaderValue { .. })
        ));
        assert!(matches!(
            response.assert_header("Cache-Control", "max-age", false),
            Err(AssertionError::HeaderContains { .. })
        ));
        assert!(matches!(
            response.assert_header("ETag", "x", false),
            Err(AssertionError::HeaderMissing(key)) if key == "ETag"
        ));
    }

    #[test]
    fn test_assert_body_contains() {
        let response = ApiResponse::from_raw(RawResponse::new(200, "device is online"));
        assert!(response.assert_body_contains("online").is_ok());
        assert!(matches!(
            response.assert_body_contains("offline"),
            Err(AssertionError::BodyMissing { .. })
        ));
        assert!(response.assert_body_not_contains("offline").is_ok());
        assert!(matches!(
            response.assert_body_not_contains("online"),
            Err(AssertionError::BodyPresent { .. })
        ));
    }

    #[test]
    fn test_assert_json_allows_extra_fields() {
        let response = json_response(200, &json!({"code": 200, "result": {"idToken": "t"}}));
        assert!(response.assert_json(&json!({"code": 200})).is_ok());
        assert!(response
            .assert_json(&json!({"result": {"idToken": "[a-z]+"}}))
            .is_ok());
    }

    #[test]
    fn test_assert_json_reports_mismatches() {
        let response = json_response(200, &json!({"code": 500}));
        let err = response
            .assert_json(&json!({"code": 200, "message": "ok"}))
            .unwrap_err();
        let AssertionError::Body(comparison) = err else {
            panic!("expected a body comparison error");
        };
        assert_eq!(comparison.mismatches().len(), 2);
    }

    #[test]
    fn test_assert_json_with_options() {
        let response = json_response(200, &json!({"ids": [2, 1], "ts": 99}));
        let assertion = BodyAssertion::json(json!({"ids": [1, 2], "ts": 1})).with_options(
            CompareOptions::new()
                .ignore_order(true)
                .try_exclude("root['ts']")
                .unwrap(),
        );
        assert!(response.assert_body(&assertion).is_ok());
    }

    #[test]
    fn test_assert_json_on_non_json_body() {
        let response = ApiResponse::from_raw(RawResponse::new(200, "<html>"));
        assert!(matches!(
            response.assert_json(&json!({})),
            Err(AssertionError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_assert_body_dispatch() {
        let response = json_response(200, &json!({"a": 1}));

        let xml = BodyAssertion::xml("<a>1</a>");
        assert!(matches!(
            response.assert_body(&xml),
            Err(AssertionError::NotImplemented("XML"))
        ));

        assert!(matches!(
            response.assert_body(&BodyAssertion::default()),
            Err(AssertionError::Configuration(_))
        ));

        let inverted_without_text = BodyAssertion {
            is_expected: false,
            ..BodyAssertion::default()
        };
        assert!(matches!(
            response.assert_body(&inverted_without_text),
            Err(AssertionError::Configuration(_))
        ));

        // contains wins over json
        let both = BodyAssertion {
            contains: Some("\"a\"".to_string()),
            json: Some(json!({"a": 2})),
            ..BodyAssertion::default()
        };
        assert!(response.assert_body(&both).is_ok());
    }

    #[test]
    fn test_chaining() {
        let response = json_response(200, &json!({"code": 200}));
        let chained = response
            .assert_status(200)
            .and_then(|r| r.assert_content_type("json"))
            .and_then(|r| r.assert_body_contains("code"));
        assert!(chained.is_ok());
    }
}
