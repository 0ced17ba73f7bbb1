//! Request building.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;
use crate::param::ParamValue;
use crate::response::ApiResponse;
use crate::trace;
use crate::transport::Transport;

/// Timeout applied to every exchange unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Query parameter added to every request so backends can tell test traffic apart.
pub const AUTOMATION_MARKER: (&str, &str) = ("test", "automation");

/// HTTP methods supported by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server certificate verification mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsVerify {
    /// Verify against the system roots.
    #[default]
    Enabled,
    /// Accept any certificate.
    Disabled,
    /// Verify against the PEM bundle at this path, in addition to the system roots.
    CaBundle(PathBuf),
}

impl From<bool> for TlsVerify {
    fn from(verify: bool) -> Self {
        if verify {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

impl From<PathBuf> for TlsVerify {
    fn from(path: PathBuf) -> Self {
        Self::CaBundle(path)
    }
}

impl From<&Path> for TlsVerify {
    fn from(path: &Path) -> Self {
        Self::CaBundle(path.to_path_buf())
    }
}

impl From<&str> for TlsVerify {
    fn from(path: &str) -> Self {
        Self::CaBundle(PathBuf::from(path))
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Sent as-is.
    Raw(Bytes),
    /// Serialized as JSON.
    Json(Value),
}

/// A file opened by [`ApiRequest::add_file`], sent as a multipart part.
///
/// The handle is closed when the attachment is dropped, whether or not the
/// request was sent.
#[derive(Debug)]
pub struct Attachment {
    /// Form field name.
    pub field: String,
    /// Path the file was opened from.
    pub path: PathBuf,
    /// Open handle.
    pub file: File,
}

impl Attachment {
    /// File name sent in the part's `Content-Disposition`.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.field.clone())
    }
}

/// A fully assembled request, ready for a [`Transport`].
#[derive(Debug)]
pub struct PreparedRequest {
    /// HTTP method.
    pub method: Method,
    /// Base URL with the path (or literal query string) appended.
    pub url: String,
    /// Query parameters, including the automation marker.
    pub params: Vec<(String, String)>,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Raw or JSON payload.
    pub body: Option<Body>,
    /// Multipart file parts.
    pub files: Vec<Attachment>,
    /// Certificate verification mode.
    pub verify: TlsVerify,
    /// Proxy URL per scheme (`http`, `https`, `all`).
    pub proxies: Vec<(String, String)>,
    /// Whether redirects are followed.
    pub follow_redirects: bool,
    /// Exchange timeout.
    pub timeout: Duration,
}

/// Builder for one HTTP exchange.
///
/// Every configuration method consumes and returns the builder, so a request
/// reads as one chain ending in [`send`](Self::send).
///
/// # Example
///
/// ```no_run
/// use assay_http::{ApiRequest, ReqwestTransport};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let response = ApiRequest::get("https://api.example.com/")
///     .add_path("pxp/iot/Device/jwtGenerate.json")
///     .add_param("info", "secret")
///     .is_verify(false)
///     .send(&ReqwestTransport::new())?;
///
/// response.assert_status(200)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use]
pub struct ApiRequest {
    method: Method,
    url: String,
    path: String,
    params: IndexMap<String, String>,
    url_params: Vec<String>,
    headers: IndexMap<String, String>,
    body: Option<Body>,
    files: Vec<Attachment>,
    verify: TlsVerify,
    proxies: IndexMap<String, String>,
    follow_redirects: bool,
    timeout: Duration,
    error: Option<RequestError>,
}

impl ApiRequest {
    /// Creates a request for `method` against `url` (host or full base URL).
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            path: String::new(),
            params: IndexMap::new(),
            url_params: Vec::new(),
            headers: IndexMap::new(),
            body: None,
            files: Vec::new(),
            verify: TlsVerify::Enabled,
            proxies: IndexMap::new(),
            follow_redirects: true,
            timeout: DEFAULT_TIMEOUT,
            error: None,
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Creates a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    /// Creates a DELETE request.
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Sets the `Authorization` header.
    pub fn set_token(self, token: impl ParamValue) -> Self {
        self.add_header("Authorization", token)
    }

    /// Sets a header, replacing any previous value for the same name.
    pub fn add_header(mut self, key: impl Into<String>, value: impl ParamValue) -> Self {
        if let Some(value) = value.into_param() {
            self.headers.insert(key.into(), value);
        }
        self
    }

    /// Sets the `Content-Type` header.
    ///
    /// Accepts a [`ContentType`](assay_core::ContentType), any string, or an
    /// `Option` of either.
    pub fn set_content_type(mut self, content_type: impl ParamValue) -> Self {
        if let Some(value) = content_type.into_param() {
            self.headers.insert("Content-Type".to_string(), value);
        }
        self
    }

    /// Appends `/segment` to the request path.
    pub fn add_path(mut self, segment: impl fmt::Display) -> Self {
        self.path.push('/');
        self.path.push_str(&segment.to_string());
        self
    }

    /// Sets a query parameter, replacing any previous value for the same key.
    pub fn add_param(mut self, key: impl Into<String>, value: impl ParamValue) -> Self {
        if let Some(value) = value.into_param() {
            self.params.insert(key.into(), value);
        }
        self
    }

    /// Sets a multi-value query parameter, sent as a comma-joined list.
    ///
    /// Nothing is set when no value is present.
    pub fn add_params<I>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ParamValue,
    {
        let values: Vec<String> = values
            .into_iter()
            .filter_map(ParamValue::into_param)
            .collect();
        if !values.is_empty() {
            self.params.insert(key.into(), values.join(","));
        }
        self
    }

    /// Appends literal `key=value` tokens to the URL, one per value.
    ///
    /// This is the way to send a repeated key (`id=1&id=2`). The tokens replace
    /// the accumulated path when the request is sent.
    pub fn add_params_to_url<I>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ParamValue,
    {
        for value in values.into_iter().filter_map(ParamValue::into_param) {
            self.url_params.push(format!("{key}={value}"));
        }
        self
    }

    /// Opens `path` and attaches it as the multipart field `field`.
    ///
    /// Files are appended, never replaced.
    pub fn add_file(mut self, field: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match File::open(&path) {
            Ok(file) => self.files.push(Attachment {
                field: field.into(),
                path,
                file,
            }),
            Err(source) => self.fail(RequestError::Attachment { path, source }),
        }
        self
    }

    /// Sets the body, detecting its kind.
    ///
    /// - a string holding a JSON document is sent as that JSON document
    /// - any other string is sent raw
    /// - anything else is serialized to JSON
    /// - `null` (for example `None`) leaves the body untouched
    pub fn set_body<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(Value::Null) => {}
            Ok(Value::String(text)) => {
                self.body = Some(match serde_json::from_str::<Value>(&text) {
                    Ok(json) => Body::Json(json),
                    Err(_) => Body::Raw(Bytes::from(text)),
                });
            }
            Ok(json) => self.body = Some(Body::Json(json)),
            Err(e) => self.fail(RequestError::Serialize(e)),
        }
        self
    }

    /// Sets a raw body without any detection.
    pub fn set_raw_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    /// Sets a JSON body. `null` leaves the body untouched.
    pub fn set_json<T: Serialize + ?Sized>(mut self, json: &T) -> Self {
        match serde_json::to_value(json) {
            Ok(Value::Null) => {}
            Ok(value) => self.body = Some(Body::Json(value)),
            Err(e) => self.fail(RequestError::Serialize(e)),
        }
        self
    }

    /// Sets certificate verification: a `bool`, or a CA bundle path.
    pub fn is_verify(mut self, verify: impl Into<TlsVerify>) -> Self {
        self.verify = verify.into();
        self
    }

    /// Routes `scheme` (`http`, `https` or `all`) through `proxy`.
    pub fn add_proxy(mut self, scheme: impl Into<String>, proxy: impl Into<String>) -> Self {
        self.proxies.insert(scheme.into(), proxy.into());
        self
    }

    /// Sets whether redirects are followed. Blocking them exposes in-progress statuses.
    pub fn is_redirect(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Overrides [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn fail(&mut self, error: RequestError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Assembles the final URL and parameters without sending.
    ///
    /// Returns the first error recorded by a builder method, if any.
    pub fn prepare(self) -> Result<PreparedRequest, RequestError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.files.is_empty() && self.body.is_some() {
            return Err(RequestError::Configuration(
                "a request cannot carry both file attachments and a body".to_string(),
            ));
        }

        let mut path = self.path;
        if !self.url_params.is_empty() {
            if !path.is_empty() {
                tracing::warn!(
                    path = %path,
                    "literal URL parameters replace the accumulated path"
                );
            }
            path = format!("?{}", self.url_params.join("&"));
        }

        let mut url = self.url;
        if url.ends_with('/') {
            url.pop();
        }
        url.push_str(&path);

        let mut params = self.params;
        params.insert(
            AUTOMATION_MARKER.0.to_string(),
            AUTOMATION_MARKER.1.to_string(),
        );

        Ok(PreparedRequest {
            method: self.method,
            url,
            params: params.into_iter().collect(),
            headers: self.headers.into_iter().collect(),
            body: self.body,
            files: self.files,
            verify: self.verify,
            proxies: self.proxies.into_iter().collect(),
            follow_redirects: self.follow_redirects,
            timeout: self.timeout,
        })
    }

    /// Sends the request and wraps the response.
    ///
    /// Performs exactly one exchange. Transport failures are returned
    /// unchanged inside [`RequestError::Transport`].
    pub fn send<T: Transport + ?Sized>(self, transport: &T) -> Result<ApiResponse, RequestError> {
        let prepared = self.prepare()?;

        trace::log_request(&prepared);
        let started = Instant::now();
        let raw = transport.execute(prepared)?;
        tracing::info!(
            "=== time cost:       {:.3}",
            started.elapsed().as_secs_f64() * 1000.0
        );

        let response = ApiResponse::from_raw(raw);
        trace::log_response(&response);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_core::ContentType;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_constructors() {
        assert_eq!(ApiRequest::get("h").prepare().unwrap().method, Method::Get);
        assert_eq!(ApiRequest::post("h").prepare().unwrap().method, Method::Post);
        assert_eq!(ApiRequest::put("h").prepare().unwrap().method, Method::Put);
        assert_eq!(
            ApiRequest::delete("h").prepare().unwrap().method,
            Method::Delete
        );
    }

    #[test]
    fn test_path_and_marker() {
        let prepared = ApiRequest::get("http://h/")
            .add_path("x")
            .add_param("k", "v")
            .prepare()
            .unwrap();

        assert_eq!(prepared.url, "http://h/x");
        assert_eq!(
            prepared.params,
            vec![
                ("k".to_string(), "v".to_string()),
                ("test".to_string(), "automation".to_string())
            ]
        );
    }

    #[test]
    fn test_multiple_path_segments() {
        let prepared = ApiRequest::get("http://h")
            .add_path("pxp")
            .add_path("iot")
            .add_path(42)
            .prepare()
            .unwrap();
        assert_eq!(prepared.url, "http://h/pxp/iot/42");
    }

    #[test]
    fn test_only_one_trailing_slash_is_stripped() {
        let prepared = ApiRequest::get("http://h//").add_path("x").prepare().unwrap();
        assert_eq!(prepared.url, "http://h//x");
    }

    #[test]
    fn test_marker_overrides_user_param() {
        let prepared = ApiRequest::get("http://h")
            .add_param("test", "manual")
            .prepare()
            .unwrap();
        assert_eq!(
            prepared.params,
            vec![("test".to_string(), "automation".to_string())]
        );
    }

    #[test]
    fn test_absent_values_are_skipped() {
        let prepared = ApiRequest::get("http://h")
            .add_param("a", None::<&str>)
            .add_header("X-Trace", None::<String>)
            .set_token(None::<&str>)
            .set_body(&None::<String>)
            .set_json(&None::<i32>)
            .prepare()
            .unwrap();

        assert_eq!(prepared.params.len(), 1);
        assert!(prepared.headers.is_empty());
        assert!(prepared.body.is_none());
    }

    #[test]
    fn test_param_last_write_wins() {
        let prepared = ApiRequest::get("http://h")
            .add_param("page", 1)
            .add_param("page", 2)
            .prepare()
            .unwrap();
        assert_eq!(prepared.params[0], ("page".to_string(), "2".to_string()));
    }

    #[test]
    fn test_add_params_joins_values() {
        let prepared = ApiRequest::get("http://h")
            .add_params("ids", ["a", "b", "c"])
            .prepare()
            .unwrap();
        assert_eq!(prepared.params[0], ("ids".to_string(), "a,b,c".to_string()));
    }

    #[test]
    fn test_add_params_without_values_is_noop() {
        let prepared = ApiRequest::get("http://h")
            .add_params("ids", None::<&str>)
            .add_params("tags", Vec::<String>::new())
            .add_params("pages", [None::<u32>, None])
            .prepare()
            .unwrap();
        assert_eq!(
            prepared.params,
            vec![("test".to_string(), "automation".to_string())]
        );

        let prepared = ApiRequest::get("http://h")
            .add_params("ids", [Some("a"), None, Some("c")])
            .prepare()
            .unwrap();
        assert_eq!(prepared.params[0], ("ids".to_string(), "a,c".to_string()));
    }

    #[test]
    fn test_absent_content_type_is_skipped() {
        let prepared = ApiRequest::post("http://h")
            .set_content_type(None::<ContentType>)
            .prepare()
            .unwrap();
        assert!(prepared.headers.is_empty());

        let prepared = ApiRequest::post("http://h")
            .set_content_type(Some(ContentType::ApplicationXml))
            .prepare()
            .unwrap();
        assert_eq!(
            prepared.headers,
            vec![("Content-Type".to_string(), "application/xml".to_string())]
        );
    }

    #[test]
    fn test_url_params_replace_path() {
        let prepared = ApiRequest::get("http://h/")
            .add_path("ignored")
            .add_params_to_url("id", ["1", "2"])
            .prepare()
            .unwrap();
        assert_eq!(prepared.url, "http://h?id=1&id=2");
    }

    #[test]
    fn test_headers() {
        let prepared = ApiRequest::get("http://h")
            .add_header("idToken", "abc")
            .set_token("Bearer xyz")
            .set_content_type(ContentType::TextPlain)
            .prepare()
            .unwrap();
        assert_eq!(
            prepared.headers,
            vec![
                ("idToken".to_string(), "abc".to_string()),
                ("Authorization".to_string(), "Bearer xyz".to_string()),
                ("Content-Type".to_string(), "text/plain".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_body_detects_json_string() {
        let prepared = ApiRequest::post("http://h")
            .set_body(r#"{"name": "Alice"}"#)
            .prepare()
            .unwrap();
        assert_eq!(prepared.body, Some(Body::Json(json!({"name": "Alice"}))));
    }

    #[test]
    fn test_set_body_plain_string_is_raw() {
        let prepared = ApiRequest::post("http://h")
            .set_body("plain text")
            .prepare()
            .unwrap();
        assert_eq!(prepared.body, Some(Body::Raw(Bytes::from("plain text"))));
    }

    #[test]
    fn test_set_body_serializes_structs() {
        #[derive(Serialize)]
        struct Login {
            user: &'static str,
            remember: bool,
        }

        let prepared = ApiRequest::post("http://h")
            .set_body(&Login {
                user: "alice",
                remember: true,
            })
            .prepare()
            .unwrap();
        assert_eq!(
            prepared.body,
            Some(Body::Json(json!({"user": "alice", "remember": true})))
        );
    }

    #[test]
    fn test_json_replaces_raw_body() {
        let prepared = ApiRequest::post("http://h")
            .set_raw_body("raw")
            .set_json(&json!([1, 2]))
            .prepare()
            .unwrap();
        assert_eq!(prepared.body, Some(Body::Json(json!([1, 2]))));
    }

    #[test]
    fn test_transport_settings() {
        let prepared = ApiRequest::get("http://h")
            .is_verify("/etc/ssl/ca.pem")
            .add_proxy("https", "http://proxy:3128")
            .is_redirect(false)
            .timeout(Duration::from_secs(5))
            .prepare()
            .unwrap();
        assert_eq!(prepared.verify, TlsVerify::CaBundle("/etc/ssl/ca.pem".into()));
        assert_eq!(
            prepared.proxies,
            vec![("https".to_string(), "http://proxy:3128".to_string())]
        );
        assert!(!prepared.follow_redirects);
        assert_eq!(prepared.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_defaults() {
        let prepared = ApiRequest::get("http://h").prepare().unwrap();
        assert_eq!(prepared.verify, TlsVerify::Enabled);
        assert!(prepared.follow_redirects);
        assert_eq!(prepared.timeout, DEFAULT_TIMEOUT);
        assert!(prepared.proxies.is_empty());
    }

    #[test]
    fn test_add_file_appends() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        writeln!(first, "one").unwrap();
        let second = tempfile::NamedTempFile::new().unwrap();

        let prepared = ApiRequest::post("http://h")
            .add_file("upload", first.path())
            .add_file("upload", second.path())
            .prepare()
            .unwrap();

        assert_eq!(prepared.files.len(), 2);
        assert_eq!(prepared.files[0].field, "upload");
        assert_eq!(prepared.files[1].path, second.path());
    }

    #[test]
    fn test_missing_file_fails_on_prepare() {
        let result = ApiRequest::post("http://h")
            .add_file("upload", "/nonexistent/file.bin")
            .prepare();
        assert!(matches!(result, Err(RequestError::Attachment { .. })));
    }

    #[test]
    fn test_files_and_body_conflict() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = ApiRequest::post("http://h")
            .add_file("upload", file.path())
            .set_json(&json!({"a": 1}))
            .prepare();
        assert!(matches!(result, Err(RequestError::Configuration(_))));
    }
}
