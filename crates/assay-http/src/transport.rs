//! The seam between request building and the network.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::redirect::Policy;
use reqwest::{Certificate, Proxy};

use crate::error::TransportError;
use crate::request::{Body, Method, PreparedRequest, TlsVerify};

/// Performs one blocking HTTP exchange.
///
/// [`ReqwestTransport`] talks to the network; tests substitute a scripted
/// implementation such as [`StubTransport`](crate::StubTransport).
pub trait Transport {
    /// Sends `request` and returns the raw response.
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Response as received from a [`Transport`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Final URL after redirects.
    pub url: String,
    /// Body bytes.
    pub body: Bytes,
    /// Time between sending the request and receiving the full body.
    pub elapsed: Duration,
}

impl RawResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            url: String::new(),
            body: body.into(),
            elapsed: Duration::ZERO,
        }
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the final URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// [`Transport`] backed by `reqwest`'s blocking client.
///
/// A client is built per request, since TLS mode, proxies, redirect policy
/// and timeout are all per-request settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    /// Creates the transport.
    pub const fn new() -> Self {
        Self
    }

    fn client_for(request: &PreparedRequest) -> Result<Client, TransportError> {
        let mut builder = Client::builder()
            .timeout(request.timeout)
            .redirect(if request.follow_redirects {
                Policy::default()
            } else {
                Policy::none()
            });

        match &request.verify {
            TlsVerify::Enabled => {}
            TlsVerify::Disabled => builder = builder.danger_accept_invalid_certs(true),
            TlsVerify::CaBundle(path) => {
                let pem = std::fs::read(path).map_err(|source| TransportError::CaBundle {
                    path: path.clone(),
                    source,
                })?;
                builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
            }
        }

        for (scheme, url) in &request.proxies {
            let proxy = match scheme.as_str() {
                "http" => Proxy::http(url)?,
                "https" => Proxy::https(url)?,
                "all" => Proxy::all(url)?,
                other => return Err(TransportError::InvalidProxy(other.to_string())),
            };
            builder = builder.proxy(proxy);
        }

        Ok(builder.build()?)
    }

    fn attach_payload(
        builder: RequestBuilder,
        request: PreparedRequest,
    ) -> RequestBuilder {
        if !request.files.is_empty() {
            let form = request
                .files
                .into_iter()
                .fold(multipart::Form::new(), |form, attachment| {
                    let file_name = attachment.file_name();
                    let part = multipart::Part::reader(attachment.file).file_name(file_name);
                    form.part(attachment.field, part)
                });
            return builder.multipart(form);
        }

        match request.body {
            Some(Body::Json(json)) => builder.json(&json),
            Some(Body::Raw(raw)) => builder.body(raw.to_vec()),
            None => builder,
        }
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let client = Self::client_for(&request)?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = client.request(method, &request.url).query(&request.params);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let builder = Self::attach_payload(builder, request);

        let started = Instant::now();
        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response.bytes()?;

        Ok(RawResponse {
            status,
            headers,
            url,
            body,
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ApiRequest;

    #[test]
    fn test_raw_response_headers() {
        let raw = RawResponse::new(200, "ok")
            .with_header("Content-Type", "application/json")
            .with_header("bad header", "x");
        assert_eq!(raw.headers.len(), 1);
        assert_eq!(raw.headers["content-type"], "application/json");
    }

    #[test]
    fn test_unknown_proxy_scheme_is_rejected() {
        let prepared = ApiRequest::get("http://localhost")
            .add_proxy("socks", "socks5://localhost:1080")
            .prepare()
            .unwrap();
        let err = ReqwestTransport::new().execute(prepared).unwrap_err();
        assert!(matches!(err, TransportError::InvalidProxy(scheme) if scheme == "socks"));
    }

    #[test]
    fn test_missing_ca_bundle_is_reported() {
        let prepared = ApiRequest::get("https://localhost")
            .is_verify("/nonexistent/ca.pem")
            .prepare()
            .unwrap();
        let err = ReqwestTransport::new().execute(prepared).unwrap_err();
        assert!(matches!(err, TransportError::CaBundle { .. }));
    }
}
