//! # HTTP Transport
//!
//! The portal client talks to the network only through the [`Transport`]
//! trait: a GET with query parameters and a POST with a JSON body, both
//! answering with an owned [`HttpResponse`]. [`ReqwestTransport`] is the
//! production implementation, a long-lived `reqwest::blocking::Client` bound to
//! a base URL with a fixed set of default headers.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SicapError};

/// A response described as plain data.
///
/// Returned untouched to callers of the portal client; nothing in the core
/// parses or validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The numeric HTTP status code.
    pub status: u16,
    /// Response headers, names lower-cased.
    pub headers: Vec<(String, String)>,
    /// The raw body text.
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// `true` only for an exact 200, the single status the portal uses for success.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Turns anything but a 200 into [`SicapError::UnexpectedStatus`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(SicapError::UnexpectedStatus {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Minimal HTTP session contract the portal client depends on.
///
/// `path` is relative to the transport's base URL. Implementations must not
/// treat non-2xx statuses as errors; only transport failures are `Err`.
pub trait Transport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpResponse>;

    fn post_json(&self, path: &str, body: &Value) -> Result<HttpResponse>;
}

/// Blocking `reqwest` session bound to one base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Builds the session.
    ///
    /// # Arguments
    /// * `base_url` - Absolute base URL. A trailing `/` is added if missing so
    ///   that relative paths are appended rather than replacing the last segment.
    /// * `headers` - Headers sent with every request.
    /// * `timeout` - Overall per-request timeout.
    /// * `connect_timeout` - Timeout for establishing the TCP/TLS connection.
    pub fn new(
        base_url: &str,
        headers: &[(&str, &str)],
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SicapError::Config(format!("header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| SicapError::Config(format!("header value {value:?}: {e}")))?;
            header_map.insert(name, value);
        }

        let inner = Client::builder()
            .default_headers(header_map)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { inner, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpResponse> {
        let url = self.url_for(path)?;
        debug!(%url, "GET");
        let mut req = self.inner.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        into_response(req.send()?)
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<HttpResponse> {
        let url = self.url_for(path)?;
        debug!(%url, "POST");
        // The body is attached as bytes so the session's
        // `application/json;charset=UTF-8` header is the one sent.
        let payload = serde_json::to_vec(body)?;
        into_response(self.inner.post(url).body(payload).send()?)
    }
}

fn into_response(response: reqwest::blocking::Response) -> Result<HttpResponse> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.text()?;
    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
