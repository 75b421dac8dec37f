//! Blocking HTTP client that captures full exchanges

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use postcheck_core::exchange::push_header;
use postcheck_core::{Exchange, RequestSnapshot, ResponseSnapshot};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, HOST, HeaderMap, HeaderValue, USER_AGENT};

use crate::RunnerError;

const CLIENT_USER_AGENT: &str = concat!("postcheck/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::blocking::Client`.
pub struct HttpClient {
    client: reqwest::blocking::Client,
    /// Headers the client adds to every request; mirrored into snapshots.
    default_headers: HeaderMap,
}

impl HttpClient {
    /// Build a client. `None` disables the request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend or resolver cannot be initialised.
    pub fn new(timeout: Option<Duration>) -> Result<Self, RunnerError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers.clone())
            .build()
            .map_err(|e| RunnerError::Http(e.to_string()))?;
        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Send one request and capture it together with its response.
    ///
    /// The request is built before sending. Its snapshot adds the headers
    /// filled in at send time (client defaults, `host`, `content-length`)
    /// so the log shows what went out. Non-2xx statuses are not errors.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure (DNS, refused, timeout) or if the
    /// response body cannot be read.
    pub fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<Exchange, RunnerError> {
        let mut builder = self.client.request(method, url);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder
            .build()
            .map_err(|e| RunnerError::Http(e.to_string()))?;

        let body_bytes = request.body().and_then(|b| b.as_bytes());
        let request_snapshot = RequestSnapshot {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers: self.outgoing_headers(&request, body_bytes.map(<[u8]>::len)),
            body: body_bytes.map(|b| String::from_utf8_lossy(b).into_owned()),
        };

        let start = Instant::now();
        let resp = self
            .client
            .execute(request)
            .map_err(|e| RunnerError::Http(e.to_string()))?;

        let status_code = resp.status().as_u16();
        let headers = snapshot_headers(resp.headers());
        let body = resp
            .text()
            .map_err(|e| RunnerError::Http(format!("reading body: {e}")))?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(Exchange {
            request: request_snapshot,
            response: ResponseSnapshot {
                status_code,
                headers,
                body,
                latency_ms,
            },
        })
    }
}

impl HttpClient {
    /// Request headers as sent: explicit ones first, then client defaults
    /// not overridden, then the transport-level `host` and `content-length`.
    fn outgoing_headers(
        &self,
        request: &reqwest::blocking::Request,
        body_len: Option<usize>,
    ) -> BTreeMap<String, String> {
        let mut headers = request.headers().clone();
        for (name, value) in &self.default_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
        if !headers.contains_key(HOST) {
            if let Some(host) = host_header(request.url()) {
                headers.insert(HOST, host);
            }
        }
        if let Some(len) = body_len {
            if !headers.contains_key(CONTENT_LENGTH) {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
            }
        }
        snapshot_headers(&headers)
    }
}

/// `host[:port]`, with the port only when it is not the scheme default.
fn host_header(url: &reqwest::Url) -> Option<HeaderValue> {
    let host = url.host_str()?;
    let value = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    HeaderValue::from_str(&value).ok()
}

fn snapshot_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<non-ascii>");
        push_header(&mut out, name.as_str(), value);
    }
    out
}
