//! Minimal JSON HTTP client with safe logging for the classification service.
//!
//! - Request options: a per-request timeout
//! - Exactly one attempt per call; callers decide whether to try again
//! - Failure bodies are mined for a service-provided `detail` message
//! - Optional *raw* request/response logging via `SAMACHAR_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), samachar_http::HttpError> {
//! let client = samachar_http::HttpClient::new("http://localhost:8000")?;
//! let got: serde_json::Value = client
//!     .get_json("health", samachar_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `SAMACHAR_HTTP_RAW=1`.
//! Each request carries a UUID so the events of one call can be correlated.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub use reqwest::{StatusCode, Url};

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "SAMACHAR_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Equivalent curl invocation for reproducing a call.
fn make_curl(method: &Method, url: &Url, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    if let Some(bytes) = body {
        parts.push("-H 'content-type: application/json'".to_string());
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let s = truncate_on_char_boundary(s, RAW_MAX_BODY);
                parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Response header pairs safe to log.
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_secret_header(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

fn is_secret_header(name: &str) -> bool {
    matches!(name.to_ascii_lowercase().as_str(), "set-cookie" | "www-authenticate")
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        /// Best human-readable description of the failure, for logs.
        message: String,
        /// The service's own `detail` string, when it sent one.
        detail: Option<String>,
        request_id: String,
    },
}

impl HttpError {
    /// The service-provided `detail` message, if the failure carried one.
    ///
    /// ```
    /// use samachar_http::{HttpError, StatusCode};
    ///
    /// let err = HttpError::Api {
    ///     status: StatusCode::BAD_REQUEST,
    ///     message: "News text cannot be empty".into(),
    ///     detail: Some("News text cannot be empty".into()),
    ///     request_id: "-".into(),
    /// };
    /// assert_eq!(err.detail(), Some("News text cannot be empty"));
    /// assert_eq!(HttpError::Network("refused".into()).detail(), None);
    /// ```
    pub fn detail(&self) -> Option<&str> {
        match self {
            HttpError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an application-level failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Request Options
// ==============================

/// Per-call overrides.
///
/// ```
/// use samachar_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(RequestOpts::default().timeout.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Client rooted at `base`; relative paths are joined onto it.
    ///
    /// The base is treated as a directory: `http://host/api` and
    /// `http://host/api/` both resolve `predict` to `http://host/api/predict`.
    ///
    /// ```
    /// use samachar_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("http://localhost:8000")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.base().as_str(), "http://localhost:8000/");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        Self::with_connect_timeout(base, Duration::from_secs(5))
    }

    /// Like [`HttpClient::new`] with an explicit TCP connect timeout.
    pub fn with_connect_timeout(base: &str, connect: Duration) -> Result<Self, HttpError> {
        let mut base = Url::parse(base.trim()).map_err(|e| HttpError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(HttpError::Url(format!("not a base URL: {base}")));
        }
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        let inner = Client::builder()
            .connect_timeout(connect)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Replace the whole-request timeout (15s unless set).
    ///
    /// ```
    /// use samachar_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("http://localhost:8000")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json::<(), T>(Method::GET, path, None, opts)
            .await
    }

    /// POST a JSON body and decode a JSON reply.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body), opts)
            .await
    }

    /// POST without a body and decode a JSON reply.
    pub async fn post_empty<T>(&self, path: &str, opts: RequestOpts) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json::<(), T>(Method::POST, path, None, opts)
            .await
    }

    // ==============================
    // Request path
    // ==============================

    async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Url(e.to_string()))?;

        // request
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let mut rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout);

        // body (serialize here so the exact bytes can be logged)
        let mut request_body_bytes: Option<Vec<u8>> = None;
        if let Some(b) = body {
            let bytes = serde_json::to_vec(b).map_err(|e| HttpError::Build(e.to_string()))?;
            request_body_bytes = Some(bytes.clone());
            rb = rb
                .header(
                    reqwest::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )
                .body(bytes);
        }

        // log before sending
        let req_id = Uuid::new_v4().simple().to_string();
        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=timeout.as_millis() as u64,
            body_len=request_body_bytes.as_ref().map(Vec::len).unwrap_or(0),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, &url, request_body_bytes.as_deref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = describe_transport_error(&err);
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = describe_transport_error(&err);
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let req_hdr_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%req_hdr_id,
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let text = String::from_utf8_lossy(&bytes);
            let truncated = text.len() > RAW_MAX_BODY;
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%truncate_on_char_boundary(&text, RAW_MAX_BODY),
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snippet,
            "http.response.body_snippet"
        );

        // 2xx
        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e.to_string(),
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        // ----- Failure -----
        let detail = extract_detail(&bytes);
        let message = detail.clone().unwrap_or_else(|| {
            if snippet.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                snippet.clone()
            }
        });
        let request_id = req_hdr_id.to_string();

        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            has_detail=detail.is_some(),
            x_request_id=%request_id,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            detail,
            request_id,
        })
    }
}

// ==============================
// Helpers
// ==============================

/// Pull the service's `detail` string out of a failure body.
///
/// Only a non-empty string counts: validation errors that carry a structured
/// `detail` array are treated as having no human-readable detail.
fn extract_detail(body: &[u8]) -> Option<String> {
    let val: serde_json::Value = serde_json::from_slice(body).ok()?;
    val.get("detail")
        .and_then(|d| d.as_str())
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

fn snip_body(body: &[u8]) -> String {
    truncate_on_char_boundary(&String::from_utf8_lossy(body), SNIPPET_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderName;

    #[test]
    fn detail_must_be_a_non_empty_string() {
        assert_eq!(
            extract_detail(br#"{"detail":"text too short"}"#).as_deref(),
            Some("text too short")
        );
        assert_eq!(extract_detail(br#"{"detail":""}"#), None);
        assert_eq!(
            extract_detail(br#"{"detail":[{"loc":["body","text"],"msg":"field required"}]}"#),
            None
        );
        assert_eq!(extract_detail(b"<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn snippets_do_not_split_devanagari() {
        let body = "समाचार".repeat(200);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }

    #[test]
    fn curl_sends_only_the_json_content_type() {
        let url = Url::parse("http://localhost:8000/predict").unwrap();
        let curl = make_curl(&Method::POST, &url, Some(br#"{"text":"x"}"#));
        assert_eq!(
            curl,
            r#"curl -XPOST -H 'content-type: application/json' -d '{"text":"x"}' 'http://localhost:8000/predict'"#
        );

        let bare = make_curl(&Method::GET, &url.join("health").unwrap(), None);
        assert_eq!(bare, "curl -XGET 'http://localhost:8000/health'");
    }

    #[test]
    fn response_header_log_masks_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("set-cookie"),
            HeaderValue::from_static("session=hunter2"),
        );
        headers.insert(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc123"),
        );
        let logged = redact_headers(&headers);
        assert!(logged.contains(&("set-cookie".to_string(), "<redacted>".to_string())));
        assert!(logged.contains(&("x-request-id".to_string(), "abc123".to_string())));
    }

    #[test]
    fn base_without_trailing_slash_keeps_its_path() {
        let client = HttpClient::new("http://example.test/api").unwrap();
        assert_eq!(client.base().as_str(), "http://example.test/api/");
        assert_eq!(
            client.base().join("predict").unwrap().as_str(),
            "http://example.test/api/predict"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            HttpClient::new("mailto:desk@example.test"),
            Err(HttpError::Url(_))
        ));
    }
}
