use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName};
use http::{HeaderValue, StatusCode};
use restree_errors::{APPLICATION_PROBLEM_JSON, RestError, status_message};
use serde_json::Value;

use crate::mime::MimeType;

/// Fixed body for failures nothing else handled.
pub const INTERNAL_ERROR_BODY: &str = r#"{"error":"internal server error"}"#;

/// Status, ordered headers and body of a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Reason phrase for the status line.
    pub reason: &'static str,
    pub headers: Vec<(HeaderName, String)>,
    pub body: Bytes,
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: status_message(status),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Body with its `Content-Type`.
    #[must_use]
    pub fn typed(status: StatusCode, mime: &MimeType, body: impl Into<Bytes>) -> Self {
        Self::new(status)
            .with_header(CONTENT_TYPE, mime.to_string())
            .with_body(body)
    }

    /// RFC 9457 body for a REST error.
    #[must_use]
    pub fn from_error(err: &RestError, instance: &str) -> Self {
        let problem = restree_errors::finalize(err.to_problem(), instance);
        let body = serde_json::to_vec(&problem).unwrap_or_else(|_| err.to_string().into_bytes());
        let mut resp = Self::new(err.status())
            .with_header(CONTENT_TYPE, APPLICATION_PROBLEM_JSON)
            .with_body(body);
        resp.reason = err.kind.title();
        resp
    }

    #[must_use]
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
            .with_header(CONTENT_TYPE, "application/json")
            .with_body(Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes()))
    }

    #[must_use]
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// `"<code> <message>"`, e.g. `"206 Partial Content"`.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status.as_u16(), self.reason)
    }

    /// Parse the body as JSON, mostly useful in tests.
    ///
    /// # Errors
    /// Returns the decode error when the body is not JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Convert into an `http` response; header values that are not valid are dropped.
    #[must_use]
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut out = http::Response::new(self.body);
        *out.status_mut() = self.status;
        let headers = out.headers_mut();
        for (name, value) in self.headers {
            match HeaderValue::from_str(&value) {
                Ok(v) => {
                    headers.append(name, v);
                }
                Err(_) => tracing::warn!(header = %name, "dropping invalid header value"),
            }
        }
        out
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(r: Response) -> Self {
        r.into_http()
    }
}
