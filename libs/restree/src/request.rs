//! The normalized request record the dispatcher works on

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Cursor, Read};

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};

use crate::mime::{MimeType, parse_accept};
use crate::writers::ResponseWriter;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Values that switch a boolean query flag off.
const FALSY: [&str; 4] = ["no", "0", "", "off"];

pub struct Request {
    pub method: Method,
    pub path: Vec<String>,
    /// Most preferred first.
    pub accept: Vec<MimeType>,
    pub content_type: MimeType,
    pub headers: HeaderMap,
    pub query: BTreeMap<String, String>,
    pub input: Option<Box<dyn Read + Send>>,
    pub consumed_path: Vec<String>,
    pub remaining_path: Vec<String>,
    pub response_writers: Vec<ResponseWriter>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("consumed_path", &self.consumed_path)
            .field("remaining_path", &self.remaining_path)
            .field("query", &self.query)
            .field("has_input", &self.input.is_some())
            .finish_non_exhaustive()
    }
}

impl Request {
    /// Request for `path` accepting anything, with an empty query.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        let path = parse_path(path);
        Self {
            method,
            remaining_path: path.clone(),
            path,
            accept: vec![MimeType::any()],
            content_type: MimeType::parse(DEFAULT_CONTENT_TYPE),
            headers: HeaderMap::new(),
            query: BTreeMap::new(),
            input: None,
            consumed_path: Vec::new(),
            response_writers: Vec::new(),
        }
    }

    /// Normalize an HTTP request.
    ///
    /// Missing `Accept` means `*/*` and missing `Content-Type` means
    /// `application/octet-stream`. Blank query values are kept.
    #[must_use]
    pub fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        let mut request = Self::new(parts.method, parts.uri.path());

        if let Some(accept) = header_str(&parts.headers, ACCEPT) {
            request.accept = parse_accept(accept);
        }
        if let Some(ct) = header_str(&parts.headers, CONTENT_TYPE) {
            request.content_type = MimeType::parse(ct);
        }
        request.query = parts.uri.query().map(parse_query).unwrap_or_default();
        request.headers = parts.headers;
        if !body.is_empty() {
            request.input = Some(Box::new(Cursor::new(body)));
        }
        request
    }

    #[must_use]
    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accept = parse_accept(accept);
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = MimeType::parse(content_type);
        self
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Unparsable header values are ignored.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: &str) -> Self {
        if let Ok(v) = HeaderValue::from_str(value) {
            self.headers.insert(name, v);
        }
        self
    }

    #[must_use]
    pub fn with_input(mut self, body: impl Into<Bytes>) -> Self {
        self.input = Some(Box::new(Cursor::new(body.into())));
        self
    }

    #[must_use]
    pub fn with_writers(mut self, writers: Vec<ResponseWriter>) -> Self {
        self.response_writers = writers;
        self
    }

    /// Move the head of the remaining path onto the consumed path.
    #[must_use]
    pub fn descend(mut self) -> Self {
        if !self.remaining_path.is_empty() {
            let head = self.remaining_path.remove(0);
            self.consumed_path.push(head);
        }
        self
    }

    #[must_use]
    pub fn next_segment(&self) -> Option<&str> {
        self.remaining_path.first().map(String::as_str)
    }

    /// Last consumed segment, i.e. the target's own name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.consumed_path.last().map(String::as_str)
    }

    #[must_use]
    pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        query_flag(&self.query, key, default)
    }

    /// Take the body stream, leaving an empty one behind.
    pub fn take_input(&mut self) -> Box<dyn Read + Send> {
        self.input
            .take()
            .unwrap_or_else(|| Box::new(std::io::empty()))
    }
}

fn header_str(headers: &HeaderMap, name: http::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Split a URL path into decoded segments, dropping one leading and one trailing slash.
#[must_use]
pub fn parse_path(path: &str) -> Vec<String> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('/')
        .map(|seg| {
            urlencoding::decode(seg).map_or_else(|_| seg.to_owned(), std::borrow::Cow::into_owned)
        })
        .collect()
}

/// Parse a query string; later duplicates win and blank values are kept.
#[must_use]
pub fn parse_query(raw: &str) -> BTreeMap<String, String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
        .unwrap_or_default()
        .into_iter()
        .collect()
}

/// Boolean query flag; `no`, `0`, `off` and the empty string are false.
#[must_use]
pub fn query_flag(query: &BTreeMap<String, String>, key: &str, default: bool) -> bool {
    query
        .get(key)
        .map_or(default, |v| !FALSY.contains(&v.trim().to_ascii_lowercase().as_str()))
}
