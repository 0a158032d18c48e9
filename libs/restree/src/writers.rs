//! Response writers: encoders from a structured body to bytes
//!
//! Lookup order is caller writers, then the resource's own, then
//! [`DEFAULT_WRITERS`]. A writer is picked when the negotiated pattern matches
//! its MIME type, comparing only the `charset` parameter.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use bytes::Bytes;
use serde_json::Value;

use crate::mime::{CHARSET, MimeType};
use crate::request::query_flag;

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("failed to encode body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

type WriteFn = dyn Fn(&Value, &BTreeMap<String, String>) -> Result<Bytes, WriteError> + Send + Sync;

#[derive(Clone)]
pub struct ResponseWriter {
    mime: MimeType,
    write: Arc<WriteFn>,
}

impl fmt::Debug for ResponseWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("mime", &self.mime.to_string())
            .finish_non_exhaustive()
    }
}

impl ResponseWriter {
    pub fn new<F>(mime: MimeType, write: F) -> Self
    where
        F: Fn(&Value, &BTreeMap<String, String>) -> Result<Bytes, WriteError> + Send + Sync + 'static,
    {
        Self {
            mime,
            write: Arc::new(write),
        }
    }

    /// JSON encoder, two-space indented when `pretty` is truthy.
    #[must_use]
    pub fn json(mime: MimeType) -> Self {
        Self::new(mime, |body, query| {
            let bytes = if query_flag(query, "pretty", false) {
                serde_json::to_vec_pretty(body)?
            } else {
                serde_json::to_vec(body)?
            };
            Ok(Bytes::from(bytes))
        })
    }

    #[must_use]
    pub fn mime(&self) -> &MimeType {
        &self.mime
    }

    /// # Errors
    /// Whatever the encoder reports.
    pub fn write(&self, body: &Value, query: &BTreeMap<String, String>) -> Result<Bytes, WriteError> {
        (self.write)(body, query)
    }

    #[must_use]
    pub fn accepts(&self, pattern: &MimeType) -> bool {
        pattern.matches(&self.mime, &[CHARSET])
    }
}

pub static DEFAULT_WRITERS: LazyLock<Vec<ResponseWriter>> = LazyLock::new(|| {
    vec![
        ResponseWriter::json(MimeType::parse("application/json;charset=utf-8")),
        ResponseWriter::json(MimeType::parse("text/json;charset=utf-8")),
    ]
});

/// First writer, across `groups` in order, that satisfies `pattern`.
#[must_use]
pub fn select_writer<'a, I>(pattern: &MimeType, groups: I) -> Option<&'a ResponseWriter>
where
    I: IntoIterator<Item = &'a [ResponseWriter]>,
{
    groups
        .into_iter()
        .flat_map(|group| group.iter())
        .find(|w| w.accepts(pattern))
}
