//! The resource capability contract
//!
//! A node in the tree implements [`Resource`] and exposes each capability it
//! supports through the matching `as_*` accessor. Every accessor defaults to
//! `None`, which the dispatcher answers with 405 (404 for navigation).

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use restree_errors::ResourceError;
use restree_query::ChildQuery;
use serde_json::Value;

use crate::mime::MimeType;
use crate::writers::ResponseWriter;

pub type ResourceRef = Arc<dyn Resource>;

pub trait Resource: Send + Sync {
    fn as_navigable(&self) -> Option<&dyn Navigable> {
        None
    }

    fn as_structured(&self) -> Option<&dyn StructuredBody> {
        None
    }

    fn as_typed(&self) -> Option<&dyn TypedBody> {
        None
    }

    fn as_ranged(&self) -> Option<&dyn RangedBody> {
        None
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }

    fn as_creatable(&self) -> Option<&dyn Creatable> {
        None
    }

    fn as_storable(&self) -> Option<&dyn Storable> {
        None
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        None
    }

    /// Encoders this resource prefers over the defaults.
    fn response_writers(&self) -> Vec<ResponseWriter> {
        Vec::new()
    }
}

pub trait Navigable {
    /// `Ok(None)` when there is no child by that name.
    fn get_child(&self, name: &str) -> Result<Option<ResourceRef>, ResourceError>;
}

pub trait StructuredBody {
    /// JSON-like body; `digest` asks for the short form used inside listings.
    fn get_structured_body(&self, digest: bool) -> Result<Value, ResourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedPayload {
    pub mime: MimeType,
    pub body: Bytes,
}

pub trait TypedBody {
    /// Raw body for an accepted pattern, `Ok(None)` when the pattern cannot be served.
    fn get_typed_body(&self, pattern: &MimeType) -> Result<Option<TypedPayload>, ResourceError>;
}

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Clamp to a body of `total` bytes.
    ///
    /// # Errors
    /// Returns an `out_of_range` error when `start` is not inside the body.
    pub fn clamp(self, total: u64) -> Result<Self, ResourceError> {
        if self.start >= total {
            return Err(ResourceError::out_of_range(format!(
                "range start {} past end of {total} bytes",
                self.start
            )));
        }
        Ok(Self {
            start: self.start,
            end: self.end.min(total),
        })
    }

    /// Slice an in-memory body; the range must already be clamped.
    #[must_use]
    pub fn slice(&self, body: &Bytes) -> Bytes {
        let start = usize::try_from(self.start).unwrap_or(usize::MAX).min(body.len());
        let end = usize::try_from(self.end).unwrap_or(usize::MAX).min(body.len());
        body.slice(start..end.max(start))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangedPayload {
    pub mime: MimeType,
    pub body: Bytes,
    /// Range actually served, half-open.
    pub range: ByteRange,
    pub total: u64,
}

pub trait RangedBody {
    fn get_typed_body_range(
        &self,
        pattern: &MimeType,
        range: ByteRange,
    ) -> Result<Option<RangedPayload>, ResourceError>;
}

pub trait Collection {
    /// One page of children, `Ok(None)` when there is nothing to list.
    fn get_children(
        &self,
        query: &ChildQuery,
    ) -> Result<Option<Vec<(String, ResourceRef)>>, ResourceError>;
}

pub trait Creatable {
    /// Create a child from the request body; returns the assigned name and the stored body.
    fn create(
        &self,
        input: &mut dyn Read,
        content_type: &MimeType,
    ) -> Result<(String, Value), ResourceError>;
}

pub trait Storable {
    /// Create or replace the child `name`.
    fn store(
        &self,
        input: &mut dyn Read,
        name: &str,
        content_type: &MimeType,
    ) -> Result<(String, Value), ResourceError>;
}

pub trait Deletable {
    /// `Ok(false)` when there was nothing to delete.
    fn delete(&self, name: &str) -> Result<bool, ResourceError>;
}

/// Whether a resource lists children, i.e. its bodies get next/prev links.
#[must_use]
pub fn is_pageable(resource: &dyn Resource) -> bool {
    resource.as_collection().is_some()
}
