//! In-memory resources
//!
//! Ready-made tree nodes for tests, demos and small services:
//! - [`JsonTree`]: read-only navigation over a JSON value
//! - [`MemoryCollection`]: JSON documents that can be created, replaced and deleted
//! - [`Blob`]: raw bytes of one media type, served whole or by range
//! - [`Directory`]: fixed named children

use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;
use restree_errors::ResourceError;
use restree_query::ChildQuery;
use serde_json::{Map, Value, json};

use crate::mime::{CHARSET, MimeType};
use crate::resource::{
    ByteRange, Collection, Creatable, Deletable, Navigable, RangedBody, RangedPayload, Resource,
    ResourceRef, Storable, StructuredBody, TypedBody, TypedPayload,
};

/// Read a request body declared as JSON.
///
/// # Errors
/// `wrong_type` unless the content type is `application/json`, `text/json` or
/// `application/*+json`; `malformed` when the body does not parse.
pub fn read_json_body(input: &mut dyn Read, content_type: &MimeType) -> Result<Value, ResourceError> {
    let is_json = match (content_type.major(), content_type.minor()) {
        ("application", minor) => minor == "json" || minor.ends_with("+json"),
        ("text", "json") => true,
        _ => false,
    };
    if !is_json {
        return Err(ResourceError::wrong_type(format!(
            "expected a JSON body, got {content_type}"
        )));
    }

    let mut raw = Vec::new();
    input
        .read_to_end(&mut raw)
        .map_err(|e| ResourceError::malformed(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&raw).map_err(|e| ResourceError::malformed(e.to_string()))
}

/// A JSON value seen as a tree: objects and arrays have children, everything
/// else is a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTree {
    value: Value,
}

impl JsonTree {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    #[must_use]
    pub fn shared(value: Value) -> ResourceRef {
        Arc::new(Self::new(value))
    }

    fn entries(&self) -> Vec<(String, &Value)> {
        match &self.value {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn is_container(&self) -> bool {
        matches!(self.value, Value::Object(_) | Value::Array(_))
    }
}

impl Resource for JsonTree {
    fn as_navigable(&self) -> Option<&dyn Navigable> {
        Some(self)
    }

    fn as_structured(&self) -> Option<&dyn StructuredBody> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        self.is_container().then_some(self as &dyn Collection)
    }
}

impl Navigable for JsonTree {
    fn get_child(&self, name: &str) -> Result<Option<ResourceRef>, ResourceError> {
        let child = match &self.value {
            Value::Object(map) => map.get(name),
            Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        Ok(child.map(|v| Self::shared(v.clone())))
    }
}

impl StructuredBody for JsonTree {
    /// Containers show their scalar members; nested values are listed as children.
    fn get_structured_body(&self, _digest: bool) -> Result<Value, ResourceError> {
        let body = match &self.value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_object() && !v.is_array())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            Value::Array(_) => Value::Object(Map::new()),
            scalar => scalar.clone(),
        };
        Ok(body)
    }
}

impl Collection for JsonTree {
    fn get_children(
        &self,
        query: &ChildQuery,
    ) -> Result<Option<Vec<(String, ResourceRef)>>, ResourceError> {
        let page = query.apply(self.entries(), |v| (*v).clone());
        Ok(Some(
            page.into_iter()
                .map(|(name, v)| (name, Self::shared(v.clone())))
                .collect(),
        ))
    }
}

/// JSON documents keyed by name.
///
/// Clones share the same documents. Children are snapshots; writes go through
/// the collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    docs: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(self, name: impl Into<String>, doc: Value) -> Self {
        self.docs.write().insert(name.into(), doc);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.docs.read().get(name).cloned()
    }
}

impl Resource for MemoryCollection {
    fn as_navigable(&self) -> Option<&dyn Navigable> {
        Some(self)
    }

    fn as_structured(&self) -> Option<&dyn StructuredBody> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }

    fn as_creatable(&self) -> Option<&dyn Creatable> {
        Some(self)
    }

    fn as_storable(&self) -> Option<&dyn Storable> {
        Some(self)
    }

    fn as_deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }
}

impl Navigable for MemoryCollection {
    fn get_child(&self, name: &str) -> Result<Option<ResourceRef>, ResourceError> {
        Ok(self.get(name).map(JsonTree::shared))
    }
}

impl StructuredBody for MemoryCollection {
    fn get_structured_body(&self, _digest: bool) -> Result<Value, ResourceError> {
        Ok(json!({ "count": self.len() }))
    }
}

impl Collection for MemoryCollection {
    fn get_children(
        &self,
        query: &ChildQuery,
    ) -> Result<Option<Vec<(String, ResourceRef)>>, ResourceError> {
        let docs: Vec<(String, Value)> = self
            .docs
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let page = query.apply(docs, Clone::clone);
        Ok(Some(
            page.into_iter()
                .map(|(name, doc)| (name, JsonTree::shared(doc)))
                .collect(),
        ))
    }
}

impl Creatable for MemoryCollection {
    fn create(
        &self,
        input: &mut dyn Read,
        content_type: &MimeType,
    ) -> Result<(String, Value), ResourceError> {
        let doc = read_json_body(input, content_type)?;
        let name = uuid::Uuid::new_v4().to_string();
        self.docs.write().insert(name.clone(), doc.clone());
        Ok((name, doc))
    }
}

impl Storable for MemoryCollection {
    fn store(
        &self,
        input: &mut dyn Read,
        name: &str,
        content_type: &MimeType,
    ) -> Result<(String, Value), ResourceError> {
        let doc = read_json_body(input, content_type)?;
        self.docs.write().insert(name.to_owned(), doc.clone());
        Ok((name.to_owned(), doc))
    }
}

impl Deletable for MemoryCollection {
    fn delete(&self, name: &str) -> Result<bool, ResourceError> {
        Ok(self.docs.write().remove(name).is_some())
    }
}

/// Bytes of a single media type.
#[derive(Debug, Clone)]
pub struct Blob {
    mime: MimeType,
    data: Bytes,
}

impl Blob {
    #[must_use]
    pub fn new(mime: MimeType, data: impl Into<Bytes>) -> Self {
        Self {
            mime,
            data: data.into(),
        }
    }

    fn total(&self) -> u64 {
        self.data.len() as u64
    }

    fn serves(&self, pattern: &MimeType) -> bool {
        pattern.matches(&self.mime, &[CHARSET])
    }
}

impl Resource for Blob {
    fn as_structured(&self) -> Option<&dyn StructuredBody> {
        Some(self)
    }

    fn as_typed(&self) -> Option<&dyn TypedBody> {
        Some(self)
    }

    fn as_ranged(&self) -> Option<&dyn RangedBody> {
        Some(self)
    }
}

impl StructuredBody for Blob {
    fn get_structured_body(&self, _digest: bool) -> Result<Value, ResourceError> {
        Ok(json!({
            "content_type": self.mime.to_string(),
            "size": self.total(),
        }))
    }
}

impl TypedBody for Blob {
    fn get_typed_body(&self, pattern: &MimeType) -> Result<Option<TypedPayload>, ResourceError> {
        Ok(self.serves(pattern).then(|| TypedPayload {
            mime: self.mime.clone(),
            body: self.data.clone(),
        }))
    }
}

impl RangedBody for Blob {
    fn get_typed_body_range(
        &self,
        pattern: &MimeType,
        range: ByteRange,
    ) -> Result<Option<RangedPayload>, ResourceError> {
        if !self.serves(pattern) {
            return Ok(None);
        }
        let range = range.clamp(self.total())?;
        Ok(Some(RangedPayload {
            mime: self.mime.clone(),
            body: range.slice(&self.data),
            range,
            total: self.total(),
        }))
    }
}

/// Fixed children in insertion order, with an optional body of its own.
#[derive(Clone, Default)]
pub struct Directory {
    body: Option<Value>,
    children: Vec<(String, ResourceRef)>,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a child; a later child with the same name replaces the earlier one.
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, child: ResourceRef) -> Self {
        let name = name.into();
        self.children.retain(|(n, _)| *n != name);
        self.children.push((name, child));
        self
    }
}

fn digest_view(child: &ResourceRef) -> Value {
    child
        .as_structured()
        .and_then(|s| s.get_structured_body(true).ok())
        .unwrap_or(Value::Null)
}

impl Resource for Directory {
    fn as_navigable(&self) -> Option<&dyn Navigable> {
        Some(self)
    }

    fn as_structured(&self) -> Option<&dyn StructuredBody> {
        Some(self)
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        Some(self)
    }
}

impl Navigable for Directory {
    fn get_child(&self, name: &str) -> Result<Option<ResourceRef>, ResourceError> {
        Ok(self
            .children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, child)| Arc::clone(child)))
    }
}

impl StructuredBody for Directory {
    fn get_structured_body(&self, _digest: bool) -> Result<Value, ResourceError> {
        Ok(self.body.clone().unwrap_or_else(|| Value::Object(Map::new())))
    }
}

impl Collection for Directory {
    fn get_children(
        &self,
        query: &ChildQuery,
    ) -> Result<Option<Vec<(String, ResourceRef)>>, ResourceError> {
        Ok(Some(query.apply(self.children.clone(), digest_view)))
    }
}
