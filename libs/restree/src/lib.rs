#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Hypermedia REST over a tree of resources
//!
//! A [`ResourceService`] resolves request paths by descending a tree of
//! [`Resource`] nodes one segment at a time. The method is then mapped onto the
//! capabilities the target (or its parent) exposes, and the response is
//! negotiated by MIME type: typed bodies are served as-is, structured bodies
//! are decorated with hyperlinks, paginated and encoded by a [`ResponseWriter`].
//!
//! ```ignore
//! let root = Directory::new()
//!     .with_child("things", Arc::new(MemoryCollection::new()));
//! let app = ResourceService::new(Arc::new(root)).into_router();
//! ```

pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod links;
pub mod memory;
pub mod middleware;
pub mod mime;
pub mod range;
pub mod request;
pub mod resource;
pub mod response;
pub mod service;
pub mod writers;

pub use config::ServeConfig;
pub use dispatch::{DispatchError, dispatch};
pub use links::{Link, LinkParams, hateoas};
pub use memory::{Blob, Directory, JsonTree, MemoryCollection, read_json_body};
pub use mime::{MimeType, parse_accept};
pub use request::Request;
pub use resource::{
    ByteRange, Collection, Creatable, Deletable, Navigable, RangedBody, RangedPayload, Resource,
    ResourceRef, Storable, StructuredBody, TypedBody, TypedPayload,
};
pub use response::Response;
pub use service::ResourceService;
pub use writers::{DEFAULT_WRITERS, ResponseWriter, WriteError};

pub use restree_errors::{Problem, Reason, ResourceError, RestError, RestErrorKind};
pub use restree_query::{ChildQuery, Filter, Ordering, QueryLimits};
