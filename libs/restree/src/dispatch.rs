//! Recursive path resolution
//!
//! Each step moves one segment from the remaining path to the consumed path and
//! asks the current resource for the child of that name. When nothing remains,
//! method dispatch runs against the target and its parent.

use http::Method;
use restree_errors::{ResourceError, RestError};
use tracing::debug;

use crate::config::ServeConfig;
use crate::handlers;
use crate::request::Request;
use crate::resource::{Resource, ResourceRef};
use crate::response::Response;
use crate::writers::WriteError;

#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    /// Client-visible failure with a status.
    #[error(transparent)]
    Rest(#[from] RestError),

    /// Anything else; logged and answered with a bare 500.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<ResourceError> for DispatchError {
    fn from(err: ResourceError) -> Self {
        DispatchError::Rest(err.into())
    }
}

impl From<restree_query::Error> for DispatchError {
    fn from(err: restree_query::Error) -> Self {
        DispatchError::Rest(err.into())
    }
}

impl From<WriteError> for DispatchError {
    fn from(err: WriteError) -> Self {
        DispatchError::Internal(anyhow::Error::new(err).context("response writer failed"))
    }
}

/// Stand-in target for a PUT to a name its parent does not have yet.
struct Vacant;

impl Resource for Vacant {}

/// Resolve `request.remaining_path` below `resource` and run the method handler.
///
/// A segment that does not resolve is `404 Not Found` for every method except
/// PUT on the last segment. That request runs against a `Vacant` target
/// whose parent is the current resource, so the parent's `store` can create
/// the child.
///
/// # Errors
/// `Rest` for anything the client can be told about, `Internal` otherwise.
pub fn dispatch(
    resource: ResourceRef,
    parent: Option<ResourceRef>,
    request: Request,
    config: &ServeConfig,
) -> Result<Response, DispatchError> {
    let Some(name) = request.next_segment().map(str::to_owned) else {
        debug!(method = %request.method, path = ?request.consumed_path, "dispatching to target");
        return handlers::handle(&resource, parent.as_ref(), request, config);
    };

    let request = request.descend();
    let child = match resource.as_navigable() {
        Some(nav) => nav.get_child(&name)?,
        None => None,
    };

    match child {
        Some(child) => {
            debug!(segment = %name, "descending");
            dispatch(child, Some(resource), request, config)
        }
        None if request.method == Method::PUT && request.remaining_path.is_empty() => {
            debug!(segment = %name, "storing new child");
            let vacant: ResourceRef = std::sync::Arc::new(Vacant);
            handlers::handle(&vacant, Some(&resource), request, config)
        }
        None => Err(RestError::not_found().into()),
    }
}
