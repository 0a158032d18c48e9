use http::StatusCode;
use http::header::LOCATION;
use restree_errors::RestError;
use tracing::debug;

use crate::config::ServeConfig;
use crate::dispatch::DispatchError;
use crate::links::join_path;
use crate::request::Request;
use crate::resource::ResourceRef;
use crate::response::Response;

use super::write_stored;

/// Create or replace the target through its parent's `store`.
pub(super) fn put(
    parent: Option<&ResourceRef>,
    mut request: Request,
    config: &ServeConfig,
) -> Result<Response, DispatchError> {
    let (Some(parent), Some(name)) = (parent, request.name().map(str::to_owned)) else {
        return Err(RestError::not_found().into());
    };
    let storable = parent
        .as_storable()
        .ok_or_else(RestError::method_not_allowed)?;

    let mut input = request.take_input();
    let (name, body) = storable.store(&mut input, &name, &request.content_type)?;
    debug!(name = %name, "stored");

    let mut path = request.consumed_path[..request.consumed_path.len() - 1].to_vec();
    path.push(name);
    let (mime, bytes) = write_stored(&request, config, &parent.response_writers(), &path, body)?;
    Ok(Response::typed(StatusCode::OK, &mime, bytes))
}

/// Create a child with a server-chosen name; answers 201 with `Location`.
pub(super) fn post(
    resource: &ResourceRef,
    mut request: Request,
    config: &ServeConfig,
) -> Result<Response, DispatchError> {
    let creatable = resource
        .as_creatable()
        .ok_or_else(RestError::method_not_allowed)?;

    let mut input = request.take_input();
    let (name, body) = creatable.create(&mut input, &request.content_type)?;
    debug!(name = %name, "created");

    let mut path = request.consumed_path.clone();
    path.push(name);
    let (mime, bytes) = write_stored(&request, config, &resource.response_writers(), &path, body)?;
    Ok(Response::typed(StatusCode::CREATED, &mime, bytes).with_header(LOCATION, join_path(&path)))
}

/// Remove the target through its parent's `delete`; 204 on success.
pub(super) fn delete(
    parent: Option<&ResourceRef>,
    request: &Request,
) -> Result<Response, DispatchError> {
    let (Some(parent), Some(name)) = (parent, request.name()) else {
        return Err(RestError::not_found().into());
    };
    let deletable = parent
        .as_deletable()
        .ok_or_else(RestError::method_not_allowed)?;

    if deletable.delete(name)? {
        debug!(name = %name, "deleted");
        Ok(Response::new(StatusCode::NO_CONTENT))
    } else {
        Err(RestError::not_found().into())
    }
}
