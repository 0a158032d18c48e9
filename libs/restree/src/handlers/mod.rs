//! Method handlers for a resolved target
//!
//! GET negotiates over the accept list, trying a typed body and then a
//! structured body for each pattern. PUT and DELETE act on the parent, POST on
//! the target itself.

mod mutation;
mod structured;
mod typed;

use std::collections::BTreeMap;

use http::Method;
use restree_errors::RestError;
use serde_json::Value;

use crate::config::ServeConfig;
use crate::dispatch::DispatchError;
use crate::links::{LinkParams, hateoas};
use crate::mime::MimeType;
use crate::request::Request;
use crate::resource::ResourceRef;
use crate::response::Response;
use crate::writers::{DEFAULT_WRITERS, ResponseWriter, select_writer};

pub use structured::structured_body;

/// # Errors
/// 405 for methods nothing handles, otherwise whatever the handler reports.
pub fn handle(
    resource: &ResourceRef,
    parent: Option<&ResourceRef>,
    request: Request,
    config: &ServeConfig,
) -> Result<Response, DispatchError> {
    match request.method {
        Method::GET => get(resource, &request, config),
        Method::PUT => mutation::put(parent, request, config),
        Method::POST => mutation::post(resource, request, config),
        Method::DELETE => mutation::delete(parent, &request),
        _ => Err(RestError::method_not_allowed().into()),
    }
}

fn get(
    resource: &ResourceRef,
    request: &Request,
    config: &ServeConfig,
) -> Result<Response, DispatchError> {
    for pattern in &request.accept {
        if let Some(resp) = typed::typed_response(resource.as_ref(), pattern, request)? {
            return Ok(resp);
        }
        if let Some(resp) = structured::structured_response(resource, pattern, request, config)? {
            return Ok(resp);
        }
    }
    Err(RestError::not_acceptable().into())
}

/// Query as seen by writers, with the configured `pretty` default filled in.
fn writer_query(request: &Request, config: &ServeConfig) -> BTreeMap<String, String> {
    let mut query = request.query.clone();
    if config.pretty {
        query.entry("pretty".to_owned()).or_insert_with(|| "1".to_owned());
    }
    query
}

/// Writer for a mutation result: the first accepted pattern any writer satisfies,
/// else the default JSON writer.
fn mutation_writer<'a>(request: &'a Request, resource_writers: &'a [ResponseWriter]) -> &'a ResponseWriter {
    request
        .accept
        .iter()
        .find_map(|pattern| {
            select_writer(
                pattern,
                [
                    request.response_writers.as_slice(),
                    resource_writers,
                    DEFAULT_WRITERS.as_slice(),
                ],
            )
        })
        .unwrap_or(&DEFAULT_WRITERS[0])
}

/// Decorate and encode a stored body at `path`.
fn write_stored(
    request: &Request,
    config: &ServeConfig,
    resource_writers: &[ResponseWriter],
    path: &[String],
    body: Value,
) -> Result<(MimeType, bytes::Bytes), DispatchError> {
    let body = if request.flag("hateoas", true) {
        Value::Object(hateoas(path, body, &LinkParams::default()))
    } else {
        body
    };
    let writer = mutation_writer(request, resource_writers);
    let bytes = writer.write(&body, &writer_query(request, config))?;
    Ok((writer.mime().clone(), bytes))
}
