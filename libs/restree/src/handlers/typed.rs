use http::StatusCode;
use http::header::{ACCEPT_RANGES, CONTENT_RANGE, RANGE};

use crate::dispatch::DispatchError;
use crate::mime::MimeType;
use crate::range::{content_range, parse_range};
use crate::request::Request;
use crate::resource::Resource;
use crate::response::Response;

/// Raw body for `pattern`, or `None` to let the structured path try.
///
/// A `Range` header is only looked at when the resource serves ranges.
pub(super) fn typed_response(
    resource: &dyn Resource,
    pattern: &MimeType,
    request: &Request,
) -> Result<Option<Response>, DispatchError> {
    let Some(typed) = resource.as_typed() else {
        return Ok(None);
    };
    let ranged = resource.as_ranged();

    let range = match (ranged, request.header(RANGE)) {
        (Some(_), Some(header)) => Some(parse_range(header)?),
        _ => None,
    };

    let response = match (ranged, range) {
        (Some(ranged), Some(range)) => ranged
            .get_typed_body_range(pattern, range)?
            .map(|payload| {
                Response::typed(StatusCode::PARTIAL_CONTENT, &payload.mime, payload.body)
                    .with_header(CONTENT_RANGE, content_range(payload.range, payload.total))
            }),
        _ => typed
            .get_typed_body(pattern)?
            .map(|payload| Response::typed(StatusCode::OK, &payload.mime, payload.body)),
    };

    Ok(response.map(|resp| {
        if ranged.is_some() {
            resp.with_header(ACCEPT_RANGES, "bytes")
        } else {
            resp
        }
    }))
}
