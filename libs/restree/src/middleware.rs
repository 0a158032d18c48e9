//! Request transforms around dispatch
//!
//! - Method override: `_method` query parameter or `X-Method-Override` header
//! - Containment: the boundary where tagged errors and panics become responses

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use http::{HeaderName, Method};
use tracing::{error, warn};

use crate::dispatch::DispatchError;
use crate::request::Request;
use crate::response::Response;

pub const METHOD_PARAM: &str = "_method";
pub static X_METHOD_OVERRIDE: HeaderName = HeaderName::from_static("x-method-override");

/// Replace the declared method with the override, if any.
///
/// The query parameter wins over the header; empty or invalid values are ignored.
#[must_use]
pub fn method_override(mut request: Request) -> Request {
    let wanted = request
        .query
        .get(METHOD_PARAM)
        .map(String::as_str)
        .filter(|m| !m.is_empty())
        .or_else(|| request.header(&X_METHOD_OVERRIDE).filter(|m| !m.is_empty()))
        .map(str::to_ascii_uppercase);

    if let Some(wanted) = wanted {
        match Method::from_bytes(wanted.as_bytes()) {
            Ok(method) => request.method = method,
            Err(_) => warn!(method = %wanted, "ignoring invalid method override"),
        }
    }
    request
}

/// Run `f` and turn whatever it produces into a response.
///
/// REST errors become problem documents, internal errors and panics a fixed 500.
/// Never fails itself.
pub fn contain<F>(instance: &str, f: F) -> Response
where
    F: FnOnce() -> Result<Response, DispatchError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(response)) => response,
        Ok(Err(DispatchError::Rest(err))) => {
            warn!(path = %instance, status = err.status().as_u16(), error = %err, "request failed");
            Response::from_error(&err, instance)
        }
        Ok(Err(DispatchError::Internal(err))) => {
            error!(path = %instance, error = %format!("{err:#}"), "internal error");
            Response::internal_error()
        }
        Err(panic) => {
            error!(path = %instance, panic = panic_message(panic.as_ref()), "handler panicked");
            Response::internal_error()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use restree_errors::RestError;

    #[test]
    fn query_override_wins() {
        let req = Request::new(Method::POST, "/")
            .with_query(METHOD_PARAM, "delete")
            .with_header(X_METHOD_OVERRIDE.clone(), "PUT");
        assert_eq!(method_override(req).method, Method::DELETE);
    }

    #[test]
    fn header_override() {
        let req = Request::new(Method::POST, "/").with_header(X_METHOD_OVERRIDE.clone(), "PUT");
        assert_eq!(method_override(req).method, Method::PUT);
    }

    #[test]
    fn empty_override_keeps_method() {
        let req = Request::new(Method::POST, "/").with_query(METHOD_PARAM, "");
        assert_eq!(method_override(req).method, Method::POST);
    }

    #[test]
    fn rest_errors_become_problems() {
        let resp = contain("/x", || Err(RestError::method_not_allowed().into()));
        assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.json().unwrap()["instance"], "/x");
    }

    #[test]
    #[tracing_test::traced_test]
    fn internal_errors_are_hidden() {
        let resp = contain("/x", || Err(anyhow::anyhow!("db password is hunter2").into()));
        assert_eq!(resp, Response::internal_error());
        assert!(logs_contain("internal error"));
    }

    #[test]
    fn panics_are_contained() {
        let resp = contain("/x", || panic!("boom"));
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!String::from_utf8_lossy(&resp.body).contains("boom"));
    }
}
