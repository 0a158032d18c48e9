//! REST-level errors
//!
//! A `RestError` maps directly to HTTP and can thus be expressed as a status code
//! plus a reason string. Handlers return these as tagged results; the service
//! boundary is the only place that turns them into responses.

use std::fmt;

use http::StatusCode;

use crate::catalog::{self, ErrDef};
use crate::problem::Problem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestErrorKind {
    /// Generic client error; also the fallback for unmapped resource reasons.
    BadRequest,
    /// Input is not well-formed according to its declared type.
    Malformed,
    /// The requested document or resource does not exist.
    NotFound,
    /// The resource does not support the requested operation.
    MethodNotAllowed,
    /// No document matching any accepted content type can be produced.
    NotAcceptable,
    /// The operation would violate data constraints on the backend.
    Conflict,
    /// The input's content type is not understood by the resource.
    UnsupportedMedia,
}

impl RestErrorKind {
    #[must_use]
    pub fn def(self) -> &'static ErrDef {
        match self {
            RestErrorKind::BadRequest => &catalog::BAD_REQUEST,
            RestErrorKind::Malformed => &catalog::MALFORMED,
            RestErrorKind::NotFound => &catalog::NOT_FOUND,
            RestErrorKind::MethodNotAllowed => &catalog::METHOD_NOT_ALLOWED,
            RestErrorKind::NotAcceptable => &catalog::NOT_ACCEPTABLE,
            RestErrorKind::Conflict => &catalog::CONFLICT,
            RestErrorKind::UnsupportedMedia => &catalog::UNSUPPORTED_MEDIA,
        }
    }

    #[must_use]
    pub fn status(self) -> StatusCode {
        self.def().status_code()
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        self.def().title
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestError {
    pub kind: RestErrorKind,
    pub detail: Option<String>,
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.kind.title();
        write!(f, "{title}: {}", self.detail.as_deref().unwrap_or(title))
    }
}

impl std::error::Error for RestError {}

impl RestError {
    #[must_use]
    pub fn new(kind: RestErrorKind) -> Self {
        Self { kind, detail: None }
    }

    #[must_use]
    pub fn with_detail(kind: RestErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(detail.into()),
        }
    }

    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::with_detail(RestErrorKind::BadRequest, detail)
    }

    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::with_detail(RestErrorKind::Malformed, detail)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(RestErrorKind::NotFound)
    }

    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(RestErrorKind::MethodNotAllowed)
    }

    #[must_use]
    pub fn not_acceptable() -> Self {
        Self::new(RestErrorKind::NotAcceptable)
    }

    #[must_use]
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::with_detail(RestErrorKind::Conflict, detail)
    }

    #[must_use]
    pub fn unsupported_media(detail: impl Into<String>) -> Self {
        Self::with_detail(RestErrorKind::UnsupportedMedia, detail)
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Problem body for this error; the detail defaults to the kind's title.
    pub fn to_problem(&self) -> Problem {
        let detail = self.detail.as_deref().unwrap_or(self.kind.title());
        self.kind.def().as_problem(detail)
    }
}

impl From<RestErrorKind> for RestError {
    fn from(kind: RestErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<RestError> for Problem {
    fn from(err: RestError) -> Self {
        err.to_problem()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_carry_statuses() {
        let cases = [
            (RestErrorKind::BadRequest, 400),
            (RestErrorKind::Malformed, 400),
            (RestErrorKind::NotFound, 404),
            (RestErrorKind::MethodNotAllowed, 405),
            (RestErrorKind::NotAcceptable, 406),
            (RestErrorKind::Conflict, 409),
            (RestErrorKind::UnsupportedMedia, 415),
        ];
        for (kind, status) in cases {
            assert_eq!(kind.status().as_u16(), status, "{kind:?}");
        }
    }

    #[test]
    fn problem_detail_defaults_to_title() {
        let problem = RestError::not_found().to_problem();
        assert_eq!(problem.detail, "Not Found");

        let problem = RestError::malformed("invalid 'count': abc").to_problem();
        assert_eq!(problem.title, "Malformed Input");
        assert_eq!(problem.detail, "invalid 'count': abc");
    }

    #[test]
    fn display_includes_detail() {
        let err = RestError::conflict("exists");
        assert_eq!(err.to_string(), "Conflict: exists");
        assert_eq!(RestError::not_acceptable().to_string(), "Not Acceptable: Not Acceptable");
    }
}
