//! Resource-level errors
//!
//! These describe failures at the "storage" level, i.e. why a lookup, store, or
//! delete failed. They never reach the boundary as-is: every reason is translated
//! to a [`RestError`] first.

use std::fmt;

use crate::rest::{RestError, RestErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reason {
    /// The input has a content type the resource cannot handle.
    WrongType,
    /// The input could not be parsed.
    Malformed,
    /// The target already exists.
    Exists,
    /// The target does not exist.
    NotExists,
    /// A requested byte range lies outside the body.
    OutOfRange,
    /// Application-defined reason without a dedicated mapping.
    Other(String),
}

impl Reason {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Reason::WrongType => "wrong_type",
            Reason::Malformed => "malformed",
            Reason::Exists => "exists",
            Reason::NotExists => "not_exists",
            Reason::OutOfRange => "out_of_range",
            Reason::Other(s) => s,
        }
    }

    /// REST kind this reason translates to.
    #[must_use]
    pub fn rest_kind(&self) -> RestErrorKind {
        match self {
            Reason::WrongType => RestErrorKind::UnsupportedMedia,
            Reason::Malformed | Reason::OutOfRange => RestErrorKind::Malformed,
            Reason::Exists => RestErrorKind::Conflict,
            Reason::NotExists => RestErrorKind::NotFound,
            Reason::Other(_) => RestErrorKind::BadRequest,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Reason {
    fn from(s: &str) -> Self {
        match s {
            "wrong_type" | "type" => Reason::WrongType,
            "malformed" => Reason::Malformed,
            "exists" => Reason::Exists,
            "not_exists" => Reason::NotExists,
            "out_of_range" => Reason::OutOfRange,
            other => Reason::Other(other.to_owned()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}: {message}")]
pub struct ResourceError {
    pub reason: Reason,
    pub message: String,
}

impl ResourceError {
    #[must_use]
    pub fn new(reason: Reason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn wrong_type(message: impl Into<String>) -> Self {
        Self::new(Reason::WrongType, message)
    }

    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(Reason::Malformed, message)
    }

    #[must_use]
    pub fn exists(message: impl Into<String>) -> Self {
        Self::new(Reason::Exists, message)
    }

    #[must_use]
    pub fn not_exists(message: impl Into<String>) -> Self {
        Self::new(Reason::NotExists, message)
    }

    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(Reason::OutOfRange, message)
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        let kind = err.reason.rest_kind();
        if err.message.is_empty() {
            RestError::new(kind)
        } else {
            RestError::with_detail(kind, err.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_map_one_to_one() {
        let cases = [
            (Reason::WrongType, RestErrorKind::UnsupportedMedia),
            (Reason::Malformed, RestErrorKind::Malformed),
            (Reason::Exists, RestErrorKind::Conflict),
            (Reason::NotExists, RestErrorKind::NotFound),
            (Reason::OutOfRange, RestErrorKind::Malformed),
        ];
        for (reason, kind) in cases {
            let rest: RestError = ResourceError::new(reason.clone(), "x").into();
            assert_eq!(rest.kind, kind, "{reason}");
        }
    }

    #[test]
    fn unmapped_reason_is_bad_request() {
        let rest: RestError = ResourceError::new(Reason::from("quota"), "over quota").into();
        assert_eq!(rest.kind, RestErrorKind::BadRequest);
        assert_eq!(rest.detail.as_deref(), Some("over quota"));
    }

    #[test]
    fn empty_message_keeps_default_detail() {
        let rest: RestError = ResourceError::not_exists("").into();
        assert_eq!(rest.detail, None);
        assert_eq!(rest.to_problem().detail, "Not Found");
    }

    #[test]
    fn reason_round_trips_through_str() {
        for reason in [
            Reason::WrongType,
            Reason::Malformed,
            Reason::Exists,
            Reason::NotExists,
            Reason::OutOfRange,
        ] {
            assert_eq!(Reason::from(reason.as_str()), reason);
        }
    }
}
