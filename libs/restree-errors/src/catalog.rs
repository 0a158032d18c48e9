//! Static status catalog for the REST error kinds

use crate::problem::Problem;
use http::StatusCode;

/// Static error definition from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
}

impl ErrDef {
    /// HTTP status of this definition, 500 for codes `http` rejects.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert this error definition into a Problem with the given detail
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.status_code(), self.title, detail.into()).with_code(self.code)
    }
}

pub const BAD_REQUEST: ErrDef = ErrDef {
    status: 400,
    title: "Bad Request",
    code: "BAD_REQUEST",
};

pub const MALFORMED: ErrDef = ErrDef {
    status: 400,
    title: "Malformed Input",
    code: "MALFORMED",
};

pub const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Not Found",
    code: "NOT_FOUND",
};

pub const METHOD_NOT_ALLOWED: ErrDef = ErrDef {
    status: 405,
    title: "Method Not Allowed",
    code: "METHOD_NOT_ALLOWED",
};

pub const NOT_ACCEPTABLE: ErrDef = ErrDef {
    status: 406,
    title: "Not Acceptable",
    code: "NOT_ACCEPTABLE",
};

pub const CONFLICT: ErrDef = ErrDef {
    status: 409,
    title: "Conflict",
    code: "CONFLICT",
};

pub const UNSUPPORTED_MEDIA: ErrDef = ErrDef {
    status: 415,
    title: "Unsupported Media Type",
    code: "UNSUPPORTED_MEDIA_TYPE",
};

/// Reason phrase for a status code produced by the dispatcher.
///
/// Falls back to the canonical `http` reason, then to `"Unknown"`.
#[must_use]
pub fn status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        206 => "Partial Content",
        _ => status.canonical_reason().unwrap_or("Unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_def_to_problem_works() {
        let problem = NOT_FOUND.as_problem("no child named 'pear'");
        assert_eq!(problem.status, StatusCode::NOT_FOUND);
        assert_eq!(problem.title, "Not Found");
        assert_eq!(problem.detail, "no child named 'pear'");
        assert_eq!(problem.code, "NOT_FOUND");
    }

    #[test]
    fn malformed_and_bad_request_share_a_status() {
        assert_eq!(MALFORMED.status_code(), BAD_REQUEST.status_code());
        assert_ne!(MALFORMED.title, BAD_REQUEST.title);
    }

    #[test]
    fn invalid_status_falls_back_to_500() {
        let def = ErrDef {
            status: 1000,
            title: "Broken",
            code: "BROKEN",
        };
        assert_eq!(def.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_messages() {
        assert_eq!(status_message(StatusCode::PARTIAL_CONTENT), "Partial Content");
        assert_eq!(status_message(StatusCode::NOT_ACCEPTABLE), "Not Acceptable");
    }
}
