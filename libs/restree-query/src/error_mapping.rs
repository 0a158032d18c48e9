//! Mapping from query errors to REST errors
//!
//! Every query error is a client mistake in the query string, so all of them
//! surface as 400 Malformed Input with the error text as detail.

use restree_errors::RestError;

use crate::Error;

impl From<Error> for RestError {
    fn from(err: Error) -> Self {
        RestError::malformed(err.to_string())
    }
}
