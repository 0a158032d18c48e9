//! Error types for the restree dispatcher
//!
//! This crate provides pure data types for error handling, with no dependencies
//! on HTTP frameworks. It includes:
//! - resource-level failures (`ResourceError`) reported by resource implementations
//! - REST-level failures (`RestError`) that carry an HTTP status
//! - RFC 9457 Problem Details (`Problem`) used as the wire body
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod problem;
pub mod resource;
pub mod rest;

pub use catalog::{ErrDef, status_message};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem};
pub use resource::{Reason, ResourceError};
pub use rest::{RestError, RestErrorKind};

/// Helper to attach the request path to a Problem
pub fn finalize(p: Problem, instance: &str) -> Problem {
    if instance.is_empty() {
        p
    } else {
        p.with_instance(instance)
    }
}
