//! Schema subsystem for formguard
//!
//! A `FormSchema` is a declarative description of one record shape: a named,
//! ordered collection of `FieldSchema` nodes, each carrying a type tag,
//! constraints, sanitization flags, an optional conditional (`when`) clause
//! and optional user hooks.
//!
//! # Design Principles
//!
//! - Schemas are immutable specifications; validation never mutates them
//! - Field declaration order is semantically significant (defaults and
//!   conditional lookups observe earlier fields' normalized values)
//! - Misconfigured schema fragments degrade to diagnostics, never panics
//! - Error codes are a closed set with stable string forms

mod errors;
mod types;

pub use errors::{ErrorCode, ErrorKind, FieldError, ValidationReport};
pub use types::{
    AsyncValidator, CustomValidator, FieldSchema, FieldType, FormSchema, Sanitizer, WhenClause,
};
