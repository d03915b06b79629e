//! formguard - a strict, asynchronous schema-validation engine for untyped
//! records
//!
//! A declarative [`FormSchema`] describes the shape and constraints of one
//! record; [`validate_data`] checks untyped input against it, applying
//! sanitization and default substitution, and produces either a validated
//! record or a per-field error map.
//!
//! ```ignore
//! use formguard::{validate_data, FieldSchema, FormSchema};
//! use serde_json::json;
//!
//! let schema = FormSchema::new()
//!     .field("age", FieldSchema::integer().integral().min(0.0).max(120.0).required());
//! let input = json!({"age": 150}).as_object().cloned().unwrap();
//! let report = validate_data(&schema, &input).await;
//! assert!(!report.success);
//! ```

pub mod builder;
pub mod patterns;
pub mod schema;
pub mod validate;
pub mod wizard;

pub use schema::{
    ErrorCode, ErrorKind, FieldError, FieldSchema, FieldType, FormSchema, ValidationReport,
    WhenClause,
};
pub use validate::{parse, safe_parse, validate_data, ParseError};
