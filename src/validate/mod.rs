//! Validation engine for formguard
//!
//! Two mutually recursive pieces: the field evaluator (one value against one
//! schema node) and the record walker (one record against a form schema).
//! Nested objects re-enter the walker; array/tuple/record members re-enter
//! the evaluator under synthetic names.
//!
//! # Design Principles
//!
//! - Deterministic, sequential evaluation in field declaration order
//! - Field-level short-circuit, record-level completeness
//! - One working copy per call; no shared mutable state across calls
//! - Misconfigured schema fragments warn and pass, they never raise

mod field;
mod format;
mod temporal;
mod walker;

pub use walker::{parse, safe_parse, validate_data, ParseError};
