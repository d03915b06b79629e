//! Record walker and result API
//!
//! `validate_data` walks a form schema's fields in declaration order over a
//! working copy of the input. A field stops at its first failing check, but
//! the walker always evaluates every declared field; there is no
//! whole-record short-circuit.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::{FieldError, FormSchema, ValidationReport};

use super::field;

/// Validates `input` against `schema`.
///
/// Builds a working copy of the input; defaults and sanitized values are
/// written into it as fields are evaluated, so later fields' conditional
/// clauses and custom validators observe the normalized record. On success
/// the report carries the working copy as `data`.
pub async fn validate_data(schema: &FormSchema, input: &Map<String, Value>) -> ValidationReport {
    let mut errors: IndexMap<String, FieldError> = IndexMap::new();
    let mut working = input.clone();

    for (name, field_schema) in &schema.fields {
        let mut value = input.get(name).cloned();
        let absent = match &value {
            None => true,
            Some(v) => field::is_absent(v),
        };
        if absent {
            if let Some(default) = &field_schema.default {
                value = Some(default.clone());
                working.insert(name.clone(), default.clone());
            }
        }
        if let Some(error) = field::evaluate_field(name, field_schema, value, &mut working).await
        {
            errors.insert(name.clone(), error);
        }
    }

    let success = errors.is_empty();
    ValidationReport {
        success,
        errors,
        data: success.then_some(working),
    }
}

/// Raised by [`parse`] when validation fails. Carries the structured error
/// map; the display form is the serialized map.
#[derive(Debug, Clone, Error)]
#[error("validation failed: {serialized}")]
pub struct ParseError {
    errors: IndexMap<String, FieldError>,
    serialized: String,
}

impl ParseError {
    fn new(errors: IndexMap<String, FieldError>) -> Self {
        let serialized = serde_json::to_string(&errors).unwrap_or_else(|_| "{}".to_string());
        Self { errors, serialized }
    }

    /// Field name to failure, in declaration order.
    pub fn errors(&self) -> &IndexMap<String, FieldError> {
        &self.errors
    }
}

/// Validates and returns the normalized record, raising on failure.
pub async fn parse(
    schema: &FormSchema,
    input: &Map<String, Value>,
) -> Result<Map<String, Value>, ParseError> {
    let report = validate_data(schema, input).await;
    if report.success {
        Ok(report.data.unwrap_or_default())
    } else {
        Err(ParseError::new(report.errors))
    }
}

/// Non-raising alias of [`validate_data`].
pub async fn safe_parse(schema: &FormSchema, input: &Map<String, Value>) -> ValidationReport {
    validate_data(schema, input).await
}
