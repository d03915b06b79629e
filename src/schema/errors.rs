//! Validation error types
//!
//! Every failed rule produces exactly one `FieldError` with a stable
//! machine-readable code. Codes:
//! - required, type, minLength, maxLength, pattern, format
//! - integer, float, min, max, positive, negative, nonPositive,
//!   nonNegative, exclusiveMin, exclusiveMax, precision
//! - date, minDate, maxDate, past, future
//! - schema, minItems, maxItems, uniqueItems, contains
//! - enum, union, literal, tupleType, tupleLength, recordType
//! - custom, asyncCustom

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifies the declarative rule (or hook stage) that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    Required,
    Type,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Integer,
    Float,
    Min,
    Max,
    Positive,
    Negative,
    NonPositive,
    NonNegative,
    ExclusiveMin,
    ExclusiveMax,
    Precision,
    Date,
    MinDate,
    MaxDate,
    Past,
    Future,
    Schema,
    MinItems,
    MaxItems,
    UniqueItems,
    Contains,
    Enum,
    Union,
    Literal,
    TupleType,
    TupleLength,
    RecordType,
    Custom,
    AsyncCustom,
}

impl ErrorCode {
    /// Returns the stable string form of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Required => "required",
            ErrorCode::Type => "type",
            ErrorCode::MinLength => "minLength",
            ErrorCode::MaxLength => "maxLength",
            ErrorCode::Pattern => "pattern",
            ErrorCode::Format => "format",
            ErrorCode::Integer => "integer",
            ErrorCode::Float => "float",
            ErrorCode::Min => "min",
            ErrorCode::Max => "max",
            ErrorCode::Positive => "positive",
            ErrorCode::Negative => "negative",
            ErrorCode::NonPositive => "nonPositive",
            ErrorCode::NonNegative => "nonNegative",
            ErrorCode::ExclusiveMin => "exclusiveMin",
            ErrorCode::ExclusiveMax => "exclusiveMax",
            ErrorCode::Precision => "precision",
            ErrorCode::Date => "date",
            ErrorCode::MinDate => "minDate",
            ErrorCode::MaxDate => "maxDate",
            ErrorCode::Past => "past",
            ErrorCode::Future => "future",
            ErrorCode::Schema => "schema",
            ErrorCode::MinItems => "minItems",
            ErrorCode::MaxItems => "maxItems",
            ErrorCode::UniqueItems => "uniqueItems",
            ErrorCode::Contains => "contains",
            ErrorCode::Enum => "enum",
            ErrorCode::Union => "union",
            ErrorCode::Literal => "literal",
            ErrorCode::TupleType => "tupleType",
            ErrorCode::TupleLength => "tupleLength",
            ErrorCode::RecordType => "recordType",
            ErrorCode::Custom => "custom",
            ErrorCode::AsyncCustom => "asyncCustom",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which validation stage produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// A declared constraint failed
    Validation,
    /// A user-supplied synchronous validator failed
    CustomValidation,
    /// A user-supplied asynchronous validator failed
    AsyncValidation,
}

impl ErrorKind {
    /// Returns the stable string form of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::CustomValidation => "customValidation",
            ErrorKind::AsyncValidation => "asyncValidation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field's validation failure.
///
/// A field that recurses into nested structures surfaces only its first
/// failing element or nested error; the parent error summarizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Human-readable message (generated default or schema override)
    pub error: String,
    /// The rule that failed
    pub error_code: ErrorCode,
    /// The stage that produced the failure
    pub error_type: ErrorKind,
}

impl FieldError {
    /// A declarative-constraint failure.
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            error_code: code,
            error_type: ErrorKind::Validation,
        }
    }

    /// A synchronous custom-validator failure.
    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            error_code: ErrorCode::Custom,
            error_type: ErrorKind::CustomValidation,
        }
    }

    /// An asynchronous custom-validator failure.
    pub fn async_custom(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            error_code: ErrorCode::AsyncCustom,
            error_type: ErrorKind::AsyncValidation,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code, self.error)
    }
}

/// Outcome of validating one record against a `FormSchema`.
///
/// `data` is present only on success and reflects default substitution and
/// sanitization applied during the walk.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// True iff the error map is empty
    pub success: bool,
    /// Field name to first failure, in field declaration order
    pub errors: IndexMap<String, FieldError>,
    /// The validated, normalized record (success only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ValidationReport {
    /// Looks up the error recorded for a field, if any.
    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }
}
