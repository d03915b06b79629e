//! Field evaluator
//!
//! Validates one field's value against one schema node. Check order is
//! load-bearing and mirrors the record walker's contract:
//!
//! 1. conditional (`when`) resolution
//! 2. sanitization, then write-back into the working record
//! 3. required/absent check (absent = missing, null or empty string)
//! 4. type-family dispatch, each family an ordered pipeline
//! 5. synchronous custom validator
//! 6. asynchronous custom validator
//!
//! The first failing check wins; a field never reports more than one error.
//! Nested failures (array elements, tuple positions, record values) surface
//! under a synthetic path (`name[i]`, `name.key`) and stop the field.

use std::collections::HashSet;

use chrono::Utc;
use futures_util::future::BoxFuture;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::schema::{ErrorCode, FieldError, FieldSchema, FieldType};

use super::{format, temporal, walker};

/// Evaluates one field. `value` is `None` when the input record has no such
/// key. Writes the normalized value back into `record` before any check so
/// later fields' conditions and custom validators observe it.
pub(crate) fn evaluate_field<'a>(
    name: &'a str,
    field_schema: &'a FieldSchema,
    value: Option<Value>,
    record: &'a mut Map<String, Value>,
) -> BoxFuture<'a, Option<FieldError>> {
    Box::pin(async move {
        let resolved;
        let field_schema = match &field_schema.when {
            Some(clause) if clause.matches(record) => {
                resolved = field_schema.merged_with(&clause.schema);
                &resolved
            }
            _ => field_schema,
        };

        let value = apply_sanitizers(field_schema, value);
        if let Some(normalized) = &value {
            record.insert(name.to_string(), normalized.clone());
        }

        let required = field_schema.required.unwrap_or(false);
        let value = match value {
            Some(v) if !is_absent(&v) => v,
            _ if required => {
                return Some(
                    field_schema.failure(ErrorCode::Required, format!("{name} is required.")),
                );
            }
            _ => return None,
        };

        if let Some(kind) = field_schema.field_type {
            match kind {
                kind if kind.is_string_like() => {
                    if let Some(error) = check_string(name, field_schema, &value) {
                        return Some(error);
                    }
                }
                kind if kind.is_numeric() => {
                    if let Some(error) = check_number(name, field_schema, &value) {
                        return Some(error);
                    }
                }
                FieldType::Boolean => {
                    if !value.is_boolean() {
                        return Some(field_schema
                            .failure(ErrorCode::Type, format!("{name} must be a boolean.")));
                    }
                }
                kind if kind.is_temporal() => {
                    if let Some(error) = check_temporal(name, field_schema, &value) {
                        return Some(error);
                    }
                }
                FieldType::Object => {
                    let Some(nested) = value.as_object() else {
                        return Some(field_schema
                            .failure(ErrorCode::Type, format!("{name} must be an object.")));
                    };
                    if let Some(schema) = &field_schema.schema {
                        let report = walker::validate_data(schema, nested).await;
                        if !report.success {
                            return Some(field_schema.failure(
                                ErrorCode::Schema,
                                format!("{name} has invalid nested data."),
                            ));
                        }
                    }
                }
                FieldType::Array => {
                    let Some(items) = value.as_array().cloned() else {
                        return Some(field_schema
                            .failure(ErrorCode::Type, format!("{name} must be an array.")));
                    };
                    if let Some(error) =
                        check_array(name, field_schema, &items, record).await
                    {
                        return Some(error);
                    }
                }
                FieldType::Enum => {
                    if let Some(error) = check_enum(name, field_schema, &value) {
                        return Some(error);
                    }
                }
                FieldType::Union => {
                    if let Some(error) = check_union(name, field_schema, &value, record).await {
                        return Some(error);
                    }
                }
                FieldType::Literal => {
                    if let Some(error) = check_literal(name, field_schema, &value) {
                        return Some(error);
                    }
                }
                FieldType::Tuple => {
                    let Some(items) = value.as_array().cloned() else {
                        return Some(field_schema.failure(
                            ErrorCode::TupleType,
                            format!("{name} must be a tuple (array)."),
                        ));
                    };
                    if let Some(error) = check_tuple(name, field_schema, &items, record).await {
                        return Some(error);
                    }
                }
                FieldType::Record => {
                    let Some(entries) = value.as_object().cloned() else {
                        return Some(field_schema.failure(
                            ErrorCode::RecordType,
                            format!("{name} must be a record (object)."),
                        ));
                    };
                    if let Some(error) = check_record(name, field_schema, &entries, record).await
                    {
                        return Some(error);
                    }
                }
                // null/custom: no built-in checks, user hooks only
                _ => {}
            }
        }

        if let Some(validator) = &field_schema.custom_validator {
            if let Some(message) = validator.check(&value, record) {
                return Some(FieldError::custom(message));
            }
        }
        if let Some(validator) = &field_schema.async_validator {
            if let Some(message) = validator.check(value.clone(), record.clone()).await {
                return Some(FieldError::async_custom(message));
            }
        }

        None
    })
}

/// Absent means "no value to validate": JSON null or the empty string.
/// A missing key is handled as `None` before this is consulted.
pub(crate) fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Trim, then lowercase, then uppercase (string values only), then the
/// custom sanitize hook.
fn apply_sanitizers(field_schema: &FieldSchema, value: Option<Value>) -> Option<Value> {
    let mut value = value?;
    if let Value::String(text) = &value {
        let mut text = text.clone();
        if field_schema.trim.unwrap_or(false) {
            text = text.trim().to_string();
        }
        if field_schema.lowercase.unwrap_or(false) {
            text = text.to_lowercase();
        }
        if field_schema.uppercase.unwrap_or(false) {
            text = text.to_uppercase();
        }
        value = Value::String(text);
    }
    if let Some(hook) = &field_schema.sanitize {
        value = hook.apply(value);
    }
    Some(value)
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn check_string(name: &str, field_schema: &FieldSchema, value: &Value) -> Option<FieldError> {
    let Some(text) = value.as_str() else {
        return Some(field_schema.failure(ErrorCode::Type, format!("{name} must be a string.")));
    };
    if let Some(min) = field_schema.min_length {
        if text.chars().count() < min {
            return Some(field_schema.failure(
                ErrorCode::MinLength,
                format!("{name} must be at least {min} characters long."),
            ));
        }
    }
    if let Some(max) = field_schema.max_length {
        if text.chars().count() > max {
            return Some(field_schema.failure(
                ErrorCode::MaxLength,
                format!("{name} must be at most {max} characters long."),
            ));
        }
    }
    if let Some(pattern) = &field_schema.pattern {
        match Regex::new(pattern) {
            Ok(regex) => {
                if !regex.is_match(text) {
                    return Some(
                        field_schema.failure(ErrorCode::Pattern, format!("{name} is invalid.")),
                    );
                }
            }
            Err(error) => {
                warn!(field = name, pattern = %pattern, %error, "invalid pattern; check skipped");
            }
        }
    }
    if let Some(format_name) = &field_schema.format {
        let matched = resolve_format(name, field_schema, format_name, text);
        if matched == Some(false) {
            return Some(field_schema.failure(
                ErrorCode::Format,
                format!("{name} must match the format {format_name}."),
            ));
        }
    }
    None
}

/// Resolves the format check: an explicit override pattern wins, then the
/// built-in set, then the format text itself compiled as a pattern.
/// `None` means the check could not run (misconfigured pattern).
fn resolve_format(
    name: &str,
    field_schema: &FieldSchema,
    format_name: &str,
    text: &str,
) -> Option<bool> {
    if let Some(raw) = &field_schema.format_regex {
        return match Regex::new(raw) {
            Ok(regex) => Some(regex.is_match(text)),
            Err(error) => {
                warn!(field = name, pattern = %raw, %error, "invalid format override; check skipped");
                None
            }
        };
    }
    if let Some(matched) = format::matches_builtin(format_name, text) {
        return Some(matched);
    }
    match Regex::new(format_name) {
        Ok(regex) => Some(regex.is_match(text)),
        Err(error) => {
            warn!(field = name, format = %format_name, %error, "invalid format; check skipped");
            None
        }
    }
}

fn check_number(name: &str, field_schema: &FieldSchema, value: &Value) -> Option<FieldError> {
    let Some(number) = value.as_f64() else {
        return Some(field_schema.failure(ErrorCode::Type, format!("{name} must be a number.")));
    };
    if field_schema.integer.unwrap_or(false) && number.fract() != 0.0 {
        return Some(
            field_schema.failure(ErrorCode::Integer, format!("{name} must be an integer.")),
        );
    }
    if field_schema.float.unwrap_or(false) && !number.is_finite() {
        return Some(field_schema.failure(ErrorCode::Float, format!("{name} must be a float.")));
    }
    if let Some(min) = field_schema.min {
        if number < min {
            return Some(
                field_schema.failure(ErrorCode::Min, format!("{name} must be at least {min}.")),
            );
        }
    }
    if let Some(max) = field_schema.max {
        if number > max {
            return Some(
                field_schema.failure(ErrorCode::Max, format!("{name} must be at most {max}.")),
            );
        }
    }
    if field_schema.positive.unwrap_or(false) && number <= 0.0 {
        return Some(
            field_schema.failure(ErrorCode::Positive, format!("{name} must be positive.")),
        );
    }
    if field_schema.negative.unwrap_or(false) && number >= 0.0 {
        return Some(
            field_schema.failure(ErrorCode::Negative, format!("{name} must be negative.")),
        );
    }
    if field_schema.non_positive.unwrap_or(false) && number > 0.0 {
        return Some(field_schema.failure(
            ErrorCode::NonPositive,
            format!("{name} must be non-positive."),
        ));
    }
    if field_schema.non_negative.unwrap_or(false) && number < 0.0 {
        return Some(field_schema.failure(
            ErrorCode::NonNegative,
            format!("{name} must be non-negative."),
        ));
    }
    if let Some(bound) = field_schema.exclusive_min {
        if number <= bound {
            return Some(field_schema.failure(
                ErrorCode::ExclusiveMin,
                format!("{name} must be greater than {bound}."),
            ));
        }
    }
    if let Some(bound) = field_schema.exclusive_max {
        if number >= bound {
            return Some(field_schema.failure(
                ErrorCode::ExclusiveMax,
                format!("{name} must be less than {bound}."),
            ));
        }
    }
    if let Some(places) = field_schema.precision {
        let factor = 10f64.powi(places as i32);
        if (number * factor).round() / factor != number {
            return Some(field_schema.failure(
                ErrorCode::Precision,
                format!("{name} must have at most {places} decimal places."),
            ));
        }
    }
    None
}

fn check_temporal(name: &str, field_schema: &FieldSchema, value: &Value) -> Option<FieldError> {
    let Some(instant) = temporal::parse_instant(value) else {
        return Some(
            field_schema.failure(ErrorCode::Date, format!("{name} must be a valid date.")),
        );
    };
    if let Some(raw) = &field_schema.min_date {
        match temporal::parse_instant_text(raw) {
            Some(bound) if instant < bound => {
                return Some(field_schema.failure(
                    ErrorCode::MinDate,
                    format!("{name} must be after {raw}."),
                ));
            }
            Some(_) => {}
            None => warn!(field = name, bound = %raw, "unparseable minDate; check skipped"),
        }
    }
    if let Some(raw) = &field_schema.max_date {
        match temporal::parse_instant_text(raw) {
            Some(bound) if instant > bound => {
                return Some(field_schema.failure(
                    ErrorCode::MaxDate,
                    format!("{name} must be before {raw}."),
                ));
            }
            Some(_) => {}
            None => warn!(field = name, bound = %raw, "unparseable maxDate; check skipped"),
        }
    }
    if field_schema.past.unwrap_or(false) && instant >= Utc::now() {
        return Some(
            field_schema.failure(ErrorCode::Past, format!("{name} must be in the past.")),
        );
    }
    if field_schema.future.unwrap_or(false) && instant <= Utc::now() {
        return Some(
            field_schema.failure(ErrorCode::Future, format!("{name} must be in the future.")),
        );
    }
    None
}

async fn check_array(
    name: &str,
    field_schema: &FieldSchema,
    items: &[Value],
    record: &mut Map<String, Value>,
) -> Option<FieldError> {
    if let Some(min) = field_schema.min_items {
        if items.len() < min {
            return Some(field_schema.failure(
                ErrorCode::MinItems,
                format!("{name} must have at least {min} items."),
            ));
        }
    }
    if let Some(max) = field_schema.max_items {
        if items.len() > max {
            return Some(field_schema.failure(
                ErrorCode::MaxItems,
                format!("{name} must have at most {max} items."),
            ));
        }
    }
    if field_schema.unique_items.unwrap_or(false) && has_duplicate_primitives(items) {
        return Some(field_schema.failure(
            ErrorCode::UniqueItems,
            format!("{name} must have unique items."),
        ));
    }
    if let Some(expected) = &field_schema.contains {
        if !items.contains(expected) {
            return Some(field_schema.failure(
                ErrorCode::Contains,
                format!("{name} must contain {}.", value_label(expected)),
            ));
        }
    }
    if let Some(element) = &field_schema.element_type {
        for (index, item) in items.iter().enumerate() {
            let child = format!("{name}[{index}]");
            if let Some(error) =
                evaluate_field(&child, element, Some(item.clone()), record).await
            {
                return Some(error);
            }
        }
    }
    None
}

/// Shallow uniqueness: primitive members are keyed by type and canonical
/// text (numbers through f64 so `1` and `1.0` collide); composite members
/// never collide.
fn has_duplicate_primitives(items: &[Value]) -> bool {
    let mut seen = HashSet::new();
    for item in items {
        let key = match item {
            Value::Null => "null:".to_string(),
            Value::Bool(flag) => format!("bool:{flag}"),
            Value::Number(number) => format!("number:{}", number.as_f64().unwrap_or(f64::NAN)),
            Value::String(text) => format!("string:{text}"),
            _ => continue,
        };
        if !seen.insert(key) {
            return true;
        }
    }
    false
}

fn check_enum(name: &str, field_schema: &FieldSchema, value: &Value) -> Option<FieldError> {
    let options = field_schema.enum_values.as_deref().unwrap_or(&[]);
    if options.contains(value) {
        return None;
    }
    let listed = options
        .iter()
        .map(value_label)
        .collect::<Vec<_>>()
        .join(", ");
    Some(field_schema.failure(
        ErrorCode::Enum,
        format!("{name} must be one of {listed}."),
    ))
}

async fn check_union(
    name: &str,
    field_schema: &FieldSchema,
    value: &Value,
    record: &mut Map<String, Value>,
) -> Option<FieldError> {
    let Some(members) = &field_schema.types else {
        // Misconfigured schema: tolerated so a bad schema cannot crash the
        // caller, at the cost of under-validating this field.
        warn!(field = name, "union field has no member types; checks skipped");
        return None;
    };
    for member in members {
        if evaluate_field(name, member, Some(value.clone()), record)
            .await
            .is_none()
        {
            return None;
        }
    }
    Some(field_schema.failure(
        ErrorCode::Union,
        format!("{name} does not match any of the allowed union types."),
    ))
}

fn check_literal(name: &str, field_schema: &FieldSchema, value: &Value) -> Option<FieldError> {
    let expected = field_schema.literal.as_ref().unwrap_or(&Value::Null);
    if value == expected {
        return None;
    }
    Some(field_schema.failure(
        ErrorCode::Literal,
        format!("{name} must be literal value: {}.", value_label(expected)),
    ))
}

async fn check_tuple(
    name: &str,
    field_schema: &FieldSchema,
    items: &[Value],
    record: &mut Map<String, Value>,
) -> Option<FieldError> {
    let Some(schemas) = &field_schema.tuple_schemas else {
        return None;
    };
    if items.len() != schemas.len() {
        return Some(field_schema.failure(
            ErrorCode::TupleLength,
            format!("{name} must have exactly {} items.", schemas.len()),
        ));
    }
    for (index, (element_schema, item)) in schemas.iter().zip(items.iter()).enumerate() {
        let child = format!("{name}[{index}]");
        if let Some(error) =
            evaluate_field(&child, element_schema, Some(item.clone()), record).await
        {
            return Some(error);
        }
    }
    None
}

async fn check_record(
    name: &str,
    field_schema: &FieldSchema,
    entries: &Map<String, Value>,
    record: &mut Map<String, Value>,
) -> Option<FieldError> {
    let Some(value_schema) = &field_schema.value_schema else {
        return None;
    };
    for (key, entry) in entries {
        let child = format!("{name}.{key}");
        if let Some(error) =
            evaluate_field(&child, value_schema, Some(entry.clone()), record).await
        {
            return Some(error);
        }
    }
    None
}
