//! Schema type definitions
//!
//! Supported type families:
//! - string-like: string, email, password, url, uuid, textarea, tel,
//!   select, radio, checkbox, color
//! - numeric: number, integer, float
//! - boolean
//! - temporal: date, datetime-local, date-only, time-only, month-only,
//!   week-only
//! - composite: object (nested form schema), array, tuple, record
//! - enum, union, literal
//! - null / custom: no built-in checks, only user hooks run

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ErrorCode, FieldError};

/// Supported field type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Email,
    Password,
    Url,
    Uuid,
    Textarea,
    Tel,
    Select,
    Radio,
    Checkbox,
    Color,
    Number,
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(rename = "datetime-local")]
    DatetimeLocal,
    #[serde(rename = "date-only")]
    DateOnly,
    #[serde(rename = "time-only")]
    TimeOnly,
    #[serde(rename = "month-only")]
    MonthOnly,
    #[serde(rename = "week-only")]
    WeekOnly,
    Object,
    Array,
    Enum,
    Union,
    Literal,
    Tuple,
    Record,
    Null,
    Custom,
}

impl FieldType {
    /// Returns the type name used in error messages and serialized schemas.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Url => "url",
            FieldType::Uuid => "uuid",
            FieldType::Textarea => "textarea",
            FieldType::Tel => "tel",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Color => "color",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DatetimeLocal => "datetime-local",
            FieldType::DateOnly => "date-only",
            FieldType::TimeOnly => "time-only",
            FieldType::MonthOnly => "month-only",
            FieldType::WeekOnly => "week-only",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Enum => "enum",
            FieldType::Union => "union",
            FieldType::Literal => "literal",
            FieldType::Tuple => "tuple",
            FieldType::Record => "record",
            FieldType::Null => "null",
            FieldType::Custom => "custom",
        }
    }

    /// True for tags validated by the string pipeline.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::Email
                | FieldType::Password
                | FieldType::Url
                | FieldType::Uuid
                | FieldType::Textarea
                | FieldType::Tel
                | FieldType::Select
                | FieldType::Radio
                | FieldType::Checkbox
                | FieldType::Color
        )
    }

    /// True for tags validated by the numeric pipeline.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Integer | FieldType::Float)
    }

    /// True for tags validated by the temporal pipeline.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            FieldType::Date
                | FieldType::DatetimeLocal
                | FieldType::DateOnly
                | FieldType::TimeOnly
                | FieldType::MonthOnly
                | FieldType::WeekOnly
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Value transform applied before any check runs.
#[derive(Clone)]
pub struct Sanitizer(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Sanitizer {
    pub fn new(transform: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(transform))
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sanitizer(..)")
    }
}

/// Synchronous user validator. Runs after all declarative checks pass;
/// receives the normalized value and the working record. A returned
/// message is the failure text.
#[derive(Clone)]
pub struct CustomValidator(
    Arc<dyn Fn(&Value, &Map<String, Value>) -> Option<String> + Send + Sync>,
);

impl CustomValidator {
    pub fn new(
        check: impl Fn(&Value, &Map<String, Value>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(check))
    }

    pub fn check(&self, value: &Value, record: &Map<String, Value>) -> Option<String> {
        (self.0)(value, record)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

/// Asynchronous user validator; same contract as [`CustomValidator`],
/// awaited last. Receives owned copies so the returned future is `'static`.
#[derive(Clone)]
pub struct AsyncValidator(
    Arc<dyn Fn(Value, Map<String, Value>) -> BoxFuture<'static, Option<String>> + Send + Sync>,
);

impl AsyncValidator {
    pub fn new(
        check: impl Fn(Value, Map<String, Value>) -> BoxFuture<'static, Option<String>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(check))
    }

    pub fn check(
        &self,
        value: Value,
        record: Map<String, Value>,
    ) -> BoxFuture<'static, Option<String>> {
        (self.0)(value, record)
    }
}

impl fmt::Debug for AsyncValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AsyncValidator(..)")
    }
}

/// Conditional clause: when the named sibling field's current value matches
/// `is`, the node's attributes are overridden by `schema` before evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhenClause {
    /// Sibling field to inspect in the working record
    pub field: String,
    /// Scalar for exact equality, or a list for membership
    pub is: Value,
    /// Override fragment merged over the base schema on match
    pub schema: Box<FieldSchema>,
}

impl WhenClause {
    /// Evaluates the condition against the working record.
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        let current = record.get(&self.field).unwrap_or(&Value::Null);
        match &self.is {
            Value::Array(options) => options.contains(current),
            scalar => current == scalar,
        }
    }
}

/// Validation rules for one value.
///
/// Every declarative attribute is optional; an attribute left `None` is not
/// enforced, and a `when` override only replaces the attributes it sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSchema {
    /// Type family tag; `None`, `null` and `custom` skip built-in checks
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    /// Absence (missing / null / empty string) is an error when true
    pub required: Option<bool>,
    /// Substituted when the input value is absent
    pub default: Option<Value>,
    /// Conditional schema override
    pub when: Option<WhenClause>,

    pub trim: Option<bool>,
    pub lowercase: Option<bool>,
    pub uppercase: Option<bool>,
    /// Arbitrary value transform, applied after the string flags
    #[serde(skip)]
    pub sanitize: Option<Sanitizer>,

    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regular-expression text the value must match
    pub pattern: Option<String>,
    /// Built-in format name (email, url, uuid, alpha, alphanumeric,
    /// password) or regular-expression text
    pub format: Option<String>,
    /// Overrides the named format's pattern when set
    pub format_regex: Option<String>,

    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Value must be exactly integral
    pub integer: Option<bool>,
    /// Value must be finite
    pub float: Option<bool>,
    pub positive: Option<bool>,
    pub negative: Option<bool>,
    pub non_positive: Option<bool>,
    pub non_negative: Option<bool>,
    pub exclusive_min: Option<f64>,
    pub exclusive_max: Option<f64>,
    /// Maximum number of decimal places
    pub precision: Option<u32>,

    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub past: Option<bool>,
    pub future: Option<bool>,

    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    /// Primitive members must be pairwise distinct
    pub unique_items: Option<bool>,
    /// Array must include this exact member
    pub contains: Option<Value>,
    /// Schema every array element is validated against
    pub element_type: Option<Box<FieldSchema>>,

    /// Allowed literal values for enum fields
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// Member schemas for union fields, tried in declaration order
    pub types: Option<Vec<FieldSchema>>,
    /// Exact value for literal fields
    pub literal: Option<Value>,
    /// Positional schemas for tuple fields; length must match exactly
    pub tuple_schemas: Option<Vec<FieldSchema>>,
    /// Schema every record value is validated against
    pub value_schema: Option<Box<FieldSchema>>,
    /// Nested form schema for object fields
    pub schema: Option<Box<FormSchema>>,

    #[serde(skip)]
    pub custom_validator: Option<CustomValidator>,
    #[serde(skip)]
    pub async_validator: Option<AsyncValidator>,

    /// Per-failure-kind message overrides, used instead of the generated
    /// default message
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub messages: HashMap<ErrorCode, String>,
}

impl FieldSchema {
    /// Creates a schema node for the given type tag.
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn integer() -> Self {
        Self::of(FieldType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    /// Object field validated against a nested form schema.
    pub fn object(schema: FormSchema) -> Self {
        let mut field = Self::of(FieldType::Object);
        field.schema = Some(Box::new(schema));
        field
    }

    /// Array field whose elements are validated against `element`.
    pub fn array(element: FieldSchema) -> Self {
        let mut field = Self::of(FieldType::Array);
        field.element_type = Some(Box::new(element));
        field
    }

    /// Enum field restricted to the given values.
    pub fn enumeration(values: Vec<Value>) -> Self {
        let mut field = Self::of(FieldType::Enum);
        field.enum_values = Some(values);
        field
    }

    /// Union field passing when any member schema passes.
    pub fn union(members: Vec<FieldSchema>) -> Self {
        let mut field = Self::of(FieldType::Union);
        field.types = Some(members);
        field
    }

    /// Literal field requiring exactly `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        let mut field = Self::of(FieldType::Literal);
        field.literal = Some(value.into());
        field
    }

    /// Tuple field with one schema per position.
    pub fn tuple(schemas: Vec<FieldSchema>) -> Self {
        let mut field = Self::of(FieldType::Tuple);
        field.tuple_schemas = Some(schemas);
        field
    }

    /// Record field whose every value is validated against `value_schema`.
    pub fn record(value_schema: FieldSchema) -> Self {
        let mut field = Self::of(FieldType::Record);
        field.value_schema = Some(Box::new(value_schema));
        field
    }

    /// Untyped field; only user hooks run.
    pub fn custom() -> Self {
        Self::of(FieldType::Custom)
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Conditional override: when `field`'s current value matches `is`,
    /// `schema`'s attributes win over this node's.
    pub fn when(mut self, field: impl Into<String>, is: impl Into<Value>, schema: FieldSchema) -> Self {
        self.when = Some(WhenClause {
            field: field.into(),
            is: is.into(),
            schema: Box::new(schema),
        });
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = Some(true);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = Some(true);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = Some(true);
        self
    }

    pub fn sanitize_with(mut self, transform: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.sanitize = Some(Sanitizer::new(transform));
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn format_regex(mut self, pattern: impl Into<String>) -> Self {
        self.format_regex = Some(pattern.into());
        self
    }

    pub fn min(mut self, bound: f64) -> Self {
        self.min = Some(bound);
        self
    }

    pub fn max(mut self, bound: f64) -> Self {
        self.max = Some(bound);
        self
    }

    pub fn integral(mut self) -> Self {
        self.integer = Some(true);
        self
    }

    pub fn finite(mut self) -> Self {
        self.float = Some(true);
        self
    }

    pub fn positive(mut self) -> Self {
        self.positive = Some(true);
        self
    }

    pub fn negative(mut self) -> Self {
        self.negative = Some(true);
        self
    }

    pub fn non_positive(mut self) -> Self {
        self.non_positive = Some(true);
        self
    }

    pub fn non_negative(mut self) -> Self {
        self.non_negative = Some(true);
        self
    }

    pub fn exclusive_min(mut self, bound: f64) -> Self {
        self.exclusive_min = Some(bound);
        self
    }

    pub fn exclusive_max(mut self, bound: f64) -> Self {
        self.exclusive_max = Some(bound);
        self
    }

    pub fn precision(mut self, places: u32) -> Self {
        self.precision = Some(places);
        self
    }

    pub fn min_date(mut self, bound: impl Into<String>) -> Self {
        self.min_date = Some(bound.into());
        self
    }

    pub fn max_date(mut self, bound: impl Into<String>) -> Self {
        self.max_date = Some(bound.into());
        self
    }

    pub fn past(mut self) -> Self {
        self.past = Some(true);
        self
    }

    pub fn future(mut self) -> Self {
        self.future = Some(true);
        self
    }

    pub fn min_items(mut self, count: usize) -> Self {
        self.min_items = Some(count);
        self
    }

    pub fn max_items(mut self, count: usize) -> Self {
        self.max_items = Some(count);
        self
    }

    pub fn unique_items(mut self) -> Self {
        self.unique_items = Some(true);
        self
    }

    pub fn contains(mut self, member: impl Into<Value>) -> Self {
        self.contains = Some(member.into());
        self
    }

    pub fn validate_with(
        mut self,
        check: impl Fn(&Value, &Map<String, Value>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.custom_validator = Some(CustomValidator::new(check));
        self
    }

    pub fn validate_async_with(
        mut self,
        check: impl Fn(Value, Map<String, Value>) -> BoxFuture<'static, Option<String>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.async_validator = Some(AsyncValidator::new(check));
        self
    }

    /// Replaces the generated default message for one failure kind.
    pub fn message(mut self, code: ErrorCode, text: impl Into<String>) -> Self {
        self.messages.insert(code, text.into());
        self
    }

    /// Shallow override merge for conditional (`when`) resolution.
    ///
    /// Attributes set on `overrides` win; everything else keeps the base
    /// value. Message overrides merge entry-wise.
    pub fn merged_with(&self, overrides: &FieldSchema) -> FieldSchema {
        let mut merged = self.clone();
        macro_rules! take {
            ($($attr:ident),* $(,)?) => {
                $(
                    if overrides.$attr.is_some() {
                        merged.$attr = overrides.$attr.clone();
                    }
                )*
            };
        }
        take!(
            field_type, required, default, when, trim, lowercase, uppercase, sanitize,
            min_length, max_length, pattern, format, format_regex, min, max, integer, float,
            positive, negative, non_positive, non_negative, exclusive_min, exclusive_max,
            precision, min_date, max_date, past, future, min_items, max_items, unique_items,
            contains, element_type, enum_values, types, literal, tuple_schemas, value_schema,
            schema, custom_validator, async_validator,
        );
        for (code, text) in &overrides.messages {
            merged.messages.insert(*code, text.clone());
        }
        merged
    }

    /// Builds a constraint failure, honoring any message override.
    pub(crate) fn failure(&self, code: ErrorCode, default_message: String) -> FieldError {
        let message = self
            .messages
            .get(&code)
            .cloned()
            .unwrap_or(default_message);
        FieldError::validation(code, message)
    }
}

/// A named, ordered collection of field schemas describing one record shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSchema {
    /// Field name to rules, in declaration (= evaluation) order
    pub fields: IndexMap<String, FieldSchema>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field; evaluation order follows insertion order.
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
