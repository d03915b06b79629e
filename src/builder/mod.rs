//! Schema ingestion
//!
//! Accepts either a native schema tree (anything carrying a `fields` key)
//! or a JSON-Schema-like object, which is structurally checked and lowered
//! into the native `FormSchema` shape: `properties` become named fields,
//! `oneOf`/`anyOf` become unions, `const` becomes a literal, `enum` an
//! enumeration, array `items` the element schema and nested `properties` a
//! nested form schema.
//!
//! Malformed build input is a programmer error and raises; this is the one
//! surface where bad schemas are rejected instead of tolerated.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::{FieldSchema, FieldType, FormSchema};

/// Result type for schema construction.
pub type BuildResult<T> = Result<T, SchemaBuildError>;

/// Schema construction errors.
#[derive(Debug, Error)]
pub enum SchemaBuildError {
    #[error("schema input must be a JSON object")]
    NotAnObject,

    #[error("schema input must carry an object-valued 'properties' map")]
    MissingProperties,

    #[error("invalid native schema: {0}")]
    InvalidNativeSchema(#[source] serde_json::Error),
}

/// Builds a `FormSchema` from a native tree or a JSON-Schema-like object.
pub fn create_schema(input: &Value) -> BuildResult<FormSchema> {
    let object = input.as_object().ok_or(SchemaBuildError::NotAnObject)?;
    if object.contains_key("fields") {
        return serde_json::from_value(input.clone())
            .map_err(SchemaBuildError::InvalidNativeSchema);
    }
    let properties = object
        .get("properties")
        .and_then(Value::as_object)
        .ok_or(SchemaBuildError::MissingProperties)?;
    Ok(lower_properties(properties))
}

fn lower_properties(properties: &Map<String, Value>) -> FormSchema {
    let mut fields = IndexMap::new();
    for (name, property) in properties {
        fields.insert(name.clone(), lower_field(property));
    }
    FormSchema { fields }
}

fn lower_field(node: &Value) -> FieldSchema {
    let mut field = FieldSchema::default();
    let Some(object) = node.as_object() else {
        return field;
    };

    field.field_type = object.get("type").map(map_type_name);
    field.required = object.get("required").and_then(Value::as_bool);
    field.default = object.get("default").cloned();
    field.min_length = get_usize(object, "minLength");
    field.max_length = get_usize(object, "maxLength");
    field.pattern = get_string(object, "pattern");
    field.format = get_string(object, "format").map(|name| map_format_name(&name));
    field.format_regex = get_string(object, "formatRegex");
    field.min = get_f64(object, "minimum");
    field.max = get_f64(object, "maximum");
    field.exclusive_min = get_f64(object, "exclusiveMinimum");
    field.exclusive_max = get_f64(object, "exclusiveMaximum");
    field.precision = get_usize(object, "precision").map(|p| p as u32);
    field.min_items = get_usize(object, "minItems");
    field.max_items = get_usize(object, "maxItems");
    field.unique_items = object.get("uniqueItems").and_then(Value::as_bool);

    if let Some(value) = object.get("const") {
        field.field_type = Some(FieldType::Literal);
        field.literal = Some(value.clone());
    }
    if let Some(options) = object.get("enum").and_then(Value::as_array) {
        field.field_type = Some(FieldType::Enum);
        field.enum_values = Some(options.clone());
    }
    if let Some(members) = object
        .get("oneOf")
        .or_else(|| object.get("anyOf"))
        .and_then(Value::as_array)
    {
        field.field_type = Some(FieldType::Union);
        field.types = Some(members.iter().map(lower_field).collect());
    }
    if field.field_type == Some(FieldType::Array) {
        if let Some(items) = object.get("items") {
            field.element_type = Some(Box::new(lower_field(items)));
        }
    }
    if field.field_type == Some(FieldType::Object) {
        if let Some(properties) = object.get("properties").and_then(Value::as_object) {
            field.schema = Some(Box::new(lower_properties(properties)));
        }
    }

    field
}

/// Maps a JSON-Schema type name (or the first of a type list) onto a field
/// type tag; unrecognized names become `custom` (hook-only validation).
fn map_type_name(node: &Value) -> FieldType {
    let name = match node {
        Value::Array(list) => list.first().and_then(Value::as_str),
        other => other.as_str(),
    };
    match name {
        Some("string") => FieldType::String,
        Some("number") => FieldType::Number,
        Some("integer") => FieldType::Integer,
        Some("boolean") => FieldType::Boolean,
        Some("null") => FieldType::Null,
        Some("array") => FieldType::Array,
        Some("object") => FieldType::Object,
        _ => FieldType::Custom,
    }
}

/// JSON-Schema temporal format names collapse onto the core's `date`;
/// everything else passes through.
fn map_format_name(name: &str) -> String {
    match name {
        "date-time" | "date" | "time" => "date".to_string(),
        other => other.to_string(),
    }
}

fn get_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn get_usize(object: &Map<String, Value>, key: &str) -> Option<usize> {
    object.get(key).and_then(Value::as_u64).map(|n| n as usize)
}

fn get_f64(object: &Map<String, Value>, key: &str) -> Option<f64> {
    object.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_input_passes_through() {
        let schema = create_schema(&json!({
            "fields": {
                "name": {"type": "string", "required": true, "minLength": 2}
            }
        }))
        .unwrap();
        let field = schema.fields.get("name").unwrap();
        assert_eq!(field.field_type, Some(FieldType::String));
        assert_eq!(field.required, Some(true));
        assert_eq!(field.min_length, Some(2));
    }

    #[test]
    fn non_object_input_is_rejected() {
        assert!(matches!(
            create_schema(&json!("nope")),
            Err(SchemaBuildError::NotAnObject)
        ));
    }

    #[test]
    fn object_without_properties_is_rejected() {
        assert!(matches!(
            create_schema(&json!({"title": "empty"})),
            Err(SchemaBuildError::MissingProperties)
        ));
    }

    #[test]
    fn lowers_scalar_constraints() {
        let schema = create_schema(&json!({
            "properties": {
                "age": {
                    "type": "integer",
                    "required": true,
                    "minimum": 0,
                    "maximum": 120
                },
                "bio": {"type": "string", "maxLength": 280}
            }
        }))
        .unwrap();
        let age = schema.fields.get("age").unwrap();
        assert_eq!(age.field_type, Some(FieldType::Integer));
        assert_eq!(age.required, Some(true));
        assert_eq!(age.min, Some(0.0));
        assert_eq!(age.max, Some(120.0));
        let bio = schema.fields.get("bio").unwrap();
        assert_eq!(bio.max_length, Some(280));
    }

    #[test]
    fn lowers_const_to_literal_and_enum_to_enumeration() {
        let schema = create_schema(&json!({
            "properties": {
                "version": {"const": "v2"},
                "color": {"enum": ["red", "green"]}
            }
        }))
        .unwrap();
        let version = schema.fields.get("version").unwrap();
        assert_eq!(version.field_type, Some(FieldType::Literal));
        assert_eq!(version.literal, Some(json!("v2")));
        let color = schema.fields.get("color").unwrap();
        assert_eq!(color.field_type, Some(FieldType::Enum));
        assert_eq!(color.enum_values, Some(vec![json!("red"), json!("green")]));
    }

    #[test]
    fn lowers_one_of_to_union() {
        let schema = create_schema(&json!({
            "properties": {
                "id": {"oneOf": [{"type": "string"}, {"type": "integer"}]}
            }
        }))
        .unwrap();
        let id = schema.fields.get("id").unwrap();
        assert_eq!(id.field_type, Some(FieldType::Union));
        let members = id.types.as_ref().unwrap();
        assert_eq!(members[0].field_type, Some(FieldType::String));
        assert_eq!(members[1].field_type, Some(FieldType::Integer));
    }

    #[test]
    fn lowers_array_items_and_nested_properties() {
        let schema = create_schema(&json!({
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "address": {
                    "type": "object",
                    "properties": {
                        "city": {"type": "string", "required": true}
                    }
                }
            }
        }))
        .unwrap();
        let tags = schema.fields.get("tags").unwrap();
        assert_eq!(
            tags.element_type.as_ref().unwrap().field_type,
            Some(FieldType::String)
        );
        let address = schema.fields.get("address").unwrap();
        let nested = address.schema.as_ref().unwrap();
        assert_eq!(
            nested.fields.get("city").unwrap().field_type,
            Some(FieldType::String)
        );
    }

    #[test]
    fn temporal_format_names_collapse_to_date() {
        let schema = create_schema(&json!({
            "properties": {
                "created": {"type": "string", "format": "date-time"},
                "mail": {"type": "string", "format": "email"}
            }
        }))
        .unwrap();
        assert_eq!(
            schema.fields.get("created").unwrap().format.as_deref(),
            Some("date")
        );
        assert_eq!(
            schema.fields.get("mail").unwrap().format.as_deref(),
            Some("email")
        );
    }

    #[test]
    fn unknown_type_names_become_custom() {
        let schema = create_schema(&json!({
            "properties": {"blob": {"type": "binary"}}
        }))
        .unwrap();
        assert_eq!(
            schema.fields.get("blob").unwrap().field_type,
            Some(FieldType::Custom)
        );
    }

    #[tokio::test]
    async fn lowered_schema_validates_like_a_native_one() {
        let schema = create_schema(&json!({
            "properties": {
                "age": {"type": "integer", "required": true, "minimum": 0, "maximum": 120}
            }
        }))
        .unwrap();
        let input = json!({"age": 150}).as_object().cloned().unwrap();
        let report = crate::validate::validate_data(&schema, &input).await;
        assert!(!report.success);
        assert_eq!(
            report.error("age").unwrap().error_code,
            crate::schema::ErrorCode::Max
        );
    }
}
