//! Argument validation against a minimal JSON Schema.
//!
//! - `validate_args(schema, args)`: `args` must be an object, carry every key in
//!   `schema["required"]`, and match the primitive `type` declared for each
//!   property it carries.
//! - Used by `ToolRegistry::execute`; errors become `ToolError::ValidationFailed`.

use serde_json::Value;

use crate::error::ValidationError;

/// Validates `args` against `schema`.
///
/// Returns `Ok(())` when the schema declares nothing to check. Property types
/// other than `string`, `number`, `integer`, `boolean`, `object` and `array`
/// are not checked.
pub fn validate_args(schema: &Value, args: &Value) -> Result<(), ValidationError> {
    let Some(obj) = args.as_object() else {
        return Err(ValidationError("args must be an object".into()));
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            if !obj.contains_key(key) {
                return Err(ValidationError(format!("missing required field: {key}")));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };
    for (key, value) in obj {
        let Some(expected) = properties
            .get(key)
            .and_then(|p| p.get("type"))
            .and_then(Value::as_str)
        else {
            continue;
        };
        if !type_matches(expected, value) {
            return Err(ValidationError(format!(
                "field {key} must be of type {expected}"
            )));
        }
    }
    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {"type": "string"},
                "date": {"type": "string"}
            },
            "required": ["location", "date"]
        })
    }

    #[test]
    fn validate_args_no_required() {
        let schema = json!({"type": "object"});
        assert!(validate_args(&schema, &json!({})).is_ok());
    }

    #[test]
    fn validate_args_required_ok() {
        let args = json!({"location": "Paris", "date": "2025-06-19"});
        assert!(validate_args(&weather_schema(), &args).is_ok());
    }

    #[test]
    fn validate_args_missing_field() {
        let args = json!({"location": "Paris"});
        let e = validate_args(&weather_schema(), &args).unwrap_err();
        assert_eq!(e.0, "missing required field: date");
    }

    #[test]
    fn validate_args_not_object() {
        let e = validate_args(&weather_schema(), &json!(["Paris"])).unwrap_err();
        assert!(e.0.contains("object"));
    }

    #[test]
    fn validate_args_wrong_type() {
        let args = json!({"location": "Paris", "date": 20250619});
        let e = validate_args(&weather_schema(), &args).unwrap_err();
        assert_eq!(e.0, "field date must be of type string");
    }

    #[test]
    fn validate_args_ignores_undeclared_extra_fields() {
        let args = json!({"location": "Paris", "date": "2025-06-19", "unit": 1});
        assert!(validate_args(&weather_schema(), &args).is_ok());
    }
}
