use jsonschema::Validator;
use schemars::schema_for;

use crate::types::class::ClassSpec;
use crate::types::config::HdrgenConfig;
use crate::types::error::{ErrorEntry, E_SCHEMA_VIOLATION};

/// Generate a JSON Schema for class files.
pub fn generate_class_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(ClassSpec)).expect("schema serialization should not fail")
}

/// Generate a JSON Schema for `hdrgen.config.json`.
pub fn generate_config_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(HdrgenConfig)).expect("schema serialization should not fail")
}

/// Validate a JSON value against a JSON Schema, returning errors in `ErrorEntry` format.
pub fn validate_against_schema(
    value: &serde_json::Value,
    schema: &serde_json::Value,
) -> Vec<ErrorEntry> {
    let compiled = match Validator::new(schema) {
        Ok(v) => v,
        Err(e) => {
            return vec![ErrorEntry::error(
                E_SCHEMA_VIOLATION,
                format!("Invalid schema: {e}"),
                "",
                "$",
            )];
        }
    };

    compiled
        .iter_errors(value)
        .map(|err| {
            let instance_path = err.instance_path.as_str();
            let path = if instance_path.is_empty() {
                "$".to_string()
            } else {
                format!("${instance_path}")
            };
            ErrorEntry::error(E_SCHEMA_VIOLATION, err.to_string(), "", &path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_schema_requires_name() {
        let schema = generate_class_schema();
        assert!(schema.is_object());
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "name"));
    }

    #[test]
    fn valid_class_passes_validation() {
        let schema = generate_class_schema();
        let class = serde_json::json!({
            "name": "Module1",
            "namespaces": ["project"],
            "bases": [{ "name": "base::BaseModule", "virtual": false }],
            "members": [{ "name": "id", "type": "int" }],
            "methods": [{
                "name": "SetName",
                "params": [{ "name": "flag", "type": { "name": "int", "stereotypes": ["const"] } }],
                "qualifiers": { "const": true }
            }]
        });

        let errors = validate_against_schema(&class, &schema);
        assert!(errors.is_empty(), "Expected no errors, got: {errors:?}");
    }

    #[test]
    fn wrong_access_value_is_reported_with_path() {
        let schema = generate_class_schema();
        let class = serde_json::json!({
            "name": "Module1",
            "members": [{ "name": "id", "type": "int", "access": "friend" }]
        });

        let errors = validate_against_schema(&class, &schema);
        assert!(!errors.is_empty());
        for err in &errors {
            assert_eq!(err.code, E_SCHEMA_VIOLATION);
            assert!(err.path.starts_with('$'), "Path should start with $: {}", err.path);
        }
        assert!(errors.iter().any(|e| e.path.contains("/members/0")));
    }

    #[test]
    fn config_schema_accepts_minimal_config() {
        let schema = generate_config_schema();
        let config = serde_json::json!({ "version": "1.0.0", "name": "modules" });
        assert!(validate_against_schema(&config, &schema).is_empty());
    }

    #[test]
    fn config_schema_rejects_missing_name() {
        let schema = generate_config_schema();
        let config = serde_json::json!({ "version": "1.0.0" });
        assert!(!validate_against_schema(&config, &schema).is_empty());
    }
}
