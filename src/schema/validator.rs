//! Schema validation of entity YAML files

use jsonschema::{validator_for, Validator as JsonValidator};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::core::EntityPrefix;
use crate::schema::registry::SchemaRegistry;

/// Result of validating one file
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }
}

/// A single validation problem
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// JSON-pointer-style path into the document
    pub path: String,
    pub message: String,
}

/// Schema validator with compiled schemas per entity type
pub struct Validator {
    compiled: HashMap<EntityPrefix, JsonValidator>,
}

impl Validator {
    /// Compile the embedded schemas
    pub fn new() -> Self {
        let mut compiled = HashMap::new();

        for prefix in EntityPrefix::all() {
            if let Some(schema_str) = SchemaRegistry::get(*prefix) {
                if let Ok(schema_json) = serde_json::from_str::<JsonValue>(&schema_str) {
                    if let Ok(compiled_schema) = validator_for(&schema_json) {
                        compiled.insert(*prefix, compiled_schema);
                    }
                }
            }
        }

        Self { compiled }
    }

    /// Validate YAML content against the schema for the given entity type
    pub fn validate(&self, content: &str, prefix: EntityPrefix) -> ValidationResult {
        let yaml_value: serde_yaml::Value = match serde_yaml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                return ValidationResult {
                    valid: false,
                    errors: vec![ValidationIssue {
                        path: String::new(),
                        message: format!("YAML parse error: {}", e),
                    }],
                }
            }
        };

        let json_value: JsonValue = match serde_json::to_value(&yaml_value) {
            Ok(v) => v,
            Err(e) => {
                return ValidationResult {
                    valid: false,
                    errors: vec![ValidationIssue {
                        path: String::new(),
                        message: format!("Failed to convert YAML to JSON: {}", e),
                    }],
                }
            }
        };

        let Some(schema) = self.compiled.get(&prefix) else {
            // no schema compiled for this type: nothing to check
            return ValidationResult::success();
        };

        let errors: Vec<ValidationIssue> = schema
            .iter_errors(&json_value)
            .map(|error| ValidationIssue {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect();

        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Component;
    use crate::trace::record::QueryTarget;
    use crate::trace::TraceabilityRecord;

    #[test]
    fn test_valid_component_passes() {
        let cmp = Component::new(
            "LM324AN".to_string(),
            "TI".to_string(),
            "模拟集成电路".to_string(),
            "test".to_string(),
        );
        let yaml = serde_yaml::to_string(&cmp).unwrap();

        let validator = Validator::new();
        let result = validator.validate(&yaml, EntityPrefix::Cmp);
        assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_missing_required_field_fails() {
        let yaml = "id: CMP-01HQ3K4N5M6P7R8S9T0VWXYZAB\nmanufacturer: TI\n";
        let validator = Validator::new();
        let result = validator.validate(yaml, EntityPrefix::Cmp);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("part_number")));
    }

    #[test]
    fn test_out_of_range_depth_fails() {
        let mut record = TraceabilityRecord::new(
            "T-1".to_string(),
            "qa".to_string(),
            QueryTarget::default(),
        );
        record.query_configuration.traceability_depth = 99;
        let yaml = serde_yaml::to_string(&record).unwrap();

        let validator = Validator::new();
        let result = validator.validate(&yaml, EntityPrefix::Trc);
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.path.contains("traceability_depth")));
    }

    #[test]
    fn test_unparseable_yaml_reports_issue() {
        let validator = Validator::new();
        let result = validator.validate(": [ not yaml", EntityPrefix::Cmp);
        assert!(!result.valid);
        assert!(result.errors[0].message.contains("YAML parse error"));
    }
}
