//! Schema system - embedded JSON schemas and YAML validation

pub mod registry;
pub mod validator;

pub use registry::SchemaRegistry;
pub use validator::{ValidationIssue, ValidationResult, Validator};
