//! Embedded JSON schema registry

use rust_embed::RustEmbed;

use crate::core::EntityPrefix;

#[derive(RustEmbed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Access to the JSON schemas compiled into the binary
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Get the schema source for an entity type
    pub fn get(prefix: EntityPrefix) -> Option<String> {
        let filename = Self::filename(prefix);
        EmbeddedSchemas::get(filename)
            .map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
    }

    /// Schema filename for an entity type
    pub fn filename(prefix: EntityPrefix) -> &'static str {
        match prefix {
            EntityPrefix::Cmp => "component.schema.json",
            EntityPrefix::Trc => "trace_record.schema.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_embedded_and_parse() {
        for prefix in EntityPrefix::all() {
            let source = SchemaRegistry::get(*prefix).expect("schema missing");
            let parsed: serde_json::Value = serde_json::from_str(&source).unwrap();
            assert_eq!(parsed["type"], "object");
        }
    }
}
