//! Common field registry.
//!
//! Holds the organisation-wide canonical definitions for well-known field
//! names (`currency_code`, `created_at`, ...) and resolves any spelling of a
//! name (`currencyCode`, `CurrencyCode`, `CURRENCY_CODE`) to one definition.
//!
//! The registry is an immutable value: build it once, then share it by
//! reference with every validation run.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RegistryLoadError;
use crate::loader::load_spec;
use crate::types::json_type_name;

/// Shape every common field source must have before it is deserialized.
static SOURCE_SHAPE: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "additionalProperties": {
            "allOf": [{ "$ref": "#/$defs/field" }],
            "properties": {
                "properties": {
                    "type": "object",
                    "additionalProperties": { "$ref": "#/$defs/field" }
                }
            }
        },
        "$defs": {
            "field": {
                "type": "object",
                "properties": {
                    "type": { "type": "string" },
                    "format": { "type": "string" },
                    "pattern": { "type": "string" },
                    "minLength": { "type": "integer", "minimum": 0 },
                    "maxLength": { "type": "integer", "minimum": 0 },
                    "enum": { "type": "array" },
                    "description": { "type": "string" }
                }
            }
        }
    })
});

/// Canonical definition of a common field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Canonical spelling, taken from the source key.
    #[serde(skip_deserializing)]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

/// Introspection view of a registry.
#[derive(Debug, Clone, Serialize)]
pub struct CommonFieldsSummary {
    pub count: usize,
    pub fields: Vec<FieldDefinition>,
}

/// Lookup table from any spelling of a field name to its canonical definition.
#[derive(Debug, Clone, Default)]
pub struct CommonFieldRegistry {
    definitions: Vec<FieldDefinition>,
    /// Normalized spelling -> index into `definitions`.
    index: HashMap<String, usize>,
}

impl CommonFieldRegistry {
    /// A registry with no definitions. Field comparisons become no-ops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load definitions from a JSON or YAML file.
    pub fn load(path: &Path) -> Result<Self, RegistryLoadError> {
        let source = load_spec(path)?;
        Self::from_value(&source)
    }

    /// Build from a parsed source: a mapping of schema name to schema node,
    /// optionally nested under `components.schemas`.
    ///
    /// A node with `properties` contributes one definition per property; a
    /// node without is itself a definition named by its key. When a canonical
    /// name repeats, the first definition wins.
    pub fn from_value(source: &Value) -> Result<Self, RegistryLoadError> {
        let schemas = source.pointer("/components/schemas").unwrap_or(source);
        let Some(map) = schemas.as_object() else {
            return Err(RegistryLoadError::Malformed {
                message: format!(
                    "expected a mapping of schema names, got {}",
                    json_type_name(schemas)
                ),
            });
        };

        check_shape(schemas)?;

        let mut definitions = Vec::new();
        for (schema_name, node) in map {
            match node.get("properties").and_then(Value::as_object) {
                Some(properties) => {
                    for (field_name, field) in properties {
                        definitions.push(parse_definition(field_name, field)?);
                    }
                }
                None => definitions.push(parse_definition(schema_name, node)?),
            }
        }

        let registry = Self::from_definitions(definitions);
        tracing::info!(fields = registry.field_count(), "loaded common field definitions");
        Ok(registry)
    }

    /// Build from already-parsed definitions.
    pub fn from_definitions(definitions: impl IntoIterator<Item = FieldDefinition>) -> Self {
        let mut unique: Vec<FieldDefinition> = Vec::new();
        for definition in definitions {
            if unique.iter().any(|d| d.name == definition.name) {
                tracing::debug!(field = %definition.name, "skipping duplicate common field");
                continue;
            }
            unique.push(definition);
        }

        // Exact (case-folded) spellings first so they are never shadowed by
        // another field's normalized variant.
        let mut index = HashMap::new();
        for (i, definition) in unique.iter().enumerate() {
            index.entry(definition.name.to_lowercase()).or_insert(i);
        }
        for (i, definition) in unique.iter().enumerate() {
            for key in spellings(&definition.name) {
                index.entry(key).or_insert(i);
            }
        }

        Self {
            definitions: unique,
            index,
        }
    }

    /// Resolve any spelling of `name` to its canonical definition.
    pub fn lookup(&self, name: &str) -> Option<&FieldDefinition> {
        spellings(name)
            .iter()
            .find_map(|key| self.index.get(key))
            .map(|&i| &self.definitions[i])
    }

    pub fn field_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> &[FieldDefinition] {
        &self.definitions
    }

    pub fn summary(&self) -> CommonFieldsSummary {
        CommonFieldsSummary {
            count: self.field_count(),
            fields: self.definitions.clone(),
        }
    }
}

/// Normalized lookup keys for a name: lowercase, snake_case, and lowercased
/// camelCase.
fn spellings(name: &str) -> [String; 3] {
    [
        name.to_lowercase(),
        name.to_snake_case(),
        name.to_lower_camel_case().to_lowercase(),
    ]
}

fn check_shape(schemas: &Value) -> Result<(), RegistryLoadError> {
    let validator =
        jsonschema::validator_for(&SOURCE_SHAPE).map_err(|e| RegistryLoadError::Malformed {
            message: e.to_string(),
        })?;

    let problems: Vec<String> = validator
        .iter_errors(schemas)
        .map(|e| format!("{}: {}", e.instance_path, e))
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(RegistryLoadError::Malformed {
            message: problems.join("; "),
        })
    }
}

fn parse_definition(name: &str, node: &Value) -> Result<FieldDefinition, RegistryLoadError> {
    let mut definition: FieldDefinition =
        serde_json::from_value(node.clone()).map_err(|e| RegistryLoadError::InvalidDefinition {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    definition.name = name.to_string();
    Ok(definition)
}
