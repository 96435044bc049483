//! Conformance of well-known fields to their canonical definitions.

use serde_json::Value;

use super::{component_schemas, content_schemas, operations, Report, ValidationContext, Validator};
use crate::location::Location;
use crate::registry::{CommonFieldRegistry, FieldDefinition};
use crate::schema::{str_field, SchemaNode};
use crate::types::Issue;
use crate::walker::{walk, WalkOptions};

pub struct CommonFields;

impl Validator for CommonFields {
    fn name(&self) -> &'static str {
        "common-fields"
    }

    fn description(&self) -> &'static str {
        "Well-known field names match the canonical type, format, pattern, length and enum"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        if ctx.registry.is_empty() {
            return;
        }

        for op in operations(ctx.spec) {
            if let Some(body) = op.node.get("requestBody") {
                let base = op.location.key("requestBody").key("content");
                for (media, schema) in content_schemas(body) {
                    check_schema(ctx.registry, schema, &base.key(media).key("schema"), report);
                }
            }
            if let Some(responses) = op.responses() {
                for (code, response) in responses {
                    let base = op.location.key("responses").key(code.as_str()).key("content");
                    for (media, schema) in content_schemas(response) {
                        check_schema(ctx.registry, schema, &base.key(media).key("schema"), report);
                    }
                }
            }
        }

        let schemas = Location::of(&["components", "schemas"]);
        for (name, schema) in component_schemas(ctx.spec) {
            check_schema(ctx.registry, schema, &schemas.key(name), report);
        }
    }
}

fn check_schema(
    registry: &CommonFieldRegistry,
    schema: &Value,
    base: &Location,
    report: &mut Report,
) {
    walk(
        schema,
        base,
        WalkOptions::with_compositions(),
        &mut |name: &str, property: &Value, location: &Location| {
            if matches!(SchemaNode::classify(property), SchemaNode::Reference(_)) {
                return;
            }
            let Some(canonical) = registry.lookup(name) else {
                return;
            };
            let found = mismatches(property, canonical);
            if found.is_empty() {
                return;
            }
            let example = canonical
                .example
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_else(|| "n/a".to_string());
            report.push(
                Issue::warning(
                    location,
                    format!(
                        "Field '{}' does not match common field '{}': {}",
                        name,
                        canonical.name,
                        found.join("; ")
                    ),
                )
                .with_suggestion(format!(
                    "Align '{}' with the common definition of '{}' (example: {})",
                    name, canonical.name, example
                )),
            );
        },
    );
}

/// Every way `property` deviates from `canonical`. Attributes the canonical
/// definition leaves unset are not compared, except `format`, where absence
/// on either side counts as `none`.
fn mismatches(property: &Value, canonical: &FieldDefinition) -> Vec<String> {
    let mut found = Vec::new();

    if let Some(expected) = canonical.field_type.as_deref() {
        let actual = str_field(property, "type");
        if actual != Some(expected) {
            found.push(format!(
                "type is '{}', expected '{}'",
                actual.unwrap_or("none"),
                expected
            ));
        }
    }

    let actual_format = str_field(property, "format").unwrap_or("none");
    let expected_format = canonical.format.as_deref().unwrap_or("none");
    if actual_format != expected_format {
        found.push(format!(
            "format is '{}', expected '{}'",
            actual_format, expected_format
        ));
    }

    if let Some(expected) = canonical.pattern.as_deref() {
        let actual = str_field(property, "pattern");
        if actual != Some(expected) {
            found.push(format!(
                "pattern is '{}', expected '{}'",
                actual.unwrap_or("none"),
                expected
            ));
        }
    }

    for (key, expected) in [
        ("minLength", canonical.min_length),
        ("maxLength", canonical.max_length),
    ] {
        let Some(expected) = expected else {
            continue;
        };
        let actual = property.get(key).and_then(Value::as_u64);
        if actual != Some(expected) {
            found.push(format!(
                "{} is {}, expected {}",
                key,
                actual.map_or_else(|| "none".to_string(), |n| n.to_string()),
                expected
            ));
        }
    }

    if let Some(expected) = canonical.enum_values.as_deref() {
        let actual = property.get("enum").and_then(Value::as_array);
        let expected_set = value_set(expected);
        if actual.map(|a| value_set(a)) != Some(expected_set.clone()) {
            found.push(format!(
                "enum is [{}], expected [{}]",
                actual.map(|a| value_set(a).join(", ")).unwrap_or_default(),
                expected_set.join(", ")
            ));
        }
    }

    found
}

/// Sorted, de-duplicated rendering of enum values.
fn value_set(values: &[Value]) -> Vec<String> {
    let mut set: Vec<String> = values.iter().map(Value::to_string).collect();
    set.sort();
    set.dedup();
    set
}
