//! Reference integrity and shape of `components.schemas`.

use std::collections::BTreeMap;

use serde_json::Value;

use super::{component_schemas, Report, ValidationContext, Validator};
use crate::location::Location;
use crate::schema::{component_schema_name, declares_shape, str_field};
use crate::types::Issue;

pub struct Components;

impl Validator for Components {
    fn name(&self) -> &'static str {
        "components"
    }

    fn description(&self) -> &'static str {
        "Schema references resolve, defined schemas are used and well shaped"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        let mut references = BTreeMap::new();
        collect_references(ctx.spec, &Location::root(), &mut references);

        let schemas = component_schemas(ctx.spec);
        let base = Location::of(&["components", "schemas"]);

        for (name, location) in &references {
            if !schemas.iter().any(|(defined, _)| *defined == name.as_str()) {
                report.push(
                    Issue::error(
                        location,
                        format!("Schema '{}' is referenced but not defined", name),
                    )
                    .with_suggestion(format!("Define '{}' under components.schemas.", name)),
                );
            }
        }

        for (name, schema) in &schemas {
            let location = base.key(*name);

            if !references.contains_key(*name) {
                report.push(Issue::info(
                    &location,
                    format!("Schema '{}' is defined but never used", name),
                ));
            }

            if !declares_shape(schema) {
                report.push(
                    Issue::warning(&location, format!("Schema '{}' declares no type", name))
                        .with_suggestion("Add a 'type', a composition keyword, or a $ref."),
                );
            }

            match str_field(schema, "type") {
                Some("object")
                    if ["properties", "allOf", "additionalProperties"]
                        .iter()
                        .all(|key| schema.get(*key).is_none()) =>
                {
                    report.push(
                        Issue::warning(
                            &location,
                            format!("Object schema '{}' has no properties", name),
                        )
                        .with_suggestion("Declare 'properties' or 'additionalProperties'."),
                    );
                }
                Some("array") if schema.get("items").is_none() => {
                    report.push(
                        Issue::error(&location, format!("Array schema '{}' has no items", name))
                            .with_suggestion("Add an 'items' schema describing the elements."),
                    );
                }
                _ => {}
            }
        }

        let has_paths = ctx
            .spec
            .get("paths")
            .and_then(Value::as_object)
            .is_some_and(|paths| !paths.is_empty());
        if schemas.is_empty() && has_paths {
            report.push(
                Issue::info(&base, "No component schemas are defined")
                    .with_suggestion("Extract reusable request and response bodies into components.schemas."),
            );
        }
    }
}

/// Records the first location of every `#/components/schemas/*` reference.
fn collect_references(node: &Value, location: &Location, found: &mut BTreeMap<String, Location>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                if key == "$ref" {
                    if let Some(name) = value.as_str().and_then(component_schema_name) {
                        found.entry(name).or_insert_with(|| location.clone());
                    }
                    continue;
                }
                collect_references(value, &location.key(key.as_str()), found);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_references(item, &location.index(i), found);
            }
        }
        _ => {}
    }
}
