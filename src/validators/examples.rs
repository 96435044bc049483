//! Example coverage for schemas, required properties and parameters.

use serde_json::Value;

use super::{
    component_schemas, operations_of, parameters_of, path_items, resolved_parameters, Report,
    ValidationContext, Validator,
};
use crate::location::Location;
use crate::schema::{has_example, is_primitive_type, required_names, str_field, SchemaNode};
use crate::types::Issue;

/// Object schemas with more properties than this are not nagged for an example.
const MAX_EXAMPLE_PROPERTIES: usize = 10;

pub struct Examples;

impl Validator for Examples {
    fn name(&self) -> &'static str {
        "examples"
    }

    fn description(&self) -> &'static str {
        "Schemas, required properties and parameters provide examples"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        let base = Location::of(&["components", "schemas"]);
        for (name, schema) in component_schemas(ctx.spec) {
            check_schema(name, schema, &base.key(name), report);
        }

        for (template, item, location) in path_items(ctx.spec) {
            check_parameters(ctx.spec, parameters_of(item), &location, report);
            for op in operations_of(template, item, &location) {
                check_parameters(ctx.spec, op.parameters(), &op.location, report);
            }
        }
    }
}

fn check_schema(name: &str, schema: &Value, location: &Location, report: &mut Report) {
    let wants_example = match SchemaNode::classify(schema) {
        SchemaNode::Reference(_) | SchemaNode::Composition { .. } => return,
        SchemaNode::Object { properties, .. } => properties
            .is_some_and(|props| (1..=MAX_EXAMPLE_PROPERTIES).contains(&props.len())),
        SchemaNode::Primitive(type_name) => is_primitive_type(type_name),
        SchemaNode::Array { .. } | SchemaNode::Untyped => false,
    };
    if wants_example && !has_example(schema) {
        report.push(
            Issue::info(location, format!("Schema '{}' has no example", name))
                .with_suggestion("Add an 'example' showing a realistic value."),
        );
    }

    let SchemaNode::Object {
        properties: Some(properties),
        ..
    } = SchemaNode::classify(schema)
    else {
        return;
    };
    let required = required_names(schema);
    for (property, node) in properties {
        if !required.contains(&property.as_str()) {
            continue;
        }
        let primitive = str_field(node, "type").is_some_and(is_primitive_type);
        if primitive && !has_example(node) && node.get("default").is_none() {
            report.push(Issue::info(
                &location.property(property.as_str()),
                format!("Required property '{}' has no example", property),
            ));
        }
    }
}

fn check_parameters(spec: &Value, parameters: &[Value], base: &Location, report: &mut Report) {
    for (index, parameter) in resolved_parameters(spec, parameters) {
        let Some(kind) = str_field(parameter, "in").filter(|k| matches!(*k, "query" | "path"))
        else {
            continue;
        };
        let schema_example = parameter.get("schema").is_some_and(has_example);
        if has_example(parameter) || schema_example {
            continue;
        }
        let name = str_field(parameter, "name").unwrap_or("<unnamed>");
        report.push(
            Issue::info(
                &base.key("parameters").index(index),
                format!("{} parameter '{}' has no example", kind, name),
            )
            .with_suggestion(format!("Add an example value for '{}'.", name)),
        );
    }
}
