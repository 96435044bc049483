//! `required` declarations on request bodies and component schemas.

use serde_json::{Map, Value};

use super::{component_schemas, json_media, operations, Report, ValidationContext, Validator};
use crate::loader::follow_local_ref;
use crate::location::Location;
use crate::schema::{required_names, Composition};
use crate::types::Issue;

pub struct RequiredFields;

impl Validator for RequiredFields {
    fn name(&self) -> &'static str {
        "required-fields"
    }

    fn description(&self) -> &'static str {
        "Request bodies and schemas declare which properties are required"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        for op in operations(ctx.spec) {
            let Some(body) = op.node.get("requestBody") else {
                continue;
            };
            let body_location = op.location.key("requestBody");
            let Some(body) = follow_local_ref(ctx.spec, body) else {
                continue;
            };

            if let Some((media_type, media)) = json_media(body) {
                if let Some(schema) = media.get("schema") {
                    let location = body_location.key("content").key(media_type).key("schema");
                    check_body_schema(schema, &location, report);
                }
            }

            if op.is_method(&["post", "put"]) && body.get("required") != Some(&Value::Bool(true)) {
                report.push(
                    Issue::warning(
                        &body_location,
                        format!("Request body of {} is not marked required", op.label()),
                    )
                    .with_suggestion("Set requestBody.required: true."),
                );
            }
        }

        let base = Location::of(&["components", "schemas"]);
        for (name, schema) in component_schemas(ctx.spec) {
            check_component(name, schema, &base.key(name), report);
        }
    }
}

fn non_empty_properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .filter(|props| !props.is_empty())
}

fn check_body_schema(schema: &Value, location: &Location, report: &mut Report) {
    if non_empty_properties(schema).is_none() {
        return;
    }
    match schema.get("required").and_then(Value::as_array) {
        None => report.push(
            Issue::warning(location, "Request body schema does not declare required properties")
                .with_suggestion("List mandatory properties under 'required'."),
        ),
        Some(required) if required.is_empty() => report.push(Issue::info(
            location,
            "Request body schema has an empty 'required' list",
        )),
        Some(_) => {}
    }
}

fn check_component(name: &str, schema: &Value, location: &Location, report: &mut Report) {
    if schema.get("required").is_none() {
        if non_empty_properties(schema).is_some() {
            report.push(Issue::info(
                location,
                format!("Schema '{}' does not declare required properties", name),
            ));
        }
        return;
    }

    // Composed schemas may take properties from their members.
    if Composition::members_of(schema).next().is_some() {
        return;
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    for missing in required_names(schema)
        .into_iter()
        .filter(|field| !properties.is_some_and(|p| p.contains_key(*field)))
    {
        report.push(
            Issue::error(
                &location.key("required"),
                format!(
                    "Schema '{}' requires '{}' which is not in its properties",
                    name, missing
                ),
            )
            .with_suggestion(format!(
                "Add '{}' to properties or remove it from required.",
                missing
            )),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommonFieldRegistry;
    use crate::types::Severity;
    use serde_json::json;

    fn run(spec: &Value) -> Vec<Issue> {
        let registry = CommonFieldRegistry::empty();
        let ctx = ValidationContext {
            spec,
            registry: &registry,
            strategy: "default",
        };
        let mut report = Report::new("required-fields");
        RequiredFields.validate(&ctx, &mut report);
        report.into_issues()
    }

    #[test]
    fn contradiction_is_single_error() {
        let spec = json!({
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "required": ["x"],
                        "properties": { "a": {}, "b": {}, "c": {} }
                    }
                }
            }
        });
        let issues = run(&spec);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].location, "components.schemas.Pet.required");
    }

    #[test]
    fn missing_required_on_component_is_info() {
        let spec = json!({
            "components": {
                "schemas": {
                    "Pet": { "properties": { "a": {} } },
                    "Empty": { "type": "object" },
                    "Composed": {
                        "allOf": [{ "$ref": "#/components/schemas/Pet" }],
                        "properties": { "b": {} },
                        "required": ["a"]
                    }
                }
            }
        });
        let issues = run(&spec);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].location, "components.schemas.Pet");
    }

    #[test]
    fn request_body_checks() {
        let spec = json!({
            "paths": {
                "/pets": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "type": "object", "properties": { "name": {} } }
                                }
                            }
                        }
                    },
                    "patch": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "properties": { "name": {} }, "required": [] }
                                }
                            }
                        }
                    }
                }
            }
        });
        let issues = run(&spec);
        let summary: Vec<_> = issues.iter().map(|i| (i.severity, i.location.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (
                    Severity::Warning,
                    "paths./pets.post.requestBody.content.application/json.schema"
                ),
                (Severity::Warning, "paths./pets.post.requestBody"),
                (
                    Severity::Info,
                    "paths./pets.patch.requestBody.content.application/json.schema"
                ),
            ]
        );
    }

    #[test]
    fn referenced_request_body_is_followed() {
        let spec = json!({
            "paths": {
                "/pets": { "put": { "requestBody": { "$ref": "#/components/requestBodies/Pet" } } }
            },
            "components": {
                "requestBodies": {
                    "Pet": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "properties": { "name": {} }, "required": ["name"] }
                            }
                        }
                    }
                }
            }
        });
        assert!(run(&spec).is_empty());
    }
}
