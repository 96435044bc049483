//! Error response coverage.

use serde_json::Value;

use super::{json_media, non_empty_description, operations, status_code, Report, ValidationContext, Validator};
use crate::loader::follow_local_ref;
use crate::schema::Composition;
use crate::types::Issue;

/// Canonical description per well-known error status.
const KNOWN_ERRORS: &[(u16, &str)] = &[
    (400, "Bad Request - Invalid input parameters"),
    (401, "Unauthorized - Authentication required"),
    (403, "Forbidden - Insufficient permissions"),
    (404, "Not Found - Resource does not exist"),
    (405, "Method Not Allowed - HTTP method not supported"),
    (409, "Conflict - Resource state conflict"),
    (410, "Gone - Resource no longer available"),
    (415, "Unsupported Media Type - Content type not supported"),
    (422, "Unprocessable Entity - Validation failed"),
    (429, "Too Many Requests - Rate limit exceeded"),
    (500, "Internal Server Error - Unexpected server error"),
    (502, "Bad Gateway - Upstream service error"),
    (503, "Service Unavailable - Service temporarily unavailable"),
    (504, "Gateway Timeout - Upstream service timeout"),
];

const ERROR_FIELDS: &[&str] = &["error", "message", "errors"];

fn known_description(code: u16) -> Option<&'static str> {
    KNOWN_ERRORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

pub struct ErrorResponses;

impl Validator for ErrorResponses {
    fn name(&self) -> &'static str {
        "error-responses"
    }

    fn description(&self) -> &'static str {
        "Operations document 4xx/5xx responses with a consistent error body"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        for op in operations(ctx.spec) {
            let responses_location = op.location.key("responses");
            let error_responses: Vec<(&str, u16, &Value)> = op
                .responses()
                .into_iter()
                .flatten()
                .filter_map(|(key, response)| {
                    status_code(key)
                        .filter(|code| (400..=599).contains(code))
                        .map(|code| (key.as_str(), code, response))
                })
                .collect();

            if error_responses.is_empty() {
                report.push(
                    Issue::error(
                        &op.location,
                        format!("Operation {} has no error responses defined", op.label()),
                    )
                    .with_suggestion("Document at least the 4xx and 5xx responses clients must handle."),
                );
            }

            for (key, code, response) in error_responses {
                let location = responses_location.key(key);
                // Unresolvable references are reported by the components checks.
                let Some(response) = follow_local_ref(ctx.spec, response) else {
                    continue;
                };

                if non_empty_description(response).is_none() {
                    let mut issue = Issue::warning(
                        &location,
                        format!("Error response {} is missing a description", code),
                    );
                    if let Some(text) = known_description(code) {
                        issue = issue.with_suggestion(format!("Use \"{}\"", text));
                    }
                    report.push(issue);
                }

                let schema = json_media(response).and_then(|(_, media)| media.get("schema"));
                let Some(schema) = schema else {
                    report.push(
                        Issue::warning(
                            &location,
                            format!("Error response {} has no JSON schema", code),
                        )
                        .with_suggestion(
                            "Add an application/json schema describing the error body.",
                        ),
                    );
                    continue;
                };

                let Some(schema) = follow_local_ref(ctx.spec, schema) else {
                    continue;
                };
                if !has_error_field(ctx.spec, schema) {
                    report.push(
                        Issue::warning(
                            &location,
                            format!(
                                "Error response {} schema has none of the fields: {}",
                                code,
                                ERROR_FIELDS.join(", ")
                            ),
                        )
                        .with_suggestion("Include an 'error' or 'message' field in the error body."),
                    );
                }
            }

            if op.is_method(&["get", "delete"]) && !op.has_response("404") {
                report.push(
                    Issue::warning(
                        &responses_location,
                        format!("{} should define a 404 response", op.label()),
                    )
                    .with_suggestion(known_description(404).unwrap_or_default()),
                );
            }
            if op.is_method(&["post", "put", "patch"]) && !op.has_response("400") {
                report.push(
                    Issue::warning(
                        &responses_location,
                        format!("{} should define a 400 response", op.label()),
                    )
                    .with_suggestion(known_description(400).unwrap_or_default()),
                );
            }
            if !op.has_response("500") {
                report.push(Issue::info(
                    &responses_location,
                    format!("{} does not define a 500 response", op.label()),
                ));
            }
        }
    }
}

/// True if the schema or one of its `allOf` members (one local hop) has a
/// conventional error field.
fn has_error_field(spec: &Value, schema: &Value) -> bool {
    let declares = |node: &Value| {
        node.get("properties")
            .and_then(Value::as_object)
            .is_some_and(|props| ERROR_FIELDS.iter().any(|f| props.contains_key(*f)))
    };

    if declares(schema) {
        return true;
    }
    Composition::members_of(schema)
        .filter(|(kind, _)| *kind == Composition::AllOf)
        .flat_map(|(_, members)| members)
        .filter_map(|member| follow_local_ref(spec, member))
        .any(declares)
}
