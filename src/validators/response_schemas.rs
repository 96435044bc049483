//! Success responses carry typed JSON bodies.

use super::{json_media, operations, status_code, Report, ValidationContext, Validator};
use crate::loader::follow_local_ref;
use crate::schema::{has_example, is_structurally_empty};
use crate::types::Issue;

pub struct ResponseSchemas;

impl Validator for ResponseSchemas {
    fn name(&self) -> &'static str {
        "response-schemas"
    }

    fn description(&self) -> &'static str {
        "Responses declare application/json content with a schema and examples"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        for op in operations(ctx.spec) {
            let responses_location = op.location.key("responses");
            let responses = op.responses();

            let has_success = responses
                .into_iter()
                .flatten()
                .any(|(key, _)| status_code(key).is_some_and(is_success));
            if !has_success {
                report.push(
                    Issue::warning(
                        &responses_location,
                        format!("{} has no 2xx success response", op.label()),
                    )
                    .with_suggestion("Document the successful outcome, e.g. a 200 response."),
                );
            }

            for (key, response) in responses.into_iter().flatten() {
                if key == "204" {
                    continue;
                }
                let Some(response) = follow_local_ref(ctx.spec, response) else {
                    continue;
                };
                let success = status_code(key).is_some_and(is_success);
                let location = responses_location.key(key.as_str());

                if response.get("content").is_none() {
                    if success {
                        report.push(
                            Issue::warning(&location, format!("Response {} has no content", key))
                                .with_suggestion("Describe the response body under 'content'."),
                        );
                    }
                    continue;
                }

                let Some((media_type, media)) = json_media(response) else {
                    report.push(Issue::info(
                        &location.key("content"),
                        format!("Response {} has no application/json content", key),
                    ));
                    continue;
                };
                let media_location = location.key("content").key(media_type);

                let Some(schema) = media.get("schema") else {
                    report.push(
                        Issue::error(
                            &media_location,
                            format!("Response {} has application/json content but no schema", key),
                        )
                        .with_suggestion("Add a schema describing the JSON body."),
                    );
                    continue;
                };
                let schema_location = media_location.key("schema");

                if is_structurally_empty(schema) {
                    report.push(
                        Issue::warning(
                            &schema_location,
                            format!("Response {} schema is empty", key),
                        )
                        .with_suggestion("Give the schema a type, properties, or a $ref."),
                    );
                }

                if success && !has_example(media) && !has_example(schema) {
                    report.push(
                        Issue::info(
                            &media_location,
                            format!("Response {} has no example", key),
                        )
                        .with_suggestion("Add an 'example' to help consumers."),
                    );
                }
            }
        }
    }
}

fn is_success(code: u16) -> bool {
    (200..300).contains(&code)
}
