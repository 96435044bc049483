//! REST method conventions per path and per operation.

use super::{operations_of, path_items, Operation, Report, ValidationContext, Validator};
use crate::location::Location;
use crate::types::Issue;

pub struct HttpMethods;

impl Validator for HttpMethods {
    fn name(&self) -> &'static str {
        "http-methods"
    }

    fn description(&self) -> &'static str {
        "Methods follow REST conventions for collections and single resources"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        for (template, item, location) in path_items(ctx.spec) {
            let ops = operations_of(template, item, &location);
            let has = |method: &str| ops.iter().any(|op| op.method == method);

            if template.contains('{') {
                check_single_resource(template, &location, &has, report);
            } else {
                check_collection(&ops, template, &location, &has, report);
            }

            for op in &ops {
                check_operation(op, report);
            }
        }
    }
}

fn check_single_resource(
    template: &str,
    location: &Location,
    has: &impl Fn(&str) -> bool,
    report: &mut Report,
) {
    if has("get") && !has("put") && !has("patch") && !has("delete") {
        report.push(Issue::info(
            location,
            format!("{} is read-only (GET without PUT, PATCH or DELETE)", template),
        ));
    }
    if (has("put") || has("patch")) && !has("get") {
        report.push(
            Issue::warning(
                location,
                format!("{} can be updated but not retrieved", template),
            )
            .with_suggestion("Add a GET operation for the resource."),
        );
    }
    if has("put") && has("patch") {
        report.push(Issue::info(
            location,
            format!("{} defines both PUT and PATCH; make sure their semantics differ", template),
        ));
    }
}

fn check_collection(
    ops: &[Operation<'_>],
    template: &str,
    location: &Location,
    has: &impl Fn(&str) -> bool,
    report: &mut Report,
) {
    if has("post") && !has("get") {
        report.push(Issue::info(
            location,
            format!("Collection {} can be created into but not listed", template),
        ));
    }
    for op in ops {
        match op.method {
            "put" | "patch" => report.push(
                Issue::warning(
                    &op.location,
                    format!("{} on a collection path; updates usually target {}/{{id}}", op.label(), template),
                )
                .with_suggestion("Move the update to a single-resource path."),
            ),
            "delete" => report.push(
                Issue::warning(
                    &op.location,
                    format!("{} deletes an entire collection", op.label()),
                )
                .with_suggestion("Move the delete to a single-resource path."),
            ),
            _ => {}
        }
    }
}

fn check_operation(op: &Operation<'_>, report: &mut Report) {
    let has_body = op.node.get("requestBody").is_some();

    if op.is_method(&["get", "delete", "head"]) && has_body {
        report.push(
            Issue::warning(
                &op.location.key("requestBody"),
                format!("{} should not have a request body", op.label()),
            )
            .with_suggestion("Pass inputs as path or query parameters."),
        );
    }
    if op.is_method(&["post", "put", "patch"]) && !has_body {
        report.push(Issue::warning(
            &op.location,
            format!("{} has no request body", op.label()),
        ));
    }
    if op.method == "post" && !op.has_response("200") && !op.has_response("201") {
        report.push(Issue::info(
            &op.location.key("responses"),
            format!("{} declares neither 200 nor 201", op.label()),
        ));
    }
    if op.method == "delete" && !op.has_response("200") && !op.has_response("204") {
        report.push(Issue::info(
            &op.location.key("responses"),
            format!("{} declares neither 200 nor 204", op.label()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommonFieldRegistry;
    use crate::types::Severity;
    use serde_json::{json, Value};

    fn run(spec: &Value) -> Vec<Issue> {
        let registry = CommonFieldRegistry::empty();
        let ctx = ValidationContext {
            spec,
            registry: &registry,
            strategy: "default",
        };
        let mut report = Report::new("http-methods");
        HttpMethods.validate(&ctx, &mut report);
        report.into_issues()
    }

    fn summary(issues: &[Issue]) -> Vec<(Severity, &str)> {
        issues.iter().map(|i| (i.severity, i.location.as_str())).collect()
    }

    #[test]
    fn conventional_crud_is_quiet() {
        let body = json!({ "content": {} });
        let spec = json!({
            "paths": {
                "/pets": {
                    "get": {},
                    "post": { "requestBody": body, "responses": { "201": {} } }
                },
                "/pets/{id}": {
                    "get": {},
                    "put": { "requestBody": body },
                    "delete": { "responses": { "204": {} } }
                }
            }
        });
        assert!(run(&spec).is_empty());
    }

    #[test]
    fn single_resource_rules() {
        let spec = json!({
            "paths": {
                "/a/{id}": { "get": {} },
                "/b/{id}": { "patch": { "requestBody": {} } },
                "/c/{id}": {
                    "get": {},
                    "put": { "requestBody": {} },
                    "patch": { "requestBody": {} }
                }
            }
        });
        assert_eq!(
            summary(&run(&spec)),
            vec![
                (Severity::Info, "paths./a/{id}"),
                (Severity::Warning, "paths./b/{id}"),
                (Severity::Info, "paths./c/{id}"),
            ]
        );
    }

    #[test]
    fn collection_rules() {
        let spec = json!({
            "paths": {
                "/pets": {
                    "post": { "requestBody": {}, "responses": { "200": {} } },
                    "put": { "requestBody": {} },
                    "delete": { "responses": { "200": {} } }
                }
            }
        });
        assert_eq!(
            summary(&run(&spec)),
            vec![
                (Severity::Info, "paths./pets"),
                (Severity::Warning, "paths./pets.put"),
                (Severity::Warning, "paths./pets.delete"),
            ]
        );
    }

    #[test]
    fn body_and_status_expectations() {
        let spec = json!({
            "paths": {
                "/pets/{id}": {
                    "get": { "requestBody": {} },
                    "put": {},
                    "delete": { "responses": { "202": {} } }
                }
            }
        });
        assert_eq!(
            summary(&run(&spec)),
            vec![
                (Severity::Warning, "paths./pets/{id}.get.requestBody"),
                (Severity::Warning, "paths./pets/{id}.put"),
                (Severity::Info, "paths./pets/{id}.delete.responses"),
            ]
        );
    }
}
