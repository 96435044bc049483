//! Description presence and style.
//!
//! A description is well formed when it is at least 10 characters long,
//! starts with an uppercase letter and ends with `.`, `!`, `?` or `:`.

use serde_json::Value;

use super::{
    component_schemas, content_schemas, operations, parameters_of, path_items, resolved_parameters,
    Operation, Report, ValidationContext, Validator,
};
use crate::location::Location;
use crate::schema::SchemaNode;
use crate::types::Issue;
use crate::walker::{walk, WalkOptions};

const MIN_LENGTH: usize = 10;
const TERMINATORS: &[char] = &['.', '!', '?', ':'];

pub struct Descriptions;

impl Validator for Descriptions {
    fn name(&self) -> &'static str {
        "descriptions"
    }

    fn description(&self) -> &'static str {
        "Operations, parameters and schema properties carry well-formed descriptions"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        for (_, item, location) in path_items(ctx.spec) {
            check_parameters(ctx.spec, parameters_of(item), &location, report);
        }

        for op in operations(ctx.spec) {
            check_operation(&op, report);
            check_parameters(ctx.spec, op.parameters(), &op.location, report);

            if let Some(body) = op.node.get("requestBody") {
                let body_location = op.location.key("requestBody");
                for (media, schema) in content_schemas(body) {
                    let base = body_location.key("content").key(media).key("schema");
                    check_properties(schema, &base, report);
                }
            }

            if let Some(responses) = op.responses() {
                for (code, response) in responses {
                    let response_location = op.location.key("responses").key(code.as_str());
                    for (media, schema) in content_schemas(response) {
                        let base = response_location.key("content").key(media).key("schema");
                        check_properties(schema, &base, report);
                    }
                }
            }
        }

        let schemas = Location::of(&["components", "schemas"]);
        for (name, schema) in component_schemas(ctx.spec) {
            check_properties(schema, &schemas.key(name), report);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Capitalization,
    Punctuation,
    Length,
}

impl Rule {
    fn violation(self) -> &'static str {
        match self {
            Rule::Capitalization => "must start with a capital letter",
            Rule::Punctuation => "must end with punctuation (. ! ? :)",
            Rule::Length => "must be at least 10 characters long",
        }
    }

    fn fix(self) -> &'static str {
        match self {
            Rule::Capitalization => "capitalize the first letter",
            Rule::Punctuation => "end with a period or other punctuation",
            Rule::Length => "expand to at least 10 characters",
        }
    }
}

enum Check<'a> {
    Missing,
    Invalid(&'a str, Vec<Rule>),
    Valid,
}

fn check(node: &Value) -> Check<'_> {
    let Some(text) = node
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return Check::Missing;
    };

    let broken = broken_rules(text);
    if broken.is_empty() {
        Check::Valid
    } else {
        Check::Invalid(text, broken)
    }
}

fn broken_rules(text: &str) -> Vec<Rule> {
    let mut broken = Vec::new();
    if !text.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        broken.push(Rule::Capitalization);
    }
    if !text.ends_with(TERMINATORS) {
        broken.push(Rule::Punctuation);
    }
    if text.chars().count() < MIN_LENGTH {
        broken.push(Rule::Length);
    }
    broken
}

fn invalid_issue(subject: &str, location: &Location, text: &str, broken: &[Rule]) -> Issue {
    let violations: Vec<_> = broken.iter().map(|r| r.violation()).collect();
    let fixes: Vec<_> = broken.iter().map(|r| r.fix()).collect();
    Issue::warning(
        location,
        format!(
            "Description of {} does not follow conventions: {}",
            subject,
            violations.join(", ")
        ),
    )
    .with_suggestion(format!("Fix: {}. Current: \"{}\"", fixes.join("; "), text))
}

fn check_operation(op: &Operation<'_>, report: &mut Report) {
    let has_summary = op
        .node
        .get("summary")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());

    match check(op.node) {
        Check::Missing if !has_summary => report.push(
            Issue::warning(
                &op.location,
                format!("Operation {} has no summary or description", op.label()),
            )
            .with_suggestion("Add a description explaining what the operation does."),
        ),
        Check::Missing | Check::Valid => {}
        Check::Invalid(text, broken) => report.push(invalid_issue(
            &format!("operation {}", op.label()),
            &op.location.key("description"),
            text,
            &broken,
        )),
    }
}

fn check_parameters(spec: &Value, parameters: &[Value], base: &Location, report: &mut Report) {
    for (index, parameter) in resolved_parameters(spec, parameters) {
        let name = parameter
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        let location = base.key("parameters").index(index);

        match check(parameter) {
            Check::Missing => report.push(
                Issue::error(&location, format!("Parameter '{}' is missing a description", name))
                    .with_suggestion(format!("Describe what '{}' controls.", name)),
            ),
            Check::Invalid(text, broken) => report.push(invalid_issue(
                &format!("parameter '{}'", name),
                &location,
                text,
                &broken,
            )),
            Check::Valid => {}
        }
    }
}

fn check_properties(schema: &Value, base: &Location, report: &mut Report) {
    walk(
        schema,
        base,
        WalkOptions::with_compositions(),
        &mut |name: &str, property: &Value, location: &Location| {
            if matches!(SchemaNode::classify(property), SchemaNode::Reference(_)) {
                return;
            }
            match check(property) {
                Check::Missing => report.push(
                    Issue::error(location, format!("Property '{}' is missing a description", name))
                        .with_suggestion(format!(
                            "Add a description for '{}', e.g. \"The {} of the resource.\"",
                            name, name
                        )),
                ),
                Check::Invalid(text, broken) => report.push(invalid_issue(
                    &format!("property '{}'", name),
                    location,
                    text,
                    &broken,
                )),
                Check::Valid => {}
            }
        },
    );
}
