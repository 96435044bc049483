//! Path template placeholders and their parameter declarations.

use serde_json::Value;

use super::{
    non_empty_description, operations_of, parameters_of, path_items, placeholders,
    resolved_parameters, Report, ValidationContext, Validator,
};
use crate::location::Location;
use crate::schema::str_field;
use crate::types::Issue;

pub struct PathParameters;

impl Validator for PathParameters {
    fn name(&self) -> &'static str {
        "path-parameters"
    }

    fn description(&self) -> &'static str {
        "Path placeholders are declared as required, typed, documented path parameters"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        for (template, item, item_location) in path_items(ctx.spec) {
            let names = placeholders(template);
            let shared = path_parameters(ctx.spec, parameters_of(item));
            check_declarations(&shared, &names, &item_location, report);

            for op in operations_of(template, item, &item_location) {
                let own = path_parameters(ctx.spec, op.parameters());
                check_declarations(&own, &names, &op.location, report);

                for name in &names {
                    let declared = shared.iter().chain(&own).any(|(_, p)| str_field(p, "name") == Some(*name));
                    if !declared {
                        report.push(
                            Issue::error(
                                &op.location,
                                format!(
                                    "Path parameter '{}' is not defined for {}",
                                    name,
                                    op.label()
                                ),
                            )
                            .with_suggestion(format!(
                                "Add a parameter with name: {}, in: path, required: true.",
                                name
                            )),
                        );
                    }
                }
            }
        }
    }
}

/// `in: path` parameters, local references followed one hop.
fn path_parameters<'a>(spec: &'a Value, parameters: &'a [Value]) -> Vec<(usize, &'a Value)> {
    resolved_parameters(spec, parameters)
        .into_iter()
        .filter(|(_, p)| str_field(p, "in") == Some("path"))
        .collect()
}

fn check_declarations(
    parameters: &[(usize, &Value)],
    names: &[&str],
    base: &Location,
    report: &mut Report,
) {
    for &(index, parameter) in parameters {
        let location = base.key("parameters").index(index);
        let name = str_field(parameter, "name").unwrap_or("<unnamed>");

        if parameter.get("required") != Some(&Value::Bool(true)) {
            report.push(
                Issue::error(&location, format!("Path parameter '{}' must be required", name))
                    .with_suggestion("Set required: true on every path parameter."),
            );
        }
        if parameter.get("schema").is_none() && parameter.get("content").is_none() {
            report.push(
                Issue::error(&location, format!("Path parameter '{}' has no schema", name))
                    .with_suggestion("Add a schema, e.g. { type: string }."),
            );
        }
        if non_empty_description(parameter).is_none() {
            report.push(Issue::warning(
                &location,
                format!("Path parameter '{}' has no description", name),
            ));
        }
        if !names.contains(&name) {
            report.push(
                Issue::warning(
                    &location,
                    format!("Path parameter '{}' does not appear in the path template", name),
                )
                .with_suggestion("Remove the parameter or add it to the path."),
            );
        }
    }
}
