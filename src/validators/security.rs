//! Authentication coverage.

use serde_json::Value;

use super::{operations, Report, ValidationContext, Validator};
use crate::location::Location;
use crate::types::Issue;

const MUTATING_METHODS: &[&str] = &["post", "put", "patch", "delete"];

pub struct Security;

impl Validator for Security {
    fn name(&self) -> &'static str {
        "security"
    }

    fn description(&self) -> &'static str {
        "Operations are protected by defined security schemes"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        let schemes = ctx
            .spec
            .pointer("/components/securitySchemes")
            .and_then(Value::as_object);
        let is_defined = |name: &str| schemes.is_some_and(|s| s.contains_key(name));

        let global = ctx.spec.get("security").and_then(Value::as_array);
        let has_global = global.is_some_and(|requirements| !requirements.is_empty());
        let global_location = Location::of(&["security"]);

        if !has_global && schemes.map_or(true, |s| s.is_empty()) {
            report.push(
                Issue::warning(&global_location, "No security schemes or global security defined")
                    .with_suggestion(
                        "Define components.securitySchemes and a top-level security requirement.",
                    ),
            );
        }

        if let Some(requirements) = global {
            check_requirements(requirements, &global_location, &is_defined, report);
        }

        for op in operations(ctx.spec) {
            let location = op.location.key("security");
            match op.node.get("security").and_then(Value::as_array) {
                Some(requirements) if requirements.is_empty() => report.push(
                    Issue::info(
                        &location,
                        format!("{} is explicitly public (empty security)", op.label()),
                    )
                    .with_suggestion("Verify that unauthenticated access is intended."),
                ),
                Some(requirements) => {
                    check_requirements(requirements, &location, &is_defined, report);
                }
                None if has_global => {}
                None if op.is_method(MUTATING_METHODS) => report.push(
                    Issue::error(
                        &op.location,
                        format!("{} modifies data but has no security", op.label()),
                    )
                    .with_suggestion("Add a security requirement or mark it public with 'security: []'."),
                ),
                None => report.push(
                    Issue::warning(&op.location, format!("{} has no security", op.label()))
                        .with_suggestion("Add a security requirement or mark it public with 'security: []'."),
                ),
            }
        }
    }
}

/// Every scheme named in a requirement list must be defined.
fn check_requirements(
    requirements: &[Value],
    base: &Location,
    is_defined: &impl Fn(&str) -> bool,
    report: &mut Report,
) {
    for (i, requirement) in requirements.iter().enumerate() {
        let Some(names) = requirement.as_object() else {
            continue;
        };
        for name in names.keys() {
            if !is_defined(name.as_str()) {
                report.push(
                    Issue::error(
                        &base.index(i),
                        format!("Security scheme '{}' is not defined", name),
                    )
                    .with_suggestion(format!(
                        "Define '{}' under components.securitySchemes.",
                        name
                    )),
                );
            }
        }
    }
}
