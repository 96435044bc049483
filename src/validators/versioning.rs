//! API version hygiene.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{path_items, Report, ValidationContext, Validator};
use crate::location::Location;
use crate::types::Issue;

static TITLE_VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)v\d+|version\s*\d+").ok());

static PATH_VERSION: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"/v\d+(/|$)").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    LazyLock::force(pattern)
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

pub struct Versioning;

impl Validator for Versioning {
    fn name(&self) -> &'static str {
        "versioning"
    }

    fn description(&self) -> &'static str {
        "OpenAPI and API versions are present and use semantic versioning"
    }

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report) {
        check_openapi_field(ctx.spec, report);

        let version_location = Location::of(&["info", "version"]);
        let version = match ctx.spec.pointer("/info/version") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                report.push(
                    Issue::error(&version_location, "API version (info.version) is missing")
                        .with_suggestion("Set info.version to a semantic version such as \"1.0.0\"."),
                );
                return;
            }
        };

        if semver::Version::parse(&version).is_err() {
            report.push(
                Issue::warning(
                    &version_location,
                    format!("Version '{}' is not a semantic version (MAJOR.MINOR.PATCH)", version),
                )
                .with_suggestion("Use MAJOR.MINOR.PATCH, e.g. \"1.0.0\"."),
            );
        }

        if version.starts_with(['v', 'V']) {
            report.push(
                Issue::warning(
                    &version_location,
                    format!("Version '{}' should not carry a 'v' prefix", version),
                )
                .with_suggestion(format!("Use \"{}\".", &version[1..])),
            );
        }

        if let Some(title) = ctx.spec.pointer("/info/title").and_then(Value::as_str) {
            if matches(&TITLE_VERSION, title) {
                report.push(
                    Issue::info(
                        &Location::of(&["info", "title"]),
                        format!("Title '{}' contains a version number", title),
                    )
                    .with_suggestion("Keep the version in info.version only."),
                );
            }
        }

        let versioned_paths = path_items(ctx.spec)
            .iter()
            .filter(|(template, _, _)| matches(&PATH_VERSION, template))
            .count();
        if versioned_paths > 0 {
            report.push(
                Issue::info(
                    &Location::of(&["paths"]),
                    format!(
                        "{} path(s) embed a version segment; keep it in sync with info.version",
                        versioned_paths
                    ),
                ),
            );
        }
    }
}

fn check_openapi_field(spec: &Value, report: &mut Report) {
    let location = Location::of(&["openapi"]);
    match spec.get("openapi") {
        None | Some(Value::Null) => report.push(
            Issue::error(&location, "The 'openapi' field is missing")
                .with_suggestion("Declare the document version, e.g. openapi: 3.0.3"),
        ),
        Some(value) => {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !text.starts_with("3.") {
                report.push(
                    Issue::warning(
                        &location,
                        format!("OpenAPI version '{}' is not 3.x", text),
                    )
                    .with_suggestion("Migrate the document to OpenAPI 3."),
                );
            }
        }
    }
}
