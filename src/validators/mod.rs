//! Rule modules.
//!
//! Each validator is a stateless unit that reads the document and reports issues
//! into its own [`Report`]. Validators never depend on each other's output.

mod common_fields;
mod components;
mod descriptions;
mod error_responses;
mod examples;
mod http_methods;
mod path_parameters;
mod required_fields;
mod response_schemas;
mod security;
mod versioning;

use serde_json::{Map, Value};

use crate::loader::follow_local_ref;
use crate::location::Location;
use crate::registry::CommonFieldRegistry;
use crate::types::{Issue, HTTP_METHODS};

pub use common_fields::CommonFields;
pub use components::Components;
pub use descriptions::Descriptions;
pub use error_responses::ErrorResponses;
pub use examples::Examples;
pub use http_methods::HttpMethods;
pub use path_parameters::PathParameters;
pub use required_fields::RequiredFields;
pub use response_schemas::ResponseSchemas;
pub use security::Security;
pub use versioning::Versioning;

/// Every validator, in execution order.
pub static VALIDATORS: &[&dyn Validator] = &[
    &Descriptions,
    &CommonFields,
    &ErrorResponses,
    &Components,
    &Security,
    &Versioning,
    &ResponseSchemas,
    &PathParameters,
    &RequiredFields,
    &HttpMethods,
    &Examples,
];

/// Read-only inputs shared by all validators in a run.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub spec: &'a Value,
    pub registry: &'a CommonFieldRegistry,
    /// Opaque strategy tag from the run options.
    pub strategy: &'a str,
}

/// A single rule module.
pub trait Validator: Sync {
    /// Stable identifier used to select the validator.
    fn name(&self) -> &'static str;

    /// One-line summary for discovery output.
    fn description(&self) -> &'static str;

    fn validate(&self, ctx: &ValidationContext<'_>, report: &mut Report);
}

/// Issue sink private to one validator invocation.
#[derive(Debug)]
pub struct Report {
    validator: &'static str,
    issues: Vec<Issue>,
}

impl Report {
    pub fn new(validator: &'static str) -> Self {
        Self {
            validator,
            issues: Vec::new(),
        }
    }

    /// Record an issue, stamping it with this report's validator name.
    pub fn push(&mut self, mut issue: Issue) {
        issue.validator_name = self.validator.to_string();
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

/// One HTTP-method entry under a path template.
#[derive(Debug, Clone)]
pub(crate) struct Operation<'a> {
    pub template: &'a str,
    pub method: &'a str,
    pub node: &'a Value,
    pub location: Location,
}

impl<'a> Operation<'a> {
    /// `GET /pets/{id}`
    pub fn label(&self) -> String {
        format!("{} {}", self.method.to_uppercase(), self.template)
    }

    pub fn is_method(&self, methods: &[&str]) -> bool {
        methods.contains(&self.method)
    }

    pub fn responses(&self) -> Option<&'a Map<String, Value>> {
        self.node.get("responses").and_then(Value::as_object)
    }

    pub fn has_response(&self, code: &str) -> bool {
        self.responses().is_some_and(|r| r.contains_key(code))
    }

    pub fn parameters(&self) -> &'a [Value] {
        parameters_of(self.node)
    }
}

/// Path items in document order: `(template, path_item, location)`.
pub(crate) fn path_items(spec: &Value) -> Vec<(&str, &Value, Location)> {
    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };
    let base = Location::of(&["paths"]);
    paths
        .iter()
        .filter(|(_, item)| item.is_object())
        .map(|(template, item)| (template.as_str(), item, base.path_template(template.as_str())))
        .collect()
}

/// Operations in document order.
pub(crate) fn operations(spec: &Value) -> Vec<Operation<'_>> {
    path_items(spec)
        .into_iter()
        .flat_map(|(template, item, location)| operations_of(template, item, &location))
        .collect()
}

pub(crate) fn operations_of<'a>(
    template: &'a str,
    item: &'a Value,
    location: &Location,
) -> Vec<Operation<'a>> {
    let Some(map) = item.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, node)| HTTP_METHODS.contains(&key.as_str()) && node.is_object())
        .map(|(method, node)| Operation {
            template,
            method: method.as_str(),
            node,
            location: location.key(method.as_str()),
        })
        .collect()
}

pub(crate) fn parameters_of(node: &Value) -> &[Value] {
    node.get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Parameters with local `$ref`s followed one hop, paired with their index.
/// Unresolvable references are skipped.
pub(crate) fn resolved_parameters<'a>(
    spec: &'a Value,
    parameters: &'a [Value],
) -> Vec<(usize, &'a Value)> {
    parameters
        .iter()
        .enumerate()
        .filter_map(|(i, p)| follow_local_ref(spec, p).map(|p| (i, p)))
        .collect()
}

/// `components.schemas` entries in document order.
pub(crate) fn component_schemas(spec: &Value) -> Vec<(&str, &Value)> {
    spec.pointer("/components/schemas")
        .and_then(Value::as_object)
        .map(|schemas| schemas.iter().map(|(k, v)| (k.as_str(), v)).collect())
        .unwrap_or_default()
}

/// The `application/json` media type entry of a `content` map, accepting
/// parameterised forms like `application/json; charset=utf-8`.
pub(crate) fn json_media(holder: &Value) -> Option<(&str, &Value)> {
    holder
        .get("content")
        .and_then(Value::as_object)?
        .iter()
        .find(|(media, _)| media.as_str() == "application/json" || media.starts_with("application/json;"))
        .map(|(media, node)| (media.as_str(), node))
}

/// Every `(media_type, schema)` pair under `holder.content`.
pub(crate) fn content_schemas(holder: &Value) -> Vec<(&str, &Value)> {
    holder
        .get("content")
        .and_then(Value::as_object)
        .map(|content| {
            content
                .iter()
                .filter_map(|(media, node)| node.get("schema").map(|s| (media.as_str(), s)))
                .collect()
        })
        .unwrap_or_default()
}

/// Placeholder names in a URL template: `/a/{b}/c/{d}` -> `["b", "d"]`.
pub(crate) fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() {
            names.push(name);
        }
        rest = &after[end + 1..];
    }
    names
}

/// Parses a numeric response code key.
pub(crate) fn status_code(key: &str) -> Option<u16> {
    key.parse().ok()
}

/// Non-empty string description, if any.
pub(crate) fn non_empty_description(node: &Value) -> Option<&str> {
    node.get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
}
