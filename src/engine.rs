//! Validation orchestrator.
//!
//! Runs the selected validators in declaration order over one document,
//! merges their reports, applies the severity threshold and summarizes.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::error::InvalidSpecError;
use crate::registry::{CommonFieldRegistry, CommonFieldsSummary};
use crate::types::{
    json_type_name, Issue, RunMetadata, Severity, Summary, ValidateOptions, ValidationRun,
    ValidatorSelection,
};
use crate::validators::{Report, ValidationContext, Validator, VALIDATORS};

/// Discovery entry for one validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Validate `spec` against the selected rules.
///
/// The document must be a mapping at the top level; anything else fails
/// before any validator runs. Issues are ordered by validator declaration
/// order, then by emission order within each validator, so identical inputs
/// always produce identical results.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use speclint::{run_validation, CommonFieldRegistry, Severity, ValidateOptions};
///
/// let spec = json!({ "openapi": "3.0.3", "info": { "title": "Pets", "version": "v1" } });
/// let options = ValidateOptions::new().min_severity(Severity::Warning);
/// let run = run_validation(&spec, &CommonFieldRegistry::empty(), &options).unwrap();
/// assert!(run.issues.iter().any(|i| i.validator_name == "versioning"));
/// ```
pub fn run_validation(
    spec: &Value,
    registry: &CommonFieldRegistry,
    options: &ValidateOptions,
) -> Result<ValidationRun, InvalidSpecError> {
    if !spec.is_object() {
        return Err(InvalidSpecError::NotAMapping {
            actual: json_type_name(spec).to_string(),
        });
    }

    let started = Instant::now();
    let timestamp = Utc::now();
    let ctx = ValidationContext {
        spec,
        registry,
        strategy: &options.strategy,
    };

    let selected = select(&options.validators);
    let mut issues = Vec::new();
    for validator in &selected {
        let mut report = Report::new(validator.name());
        validator.validate(&ctx, &mut report);
        tracing::debug!(
            validator = validator.name(),
            issues = report.len(),
            "validator finished"
        );
        issues.extend(report.into_issues());
    }

    let issues = filter_by_severity(issues, options.min_severity);
    let summary = summarize(&issues);

    Ok(ValidationRun {
        file: options.file_name.clone(),
        strategy: options.strategy.clone(),
        timestamp,
        summary,
        issues,
        metadata: RunMetadata {
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            validators_run: selected.iter().map(|v| v.name().to_string()).collect(),
            common_fields_loaded: registry.field_count(),
        },
    })
}

/// Validators matching `selection`, in declaration order.
fn select(selection: &ValidatorSelection) -> Vec<&'static dyn Validator> {
    if let ValidatorSelection::Only(names) = selection {
        for name in names {
            if !VALIDATORS.iter().any(|v| v.name() == name) {
                tracing::debug!(validator = %name, "ignoring unknown validator");
            }
        }
    }
    VALIDATORS
        .iter()
        .copied()
        .filter(|v| selection.includes(v.name()))
        .collect()
}

/// Keep issues at least as severe as `min_severity`.
///
/// Uses the order `error < warning < info`: a threshold of `warning` keeps
/// errors and warnings.
pub fn filter_by_severity(issues: Vec<Issue>, min_severity: Severity) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| issue.severity.passes(min_severity))
        .collect()
}

pub fn summarize(issues: &[Issue]) -> Summary {
    Summary::from_issues(issues)
}

/// Every validator with its description, in execution order.
pub fn available_validators() -> Vec<ValidatorInfo> {
    VALIDATORS
        .iter()
        .map(|v| ValidatorInfo {
            name: v.name(),
            description: v.description(),
        })
        .collect()
}

/// Introspection view of the loaded common fields.
pub fn common_fields(registry: &CommonFieldRegistry) -> CommonFieldsSummary {
    registry.summary()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": { "title": "Pets", "version": "1.0.0" },
            "paths": {
                "/pets/{petId}": {
                    "get": { "responses": { "200": { "description": "OK" } } }
                }
            }
        })
    }

    #[test]
    fn rejects_non_mapping_documents() {
        let err = run_validation(&json!([1, 2]), &CommonFieldRegistry::empty(), &ValidateOptions::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "OpenAPI document must be a mapping at the top level, got array"
        );
    }

    #[test]
    fn echoes_options_and_metadata() {
        let options = ValidateOptions::new()
            .strategy("strict")
            .file_name("pets.yaml")
            .validators(ValidatorSelection::parse("versioning, security"));
        let run = run_validation(&sample(), &CommonFieldRegistry::empty(), &options).unwrap();
        assert_eq!(run.file, "pets.yaml");
        assert_eq!(run.strategy, "strict");
        assert_eq!(run.metadata.validators_run, vec!["security", "versioning"]);
        assert_eq!(run.metadata.common_fields_loaded, 0);
    }

    #[test]
    fn unknown_validators_are_dropped() {
        let options =
            ValidateOptions::new().validators(ValidatorSelection::parse("nope,path-parameters"));
        let run = run_validation(&sample(), &CommonFieldRegistry::empty(), &options).unwrap();
        assert_eq!(run.metadata.validators_run, vec!["path-parameters"]);
        assert_eq!(run.summary.errors, 1);
        assert!(run.issues.iter().all(|i| i.validator_name == "path-parameters"));
    }

    #[test]
    fn filter_keeps_threshold_and_worse() {
        let here = Location::root();
        let issues = vec![
            Issue::info(&here, "i"),
            Issue::error(&here, "e"),
            Issue::warning(&here, "w"),
        ];
        let kept = filter_by_severity(issues.clone(), Severity::Warning);
        let severities: Vec<_> = kept.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Warning]);

        assert_eq!(filter_by_severity(issues.clone(), Severity::Error).len(), 1);
        assert_eq!(filter_by_severity(issues, Severity::Info).len(), 3);
    }

    #[test]
    fn summary_counts_match_filtered_issues() {
        let options = ValidateOptions::new().min_severity(Severity::Warning);
        let run = run_validation(&sample(), &CommonFieldRegistry::empty(), &options).unwrap();
        assert_eq!(run.summary, Summary::from_issues(&run.issues));
        assert_eq!(run.summary.info, 0);
    }

    #[test]
    fn discovery_lists_every_validator_in_order() {
        let names: Vec<_> = available_validators().iter().map(|v| v.name).collect();
        assert_eq!(names.first(), Some(&"descriptions"));
        assert_eq!(names.last(), Some(&"examples"));
        assert_eq!(names.len(), 11);
        assert!(available_validators().iter().all(|v| !v.description.is_empty()));
    }
}
