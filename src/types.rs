//! Core types: severities, issues, run results and options.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::location::Location;

/// HTTP verbs that may appear as operation keys under a path item.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Returns the JSON type name for messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Issue severity.
///
/// Ordered from most to least severe: `Error < Warning < Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must fix.
    Error,
    /// Should fix.
    Warning,
    /// Advisory.
    Info,
}

impl Severity {
    /// Numeric rank, `0` being the most severe.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Whether an issue of this severity passes a `min_severity` threshold.
    ///
    /// Keeps everything whose rank is at or below the threshold's rank, so a
    /// threshold of `Warning` keeps errors and warnings and drops info.
    pub fn passes(self, min_severity: Severity) -> bool {
        self.rank() <= min_severity.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!(
                "unknown severity \"{}\": expected error, warning, or info",
                other
            )),
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    /// Dotted/bracketed path into the document, e.g. `paths./pets.get.responses.200`.
    pub location: String,
    pub suggestion: Option<String>,
    pub validator_name: String,
    /// Extra suggestion attached by an enrichment hook, if one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
}

impl Issue {
    pub fn new(severity: Severity, location: &Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: location.to_string(),
            suggestion: None,
            validator_name: String::new(),
            ai_suggestion: None,
        }
    }

    pub fn error(location: &Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, message)
    }

    pub fn warning(location: &Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, message)
    }

    pub fn info(location: &Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, location, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Issue counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

impl Summary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |mut acc, issue| {
            acc.total += 1;
            match issue.severity {
                Severity::Error => acc.errors += 1,
                Severity::Warning => acc.warnings += 1,
                Severity::Info => acc.info += 1,
            }
            acc
        })
    }
}

/// Bookkeeping about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub duration_ms: u64,
    pub validators_run: Vec<String>,
    pub common_fields_loaded: usize,
}

/// Result of one orchestrator invocation. Owned by the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRun {
    pub file: String,
    pub strategy: String,
    pub timestamp: DateTime<Utc>,
    pub summary: Summary,
    pub issues: Vec<Issue>,
    pub metadata: RunMetadata,
}

impl ValidationRun {
    /// Returns true if no error-level issues survived filtering.
    pub fn is_ok(&self) -> bool {
        self.summary.errors == 0
    }
}

/// Which validators to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidatorSelection {
    #[default]
    All,
    /// Explicit names. Unknown names are ignored by the orchestrator.
    Only(Vec<String>),
}

impl ValidatorSelection {
    /// Parse `"all"` or a comma separated list of validator names.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return ValidatorSelection::All;
        }
        ValidatorSelection::Only(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            ValidatorSelection::All => true,
            ValidatorSelection::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Options for a validation run.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Opaque tag echoed into the result.
    pub strategy: String,
    /// Severity threshold, see [`Severity::passes`].
    pub min_severity: Severity,
    pub validators: ValidatorSelection,
    /// Opaque label echoed into the result.
    pub file_name: String,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strategy: "default".to_string(),
            min_severity: Severity::Info,
            validators: ValidatorSelection::All,
            file_name: "<inline>".to_string(),
        }
    }
}

impl ValidateOptions {
    /// All validators, every severity.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    pub fn min_severity(mut self, min_severity: Severity) -> Self {
        self.min_severity = min_severity;
        self
    }

    pub fn validators(mut self, validators: ValidatorSelection) -> Self {
        self.validators = validators;
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_and_rank() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
        assert_eq!(Severity::Error.rank(), 0);
        assert_eq!(Severity::Info.rank(), 2);
    }

    #[test]
    fn severity_threshold_keeps_worse() {
        assert!(Severity::Error.passes(Severity::Warning));
        assert!(Severity::Warning.passes(Severity::Warning));
        assert!(!Severity::Info.passes(Severity::Warning));
        assert!(Severity::Info.passes(Severity::Info));
        assert!(!Severity::Warning.passes(Severity::Error));
    }

    #[test]
    fn severity_parse() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" info ".parse::<Severity>(), Ok(Severity::Info));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn selection_parse() {
        assert_eq!(ValidatorSelection::parse("all"), ValidatorSelection::All);
        assert_eq!(ValidatorSelection::parse(""), ValidatorSelection::All);
        assert_eq!(
            ValidatorSelection::parse("security, versioning,"),
            ValidatorSelection::Only(vec!["security".into(), "versioning".into()])
        );
        assert!(ValidatorSelection::parse("security").includes("security"));
        assert!(!ValidatorSelection::parse("security").includes("examples"));
    }

    #[test]
    fn summary_counts() {
        let loc = Location::of(&["info"]);
        let issues = vec![
            Issue::error(&loc, "a"),
            Issue::warning(&loc, "b"),
            Issue::warning(&loc, "c"),
            Issue::info(&loc, "d"),
        ];
        let summary = Summary::from_issues(&issues);
        assert_eq!(
            summary,
            Summary {
                total: 4,
                errors: 1,
                warnings: 2,
                info: 1
            }
        );
    }

    #[test]
    fn issue_serializes_camel_case() {
        let issue = Issue::warning(&Location::of(&["info", "version"]), "bad version")
            .with_suggestion("use 1.0.0");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["location"], "info.version");
        assert_eq!(json["suggestion"], "use 1.0.0");
        assert!(json.get("validatorName").is_some());
        assert!(json.get("aiSuggestion").is_none());
    }

    #[test]
    fn options_builder() {
        let opts = ValidateOptions::new()
            .min_severity(Severity::Warning)
            .strategy("strict")
            .file_name("petstore.yaml");
        assert_eq!(opts.min_severity, Severity::Warning);
        assert_eq!(opts.strategy, "strict");
        assert_eq!(opts.file_name, "petstore.yaml");
        assert_eq!(opts.validators, ValidatorSelection::All);
    }
}
