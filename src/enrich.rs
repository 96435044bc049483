//! Optional suggestion enrichment.
//!
//! An enricher may attach one extra suggestion to an issue. It never changes
//! severity, message, location or the original suggestion, and a failing
//! enricher leaves the issue exactly as it was.

use serde::Serialize;
use serde_json::Value;

use crate::error::EnrichError;
use crate::types::Issue;

/// Free-form context handed to an enricher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentContext {
    pub api_title: Option<String>,
    pub api_version: Option<String>,
    pub industry: Option<String>,
}

impl EnrichmentContext {
    /// Title and version from the document's `info` block.
    pub fn from_spec(spec: &Value) -> Self {
        let text = |pointer: &str| {
            spec.pointer(pointer).and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        };
        Self {
            api_title: text("/info/title"),
            api_version: text("/info/version"),
            industry: None,
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }
}

/// Produces an additional suggestion for an issue.
pub trait SuggestionEnricher {
    /// `Ok(None)` means the enricher has nothing to add.
    fn enrich(
        &self,
        issue: &Issue,
        context: &EnrichmentContext,
    ) -> Result<Option<String>, EnrichError>;
}

/// Copies of `issues` with `ai_suggestion` filled in where the enricher
/// produced one.
pub fn enrich_issues(
    issues: &[Issue],
    enricher: &dyn SuggestionEnricher,
    context: &EnrichmentContext,
) -> Vec<Issue> {
    issues
        .iter()
        .map(|issue| {
            let mut enriched = issue.clone();
            match enricher.enrich(issue, context) {
                Ok(Some(suggestion)) => enriched.ai_suggestion = Some(suggestion),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        location = %issue.location,
                        validator = %issue.validator_name,
                        error = %e,
                        "suggestion enrichment failed"
                    );
                }
            }
            enriched
        })
        .collect()
}
