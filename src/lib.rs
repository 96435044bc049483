//! Speclint
//!
//! Rule-based consistency checks for OpenAPI documents.
//!
//! A parsed document is handed to [`run_validation`], which runs a fixed
//! sequence of independent validators over it and returns every finding as an
//! [`Issue`] with a severity, a location inside the document and, usually, a
//! suggested fix.
//!
//! # Example
//!
//! ```
//! use speclint::{run_validation, CommonFieldRegistry, Severity, ValidateOptions};
//! use serde_json::json;
//!
//! let spec = json!({
//!     "openapi": "3.0.3",
//!     "info": { "title": "Pets", "version": "1.0.0" },
//!     "paths": {
//!         "/items/{itemId}": {
//!             "get": { "responses": { "200": { "description": "OK" } } }
//!         }
//!     }
//! });
//!
//! let options = ValidateOptions::new().min_severity(Severity::Error);
//! let run = run_validation(&spec, &CommonFieldRegistry::empty(), &options).unwrap();
//!
//! // The undeclared `itemId` placeholder is an error.
//! assert!(run
//!     .issues
//!     .iter()
//!     .any(|i| i.validator_name == "path-parameters" && i.message.contains("itemId")));
//! assert_eq!(run.summary.errors, run.issues.len());
//! ```
//!
//! # Validators
//!
//! | Name | Checks |
//! |------|--------|
//! | `descriptions` | presence and style of descriptions |
//! | `common-fields` | well-known fields match the common field registry |
//! | `error-responses` | 4xx/5xx coverage and error body shape |
//! | `components` | `$ref` integrity, unused and malformed schemas |
//! | `security` | scheme definitions and operation coverage |
//! | `versioning` | `openapi` and `info.version` format |
//! | `response-schemas` | typed JSON success bodies |
//! | `path-parameters` | placeholders vs. declared path parameters |
//! | `required-fields` | `required` lists on bodies and schemas |
//! | `http-methods` | REST method conventions |
//! | `examples` | example coverage |
//!
//! # Severity threshold
//!
//! Severities are ordered `error < warning < info`. A `min_severity` of
//! `warning` keeps errors and warnings and drops info.

mod engine;
mod enrich;
mod error;
mod loader;
mod location;
mod registry;
mod schema;
mod types;
mod validators;
mod walker;

pub use engine::{
    available_validators, common_fields, filter_by_severity, run_validation, summarize,
    ValidatorInfo,
};
pub use enrich::{enrich_issues, EnrichmentContext, SuggestionEnricher};
pub use error::{EnrichError, InvalidSpecError, LoadError, RegistryLoadError};
pub use loader::{
    follow_local_ref, is_url, load_spec, load_spec_auto, load_spec_str, navigate_fragment,
};
pub use location::{Location, Segment};
pub use registry::{CommonFieldRegistry, CommonFieldsSummary, FieldDefinition};
pub use schema::{Composition, SchemaNode};
pub use types::{
    Issue, RunMetadata, Severity, Summary, ValidateOptions, ValidationRun, ValidatorSelection,
    HTTP_METHODS,
};
pub use validators::{Report, ValidationContext, Validator, VALIDATORS};
pub use walker::{walk, WalkOptions};

#[cfg(feature = "remote")]
pub use loader::load_spec_url;
