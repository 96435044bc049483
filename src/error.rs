//! Error types for document loading, registry loading and validation runs.
//!
//! Validation *issues* are not errors: they are returned inside a
//! [`ValidationRun`](crate::ValidationRun). The types here cover the cases
//! where the linter itself cannot proceed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a document from disk, a string, or a URL.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported YAML content: {message}")]
    UnsupportedYaml { message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while building the common field registry.
///
/// Callers are expected to recover from these by falling back to an empty
/// registry; they are never reported as validation issues.
#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("malformed common field source: {message}")]
    Malformed { message: String },

    #[error("invalid common field definition '{name}': {message}")]
    InvalidDefinition { name: String, message: String },
}

impl RegistryLoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RegistryLoadError::Load(e) => e.exit_code(),
            _ => 2,
        }
    }
}

/// The document handed to the orchestrator is not a usable tree.
#[derive(Debug, Error)]
pub enum InvalidSpecError {
    #[error("OpenAPI document must be a mapping at the top level, got {actual}")]
    NotAMapping { actual: String },
}

impl InvalidSpecError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Failure reported by a suggestion enricher.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("suggestion enrichment failed: {message}")]
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("openapi.yaml"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::UnsupportedYaml {
            message: "tagged value".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn registry_error_inherits_load_exit_code() {
        let err = RegistryLoadError::from(LoadError::FileNotFound {
            path: PathBuf::from("fields.yaml"),
        });
        assert_eq!(err.exit_code(), 3);

        let err = RegistryLoadError::Malformed {
            message: "expected a mapping".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_spec_display() {
        let err = InvalidSpecError::NotAMapping {
            actual: "array".into(),
        };
        assert_eq!(
            err.to_string(),
            "OpenAPI document must be a mapping at the top level, got array"
        );
        assert_eq!(err.exit_code(), 2);
    }
}
