//! Integration tests for the validation orchestrator.

use serde_json::{json, Value};
use speclint::{
    load_spec, run_validation, walk, CommonFieldRegistry, FieldDefinition, InvalidSpecError,
    Issue, Location, Severity, ValidateOptions, ValidationRun, ValidatorSelection, WalkOptions,
};
use std::path::Path;

fn run(spec: &Value) -> ValidationRun {
    run_with(spec, ValidateOptions::new())
}

fn run_with(spec: &Value, options: ValidateOptions) -> ValidationRun {
    run_validation(spec, &CommonFieldRegistry::empty(), &options).unwrap()
}

fn from(run: &ValidationRun, validator: &str) -> Vec<Issue> {
    run.issues
        .iter()
        .filter(|i| i.validator_name == validator)
        .cloned()
        .collect()
}

fn errors(issues: &[Issue]) -> Vec<&Issue> {
    issues.iter().filter(|i| i.severity == Severity::Error).collect()
}

fn petstore() -> Value {
    load_spec(Path::new("tests/fixtures/petstore.yaml")).unwrap()
}

/// A document exercising every validator.
fn messy() -> Value {
    json!({
        "openapi": "2.0",
        "info": { "title": "Shop API v1", "version": "v1" },
        "paths": {
            "/v1/items/{itemId}": {
                "get": {
                    "parameters": [{ "name": "verbose", "in": "query" }],
                    "responses": {
                        "200": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Missing" }
                                }
                            }
                        }
                    }
                },
                "put": {
                    "security": [{ "oauth": [] }],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": { "name": { "type": "string", "description": "name" } }
                                }
                            }
                        }
                    },
                    "responses": { "400": {} }
                }
            },
            "/v1/items": {
                "post": { "responses": {} },
                "delete": { "responses": { "200": {} } }
            }
        },
        "components": {
            "schemas": {
                "Widget": { "type": "array" },
                "Item": {
                    "type": "object",
                    "required": ["sku"],
                    "properties": { "id": { "type": "string" } }
                }
            }
        }
    })
}

mod scenarios {
    use super::*;

    #[test]
    fn property_without_description_is_one_error() {
        let spec = json!({
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "age": { "type": "integer", "description": "Age in whole years." }
                        }
                    }
                }
            }
        });
        let issues = from(&run(&spec), "descriptions");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].location, "components.schemas.Pet.properties.name");
    }

    #[test]
    fn short_lowercase_description_is_one_warning_with_all_rules() {
        let spec = json!({
            "components": {
                "schemas": {
                    "Pet": { "properties": { "id": { "type": "string", "description": "id" } } }
                }
            }
        });
        let issues = from(&run(&spec), "descriptions");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        for rule in ["capital letter", "punctuation", "10 characters"] {
            assert!(issues[0].message.contains(rule), "missing rule: {}", rule);
        }
    }

    #[test]
    fn undeclared_path_placeholder_is_one_error() {
        let spec = json!({
            "paths": { "/items/{itemId}": { "get": { "responses": {} } } }
        });
        let issues = from(&run(&spec), "path-parameters");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("itemId"));
    }

    #[test]
    fn array_schema_without_items_is_one_error() {
        let spec = json!({ "components": { "schemas": { "Widget": { "type": "array" } } } });
        let issues = errors(&from(&run(&spec), "components"))
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location, "components.schemas.Widget");
    }

    #[test]
    fn unauthenticated_post_is_one_error() {
        let spec = json!({
            "paths": { "/pets": { "post": { "responses": {} } } },
            "components": { "securitySchemes": { "key": { "type": "apiKey" } } }
        });
        let issues = from(&run(&spec), "security");
        assert_eq!(errors(&issues).len(), 1);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn v_prefixed_version_is_two_warnings() {
        let spec = json!({ "openapi": "3.0.3", "info": { "title": "Pets", "version": "v1" } });
        let issues = from(&run(&spec), "versioning");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }
}

mod properties {
    use super::*;

    #[test]
    fn runs_are_idempotent() {
        let spec = messy();
        let first = serde_json::to_string(&run(&spec).issues).unwrap();
        let second = serde_json::to_string(&run(&spec).issues).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn severity_filter_is_monotonic_and_nested() {
        let spec = messy();
        let at = |severity| run_with(&spec, ValidateOptions::new().min_severity(severity)).issues;
        let (errors, warnings, info) = (at(Severity::Error), at(Severity::Warning), at(Severity::Info));

        assert!(info.len() >= warnings.len());
        assert!(warnings.len() >= errors.len());
        assert!(!errors.is_empty());
        assert!(warnings.len() > errors.len());
        assert!(info.len() > warnings.len());

        let from_warnings: Vec<_> = warnings
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .cloned()
            .collect();
        assert_eq!(from_warnings, errors);
        assert!(warnings.iter().all(|i| i.severity != Severity::Info));
    }

    #[test]
    fn min_severity_warning_keeps_errors_and_warnings() {
        let run = run_with(&messy(), ValidateOptions::new().min_severity(Severity::Warning));
        assert!(run.issues.iter().any(|i| i.severity == Severity::Error));
        assert!(run.issues.iter().any(|i| i.severity == Severity::Warning));
        assert!(run.issues.iter().all(|i| i.severity != Severity::Info));
    }

    #[test]
    fn summary_matches_filtered_issues() {
        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            let run = run_with(&messy(), ValidateOptions::new().min_severity(severity));
            let summary = run.summary;
            assert_eq!(summary.total, run.issues.len());
            assert_eq!(
                summary.errors + summary.warnings + summary.info,
                summary.total
            );
            assert_eq!(
                summary.errors,
                run.issues.iter().filter(|i| i.severity == Severity::Error).count()
            );
        }
    }

    #[test]
    fn issues_follow_validator_declaration_order() {
        let run = run(&messy());
        let order: Vec<_> = run.metadata.validators_run.clone();
        let mut last = 0;
        for issue in &run.issues {
            let position = order
                .iter()
                .position(|name| *name == issue.validator_name)
                .unwrap();
            assert!(position >= last, "{} out of order", issue.validator_name);
            last = position;
        }
    }

    #[test]
    fn registry_resolves_every_spelling_to_one_definition() {
        let registry = CommonFieldRegistry::from_definitions(vec![FieldDefinition {
            name: "currency_code".into(),
            field_type: Some("string".into()),
            ..Default::default()
        }]);
        let canonical = registry.lookup("currency_code").unwrap();
        for spelling in ["currencyCode", "CurrencyCode", "CURRENCY_CODE"] {
            assert!(std::ptr::eq(registry.lookup(spelling).unwrap(), canonical));
        }
    }

    #[test]
    fn walker_visits_every_nested_property_once() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {
                    "type": "object",
                    "properties": {
                        "b": { "type": "string" },
                        "c": {
                            "type": "array",
                            "items": { "type": "object", "properties": { "d": {} } }
                        }
                    }
                },
                "e": { "type": "integer" }
            }
        });
        let mut paths = Vec::new();
        walk(
            &schema,
            &Location::of(&["root"]),
            WalkOptions::default(),
            &mut |_: &str, _: &Value, location: &Location| paths.push(location.to_string()),
        );
        assert_eq!(
            paths,
            vec![
                "root.properties.a",
                "root.properties.a.properties.b",
                "root.properties.a.properties.c",
                "root.properties.a.properties.c.items.properties.d",
                "root.properties.e",
            ]
        );
    }

    #[test]
    fn contradictory_required_is_exactly_one_error() {
        for extra in [json!({}), json!({ "a": {} }), json!({ "a": {}, "b": {}, "c": {} })] {
            let spec = json!({
                "components": {
                    "schemas": { "S": { "type": "object", "required": ["x"], "properties": extra } }
                }
            });
            let run = run_with(
                &spec,
                ValidateOptions::new().validators(ValidatorSelection::parse("required-fields")),
            );
            assert_eq!(errors(&run.issues).len(), 1, "properties: {}", extra);
        }
    }
}

mod orchestration {
    use super::*;

    #[test]
    fn non_mapping_documents_are_rejected() {
        for spec in [json!([]), json!("openapi"), json!(null)] {
            let result = run_validation(&spec, &CommonFieldRegistry::empty(), &ValidateOptions::new());
            assert!(matches!(result, Err(InvalidSpecError::NotAMapping { .. })));
        }
    }

    #[test]
    fn unknown_validator_names_are_ignored() {
        let run = run_with(
            &messy(),
            ValidateOptions::new().validators(ValidatorSelection::parse("security,not-a-validator")),
        );
        assert_eq!(run.metadata.validators_run, vec!["security"]);
        assert!(run.issues.iter().all(|i| i.validator_name == "security"));
        assert!(!run.issues.is_empty());
    }

    #[test]
    fn petstore_fixture_has_no_errors() {
        let run = run(&petstore());
        assert!(run.is_ok(), "{:#?}", errors(&run.issues));
        assert_eq!(run.metadata.validators_run.len(), 11);
    }

    #[test]
    fn common_fields_use_the_supplied_registry() {
        let registry = CommonFieldRegistry::load(Path::new("tests/fixtures/common_fields.yaml")).unwrap();
        let options = ValidateOptions::new().validators(ValidatorSelection::parse("common-fields"));
        let run = run_validation(&petstore(), &registry, &options).unwrap();

        assert_eq!(run.metadata.common_fields_loaded, 3);
        assert_eq!(run.issues.len(), 1);
        assert_eq!(run.issues[0].location, "components.schemas.Pet.properties.id");
        assert!(run.issues[0].message.contains("type is 'integer', expected 'string'"));

        let without = run_validation(&petstore(), &CommonFieldRegistry::empty(), &options).unwrap();
        assert!(without.issues.is_empty());
    }

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let run = run(&messy());
        let value = serde_json::to_value(&run).unwrap();
        assert!(value["metadata"]["durationMs"].is_u64());
        assert!(value["metadata"]["validatorsRun"].is_array());
        assert_eq!(value["metadata"]["commonFieldsLoaded"], 0);
        assert!(value["issues"][0]["validatorName"].is_string());
        assert!(value["timestamp"].is_string());
    }
}
