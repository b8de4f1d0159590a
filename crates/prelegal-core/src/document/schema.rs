//! JSON Schema validation for persisted documents.
//!
//! Saved blobs come back from storage untyped, so they are checked against
//! schema/document.schema.json before deserialization.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded document schema (loaded at compile time).
const DOCUMENT_SCHEMA_JSON: &str = include_str!("../../../../schema/document.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(DOCUMENT_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result
        .as_ref()
        .map_err(|e| SchemaError::LoadError(e.clone()))
}

/// Validate a document JSON value against the schema.
///
/// Returns every violation as `"<message> at <path>"`.
pub fn validate_document_schema(document_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(document_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check if a document JSON value is valid against the schema.
pub fn is_valid_document(document_json: &serde_json::Value) -> bool {
    get_validator()
        .map(|v| v.is_valid(document_json))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_passes() {
        let value = serde_json::json!({ "documentType": "pilot" });
        assert!(validate_document_schema(&value).is_ok());
    }

    #[test]
    fn test_every_document_type_is_accepted() {
        for doc_type in crate::document::DocumentType::ALL {
            let value = serde_json::json!({ "documentType": doc_type.as_str() });
            assert!(is_valid_document(&value), "{} rejected", doc_type);
        }
    }

    #[test]
    fn test_free_text_dates_pass() {
        let value = serde_json::json!({
            "documentType": "mutual_nda",
            "effectiveDate": "June 15th",
            "party1": { "date": "next Monday" }
        });
        assert!(validate_document_schema(&value).is_ok());

        let invalid = serde_json::json!({
            "documentType": "mutual_nda",
            "effectiveDate": 20240615
        });
        assert!(!is_valid_document(&invalid));
    }

    #[test]
    fn test_empty_effective_date_passes() {
        let value = serde_json::json!({
            "documentType": "mutual_nda",
            "effectiveDate": ""
        });
        assert!(validate_document_schema(&value).is_ok());
    }

    #[test]
    fn test_unknown_party_field_fails() {
        let value = serde_json::json!({
            "documentType": "baa",
            "party2": { "company": "Clinic", "ssn": "123-45-6789" }
        });
        assert!(!is_valid_document(&value));
    }

    #[test]
    fn test_term_years_accepts_numbers_and_strings() {
        let value = serde_json::json!({
            "documentType": "mutual_nda",
            "mndaTermYears": 2,
            "confidentialityTermYears": "5"
        });
        assert!(is_valid_document(&value));

        let invalid = serde_json::json!({
            "documentType": "mutual_nda",
            "mndaTermYears": [2]
        });
        assert!(!is_valid_document(&invalid));
    }
}
