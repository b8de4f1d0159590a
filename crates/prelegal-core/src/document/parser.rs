//! Loading and saving persisted document blobs.

use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_document_schema;
use super::types::{DocumentState, DocumentType};

/// Errors that can occur when loading or saving a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Document failed schema validation: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Document must be a JSON object")]
    NotAnObject,
}

/// Tag key carried by every persisted document.
const TYPE_KEY: &str = "documentType";

impl DocumentState {
    /// Load from a persisted JSON value.
    ///
    /// A blob without `documentType` is treated as a Mutual NDA.
    pub fn from_value(mut value: JsonValue) -> Result<Self, DocumentError> {
        let object = value.as_object_mut().ok_or(DocumentError::NotAnObject)?;
        if !object.contains_key(TYPE_KEY) {
            object.insert(
                TYPE_KEY.to_string(),
                JsonValue::String(DocumentType::MutualNda.as_str().to_string()),
            );
        }

        validate_document_schema(&value).map_err(DocumentError::SchemaError)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Load from a file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }

    /// The persisted shape: a flat camelCase record tagged by `documentType`.
    pub fn to_value(&self) -> Result<JsonValue, DocumentError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed persisted JSON.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MndaTermType, PartyInfo};

    const SAVED_NDA: &str = r#"{
        "documentType": "mutual_nda",
        "purpose": "Evaluating a partnership",
        "effectiveDate": "2024-06-15",
        "governingLaw": "Delaware",
        "jurisdiction": "New Castle County, Delaware",
        "mndaTermType": "continues",
        "mndaTermYears": 2,
        "confidentialityTermType": "years",
        "confidentialityTermYears": "3",
        "modifications": "",
        "party1": {"name": "Jane", "title": "CEO", "company": "Acme", "noticeAddress": "jane@acme.test", "date": ""},
        "party2": {"name": "", "title": "", "company": "Tech Corp", "noticeAddress": "", "date": ""}
    }"#;

    #[test]
    fn test_load_saved_nda() {
        let state = DocumentState::from_json(SAVED_NDA).unwrap();
        assert_eq!(state.document_type(), DocumentType::MutualNda);
        assert_eq!(state.common.governing_law, "Delaware");
        assert_eq!(state.common.party1.company, "Acme");

        let nda = state.mutual_nda().unwrap();
        assert_eq!(nda.mnda_term_type, MndaTermType::Continues);
        assert_eq!(nda.mnda_term_years.get(), 2);
        assert_eq!(nda.confidentiality_term_years.get(), 3);
    }

    #[test]
    fn test_missing_type_defaults_to_mutual_nda() {
        let state = DocumentState::from_json(r#"{"purpose": "Test"}"#).unwrap();
        assert_eq!(state.document_type(), DocumentType::MutualNda);
        assert_eq!(state.common.purpose, "Test");
        assert_eq!(state.common.party2, PartyInfo::default());
    }

    #[test]
    fn test_round_trip_through_persisted_value() {
        let state = DocumentState::from_json(SAVED_NDA).unwrap();
        let value = state.to_value().unwrap();
        let reloaded = DocumentState::from_value(value).unwrap();
        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_load_yaml() {
        let yaml = r#"
documentType: sla
purpose: "Hosting"
uptimeTarget: "99.95%"
party1:
  company: "Cloudco"
"#;
        let state = DocumentState::from_yaml(yaml).unwrap();
        assert_eq!(state.document_type(), DocumentType::Sla);
        assert_eq!(state.field_value("uptimeTarget").as_deref(), Some("99.95%"));
        assert_eq!(state.common.party1.company, "Cloudco");
    }

    #[test]
    fn test_rejects_non_object() {
        let result = DocumentState::from_json("[1, 2, 3]");
        assert!(matches!(result, Err(DocumentError::NotAnObject)));
    }

    #[test]
    fn test_rejects_unknown_document_type() {
        let result = DocumentState::from_json(r#"{"documentType": "lease"}"#);
        assert!(matches!(result, Err(DocumentError::SchemaError(_))));
    }

    #[test]
    fn test_rejects_corrupted_party() {
        let result = DocumentState::from_json(r#"{"party1": {"name": 42}}"#);
        assert!(matches!(result, Err(DocumentError::SchemaError(_))));
    }
}
