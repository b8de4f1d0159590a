//! System prompt for the drafting assistant.
//!
//! The prompt is assembled from three parts:
//! 1. Role and collection guidelines (static)
//! 2. Document catalog with each type's extractable keys (derived from the
//!    core data model, so it never drifts from what the reconciler accepts)
//! 3. Reply format and today's date

use chrono::NaiveDate;
use prelegal_core::{DocumentFields, DocumentType};

/// Opening message shown before the user has said anything.
pub const GREETING: &str = "Hello! I'll help you draft a legal agreement. Tell me what you're working on, for example an NDA with a prospective partner, a pilot with a new customer, or a data processing agreement, and I'll guide you through the details.";

const ROLE_PROMPT: &str = r#"You are a friendly legal assistant helping users draft standard commercial agreements.

Your job is to have a natural conversation to gather the information needed for the agreement. Ask questions one or two at a time in a conversational way.

Guidelines:
- First work out which supported document the user needs and set documentType
- If the user asks for a document that is not supported, explain that and set suggestedDocument to the closest supported type
- Be conversational and helpful, not robotic
- When users give information, acknowledge it naturally
- Suggest reasonable defaults when appropriate (e.g. today's date for the effective date, 1 year for terms)
- Convert relative dates like "today" or "next Monday" to YYYY-MM-DD
- Required fields for every document: purpose, effectiveDate, governingLaw, jurisdiction, and both parties' company names
- When you have ALL required information, summarize the details and set isComplete to true
- Only set isComplete to true when you have gathered all required information and confirmed it with the user"#;

const REPLY_FORMAT: &str = r#"Reply with a single JSON object:
- "response": your conversational reply to the user (always present)
- "documentType": one of the type ids above, once known
- "suggestedDocument": closest supported type id, only when the request is unsupported
- "isComplete": true or false
- Any field keys listed for the current document type, only for information the user has provided so far
- "party1" / "party2": objects with "name", "title", "company", "noticeAddress", "date"

Omit keys you have no information for. Use YYYY-MM-DD for every date."#;

/// Field keys that can be extracted for a document type, common keys first.
pub fn extractable_keys(document_type: DocumentType) -> Vec<String> {
    let mut keys: Vec<String> = ["purpose", "effectiveDate", "governingLaw", "jurisdiction"]
        .iter()
        .map(|k| k.to_string())
        .collect();

    if let Ok(serde_json::Value::Object(specific)) =
        serde_json::to_value(DocumentFields::defaults_for(document_type))
    {
        keys.extend(specific.into_iter().map(|(k, _)| k).filter(|k| k != "documentType"));
    }
    keys
}

/// Catalog of supported documents, one entry per line.
pub fn document_catalog() -> String {
    DocumentType::ALL
        .iter()
        .map(|&t| {
            let (name, description) = t.catalog_entry();
            format!(
                "- {} (id: {}): {}\n  Fields: {}",
                name,
                t.as_str(),
                description,
                extractable_keys(t).join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full system prompt for a conversation happening on `today`.
pub fn build_system_prompt(today: NaiveDate) -> String {
    format!(
        "{}\n\nSupported documents:\n{}\n\n{}\n\nToday's date is {}.",
        ROLE_PROMPT,
        document_catalog(),
        REPLY_FORMAT,
        today.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_every_type() {
        let catalog = document_catalog();
        for doc_type in DocumentType::ALL {
            assert!(catalog.contains(&format!("(id: {})", doc_type.as_str())));
        }
        assert_eq!(catalog.lines().filter(|l| l.starts_with("- ")).count(), 11);
    }

    #[test]
    fn test_extractable_keys() {
        let keys = extractable_keys(DocumentType::MutualNda);
        assert_eq!(keys[0], "purpose");
        assert!(keys.contains(&"mndaTermYears".to_string()));
        assert!(!keys.contains(&"documentType".to_string()));

        let baa = extractable_keys(DocumentType::Baa);
        assert!(baa.contains(&"safeguards".to_string()));
        assert!(!baa.contains(&"mndaTermType".to_string()));
    }

    #[test]
    fn test_system_prompt_carries_date() {
        let prompt = build_system_prompt(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
        assert!(prompt.contains("Today's date is 2025-03-09."));
        assert!(prompt.contains("Business Associate Agreement"));
        assert!(prompt.contains("\"isComplete\""));
    }
}
