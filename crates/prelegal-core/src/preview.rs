//! Plain-text cover page preview.
//!
//! Mutual NDA, Cloud Service and Pilot have dedicated layouts. Every other
//! type is laid out from the field registry.

use std::fmt;

use crate::document::{DocumentFields, DocumentState, PartyInfo};
use crate::registry::field_config;
use crate::text::{
    confidentiality_term_text, format_date, mnda_term_text, placeholder, placeholder_or,
};

/// One labelled line of the cover page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverSection {
    pub label: String,
    pub value: String,
}

/// Signature block for one party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBlock {
    pub label: String,
    pub company: String,
    pub name: String,
    pub title: String,
    pub notice_address: String,
    pub date: String,
}

/// A rendered cover page, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverPage {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<CoverSection>,
    pub signing_statement: String,
    pub signatures: [SignatureBlock; 2],
}

fn section(label: &str, value: impl Into<String>) -> CoverSection {
    CoverSection {
        label: label.to_string(),
        value: value.into(),
    }
}

fn filled(label: &str, value: &str, fallback: &str) -> CoverSection {
    section(label, placeholder_or(value, fallback))
}

fn signature(label: &str, party: &PartyInfo) -> SignatureBlock {
    SignatureBlock {
        label: label.to_string(),
        company: placeholder(&party.company).to_string(),
        name: placeholder(&party.name).to_string(),
        title: placeholder(&party.title).to_string(),
        notice_address: placeholder(&party.notice_address).to_string(),
        date: format_date(&party.date),
    }
}

/// Lay out the cover page for the current state.
pub fn cover_page(state: &DocumentState) -> CoverPage {
    let common = &state.common;
    let document_type = state.document_type();
    let name = document_type.display_name();
    let config = field_config(document_type);

    let mut sections = Vec::new();
    let (title, subtitle, signing_statement) = match &state.fields {
        DocumentFields::MutualNda(nda) => {
            sections.push(filled(
                "Purpose",
                &common.purpose,
                "[How Confidential Information may be used]",
            ));
            sections.push(section("Effective Date", format_date(&common.effective_date)));
            sections.push(section("MNDA Term", mnda_term_text(nda)));
            sections.push(section(
                "Term of Confidentiality",
                confidentiality_term_text(nda),
            ));
            push_governing_law(&mut sections, state);
            if !nda.modifications.is_empty() {
                sections.push(section("Modifications", nda.modifications.clone()));
            }
            (
                "Mutual Non-Disclosure Agreement".to_string(),
                "Common Paper Mutual NDA Standard Terms Version 1.0".to_string(),
                "By signing this Cover Page, each party agrees to enter into this MNDA as of the Effective Date.".to_string(),
            )
        }
        DocumentFields::CloudService(f) => {
            sections.push(filled("Provider", &f.provider_name, "[Provider name]"));
            sections.push(filled("Customer", &f.customer_name, "[Customer name]"));
            sections.push(filled(
                "Cloud Service Description",
                &common.purpose,
                "[Description of the cloud service]",
            ));
            sections.push(section("Effective Date", format_date(&common.effective_date)));
            sections.push(filled("Subscription Period", &f.subscription_period, "[Duration]"));
            sections.push(filled(
                "Technical Support",
                &f.technical_support,
                "[Support level description]",
            ));
            sections.push(filled("Fees", &f.fees, "[Pricing structure]"));
            sections.push(filled("Payment Terms", &f.payment_terms, "[Payment schedule]"));
            push_governing_law(&mut sections, state);
            standard_headings(name)
        }
        DocumentFields::Pilot(f) => {
            sections.push(filled("Provider", &f.provider_name, "[Provider name]"));
            sections.push(filled("Customer", &f.customer_name, "[Customer name]"));
            sections.push(filled(
                "Product / Purpose",
                &common.purpose,
                "[Product being piloted]",
            ));
            sections.push(section("Effective Date", format_date(&common.effective_date)));
            sections.push(filled("Pilot Period", &f.pilot_period, "[Duration of pilot]"));
            sections.push(filled(
                "Evaluation Purpose",
                &f.evaluation_purpose,
                "[What will be evaluated]",
            ));
            sections.push(filled(
                "General Cap Amount",
                &f.general_cap_amount,
                "[Liability cap]",
            ));
            push_governing_law(&mut sections, state);
            standard_headings(name)
        }
        _ => {
            sections.push(filled("Purpose", &common.purpose, "[Purpose of agreement]"));
            sections.push(section("Effective Date", format_date(&common.effective_date)));
            for field in config.fields {
                let value = state.field_value(field.key).unwrap_or_default();
                let fallback = format!("[{}]", field.label);
                sections.push(filled(field.label, &value, &fallback));
            }
            push_governing_law(&mut sections, state);
            standard_headings(name)
        }
    };

    let (party1_label, party2_label) = match &state.fields {
        DocumentFields::CloudService(_) | DocumentFields::Pilot(_) => ("Provider", "Customer"),
        _ => (config.party1_label, config.party2_label),
    };

    CoverPage {
        title,
        subtitle,
        sections,
        signing_statement,
        signatures: [
            signature(party1_label, &common.party1),
            signature(party2_label, &common.party2),
        ],
    }
}

fn standard_headings(name: &str) -> (String, String, String) {
    (
        name.to_string(),
        format!("Common Paper {} Standard Terms", name),
        format!(
            "By signing below, each party agrees to enter into this {} as of the Effective Date.",
            name
        ),
    )
}

fn push_governing_law(sections: &mut Vec<CoverSection>, state: &DocumentState) {
    sections.push(filled("Governing Law", &state.common.governing_law, "[State]"));
    sections.push(filled(
        "Jurisdiction",
        &state.common.jurisdiction,
        "[City/County, State]",
    ));
}

/// Render the cover page as plain text.
pub fn render_preview(state: &DocumentState) -> String {
    cover_page(state).to_string()
}

impl fmt::Display for CoverPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        writeln!(f)?;
        for s in &self.sections {
            writeln!(f, "{}: {}", s.label, s.value)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signing_statement)?;
        for block in &self.signatures {
            writeln!(f)?;
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl fmt::Display for SignatureBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.label)?;
        writeln!(f, "  Company: {}", self.company)?;
        writeln!(f, "  Signature: {}", "_".repeat(24))?;
        writeln!(f, "  Print Name: {}", self.name)?;
        writeln!(f, "  Title: {}", self.title)?;
        writeln!(f, "  Notice Address: {}", self.notice_address)?;
        writeln!(f, "  Date: {}", self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentType, MndaTermType};
    use crate::text::PLACEHOLDER;
    use chrono::NaiveDate;

    fn state(doc_type: DocumentType) -> DocumentState {
        DocumentState::new_on(doc_type, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    fn value<'a>(page: &'a CoverPage, label: &str) -> &'a str {
        page.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.value.as_str())
            .unwrap_or_else(|| panic!("no section {}", label))
    }

    #[test]
    fn test_nda_cover_page() {
        let mut nda = state(DocumentType::MutualNda);
        if let DocumentFields::MutualNda(f) = &mut nda.fields {
            f.mnda_term_type = MndaTermType::Continues;
        }
        nda.common.governing_law = "Delaware".to_string();

        let page = cover_page(&nda);
        assert_eq!(page.title, "Mutual Non-Disclosure Agreement");
        assert_eq!(value(&page, "Effective Date"), "January 15, 2024");
        assert_eq!(
            value(&page, "MNDA Term"),
            "Continues until terminated in accordance with the terms of the MNDA."
        );
        assert_eq!(value(&page, "Governing Law"), "Delaware");
        assert_eq!(value(&page, "Jurisdiction"), "[City/County, State]");
        assert!(page.sections.iter().all(|s| s.label != "Modifications"));
        assert_eq!(page.signatures[0].label, "Party 1");
        assert_eq!(page.signatures[0].company, PLACEHOLDER);
        assert_eq!(page.signatures[0].date, PLACEHOLDER);
    }

    #[test]
    fn test_registry_driven_cover_page() {
        let mut baa = state(DocumentType::Baa);
        if let DocumentFields::Baa(f) = &mut baa.fields {
            f.safeguards = "Encryption at rest".to_string();
        }
        baa.common.party2.company = "Clinic".to_string();
        baa.common.party2.date = "2024-03-01".to_string();

        let page = cover_page(&baa);
        assert_eq!(page.title, "Business Associate Agreement");
        assert_eq!(value(&page, "Security Safeguards"), "Encryption at rest");
        assert_eq!(value(&page, "PHI Description"), "[PHI Description]");
        assert_eq!(page.signatures[0].label, "Business Associate");
        assert_eq!(page.signatures[1].label, "Covered Entity");
        assert_eq!(page.signatures[1].company, "Clinic");
        assert_eq!(page.signatures[1].date, "March 1, 2024");
    }

    #[test]
    fn test_pilot_cover_page_shows_defaults() {
        let page = cover_page(&state(DocumentType::Pilot));
        assert_eq!(value(&page, "Pilot Period"), "90 days");
        assert_eq!(value(&page, "General Cap Amount"), "$0");
        assert_eq!(page.signatures[1].label, "Customer");
    }

    #[test]
    fn test_render_preview_text() {
        let mut sla = state(DocumentType::Sla);
        sla.common.party1.company = "Cloudco".to_string();
        let text = render_preview(&sla);

        assert!(text.starts_with("Service Level Agreement\n"));
        assert!(text.contains("Uptime Target: 99.9%\n"));
        assert!(text.contains("[Provider]\n  Company: Cloudco\n"));
        assert!(text.contains("Effective Date: January 15, 2024\n"));
    }
}
