//! Document state data model.
//!
//! A [`DocumentState`] is a flat record of common fields shared by every
//! agreement plus a [`DocumentFields`] variant carrying the fields specific
//! to one [`DocumentType`]. Empty string is the "unset" sentinel for every
//! free-text field.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::text::{parse_years_input, MIN_TERM_YEARS};

/// Supported agreement types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    MutualNda,
    CloudService,
    Pilot,
    DesignPartner,
    Sla,
    ProfessionalServices,
    Partnership,
    SoftwareLicense,
    Dpa,
    Baa,
    AiAddendum,
}

/// Returned when a string names no known document type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown document type: {0}")]
pub struct UnknownDocumentType(pub String);

impl DocumentType {
    /// Every document type, in catalog order.
    pub const ALL: [DocumentType; 11] = [
        DocumentType::MutualNda,
        DocumentType::CloudService,
        DocumentType::Pilot,
        DocumentType::DesignPartner,
        DocumentType::Sla,
        DocumentType::ProfessionalServices,
        DocumentType::Partnership,
        DocumentType::SoftwareLicense,
        DocumentType::Dpa,
        DocumentType::Baa,
        DocumentType::AiAddendum,
    ];

    /// Wire identifier (e.g. `"mutual_nda"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::MutualNda => "mutual_nda",
            DocumentType::CloudService => "cloud_service",
            DocumentType::Pilot => "pilot",
            DocumentType::DesignPartner => "design_partner",
            DocumentType::Sla => "sla",
            DocumentType::ProfessionalServices => "professional_services",
            DocumentType::Partnership => "partnership",
            DocumentType::SoftwareLicense => "software_license",
            DocumentType::Dpa => "dpa",
            DocumentType::Baa => "baa",
            DocumentType::AiAddendum => "ai_addendum",
        }
    }

    /// Short display name, also used as the export filename prefix.
    pub fn display_name(self) -> &'static str {
        match self {
            DocumentType::MutualNda => "Mutual NDA",
            DocumentType::CloudService => "Cloud Service Agreement",
            DocumentType::Pilot => "Pilot Agreement",
            DocumentType::DesignPartner => "Design Partner Agreement",
            DocumentType::Sla => "Service Level Agreement",
            DocumentType::ProfessionalServices => "Professional Services Agreement",
            DocumentType::Partnership => "Partnership Agreement",
            DocumentType::SoftwareLicense => "Software License Agreement",
            DocumentType::Dpa => "Data Processing Agreement",
            DocumentType::Baa => "Business Associate Agreement",
            DocumentType::AiAddendum => "AI Addendum",
        }
    }

    /// Catalog name and description shown to the chat model.
    pub fn catalog_entry(self) -> (&'static str, &'static str) {
        match self {
            DocumentType::MutualNda => (
                "Mutual Non-Disclosure Agreement",
                "A standard mutual NDA for protecting confidential information exchanged between two parties evaluating a potential business relationship.",
            ),
            DocumentType::CloudService => (
                "Cloud Service Agreement",
                "A comprehensive agreement for selling and buying cloud software and SaaS products, covering access, payment, security, liability, and confidentiality.",
            ),
            DocumentType::Pilot => (
                "Pilot Agreement",
                "A short-term trial or evaluation agreement allowing prospective customers to test a product before committing to a longer-term deal.",
            ),
            DocumentType::DesignPartner => (
                "Design Partner Agreement",
                "An agreement for early product access where partners provide feedback in exchange for using pre-release software.",
            ),
            DocumentType::Sla => (
                "Service Level Agreement",
                "A standard SLA defining uptime targets, response time commitments, service credits, and remedies for cloud service providers.",
            ),
            DocumentType::ProfessionalServices => (
                "Professional Services Agreement",
                "An agreement for professional services engagements covering deliverables, intellectual property, payment terms, and project management.",
            ),
            DocumentType::Partnership => (
                "Partnership Agreement",
                "A standard agreement for business partnerships covering cooperation obligations, trademark licensing, fees, confidentiality, and liability.",
            ),
            DocumentType::SoftwareLicense => (
                "Software License Agreement",
                "A comprehensive license agreement for on-premise or installable software, covering licensing terms, restrictions, warranties, and support.",
            ),
            DocumentType::Dpa => (
                "Data Processing Agreement",
                "A GDPR-compliant data processing agreement covering data protection obligations, subprocessors, international transfers, and security requirements.",
            ),
            DocumentType::Baa => (
                "Business Associate Agreement",
                "A HIPAA-compliant agreement for business associates handling protected health information (PHI).",
            ),
            DocumentType::AiAddendum => (
                "AI Addendum",
                "An addendum for agreements involving AI/ML features, covering input/output ownership, model training restrictions, and AI-specific disclaimers.",
            ),
        }
    }

    /// Lenient parse used on model output: lower-cases and maps `-` to `_`.
    ///
    /// Returns `None` for empty or unrecognized strings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownDocumentType(s.to_string()))
    }
}

/// One signing party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyInfo {
    pub name: String,
    pub title: String,
    pub company: String,
    pub notice_address: String,
    /// Usually `YYYY-MM-DD` or empty; kept verbatim otherwise
    pub date: String,
}

/// How long the MNDA itself lasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MndaTermType {
    #[default]
    Expires,
    Continues,
}

impl MndaTermType {
    pub fn as_str(self) -> &'static str {
        match self {
            MndaTermType::Expires => "expires",
            MndaTermType::Continues => "continues",
        }
    }
}

// Unrecognized literals resolve to the default.
impl From<String> for MndaTermType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "continues" => MndaTermType::Continues,
            _ => MndaTermType::Expires,
        }
    }
}

impl From<MndaTermType> for String {
    fn from(value: MndaTermType) -> Self {
        value.as_str().to_string()
    }
}

/// How long confidential information stays protected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConfidentialityTermType {
    #[default]
    Years,
    Perpetuity,
}

impl ConfidentialityTermType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidentialityTermType::Years => "years",
            ConfidentialityTermType::Perpetuity => "perpetuity",
        }
    }
}

impl From<String> for ConfidentialityTermType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "perpetuity" => ConfidentialityTermType::Perpetuity,
            _ => ConfidentialityTermType::Years,
        }
    }
}

impl From<ConfidentialityTermType> for String {
    fn from(value: ConfidentialityTermType) -> Self {
        value.as_str().to_string()
    }
}

/// A year count that is always at least 1.
///
/// Every constructor routes through the same coercion rules as
/// [`parse_years_input`], including deserialization from numbers,
/// decimal numbers and strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "YearsInput", into = "u32")]
pub struct TermYears(u32);

impl TermYears {
    /// Coerce an integer: anything below 1 becomes 1.
    pub fn new(value: i64) -> Self {
        if value < i64::from(MIN_TERM_YEARS) {
            Self(MIN_TERM_YEARS)
        } else {
            Self(u32::try_from(value).unwrap_or(u32::MAX))
        }
    }

    /// Coerce raw form input.
    pub fn from_input(raw: &str) -> Self {
        Self(parse_years_input(raw))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for TermYears {
    fn default() -> Self {
        Self(MIN_TERM_YEARS)
    }
}

impl fmt::Display for TermYears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TermYears> for u32 {
    fn from(value: TermYears) -> Self {
        value.0
    }
}

/// Any shape a year count may arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum YearsInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl From<YearsInput> for TermYears {
    fn from(input: YearsInput) -> Self {
        match input {
            YearsInput::Integer(n) => TermYears::new(n),
            YearsInput::Decimal(f) if f.is_finite() => {
                let truncated = f.trunc();
                if truncated >= f64::from(u32::MAX) {
                    TermYears(u32::MAX)
                } else {
                    TermYears::new(truncated as i64)
                }
            }
            YearsInput::Decimal(_) => TermYears::default(),
            YearsInput::Text(s) => TermYears::from_input(&s),
        }
    }
}

/// Fields shared by every agreement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonFields {
    pub purpose: String,
    /// Usually `YYYY-MM-DD` or empty; kept verbatim otherwise
    pub effective_date: String,
    pub governing_law: String,
    pub jurisdiction: String,
    pub party1: PartyInfo,
    pub party2: PartyInfo,
}

/// Mutual NDA specific fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MutualNdaFields {
    pub mnda_term_type: MndaTermType,
    /// Meaningful only when `mnda_term_type` is `Expires`
    pub mnda_term_years: TermYears,
    pub confidentiality_term_type: ConfidentialityTermType,
    /// Meaningful only when `confidentiality_term_type` is `Years`
    pub confidentiality_term_years: TermYears,
    /// Empty means no modifications clause
    pub modifications: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudServiceFields {
    pub provider_name: String,
    pub customer_name: String,
    pub subscription_period: String,
    pub technical_support: String,
    pub fees: String,
    pub payment_terms: String,
}

impl Default for CloudServiceFields {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            customer_name: String::new(),
            subscription_period: "1 year".to_string(),
            technical_support: String::new(),
            fees: String::new(),
            payment_terms: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PilotFields {
    pub provider_name: String,
    pub customer_name: String,
    pub pilot_period: String,
    pub evaluation_purpose: String,
    pub general_cap_amount: String,
}

impl Default for PilotFields {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            customer_name: String::new(),
            pilot_period: "90 days".to_string(),
            evaluation_purpose: String::new(),
            general_cap_amount: "$0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignPartnerFields {
    pub provider_name: String,
    pub customer_name: String,
    pub program_name: String,
    pub feedback_requirements: String,
    pub access_period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlaFields {
    pub provider_name: String,
    pub customer_name: String,
    pub uptime_target: String,
    pub response_time_commitment: String,
    pub service_credits: String,
}

impl Default for SlaFields {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            customer_name: String::new(),
            uptime_target: "99.9%".to_string(),
            response_time_commitment: String::new(),
            service_credits: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalServicesFields {
    pub provider_name: String,
    pub customer_name: String,
    pub deliverables: String,
    pub project_timeline: String,
    pub fees: String,
    pub payment_schedule: String,
    pub ip_ownership: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnershipFields {
    pub partnership_scope: String,
    pub trademark_rights: String,
    pub revenue_share: String,
    pub fees: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoftwareLicenseFields {
    pub provider_name: String,
    pub customer_name: String,
    pub licensed_software: String,
    pub license_type: String,
    pub license_fees: String,
    pub support_terms: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DpaFields {
    pub provider_name: String,
    pub customer_name: String,
    pub data_subjects: String,
    pub processing_purpose: String,
    pub data_categories: String,
    pub subprocessors: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaaFields {
    pub provider_name: String,
    pub customer_name: String,
    pub phi_description: String,
    pub permitted_uses: String,
    pub safeguards: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiAddendumFields {
    pub provider_name: String,
    pub customer_name: String,
    pub ai_features: String,
    pub training_data_rights: String,
    pub output_ownership: String,
}

/// Type-specific fields, tagged by `documentType` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "documentType", rename_all = "snake_case")]
pub enum DocumentFields {
    MutualNda(MutualNdaFields),
    CloudService(CloudServiceFields),
    Pilot(PilotFields),
    DesignPartner(DesignPartnerFields),
    Sla(SlaFields),
    ProfessionalServices(ProfessionalServicesFields),
    Partnership(PartnershipFields),
    SoftwareLicense(SoftwareLicenseFields),
    Dpa(DpaFields),
    Baa(BaaFields),
    AiAddendum(AiAddendumFields),
}

impl DocumentFields {
    /// Default specific fields for a document type.
    pub fn defaults_for(document_type: DocumentType) -> Self {
        match document_type {
            DocumentType::MutualNda => DocumentFields::MutualNda(MutualNdaFields::default()),
            DocumentType::CloudService => {
                DocumentFields::CloudService(CloudServiceFields::default())
            }
            DocumentType::Pilot => DocumentFields::Pilot(PilotFields::default()),
            DocumentType::DesignPartner => {
                DocumentFields::DesignPartner(DesignPartnerFields::default())
            }
            DocumentType::Sla => DocumentFields::Sla(SlaFields::default()),
            DocumentType::ProfessionalServices => {
                DocumentFields::ProfessionalServices(ProfessionalServicesFields::default())
            }
            DocumentType::Partnership => DocumentFields::Partnership(PartnershipFields::default()),
            DocumentType::SoftwareLicense => {
                DocumentFields::SoftwareLicense(SoftwareLicenseFields::default())
            }
            DocumentType::Dpa => DocumentFields::Dpa(DpaFields::default()),
            DocumentType::Baa => DocumentFields::Baa(BaaFields::default()),
            DocumentType::AiAddendum => DocumentFields::AiAddendum(AiAddendumFields::default()),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            DocumentFields::MutualNda(_) => DocumentType::MutualNda,
            DocumentFields::CloudService(_) => DocumentType::CloudService,
            DocumentFields::Pilot(_) => DocumentType::Pilot,
            DocumentFields::DesignPartner(_) => DocumentType::DesignPartner,
            DocumentFields::Sla(_) => DocumentType::Sla,
            DocumentFields::ProfessionalServices(_) => DocumentType::ProfessionalServices,
            DocumentFields::Partnership(_) => DocumentType::Partnership,
            DocumentFields::SoftwareLicense(_) => DocumentType::SoftwareLicense,
            DocumentFields::Dpa(_) => DocumentType::Dpa,
            DocumentFields::Baa(_) => DocumentType::Baa,
            DocumentFields::AiAddendum(_) => DocumentType::AiAddendum,
        }
    }

    /// Look up a specific field by its wire key.
    pub fn value(&self, key: &str) -> Option<String> {
        let text = |s: &String| Some(s.clone());
        match self {
            DocumentFields::MutualNda(f) => match key {
                "mndaTermType" => Some(f.mnda_term_type.as_str().to_string()),
                "mndaTermYears" => Some(f.mnda_term_years.to_string()),
                "confidentialityTermType" => {
                    Some(f.confidentiality_term_type.as_str().to_string())
                }
                "confidentialityTermYears" => Some(f.confidentiality_term_years.to_string()),
                "modifications" => text(&f.modifications),
                _ => None,
            },
            DocumentFields::CloudService(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "subscriptionPeriod" => text(&f.subscription_period),
                "technicalSupport" => text(&f.technical_support),
                "fees" => text(&f.fees),
                "paymentTerms" => text(&f.payment_terms),
                _ => None,
            },
            DocumentFields::Pilot(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "pilotPeriod" => text(&f.pilot_period),
                "evaluationPurpose" => text(&f.evaluation_purpose),
                "generalCapAmount" => text(&f.general_cap_amount),
                _ => None,
            },
            DocumentFields::DesignPartner(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "programName" => text(&f.program_name),
                "feedbackRequirements" => text(&f.feedback_requirements),
                "accessPeriod" => text(&f.access_period),
                _ => None,
            },
            DocumentFields::Sla(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "uptimeTarget" => text(&f.uptime_target),
                "responseTimeCommitment" => text(&f.response_time_commitment),
                "serviceCredits" => text(&f.service_credits),
                _ => None,
            },
            DocumentFields::ProfessionalServices(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "deliverables" => text(&f.deliverables),
                "projectTimeline" => text(&f.project_timeline),
                "fees" => text(&f.fees),
                "paymentSchedule" => text(&f.payment_schedule),
                "ipOwnership" => text(&f.ip_ownership),
                _ => None,
            },
            DocumentFields::Partnership(f) => match key {
                "partnershipScope" => text(&f.partnership_scope),
                "trademarkRights" => text(&f.trademark_rights),
                "revenueShare" => text(&f.revenue_share),
                "fees" => text(&f.fees),
                _ => None,
            },
            DocumentFields::SoftwareLicense(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "licensedSoftware" => text(&f.licensed_software),
                "licenseType" => text(&f.license_type),
                "licenseFees" => text(&f.license_fees),
                "supportTerms" => text(&f.support_terms),
                _ => None,
            },
            DocumentFields::Dpa(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "dataSubjects" => text(&f.data_subjects),
                "processingPurpose" => text(&f.processing_purpose),
                "dataCategories" => text(&f.data_categories),
                "subprocessors" => text(&f.subprocessors),
                _ => None,
            },
            DocumentFields::Baa(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "phiDescription" => text(&f.phi_description),
                "permittedUses" => text(&f.permitted_uses),
                "safeguards" => text(&f.safeguards),
                _ => None,
            },
            DocumentFields::AiAddendum(f) => match key {
                "providerName" => text(&f.provider_name),
                "customerName" => text(&f.customer_name),
                "aiFeatures" => text(&f.ai_features),
                "trainingDataRights" => text(&f.training_data_rights),
                "outputOwnership" => text(&f.output_ownership),
                _ => None,
            },
        }
    }
}

/// The authoritative form state for one document being drafted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    #[serde(flatten)]
    pub common: CommonFields,

    #[serde(flatten)]
    pub fields: DocumentFields,
}

impl DocumentState {
    /// Fresh state for a document type, effective today (UTC).
    pub fn new(document_type: DocumentType) -> Self {
        Self::new_on(document_type, Utc::now().date_naive())
    }

    /// Fresh state for a document type with an explicit effective date.
    pub fn new_on(document_type: DocumentType, effective_date: NaiveDate) -> Self {
        Self {
            common: CommonFields {
                effective_date: effective_date.format("%Y-%m-%d").to_string(),
                ..CommonFields::default()
            },
            fields: DocumentFields::defaults_for(document_type),
        }
    }

    pub fn document_type(&self) -> DocumentType {
        self.fields.document_type()
    }

    /// Mutual NDA fields, if this is a Mutual NDA.
    pub fn mutual_nda(&self) -> Option<&MutualNdaFields> {
        match &self.fields {
            DocumentFields::MutualNda(f) => Some(f),
            _ => None,
        }
    }

    /// Resolve any field key (common or type-specific) to its current value.
    pub fn field_value(&self, key: &str) -> Option<String> {
        match key {
            "purpose" => Some(self.common.purpose.clone()),
            "effectiveDate" => Some(self.common.effective_date.clone()),
            "governingLaw" => Some(self.common.governing_law.clone()),
            "jurisdiction" => Some(self.common.jurisdiction.clone()),
            _ => self.fields.value(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_parse_normalizes() {
        assert_eq!(DocumentType::parse("mutual_nda"), Some(DocumentType::MutualNda));
        assert_eq!(DocumentType::parse("Mutual-NDA"), Some(DocumentType::MutualNda));
        assert_eq!(DocumentType::parse("AI-Addendum"), Some(DocumentType::AiAddendum));
        assert_eq!(DocumentType::parse(""), None);
        assert_eq!(DocumentType::parse("lease"), None);
        assert!("lease".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_document_type_wire_names_round_trip() {
        for doc_type in DocumentType::ALL {
            let json = serde_json::to_string(&doc_type).unwrap();
            assert_eq!(json, format!("\"{}\"", doc_type.as_str()));
            assert_eq!(DocumentType::parse(doc_type.as_str()), Some(doc_type));
        }
    }

    #[test]
    fn test_new_state_defaults() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let state = DocumentState::new_on(DocumentType::MutualNda, date);

        assert_eq!(state.common.effective_date, "2024-06-15");
        assert_eq!(state.common.purpose, "");
        assert_eq!(state.common.party1, PartyInfo::default());

        let nda = state.mutual_nda().unwrap();
        assert_eq!(nda.mnda_term_type, MndaTermType::Expires);
        assert_eq!(nda.mnda_term_years.get(), 1);
        assert_eq!(nda.confidentiality_term_type, ConfidentialityTermType::Years);
        assert_eq!(nda.confidentiality_term_years.get(), 1);
    }

    #[test]
    fn test_type_specific_defaults() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let sla = DocumentState::new_on(DocumentType::Sla, date);
        assert_eq!(sla.field_value("uptimeTarget").as_deref(), Some("99.9%"));

        let pilot = DocumentState::new_on(DocumentType::Pilot, date);
        assert_eq!(pilot.field_value("pilotPeriod").as_deref(), Some("90 days"));
        assert_eq!(pilot.field_value("generalCapAmount").as_deref(), Some("$0"));

        let cloud = DocumentState::new_on(DocumentType::CloudService, date);
        assert_eq!(cloud.field_value("subscriptionPeriod").as_deref(), Some("1 year"));
        assert_eq!(cloud.field_value("uptimeTarget"), None);
    }

    #[test]
    fn test_term_years_coercion() {
        assert_eq!(TermYears::new(0).get(), 1);
        assert_eq!(TermYears::new(-5).get(), 1);
        assert_eq!(TermYears::new(7).get(), 7);
        assert_eq!(TermYears::from_input("abc").get(), 1);

        let from_json = |v: serde_json::Value| serde_json::from_value::<TermYears>(v).unwrap();
        assert_eq!(from_json(serde_json::json!(3)).get(), 3);
        assert_eq!(from_json(serde_json::json!(0)).get(), 1);
        assert_eq!(from_json(serde_json::json!(-2)).get(), 1);
        assert_eq!(from_json(serde_json::json!(2.7)).get(), 2);
        assert_eq!(from_json(serde_json::json!("4")).get(), 4);
        assert_eq!(from_json(serde_json::json!("")).get(), 1);
    }

    #[test]
    fn test_unrecognized_term_type_resolves_to_default() {
        let t: MndaTermType = serde_json::from_value(serde_json::json!("forever")).unwrap();
        assert_eq!(t, MndaTermType::Expires);
        let c: ConfidentialityTermType =
            serde_json::from_value(serde_json::json!("Perpetuity")).unwrap();
        assert_eq!(c, ConfidentialityTermType::Perpetuity);
    }

    #[test]
    fn test_state_serializes_flat_with_tag() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let state = DocumentState::new_on(DocumentType::MutualNda, date);
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["documentType"], "mutual_nda");
        assert_eq!(value["effectiveDate"], "2024-06-15");
        assert_eq!(value["mndaTermType"], "expires");
        assert_eq!(value["mndaTermYears"], 1);
        assert_eq!(value["party1"]["noticeAddress"], "");

        let back: DocumentState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
