//! Document-type field registry.
//!
//! Maps each document type to the labelled fields and party labels used by
//! the generic cover-page renderer. Mutual NDA, Cloud Service and Pilot have
//! dedicated renderers, so they fall back to the generic configuration.

use crate::document::DocumentType;

/// A renderable field: wire key plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    pub key: &'static str,
    pub label: &'static str,
}

/// Labelled field list and party labels for one document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentFieldConfig {
    pub fields: &'static [FieldConfig],
    pub party1_label: &'static str,
    pub party2_label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FieldConfig {
    FieldConfig { key, label }
}

const GENERIC: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[],
    party1_label: "Party 1",
    party2_label: "Party 2",
};

const DESIGN_PARTNER: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("programName", "Program Name"),
        field("feedbackRequirements", "Feedback Requirements"),
        field("accessPeriod", "Access Period"),
    ],
    party1_label: "Provider",
    party2_label: "Design Partner",
};

const SLA: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("uptimeTarget", "Uptime Target"),
        field("responseTimeCommitment", "Response Time Commitment"),
        field("serviceCredits", "Service Credits"),
    ],
    party1_label: "Provider",
    party2_label: "Customer",
};

const PROFESSIONAL_SERVICES: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("deliverables", "Deliverables"),
        field("projectTimeline", "Project Timeline"),
        field("fees", "Fees"),
        field("paymentSchedule", "Payment Schedule"),
        field("ipOwnership", "IP Ownership"),
    ],
    party1_label: "Provider",
    party2_label: "Client",
};

const PARTNERSHIP: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("partnershipScope", "Partnership Scope"),
        field("trademarkRights", "Trademark Rights"),
        field("revenueShare", "Revenue Share"),
        field("fees", "Fees"),
    ],
    party1_label: "Partner 1",
    party2_label: "Partner 2",
};

const SOFTWARE_LICENSE: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("licensedSoftware", "Licensed Software"),
        field("licenseType", "License Type"),
        field("licenseFees", "License Fees"),
        field("supportTerms", "Support Terms"),
    ],
    party1_label: "Licensor",
    party2_label: "Licensee",
};

const DPA: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("dataSubjects", "Data Subjects"),
        field("processingPurpose", "Processing Purpose"),
        field("dataCategories", "Data Categories"),
        field("subprocessors", "Subprocessors"),
    ],
    party1_label: "Data Processor",
    party2_label: "Data Controller",
};

const BAA: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("phiDescription", "PHI Description"),
        field("permittedUses", "Permitted Uses"),
        field("safeguards", "Security Safeguards"),
    ],
    party1_label: "Business Associate",
    party2_label: "Covered Entity",
};

const AI_ADDENDUM: DocumentFieldConfig = DocumentFieldConfig {
    fields: &[
        field("aiFeatures", "AI Features"),
        field("trainingDataRights", "Training Data Rights"),
        field("outputOwnership", "Output Ownership"),
    ],
    party1_label: "AI Provider",
    party2_label: "Customer",
};

/// Field configuration for a document type.
pub fn field_config(document_type: DocumentType) -> DocumentFieldConfig {
    match document_type {
        DocumentType::DesignPartner => DESIGN_PARTNER,
        DocumentType::Sla => SLA,
        DocumentType::ProfessionalServices => PROFESSIONAL_SERVICES,
        DocumentType::Partnership => PARTNERSHIP,
        DocumentType::SoftwareLicense => SOFTWARE_LICENSE,
        DocumentType::Dpa => DPA,
        DocumentType::Baa => BAA,
        DocumentType::AiAddendum => AI_ADDENDUM,
        DocumentType::MutualNda | DocumentType::CloudService | DocumentType::Pilot => GENERIC,
    }
}

/// Field configuration for a raw type string; unknown strings get the
/// generic configuration.
pub fn field_config_for_str(document_type: &str) -> DocumentFieldConfig {
    DocumentType::parse(document_type)
        .map(field_config)
        .unwrap_or(GENERIC)
}
