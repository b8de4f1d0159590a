//! The chat extraction contract.
//!
//! Each conversational turn returns a reply plus a sparse set of candidate
//! field values. This module parses that untyped payload into closed,
//! explicitly-optional structures at the boundary:
//!
//! - every scalar key becomes a [`FieldUpdate`], where a missing key and an
//!   explicit `null` both mean [`FieldUpdate::Absent`]
//! - party objects are normalized to [`PartyInfo`] here, with missing or
//!   null sub-fields defaulting to the empty string

use serde::{Deserialize, Deserializer};

use crate::document::{ConfidentialityTermType, MndaTermType, PartyInfo, TermYears};

/// A field that a turn either says nothing about or supplies a value for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Absent,
    Present(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Absent
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => FieldUpdate::Present(v),
            None => FieldUpdate::Absent,
        }
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, FieldUpdate::Present(_))
    }
}

impl<T: Clone> FieldUpdate<T> {
    /// Overwrite `target` when present; leave it untouched when absent.
    pub fn apply_to(&self, target: &mut T) {
        if let FieldUpdate::Present(value) = self {
            *target = value.clone();
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(FieldUpdate::from)
    }
}

/// Party object as the extractor sends it: any sub-field may be missing or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PartyExtraction {
    name: Option<String>,
    title: Option<String>,
    company: Option<String>,
    notice_address: Option<String>,
    date: Option<String>,
}

impl From<PartyExtraction> for PartyInfo {
    fn from(extraction: PartyExtraction) -> Self {
        PartyInfo {
            name: extraction.name.unwrap_or_default(),
            title: extraction.title.unwrap_or_default(),
            company: extraction.company.unwrap_or_default(),
            notice_address: extraction.notice_address.unwrap_or_default(),
            date: extraction.date.unwrap_or_default(),
        }
    }
}

fn party_update<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<FieldUpdate<PartyInfo>, D::Error> {
    let extraction = Option::<PartyExtraction>::deserialize(deserializer)?;
    Ok(extraction.map(PartyInfo::from).into())
}

/// Candidate values from one turn, covering every extractable key of every
/// document type.
///
/// Keys that do not belong to the document being drafted are carried but
/// ignored by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialUpdate {
    // Common
    pub purpose: FieldUpdate<String>,
    pub effective_date: FieldUpdate<String>,
    pub governing_law: FieldUpdate<String>,
    pub jurisdiction: FieldUpdate<String>,

    // Mutual NDA
    pub mnda_term_type: FieldUpdate<MndaTermType>,
    pub mnda_term_years: FieldUpdate<TermYears>,
    pub confidentiality_term_type: FieldUpdate<ConfidentialityTermType>,
    pub confidentiality_term_years: FieldUpdate<TermYears>,
    pub modifications: FieldUpdate<String>,

    // Shared by most commercial agreements
    pub provider_name: FieldUpdate<String>,
    pub customer_name: FieldUpdate<String>,
    pub fees: FieldUpdate<String>,

    // Cloud Service
    pub subscription_period: FieldUpdate<String>,
    pub technical_support: FieldUpdate<String>,
    pub payment_terms: FieldUpdate<String>,

    // Pilot
    pub pilot_period: FieldUpdate<String>,
    pub evaluation_purpose: FieldUpdate<String>,
    pub general_cap_amount: FieldUpdate<String>,

    // Design Partner
    pub program_name: FieldUpdate<String>,
    pub feedback_requirements: FieldUpdate<String>,
    pub access_period: FieldUpdate<String>,

    // SLA
    pub uptime_target: FieldUpdate<String>,
    pub response_time_commitment: FieldUpdate<String>,
    pub service_credits: FieldUpdate<String>,

    // Professional Services
    pub deliverables: FieldUpdate<String>,
    pub project_timeline: FieldUpdate<String>,
    pub payment_schedule: FieldUpdate<String>,
    pub ip_ownership: FieldUpdate<String>,

    // Partnership
    pub partnership_scope: FieldUpdate<String>,
    pub trademark_rights: FieldUpdate<String>,
    pub revenue_share: FieldUpdate<String>,

    // Software License
    pub licensed_software: FieldUpdate<String>,
    pub license_type: FieldUpdate<String>,
    pub license_fees: FieldUpdate<String>,
    pub support_terms: FieldUpdate<String>,

    // DPA
    pub data_subjects: FieldUpdate<String>,
    pub processing_purpose: FieldUpdate<String>,
    pub data_categories: FieldUpdate<String>,
    pub subprocessors: FieldUpdate<String>,

    // BAA
    pub phi_description: FieldUpdate<String>,
    pub permitted_uses: FieldUpdate<String>,
    pub safeguards: FieldUpdate<String>,

    // AI Addendum
    pub ai_features: FieldUpdate<String>,
    pub training_data_rights: FieldUpdate<String>,
    pub output_ownership: FieldUpdate<String>,

    // Parties
    #[serde(deserialize_with = "party_update")]
    pub party1: FieldUpdate<PartyInfo>,
    #[serde(deserialize_with = "party_update")]
    pub party2: FieldUpdate<PartyInfo>,
}

impl PartialUpdate {
    /// Parse a bare update record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True when the turn supplied nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == PartialUpdate::default()
    }
}

/// One structured reply from the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionTurn {
    /// Conversational reply shown to the user
    pub response: String,

    /// Detected document type, as the model spelled it
    #[serde(default)]
    pub document_type: Option<String>,

    /// Closest supported document when the user asked for something else
    #[serde(default)]
    pub suggested_document: Option<String>,

    /// Candidate field values
    #[serde(flatten)]
    pub update: PartialUpdate,

    /// Whether every required field has been gathered and confirmed
    #[serde(default)]
    pub is_complete: bool,
}

impl ExtractionTurn {
    /// A reply that carries no extracted fields.
    pub fn reply(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            document_type: None,
            suggested_document: None,
            update: PartialUpdate::default(),
            is_complete: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
