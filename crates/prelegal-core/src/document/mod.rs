//! Document state model, persistence parsing and validation.
//!
//! Saved documents are flat JSON records tagged by `documentType`. Blobs are
//! validated against `schema/document.schema.json` before they are
//! deserialized into a [`DocumentState`].

mod parser;
mod schema;
mod types;

pub use parser::DocumentError;
pub use schema::{is_valid_document, validate_document_schema};
pub use types::{
    AiAddendumFields, BaaFields, CloudServiceFields, CommonFields, ConfidentialityTermType,
    DesignPartnerFields, DocumentFields, DocumentState, DocumentType, DpaFields, MndaTermType,
    MutualNdaFields, PartnershipFields, PartyInfo, PilotFields, ProfessionalServicesFields,
    SlaFields, SoftwareLicenseFields, TermYears, UnknownDocumentType,
};
