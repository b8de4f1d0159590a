//! # prelegal-core
//!
//! Deterministic form-state logic for drafting legal agreements through a
//! conversation.
//!
//! A chat assistant returns a sparse set of candidate field values on every
//! turn. This crate folds those values into an authoritative
//! [`DocumentState`] and derives the human-readable text shown on a cover
//! page or used as an export filename.
//!
//! ## Key Guarantees
//!
//! 1. **Pure**: reconciliation and derived text never perform I/O
//! 2. **Total**: bad input is coerced or rendered as a placeholder, never
//!    reported as an error
//! 3. **Non-destructive merge**: a turn that found nothing never erases a
//!    known value
//!
//! ## Example
//!
//! ```rust,ignore
//! use prelegal_core::{DraftSession, ExtractionTurn, render_preview};
//!
//! let turn = ExtractionTurn::from_json(reply_json)?;
//! let session = DraftSession::new().apply_turn(&turn);
//!
//! println!("{}", render_preview(&session.state));
//! ```

pub mod document;
pub mod extraction;
pub mod preview;
pub mod reconcile;
pub mod registry;
pub mod session;
pub mod text;

// Re-export main types at crate root
pub use document::{
    CommonFields, ConfidentialityTermType, DocumentError, DocumentFields, DocumentState,
    DocumentType, MndaTermType, MutualNdaFields, PartyInfo, TermYears, UnknownDocumentType,
};
pub use extraction::{ExtractionTurn, FieldUpdate, PartialUpdate};
pub use preview::{cover_page, render_preview, CoverPage};
pub use reconcile::{merge_party, reconcile};
pub use registry::{field_config, field_config_for_str, DocumentFieldConfig, FieldConfig};
pub use session::DraftSession;
pub use text::{
    confidentiality_term_text, format_date, generate_document_filename,
    generate_document_filename_on, mnda_term_text, parse_years_input, placeholder,
    placeholder_or, sanitize_filename, PLACEHOLDER,
};
