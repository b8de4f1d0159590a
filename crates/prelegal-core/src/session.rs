//! Draft session: the document being drafted in one conversation.
//!
//! Sessions are values. Every transition returns a new session and leaves
//! the receiver untouched, so a caller can keep history or discard a turn
//! simply by holding on to the previous value.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{DocumentState, DocumentType};
use crate::extraction::ExtractionTurn;
use crate::reconcile::reconcile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSession {
    /// `None` until a type is selected or detected
    pub document_type: Option<DocumentType>,
    pub state: DocumentState,
    /// Set when the assistant reports every required field gathered
    pub complete: bool,
}

impl Default for DraftSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftSession {
    /// Fresh session: no type chosen yet, Mutual NDA defaults behind it.
    pub fn new() -> Self {
        Self {
            document_type: None,
            state: DocumentState::new(DocumentType::MutualNda),
            complete: false,
        }
    }

    /// Fresh session whose default state is effective on `today`.
    pub fn new_on(today: NaiveDate) -> Self {
        Self {
            document_type: None,
            state: DocumentState::new_on(DocumentType::MutualNda, today),
            complete: false,
        }
    }

    /// Switch to `document_type`, starting from its defaults.
    pub fn select_type(&self, document_type: DocumentType) -> Self {
        info!(from = ?self.document_type, to = %document_type, "Selecting document type");
        Self {
            document_type: Some(document_type),
            state: DocumentState::new(document_type),
            complete: false,
        }
    }

    /// Replace everything with a previously saved state.
    pub fn load(state: DocumentState) -> Self {
        Self {
            document_type: Some(state.document_type()),
            state,
            complete: false,
        }
    }

    /// Back to a fresh session.
    pub fn reset(&self) -> Self {
        Self::new()
    }

    /// Fold one assistant turn into the session, dated today (UTC).
    pub fn apply_turn(&self, turn: &ExtractionTurn) -> Self {
        self.apply_turn_on(turn, Utc::now().date_naive())
    }

    /// Fold one assistant turn into the session.
    ///
    /// A turn naming a different (recognized) document type first replaces
    /// the state with that type's defaults effective `today`; the turn's
    /// fields are then reconciled on top.
    pub fn apply_turn_on(&self, turn: &ExtractionTurn, today: NaiveDate) -> Self {
        let detected = turn.document_type.as_deref().and_then(DocumentType::parse);

        let (document_type, base) = match detected {
            Some(detected) if Some(detected) != self.document_type => {
                info!(
                    from = ?self.document_type,
                    to = %detected,
                    "Document type detected, resetting to defaults"
                );
                (Some(detected), DocumentState::new_on(detected, today))
            }
            _ => (self.document_type, self.state.clone()),
        };

        let state = reconcile(&base, &turn.update);
        debug!(
            changed = state != base,
            complete = turn.is_complete,
            "Applied extraction turn"
        );

        Self {
            document_type,
            state,
            complete: turn.is_complete,
        }
    }

    /// Export filename label: the type's display name, or a generic one.
    pub fn label(&self) -> &'static str {
        self.document_type
            .map(DocumentType::display_name)
            .unwrap_or("Legal Document")
    }
}
