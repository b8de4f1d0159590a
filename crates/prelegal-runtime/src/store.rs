//! Per-user document store.
//!
//! Records hold the persisted shape of a [`DocumentState`] as an untyped
//! JSON blob, so a stored document is decoded (and schema checked) only
//! when it is read back. A document owned by another user is reported as
//! not found, never as forbidden.
//!
//! The store lives in memory and can be snapshotted to a JSON file.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use prelegal_core::{DocumentError, DocumentState, DocumentType};

pub type DocumentId = u64;
pub type UserId = u64;

/// Errors from the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Stored document is corrupted: {0}")]
    Corrupted(#[from] DocumentError),

    #[error("Failed to serialize store: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access store file: {0}")]
    Io(#[from] std::io::Error),
}

/// One saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub user_id: UserId,
    pub document_type: DocumentType,
    pub title: String,
    /// Persisted `DocumentState` blob
    pub data: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Write sequence number; breaks `updated_at` ties
    revision: u64,
}

impl DocumentRecord {
    /// Decode the stored blob.
    pub fn state(&self) -> Result<DocumentState, StoreError> {
        Ok(DocumentState::from_value(self.data.clone())?)
    }
}

/// Listing entry without the blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub document_type: DocumentType,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            id: record.id,
            document_type: record.document_type,
            title: record.title.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreInner {
    next_id: DocumentId,
    revision: u64,
    records: BTreeMap<DocumentId, DocumentRecord>,
}

impl StoreInner {
    fn owned(&self, id: DocumentId, user_id: UserId) -> Result<&DocumentRecord, StoreError> {
        self.records
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .ok_or(StoreError::NotFound(id))
    }

    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    inner: RwLock<StoreInner>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a new document and return its record.
    pub fn save(
        &self,
        user_id: UserId,
        title: impl Into<String>,
        state: &DocumentState,
    ) -> Result<DocumentRecord, StoreError> {
        let data = state.to_value()?;
        let now = Utc::now();

        let mut inner = self.inner.write();
        inner.next_id += 1;
        let revision = inner.next_revision();
        let record = DocumentRecord {
            id: inner.next_id,
            user_id,
            document_type: state.document_type(),
            title: title.into(),
            data,
            created_at: now,
            updated_at: now,
            revision,
        };
        inner.records.insert(record.id, record.clone());

        info!(id = record.id, user_id, document_type = %record.document_type, "Saved document");
        Ok(record)
    }

    /// The user's documents, most recently updated first.
    pub fn list(&self, user_id: UserId) -> Vec<DocumentSummary> {
        let inner = self.inner.read();
        let mut records: Vec<&DocumentRecord> = inner
            .records
            .values()
            .filter(|r| r.user_id == user_id)
            .collect();
        records.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(b.revision.cmp(&a.revision))
        });
        records.into_iter().map(DocumentSummary::from).collect()
    }

    pub fn get(&self, id: DocumentId, user_id: UserId) -> Result<DocumentRecord, StoreError> {
        self.inner.read().owned(id, user_id).cloned()
    }

    /// Fetch and decode a document for loading into a session.
    pub fn load(&self, id: DocumentId, user_id: UserId) -> Result<DocumentState, StoreError> {
        let state = self.get(id, user_id)?.state()?;
        debug!(id, user_id, "Loaded document");
        Ok(state)
    }

    /// Replace a document's title and contents.
    pub fn update(
        &self,
        id: DocumentId,
        user_id: UserId,
        title: impl Into<String>,
        state: &DocumentState,
    ) -> Result<DocumentRecord, StoreError> {
        let data = state.to_value()?;

        let mut inner = self.inner.write();
        inner.owned(id, user_id)?;
        let revision = inner.next_revision();
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        record.title = title.into();
        record.document_type = state.document_type();
        record.data = data;
        record.updated_at = Utc::now().max(record.updated_at);
        record.revision = revision;

        info!(id, user_id, "Updated document");
        Ok(record.clone())
    }

    pub fn delete(&self, id: DocumentId, user_id: UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.owned(id, user_id)?;
        inner.records.remove(&id);
        info!(id, user_id, "Deleted document");
        Ok(())
    }

    /// Write a JSON snapshot of the whole store.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&*self.inner.read())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Open a snapshot, or start empty when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let inner: StoreInner = serde_json::from_str(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), documents = inner.records.len(), "Opened document store");
        Ok(Self {
            inner: RwLock::new(inner),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn nda(company: &str) -> DocumentState {
        let mut state = DocumentState::new_on(
            DocumentType::MutualNda,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        );
        state.common.party1.company = company.to_string();
        state
    }

    #[test]
    fn test_save_and_load() {
        let store = DocumentStore::new();
        let record = store.save(1, "Acme NDA", &nda("Acme")).unwrap();

        assert_eq!(record.document_type, DocumentType::MutualNda);
        assert_eq!(record.data["documentType"], "mutual_nda");
        assert_eq!(store.load(record.id, 1).unwrap(), nda("Acme"));
    }

    #[test]
    fn test_list_most_recent_first() {
        let store = DocumentStore::new();
        let first = store.save(1, "First", &nda("A")).unwrap();
        let second = store.save(1, "Second", &nda("B")).unwrap();
        store.save(2, "Other user", &nda("C")).unwrap();

        let titles: Vec<_> = store.list(1).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["Second", "First"]);

        store.update(first.id, 1, "First (edited)", &nda("A2")).unwrap();
        let ids: Vec<_> = store.list(1).into_iter().map(|s| s.id).collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[test]
    fn test_cross_user_access_is_not_found() {
        let store = DocumentStore::new();
        let record = store.save(1, "Mine", &nda("Acme")).unwrap();

        assert!(matches!(store.get(record.id, 2), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update(record.id, 2, "Hijack", &nda("Evil")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(record.id, 2), Err(StoreError::NotFound(_))));
        assert_eq!(store.get(record.id, 1).unwrap().title, "Mine");
    }

    #[test]
    fn test_update_changes_type_and_preserves_created_at() {
        let store = DocumentStore::new();
        let record = store.save(1, "Draft", &nda("Acme")).unwrap();
        let sla = DocumentState::new_on(
            DocumentType::Sla,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        );

        let updated = store.update(record.id, 1, "SLA", &sla).unwrap();
        assert_eq!(updated.document_type, DocumentType::Sla);
        assert_eq!(updated.created_at, record.created_at);
        assert!(updated.updated_at >= record.updated_at);
    }

    #[test]
    fn test_delete() {
        let store = DocumentStore::new();
        let record = store.save(1, "Gone", &nda("Acme")).unwrap();
        store.delete(record.id, 1).unwrap();
        assert!(store.list(1).is_empty());
        assert!(matches!(store.delete(record.id, 1), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_corrupted_blob() {
        let store = DocumentStore::new();
        let record = store.save(1, "Broken", &nda("Acme")).unwrap();
        store.inner.write().records.get_mut(&record.id).unwrap().data =
            serde_json::json!({"documentType": "mutual_nda", "party1": {"name": 7}});

        assert!(matches!(store.load(record.id, 1), Err(StoreError::Corrupted(_))));
    }

    #[test]
    fn test_reconciled_free_text_dates_load_back() {
        let update = prelegal_core::PartialUpdate::from_json(
            r#"{"effectiveDate": "June 15, 2024", "party1": {"date": "next Monday"}}"#,
        )
        .unwrap();
        let state = prelegal_core::reconcile(&nda("Acme"), &update);

        let store = DocumentStore::new();
        let record = store.save(1, "Loose dates", &state).unwrap();
        let loaded = store.load(record.id, 1).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.common.effective_date, "June 15, 2024");
        assert_eq!(loaded.common.party1.date, "next Monday");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "prelegal-store-test-{}.json",
            std::process::id()
        ));
        let store = DocumentStore::new();
        let record = store.save(7, "Snapshot", &nda("Acme")).unwrap();
        store.save_to_file(&path).unwrap();

        let reopened = DocumentStore::open(&path).unwrap();
        assert_eq!(reopened.get(record.id, 7).unwrap(), record);
        let next = reopened.save(7, "After reopen", &nda("B")).unwrap();
        assert!(next.id > record.id);

        fs::remove_file(&path).unwrap();
    }
}
