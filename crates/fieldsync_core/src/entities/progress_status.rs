//! Progress status lookup value.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `progress_statuses`.
pub mod fields {
    /// Status label.
    pub const LABEL: &str = "label";
}

/// A lookup value for the state of a progress record
/// (e.g. "open", "in progress", "done").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressStatus {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Status label.
    pub label: String,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for ProgressStatus {
    const TYPE_NAME: &'static str = "progress_statuses";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn synced(&self) -> Option<bool> {
        self.synced
    }

    fn set_synced(&mut self, synced: Option<bool>) {
        self.synced = synced;
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    fn to_document(&self) -> Document {
        Document::new()
            .with(keys::ID, self.id)
            .with(fields::LABEL, self.label.as_str())
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.label = document
            .get_str(fields::LABEL)
            .unwrap_or_default()
            .to_string();
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}
