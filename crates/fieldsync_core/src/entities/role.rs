//! Permission role.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `roles`.
pub mod fields {
    /// Role name.
    pub const NAME: &str = "name";
}

/// A permission role, referenced by users.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Role {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Role name.
    pub name: String,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for Role {
    const TYPE_NAME: &'static str = "roles";

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
            .with(fields::NAME, self.name.as_str())
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.name = document
            .get_str(fields::NAME)
            .unwrap_or_default()
            .to_string();
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}
