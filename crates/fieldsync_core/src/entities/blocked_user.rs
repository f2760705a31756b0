//! Blocked-user record.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `blocked_users`.
pub mod fields {
    /// Required relation to `users`.
    pub const USER_ID: &str = "user_id";
    /// When the block was applied.
    pub const BLOCKED_AT: &str = "blocked_at";
    /// Optional free-text reason.
    pub const REASON: &str = "reason";
}

/// A block applied to a user account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockedUser {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Required relation to [`super::User`], assigned by relation
    /// resolution.
    pub user_id: Option<i64>,
    /// When the block was applied.
    pub blocked_at: Option<DateTime<Utc>>,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for BlockedUser {
    const TYPE_NAME: &'static str = "blocked_users";

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
            .with(fields::USER_ID, self.user_id)
            .with(fields::BLOCKED_AT, self.blocked_at)
            .with(fields::REASON, self.reason.clone())
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.blocked_at = document.get_datetime(fields::BLOCKED_AT);
        self.reason = document.get_str(fields::REASON).map(str::to_string);
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}
