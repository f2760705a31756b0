//! Application user.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `users`.
pub mod fields {
    /// Login email.
    pub const EMAIL: &str = "email";
    /// Password hash.
    pub const PASSWORD: &str = "password";
    /// Required relation to `roles`.
    pub const ROLE_ID: &str = "role_id";
}

/// An application user. Requires a role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Login email.
    pub email: String,
    /// Password hash.
    pub password: String,
    /// Required relation to [`super::Role`], assigned by relation
    /// resolution, never by `apply_scalar_fields`.
    pub role_id: Option<i64>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for User {
    const TYPE_NAME: &'static str = "users";

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
            .with(fields::EMAIL, self.email.as_str())
            .with(fields::PASSWORD, self.password.as_str())
            .with(fields::ROLE_ID, self.role_id)
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.email = document
            .get_str(fields::EMAIL)
            .unwrap_or_default()
            .to_string();
        self.password = document
            .get_str(fields::PASSWORD)
            .unwrap_or_default()
            .to_string();
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_is_serialized_but_never_applied() {
        let user = User {
            id: Some(1),
            email: "a@b.cd".into(),
            password: "hash".into(),
            role_id: Some(5),
            synced: Some(true),
            last_modified: None,
        };

        let doc = user.to_document();
        assert_eq!(doc.get_i64(fields::ROLE_ID), Some(5));

        let mut back = User::default();
        back.apply_scalar_fields(&doc);
        assert_eq!(back.email, "a@b.cd");
        // Relation resolution is a separate step.
        assert_eq!(back.role_id, None);
    }
}
