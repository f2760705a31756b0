//! Application parameter record.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `parameters`.
pub mod fields {
    /// Failed login attempts allowed before an account is blocked.
    pub const MAX_LOGIN_ATTEMPTS: &str = "max_login_attempts";
    /// Session duration in minutes.
    pub const SESSION_DURATION: &str = "session_duration";
}

/// A tunable application setting, synchronized so every deployment reads
/// the same values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Failed login attempts allowed before an account is blocked.
    pub max_login_attempts: Option<i64>,
    /// Session duration in minutes.
    pub session_duration: Option<i64>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for Parameter {
    const TYPE_NAME: &'static str = "parameters";

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
            .with(fields::MAX_LOGIN_ATTEMPTS, self.max_login_attempts)
            .with(fields::SESSION_DURATION, self.session_duration)
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.max_login_attempts = document.get_i64(fields::MAX_LOGIN_ATTEMPTS);
        self.session_duration = document.get_i64(fields::SESSION_DURATION);
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let parameter = Parameter {
            id: Some(1),
            max_login_attempts: Some(5),
            session_duration: Some(30),
            synced: Some(false),
            last_modified: None,
        };

        let mut back = Parameter::default();
        back.apply_scalar_fields(&parameter.to_document());
        assert_eq!(back.max_login_attempts, parameter.max_login_attempts);
        assert_eq!(back.session_duration, parameter.session_duration);
    }
}
