//! Report progress record.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `report_progress`.
pub mod fields {
    /// When the progress was recorded.
    pub const CREATED_AT: &str = "created_at";
    /// Optional free-text comment.
    pub const COMMENT: &str = "comment";
    /// Required relation to `users` (who recorded the progress).
    pub const USER_ID: &str = "user_id";
    /// Required relation to `progress_statuses`.
    pub const STATUS_ID: &str = "status_id";
    /// Required relation to `reports` (the parent report).
    pub const REPORT_ID: &str = "report_id";
}

/// A progress entry on a report. All three relations are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// When the progress was recorded.
    pub created_at: Option<DateTime<Utc>>,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Required relation to [`super::User`], assigned by relation
    /// resolution.
    pub user_id: Option<i64>,
    /// Required relation to [`super::ProgressStatus`], assigned by relation
    /// resolution.
    pub status_id: Option<i64>,
    /// Required relation to [`super::Report`], assigned by relation
    /// resolution.
    pub report_id: Option<i64>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for Progress {
    const TYPE_NAME: &'static str = "report_progress";

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
            .with(fields::CREATED_AT, self.created_at)
            .with(fields::COMMENT, self.comment.clone())
            .with(fields::USER_ID, self.user_id)
            .with(fields::STATUS_ID, self.status_id)
            .with(fields::REPORT_ID, self.report_id)
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.created_at = document.get_datetime(fields::CREATED_AT);
        self.comment = document.get_str(fields::COMMENT).map(str::to_string);
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip_skips_relations() {
        let progress = Progress {
            id: Some(4),
            comment: Some("resurfacing started".into()),
            user_id: Some(1),
            status_id: Some(2),
            report_id: Some(3),
            synced: Some(false),
            ..Progress::default()
        };

        let doc = progress.to_document();
        assert_eq!(doc.get_i64(fields::USER_ID), Some(1));
        assert_eq!(doc.get_i64(fields::STATUS_ID), Some(2));
        assert_eq!(doc.get_i64(fields::REPORT_ID), Some(3));

        let mut back = Progress::default();
        back.apply_scalar_fields(&doc);
        assert_eq!(back.comment, progress.comment);
        assert_eq!(back.user_id, None);
        assert_eq!(back.status_id, None);
        assert_eq!(back.report_id, None);
    }
}
