//! Report photo record.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `report_photos`.
pub mod fields {
    /// Local storage path of the decoded image.
    pub const PHOTO_PATH: &str = "photo_path";
    /// When the photo was taken.
    pub const CREATED_AT: &str = "created_at";
    /// Required relation to `reports` (the parent report).
    pub const REPORT_ID: &str = "report_id";
    /// Inbound base64 payload, write-only from the remote side. Decoded
    /// into local storage during pull and never re-emitted on push.
    pub const PHOTO: &str = "photo";
}

/// A photo attached to a report.
///
/// The one entity type whose document carries an embedded binary payload:
/// the remote side writes a base64 `photo` field, the sync engine decodes
/// it to disk and keeps only the storage path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Photo {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Relative storage path of the decoded image, populated by the media
    /// decoder.
    pub photo_path: Option<String>,
    /// When the photo was taken.
    pub created_at: Option<DateTime<Utc>>,
    /// Required relation to [`super::Report`], assigned by relation
    /// resolution.
    pub report_id: Option<i64>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for Photo {
    const TYPE_NAME: &'static str = "report_photos";

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
        // The inbound base64 payload is never re-emitted; pushes carry the
        // storage path reference instead.
        Document::new()
            .with(keys::ID, self.id)
            .with(fields::PHOTO_PATH, self.photo_path.clone())
            .with(fields::CREATED_AT, self.created_at)
            .with(fields::REPORT_ID, self.report_id)
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        // photo_path is populated by the media decoder on pull; an absent
        // or null document field must not blank a previously stored path.
        if document.has_value(fields::PHOTO_PATH) {
            self.photo_path = document.get_str(fields::PHOTO_PATH).map(str::to_string);
        }
        self.created_at = document.get_datetime(fields::CREATED_AT);
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}
