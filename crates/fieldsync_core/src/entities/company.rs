//! Contractor company.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document};

/// Document field keys for `companies`.
pub mod fields {
    /// Company name.
    pub const NAME: &str = "name";
    /// Optional contact email.
    pub const CONTACT_EMAIL: &str = "contact_email";
}

/// A contractor company that can be assigned to a report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Company {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Company name.
    pub name: String,
    /// Optional contact email.
    pub contact_email: Option<String>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for Company {
    const TYPE_NAME: &'static str = "companies";

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
            .with(fields::CONTACT_EMAIL, self.contact_email.clone())
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.name = document
            .get_str(fields::NAME)
            .unwrap_or_default()
            .to_string();
        self.contact_email = document
            .get_str(fields::CONTACT_EMAIL)
            .map(str::to_string);
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let company = Company {
            id: Some(6),
            name: "Roadworks Ltd".into(),
            contact_email: Some("office@roadworks.example".into()),
            synced: Some(false),
            last_modified: None,
        };

        let doc = company.to_document();
        assert_eq!(doc.id(), Some(6));
        assert!(doc.synchro());

        let mut back = Company::default();
        back.apply_scalar_fields(&doc);
        assert_eq!(back.name, company.name);
        assert_eq!(back.contact_email, company.contact_email);
    }

    #[test]
    fn absent_contact_email_reads_as_none() {
        let mut company = Company {
            contact_email: Some("stale@roadworks.example".into()),
            ..Company::default()
        };

        company.apply_scalar_fields(&Document::new());
        assert_eq!(company.contact_email, None);
    }
}
