//! Roadwork report.

use crate::record::SyncRecord;
use chrono::{DateTime, Utc};
use fieldsync_document::{keys, Document, FieldValue, GeoPoint};

/// Document field keys for `reports`.
pub mod fields {
    /// Creation time.
    pub const CREATED_AT: &str = "created_at";
    /// Affected surface in square meters.
    pub const SURFACE: &str = "surface";
    /// Allocated budget.
    pub const BUDGET: &str = "budget";
    /// Geographic location; a native geo point on the wire, WKT locally.
    pub const LOCATION: &str = "location";
    /// Required relation to `users` (report creator).
    pub const CREATOR_ID: &str = "creator_id";
    /// Optional relation to `companies` (assigned contractor).
    pub const COMPANY_ID: &str = "company_id";
}

/// A roadwork report filed in the field.
///
/// The parent record of progress and photo records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Local identifier; remote-origin records keep their remote id.
    pub id: Option<i64>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Affected surface in square meters.
    pub surface: Option<f64>,
    /// Allocated budget. Budget computation itself is business logic that
    /// lives outside the sync engine.
    pub budget: Option<i64>,
    /// Location as WKT `POINT(lon lat)`.
    pub location: Option<String>,
    /// Required relation to [`super::User`], assigned by relation
    /// resolution.
    pub creator_id: Option<i64>,
    /// Optional relation to [`super::Company`]; unassigned until a
    /// contractor takes the report.
    pub company_id: Option<i64>,
    /// Synced flag; `Some(false)` means a push is pending.
    pub synced: Option<bool>,
    /// Last recorded modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl SyncRecord for Report {
    const TYPE_NAME: &'static str = "reports";

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
        let location = self
            .location
            .as_deref()
            .and_then(|wkt| GeoPoint::from_wkt(wkt).ok())
            .map_or(FieldValue::Null, FieldValue::GeoPoint);

        Document::new()
            .with(keys::ID, self.id)
            .with(fields::CREATED_AT, self.created_at)
            .with(fields::SURFACE, self.surface)
            .with(fields::BUDGET, self.budget)
            .with(fields::LOCATION, location)
            .with(fields::CREATOR_ID, self.creator_id)
            .with(fields::COMPANY_ID, self.company_id)
            .with(keys::SYNCHRO, true)
            .with(keys::LAST_MODIFIED, self.last_modified)
    }

    fn apply_scalar_fields(&mut self, document: &Document) {
        self.created_at = document.get_datetime(fields::CREATED_AT);
        self.surface = document.get_f64(fields::SURFACE);
        self.budget = document.get_i64(fields::BUDGET);
        self.location = document
            .get_geo_point(fields::LOCATION)
            .map(|p| p.to_wkt());
        self.synced = Some(document.synchro());
        self.last_modified = document.last_modified();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn location_crosses_the_wire_as_geo_point() {
        let report = Report {
            id: Some(1),
            location: Some("POINT(47.52 18.92)".into()),
            creator_id: Some(4),
            ..Report::default()
        };

        let doc = report.to_document();
        let point = doc.get_geo_point(fields::LOCATION).unwrap();
        assert_eq!(point.longitude, 47.52);
        assert_eq!(point.latitude, 18.92);

        let mut back = Report::default();
        back.apply_scalar_fields(&doc);
        assert_eq!(back.location.as_deref(), Some("POINT(47.52 18.92)"));
        // Relations are resolved separately.
        assert_eq!(back.creator_id, None);
        assert_eq!(back.company_id, None);
    }

    #[test]
    fn absent_scalars_overwrite_to_none() {
        let mut report = Report {
            surface: Some(10.0),
            budget: Some(500),
            ..Report::default()
        };

        report.apply_scalar_fields(&Document::new());
        assert_eq!(report.surface, None);
        assert_eq!(report.budget, None);
    }

    proptest! {
        #[test]
        fn scalar_round_trip(
            surface in proptest::option::of(0.0f64..10_000.0),
            budget in proptest::option::of(0i64..1_000_000),
            lon in -180.0f64..180.0,
            lat in -90.0f64..90.0,
        ) {
            let report = Report {
                id: Some(1),
                surface,
                budget,
                location: Some(GeoPoint::new(lat, lon).to_wkt()),
                synced: Some(false),
                ..Report::default()
            };

            let mut back = Report::default();
            back.apply_scalar_fields(&report.to_document());
            prop_assert_eq!(back.surface, report.surface);
            prop_assert_eq!(back.budget, report.budget);
            prop_assert_eq!(back.location, report.location);
        }
    }
}
