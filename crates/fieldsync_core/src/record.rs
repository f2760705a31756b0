//! The record mapping contract.

use chrono::{DateTime, Utc};
use fieldsync_document::Document;

/// Identifier policy for upserts originating from the remote store.
///
/// Remote-origin records keep the identifier the remote side assigned, so
/// the same logical record never forks under two ids. This is threaded
/// through the upsert call explicitly; there is no ambient "forced id"
/// state anywhere in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Keep the identifier carried by the incoming document.
    UseProvided,
    /// Ignore any incoming identifier and let the local store assign one.
    GenerateNew,
}

/// The pairing of a local entity type with its remote document form.
///
/// Implementations map their scalar fields both ways and expose identity
/// and the dirty flag. Relations are deliberately not part of this
/// contract: resolving a foreign key requires looking up other entities in
/// the local store, and the order in which types are synchronized matters,
/// so relation resolution lives in the engine's type handlers.
pub trait SyncRecord: Clone + Default + Send + Sync + 'static {
    /// Canonical type name, also the remote collection name.
    /// Uniformly snake_case plural.
    const TYPE_NAME: &'static str;

    /// Local identifier, if assigned.
    fn id(&self) -> Option<i64>;

    /// Assigns the local identifier.
    fn set_id(&mut self, id: i64);

    /// Raw synced flag. `None` means the flag was never set.
    fn synced(&self) -> Option<bool>;

    /// Sets the raw synced flag.
    fn set_synced(&mut self, synced: Option<bool>);

    /// Last recorded modification time.
    ///
    /// Used only for the advisory remote-vs-local comparison; it never
    /// gates a write.
    fn last_modified(&self) -> Option<DateTime<Utc>>;

    /// Returns true if local state is not yet reflected remotely.
    ///
    /// A record whose flag was never set is treated as not-dirty.
    fn is_dirty(&self) -> bool {
        self.synced() == Some(false)
    }

    /// Marks the record as reflected remotely.
    fn mark_clean(&mut self) {
        self.set_synced(Some(true));
    }

    /// Marks the record as needing a push.
    fn mark_dirty(&mut self) {
        self.set_synced(Some(false));
    }

    /// Serializes the entity to its remote document form.
    ///
    /// The identifier is never omitted, and the stability flag is always
    /// written as true even when the entity is currently dirty.
    fn to_document(&self) -> Document;

    /// Applies the document's scalar fields onto the entity.
    ///
    /// Relations are never touched. Fields overwrite unconditionally,
    /// except where an implementation documents otherwise (a nullable
    /// media-path field must not be blanked by an absent value).
    fn apply_scalar_fields(&mut self, document: &Document);
}
