//! Per-type sync handlers.
//!
//! A [`TypeHandler`] binds one record type's repository to its relation
//! resolver and exposes the handful of operations the orchestrator needs.
//! The registry stores handlers behind the type-erased [`RecordHandler`]
//! trait so one sync run can span heterogeneous types.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use fieldsync_core::{IdPolicy, Repository, SyncRecord};
use fieldsync_document::Document;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Resolves relation fields of an incoming document onto a record.
///
/// Runs after scalar fields are applied and before the record is saved, so
/// a resolution failure leaves the local store untouched.
pub type RelationResolver<E> =
    Box<dyn Fn(&mut E, &Document) -> EngineResult<()> + Send + Sync>;

/// Documents staged for a push, paired with the local ids to mark clean
/// once the remote write succeeds.
#[derive(Debug, Default)]
pub struct PushBatch {
    /// Local ids of the staged records, in document order.
    pub ids: Vec<i64>,
    /// The outbound documents.
    pub documents: Vec<Document>,
}

impl PushBatch {
    /// True when nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of staged documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

/// Handler for a single record type.
pub struct TypeHandler<E: SyncRecord> {
    repository: Arc<dyn Repository<E>>,
    resolver: RelationResolver<E>,
}

impl<E: SyncRecord> TypeHandler<E> {
    /// Creates a handler with a relation resolver.
    pub fn new(repository: Arc<dyn Repository<E>>, resolver: RelationResolver<E>) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Creates a handler for a type with no relations to resolve.
    pub fn without_relations(repository: Arc<dyn Repository<E>>) -> Self {
        Self::new(repository, Box::new(|_, _| Ok(())))
    }

    fn load_or_default(&self, document: &Document, policy: IdPolicy) -> EngineResult<E> {
        match document.id() {
            Some(id) => match self.repository.find_by_id(id)? {
                Some(existing) => Ok(existing),
                None => {
                    let mut fresh = E::default();
                    if matches!(policy, IdPolicy::UseProvided) {
                        fresh.set_id(id);
                    }
                    Ok(fresh)
                }
            },
            None => Ok(E::default()),
        }
    }
}

/// Type-erased handler interface the registry and orchestrator work
/// against.
pub trait RecordHandler: Send + Sync {
    /// Canonical type name, doubling as the remote collection name.
    fn type_name(&self) -> &'static str;

    /// Stages locally dirty records for a push. With `force_sync`, every
    /// record is staged regardless of its dirty flag.
    fn pending_push(&self, force_sync: bool) -> EngineResult<PushBatch>;

    /// Marks the given records clean after a confirmed remote write.
    fn mark_synced(&self, ids: &[i64]) -> EngineResult<()>;

    /// Applies one remote document to the local store: scalar fields, then
    /// relation resolution, then persist. Persisting is the last step, so
    /// a failed record leaves the store untouched.
    ///
    /// Returns the saved record's outbound document for the push-back leg.
    fn upsert_from_remote(&self, document: &Document, policy: IdPolicy)
        -> EngineResult<Document>;

    /// Last recorded modification time of a local record, if any.
    fn local_last_modified(&self, id: i64) -> EngineResult<Option<DateTime<Utc>>>;
}

impl<E: SyncRecord> RecordHandler for TypeHandler<E> {
    fn type_name(&self) -> &'static str {
        E::TYPE_NAME
    }

    #[instrument(skip(self), fields(entity_type = E::TYPE_NAME))]
    fn pending_push(&self, force_sync: bool) -> EngineResult<PushBatch> {
        let mut batch = PushBatch::default();
        for mut entity in self.repository.find_all()? {
            if !force_sync && !entity.is_dirty() {
                continue;
            }
            // Ids are assigned on save, but a record created outside the
            // repository could still lack one. Persist first so the pushed
            // document always carries an id.
            let id = match entity.id() {
                Some(id) => id,
                None => {
                    entity = self.repository.save(entity)?;
                    entity
                        .id()
                        .ok_or_else(|| EngineError::transport("save returned record without id"))?
                }
            };
            batch.ids.push(id);
            batch.documents.push(entity.to_document());
        }
        debug!(staged = batch.len(), force_sync, "staged records for push");
        Ok(batch)
    }

    fn mark_synced(&self, ids: &[i64]) -> EngineResult<()> {
        for &id in ids {
            if let Some(mut entity) = self.repository.find_by_id(id)? {
                entity.mark_clean();
                self.repository.save(entity)?;
            }
        }
        trace!(entity_type = E::TYPE_NAME, count = ids.len(), "records marked clean");
        Ok(())
    }

    #[instrument(skip(self, document), fields(entity_type = E::TYPE_NAME, id = ?document.id()))]
    fn upsert_from_remote(
        &self,
        document: &Document,
        policy: IdPolicy,
    ) -> EngineResult<Document> {
        let mut entity = self.load_or_default(document, policy)?;
        entity.apply_scalar_fields(document);
        (self.resolver)(&mut entity, document)?;
        // A pulled record is immediately pushed back as stable, so it
        // lands locally already clean.
        entity.mark_clean();
        let saved = self.repository.save(entity)?;
        trace!(saved_id = ?saved.id(), "remote document applied");
        Ok(saved.to_document())
    }

    fn local_last_modified(&self, id: i64) -> EngineResult<Option<DateTime<Utc>>> {
        Ok(self
            .repository
            .find_by_id(id)?
            .and_then(|entity| entity.last_modified()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldsync_core::entities::{role_fields, Role};
    use fieldsync_core::MemoryRepository;
    use fieldsync_document::keys;

    fn seeded_repo() -> Arc<MemoryRepository<Role>> {
        let repo = Arc::new(MemoryRepository::new());
        repo.save(Role {
            name: "admin".into(),
            synced: Some(false),
            ..Role::default()
        })
        .unwrap();
        repo.save(Role {
            name: "reporter".into(),
            synced: Some(true),
            ..Role::default()
        })
        .unwrap();
        repo
    }

    #[test]
    fn pending_push_stages_only_dirty_records() {
        let repo = seeded_repo();
        let handler: TypeHandler<Role> = TypeHandler::without_relations(repo);

        let batch = handler.pending_push(false).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.documents[0].get_str(role_fields::NAME), Some("admin"));
    }

    #[test]
    fn force_sync_stages_everything() {
        let repo = seeded_repo();
        let handler: TypeHandler<Role> = TypeHandler::without_relations(repo);

        let batch = handler.pending_push(true).unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn staged_documents_force_the_stability_flag() {
        let repo = seeded_repo();
        let handler: TypeHandler<Role> = TypeHandler::without_relations(repo);

        let batch = handler.pending_push(true).unwrap();
        for doc in &batch.documents {
            assert!(doc.synchro(), "pushed documents must read as stable");
            assert!(doc.id().is_some(), "pushed documents must carry an id");
        }
    }

    #[test]
    fn mark_synced_clears_the_dirty_flag() {
        let repo = seeded_repo();
        let handler = TypeHandler::without_relations(Arc::clone(&repo) as Arc<dyn Repository<Role>>);

        let batch = handler.pending_push(false).unwrap();
        handler.mark_synced(&batch.ids).unwrap();

        let next = handler.pending_push(false).unwrap();
        assert!(next.is_empty(), "marked records must not re-stage");
    }

    #[test]
    fn upsert_keeps_remote_id_with_use_provided() {
        let repo: Arc<MemoryRepository<Role>> = Arc::new(MemoryRepository::new());
        let handler = TypeHandler::without_relations(Arc::clone(&repo) as Arc<dyn Repository<Role>>);

        let doc = Document::new()
            .with(keys::ID, 424_242_i64)
            .with(role_fields::NAME, "inspector")
            .with(keys::SYNCHRO, true);
        let saved = handler
            .upsert_from_remote(&doc, IdPolicy::UseProvided)
            .unwrap();

        assert_eq!(saved.id(), Some(424_242));
        let local = repo.find_by_id(424_242).unwrap().unwrap();
        assert_eq!(local.name, "inspector");
    }

    #[test]
    fn upsert_generates_id_with_generate_new() {
        let repo: Arc<MemoryRepository<Role>> = Arc::new(MemoryRepository::new());
        let handler = TypeHandler::without_relations(Arc::clone(&repo) as Arc<dyn Repository<Role>>);

        let doc = Document::new()
            .with(keys::ID, 424_242_i64)
            .with(role_fields::NAME, "inspector");
        let saved = handler
            .upsert_from_remote(&doc, IdPolicy::GenerateNew)
            .unwrap();

        let id = saved.id().unwrap();
        assert_ne!(id, 424_242);
        assert!(repo.exists(id).unwrap());
    }

    #[test]
    fn upsert_updates_existing_record_in_place() {
        let repo: Arc<MemoryRepository<Role>> = Arc::new(MemoryRepository::new());
        let existing = repo
            .save(Role {
                id: Some(9),
                name: "old name".into(),
                ..Role::default()
            })
            .unwrap();
        let handler = TypeHandler::without_relations(Arc::clone(&repo) as Arc<dyn Repository<Role>>);

        let doc = Document::new()
            .with(keys::ID, existing.id)
            .with(role_fields::NAME, "new name");
        handler
            .upsert_from_remote(&doc, IdPolicy::UseProvided)
            .unwrap();

        assert_eq!(repo.find_all().unwrap().len(), 1);
        let updated = repo.find_by_id(9).unwrap().unwrap();
        assert_eq!(updated.name, "new name");
    }

    #[test]
    fn failed_relation_resolution_persists_nothing() {
        let repo: Arc<MemoryRepository<Role>> = Arc::new(MemoryRepository::new());
        let handler = TypeHandler::new(
            Arc::clone(&repo) as Arc<dyn Repository<Role>>,
            Box::new(|_, _| {
                Err(EngineError::RelationNotFound {
                    entity_type: "roles",
                    relation: "parent",
                    id: 1,
                })
            }),
        );

        let doc = Document::new().with(keys::ID, 1_i64).with(role_fields::NAME, "x");
        let err = handler
            .upsert_from_remote(&doc, IdPolicy::UseProvided)
            .unwrap_err();
        assert!(err.is_relation_integrity());
        assert!(repo.find_all().unwrap().is_empty(), "nothing may persist");
    }
}
