//! Local store interface and in-memory implementation.

use crate::error::{CoreError, CoreResult};
use crate::record::SyncRecord;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Identifier range for locally created records.
///
/// Remote-origin records keep their remote identifier; locally created ones
/// draw a random id from this range so the two populations can coexist
/// without a shared sequence.
pub const LOCAL_ID_RANGE: RangeInclusive<i64> = 1..=100_000;

/// The local-store capability the sync engine depends on.
///
/// The relational engine behind this trait is out of scope here; the
/// discipline is read, mutate in memory, save.
pub trait Repository<E: SyncRecord>: Send + Sync {
    /// Returns every entity of the type.
    fn find_all(&self) -> CoreResult<Vec<E>>;

    /// Looks an entity up by id.
    fn find_by_id(&self, id: i64) -> CoreResult<Option<E>>;

    /// Returns true if an entity with the id exists.
    fn exists(&self, id: i64) -> CoreResult<bool>;

    /// Persists one entity, assigning an id if it has none.
    fn save(&self, entity: E) -> CoreResult<E>;

    /// Persists a batch of entities.
    fn save_all(&self, entities: Vec<E>) -> CoreResult<Vec<E>> {
        entities.into_iter().map(|e| self.save(e)).collect()
    }
}

/// An in-memory repository.
///
/// The reference implementation behind [`Repository`], used by tests and
/// the fixture-driven CLI.
#[derive(Debug, Default)]
pub struct MemoryRepository<E: SyncRecord> {
    rows: RwLock<BTreeMap<i64, E>>,
}

impl<E: SyncRecord> MemoryRepository<E> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn assign_id(&self, rows: &BTreeMap<i64, E>) -> CoreResult<i64> {
        let span = LOCAL_ID_RANGE.end() - LOCAL_ID_RANGE.start() + 1;
        if rows.len() as i64 >= span {
            return Err(CoreError::IdSpaceExhausted {
                entity_type: E::TYPE_NAME,
            });
        }
        let mut rng = rand::thread_rng();
        loop {
            let candidate = rng.gen_range(LOCAL_ID_RANGE);
            if !rows.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }
}

impl<E: SyncRecord> Repository<E> for MemoryRepository<E> {
    fn find_all(&self) -> CoreResult<Vec<E>> {
        Ok(self.rows.read().values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> CoreResult<Option<E>> {
        Ok(self.rows.read().get(&id).cloned())
    }

    fn exists(&self, id: i64) -> CoreResult<bool> {
        Ok(self.rows.read().contains_key(&id))
    }

    fn save(&self, mut entity: E) -> CoreResult<E> {
        let mut rows = self.rows.write();
        let id = match entity.id() {
            Some(id) => id,
            None => {
                let id = self.assign_id(&rows)?;
                entity.set_id(id);
                id
            }
        };
        rows.insert(id, entity.clone());
        Ok(entity)
    }
}
