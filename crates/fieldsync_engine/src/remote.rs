//! Remote document store seam.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use fieldsync_document::Document;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// The remote-side capability the orchestrator depends on.
///
/// Implementations wrap whatever document database backs the deployment.
/// Any backend failure surfaces as [`EngineError::Transport`]; the
/// orchestrator treats the whole call as failed and leaves local dirty
/// flags untouched.
pub trait RemoteStore: Send + Sync {
    /// Writes a batch of documents into a collection, overwriting by id.
    ///
    /// Documents without an id are assigned one by the backend, written
    /// back into the passed slice. Returns the number written.
    fn push(&self, collection: &str, documents: &mut [Document]) -> EngineResult<usize>;

    /// Reads every document of a collection.
    fn pull(&self, collection: &str) -> EngineResult<Vec<Document>>;

    /// Reads one document by id.
    fn get_one(&self, collection: &str, id: i64) -> EngineResult<Option<Document>>;

    /// Deletes one document by id. Deleting an absent document is not an
    /// error.
    fn delete(&self, collection: &str, id: i64) -> EngineResult<()>;
}

/// True when the remote document's timestamp is at or past the local one.
///
/// Timestamps are advisory: a missing one on either side counts as "remote
/// wins", matching last-writer-wins with the remote as the shared truth.
pub fn is_remote_newer(remote: &Document, local: Option<DateTime<Utc>>) -> bool {
    match (remote.last_modified(), local) {
        (Some(remote_at), Some(local_at)) => remote_at >= local_at,
        _ => true,
    }
}

/// In-memory [`RemoteStore`] for tests and fixture-driven runs.
///
/// Generated ids start high above [`fieldsync_core::LOCAL_ID_RANGE`] so
/// remote-assigned and locally drawn ids never collide in a test. Failure
/// flags let tests simulate an unreachable backend per direction.
#[derive(Debug)]
pub struct MemoryRemoteStore {
    collections: RwLock<BTreeMap<String, BTreeMap<i64, Document>>>,
    next_id: AtomicI64,
    fail_pushes: AtomicBool,
    fail_pulls: AtomicBool,
}

impl MemoryRemoteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1_000_000),
            fail_pushes: AtomicBool::new(false),
            fail_pulls: AtomicBool::new(false),
        }
    }

    /// Seeds one document, assigning an id if it has none.
    pub fn seed(&self, collection: &str, mut document: Document) -> i64 {
        let id = document
            .id()
            .unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::Relaxed));
        document.set_id(id);
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id, document);
        id
    }

    /// Snapshot of one collection's documents, in id order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .get(collection)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Makes subsequent pushes fail with a transport error.
    pub fn fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::Relaxed);
    }

    /// Makes subsequent pulls fail with a transport error.
    pub fn fail_pulls(&self, fail: bool) {
        self.fail_pulls.store(fail, Ordering::Relaxed);
    }
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn push(&self, collection: &str, documents: &mut [Document]) -> EngineResult<usize> {
        if self.fail_pushes.load(Ordering::Relaxed) {
            return Err(EngineError::transport("remote store unreachable"));
        }
        let mut collections = self.collections.write();
        let rows = collections.entry(collection.to_string()).or_default();
        for document in documents.iter_mut() {
            let id = match document.id() {
                Some(id) => id,
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    document.set_id(id);
                    id
                }
            };
            rows.insert(id, document.clone());
        }
        Ok(documents.len())
    }

    fn pull(&self, collection: &str) -> EngineResult<Vec<Document>> {
        if self.fail_pulls.load(Ordering::Relaxed) {
            return Err(EngineError::transport("remote store unreachable"));
        }
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|rows| {
                rows.iter()
                    .map(|(&id, doc)| {
                        // Document identity lives in the key space; make
                        // sure the payload carries it too.
                        let mut doc = doc.clone();
                        doc.set_id(id);
                        doc
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_one(&self, collection: &str, id: i64) -> EngineResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|rows| rows.get(&id).cloned()))
    }

    fn delete(&self, collection: &str, id: i64) -> EngineResult<()> {
        if let Some(rows) = self.collections.write().get_mut(collection) {
            rows.remove(&id);
        }
        Ok(())
    }
}
