//! Sync orchestration.
//!
//! [`SyncService`] drives a sync run over the requested entity types, in
//! the order the caller lists them. Push is all-or-nothing per type; pull
//! is fault-tolerant per record, and every successfully pulled record is
//! immediately pushed back so the remote side sees it stabilized.

use crate::error::EngineError;
use crate::handler::RecordHandler;
use crate::registry::SyncRegistry;
use crate::remote::{is_remote_newer, RemoteStore};
use chrono::{DateTime, Utc};
use fieldsync_core::IdPolicy;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Which legs of the sync to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncDirection {
    /// Local dirty records to the remote store only.
    Push,
    /// Remote documents to the local store only.
    Pull,
    /// Push, then pull.
    #[default]
    Bidirectional,
}

/// One sync run's parameters.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Entity types to synchronize, in dependency order. The orchestrator
    /// processes them exactly as listed.
    pub entity_types: Vec<String>,
    /// Which legs to run.
    pub direction: SyncDirection,
    /// Stage every record on push, not just dirty ones.
    pub force_sync: bool,
}

impl SyncRequest {
    /// A bidirectional run over the given types.
    pub fn bidirectional(entity_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            entity_types: entity_types.into_iter().map(Into::into).collect(),
            direction: SyncDirection::Bidirectional,
            force_sync: false,
        }
    }

    /// A push-only run over the given types.
    pub fn push(entity_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            direction: SyncDirection::Push,
            ..Self::bidirectional(entity_types)
        }
    }

    /// A pull-only run over the given types.
    pub fn pull(entity_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            direction: SyncDirection::Pull,
            ..Self::bidirectional(entity_types)
        }
    }

    /// Stages every record on push, not just dirty ones.
    pub fn force(mut self) -> Self {
        self.force_sync = true;
        self
    }
}

/// Per-type counters of one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeSyncResult {
    /// Records written to the remote store.
    pub pushed: usize,
    /// Remote documents applied locally.
    pub pulled: usize,
    /// Records or batches that failed.
    pub failed: usize,
    /// Advisory conflicts: the local record was newer than the applied
    /// remote document.
    pub conflicts: usize,
}

/// Outcome of a whole sync run.
#[derive(Debug)]
pub struct SyncReport {
    /// True when no error occurred anywhere in the run.
    pub success: bool,
    /// Human-readable one-line summary.
    pub message: String,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Counters per entity type, keyed by type name.
    pub results: BTreeMap<String, TypeSyncResult>,
    /// Every error encountered, in occurrence order.
    pub errors: Vec<String>,
}

impl SyncReport {
    fn rejected(message: String, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message,
            timestamp: Utc::now(),
            results: BTreeMap::new(),
            errors,
        }
    }

    /// Total records pushed across all types.
    pub fn total_pushed(&self) -> usize {
        self.results.values().map(|r| r.pushed).sum()
    }

    /// Total remote documents applied across all types.
    pub fn total_pulled(&self) -> usize {
        self.results.values().map(|r| r.pulled).sum()
    }

    /// Total failures across all types.
    pub fn total_failed(&self) -> usize {
        self.results.values().map(|r| r.failed).sum()
    }
}

/// Drives sync runs against a registry and a remote store.
pub struct SyncService {
    registry: Arc<SyncRegistry>,
    remote: Arc<dyn RemoteStore>,
}

impl SyncService {
    /// Creates a service.
    pub fn new(registry: Arc<SyncRegistry>, remote: Arc<dyn RemoteStore>) -> Self {
        Self { registry, remote }
    }

    /// Runs one sync.
    ///
    /// Unknown entity types reject the whole request before any work
    /// starts. After that, types are independent: a failure in one is
    /// recorded and the run moves on to the next.
    ///
    /// No cross-run mutual exclusion is provided. Two concurrent runs over
    /// the same stores can race on the dirty flag (one run's `mark_synced`
    /// can clear an edit the other run has not pushed); callers that need
    /// serialized runs must arrange it themselves.
    #[instrument(skip(self, request), fields(types = request.entity_types.len(), direction = ?request.direction))]
    pub fn synchronize(&self, request: &SyncRequest) -> SyncReport {
        let unknown = self.registry.unknown_types(&request.entity_types);
        if !unknown.is_empty() {
            let err = EngineError::UnknownTypes { types: unknown };
            warn!(%err, "sync request rejected");
            return SyncReport::rejected("sync request rejected".to_string(), vec![err.to_string()]);
        }

        let mut results = BTreeMap::new();
        let mut errors = Vec::new();

        for entity_type in &request.entity_types {
            let handler = match self.registry.handler(entity_type) {
                Ok(handler) => handler,
                Err(err) => {
                    errors.push(err.to_string());
                    continue;
                }
            };
            let mut result = TypeSyncResult::default();

            if matches!(
                request.direction,
                SyncDirection::Push | SyncDirection::Bidirectional
            ) {
                self.push_type(handler.as_ref(), request.force_sync, &mut result, &mut errors);
            }
            if matches!(
                request.direction,
                SyncDirection::Pull | SyncDirection::Bidirectional
            ) {
                self.pull_type(handler.as_ref(), &mut result, &mut errors);
            }

            results.insert(entity_type.clone(), result);
        }

        let report = SyncReport {
            success: errors.is_empty(),
            message: format!(
                "{} types: {} pushed, {} pulled, {} failed",
                results.len(),
                results.values().map(|r| r.pushed).sum::<usize>(),
                results.values().map(|r| r.pulled).sum::<usize>(),
                results.values().map(|r| r.failed).sum::<usize>(),
            ),
            timestamp: Utc::now(),
            results,
            errors,
        };
        info!(success = report.success, %report.message, "sync run finished");
        report
    }

    /// Push leg for one type. All-or-nothing: dirty flags are cleared only
    /// after the remote write succeeds for the whole batch.
    fn push_type(
        &self,
        handler: &dyn RecordHandler,
        force_sync: bool,
        result: &mut TypeSyncResult,
        errors: &mut Vec<String>,
    ) {
        let entity_type = handler.type_name();
        let batch = match handler.pending_push(force_sync) {
            Ok(batch) => batch,
            Err(err) => {
                result.failed += 1;
                errors.push(format!("{entity_type} push: {err}"));
                return;
            }
        };
        if batch.is_empty() {
            return;
        }

        let mut documents = batch.documents;
        match self.remote.push(entity_type, &mut documents) {
            Ok(written) => {
                result.pushed += written;
                if let Err(err) = handler.mark_synced(&batch.ids) {
                    result.failed += 1;
                    errors.push(format!("{entity_type} mark synced: {err}"));
                }
            }
            Err(err) => {
                // One failure per type-push; dirty flags stay set and the
                // records re-stage next run.
                result.failed += 1;
                errors.push(format!("{entity_type} push: {err}"));
            }
        }
    }

    /// Pull leg for one type. Record-granular: one bad document is counted
    /// and skipped, the rest of the collection still lands.
    fn pull_type(
        &self,
        handler: &dyn RecordHandler,
        result: &mut TypeSyncResult,
        errors: &mut Vec<String>,
    ) {
        let entity_type = handler.type_name();
        let documents = match self.remote.pull(entity_type) {
            Ok(documents) => documents,
            Err(err) => {
                result.failed += 1;
                errors.push(format!("{entity_type} pull: {err}"));
                return;
            }
        };

        let mut push_back = Vec::with_capacity(documents.len());
        for document in documents {
            if let Some(id) = document.id() {
                if let Ok(local) = handler.local_last_modified(id) {
                    if !is_remote_newer(&document, local) {
                        // Advisory only: counted, remote still applied.
                        result.conflicts += 1;
                        warn!(entity_type, id, "remote document older than local record");
                    }
                }
            }
            match handler.upsert_from_remote(&document, IdPolicy::UseProvided) {
                Ok(outbound) => {
                    result.pulled += 1;
                    push_back.push(outbound);
                }
                Err(err) => {
                    result.failed += 1;
                    errors.push(format!("{entity_type} record {:?}: {err}", document.id()));
                }
            }
        }

        // Push-back closes the loop: the remote side sees pulled records
        // stabilized, and the write counts toward `pushed`. A failure here
        // is logged, not a failure; the records land on the next push.
        if !push_back.is_empty() {
            match self.remote.push(entity_type, &mut push_back) {
                Ok(written) => result.pushed += written,
                Err(err) => warn!(entity_type, %err, "push-back after pull failed"),
            }
        }
    }
}
