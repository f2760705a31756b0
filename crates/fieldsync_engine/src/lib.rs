//! # FieldSync Engine
//!
//! Bidirectional record synchronization between a local relational store of
//! record and a remote schemaless document store.
//!
//! This crate provides:
//! - Media sideload decoding (embedded base64 payloads to local files)
//! - Per-type handlers combining a repository, constructors, and relation
//!   resolution
//! - A process-wide, type-erased registry of handlers
//! - The remote store adapter seam
//! - The sync orchestrator driving push, pull, and bidirectional runs
//!
//! ## Architecture
//!
//! The orchestrator talks to the local side only through the registry and
//! to the remote side only through the [`RemoteStore`] trait:
//!
//! ```text
//! SyncService ──▶ SyncRegistry ──▶ TypeHandler ──▶ Repository
//!      │                               │
//!      │                               └──▶ MediaStore (photo pulls)
//!      └────────▶ RemoteStore
//! ```
//!
//! ## Key Invariants
//!
//! - Callers synchronize types in dependency order: a type whose relation
//!   resolver looks up another type must not run before that type's
//!   records exist locally (`roles` before `users`, `users` before
//!   `reports`, `reports` before `report_progress` and `report_photos`).
//!   The registry does not reorder.
//! - The dirty flag is cleared only after a successful remote write.
//! - Push is all-or-nothing per type; pull is fault-tolerant per record.
//! - Pulled records are immediately pushed back with the stability flag
//!   forced true, closing the loop for the remote side's consumers.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod handler;
mod media;
mod orchestrator;
mod registry;
mod remote;

pub use error::{EngineError, EngineResult};
pub use handler::{PushBatch, RecordHandler, RelationResolver, TypeHandler};
pub use media::MediaStore;
pub use orchestrator::{SyncDirection, SyncReport, SyncRequest, SyncService, TypeSyncResult};
pub use registry::{standard_registry, LocalStores, SyncRegistry, DEFAULT_SYNC_ORDER};
pub use remote::{is_remote_newer, MemoryRemoteStore, RemoteStore};
