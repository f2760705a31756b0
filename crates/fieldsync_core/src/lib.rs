//! # FieldSync Core
//!
//! Entity model and record mapping contract for FieldSync.
//!
//! This crate provides:
//! - `SyncRecord`, the per-type pairing of a local entity with its remote
//!   document form (serialization both ways, identity, dirty flag)
//! - `Repository`, the local-store capability the engine depends on
//! - `MemoryRepository`, the in-memory reference implementation
//! - The concrete entity types of the field-reporting domain
//!
//! ## Key Invariants
//!
//! - An entity with a required relation is never persisted with that
//!   relation unset (enforced by the engine's relation resolvers)
//! - The dirty flag is cleared only by the sync engine, immediately after a
//!   successful remote write of the record's current state
//! - `to_document` is a pure function of entity state and always writes the
//!   stability flag as true: pushing is what makes a record stable

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod entities;
mod error;
mod record;
mod repository;

pub use error::{CoreError, CoreResult};
pub use record::{IdPolicy, SyncRecord};
pub use repository::{MemoryRepository, Repository, LOCAL_ID_RANGE};
