//! # FieldSync Document Model
//!
//! Schemaless document types for the FieldSync engine.
//!
//! This crate provides:
//! - `FieldValue` for dynamic document field values
//! - `GeoPoint` with WKT conversion
//! - `Document`, a flat key/value record with lenient typed extraction
//!
//! This is a pure data crate with no I/O operations. The remote document
//! store represents every record as a flat map; foreign keys cross the wire
//! as scalar identifier fields, never as nested objects (geographic points
//! are the one structured exception).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod value;

pub use document::{keys, Document};
pub use error::{DocumentError, DocumentResult};
pub use value::{FieldValue, GeoPoint};
