//! Persistence for wards, signals, disease counters and users.
//!
//! The on-disk format is a single JSON document. Access goes through the
//! [`WardRepository`] trait so handlers never touch the document directly.

pub mod document;
pub mod error;
pub mod ids;
pub mod json_store;
pub mod repository;

pub use document::{Document, SignalRecord, WardState};
pub use error::{StoreError, StoreResult};
pub use ids::generate_id;
pub use json_store::JsonFileStore;
pub use repository::{NewWard, WardRepository};
