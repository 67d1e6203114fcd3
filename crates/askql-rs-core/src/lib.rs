//! Core caching and gating primitives for askql.
//!
//! This crate owns the per-question field store, the dependency gates that
//! guard each analysis step, the content-derived record ids, and the
//! `Analyst` service that the HTTP layer calls into.

pub mod analyst;
pub mod error;
pub mod gate;
pub mod ids;
pub mod store;
pub mod types;

pub use analyst::{Analyst, AnalystSettings};
pub use error::AnalystError;
pub use gate::{Gate, Resolved};
pub use ids::generate_id;
pub use store::FieldStore;
pub use types::{FieldName, FieldValue, RecordId};
