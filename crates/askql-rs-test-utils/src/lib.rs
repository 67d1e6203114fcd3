//! Engine doubles for askql tests.

pub mod engine;

pub use engine::{FailingEngine, FixedEngine, RecordingEngine, sample_table};
