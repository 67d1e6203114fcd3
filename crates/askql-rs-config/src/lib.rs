//! askql configuration.
//!
//! The model (`AskqlConfig` and its sections) and the JSON5 layer loader
//! used by the server binary.

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::*;
