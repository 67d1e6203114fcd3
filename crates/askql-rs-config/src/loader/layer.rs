//! Reading, checking and stacking individual config layers.

use super::{ConfigLayer, ConfigLayerSource, schema};
use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Raw JSON of one layer plus where it came from.
#[derive(Debug, Clone)]
pub(super) struct LoadedLayer {
    pub(super) meta: ConfigLayer,
    pub(super) value: Value,
}

/// Parse JSON5 text; `origin` names the source in errors.
pub(super) fn parse_json5(contents: &str, origin: &str) -> Result<Value, ConfigError> {
    json5::from_str(contents).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}

pub(super) fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and schema-check the layer at `path`.
///
/// An optional layer whose file is absent yields `None`; a required one
/// fails with `ConfigError::Read`.
pub(super) fn read_layer(
    source: ConfigLayerSource,
    path: &Path,
    required: bool,
) -> Result<Option<LoadedLayer>, ConfigError> {
    if !required && !path.is_file() {
        debug!(
            "no config layer (source={}, path={})",
            source.as_str(),
            path.display()
        );
        return Ok(None);
    }
    let label = format!("{}({})", source.as_str(), path.display());
    let value = parse_json5(&read_file(path)?, &label)?;
    schema::validate_layer_schema(&value, &label)?;
    debug!(
        "read config layer (source={}, path={})",
        source.as_str(),
        path.display()
    );
    Ok(Some(LoadedLayer {
        meta: ConfigLayer {
            source,
            path: path.to_path_buf(),
        },
        value,
    }))
}

/// Lay `upper` over `lower`: objects combine key by key, any other value
/// in `upper` replaces what was below it.
pub(super) fn stack(lower: &mut Value, upper: Value) {
    match (lower, upper) {
        (Value::Object(lower), Value::Object(upper)) => {
            for (key, value) in upper {
                match lower.get_mut(&key) {
                    Some(slot) => stack(slot, value),
                    None => {
                        lower.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
