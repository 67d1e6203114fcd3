//! Layered configuration loader.
//!
//! Discovers configuration layers (system/user/project/cwd/runtime), validates
//! each against the schema, deep-merges them in precedence order, and produces
//! a final `AskqlConfig`.

mod discovery;
mod layer;
mod schema;


use crate::{AskqlConfig, ConfigError};
use layer::LoadedLayer;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of every on-disk layer.
const DEFAULT_CONFIG_FILE: &str = "askql.json5";
/// Directory under the home directory holding the user layer.
const DEFAULT_CONFIG_DIR: &str = ".askql";
/// Entries marking a project root.
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

/// Merged config and the layers that produced it, lowest first.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Validated result of the merge.
    pub config: AskqlConfig,
    /// Metadata for each layer that contributed to the config.
    pub layers: Vec<ConfigLayer>,
}

/// Where a layer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// `/etc/askql` (or the platform equivalent).
    System,
    /// `~/.askql`.
    User,
    /// Nearest ancestor directory with a project marker.
    Project,
    /// The working directory.
    Cwd,
    /// Explicit paths such as `--config`; always win.
    Runtime,
}

impl ConfigLayerSource {
    /// Short lowercase name used in logs and error paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLayerSource::System => "system",
            ConfigLayerSource::User => "user",
            ConfigLayerSource::Project => "project",
            ConfigLayerSource::Cwd => "cwd",
            ConfigLayerSource::Runtime => "runtime",
        }
    }
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Layer locations used by `load_layered_with_options`.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the project root and cwd layer.
    pub cwd: PathBuf,
    /// System layer file, if any.
    pub system_config_path: Option<PathBuf>,
    /// User layer file, if any.
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last; these must exist.
    pub runtime_paths: Vec<PathBuf>,
    /// Entries whose presence marks the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    /// Default locations for a process running in `cwd`.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: discovery::system_config_path(),
            user_config_path: discovery::user_config_path(),
            runtime_paths: Vec::new(),
            project_root_markers: DEFAULT_PROJECT_ROOT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }

    /// Append a layer that must exist and overrides everything else.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl AskqlConfig {
    /// Load a single config file, without layering.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from path: {}", path.display());
        let origin = path.display().to_string();
        let value = layer::parse_json5(&layer::read_file(path)?, &origin)?;
        config_from_value(value, &origin)
    }

    /// Load a single config from JSON5 text, without layering.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        config_from_value(layer::parse_json5(contents, "config")?, "config")
    }

    /// Load the layer stack from the default locations around `cwd`.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load the layer stack described by `options`.
    ///
    /// Precedence, lowest first: system, user, project, cwd, runtime. Only
    /// runtime layers must exist.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = discovery::resolve_cwd(&options.cwd)?;
        let project = discovery::project_root(&cwd, &options.project_root_markers);
        debug!(
            "config discovery (cwd={}, project_root={})",
            cwd.display(),
            project
                .as_deref()
                .map(|root| root.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        let optional = [
            (ConfigLayerSource::System, options.system_config_path),
            (ConfigLayerSource::User, options.user_config_path),
            (
                ConfigLayerSource::Project,
                project.map(|root| root.join(DEFAULT_CONFIG_FILE)),
            ),
            (ConfigLayerSource::Cwd, Some(cwd.join(DEFAULT_CONFIG_FILE))),
        ]
        .into_iter()
        .filter_map(|(source, path)| path.map(|path| (source, path, false)));
        let runtime = options
            .runtime_paths
            .into_iter()
            .map(|path| (ConfigLayerSource::Runtime, path, true));

        let mut merged = Value::Object(serde_json::Map::new());
        let mut layers = Vec::new();
        let mut seen = HashSet::new();
        for (source, path, required) in optional.chain(runtime) {
            if !required && !seen.insert(discovery::identity(&path)) {
                debug!(
                    "layer already loaded (source={}, path={})",
                    source.as_str(),
                    path.display()
                );
                continue;
            }
            if let Some(LoadedLayer { meta, value }) = layer::read_layer(source, &path, required)? {
                layer::stack(&mut merged, value);
                layers.push(meta);
            }
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Check cross-field rules that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        let base_url = self.engine.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid("engine.base_url", "expected an http(s) URL"));
        }
        if self.engine.timeout_secs == 0 {
            return Err(invalid("engine.timeout_secs", "must be greater than zero"));
        }
        if self.display.preview_rows == 0 {
            return Err(invalid("display.preview_rows", "must be greater than zero"));
        }
        if self.display.training_preview_rows == 0 {
            return Err(invalid(
                "display.training_preview_rows",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn config_from_value(value: Value, label: &str) -> Result<AskqlConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: AskqlConfig =
        serde_json::from_value(value).map_err(|source| ConfigError::Decode {
            origin: label.to_string(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

fn invalid(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}
