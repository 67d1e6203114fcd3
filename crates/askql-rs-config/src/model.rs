//! Config sections for the server, engine, database and display.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root config for the askql service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AskqlConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AskqlConfig {
    /// Builder starting from defaults.
    pub fn builder() -> AskqlConfigBuilder {
        AskqlConfigBuilder::new()
    }
}

/// Builder for assembling an `AskqlConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct AskqlConfigBuilder {
    config: AskqlConfig,
}

impl AskqlConfigBuilder {
    /// Builder starting from defaults.
    pub fn new() -> Self {
        Self {
            config: AskqlConfig::default(),
        }
    }

    /// Replace the HTTP server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Replace the engine configuration.
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    /// Replace the database configuration.
    pub fn database(mut self, database: DatabaseConfig) -> Self {
        self.config.database = database;
        self
    }

    /// Replace the display configuration.
    pub fn display(mut self, display: DisplayConfig) -> Self {
        self.config.display = display;
        self
    }

    /// Finalize and return the built `AskqlConfig`.
    pub fn build(self) -> AskqlConfig {
        self.config
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind (host:port).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory served for `/` and other non-API paths.
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Parse the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, crate::ConfigError> {
        self.bind.parse().map_err(|_| crate::ConfigError::InvalidField {
            path: "server.bind".to_string(),
            message: format!("invalid socket address: {}", self.bind),
        })
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

/// Remote generation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RPC endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier forwarded with every call.
    #[serde(default)]
    pub model: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/rpc".to_string()
}

fn default_api_key_env() -> String {
    "ASKQL_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Supported database backends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// Local SQLite database file.
    #[default]
    Sqlite,
}

impl DatabaseKind {
    /// Return the kind as it appears in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Sqlite => "sqlite",
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub kind: DatabaseKind,
    /// Path to the database file.
    #[serde(default)]
    pub path: Option<String>,
}

/// Response sizing for table previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows included in query result previews.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    /// Rows included in the training data listing.
    #[serde(default = "default_training_preview_rows")]
    pub training_preview_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            training_preview_rows: default_training_preview_rows(),
        }
    }
}

fn default_preview_rows() -> usize {
    10
}

fn default_training_preview_rows() -> usize {
    25
}
