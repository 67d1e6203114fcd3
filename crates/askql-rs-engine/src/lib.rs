//! Engine implementations backing the askql analyst.
//!
//! Text generation goes to a remote RPC service; SQL runs against a local
//! SQLite file and charts are built locally from the result table.

pub mod chart;
mod remote;
mod rpc;
mod sqlite;

pub use remote::RemoteEngine;
pub use rpc::RpcClient;
pub use sqlite::{SqlRunner, SqliteRunner};

use askql_rs_config::{AskqlConfig, DatabaseKind};
use askql_rs_protocol::{Engine, EngineError};
use log::info;
use std::sync::Arc;

/// Build the engine described by `config`.
pub fn build_engine(config: &AskqlConfig) -> Result<Arc<dyn Engine>, EngineError> {
    let rpc = RpcClient::from_config(&config.engine)?;
    let runner: Arc<dyn SqlRunner> = match config.database.kind {
        DatabaseKind::Sqlite => {
            let path = config.database.path.as_deref().ok_or_else(|| {
                EngineError::Unsupported("database.path must be set for sqlite".to_string())
            })?;
            Arc::new(SqliteRunner::new(path))
        }
    };
    info!(
        "engine ready (endpoint={}, database={}, model={})",
        rpc.endpoint(),
        config.database.kind.as_str(),
        config.engine.model.as_deref().unwrap_or("default")
    );
    Ok(Arc::new(RemoteEngine::new(
        rpc,
        runner,
        config.display.preview_rows,
    )))
}

#[cfg(test)]
mod tests {
    use super::build_engine;
    use askql_rs_config::{AskqlConfig, DatabaseConfig};
    use askql_rs_protocol::EngineError;

    #[test]
    fn sqlite_requires_a_path() {
        let err = build_engine(&AskqlConfig::default())
            .err()
            .expect("should fail");
        assert!(matches!(err, EngineError::Unsupported(_)));
    }

    #[test]
    fn builds_with_database_path() {
        let config = AskqlConfig::builder()
            .database(DatabaseConfig {
                path: Some("chinook.sqlite".to_string()),
                ..DatabaseConfig::default()
            })
            .build();
        assert!(build_engine(&config).is_ok());
    }
}
