use crate::table::Table;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors returned by engine implementations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The request never produced a response (connection, timeout, body).
    #[error("request failed: {0}")]
    Request(String),
    /// The remote service answered with an error.
    #[error("remote error: {0}")]
    Remote(String),
    /// The response could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Running SQL against the database failed.
    #[error("query failed: {0}")]
    Query(String),
    /// A chart could not be built from the data.
    #[error("chart failed: {0}")]
    Chart(String),
    /// The engine does not support the requested operation or backend.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Training material submitted to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingRequest {
    /// Example question paired with `sql`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Example SQL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    /// Schema definition statements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddl: Option<String>,
    /// Free-form documentation about the data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl TrainingRequest {
    /// True when no training material was supplied.
    pub fn is_empty(&self) -> bool {
        self.question.is_none()
            && self.sql.is_none()
            && self.ddl.is_none()
            && self.documentation.is_none()
    }
}

/// Question answering, SQL generation, and chart generation backend.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Suggest questions that can be asked about the connected data.
    async fn generate_questions(&self) -> Result<Vec<String>, EngineError>;

    /// Translate a natural-language question into SQL.
    async fn generate_sql(&self, question: &str) -> Result<String, EngineError>;

    /// Execute SQL and return the result table.
    async fn run_sql(&self, sql: &str) -> Result<Table, EngineError>;

    /// Build a Plotly figure (serialized JSON) for a result table.
    async fn generate_figure(
        &self,
        question: &str,
        sql: &str,
        table: &Table,
    ) -> Result<String, EngineError>;

    /// Suggest follow-up questions for an answered question.
    async fn generate_followup_questions(
        &self,
        question: &str,
        sql: &str,
        table: &Table,
    ) -> Result<Vec<String>, EngineError>;

    /// Return the stored training data.
    async fn training_data(&self) -> Result<Table, EngineError>;

    /// Remove a training entry; `false` when nothing was removed.
    async fn remove_training_data(&self, id: &str) -> Result<bool, EngineError>;

    /// Store training material and return its id.
    async fn train(&self, request: &TrainingRequest) -> Result<String, EngineError>;
}
