use crate::chart;
use crate::rpc::RpcClient;
use crate::sqlite::SqlRunner;
use askql_rs_protocol::{Engine, EngineError, Table, TrainingRequest};
use async_trait::async_trait;
use log::debug;
use serde_json::json;
use std::sync::Arc;

/// Engine that asks a remote service for text generation and runs SQL and
/// charting locally.
#[derive(Clone)]
pub struct RemoteEngine {
    rpc: RpcClient,
    runner: Arc<dyn SqlRunner>,
    preview_rows: usize,
}

impl RemoteEngine {
    /// `preview_rows` bounds the table sample sent for follow-up questions.
    pub fn new(rpc: RpcClient, runner: Arc<dyn SqlRunner>, preview_rows: usize) -> Self {
        Self {
            rpc,
            runner,
            preview_rows,
        }
    }
}

#[async_trait]
impl Engine for RemoteEngine {
    async fn generate_questions(&self) -> Result<Vec<String>, EngineError> {
        self.rpc.call("generate_questions", json!({})).await
    }

    async fn generate_sql(&self, question: &str) -> Result<String, EngineError> {
        self.rpc
            .call("generate_sql", json!({ "question": question }))
            .await
    }

    async fn run_sql(&self, sql: &str) -> Result<Table, EngineError> {
        self.runner.run(sql).await
    }

    async fn generate_figure(
        &self,
        question: &str,
        _sql: &str,
        table: &Table,
    ) -> Result<String, EngineError> {
        debug!(
            "building chart (rows={}, columns={})",
            table.len(),
            table.columns.len()
        );
        chart::figure_json(question, table)
    }

    async fn generate_followup_questions(
        &self,
        question: &str,
        sql: &str,
        table: &Table,
    ) -> Result<Vec<String>, EngineError> {
        let df = table.head(self.preview_rows).to_records_json();
        self.rpc
            .call(
                "generate_followup_questions",
                json!({ "question": question, "sql": sql, "df": df }),
            )
            .await
    }

    async fn training_data(&self) -> Result<Table, EngineError> {
        self.rpc.call("get_training_data", json!({})).await
    }

    async fn remove_training_data(&self, id: &str) -> Result<bool, EngineError> {
        self.rpc
            .call("remove_training_data", json!({ "id": id }))
            .await
    }

    async fn train(&self, request: &TrainingRequest) -> Result<String, EngineError> {
        let params = serde_json::to_value(request)
            .map_err(|err| EngineError::Request(format!("failed to encode training request: {err}")))?;
        self.rpc.call("train", params).await
    }
}
