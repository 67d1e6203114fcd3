use askql_rs_protocol::{Engine, EngineError, Table, TrainingRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

/// Two-column table of artists and sales used by default.
pub fn sample_table() -> Table {
    Table::new(
        vec!["artist".to_string(), "sales".to_string()],
        vec![
            vec![json!("Iron Maiden"), json!(138.6)],
            vec![json!("U2"), json!(105.93)],
            vec![json!("Metallica"), json!(90.09)],
        ],
    )
}

/// Engine returning canned answers for every call.
#[derive(Debug, Clone)]
pub struct FixedEngine {
    questions: Vec<String>,
    sql: String,
    table: Table,
    figure: String,
    followups: Vec<String>,
    training: Table,
    removable: bool,
    training_id: String,
}

impl FixedEngine {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            questions: vec!["Who are the top artists by sales?".to_string()],
            sql: sql.into(),
            table: sample_table(),
            figure: r#"{"data":[],"layout":{}}"#.to_string(),
            followups: vec!["Which albums sold best?".to_string()],
            training: Table::new(
                vec!["id".to_string(), "training_data_type".to_string()],
                vec![vec![json!("t-1"), json!("sql")]],
            ),
            removable: true,
            training_id: "t-new".to_string(),
        }
    }

    pub fn with_questions(mut self, questions: Vec<String>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.table = table;
        self
    }

    pub fn with_figure(mut self, figure: impl Into<String>) -> Self {
        self.figure = figure.into();
        self
    }

    pub fn with_followups(mut self, followups: Vec<String>) -> Self {
        self.followups = followups;
        self
    }

    pub fn with_training_data(mut self, training: Table) -> Self {
        self.training = training;
        self
    }

    pub fn with_removal(mut self, removable: bool) -> Self {
        self.removable = removable;
        self
    }

    pub fn with_training_id(mut self, id: impl Into<String>) -> Self {
        self.training_id = id.into();
        self
    }
}

#[async_trait]
impl Engine for FixedEngine {
    async fn generate_questions(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.questions.clone())
    }

    async fn generate_sql(&self, _question: &str) -> Result<String, EngineError> {
        Ok(self.sql.clone())
    }

    async fn run_sql(&self, _sql: &str) -> Result<Table, EngineError> {
        Ok(self.table.clone())
    }

    async fn generate_figure(
        &self,
        _question: &str,
        _sql: &str,
        _table: &Table,
    ) -> Result<String, EngineError> {
        Ok(self.figure.clone())
    }

    async fn generate_followup_questions(
        &self,
        _question: &str,
        _sql: &str,
        _table: &Table,
    ) -> Result<Vec<String>, EngineError> {
        Ok(self.followups.clone())
    }

    async fn training_data(&self) -> Result<Table, EngineError> {
        Ok(self.training.clone())
    }

    async fn remove_training_data(&self, _id: &str) -> Result<bool, EngineError> {
        Ok(self.removable)
    }

    async fn train(&self, _request: &TrainingRequest) -> Result<String, EngineError> {
        Ok(self.training_id.clone())
    }
}

/// Engine failing every call with a remote error.
#[derive(Debug, Clone)]
pub struct FailingEngine {
    message: String,
}

impl FailingEngine {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn err(&self) -> EngineError {
        EngineError::Remote(self.message.clone())
    }
}

#[async_trait]
impl Engine for FailingEngine {
    async fn generate_questions(&self) -> Result<Vec<String>, EngineError> {
        Err(self.err())
    }

    async fn generate_sql(&self, _question: &str) -> Result<String, EngineError> {
        Err(self.err())
    }

    async fn run_sql(&self, _sql: &str) -> Result<Table, EngineError> {
        Err(self.err())
    }

    async fn generate_figure(
        &self,
        _question: &str,
        _sql: &str,
        _table: &Table,
    ) -> Result<String, EngineError> {
        Err(self.err())
    }

    async fn generate_followup_questions(
        &self,
        _question: &str,
        _sql: &str,
        _table: &Table,
    ) -> Result<Vec<String>, EngineError> {
        Err(self.err())
    }

    async fn training_data(&self) -> Result<Table, EngineError> {
        Err(self.err())
    }

    async fn remove_training_data(&self, _id: &str) -> Result<bool, EngineError> {
        Err(self.err())
    }

    async fn train(&self, _request: &TrainingRequest) -> Result<String, EngineError> {
        Err(self.err())
    }
}

/// Engine that records each call (`method` or `method:argument`) before
/// delegating to a `FixedEngine`.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    inner: FixedEngine,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingEngine {
    pub fn new(inner: FixedEngine) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Engine for RecordingEngine {
    async fn generate_questions(&self) -> Result<Vec<String>, EngineError> {
        self.record("generate_questions".to_string());
        self.inner.generate_questions().await
    }

    async fn generate_sql(&self, question: &str) -> Result<String, EngineError> {
        self.record(format!("generate_sql:{question}"));
        self.inner.generate_sql(question).await
    }

    async fn run_sql(&self, sql: &str) -> Result<Table, EngineError> {
        self.record(format!("run_sql:{sql}"));
        self.inner.run_sql(sql).await
    }

    async fn generate_figure(
        &self,
        question: &str,
        sql: &str,
        table: &Table,
    ) -> Result<String, EngineError> {
        self.record(format!("generate_figure:{question}"));
        self.inner.generate_figure(question, sql, table).await
    }

    async fn generate_followup_questions(
        &self,
        question: &str,
        sql: &str,
        table: &Table,
    ) -> Result<Vec<String>, EngineError> {
        self.record(format!("generate_followup_questions:{question}"));
        self.inner
            .generate_followup_questions(question, sql, table)
            .await
    }

    async fn training_data(&self) -> Result<Table, EngineError> {
        self.record("training_data".to_string());
        self.inner.training_data().await
    }

    async fn remove_training_data(&self, id: &str) -> Result<bool, EngineError> {
        self.record(format!("remove_training_data:{id}"));
        self.inner.remove_training_data(id).await
    }

    async fn train(&self, request: &TrainingRequest) -> Result<String, EngineError> {
        self.record("train".to_string());
        self.inner.train(request).await
    }
}
