//! Dependency gates placed in front of cached analysis steps.

use crate::error::AnalystError;
use crate::store::FieldStore;
use crate::types::{FieldName, FieldValue, RecordId};
use askql_rs_protocol::Table;
use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

/// Guard that only lets an operation run once its required fields are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    required: &'static [FieldName],
}

impl Gate {
    /// Executing SQL needs the generated SQL.
    pub const RUN_SQL: Gate = Gate::new(&[FieldName::Sql]);
    /// Exporting CSV needs the result table.
    pub const DOWNLOAD_CSV: Gate = Gate::new(&[FieldName::Df]);
    /// Charting needs the table, question, and SQL.
    pub const PLOT: Gate = Gate::new(&[FieldName::Df, FieldName::Question, FieldName::Sql]);
    /// Follow-up questions need the table, question, and SQL.
    pub const FOLLOWUP: Gate = Gate::new(&[FieldName::Df, FieldName::Question, FieldName::Sql]);
    /// Reloading a session needs every field.
    pub const LOAD_QUESTION: Gate = Gate::new(&[
        FieldName::Question,
        FieldName::Sql,
        FieldName::Df,
        FieldName::FigJson,
        FieldName::FollowupQuestions,
    ]);

    /// Declare a gate over `required`, checked in the given order.
    pub const fn new(required: &'static [FieldName]) -> Self {
        Self { required }
    }

    /// Fields this gate requires, in check order.
    pub fn required(&self) -> &'static [FieldName] {
        self.required
    }

    /// Check the id and every required field, stopping at the first failure.
    pub fn resolve(&self, store: &FieldStore, id: Option<&str>) -> Result<Resolved, AnalystError> {
        let id = RecordId::from(id.ok_or(AnalystError::MissingIdentifier)?);
        let values = store.resolve(&id, self.required).map_err(|field| {
            debug!("gate rejected request (id={id}, missing_field={field})");
            AnalystError::MissingField(field)
        })?;
        Ok(Resolved { id, values })
    }

    /// Resolve, then invoke `op` exactly once with the resolved fields.
    ///
    /// `op` never runs when resolution fails. Its own error becomes
    /// `AnalystError::OperationFailed`.
    pub async fn run<F, Fut, T, E>(
        &self,
        store: &FieldStore,
        id: Option<&str>,
        op: F,
    ) -> Result<T, AnalystError>
    where
        F: FnOnce(Resolved) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let resolved = self.resolve(store, id)?;
        let id = resolved.id.clone();
        op(resolved).await.map_err(|err| {
            warn!("gated operation failed (id={id}, error={err})");
            AnalystError::failed(err)
        })
    }
}

/// Record id plus the values a gate resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    id: RecordId,
    values: Vec<FieldValue>,
}

impl Resolved {
    /// Record the values belong to.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Resolved value for `field`; `MissingField` if the gate did not require it.
    pub fn get(&self, field: FieldName) -> Result<&FieldValue, AnalystError> {
        self.values
            .iter()
            .find(|value| value.name() == field)
            .ok_or(AnalystError::MissingField(field))
    }

    /// Resolved question text.
    pub fn question(&self) -> Result<&str, AnalystError> {
        match self.get(FieldName::Question)? {
            FieldValue::Question(text) => Ok(text),
            _ => Err(AnalystError::MissingField(FieldName::Question)),
        }
    }

    /// Resolved SQL text.
    pub fn sql(&self) -> Result<&str, AnalystError> {
        match self.get(FieldName::Sql)? {
            FieldValue::Sql(text) => Ok(text),
            _ => Err(AnalystError::MissingField(FieldName::Sql)),
        }
    }

    /// Resolved result table.
    pub fn df(&self) -> Result<&Arc<Table>, AnalystError> {
        match self.get(FieldName::Df)? {
            FieldValue::Df(table) => Ok(table),
            _ => Err(AnalystError::MissingField(FieldName::Df)),
        }
    }

    /// Resolved figure JSON.
    pub fn fig_json(&self) -> Result<&str, AnalystError> {
        match self.get(FieldName::FigJson)? {
            FieldValue::FigJson(text) => Ok(text),
            _ => Err(AnalystError::MissingField(FieldName::FigJson)),
        }
    }

    /// Resolved follow-up questions.
    pub fn followup_questions(&self) -> Result<&[String], AnalystError> {
        match self.get(FieldName::FollowupQuestions)? {
            FieldValue::FollowupQuestions(questions) => Ok(questions),
            _ => Err(AnalystError::MissingField(FieldName::FollowupQuestions)),
        }
    }

    /// Consume into the values, in the gate's declared order.
    pub fn into_values(self) -> Vec<FieldValue> {
        self.values
    }
}
