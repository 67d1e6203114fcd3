//! Analysis service: runs each enrichment step against the engine and caches
//! its result on the record.

use crate::error::AnalystError;
use crate::gate::Gate;
use crate::ids::generate_id;
use crate::store::FieldStore;
use crate::types::{FieldName, FieldValue};
use askql_rs_config::DisplayConfig;
use askql_rs_protocol::{
    ApiResponse, Engine, FOLLOWUP_HEADER, QUESTIONS_HEADER, TrainingAck, TrainingRequest,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Id reported for the training data listing.
const TRAINING_DATA_ID: &str = "training_data";

/// Preview sizes applied to table responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalystSettings {
    /// Rows included in query result previews.
    pub preview_rows: usize,
    /// Rows included in the training data listing.
    pub training_preview_rows: usize,
}

impl Default for AnalystSettings {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for AnalystSettings {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            preview_rows: display.preview_rows,
            training_preview_rows: display.training_preview_rows,
        }
    }
}

/// Engine plus result cache, exposing one method per endpoint.
#[derive(Clone)]
pub struct Analyst {
    engine: Arc<dyn Engine>,
    store: FieldStore,
    settings: AnalystSettings,
}

impl Analyst {
    /// Create a service with a fresh cache.
    pub fn new(engine: Arc<dyn Engine>, settings: AnalystSettings) -> Self {
        Self::with_store(engine, settings, FieldStore::new())
    }

    /// Create a service over an existing cache.
    pub fn with_store(engine: Arc<dyn Engine>, settings: AnalystSettings, store: FieldStore) -> Self {
        Self {
            engine,
            store,
            settings,
        }
    }

    /// Cache backing this service.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Preview settings in use.
    pub fn settings(&self) -> AnalystSettings {
        self.settings
    }

    /// Suggest starter questions.
    pub async fn generate_questions(&self) -> Result<ApiResponse, AnalystError> {
        let questions = self
            .engine
            .generate_questions()
            .await
            .map_err(AnalystError::failed)?;
        Ok(ApiResponse::QuestionList {
            id: None,
            questions,
            header: QUESTIONS_HEADER.to_string(),
        })
    }

    /// Generate SQL for a question and cache both under the question's id.
    pub async fn generate_sql(&self, question: Option<&str>) -> Result<ApiResponse, AnalystError> {
        let question = question.ok_or(AnalystError::MissingParameter("question"))?;
        let id = generate_id(question);
        info!("generating sql (id={id}, question_len={})", question.len());
        let sql = self.engine.generate_sql(question).await.map_err(|err| {
            warn!("sql generation failed (id={id}, error={err})");
            AnalystError::failed(err)
        })?;

        self.store
            .set(&id, FieldValue::Question(question.to_string()));
        self.store.set(&id, FieldValue::Sql(sql.clone()));
        Ok(ApiResponse::Sql {
            id: id.to_string(),
            text: sql,
        })
    }

    /// Run the cached SQL and cache the result table.
    pub async fn run_sql(&self, id: Option<&str>) -> Result<ApiResponse, AnalystError> {
        Gate::RUN_SQL
            .run(&self.store, id, |resolved| async move {
                let sql = resolved.sql()?;
                debug!("running sql (id={}, sql_len={})", resolved.id(), sql.len());
                let table = Arc::new(
                    self.engine
                        .run_sql(sql)
                        .await
                        .map_err(AnalystError::failed)?,
                );
                self.store
                    .set(resolved.id(), FieldValue::Df(table.clone()));
                Ok::<_, AnalystError>(ApiResponse::Df {
                    id: resolved.id().to_string(),
                    df: table.head(self.settings.preview_rows).to_records_json(),
                })
            })
            .await
    }

    /// Export the cached table as CSV.
    pub async fn download_csv(&self, id: Option<&str>) -> Result<ApiResponse, AnalystError> {
        let resolved = Gate::DOWNLOAD_CSV.resolve(&self.store, id)?;
        Ok(ApiResponse::Csv {
            id: resolved.id().to_string(),
            csv: resolved.df()?.to_csv(),
        })
    }

    /// Build a chart for the cached table and cache the figure.
    pub async fn generate_plotly_figure(
        &self,
        id: Option<&str>,
    ) -> Result<ApiResponse, AnalystError> {
        Gate::PLOT
            .run(&self.store, id, |resolved| async move {
                let fig = self
                    .engine
                    .generate_figure(resolved.question()?, resolved.sql()?, resolved.df()?)
                    .await
                    .map_err(AnalystError::failed)?;
                self.store
                    .set(resolved.id(), FieldValue::FigJson(fig.clone()));
                Ok::<_, AnalystError>(ApiResponse::PlotlyFigure {
                    id: resolved.id().to_string(),
                    fig,
                })
            })
            .await
    }

    /// Suggest follow-up questions and cache them.
    pub async fn generate_followup_questions(
        &self,
        id: Option<&str>,
    ) -> Result<ApiResponse, AnalystError> {
        Gate::FOLLOWUP
            .run(&self.store, id, |resolved| async move {
                let questions = self
                    .engine
                    .generate_followup_questions(
                        resolved.question()?,
                        resolved.sql()?,
                        resolved.df()?,
                    )
                    .await
                    .map_err(AnalystError::failed)?;
                self.store.set(
                    resolved.id(),
                    FieldValue::FollowupQuestions(questions.clone()),
                );
                Ok::<_, AnalystError>(ApiResponse::QuestionList {
                    id: Some(resolved.id().to_string()),
                    questions,
                    header: FOLLOWUP_HEADER.to_string(),
                })
            })
            .await
    }

    /// Return every cached field of a completed analysis.
    pub async fn load_question(&self, id: Option<&str>) -> Result<ApiResponse, AnalystError> {
        let resolved = Gate::LOAD_QUESTION.resolve(&self.store, id)?;
        Ok(ApiResponse::QuestionCache {
            id: resolved.id().to_string(),
            question: resolved.question()?.to_string(),
            sql: resolved.sql()?.to_string(),
            df: resolved
                .df()?
                .head(self.settings.preview_rows)
                .to_records_json(),
            fig: resolved.fig_json()?.to_string(),
            followup_questions: resolved.followup_questions()?.to_vec(),
        })
    }

    /// List questions asked so far, oldest first.
    pub async fn question_history(&self) -> Result<ApiResponse, AnalystError> {
        let questions = self
            .store
            .get_all(&[FieldName::Question])
            .into_iter()
            .filter_map(|value| match value {
                FieldValue::Question(text) => Some(text),
                _ => None,
            })
            .collect();
        Ok(ApiResponse::QuestionHistory { questions })
    }

    /// Preview the engine's training data.
    pub async fn training_data(&self) -> Result<ApiResponse, AnalystError> {
        let table = self
            .engine
            .training_data()
            .await
            .map_err(AnalystError::failed)?;
        Ok(ApiResponse::Df {
            id: TRAINING_DATA_ID.to_string(),
            df: table
                .head(self.settings.training_preview_rows)
                .to_records_json(),
        })
    }

    /// Remove a training entry.
    pub async fn remove_training_data(
        &self,
        id: Option<&str>,
    ) -> Result<TrainingAck, AnalystError> {
        let id = id.ok_or(AnalystError::MissingIdentifier)?;
        info!("removing training data (id={id})");
        let removed = self
            .engine
            .remove_training_data(id)
            .await
            .map_err(AnalystError::failed)?;
        if removed {
            Ok(TrainingAck::Removed { success: true })
        } else {
            Err(AnalystError::OperationFailed(
                "Couldn't remove training data".to_string(),
            ))
        }
    }

    /// Submit training material.
    pub async fn train(&self, request: &TrainingRequest) -> Result<TrainingAck, AnalystError> {
        info!(
            "adding training data (question={}, sql={}, ddl={}, documentation={})",
            request.question.is_some(),
            request.sql.is_some(),
            request.ddl.is_some(),
            request.documentation.is_some()
        );
        let id = self
            .engine
            .train(request)
            .await
            .map_err(AnalystError::failed)?;
        Ok(TrainingAck::Trained { id })
    }
}
