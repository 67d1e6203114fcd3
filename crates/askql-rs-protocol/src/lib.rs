//! Wire protocol types for askql responses, tables, and the engine interface.

mod engine;
mod table;

pub use engine::{Engine, EngineError, TrainingRequest};
pub use table::Table;

use serde::{Deserialize, Serialize};

/// Header sent with suggested starter questions.
pub const QUESTIONS_HEADER: &str = "Here are some questions you can ask:";
/// Header sent with follow-up questions.
pub const FOLLOWUP_HEADER: &str = "Here are some followup questions you can ask:";

/// Every response returned by the analysis endpoints, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ApiResponse {
    /// Suggested or follow-up questions.
    QuestionList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        questions: Vec<String>,
        header: String,
    },
    /// SQL generated for a question.
    Sql { id: String, text: String },
    /// Preview of a result table as JSON records text.
    Df { id: String, df: String },
    /// Full result table as CSV text.
    Csv { id: String, csv: String },
    /// Plotly figure JSON text.
    PlotlyFigure { id: String, fig: String },
    /// Every cached field of an analysis.
    QuestionCache {
        id: String,
        question: String,
        sql: String,
        df: String,
        fig: String,
        followup_questions: Vec<String>,
    },
    /// Questions asked so far, oldest first.
    QuestionHistory { questions: Vec<String> },
    /// Human-readable failure.
    Error { error: String },
}

impl ApiResponse {
    /// Build an error response.
    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse::Error {
            error: message.into(),
        }
    }

    /// Return the `type` discriminator used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiResponse::QuestionList { .. } => "question_list",
            ApiResponse::Sql { .. } => "sql",
            ApiResponse::Df { .. } => "df",
            ApiResponse::Csv { .. } => "csv",
            ApiResponse::PlotlyFigure { .. } => "plotly_figure",
            ApiResponse::QuestionCache { .. } => "question_cache",
            ApiResponse::QuestionHistory { .. } => "question_history",
            ApiResponse::Error { .. } => "error",
        }
    }

    /// True for the error variant.
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error { .. })
    }
}

/// Acknowledgements for training data changes (untagged on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TrainingAck {
    /// A training entry was removed.
    Removed { success: bool },
    /// Training material was stored under `id`.
    Trained { id: String },
}
