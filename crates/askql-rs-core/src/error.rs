//! Error types for gated analysis operations.

use crate::types::FieldName;
use askql_rs_protocol::ApiResponse;
use thiserror::Error;

/// Failures reported to the caller of an analysis operation.
///
/// The display text is the user-facing message placed in error responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalystError {
    /// The request did not carry a record id.
    #[error("No id provided")]
    MissingIdentifier,
    /// A prerequisite field is not cached for the record.
    #[error("No {0} found")]
    MissingField(FieldName),
    /// A required request parameter was absent.
    #[error("No {0} provided")]
    MissingParameter(&'static str),
    /// The downstream operation failed.
    #[error("{0}")]
    OperationFailed(String),
}

impl AnalystError {
    /// Wrap any displayable failure from a downstream call.
    pub fn failed(err: impl std::fmt::Display) -> Self {
        AnalystError::OperationFailed(err.to_string())
    }
}

impl From<AnalystError> for ApiResponse {
    fn from(err: AnalystError) -> Self {
        ApiResponse::error(err.to_string())
    }
}
