//! Conversion of analyst results into HTTP responses.

use askql_rs_core::AnalystError;
use askql_rs_protocol::{ApiResponse, TrainingAck};
use axum::Json;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use log::debug;

/// Render a result as JSON, or as a CSV attachment for exports.
///
/// Errors are ordinary `type: error` payloads with status 200.
pub fn respond(result: Result<ApiResponse, AnalystError>) -> Response {
    match result {
        Ok(ApiResponse::Csv { id, csv }) => csv_attachment(&id, csv),
        Ok(response) => Json(response).into_response(),
        Err(err) => error(err),
    }
}

/// Render a training acknowledgement, untagged on success.
pub fn acknowledge(result: Result<TrainingAck, AnalystError>) -> Response {
    match result {
        Ok(ack) => Json(ack).into_response(),
        Err(err) => error(err),
    }
}

fn error(err: AnalystError) -> Response {
    debug!("request rejected (error={err})");
    Json(ApiResponse::from(err)).into_response()
}

fn csv_attachment(id: &str, csv: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={id}.csv"),
            ),
        ],
        csv,
    )
        .into_response()
}
