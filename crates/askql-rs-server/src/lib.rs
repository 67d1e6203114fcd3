//! HTTP front end for the askql analyst.
//!
//! Every `/api/v0/*` route maps onto one `Analyst` operation. Failures are
//! rendered as `type: error` payloads rather than HTTP error statuses.

mod error;
mod render;
mod routes;

pub use error::ServerError;
pub use render::{acknowledge, respond};

use askql_rs_core::Analyst;
use axum::Router;
use axum::routing::{get, post};
use log::{info, warn};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

/// Build the application router, optionally serving `static_dir` for
/// non-API paths.
pub fn router(analyst: Analyst, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/v0/generate_questions", get(routes::generate_questions))
        .route("/api/v0/generate_sql", get(routes::generate_sql))
        .route("/api/v0/run_sql", get(routes::run_sql))
        .route("/api/v0/download_csv", get(routes::download_csv))
        .route(
            "/api/v0/generate_plotly_figure",
            get(routes::generate_plotly_figure),
        )
        .route(
            "/api/v0/generate_followup_questions",
            get(routes::generate_followup_questions),
        )
        .route("/api/v0/load_question", get(routes::load_question))
        .route(
            "/api/v0/get_question_history",
            get(routes::question_history),
        )
        .route("/api/v0/get_training_data", get(routes::training_data))
        .route(
            "/api/v0/remove_training_data",
            post(routes::remove_training_data),
        )
        .route("/api/v0/train", post(routes::train))
        .with_state(analyst);

    match static_dir {
        Some(dir) => {
            if !dir.is_dir() {
                warn!("static directory not found (path={})", dir.display());
            }
            api.fallback_service(ServeDir::new(dir))
        }
        None => api,
    }
}

/// Bind `addr` and serve `app` until ctrl-c.
pub async fn serve(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("askql listening (addr={addr})");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("askql stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal (error={err})");
        std::future::pending::<()>().await;
    }
}
