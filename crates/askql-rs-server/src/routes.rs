use crate::render::{acknowledge, respond};
use askql_rs_core::Analyst;
use askql_rs_protocol::TrainingRequest;
use axum::Json;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdParams {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuestionParams {
    #[serde(default)]
    question: Option<String>,
}

pub(crate) async fn generate_questions(State(analyst): State<Analyst>) -> Response {
    respond(analyst.generate_questions().await)
}

pub(crate) async fn generate_sql(
    State(analyst): State<Analyst>,
    Query(params): Query<QuestionParams>,
) -> Response {
    respond(analyst.generate_sql(params.question.as_deref()).await)
}

pub(crate) async fn run_sql(
    State(analyst): State<Analyst>,
    Query(params): Query<IdParams>,
) -> Response {
    respond(analyst.run_sql(params.id.as_deref()).await)
}

pub(crate) async fn download_csv(
    State(analyst): State<Analyst>,
    Query(params): Query<IdParams>,
) -> Response {
    respond(analyst.download_csv(params.id.as_deref()).await)
}

pub(crate) async fn generate_plotly_figure(
    State(analyst): State<Analyst>,
    Query(params): Query<IdParams>,
) -> Response {
    respond(analyst.generate_plotly_figure(params.id.as_deref()).await)
}

pub(crate) async fn generate_followup_questions(
    State(analyst): State<Analyst>,
    Query(params): Query<IdParams>,
) -> Response {
    respond(
        analyst
            .generate_followup_questions(params.id.as_deref())
            .await,
    )
}

pub(crate) async fn load_question(
    State(analyst): State<Analyst>,
    Query(params): Query<IdParams>,
) -> Response {
    respond(analyst.load_question(params.id.as_deref()).await)
}

pub(crate) async fn question_history(State(analyst): State<Analyst>) -> Response {
    respond(analyst.question_history().await)
}

pub(crate) async fn training_data(State(analyst): State<Analyst>) -> Response {
    respond(analyst.training_data().await)
}

pub(crate) async fn remove_training_data(
    State(analyst): State<Analyst>,
    Json(params): Json<IdParams>,
) -> Response {
    acknowledge(analyst.remove_training_data(params.id.as_deref()).await)
}

pub(crate) async fn train(
    State(analyst): State<Analyst>,
    Json(request): Json<TrainingRequest>,
) -> Response {
    acknowledge(analyst.train(&request).await)
}
