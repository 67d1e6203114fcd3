//! Route-level tests driving the router in process.

use askql_rs_core::{Analyst, AnalystSettings, FieldValue, RecordId, generate_id};
use askql_rs_server::router;
use askql_rs_test_utils::{FailingEngine, FixedEngine, sample_table};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const QUESTION: &str = "Who are the top artists by sales?";
const SQL: &str = "SELECT artist, sales FROM top_artists";

fn analyst() -> Analyst {
    Analyst::new(Arc::new(FixedEngine::new(SQL)), AnalystSettings::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, header::HeaderMap, String) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (
        status,
        headers,
        String::from_utf8(bytes.to_vec()).expect("utf8"),
    )
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).expect("json body")
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> Value {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).expect("json body")
}

#[tokio::test]
async fn question_workflow_over_http() {
    let app = router(analyst(), None);
    let id = generate_id(QUESTION).to_string();

    let sql = get_json(
        &app,
        "/api/v0/generate_sql?question=Who%20are%20the%20top%20artists%20by%20sales%3F",
    )
    .await;
    assert_eq!(sql, json!({ "type": "sql", "id": id, "text": SQL }));

    let df = get_json(&app, &format!("/api/v0/run_sql?id={id}")).await;
    assert_eq!(df["type"], json!("df"));
    assert_eq!(df["df"], json!(sample_table().to_records_json()));

    let fig = get_json(&app, &format!("/api/v0/generate_plotly_figure?id={id}")).await;
    assert_eq!(fig["type"], json!("plotly_figure"));

    let followups = get_json(
        &app,
        &format!("/api/v0/generate_followup_questions?id={id}"),
    )
    .await;
    assert_eq!(
        followups,
        json!({
            "type": "question_list",
            "id": id,
            "questions": ["Which albums sold best?"],
            "header": "Here are some followup questions you can ask:",
        })
    );

    let cached = get_json(&app, &format!("/api/v0/load_question?id={id}")).await;
    assert_eq!(cached["type"], json!("question_cache"));
    assert_eq!(cached["question"], json!(QUESTION));
    assert_eq!(cached["followup_questions"], json!(["Which albums sold best?"]));

    let history = get_json(&app, "/api/v0/get_question_history").await;
    assert_eq!(
        history,
        json!({ "type": "question_history", "questions": [QUESTION] })
    );
}

#[tokio::test]
async fn starter_questions_have_no_id() {
    let app = router(analyst(), None);
    let questions = get_json(&app, "/api/v0/generate_questions").await;
    assert_eq!(
        questions,
        json!({
            "type": "question_list",
            "questions": ["Who are the top artists by sales?"],
            "header": "Here are some questions you can ask:",
        })
    );
}

#[tokio::test]
async fn errors_are_tagged_payloads() {
    let app = router(analyst(), None);
    assert_eq!(
        get_json(&app, "/api/v0/run_sql").await,
        json!({ "type": "error", "error": "No id provided" })
    );
    assert_eq!(
        get_json(&app, "/api/v0/generate_plotly_figure?id=missing").await,
        json!({ "type": "error", "error": "No df found" })
    );
    assert_eq!(
        get_json(&app, "/api/v0/generate_sql").await,
        json!({ "type": "error", "error": "No question provided" })
    );

    let failing = router(
        Analyst::new(
            Arc::new(FailingEngine::new("engine offline")),
            AnalystSettings::default(),
        ),
        None,
    );
    assert_eq!(
        get_json(&failing, "/api/v0/generate_questions").await,
        json!({ "type": "error", "error": "remote error: engine offline" })
    );
}

#[tokio::test]
async fn csv_download_is_an_attachment() {
    let analyst = analyst();
    let id = RecordId::from("id1");
    analyst
        .store()
        .set(&id, FieldValue::Df(Arc::new(sample_table())));
    let app = router(analyst, None);

    let request = Request::get("/api/v0/download_csv?id=id1")
        .body(Body::empty())
        .expect("request");
    let (status, headers, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=id1.csv"
    );
    assert_eq!(body, sample_table().to_csv());
}

#[tokio::test]
async fn training_routes() {
    let app = router(analyst(), None);

    let training = get_json(&app, "/api/v0/get_training_data").await;
    assert_eq!(training["type"], json!("df"));
    assert_eq!(training["id"], json!("training_data"));

    assert_eq!(
        post_json(&app, "/api/v0/remove_training_data", json!({ "id": "t-1" })).await,
        json!({ "success": true })
    );
    assert_eq!(
        post_json(&app, "/api/v0/remove_training_data", json!({})).await,
        json!({ "type": "error", "error": "No id provided" })
    );
    assert_eq!(
        post_json(
            &app,
            "/api/v0/train",
            json!({ "question": QUESTION, "sql": SQL })
        )
        .await,
        json!({ "id": "t-new" })
    );
}

#[tokio::test]
async fn static_files_are_served_for_other_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<h1>askql</h1>").expect("write");
    let app = router(analyst(), Some(dir.path()));

    let request = Request::get("/").body(Body::empty()).expect("request");
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>askql</h1>");

    let history = get_json(&app, "/api/v0/get_question_history").await;
    assert_eq!(history["type"], json!("question_history"));
}

#[tokio::test]
async fn unknown_paths_without_static_dir_are_not_found() {
    let app = router(analyst(), None);
    let request = Request::get("/").body(Body::empty()).expect("request");
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
