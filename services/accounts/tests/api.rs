use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use garden_defence_accounts::{router, Store, DEMO_PASSWORD, DEMO_USERNAME};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let store = Store::in_memory().await.expect("in-memory database");
    store.migrate().await.expect("schema");
    store.seed_demo_user().await.expect("seed");
    router(store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn register(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "username": username, "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["userId"].as_i64().expect("user id")
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));
}

#[tokio::test]
async fn register_then_login_returns_same_account() {
    let app = app().await;
    let user_id = register(&app, "ana").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "username": "ana", "password": "hunter2" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "userId": user_id, "username": "ana" }));
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app().await;
    let _ = register(&app, "ana").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "username": "ana", "password": "other" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username already exists");
}

#[tokio::test]
async fn registration_requires_username_and_password() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        Some(json!({ "username": "ana" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_json_body_is_a_client_error() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/game/score")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"userId\": 1,"))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json error body");
    assert_eq!(body["error"], "request body must be a JSON object");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "username": DEMO_USERNAME, "password": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid username or password");
}

#[tokio::test]
async fn demo_account_can_log_in() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({ "username": DEMO_USERNAME, "password": DEMO_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], DEMO_USERNAME);
}

#[tokio::test]
async fn scores_are_saved_and_listed_best_first() {
    let app = app().await;
    let user_id = register(&app, "ana").await;

    for (score, user) in [(120, json!(user_id)), (300, json!(user_id.to_string()))] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/game/score",
            Some(json!({ "userId": user, "level": 1, "score": score, "waves": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["userId"], user_id);
        assert_eq!(body["score"], score);
        assert!(body["createdAt"].is_string());
    }

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/game/score?userId={user_id}"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scores: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|row| row["score"].as_i64().expect("score"))
        .collect();
    assert_eq!(scores, vec![300, 120]);
}

#[tokio::test]
async fn leaderboard_returns_at_most_ten_rows() {
    let app = app().await;
    let user_id = register(&app, "ana").await;
    for score in 0..12 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/game/score",
            Some(json!({ "userId": user_id, "level": 1, "score": score * 10, "waves": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/game/score?userId={user_id}"),
        None,
    )
    .await;

    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["score"], 110);
}

#[tokio::test]
async fn score_submission_requires_every_field() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/game/score",
        Some(json!({ "userId": 1, "level": 1, "score": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields");
}

#[tokio::test]
async fn listing_scores_requires_user_id() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/game/score", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing user id");
}

#[tokio::test]
async fn score_for_unknown_user_is_a_server_error() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/game/score",
        Some(json!({ "userId": 999, "level": 1, "score": 10, "waves": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "failed to save score");
}
