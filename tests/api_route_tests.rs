mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use base64::Engine as _;
use flashdeck::config::WorkspaceConfig;
use flashdeck::server::router::{FlashdeckState, flashdeck_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn bearer(sub: &str) -> String {
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(json!({ "sub": sub }).to_string());
    format!("Bearer eyJhbGciOiJSUzI1NiJ9.{payload}.sig")
}

const GATEWAY_KEY: &str = "pwd";

async fn app_with_key(tag: &str, gateway_key: &str) -> Router {
    let store = common::temp_store(tag).await;
    let state = FlashdeckState::new(store, Arc::from(gateway_key), &WorkspaceConfig::default());
    flashdeck_router(state)
}

async fn app(tag: &str) -> Router {
    app_with_key(tag, GATEWAY_KEY).await
}

async fn send(app: &Router, method: &str, uri: &str, sub: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer(sub))
        .header("x-gateway-key", GATEWAY_KEY)
        .header("content-type", "application/json");
    let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
    let resp = app
        .clone()
        .oneshot(builder.body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = app("api-unauth").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/folders")
                .header("x-gateway-key", GATEWAY_KEY)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/folders")
                .header("authorization", "Bearer not-a-jwt")
                .header("x-gateway-key", GATEWAY_KEY)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

async fn sign_in(app: &Router, sub: &str, gateway_key: Option<&str>) -> StatusCode {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("authorization", bearer(sub));
    if let Some(key) = gateway_key {
        builder = builder.header("x-gateway-key", key);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).expect("failed to build request"))
        .await
        .expect("request failed")
        .status()
}

#[tokio::test]
async fn gateway_key_is_enforced() {
    let app = app("api-gateway").await;

    assert_eq!(sign_in(&app, "alice", None).await, StatusCode::UNAUTHORIZED);
    assert_eq!(
        sign_in(&app, "alice", Some("wrong")).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        sign_in(&app, "alice", Some(GATEWAY_KEY)).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn unset_gateway_key_rejects_forged_tokens() {
    let app = app_with_key("api-unset-key", "").await;

    // A self-made token for an existing identity must not get through.
    assert_eq!(sign_in(&app, "alice", None).await, StatusCode::UNAUTHORIZED);
    assert_eq!(sign_in(&app, "alice", Some("")).await, StatusCode::UNAUTHORIZED);

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/folders")
                .header("authorization", bearer("alice"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"planted"}"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_path_and_query_get_json_errors() {
    let app = app("api-extract").await;
    send(&app, "POST", "/api/users", "alice", None).await;

    let (status, body) = send(&app, "GET", "/api/folders/abc", "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(&app, "GET", "/api/folders?page=-1", "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, "DELETE", "/api/folders/1/cards/xyz", "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn folder_and_card_flow_over_http() {
    let app = app("api-flow").await;

    // Not provisioned yet.
    let (status, body) = send(&app, "GET", "/api/folders", "alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, account) = send(&app, "POST", "/api/users", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["externalId"], "alice");
    let (_, again) = send(&app, "POST", "/api/users", "alice", None).await;
    assert_eq!(again["id"], account["id"]);

    let (status, folder) = send(&app, "POST", "/api/folders", "alice", Some(json!({ "name": "Biology" }))).await;
    assert_eq!(status, StatusCode::OK);
    let folder_id = folder["id"].as_i64().expect("folder id");

    let (status, body) = send(&app, "POST", "/api/folders", "alice", Some(json!({ "name": "Biology" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "folder with name Biology already exists");

    let (status, card) = send(
        &app,
        "POST",
        &format!("/api/folders/{folder_id}/cards"),
        "alice",
        Some(json!({ "question": "What is ATP?", "answer": "Energy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["status"], "BAD");
    let card_id = card["id"].as_i64().expect("card id");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/folders/{folder_id}/cards/{card_id}/status"),
        "alice",
        Some(json!({ "status": "GOOD" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, page) = send(&app, "GET", &format!("/api/folders/{folder_id}/cards/status/good"), "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["id"], card_id);

    let (status, _) = send(&app, "GET", &format!("/api/folders/{folder_id}/cards/status/great"), "alice", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, count) = send(&app, "GET", &format!("/api/folders/{folder_id}/cards/count"), "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count, 1);

    let (status, page) = send(&app, "GET", &format!("/api/folders/{folder_id}"), "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["size"], 10);

    let (status, page) = send(&app, "GET", "/api/folders?page=0", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["size"], 5);
    assert_eq!(page["content"][0]["name"], "Biology");

    // Another account sees 403 on the folder and cannot learn about its cards.
    send(&app, "POST", "/api/users", "bob", None).await;
    let (status, body) = send(&app, "GET", &format!("/api/folders/{folder_id}"), "bob", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);

    let (status, _) = send(&app, "DELETE", &format!("/api/folders/{folder_id}"), "alice", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &format!("/api/folders/{folder_id}/cards/{card_id}"), "alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_create_limit_and_malformed_bodies_are_bad_requests() {
    let app = app("api-bulk").await;
    send(&app, "POST", "/api/users", "alice", None).await;
    let (_, folder) = send(&app, "POST", "/api/folders", "alice", Some(json!({ "name": "Bio" }))).await;
    let folder_id = folder["id"].as_i64().expect("folder id");

    let cards: Vec<Value> = (0..11)
        .map(|i| json!({ "question": format!("q{i}"), "answer": "a" }))
        .collect();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/folders/{folder_id}/cards/bulk"),
        "alice",
        Some(json!({ "cards": cards })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        "POST",
        &format!("/api/folders/{folder_id}/cards/bulk"),
        "alice",
        Some(json!({ "cards": &cards[..3] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created.as_array().map(Vec::len), Some(3));

    let (status, body) = send(&app, "POST", "/api/folders", "alice", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app("api-404").await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
