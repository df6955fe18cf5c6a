//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mood_cache::{api::create_router, AppState, Config};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (AppState, Router) {
    let state = AppState::from_config(&Config::default());
    let app = create_router(state.clone());
    (state, app)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_entry() {
    let (_, app) = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put(
            "/caches/user_data/entries/profile",
            r#"{"value":{"name":"sam","streak":12}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);
    let json = body_to_json(set_response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("profile"));

    let get_response = app
        .oneshot(get("/caches/user_data/entries/profile"))
        .await
        .unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"], "profile");
    assert_eq!(json["value"], json!({"name": "sam", "streak": 12}));
}

#[tokio::test]
async fn test_set_with_ttl_expires() {
    let (state, app) = create_test_app();

    let response = app
        .clone()
        .oneshot(put("/caches/api/entries/short", r#"{"value":1,"ttl_ms":20}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.caches.api.has("short"));

    tokio::time::sleep(Duration::from_millis(60)).await;

    let response = app.oneshot(get("/caches/api/entries/short")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_invalid_body() {
    let (_, app) = create_test_app();

    let response = app
        .oneshot(put("/caches/api/entries/k", r#"{"ttl_ms":20}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_cache() {
    let (_, app) = create_test_app();

    let response = app
        .oneshot(put("/caches/sessions/entries/k", r#"{"value":1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("sessions"));
}

// == DELETE ==

#[tokio::test]
async fn test_delete_entry() {
    let (state, app) = create_test_app();
    state.caches.api.set("GET:/api/moods", json!([]));

    let response = app
        .clone()
        .oneshot(delete("/caches/api/entries/GET:%2Fapi%2Fmoods"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.caches.api.is_empty());

    let response = app
        .oneshot(delete("/caches/api/entries/GET:%2Fapi%2Fmoods"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_cache() {
    let (state, app) = create_test_app();
    state.caches.static_data.set("plans", json!(["free", "pro"]));
    state.caches.static_data.set("faq", json!([]));
    state.caches.api.set("untouched", json!(true));

    let response = app.oneshot(delete("/caches/static")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["cache"], "static");
    assert_eq!(json["cleared"], 2);
    assert!(state.caches.static_data.is_empty());
    assert!(state.caches.api.has("untouched"));
}

// == STATS / LIST / HEALTH ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (state, app) = create_test_app();
    state.caches.api.set("hot", json!(1));
    state.caches.api.set("cold", json!(2));
    state.caches.api.get("hot");
    state.caches.api.get("hot");
    state.caches.api.get("hot");

    let response = app.oneshot(get("/caches/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["size"], 2);
    assert_eq!(json["max_size"], 50);
    assert_eq!(json["hit_rate"], 60.0);
    assert_eq!(json["entries"][0]["key"], "hot");
    assert_eq!(json["entries"][0]["hits"], 3);
    assert_eq!(json["entries"][1]["key"], "cold");
}

#[tokio::test]
async fn test_list_caches() {
    let (_, app) = create_test_app();

    let response = app.oneshot(get("/caches")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["caches"], json!(["api", "user_data", "static"]));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_, app) = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
