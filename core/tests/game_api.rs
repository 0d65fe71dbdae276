//! HTTP endpoint tests, driven through the router with `oneshot`.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use taptoearn_core::{
    game_api::{router, AppState},
    store::PlayerStore,
};
use tower::ServiceExt;

fn test_app() -> (Router, Arc<PlayerStore>) {
    let store = Arc::new(PlayerStore::in_memory().expect("in-memory store"));
    store.ensure_schema().expect("schema");
    (router(AppState::new(store.clone())), store)
}

async fn send(app: &Router, method: Method, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(res: Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn state_on_empty_store_is_zero_and_one() {
    let (app, _) = test_app();
    let res = send(&app, Method::GET, "/api/state").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({ "balance": 0.0, "per_click": 1.0 }));
}

#[tokio::test]
async fn click_credits_every_player_and_returns_new_sum() {
    let (app, store) = test_app();
    store.upsert_if_absent("A", None, None).unwrap();
    store.upsert_if_absent("B", None, None).unwrap();
    store.credit("A", 10.0).unwrap();
    store.credit("B", 5.0).unwrap();

    let res = send(&app, Method::POST, "/api/click").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({ "balance": 17.0 }));

    assert_eq!(store.get_balance("A").unwrap(), Some(11.0));
    assert_eq!(store.get_balance("B").unwrap(), Some(6.0));

    let res = send(&app, Method::GET, "/api/state").await;
    assert_eq!(json_body(res).await, json!({ "balance": 17.0, "per_click": 1.0 }));
}

#[tokio::test]
async fn click_with_no_players_returns_zero() {
    let (app, _) = test_app();
    let res = send(&app, Method::POST, "/api/click").await;
    assert_eq!(json_body(res).await, json!({ "balance": 0.0 }));
}

#[tokio::test]
async fn click_rejects_get() {
    let (app, _) = test_app();
    let res = send(&app, Method::GET, "/api/click").await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn index_serves_the_game_page_with_or_without_ref() {
    let (app, _) = test_app();
    for uri in ["/", "/?ref=12345"] {
        let res = send(&app, Method::GET, uri).await;
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/click"));
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = test_app();
    let res = send(&app, Method::GET, "/health").await;
    assert_eq!(json_body(res).await, json!({ "status": "ok" }));
}

/// A store without its table stands in for an unavailable database.
#[tokio::test]
async fn store_failure_maps_to_500() {
    let store = Arc::new(PlayerStore::in_memory().unwrap());
    let app = router(AppState::new(store));

    let res = send(&app, Method::GET, "/api/state").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(res).await["error"].as_str().unwrap().contains("Database error"));

    let res = send(&app, Method::POST, "/api/click").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
