#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use restree::{Directory, JsonTree, MemoryCollection, ResourceService, ServeConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> axum::Router {
    let root = Directory::new()
        .with_child("things", JsonTree::shared(json!({"apple": {"color": "red"}})))
        .with_child("docs", Arc::new(MemoryCollection::new()));
    ResourceService::new(Arc::new(root)).into_router()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_through_router() {
    let req = Request::builder()
        .uri("/things/apple")
        .header("Accept", "application/json")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json;charset=utf-8"
    );
    let body = body_json(resp).await;
    assert_eq!(body["color"], "red");
    assert_eq!(body["_parent"]["href"], "/things");
}

#[tokio::test]
async fn not_found_is_problem_json() {
    let req = Request::builder()
        .uri("/things/pear")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let body = body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["instance"], "/things/pear");
}

#[tokio::test]
async fn post_then_get() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/docs")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"n": 1}"#))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();

    let req = Request::builder().uri(&location).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["n"], 1);
}

#[tokio::test]
async fn method_override_header() {
    let app = app();
    let put = Request::builder()
        .method("PUT")
        .uri("/docs/x")
        .header("Content-Type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    assert_eq!(app.clone().oneshot(put).await.unwrap().status(), StatusCode::OK);

    let delete = Request::builder()
        .method("POST")
        .uri("/docs/x")
        .header("X-Method-Override", "DELETE")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(delete).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ServeConfig {
        max_body_bytes: 4,
        ..ServeConfig::default()
    };
    let root = Directory::new().with_child("docs", Arc::new(MemoryCollection::new()));
    let app = ResourceService::new(Arc::new(root))
        .with_config(config)
        .into_router();
    let req = Request::builder()
        .method("PUT")
        .uri("/docs/x")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"too": "long"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
