mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use warden_api::{db::MemoryUserStore, router, AppState};

use common::auth_service;

fn app() -> Router {
    router(AppState {
        auth: auth_service(Arc::new(MemoryUserStore::new())),
    })
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let rsp = app.clone().oneshot(req).await.unwrap();
    let status = rsp.status();
    let bytes = axum::body::to_bytes(rsp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn user_lifecycle_over_http() {
    let app = app();

    let creds = json!({ "usr": "nefix", "pwd": "f0cKT3rF$" });

    let (status, _) = send(&app, post_json("/users", creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_json("/users", creds.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], r#"error adding the user "nefix": already exists"#);

    let (status, body) = send(&app, post_json("/users/login", creds)).await;
    assert_eq!(status, StatusCode::OK);
    let tkn = body["tkn"].as_str().unwrap().to_string();
    assert!(body["tkn_expiration"].is_string());

    let renew = Request::builder()
        .method("POST")
        .uri("/users/token/renew")
        .header("tkn", &tkn)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, renew).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["tkn"].as_str().unwrap().is_empty());

    let list = Request::builder().uri("/users").body(Body::empty()).unwrap();
    let (status, body) = send(&app, list).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["usr"], "nefix");
    assert_eq!(body["users"][0]["auth_type"], "local");
    assert!(body["users"][0].get("password_hash").is_none());

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/users/nefix")
            .body(Body::empty())
            .unwrap()
    };
    let (status, _) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], r#"error deleting the user "nefix": not found"#);
}

#[tokio::test]
async fn error_codes_map_to_http_statuses() {
    let app = app();

    let weak = post_json("/users", json!({ "usr": "nefix", "pwd": "" }));
    let (status, body) = send(&app, weak).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "the password requires, at least, a length of 8 characters");

    let unknown = post_json("/users/login", json!({ "usr": "nefix", "pwd": "x" }));
    let (status, body) = send(&app, unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], r#"error logging in: user "nefix" not found"#);

    let no_token = Request::builder()
        .method("POST")
        .uri("/users/token/renew")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, no_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not authenticated");

    let bad_token = Request::builder()
        .method("POST")
        .uri("/users/token/renew")
        .header("tkn", "invalid tkn")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, bad_token).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "error renewing the token: the token is invalid or can't be renewed"
    );
}
