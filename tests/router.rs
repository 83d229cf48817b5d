mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use furbish_storefront::app::build_router;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn app(dir: &tempfile::TempDir) -> Router {
    build_router(common::offline_state(dir.path()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_is_served_with_a_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&dir)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(app(&dir), "/api/admin/orders").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = get_json(app(&dir), "/api/admin/dashboard/revenue?timeframe=weekly").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_tokens_are_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let request = Request::get("/api/orders")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&dir), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/api/orders")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&dir), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn guard_tells_anonymous_visitors_to_sign_in() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(app(&dir), "/api/auth/guard?require_admin=true").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["access"], json!({ "outcome": "redirect", "to": "/auth" }));
    assert_eq!(body["data"]["user"], Value::Null);

    let (_, body) = get_json(app(&dir), "/api/auth/guard?guest_only=true").await;
    assert_eq!(body["data"]["access"], json!({ "outcome": "allow" }));
}

#[tokio::test]
async fn promotions_rotate_every_five_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(app(&dir), "/api/promotions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"]["rotate_every_secs"], 5);
    let index = body["data"]["current_index"].as_u64().unwrap() as usize;
    assert_eq!(body["data"]["current"], body["data"]["items"][index]);
}

#[tokio::test]
async fn wishlist_removal_needs_no_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let id = Uuid::new_v4();
    let (status, body) = post_json(
        app(&dir),
        "/api/wishlist/toggle",
        json!({ "wishlist": [id], "product_id": id }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wishlisted"], false);
    assert_eq!(body["data"]["wishlist"], json!([]));
    assert_eq!(body["data"]["storage_value"], "[]");

    let (status, body) = post_json(app(&dir), "/api/wishlist/products", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn product_images_are_public_but_proofs_are_not() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::offline_state(dir.path());
    state
        .storage
        .upload(
            furbish_storefront::storage::Bucket::ProductImages,
            "p1/1.jpg",
            b"jpeg bytes",
        )
        .await
        .unwrap();
    state
        .storage
        .upload(
            furbish_storefront::storage::Bucket::PaymentProofs,
            "proof.png",
            b"png bytes",
        )
        .await
        .unwrap();
    let app = build_router(state);

    let request = Request::get("/storage/v1/object/public/product-images/p1/1.jpg")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"jpeg bytes");

    let request = Request::get("/storage/v1/object/public/payment-proofs/proof.png")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_paths_get_the_json_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get_json(app(&dir), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nope");
}

#[tokio::test]
async fn wishlist_toggle_drops_stale_entries() {
    let dir = tempfile::tempdir().unwrap();
    let kept = Uuid::new_v4();
    let removed = Uuid::new_v4();
    let (status, body) = post_json(
        app(&dir),
        "/api/wishlist/toggle",
        json!({ "wishlist": ["1", kept, removed], "product_id": removed }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wishlist"], json!([kept]));
    assert_eq!(body["data"]["storage_value"], format!("[\"{kept}\"]"));
}

#[tokio::test]
async fn preflight_allows_the_configured_origin() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/orders/checkout")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();
    let response = app(&dir).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let request = Request::get("/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app(&dir).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
