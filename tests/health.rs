mod common;

use axum::extract::State;
use furbish_storefront::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = common::offline_state(dir.path());

    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.discounts, 3);
}
