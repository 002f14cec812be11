mod common;

use linkhop::application::services::ClickTracker;
use linkhop::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let ctx = common::create_test_context();
    let server = common::test_server(ctx.state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_store_down() {
    let (tx, _rx) = mpsc::channel(10);
    let state = AppState::new(
        Arc::new(common::FailingRepository),
        ClickTracker::new(tx),
        None,
        false,
    );
    let server = common::test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["store"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let ctx = common::create_test_context();
    let common::TestContext { state, clicks, .. } = ctx;
    drop(clicks);
    let server = common::test_server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    assert_eq!(
        response.json::<Value>()["checks"]["click_queue"]["status"],
        "error"
    );
}
