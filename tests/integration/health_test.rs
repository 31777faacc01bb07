//! Integration tests for the health endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, "10.0.0.1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert!(response.body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(response.body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let app = helpers::TestApp::new().await;

    for _ in 0..50 {
        let response = app.request("GET", "/api/health", None, "10.0.0.1").await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_unknown_route() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/nope", None, "10.0.0.1").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
