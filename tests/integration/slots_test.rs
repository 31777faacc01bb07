//! Integration tests for the capacity query endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_initial_slots() {
    let app = helpers::TestApp::with_capacity(42).await;

    let response = app.request("GET", "/api/slots", None, "10.0.0.1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        serde_json::json!({ "remaining": 42, "total": 42, "filled": 0 })
    );
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let app = helpers::TestApp::with_capacity(3).await;
    app.signup("a@x.com", "en", "10.0.0.1").await;

    let first = app.request("GET", "/api/slots", None, "10.0.0.2").await;
    for _ in 0..5 {
        let again = app.request("GET", "/api/slots", None, "10.0.0.2").await;
        assert_eq!(again.status, StatusCode::OK);
        assert_eq!(again.body, first.body);
    }
    assert_eq!(
        first.body,
        serde_json::json!({ "remaining": 2, "total": 3, "filled": 1 })
    );
}

#[tokio::test]
async fn test_status_rate_limit() {
    let app = helpers::TestApp::new().await;
    let budget = app.config.rate_limit.status.max_requests;

    for _ in 0..budget {
        let response = app.request("GET", "/api/slots", None, "10.0.0.1").await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app.request("GET", "/api/slots", None, "10.0.0.1").await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["message"], "Rate limit exceeded");

    // Signups keep their own budget.
    let signup = app.signup("a@x.com", "en", "10.0.0.1").await;
    assert_eq!(signup.status, StatusCode::CREATED);
}
