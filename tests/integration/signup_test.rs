//! Integration tests for the signup endpoint.

mod helpers;

use std::collections::HashSet;

use axum::http::StatusCode;

#[tokio::test]
async fn test_signup_success() {
    let app = helpers::TestApp::new().await;

    let response = app.signup("pioneer@example.com", "en", "10.0.0.1").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["slotNumber"], 1);
    assert_eq!(response.body["remaining"], 499);
    assert_eq!(response.body["message"], "You're pioneer #1!");
}

#[tokio::test]
async fn test_signup_accepts_lang_alias_and_social() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/signup",
            Some(serde_json::json!({
                "email": "Ivan@Example.RU",
                "social": "  @пионер  ",
                "lang": "ru",
            })),
            "10.0.0.1",
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Вы пионер #1!");

    let repo = waitlist_database::repositories::RegistrationRepository::new(app.db.pool().clone());
    let stored = repo.find_by_email("ivan@example.ru").await.unwrap().unwrap();
    assert_eq!(stored.social.as_deref(), Some("@пионер"));
    assert_eq!(stored.ip_address.as_deref(), Some("10.0.0.1"));
    assert_eq!(stored.user_agent.as_deref(), Some("integration-test"));
}

#[tokio::test]
async fn test_validation_failures() {
    let app = helpers::TestApp::new().await;

    let response = app.signup("not-an-email", "en", "10.0.0.1").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.body["message"], "Invalid email format");

    let response = app.signup("a@x.com", "de", "10.0.0.2").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid language");

    let response = app
        .request(
            "POST",
            "/api/signup",
            Some(serde_json::json!({
                "email": "a@x.com",
                "social": "@пионер",
                "locale": "en",
            })),
            "10.0.0.3",
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid social handle format");

    let slots = app.request("GET", "/api/slots", None, "10.0.0.9").await;
    assert_eq!(slots.body["filled"], 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request_raw("POST", "/api/signup", "{not json".to_string(), "10.0.0.1")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_duplicate_email_conflicts_without_consuming_capacity() {
    let app = helpers::TestApp::with_capacity(10).await;

    let first = app.signup("dup@x.com", "en", "10.0.0.1").await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.signup("DUP@x.com", "en", "10.0.0.2").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "DUPLICATE_EMAIL");

    let slots = app.request("GET", "/api/slots", None, "10.0.0.9").await;
    assert_eq!(slots.body["remaining"], 9);
    assert_eq!(slots.body["filled"], 1);
}

#[tokio::test]
async fn test_capacity_exhausted() {
    let app = helpers::TestApp::with_capacity(1).await;

    assert_eq!(
        app.signup("a@x.com", "en", "10.0.0.1").await.status,
        StatusCode::CREATED
    );

    let response = app.signup("b@x.com", "en", "10.0.0.2").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CAPACITY_EXHAUSTED");
    assert_eq!(response.body["details"]["remaining"], 0);
}

#[tokio::test]
async fn test_rate_limit_on_fourth_attempt() {
    let app = helpers::TestApp::new().await;

    for i in 0..3 {
        let response = app.signup(&format!("u{i}@x.com"), "en", "10.0.0.1").await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app.signup("u3@x.com", "en", "10.0.0.1").await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["error"], "RATE_LIMITED");
    assert_eq!(response.body["retryAfter"], 60);
    assert_eq!(response.headers["retry-after"], "60");

    // Rejected before validation: an invalid body is still 429.
    let response = app.signup("bad", "en", "10.0.0.1").await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    let other = app.signup("u3@x.com", "en", "10.0.0.2").await;
    assert_eq!(other.status, StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_slots_two_concurrent_pioneers() {
    let app = helpers::TestApp::with_capacity(2).await;

    let (a, b) = tokio::join!(
        app.signup("a@x.com", "en", "10.0.0.1"),
        app.signup("b@x.com", "en", "10.0.0.2"),
    );
    assert_eq!(a.status, StatusCode::CREATED);
    assert_eq!(b.status, StatusCode::CREATED);

    let slots: HashSet<u64> = [&a, &b]
        .iter()
        .map(|r| r.body["slotNumber"].as_u64().unwrap())
        .collect();
    assert_eq!(slots, HashSet::from([1, 2]));

    let c = app.signup("c@x.com", "en", "10.0.0.3").await;
    assert_eq!(c.status, StatusCode::CONFLICT);
    assert_eq!(c.body["error"], "CAPACITY_EXHAUSTED");

    let snapshot = app.request("GET", "/api/slots", None, "10.0.0.9").await;
    assert_eq!(snapshot.body["remaining"], 0);
    assert_eq!(snapshot.body["filled"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_overselling_under_load() {
    let capacity = 5;
    let attempts = 20;
    let app = helpers::TestApp::with_capacity(capacity).await;

    let responses = futures::future::join_all((0..attempts).map(|i| {
        let app = &app;
        async move {
            app.signup(&format!("user{i}@x.com"), "en", &format!("10.1.0.{i}"))
                .await
        }
    }))
    .await;

    let mut slots = HashSet::new();
    let mut exhausted = 0;
    for response in &responses {
        match response.status {
            StatusCode::CREATED => {
                let slot = response.body["slotNumber"].as_u64().unwrap();
                assert!((1..=u64::from(capacity)).contains(&slot));
                assert!(slots.insert(slot), "slot {slot} handed out twice");
            }
            StatusCode::CONFLICT => {
                assert_eq!(response.body["error"], "CAPACITY_EXHAUSTED");
                exhausted += 1;
            }
            other => panic!("unexpected status {other}: {:?}", response.body),
        }
    }

    assert_eq!(slots.len(), capacity as usize);
    assert_eq!(exhausted, attempts - capacity);
}
