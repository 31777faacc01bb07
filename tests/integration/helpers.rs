//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use waitlist_core::config::AppConfig;
use waitlist_core::traits::SlotAllocator;
use waitlist_database::repositories::CapacityRepository;
use waitlist_database::{DatabasePool, DatabaseSlotAllocator};
use waitlist_service::{RateLimiters, RetryPolicy, SignupService};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db: DatabasePool,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application with the default capacity
    pub async fn new() -> Self {
        Self::with_capacity(500).await
    }

    /// Create a test application over a fresh in-memory database
    pub async fn with_capacity(total: u32) -> Self {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.capacity.total = total;

        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");

        waitlist_database::migration::run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        CapacityRepository::new(db.pool().clone())
            .initialize(total)
            .await
            .expect("Failed to initialize capacity");

        let allocator: Arc<dyn SlotAllocator> =
            Arc::new(DatabaseSlotAllocator::new(db.pool().clone()));
        let signup_service = Arc::new(SignupService::new(
            allocator,
            RateLimiters::from_config(&config.rate_limit),
            RetryPolicy::from_config(&config.retry),
        ));

        let state = waitlist_api::AppState::new(Arc::new(config.clone()), signup_service);
        let router = waitlist_api::build_app(state);

        Self { router, db, config }
    }

    /// Submit a signup from `ip`
    pub async fn signup(&self, email: &str, locale: &str, ip: &str) -> TestResponse {
        let body = serde_json::json!({ "email": email, "locale": locale });
        self.request("POST", "/api/signup", Some(body), ip).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        ip: &str,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.request_raw(method, path, body_str, ip).await
    }

    /// Make an HTTP request with a verbatim body
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: String,
        ip: &str,
    ) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Real-IP", ip)
            .header("User-Agent", "integration-test")
            .body(Body::from(body))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}
