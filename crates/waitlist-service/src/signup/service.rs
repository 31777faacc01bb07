//! Signup orchestration: rate limit, validate, allocate with retry.

use std::sync::Arc;

use tracing::{error, info};
use validator::{Validate, ValidationErrors};

use waitlist_core::error::{AppError, ErrorKind};
use waitlist_core::traits::SlotAllocator;
use waitlist_core::types::{CapacitySnapshot, Locale, NewSignup};

use super::request::{ClientMeta, SignupReceipt, SignupRequest};
use crate::rate_limit::RateLimiters;
use crate::retry::{RetryPolicy, with_retry};
use crate::validation;

/// Runs signup requests through the full admission pipeline.
#[derive(Debug, Clone)]
pub struct SignupService {
    /// Durable slot allocator.
    allocator: Arc<dyn SlotAllocator>,
    /// Per-client throttling.
    limiters: RateLimiters,
    /// Retry policy for store calls.
    retry: RetryPolicy,
}

impl SignupService {
    /// Creates a new signup service.
    pub fn new(allocator: Arc<dyn SlotAllocator>, limiters: RateLimiters, retry: RetryPolicy) -> Self {
        Self {
            allocator,
            limiters,
            retry,
        }
    }

    /// The limiters guarding this service.
    pub fn limiters(&self) -> &RateLimiters {
        &self.limiters
    }

    /// Charge one signup attempt to `client_key`.
    pub async fn admit(&self, client_key: &str) -> Result<(), AppError> {
        if self.limiters.signup.is_allowed(client_key).await {
            Ok(())
        } else {
            Err(AppError::rate_limited(
                "Too many signup attempts. Please try again later.",
            ))
        }
    }

    /// Register a signup: rate limit, then validate, then allocate.
    pub async fn register(
        &self,
        request: SignupRequest,
        client: &ClientMeta,
    ) -> Result<SignupReceipt, AppError> {
        self.admit(&client.ip).await?;
        self.register_admitted(request, client).await
    }

    /// Validate and allocate for a request that already passed [`Self::admit`].
    pub async fn register_admitted(
        &self,
        request: SignupRequest,
        client: &ClientMeta,
    ) -> Result<SignupReceipt, AppError> {
        let signup = Self::prepare(request, client)?;

        let grant = with_retry(&self.retry, "allocate_slot", || self.allocator.allocate(&signup))
            .await
            .map_err(|e| storage_failure(e, "Slot allocation failed"))?;

        info!(
            slot_number = grant.slot_number,
            remaining = grant.remaining,
            locale = %signup.locale,
            "New signup"
        );

        Ok(SignupReceipt {
            slot_number: grant.slot_number,
            remaining: grant.remaining,
            message: signup.locale.welcome_message(grant.slot_number),
        })
    }

    /// Current capacity usage, charged to the relaxed status budget.
    pub async fn slots(&self, client_key: &str) -> Result<CapacitySnapshot, AppError> {
        if !self.limiters.status.is_allowed(client_key).await {
            return Err(AppError::rate_limited("Rate limit exceeded"));
        }
        with_retry(&self.retry, "capacity_snapshot", || self.allocator.snapshot())
            .await
            .map_err(|e| storage_failure(e, "Capacity snapshot failed"))
    }

    /// Turn a raw request into a normalized signup, or a validation error.
    pub fn prepare(mut request: SignupRequest, client: &ClientMeta) -> Result<NewSignup, AppError> {
        request.normalize();
        request
            .validate()
            .map_err(|errors| AppError::validation(describe(&errors)))?;

        let locale: Locale = request.locale.parse()?;
        Ok(NewSignup {
            email: request.email.to_lowercase(),
            social: validation::sanitize_social_handle(request.social.as_deref()),
            locale,
            ip_address: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        })
    }
}

/// First validation message, checking fields in a fixed order.
pub fn describe(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["email", "locale", "__all__"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|list| list.iter())
        .chain(fields.values().flat_map(|list| list.iter()))
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// Promote errors that survived the retry budget to `StorageUnavailable`.
fn storage_failure(err: AppError, context: &str) -> AppError {
    match err.kind {
        ErrorKind::TransientStorage => {
            error!(error = ?err, "{context}: retries exhausted");
            AppError::with_source(ErrorKind::StorageUnavailable, "Storage unavailable", err)
        }
        kind if !err.is_client_error() => {
            error!(kind = %kind, error = ?err, "{context}");
            err
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use uuid::Uuid;
    use waitlist_core::config::RateLimitConfig;
    use waitlist_core::result::AppResult;
    use waitlist_core::types::SlotGrant;

    use super::*;

    /// In-memory allocator that fails the first `flaky` calls transiently.
    #[derive(Debug, Default)]
    struct FakeAllocator {
        total: u32,
        flaky: AtomicU32,
        attempts: AtomicU32,
        emails: Mutex<Vec<String>>,
    }

    impl FakeAllocator {
        fn new(total: u32, flaky: u32) -> Self {
            Self {
                total,
                flaky: AtomicU32::new(flaky),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl SlotAllocator for FakeAllocator {
        async fn allocate(&self, signup: &NewSignup) -> AppResult<SlotGrant> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self
                .flaky
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(AppError::transient_storage("database is locked"));
            }
            let mut emails = self.emails.lock().unwrap();
            if emails.len() as u32 >= self.total {
                return Err(AppError::capacity_exhausted("All slots have been taken"));
            }
            if emails.contains(&signup.email) {
                return Err(AppError::duplicate_email("Email already registered"));
            }
            emails.push(signup.email.clone());
            let filled = emails.len() as u32;
            Ok(SlotGrant {
                registration_id: Uuid::now_v7(),
                slot_number: filled,
                remaining: self.total - filled,
            })
        }

        async fn snapshot(&self) -> AppResult<CapacitySnapshot> {
            let filled = self.emails.lock().unwrap().len() as u32;
            Ok(CapacitySnapshot {
                remaining: self.total - filled,
                total: self.total,
                filled,
            })
        }
    }

    fn service(allocator: Arc<FakeAllocator>) -> SignupService {
        let retry = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            multiplier: 2.0,
            jitter_factor: 0.25,
        };
        SignupService::new(
            allocator,
            RateLimiters::from_config(&RateLimitConfig::default()),
            retry,
        )
    }

    fn request(email: &str, locale: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            social: None,
            locale: locale.to_string(),
        }
    }

    fn client(ip: &str) -> ClientMeta {
        ClientMeta {
            ip: ip.to_string(),
            user_agent: "test".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_returns_localized_receipt() {
        let service = service(Arc::new(FakeAllocator::new(10, 0)));

        let receipt = service
            .register(request(" A@X.com ", "ru"), &client("1.1.1.1"))
            .await
            .unwrap();

        assert_eq!(receipt.slot_number, 1);
        assert_eq!(receipt.remaining, 9);
        assert_eq!(receipt.message, "Вы пионер #1!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_is_normalized_before_allocation() {
        let allocator = Arc::new(FakeAllocator::new(10, 0));
        let service = service(Arc::clone(&allocator));

        service
            .register(request(" Mixed@Case.COM ", "en"), &client("1.1.1.1"))
            .await
            .unwrap();
        let err = service
            .register(request("mixed@case.com", "en"), &client("2.2.2.2"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::DuplicateEmail);
        assert_eq!(allocator.emails.lock().unwrap().as_slice(), ["mixed@case.com"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_failure_skips_storage() {
        let allocator = Arc::new(FakeAllocator::new(10, 0));
        let service = service(Arc::clone(&allocator));

        let err = service
            .register(request("not-an-email", "en"), &client("1.1.1.1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid email format");

        let err = service
            .register(request("a@x.com", "fr"), &client("1.1.1.2"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid language");

        let mut bad_social = request("a@x.com", "en");
        bad_social.social = Some("no-at-sign".to_string());
        let err = service
            .register(bad_social, &client("1.1.1.3"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid social handle format");

        assert_eq!(allocator.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_short_circuits_validation() {
        let allocator = Arc::new(FakeAllocator::new(10, 0));
        let service = service(Arc::clone(&allocator));

        for _ in 0..3 {
            let err = service
                .register(request("bad", "en"), &client("9.9.9.9"))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        let err = service
            .register(request("bad", "en"), &client("9.9.9.9"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_absorbed() {
        let allocator = Arc::new(FakeAllocator::new(10, 2));
        let service = service(Arc::clone(&allocator));

        let receipt = service
            .register(request("a@x.com", "en"), &client("1.1.1.1"))
            .await
            .unwrap();

        assert_eq!(receipt.slot_number, 1);
        assert_eq!(allocator.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_survives_retries_without_double_decrement() {
        let allocator = Arc::new(FakeAllocator::new(10, 0));
        let service = service(Arc::clone(&allocator));
        service
            .register(request("dup@x.com", "en"), &client("1.1.1.1"))
            .await
            .unwrap();

        allocator.flaky.store(2, Ordering::SeqCst);
        let err = service
            .register(request("dup@x.com", "en"), &client("2.2.2.2"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::DuplicateEmail);
        let snapshot = service.slots("3.3.3.3").await.unwrap();
        assert_eq!(snapshot.filled, 1);
        assert_eq!(snapshot.remaining, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_become_storage_unavailable() {
        let allocator = Arc::new(FakeAllocator::new(10, 100));
        let service = service(Arc::clone(&allocator));

        let err = service
            .register(request("a@x.com", "en"), &client("1.1.1.1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::StorageUnavailable);
        assert_eq!(allocator.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_use_status_budget() {
        let service = service(Arc::new(FakeAllocator::new(2, 0)));

        for _ in 0..30 {
            service.slots("5.5.5.5").await.unwrap();
        }
        let err = service.slots("5.5.5.5").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimited);

        // The signup budget is untouched.
        service
            .register(request("a@x.com", "en"), &client("5.5.5.5"))
            .await
            .unwrap();
    }
}
