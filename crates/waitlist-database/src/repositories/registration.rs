//! Registration repository implementation.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use waitlist_core::error::AppError;
use waitlist_core::result::AppResult;
use waitlist_core::types::NewSignup;
use waitlist_entity::registration::Registration;

use crate::error::{is_unique_violation_on, map_sqlx_error};

/// Read access to registrations.
///
/// Inserts only happen inside [`crate::DatabaseSlotAllocator::allocate`];
/// the connection-level helpers below are its building blocks.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: SqlitePool,
}

impl RegistrationRepository {
    /// Create a new registration repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count all registrations.
    pub async fn count(&self) -> AppResult<u32> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to count registrations"))?;
        Ok(u32::try_from(total).unwrap_or(u32::MAX))
    }

    /// Find a registration by normalized email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Registration>> {
        sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to find registration"))
    }

    /// Check whether an email already holds a slot.
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to acquire connection"))?;
        email_exists_in(&mut *conn, email).await
    }

    /// Most recent registrations first.
    pub async fn find_recent(&self, limit: u32) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations ORDER BY created_at DESC, slot_number DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list recent registrations"))
    }
}

pub(crate) async fn email_exists_in(conn: &mut SqliteConnection, email: &str) -> AppResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM registrations WHERE email = ? LIMIT 1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to check email"))?;
    Ok(found.is_some())
}

pub(crate) async fn next_slot_number(conn: &mut SqliteConnection) -> AppResult<i64> {
    sqlx::query_scalar("SELECT COALESCE(MAX(slot_number), 0) + 1 FROM registrations")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to compute next slot number"))
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    id: Uuid,
    slot_number: i64,
    signup: &NewSignup,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO registrations \
         (id, email, social, slot_number, locale, ip_address, user_agent, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&signup.email)
    .bind(signup.social.as_deref())
    .bind(slot_number)
    .bind(signup.locale.as_str())
    .bind(&signup.ip_address)
    .bind(&signup.user_agent)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation_on(&e, "registrations.email") {
            AppError::duplicate_email("Email already registered")
        } else {
            map_sqlx_error(e, "Failed to insert registration")
        }
    })?;
    Ok(())
}
