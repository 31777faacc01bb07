//! Mapping of sqlx failures onto the application error taxonomy.
//!
//! The split that matters is transient versus final: SQLite reports lock
//! contention as `SQLITE_BUSY`/`SQLITE_LOCKED`, the pool reports saturation
//! as an acquire timeout, and both clear up on their own. Constraint
//! violations never do.

use waitlist_core::error::{AppError, ErrorKind};

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_IOERR: i32 = 10;

/// Wrap a sqlx error with `context`, choosing the kind by transience.
pub fn map_sqlx_error(err: sqlx::Error, context: &str) -> AppError {
    if is_transient(&err) {
        AppError::with_source(ErrorKind::TransientStorage, context.to_string(), err)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}

/// Whether retrying the same statement may succeed.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => {
            // Extended result codes keep the primary code in the low byte.
            let primary = db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| code & 0xff);
            if matches!(primary, Some(SQLITE_BUSY | SQLITE_LOCKED | SQLITE_IOERR)) {
                return true;
            }
            is_transient_message(db.message())
        }
        _ => false,
    }
}

/// Whether a unique constraint on `column` (e.g. `registrations.email`) fired.
pub fn is_unique_violation_on(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation() && db.message().contains(column),
        _ => false,
    }
}

fn is_transient_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("database is locked")
        || message.contains("busy")
        || message.contains("timeout")
        || message.contains("disk i/o error")
}
