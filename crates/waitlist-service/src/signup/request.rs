//! Signup request payload and its validation rules.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use waitlist_core::types::Locale;

use crate::validation;

/// Body of `POST /api/signup`.
///
/// Missing fields deserialize to empty values so that shape problems are
/// reported by validation with the usual messages rather than as a body
/// rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "social_matches_locale"))]
pub struct SignupRequest {
    /// Contact email.
    #[serde(default)]
    #[validate(custom(function = "email_shape"))]
    pub email: String,
    /// Optional social handle (`@name`).
    #[serde(default)]
    pub social: Option<String>,
    /// Interface language, `ru` or `en`.
    #[serde(default, alias = "lang")]
    #[validate(custom(function = "supported_locale"))]
    pub locale: String,
}

impl SignupRequest {
    /// Strip surrounding whitespace from the free-text fields.
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_string();
        if let Some(social) = self.social.as_mut() {
            *social = social.trim().to_string();
        }
    }
}

/// Client metadata recorded with a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMeta {
    /// Rate-limit key and recorded address.
    pub ip: String,
    /// Reported user agent.
    pub user_agent: String,
}

impl ClientMeta {
    /// Metadata for a client that identified itself with nothing.
    pub fn unknown() -> Self {
        Self {
            ip: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        }
    }
}

/// A committed signup as reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupReceipt {
    /// Slot handed out.
    pub slot_number: u32,
    /// Slots still open.
    pub remaining: u32,
    /// Localized confirmation line.
    pub message: String,
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn email_shape(value: &str) -> Result<(), ValidationError> {
    if validation::validate_email(value) {
        Ok(())
    } else {
        Err(failure("email", "Invalid email format"))
    }
}

fn supported_locale(value: &str) -> Result<(), ValidationError> {
    if validation::validate_locale(value) {
        Ok(())
    } else {
        Err(failure("locale", "Invalid language"))
    }
}

fn social_matches_locale(request: &SignupRequest) -> Result<(), ValidationError> {
    let (Some(social), Ok(locale)) = (request.social.as_deref(), request.locale.parse::<Locale>())
    else {
        return Ok(());
    };
    if validation::validate_social_handle(social, locale) {
        Ok(())
    } else {
        Err(failure("social", "Invalid social handle format"))
    }
}
