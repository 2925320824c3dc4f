//! Field rules for users and comments, checked by the services before anything is
//! persisted. Every failure names the offending field.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{SignupRequest, UpdateProfileRequest};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 15;
pub const EMAIL_MIN: usize = 4;
pub const EMAIL_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const USER_DESCRIPTION_MAX: usize = 50;
pub const COMMENT_DESCRIPTION_MAX: usize = 500;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

/// ValidationError
///
/// A single field constraint violation. Displays as `<field>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if let Some(min) = min {
        if len < min {
            return Err(ValidationError::new(
                field,
                format!("must be at least {min} characters long"),
            ));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(ValidationError::new(
                field,
                format!("must be at most {max} characters long"),
            ));
        }
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    check_length("username", username, Some(USERNAME_MIN), Some(USERNAME_MAX))
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    check_length("email", email, Some(EMAIL_MIN), Some(EMAIL_MAX))?;
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::new("email", "please fill a valid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    check_length("password", password, Some(PASSWORD_MIN), None)
}

pub fn validate_user_description(description: &str) -> Result<(), ValidationError> {
    check_length("description", description, None, Some(USER_DESCRIPTION_MAX))
}

/// Comment bodies are rejected, never truncated.
pub fn validate_comment_description(description: &str) -> Result<(), ValidationError> {
    check_length("description", description, None, Some(COMMENT_DESCRIPTION_MAX))
}

pub fn validate_signup(req: &SignupRequest) -> Result<(), ValidationError> {
    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if let Some(description) = &req.description {
        validate_user_description(description)?;
    }
    Ok(())
}

pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    if let Some(description) = &req.description {
        validate_user_description(description)?;
    }
    Ok(())
}
