//! Local checks run on form input before anything reaches the server.
//!
//! The server remains the authority; these only catch obvious mistakes
//! early so the user gets an immediate answer.

use crate::error::ValidationError;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Returns true if the password has at least eight characters, with at
/// least one lowercase letter, one uppercase letter, one digit, and one
/// character that is neither a letter nor a digit.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}

pub(crate) fn check_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn check_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail(trimmed.to_string())),
    }
}
