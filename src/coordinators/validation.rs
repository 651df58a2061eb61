use crate::errors::InternalError;

/// Minimum password length accepted on create, register and update
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trimmed value, or a validation error when it is blank
pub fn require_text(field: &str, value: &str) -> Result<String, InternalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InternalError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Normalized (trimmed, lowercased) email, or a validation error
pub fn normalize_email(value: &str) -> Result<String, InternalError> {
    let email = require_text("email", value)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Ok(email),
        _ => Err(InternalError::validation("email", format!("'{}' is not a valid email address", email))),
    }
}

pub fn validate_password(password: &str) -> Result<(), InternalError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(InternalError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

/// Blank optional text collapses to `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
