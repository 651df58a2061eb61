use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),

    #[error("Invalid token: {token_type} - {reason}")]
    InvalidToken { token_type: String, reason: String },

    #[error("Expired token: {0}")]
    ExpiredToken(String),

    #[error("Signing key must be at least {min_bytes} bytes, got {actual}")]
    WeakSigningKey { min_bytes: usize, actual: usize },
}

impl CredentialError {
    pub fn invalid_token(token_type: &str, reason: &str) -> Self {
        Self::InvalidToken {
            token_type: token_type.to_string(),
            reason: reason.to_string(),
        }
    }
}
