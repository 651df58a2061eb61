use crate::errors::internal::{AuthorizationError, CredentialError, InternalError, UserError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Missing, invalid or expired token
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    DuplicateEmail(Json<ErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse::new(
            "invalid_credentials",
            "Invalid email or password",
            401,
        )))
    }

    /// Create an Unauthenticated error
    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(ErrorResponse::new(
            "unauthenticated",
            "A valid bearer token is required",
            401,
        )))
    }

    pub fn duplicate_email() -> Self {
        AuthError::DuplicateEmail(Json(ErrorResponse::new(
            "duplicate_email",
            "Email already registered",
            409,
        )))
    }

    pub fn validation_failed(message: String) -> Self {
        AuthError::ValidationFailed(Json(ErrorResponse::new("validation_failed", message, 400)))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                Self::unauthenticated()
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                Self::unauthenticated()
            }
            InternalError::Authorization(AuthorizationError::Unauthenticated) => {
                Self::unauthenticated()
            }
            InternalError::User(UserError::DuplicateEmail { email }) => {
                tracing::warn!("Duplicate email registration attempt: {}", email);
                Self::duplicate_email()
            }
            InternalError::Validation { .. } => Self::validation_failed(err.to_string()),
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    ///
    /// Always returns a generic message without exposing internal details.
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(ErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::Unauthenticated(json)
            | AuthError::DuplicateEmail(json)
            | AuthError::ValidationFailed(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
