use crate::errors::internal::{
    AuthorizationError, CredentialError, FeedbackError, InternalError, PlanError, UserError,
};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Errors returned by the user, feedback and plan endpoints
#[derive(ApiResponse, Debug)]
pub enum ResourceError {
    /// Missing, invalid or expired token
    #[oai(status = 401)]
    Unauthenticated(Json<ErrorResponse>),

    /// Caller lacks the role or identity the operation requires
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Referenced resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Malformed body or references to missing users
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Unique field already taken
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ResourceError {
    pub fn unauthenticated() -> Self {
        ResourceError::Unauthenticated(Json(ErrorResponse::new(
            "unauthenticated",
            "A valid bearer token is required",
            401,
        )))
    }

    pub fn forbidden() -> Self {
        ResourceError::Forbidden(Json(ErrorResponse::new(
            "forbidden",
            "Insufficient role or identity for this operation",
            403,
        )))
    }

    pub fn not_found(message: String) -> Self {
        ResourceError::NotFound(Json(ErrorResponse::new("not_found", message, 404)))
    }

    pub fn bad_request(error: &str, message: String) -> Self {
        ResourceError::BadRequest(Json(ErrorResponse::new(error, message, 400)))
    }

    pub fn conflict(message: String) -> Self {
        ResourceError::Conflict(Json(ErrorResponse::new("conflict", message, 409)))
    }

    fn internal_server_error() -> Self {
        ResourceError::InternalError(Json(ErrorResponse::new(
            "internal_error",
            "An internal error occurred",
            500,
        )))
    }

    /// Convert InternalError to ResourceError
    ///
    /// Infrastructure failures are logged and replaced by a generic message.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Authorization(AuthorizationError::Unauthenticated)
            | InternalError::Credential(CredentialError::InvalidToken { .. })
            | InternalError::Credential(CredentialError::ExpiredToken(_)) => {
                Self::unauthenticated()
            }
            InternalError::Authorization(AuthorizationError::Forbidden { actor_id, operation }) => {
                tracing::info!("Denied {} for {}", operation, actor_id);
                Self::forbidden()
            }
            InternalError::User(UserError::UserIdNotFound { .. })
            | InternalError::User(UserError::EmailNotFound { .. })
            | InternalError::Plan(PlanError::PlanNotFound { .. }) => Self::not_found(err.to_string()),
            InternalError::User(UserError::DuplicateEmail { .. }) => {
                Self::conflict("Email already registered".to_string())
            }
            InternalError::User(UserError::UnknownRole { .. }) => {
                Self::bad_request("unknown_role", err.to_string())
            }
            InternalError::Feedback(FeedbackError::AuthorNotFound { .. })
            | InternalError::Feedback(FeedbackError::RecipientNotFound { .. })
            | InternalError::Plan(PlanError::OwnerNotFound { .. })
            | InternalError::Plan(PlanError::ForeignGoal { .. }) => {
                Self::bad_request("unresolved_reference", err.to_string())
            }
            InternalError::Validation { .. } => Self::bad_request("validation_failed", err.to_string()),
            _ => {
                tracing::error!("Unexpected error in resource operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            ResourceError::Unauthenticated(json)
            | ResourceError::Forbidden(json)
            | ResourceError::NotFound(json)
            | ResourceError::BadRequest(json)
            | ResourceError::Conflict(json)
            | ResourceError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for ResourceError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
