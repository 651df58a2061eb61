use thiserror::Error;

pub mod authorization;
pub mod credential;
pub mod database;
pub mod feedback;
pub mod plan;
pub mod user;

pub use authorization::AuthorizationError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use feedback::FeedbackError;
pub use plan::PlanError;
pub use user::UserError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// live in their own enums. Not exposed via API - endpoints convert to
/// `AuthError` or `ResourceError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> InternalError {
        InternalError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    /// True when a store error came from a unique constraint
    pub fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
        let message = err.to_string();
        message.contains("UNIQUE") || message.contains("unique constraint") || message.contains("Duplicate entry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_convert_with_question_mark() {
        fn fails() -> Result<(), InternalError> {
            Err(AuthorizationError::Unauthenticated)?
        }

        assert!(matches!(
            fails(),
            Err(InternalError::Authorization(AuthorizationError::Unauthenticated))
        ));
    }

    #[test]
    fn test_unique_violation_detection() {
        let err = sea_orm::DbErr::Custom("UNIQUE constraint failed: users.email".to_string());
        assert!(InternalError::is_unique_violation(&err));

        let err = sea_orm::DbErr::Custom("no such table: users".to_string());
        assert!(!InternalError::is_unique_violation(&err));
    }

    #[test]
    fn test_validation_error_message() {
        let err = InternalError::validation("email", "must contain '@'");
        assert_eq!(err.to_string(), "Validation failed for email: must contain '@'");
    }
}
