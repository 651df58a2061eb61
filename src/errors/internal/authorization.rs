use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthorizationError {
    /// No valid token, or the token subject no longer resolves to a user
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Caller {actor_id} may not {operation}")]
    Forbidden { actor_id: String, operation: String },
}

impl AuthorizationError {
    pub fn forbidden(actor_id: &str, operation: &str) -> Self {
        Self::Forbidden {
            actor_id: actor_id.to_string(),
            operation: operation.to_string(),
        }
    }
}
