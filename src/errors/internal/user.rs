use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("User ID not found: {user_id}")]
    UserIdNotFound { user_id: String },

    #[error("User email not found: {email}")]
    EmailNotFound { email: String },

    #[error("Unknown role: {name}")]
    UnknownRole { name: String },
}
