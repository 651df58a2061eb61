use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Feedback author not found: {user_id}")]
    AuthorNotFound { user_id: String },

    #[error("Feedback recipient not found: {user_id}")]
    RecipientNotFound { user_id: String },
}
