use poem_openapi::{ApiResponse, Object, payload::Json};
use serde::{Deserialize, Serialize};

use super::user::UserResponse;

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email of the account
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model returned on successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed JWT whose subject is the user's email
    pub token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,

    /// User ID (UUID)
    pub id: String,

    pub name: String,

    pub email: String,

    /// Role names held by the user
    pub roles: Vec<String>,
}

/// Self-registration request; new accounts receive the collaborator role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub job_title: Option<String>,
    pub area: Option<String>,
}

/// Response model for whoami endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// User ID (UUID)
    pub user_id: String,

    pub email: String,

    pub roles: Vec<String>,
}

/// API response for register endpoint
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}
