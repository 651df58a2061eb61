use poem_openapi::{ApiResponse, Object};
use poem_openapi::payload::Json;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::internal::role::{RoleSet, role_names};

/// Public view of a user; never carries the password hash
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub area: Option<String>,
    pub roles: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UserResponse {
    pub fn from_model(user: user::Model, roles: &RoleSet) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            job_title: user.job_title,
            area: user.area,
            roles: role_names(roles),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Admin-only user creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub job_title: Option<String>,
    pub area: Option<String>,
    /// Role names; defaults to ROLE_COLLABORATOR when omitted
    pub roles: Option<Vec<String>>,
}

/// Partial update; absent fields are left unchanged
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// New password, only applied when present
    pub password: Option<String>,
    /// Absent leaves the value unchanged; blank clears it
    pub job_title: Option<String>,
    pub area: Option<String>,
    /// Replacement role set; only administrators may change roles
    pub roles: Option<Vec<String>>,
}

#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}

#[derive(ApiResponse)]
pub enum DeleteUserApiResponse {
    /// User and everything they own removed
    #[oai(status = 204)]
    NoContent,
}
