use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::errors::ResourceError;
use crate::types::dto::user::{
    CreateUserApiResponse, CreateUserRequest, DeleteUserApiResponse, UpdateUserRequest, UserResponse,
};

/// API tags for user endpoints
#[derive(Tags)]
enum UserTags {
    /// User administration and profiles
    Users,
}

/// User API endpoints
pub struct UsersApi {
    app_data: Arc<AppData>,
    user_coordinator: Arc<UserCoordinator>,
}

impl UsersApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_coordinator: Arc::new(UserCoordinator::new(Arc::clone(&app_data))),
            app_data,
        }
    }
}

#[OpenApi]
impl UsersApi {
    /// List all users (admin or manager)
    #[oai(path = "/api/users", method = "get", tag = "UserTags::Users")]
    async fn list(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<UserResponse>>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.user_coordinator.list_users(&ctx).await?))
    }

    /// Create a user (admin)
    #[oai(path = "/api/users", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        let user = self.user_coordinator.create_user(&ctx, body.0).await?;
        Ok(CreateUserApiResponse::Created(Json(user)))
    }

    /// Get a user by email (admin, manager or self)
    #[oai(path = "/api/users/email/:email", method = "get", tag = "UserTags::Users")]
    async fn get_by_email(
        &self,
        req: &Request,
        auth: BearerAuth,
        email: Path<String>,
    ) -> Result<Json<UserResponse>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.user_coordinator.get_user_by_email(&ctx, &email.0).await?))
    }

    /// Get a user by id (admin, manager or self)
    #[oai(path = "/api/users/:id", method = "get", tag = "UserTags::Users")]
    async fn get(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<Json<UserResponse>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.user_coordinator.get_user(&ctx, &id.0).await?))
    }

    /// Update a user (admin or self; roles admin only)
    #[oai(path = "/api/users/:id", method = "put", tag = "UserTags::Users")]
    async fn update(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        Ok(Json(self.user_coordinator.update_user(&ctx, &id.0, body.0).await?))
    }

    /// Delete a user with their feedback and plans (admin)
    #[oai(path = "/api/users/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete(&self, req: &Request, auth: BearerAuth, id: Path<String>) -> Result<DeleteUserApiResponse, ResourceError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        self.user_coordinator.delete_user(&ctx, &id.0).await?;
        Ok(DeleteUserApiResponse::NoContent)
    }
}
