use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, payload::Json};

use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::types::dto::auth::{LoginRequest, LoginResponse, RegisterApiResponse, RegisterRequest, WhoAmIResponse};
use crate::types::dto::user::UserResponse;
use crate::types::internal::role::role_names;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Authentication API endpoints
pub struct AuthApi {
    app_data: Arc<AppData>,
    auth_coordinator: Arc<AuthCoordinator>,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: Arc::new(AuthCoordinator::new(Arc::clone(&app_data))),
            app_data,
        }
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with email and password to receive a bearer token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = helpers::anonymous_context(req);
        let outcome = self.auth_coordinator.login(&ctx, &body.email, &body.password).await?;

        Ok(Json(LoginResponse {
            token: outcome.token.token,
            token_type: "Bearer".to_string(),
            expires_at: outcome.token.expires_at,
            id: outcome.user.id,
            name: outcome.user.name,
            email: outcome.user.email,
            roles: role_names(&outcome.roles),
        }))
    }

    /// Create an account with the collaborator role
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, AuthError> {
        let ctx = helpers::anonymous_context(req);
        let (user, roles) = self.auth_coordinator.register(&ctx, body.0).await?;

        Ok(RegisterApiResponse::Created(Json(UserResponse::from_model(user, &roles))))
    }

    /// Return the identity behind the bearer token
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = helpers::authenticated_context(&self.app_data, req, &auth).await?;
        let caller = self.auth_coordinator.whoami(&ctx)?;

        Ok(Json(WhoAmIResponse {
            user_id: caller.user_id.clone(),
            email: caller.email.clone(),
            roles: role_names(&caller.roles),
        }))
    }
}
