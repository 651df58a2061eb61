use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::validation::{normalize_email, optional_text, require_text, validate_password};
use crate::errors::InternalError;
use crate::providers::access_policy::{self, AccessRequirement};
use crate::providers::token_provider::IssuedToken;
use crate::providers::{AuthenticationProvider, PasswordProvider, TokenProvider};
use crate::stores::user_store::NewUser;
use crate::stores::{RoleStore, UserStore};
use crate::types::db::user;
use crate::types::dto::auth::RegisterRequest;
use crate::types::internal::caller::Caller;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::{Role, RoleSet};

/// Outcome of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: user::Model,
    pub roles: RoleSet,
}

/// Authentication coordinator that orchestrates login, registration and whoami
///
/// Handles workflow orchestration by composing provider operations for the
/// `/auth` endpoints. Contains no business logic.
pub struct AuthCoordinator {
    db: DatabaseConnection,
    authentication_provider: Arc<AuthenticationProvider>,
    token_provider: Arc<TokenProvider>,
    password_provider: Arc<PasswordProvider>,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            authentication_provider: Arc::clone(&app_data.providers.authentication_provider),
            token_provider: Arc::clone(&app_data.providers.token_provider),
            password_provider: Arc::clone(&app_data.providers.password_provider),
            user_store: Arc::clone(&app_data.stores.user_store),
            role_store: Arc::clone(&app_data.stores.role_store),
        }
    }

    /// Verify credentials and issue a token whose subject is the email
    pub async fn login(&self, ctx: &RequestContext, email: &str, password: &str) -> Result<LoginOutcome, InternalError> {
        let email = email.trim().to_lowercase();

        let (user, roles) = match self.authentication_provider.verify_credentials(&self.db, &email, password).await {
            Ok(found) => found,
            Err(e) => {
                tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Login failed for {}", email);
                return Err(e);
            }
        };

        let token = self.token_provider.issue(&user.email)?;
        tracing::info!(request_id = %ctx.request_id, "Login succeeded for {}", user.email);

        Ok(LoginOutcome { token, user, roles })
    }

    /// Create an account holding only the collaborator role
    pub async fn register(
        &self,
        ctx: &RequestContext,
        request: RegisterRequest,
    ) -> Result<(user::Model, RoleSet), InternalError> {
        let new_user = NewUser {
            email: normalize_email(&request.email)?,
            name: require_text("name", &request.name)?,
            password_hash: {
                validate_password(&request.password)?;
                self.password_provider.hash_password(&request.password)?
            },
            job_title: optional_text(request.job_title),
            area: optional_text(request.area),
        };
        let roles = RoleSet::from([Role::Collaborator]);

        let txn = begin_transaction(&self.db).await?;
        let user = self.user_store.insert(&txn, new_user).await?;
        self.role_store.set_user_roles(&txn, &user.id, &roles).await?;
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "Registered user {}", user.id);
        Ok((user, roles))
    }

    /// Return the verified caller
    pub fn whoami<'c>(&self, ctx: &'c RequestContext) -> Result<&'c Caller, InternalError> {
        access_policy::authorize(ctx, AccessRequirement::Authenticated, "whoami")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AuthorizationError, CredentialError, UserError};
    use crate::test::utils::{context_for, insert_test_user_with_password, setup_test_app_data};

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "secret-pass".to_string(),
            job_title: None,
            area: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_for_email() {
        let app_data = setup_test_app_data().await;
        insert_test_user_with_password(&app_data.db, "ana@example.com", "secret-pass", &[Role::Collaborator]).await;
        let coordinator = AuthCoordinator::new(Arc::clone(&app_data));

        let outcome = coordinator
            .login(&RequestContext::new(), " ANA@example.com", "secret-pass")
            .await
            .unwrap();

        let claims = app_data.providers.token_provider.validate(&outcome.token.token).unwrap();
        assert_eq!(claims.sub, "ana@example.com");
        assert_eq!(outcome.roles, RoleSet::from([Role::Collaborator]));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let app_data = setup_test_app_data().await;
        insert_test_user_with_password(&app_data.db, "ana@example.com", "secret-pass", &[]).await;
        let coordinator = AuthCoordinator::new(app_data);

        let err = coordinator
            .login(&RequestContext::new(), "ana@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_assigns_collaborator_and_logs_in() {
        let app_data = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data);
        let ctx = RequestContext::new();

        let (user, roles) = coordinator.register(&ctx, register_request("New@Example.com")).await.unwrap();
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.area, None);
        assert_eq!(roles, RoleSet::from([Role::Collaborator]));

        assert!(coordinator.login(&ctx, "new@example.com", "secret-pass").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let app_data = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data);
        let ctx = RequestContext::new();

        coordinator.register(&ctx, register_request("dup@example.com")).await.unwrap();
        let err = coordinator.register(&ctx, register_request("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, InternalError::User(UserError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let app_data = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data);

        let mut short = register_request("ana@example.com");
        short.password = "123".to_string();
        assert!(matches!(
            coordinator.register(&RequestContext::new(), short).await,
            Err(InternalError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_whoami() {
        let app_data = setup_test_app_data().await;
        let user = insert_test_user_with_password(&app_data.db, "ana@example.com", "secret-pass", &[]).await;
        let coordinator = AuthCoordinator::new(app_data);

        let ctx = context_for(&user, &[Role::Manager]);
        assert_eq!(coordinator.whoami(&ctx).unwrap().user_id, user.id);

        assert!(matches!(
            coordinator.whoami(&RequestContext::new()),
            Err(InternalError::Authorization(AuthorizationError::Unauthenticated))
        ));
    }
}
