use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::errors::internal::{AuthorizationError, CredentialError};
use crate::providers::password_provider::PasswordProvider;
use crate::providers::token_provider::TokenProvider;
use crate::stores::{RoleStore, UserStore};
use crate::types::db::user;
use crate::types::internal::caller::Caller;
use crate::types::internal::role::RoleSet;

/// Verifies credentials and turns bearer tokens into callers
pub struct AuthenticationProvider {
    password_provider: Arc<PasswordProvider>,
    token_provider: Arc<TokenProvider>,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
}

impl AuthenticationProvider {
    pub fn new(
        password_provider: Arc<PasswordProvider>,
        token_provider: Arc<TokenProvider>,
        user_store: Arc<UserStore>,
        role_store: Arc<RoleStore>,
    ) -> Self {
        Self {
            password_provider,
            token_provider,
            user_store,
            role_store,
        }
    }

    /// Check an email/password pair
    ///
    /// Unknown email and wrong password both yield
    /// `CredentialError::InvalidCredentials`; the unknown-email path still
    /// performs one hash verification.
    pub async fn verify_credentials(
        &self,
        conn: &impl ConnectionTrait,
        email: &str,
        password: &str,
    ) -> Result<(user::Model, RoleSet), InternalError> {
        let Some(user) = self.user_store.find_by_email(conn, email).await? else {
            self.password_provider.verify_dummy(password)?;
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !self.password_provider.verify_password(&user.password_hash, password)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        let roles = self.role_store.roles_for_user(conn, &user.id).await?;
        Ok((user, roles))
    }

    /// Resolve the caller behind a bearer token
    ///
    /// An invalid or expired token, or one whose subject no longer names a
    /// user, yields `AuthorizationError::Unauthenticated`.
    pub async fn resolve_caller(&self, conn: &impl ConnectionTrait, token: &str) -> Result<Caller, InternalError> {
        let claims = match self.token_provider.validate(token) {
            Ok(claims) => claims,
            Err(InternalError::Credential(e)) => {
                tracing::debug!("Bearer token rejected: {}", e);
                return Err(AuthorizationError::Unauthenticated.into());
            }
            Err(e) => return Err(e),
        };

        let Some(user) = self.user_store.find_by_email(conn, &claims.sub).await? else {
            tracing::debug!("Token subject {} no longer resolves to a user", claims.sub);
            return Err(AuthorizationError::Unauthenticated.into());
        };

        let roles = self.role_store.roles_for_user(conn, &user.id).await?;

        Ok(Caller {
            user_id: user.id,
            email: user.email,
            roles,
        })
    }
}

impl std::fmt::Debug for AuthenticationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationProvider").finish_non_exhaustive()
    }
}
