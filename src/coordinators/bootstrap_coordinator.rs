use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::ServerSettings;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::providers::PasswordProvider;
use crate::stores::user_store::NewUser;
use crate::stores::{RoleStore, UserStore};
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::{Role, RoleSet};

/// Result of seeding the initial administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminSeed {
    AlreadyPresent,
    Created {
        email: String,
        /// Set when the password was generated and must be shown once
        generated_password: Option<String>,
    },
}

/// Startup seeding: role registry and the initial administrator
pub struct BootstrapCoordinator {
    db: DatabaseConnection,
    settings: Arc<ServerSettings>,
    password_provider: Arc<PasswordProvider>,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
}

impl BootstrapCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            settings: Arc::clone(&app_data.settings),
            password_provider: Arc::clone(&app_data.providers.password_provider),
            user_store: Arc::clone(&app_data.stores.user_store),
            role_store: Arc::clone(&app_data.stores.role_store),
        }
    }

    /// Seed the role registry and validate every persisted role name
    ///
    /// An unknown role name in the database is a fatal startup error.
    pub async fn seed_roles(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        self.role_store.seed_registry(&self.db).await?;
        self.role_store.validate_registry(&self.db).await?;
        tracing::debug!(request_id = %ctx.request_id, "Role registry seeded and validated");
        Ok(())
    }

    /// Create the administrator named by `ADMIN_EMAIL` unless it exists
    ///
    /// Uses `ADMIN_PASSWORD` when set, otherwise generates a password and
    /// returns it so the caller can display it once.
    pub async fn seed_admin(&self, ctx: &RequestContext) -> Result<AdminSeed, InternalError> {
        let email = self.settings.admin_email().trim().to_lowercase();

        if self.user_store.find_by_email(&self.db, &email).await?.is_some() {
            tracing::debug!(request_id = %ctx.request_id, "Administrator {} already present", email);
            return Ok(AdminSeed::AlreadyPresent);
        }

        let (password, generated_password) = match self.settings.admin_password() {
            Some(password) => (password.to_string(), None),
            None => {
                let password = self.password_provider.generate_secure_password();
                (password.clone(), Some(password))
            }
        };

        let new_user = NewUser {
            email: email.clone(),
            name: "Administrator".to_string(),
            password_hash: self.password_provider.hash_password(&password)?,
            job_title: Some("SysAdmin".to_string()),
            area: Some("IT".to_string()),
        };

        let txn = begin_transaction(&self.db).await?;
        let user = self.user_store.insert(&txn, new_user).await?;
        self.role_store
            .set_user_roles(&txn, &user.id, &RoleSet::from([Role::Admin]))
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "Initial administrator {} created", email);
        Ok(AdminSeed::Created {
            email,
            generated_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_seed_admin_once_with_generated_password() {
        let app_data = setup_test_app_data().await;
        let coordinator = BootstrapCoordinator::new(Arc::clone(&app_data));
        let ctx = RequestContext::for_system("bootstrap");

        coordinator.seed_roles(&ctx).await.unwrap();
        let seeded = coordinator.seed_admin(&ctx).await.unwrap();

        let AdminSeed::Created { email, generated_password } = seeded else {
            panic!("expected the administrator to be created");
        };
        assert_eq!(email, "admin@admin.com");
        let password = generated_password.unwrap();
        assert_eq!(password.len(), 20);

        let (user, roles) = app_data
            .providers
            .authentication_provider
            .verify_credentials(&app_data.db, "admin@admin.com", &password)
            .await
            .unwrap();
        assert_eq!(user.name, "Administrator");
        assert_eq!(roles, RoleSet::from([Role::Admin]));

        assert_eq!(coordinator.seed_admin(&ctx).await.unwrap(), AdminSeed::AlreadyPresent);
    }
}
