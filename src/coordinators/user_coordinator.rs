use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::validation::{normalize_email, optional_text, require_text, validate_password};
use crate::errors::InternalError;
use crate::errors::internal::{AuthorizationError, UserError};
use crate::providers::PasswordProvider;
use crate::providers::access_policy::{self, AccessRequirement, Target};
use crate::stores::user_store::{NewUser, UserChanges};
use crate::stores::{FeedbackStore, PlanStore, RoleStore, UserStore};
use crate::types::dto::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::{Role, RoleSet, parse_role_names};

/// Orchestrates user administration and self-service profile operations
pub struct UserCoordinator {
    db: DatabaseConnection,
    password_provider: Arc<PasswordProvider>,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    feedback_store: Arc<FeedbackStore>,
    plan_store: Arc<PlanStore>,
}

fn parse_roles(names: &[String]) -> Result<RoleSet, InternalError> {
    parse_role_names(names).map_err(|name| UserError::UnknownRole { name }.into())
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            password_provider: Arc::clone(&app_data.providers.password_provider),
            user_store: Arc::clone(&app_data.stores.user_store),
            role_store: Arc::clone(&app_data.stores.role_store),
            feedback_store: Arc::clone(&app_data.stores.feedback_store),
            plan_store: Arc::clone(&app_data.stores.plan_store),
        }
    }

    /// Create a user (admin only); roles default to collaborator
    pub async fn create_user(&self, ctx: &RequestContext, request: CreateUserRequest) -> Result<UserResponse, InternalError> {
        let caller = access_policy::authorize(ctx, AccessRequirement::HasRole(Role::Admin), "create user")?;

        let roles = match request.roles.as_deref() {
            Some(names) if !names.is_empty() => parse_roles(names)?,
            _ => RoleSet::from([Role::Collaborator]),
        };
        validate_password(&request.password)?;
        let new_user = NewUser {
            email: normalize_email(&request.email)?,
            name: require_text("name", &request.name)?,
            password_hash: self.password_provider.hash_password(&request.password)?,
            job_title: optional_text(request.job_title),
            area: optional_text(request.area),
        };

        let txn = begin_transaction(&self.db).await?;
        let user = self.user_store.insert(&txn, new_user).await?;
        self.role_store.set_user_roles(&txn, &user.id, &roles).await?;
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "User {} created by {}", user.id, caller.user_id);
        Ok(UserResponse::from_model(user, &roles))
    }

    /// List every user (admin or manager)
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserResponse>, InternalError> {
        access_policy::authorize(ctx, AccessRequirement::HasAnyRole(Role::READ_ANY), "list users")?;

        let users = self.user_store.list_all(&self.db).await?;
        let mut responses = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.role_store.roles_for_user(&self.db, &user.id).await?;
            responses.push(UserResponse::from_model(user, &roles));
        }
        Ok(responses)
    }

    /// Fetch one user by id (admin, manager or the user)
    pub async fn get_user(&self, ctx: &RequestContext, user_id: &str) -> Result<UserResponse, InternalError> {
        access_policy::authorize(
            ctx,
            AccessRequirement::SelfOrAnyRole(Target::UserId(user_id), Role::READ_ANY),
            "read user",
        )?;

        let user = self.user_store.get_by_id(&self.db, user_id).await?;
        let roles = self.role_store.roles_for_user(&self.db, &user.id).await?;
        Ok(UserResponse::from_model(user, &roles))
    }

    /// Fetch one user by email (admin, manager or the user)
    pub async fn get_user_by_email(&self, ctx: &RequestContext, email: &str) -> Result<UserResponse, InternalError> {
        access_policy::authorize(
            ctx,
            AccessRequirement::SelfOrAnyRole(Target::Email(email), Role::READ_ANY),
            "read user",
        )?;

        let user = self.user_store.get_by_email(&self.db, &email.trim().to_lowercase()).await?;
        let roles = self.role_store.roles_for_user(&self.db, &user.id).await?;
        Ok(UserResponse::from_model(user, &roles))
    }

    /// Update profile fields (admin or the user); only admins may change roles
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, InternalError> {
        let caller = access_policy::authorize(
            ctx,
            AccessRequirement::SelfOrAnyRole(Target::UserId(user_id), &[Role::Admin]),
            "update user",
        )?;

        let new_roles = match request.roles.as_deref() {
            Some(_) if !caller.is_admin() => {
                return Err(AuthorizationError::forbidden(&caller.user_id, "change roles").into());
            }
            Some(names) => Some(parse_roles(names)?),
            None => None,
        };

        let password_hash = match request.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(self.password_provider.hash_password(password)?)
            }
            None => None,
        };

        let changes = UserChanges {
            email: request.email.as_deref().map(normalize_email).transpose()?,
            name: request.name.as_deref().map(|name| require_text("name", name)).transpose()?,
            password_hash,
            job_title: request.job_title.map(|v| optional_text(Some(v))),
            area: request.area.map(|v| optional_text(Some(v))),
        };

        let txn = begin_transaction(&self.db).await?;
        let existing = self.user_store.get_by_id(&txn, user_id).await?;
        let user = self.user_store.update(&txn, existing, changes).await?;
        let roles = match new_roles {
            Some(roles) => {
                self.role_store.set_user_roles(&txn, &user.id, &roles).await?;
                roles
            }
            None => self.role_store.roles_for_user(&txn, &user.id).await?,
        };
        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, "User {} updated by {}", user.id, caller.user_id);
        Ok(UserResponse::from_model(user, &roles))
    }

    /// Delete a user and everything they own (admin only)
    ///
    /// Feedback the user authored or received, their plans with goals and
    /// their role assignments go in the same transaction as the user row.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &str) -> Result<(), InternalError> {
        let caller = access_policy::authorize(ctx, AccessRequirement::HasRole(Role::Admin), "delete user")?;

        let txn = begin_transaction(&self.db).await?;
        let user = self.user_store.get_by_id(&txn, user_id).await?;
        let feedback_removed = self.feedback_store.delete_for_user(&txn, &user.id).await?;
        let plans_removed = self.plan_store.delete_for_owner(&txn, &user.id).await?;
        self.role_store.clear_user_roles(&txn, &user.id).await?;
        self.user_store.delete(&txn, &user.id).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            "User {} deleted by {} ({} feedback, {} plans removed)",
            user.id,
            caller.user_id,
            feedback_removed,
            plans_removed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{context_for, insert_test_user, setup_test_app_data};

    fn create_request(email: &str, roles: Option<Vec<&str>>) -> CreateUserRequest {
        CreateUserRequest {
            name: "Bob".to_string(),
            email: email.to_string(),
            password: "secret-pass".to_string(),
            job_title: Some("Analyst".to_string()),
            area: None,
            roles: roles.map(|names| names.into_iter().map(str::to_string).collect()),
        }
    }

    fn is_forbidden(err: &InternalError) -> bool {
        matches!(err, InternalError::Authorization(AuthorizationError::Forbidden { .. }))
    }

    #[tokio::test]
    async fn test_admin_creates_user_with_default_role() {
        let app_data = setup_test_app_data().await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let coordinator = UserCoordinator::new(app_data);

        let created = coordinator
            .create_user(&context_for(&admin, &[Role::Admin]), create_request("bob@example.com", None))
            .await
            .unwrap();
        assert_eq!(created.roles, vec!["ROLE_COLLABORATOR"]);

        let managed = coordinator
            .create_user(
                &context_for(&admin, &[Role::Admin]),
                create_request("cid@example.com", Some(vec!["ROLE_MANAGER"])),
            )
            .await
            .unwrap();
        assert_eq!(managed.roles, vec!["ROLE_MANAGER"]);
    }

    #[tokio::test]
    async fn test_create_requires_admin_and_known_roles() {
        let app_data = setup_test_app_data().await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let manager = insert_test_user(&app_data.db, "boss@example.com", &[Role::Manager]).await;
        let coordinator = UserCoordinator::new(app_data);

        let err = coordinator
            .create_user(&context_for(&manager, &[Role::Manager]), create_request("x@example.com", None))
            .await
            .unwrap_err();
        assert!(is_forbidden(&err));

        let err = coordinator
            .create_user(
                &context_for(&admin, &[Role::Admin]),
                create_request("x@example.com", Some(vec!["ROLE_GOD"])),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::User(UserError::UnknownRole { .. })));
    }

    #[tokio::test]
    async fn test_read_narrowing() {
        let app_data = setup_test_app_data().await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let bob = insert_test_user(&app_data.db, "bob@example.com", &[Role::Collaborator]).await;
        let boss = insert_test_user(&app_data.db, "boss@example.com", &[Role::Manager]).await;
        let coordinator = UserCoordinator::new(app_data);
        let ana_ctx = context_for(&ana, &[Role::Collaborator]);

        assert_eq!(coordinator.get_user(&ana_ctx, &ana.id).await.unwrap().id, ana.id);
        assert_eq!(coordinator.get_user_by_email(&ana_ctx, "ana@example.com").await.unwrap().id, ana.id);
        assert!(is_forbidden(&coordinator.get_user(&ana_ctx, &bob.id).await.unwrap_err()));
        assert!(is_forbidden(&coordinator.list_users(&ana_ctx).await.unwrap_err()));

        let boss_ctx = context_for(&boss, &[Role::Manager]);
        assert_eq!(coordinator.list_users(&boss_ctx).await.unwrap().len(), 3);
        assert_eq!(coordinator.get_user(&boss_ctx, &bob.id).await.unwrap().email, "bob@example.com");
        assert!(matches!(
            coordinator.get_user(&boss_ctx, "missing").await.unwrap_err(),
            InternalError::User(UserError::UserIdNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_profile_text_clears_the_field() {
        let app_data = setup_test_app_data().await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = context_for(&ana, &[Role::Collaborator]);

        let updated = coordinator
            .update_user(
                &ctx,
                &ana.id,
                UpdateUserRequest {
                    job_title: Some("  Analyst ".to_string()),
                    area: Some("Data".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.job_title.as_deref(), Some("Analyst"));

        let cleared = coordinator
            .update_user(
                &ctx,
                &ana.id,
                UpdateUserRequest {
                    job_title: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.job_title, None);
        assert_eq!(cleared.area.as_deref(), Some("Data"));
    }

    #[tokio::test]
    async fn test_self_update_cannot_change_roles() {
        let app_data = setup_test_app_data().await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = context_for(&ana, &[Role::Collaborator]);

        let updated = coordinator
            .update_user(
                &ctx,
                &ana.id,
                UpdateUserRequest {
                    area: Some("Data".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.area.as_deref(), Some("Data"));
        assert_eq!(updated.roles, vec!["ROLE_COLLABORATOR"]);

        let err = coordinator
            .update_user(
                &ctx,
                &ana.id,
                UpdateUserRequest {
                    roles: Some(vec!["ROLE_ADMIN".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(is_forbidden(&err));
    }

    #[tokio::test]
    async fn test_manager_cannot_update_others_but_admin_can_change_roles() {
        let app_data = setup_test_app_data().await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let boss = insert_test_user(&app_data.db, "boss@example.com", &[Role::Manager]).await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let coordinator = UserCoordinator::new(app_data);

        let err = coordinator
            .update_user(&context_for(&boss, &[Role::Manager]), &ana.id, UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(is_forbidden(&err));

        let promoted = coordinator
            .update_user(
                &context_for(&admin, &[Role::Admin]),
                &ana.id,
                UpdateUserRequest {
                    roles: Some(vec!["ROLE_MANAGER".to_string(), "ROLE_COLLABORATOR".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(promoted.roles, vec!["ROLE_MANAGER", "ROLE_COLLABORATOR"]);
    }

    #[tokio::test]
    async fn test_delete_requires_admin_and_reports_missing() {
        let app_data = setup_test_app_data().await;
        let ana = insert_test_user(&app_data.db, "ana@example.com", &[Role::Collaborator]).await;
        let admin = insert_test_user(&app_data.db, "admin@example.com", &[Role::Admin]).await;
        let coordinator = UserCoordinator::new(app_data);

        assert!(is_forbidden(
            &coordinator
                .delete_user(&context_for(&ana, &[Role::Collaborator]), &ana.id)
                .await
                .unwrap_err()
        ));

        let admin_ctx = context_for(&admin, &[Role::Admin]);
        coordinator.delete_user(&admin_ctx, &ana.id).await.unwrap();
        assert!(matches!(
            coordinator.delete_user(&admin_ctx, &ana.id).await.unwrap_err(),
            InternalError::User(UserError::UserIdNotFound { .. })
        ));
    }
}
