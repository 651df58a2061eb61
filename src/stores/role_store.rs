use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use sea_orm::sea_query::OnConflict;

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::types::db::{role, user_role};
use crate::types::internal::role::{Role, RoleSet};

/// Data access for `roles` and the `user_roles` join table
#[derive(Debug, Default)]
pub struct RoleStore;

impl RoleStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert every registry role that is not yet persisted
    pub async fn seed_registry(&self, conn: &impl ConnectionTrait) -> Result<(), InternalError> {
        let rows = Role::ALL.iter().map(|role| role::ActiveModel {
            name: Set(role.as_str().to_string()),
            ..Default::default()
        });

        role::Entity::insert_many(rows)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .do_nothing()
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("seed_roles", e))?;

        Ok(())
    }

    /// Check every persisted role name against the closed registry
    ///
    /// # Errors
    /// `UserError::UnknownRole` for the first name the registry does not know
    pub async fn validate_registry(&self, conn: &impl ConnectionTrait) -> Result<(), InternalError> {
        for row in self.all_rows(conn).await? {
            row.name
                .parse::<Role>()
                .map_err(|name| UserError::UnknownRole { name })?;
        }
        Ok(())
    }

    async fn all_rows(&self, conn: &impl ConnectionTrait) -> Result<Vec<role::Model>, InternalError> {
        role::Entity::find()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles", e))
    }

    /// Map of persisted role name to row id
    async fn role_ids(&self, conn: &impl ConnectionTrait) -> Result<HashMap<String, i32>, InternalError> {
        Ok(self
            .all_rows(conn)
            .await?
            .into_iter()
            .map(|row| (row.name, row.id))
            .collect())
    }

    pub async fn roles_for_user(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<RoleSet, InternalError> {
        let rows = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .find_also_related(role::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("roles_for_user", e))?;

        let mut roles = RoleSet::new();
        for role_row in rows.into_iter().filter_map(|(_, role_row)| role_row) {
            let role = role_row
                .name
                .parse::<Role>()
                .map_err(|name| UserError::UnknownRole { name })?;
            roles.insert(role);
        }
        Ok(roles)
    }

    /// Replace the user's role set
    pub async fn set_user_roles(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        roles: &RoleSet,
    ) -> Result<(), InternalError> {
        self.clear_user_roles(conn, user_id).await?;
        if roles.is_empty() {
            return Ok(());
        }

        let ids = self.role_ids(conn).await?;
        let mut rows = Vec::with_capacity(roles.len());
        for role in roles {
            let role_id = ids.get(role.as_str()).copied().ok_or_else(|| UserError::UnknownRole {
                name: role.as_str().to_string(),
            })?;
            rows.push(user_role::ActiveModel {
                user_id: Set(user_id.to_string()),
                role_id: Set(role_id),
            });
        }

        user_role::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("assign_roles", e))?;

        Ok(())
    }

    pub async fn clear_user_roles(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<(), InternalError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_roles", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_test_user, setup_test_database};

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = setup_test_database().await;
        let store = RoleStore::new();

        store.seed_registry(&db).await.unwrap();
        store.seed_registry(&db).await.unwrap();

        assert_eq!(store.all_rows(&db).await.unwrap().len(), Role::ALL.len());
        store.validate_registry(&db).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_persisted_role_fails_validation() {
        let db = setup_test_database().await;
        let store = RoleStore::new();

        role::Entity::insert(role::ActiveModel {
            name: Set("ROLE_OWNER".to_string()),
            ..Default::default()
        })
        .exec(&db)
        .await
        .unwrap();

        let err = store.validate_registry(&db).await.unwrap_err();
        assert!(matches!(err, InternalError::User(UserError::UnknownRole { name }) if name == "ROLE_OWNER"));
    }

    #[tokio::test]
    async fn test_set_and_replace_user_roles() {
        let db = setup_test_database().await;
        let store = RoleStore::new();
        let user = insert_test_user(&db, "ana@example.com", &[]).await;

        store
            .set_user_roles(&db, &user.id, &RoleSet::from([Role::Manager, Role::Collaborator]))
            .await
            .unwrap();
        assert_eq!(
            store.roles_for_user(&db, &user.id).await.unwrap(),
            RoleSet::from([Role::Manager, Role::Collaborator])
        );

        store.set_user_roles(&db, &user.id, &RoleSet::from([Role::Admin])).await.unwrap();
        assert_eq!(store.roles_for_user(&db, &user.id).await.unwrap(), RoleSet::from([Role::Admin]));

        store.clear_user_roles(&db, &user.id).await.unwrap();
        assert!(store.roles_for_user(&db, &user.id).await.unwrap().is_empty());
    }
}
