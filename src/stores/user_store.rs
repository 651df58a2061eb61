use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::types::db::user::{self, ActiveModel, Entity as User};

/// Fields of a user about to be inserted; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub job_title: Option<String>,
    pub area: Option<String>,
}

/// Field changes applied by `UserStore::update`; `None` leaves the column as is
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    /// `Some(None)` clears the column
    pub job_title: Option<Option<String>>,
    pub area: Option<Option<String>>,
}

/// Data access for the `users` table
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a user with a fresh UUID
    ///
    /// # Errors
    /// `UserError::DuplicateEmail` when the unique index on email rejects the row,
    /// including when a concurrent insert wins the race.
    pub async fn insert(&self, conn: &impl ConnectionTrait, new_user: NewUser) -> Result<user::Model, InternalError> {
        let now = Utc::now().timestamp();
        let email = new_user.email.clone();

        let model = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(new_user.email),
            name: Set(new_user.name),
            password_hash: Set(new_user.password_hash),
            job_title: Set(new_user.job_title),
            area: Set(new_user.area),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(conn).await.map_err(|e| {
            if InternalError::is_unique_violation(&e) {
                InternalError::from(UserError::DuplicateEmail { email })
            } else {
                InternalError::database("insert_user", e)
            }
        })
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_email(&self, conn: &impl ConnectionTrait, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Like `find_by_id`, but a missing user is an error
    pub async fn get_by_id(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id).await?.ok_or_else(|| {
            UserError::UserIdNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
    }

    pub async fn get_by_email(&self, conn: &impl ConnectionTrait, email: &str) -> Result<user::Model, InternalError> {
        self.find_by_email(conn, email).await?.ok_or_else(|| {
            UserError::EmailNotFound {
                email: email.to_string(),
            }
            .into()
        })
    }

    pub async fn list_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_asc(user::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Apply `changes` to an existing user and bump `updated_at`
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        existing: user::Model,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        let mut model: ActiveModel = existing.into();

        let email = changes.email.clone();
        if let Some(email) = changes.email {
            model.email = Set(email);
        }
        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(password_hash) = changes.password_hash {
            model.password_hash = Set(password_hash);
        }
        if let Some(job_title) = changes.job_title {
            model.job_title = Set(job_title);
        }
        if let Some(area) = changes.area {
            model.area = Set(area);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model.update(conn).await.map_err(|e| {
            if InternalError::is_unique_violation(&e) {
                InternalError::from(UserError::DuplicateEmail {
                    email: email.unwrap_or_default(),
                })
            } else {
                InternalError::database("update_user", e)
            }
        })
    }

    /// Delete the user row; returns whether a row was removed
    pub async fn delete(&self, conn: &impl ConnectionTrait, user_id: &str) -> Result<bool, InternalError> {
        let result = User::delete_by_id(user_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        Ok(result.rows_affected > 0)
    }
}
