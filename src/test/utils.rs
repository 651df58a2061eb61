// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{MockEnvironment, SecretManager, ServerSettings};
use crate::providers::{FeedbackAnalyzer, KeywordAnalyzer, PasswordProvider};
use crate::stores::user_store::NewUser;
use crate::stores::{RoleStore, UserStore};
use crate::types::db::user;
use crate::types::internal::caller::Caller;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::{Role, RoleSet};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// In-memory database with migrations applied and the role registry seeded
pub async fn setup_test_database() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    RoleStore::new()
        .seed_registry(&db)
        .await
        .expect("Failed to seed roles");

    db
}

pub fn test_password_provider() -> Arc<PasswordProvider> {
    Arc::new(PasswordProvider::new(TEST_PASSWORD_PEPPER).expect("Failed to create password provider"))
}

/// Insert a user with a placeholder hash and the given roles
pub async fn insert_test_user(db: &DatabaseConnection, email: &str, roles: &[Role]) -> user::Model {
    insert_user(db, email, "not-a-real-hash".to_string(), roles).await
}

/// Insert a user whose password verifies against the test pepper
pub async fn insert_test_user_with_password(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    roles: &[Role],
) -> user::Model {
    let hash = test_password_provider()
        .hash_password(password)
        .expect("Failed to hash password");
    insert_user(db, email, hash, roles).await
}

async fn insert_user(db: &DatabaseConnection, email: &str, password_hash: String, roles: &[Role]) -> user::Model {
    let name = email.split('@').next().unwrap_or(email).to_string();
    let user = UserStore::new()
        .insert(
            db,
            NewUser {
                email: email.to_string(),
                name,
                password_hash,
                job_title: None,
                area: None,
            },
        )
        .await
        .expect("Failed to insert test user");

    RoleStore::new()
        .set_user_roles(db, &user.id, &roles.iter().copied().collect())
        .await
        .expect("Failed to assign test roles");

    user
}

/// AppData over a fresh database, using the keyword analyzer
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_database().await;
    test_app_data_with_analyzer(db, Arc::new(KeywordAnalyzer))
}

/// AppData over an existing test database with the given analyzer
pub fn test_app_data_with_analyzer(db: DatabaseConnection, analyzer: Arc<dyn FeedbackAnalyzer>) -> Arc<AppData> {
    let settings = ServerSettings::from_env_provider(MockEnvironment::empty().shared())
        .expect("Failed to load test settings");
    let secret_manager =
        SecretManager::from_values(TEST_JWT_SECRET, TEST_PASSWORD_PEPPER).expect("Failed to create secrets");

    Arc::new(
        AppData::init_with_analyzer(db, settings, secret_manager, analyzer).expect("Failed to init AppData"),
    )
}

/// Request context carrying the given user as caller
pub fn context_for(user: &user::Model, roles: &[Role]) -> RequestContext {
    RequestContext::new().with_caller(Caller {
        user_id: user.id.clone(),
        email: user.email.clone(),
        roles: roles.iter().copied().collect::<RoleSet>(),
    })
}
