// Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::test::TestClient;
use progress_backend::AppData;
use progress_backend::api::build_routes;
use progress_backend::config::{EnvironmentProvider, SecretManager, ServerSettings, SharedEnvironment};
use progress_backend::providers::KeywordAnalyzer;
use progress_backend::stores::RoleStore;
use progress_backend::stores::user_store::NewUser;
use progress_backend::types::db::user;
use progress_backend::types::internal::caller::Caller;
use progress_backend::types::internal::context::RequestContext;
use progress_backend::types::internal::role::{Role, RoleSet};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_JWT_SECRET: &str = "integration-secret-key-at-least-32-bytes";
pub const TEST_PASSWORD_PEPPER: &str = "integration-pepper";
pub const TEST_PASSWORD: &str = "correct-horse";

/// Environment provider backed by a plain map
#[derive(Default)]
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        Self {
            vars: vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    pub fn shared(self) -> SharedEnvironment {
        Arc::new(self)
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Migrated in-memory database with the role registry seeded
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None).await.expect("Failed to run migrations");

    RoleStore::new()
        .seed_registry(&db)
        .await
        .expect("Failed to seed roles");

    db
}

/// AppData over a fresh database using the keyword analyzer
pub async fn setup_app_data() -> Arc<AppData> {
    setup_app_data_with_env(TestEnvironment::default()).await
}

pub async fn setup_app_data_with_env(env: TestEnvironment) -> Arc<AppData> {
    let db = setup_test_db().await;
    let settings = ServerSettings::from_env_provider(env.shared()).expect("Failed to load settings");
    let secret_manager =
        SecretManager::from_values(TEST_JWT_SECRET, TEST_PASSWORD_PEPPER).expect("Failed to build secrets");

    Arc::new(
        AppData::init_with_analyzer(db, settings, secret_manager, Arc::new(KeywordAnalyzer))
            .expect("Failed to init AppData"),
    )
}

/// HTTP test client over the full route tree
pub fn test_client(app_data: Arc<AppData>) -> TestClient<impl poem::Endpoint> {
    TestClient::new(build_routes(app_data, "http://localhost:8081"))
}

/// Insert a user with `TEST_PASSWORD` and the given roles
pub async fn create_user(app_data: &AppData, email: &str, name: &str, roles: &[Role]) -> user::Model {
    let password_hash = app_data
        .providers
        .password_provider
        .hash_password(TEST_PASSWORD)
        .expect("Failed to hash password");

    let user = app_data
        .stores
        .user_store
        .insert(
            &app_data.db,
            NewUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                job_title: None,
                area: None,
            },
        )
        .await
        .expect("Failed to insert user");

    app_data
        .stores
        .role_store
        .set_user_roles(&app_data.db, &user.id, &roles.iter().copied().collect())
        .await
        .expect("Failed to assign roles");

    user
}

/// Request context with the given user as verified caller
pub fn context_for(user: &user::Model, roles: &[Role]) -> RequestContext {
    RequestContext::new().with_caller(Caller {
        user_id: user.id.clone(),
        email: user.email.clone(),
        roles: roles.iter().copied().collect::<RoleSet>(),
    })
}

/// Signed bearer header value for the given user
pub fn bearer_for(app_data: &AppData, user: &user::Model) -> String {
    let token = app_data
        .providers
        .token_provider
        .issue(&user.email)
        .expect("Failed to issue token");
    format!("Bearer {}", token.token)
}
