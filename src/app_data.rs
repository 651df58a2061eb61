use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{SecretManager, ServerSettings};
use crate::errors::InternalError;
use crate::providers::{
    AnalysisProvider, AuthenticationProvider, FeedbackAnalyzer, HttpAnalyzer, KeywordAnalyzer, PasswordProvider,
    Providers, TokenProvider,
};
use crate::stores::Stores;

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ settings / secret_manager
///   ├─ stores (user, role, feedback, plan)
///   └─ providers (token, password, authentication, analysis)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   ├─ AuthCoordinator::new(app_data)
///   ├─ UserCoordinator::new(app_data)
///   ├─ FeedbackCoordinator::new(app_data)
///   └─ PlanCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<ServerSettings>,
    pub secret_manager: Arc<SecretManager>,
    pub stores: Stores,
    pub providers: Providers,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    /// Feedback analysis goes over HTTP when `ANALYSIS_SERVICE_URL` is set
    /// and falls back to the in-process keyword analyzer otherwise.
    ///
    /// # Errors
    /// Returns `InternalError` when the signing key is too weak or the
    /// analysis client cannot be built
    pub fn init(
        db: DatabaseConnection,
        settings: ServerSettings,
        secret_manager: SecretManager,
    ) -> Result<Self, InternalError> {
        let analyzer: Arc<dyn FeedbackAnalyzer> = match settings.analysis_service_url() {
            Some(url) => {
                tracing::info!("Feedback analysis via {}", url);
                Arc::new(
                    HttpAnalyzer::new(url, settings.analysis_timeout())
                        .map_err(|e| InternalError::validation("ANALYSIS_SERVICE_URL", e.to_string()))?,
                )
            }
            None => {
                tracing::info!("ANALYSIS_SERVICE_URL not set, using keyword analysis");
                Arc::new(KeywordAnalyzer)
            }
        };

        Self::init_with_analyzer(db, settings, secret_manager, analyzer)
    }

    /// Initialize with an explicit feedback analyzer
    pub fn init_with_analyzer(
        db: DatabaseConnection,
        settings: ServerSettings,
        secret_manager: SecretManager,
        analyzer: Arc<dyn FeedbackAnalyzer>,
    ) -> Result<Self, InternalError> {
        tracing::debug!("Initializing AppData...");

        let stores = Stores::new();

        let token_provider = Arc::new(TokenProvider::new(&secret_manager, settings.jwt_expiration())?);
        let password_provider = Arc::new(PasswordProvider::new(secret_manager.password_pepper())?);
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            Arc::clone(&password_provider),
            Arc::clone(&token_provider),
            Arc::clone(&stores.user_store),
            Arc::clone(&stores.role_store),
        ));
        let analysis_provider = Arc::new(AnalysisProvider::new(analyzer, settings.analysis_timeout()));

        tracing::debug!("AppData initialization complete");

        Ok(Self {
            db,
            settings: Arc::new(settings),
            secret_manager: Arc::new(secret_manager),
            stores,
            providers: Providers {
                token_provider,
                password_provider,
                authentication_provider,
                analysis_provider,
            },
        })
    }
}
