// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate: token handling, password hashing, access
// decisions and feedback analysis.

pub mod access_policy;
pub mod analysis_provider;
pub mod authentication_provider;
pub mod password_provider;
pub mod token_provider;

use std::sync::Arc;

pub use access_policy::{AccessRequirement, Target};
pub use analysis_provider::{AnalysisProvider, FeedbackAnalyzer, HttpAnalyzer, KeywordAnalyzer};
pub use authentication_provider::AuthenticationProvider;
pub use password_provider::PasswordProvider;
pub use token_provider::TokenProvider;

/// Shared provider instances, created once in `AppData`
#[derive(Debug, Clone)]
pub struct Providers {
    pub token_provider: Arc<TokenProvider>,
    pub password_provider: Arc<PasswordProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub analysis_provider: Arc<AnalysisProvider>,
}
