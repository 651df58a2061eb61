mod config_spec;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;
mod server_settings;
pub mod database;

pub use config_spec::{ConfigSpec, ConfigValue, ConfigValueSource};
pub use env_provider::{EnvironmentProvider, SharedEnvironment, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ApplicationError;
pub use logging::{LoggingConfig, LoggingError, init_logging, init_logging_with};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{MIN_JWT_SECRET_BYTES, SecretError, SecretManager};
pub use server_settings::ServerSettings;
