use std::fmt;
use std::sync::Arc;

use crate::config::env_provider::{EnvironmentProvider, SharedEnvironment, SystemEnvironment};
use crate::config::secret_config::SecretConfig;

/// Minimum HS256 signing key size: 256 bits
pub const MIN_JWT_SECRET_BYTES: usize = 32;
pub const MIN_PEPPER_BYTES: usize = 16;

/// Custom error type for secret-related failures
#[derive(Debug, PartialEq, Eq)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} bytes, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
///
/// Loading fails when the JWT signing key is shorter than 256 bits, which
/// makes a weak key a fatal startup error.
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
}

impl SecretManager {
    /// Initialize from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Load and validate all secrets from the given environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn from_env_provider(env: SharedEnvironment) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env.as_ref(), &Self::jwt_config())?;
        let password_pepper = Self::load_secret(env.as_ref(), &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            password_pepper,
        })
    }

    /// Build directly from values, applying the same length rules
    pub fn from_values(jwt_secret: &str, password_pepper: &str) -> Result<Self, SecretError> {
        Self::check_length(&Self::jwt_config(), jwt_secret)?;
        Self::check_length(&Self::pepper_config(), password_pepper)?;

        Ok(Self {
            jwt_secret: jwt_secret.to_string(),
            password_pepper: password_pepper.to_string(),
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env_var("JWT_SECRET").min_length(MIN_JWT_SECRET_BYTES)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env_var("PASSWORD_PEPPER").min_length(MIN_PEPPER_BYTES)
    }

    /// Get the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<String, SecretError> {
        let name = config.secret_type.name();
        let value = env.get_var(name).ok_or_else(|| SecretError::missing(name))?;
        Self::check_length(config, &value)?;
        Ok(value)
    }

    fn check_length(config: &SecretConfig, value: &str) -> Result<(), SecretError> {
        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(
                    config.secret_type.name(),
                    min_len,
                    value.len(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}
