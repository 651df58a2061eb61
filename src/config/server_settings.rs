use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::config_spec::ConfigSpec;
use crate::config::env_provider::{SharedEnvironment, SystemEnvironment};
use crate::config::errors::ApplicationError;

/// Server, token, analysis and bootstrap settings
pub struct ServerSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    jwt_expiration: Duration,
    analysis_service_url: Option<String>,
    analysis_timeout: Duration,
    admin_email: String,
    admin_password: Option<String>,
}

impl ServerSettings {
    /// Load settings from the given environment using ConfigSpec
    pub fn from_env_provider(env: SharedEnvironment) -> Result<Self, ApplicationError> {
        let database_url = ConfigSpec::new(env.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://progress.db?mode=rwc")
            .min_length(1)
            .load_value()?;

        let server_host = ConfigSpec::new(env.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load_value()?;

        let port_value = ConfigSpec::new(env.clone())
            .env_override("PORT")
            .default_value("8081")
            .load_value()?;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let expiration_value = ConfigSpec::new(env.clone())
            .env_override("JWT_EXPIRATION_MS")
            .default_value("86400000")
            .load_value()?;
        let jwt_expiration = Duration::from_millis(ConfigSpec::parse_positive_integer(
            &expiration_value,
            "JWT_EXPIRATION_MS",
        )?);

        let analysis_service_url = ConfigSpec::new(env.clone())
            .env_override("ANALYSIS_SERVICE_URL")
            .validator(ConfigSpec::validate_http_url)
            .load_setting_with_source()?
            .map(|v| v.value);

        let timeout_value = ConfigSpec::new(env.clone())
            .env_override("ANALYSIS_TIMEOUT_MS")
            .default_value("3000")
            .load_value()?;
        let analysis_timeout = Duration::from_millis(ConfigSpec::parse_positive_integer(
            &timeout_value,
            "ANALYSIS_TIMEOUT_MS",
        )?);

        let admin_email = ConfigSpec::new(env.clone())
            .env_override("ADMIN_EMAIL")
            .default_value("admin@admin.com")
            .validator(ConfigSpec::validate_email)
            .load_value()?;

        let admin_password = ConfigSpec::new(env)
            .env_override("ADMIN_PASSWORD")
            .min_length(8)
            .load_setting_with_source()?
            .map(|v| v.value);

        Ok(Self {
            database_url,
            server_host,
            server_port,
            jwt_expiration,
            analysis_service_url,
            analysis_timeout,
            admin_email,
            admin_password,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Lifetime of issued tokens
    pub fn jwt_expiration(&self) -> Duration {
        self.jwt_expiration
    }

    /// Remote analysis endpoint; the in-process analyzer is used when absent
    pub fn analysis_service_url(&self) -> Option<&str> {
        self.analysis_service_url.as_deref()
    }

    pub fn analysis_timeout(&self) -> Duration {
        self.analysis_timeout
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Initial administrator password; generated at startup when absent
    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref()
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("jwt_expiration", &self.jwt_expiration)
            .field("analysis_service_url", &self.analysis_service_url)
            .field("analysis_timeout", &self.analysis_timeout)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
