use crate::config::env_provider::SharedEnvironment;
use crate::config::errors::ApplicationError;

/// Where a loaded value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env: SharedEnvironment,
    env_override: Option<String>,
    default_value: Option<String>,
    required: bool,
    min_length: Option<usize>,
    validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env: SharedEnvironment) -> Self {
        Self {
            env,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load a setting with source tracking
    ///
    /// Returns `Ok(None)` for an optional setting with neither an environment
    /// value nor a default.
    pub fn load_setting_with_source(&self) -> Result<Option<ConfigValue>, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env.get_var(env_var) {
                self.validate_value(&value)?;
                return Ok(Some(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable { name: env_var.clone() },
                }));
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default)?;
            return Ok(Some(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            }));
        }

        if self.required {
            return Err(ApplicationError::MissingSetting {
                setting_name: self.setting_name().to_string(),
            });
        }

        Ok(None)
    }

    /// Load a setting that always resolves to a value (env or default)
    pub fn load_value(&self) -> Result<String, ApplicationError> {
        self.load_setting_with_source()?
            .map(|v| v.value)
            .ok_or_else(|| ApplicationError::MissingSetting {
                setting_name: self.setting_name().to_string(),
            })
    }

    /// Validate a setting value according to the ConfigSpec rules
    pub fn validate_value(&self, value: &str) -> Result<(), ApplicationError> {
        if let Some(min_len) = self.min_length {
            if value.len() < min_len {
                return Err(ApplicationError::InvalidSetting {
                    setting_name: self.setting_name().to_string(),
                    reason: format!("Value must be at least {} characters long", min_len),
                });
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::InvalidSetting {
                setting_name: self.setting_name().to_string(),
                reason,
            })?;
        }

        Ok(())
    }
}

/// Type parsing and validation utilities for configuration values
impl ConfigSpec {
    /// Parse a port number, rejecting 0
    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        let port = value.trim().parse::<u16>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected port number (1-65535), got '{}': {}", value, e),
        })?;

        if port == 0 {
            return Err(ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason: "Port number must be between 1 and 65535".to_string(),
            });
        }

        Ok(port)
    }

    /// Parse a positive integer such as a duration in milliseconds
    pub fn parse_positive_integer(value: &str, setting_name: &str) -> Result<u64, ApplicationError> {
        let parsed = value.trim().parse::<u64>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected positive integer, got '{}': {}", value, e),
        })?;

        if parsed == 0 {
            return Err(ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason: "Value must be greater than zero".to_string(),
            });
        }

        Ok(parsed)
    }

    /// Validator for host addresses (IPv4, bracketed IPv6, or hostname)
    ///
    /// Validates basic format but does not perform DNS resolution.
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        let host = value.trim();

        if host.is_empty() {
            return Err("Host address cannot be empty".to_string());
        }

        if host.chars().any(char::is_whitespace) {
            return Err("Host address cannot contain whitespace characters".to_string());
        }

        if host.starts_with('[') && host.ends_with(']') {
            let ipv6_part = &host[1..host.len() - 1];
            if ipv6_part.is_empty() || !ipv6_part.contains(':') {
                return Err("Invalid IPv6 address format".to_string());
            }
        } else if host.matches(':').count() > 1 {
            return Err("IPv6 addresses must be enclosed in brackets [::1]".to_string());
        }

        Ok(())
    }

    /// Validator for http(s) service URLs
    pub fn validate_http_url(value: &str) -> Result<(), String> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(())
        } else {
            Err(format!("Expected an http:// or https:// URL, got '{}'", value))
        }
    }

    /// Validator for email-shaped values
    pub fn validate_email(value: &str) -> Result<(), String> {
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(format!("Expected an email address, got '{}'", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_environment_overrides_default() {
        let env = MockEnvironment::empty().with_var("PORT", "9000").shared();
        let value = ConfigSpec::new(env)
            .env_override("PORT")
            .default_value("8081")
            .load_setting_with_source()
            .unwrap()
            .unwrap();

        assert_eq!(value.value, "9000");
        assert_eq!(
            value.source,
            ConfigValueSource::EnvironmentVariable { name: "PORT".to_string() }
        );
    }

    #[test]
    fn test_default_used_when_env_absent() {
        let value = ConfigSpec::new(MockEnvironment::empty().shared())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .load_value()
            .unwrap();

        assert_eq!(value, "0.0.0.0");
    }

    #[test]
    fn test_optional_setting_without_value_is_none() {
        let value = ConfigSpec::new(MockEnvironment::empty().shared())
            .env_override("ANALYSIS_SERVICE_URL")
            .load_setting_with_source()
            .unwrap();

        assert!(value.is_none());
    }

    #[test]
    fn test_required_setting_without_value_fails() {
        let result = ConfigSpec::new(MockEnvironment::empty().shared())
            .env_override("JWT_SECRET")
            .required(true)
            .load_setting_with_source();

        assert_eq!(
            result.unwrap_err(),
            ApplicationError::MissingSetting { setting_name: "JWT_SECRET".to_string() }
        );
    }

    #[test]
    fn test_min_length_is_enforced() {
        let env = MockEnvironment::empty().with_var("DATABASE_URL", "").shared();
        let result = ConfigSpec::new(env)
            .env_override("DATABASE_URL")
            .min_length(1)
            .load_value();

        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(ConfigSpec::parse_port("8081", "PORT").unwrap(), 8081);
        assert!(ConfigSpec::parse_port("0", "PORT").is_err());
        assert!(ConfigSpec::parse_port("70000", "PORT").is_err());
        assert!(ConfigSpec::parse_port("abc", "PORT").is_err());
    }

    #[test]
    fn test_validate_host_address() {
        assert!(ConfigSpec::validate_host_address("127.0.0.1").is_ok());
        assert!(ConfigSpec::validate_host_address("[::1]").is_ok());
        assert!(ConfigSpec::validate_host_address("localhost").is_ok());
        assert!(ConfigSpec::validate_host_address("").is_err());
        assert!(ConfigSpec::validate_host_address("::1").is_err());
        assert!(ConfigSpec::validate_host_address("bad host").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(ConfigSpec::validate_email("admin@admin.com").is_ok());
        assert!(ConfigSpec::validate_email("admin").is_err());
        assert!(ConfigSpec::validate_email("@admin.com").is_err());
    }
}
