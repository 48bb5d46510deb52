use std::{env, str::FromStr, time::Duration};

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_API_VERSION: &str = "2024-07-01-preview";

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: SecretString,
    pub openai_endpoint: String,
    pub openai_deployment: String,
    pub openai_api_version: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub generation_timeout_secs: u64,
    pub generation_max_attempts: u32,
    pub coverage_threshold: f64,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment. Azure credentials
    /// have no defaults and must be supplied.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::ConfigError(format!("{} must be set", key)))
        };

        let config = Self {
            openai_api_key: SecretString::from(required("AZURE_OPENAI_API_KEY")?),
            openai_endpoint: required("AZURE_OPENAI_ENDPOINT")?,
            openai_deployment: required("AZURE_OPENAI_DEPLOYMENT")?,
            openai_api_version: lookup("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            web_server_host: lookup("WEB_SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            web_server_port: parse_or("WEB_SERVER_PORT", lookup("WEB_SERVER_PORT"), 8000)?,
            generation_timeout_secs: parse_or(
                "GENERATION_TIMEOUT_SECS",
                lookup("GENERATION_TIMEOUT_SECS"),
                30,
            )?,
            generation_max_attempts: parse_or(
                "GENERATION_MAX_ATTEMPTS",
                lookup("GENERATION_MAX_ATTEMPTS"),
                2,
            )?,
            coverage_threshold: parse_or("COVERAGE_THRESHOLD", lookup("COVERAGE_THRESHOLD"), 0.8)?,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make the generation pipeline misbehave.
    pub fn validate(&self) -> AppResult<()> {
        if !self.openai_endpoint.starts_with("http://") && !self.openai_endpoint.starts_with("https://") {
            return Err(AppError::ConfigError(format!(
                "AZURE_OPENAI_ENDPOINT must be an http(s) URL, got '{}'",
                self.openai_endpoint
            )));
        }

        if self.generation_timeout_secs == 0 || self.generation_timeout_secs > 300 {
            return Err(AppError::ConfigError(format!(
                "GENERATION_TIMEOUT_SECS must be between 1 and 300, got {}",
                self.generation_timeout_secs
            )));
        }

        if !(1..=5).contains(&self.generation_max_attempts) {
            return Err(AppError::ConfigError(format!(
                "GENERATION_MAX_ATTEMPTS must be between 1 and 5, got {}",
                self.generation_max_attempts
            )));
        }

        if !(0.0..=1.0).contains(&self.coverage_threshold) {
            return Err(AppError::ConfigError(format!(
                "COVERAGE_THRESHOLD must be within 0.0..=1.0, got {}",
                self.coverage_threshold
            )));
        }

        Ok(())
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: SecretString::from("test-api-key".to_string()),
            openai_endpoint: "https://example.openai.azure.com".to_string(),
            openai_deployment: "gpt-test".to_string(),
            openai_api_version: DEFAULT_API_VERSION.to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8000,
            generation_timeout_secs: 5,
            generation_max_attempts: 2,
            coverage_threshold: 0.8,
            cors_allowed_origin: None,
        }
    }
}

/// The default when `value` is absent or blank, an error when it is set but
/// does not parse.
fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> AppResult<T> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} has an invalid value '{}'", key, raw))),
    }
}
