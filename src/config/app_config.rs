use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::domain::DomainError;

const ENV_PREFIX: &str = "TYK";

/// Application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the gateway's management API
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://localhost:8080`
    pub url: String,
    /// Value of the `X-Tyk-Authorization` header
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: SecretString,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(SecretString::new(value.into()))
}

impl AppConfig {
    /// Layered load: `config/default`, `config/local`, then `TYK__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Reject settings the client cannot start with. Messages never carry the credential.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.gateway.validate()
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.url.trim().is_empty() {
            return Err(DomainError::configuration("gateway.url must not be empty"));
        }

        let url = Url::parse(&self.url)
            .map_err(|e| DomainError::configuration(format!("gateway.url is not a valid URL: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::configuration(format!(
                "gateway.url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.api_key.expose_secret().trim().is_empty() {
            return Err(DomainError::configuration("gateway.api_key must not be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(DomainError::configuration(
                "gateway.timeout_secs must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with(
        overrides: &[(&str, &str)],
    ) -> config::ConfigBuilder<config::builder::DefaultState> {
        overrides
            .iter()
            .fold(config::Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value).unwrap()
            })
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_builder(builder_with(&[
            ("gateway.url", "http://localhost:8080"),
            ("gateway.api_key", "secret-admin-key"),
        ]))
        .unwrap();

        assert_eq!(config.gateway.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.gateway.api_key.expose_secret(), "secret-admin-key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_gateway_fails_to_load() {
        let result = AppConfig::from_builder(builder_with(&[("logging.level", "debug")]));

        assert!(result.is_err());
    }

    #[test]
    fn test_logging_overrides() {
        let config = AppConfig::from_builder(builder_with(&[
            ("gateway.url", "https://gateway.example.com"),
            ("gateway.api_key", "k"),
            ("gateway.timeout_secs", "30"),
            ("logging.format", "json"),
        ]))
        .unwrap();

        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_empty_credential() {
        let config = AppConfig::from_builder(builder_with(&[
            ("gateway.url", "http://localhost:8080"),
            ("gateway.api_key", "  "),
        ]))
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("gateway.api_key"));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        for url in ["", "localhost:8080/path", "ftp://gateway", "not a url"] {
            let config = GatewayConfig {
                url: url.to_string(),
                api_key: SecretString::new("k".into()),
                timeout_secs: 10,
            };

            assert!(config.validate().is_err(), "{url} should be rejected");
        }
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = GatewayConfig {
            url: "http://localhost:8080".to_string(),
            api_key: SecretString::new("super-secret-admin-key".into()),
            timeout_secs: 10,
        };

        assert!(!format!("{config:?}").contains("super-secret-admin-key"));
    }
}
