//! Form configuration.
//!
//! Endpoints and form behaviour are read from `DEPOSIT_*` environment
//! variables, after loading a `.env` file if one is present. Anything
//! unset falls back to the constants in [`deposit_core::defaults`].

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use deposit_core::defaults;
use deposit_core::LookupOptions;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Endpoints and options of one deposit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    pub licenses_url: String,
    pub keywords_url: String,
    pub authors_url: String,
    pub categories_url: String,
    pub schema_url: String,
    /// Base URL of custom renderer templates.
    pub templates_base: Option<String>,
    /// Per-request timeout. `None` lets requests run indefinitely.
    pub http_timeout: Option<Duration>,
    /// Fields whose backend validation errors are never shown.
    pub no_validate_fields: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            licenses_url: defaults::LICENSES_URL.to_string(),
            keywords_url: defaults::KEYWORDS_URL.to_string(),
            authors_url: defaults::AUTHORS_URL.to_string(),
            categories_url: defaults::CATEGORIES_URL.to_string(),
            schema_url: defaults::SCHEMA_URL.to_string(),
            templates_base: None,
            http_timeout: None,
            no_validate_fields: Vec::new(),
        }
    }
}

impl FormConfig {
    /// Load `.env` if present, then read the environment.
    pub fn load() -> ConfigResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        let config = Self::from_env()?;
        config.validate()?;
        info!(
            licenses = %config.licenses_url,
            keywords = %config.keywords_url,
            authors = %config.authors_url,
            categories = %config.categories_url,
            "Form configuration resolved"
        );
        Ok(config)
    }

    /// Read configuration from environment variables only.
    pub fn from_env() -> ConfigResult<Self> {
        let base = Self::default();

        let http_timeout = match env::var(defaults::ENV_HTTP_TIMEOUT_SECS) {
            Ok(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: defaults::ENV_HTTP_TIMEOUT_SECS.to_string(),
                        value: raw.clone(),
                    })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            licenses_url: env_or(defaults::ENV_LICENSES_URL, base.licenses_url),
            keywords_url: env_or(defaults::ENV_KEYWORDS_URL, base.keywords_url),
            authors_url: env_or(defaults::ENV_AUTHORS_URL, base.authors_url),
            categories_url: env_or(defaults::ENV_CATEGORIES_URL, base.categories_url),
            schema_url: env_or(defaults::ENV_SCHEMA_URL, base.schema_url),
            templates_base: env::var(defaults::ENV_TEMPLATES_BASE)
                .ok()
                .filter(|s| !s.is_empty()),
            http_timeout,
            no_validate_fields: env::var(defaults::ENV_NO_VALIDATE_FIELDS)
                .map(|raw| parse_field_list(&raw))
                .unwrap_or_default(),
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, url) in [
            ("licenses_url", &self.licenses_url),
            ("keywords_url", &self.keywords_url),
            ("authors_url", &self.authors_url),
            ("categories_url", &self.categories_url),
            ("schema_url", &self.schema_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, url
                )));
            }
        }
        Ok(())
    }

    pub fn licenses(&self) -> LookupOptions {
        LookupOptions::new(&self.licenses_url)
    }

    pub fn keywords(&self) -> LookupOptions {
        LookupOptions::new(&self.keywords_url)
    }

    pub fn authors(&self) -> LookupOptions {
        LookupOptions::new(&self.authors_url)
    }
}

fn env_or(name: &str, fallback: String) -> String {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}

/// Split a comma separated field list, dropping blanks.
fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FormConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let config = FormConfig {
            authors_url: "/api/authors".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("authors_url"));
    }

    #[test]
    fn test_parse_field_list() {
        assert_eq!(
            parse_field_list(" title, ,description ,"),
            vec!["title".to_string(), "description".to_string()]
        );
        assert!(parse_field_list("").is_empty());
    }

    #[test]
    fn test_lookup_options_use_configured_urls() {
        let config = FormConfig::default();
        assert_eq!(config.licenses().url, defaults::LICENSES_URL);
        assert!(config.authors().extra_params.is_empty());
    }
}
