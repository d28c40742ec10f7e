use crate::core::OpenRouterError;
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

include!(concat!(env!("OUT_DIR"), "/default_settings.rs"));

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const ENV_PREFIX: &str = "OPENROUTER";

/// Connection settings owned by a client. Fixed once the client is built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Sent as `HTTP-Referer` so the app shows up in the OpenRouter rankings
    pub http_referer: Option<String>,
    /// Sent as `X-Title`
    pub x_title: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_referer: None,
            x_title: None,
        }
    }

    /// Trailing slashes are dropped so paths can always start with `/`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.http_referer = Some(referer.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.x_title = Some(title.into());
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("http_referer", &self.http_referer)
            .field("x_title", &self.x_title)
            .finish()
    }
}

/// CLI settings: embedded defaults, then `config.toml`, then `OPENROUTER_*` env vars.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub default_model: String,
    pub base_url: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    pub api_key: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self, OpenRouterError> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, OpenRouterError> {
        let settings = config::Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Builds the client config; fails if no API key was found anywhere.
    pub fn client_config(&self) -> Result<ClientConfig, OpenRouterError> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            OpenRouterError::ConfigError(
                "OPENROUTER_API_KEY not set in .env or environment".to_string(),
            )
        })?;

        let mut config = ClientConfig::new(api_key).with_base_url(&self.base_url);
        if let Some(referer) = &self.http_referer {
            config = config.with_referer(referer);
        }
        if let Some(title) = &self.x_title {
            config = config.with_title(title);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::new("sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.http_referer.is_none());
        assert!(config.x_title.is_none());
    }

    #[test]
    fn test_client_config_trims_base_url() {
        let config = ClientConfig::new("sk-test").with_base_url("http://localhost:8080/api/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("sk-very-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-very-secret"));
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(
            file,
            "default_model = \"anthropic/claude-3.5-sonnet\"\nx_title = \"my-app\""
        )
        .expect("Failed to write config");

        let settings = Settings::load_from(file.path()).expect("Settings should load");
        assert_eq!(settings.default_model, "anthropic/claude-3.5-sonnet");
        assert_eq!(settings.x_title.as_deref(), Some("my-app"));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_settings_missing_file_uses_embedded_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Settings::load_from(&dir.path().join("absent.toml"))
            .expect("Settings should load");
        assert!(!settings.default_model.is_empty());
        assert_eq!(settings.max_tokens, Some(1024));
    }

    #[test]
    fn test_client_config_requires_api_key() {
        let settings = Settings {
            default_model: "m".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            http_referer: Some("https://example.com".to_string()),
            x_title: None,
            api_key: None,
        };
        assert!(matches!(
            settings.client_config(),
            Err(OpenRouterError::ConfigError(_))
        ));

        let settings = Settings {
            api_key: Some("sk-test".to_string()),
            ..settings
        };
        let config = settings.client_config().expect("api key present");
        assert_eq!(config.http_referer.as_deref(), Some("https://example.com"));
    }
}
