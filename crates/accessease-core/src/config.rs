use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::ai::gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::ConfigError;
use crate::gateway::AssistantGateway;
use crate::provider::Provider;
use crate::responder::MockResponder;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const PROVIDER_ENV: &str = "ACCESSEASE_PROVIDER";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: Provider,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: Option<u64>,
    /// Seed for the offline responder; unset means a fresh seed per run.
    pub mock_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            provider: Provider::Mock,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            mock_seed: None,
        }
    }

    /// Loads the user config file, then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Environment wins over the file: `GEMINI_API_KEY`, `ACCESSEASE_PROVIDER`.
    pub fn apply_env(&mut self) {
        if let Some(key) = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(key);
        }

        if let Ok(value) = std::env::var(PROVIDER_ENV) {
            match Provider::from_str(&value) {
                Some(provider) => self.provider = provider,
                None => warn!(value = %value, "ignoring unknown {}", PROVIDER_ENV),
            }
        }
    }

    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("accessease"))
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Where the key came from: "env", "config", or None.
    pub fn key_source(&self) -> Option<&'static str> {
        if std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()) {
            Some("env")
        } else if self.gemini_api_key.is_some() {
            Some("config")
        } else {
            None
        }
    }

    /// API key with all but the last four characters masked.
    pub fn redacted_key(&self) -> Option<String> {
        self.gemini_api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            let visible = chars.len().saturating_sub(4);
            let tail: String = chars[visible..].iter().collect();
            format!("{}{}", "*".repeat(visible.min(8)), tail)
        })
    }

    fn responder(&self) -> MockResponder {
        match self.mock_seed {
            Some(seed) => MockResponder::new(StdRng::seed_from_u64(seed)),
            None => MockResponder::from_entropy(),
        }
    }

    /// Builds the gateway for the configured provider.
    pub fn build_gateway(&self) -> AssistantGateway {
        match self.provider {
            Provider::Mock => {
                info!("using offline mock responses");
                AssistantGateway::mock(self.responder())
            }
            Provider::Gemini => {
                let client = self.gemini_client();
                if client.is_none() {
                    warn!("{} not set; every reply will be the fallback", API_KEY_ENV);
                }
                info!(model = %self.gemini_model, "using Gemini responses");
                AssistantGateway::gemini(client, self.responder())
            }
        }
    }

    fn gemini_client(&self) -> Option<GeminiClient> {
        let key = self.gemini_api_key.as_deref()?;
        let client = GeminiClient::new(key)
            .with_base_url(&self.gemini_base_url)
            .with_model(&self.gemini_model);

        match self.request_timeout_secs {
            Some(secs) => match client.clone().with_timeout(Duration::from_secs(secs)) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "could not apply request timeout");
                    Some(client)
                }
            },
            None => Some(client),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.provider, Provider::Mock);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.provider = Provider::Gemini;
        config.gemini_api_key = Some("abc123".to_string());
        config.request_timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"provider": "gemini"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.gemini_api_key, None);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ provider").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_redacted_key_hides_prefix() {
        let mut config = Config::new();
        assert_eq!(config.redacted_key(), None);

        config.gemini_api_key = Some("AIzaSecretKey1234".to_string());
        assert_eq!(config.redacted_key().as_deref(), Some("********1234"));

        config.gemini_api_key = Some("abc".to_string());
        assert_eq!(config.redacted_key().as_deref(), Some("abc"));
    }

    #[test]
    fn test_build_gateway_follows_provider() {
        let mut config = Config::new();
        assert_eq!(config.build_gateway().provider(), Provider::Mock);

        config.provider = Provider::Gemini;
        config.gemini_api_key = Some("k".to_string());
        let gateway = config.build_gateway();
        assert_eq!(gateway.provider(), Provider::Gemini);
        assert_eq!(gateway.model(), Some(DEFAULT_MODEL));
    }
}
