use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ai::GeminiClient;
use crate::auth::AuthClient;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub gemini_model: Option<String>,
    #[serde(default)]
    pub gemini_base_url: Option<String>,
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub auth_anon_key: Option<String>,
    #[serde(default)]
    pub last_email: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        tracing::debug!(path = %config_path.display(), "saved config");
        Ok(())
    }

    /// Fill unset or overridden values from the environment (and `.env`).
    /// Environment variables win over the file.
    pub fn with_env_overrides(mut self) -> Self {
        let _ = dotenvy::dotenv();
        self.apply_overrides(|name| std::env::var(name).ok());
        self
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let pick = |name: &str, current: &mut Option<String>| {
            if let Some(value) = var(name).filter(|v| !v.trim().is_empty()) {
                *current = Some(value);
            }
        };
        pick("GEMINI_API_KEY", &mut self.gemini_api_key);
        pick("GEMINI_MODEL", &mut self.gemini_model);
        pick("SUPABASE_URL", &mut self.auth_url);
        pick("SUPABASE_ANON_KEY", &mut self.auth_anon_key);
    }

    /// Build the generative-text client. A missing key is not an error
    /// here; the provider rejects the call and the user sees the fallback.
    pub fn gemini_client(&self) -> GeminiClient {
        if self.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; AI assistance will fail");
        }
        GeminiClient::new(self.gemini_api_key.as_deref().unwrap_or_default())
            .with_base_url(self.gemini_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
            .with_model(self.gemini_model.as_deref().unwrap_or(DEFAULT_MODEL))
    }

    pub fn auth_client(&self) -> AuthClient {
        AuthClient::new(self.auth_url.as_deref(), self.auth_anon_key.as_deref())
    }

    pub fn save_last_email(path: &Path, email: &str) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_else(|_| Self::new());
        config.last_email = Some(email.to_string());
        config.save_to(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("studygroup").join("config.json"))
    }
}
