use crate::error::{InsightError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CLAUDE_HAIKU: &str = "claude-3-haiku-20240307";
pub const CLAUDE_SONNET: &str = "claude-3-sonnet-20240229";

pub const ENV_STORE_ROOT: &str = "FUND_INSIGHTS_ROOT";
pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "ANTHROPIC_MODEL";

/// Process-wide settings, built once at start-up and handed by reference to
/// the store and LLM client constructors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub storage: StorageConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one sub-directory per container.
    pub root: PathBuf,
    pub hedge_fund_container: String,
    pub venture_container: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            hedge_fund_container: "hedgefunds".to_string(),
            venture_container: "venturecapitalfunds".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: CLAUDE_HAIKU.to_string(),
            max_tokens: 2000,
            temperature: 0.2,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| InsightError::Config(format!("{} is not set", ENV_API_KEY)))
    }
}

impl InsightConfig {
    /// Loads a JSON config file; missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_STORE_ROOT) {
            self.storage.root = PathBuf::from(root);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.llm.model = model;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(InsightError::Config(format!(
                "temperature {} must be between 0.0 and 1.0",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(InsightError::Config("max_tokens must be positive".to_string()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(InsightError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InsightConfig::default();
        assert_eq!(config.storage.hedge_fund_container, "hedgefunds");
        assert_eq!(config.storage.venture_container, "venturecapitalfunds");
        assert_eq!(config.llm.model, CLAUDE_HAIKU);
        assert_eq!(config.llm.max_tokens, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InsightConfig = serde_json::from_str(r#"{"llm": {"max_tokens": 3000}}"#).unwrap();
        assert_eq!(config.llm.max_tokens, 3000);
        assert_eq!(config.llm.model, CLAUDE_HAIKU);
        assert_eq!(config.storage.root, PathBuf::from("data"));
    }

    #[test]
    fn test_overrides() {
        let config = InsightConfig::default()
            .with_overrides(|name| match name {
                ENV_STORE_ROOT => Some("/srv/letters".to_string()),
                ENV_API_KEY => Some("sk-test".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.storage.root, PathBuf::from("/srv/letters"));
        assert_eq!(config.llm.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_missing_api_key() {
        let config = InsightConfig::default();
        assert!(matches!(config.llm.require_api_key(), Err(InsightError::Config(_))));
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = InsightConfig::default();
        config.llm.temperature = 1.5;
        assert!(config.validate().is_err());
    }
}
