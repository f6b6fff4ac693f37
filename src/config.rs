//! Configuration types: providers, credentials, model settings, and the
//! benchmark model roster

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Chat-completions provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Chutes.ai decentralized inference
    Chutes,
    /// OpenRouter multi-provider gateway
    OpenRouter,
    /// Moonshot AI first-party API
    Moonshot,
    /// Local Ollama server (no API key required)
    Ollama,
}

impl Provider {
    /// Environment variable holding the API key, if the provider needs one
    pub fn key_env_var(&self) -> Option<&'static str> {
        match self {
            Provider::Chutes => Some("CHUTES_API_KEY"),
            Provider::OpenRouter => Some("OPENROUTER_API_KEY"),
            Provider::Moonshot => Some("MOONSHOT_API_KEY"),
            Provider::Ollama => None,
        }
    }

    /// Default base URL for the provider's OpenAI-compatible API
    pub fn default_base_url(&self) -> Url {
        let url = match self {
            Provider::Chutes => "https://llm.chutes.ai/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::Moonshot => "https://api.moonshot.ai/v1",
            Provider::Ollama => "http://localhost:11434/v1",
        };
        Url::parse(url).expect("valid provider URL")
    }

    /// Provider name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Chutes => "chutes",
            Provider::OpenRouter => "openrouter",
            Provider::Moonshot => "moonshot",
            Provider::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Load `~/.env` into the process environment if present.
///
/// Missing files are fine; an existing file that fails to parse is reported.
pub fn load_dotfile() -> Result<()> {
    let Some(home) = dirs::home_dir() else {
        return Ok(());
    };
    let path = home.join(".env");
    if !path.exists() {
        return Ok(());
    }
    dotenvy::from_path(&path)
        .map_err(|e| Error::config(format!("failed to load {}: {e}", path.display())))?;
    Ok(())
}

/// Look up the API key for a provider, loading `~/.env` first.
///
/// Ollama needs no key; a dummy value is returned so the OpenAI-compatible
/// auth header can still be formed.
pub fn api_key_for(provider: Provider) -> Result<SecretString> {
    let Some(var) = provider.key_env_var() else {
        return Ok(SecretString::from("ollama"));
    };

    load_dotfile()?;
    let key = std::env::var(var)
        .map_err(|_| Error::config(format!("{var} not found in environment or ~/.env")))?;
    Ok(SecretString::from(key))
}

/// Connection configuration for a chat-completions provider
#[derive(Clone)]
pub struct ProviderConfig {
    /// Which provider this configuration targets
    pub provider: Provider,
    /// API key
    pub api_key: SecretString,
    /// Base URL of the OpenAI-compatible API
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// `HTTP-Referer` attribution header (OpenRouter rankings)
    pub referer: Option<String>,
    /// `X-Title` attribution header (OpenRouter rankings)
    pub app_title: Option<String>,
}

impl ProviderConfig {
    /// Create a configuration with the provider's default endpoint
    pub fn new(provider: Provider, api_key: SecretString) -> Self {
        Self {
            provider,
            api_key,
            base_url: provider.default_base_url(),
            timeout: Duration::from_secs(300),
            referer: None,
            app_title: None,
        }
    }

    /// Create a configuration from `~/.env` / the process environment
    pub fn from_env(provider: Provider) -> Result<Self> {
        Ok(Self::new(provider, api_key_for(provider)?))
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the attribution headers sent to OpenRouter
    pub fn with_attribution(
        mut self,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.referer = Some(referer.into());
        self.app_title = Some(title.into());
        self
    }

    /// Get the API key as a string
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &"***REDACTED***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

/// Request settings for a model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g. "moonshotai/kimi-k2-thinking")
    pub model: String,
    /// Maximum tokens for the completion
    pub max_tokens: u32,
    /// Temperature for sampling
    pub temperature: f32,
    /// Whether to request the vendor heavy-mode fan-out
    #[serde(default)]
    pub heavy_mode: bool,
}

impl ModelConfig {
    /// Create a model configuration with the standard deep-reasoning
    /// settings (exhaustive answers, balanced temperature)
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 16_384,
            temperature: 0.3,
            heavy_mode: false,
        }
    }

    /// Switch to the quick-answer settings (short responses, low temperature)
    pub fn simple(mut self) -> Self {
        self.max_tokens = 1_000;
        self.temperature = 0.1;
        self
    }

    /// Set the maximum tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable the heavy-mode request flag
    pub fn with_heavy_mode(mut self, heavy_mode: bool) -> Self {
        self.heavy_mode = heavy_mode;
        self
    }
}

/// Well-known model identifiers
pub mod presets {
    /// Kimi K2 Thinking as published on OpenRouter
    pub const KIMI_K2_THINKING: &str = "moonshotai/kimi-k2-thinking";

    /// Kimi K2 Thinking as published on Chutes
    pub const KIMI_K2_THINKING_CHUTES: &str = "moonshotai/Kimi-K2-Thinking";

    /// Qwen3-Coder 30B served locally via Ollama
    pub const QWEN3_CODER_30B: &str = "qwen3-coder:30b";
}

/// One entry in the benchmark model roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Provider serving this model
    pub provider: Provider,
    /// Model identifier on that provider
    pub model: String,
    /// Override for the provider base URL (local servers)
    #[serde(default)]
    pub api_base: Option<Url>,
    /// Maximum completion tokens
    #[serde(default = "default_roster_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_roster_temperature")]
    pub temperature: f32,
    /// Whether the entry runs in heavy mode
    #[serde(default)]
    pub heavy_mode: bool,
}

fn default_roster_max_tokens() -> u32 {
    4_000
}

fn default_roster_temperature() -> f32 {
    0.3
}

impl RosterEntry {
    /// Request settings for this roster entry
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(&self.model)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_heavy_mode(self.heavy_mode)
    }
}

/// Benchmark model roster: model id -> entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRoster {
    /// Configured models keyed by their benchmark identifier
    pub models: BTreeMap<String, RosterEntry>,
}

impl ModelRoster {
    /// Load a roster from a `models.yaml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// The controlled-benchmark roster used when no file is given
    pub fn builtin() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            "kimi_k2_normal".to_string(),
            RosterEntry {
                provider: Provider::Chutes,
                model: presets::KIMI_K2_THINKING_CHUTES.to_string(),
                api_base: None,
                max_tokens: 4_000,
                temperature: 0.3,
                heavy_mode: false,
            },
        );
        models.insert(
            "kimi_k2_heavy".to_string(),
            RosterEntry {
                provider: Provider::Chutes,
                model: presets::KIMI_K2_THINKING_CHUTES.to_string(),
                api_base: None,
                max_tokens: 4_000,
                temperature: 0.3,
                heavy_mode: true,
            },
        );
        models.insert(
            "qwen3_coder_30b".to_string(),
            RosterEntry {
                provider: Provider::Ollama,
                model: presets::QWEN3_CODER_30B.to_string(),
                api_base: None,
                max_tokens: 4_000,
                temperature: 0.3,
                heavy_mode: false,
            },
        );
        Self { models }
    }

    /// Look up an entry by its benchmark model id
    pub fn get(&self, model_id: &str) -> Result<&RosterEntry> {
        self.models
            .get(model_id)
            .ok_or_else(|| Error::UnknownModel(model_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_key_vars() {
        assert_eq!(Provider::Chutes.key_env_var(), Some("CHUTES_API_KEY"));
        assert_eq!(
            Provider::OpenRouter.key_env_var(),
            Some("OPENROUTER_API_KEY")
        );
        assert_eq!(Provider::Ollama.key_env_var(), None);
    }

    #[test]
    fn ollama_needs_no_key() {
        let key = api_key_for(Provider::Ollama).unwrap();
        assert_eq!(key.expose_secret(), "ollama");
    }

    #[test]
    fn model_config_simple_mode() {
        let config = ModelConfig::new(presets::KIMI_K2_THINKING).simple();
        assert_eq!(config.max_tokens, 1_000);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ProviderConfig::new(Provider::Chutes, SecretString::from("sk-secret"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn builtin_roster_has_heavy_pair() {
        let roster = ModelRoster::builtin();
        assert!(!roster.get("kimi_k2_normal").unwrap().heavy_mode);
        assert!(roster.get("kimi_k2_heavy").unwrap().heavy_mode);
        assert!(roster.get("missing").is_err());
    }

    #[test]
    fn roster_yaml_round_trip() {
        let yaml = "
models:
  kimi_k2_normal:
    provider: chutes
    model: moonshotai/Kimi-K2-Thinking
  qwen3_coder_30b:
    provider: ollama
    model: qwen3-coder:30b
    api_base: http://localhost:11434/v1
    max_tokens: 2000
";
        let roster: ModelRoster = serde_yaml::from_str(yaml).unwrap();
        let kimi = roster.get("kimi_k2_normal").unwrap();
        assert_eq!(kimi.max_tokens, 4_000);
        assert!(!kimi.heavy_mode);
        let qwen = roster.get("qwen3_coder_30b").unwrap();
        assert_eq!(qwen.max_tokens, 2_000);
        assert_eq!(
            qwen.api_base.as_ref().unwrap().as_str(),
            "http://localhost:11434/v1"
        );
    }
}
