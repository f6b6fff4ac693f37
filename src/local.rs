//! Client for locally-hosted models behind an OpenAI-compatible API
//!
//! Covers Ollama and vLLM servers, which speak the same chat-completions
//! contract as the remote providers. No API key is required unless the
//! deployment is secured.

use crate::chat::{CompletionRequest, CompletionResponse};
use crate::error::{Error, Result};
use crate::llm_client::ChatClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Local server client configuration
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Base URL of the OpenAI-compatible API (e.g. "http://localhost:11434/v1")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Optional API key for secured deployments
    pub api_key: Option<String>,
}

impl LocalConfig {
    /// Create a new local server configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            // Local inference of a 30B model can take minutes per case
            timeout: Duration::from_secs(300),
            api_key: None,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("LOCAL_API_BASE")
            .unwrap_or_else(|_| "http://localhost:11434/v1".to_string());
        let api_key = std::env::var("LOCAL_API_KEY").ok();

        Self {
            base_url,
            timeout: Duration::from_secs(300),
            api_key,
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Client for a local OpenAI-compatible model server
pub struct LocalClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LocalConfig,
}

impl LocalClient {
    /// Create a new local client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(LocalConfig::from_env())
    }

    /// Create a new local client with the given configuration
    pub fn new(config: LocalConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &LocalConfig {
        &self.config
    }

    /// List the models the server exposes; doubles as a health probe
    pub async fn models(&self) -> Result<ModelsResponse> {
        let url = format!("{}/models", self.config.base_url);

        let mut request = self.client.get(&url);
        if let Some(ref api_key) = self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "local",
                format!("failed to list models: {}", response.status()),
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatClient for LocalClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %request.model, endpoint = %self.config.base_url, "local completion");

        let mut http_request = self.client.post(&url).json(&request);

        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::provider(
                "local",
                format!("request failed with status {status}: {error_text}"),
            ));
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(completion)
    }

    fn client_type(&self) -> &str {
        "local"
    }

    fn endpoint(&self) -> &str {
        &self.config.base_url
    }
}

/// Models response from the local server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Object type (always "list")
    pub object: String,
    /// List of available models
    pub data: Vec<ModelInfo>,
}

/// Information about a served model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model ID
    pub id: String,
    /// Object type (always "model")
    pub object: String,
    /// Creation timestamp
    #[serde(default)]
    pub created: u64,
    /// Owner organization
    #[serde(default)]
    pub owned_by: String,
}
