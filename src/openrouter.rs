//! OpenRouter API client
//!
//! OpenRouter fronts the same chat-completions contract as Chutes but adds
//! account endpoints used for balance reporting after each query.

use crate::chat::{CompletionRequest, CompletionResponse};
use crate::config::{Provider, ProviderConfig};
use crate::error::{Error, Result};
use crate::llm_client::ChatClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default `HTTP-Referer` attribution header
pub const DEFAULT_REFERER: &str = "https://github.com/moonshotai/Kimi-K2";

/// Default `X-Title` attribution header
pub const DEFAULT_APP_TITLE: &str = "Kimi K2 CLI";

/// OpenRouter API client
pub struct OpenRouterClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: ProviderConfig,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client from `~/.env` / the environment
    pub fn from_env() -> Result<Self> {
        let config = ProviderConfig::from_env(Provider::OpenRouter)?
            .with_attribution(DEFAULT_REFERER, DEFAULT_APP_TITLE);
        Self::new(config)
    }

    /// Create a new OpenRouter client with the given configuration
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Send a completion request
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %request.model, heavy = ?request.heavy_mode, "openrouter completion");

        let mut http_request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&request);

        if let Some(ref referer) = self.config.referer {
            http_request = http_request.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.app_title {
            http_request = http_request.header("X-Title", title);
        }

        let response = http_request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::provider(
                "openrouter",
                format!("request failed with status {status}: {error_text}"),
            ));
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(completion)
    }

    /// Fetch the account's credit balance.
    ///
    /// Prepaid accounts answer on `/credits`; accounts with a fixed limit
    /// only answer on `/auth/key`. Both are tried in that order.
    pub async fn credits(&self) -> Result<CreditsBalance> {
        let url = format!("{}/credits", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .send()
            .await?;

        if response.status().is_success() {
            let credits: CreditsResponse = response.json().await?;
            return Ok(CreditsBalance::Prepaid {
                total_credits: credits.data.total_credits,
                total_usage: credits.data.total_usage,
            });
        }

        let url = format!("{}/auth/key", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .send()
            .await?;

        if response.status().is_success() {
            let key: KeyResponse = response.json().await?;
            if let Some(limit) = key.data.limit {
                if limit > 0.0 {
                    return Ok(CreditsBalance::Limited {
                        limit,
                        usage: key.data.usage,
                    });
                }
            }
        }

        Err(Error::provider("openrouter", "could not fetch balance"))
    }

    /// Get the configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        OpenRouterClient::complete(self, request).await
    }

    fn client_type(&self) -> &str {
        "openrouter"
    }

    fn endpoint(&self) -> &str {
        self.config.base_url.as_str()
    }
}

/// Account credit balance reported by OpenRouter
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CreditsBalance {
    /// Prepaid account with purchased credits
    Prepaid {
        /// Total purchased credits in USD
        total_credits: f64,
        /// Credits spent so far in USD
        total_usage: f64,
    },
    /// Account with a fixed spending limit
    Limited {
        /// Spending limit in USD
        limit: f64,
        /// Amount spent so far in USD
        usage: f64,
    },
}

impl CreditsBalance {
    /// Remaining balance in USD
    pub fn remaining(&self) -> f64 {
        match self {
            CreditsBalance::Prepaid {
                total_credits,
                total_usage,
            } => total_credits - total_usage,
            CreditsBalance::Limited { limit, usage } => limit - usage,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    data: CreditsData,
}

#[derive(Debug, Deserialize)]
struct CreditsData {
    #[serde(default)]
    total_credits: f64,
    #[serde(default)]
    total_usage: f64,
}

#[derive(Debug, Deserialize)]
struct KeyResponse {
    data: KeyData,
}

#[derive(Debug, Deserialize)]
struct KeyData {
    #[serde(default)]
    limit: Option<f64>,
    #[serde(default)]
    usage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Message;
    use secrecy::SecretString;
    use url::Url;

    fn test_client(base_url: &str) -> OpenRouterClient {
        let config = ProviderConfig::new(Provider::OpenRouter, SecretString::from("test-key"))
            .with_base_url(Url::parse(base_url).unwrap())
            .with_attribution(DEFAULT_REFERER, DEFAULT_APP_TITLE);
        OpenRouterClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn complete_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("x-title", DEFAULT_APP_TITLE)
            .with_status(200)
            .with_body(
                r#"{
                    "id": "cmpl-1",
                    "model": "moonshotai/kimi-k2-thinking",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "hello"},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let request = CompletionRequest::new(
            "moonshotai/kimi-k2-thinking",
            vec![Message::user("hi")],
        );
        let response = client.complete(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content(), Some("hello"));
        assert_eq!(response.token_usage().total_tokens, 15);
    }

    #[tokio::test]
    async fn complete_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let request = CompletionRequest::new("m", vec![Message::user("hi")]);
        let err = client.complete(request).await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn credits_prefers_prepaid_endpoint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/credits")
            .with_status(200)
            .with_body(r#"{"data": {"total_credits": 25.0, "total_usage": 5.5}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let balance = client.credits().await.unwrap();
        assert!((balance.remaining() - 19.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn credits_falls_back_to_key_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/credits")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/auth/key")
            .with_status(200)
            .with_body(r#"{"data": {"limit": 10.0, "usage": 4.0}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let balance = client.credits().await.unwrap();
        assert!((balance.remaining() - 6.0).abs() < 1e-9);
    }
}
