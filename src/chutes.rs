//! Chutes.ai API client
//!
//! Chutes serves Kimi K2 Thinking on decentralized infrastructure behind the
//! standard chat-completions contract; only the endpoint and credentials
//! differ from OpenRouter. The same plain bearer-auth shape covers the
//! Moonshot first-party API, so roster entries for either provider build on
//! this client.

use crate::chat::{CompletionRequest, CompletionResponse};
use crate::config::{Provider, ProviderConfig};
use crate::error::{Error, Result};
use crate::llm_client::ChatClient;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Chutes API client
pub struct ChutesClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: ProviderConfig,
}

impl ChutesClient {
    /// Create a new Chutes client from `~/.env` / the environment
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env(Provider::Chutes)?)
    }

    /// Create a new Chutes client with the given configuration
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Send a completion request
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %request.model, heavy = ?request.heavy_mode, "chutes completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::provider(
                self.config.provider.name(),
                format!("request failed with status {status}: {error_text}"),
            ));
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(completion)
    }

    /// Get the configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl ChatClient for ChutesClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        ChutesClient::complete(self, request).await
    }

    fn client_type(&self) -> &str {
        self.config.provider.name()
    }

    fn endpoint(&self) -> &str {
        self.config.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Message;
    use secrecy::SecretString;
    use url::Url;

    #[tokio::test]
    async fn complete_sends_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer chutes-key")
            .with_status(200)
            .with_body(
                r#"{
                    "id": "cmpl-2",
                    "model": "moonshotai/Kimi-K2-Thinking",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "ok"},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
                }"#,
            )
            .create_async()
            .await;

        let config = ProviderConfig::new(Provider::Chutes, SecretString::from("chutes-key"))
            .with_base_url(Url::parse(&server.url()).unwrap());
        let client = ChutesClient::new(config).unwrap();

        let request = CompletionRequest::new(
            "moonshotai/Kimi-K2-Thinking",
            vec![Message::user("ping")],
        );
        let response = client.complete(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content(), Some("ok"));
    }
}
