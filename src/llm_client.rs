//! Unified chat client trait for remote (Chutes, OpenRouter) and local
//! (Ollama, vLLM) OpenAI-compatible servers

use crate::chat::{CompletionRequest, CompletionResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Unified trait for chat-completions clients
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the client type for debugging/logging
    fn client_type(&self) -> &str;

    /// Get the endpoint the client talks to
    fn endpoint(&self) -> &str;
}
