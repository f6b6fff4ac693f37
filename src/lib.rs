//! # Kimi K2 CLI and benchmark harness
//!
//! Thin command-line wrappers around the Kimi K2 Thinking model, reachable
//! through two OpenAI-compatible providers, plus a controlled benchmark
//! harness with a pure metrics/comparison pipeline.
//!
//! ## Binaries
//!
//! - `kimi`: query Kimi K2 via Chutes.ai
//! - `okimi`: query Kimi K2 via OpenRouter (adds web mode and credits
//!   reporting)
//! - `k2-bench`: run the controlled benchmark and render reports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kimi_k2::{ChatSession, ChutesClient, ModelConfig, QueryMode, config::presets};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Reads CHUTES_API_KEY from ~/.env or the environment
//!     let client = ChutesClient::from_env()?;
//!     let session = ChatSession::new(
//!         Arc::new(client),
//!         ModelConfig::new(presets::KIMI_K2_THINKING_CHUTES),
//!     );
//!
//!     let outcome = session.ask("What is 2+2?", QueryMode::Simple).await?;
//!     println!("{}", outcome.content);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bench;
pub mod chat;
pub mod chutes;
pub mod config;
pub mod error;
pub mod llm_client;
pub mod local;
pub mod openrouter;
pub mod repl;
pub mod session;
pub mod tools;
pub mod types;

// Re-exports for convenience
pub use chat::{CompletionRequest, CompletionResponse, Message, Role};
pub use chutes::ChutesClient;
pub use config::{ModelConfig, ModelRoster, Provider, ProviderConfig};
pub use error::{Error, Result};
pub use llm_client::ChatClient;
pub use local::{LocalClient, LocalConfig};
pub use openrouter::{CreditsBalance, OpenRouterClient};
pub use session::{ChatSession, QueryMode, QueryOutcome};
pub use tools::{SearxngTool, Tool, ToolOutput};
pub use types::{ExecutionId, Pricing, TokenUsage};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::bench::{compute_metrics, ExecutionRecord, ModelMetrics};
    pub use crate::chat::{CompletionRequest, Message};
    pub use crate::config::{ModelConfig, Provider, ProviderConfig};
    pub use crate::error::{Error, Result};
    pub use crate::llm_client::ChatClient;
    pub use crate::session::{ChatSession, QueryMode};
    pub use crate::types::*;
}
