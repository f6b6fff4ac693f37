//! Core type definitions shared by the CLIs and the benchmark harness

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a single benchmark execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    /// Create a new random execution ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an execution ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u64,
    /// Number of completion tokens
    pub completion_tokens: u64,
    /// Total tokens (prompt + completion)
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Create a new token usage record
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Add another token usage to this one
    pub fn add(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Per-token pricing for a model, in USD per million tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pricing {
    /// Cost per million prompt tokens
    pub input_per_million: f64,
    /// Cost per million completion tokens
    pub output_per_million: f64,
}

impl Pricing {
    /// Kimi K2 Thinking pricing on both Chutes and OpenRouter
    pub const KIMI_K2: Pricing = Pricing {
        input_per_million: 0.60,
        output_per_million: 2.50,
    };

    /// Estimate the cost of a query in USD
    pub fn estimate(&self, usage: TokenUsage) -> f64 {
        let input = usage.prompt_tokens as f64 / 1_000_000.0 * self.input_per_million;
        let output = usage.completion_tokens as f64 / 1_000_000.0 * self.output_per_million;
        input + output
    }
}
