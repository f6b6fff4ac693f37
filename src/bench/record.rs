//! Benchmark execution records
//!
//! One `ExecutionRecord` per (model, case) run, written as JSON and consumed
//! by the metrics pipeline. Every optional field carries a serde default so
//! partial or corrupted records degrade to zero/false instead of failing the
//! whole batch.

use super::heavy::ConvergencePattern;
use crate::types::ExecutionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One evaluation outcome; immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Unique id of this execution
    #[serde(default)]
    pub execution_id: ExecutionId,
    /// When the case was executed
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Model/configuration under test
    #[serde(default = "unknown")]
    pub model_id: String,
    /// Dotted case identifier; the first segment is the category
    #[serde(default = "unknown")]
    pub benchmark_id: String,
    /// Request settings the case ran with
    #[serde(default)]
    pub config: RequestSettings,
    /// What was sent
    #[serde(default)]
    pub input: CaseInput,
    /// What came back
    #[serde(default)]
    pub output: CaseOutput,
    /// Measured outcome
    #[serde(default)]
    pub metrics: CaseMetrics,
    /// Present only for heavy-mode runs
    #[serde(default)]
    pub heavy_mode_data: Option<HeavyModeData>,
}

fn unknown() -> String {
    "unknown".to_string()
}

impl ExecutionRecord {
    /// Benchmark category this record belongs to
    pub fn category(&self) -> &str {
        category_of(&self.benchmark_id)
    }
}

/// Derive the category from a dotted benchmark identifier.
///
/// The category is the segment before the first `.`; an identifier without
/// a dot is its own category.
pub fn category_of(benchmark_id: &str) -> &str {
    match benchmark_id.split_once('.') {
        Some((category, _)) => category,
        None => benchmark_id,
    }
}

/// Request settings recorded with each execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestSettings {
    /// Maximum completion tokens
    #[serde(default)]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,
    /// Whether the heavy-mode flag was set
    #[serde(default)]
    pub heavy_mode: bool,
    /// Seed, when the case pinned one
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Input side of an execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseInput {
    /// The case prompt
    #[serde(default)]
    pub prompt: String,
    /// System prompt in effect
    #[serde(default)]
    pub system_prompt: String,
    /// Prompt tokens reported by the provider
    #[serde(default)]
    pub context_tokens: u64,
}

/// Output side of an execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseOutput {
    /// Response text (or an `ERROR: …` marker for failed calls)
    #[serde(default)]
    pub response: String,
    /// Reasoning trace, when the model exposes one
    #[serde(default)]
    pub reasoning: String,
}

/// Measured outcome of an execution.
///
/// `total_time` and `tokens_per_second` use `0` for "not measured"; the
/// aggregation excludes zeros from the means rather than treating them as
/// instant responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseMetrics {
    /// Whether the response contained the expected answer
    #[serde(default)]
    pub correctness: bool,
    /// Seconds until the first token (approximated)
    #[serde(default)]
    pub time_to_first_token: f64,
    /// Completion tokens per second of wall-clock time
    #[serde(default)]
    pub tokens_per_second: f64,
    /// Total wall-clock seconds for the call
    #[serde(default)]
    pub total_time: f64,
    /// Completion tokens reported by the provider
    #[serde(default)]
    pub output_tokens: u64,
}

/// Trajectory data attached to heavy-mode executions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeavyModeData {
    /// Sampled candidate outputs; empty when the API does not expose them
    #[serde(default)]
    pub trajectories: Vec<String>,
    /// The hybridized answer the provider returned
    #[serde(default)]
    pub hybridized_output: String,
    /// Diversity of the trajectory set
    #[serde(default)]
    pub diversity_score: f64,
    /// Agreement classification of the trajectory set
    #[serde(default = "unknown_pattern")]
    pub convergence_pattern: ConvergencePattern,
}

fn unknown_pattern() -> ConvergencePattern {
    ConvergencePattern::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_first_dot_segment() {
        assert_eq!(category_of("reasoning.logic.001"), "reasoning");
        assert_eq!(category_of("coding.debug.001"), "coding");
    }

    #[test]
    fn category_without_dot_is_whole_id() {
        assert_eq!(category_of("smoke"), "smoke");
        assert_eq!(category_of(""), "");
    }

    #[test]
    fn sparse_record_deserializes_with_defaults() {
        // The pipeline must tolerate records with almost everything missing.
        let record: ExecutionRecord =
            serde_json::from_str(r#"{"model_id": "m1"}"#).unwrap();
        assert_eq!(record.model_id, "m1");
        assert_eq!(record.benchmark_id, "unknown");
        assert!(!record.metrics.correctness);
        assert_eq!(record.metrics.total_time, 0.0);
        assert!(record.heavy_mode_data.is_none());
    }

    #[test]
    fn heavy_mode_data_round_trips() {
        let data = HeavyModeData {
            trajectories: vec!["a".to_string(), "b".to_string()],
            hybridized_output: "ab".to_string(),
            diversity_score: 1.0,
            convergence_pattern: ConvergencePattern::Divergent,
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"divergent\""));

        let back: HeavyModeData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.convergence_pattern, ConvergencePattern::Divergent);
    }
}
