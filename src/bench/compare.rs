//! Model comparison: pairwise accuracy, heavy-vs-normal advantage, and
//! per-case head-to-head tallies

use super::metrics::ModelMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model id of the normal-mode configuration in the default A/B pair
pub const NORMAL_MODEL_ID: &str = "kimi_k2_normal";

/// Model id of the heavy-mode configuration in the default A/B pair
pub const HEAVY_MODEL_ID: &str = "kimi_k2_heavy";

/// Winner value used when both sides have equal accuracy
pub const TIE: &str = "tie";

/// Pairwise comparison of two models' accuracy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelComparison {
    /// First model of the pair
    pub model_a: String,
    /// Second model of the pair
    pub model_b: String,
    /// Accuracy of the first model
    pub accuracy_a: f64,
    /// Accuracy of the second model
    pub accuracy_b: f64,
    /// Model id with strictly greater accuracy, or `"tie"`
    pub accuracy_winner: String,
    /// Absolute accuracy difference
    pub accuracy_delta: f64,
}

/// Compare every pair of models in the metrics mapping.
///
/// Each unordered pair appears exactly once, keyed `"{A}_vs_{B}"` in
/// first-seen order of the two ids.
pub fn compare_models(
    metrics: &BTreeMap<String, ModelMetrics>,
) -> BTreeMap<String, ModelComparison> {
    let model_ids: Vec<&String> = metrics.keys().collect();
    let mut comparison = BTreeMap::new();

    for (i, model_a) in model_ids.iter().enumerate() {
        for model_b in &model_ids[i + 1..] {
            let accuracy_a = metrics[*model_a].accuracy;
            let accuracy_b = metrics[*model_b].accuracy;

            let accuracy_winner = if accuracy_a > accuracy_b {
                (*model_a).clone()
            } else if accuracy_b > accuracy_a {
                (*model_b).clone()
            } else {
                TIE.to_string()
            };

            comparison.insert(
                format!("{model_a}_vs_{model_b}"),
                ModelComparison {
                    model_a: (*model_a).clone(),
                    model_b: (*model_b).clone(),
                    accuracy_a,
                    accuracy_b,
                    accuracy_winner,
                    accuracy_delta: (accuracy_a - accuracy_b).abs(),
                },
            );
        }
    }

    comparison
}

/// Percentage advantage of the heavy configuration over the normal one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeavyModeAdvantage {
    /// Relative accuracy gain in percent; positive means heavy is more
    /// accurate
    pub accuracy_advantage: f64,
    /// Relative latency gain in percent; positive means heavy is faster
    pub latency_advantage: f64,
}

/// Compute the heavy-vs-normal advantage for a specific pair of model ids.
///
/// A missing key contributes all-zero metrics. A zero normal-side baseline
/// yields a `0` advantage rather than dividing by zero, which deliberately
/// reads as "no advantage". Both figures are rounded to 2 decimals.
pub fn heavy_mode_advantage(
    metrics: &BTreeMap<String, ModelMetrics>,
    normal_id: &str,
    heavy_id: &str,
) -> HeavyModeAdvantage {
    let zero = ModelMetrics::default();
    let normal = metrics.get(normal_id).unwrap_or(&zero);
    let heavy = metrics.get(heavy_id).unwrap_or(&zero);

    let accuracy_advantage = if normal.accuracy > 0.0 {
        (heavy.accuracy - normal.accuracy) / normal.accuracy * 100.0
    } else {
        0.0
    };

    let latency_advantage = if normal.mean_latency > 0.0 {
        (normal.mean_latency - heavy.mean_latency) / normal.mean_latency * 100.0
    } else {
        0.0
    };

    HeavyModeAdvantage {
        accuracy_advantage: round2(accuracy_advantage),
        latency_advantage: round2(latency_advantage),
    }
}

/// Heavy-vs-normal advantage over the default Kimi K2 pair
pub fn heavy_mode_advantage_default(
    metrics: &BTreeMap<String, ModelMetrics>,
) -> HeavyModeAdvantage {
    heavy_mode_advantage(metrics, NORMAL_MODEL_ID, HEAVY_MODEL_ID)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-case correctness of two models on the same case
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Whether model A answered correctly
    #[serde(default)]
    pub model_a_correct: bool,
    /// Whether model B answered correctly
    #[serde(default)]
    pub model_b_correct: bool,
}

/// Win/loss/tie tally from model A's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    /// Cases only model A solved
    pub wins: u32,
    /// Cases only model B solved
    pub losses: u32,
    /// Everything else: both solved or both failed
    pub ties: u32,
}

/// Tally which model uniquely solved each case.
///
/// Both-correct and both-incorrect cases land in the same `ties` bucket:
/// the metric measures unique solves, not agreement.
pub fn summarize_head_to_head(case_results: &[CaseOutcome]) -> HeadToHeadSummary {
    let mut summary = HeadToHeadSummary::default();

    for case in case_results {
        if case.model_a_correct && !case.model_b_correct {
            summary.wins += 1;
        } else if case.model_b_correct && !case.model_a_correct {
            summary.losses += 1;
        } else {
            summary.ties += 1;
        }
    }

    summary
}
