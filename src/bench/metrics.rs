//! Metrics aggregation over raw execution records
//!
//! A pure function of the full record list: every call recomputes from
//! scratch, holds no state, and is safe to run concurrently.

use super::record::ExecutionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated metrics for one model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Percentage of records with a correct answer, 0–100
    pub accuracy: f64,
    /// Mean of the measured per-case latencies, in seconds
    pub mean_latency: f64,
    /// Mean of the measured per-case throughputs, in tokens/second
    pub mean_tokens_per_second: f64,
    /// Accuracy broken down by benchmark category
    pub by_category: BTreeMap<String, CategoryMetrics>,
}

/// Category-local metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryMetrics {
    /// Percentage of the category's records with a correct answer
    pub accuracy: f64,
}

/// Compute aggregated metrics per model from raw results.
///
/// Records partition by `model_id`. Accuracy is the share of correct
/// records; latency and throughput means skip the `0`/"not measured"
/// values and fall back to `0` when nothing was measured. An empty input
/// yields an empty mapping.
pub fn compute_metrics(records: &[ExecutionRecord]) -> BTreeMap<String, ModelMetrics> {
    let mut by_model: BTreeMap<&str, Vec<&ExecutionRecord>> = BTreeMap::new();
    for record in records {
        by_model.entry(&record.model_id).or_default().push(record);
    }

    let mut metrics = BTreeMap::new();

    for (model_id, results) in by_model {
        let accuracy = accuracy_of(&results);

        let latencies: Vec<f64> = results
            .iter()
            .map(|r| r.metrics.total_time)
            .filter(|t| *t > 0.0)
            .collect();
        let mean_latency = mean(&latencies);

        let throughputs: Vec<f64> = results
            .iter()
            .map(|r| r.metrics.tokens_per_second)
            .filter(|tps| *tps > 0.0)
            .collect();
        let mean_tokens_per_second = mean(&throughputs);

        let mut by_category: BTreeMap<String, Vec<&ExecutionRecord>> = BTreeMap::new();
        for &record in &results {
            by_category
                .entry(record.category().to_string())
                .or_default()
                .push(record);
        }

        let by_category = by_category
            .into_iter()
            .map(|(category, cat_results)| {
                (
                    category,
                    CategoryMetrics {
                        accuracy: accuracy_of(&cat_results),
                    },
                )
            })
            .collect();

        metrics.insert(
            model_id.to_string(),
            ModelMetrics {
                accuracy,
                mean_latency,
                mean_tokens_per_second,
                by_category,
            },
        );
    }

    metrics
}

fn accuracy_of(records: &[&ExecutionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let correct = records.iter().filter(|r| r.metrics.correctness).count();
    correct as f64 / records.len() as f64 * 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::record::CaseMetrics;

    fn record(model_id: &str, benchmark_id: &str, metrics: CaseMetrics) -> ExecutionRecord {
        let mut record: ExecutionRecord = serde_json::from_str("{}").unwrap();
        record.model_id = model_id.to_string();
        record.benchmark_id = benchmark_id.to_string();
        record.metrics = metrics;
        record
    }

    fn correct(value: bool) -> CaseMetrics {
        CaseMetrics {
            correctness: value,
            ..CaseMetrics::default()
        }
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        assert!(compute_metrics(&[]).is_empty());
    }

    #[test]
    fn accuracy_is_percentage_of_correct() {
        let records = vec![
            record("m1", "test.001", correct(true)),
            record("m1", "test.002", correct(true)),
            record("m1", "test.003", correct(false)),
            record("m1", "test.004", correct(true)),
        ];
        let metrics = compute_metrics(&records);
        assert_eq!(metrics["m1"].accuracy, 75.0);
    }

    #[test]
    fn accuracy_hundred_iff_all_correct() {
        let all = vec![
            record("m1", "t.1", correct(true)),
            record("m1", "t.2", correct(true)),
        ];
        assert_eq!(compute_metrics(&all)["m1"].accuracy, 100.0);

        let not_all = vec![
            record("m1", "t.1", correct(true)),
            record("m1", "t.2", correct(false)),
        ];
        assert!(compute_metrics(&not_all)["m1"].accuracy < 100.0);
    }

    #[test]
    fn latency_mean_skips_unmeasured_zeros() {
        let records = vec![
            record(
                "m1",
                "t.1",
                CaseMetrics {
                    total_time: 2.0,
                    ..CaseMetrics::default()
                },
            ),
            record(
                "m1",
                "t.2",
                CaseMetrics {
                    total_time: 4.0,
                    ..CaseMetrics::default()
                },
            ),
            record(
                "m1",
                "t.3",
                CaseMetrics {
                    total_time: 3.0,
                    ..CaseMetrics::default()
                },
            ),
            // an error record with nothing measured must not drag the mean
            record("m1", "t.4", CaseMetrics::default()),
        ];
        let metrics = compute_metrics(&records);
        assert_eq!(metrics["m1"].mean_latency, 3.0);
    }

    #[test]
    fn throughput_mean_skips_unmeasured_zeros() {
        let records = vec![
            record(
                "m1",
                "t.1",
                CaseMetrics {
                    tokens_per_second: 50.0,
                    ..CaseMetrics::default()
                },
            ),
            record(
                "m1",
                "t.2",
                CaseMetrics {
                    tokens_per_second: 40.0,
                    ..CaseMetrics::default()
                },
            ),
            record("m1", "t.3", CaseMetrics::default()),
        ];
        let metrics = compute_metrics(&records);
        assert_eq!(metrics["m1"].mean_tokens_per_second, 45.0);
    }

    #[test]
    fn nothing_measured_means_zero() {
        let records = vec![record("m1", "t.1", CaseMetrics::default())];
        let metrics = compute_metrics(&records);
        assert_eq!(metrics["m1"].mean_latency, 0.0);
        assert_eq!(metrics["m1"].mean_tokens_per_second, 0.0);
    }

    #[test]
    fn records_group_by_model() {
        let records = vec![
            record("m1", "t.1", correct(true)),
            record("m2", "t.1", correct(false)),
        ];
        let metrics = compute_metrics(&records);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["m1"].accuracy, 100.0);
        assert_eq!(metrics["m2"].accuracy, 0.0);
    }

    #[test]
    fn categories_split_on_first_dot_segment() {
        let records = vec![
            record("m1", "reasoning.puzzle.001", correct(true)),
            record("m1", "reasoning.puzzle.002", correct(false)),
            record("m1", "coding.debug.001", correct(true)),
        ];
        let metrics = compute_metrics(&records);
        let by_category = &metrics["m1"].by_category;

        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["reasoning"].accuracy, 50.0);
        assert_eq!(by_category["coding"].accuracy, 100.0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let records = vec![
            record("m1", "reasoning.001", correct(true)),
            record("m1", "coding.001", correct(false)),
        ];
        let first = compute_metrics(&records);
        let second = compute_metrics(&records);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
