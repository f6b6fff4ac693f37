//! Report rendering and metric exports
//!
//! Pure formatting over the metrics mapping: a Markdown comparison table,
//! a full Markdown report, rule-based recommendations, and JSON/CSV exports.

use super::compare::{heavy_mode_advantage_default, HEAVY_MODEL_ID, NORMAL_MODEL_ID};
use super::metrics::ModelMetrics;
use crate::error::Result;
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Render the per-model comparison table as Markdown.
///
/// One row per model, sorted by model id.
pub fn render_comparison_table(metrics: &BTreeMap<String, ModelMetrics>) -> String {
    let mut table = String::from("| Model | Accuracy (%) | Mean Latency (s) | Tokens/s |\n");
    table.push_str("|-------|--------------|------------------|----------|\n");

    for (model_id, model_metrics) in metrics {
        let _ = writeln!(
            table,
            "| {model_id} | {:.2} | {:.3} | {:.1} |",
            model_metrics.accuracy,
            model_metrics.mean_latency,
            model_metrics.mean_tokens_per_second,
        );
    }

    table
}

/// Render the per-category accuracy table as Markdown
pub fn render_category_table(metrics: &BTreeMap<String, ModelMetrics>) -> String {
    let mut table = String::from("| Model | Category | Accuracy (%) |\n");
    table.push_str("|-------|----------|--------------|\n");

    for (model_id, model_metrics) in metrics {
        for (category, category_metrics) in &model_metrics.by_category {
            let _ = writeln!(
                table,
                "| {model_id} | {category} | {:.2} |",
                category_metrics.accuracy
            );
        }
    }

    table
}

/// Derive practical recommendations from the metrics
pub fn generate_recommendations(metrics: &BTreeMap<String, ModelMetrics>) -> Vec<String> {
    if metrics.is_empty() {
        return vec!["No results to analyze.".to_string()];
    }

    let mut recommendations = Vec::new();

    let normal = metrics.get(NORMAL_MODEL_ID);
    let heavy = metrics.get(HEAVY_MODEL_ID);
    if let (Some(normal), Some(heavy)) = (normal, heavy) {
        let advantage = heavy_mode_advantage_default(metrics);
        if heavy.accuracy > normal.accuracy {
            recommendations.push(format!(
                "Use {HEAVY_MODEL_ID} for accuracy-critical work: {:+.2}% relative \
                 accuracy over normal mode.",
                advantage.accuracy_advantage
            ));
        } else {
            recommendations.push(format!(
                "Heavy mode shows no accuracy gain here; prefer {NORMAL_MODEL_ID} and \
                 save the extra cost."
            ));
        }
        if advantage.latency_advantage < 0.0 {
            recommendations.push(format!(
                "Heavy mode is {:.2}% slower; prefer {NORMAL_MODEL_ID} when latency \
                 matters.",
                -advantage.latency_advantage
            ));
        }
    }

    if let Some((best_id, best)) = metrics
        .iter()
        .max_by(|a, b| a.1.accuracy.total_cmp(&b.1.accuracy))
    {
        recommendations.push(format!(
            "Highest overall accuracy: {best_id} ({:.2}%).",
            best.accuracy
        ));
    }

    // Per-category winners
    let mut categories: BTreeMap<&str, (&str, f64)> = BTreeMap::new();
    for (model_id, model_metrics) in metrics {
        for (category, category_metrics) in &model_metrics.by_category {
            let entry = categories
                .entry(category.as_str())
                .or_insert((model_id.as_str(), category_metrics.accuracy));
            if category_metrics.accuracy > entry.1 {
                *entry = (model_id.as_str(), category_metrics.accuracy);
            }
        }
    }
    for (category, (model_id, accuracy)) in categories {
        recommendations.push(format!(
            "Best for {category}: {model_id} ({accuracy:.2}%)."
        ));
    }

    recommendations
}

/// Render the full Markdown report
pub fn markdown_report(metrics: &BTreeMap<String, ModelMetrics>) -> String {
    let mut report = String::from("# Kimi K2 Benchmark Report\n\n");
    let _ = writeln!(
        report,
        "Generated: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );

    report.push_str("## Executive Summary\n\n");
    let category_count: std::collections::BTreeSet<&str> = metrics
        .values()
        .flat_map(|m| m.by_category.keys().map(String::as_str))
        .collect();
    let _ = writeln!(
        report,
        "{} model configurations evaluated across {} benchmark categories.",
        metrics.len(),
        category_count.len()
    );
    if let Some((best_id, best)) = metrics
        .iter()
        .max_by(|a, b| a.1.accuracy.total_cmp(&b.1.accuracy))
    {
        let _ = writeln!(
            report,
            "{best_id} leads on overall accuracy at {:.2}%.",
            best.accuracy
        );
    }
    report.push('\n');

    report.push_str("## Model Comparison\n\n");
    report.push_str(&render_comparison_table(metrics));
    report.push('\n');

    report.push_str("## Accuracy by Category\n\n");
    report.push_str(&render_category_table(metrics));
    report.push('\n');

    report.push_str("## Heavy Mode Analysis\n\n");
    if metrics.contains_key(NORMAL_MODEL_ID) && metrics.contains_key(HEAVY_MODEL_ID) {
        let advantage = heavy_mode_advantage_default(metrics);
        let _ = writeln!(
            report,
            "Accuracy advantage: {:+.2}%",
            advantage.accuracy_advantage
        );
        let _ = writeln!(
            report,
            "Latency advantage: {:+.2}% (negative means heavy mode is slower)",
            advantage.latency_advantage
        );
    } else {
        report.push_str("Heavy and normal configurations were not both evaluated.\n");
    }
    report.push('\n');

    report.push_str("## Recommendations\n\n");
    for recommendation in generate_recommendations(metrics) {
        let _ = writeln!(report, "- {recommendation}");
    }

    report
}

/// Write the Markdown report to a file, creating parent directories
pub fn write_markdown_report(
    metrics: &BTreeMap<String, ModelMetrics>,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, markdown_report(metrics))?;
    Ok(())
}

/// Export the metrics mapping verbatim as pretty-printed JSON
pub fn export_to_json(metrics: &BTreeMap<String, ModelMetrics>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(metrics)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export one CSV row per model
pub fn export_to_csv(metrics: &BTreeMap<String, ModelMetrics>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut csv = String::from("model,accuracy,mean_latency,mean_tokens_per_second\n");
    for (model_id, model_metrics) in metrics {
        let _ = writeln!(
            csv,
            "{model_id},{:.2},{:.3},{:.1}",
            model_metrics.accuracy,
            model_metrics.mean_latency,
            model_metrics.mean_tokens_per_second,
        );
    }
    std::fs::write(path, csv)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::metrics::CategoryMetrics;

    fn sample_metrics() -> BTreeMap<String, ModelMetrics> {
        let mut by_category = BTreeMap::new();
        by_category.insert(
            "reasoning".to_string(),
            CategoryMetrics { accuracy: 80.0 },
        );
        by_category.insert("coding".to_string(), CategoryMetrics { accuracy: 70.0 });

        let mut metrics = BTreeMap::new();
        metrics.insert(
            "kimi_k2_normal".to_string(),
            ModelMetrics {
                accuracy: 75.0,
                mean_latency: 3.0,
                mean_tokens_per_second: 45.0,
                by_category: by_category.clone(),
            },
        );
        metrics.insert(
            "kimi_k2_heavy".to_string(),
            ModelMetrics {
                accuracy: 85.0,
                mean_latency: 4.5,
                mean_tokens_per_second: 40.0,
                by_category,
            },
        );
        metrics.insert(
            "qwen3_coder_30b".to_string(),
            ModelMetrics {
                accuracy: 70.0,
                mean_latency: 2.5,
                mean_tokens_per_second: 55.0,
                ..ModelMetrics::default()
            },
        );
        metrics
    }

    #[test]
    fn comparison_table_has_row_per_model_with_fixed_decimals() {
        let table = render_comparison_table(&sample_metrics());
        assert!(table.contains("| kimi_k2_normal | 75.00 | 3.000 | 45.0 |"));
        assert!(table.contains("| kimi_k2_heavy | 85.00 | 4.500 | 40.0 |"));
        assert!(table.contains("| qwen3_coder_30b | 70.00 | 2.500 | 55.0 |"));
    }

    #[test]
    fn report_has_all_sections() {
        let report = markdown_report(&sample_metrics());
        assert!(report.starts_with("# "));
        assert!(report.to_lowercase().contains("summary"));
        assert!(report.contains('|'));
        assert!(report.to_lowercase().contains("heavy"));
        assert!(report.to_lowercase().contains("recommend"));
        assert!(report.contains("kimi_k2"));
    }

    #[test]
    fn report_quantifies_heavy_mode_advantage() {
        let report = markdown_report(&sample_metrics());
        // (85 - 75) / 75 * 100 = 13.33
        assert!(report.contains("+13.33%"));
    }

    #[test]
    fn recommendations_favor_heavy_when_more_accurate() {
        let recommendations = generate_recommendations(&sample_metrics());
        assert!(recommendations
            .iter()
            .any(|r| r.contains("kimi_k2_heavy") && r.contains("accuracy-critical")));
        assert!(recommendations.iter().any(|r| r.contains("slower")));
        assert!(recommendations
            .iter()
            .any(|r| r.contains("Best for reasoning")));
        assert!(!recommendations.is_empty());
    }

    #[test]
    fn empty_metrics_get_a_placeholder_recommendation() {
        let recommendations = generate_recommendations(&BTreeMap::new());
        assert_eq!(recommendations.len(), 1);
    }

    #[test]
    fn json_export_round_trips_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis").join("metrics.json");
        let metrics = sample_metrics();

        export_to_json(&metrics, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded, serde_json::to_value(&metrics).unwrap());
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");

        export_to_csv(&sample_metrics(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("model,accuracy,"));
        assert!(text.contains("kimi_k2_normal,75.00,3.000,45.0"));
    }

    #[test]
    fn report_file_lands_in_created_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visualizations").join("report.md");

        write_markdown_report(&sample_metrics(), &path).unwrap();
        assert!(path.exists());
    }
}
