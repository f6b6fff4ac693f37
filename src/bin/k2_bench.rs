//! `k2-bench`: run the controlled benchmark across model configurations
//!
//! Executes the built-in case set against every configured model, prints a
//! comparison table and heavy-mode analysis, and writes the Markdown report
//! plus JSON/CSV exports.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use kimi_k2::bench::{
    client_for, compare_models, compute_metrics, controlled_cases, export_to_csv,
    export_to_json, generate_recommendations, heavy_mode_advantage_default,
    render_comparison_table, run_single_case, save_raw_result, write_markdown_report,
};
use kimi_k2::bench::compare::{HEAVY_MODEL_ID, NORMAL_MODEL_ID};
use kimi_k2::ModelRoster;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "k2-bench")]
#[command(about = "Run the controlled Kimi K2 benchmark", long_about = None)]
struct Cli {
    /// Comma-separated model ids to test; defaults to every roster entry
    #[arg(long)]
    models: Option<String>,

    /// YAML model roster; defaults to the built-in controlled roster
    #[arg(long)]
    models_file: Option<PathBuf>,

    /// Directory for raw results, reports, and exports
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    println!("=== Kimi K2 Controlled Benchmark ===");
    println!("Started: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let roster = match &cli.models_file {
        Some(path) => ModelRoster::load(path)
            .with_context(|| format!("could not load roster {}", path.display()))?,
        None => ModelRoster::builtin(),
    };

    let model_ids: Vec<String> = match &cli.models {
        Some(list) => list.split(',').map(|s| s.trim().to_string()).collect(),
        None => roster.models.keys().cloned().collect(),
    };

    let cases = controlled_cases();
    let raw_dir = cli.output_dir.join("raw");
    let mut all_results = Vec::new();

    for model_id in &model_ids {
        println!("\nTesting: {model_id}");
        println!("{}", "-".repeat(40));

        let entry = match roster.get(model_id) {
            Ok(entry) => entry,
            Err(e) => {
                eprintln!("  skipping: {e}");
                continue;
            }
        };
        let client = client_for(entry)
            .with_context(|| format!("could not build client for {model_id}"))?;
        let model = entry.model_config();

        for case in &cases {
            println!("  Case: {}", case.id);
            let record = run_single_case(client.as_ref(), model_id, &model, case).await;

            let status = if record.metrics.correctness { "✓" } else { "✗" };
            println!(
                "    {status} {:.2}s | {:.1} tok/s",
                record.metrics.total_time, record.metrics.tokens_per_second
            );

            if let Err(e) = save_raw_result(&record, &raw_dir) {
                eprintln!("    could not save raw result: {e}");
            }
            all_results.push(record);
        }
    }

    println!("\n=== Results Analysis ===");
    let metrics = compute_metrics(&all_results);
    println!("{}", render_comparison_table(&metrics));

    if metrics.contains_key(NORMAL_MODEL_ID) && metrics.contains_key(HEAVY_MODEL_ID) {
        let advantage = heavy_mode_advantage_default(&metrics);
        println!("Heavy Mode Analysis:");
        println!(
            "  Accuracy Advantage: {:+.2}%",
            advantage.accuracy_advantage
        );
        println!(
            "  Latency Advantage: {:+.2}% (negative = slower)",
            advantage.latency_advantage
        );
    }

    let comparison = compare_models(&metrics);
    if !comparison.is_empty() {
        println!("\nPairwise:");
        for (pair, result) in &comparison {
            println!(
                "  {pair}: winner {} (delta {:.2})",
                result.accuracy_winner, result.accuracy_delta
            );
        }
    }

    println!("\n=== Generating Reports ===");

    let metrics_path = cli
        .output_dir
        .join("analysis")
        .join("controlled_benchmark_metrics.json");
    export_to_json(&metrics, &metrics_path)?;
    println!("  Metrics: {}", metrics_path.display());

    let csv_path = cli.output_dir.join("analysis").join("metrics.csv");
    export_to_csv(&metrics, &csv_path)?;
    println!("  CSV: {}", csv_path.display());

    let report_path = cli
        .output_dir
        .join("visualizations")
        .join("controlled_benchmark_report.md");
    write_markdown_report(&metrics, &report_path)?;
    println!("  Report: {}", report_path.display());

    println!("\nRecommendations:");
    for recommendation in generate_recommendations(&metrics) {
        println!("  - {recommendation}");
    }

    println!("\nBenchmark Complete!");
    println!("Finished: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}
