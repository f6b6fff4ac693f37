//! Benchmark harness: case execution, metrics aggregation, model
//! comparison, heavy-mode trajectory analysis, and reporting
//!
//! The analysis layers are pure functions over in-memory record lists: no
//! I/O, no shared state, recomputed from scratch on every call. Only the
//! execution (`suite`) and reporting (`report`) edges touch the network and
//! the filesystem.

pub mod compare;
pub mod heavy;
pub mod metrics;
pub mod record;
pub mod report;
pub mod suite;

pub use compare::{
    compare_models, heavy_mode_advantage, heavy_mode_advantage_default, summarize_head_to_head,
    CaseOutcome, HeadToHeadSummary, HeavyModeAdvantage, ModelComparison,
};
pub use heavy::{
    convergence_pattern, hybridization_quality, trajectory_diversity, ConvergencePattern,
};
pub use metrics::{compute_metrics, CategoryMetrics, ModelMetrics};
pub use record::{category_of, CaseMetrics, ExecutionRecord, HeavyModeData};
pub use report::{
    export_to_csv, export_to_json, generate_recommendations, markdown_report,
    render_comparison_table, write_markdown_report,
};
pub use suite::{client_for, controlled_cases, run_single_case, save_raw_result, BenchmarkCase};
