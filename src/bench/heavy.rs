//! Heavy-mode trajectory analysis: diversity, convergence, hybridization
//! quality
//!
//! All three measures are deliberately syntactic. Diversity is a uniqueness
//! ratio over exact string equality and correctness checks are substring
//! containment; two paraphrased trajectories count as diverse even when they
//! agree semantically. Downstream reports assume these exact definitions.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Qualitative label for how much a trajectory set agrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergencePattern {
    /// Every trajectory produced the same answer
    Unanimous,
    /// More than half produced the same answer
    Majority,
    /// No majority, but at least one answer repeats
    Split,
    /// Every trajectory is distinct
    Divergent,
    /// No trajectories to classify
    Unknown,
}

impl fmt::Display for ConvergencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConvergencePattern::Unanimous => "unanimous",
            ConvergencePattern::Majority => "majority",
            ConvergencePattern::Split => "split",
            ConvergencePattern::Divergent => "divergent",
            ConvergencePattern::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Diversity of a trajectory set: `distinct / total`, rounded to 4 decimals.
///
/// All-identical trajectories score `1/total`; all-distinct score `1.0`.
/// An empty set scores `0.0`.
pub fn trajectory_diversity(trajectories: &[String]) -> f64 {
    if trajectories.is_empty() {
        return 0.0;
    }

    let unique: HashSet<&str> = trajectories.iter().map(String::as_str).collect();
    let diversity = unique.len() as f64 / trajectories.len() as f64;
    (diversity * 10_000.0).round() / 10_000.0
}

/// Classify the agreement pattern of a trajectory set.
///
/// Decision table over the most frequent answer's count `m` of `n` total,
/// evaluated in priority order: empty input is `Unknown`, `m == n` is
/// `Unanimous`, `m > n/2` is `Majority`, `m >= 2` is `Split`, and all
/// distinct answers is `Divergent`.
pub fn convergence_pattern(trajectories: &[String]) -> ConvergencePattern {
    if trajectories.is_empty() {
        return ConvergencePattern::Unknown;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for trajectory in trajectories {
        *counts.entry(trajectory.as_str()).or_default() += 1;
    }

    let total = trajectories.len();
    let most_common = counts.values().copied().max().unwrap_or(0);

    if most_common == total {
        ConvergencePattern::Unanimous
    } else if most_common as f64 > total as f64 / 2.0 {
        ConvergencePattern::Majority
    } else if most_common >= 2 {
        ConvergencePattern::Split
    } else {
        ConvergencePattern::Divergent
    }
}

/// Score how well hybridization worked, in `[0, 1]`.
///
/// Correctness is case-insensitive substring containment of the ground
/// truth. The bands are a fixed rubric downstream reports depend on:
/// hybridized correct with no individually-correct trajectory scores `1.0`
/// (hybridization found what no trajectory had), correct alongside correct
/// trajectories `0.8`, incorrect despite correct trajectories `0.3`, and
/// everything wrong `0.1`. Without a ground truth the quality cannot be
/// assessed and the neutral `0.5` sentinel is returned.
pub fn hybridization_quality(
    trajectories: &[String],
    hybridized: &str,
    ground_truth: &str,
) -> f64 {
    if ground_truth.is_empty() {
        return 0.5;
    }

    let truth = ground_truth.to_lowercase();
    let hybridized_correct = hybridized.to_lowercase().contains(&truth);
    let correct_trajectories = trajectories
        .iter()
        .filter(|t| t.to_lowercase().contains(&truth))
        .count();

    match (hybridized_correct, correct_trajectories) {
        (true, 0) => 1.0,
        (true, _) => 0.8,
        (false, n) if n > 0 => 0.3,
        (false, _) => 0.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diversity_is_unique_over_total() {
        let trajectories = strings(&["A", "B", "A", "C", "A", "B", "D", "A"]);
        assert_eq!(trajectory_diversity(&trajectories), 0.5);
    }

    #[test]
    fn diversity_bounds() {
        assert_eq!(trajectory_diversity(&[]), 0.0);
        assert_eq!(trajectory_diversity(&strings(&["same"; 8])), 0.125);
        assert_eq!(
            trajectory_diversity(&strings(&["a", "b", "c", "d"])),
            1.0
        );
    }

    #[test]
    fn diversity_rounds_to_four_decimals() {
        // 2 distinct of 3 total = 0.6666...
        let trajectories = strings(&["a", "b", "a"]);
        assert_eq!(trajectory_diversity(&trajectories), 0.6667);
    }

    #[test]
    fn convergence_unanimous() {
        assert_eq!(
            convergence_pattern(&strings(&["42"; 8])),
            ConvergencePattern::Unanimous
        );
    }

    #[test]
    fn convergence_majority() {
        let trajectories = strings(&["42", "42", "42", "42", "42", "43", "43", "43"]);
        assert_eq!(
            convergence_pattern(&trajectories),
            ConvergencePattern::Majority
        );
    }

    #[test]
    fn convergence_split() {
        let trajectories = strings(&["42", "43", "44", "42", "43", "44", "45", "46"]);
        assert_eq!(convergence_pattern(&trajectories), ConvergencePattern::Split);
    }

    #[test]
    fn convergence_divergent() {
        let trajectories = strings(&["1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(
            convergence_pattern(&trajectories),
            ConvergencePattern::Divergent
        );
    }

    #[test]
    fn convergence_empty_is_unknown() {
        assert_eq!(convergence_pattern(&[]), ConvergencePattern::Unknown);
    }

    #[test]
    fn majority_requires_strictly_more_than_half() {
        // Exactly half is not a majority
        let trajectories = strings(&["42", "42", "43", "44"]);
        assert_eq!(convergence_pattern(&trajectories), ConvergencePattern::Split);
    }

    #[test]
    fn hybridization_rubric_bands() {
        let wrong = strings(&["nope", "nada"]);
        let right = strings(&["the answer is 42", "nope"]);

        assert_eq!(hybridization_quality(&wrong, "it is 42", "42"), 1.0);
        assert_eq!(hybridization_quality(&right, "it is 42", "42"), 0.8);
        assert_eq!(hybridization_quality(&right, "no idea", "42"), 0.3);
        assert_eq!(hybridization_quality(&wrong, "no idea", "42"), 0.1);
    }

    #[test]
    fn hybridization_without_ground_truth_is_neutral() {
        assert_eq!(hybridization_quality(&[], "anything", ""), 0.5);
    }

    #[test]
    fn hybridization_matching_ignores_case() {
        let trajectories = strings(&["The Answer"]);
        assert_eq!(
            hybridization_quality(&trajectories, "THE ANSWER indeed", "the answer"),
            0.8
        );
    }
}
