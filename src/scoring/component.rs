//! Per-component scorer
//!
//! Combines evidence tallies and lexical metrics for one rubric component
//! into three clamped sub-scores and their weighted overall score.

use crate::corpus::SourceCorpus;
use crate::evidence::{find_evidence, CueSet};
use crate::metrics::FileMetrics;
use crate::models::{ComponentResult, ComponentScore, EvidenceReport, Measure};
use crate::rubric::RubricComponent;
use rayon::prelude::*;
use tracing::debug;

/// Upper bound of every score
pub const MAX_SCORE: f64 = 100.0;
/// Total cue hits that earn full evidence credit
pub const EVIDENCE_FULL_CREDIT_MATCHES: f64 = 10.0;

pub const EVIDENCE_WEIGHT: f64 = 0.4;
pub const FUNCTION_WEIGHT: f64 = 0.3;
pub const SLOC_WEIGHT: f64 = 0.3;

/// found/target as a percentage, hard-clamped at 100; 0 when there is no target
fn ratio_score(found: u64, target: u64) -> f64 {
    if target == 0 {
        return 0.0;
    }
    ((found as f64 / target as f64) * 100.0).min(MAX_SCORE)
}

/// Score one component from its evidence and counts
pub fn score_component(
    evidence: &EvidenceReport,
    functions_found: u64,
    sloc_found: u64,
    component: &RubricComponent,
) -> ComponentScore {
    let evidence_score =
        ((evidence.total_matches as f64 / EVIDENCE_FULL_CREDIT_MATCHES) * 100.0).min(MAX_SCORE);
    let function_score = ratio_score(functions_found, component.target_functions);
    let sloc_score = ratio_score(sloc_found, component.target_sloc);

    ComponentScore {
        evidence_score,
        function_score,
        sloc_score,
        overall_score: evidence_score * EVIDENCE_WEIGHT
            + function_score * FUNCTION_WEIGHT
            + sloc_score * SLOC_WEIGHT,
    }
}

/// Gather evidence and metrics for one component and score it
pub fn evaluate_component(
    name: &str,
    component: &RubricComponent,
    cues: &CueSet,
    corpus: &SourceCorpus,
) -> ComponentResult {
    let scan = find_evidence(corpus, cues);

    let counts: FileMetrics = scan
        .matched_paths
        .par_iter()
        .filter_map(|path| corpus.get(path))
        .map(|file| file.metrics())
        .sum();

    let scores = score_component(&scan.report, counts.functions, counts.sloc, component);
    debug!(
        "{}: {} matches in {} files, {} functions, {} SLOC -> {:.1}",
        name,
        scan.report.total_matches,
        scan.report.matched_files,
        counts.functions,
        counts.sloc,
        scores.overall_score
    );

    ComponentResult {
        name: name.to_string(),
        weight: component.weight,
        criticality: component.criticality.clone(),
        evidence: scan.report,
        functions: Measure {
            found: counts.functions,
            target: component.target_functions,
            score: scores.function_score,
        },
        sloc: Measure {
            found: counts.sloc,
            target: component.target_sloc,
            score: scores.sloc_score,
        },
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::tests::component;

    fn evidence(total_matches: u64) -> EvidenceReport {
        EvidenceReport {
            total_matches,
            ..Default::default()
        }
    }

    #[test]
    fn test_partial_credit_scenario() {
        let locking = component(&["mutex"], 10, 200);
        let score = score_component(&evidence(12), 5, 100, &locking);
        assert_eq!(score.evidence_score, 100.0);
        assert_eq!(score.function_score, 50.0);
        assert_eq!(score.sloc_score, 50.0);
        assert_eq!(score.overall_score, 70.0);
    }

    #[test]
    fn test_nothing_found_scores_zero() {
        let score = score_component(&evidence(0), 0, 0, &component(&["vfs"], 25, 1500));
        assert_eq!(score, ComponentScore::default());
    }

    #[test]
    fn test_zero_targets_score_zero() {
        let score = score_component(&evidence(3), 40, 900, &component(&["irq"], 0, 0));
        assert_eq!(score.function_score, 0.0);
        assert_eq!(score.sloc_score, 0.0);
        assert!((score.evidence_score - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_overachievement_is_clamped() {
        let score = score_component(&evidence(1_000), 500, 100_000, &component(&["x"], 1, 1));
        assert_eq!(score.evidence_score, MAX_SCORE);
        assert_eq!(score.function_score, MAX_SCORE);
        assert_eq!(score.sloc_score, MAX_SCORE);
        assert!(score.overall_score <= MAX_SCORE);
    }

    #[test]
    fn test_overall_is_exact_weighted_sum() {
        for (matches, functions, sloc) in [(1, 1, 7), (7, 3, 333), (9, 11, 1)] {
            let s = score_component(&evidence(matches), functions, sloc, &component(&["x"], 13, 700));
            assert_eq!(
                s.overall_score,
                0.4 * s.evidence_score + 0.3 * s.function_score + 0.3 * s.sloc_score
            );
            for v in [s.evidence_score, s.function_score, s.sloc_score, s.overall_score] {
                assert!((0.0..=100.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_metrics_only_from_matching_files() {
        let corpus: SourceCorpus = [
            ("/k/lock.c", "// mutex support\nvoid mutex_lock(int m) {\n}\n"),
            ("/k/other.c", "void unrelated(void) {\n}\nint a;\n"),
        ]
        .into_iter()
        .collect();
        let locking = component(&["mutex"], 4, 10);
        let cues = CueSet::new("locking", &locking.evidence_cues).expect("cues");

        let result = evaluate_component("locking", &locking, &cues, &corpus);
        assert_eq!(result.evidence.total_matches, 1);
        assert_eq!(result.functions.found, 1);
        assert_eq!(result.sloc.found, 2);
        assert_eq!(result.functions.score, 25.0);
        assert_eq!(result.sloc.score, 20.0);
        assert_eq!(result.name, "locking");
    }
}
