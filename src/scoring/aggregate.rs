//! Rubric-wide aggregation
//!
//! Scores every component of both categories, then reduces them to weighted
//! category scores and an unweighted final mean of the two categories.

use super::component::evaluate_component;
use crate::corpus::SourceCorpus;
use crate::evidence::CueSet;
use crate::models::{ComponentResult, EvaluationReport, EvaluationSummary};
use crate::rubric::{Category, Rubric, RubricResult};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{info, warn};

/// Weighted mean of `(weight, score)` pairs; 0 when the weights sum to 0
///
/// Weights are scaled by the largest one first, so very large finite weights
/// cannot overflow the sums.
pub fn weighted_category_score<I>(scores: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let scores: Vec<(f64, f64)> = scores.into_iter().collect();
    let max_weight = scores.iter().map(|&(weight, _)| weight).fold(0.0, f64::max);
    if max_weight <= 0.0 || !max_weight.is_finite() {
        return 0.0;
    }

    let (weighted, total_weight) = scores
        .iter()
        .fold((0.0, 0.0), |(weighted, total), &(weight, score)| {
            let scaled = weight / max_weight;
            (weighted + score * scaled, total + scaled)
        });

    if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    }
}

/// Evaluates corpora against one rubric
///
/// Cue patterns are compiled once at construction, so a single evaluator can
/// score several corpora.
pub struct Evaluator<'a> {
    rubric: &'a Rubric,
    kernel_cues: Vec<CueSet>,
    os_cues: Vec<CueSet>,
}

impl<'a> Evaluator<'a> {
    pub fn new(rubric: &'a Rubric) -> RubricResult<Self> {
        Ok(Self {
            rubric,
            kernel_cues: compile(rubric, Category::KernelPrimitive)?,
            os_cues: compile(rubric, Category::OsService)?,
        })
    }

    fn cues(&self, category: Category) -> &[CueSet] {
        match category {
            Category::KernelPrimitive => &self.kernel_cues,
            Category::OsService => &self.os_cues,
        }
    }

    /// Score a corpus against the full rubric
    pub fn evaluate(&self, corpus: &SourceCorpus) -> EvaluationReport {
        if corpus.is_empty() {
            warn!("No source files found; every component will score zero evidence");
        }

        let (kernel_primitives, kernel_score) =
            self.evaluate_category(Category::KernelPrimitive, corpus);
        let (os_services, os_score) = self.evaluate_category(Category::OsService, corpus);

        let summary = EvaluationSummary {
            kernel_primitives_score: kernel_score,
            os_services_score: os_score,
            overall_score: (kernel_score + os_score) / 2.0,
            total_files_scanned: corpus.len(),
        };
        info!(
            "Overall score {:.1} (kernel {:.1}, OS services {:.1}) over {} files",
            summary.overall_score, kernel_score, os_score, summary.total_files_scanned
        );

        EvaluationReport {
            kernel_primitives,
            os_services,
            summary,
        }
    }

    fn evaluate_category(
        &self,
        category: Category,
        corpus: &SourceCorpus,
    ) -> (IndexMap<String, ComponentResult>, f64) {
        let components = self.rubric.components(category);

        // Order-preserving collect: every component finishes before the reduction
        let work: Vec<_> = components.iter().zip(self.cues(category)).collect();
        let results: Vec<ComponentResult> = work
            .par_iter()
            .map(|((name, component), cues)| evaluate_component(name, component, cues, corpus))
            .collect();

        let score = weighted_category_score(
            results.iter().map(|r| (r.weight, r.scores.overall_score)),
        );
        for result in &results {
            info!("  {}: {:.1}%", result.name, result.scores.overall_score);
        }
        info!("{} score: {:.1}", category.label(), score);

        let results = results.into_iter().map(|r| (r.name.clone(), r)).collect();
        (results, score)
    }
}

fn compile(rubric: &Rubric, category: Category) -> RubricResult<Vec<CueSet>> {
    rubric
        .components(category)
        .iter()
        .map(|(name, component)| CueSet::new(name, &component.evidence_cues))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::tests::component;

    fn rubric() -> Rubric {
        let mut rubric = Rubric::default();

        let mut locking = component(&["mutex"], 10, 200);
        locking.weight = 3.0;
        rubric.kernel_primitives.insert("locking".into(), locking);

        let mut timers = component(&["timer"], 4, 40);
        timers.weight = 1.0;
        rubric.kernel_primitives.insert("timers".into(), timers);

        rubric
            .os_platform_services
            .insert("filesystem".into(), component(&["vfs"], 5, 50));
        rubric
    }

    #[test]
    fn test_weighted_mean() {
        let score = weighted_category_score([(3.0, 80.0), (1.0, 40.0)]);
        assert!((score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_weight_scores_zero() {
        assert_eq!(weighted_category_score([(0.0, 90.0), (0.0, 50.0)]), 0.0);
        assert_eq!(weighted_category_score(Vec::<(f64, f64)>::new()), 0.0);
    }

    #[test]
    fn test_huge_weights_stay_in_range() {
        let score = weighted_category_score([(1e308, 90.0), (1e308, 30.0)]);
        assert!((score - 60.0).abs() < 1e-9);

        let mut rubric = Rubric::default();
        for (name, cue) in [("locking", "mutex"), ("timers", "timer")] {
            let mut c = component(&[cue], 1, 1);
            c.weight = 1e308;
            rubric.kernel_primitives.insert(name.into(), c);
        }
        rubric.validate().expect("finite weights are valid");

        let corpus: SourceCorpus = [("/k/a.c", "mutex mutex mutex")].into_iter().collect();
        let report = Evaluator::new(&rubric).expect("evaluator").evaluate(&corpus);
        for score in [
            report.summary.kernel_primitives_score,
            report.summary.overall_score,
        ] {
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
        let locking = report.kernel_primitives["locking"].scores.overall_score;
        assert!((report.summary.kernel_primitives_score - locking / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_report_structure() {
        let rubric = rubric();
        let corpus: SourceCorpus = [(
            "/k/lock.c",
            "mutex mutex mutex mutex mutex\nvoid mutex_lock(int m) {\n}\n",
        )]
        .into_iter()
        .collect();

        let report = Evaluator::new(&rubric).expect("evaluator").evaluate(&corpus);

        let names: Vec<&str> = report.kernel_primitives.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["locking", "timers"]);
        assert_eq!(report.summary.total_files_scanned, 1);

        let locking = &report.kernel_primitives["locking"];
        assert_eq!(locking.evidence.total_matches, 5);
        assert!(locking.scores.overall_score > 0.0);
        assert_eq!(report.kernel_primitives["timers"].scores.overall_score, 0.0);
        assert_eq!(report.summary.os_services_score, 0.0);

        let expected_kernel = locking.scores.overall_score * 3.0 / 4.0;
        assert!((report.summary.kernel_primitives_score - expected_kernel).abs() < 1e-9);
        assert!(
            (report.summary.overall_score - report.summary.kernel_primitives_score / 2.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_empty_corpus_scores_zero() {
        let rubric = rubric();
        let report = Evaluator::new(&rubric)
            .expect("evaluator")
            .evaluate(&SourceCorpus::new());
        assert_eq!(report.summary, EvaluationSummary::default());
        assert_eq!(report.os_services["filesystem"].evidence.cue_matches["vfs"], 0);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let rubric = rubric();
        let corpus: SourceCorpus = [
            ("/k/a.c", "timer mutex\nint tick(int t) {\n}\n"),
            ("/k/b.c", "vfs vfs\nint open(int fd) {\n}\n"),
        ]
        .into_iter()
        .collect();
        let evaluator = Evaluator::new(&rubric).expect("evaluator");

        let first = serde_json::to_string(&evaluator.evaluate(&corpus)).expect("json");
        let second = serde_json::to_string(&evaluator.evaluate(&corpus)).expect("json");
        assert_eq!(first, second);
    }
}
