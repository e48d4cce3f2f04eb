//! Core data models for kernel-eval
//!
//! Report types produced by the evaluation engine. The JSON shape of
//! [`EvaluationReport`] is the contract between `evaluate` and `tasks`.

use crate::rubric::{Category, Criticality};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Cue evidence for one component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceReport {
    /// Sum of every cue's occurrences over the corpus
    pub total_matches: u64,
    /// Distinct files containing at least one cue
    pub matched_files: usize,
    /// Occurrences per cue, in rubric order, zero counts included
    pub cue_matches: IndexMap<String, u64>,
}

/// Sub-scores and the weighted overall score, each in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    #[serde(rename = "evidence")]
    pub evidence_score: f64,
    #[serde(rename = "functions")]
    pub function_score: f64,
    #[serde(rename = "sloc")]
    pub sloc_score: f64,
    #[serde(rename = "overall")]
    pub overall_score: f64,
}

/// A raw count against its target
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub found: u64,
    pub target: u64,
    pub score: f64,
}

impl Measure {
    /// Shortfall against target, never negative
    pub fn gap(&self) -> u64 {
        self.target.saturating_sub(self.found)
    }

    /// "found/target"
    pub fn progress(&self) -> String {
        format!("{}/{}", self.found, self.target)
    }
}

/// Evaluation of one rubric component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResult {
    #[serde(default)]
    pub name: String,
    pub weight: f64,
    pub criticality: Criticality,
    pub evidence: EvidenceReport,
    pub functions: Measure,
    pub sloc: Measure,
    pub scores: ComponentScore,
}

/// Category and overall scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub kernel_primitives_score: f64,
    pub os_services_score: f64,
    pub overall_score: f64,
    pub total_files_scanned: usize,
}

/// Complete result of one evaluation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub kernel_primitives: IndexMap<String, ComponentResult>,
    pub os_services: IndexMap<String, ComponentResult>,
    pub summary: EvaluationSummary,
}

impl EvaluationReport {
    pub fn components(&self, category: Category) -> &IndexMap<String, ComponentResult> {
        match category {
            Category::KernelPrimitive => &self.kernel_primitives,
            Category::OsService => &self.os_services,
        }
    }

    pub fn category_score(&self, category: Category) -> f64 {
        match category {
            Category::KernelPrimitive => self.summary.kernel_primitives_score,
            Category::OsService => self.summary.os_services_score,
        }
    }

    /// Parse a report previously written by `evaluate`
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let mut report: EvaluationReport = serde_json::from_str(content)?;
        for components in [&mut report.kernel_primitives, &mut report.os_services] {
            for (name, result) in components.iter_mut() {
                if result.name.is_empty() {
                    result.name = name.clone();
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_gap_never_negative() {
        let over = Measure {
            found: 12,
            target: 10,
            score: 100.0,
        };
        assert_eq!(over.gap(), 0);
        assert_eq!(over.progress(), "12/10");

        let under = Measure {
            found: 3,
            target: 10,
            score: 30.0,
        };
        assert_eq!(under.gap(), 7);
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = EvaluationReport::default();
        report.kernel_primitives.insert(
            "scheduler".into(),
            ComponentResult {
                name: "scheduler".into(),
                weight: 10.0,
                criticality: Criticality::High,
                evidence: EvidenceReport::default(),
                functions: Measure::default(),
                sloc: Measure::default(),
                scores: ComponentScore {
                    evidence_score: 40.0,
                    function_score: 20.0,
                    sloc_score: 10.0,
                    overall_score: 25.0,
                },
            },
        );
        report.summary.total_files_scanned = 3;

        let value = serde_json::to_value(&report).expect("serialize");
        let scheduler = &value["kernel_primitives"]["scheduler"];
        assert_eq!(scheduler["scores"]["overall"], 25.0);
        assert_eq!(scheduler["scores"]["functions"], 20.0);
        assert_eq!(scheduler["criticality"], "high");
        assert_eq!(value["summary"]["total_files_scanned"], 3);
        assert!(value["os_services"].as_object().expect("object").is_empty());
    }

    #[test]
    fn test_from_json_fills_missing_names() {
        let json = r#"{
            "kernel_primitives": {
                "timers": {
                    "weight": 5, "criticality": "medium",
                    "evidence": {"total_matches": 0, "matched_files": 0, "cue_matches": {"timer": 0}},
                    "functions": {"found": 0, "target": 4, "score": 0.0},
                    "sloc": {"found": 0, "target": 100, "score": 0.0},
                    "scores": {"evidence": 0.0, "functions": 0.0, "sloc": 0.0, "overall": 0.0}
                }
            },
            "os_services": {},
            "summary": {"kernel_primitives_score": 0.0, "os_services_score": 0.0,
                        "overall_score": 0.0, "total_files_scanned": 0}
        }"#;
        let report = EvaluationReport::from_json(json).expect("parse");
        assert_eq!(report.kernel_primitives["timers"].name, "timers");
        assert_eq!(report.kernel_primitives["timers"].functions.gap(), 4);
    }
}
