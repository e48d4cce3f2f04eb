//! Task construction and manifest batching

use crate::models::ComponentResult;
use crate::rubric::Criticality;
use serde::{Deserialize, Serialize};

/// Smallest batch of manifest functions per task
const MIN_BATCH_SIZE: usize = 3;
/// Target number of batches for a large manifest
const TARGET_BATCHES: usize = 5;
/// Functions named in a batch task's description before eliding
const DESCRIBED_FUNCTIONS: usize = 5;

const TESTING_GUIDANCE: &[&str] = &[
    "Write unit tests for each function",
    "Add integration tests",
    "Ensure edge cases are covered",
    "Target test coverage: 80%+",
];

const DOCUMENTATION_GUIDANCE: &[&str] = &[
    "Document function APIs",
    "Add usage examples",
    "Describe architecture and design decisions",
    "Update README if needed",
];

/// One actionable unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<String>,
    pub priority: Criticality,
}

impl Task {
    pub(super) fn core(
        display: &str,
        subject: &str,
        result: &ComponentResult,
        missing_functions: u64,
        priority: Criticality,
    ) -> Self {
        Self {
            task: format!("Implement core {} functionality", display),
            description: format!(
                "Implement {} missing functions for {}",
                missing_functions, subject
            ),
            details: vec![
                format!("Target functions to implement: {}", result.functions.target),
                format!("Currently implemented: {}", result.functions.found),
                format!("Missing: {}", missing_functions),
                format!("Target SLOC: {}", result.sloc.target),
                format!("Current SLOC: {}", result.sloc.found),
            ],
            functions: Vec::new(),
            priority,
        }
    }

    pub(super) fn batch(
        display: &str,
        index: usize,
        count: usize,
        functions: &[String],
        priority: Criticality,
    ) -> Self {
        let mut listed = functions
            .iter()
            .take(DESCRIBED_FUNCTIONS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if functions.len() > DESCRIBED_FUNCTIONS {
            listed.push_str("...");
        }

        Self {
            task: format!("Implement {} functions (batch {}/{})", display, index, count),
            description: format!("Implement the following functions: {}", listed),
            details: Vec::new(),
            functions: functions.to_vec(),
            priority,
        }
    }

    /// Always high priority, whatever the component's criticality
    pub(super) fn testing(display: &str) -> Self {
        Self {
            task: format!("Add tests for {}", display),
            description: format!("Create comprehensive tests for {} functionality", display),
            details: TESTING_GUIDANCE.iter().map(|s| s.to_string()).collect(),
            functions: Vec::new(),
            priority: Criticality::High,
        }
    }

    pub(super) fn documentation(display: &str, priority: Criticality) -> Self {
        Self {
            task: format!("Document {} implementation", display),
            description: format!("Create documentation for {} module", display),
            details: DOCUMENTATION_GUIDANCE.iter().map(|s| s.to_string()).collect(),
            functions: Vec::new(),
            priority,
        }
    }
}

/// Batch size for a manifest of `len` functions: about five batches, at least 3 each
pub fn batch_size(len: usize) -> usize {
    MIN_BATCH_SIZE.max(len / TARGET_BATCHES)
}

/// Split a manifest into contiguous batches, in order
pub fn batch_manifest(manifest: &[String]) -> Vec<&[String]> {
    if manifest.is_empty() {
        return Vec::new();
    }
    manifest.chunks(batch_size(manifest.len())).collect()
}
