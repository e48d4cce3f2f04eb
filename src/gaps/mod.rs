//! Gap analysis and task backlog generation
//!
//! Every component scoring strictly below the threshold gets a task group:
//! a core implementation task when functions are missing, one task per batch
//! of manifest functions, and a testing and a documentation task. Components
//! at or above the threshold are left out entirely.

mod tasks;

pub use tasks::{batch_manifest, batch_size, Task};

use crate::models::{ComponentResult, EvaluationReport};
use crate::rubric::{Category, Criticality, Rubric, RubricComponent};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default score below which a component needs work
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Shortfall of one component against its targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub functions_gap: u64,
    pub sloc_gap: u64,
    pub functions_progress: String,
    pub sloc_progress: String,
}

/// All tasks for one under-scoring component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentTaskGroup {
    pub component: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub current_score: f64,
    pub weight: f64,
    pub criticality: Criticality,
    pub description: String,
    pub gap_analysis: GapAnalysis,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTasks {
    pub kernel_primitives: Vec<ComponentTaskGroup>,
    pub os_services: Vec<ComponentTaskGroup>,
}

impl CategoryTasks {
    pub fn groups(&self, category: Category) -> &[ComponentTaskGroup] {
        match category {
            Category::KernelPrimitive => &self.kernel_primitives,
            Category::OsService => &self.os_services,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacklogMetadata {
    pub threshold: f64,
    pub kernel_score: f64,
    pub os_score: f64,
    pub overall_score: f64,
    pub total_files_scanned: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogSummary {
    pub kernel_components_needing_work: usize,
    pub os_components_needing_work: usize,
    pub total_components: usize,
}

/// The full task backlog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBacklog {
    pub metadata: BacklogMetadata,
    pub tasks: CategoryTasks,
    pub summary: BacklogSummary,
}

/// Build the backlog for every component below `threshold`
pub fn generate_backlog(report: &EvaluationReport, rubric: &Rubric, threshold: f64) -> TaskBacklog {
    let tasks = CategoryTasks {
        kernel_primitives: category_groups(report, rubric, Category::KernelPrimitive, threshold),
        os_services: category_groups(report, rubric, Category::OsService, threshold),
    };

    let summary = BacklogSummary {
        kernel_components_needing_work: tasks.kernel_primitives.len(),
        os_components_needing_work: tasks.os_services.len(),
        total_components: tasks.kernel_primitives.len() + tasks.os_services.len(),
    };
    debug!(
        "{} components below {:.1} ({} kernel, {} OS)",
        summary.total_components,
        threshold,
        summary.kernel_components_needing_work,
        summary.os_components_needing_work
    );

    TaskBacklog {
        metadata: BacklogMetadata {
            threshold,
            kernel_score: report.summary.kernel_primitives_score,
            os_score: report.summary.os_services_score,
            overall_score: report.summary.overall_score,
            total_files_scanned: report.summary.total_files_scanned,
        },
        tasks,
        summary,
    }
}

fn category_groups(
    report: &EvaluationReport,
    rubric: &Rubric,
    category: Category,
    threshold: f64,
) -> Vec<ComponentTaskGroup> {
    report
        .components(category)
        .iter()
        .filter(|(_, result)| result.scores.overall_score < threshold)
        .map(|(name, result)| {
            let entry = rubric.component(category, name);
            if entry.is_none() {
                warn!(
                    "Component '{}' is not in the rubric's {}; using report values",
                    name,
                    category.label()
                );
            }
            component_tasks(name, category, result, entry)
        })
        .collect()
}

/// Build the task group for one component
pub fn component_tasks(
    name: &str,
    category: Category,
    result: &ComponentResult,
    entry: Option<&RubricComponent>,
) -> ComponentTaskGroup {
    let display = display_name(name);
    let criticality = entry
        .map(|s| s.criticality.clone())
        .unwrap_or_else(|| result.criticality.clone());
    let description = entry.map(|s| s.description.clone()).unwrap_or_default();

    let missing_functions = result.functions.gap();
    let missing_sloc = result.sloc.gap();

    let mut tasks = Vec::new();
    if missing_functions > 0 {
        let subject = if description.is_empty() {
            name
        } else {
            description.as_str()
        };
        tasks.push(Task::core(
            &display,
            subject,
            result,
            missing_functions,
            criticality.clone(),
        ));
    }

    if let Some(manifest) = entry.and_then(|s| s.manifest_functions.as_deref()) {
        let batches = batch_manifest(manifest);
        let count = batches.len();
        tasks.extend(
            batches
                .into_iter()
                .enumerate()
                .map(|(i, batch)| {
                    Task::batch(&display, i + 1, count, batch, criticality.clone())
                }),
        );
    }

    tasks.push(Task::testing(&display));
    tasks.push(Task::documentation(&display, criticality.clone()));

    ComponentTaskGroup {
        component: name.to_string(),
        category,
        current_score: result.scores.overall_score,
        weight: entry.map(|s| s.weight).unwrap_or(result.weight),
        criticality,
        description,
        gap_analysis: GapAnalysis {
            functions_gap: missing_functions,
            sloc_gap: missing_sloc,
            functions_progress: result.functions.progress(),
            sloc_progress: result.sloc.progress(),
        },
        tasks,
    }
}

/// `memory_management` -> `memory management`
pub fn display_name(name: &str) -> String {
    name.replace('_', " ")
}
