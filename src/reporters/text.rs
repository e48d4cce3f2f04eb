//! Text (terminal) reporter with colors and formatting

use crate::gaps::{ComponentTaskGroup, TaskBacklog};
use crate::models::{ComponentResult, EvaluationReport};
use crate::rubric::Category;
use anyhow::Result;
use console::style;
use indexmap::IndexMap;
use std::fmt::Write;

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn heading(out: &mut String, title: &str) -> Result<()> {
    writeln!(out, "\n{}", style(rule()).dim())?;
    writeln!(out, "{}", style(title).bold())?;
    writeln!(out, "{}", style(rule()).dim())?;
    Ok(())
}

/// `memory_management` -> `Memory Management`
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_score(score: f64) -> String {
    let text = format!("{:.1}%", score);
    if score >= 70.0 {
        style(text).green().to_string()
    } else if score >= 40.0 {
        style(text).yellow().to_string()
    } else {
        style(text).red().to_string()
    }
}

/// Render an evaluation summary and per-component details
pub fn render_evaluation(report: &EvaluationReport) -> Result<String> {
    let mut out = String::new();
    let summary = &report.summary;

    heading(&mut out, "EVALUATION SUMMARY")?;
    writeln!(out)?;
    writeln!(
        out,
        "Kernel Primitives Score: {}",
        format_score(summary.kernel_primitives_score)
    )?;
    writeln!(out, "OS Services Score:       {}", format_score(summary.os_services_score))?;
    writeln!(
        out,
        "Overall Score:           {}",
        style(format_score(summary.overall_score)).bold()
    )?;
    writeln!(out, "\nTotal Files Scanned:     {}", summary.total_files_scanned)?;

    for category in [Category::KernelPrimitive, Category::OsService] {
        heading(&mut out, &format!("{} DETAILS", category.label().to_uppercase()))?;
        writeln!(
            out,
            "Category score: {} over {} components",
            format_score(report.category_score(category)),
            report.components(category).len()
        )?;
        render_components(&mut out, report.components(category))?;
    }

    Ok(out)
}

fn render_components(out: &mut String, components: &IndexMap<String, ComponentResult>) -> Result<()> {
    for (name, result) in components {
        writeln!(out, "\n{}", style(title_case(name)).bold())?;
        writeln!(
            out,
            "  Weight: {}, Criticality: {}",
            result.weight, result.criticality
        )?;
        writeln!(out, "  Overall Score: {}", format_score(result.scores.overall_score))?;
        writeln!(
            out,
            "  Evidence matches: {} in {} files",
            result.evidence.total_matches, result.evidence.matched_files
        )?;
        writeln!(
            out,
            "  Functions: {} ({:.1}%)",
            result.functions.progress(),
            result.functions.score
        )?;
        writeln!(
            out,
            "  SLOC: {} ({:.1}%)",
            result.sloc.progress(),
            result.sloc.score
        )?;
    }
    Ok(())
}

/// Render a backlog summary, heaviest components first
pub fn render_backlog(backlog: &TaskBacklog) -> Result<String> {
    let mut out = String::new();
    heading(&mut out, "IMPLEMENTATION TASKS SUMMARY")?;

    for (label, category) in [
        ("Kernel Primitives", Category::KernelPrimitive),
        ("OS Services", Category::OsService),
    ] {
        let groups = backlog.tasks.groups(category);
        writeln!(out, "\n{} needing work: {}", label, style(groups.len()).cyan())?;

        let mut sorted: Vec<&ComponentTaskGroup> = groups.iter().collect();
        sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        for group in sorted {
            render_group(&mut out, group)?;
        }
    }

    writeln!(out, "\n{}", style(rule()).dim())?;
    writeln!(
        out,
        "Total components needing work: {}",
        backlog.summary.total_components
    )?;
    Ok(out)
}

fn render_group(out: &mut String, group: &ComponentTaskGroup) -> Result<()> {
    writeln!(out, "  - {}", style(title_case(&group.component)).bold())?;
    writeln!(
        out,
        "    Score: {} | Weight: {} | Criticality: {}",
        format_score(group.current_score),
        group.weight,
        group.criticality
    )?;
    writeln!(
        out,
        "    Gap: {} functions, {} SLOC",
        group.gap_analysis.functions_gap, group.gap_analysis.sloc_gap
    )?;
    writeln!(out, "    Tasks: {}", group.tasks.len())?;
    Ok(())
}
