//! Tasks command - turn an evaluation report into an implementation backlog

use crate::config::EvalConfig;
use crate::gaps::generate_backlog;
use crate::models::EvaluationReport;
use crate::reporters::{self, OutputFormat};
use crate::rubric::load_rubric;
use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

pub struct TasksArgs {
    pub results: PathBuf,
    pub rubric: PathBuf,
    pub threshold: Option<f64>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: EvalConfig,
}

/// Run the tasks command
pub fn run(args: TasksArgs) -> Result<()> {
    let threshold = args.threshold.unwrap_or(args.config.tasks.threshold);
    if !threshold.is_finite() {
        anyhow::bail!("Threshold must be a finite number, got {}", threshold);
    }

    let content = std::fs::read_to_string(&args.results)
        .with_context(|| format!("Failed to read {}", args.results.display()))?;
    let report = EvaluationReport::from_json(&content)
        .with_context(|| format!("Malformed evaluation report {}", args.results.display()))?;
    let rubric = load_rubric(&args.rubric)
        .with_context(|| format!("Failed to load rubric {}", args.rubric.display()))?;

    let backlog = generate_backlog(&report, &rubric, threshold);
    println!("{}", reporters::render_backlog(&backlog, args.format)?);

    let output = args
        .output
        .unwrap_or_else(|| args.config.output.tasks_file.clone());
    std::fs::write(&output, reporters::to_json(&backlog)?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if args.format == OutputFormat::Text {
        println!(
            "\n{} Tasks saved to {}",
            style("✓").green(),
            style(output.display()).cyan()
        );
    }
    Ok(())
}
