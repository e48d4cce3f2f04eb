//! Evaluate command - score a source tree against a rubric

use crate::config::EvalConfig;
use crate::corpus::collect_sources;
use crate::reporters::{self, OutputFormat};
use crate::rubric::load_rubric;
use crate::scoring::Evaluator;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub struct EvaluateArgs {
    pub source: PathBuf,
    pub rubric: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub max_files: Option<usize>,
    pub config: EvalConfig,
}

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Run the evaluate command
pub fn run(args: EvaluateArgs) -> Result<()> {
    let start = Instant::now();

    if !args.rubric.is_file() {
        anyhow::bail!("Rubric file not found: {}", args.rubric.display());
    }
    if !args.source.exists() {
        anyhow::bail!("Source directory not found: {}", args.source.display());
    }
    if !args.source.is_dir() {
        anyhow::bail!("Source path is not a directory: {}", args.source.display());
    }

    let rubric = load_rubric(&args.rubric)
        .with_context(|| format!("Failed to load rubric {}", args.rubric.display()))?;
    let evaluator = Evaluator::new(&rubric).context("Rubric cues could not be compiled")?;

    let mut options = args.config.scan.to_options();
    if !args.extensions.is_empty() {
        options = options.with_extensions(&args.extensions);
    }
    if let Some(max_files) = args.max_files {
        options.max_files = max_files;
    }

    let quiet = args.format == OutputFormat::Json;
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(create_spinner_style());
    spinner.set_message(format!("Scanning {}...", args.source.display()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let corpus = collect_sources(&args.source, &options);
    spinner.set_message(format!("Scoring {} files...", corpus.len()));
    let report = evaluator.evaluate(&corpus);

    spinner.finish_with_message(format!(
        "{}Scored {} source files",
        style("✓ ").green(),
        style(corpus.len()).cyan()
    ));

    println!("{}", reporters::render_evaluation(&report, args.format)?);

    let output = args
        .output
        .unwrap_or_else(|| args.config.output.evaluation_file.clone());
    std::fs::write(&output, reporters::to_json(&report)?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Evaluation finished in {:.2?}", start.elapsed());
    if !quiet {
        println!(
            "\n{} Results saved to {}",
            style("✓").green(),
            style(output.display()).cyan()
        );
    }
    Ok(())
}
