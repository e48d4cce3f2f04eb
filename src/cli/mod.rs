//! CLI command definitions and handlers

mod evaluate;
mod init;
mod tasks;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Parse a finite score threshold
fn parse_threshold(s: &str) -> Result<f64, String> {
    let t: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if t.is_finite() {
        Ok(t)
    } else {
        Err("threshold must be a finite number".to_string())
    }
}

/// kernel-eval - score a kernel/OS source tree against a rubric
#[derive(Parser, Debug)]
#[command(name = "kernel-eval")]
#[command(
    version,
    about = "Score a kernel/OS source tree against a rubric of kernel primitives and OS platform services",
    after_help = "\
Examples:
  kernel-eval evaluate ./kernel                       Score ./kernel against ./rubric.json
  kernel-eval evaluate ./kernel rubric.json --format json
  kernel-eval tasks evaluation_results.json           Backlog for components below 70
  kernel-eval tasks evaluation_results.json rubric.json 50
  kernel-eval init                                    Write a starter kernel-eval.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: all cores)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a source tree and score it against the rubric
    #[command(after_help = "\
Examples:
  kernel-eval evaluate ./kernel                       Text summary, JSON report to evaluation_results.json
  kernel-eval evaluate ./kernel my_rubric.json        Use a different rubric
  kernel-eval evaluate ./kernel --ext .c --ext .S     Only C and upper-case assembly files
  kernel-eval evaluate ./kernel -o out.json -f json   JSON to stdout and out.json")]
    Evaluate {
        /// Source directory to scan
        source: PathBuf,

        /// Rubric file
        #[arg(default_value = "rubric.json")]
        rubric: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Report file path (default: evaluation_results.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// File extension to scan (repeatable, replaces the configured list)
        #[arg(long = "ext")]
        extensions: Vec<String>,

        /// Maximum files to load (0 = unlimited)
        #[arg(long)]
        max_files: Option<usize>,
    },

    /// Generate an implementation backlog from an evaluation report
    #[command(after_help = "\
Examples:
  kernel-eval tasks evaluation_results.json                   Threshold 70, ./rubric.json
  kernel-eval tasks evaluation_results.json rubric.json 55    Custom threshold
  kernel-eval tasks evaluation_results.json -f json           JSON to stdout")]
    Tasks {
        /// Evaluation report written by `evaluate`
        results: PathBuf,

        /// Rubric file
        #[arg(default_value = "rubric.json")]
        rubric: PathBuf,

        /// Components scoring below this get tasks (default: 70.0)
        #[arg(value_parser = parse_threshold, allow_negative_numbers = true)]
        threshold: Option<f64>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Backlog file path (default: implementation_tasks.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Write a starter kernel-eval.toml in the current directory
    Init,
}

/// Size the global rayon pool
fn configure_workers(workers: Option<usize>) -> Result<()> {
    if let Some(n) = workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| anyhow::anyhow!("Failed to configure {} workers: {}", n, e))?;
    }
    Ok(())
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    configure_workers(cli.workers)?;
    let config = crate::config::load_project_config(&std::env::current_dir()?);

    match cli.command {
        Commands::Evaluate {
            source,
            rubric,
            format,
            output,
            extensions,
            max_files,
        } => evaluate::run(evaluate::EvaluateArgs {
            source,
            rubric,
            format: format.parse()?,
            output,
            extensions,
            max_files,
            config,
        }),

        Commands::Tasks {
            results,
            rubric,
            threshold,
            format,
            output,
        } => tasks::run(tasks::TasksArgs {
            results,
            rubric,
            threshold,
            format: format.parse()?,
            output,
            config,
        }),

        Commands::Init => init::run(&std::env::current_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("8"), Ok(8));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("55.5"), Ok(55.5));
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn test_tasks_positional_arguments() {
        let cli = Cli::try_parse_from(["kernel-eval", "tasks", "r.json", "rubric.json", "42.5"])
            .expect("parse");
        match cli.command {
            Commands::Tasks {
                results,
                rubric,
                threshold,
                ..
            } => {
                assert_eq!(results, PathBuf::from("r.json"));
                assert_eq!(rubric, PathBuf::from("rubric.json"));
                assert_eq!(threshold, Some(42.5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_defaults() {
        let cli = Cli::try_parse_from(["kernel-eval", "evaluate", "./src"]).expect("parse");
        match cli.command {
            Commands::Evaluate {
                rubric,
                format,
                extensions,
                ..
            } => {
                assert_eq!(rubric, PathBuf::from("rubric.json"));
                assert_eq!(format, "text");
                assert!(extensions.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
