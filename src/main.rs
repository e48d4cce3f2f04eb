//! kernel-eval - score a kernel/OS source tree against a rubric
//!
//! Counts rubric cue phrases, function headers and source lines in a native
//! code tree, scores each kernel primitive and OS service against its targets,
//! and turns the weak spots into an implementation backlog.

use anyhow::Result;
use clap::Parser;
use kernel_eval::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
