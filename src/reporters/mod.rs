//! Output reporters for kernel-eval results
//!
//! Supports two output formats:
//! - `text` - Terminal summary with colors
//! - `json` - Machine-readable JSON, identical to the report files

mod json;
mod text;

use crate::gaps::TaskBacklog;
use crate::models::EvaluationReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render an evaluation report
pub fn render_evaluation(report: &EvaluationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_evaluation(report),
        OutputFormat::Json => json::render(report),
    }
}

/// Render a task backlog
pub fn render_backlog(backlog: &TaskBacklog, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_backlog(backlog),
        OutputFormat::Json => json::render(backlog),
    }
}

/// Pretty JSON for report files
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    json::render(value)
}
