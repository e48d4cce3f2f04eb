//! JSON reporter
//!
//! Pretty-printed JSON of the report types, the same text written to the
//! report files.

use anyhow::Result;
use serde::Serialize;

/// Render any report as JSON
pub fn render<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
