//! Project-level configuration support
//!
//! Loads configuration from `kernel-eval.toml` or `.kernel-evalrc.json` in
//! the working directory. Every key is optional.
//!
//! # Configuration Format
//!
//! ```toml
//! # kernel-eval.toml
//!
//! [scan]
//! extensions = [".c", ".h", ".cpp", ".cc", ".s", ".asm"]
//! max_files = 0        # 0 = unlimited
//! max_file_bytes = 0   # 0 = unlimited
//!
//! [tasks]
//! threshold = 70.0
//!
//! [output]
//! evaluation_file = "evaluation_results.json"
//! tasks_file = "implementation_tasks.json"
//! ```

use crate::corpus::{ScanOptions, DEFAULT_EXTENSIONS};
use crate::gaps::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "kernel-eval.toml";
pub const JSON_CONFIG_FILE: &str = ".kernel-evalrc.json";

/// Source collection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub max_files: usize,
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_files: 0,
            max_file_bytes: 0,
        }
    }
}

impl ScanConfig {
    pub fn to_options(&self) -> ScanOptions {
        ScanOptions {
            max_files: self.max_files,
            max_file_bytes: self.max_file_bytes,
            ..ScanOptions::default()
        }
        .with_extensions(&self.extensions)
    }
}

/// Task generation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    pub threshold: f64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Report file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub evaluation_file: PathBuf,
    pub tasks_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            evaluation_file: PathBuf::from("evaluation_results.json"),
            tasks_file: PathBuf::from("implementation_tasks.json"),
        }
    }
}

/// Project configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub scan: ScanConfig,
    pub tasks: TasksConfig,
    pub output: OutputConfig,
}

/// Load project configuration from a directory
///
/// Tries `kernel-eval.toml`, then `.kernel-evalrc.json`. A file that fails to
/// parse is logged and skipped; with no usable file the defaults apply.
pub fn load_project_config(dir: &Path) -> EvalConfig {
    let toml_path = dir.join(CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILE);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    EvalConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<EvalConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EvalConfig = toml::from_str(&content)?;
    Ok(config)
}

fn load_json_config(path: &Path) -> anyhow::Result<EvalConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EvalConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Commented starter config written by `kernel-eval init`
pub fn default_config_toml() -> String {
    let extensions = DEFAULT_EXTENSIONS
        .iter()
        .map(|e| format!("\"{}\"", e))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"# kernel-eval configuration

[scan]
# Filename suffixes to load (leading dot optional)
extensions = [{extensions}]

# Stop after this many files, in path order (0 = unlimited)
max_files = 0

# Skip files larger than this many bytes (0 = unlimited)
max_file_bytes = 0

[tasks]
# Components scoring below this get a task group
threshold = {threshold:.1}

[output]
evaluation_file = "evaluation_results.json"
tasks_file = "implementation_tasks.json"
"#,
        extensions = extensions,
        threshold = DEFAULT_THRESHOLD
    )
}
