//! Configuration module for kernel-eval
//!
//! This module handles:
//! - Project-level configuration (kernel-eval.toml)
//! - Scan limits and extension allow-list
//! - Default task threshold and report paths

mod project_config;

pub use project_config::{
    default_config_toml, load_project_config, EvalConfig, OutputConfig, ScanConfig, TasksConfig,
    CONFIG_FILE, JSON_CONFIG_FILE,
};
