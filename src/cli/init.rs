//! Init command - write a starter kernel-eval.toml

use crate::config::{default_config_toml, CONFIG_FILE};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, default_config_toml())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\n{} Edit [scan] extensions to match your tree, then run {}",
        style("→").dim(),
        style("kernel-eval evaluate <SOURCE_DIR>").bold()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        run(dir.path()).expect("first init");
        let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).expect("read");
        assert_eq!(written, default_config_toml());

        std::fs::write(dir.path().join(CONFIG_FILE), "[tasks]\nthreshold = 10.0\n").expect("write");
        run(dir.path()).expect("second init");
        let kept = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).expect("read");
        assert!(kept.contains("threshold = 10.0"));
    }

    #[test]
    fn test_init_rejects_missing_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(run(&dir.path().join("missing")).is_err());
    }
}
