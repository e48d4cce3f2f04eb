//! In-memory source corpus
//!
//! A corpus is built once per evaluation run by [`collect_sources`] and is
//! read-only afterwards. Each file keeps its raw text plus two derived values
//! that several rubric components need: the lower-cased text used for cue
//! matching and the lexical metrics. Both are computed on first use and shared.

mod collector;

pub use collector::{collect_sources, ScanOptions, DEFAULT_EXTENSIONS};

use crate::metrics::FileMetrics;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// One loaded source file
#[derive(Debug)]
pub struct SourceFile {
    text: String,
    lowered: OnceLock<String>,
    metrics: OnceLock<FileMetrics>,
}

impl SourceFile {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lowered: OnceLock::new(),
            metrics: OnceLock::new(),
        }
    }

    /// Raw file text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lower-cased text, computed once
    pub fn lowercase(&self) -> &str {
        self.lowered.get_or_init(|| self.text.to_lowercase())
    }

    /// Function and SLOC counts, computed once
    pub fn metrics(&self) -> FileMetrics {
        *self.metrics.get_or_init(|| FileMetrics::measure(&self.text))
    }
}

/// Mapping from file path to loaded source, ordered by path
#[derive(Debug, Default)]
pub struct SourceCorpus {
    files: BTreeMap<PathBuf, SourceFile>,
}

impl SourceCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &SourceFile)> {
        self.files.iter()
    }

    pub fn par_iter(&self) -> impl ParallelIterator<Item = (&PathBuf, &SourceFile)> {
        self.files.par_iter()
    }
}

impl<P: Into<PathBuf>, S: Into<String>> FromIterator<(P, S)> for SourceCorpus {
    fn from_iter<I: IntoIterator<Item = (P, S)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(path, text)| (path.into(), SourceFile::new(text)))
                .collect(),
        }
    }
}
