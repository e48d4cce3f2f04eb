//! Source collection
//!
//! Walks a directory tree and loads every file whose name ends in an allowed
//! extension. No ignore files, hidden-file rules or content sniffing apply:
//! the extension match is the only filter. Reads run in parallel.

use super::SourceCorpus;
use dashmap::DashMap;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Native-code extensions scanned by default
pub const DEFAULT_EXTENSIONS: &[&str] = &[".c", ".h", ".cpp", ".cc", ".s", ".asm"];

/// What to collect and how much of it
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Filename suffixes, each with a leading dot
    pub extensions: Vec<String>,
    /// Maximum files to load (0 = unlimited)
    pub max_files: usize,
    /// Files larger than this are skipped (0 = unlimited)
    pub max_file_bytes: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_files: 0,
            max_file_bytes: 0,
        }
    }
}

impl ScanOptions {
    /// Replace the extension allow-list; a missing leading dot is added
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| e.len() > 1)
            .collect();
        self
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Load every matching file under `root` into a corpus
///
/// A missing root is not an error: it is logged and yields an empty corpus, so
/// every component scores zero evidence. Unreadable files are skipped.
pub fn collect_sources(root: &Path, options: &ScanOptions) -> SourceCorpus {
    let root = match root.canonicalize() {
        Ok(root) if root.is_dir() => root,
        Ok(root) => {
            warn!("Source path {} is not a directory", root.display());
            return SourceCorpus::new();
        }
        Err(e) => {
            warn!("Source path {} does not exist: {}", root.display(), e);
            return SourceCorpus::new();
        }
    };

    let mut paths = discover_files(&root, options);
    paths.sort();
    if options.max_files > 0 && paths.len() > options.max_files {
        warn!(
            "Found {} matching files, loading only the first {}",
            paths.len(),
            options.max_files
        );
        paths.truncate(options.max_files);
    }

    let corpus = load_files(&paths, options.max_file_bytes);
    info!("Loaded {} source files from {}", corpus.len(), root.display());
    corpus
}

/// Read discovered files in parallel, skipping any that cannot be read
fn load_files(paths: &[PathBuf], max_file_bytes: u64) -> SourceCorpus {
    let contents: DashMap<PathBuf, String> = DashMap::new();
    paths.par_iter().for_each(|path| {
        match read_source(path, max_file_bytes) {
            Ok(Some(text)) => {
                contents.insert(path.clone(), text);
            }
            Ok(None) => warn!(
                "Skipping {}: larger than {} bytes",
                path.display(),
                max_file_bytes
            ),
            Err(e) => warn!("Could not read {}: {}", path.display(), e),
        }
    });
    contents.into_iter().collect()
}

fn discover_files(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        let is_file = entry.file_type().is_some_and(|t| {
            // Symlinks are not followed, but a link to a file still counts
            t.is_file() || (t.is_symlink() && path.is_file())
        });
        if is_file && options.matches(path) {
            files.push(path.to_path_buf());
        }
    }
    debug!("Discovered {} candidate files under {}", files.len(), root.display());
    files
}

/// Read a file as text, dropping undecodable bytes
///
/// Returns `Ok(None)` when the file exceeds `max_bytes`.
fn read_source(path: &Path, max_bytes: u64) -> std::io::Result<Option<String>> {
    if max_bytes > 0 && std::fs::metadata(path)?.len() > max_bytes {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    Ok(Some(decode_text(&bytes)))
}

/// Best-effort UTF-8 decoding with universal newlines
fn decode_text(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    if text.contains('\r') {
        text = text.replace("\r\n", "\n").replace('\r', "\n");
    }
    text
}
