//! Lexical metrics
//!
//! Two cheap per-file signals, both approximations by construction:
//!
//! - **Functions**: occurrences of `word word(params) {`, a rough C-style
//!   definition header. Macros, multi-line signatures and function pointers
//!   are over- or under-counted.
//! - **SLOC**: lines that are not blank, not inside a block comment, and do
//!   not start with `//` or `#`. Nested block comments are not understood.

mod sloc;

pub use sloc::count_sloc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static FUNCTION_HEADER: OnceLock<Regex> = OnceLock::new();

fn function_header() -> &'static Regex {
    FUNCTION_HEADER.get_or_init(|| {
        Regex::new(r"\b\w+\s+\w+\s*\([^)]*\)\s*\{").expect("function header pattern is valid")
    })
}

/// Per-file lexical counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub functions: u64,
    pub sloc: u64,
}

impl FileMetrics {
    pub fn measure(content: &str) -> Self {
        Self {
            functions: count_functions(content),
            sloc: count_sloc(content),
        }
    }
}

impl std::ops::Add for FileMetrics {
    type Output = FileMetrics;

    fn add(self, other: FileMetrics) -> FileMetrics {
        FileMetrics {
            functions: self.functions + other.functions,
            sloc: self.sloc + other.sloc,
        }
    }
}

impl std::iter::Sum for FileMetrics {
    fn sum<I: Iterator<Item = FileMetrics>>(iter: I) -> FileMetrics {
        iter.fold(FileMetrics::default(), |acc, m| acc + m)
    }
}

/// Approximate count of function definitions
pub fn count_functions(content: &str) -> u64 {
    function_header().find_iter(content).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_simple_definitions() {
        let src = "void kmain(void) {\n}\nstatic int add(int a, int b)\n{\n return a + b;\n}\n";
        assert_eq!(count_functions(src), 2);
    }

    #[test]
    fn test_declarations_and_calls_not_counted() {
        let src = "int add(int a, int b);\nadd(1, 2);\nif (x) { }\n";
        assert_eq!(count_functions(src), 0);
    }

    #[test]
    fn test_multiline_parameters_counted() {
        // `[^)]` spans newlines, so wrapped parameter lists still match
        let src = "int spawn(int pid,\n          int prio) {\n}\n";
        assert_eq!(count_functions(src), 1);
    }

    #[test]
    fn test_pointer_return_types_missed() {
        // `*` breaks the two-word header, a known approximation
        assert_eq!(count_functions("char *strdup(const char *s) {\n}\n"), 0);
    }

    #[test]
    fn test_metrics_sum() {
        let total: FileMetrics = [
            FileMetrics { functions: 2, sloc: 10 },
            FileMetrics { functions: 3, sloc: 5 },
        ]
        .into_iter()
        .sum();
        assert_eq!(total, FileMetrics { functions: 5, sloc: 15 });
    }
}
