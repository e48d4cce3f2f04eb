//! Rubric document model and loading
//!
//! A rubric lists the kernel primitives and OS platform services a source tree
//! is expected to implement. Each component names the cue phrases that count as
//! evidence, and the function and SLOC targets that earn full credit.
//!
//! ```json
//! {
//!   "metadata": { "version": "1.0" },
//!   "kernel_primitives": {
//!     "memory_management": {
//!       "weight": 15,
//!       "criticality": "critical",
//!       "description": "Physical and virtual memory management",
//!       "evidence_cues": ["malloc", "kmalloc", "page"],
//!       "target_functions": 40,
//!       "target_sloc": 3000
//!     }
//!   },
//!   "os_platform_services": { }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Kernel primitive count in the reference rubric
pub const EXPECTED_KERNEL_PRIMITIVES: usize = 10;
/// OS service count in the reference rubric
pub const EXPECTED_OS_SERVICES: usize = 8;

/// Errors raised while loading or validating a rubric
#[derive(Error, Debug)]
pub enum RubricError {
    #[error("Failed to read rubric {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed rubric {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Component '{component}' has no evidence cues")]
    EmptyCues { component: String },

    #[error("Component '{component}' lists evidence cue '{cue}' more than once")]
    DuplicateCue { component: String, cue: String },

    #[error("Component '{component}' has a blank evidence cue")]
    BlankCue { component: String },

    #[error("Component '{component}' has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight { component: String, weight: f64 },

    #[error(
        "Component '{component}' declares {manifest} manifest functions but target_functions is {target}"
    )]
    ManifestMismatch {
        component: String,
        manifest: usize,
        target: u64,
    },

    #[error("Component '{component}' cue '{cue}' cannot be compiled: {source}")]
    InvalidCue {
        component: String,
        cue: String,
        #[source]
        source: regex::Error,
    },
}

pub type RubricResult<T> = Result<T, RubricError>;

/// Ordinal importance label of a component
///
/// Informational only: it never enters score arithmetic, but task priorities
/// are copied from it. Labels outside the usual four are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
    Critical,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criticality::Low => write!(f, "low"),
            Criticality::Medium => write!(f, "medium"),
            Criticality::High => write!(f, "high"),
            Criticality::Critical => write!(f, "critical"),
            Criticality::Other(label) => write!(f, "{}", label),
        }
    }
}

/// The two fixed rubric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "kernel")]
    KernelPrimitive,
    #[serde(rename = "os_service")]
    OsService,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::KernelPrimitive => "Kernel Primitives",
            Category::OsService => "OS Platform Services",
        }
    }
}

/// One expected primitive or service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RubricComponent {
    /// Relative importance within the category
    pub weight: f64,
    pub criticality: Criticality,
    #[serde(default)]
    pub description: String,
    /// Case-insensitive whole-word phrases that count as evidence
    pub evidence_cues: Vec<String>,
    /// Function count needed for full function credit
    pub target_functions: u64,
    /// Code line count needed for full SLOC credit
    pub target_sloc: u64,
    /// Named functions expected to exist, one per target function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_functions: Option<Vec<String>>,
}

impl RubricComponent {
    fn validate(&self, name: &str) -> RubricResult<()> {
        if self.evidence_cues.is_empty() {
            return Err(RubricError::EmptyCues {
                component: name.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for cue in &self.evidence_cues {
            if cue.trim().is_empty() {
                return Err(RubricError::BlankCue {
                    component: name.to_string(),
                });
            }
            if !seen.insert(cue.to_lowercase()) {
                return Err(RubricError::DuplicateCue {
                    component: name.to_string(),
                    cue: cue.clone(),
                });
            }
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(RubricError::InvalidWeight {
                component: name.to_string(),
                weight: self.weight,
            });
        }

        if let Some(manifest) = &self.manifest_functions {
            if manifest.len() as u64 != self.target_functions {
                return Err(RubricError::ManifestMismatch {
                    component: name.to_string(),
                    manifest: manifest.len(),
                    target: self.target_functions,
                });
            }
        }

        Ok(())
    }
}

/// A full rubric document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rubric {
    /// Free-form block, not interpreted
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub kernel_primitives: IndexMap<String, RubricComponent>,
    pub os_platform_services: IndexMap<String, RubricComponent>,
}

impl Rubric {
    /// Parse and validate a rubric from JSON text
    pub fn from_json(content: &str, path: &Path) -> RubricResult<Self> {
        let rubric: Rubric = serde_json::from_str(content).map_err(|source| RubricError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Components of one category, in authoring order
    pub fn components(&self, category: Category) -> &IndexMap<String, RubricComponent> {
        match category {
            Category::KernelPrimitive => &self.kernel_primitives,
            Category::OsService => &self.os_platform_services,
        }
    }

    /// Look up a component by category and name
    pub fn component(&self, category: Category, name: &str) -> Option<&RubricComponent> {
        self.components(category).get(name)
    }

    pub fn validate(&self) -> RubricResult<()> {
        for category in [Category::KernelPrimitive, Category::OsService] {
            let components = self.components(category);
            for (name, component) in components {
                component.validate(name)?;
            }

            let total_weight: f64 = components.values().map(|c| c.weight).sum();
            if total_weight == 0.0 {
                warn!(
                    "{} has zero total weight; its category score will be 0",
                    category.label()
                );
            }
        }

        if self.kernel_primitives.len() != EXPECTED_KERNEL_PRIMITIVES
            || self.os_platform_services.len() != EXPECTED_OS_SERVICES
        {
            debug!(
                "Rubric has {} kernel primitives and {} OS services (reference rubric: {} and {})",
                self.kernel_primitives.len(),
                self.os_platform_services.len(),
                EXPECTED_KERNEL_PRIMITIVES,
                EXPECTED_OS_SERVICES
            );
        }

        Ok(())
    }
}

/// Read, parse and validate a rubric file
pub fn load_rubric(path: &Path) -> RubricResult<Rubric> {
    let content = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rubric = Rubric::from_json(&content, path)?;
    debug!(
        "Loaded rubric {} ({} kernel primitives, {} OS services)",
        path.display(),
        rubric.kernel_primitives.len(),
        rubric.os_platform_services.len()
    );
    Ok(rubric)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a component with the given cues and targets
    pub(crate) fn component(cues: &[&str], target_functions: u64, target_sloc: u64) -> RubricComponent {
        RubricComponent {
            weight: 1.0,
            criticality: Criticality::High,
            description: "test component".into(),
            evidence_cues: cues.iter().map(|c| c.to_string()).collect(),
            target_functions,
            target_sloc,
            manifest_functions: None,
        }
    }

    fn parse(json: &str) -> RubricResult<Rubric> {
        Rubric::from_json(json, Path::new("rubric.json"))
    }

    #[test]
    fn test_parse_preserves_authoring_order() {
        let rubric = parse(
            r#"{
                "metadata": {"version": "2"},
                "kernel_primitives": {
                    "zeta": {"weight": 1, "criticality": "low", "description": "z",
                             "evidence_cues": ["z"], "target_functions": 1, "target_sloc": 1},
                    "alpha": {"weight": 2, "criticality": "critical", "description": "a",
                              "evidence_cues": ["a"], "target_functions": 1, "target_sloc": 1,
                              "extra_key": true}
                },
                "os_platform_services": {}
            }"#,
        )
        .expect("valid rubric");

        let names: Vec<&str> = rubric.kernel_primitives.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(
            rubric.kernel_primitives["alpha"].criticality,
            Criticality::Critical
        );
        assert_eq!(rubric.metadata["version"], "2");
    }

    #[test]
    fn test_criticality_labels_round_trip_verbatim() {
        let known: Criticality = serde_json::from_str(r#""critical""#).expect("known label");
        assert_eq!(known, Criticality::Critical);

        for label in ["High", "essential"] {
            let parsed: Criticality =
                serde_json::from_str(&format!("\"{}\"", label)).expect("free-form label");
            assert_eq!(parsed, Criticality::Other(label.to_string()));
            assert_eq!(parsed.to_string(), label);
            assert_eq!(
                serde_json::to_string(&parsed).expect("serialize"),
                format!("\"{}\"", label)
            );
        }
    }

    #[test]
    fn test_missing_required_field_is_parse_error() {
        let err = parse(
            r#"{"kernel_primitives": {"x": {"weight": 1, "criticality": "low",
                "evidence_cues": ["x"], "target_functions": 1}},
                "os_platform_services": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RubricError::Parse { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_components() {
        let mut c = component(&[], 1, 1);
        assert!(matches!(c.validate("x"), Err(RubricError::EmptyCues { .. })));

        c = component(&["Mutex", "mutex"], 1, 1);
        assert!(matches!(c.validate("x"), Err(RubricError::DuplicateCue { .. })));

        c = component(&["  "], 1, 1);
        assert!(matches!(c.validate("x"), Err(RubricError::BlankCue { .. })));

        c = component(&["mutex"], 1, 1);
        c.weight = -1.0;
        assert!(matches!(c.validate("x"), Err(RubricError::InvalidWeight { .. })));

        c = component(&["mutex"], 2, 1);
        c.manifest_functions = Some(vec!["mutex_lock".into()]);
        assert!(matches!(
            c.validate("x"),
            Err(RubricError::ManifestMismatch { manifest: 1, target: 2, .. })
        ));

        c.manifest_functions = Some(vec!["mutex_lock".into(), "mutex_unlock".into()]);
        assert!(c.validate("x").is_ok());
    }

    #[test]
    fn test_zero_weight_category_is_accepted() {
        let mut rubric = Rubric::default();
        let mut c = component(&["irq"], 1, 1);
        c.weight = 0.0;
        rubric.kernel_primitives.insert("interrupts".into(), c);
        assert!(rubric.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_rubric(Path::new("/nonexistent/rubric.json")).unwrap_err();
        assert!(matches!(err, RubricError::Io { .. }));
    }
}
