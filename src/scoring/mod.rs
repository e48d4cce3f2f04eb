//! Rubric Scoring System
//!
//! This module turns corpus evidence into bounded maturity scores.
//!
//! # Scoring Formula
//!
//! ```text
//! Component:
//!   Evidence  = min(100, total_cue_matches / 10 × 100)
//!   Functions = min(100, functions_found / target_functions × 100)   (0 if target is 0)
//!   SLOC      = min(100, sloc_found / target_sloc × 100)             (0 if target is 0)
//!   Overall   = 0.4 × Evidence + 0.3 × Functions + 0.3 × SLOC
//!
//! Category:
//!   Score = Σ(weight × overall) / Σ(weight)                          (0 if Σ weight is 0)
//!
//! Final:
//!   Overall = (Kernel Primitives + OS Platform Services) / 2
//! ```
//!
//! Functions and SLOC are counted only in files where at least one of the
//! component's cues matched.
//!
//! # Example
//!
//! A `locking` component with 12 `mutex` hits, 5 of 10 target functions and
//! 100 of 200 target SLOC:
//!
//! - Evidence = min(100, 120) = 100
//! - Functions = 50, SLOC = 50
//! - Overall = 40 + 15 + 15 = 70

mod aggregate;
mod component;

pub use aggregate::{weighted_category_score, Evaluator};
pub use component::{
    evaluate_component, score_component, EVIDENCE_FULL_CREDIT_MATCHES, EVIDENCE_WEIGHT,
    FUNCTION_WEIGHT, MAX_SCORE, SLOC_WEIGHT,
};
