//! Evaluation engine for kernel/OS source trees
//!
//! The pipeline is `corpus` (collect files) -> `evidence` and `metrics`
//! (count cue phrases, functions and SLOC) -> `scoring` (per-component and
//! per-category scores) -> `gaps` (backlog for components below a threshold).

pub mod cli;
pub mod config;
pub mod corpus;
pub mod evidence;
pub mod gaps;
pub mod metrics;
pub mod models;
pub mod reporters;
pub mod rubric;
pub mod scoring;
