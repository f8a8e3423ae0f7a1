//! Pipeline for selecting candidate pull requests.
//!
//! This crate provides:
//! - Pattern compilation (`auto`, `substring`, `segment`, `regex` modes)
//! - CandidateFilter, the core "touched a relevant path" decision
//! - Filter trait, auxiliary filters, and FilterPipeline for composing them
//! - Selection runs for one project, and parallel batch runs for many
//!
//! ## Architecture
//! A run processes one project's export in stages:
//! 1. The schema's adapter normalizes CSV rows into PullRequestRecords
//! 2. Filters remove repeated and inactive PRs (when configured)
//! 3. CandidateFilter keeps PRs whose changed files match a pattern
//! 4. The kept PRs' source rows are emitted in their original order
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{select_from_paths, SelectionConfig};
//! use std::path::Path;
//!
//! let config = SelectionConfig::from_file(Path::new("select.yaml"))?;
//! let selection = select_from_paths(
//!     Path::new("closed_prs.csv"),
//!     Path::new("patterns.csv"),
//!     None,
//!     &config,
//! )?;
//! selection.write_to(Path::new("candidates.csv"))?;
//! ```

pub mod batch;
pub mod candidate;
pub mod config;
pub mod filter_pipeline;
pub mod filters;
pub mod pattern;
pub mod selection;
pub mod traits;

// Re-export main types
pub use batch::{run_batch, BatchManifest, ProjectEntry, ProjectOutcome};
pub use candidate::{filter, CandidateFilter};
pub use config::{MatchingConfig, SelectionConfig};
pub use filter_pipeline::FilterPipeline;
pub use pattern::{BuiltinRule, MatchMode, PathExclusion, PatternMatcher};
pub use selection::{load_patterns, select_candidates, select_from_paths, Selection, SelectionReport};
pub use traits::Filter;
