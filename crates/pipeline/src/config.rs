//! Selection configuration.
//!
//! Loaded from YAML, with every key optional:
//!
//! ```yaml
//! schema:
//!   id_column: number
//!   changed_files_column: files
//!   encoding: { kind: delimited, delimiter: ";" }
//! matching:
//!   mode: auto
//!   exclude_docs: true
//!   builtin_rules: [infrastructure]
//!   dedup: true
//! ```

use crate::candidate::CandidateFilter;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{ActivityFilter, DuplicateIdFilter};
use crate::pattern::{BuiltinRule, MatchMode, PathExclusion, PatternMatcher};
use pr_records::{PatternSet, Result, SchemaConfig, SelectError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options that shape the candidate decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub mode: MatchMode,
    /// Ignore documentation and image files before matching
    pub exclude_docs: bool,
    /// Rule sets added on top of the project's patterns
    pub builtin_rules: Vec<BuiltinRule>,
    /// Keep only the first record per PR id
    pub dedup: bool,
}

/// Everything one project run needs besides its two input sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub schema: SchemaConfig,
    pub matching: MatchingConfig,
}

impl SelectionConfig {
    /// Load config from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SelectError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => SelectError::IoError(e),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            SelectError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.schema.validate()
    }

    /// Compile the patterns and assemble the filters for one run.
    ///
    /// Order: duplicate removal, activity check, candidate matching.
    /// Builtin rules only extend a non-empty pattern source; an empty source
    /// selects nothing.
    pub fn build_pipeline(&self, patterns: &PatternSet) -> Result<(FilterPipeline, usize)> {
        let mut matcher = PatternMatcher::compile(patterns, self.matching.mode)?;
        if !patterns.is_empty() {
            for rule in &self.matching.builtin_rules {
                matcher = matcher.with_builtin(*rule);
            }
        }
        let rule_count = matcher.len();

        let mut candidate = CandidateFilter::new(matcher);
        if self.matching.exclude_docs {
            candidate = candidate.with_exclusion(PathExclusion::Documentation);
        }

        let mut pipeline = FilterPipeline::new();
        if self.matching.dedup {
            pipeline = pipeline.add_filter(DuplicateIdFilter);
        }
        if self.schema.commit_count_column.is_some() || self.schema.changed_file_count_column.is_some() {
            pipeline = pipeline.add_filter(ActivityFilter);
        }
        Ok((pipeline.add_filter(candidate), rule_count))
    }
}
