//! The candidate filter: keep pull requests that touched a relevant path.
//!
//! A pull request is a candidate iff at least one of its changed files
//! matches at least one pattern. Records with no changed files are never
//! candidates, and an empty pattern set selects nothing.

use crate::pattern::{MatchMode, PathExclusion, PatternMatcher};
use crate::traits::Filter;
use pr_records::{PatternSet, PullRequestRecord, Result};
use tracing::trace;

/// Keeps records whose changed files match the compiled patterns.
///
/// ## Algorithm
/// For each record:
/// 1. Skip changed files hit by any configured exclusion
/// 2. Keep the record as soon as one remaining file matches any pattern
///
/// Records are moved through untouched and in input order.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    matcher: PatternMatcher,
    exclusions: Vec<PathExclusion>,
}

impl CandidateFilter {
    pub fn new(matcher: PatternMatcher) -> Self {
        Self {
            matcher,
            exclusions: Vec::new(),
        }
    }

    /// Ignore changed files hit by `exclusion` (builder pattern)
    pub fn with_exclusion(mut self, exclusion: PathExclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }

    /// The candidate decision for one record
    pub fn is_candidate(&self, record: &PullRequestRecord) -> bool {
        if self.matcher.is_empty() {
            return false;
        }
        let hit = record
            .changed_files
            .iter()
            .filter(|path| !self.exclusions.iter().any(|e| e.excludes(path)))
            .find_map(|path| self.matcher.first_match(path).map(|p| (path, p)));

        match hit {
            Some((path, pattern)) => {
                trace!("PR {} selected: '{}' matches '{}'", record.id, path, pattern.source);
                true
            }
            None => false,
        }
    }

    /// Keep the candidates, preserving order
    pub fn select(&self, records: Vec<PullRequestRecord>) -> Vec<PullRequestRecord> {
        records
            .into_iter()
            .filter(|record| self.is_candidate(record))
            .collect()
    }
}

impl Filter for CandidateFilter {
    fn name(&self) -> &str {
        "CandidateFilter"
    }

    fn apply(&self, records: Vec<PullRequestRecord>) -> Result<Vec<PullRequestRecord>> {
        Ok(self.select(records))
    }
}

/// Filter records against a pattern set using the default `auto` mode.
///
/// Fails only if a pattern cannot be compiled.
pub fn filter(records: Vec<PullRequestRecord>, patterns: &PatternSet) -> Result<Vec<PullRequestRecord>> {
    let matcher = PatternMatcher::compile(patterns, MatchMode::Auto)?;
    Ok(CandidateFilter::new(matcher).select(records))
}
