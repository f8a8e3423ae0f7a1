//! Core traits for the selection pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to pull-request records.

use pr_records::{PullRequestRecord, Result};

/// Core trait for filtering pull-request records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Contract
/// - A filter only removes records; it never reorders, duplicates, or edits them
/// - `Send + Sync` lets one configured pipeline serve several batch projects
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of records.
    ///
    /// # Arguments
    /// * `records` - The records to filter (takes ownership)
    ///
    /// # Returns
    /// * `Ok(Vec<PullRequestRecord>)` - The kept records, in input order
    /// * `Err` - If a record cannot be evaluated
    fn apply(&self, records: Vec<PullRequestRecord>) -> Result<Vec<PullRequestRecord>>;
}
