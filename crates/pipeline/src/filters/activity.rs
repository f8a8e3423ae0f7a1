//! Filter on the declared activity counts of a pull request.
//!
//! When an export carries commit and changed-file counts, they are checked
//! against the resolved data before any matching happens:
//! - zero commits or zero changed files: nothing to inspect, drop
//! - declared file count differs from the resolved list: the list is
//!   incomplete, drop and warn

use crate::traits::Filter;
use pr_records::{PullRequestRecord, Result};
use tracing::warn;

/// Removes inactive or inconsistent pull requests.
///
/// Records without declared counts are kept unchanged.
pub struct ActivityFilter;

impl ActivityFilter {
    fn keep(record: &PullRequestRecord) -> bool {
        if record.commit_count == Some(0) || record.declared_file_count == Some(0) {
            return false;
        }
        match record.declared_file_count {
            Some(declared) if declared as usize != record.changed_files.len() => {
                warn!(
                    "PR {} declares {} changed files but {} were resolved; skipping",
                    record.id,
                    declared,
                    record.changed_files.len()
                );
                false
            }
            _ => true,
        }
    }
}

impl Filter for ActivityFilter {
    fn name(&self) -> &str {
        "ActivityFilter"
    }

    fn apply(&self, records: Vec<PullRequestRecord>) -> Result<Vec<PullRequestRecord>> {
        Ok(records.into_iter().filter(Self::keep).collect())
    }
}
