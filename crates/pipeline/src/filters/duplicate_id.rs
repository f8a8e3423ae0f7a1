//! Filter to drop repeated pull requests.
//!
//! Exports of restarted projects can list the same PR more than once. Only
//! the first occurrence counts, whether or not it turns out to be a candidate.

use crate::traits::Filter;
use pr_records::{PrId, PullRequestRecord, Result};
use std::collections::HashSet;
use tracing::debug;

/// Keeps the first record of every PR id.
///
/// ## Algorithm
/// Uses a HashSet of seen ids for O(1) lookups.
pub struct DuplicateIdFilter;

impl Filter for DuplicateIdFilter {
    fn name(&self) -> &str {
        "DuplicateIdFilter"
    }

    fn apply(&self, records: Vec<PullRequestRecord>) -> Result<Vec<PullRequestRecord>> {
        let mut seen: HashSet<PrId> = HashSet::with_capacity(records.len());
        let filtered: Vec<PullRequestRecord> = records
            .into_iter()
            .filter(|record| {
                let first = seen.insert(record.id.clone());
                if !first {
                    debug!("Dropping repeated PR {}", record.id);
                }
                first
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let records = vec![
            PullRequestRecord::new("12", vec![]),
            PullRequestRecord::new("13", vec!["a.sh".to_string()]),
            PullRequestRecord::new("12", vec!["src/planner.cpp".to_string()]),
        ];

        let filtered = DuplicateIdFilter.apply(records).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "12");
        assert!(filtered[0].changed_files.is_empty());
        assert_eq!(filtered[1].id, "13");
    }
}
