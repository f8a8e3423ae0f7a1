//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use pr_records::{PullRequestRecord, Result};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(DuplicateIdFilter)
///     .add_filter(ActivityFilter)
///     .add_filter(CandidateFilter::new(matcher));
///
/// let selected = pipeline.apply(records)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the records.
    ///
    /// ## Algorithm
    /// 1. Start with the input records
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    pub fn apply(&self, records: Vec<PullRequestRecord>) -> Result<Vec<PullRequestRecord>> {
        let mut current = records;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::DuplicateIdFilter;

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();

        let records = vec![
            PullRequestRecord::new("1", vec!["a.cpp".to_string()]),
            PullRequestRecord::new("2", vec![]),
        ];

        let filtered = pipeline.apply(records.clone()).unwrap();
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(DuplicateIdFilter);

        let records = vec![
            PullRequestRecord::new("1", vec!["a.cpp".to_string()]),
            PullRequestRecord::new("1", vec!["b.cpp".to_string()]),
            PullRequestRecord::new("2", vec!["c.cpp".to_string()]),
        ];

        let filtered = pipeline.apply(records).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].changed_files, vec!["a.cpp"]);
        assert_eq!(filtered[1].id, "2");
        assert_eq!(pipeline.filter_names(), vec!["DuplicateIdFilter"]);
    }
}
