//! Filter implementations for the selection pipeline.
//!
//! These run ahead of the `CandidateFilter` to drop records that should
//! never reach pattern matching.

pub mod activity;
pub mod duplicate_id;

// Re-export for convenience
pub use activity::ActivityFilter;
pub use duplicate_id::DuplicateIdFilter;
