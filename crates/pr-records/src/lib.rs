//! # PR Records Crate
//!
//! This crate handles the tabular side of candidate selection: reading a
//! project's closed-PR export and pattern list, normalizing changed files,
//! and writing the selected rows back out.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Table, PullRequestRecord, PatternSet)
//! - **schema**: Per-project column mapping and changed-file encoding
//! - **adapter**: Normalize delimited, repeated-row, or diff-directory exports
//! - **parser**: Parse CSV sources, pattern lists, and diff headers
//! - **writer**: Serialize and atomically persist the selected rows
//! - **error**: Error types for loading and writing
//!
//! ## Example Usage
//!
//! ```ignore
//! use pr_records::{parser, SchemaConfig};
//! use std::path::Path;
//!
//! let schema = SchemaConfig::default();
//! let table = parser::read_table_from_path(Path::new("prs.csv"))?;
//! let records = schema.adapter().normalize(&table)?;
//! let patterns = parser::read_patterns_from_path(Path::new("patterns.csv"), &schema, false)?;
//!
//! println!("{} pull requests, {} patterns", records.len(), patterns.len());
//! ```

// Public modules
pub mod adapter;
pub mod error;
pub mod parser;
pub mod schema;
pub mod types;
pub mod writer;

// Re-export commonly used types for convenience
pub use adapter::{ChangedFilesAdapter, DelimitedColumnAdapter, DiffDirAdapter, RepeatedRowAdapter};
pub use error::{Result, SelectError, SelectWarning};
pub use schema::{ChangedFilesEncoding, SchemaConfig};
pub use types::{PatternRecord, PatternSet, PrId, PullRequestRecord, SourceRow, Table};
