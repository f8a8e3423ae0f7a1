//! Core domain types for pull-request selection.
//!
//! - `Table`: a header plus the raw rows of one CSV source, with line numbers
//! - `PullRequestRecord`: one closed PR with its normalized changed-file list
//! - `PatternRecord` / `PatternSet`: the path patterns a PR is matched against

use crate::error::{Result, SelectError};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Pull request identifier as it appears in the source (usually the PR number).
///
/// Kept as text so exports with prefixed or non-numeric ids pass through untouched.
pub type PrId = String;

// =============================================================================
// Tabular Source
// =============================================================================

/// One data row of a tabular source together with its position in the file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based line number of the row in its source (the header is line 1)
    pub line: u64,
    pub record: StringRecord,
}

/// A fully loaded CSV source: label, header row, and data rows in file order.
#[derive(Debug, Clone)]
pub struct Table {
    /// Name used in diagnostics (usually the file path, or "<stdin>")
    pub label: String,
    pub headers: StringRecord,
    pub rows: Vec<SourceRow>,
}

impl Table {
    /// Build a table from in-memory rows; line numbers are assigned from 2 upward.
    pub fn from_rows<H, R, F>(label: &str, headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let headers: StringRecord = headers.into_iter().collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, fields)| SourceRow {
                line: idx as u64 + 2,
                record: fields.into_iter().collect(),
            })
            .collect();
        Self {
            label: label.to_string(),
            headers,
            rows,
        }
    }

    /// Resolve a column name to its index, or fail with `SchemaMismatch`.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| SelectError::SchemaMismatch {
                input: self.label.clone(),
                column: column.to_string(),
                found: self.headers.iter().collect::<Vec<_>>().join(", "),
            })
    }

    /// Read a field that the schema requires to be present in every row.
    ///
    /// A row that is shorter than the header has lost the field, which is
    /// reported as `MalformedInput` rather than silently treated as empty.
    pub fn required_field<'a>(
        &self,
        row: &'a SourceRow,
        idx: usize,
        column: &str,
    ) -> Result<&'a str> {
        row.record
            .get(idx)
            .ok_or_else(|| self.malformed(row, column, "field is missing from the row"))
    }

    /// Build a `MalformedInput` error pointing at a row of this table.
    pub fn malformed(&self, row: &SourceRow, column: &str, reason: &str) -> SelectError {
        SelectError::MalformedInput {
            input: self.label.clone(),
            line: row.line,
            column: column.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Pull Requests
// =============================================================================

/// A closed pull request, normalized from one or more source rows.
///
/// The source rows are kept verbatim so that a selected PR is re-emitted
/// exactly as it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestRecord {
    pub id: PrId,
    /// Paths touched by the PR, in source order
    pub changed_files: Vec<String>,
    /// Declared number of commits, when the schema maps a commit-count column
    pub commit_count: Option<u32>,
    /// Declared number of changed files, when the schema maps a count column
    pub declared_file_count: Option<u32>,
    /// Rows of the PR source that make up this record
    pub rows: Vec<SourceRow>,
}

impl PullRequestRecord {
    /// In-memory record with no backing source row (used by tests and benches).
    pub fn new(id: impl Into<PrId>, changed_files: Vec<String>) -> Self {
        Self {
            id: id.into(),
            changed_files,
            commit_count: None,
            declared_file_count: None,
            rows: Vec::new(),
        }
    }

    /// Line number of the first source row, used for stable output ordering
    pub fn first_line(&self) -> Option<u64> {
        self.rows.first().map(|row| row.line)
    }
}

// =============================================================================
// Patterns
// =============================================================================

/// A single path pattern read from the pattern source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub pattern: String,
    /// Optional grouping carried for reporting; never consulted when matching
    pub category: Option<String>,
    /// 1-based source line, 0 when built in memory
    #[serde(default)]
    pub line: u64,
}

/// The patterns of one project, in source order.
///
/// Order has no effect on the match decision but is kept so that runs are
/// reproducible and diagnostics point at the right row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    /// Name of the source the patterns came from
    pub label: String,
    records: Vec<PatternRecord>,
}

impl PatternSet {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            records: Vec::new(),
        }
    }

    /// Build a set from bare pattern strings
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new("<memory>");
        for pattern in patterns {
            set.push(PatternRecord {
                pattern: pattern.into(),
                category: None,
                line: 0,
            });
        }
        set
    }

    pub fn push(&mut self, record: PatternRecord) {
        self.records.push(record);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_rows(
            "prs.csv",
            ["number", "title", "files"],
            vec![vec!["1", "Fix planner", "src/a.cpp"], vec!["2", "Docs"]],
        )
    }

    #[test]
    fn test_table_line_numbers_start_after_header() {
        let table = sample_table();
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].line, 3);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_column_index_reports_schema_mismatch() {
        let table = sample_table();
        assert_eq!(table.column_index("files").unwrap(), 2);

        let err = table.column_index("changed_files").unwrap_err();
        match err {
            SelectError::SchemaMismatch { column, found, .. } => {
                assert_eq!(column, "changed_files");
                assert_eq!(found, "number, title, files");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_row_is_malformed() {
        let table = sample_table();
        let err = table
            .required_field(&table.rows[1], 2, "files")
            .unwrap_err();
        assert!(matches!(err, SelectError::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_pattern_set_keeps_source_order() {
        let set = PatternSet::from_patterns(["planner", "*.cpp", "control/"]);
        let patterns: Vec<_> = set.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["planner", "*.cpp", "control/"]);
        assert!(!set.is_empty());
    }
}
