//! Input adapters that normalize a PR source into `PullRequestRecord`s.
//!
//! Project exports encode changed files in different shapes. Each adapter
//! turns one shape into the same per-PR record, so the matching logic never
//! has to know which export it is looking at.
//!
//! - `DelimitedColumnAdapter`: one row per PR, files in a single cell
//! - `RepeatedRowAdapter`: one row per (PR, file)
//! - `DiffDirAdapter`: one row per PR, files read from a directory of `.diff` files

use crate::error::Result;
use crate::parser::{parse_diff_paths, split_changed_files};
use crate::schema::SchemaConfig;
use crate::types::{PrId, PullRequestRecord, SourceRow, Table};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Normalizes the rows of a PR source into one record per pull request.
///
/// Records come back in order of each PR's first row, and every source row
/// ends up in exactly one record.
pub trait ChangedFilesAdapter: Send + Sync {
    /// Returns the name of this adapter (for logging/debugging)
    fn name(&self) -> &str;

    /// Normalize a loaded PR table
    fn normalize(&self, table: &Table) -> Result<Vec<PullRequestRecord>>;
}

/// Header positions of the columns the schema maps
struct Columns {
    id: usize,
    files: Option<usize>,
    commits: Option<usize>,
    file_count: Option<usize>,
}

impl Columns {
    fn resolve(schema: &SchemaConfig, table: &Table, needs_files: bool) -> Result<Self> {
        let id = table.column_index(&schema.id_column)?;
        let files = if needs_files {
            Some(table.column_index(&schema.changed_files_column)?)
        } else {
            None
        };
        let commits = schema
            .commit_count_column
            .as_deref()
            .map(|column| table.column_index(column))
            .transpose()?;
        let file_count = schema
            .changed_file_count_column
            .as_deref()
            .map(|column| table.column_index(column))
            .transpose()?;
        Ok(Self {
            id,
            files,
            commits,
            file_count,
        })
    }
}

fn read_id(schema: &SchemaConfig, table: &Table, row: &SourceRow, idx: usize) -> Result<PrId> {
    let id = table.required_field(row, idx, &schema.id_column)?.trim();
    if id.is_empty() {
        return Err(table.malformed(row, &schema.id_column, "pull request id is empty"));
    }
    Ok(id.to_string())
}

fn read_count(
    table: &Table,
    row: &SourceRow,
    idx: Option<usize>,
    column: Option<&str>,
) -> Result<Option<u32>> {
    let (Some(idx), Some(column)) = (idx, column) else {
        return Ok(None);
    };
    let raw = table.required_field(row, idx, column)?.trim();
    raw.parse::<u32>()
        .map(Some)
        .map_err(|e| table.malformed(row, column, &format!("invalid count '{raw}': {e}")))
}

fn record_from_row(
    schema: &SchemaConfig,
    table: &Table,
    row: &SourceRow,
    columns: &Columns,
    changed_files: Vec<String>,
) -> Result<PullRequestRecord> {
    Ok(PullRequestRecord {
        id: read_id(schema, table, row, columns.id)?,
        changed_files,
        commit_count: read_count(
            table,
            row,
            columns.commits,
            schema.commit_count_column.as_deref(),
        )?,
        declared_file_count: read_count(
            table,
            row,
            columns.file_count,
            schema.changed_file_count_column.as_deref(),
        )?,
        rows: vec![row.clone()],
    })
}

// =============================================================================
// Delimited column
// =============================================================================

/// One row per PR; the changed-files cell is a delimited list or a JSON array.
pub struct DelimitedColumnAdapter {
    schema: SchemaConfig,
    delimiter: String,
}

impl DelimitedColumnAdapter {
    pub fn new(schema: SchemaConfig, delimiter: String) -> Self {
        Self { schema, delimiter }
    }
}

impl ChangedFilesAdapter for DelimitedColumnAdapter {
    fn name(&self) -> &str {
        "DelimitedColumnAdapter"
    }

    fn normalize(&self, table: &Table) -> Result<Vec<PullRequestRecord>> {
        let columns = Columns::resolve(&self.schema, table, true)?;
        let files_column = &self.schema.changed_files_column;

        let mut records = Vec::with_capacity(table.len());
        for row in &table.rows {
            // resolved above because `needs_files` is true
            let files_idx = columns.files.unwrap_or_default();
            let cell = table.required_field(row, files_idx, files_column)?;
            let changed_files = split_changed_files(cell, &self.delimiter)
                .map_err(|reason| table.malformed(row, files_column, &reason))?;
            records.push(record_from_row(&self.schema, table, row, &columns, changed_files)?);
        }
        Ok(records)
    }
}

// =============================================================================
// Repeated rows
// =============================================================================

/// One row per (PR, file) pair, grouped by PR id in first-appearance order.
///
/// A row with an empty file cell still belongs to its PR; it just contributes
/// no path. Count columns are read from the first row of each group.
pub struct RepeatedRowAdapter {
    schema: SchemaConfig,
}

impl RepeatedRowAdapter {
    pub fn new(schema: SchemaConfig) -> Self {
        Self { schema }
    }
}

impl ChangedFilesAdapter for RepeatedRowAdapter {
    fn name(&self) -> &str {
        "RepeatedRowAdapter"
    }

    fn normalize(&self, table: &Table) -> Result<Vec<PullRequestRecord>> {
        let columns = Columns::resolve(&self.schema, table, true)?;
        let files_column = &self.schema.changed_files_column;

        let mut records: Vec<PullRequestRecord> = Vec::new();
        let mut positions: HashMap<PrId, usize> = HashMap::new();

        for row in &table.rows {
            let files_idx = columns.files.unwrap_or_default();
            let path = table.required_field(row, files_idx, files_column)?.trim();
            let id = read_id(&self.schema, table, row, columns.id)?;

            match positions.get(&id) {
                Some(&pos) => {
                    let record = &mut records[pos];
                    if !path.is_empty() {
                        record.changed_files.push(path.to_string());
                    }
                    record.rows.push(row.clone());
                }
                None => {
                    let files = if path.is_empty() {
                        Vec::new()
                    } else {
                        vec![path.to_string()]
                    };
                    let record = record_from_row(&self.schema, table, row, &columns, files)?;
                    positions.insert(id, records.len());
                    records.push(record);
                }
            }
        }

        debug!(
            "{} grouped {} rows into {} pull requests",
            self.name(),
            table.len(),
            records.len()
        );
        Ok(records)
    }
}

// =============================================================================
// Diff directory
// =============================================================================

/// One row per PR; changed files come from the `diff --git` headers of
/// `<dir>/<id>.diff`.
pub struct DiffDirAdapter {
    schema: SchemaConfig,
    dir: PathBuf,
}

impl DiffDirAdapter {
    pub fn new(schema: SchemaConfig, dir: PathBuf) -> Self {
        Self { schema, dir }
    }
}

impl ChangedFilesAdapter for DiffDirAdapter {
    fn name(&self) -> &str {
        "DiffDirAdapter"
    }

    fn normalize(&self, table: &Table) -> Result<Vec<PullRequestRecord>> {
        let columns = Columns::resolve(&self.schema, table, false)?;
        let id_column = &self.schema.id_column;

        let mut records = Vec::with_capacity(table.len());
        for row in &table.rows {
            let id = read_id(&self.schema, table, row, columns.id)?;
            if id.contains(['/', '\\']) || id == ".." {
                return Err(table.malformed(row, id_column, "id cannot name a diff file"));
            }

            let path = self.dir.join(format!("{id}.diff"));
            let bytes = fs::read(&path).map_err(|e| {
                table.malformed(
                    row,
                    id_column,
                    &format!("cannot read diff {}: {e}", path.display()),
                )
            })?;
            let changed_files = parse_diff_paths(&String::from_utf8_lossy(&bytes));
            records.push(record_from_row(&self.schema, table, row, &columns, changed_files)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectError;
    use crate::schema::ChangedFilesEncoding;

    fn delimited_schema() -> SchemaConfig {
        SchemaConfig::default()
    }

    #[test]
    fn test_delimited_splits_and_keeps_rows() {
        let table = Table::from_rows(
            "prs.csv",
            ["number", "title", "files"],
            vec![
                vec!["1", "Planner", "src/planner/Core.cpp; src/x.h"],
                vec!["2", "Empty", ""],
                vec!["3", "Json", r#"["a.py","b/c.py"]"#],
            ],
        );
        let adapter = delimited_schema().adapter();
        let records = adapter.normalize(&table).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].changed_files, vec!["src/planner/Core.cpp", "src/x.h"]);
        assert!(records[1].changed_files.is_empty());
        assert_eq!(records[2].changed_files, vec!["a.py", "b/c.py"]);
        assert_eq!(records[2].rows[0].line, 4);
    }

    #[test]
    fn test_delimited_missing_files_field_is_malformed() {
        let table = Table::from_rows(
            "prs.csv",
            ["number", "title", "files"],
            vec![vec!["1", "Short row"]],
        );
        let err = delimited_schema().adapter().normalize(&table).unwrap_err();
        match err {
            SelectError::MalformedInput { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "files");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_delimited_missing_column_is_schema_mismatch() {
        let table = Table::from_rows("prs.csv", ["number", "title"], vec![vec!["1", "x"]]);
        let err = delimited_schema().adapter().normalize(&table).unwrap_err();
        assert!(matches!(err, SelectError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_bad_json_list_is_malformed() {
        let table = Table::from_rows("prs.csv", ["number", "files"], vec![vec!["1", "[\"a.py\""]]);
        let err = delimited_schema().adapter().normalize(&table).unwrap_err();
        assert!(matches!(err, SelectError::MalformedInput { .. }));
    }

    #[test]
    fn test_count_columns_are_parsed() {
        let schema = SchemaConfig {
            commit_count_column: Some("commits".to_string()),
            changed_file_count_column: Some("changed".to_string()),
            ..SchemaConfig::default()
        };
        let table = Table::from_rows(
            "prs.csv",
            ["number", "files", "commits", "changed"],
            vec![vec!["7", "a.sh", "2", "1"], vec!["8", "b.sh", "two", "1"]],
        );
        let adapter = schema.adapter();
        let err = adapter.normalize(&table).unwrap_err();
        assert!(matches!(err, SelectError::MalformedInput { line: 3, .. }));

        let table = Table::from_rows(
            "prs.csv",
            ["number", "files", "commits", "changed"],
            vec![vec!["7", "a.sh", "2", "1"]],
        );
        let records = adapter.normalize(&table).unwrap();
        assert_eq!(records[0].commit_count, Some(2));
        assert_eq!(records[0].declared_file_count, Some(1));
    }

    #[test]
    fn test_repeated_rows_group_by_first_appearance() {
        let schema = SchemaConfig {
            encoding: ChangedFilesEncoding::RepeatedRows,
            changed_files_column: "path".to_string(),
            ..SchemaConfig::default()
        };
        let table = Table::from_rows(
            "prs.csv",
            ["number", "path"],
            vec![
                vec!["10", "src/a.cpp"],
                vec!["11", "README.md"],
                vec!["10", "src/b.cpp"],
                vec!["12", ""],
            ],
        );
        let records = schema.adapter().normalize(&table).unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "11", "12"]);
        assert_eq!(records[0].changed_files, vec!["src/a.cpp", "src/b.cpp"]);
        assert_eq!(records[0].rows.len(), 2);
        assert!(records[2].changed_files.is_empty());
    }

    #[test]
    fn test_empty_id_is_malformed() {
        let table = Table::from_rows("prs.csv", ["number", "files"], vec![vec![" ", "a.cpp"]]);
        let err = delimited_schema().adapter().normalize(&table).unwrap_err();
        assert!(matches!(err, SelectError::MalformedInput { .. }));
    }

    #[test]
    fn test_diff_dir_reads_headers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("42.diff"),
            "diff --git a/src/old.cpp b/src/new.cpp\n--- a/src/old.cpp\n+++ b/src/new.cpp\n\
             diff --git a/ci.yml b/ci.yml\n",
        )
        .unwrap();

        let schema = SchemaConfig {
            encoding: ChangedFilesEncoding::DiffDir {
                dir: dir.path().to_path_buf(),
            },
            ..SchemaConfig::default()
        };
        let table = Table::from_rows("prs.csv", ["number"], vec![vec!["42"]]);
        let records = schema.adapter().normalize(&table).unwrap();
        assert_eq!(records[0].changed_files, vec!["src/new.cpp", "ci.yml"]);

        let table = Table::from_rows("prs.csv", ["number"], vec![vec!["43"]]);
        let err = schema.adapter().normalize(&table).unwrap_err();
        assert!(matches!(err, SelectError::MalformedInput { .. }));
    }
}
