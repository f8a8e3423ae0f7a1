//! Parsers for the two selection inputs.
//!
//! - PR source: CSV with a header row, loaded whole into a `Table`
//! - pattern source: CSV with a pattern column, or a plain list with one pattern per line
//! - changed-file cells and `diff --git` headers

use crate::error::{Result, SelectError};
use crate::schema::SchemaConfig;
use crate::types::{PatternRecord, PatternSet, SourceRow, Table};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a whole CSV source into memory.
///
/// Rows may be shorter or longer than the header; the adapters decide whether
/// a missing field is an error, so the reader itself is flexible. A row the
/// reader cannot decode (bad quoting, invalid UTF-8) is `MalformedInput`.
pub fn read_table<R: Read>(label: &str, reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| row_error(label, &StringRecord::new(), e))?
        .clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| row_error(label, &headers, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        rows.push(SourceRow { line, record });
    }

    Ok(Table {
        label: label.to_string(),
        headers,
        rows,
    })
}

/// Attach source position to a CSV error; errors without one stay `CsvError`
fn row_error(label: &str, headers: &StringRecord, err: csv::Error) -> SelectError {
    let Some(line) = err.position().map(|pos| pos.line()) else {
        return SelectError::CsvError(err);
    };
    let column = match err.kind() {
        csv::ErrorKind::Utf8 { err: utf8, .. } => headers.get(utf8.field()).unwrap_or("<row>"),
        _ => "<row>",
    };
    SelectError::MalformedInput {
        input: label.to_string(),
        line,
        column: column.to_string(),
        reason: err.to_string(),
    }
}

/// Open and read a CSV file
pub fn read_table_from_path(path: &Path) -> Result<Table> {
    let file = open(path)?;
    read_table(&path.display().to_string(), file)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SelectError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => SelectError::IoError(e),
    })
}

/// Build a pattern set from a CSV pattern table.
///
/// A blank pattern cell is malformed: an empty pattern would match every path.
pub fn parse_pattern_table(table: &Table, schema: &SchemaConfig) -> Result<PatternSet> {
    let pattern_idx = table.column_index(&schema.pattern_column)?;
    let category_idx = schema
        .category_column
        .as_deref()
        .map(|column| table.column_index(column))
        .transpose()?;

    let mut patterns = PatternSet::new(&table.label);
    for row in &table.rows {
        let pattern = table
            .required_field(row, pattern_idx, &schema.pattern_column)?
            .trim();
        if pattern.is_empty() {
            return Err(table.malformed(row, &schema.pattern_column, "pattern is blank"));
        }

        let category = category_idx
            .and_then(|idx| row.record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        patterns.push(PatternRecord {
            pattern: pattern.to_string(),
            category,
            line: row.line,
        });
    }
    Ok(patterns)
}

/// Parse a plain pattern list, one pattern per line.
///
/// Surrounding whitespace is trimmed. A blank line before the last pattern is
/// malformed; trailing blank lines at the end of the file are ignored.
pub fn parse_pattern_lines(label: &str, text: &str) -> Result<PatternSet> {
    let lines: Vec<&str> = text.lines().collect();
    let used = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |idx| idx + 1);

    let mut patterns = PatternSet::new(label);
    for (idx, line) in lines[..used].iter().enumerate() {
        let line_no = idx as u64 + 1;
        let pattern = line.trim();
        if pattern.is_empty() {
            return Err(SelectError::MalformedInput {
                input: label.to_string(),
                line: line_no,
                column: "pattern".to_string(),
                reason: "pattern is blank".to_string(),
            });
        }
        patterns.push(PatternRecord {
            pattern: pattern.to_string(),
            category: None,
            line: line_no,
        });
    }
    Ok(patterns)
}

/// Read patterns from a file, as CSV or as a plain list
pub fn read_patterns_from_path(
    path: &Path,
    schema: &SchemaConfig,
    plain: bool,
) -> Result<PatternSet> {
    if plain {
        let mut text = String::new();
        open(path)?.read_to_string(&mut text)?;
        parse_pattern_lines(&path.display().to_string(), &text)
    } else {
        let table = read_table_from_path(path)?;
        parse_pattern_table(&table, schema)
    }
}

/// Split a changed-files cell into paths.
///
/// Example: "src/a.cpp; src/b.h" -> ["src/a.cpp", "src/b.h"]
///          `["a.py", "b.py"]`  -> ["a.py", "b.py"]
///          ""                   -> []
///
/// Returns the reason as text so the caller can attach row context.
pub fn split_changed_files(
    cell: &str,
    delimiter: &str,
) -> std::result::Result<Vec<String>, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(Vec::new());
    }

    if cell.starts_with('[') {
        let paths: Vec<String> = serde_json::from_str(cell)
            .map_err(|e| format!("changed-files list is not a JSON array of strings: {e}"))?;
        return Ok(paths
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect());
    }

    Ok(cell
        .split(delimiter)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect())
}

/// Extract changed paths from the `diff --git` headers of a unified diff.
///
/// Renames contribute the new path. Headers that do not split into exactly
/// four fields (paths with spaces) are skipped.
pub fn parse_diff_paths(diff: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for line in diff.lines() {
        if !line.starts_with("diff --git ") {
            continue;
        }
        let elements: Vec<&str> = line.split_whitespace().collect();
        if elements.len() != 4 {
            continue;
        }
        let old = elements[2].strip_prefix("a/").unwrap_or(elements[2]);
        let new = elements[3].strip_prefix("b/").unwrap_or(elements[3]);
        if old == new {
            paths.push(old.to_string());
        } else {
            paths.push(new.to_string());
        }
    }
    paths
}
