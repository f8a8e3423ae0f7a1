//! One project's selection run: load, filter, emit.
//!
//! The run is all-or-nothing. Every error surfaces before any output is
//! produced, and the output is built in memory before it is written.

use crate::config::SelectionConfig;
use csv::StringRecord;
use pr_records::{parser, writer, PatternSet, Result, SchemaConfig, SelectWarning, Table};
use std::path::Path;
use tracing::{info, warn};

/// Counts describing a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    /// Pull requests after normalization
    pub pull_requests: usize,
    /// Pull requests selected as candidates
    pub candidates: usize,
    /// Source rows emitted (more than `candidates` for repeated-row exports)
    pub rows_emitted: usize,
    /// Rules consulted, including builtin ones
    pub rules: usize,
    pub warnings: Vec<SelectWarning>,
}

/// The selected rows of a PR source, ready to be written
#[derive(Debug, Clone)]
pub struct Selection {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    pub report: SelectionReport,
}

impl Selection {
    /// Serialize header and rows to CSV
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        writer::to_csv_bytes(&self.headers, &self.rows)
    }

    /// Write the selection to `path`, replacing it atomically
    pub fn write_to(&self, path: &Path) -> Result<()> {
        writer::persist_atomically(path, &self.to_csv_bytes()?)
    }
}

/// Run the selection over an already loaded PR table.
///
/// ## Steps
/// 1. Normalize rows into records with the schema's adapter
/// 2. Compile patterns and build the filter pipeline
/// 3. Apply the pipeline
/// 4. Collect the source rows of the kept records in file order
pub fn select_candidates(
    table: &Table,
    patterns: &PatternSet,
    config: &SelectionConfig,
) -> Result<Selection> {
    config.validate()?;

    let adapter = config.schema.adapter();
    let records = adapter.normalize(table)?;
    let pull_requests = records.len();

    let (pipeline, rules) = config.build_pipeline(patterns)?;
    let mut warnings = Vec::new();
    if patterns.is_empty() {
        let warning = SelectWarning::EmptyPatternSet {
            input: patterns.label.clone(),
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    let selected = pipeline.apply(records)?;
    let candidates = selected.len();

    let mut rows: Vec<_> = selected.into_iter().flat_map(|record| record.rows).collect();
    rows.sort_by_key(|row| row.line);
    let rows: Vec<StringRecord> = rows.into_iter().map(|row| row.record).collect();

    info!(
        "{}: selected {} of {} pull requests ({} rows) using {} rules",
        table.label,
        candidates,
        pull_requests,
        rows.len(),
        rules
    );

    Ok(Selection {
        headers: table.headers.clone(),
        report: SelectionReport {
            pull_requests,
            candidates,
            rows_emitted: rows.len(),
            rules,
            warnings,
        },
        rows,
    })
}

/// True for pattern files that hold a bare list rather than CSV
pub fn is_plain_pattern_list(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("txt") | Some("lst")
    )
}

/// Load a pattern source; `plain` overrides the extension-based guess
pub fn load_patterns(path: &Path, schema: &SchemaConfig, plain: Option<bool>) -> Result<PatternSet> {
    let plain = plain.unwrap_or_else(|| is_plain_pattern_list(path));
    parser::read_patterns_from_path(path, schema, plain)
}

/// Load both sources from files and run the selection
pub fn select_from_paths(
    pull_requests: &Path,
    patterns: &Path,
    plain_patterns: Option<bool>,
    config: &SelectionConfig,
) -> Result<Selection> {
    let table = parser::read_table_from_path(pull_requests)?;
    let patterns = load_patterns(patterns, &config.schema, plain_patterns)?;
    select_candidates(&table, &patterns, config)
}
