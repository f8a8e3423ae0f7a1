//! Schema mapping between project exports and the selection's logical fields.
//!
//! Each project's closed-PR export names its columns differently, so the
//! columns the filter depends on are spelled out once per project instead of
//! being accessed by position.
//!
//! ```yaml
//! id_column: number
//! changed_files_column: files
//! commit_count_column: commits          # optional
//! changed_file_count_column: changed    # optional
//! encoding:
//!   kind: delimited
//!   delimiter: ";"
//! pattern_column: pattern
//! category_column: category             # optional
//! ```

use crate::adapter::{ChangedFilesAdapter, DelimitedColumnAdapter, DiffDirAdapter, RepeatedRowAdapter};
use crate::error::{Result, SelectError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the changed files of a pull request are encoded in the PR source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangedFilesEncoding {
    /// One row per PR; the changed-files cell holds a delimited list or a JSON array
    Delimited {
        #[serde(default = "default_delimiter")]
        delimiter: String,
    },
    /// One row per (PR, file) pair; rows sharing an id form one PR
    RepeatedRows,
    /// Changed files come from `<dir>/<id>.diff` unified diffs
    DiffDir { dir: PathBuf },
}

impl Default for ChangedFilesEncoding {
    fn default() -> Self {
        ChangedFilesEncoding::Delimited {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_id_column() -> String {
    "number".to_string()
}

fn default_changed_files_column() -> String {
    "files".to_string()
}

fn default_pattern_column() -> String {
    "pattern".to_string()
}

/// Column mapping for both input sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// PR identifier column
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Column holding the changed files (unused by the diff-directory encoding)
    #[serde(default = "default_changed_files_column")]
    pub changed_files_column: String,

    /// Declared number of commits in the PR
    #[serde(default)]
    pub commit_count_column: Option<String>,

    /// Declared number of changed files in the PR
    #[serde(default)]
    pub changed_file_count_column: Option<String>,

    #[serde(default)]
    pub encoding: ChangedFilesEncoding,

    /// Pattern string column in the pattern source
    #[serde(default = "default_pattern_column")]
    pub pattern_column: String,

    /// Category column in the pattern source
    #[serde(default)]
    pub category_column: Option<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            id_column: default_id_column(),
            changed_files_column: default_changed_files_column(),
            commit_count_column: None,
            changed_file_count_column: None,
            encoding: ChangedFilesEncoding::default(),
            pattern_column: default_pattern_column(),
            category_column: None,
        }
    }
}

impl SchemaConfig {
    /// Reject mappings that could never resolve against any header
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("id_column", Some(&self.id_column)),
            ("changed_files_column", Some(&self.changed_files_column)),
            ("commit_count_column", self.commit_count_column.as_ref()),
            ("changed_file_count_column", self.changed_file_count_column.as_ref()),
            ("pattern_column", Some(&self.pattern_column)),
            ("category_column", self.category_column.as_ref()),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(SelectError::ConfigError(format!("{key} must not be empty")));
                }
            }
        }

        if let ChangedFilesEncoding::Delimited { delimiter } = &self.encoding {
            if delimiter.is_empty() {
                return Err(SelectError::ConfigError(
                    "delimited encoding needs a non-empty delimiter".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The input adapter matching this schema's encoding
    pub fn adapter(&self) -> Box<dyn ChangedFilesAdapter> {
        match &self.encoding {
            ChangedFilesEncoding::Delimited { delimiter } => {
                Box::new(DelimitedColumnAdapter::new(self.clone(), delimiter.clone()))
            }
            ChangedFilesEncoding::RepeatedRows => Box::new(RepeatedRowAdapter::new(self.clone())),
            ChangedFilesEncoding::DiffDir { dir } => {
                Box::new(DiffDirAdapter::new(self.clone(), dir.clone()))
            }
        }
    }
}
