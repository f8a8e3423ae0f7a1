//! Output side of a selection.
//!
//! Nothing reaches the output channel until the whole selection has been
//! serialized, so a failed run never leaves a partial file behind.

use crate::error::Result;
use csv::StringRecord;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize a header and rows to CSV bytes
pub fn to_csv_bytes<'a, I>(headers: &StringRecord, rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a StringRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::error::SelectError::IoError(e.into_error()))
}

/// Replace `path` with `bytes` in one step.
///
/// The data is written to a temporary file next to the target and renamed
/// over it only once fully flushed.
pub fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_written_verbatim() {
        let headers = StringRecord::from(vec!["number", "title", "files"]);
        let rows = vec![
            StringRecord::from(vec!["1", "Fix, planner", "src/a.cpp"]),
            StringRecord::from(vec!["3", "Ci", "ci.yml"]),
        ];
        let bytes = to_csv_bytes(&headers, &rows).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "number,title,files\n1,\"Fix, planner\",src/a.cpp\n3,Ci,ci.yml\n"
        );
    }

    #[test]
    fn test_persist_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        std::fs::write(&target, "stale").unwrap();

        persist_atomically(&target, b"number\n1\n").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "number\n1\n");
    }
}
