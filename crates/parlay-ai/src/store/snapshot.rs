use std::io::Read;
use std::path::Path;

use serde_json::Value;

use super::Row;

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "failed to read snapshot: {}", err),
            SnapshotError::Csv(err) => write!(f, "invalid snapshot CSV data: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SnapshotError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub fn load_rows_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Row>, SnapshotError> {
    let file = std::fs::File::open(path)?;
    load_rows(file)
}

/// Reads a CSV export into store rows. Cells are kept as verbatim text; blank cells become null.
pub fn load_rows<R: Read>(reader: R) -> Result<Vec<Row>, SnapshotError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (index, header) in headers.iter().enumerate() {
            let value = match record.get(index) {
                Some(cell) if !cell.trim().is_empty() => Value::String(cell.to_string()),
                _ => Value::Null,
            };
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    Ok(rows)
}
