// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads a CSV file with a header row into a RawTable using the
// `csv` crate. Every cell is kept as a trimmed string; parsing
// into numbers happens later, per selected column.
//
// Unlike a lenient loader, a missing file or a malformed row is
// an error here: training is a supervised batch job and should
// stop loudly rather than fit on a partial table.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{io::Read, path::PathBuf};

use crate::domain::table::RawTable;
use crate::domain::traits::TableSource;

/// Loads a single CSV file from disk.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for CsvLoader {
    fn load(&self) -> Result<RawTable> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Cannot open CSV file '{}'", self.path.display()))?;

        let table = read_table(file)
            .with_context(|| format!("Cannot parse CSV file '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} rows from '{}'",
            table.len(),
            self.path.display()
        );
        tracing::info!("Columns: {:?}", table.headers());
        Ok(table)
    }
}

/// Read CSV text (header row first) from any reader.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Cannot read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        // csv reports ragged rows itself, with line positions
        let record = record.with_context(|| format!("Malformed CSV record {}", i + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    RawTable::new(headers, rows)
}
