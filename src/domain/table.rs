// ============================================================
// Layer 3 — Raw Table Domain Type
// ============================================================
// A CSV file as it was read from disk: a header row plus rows
// of untyped string cells. No column is parsed as a number
// until a pipeline step asks for it, so identifier columns
// that hold free text (e.g. "XXXConfid") can be dropped first
// without ever being parsed.
//
// Column operations mirror what the training scripts need:
//   - drop columns, tolerating ones that are absent
//   - select an exact column list, failing on absent ones
//   - read one column as numbers
//   - append a derived column
//
// Reference: Rust Book §8 (Vectors, Strings)

use anyhow::{bail, Result};

/// A header row plus untyped string rows.
/// Invariant: every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows:    Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, checking that every row matches the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            bail!(
                "row {} has {} cells but the header has {} columns",
                i + 1,
                row.len(),
                headers.len()
            );
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Remove each named column that exists. Absent names are skipped.
    /// Returns the names that were actually dropped.
    pub fn drop_columns_if_present(&mut self, names: &[&str]) -> Vec<String> {
        let mut dropped = Vec::new();
        for name in names {
            if let Some(idx) = self.column_index(name) {
                self.headers.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
                dropped.push(name.to_string());
            }
        }
        dropped
    }

    /// Keep exactly `names`, in that order. Every name must exist.
    pub fn select(&self, names: &[&str]) -> Result<RawTable> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| self.column_index(n).is_none())
            .collect();
        if !missing.is_empty() {
            bail!(
                "missing required column(s) {:?}; available columns are {:?}",
                missing,
                self.headers
            );
        }

        let indices: Vec<usize> = names
            .iter()
            .filter_map(|n| self.column_index(n))
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(RawTable {
            headers: names.iter().map(|n| n.to_string()).collect(),
            rows,
        })
    }

    /// Borrow the cells of one column.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let Some(idx) = self.column_index(name) else {
            bail!("column '{name}' not found; available columns are {:?}", self.headers);
        };
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parse one column as f64. Empty, non-numeric and non-finite
    /// ("NaN", "inf") cells are errors, reported with their 1-based
    /// data row number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| {
                        anyhow::anyhow!("row {}: column '{name}' has non-numeric value {cell:?}", i + 1)
                    })
            })
            .collect()
    }

    /// Append a derived column at the end of the table.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            bail!(
                "derived column has {} values but the table has {} rows",
                values.len(),
                self.rows.len()
            );
        }
        self.headers.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }
}
