// ============================================================
// Layer 4 — Column Encoders
// ============================================================
// Turns raw string columns into model-ready values:
//
//   categorize()       — a label column → dense class codes
//                        (0..n_classes) plus the ordered list of
//                        category names, so the forest learns a
//                        classification task instead of fitting
//                        the label as a number
//
//   indicator_column() — a categorical column → a 0/1 column
//                        for one chosen value (one-hot with the
//                        other category dropped)
//
// Category order: numeric when every value parses as a number
// (so "0" < "1" < "10"), lexical otherwise.

use anyhow::{bail, Result};

use crate::domain::table::RawTable;

/// A categorical label column after encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalLabels {
    /// Category names, in code order (code i ↔ classes[i])
    pub classes: Vec<String>,

    /// One class code per row
    pub codes: Vec<usize>,
}

impl CategoricalLabels {
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

/// Encode a label column into class codes.
pub fn categorize(cells: &[&str]) -> Result<CategoricalLabels> {
    if let Some(row) = cells.iter().position(|c| c.trim().is_empty()) {
        bail!("row {}: label is empty", row + 1);
    }

    let numeric: Option<Vec<f64>> = cells.iter().map(|c| c.trim().parse::<f64>().ok()).collect();

    match numeric {
        Some(values) => {
            if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                bail!("row {}: label '{}' is not a finite number", row + 1, cells[row].trim());
            }
            Ok(categorize_numeric(cells, &values))
        }
        None => Ok(categorize_text(cells)),
    }
}

/// Numeric labels: "1" and "1.0" are the same category, named by
/// the spelling that appeared first.
fn categorize_numeric(cells: &[&str], values: &[f64]) -> CategoricalLabels {
    let mut distinct: Vec<(f64, String)> = Vec::new();
    for (cell, &v) in cells.iter().zip(values) {
        if !distinct.iter().any(|(d, _)| *d == v) {
            distinct.push((v, cell.trim().to_string()));
        }
    }
    distinct.sort_by(|a, b| a.0.total_cmp(&b.0));

    let codes = values
        .iter()
        .map(|v| distinct.iter().position(|(d, _)| d == v).unwrap_or_default())
        .collect();

    CategoricalLabels {
        classes: distinct.into_iter().map(|(_, name)| name).collect(),
        codes,
    }
}

fn categorize_text(cells: &[&str]) -> CategoricalLabels {
    let mut classes: Vec<String> = cells.iter().map(|c| c.trim().to_string()).collect();
    classes.sort();
    classes.dedup();

    let codes = cells
        .iter()
        .map(|c| classes.iter().position(|k| k == c.trim()).unwrap_or_default())
        .collect();

    CategoricalLabels { classes, codes }
}

/// Append `new_name` = 1 where `column` equals `positive`, else 0.
/// An empty cell is an error; any other value maps to 0.
pub fn indicator_column(
    table:    &mut RawTable,
    column:   &str,
    positive: &str,
    new_name: &str,
) -> Result<()> {
    let values: Vec<String> = table
        .column(column)?
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            if cell.is_empty() {
                bail!("row {}: column '{column}' is empty", i + 1);
            }
            Ok(if cell == positive { "1" } else { "0" }.to_string())
        })
        .collect::<Result<_>>()?;

    table.push_column(new_name, values)?;
    tracing::debug!("Encoded '{}' into indicator '{}'", column, new_name);
    Ok(())
}
