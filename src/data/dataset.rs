// ============================================================
// Layer 4 — Numeric Dataset
// ============================================================
// The typed form of a table once feature columns have been
// parsed: a dense row-major feature matrix plus one target per
// row. `T` is `usize` (a class code) for the classifier and
// `f64` for the regressor.

use anyhow::{bail, Result};

use crate::domain::table::RawTable;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T> {
    /// Column names, in the same order as each record's values
    pub feature_names: Vec<String>,

    /// One Vec per row, `feature_names.len()` values each
    pub records: Vec<Vec<f64>>,

    /// One target per row
    pub targets: Vec<T>,
}

impl<T: Clone> Dataset<T> {
    pub fn new(feature_names: Vec<String>, records: Vec<Vec<f64>>, targets: Vec<T>) -> Result<Self> {
        if records.len() != targets.len() {
            bail!(
                "dataset has {} records but {} targets",
                records.len(),
                targets.len()
            );
        }
        if let Some(row) = records.iter().find(|r| r.len() != feature_names.len()) {
            bail!(
                "record has {} values but {} features are declared",
                row.len(),
                feature_names.len()
            );
        }
        Ok(Self { feature_names, records, targets })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Copy out the rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            records:       indices.iter().map(|&i| self.records[i].clone()).collect(),
            targets:       indices.iter().map(|&i| self.targets[i].clone()).collect(),
        }
    }
}

/// Parse `features` out of `table` into a row-major matrix.
pub fn feature_matrix(table: &RawTable, features: &[&str]) -> Result<Vec<Vec<f64>>> {
    let columns: Vec<Vec<f64>> = features
        .iter()
        .map(|name| table.numeric_column(name))
        .collect::<Result<_>>()?;

    Ok((0..table.len())
        .map(|row| columns.iter().map(|col| col[row]).collect())
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            vec!["a".into(), "b".into(), "y".into()],
            vec![
                vec!["1".into(), "10".into(), "0".into()],
                vec!["2".into(), "20".into(), "1".into()],
                vec!["3".into(), "30".into(), "0".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_feature_matrix_is_row_major() {
        let m = feature_matrix(&table(), &["b", "a"]).unwrap();
        assert_eq!(m, vec![vec![10.0, 1.0], vec![20.0, 2.0], vec![30.0, 3.0]]);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let names = vec!["a".to_string()];
        assert!(Dataset::new(names.clone(), vec![vec![1.0]], vec![0usize, 1]).is_err());
        assert!(Dataset::new(names, vec![vec![1.0, 2.0]], vec![0usize]).is_err());
    }

    #[test]
    fn test_subset_keeps_row_alignment() {
        let records = feature_matrix(&table(), &["a"]).unwrap();
        let ds      = Dataset::new(vec!["a".into()], records, vec![10usize, 20, 30]).unwrap();
        let sub     = ds.subset(&[2, 0]);
        assert_eq!(sub.records, vec![vec![3.0], vec![1.0]]);
        assert_eq!(sub.targets, vec![30, 10]);
        assert_eq!(sub.n_features(), 1);
    }
}
