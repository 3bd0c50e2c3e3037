// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Held-out scores printed at the end of a training run. They
// are for human inspection and are never written to disk.
//
//   ConfusionMatrix   — counts of (actual, predicted) class
//                       pairs. Rows = actual class, columns =
//                       predicted class, both in category order.
//
//   RegressionMetrics — MAE, RMSE and R² of a regressor.
//
// Example confusion matrix (Display), two classes:
//   [[268  10]
//    [ 23 144]]
//   268 true negatives, 10 false positives,
//   23 false negatives, 144 true positives.

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    classes: Vec<String>,
    counts:  Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tally actual vs predicted class codes.
    pub fn from_codes(classes: Vec<String>, actual: &[usize], predicted: &[usize]) -> Result<Self> {
        if actual.len() != predicted.len() {
            bail!(
                "{} actual labels but {} predictions",
                actual.len(),
                predicted.len()
            );
        }
        let k = classes.len();
        let mut counts = vec![vec![0usize; k]; k];
        for (&a, &p) in actual.iter().zip(predicted) {
            if a >= k || p >= k {
                bail!("class code out of range: actual={a}, predicted={p}, classes={k}");
            }
            counts[a][p] += 1;
        }
        Ok(Self { classes, counts })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.counts.len()).map(|i| self.counts[i][i]).sum()
    }

    /// Fraction on the diagonal; 0.0 for an empty matrix
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0     => 0.0,
            total => self.correct() as f64 / total as f64,
        }
    }
}

/// numpy-style layout, e.g. `[[ 5  1]\n [ 0 10]]`
impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        write!(f, "[")?;
        for (i, row) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            let cells: Vec<String> = row.iter().map(|c| format!("{c:>width$}")).collect();
            write!(f, "[{}]", cells.join(" "))?;
        }
        write!(f, "]")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub n:    usize,
    pub mae:  f64,
    pub rmse: f64,
    pub r2:   f64,
}

impl RegressionMetrics {
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        if actual.len() != predicted.len() {
            bail!("{} actual values but {} predictions", actual.len(), predicted.len());
        }
        if actual.is_empty() {
            bail!("cannot score an empty test set");
        }

        let n      = actual.len() as f64;
        let mean   = actual.iter().sum::<f64>() / n;
        let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
        let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
        let mae         = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum::<f64>() / n;

        // A constant target has no variance to explain
        let r2 = if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            1.0 - ss_res / ss_tot
        };

        Ok(Self {
            n: actual.len(),
            mae,
            rmse: (ss_res / n).sqrt(),
            r2,
        })
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} | MAE={:.4} | RMSE={:.4} | R²={:.4}",
            self.n, self.mae, self.rmse, self.r2
        )
    }
}
