// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Partitions row indices into a training set (used to fit the
// forest) and a held-out test set (used to score it).
//
// Two strategies:
//
//   shuffle_split()    — seeded Fisher-Yates shuffle, then cut.
//                        Used by the regressor.
//
//   stratified_split() — every class keeps its share of rows in
//                        both partitions. Used by the classifier.
//
// Both are driven by an explicit u64 seed through StdRng, so a
// given (input, seed) pair always produces the same partition.
//
// Sizes follow the usual convention: the test set gets
// ceil(n * test_fraction) rows, the training set the rest.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Row indices for each partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

/// Compute (n_train, n_test), rejecting splits that leave a side empty.
fn partition_sizes(n: usize, test_fraction: f64) -> Result<(usize, usize)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        bail!("test fraction must be strictly between 0 and 1, got {test_fraction}");
    }
    let n_test  = ((n as f64) * test_fraction).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_train == 0 || n_test == 0 {
        bail!(
            "cannot split {n} rows with test fraction {test_fraction}: \
             one partition would be empty"
        );
    }
    Ok((n_train, n_test))
}

/// Shuffle indices 0..n with a seeded RNG and cut off the test set.
pub fn shuffle_split(n: usize, test_fraction: f64, seed: u64) -> Result<SplitIndices> {
    let (_, n_test) = partition_sizes(n, test_fraction)?;

    let mut rng     = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    // split_off(k) leaves [0..k) in `indices` and returns [k..n)
    let train = indices.split_off(n_test);
    let test  = indices;

    tracing::debug!("Shuffle split: {} train, {} test", train.len(), test.len());
    Ok(SplitIndices { train, test })
}

/// Split so that each class's proportion is preserved.
///
/// `labels[i]` is the class code of row i. Every class needs at least
/// two rows, and each partition must be able to hold one row per class.
pub fn stratified_split(labels: &[usize], test_fraction: f64, seed: u64) -> Result<SplitIndices> {
    let n                 = labels.len();
    let (n_train, n_test) = partition_sizes(n, test_fraction)?;

    let n_classes = labels.iter().max().map_or(0, |&m| m + 1);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (row, &class) in labels.iter().enumerate() {
        members[class].push(row);
    }
    let members: Vec<(usize, Vec<usize>)> = members
        .into_iter()
        .enumerate()
        .filter(|(_, rows)| !rows.is_empty())
        .collect();

    if let Some((class, rows)) = members.iter().find(|(_, rows)| rows.len() < 2) {
        bail!(
            "cannot stratify: class {class} has only {} row(s), at least 2 are required",
            rows.len()
        );
    }
    if n_test < members.len() || n_train < members.len() {
        bail!(
            "cannot stratify {} classes into {n_train} train / {n_test} test rows",
            members.len()
        );
    }

    let counts: Vec<usize>   = members.iter().map(|(_, rows)| rows.len()).collect();
    let test_counts          = allocate(&counts, n_test);

    let mut rng   = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test  = Vec::with_capacity(n_test);

    for ((_, rows), &k) in members.iter().zip(&test_counts) {
        let mut rows = rows.clone();
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..k]);
        train.extend_from_slice(&rows[k..]);
    }

    // Interleave classes so neither partition is grouped by label
    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    tracing::debug!(
        "Stratified split: {} train, {} test over {} classes",
        train.len(),
        test.len(),
        members.len()
    );
    Ok(SplitIndices { train, test })
}

/// Share `total` slots across groups proportionally to `counts`.
///
/// Each group first gets the floor of its exact share; leftover slots
/// go to the largest fractional remainders (ties → lower group index).
/// No group receives more slots than it has members.
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| total as f64 * c as f64 / n as f64)
        .collect();

    let mut alloc: Vec<usize> = exact.iter().map(|e| e.floor() as usize).collect();
    let mut remaining = total.saturating_sub(alloc.iter().sum());

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    while remaining > 0 {
        let before = remaining;
        for &g in &order {
            if remaining == 0 {
                break;
            }
            if alloc[g] < counts[g] {
                alloc[g]  += 1;
                remaining -= 1;
            }
        }
        if remaining == before {
            break;
        }
    }
    alloc
}
