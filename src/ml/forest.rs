// ============================================================
// Layer 5 — Random Forests
// ============================================================
// Thin adapters over smartcore's random forests. Fitting and
// tree traversal belong to smartcore; this file owns what the
// rest of the crate needs around them:
//
//   - the feature names the model was fitted on
//   - the class names behind the integer codes (classifier)
//   - the hyper-parameters, kept for the artifact
//   - a structural self-check run when an artifact is loaded
//
//   classifier → majority vote over the trees
//   regressor  → mean of the trees' leaf values
//
// Reproducibility: smartcore seeds its bootstrap and per-split
// feature draws from `seed`, so the same seed and data always
// give the same forest.
//
// Reference: smartcore::ensemble documentation
//            Breiman (2001) Random Forests

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier as SmartForestClassifier, RandomForestClassifierParameters,
};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor as SmartForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

use crate::data::dataset::Dataset;
use crate::domain::traits::Predictor;

type ClassForest = SmartForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;
type ValueForest = SmartForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// How many features each split may examine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    All,
    Sqrt,
    Count(usize),
}

impl MaxFeatures {
    /// Resolve against the real feature count; always in 1..=n_features.
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::All      => n_features,
            MaxFeatures::Sqrt     => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Count(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Ensemble hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators:      usize,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf:  usize,
    pub max_features:      MaxFeatures,
    pub seed:              u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators:      100,
            max_depth:         None,
            min_samples_split: 2,
            min_samples_leaf:  1,
            max_features:      MaxFeatures::Sqrt,
            seed:              0,
        }
    }
}

impl ForestParams {
    fn classifier(&self, n_features: usize) -> Result<RandomForestClassifierParameters> {
        let mut p = RandomForestClassifierParameters::default()
            .with_n_trees(self.n_estimators.try_into().map_err(|_| anyhow!("too many trees"))?)
            .with_min_samples_split(self.min_samples_split.max(2))
            .with_min_samples_leaf(self.min_samples_leaf.max(1))
            .with_m(self.max_features.resolve(n_features))
            .with_seed(self.seed);
        if let Some(depth) = self.max_depth {
            p = p.with_max_depth(depth.try_into().map_err(|_| anyhow!("max_depth is too large"))?);
        }
        Ok(p)
    }

    fn regressor(&self, n_features: usize) -> Result<RandomForestRegressorParameters> {
        let mut p = RandomForestRegressorParameters::default()
            .with_n_trees(self.n_estimators.try_into().map_err(|_| anyhow!("too many trees"))?)
            .with_min_samples_split(self.min_samples_split.max(2))
            .with_min_samples_leaf(self.min_samples_leaf.max(1))
            .with_m(self.max_features.resolve(n_features))
            .with_seed(self.seed);
        if let Some(depth) = self.max_depth {
            p = p.with_max_depth(depth.try_into().map_err(|_| anyhow!("max_depth is too large"))?);
        }
        Ok(p)
    }
}

fn check_fit_input<T: Clone>(dataset: &Dataset<T>, params: &ForestParams) -> Result<()> {
    if params.n_estimators == 0 {
        bail!("a forest needs at least one tree");
    }
    if dataset.is_empty() {
        bail!("cannot fit a forest on an empty dataset");
    }
    if dataset.n_features() == 0 {
        bail!("cannot fit a forest on zero features");
    }
    Ok(())
}

/// Rows must be non-empty and all of the fitted width.
fn to_matrix(rows: &[Vec<f64>], n_features: usize) -> Result<DenseMatrix<f64>> {
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
        bail!(
            "row {} has {} features, the model expects {}",
            i,
            row.len(),
            n_features
        );
    }
    Ok(DenseMatrix::from_2d_vec(&rows.to_vec()))
}

// ─── Classifier ──────────────────────────────────────────────────────────────
#[derive(Serialize, Deserialize)]
pub struct RandomForestClassifier {
    feature_names: Vec<String>,
    classes:       Vec<String>,
    params:        ForestParams,
    forest:        ClassForest,
}

impl RandomForestClassifier {
    /// Fit on class codes; `classes[k]` names code k.
    pub fn fit(dataset: &Dataset<usize>, classes: Vec<String>, params: ForestParams) -> Result<Self> {
        if classes.is_empty() {
            bail!("a classifier needs at least one class");
        }
        if let Some(&bad) = dataset.targets.iter().find(|&&c| c >= classes.len()) {
            bail!("class code {bad} has no name ({} classes declared)", classes.len());
        }
        check_fit_input(dataset, &params)?;

        let x = to_matrix(&dataset.records, dataset.n_features())?;
        let y = dataset
            .targets
            .iter()
            .map(|&c| i32::try_from(c).context("class code out of range"))
            .collect::<Result<Vec<i32>>>()?;

        let forest = SmartForestClassifier::fit(&x, &y, params.classifier(dataset.n_features())?)
            .map_err(|e| anyhow!("random forest fit failed: {e}"))?;

        Ok(Self {
            feature_names: dataset.feature_names.clone(),
            classes,
            params,
            forest,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.params.n_estimators
    }

    /// Majority-vote class code per row
    pub fn predict_codes(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x     = to_matrix(rows, self.feature_names.len())?;
        let votes = self
            .forest
            .predict(&x)
            .map_err(|e| anyhow!("random forest prediction failed: {e}"))?;

        votes
            .into_iter()
            .map(|code| match usize::try_from(code) {
                Ok(c) if c < self.classes.len() => Ok(c),
                _ => Err(anyhow!("model voted for unknown class code {code}")),
            })
            .collect()
    }

    /// Structural checks for a model read back from disk.
    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            bail!("classifier lists no features");
        }
        if self.classes.is_empty() {
            bail!("classifier lists no classes");
        }
        if let Some((i, c)) = self.classes.iter().enumerate().find(|&(i, c)| self.classes[..i].contains(c)) {
            bail!("class '{c}' appears twice (position {i})");
        }
        if self.params.n_estimators == 0 {
            bail!("classifier has no trees");
        }
        self.predict_codes(&[vec![0.0; self.feature_names.len()]])
            .context("classifier cannot score a row")?;
        Ok(())
    }
}

impl fmt::Debug for RandomForestClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForestClassifier")
            .field("feature_names", &self.feature_names)
            .field("classes", &self.classes)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Predictor for RandomForestClassifier {
    type Output = String;

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<String>> {
        Ok(self
            .predict_codes(rows)?
            .into_iter()
            .map(|c| self.classes[c].clone())
            .collect())
    }
}

// ─── Regressor ───────────────────────────────────────────────────────────────
#[derive(Serialize, Deserialize)]
pub struct RandomForestRegressor {
    feature_names: Vec<String>,
    params:        ForestParams,
    forest:        ValueForest,
}

impl RandomForestRegressor {
    pub fn fit(dataset: &Dataset<f64>, params: ForestParams) -> Result<Self> {
        if dataset.targets.iter().any(|y| !y.is_finite()) {
            bail!("regression targets must be finite numbers");
        }
        check_fit_input(dataset, &params)?;

        let x = to_matrix(&dataset.records, dataset.n_features())?;
        let forest = SmartForestRegressor::fit(&x, &dataset.targets, params.regressor(dataset.n_features())?)
            .map_err(|e| anyhow!("random forest fit failed: {e}"))?;

        Ok(Self {
            feature_names: dataset.feature_names.clone(),
            params,
            forest,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.params.n_estimators
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            bail!("regressor lists no features");
        }
        if self.params.n_estimators == 0 {
            bail!("regressor has no trees");
        }
        self.predict(&[vec![0.0; self.feature_names.len()]])
            .context("regressor cannot score a row")?;
        Ok(())
    }
}

impl fmt::Debug for RandomForestRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomForestRegressor")
            .field("feature_names", &self.feature_names)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Predictor for RandomForestRegressor {
    type Output = f64;

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = to_matrix(rows, self.feature_names.len())?;
        self.forest
            .predict(&x)
            .map_err(|e| anyhow!("random forest prediction failed: {e}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// Two well-separated clusters on feature 0, noise on feature 1
    fn blobs() -> Dataset<usize> {
        let mut records = Vec::new();
        let mut targets = Vec::new();
        for i in 0..40 {
            let class = i % 2;
            let x     = if class == 0 { 1.0 + (i % 5) as f64 * 0.1 } else { 9.0 - (i % 5) as f64 * 0.1 };
            records.push(vec![x, (i * 7 % 11) as f64]);
            targets.push(class);
        }
        Dataset::new(vec!["signal".into(), "noise".into()], records, targets).unwrap()
    }

    fn params(seed: u64) -> ForestParams {
        ForestParams {
            n_estimators: 15,
            max_features: MaxFeatures::All,
            seed,
            ..ForestParams::default()
        }
    }

    fn binary() -> Vec<String> {
        vec!["0".into(), "1".into()]
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::All.resolve(10),       10);
        assert_eq!(MaxFeatures::Sqrt.resolve(10),      3);
        assert_eq!(MaxFeatures::Count(3).resolve(10),  3);
        assert_eq!(MaxFeatures::Count(50).resolve(10), 10);
        assert_eq!(MaxFeatures::Count(0).resolve(10),  1);
    }

    #[test]
    fn test_classifier_separates_blobs() {
        let model = RandomForestClassifier::fit(&blobs(), binary(), params(123)).unwrap();
        assert_eq!(model.n_trees(), 15);
        let preds = model.predict(&[vec![1.2, 3.0], vec![8.8, 3.0]]).unwrap();
        assert_eq!(preds, vec!["0", "1"]);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let a = RandomForestClassifier::fit(&blobs(), binary(), params(42)).unwrap();
        let b = RandomForestClassifier::fit(&blobs(), binary(), params(42)).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_wrong_width_row_is_an_error() {
        let model = RandomForestClassifier::fit(&blobs(), binary(), params(1)).unwrap();
        assert!(model.predict(&[vec![1.0]]).is_err());
    }

    #[test]
    fn test_undeclared_class_code_is_an_error() {
        assert!(RandomForestClassifier::fit(&blobs(), vec!["only".into()], params(1)).is_err());
    }

    #[test]
    fn test_zero_trees_is_an_error() {
        let p = ForestParams { n_estimators: 0, ..params(1) };
        assert!(RandomForestClassifier::fit(&blobs(), binary(), p).is_err());
    }

    #[test]
    fn test_fitted_models_pass_validation() {
        let model = RandomForestClassifier::fit(&blobs(), binary(), params(4)).unwrap();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_duplicate_class_names_fail_validation() {
        let mut model = RandomForestClassifier::fit(&blobs(), binary(), params(4)).unwrap();
        model.classes = vec!["0".into(), "0".into()];
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("appears twice"));
    }

    #[test]
    fn test_regressor_tracks_step_function() {
        let records: Vec<Vec<f64>> = (0..30).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64>      = (0..30).map(|i| if i < 15 { 10.0 } else { 50.0 }).collect();
        let ds = Dataset::new(vec!["x".into()], records, targets).unwrap();

        let model = RandomForestRegressor::fit(&ds, params(9)).unwrap();
        let preds = model.predict(&[vec![2.0], vec![27.0]]).unwrap();
        assert!((preds[0] - 10.0).abs() < 1e-9);
        assert!((preds[1] - 50.0).abs() < 1e-9);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_regressor_rejects_non_finite_targets() {
        let ds = Dataset::new(vec!["x".into()], vec![vec![1.0], vec![2.0]], vec![1.0, f64::NAN]).unwrap();
        assert!(RandomForestRegressor::fit(&ds, params(1)).is_err());
    }

    #[test]
    fn test_predict_one_matches_predict() {
        let model = RandomForestClassifier::fit(&blobs(), binary(), params(2)).unwrap();
        let row   = vec![8.9, 1.0];
        assert_eq!(model.predict_one(&row).unwrap(), model.predict(&[row.clone()]).unwrap()[0]);
    }
}
