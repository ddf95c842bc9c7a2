//! Load → expand → split → scale → fit four regressors → report.

use std::fmt;
use std::path::PathBuf;

use log::info;
use ndarray::array;

use crate::dataset::{ColumnSummary, Dataset, Table};
use crate::datasets::make_regression;
use crate::error::{Error, Result};
use crate::linear_model::{ElasticNet, Lasso, LinearRegression, Regressor, Ridge};
use crate::preprocessing::{PolynomialFeatures, StandardScaler};
use crate::report::{CoefficientListing, ScoreRow, ScoreTable, coefficient_table};

#[derive(Clone, Debug, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    /// Seeded linear data with four predictors, one of them irrelevant.
    Synthetic { n_samples: usize },
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub source: DataSource,
    pub delimiter: char,
    pub target: String,
    pub degree: usize,
    pub test_size: f64,
    pub seed: u64,
    pub ridge_alpha: f64,
    pub lasso_alpha: f64,
    pub enet_alpha: f64,
    pub l1_ratio: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DataSource::File(PathBuf::from("winequality-red.csv")),
            delimiter: ';',
            target: "quality".to_string(),
            degree: 2,
            test_size: 0.7,
            seed: 42,
            ridge_alpha: 0.01,
            lasso_alpha: 0.01,
            enet_alpha: 0.01,
            l1_ratio: 0.5,
            max_iter: 10_000,
            tolerance: 1e-4,
        }
    }
}

impl PipelineConfig {
    pub fn regressors(&self) -> Vec<Box<dyn Regressor>> {
        vec![
            Box::new(LinearRegression::new()),
            Box::new(Ridge::new().alpha(self.ridge_alpha)),
            Box::new(
                Lasso::new()
                    .alpha(self.lasso_alpha)
                    .max_iter(self.max_iter)
                    .tolerance(self.tolerance),
            ),
            Box::new(
                ElasticNet::new()
                    .alpha(self.enet_alpha)
                    .l1_ratio(self.l1_ratio)
                    .max_iter(self.max_iter)
                    .tolerance(self.tolerance),
            ),
        ]
    }

    /// Every hyperparameter error is reported here, before any data is read.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::invalid(
                "test_size",
                format!("must be between 0 and 1 exclusive, got {}", self.test_size),
            ));
        }
        if self.degree == 0 {
            return Err(Error::invalid("degree", "must be at least 1"));
        }
        if let DataSource::Synthetic { n_samples: 0 } = self.source {
            return Err(Error::invalid("n_samples", "must be at least 1"));
        }
        for model in self.regressors() {
            model.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct ModelReport {
    pub name: String,
    pub intercept: f64,
    pub coefficients: Vec<(String, f64)>,
}

#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub n_rows: usize,
    pub n_raw_features: usize,
    pub n_expanded_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub null_counts: Vec<(String, usize)>,
    pub summary: Vec<ColumnSummary>,
    pub scores: Vec<ScoreRow>,
    pub models: Vec<ModelReport>,
}

fn load(config: &PipelineConfig) -> Result<Table> {
    match &config.source {
        DataSource::File(path) => Table::from_path(path, config.delimiter),
        DataSource::Synthetic { n_samples } => {
            let data = make_regression(*n_samples, &array![3.0, -2.0, 0.0, 1.5], 5.0, 1.0, config.seed)?;
            let mut names = data.feature_names.clone();
            names.push(config.target.clone());
            let mut columns: Vec<_> = data.features.columns().into_iter().map(|c| c.to_owned()).collect();
            columns.push(data.targets);
            Table::new(names, columns)
        }
    }
}

pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;

    let table = load(config)?;
    let null_counts = table.null_counts();
    let summary = table.describe();
    let raw = table.to_dataset(&config.target)?;
    info!("dataset has {} rows and {} predictors", raw.n_samples(), raw.n_features());

    let mut poly = PolynomialFeatures::new().degree(config.degree);
    let expanded = poly.fit_transform(&raw.features)?;
    let names = poly.feature_names(&raw.feature_names)?;
    let dataset = Dataset::with_feature_names(names, expanded, raw.targets.clone())?;
    info!("expanded to {} polynomial features", dataset.n_features());

    let (train, test) = dataset.train_test_split(config.test_size, config.seed)?;
    info!("train rows: {}, test rows: {}", train.n_samples(), test.n_samples());

    let mut scaler = StandardScaler::new();
    let x_train = scaler.fit_transform(&train.features)?;
    let x_test = scaler.transform(&test.features)?;

    let mut scores = Vec::new();
    let mut models = Vec::new();
    for regressor in config.regressors() {
        let name = regressor.name();
        let model = regressor.fit(&x_train, &train.targets)?;
        let train_r2 = model.score(&x_train, &train.targets)?;
        let test_r2 = model.score(&x_test, &test.targets)?;
        info!("{name}: train R² {train_r2:.4}, test R² {test_r2:.4}");

        models.push(ModelReport {
            name: name.clone(),
            intercept: model.intercept(),
            coefficients: coefficient_table(&dataset.feature_names, &model)?,
        });
        scores.push(ScoreRow {
            model: name,
            train_r2,
            test_r2,
        });
    }

    Ok(PipelineReport {
        n_rows: raw.n_samples(),
        n_raw_features: raw.n_features(),
        n_expanded_features: dataset.n_features(),
        n_train: train.n_samples(),
        n_test: test.n_samples(),
        null_counts,
        summary,
        scores,
        models,
    })
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dataset: {} rows, {} predictors, {} after polynomial expansion",
            self.n_rows, self.n_raw_features, self.n_expanded_features
        )?;
        writeln!(f, "Training samples: {}, Test samples: {}\n", self.n_train, self.n_test)?;

        writeln!(f, "Missing values per column:")?;
        for (name, count) in &self.null_counts {
            writeln!(f, "  {name}: {count}")?;
        }
        writeln!(f)?;

        writeln!(f, "{}", crate::report::SummaryTable(&self.summary))?;
        writeln!(f, "{}", ScoreTable(&self.scores))?;

        for model in &self.models {
            let listing = CoefficientListing {
                model: &model.name,
                intercept: model.intercept,
                coefficients: &model.coefficients,
            };
            writeln!(f, "{listing}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(n_samples: usize) -> PipelineConfig {
        PipelineConfig {
            source: DataSource::Synthetic { n_samples },
            target: "target".to_string(),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.test_size, 0.7);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.regressors().len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_hyperparameters_fail_before_loading() {
        let bad = [
            PipelineConfig { test_size: 1.0, ..PipelineConfig::default() },
            PipelineConfig { degree: 0, ..PipelineConfig::default() },
            PipelineConfig { ridge_alpha: -1.0, ..PipelineConfig::default() },
            PipelineConfig { l1_ratio: 1.5, ..PipelineConfig::default() },
        ];
        for config in bad {
            // the default input file does not exist, so an I/O error would mean
            // validation was skipped
            assert!(matches!(run(&config), Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_missing_input_file() {
        let config = PipelineConfig {
            source: DataSource::File(PathBuf::from("/no/such/winequality.csv")),
            ..PipelineConfig::default()
        };
        assert!(matches!(run(&config), Err(Error::Io(_))));
    }

    #[test]
    fn test_synthetic_pipeline() {
        let report = run(&synthetic(200)).unwrap();

        assert_eq!(report.n_rows, 200);
        assert_eq!(report.n_raw_features, 4);
        assert_eq!(report.n_expanded_features, 4 + 4 + 6);
        assert_eq!(report.n_train + report.n_test, 200);
        assert_eq!(report.n_test, 140);
        assert_eq!(report.scores.len(), 4);
        for row in &report.scores {
            assert!(row.train_r2 > 0.9, "{} train R² {}", row.model, row.train_r2);
            assert!(row.test_r2 > 0.9, "{} test R² {}", row.model, row.test_r2);
        }
        for model in &report.models {
            assert_eq!(model.coefficients.len(), 14);
            assert_eq!(model.coefficients[0].0, "x0");
            assert_eq!(model.coefficients[13].0, "x3^2");
        }
        assert!(report.null_counts.iter().all(|(_, c)| *c == 0));

        let text = report.to_string();
        assert!(text.contains("Linear Regression"));
        assert!(text.contains("Lasso (alpha=0.01)"));
    }
}
