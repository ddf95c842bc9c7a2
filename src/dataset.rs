//! Tabular input and the feature/target container the models train on.
//!
//! A [`Table`] is the raw, named view of a delimited text file. Selecting a
//! target column turns it into a [`Dataset`], which keeps the feature names
//! next to the feature matrix so they survive expansion and splitting.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::{debug, info};
use ndarray::Axis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Error, Result};
use crate::{Matrix, Vector};

const MISSING_MARKERS: [&str; 4] = ["", "na", "nan", "null"];

/// Lowercase, trim surrounding whitespace and quotes, and replace each inner
/// space with an underscore.
pub fn normalize_column_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim_matches('\'').trim();
    trimmed.replace(' ', "_").to_lowercase()
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Named numeric columns, in file order. Missing cells are `NaN`.
#[derive(Clone, Debug)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vector>,
}

impl Table {
    pub fn new(names: Vec<String>, columns: Vec<Vector>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(Error::DimensionMismatch(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().position(|c| c.len() != first.len()) {
                return Err(Error::DimensionMismatch(format!(
                    "column {} has {} rows, expected {}",
                    names[bad],
                    columns[bad].len(),
                    first.len()
                )));
            }
        }

        let names: Vec<String> = names.iter().map(|n| normalize_column_name(n)).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self { names, columns })
    }

    pub fn from_path(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(file, delimiter)?;
        info!(
            "loaded {} rows x {} columns from {}",
            table.n_rows(),
            table.n_columns(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: char) -> Result<Self> {
        let mut lines = BufReader::new(reader).lines().enumerate();

        let names: Vec<String> = loop {
            let Some((_, line)) = lines.next() else {
                return Err(Error::EmptyData("no header row found".to_string()));
            };
            let line = line?;
            if !line.trim().is_empty() {
                break line.split(delimiter).map(str::to_string).collect();
            }
        };

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (i, line) in lines {
            let line = line?;
            let line_no = i + 1;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(delimiter).collect();
            if fields.len() != names.len() {
                return Err(Error::MalformedRow {
                    line: line_no,
                    expected: names.len(),
                    got: fields.len(),
                });
            }

            let row = fields
                .iter()
                .zip(&names)
                .map(|(field, name)| parse_cell(field, name, line_no))
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }

        debug!("parsed header with {} columns and {} data rows", names.len(), rows.len());

        let columns = (0..names.len())
            .map(|j| rows.iter().map(|row| row[j]).collect::<Vector>())
            .collect();

        Self::new(names, columns)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Vector> {
        self.position(name).map(|j| &self.columns[j])
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = normalize_column_name(name);
        self.names.iter().position(|n| *n == name)
    }

    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| (name.clone(), col.iter().filter(|v| v.is_nan()).count()))
            .collect()
    }

    pub fn describe(&self) -> Vec<ColumnSummary> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| {
                let present: Vec<f64> = col.iter().copied().filter(|v| !v.is_nan()).collect();
                let count = present.len();
                if count == 0 {
                    return ColumnSummary {
                        name: name.clone(),
                        count,
                        mean: f64::NAN,
                        std: f64::NAN,
                        min: f64::NAN,
                        max: f64::NAN,
                    };
                }
                let mean = present.iter().sum::<f64>() / count as f64;
                let var = present.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
                ColumnSummary {
                    name: name.clone(),
                    count,
                    mean,
                    std: var.sqrt(),
                    min: present.iter().copied().fold(f64::INFINITY, f64::min),
                    max: present.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                }
            })
            .collect()
    }

    /// Split off `target` as the label vector; every other column becomes a
    /// feature. Rows with missing values are not dropped.
    pub fn to_dataset(&self, target: &str) -> Result<Dataset> {
        let target_idx = self
            .position(target)
            .ok_or_else(|| Error::MissingColumn(normalize_column_name(target)))?;

        for (name, count) in self.null_counts() {
            if count > 0 {
                return Err(Error::MissingValues { column: name, count });
            }
        }

        let feature_idx: Vec<usize> = (0..self.n_columns()).filter(|&j| j != target_idx).collect();
        if feature_idx.is_empty() {
            return Err(Error::EmptyData("no predictor columns besides the target".to_string()));
        }

        let mut features = Matrix::zeros((self.n_rows(), feature_idx.len()));
        for (out, &j) in feature_idx.iter().enumerate() {
            features.column_mut(out).assign(&self.columns[j]);
        }
        let names = feature_idx.iter().map(|&j| self.names[j].clone()).collect();

        Dataset::with_feature_names(names, features, self.columns[target_idx].clone())
    }
}

fn parse_cell(field: &str, column: &str, line: usize) -> Result<f64> {
    let cell = field.trim().trim_matches('"').trim();
    if MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| Error::Parse {
        line,
        column: normalize_column_name(column),
        value: cell.to_string(),
    })
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: Matrix,
    pub targets: Vector,
}

impl Dataset {
    /// Features are named `x0`, `x1`, ... in column order.
    pub fn new(features: Matrix, targets: Vector) -> Result<Self> {
        let names = (0..features.ncols()).map(|j| format!("x{j}")).collect();
        Self::with_feature_names(names, features, targets)
    }

    pub fn with_feature_names(
        feature_names: Vec<String>,
        features: Matrix,
        targets: Vector,
    ) -> Result<Self> {
        if features.nrows() != targets.len() {
            return Err(Error::DimensionMismatch(format!(
                "{} feature rows but {} targets",
                features.nrows(),
                targets.len()
            )));
        }
        if feature_names.len() != features.ncols() {
            return Err(Error::DimensionMismatch(format!(
                "{} feature names for {} feature columns",
                feature_names.len(),
                features.ncols()
            )));
        }

        Ok(Self {
            feature_names,
            features,
            targets,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: self.features.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
        }
    }

    /// Shuffle rows with a seeded RNG and hold out `ceil(n * test_size)` of
    /// them. The same seed always yields the same partition.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(Self, Self)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(Error::invalid(
                "test_size",
                format!("must be between 0 and 1 exclusive, got {test_size}"),
            ));
        }

        let n_samples = self.n_samples();
        let n_test = (n_samples as f64 * test_size).ceil() as usize;
        let n_train = n_samples.saturating_sub(n_test);
        if n_train == 0 || n_test == 0 {
            return Err(Error::EmptyData(format!(
                "splitting {n_samples} samples with test_size={test_size} leaves an empty partition"
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);
        debug!("split {n_samples} samples into {n_train} train / {n_test} test (seed {seed})");

        Ok((self.select(train_idx), self.select(test_idx)))
    }
}
