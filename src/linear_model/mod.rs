//! Penalized and unpenalized least-squares regression.
//!
//! Every estimator minimizes
//!
//! ```text
//! (1/n) * ||y - X b - b0||^2 + penalty(b)
//! ```
//!
//! with an unpenalized intercept `b0`:
//! - [`LinearRegression`]: no penalty
//! - [`Ridge`]: `alpha * ||b||_2^2`
//! - [`Lasso`]: `alpha * ||b||_1`
//! - [`ElasticNet`]: `alpha * (l1_ratio * ||b||_1 + (1 - l1_ratio) * ||b||_2^2)`
//!
//! Estimators hold hyperparameters only. [`Regressor::fit`] returns a
//! [`LinearModel`], which is never modified afterwards.
//!
//! # Examples
//!
//! ```rust
//! use winereg::{Regressor, Ridge};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let y = array![2.0, 4.0, 6.0];
//!
//! let model = Ridge::new().alpha(0.1).fit(&x, &y).unwrap();
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.9);
//! ```

mod elastic_net;
mod lasso;
mod linear_regression;
mod ridge;

pub use elastic_net::ElasticNet;
pub use lasso::Lasso;
pub use linear_regression::LinearRegression;
pub use ridge::Ridge;

use log::{debug, warn};
use ndarray::Axis;

use crate::error::{Error, Result};
use crate::{Matrix, Vector};

pub trait Regressor {
    /// Short label including the hyperparameters, used in reports.
    fn name(&self) -> String;

    /// Check hyperparameters without touching any data.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn fit(&self, x: &Matrix, y: &Vector) -> Result<LinearModel>;
}

/// Intercept plus one coefficient per feature column.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearModel {
    coefficients: Vector,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vector, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Coefficients that are exactly zero.
    pub fn n_zero(&self) -> usize {
        self.coefficients.iter().filter(|&&c| c == 0.0).count()
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        if x.ncols() != self.coefficients.len() {
            return Err(Error::DimensionMismatch(format!(
                "Number of features in X ({}) doesn't match training data ({})",
                x.ncols(),
                self.coefficients.len()
            )));
        }

        Ok(x.dot(&self.coefficients) + self.intercept)
    }

    /// R² of the predictions on `x` against `y`.
    pub fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let y_pred = self.predict(x)?;
        crate::metrics::r2_score(y, &y_pred)
    }
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(Error::invalid(
            "alpha",
            format!("must be finite and non-negative, got {alpha}"),
        ));
    }
    Ok(())
}

fn check_training_data(x: &Matrix, y: &Vector) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "Number of samples in X ({}) and y ({}) must match",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(Error::EmptyData("X must have at least one sample".to_string()));
    }
    if x.ncols() == 0 {
        return Err(Error::EmptyData("X must have at least one feature".to_string()));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::invalid("training data", "contains NaN or infinite values"));
    }
    Ok(())
}

/// Validate, optionally center, solve for the slopes and recover the
/// intercept from the column means.
pub(crate) fn fit_linear<F>(x: &Matrix, y: &Vector, fit_intercept: bool, solve: F) -> Result<LinearModel>
where
    F: FnOnce(&Matrix, &Vector) -> Result<Vector>,
{
    check_training_data(x, y)?;

    if !fit_intercept {
        return Ok(LinearModel::new(solve(x, y)?, 0.0));
    }

    let n = x.nrows() as f64;
    let y_mean = y.sum() / n;
    let x_means = x.sum_axis(Axis(0)) / n;

    let mut x_centered = x.clone();
    for mut row in x_centered.axis_iter_mut(Axis(0)) {
        row -= &x_means;
    }
    let y_centered = y - y_mean;

    let coefficients = solve(&x_centered, &y_centered)?;
    let intercept = y_mean - coefficients.dot(&x_means);

    Ok(LinearModel::new(coefficients, intercept))
}

/// Solve `(XᵀX + ridge·I) b = Xᵀy`.
///
/// Columns that are zero or a linear combination of earlier columns are left
/// out of the solve and get a coefficient of exactly 0.0.
pub(crate) fn solve_normal_equations(x: &Matrix, y: &Vector, ridge: f64) -> Result<Vector> {
    let xt = x.t();
    let mut xtx = xt.dot(x);
    for i in 0..xtx.nrows() {
        xtx[(i, i)] += ridge;
    }
    let xty = xt.dot(y);

    let keep = independent_columns(&xtx);
    if keep.len() == xtx.nrows() {
        return solve_linear_system(&xtx, &xty);
    }
    warn!(
        "{} of {} columns are constant or collinear, their coefficients are fixed at 0",
        xtx.nrows() - keep.len(),
        xtx.nrows()
    );

    let reduced = xtx.select(Axis(0), &keep).select(Axis(1), &keep);
    let solution = solve_linear_system(&reduced, &xty.select(Axis(0), &keep))?;

    let mut coefficients = Vector::zeros(xtx.nrows());
    for (&j, &b) in keep.iter().zip(solution.iter()) {
        coefficients[j] = b;
    }
    Ok(coefficients)
}

/// Indices of a maximal set of linearly independent columns of a symmetric
/// positive semi-definite Gram matrix, earliest columns first.
///
/// Symmetric elimination without pivoting leaves, on each diagonal entry, the
/// squared norm of that column after projecting out the columns kept before
/// it. A column is dropped when that remainder is negligible next to its own
/// norm, or when the column itself is negligible next to the largest one.
fn independent_columns(gram: &Matrix) -> Vec<usize> {
    let n = gram.nrows();
    let diag = gram.diag().to_owned();
    let largest = diag.iter().fold(0.0f64, |m, &v| m.max(v));

    let mut schur = gram.clone();
    let mut keep = Vec::with_capacity(n);
    for i in 0..n {
        let pivot = schur[(i, i)];
        if diag[i] <= 1e-12 * largest || pivot <= 1e-10 * diag[i] {
            debug!("column {i} is dependent (pivot {pivot:e}, norm {:e})", diag[i]);
            continue;
        }
        keep.push(i);

        for r in (i + 1)..n {
            let factor = schur[(r, i)] / pivot;
            for c in (i + 1)..n {
                schur[(r, c)] -= factor * schur[(i, c)];
            }
        }
    }
    keep
}

/// Gaussian elimination with partial pivoting.
pub(crate) fn solve_linear_system(a: &Matrix, b: &Vector) -> Result<Vector> {
    let n = a.nrows();
    let mut aug = Matrix::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    let magnitude = a.iter().fold(0.0f64, |m, v| m.max(v.abs())).max(1.0);
    let eps = 1e-12 * magnitude;

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if aug[(k, i)].abs() > aug[(max_row, i)].abs() {
                max_row = k;
            }
        }

        if aug[(max_row, i)].abs() < eps {
            debug!("pivot {i} is {:e}, below {eps:e}", aug[(max_row, i)]);
            return Err(Error::SingularMatrix);
        }

        if max_row != i {
            for j in 0..=n {
                aug.swap((i, j), (max_row, j));
            }
        }

        for k in (i + 1)..n {
            let factor = aug[(k, i)] / aug[(i, i)];
            for j in i..=n {
                aug[(k, j)] -= factor * aug[(i, j)];
            }
        }
    }

    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        x[i] = aug[(i, n)];
        for j in (i + 1)..n {
            x[i] -= aug[(i, j)] * x[j];
        }
        x[i] /= aug[(i, i)];
    }

    Ok(x)
}
