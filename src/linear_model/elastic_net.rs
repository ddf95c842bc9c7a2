use log::debug;

use super::{LinearModel, Regressor, check_alpha, fit_linear};
use crate::error::{Error, Result};
use crate::{Matrix, Vector};

#[derive(Clone, Debug)]
pub struct ElasticNet {
    alpha: f64,
    l1_ratio: f64,
    fit_intercept: bool,
    max_iter: usize,
    tolerance: f64,
}

impl ElasticNet {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            l1_ratio: 0.5,
            fit_intercept: true,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn l1_ratio(mut self, l1_ratio: f64) -> Self {
        self.l1_ratio = l1_ratio;
        self
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn l1_penalty(&self) -> f64 {
        self.alpha * self.l1_ratio
    }

    pub fn l2_penalty(&self) -> f64 {
        self.alpha * (1.0 - self.l1_ratio)
    }
}

impl Default for ElasticNet {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for ElasticNet {
    fn name(&self) -> String {
        format!("ElasticNet (alpha={}, l1_ratio={})", self.alpha, self.l1_ratio)
    }

    fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        if !(0.0..=1.0).contains(&self.l1_ratio) {
            return Err(Error::invalid(
                "l1_ratio",
                format!("must be between 0 and 1, got {}", self.l1_ratio),
            ));
        }
        check_solver(self.max_iter, self.tolerance)
    }

    fn fit(&self, x: &Matrix, y: &Vector) -> Result<LinearModel> {
        self.validate()?;
        debug!(
            "fitting elastic net alpha={} l1_ratio={} on {} x {}",
            self.alpha,
            self.l1_ratio,
            x.nrows(),
            x.ncols()
        );

        let solver = CoordinateDescent {
            l1: self.l1_penalty(),
            l2: self.l2_penalty(),
            max_iter: self.max_iter,
            tolerance: self.tolerance,
        };
        fit_linear(x, y, self.fit_intercept, |x, y| solver.solve(x, y))
    }
}

pub(crate) fn check_solver(max_iter: usize, tolerance: f64) -> Result<()> {
    if max_iter == 0 {
        return Err(Error::invalid("max_iter", "must be at least 1"));
    }
    if !(tolerance > 0.0 && tolerance.is_finite()) {
        return Err(Error::invalid(
            "tolerance",
            format!("must be positive, got {tolerance}"),
        ));
    }
    Ok(())
}

/// Cyclic coordinate descent for
/// `(1/n)||y - Xb||^2 + l1 * ||b||_1 + l2 * ||b||_2^2`.
pub(crate) struct CoordinateDescent {
    pub l1: f64,
    pub l2: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl CoordinateDescent {
    pub fn solve(&self, x: &Matrix, y: &Vector) -> Result<Vector> {
        let n_features = x.ncols();
        let n_samples = x.nrows() as f64;
        let mut beta = Vector::zeros(n_features);
        let mut residual = y.clone();

        let col_norms: Vector = x
            .columns()
            .into_iter()
            .map(|col| col.dot(&col) / n_samples)
            .collect();

        let mut delta = f64::INFINITY;
        for iteration in 1..=self.max_iter {
            delta = 0.0;

            for j in 0..n_features {
                if col_norms[j] < 1e-12 {
                    continue;
                }

                let col = x.column(j);
                let old = beta[j];
                let rho = col.dot(&residual) / n_samples + col_norms[j] * old;
                let new = soft_threshold(rho, self.l1 / 2.0) / (col_norms[j] + self.l2);

                if new != old {
                    residual.scaled_add(old - new, &col);
                    beta[j] = new;
                    delta = delta.max((new - old).abs());
                }
            }

            let scale = beta.iter().fold(1.0f64, |m, b| m.max(b.abs()));
            if delta <= self.tolerance * scale {
                debug!("coordinate descent converged after {iteration} iterations");
                return Ok(beta);
            }
        }

        Err(Error::DidNotConverge {
            iterations: self.max_iter,
            delta,
        })
    }
}

fn soft_threshold(z: f64, gamma: f64) -> f64 {
    if z > gamma {
        z - gamma
    } else if z < -gamma {
        z + gamma
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_model::{Lasso, Ridge};
    use ndarray::array;

    fn correlated_data() -> (Matrix, Vector) {
        let x = array![
            [1.0, 2.0, 0.5],
            [2.0, 1.0, -0.2],
            [3.0, 4.0, 1.1],
            [4.0, 3.0, 0.3],
            [5.0, 5.0, -0.8],
            [6.0, 2.0, 0.9]
        ];
        let y = array![7.1, 7.9, 17.2, 17.8, 24.1, 20.9];
        (x, y)
    }

    #[test]
    fn test_soft_threshold() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }

    #[test]
    fn test_elastic_net_single_feature_closed_form() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        // x'y/n = 2.5 and ||x||^2/n = 1.25 after centering
        let model = ElasticNet::new().alpha(1.0).l1_ratio(0.5).fit(&x, &y).unwrap();

        assert!((model.coefficients()[0] - 2.25 / 1.75).abs() < 1e-10);
    }

    #[test]
    fn test_elastic_net_zero_ratio_matches_ridge() {
        let (x, y) = correlated_data();

        let ridge = Ridge::new().alpha(0.5).fit(&x, &y).unwrap();
        let enet = ElasticNet::new()
            .alpha(0.5)
            .l1_ratio(0.0)
            .tolerance(1e-12)
            .max_iter(100_000)
            .fit(&x, &y)
            .unwrap();

        for (a, b) in ridge.coefficients().iter().zip(enet.coefficients().iter()) {
            assert!((a - b).abs() < 1e-6, "ridge {a} vs elastic net {b}");
        }
        assert!((ridge.intercept() - enet.intercept()).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_net_unit_ratio_matches_lasso() {
        let (x, y) = correlated_data();

        let lasso = Lasso::new().alpha(0.3).tolerance(1e-10).max_iter(100_000).fit(&x, &y).unwrap();
        let enet = ElasticNet::new()
            .alpha(0.3)
            .l1_ratio(1.0)
            .tolerance(1e-10)
            .max_iter(100_000)
            .fit(&x, &y)
            .unwrap();

        for (a, b) in lasso.coefficients().iter().zip(enet.coefficients().iter()) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn test_elastic_net_sparsity() {
        let x = array![
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [4.0, 0.0, 0.0]
        ];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let model = ElasticNet::new().alpha(0.1).l1_ratio(0.8).fit(&x, &y).unwrap();
        let coeffs = model.coefficients();

        assert!(coeffs[0].abs() > 0.1);
        assert_eq!(coeffs[1], 0.0);
        assert_eq!(coeffs[2], 0.0);
    }

    #[test]
    fn test_elastic_net_without_intercept() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let model = ElasticNet::new()
            .alpha(0.01)
            .l1_ratio(0.5)
            .fit_intercept(false)
            .fit(&x, &y)
            .unwrap();

        assert_eq!(model.intercept(), 0.0);
        assert!((model.coefficients()[0] - 2.0).abs() < 0.05);
    }

    #[test]
    fn test_elastic_net_high_regularization() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let model = ElasticNet::new().alpha(100.0).l1_ratio(0.5).fit(&x, &y).unwrap();

        assert_eq!(model.coefficients()[0], 0.0);
        assert!((model.intercept() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_elastic_net_penalty_methods() {
        let model = ElasticNet::new().alpha(1.0).l1_ratio(0.7);

        assert!((model.l1_penalty() - 0.7).abs() < 1e-10);
        assert!((model.l2_penalty() - 0.3).abs() < 1e-10);
    }

    #[test]
    fn test_elastic_net_did_not_converge() {
        let (x, y) = correlated_data();

        let result = ElasticNet::new()
            .alpha(0.001)
            .max_iter(1)
            .tolerance(1e-12)
            .fit(&x, &y);

        assert!(matches!(result, Err(Error::DidNotConverge { iterations: 1, .. })));
    }

    #[test]
    fn test_elastic_net_invalid_parameters() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];

        let invalid = [
            ElasticNet::new().alpha(-1.0),
            ElasticNet::new().l1_ratio(-0.1),
            ElasticNet::new().l1_ratio(1.1),
            ElasticNet::new().max_iter(0),
            ElasticNet::new().tolerance(0.0),
        ];
        for model in invalid {
            assert!(model.validate().is_err());
            assert!(matches!(model.fit(&x, &y), Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_elastic_net_dimension_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];

        assert!(ElasticNet::new().fit(&x, &y).is_err());
    }
}
