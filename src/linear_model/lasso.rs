use super::elastic_net::check_solver;
use super::{ElasticNet, LinearModel, Regressor, check_alpha};
use crate::error::Result;
use crate::{Matrix, Vector};

/// L1-penalized least squares. Fitted as an [`ElasticNet`] with
/// `l1_ratio = 1`.
#[derive(Clone, Debug)]
pub struct Lasso {
    alpha: f64,
    fit_intercept: bool,
    max_iter: usize,
    tolerance: f64,
}

impl Lasso {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
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

    fn as_elastic_net(&self) -> ElasticNet {
        ElasticNet::new()
            .alpha(self.alpha)
            .l1_ratio(1.0)
            .fit_intercept(self.fit_intercept)
            .max_iter(self.max_iter)
            .tolerance(self.tolerance)
    }
}

impl Default for Lasso {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for Lasso {
    fn name(&self) -> String {
        format!("Lasso (alpha={})", self.alpha)
    }

    fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        check_solver(self.max_iter, self.tolerance)
    }

    fn fit(&self, x: &Matrix, y: &Vector) -> Result<LinearModel> {
        self.validate()?;
        self.as_elastic_net().fit(x, y)
    }
}
