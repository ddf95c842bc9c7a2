use log::debug;

use super::{LinearModel, Regressor, check_alpha, fit_linear, solve_normal_equations};
use crate::error::Result;
use crate::{Matrix, Vector};

/// L2-penalized least squares. With the `(1/n)` data term the closed form is
/// `(XᵀX + n·alpha·I) b = Xᵀy`.
#[derive(Clone, Debug)]
pub struct Ridge {
    alpha: f64,
    fit_intercept: bool,
}

impl Ridge {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
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
}

impl Default for Ridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for Ridge {
    fn name(&self) -> String {
        format!("Ridge (alpha={})", self.alpha)
    }

    fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)
    }

    fn fit(&self, x: &Matrix, y: &Vector) -> Result<LinearModel> {
        self.validate()?;
        debug!("fitting ridge alpha={} on {} x {}", self.alpha, x.nrows(), x.ncols());

        let penalty = self.alpha * x.nrows() as f64;
        fit_linear(x, y, self.fit_intercept, |x, y| solve_normal_equations(x, y, penalty))
    }
}
