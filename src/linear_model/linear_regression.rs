use log::debug;

use super::{LinearModel, Regressor, fit_linear, solve_normal_equations};
use crate::error::Result;
use crate::{Matrix, Vector};

/// Ordinary least squares, solved through the normal equations.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    fit_intercept: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self { fit_intercept: true }
    }

    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> String {
        "Linear Regression".to_string()
    }

    fn fit(&self, x: &Matrix, y: &Vector) -> Result<LinearModel> {
        debug!("fitting OLS on {} x {}", x.nrows(), x.ncols());
        fit_linear(x, y, self.fit_intercept, |x, y| solve_normal_equations(x, y, 0.0))
    }
}
