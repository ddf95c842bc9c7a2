use log::warn;
use ndarray::Axis;

use crate::error::{Error, Result};
use crate::{Matrix, Vector};

/// Standardizes columns to zero mean and unit variance using statistics
/// learned from the data passed to [`fit`](Self::fit).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    mean: Option<Vector>,
    scale: Option<Vector>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, data: &Matrix) -> Result<()> {
        if data.nrows() == 0 {
            return Err(Error::EmptyData("cannot fit scaler on zero rows".to_string()));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::EmptyData("failed to compute column means".to_string()))?;
        let mut scale = data.std_axis(Axis(0), 0.0);

        // Constant columns are centered but left unscaled. The cut-off is
        // relative to the column's magnitude, so columns in very small units
        // still get scaled.
        for (j, (s, m)) in scale.iter_mut().zip(mean.iter()).enumerate() {
            if *s <= 1e-12 * m.abs() {
                warn!("column {j} has zero variance, leaving it unscaled");
                *s = 1.0;
            }
        }

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    fn fitted(&self) -> Result<(&Vector, &Vector)> {
        match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => Ok((mean, scale)),
            _ => Err(Error::NotFitted("StandardScaler")),
        }
    }

    fn check_width(&self, data: &Matrix, expected: usize) -> Result<()> {
        if data.ncols() != expected {
            return Err(Error::DimensionMismatch(format!(
                "scaler was fitted on {} columns, got {}",
                expected,
                data.ncols()
            )));
        }
        Ok(())
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        let (mean, scale) = self.fitted()?;
        self.check_width(data, mean.len())?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row -= mean;
            row /= scale;
        }

        Ok(result)
    }

    pub fn inverse_transform(&self, data: &Matrix) -> Result<Matrix> {
        let (mean, scale) = self.fitted()?;
        self.check_width(data, mean.len())?;

        let mut result = data.clone();
        for mut row in result.axis_iter_mut(Axis(0)) {
            row *= scale;
            row += mean;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, data: &Matrix) -> Result<Matrix> {
        self.fit(data)?;
        self.transform(data)
    }

    pub fn mean(&self) -> Option<&Vector> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Vector> {
        self.scale.as_ref()
    }
}

/// Generates every monomial of the input columns up to `degree`.
///
/// Output columns are ordered by degree and, within a degree, by the
/// lexicographic order of the feature indices involved, so two inputs `a, b`
/// at degree 2 expand to `a, b, a^2, a b, b^2`.
#[derive(Clone, Debug)]
pub struct PolynomialFeatures {
    degree: usize,
    include_bias: bool,
    interaction_only: bool,
    n_input_features: Option<usize>,
    terms: Vec<Vec<usize>>,
}

impl PolynomialFeatures {
    pub fn new() -> Self {
        Self {
            degree: 2,
            include_bias: false,
            interaction_only: false,
            n_input_features: None,
            terms: Vec::new(),
        }
    }

    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn include_bias(mut self, include_bias: bool) -> Self {
        self.include_bias = include_bias;
        self
    }

    pub fn interaction_only(mut self, interaction_only: bool) -> Self {
        self.interaction_only = interaction_only;
        self
    }

    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if self.degree == 0 {
            return Err(Error::invalid("degree", "must be at least 1"));
        }
        if x.ncols() == 0 {
            return Err(Error::EmptyData("no input features to expand".to_string()));
        }

        let n = x.ncols();
        let mut terms = Vec::new();
        if self.include_bias {
            terms.push(Vec::new());
        }
        for d in 1..=self.degree {
            self.push_terms(n, d, 0, &mut Vec::with_capacity(d), &mut terms);
        }

        self.n_input_features = Some(n);
        self.terms = terms;
        Ok(())
    }

    fn push_terms(
        &self,
        n: usize,
        remaining: usize,
        start: usize,
        current: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if remaining == 0 {
            out.push(current.clone());
            return;
        }
        for j in start..n {
            current.push(j);
            let next = if self.interaction_only { j + 1 } else { j };
            self.push_terms(n, remaining - 1, next, current, out);
            current.pop();
        }
    }

    pub fn n_output_features(&self) -> Option<usize> {
        self.n_input_features.map(|_| self.terms.len())
    }

    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let n = self.n_input_features.ok_or(Error::NotFitted("PolynomialFeatures"))?;
        if x.ncols() != n {
            return Err(Error::DimensionMismatch(format!(
                "expander was fitted on {} columns, got {}",
                n,
                x.ncols()
            )));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("x", "contains non-finite values"));
        }

        let mut out = Matrix::ones((x.nrows(), self.terms.len()));
        for (k, term) in self.terms.iter().enumerate() {
            let mut col = out.column_mut(k);
            for &j in term {
                col *= &x.column(j);
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Names for each output column, built from the input column names:
    /// `a`, `a^2`, `a b`, and `1` for the bias column.
    pub fn feature_names(&self, input_names: &[String]) -> Result<Vec<String>> {
        let n = self.n_input_features.ok_or(Error::NotFitted("PolynomialFeatures"))?;
        if input_names.len() != n {
            return Err(Error::DimensionMismatch(format!(
                "{} names for {} fitted input columns",
                input_names.len(),
                n
            )));
        }

        Ok(self.terms.iter().map(|term| term_name(term, input_names)).collect())
    }
}

impl Default for PolynomialFeatures {
    fn default() -> Self {
        Self::new()
    }
}

fn term_name(term: &[usize], names: &[String]) -> String {
    if term.is_empty() {
        return "1".to_string();
    }

    let mut parts = Vec::new();
    let mut i = 0;
    while i < term.len() {
        let j = term[i];
        let power = term[i..].iter().take_while(|&&k| k == j).count();
        if power == 1 {
            parts.push(names[j].clone());
        } else {
            parts.push(format!("{}^{}", names[j], power));
        }
        i += power;
    }
    parts.join(" ")
}
