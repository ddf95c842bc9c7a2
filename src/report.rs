//! Console rendering of scores and coefficient listings.

use std::fmt;

use crate::dataset::ColumnSummary;
use crate::error::{Error, Result};
use crate::linear_model::LinearModel;

/// Pair each feature name with its fitted coefficient.
pub fn coefficient_table(names: &[String], model: &LinearModel) -> Result<Vec<(String, f64)>> {
    if names.len() != model.n_features() {
        return Err(Error::DimensionMismatch(format!(
            "{} feature names for {} coefficients",
            names.len(),
            model.n_features()
        )));
    }

    Ok(names
        .iter()
        .cloned()
        .zip(model.coefficients().iter().copied())
        .collect())
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRow {
    pub model: String,
    pub train_r2: f64,
    pub test_r2: f64,
}

pub struct ScoreTable<'a>(pub &'a [ScoreRow]);

impl fmt::Display for ScoreTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.0.iter().map(|r| r.model.len()).max().unwrap_or(5).max(5);
        writeln!(f, "{:<width$} {:>10} {:>10}", "Model", "Train R²", "Test R²")?;
        writeln!(f, "{}", "-".repeat(width + 22))?;
        for row in self.0 {
            writeln!(f, "{:<width$} {:>10.4} {:>10.4}", row.model, row.train_r2, row.test_r2)?;
        }
        Ok(())
    }
}

/// One model's coefficients, largest magnitude first.
pub struct CoefficientListing<'a> {
    pub model: &'a str,
    pub intercept: f64,
    pub coefficients: &'a [(String, f64)],
}

impl fmt::Display for CoefficientListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zeros = self.coefficients.iter().filter(|(_, c)| *c == 0.0).count();
        writeln!(
            f,
            "{} ({} of {} coefficients are zero)",
            self.model,
            zeros,
            self.coefficients.len()
        )?;

        let mut sorted: Vec<&(String, f64)> = self.coefficients.iter().collect();
        sorted.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

        let width = sorted.iter().map(|(n, _)| n.len()).max().unwrap_or(0).max(9);
        writeln!(f, "  {:<width$} {:>12.4}", "intercept", self.intercept)?;
        for (name, coef) in sorted {
            writeln!(f, "  {:<width$} {:>12.4}", name, coef)?;
        }
        Ok(())
    }
}

pub struct SummaryTable<'a>(pub &'a [ColumnSummary]);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.0.iter().map(|s| s.name.len()).max().unwrap_or(6).max(6);
        writeln!(
            f,
            "{:<width$} {:>7} {:>10} {:>10} {:>10} {:>10}",
            "column", "count", "mean", "std", "min", "max"
        )?;
        for s in self.0 {
            writeln!(
                f,
                "{:<width$} {:>7} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                s.name, s.count, s.mean, s.std, s.min, s.max
            )?;
        }
        Ok(())
    }
}
