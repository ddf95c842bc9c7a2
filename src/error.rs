//! Crate-wide error type.

use std::io;

use ndarray_rand::rand_distr::NormalError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: cannot parse {value:?} in column {column} as a number")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: expected {expected} fields, got {got}")]
    MalformedRow {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column after normalization: {0}")]
    DuplicateColumn(String),

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column {column} has {count} missing values")]
    MissingValues { column: String, count: usize },

    #[error("empty data: {0}")]
    EmptyData(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{0} not fitted, call fit() first")]
    NotFitted(&'static str),

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("coordinate descent did not converge after {iterations} iterations (last update {delta:e})")]
    DidNotConverge { iterations: usize, delta: f64 },

    #[error("invalid noise distribution: {0}")]
    Distribution(#[from] NormalError),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
