pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod dataset;
pub mod datasets;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;
pub mod report;

pub use dataset::{ColumnSummary, Dataset, Table};
pub use error::{Error, Result};
pub use linear_model::{ElasticNet, Lasso, LinearModel, LinearRegression, Regressor, Ridge};
pub use pipeline::{PipelineConfig, PipelineReport};
pub use preprocessing::{PolynomialFeatures, StandardScaler};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
