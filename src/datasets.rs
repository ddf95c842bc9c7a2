//! Seeded synthetic regression data.

use ndarray::Array2;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{Normal, Uniform};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::{Matrix, Vector};

/// `y = X · coefficients + intercept + N(0, noise²)`, with every feature drawn
/// from `Uniform(-10, 10)`. The same seed always produces the same data.
pub fn make_regression(
    n_samples: usize,
    coefficients: &Vector,
    intercept: f64,
    noise: f64,
    seed: u64,
) -> Result<Dataset> {
    if n_samples == 0 {
        return Err(Error::EmptyData("n_samples must be at least 1".to_string()));
    }
    if coefficients.is_empty() {
        return Err(Error::EmptyData("at least one coefficient is required".to_string()));
    }
    let normal = Normal::new(0.0, noise)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let features: Matrix =
        Array2::random_using((n_samples, coefficients.len()), Uniform::new(-10.0, 10.0), &mut rng);
    let errors: Vector = Vector::random_using(n_samples, normal, &mut rng);

    let targets = features.dot(coefficients) + intercept + errors;
    Dataset::new(features, targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_rand::rand_distr::NormalError;

    #[test]
    fn test_make_regression_shape() {
        let data = make_regression(25, &array![1.0, -2.0, 0.5], 3.0, 0.1, 1).unwrap();

        assert_eq!(data.n_samples(), 25);
        assert_eq!(data.n_features(), 3);
        assert!(data.features.iter().all(|v| (-10.0..10.0).contains(v)));
    }

    #[test]
    fn test_make_regression_is_seeded() {
        let coefs = array![2.0, 1.0];
        let a = make_regression(10, &coefs, 0.0, 1.0, 42).unwrap();
        let b = make_regression(10, &coefs, 0.0, 1.0, 42).unwrap();
        let c = make_regression(10, &coefs, 0.0, 1.0, 43).unwrap();

        assert_eq!(a.features, b.features);
        assert_eq!(a.targets, b.targets);
        assert_ne!(a.targets, c.targets);
    }

    #[test]
    fn test_make_regression_without_noise() {
        let data = make_regression(5, &array![2.0], 1.0, 0.0, 9).unwrap();

        for (row, y) in data.features.rows().into_iter().zip(data.targets.iter()) {
            assert!((2.0 * row[0] + 1.0 - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_make_regression_rejects_bad_noise() {
        assert!(matches!(
            make_regression(5, &array![1.0], 0.0, -1.0, 0),
            Err(Error::Distribution(NormalError::BadVariance))
        ));
    }
}
