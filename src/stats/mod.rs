//! Distribution helpers and per-feature dataset statistics.
//!
//! Provides the inverse Gaussian CDF used to place thermometer skew
//! thresholds, and column-wise mean/variance over raw scalar datasets.

use crate::primitives::Matrix;

/// Inverse error function, via the polynomial approximation of
/// Giles (2012). Accurate to roughly single precision over (-1, 1),
/// which is ample for placing encoding thresholds.
///
/// # Panics
///
/// Panics if `x` is outside (-1, 1).
#[must_use]
pub fn erf_inv(x: f64) -> f64 {
    assert!(x > -1.0 && x < 1.0, "erf_inv domain is (-1, 1)");

    let w = -((1.0 - x) * (1.0 + x)).ln();
    let p = if w < 5.0 {
        let w = w - 2.5;
        let mut p = 2.810_226_36e-08;
        p = 3.432_739_39e-07 + p * w;
        p = -3.523_387_7e-06 + p * w;
        p = -4.391_506_54e-06 + p * w;
        p = 2.185_808_7e-04 + p * w;
        p = -1.253_725_03e-03 + p * w;
        p = -4.177_681_64e-03 + p * w;
        p = 2.466_407_27e-01 + p * w;
        1.501_409_41 + p * w
    } else {
        let w = w.sqrt() - 3.0;
        let mut p = -2.002_142_57e-04;
        p = 1.009_505_58e-04 + p * w;
        p = 1.349_343_22e-03 + p * w;
        p = -3.673_428_44e-03 + p * w;
        p = 5.739_507_73e-03 + p * w;
        p = -7.622_461_3e-03 + p * w;
        p = 9.438_870_47e-03 + p * w;
        p = 1.001_674_06 + p * w;
        2.832_976_82 + p * w
    };
    p * x
}

/// Quantile function (inverse CDF) of the standard normal distribution.
///
/// `gaussian_quantile(p)` returns the z such that `P(Z <= z) = p` for
/// `Z ~ N(0, 1)`.
///
/// # Panics
///
/// Panics if `p` is outside (0, 1).
///
/// # Examples
///
/// ```
/// use sabio::stats::gaussian_quantile;
///
/// assert!(gaussian_quantile(0.5).abs() < 1e-6);
/// assert!(gaussian_quantile(0.975) > 1.9);
/// assert!(gaussian_quantile(0.975) < 2.0);
/// ```
#[must_use]
pub fn gaussian_quantile(p: f64) -> f64 {
    assert!(p > 0.0 && p < 1.0, "gaussian_quantile domain is (0, 1)");
    std::f64::consts::SQRT_2 * erf_inv(2.0 * p - 1.0)
}

/// Per-column means of a raw scalar dataset (one row per sample).
#[must_use]
pub fn column_means(x: &Matrix<u8>) -> Vec<f64> {
    let (n_rows, n_cols) = x.shape();
    let mut means = vec![0.0; n_cols];
    for row in 0..n_rows {
        for (mean, &v) in means.iter_mut().zip(x.row_slice(row)) {
            *mean += f64::from(v);
        }
    }
    if n_rows > 0 {
        for mean in &mut means {
            *mean /= n_rows as f64;
        }
    }
    means
}

/// Per-column sample variances (divisor n - 1) of a raw scalar dataset.
///
/// Columns with a single sample (or none) get variance 0.
#[must_use]
pub fn column_variances(x: &Matrix<u8>, means: &[f64]) -> Vec<f64> {
    let (n_rows, n_cols) = x.shape();
    assert_eq!(means.len(), n_cols, "means length must match columns");

    let mut variances = vec![0.0; n_cols];
    if n_rows < 2 {
        return variances;
    }
    for row in 0..n_rows {
        for (col, &v) in x.row_slice(row).iter().enumerate() {
            let diff = f64::from(v) - means[col];
            variances[col] += diff * diff;
        }
    }
    for var in &mut variances {
        *var /= (n_rows - 1) as f64;
    }
    variances
}
