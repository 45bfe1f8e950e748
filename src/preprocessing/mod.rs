//! Thermometer binarization of raw scalar features.
//!
//! The model consumes 0/1 bit vectors, not raw pixel intensities. This module
//! provides the encoder that turns each scalar feature into a fixed-width
//! thermometer bit group, with bucket thresholds placed at Gaussian quantiles
//! of the feature's own distribution.
//!
//! # Example
//!
//! ```
//! use sabio::preprocessing::ThermometerEncoder;
//! use sabio::primitives::Matrix;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     0u8, 200,
//!     10, 210,
//!     20, 220,
//!     30, 230,
//! ]).expect("valid matrix dimensions");
//!
//! let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
//! let bits = encoder.fit_transform(&data).expect("fit_transform should succeed");
//!
//! // Two bits per feature: output width doubles.
//! assert_eq!(bits.n_cols(), 4);
//! assert_eq!(bits.n_rows(), 4);
//! ```

use crate::error::{Result, SabioError};
use crate::primitives::{BitMatrix, Matrix};
use crate::stats::{column_means, column_variances, gaussian_quantile};
use serde::{Deserialize, Serialize};

/// Gaussian-quantile thermometer encoder.
///
/// With `b = bits_per_input`, each feature value is assigned one of `b`
/// ordered buckets by comparing it against `b - 1` thresholds
/// `gaussian_quantile(i / b) * std + mean` for `i in 1..b`, using the
/// feature's own mean and standard deviation. Bucket `s` encodes as a
/// contiguous run of `b - s` ones from the least-significant position of the
/// feature's bit group, so a larger value sets fewer bits and the set-bit
/// count is monotonic in the bucket index. This is a thermometer code, not a
/// binary one: filters exploit the monotone overlap between neighboring
/// buckets.
///
/// With `bits_per_input = 1` there are no thresholds; every value lands in
/// bucket 0 and encodes as a single set bit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermometerEncoder {
    /// Thermometer width in bits per feature.
    bits_per_input: usize,
    /// Skew quantiles of N(0, 1), fixed by `bits_per_input`.
    skews: Vec<f64>,
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f64>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f64>>,
}

impl ThermometerEncoder {
    /// Creates a new encoder with the given thermometer width.
    ///
    /// # Errors
    ///
    /// Returns an error if `bits_per_input` is 0 or exceeds 64.
    pub fn new(bits_per_input: usize) -> Result<Self> {
        if bits_per_input == 0 || bits_per_input > 64 {
            return Err(SabioError::InvalidHyperparameter {
                param: "bits_per_input".to_string(),
                value: bits_per_input.to_string(),
                constraint: "in 1..=64".to_string(),
            });
        }
        let skews = (1..bits_per_input)
            .map(|i| gaussian_quantile(i as f64 / bits_per_input as f64))
            .collect();
        Ok(Self {
            bits_per_input,
            skews,
            mean: None,
            std: None,
        })
    }

    /// Returns the thermometer width in bits per feature.
    #[must_use]
    pub fn bits_per_input(&self) -> usize {
        self.bits_per_input
    }

    /// Returns true if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        self.mean
            .as_ref()
            .expect("Encoder not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        self.std
            .as_ref()
            .expect("Encoder not fitted. Call fit() first.")
    }

    /// Computes per-feature mean and standard deviation from the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset has no rows or no columns.
    pub fn fit(&mut self, x: &Matrix<u8>) -> Result<()> {
        let (n_rows, n_cols) = x.shape();
        if n_rows == 0 || n_cols == 0 {
            return Err(SabioError::DimensionMismatch {
                expected: "a non-empty dataset".to_string(),
                actual: format!("{n_rows}x{n_cols}"),
            });
        }
        let mean = column_means(x);
        let std = column_variances(x, &mean)
            .into_iter()
            .map(f64::sqrt)
            .collect();
        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    /// Returns the bucket index for one feature value, in `[0, bits_per_input)`.
    ///
    /// The index is the number of skew thresholds the value exceeds, so it is
    /// non-decreasing in `value`.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is not fitted or `feature` is out of range.
    #[must_use]
    pub fn bucket_index(&self, value: f64, feature: usize) -> usize {
        let mean = self.mean()[feature];
        let std = self.std()[feature];
        self.skews
            .iter()
            .take_while(|&&skew| value > skew * std + mean)
            .count()
    }

    /// Binarizes a dataset into a bit matrix of width `n_features * bits_per_input`.
    ///
    /// Each feature's `bits_per_input` output bits occupy consecutive
    /// positions: bit `k` of feature `f` lands at column
    /// `f * bits_per_input + k`.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder is not fitted or the column count
    /// differs from the fitted dataset.
    pub fn transform(&self, x: &Matrix<u8>) -> Result<BitMatrix> {
        let mean = self.mean.as_ref().ok_or_else(|| {
            SabioError::Other("Encoder not fitted. Call fit() first.".to_string())
        })?;
        let (n_rows, n_cols) = x.shape();
        if n_cols != mean.len() {
            return Err(SabioError::DimensionMismatch {
                expected: format!("{} features", mean.len()),
                actual: format!("{n_cols}"),
            });
        }

        let b = self.bits_per_input;
        let mut result = BitMatrix::zeros(n_rows, n_cols * b);
        for row in 0..n_rows {
            for (feature, &value) in x.row_slice(row).iter().enumerate() {
                let bucket = self.bucket_index(f64::from(value), feature);
                for bit in 0..b - bucket {
                    result.set(row, feature * b + bit, 1);
                }
            }
        }
        Ok(result)
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, x: &Matrix<u8>) -> Result<BitMatrix> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests;
