//! Batch hashing and prediction over many samples.
//!
//! The hash tensor computed here is the contract exposed to offload
//! backends: shape (batch, `num_filters`, `filter_hashes`), reduced per
//! sample against the model's counter tensor with the same min-reduction
//! and bleach rule as single-sample prediction. Each sample's hash
//! computation touches only its own input and output slice, so batch
//! hashing and prediction are embarrassingly data-parallel once the model
//! is frozen.

use crate::error::{Result, SabioError};
use crate::primitives::{BitMatrix, Matrix, Tensor3};
use crate::wisard::WisardClassifier;

/// Computes the hash tensor for a whole batch of binarized samples.
///
/// # Errors
///
/// Returns an error if any sample row has the wrong width.
pub fn batch_hashing(model: &WisardClassifier, samples: &BitMatrix) -> Result<Tensor3<u64>> {
    let batch = samples.n_rows();
    let num_filters = model.num_filters();
    let filter_hashes = model.filter_hashes();

    let mut result = Tensor3::zeros(batch, num_filters, filter_hashes);
    for sample_it in 0..batch {
        let hashes = model.perform_hashing(samples.row(sample_it))?;
        for filter in 0..num_filters {
            result
                .slice2_mut(sample_it, filter)
                .copy_from_slice(hashes.row_slice(filter));
        }
    }
    Ok(result)
}

/// Predicts a class index for every sample in the batch.
///
/// Uses the precompute-then-reduce strategy per sample.
///
/// # Errors
///
/// Returns an error if any sample row has the wrong width.
pub fn batch_predict(model: &WisardClassifier, samples: &BitMatrix) -> Result<Vec<usize>> {
    (0..samples.n_rows())
        .map(|sample_it| model.predict2(samples.row(sample_it)))
        .collect()
}

/// Reduces a precomputed batch hash tensor to per-sample class predictions.
///
/// This is the reduction an external accelerator backend must reproduce to
/// be conformant with [`batch_hashing`] output.
///
/// # Errors
///
/// Returns an error if the tensor's filter/hash dimensions don't match the
/// model, or any hash value is out of range.
pub fn batch_predict_from_hashes(
    model: &WisardClassifier,
    hashes: &Tensor3<u64>,
) -> Result<Vec<usize>> {
    let (batch, num_filters, filter_hashes) = hashes.shape();
    if (num_filters, filter_hashes) != (model.num_filters(), model.filter_hashes()) {
        return Err(SabioError::DimensionMismatch {
            expected: format!(
                "(batch, {}, {}) hash tensor",
                model.num_filters(),
                model.filter_hashes()
            ),
            actual: format!("{:?}", hashes.shape()),
        });
    }

    let mut results = Vec::with_capacity(batch);
    for sample_it in 0..batch {
        let mut sample_hashes = Matrix::from_elem(num_filters, filter_hashes, 0u64);
        for filter in 0..num_filters {
            sample_hashes
                .row_slice_mut(filter)
                .copy_from_slice(hashes.slice2(sample_it, filter));
        }
        results.push(model.predict_from_hashes(&sample_hashes)?);
    }
    Ok(results)
}
