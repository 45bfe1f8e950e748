//! H3-family hashing of binary input chunks.

use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::Rng;

/// Computes one H3 hash of a 0/1 chunk against one parameter row.
///
/// The result is the XOR of `params[j]` over all positions where
/// `chunk[j] == 1` (multiplying by the 0/1 input acts as a selector). When
/// every parameter is below a power-of-two `filter_entries`, only the low
/// `log2(filter_entries)` bits of each parameter can be set, so any XOR
/// combination stays below `filter_entries` and the result indexes a filter
/// directly with no modulo step.
///
/// # Panics
///
/// Panics if `chunk` and `params` lengths differ.
#[must_use]
pub fn h3_hash(chunk: &[u8], params: &[u64]) -> u64 {
    assert_eq!(chunk.len(), params.len(), "chunk/parameter length mismatch");
    chunk
        .iter()
        .zip(params)
        .fold(0, |acc, (&bit, &param)| acc ^ (param * u64::from(bit)))
}

/// Draws H3 parameters uniformly from `[0, num_entries)`.
///
/// One row per hash function, one column per chunk bit. Rows are shared
/// across all filters and classes of the model: hash parameters are indexed
/// by hash-function id only.
#[must_use]
pub fn generate_h3_parameters(
    num_hashes: usize,
    num_inputs: usize,
    num_entries: u64,
    rng: &mut StdRng,
) -> Matrix<u64> {
    let mut params = Matrix::from_elem(num_hashes, num_inputs, 0u64);
    for i in 0..num_hashes {
        for j in 0..num_inputs {
            params.set(i, j, rng.gen_range(0..num_entries));
        }
    }
    params
}
