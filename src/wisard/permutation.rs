//! Fixed random input permutation.

use crate::error::{Result, SabioError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// A fixed permutation of input bit positions.
///
/// Generated once at model creation to decorrelate input structure before
/// the bit vector is chunked into filters, then immutable for the model's
/// lifetime: the ordering is part of model identity, and applying it is
/// deterministic given the stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPermutation {
    order: Vec<usize>,
}

impl InputPermutation {
    /// Generates a uniform random permutation of `[0, len)`.
    ///
    /// A seed gives a reproducible ordering; without one the ordering is
    /// drawn from OS entropy.
    #[must_use]
    pub fn generate(len: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::generate_with(len, &mut rng)
    }

    /// Generates a uniform random permutation of `[0, len)` from an existing RNG.
    #[must_use]
    pub fn generate_with(len: usize, rng: &mut StdRng) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self { order }
    }

    /// Reconstructs a permutation from a stored order (e.g. a model file).
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is not a permutation of `[0, order.len())`.
    pub fn from_order(order: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; order.len()];
        for &slot in &order {
            if slot >= order.len() || seen[slot] {
                return Err(SabioError::FormatError {
                    message: format!(
                        "input_order is not a permutation of [0, {})",
                        order.len()
                    ),
                });
            }
            seen[slot] = true;
        }
        Ok(Self { order })
    }

    /// Returns the permutation length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the permutation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the stored order, one source position per target slot.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Applies the permutation: `out[i] = input[order[i]]`.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `out` lengths differ from the permutation length.
    pub fn apply_into(&self, input: &[u8], out: &mut [u8]) {
        assert_eq!(input.len(), self.order.len(), "input length mismatch");
        assert_eq!(out.len(), self.order.len(), "output length mismatch");
        for (slot, &src) in out.iter_mut().zip(&self.order) {
            *slot = input[src];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_a_permutation() {
        let perm = InputPermutation::generate(100, Some(42));
        let mut sorted = perm.as_slice().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_generate_seeded_is_reproducible() {
        let a = InputPermutation::generate(64, Some(7));
        let b = InputPermutation::generate(64, Some(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let perm = InputPermutation::generate(16, Some(3));
        let input: Vec<u8> = (0..16).map(|i| u8::from(i % 3 == 0)).collect();
        let mut out1 = vec![0u8; 16];
        let mut out2 = vec![0u8; 16];
        perm.apply_into(&input, &mut out1);
        perm.apply_into(&input, &mut out2);
        assert_eq!(out1, out2);
    }

    #[test]
    fn test_apply_reorders() {
        let perm = InputPermutation::from_order(vec![2, 0, 1]).expect("valid permutation");
        let mut out = vec![0u8; 3];
        perm.apply_into(&[1, 0, 1], &mut out);
        assert_eq!(out, vec![1, 1, 0]);
    }

    #[test]
    fn test_from_order_rejects_duplicates() {
        assert!(InputPermutation::from_order(vec![0, 0, 2]).is_err());
    }

    #[test]
    fn test_from_order_rejects_out_of_range() {
        assert!(InputPermutation::from_order(vec![0, 3, 1]).is_err());
    }
}
