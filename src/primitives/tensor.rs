//! Three-axis tensor for per-(class, filter) counter storage.

use serde::{Deserialize, Serialize};

/// A 3D tensor of numeric values (row-major storage).
///
/// Strides are internal invariants derived from the shape; indexing is always
/// by `(i, j, k)` and bounds-checked. The model uses `Tensor3<u64>` with shape
/// (classes, filters, entries) for filter counters, and the batch pipeline
/// uses it with shape (samples, filters, hashes) for precomputed hash values.
///
/// # Examples
///
/// ```
/// use sabio::primitives::Tensor3;
///
/// let mut t = Tensor3::zeros(2, 3, 4);
/// t.set(1, 2, 3, 42u64);
/// assert_eq!(t.get(1, 2, 3), 42);
/// assert_eq!(t.shape(), (2, 3, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tensor3<T> {
    data: Vec<T>,
    dim1: usize,
    dim2: usize,
    dim3: usize,
}

impl<T: Copy> Tensor3<T> {
    /// Creates a tensor from flat data in row-major (i, j, k) order.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match the shape.
    pub fn from_vec(
        dim1: usize,
        dim2: usize,
        dim3: usize,
        data: Vec<T>,
    ) -> Result<Self, &'static str> {
        if data.len() != dim1 * dim2 * dim3 {
            return Err("Data length must equal dim1 * dim2 * dim3");
        }
        Ok(Self {
            data,
            dim1,
            dim2,
            dim3,
        })
    }

    /// Returns the shape as (dim1, dim2, dim3).
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.dim1, self.dim2, self.dim3)
    }

    /// Gets element at (i, j, k).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        self.data[self.offset(i, j, k)]
    }

    /// Sets element at (i, j, k).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        let offset = self.offset(i, j, k);
        self.data[offset] = value;
    }

    /// Returns the innermost slice at (i, j), of length dim3.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` are out of bounds.
    #[must_use]
    pub fn slice2(&self, i: usize, j: usize) -> &[T] {
        let start = self.offset(i, j, 0);
        &self.data[start..start + self.dim3]
    }

    /// Returns the mutable innermost slice at (i, j), of length dim3.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` are out of bounds.
    pub fn slice2_mut(&mut self, i: usize, j: usize) -> &mut [T] {
        let start = self.offset(i, j, 0);
        &mut self.data[start..start + self.dim3]
    }

    /// Returns the underlying data as a flat slice in (i, j, k) order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, i: usize, j: usize, k: usize) -> usize {
        assert!(
            i < self.dim1 && j < self.dim2 && k < self.dim3,
            "index out of bounds"
        );
        (i * self.dim2 + j) * self.dim3 + k
    }
}

impl Tensor3<u64> {
    /// Creates a zeroed tensor.
    #[must_use]
    pub fn zeros(dim1: usize, dim2: usize, dim3: usize) -> Self {
        Self {
            data: vec![0; dim1 * dim2 * dim3],
            dim1,
            dim2,
            dim3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let t = Tensor3::zeros(2, 3, 4);
        assert_eq!(t.shape(), (2, 3, 4));
        assert_eq!(t.as_slice().len(), 24);
        assert!(t.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_from_vec_wrong_length() {
        assert!(Tensor3::from_vec(2, 2, 2, vec![0u64; 7]).is_err());
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut t = Tensor3::zeros(2, 2, 2);
        t.set(0, 1, 1, 5);
        t.set(1, 0, 0, 9);
        assert_eq!(t.get(0, 1, 1), 5);
        assert_eq!(t.get(1, 0, 0), 9);
        assert_eq!(t.get(0, 0, 0), 0);
    }

    #[test]
    fn test_slice2_is_innermost_row() {
        let data: Vec<u64> = (0..24).collect();
        let t = Tensor3::from_vec(2, 3, 4, data).expect("valid shape");
        assert_eq!(t.slice2(0, 0), &[0, 1, 2, 3]);
        assert_eq!(t.slice2(1, 2), &[20, 21, 22, 23]);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_get_out_of_bounds() {
        let t = Tensor3::zeros(1, 1, 1);
        let _ = t.get(0, 0, 1);
    }
}
