//! Byte-per-bit matrix for binarized samples.

use serde::{Deserialize, Serialize};

/// A matrix of 0/1 values stored one byte per bit, one row per sample.
///
/// This is the exchange format between the thermometer encoder and the
/// model: row length equals the model's total input bit count and every
/// element is 0 or 1. The byte-per-bit layout trades memory for simple
/// chunked slicing during hashing.
///
/// # Examples
///
/// ```
/// use sabio::primitives::BitMatrix;
///
/// let mut samples = BitMatrix::zeros(2, 4);
/// samples.set(0, 1, 1);
/// assert_eq!(samples.row(0), &[0, 1, 0, 0]);
/// assert_eq!(samples.n_rows(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitMatrix {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl BitMatrix {
    /// Creates a zeroed bit matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates a bit matrix from flat row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols or any
    /// element is not 0 or 1.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        if data.iter().any(|&b| b > 1) {
            return Err("BitMatrix elements must be 0 or 1");
        }
        Ok(Self { data, rows, cols })
    }

    /// Returns the number of rows (samples).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns (bits per sample).
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets the bit at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    /// Sets the bit at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds or `value` is not 0 or 1.
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        assert!(value <= 1, "bit value must be 0 or 1");
        self.data[row * self.cols + col] = value;
    }

    /// Returns one sample row as a slice of 0/1 bytes.
    ///
    /// # Panics
    ///
    /// Panics if the row index is out of bounds.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> &[u8] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = BitMatrix::zeros(3, 5);
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 5);
        assert!(m.row(2).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_vec_rejects_non_bits() {
        assert!(BitMatrix::from_vec(1, 3, vec![0, 1, 2]).is_err());
        assert!(BitMatrix::from_vec(1, 3, vec![0, 1, 1]).is_ok());
    }

    #[test]
    fn test_from_vec_wrong_length() {
        assert!(BitMatrix::from_vec(2, 3, vec![0; 5]).is_err());
    }

    #[test]
    fn test_set_row() {
        let mut m = BitMatrix::zeros(2, 3);
        m.set(1, 0, 1);
        m.set(1, 2, 1);
        assert_eq!(m.row(1), &[1, 0, 1]);
        assert_eq!(m.row(0), &[0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "bit value must be 0 or 1")]
    fn test_set_rejects_non_bit() {
        let mut m = BitMatrix::zeros(1, 1);
        m.set(0, 0, 3);
    }
}
