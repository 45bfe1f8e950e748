//! Core data containers (Matrix, Tensor3, BitMatrix).
//!
//! These types provide the strided buffers the model engine works on:
//! 2D matrices for datasets and hash parameters, a 3D tensor for filter
//! counters, and a byte-per-bit matrix for binarized samples.

mod bitmatrix;
mod matrix;
mod tensor;

pub use bitmatrix::BitMatrix;
pub use matrix::Matrix;
pub use tensor::Tensor3;
