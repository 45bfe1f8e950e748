//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use sabio::prelude::*;
//! ```

pub use crate::batch::{batch_hashing, batch_predict, batch_predict_from_hashes};
pub use crate::error::{Result, SabioError};
pub use crate::preprocessing::ThermometerEncoder;
pub use crate::primitives::{BitMatrix, Matrix, Tensor3};
pub use crate::serialization::{load_model, save_model};
pub use crate::wisard::{WisardClassifier, WisardConfig};
