//! Sabio: a weightless neural network classifier in pure Rust.
//!
//! Sabio implements a bleached WiSARD model: instead of weighted
//! connections, each class owns a bank of counting, hash-indexed membership
//! filters ("bleached" counting Bloom filters). Raw features are binarized
//! with a Gaussian-quantile thermometer encoding, decorrelated by a fixed
//! random bit permutation, chunked into filters, and addressed by H3-family
//! hashes. Training increments the minimal addressed counters of the target
//! class; prediction counts, per class, how many filters recognize the input
//! and takes the argmax.
//!
//! # Quick Start
//!
//! ```
//! use sabio::prelude::*;
//!
//! // Four samples of two raw features each.
//! let raw = Matrix::from_vec(4, 2, vec![
//!     10u8, 200,
//!     12, 210,
//!     200, 10,
//!     210, 12,
//! ]).unwrap();
//!
//! // Thermometer-encode into 3 bits per feature.
//! let mut encoder = ThermometerEncoder::new(3).unwrap();
//! let bits = encoder.fit_transform(&raw).unwrap();
//!
//! // 6 input bits, 2 classes, one 2-bit chunk per filter.
//! let config = WisardConfig::new(6, 2)
//!     .with_filter_inputs(2)
//!     .with_filter_entries(16)
//!     .with_filter_hashes(2)
//!     .with_bits_per_input(3);
//! let mut model = WisardClassifier::with_random_state(&config, 42).unwrap();
//!
//! for (row, &label) in [0usize, 0, 1, 1].iter().enumerate() {
//!     model.train(bits.row(row), label).unwrap();
//! }
//!
//! // Both prediction strategies agree by construction.
//! let direct = model.predict(bits.row(0)).unwrap();
//! let reduced = model.predict2(bits.row(0)).unwrap();
//! assert_eq!(direct, reduced);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Matrix, 3D tensor, and byte-per-bit containers
//! - [`stats`]: Gaussian quantiles and per-feature dataset moments
//! - [`preprocessing`]: thermometer binarization of raw scalars
//! - [`wisard`]: the model engine (permutation, H3 hashing, filters)
//! - [`batch`]: batch hashing/prediction and the offload reduction contract
//! - [`serialization`]: fixed binary model persistence
//! - [`error`]: crate error type

pub mod batch;
pub mod error;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod serialization;
pub mod stats;
pub mod wisard;
