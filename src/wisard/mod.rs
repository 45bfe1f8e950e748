//! Weightless neural network classifier (bleached WiSARD).
//!
//! The model is an ensemble of counting, hash-indexed membership filters:
//! one *discriminator* per class, each a bank of counting Bloom filters.
//! Training increments filter counters addressed by H3 hashes of the
//! permuted input; prediction counts how many of a class's filters
//! "recognize" the input (minimum addressed counter at or above the bleach
//! threshold) and picks the class with the largest response.
//!
//! # Example
//!
//! ```
//! use sabio::prelude::*;
//!
//! let config = WisardConfig::new(64, 10)
//!     .with_filter_inputs(8)
//!     .with_filter_entries(64)
//!     .with_filter_hashes(2);
//! let mut model = WisardClassifier::with_random_state(&config, 42).unwrap();
//!
//! let sample = vec![1u8; 64];
//! model.train(&sample, 3).unwrap();
//! // Every filter of class 3 recognizes the trained sample.
//! assert_eq!(model.predict(&sample).unwrap(), 3);
//! // Both prediction strategies agree on every input.
//! assert_eq!(model.predict2(&sample).unwrap(), 3);
//! ```

pub mod hashing;
pub mod permutation;

use crate::error::{Result, SabioError};
use crate::primitives::{BitMatrix, Matrix, Tensor3};
use hashing::{generate_h3_parameters, h3_hash};
use permutation::InputPermutation;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for a [`WisardClassifier`].
///
/// Defaults match the MNIST reference setup: 28-bit filter chunks, 1024
/// entries per filter, 2 hash functions, 2-bit thermometer encoding, bleach 1.
///
/// # Example
///
/// ```
/// use sabio::wisard::WisardConfig;
///
/// let config = WisardConfig::new(784 * 2, 10).with_bleach(10);
/// assert_eq!(config.num_classes, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisardConfig {
    /// Total unpadded input width in bits (features × `bits_per_input`).
    pub input_bits: usize,
    /// Number of output classes.
    pub num_classes: usize,
    /// Bits consumed by each filter chunk.
    pub filter_inputs: usize,
    /// Counters per filter; must be a power of two.
    pub filter_entries: usize,
    /// Hash functions per filter.
    pub filter_hashes: usize,
    /// Thermometer width the inputs were encoded with.
    pub bits_per_input: usize,
    /// Membership threshold: minimum addressed counter for a filter to fire.
    pub bleach: u8,
}

impl WisardConfig {
    /// Creates a configuration with reference defaults.
    #[must_use]
    pub fn new(input_bits: usize, num_classes: usize) -> Self {
        Self {
            input_bits,
            num_classes,
            filter_inputs: 28,
            filter_entries: 1024,
            filter_hashes: 2,
            bits_per_input: 2,
            bleach: 1,
        }
    }

    /// Sets the number of bits per filter chunk.
    #[must_use]
    pub fn with_filter_inputs(mut self, filter_inputs: usize) -> Self {
        self.filter_inputs = filter_inputs;
        self
    }

    /// Sets the number of counters per filter (must be a power of two).
    #[must_use]
    pub fn with_filter_entries(mut self, filter_entries: usize) -> Self {
        self.filter_entries = filter_entries;
        self
    }

    /// Sets the number of hash functions per filter.
    #[must_use]
    pub fn with_filter_hashes(mut self, filter_hashes: usize) -> Self {
        self.filter_hashes = filter_hashes;
        self
    }

    /// Sets the thermometer width metadata.
    #[must_use]
    pub fn with_bits_per_input(mut self, bits_per_input: usize) -> Self {
        self.bits_per_input = bits_per_input;
        self
    }

    /// Sets the bleach threshold.
    #[must_use]
    pub fn with_bleach(mut self, bleach: u8) -> Self {
        self.bleach = bleach;
        self
    }

    fn validate(&self) -> Result<()> {
        let nonzero: [(&str, usize); 5] = [
            ("input_bits", self.input_bits),
            ("num_classes", self.num_classes),
            ("filter_inputs", self.filter_inputs),
            ("filter_hashes", self.filter_hashes),
            ("bits_per_input", self.bits_per_input),
        ];
        for (param, value) in nonzero {
            if value == 0 {
                return Err(SabioError::InvalidHyperparameter {
                    param: param.to_string(),
                    value: value.to_string(),
                    constraint: "nonzero".to_string(),
                });
            }
        }
        // XOR-combined H3 hashes stay below filter_entries only when it is a
        // power of two; anything else lets hash values escape the filter.
        if !self.filter_entries.is_power_of_two() {
            return Err(SabioError::InvalidHyperparameter {
                param: "filter_entries".to_string(),
                value: self.filter_entries.to_string(),
                constraint: "a power of two".to_string(),
            });
        }
        if self.bleach == 0 {
            return Err(SabioError::InvalidHyperparameter {
                param: "bleach".to_string(),
                value: "0".to_string(),
                constraint: "at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Weightless neural network classifier over bleached counting filters.
///
/// Owns the full model state: derived configuration, the fixed input
/// permutation, the shared H3 hash parameters, and the per-(class, filter)
/// counter tensor. Training mutates counters for the target class only;
/// prediction is read-only (`&self`) and safe to run concurrently across
/// samples, classes, and filters once training is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisardClassifier {
    pad_zeros: usize,
    num_inputs_total: usize,
    bits_per_input: usize,
    num_classes: usize,
    num_filters: usize,
    filter_inputs: usize,
    filter_entries: usize,
    filter_hashes: usize,
    bleach: u8,
    /// One source position per target slot; part of model identity.
    input_order: InputPermutation,
    /// Shape (filter_hashes, filter_inputs); shared across classes and filters.
    hash_parameters: Matrix<u64>,
    /// Shape (num_classes, num_filters, filter_entries).
    data: Tensor3<u64>,
}

impl WisardClassifier {
    /// Creates a model with entropy-seeded permutation and hash parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (zero sizes, or
    /// `filter_entries` not a power of two).
    pub fn new(config: &WisardConfig) -> Result<Self> {
        Self::init(config, None)
    }

    /// Creates a model with a reproducible permutation and hash parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_random_state(config: &WisardConfig, seed: u64) -> Result<Self> {
        Self::init(config, Some(seed))
    }

    fn init(config: &WisardConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;

        let pad_zeros =
            (config.filter_inputs - config.input_bits % config.filter_inputs) % config.filter_inputs;
        let num_inputs_total = config.input_bits + pad_zeros;
        let num_filters = num_inputs_total / config.filter_inputs;

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let input_order = InputPermutation::generate_with(num_inputs_total, &mut rng);
        let hash_parameters = generate_h3_parameters(
            config.filter_hashes,
            config.filter_inputs,
            config.filter_entries as u64,
            &mut rng,
        );

        Ok(Self {
            pad_zeros,
            num_inputs_total,
            bits_per_input: config.bits_per_input,
            num_classes: config.num_classes,
            num_filters,
            filter_inputs: config.filter_inputs,
            filter_entries: config.filter_entries,
            filter_hashes: config.filter_hashes,
            bleach: config.bleach,
            input_order,
            hash_parameters,
            data: Tensor3::zeros(config.num_classes, num_filters, config.filter_entries),
        })
    }

    /// Rebuilds a model from explicit state (deserialized or externally set).
    ///
    /// All invariants are validated: the order must be a true permutation
    /// sized to the counter tensor's filter layout, hash parameters must fit
    /// the chunk width and stay below `filter_entries`, and `filter_entries`
    /// must be a power of two.
    ///
    /// # Errors
    ///
    /// Returns an error if any piece of state is inconsistent.
    pub fn from_parts(
        pad_zeros: usize,
        bits_per_input: usize,
        bleach: u8,
        input_order: InputPermutation,
        hash_parameters: Matrix<u64>,
        data: Tensor3<u64>,
    ) -> Result<Self> {
        let (num_classes, num_filters, filter_entries) = data.shape();
        let (filter_hashes, filter_inputs) = hash_parameters.shape();
        let num_inputs_total = input_order.len();

        let config = WisardConfig {
            input_bits: num_inputs_total.saturating_sub(pad_zeros),
            num_classes,
            filter_inputs,
            filter_entries,
            filter_hashes,
            bits_per_input,
            bleach,
        };
        config.validate()?;

        if pad_zeros >= filter_inputs || num_inputs_total % filter_inputs != 0 {
            return Err(SabioError::FormatError {
                message: format!(
                    "padding {pad_zeros} inconsistent with {num_inputs_total} inputs in chunks of {filter_inputs}"
                ),
            });
        }
        if num_inputs_total / filter_inputs != num_filters {
            return Err(SabioError::FormatError {
                message: format!(
                    "{num_inputs_total} inputs in chunks of {filter_inputs} do not form {num_filters} filters"
                ),
            });
        }
        if let Some(&param) = hash_parameters
            .as_slice()
            .iter()
            .find(|&&p| p >= filter_entries as u64)
        {
            return Err(SabioError::FormatError {
                message: format!("hash parameter {param} outside [0, {filter_entries})"),
            });
        }

        Ok(Self {
            pad_zeros,
            num_inputs_total,
            bits_per_input,
            num_classes,
            num_filters,
            filter_inputs,
            filter_entries,
            filter_hashes,
            bleach,
            input_order,
            hash_parameters,
            data,
        })
    }

    /// Total input width in bits after zero padding.
    #[must_use]
    pub fn num_inputs_total(&self) -> usize {
        self.num_inputs_total
    }

    /// Zero bits appended so the input divides evenly into filter chunks.
    #[must_use]
    pub fn pad_zeros(&self) -> usize {
        self.pad_zeros
    }

    /// Thermometer width the inputs were encoded with.
    #[must_use]
    pub fn bits_per_input(&self) -> usize {
        self.bits_per_input
    }

    /// Number of output classes (discriminators).
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of filters per discriminator.
    #[must_use]
    pub fn num_filters(&self) -> usize {
        self.num_filters
    }

    /// Bits per filter chunk.
    #[must_use]
    pub fn filter_inputs(&self) -> usize {
        self.filter_inputs
    }

    /// Counters per filter.
    #[must_use]
    pub fn filter_entries(&self) -> usize {
        self.filter_entries
    }

    /// Hash functions per filter.
    #[must_use]
    pub fn filter_hashes(&self) -> usize {
        self.filter_hashes
    }

    /// Current bleach threshold.
    #[must_use]
    pub fn bleach(&self) -> u8 {
        self.bleach
    }

    /// Adjusts the bleach threshold (commonly tuned after training).
    ///
    /// # Errors
    ///
    /// Returns an error if `bleach` is 0.
    pub fn set_bleach(&mut self, bleach: u8) -> Result<()> {
        if bleach == 0 {
            return Err(SabioError::InvalidHyperparameter {
                param: "bleach".to_string(),
                value: "0".to_string(),
                constraint: "at least 1".to_string(),
            });
        }
        self.bleach = bleach;
        Ok(())
    }

    /// The model's fixed input permutation.
    #[must_use]
    pub fn input_order(&self) -> &InputPermutation {
        &self.input_order
    }

    /// H3 hash parameters, shape (`filter_hashes`, `filter_inputs`).
    #[must_use]
    pub fn hash_parameters(&self) -> &Matrix<u64> {
        &self.hash_parameters
    }

    /// Filter counters, shape (`num_classes`, `num_filters`, `filter_entries`).
    #[must_use]
    pub fn counters(&self) -> &Tensor3<u64> {
        &self.data
    }

    /// Permutes a sample into a fresh caller-owned buffer, zero padding if
    /// the sample carries only the unpadded bit count.
    fn reorder(&self, input: &[u8]) -> Result<Vec<u8>> {
        let unpadded = self.num_inputs_total - self.pad_zeros;
        let mut out = vec![0u8; self.num_inputs_total];
        if input.len() == self.num_inputs_total {
            self.input_order.apply_into(input, &mut out);
        } else if input.len() == unpadded {
            let mut padded = vec![0u8; self.num_inputs_total];
            padded[..unpadded].copy_from_slice(input);
            self.input_order.apply_into(&padded, &mut out);
        } else {
            return Err(SabioError::DimensionMismatch {
                expected: format!("{unpadded} or {} input bits", self.num_inputs_total),
                actual: input.len().to_string(),
            });
        }
        Ok(out)
    }

    /// Membership test: minimum addressed counter at or above bleach.
    fn filter_check(&self, class: usize, filter: usize, chunk: &[u8]) -> bool {
        let counters = self.data.slice2(class, filter);
        let mut minimum = u64::MAX;
        for h in 0..self.filter_hashes {
            let index = h3_hash(chunk, self.hash_parameters.row_slice(h)) as usize;
            minimum = minimum.min(counters[index]);
        }
        minimum >= u64::from(self.bleach)
    }

    /// Conservative update: increment only the currently-minimal addressed
    /// counters, using values read before any increment.
    fn filter_add(&mut self, class: usize, filter: usize, chunk: &[u8], indices: &mut Vec<usize>) {
        indices.clear();
        for h in 0..self.filter_hashes {
            indices.push(h3_hash(chunk, self.hash_parameters.row_slice(h)) as usize);
        }
        let counters = self.data.slice2_mut(class, filter);
        let minimum = indices.iter().map(|&i| counters[i]).fold(u64::MAX, u64::min);
        for &i in indices.iter() {
            if counters[i] == minimum {
                counters[i] = minimum + 1;
            }
        }
    }

    /// Number of this class's filters that recognize the (already permuted) input.
    fn discriminator_response(&self, class: usize, reordered: &[u8]) -> u64 {
        reordered
            .chunks_exact(self.filter_inputs)
            .enumerate()
            .map(|(filter, chunk)| u64::from(self.filter_check(class, filter, chunk)))
            .sum()
    }

    fn discriminator_train(&mut self, class: usize, reordered: &[u8]) {
        let mut indices = Vec::with_capacity(self.filter_hashes);
        let chunks = reordered.len() / self.filter_inputs;
        for filter in 0..chunks {
            let start = filter * self.filter_inputs;
            let chunk = &reordered[start..start + self.filter_inputs];
            self.filter_add(class, filter, chunk, &mut indices);
        }
    }

    /// Trains one sample into the target class's discriminator.
    ///
    /// Counters of other classes are untouched. Training is inherently
    /// sequential per model: reproducible counters require a defined sample
    /// order, which the `&mut self` borrow enforces.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is out of range or the input length
    /// matches neither the unpadded nor the padded bit count.
    pub fn train(&mut self, input: &[u8], target: usize) -> Result<()> {
        if target >= self.num_classes {
            return Err(SabioError::DimensionMismatch {
                expected: format!("class index < {}", self.num_classes),
                actual: target.to_string(),
            });
        }
        let reordered = self.reorder(input)?;
        self.discriminator_train(target, &reordered);
        Ok(())
    }

    /// Response of one class's discriminator for one sample: the number of
    /// its filters that recognize the input.
    ///
    /// # Errors
    ///
    /// Returns an error if `class` is out of range or the input length is
    /// wrong.
    pub fn class_response(&self, class: usize, input: &[u8]) -> Result<u64> {
        if class >= self.num_classes {
            return Err(SabioError::DimensionMismatch {
                expected: format!("class index < {}", self.num_classes),
                actual: class.to_string(),
            });
        }
        let reordered = self.reorder(input)?;
        Ok(self.discriminator_response(class, &reordered))
    }

    /// Predicts the class of one sample (direct form).
    ///
    /// Runs every class's discriminator independently, recomputing hashes per
    /// class. Ties resolve to the highest class index with the maximal
    /// response: the scan replaces the leader on `>=`.
    ///
    /// # Errors
    ///
    /// Returns an error on input length mismatch.
    pub fn predict(&self, input: &[u8]) -> Result<usize> {
        let reordered = self.reorder(input)?;
        Ok(argmax_response(
            (0..self.num_classes).map(|class| self.discriminator_response(class, &reordered)),
        ))
    }

    /// Predicts the class of one sample (precompute-then-reduce form).
    ///
    /// Hashes the input exactly once, then reduces the hash tensor against
    /// every class's counters. Produces the same answer as [`predict`] for
    /// every model state and input; it exists to amortize hashing across
    /// classes.
    ///
    /// [`predict`]: WisardClassifier::predict
    ///
    /// # Errors
    ///
    /// Returns an error on input length mismatch.
    pub fn predict2(&self, input: &[u8]) -> Result<usize> {
        let hashes = self.perform_hashing(input)?;
        self.predict_from_hashes(&hashes)
    }

    /// Computes the hash tensor for one sample: one value per
    /// (filter, hash function), shape (`num_filters`, `filter_hashes`).
    ///
    /// Class-independent; used by [`predict2`] and by batch/offload
    /// pipelines that ship hashes to an external reduction backend.
    ///
    /// [`predict2`]: WisardClassifier::predict2
    ///
    /// # Errors
    ///
    /// Returns an error on input length mismatch.
    pub fn perform_hashing(&self, input: &[u8]) -> Result<Matrix<u64>> {
        let reordered = self.reorder(input)?;
        let mut hashes = Matrix::from_elem(self.num_filters, self.filter_hashes, 0u64);
        for (filter, chunk) in reordered.chunks_exact(self.filter_inputs).enumerate() {
            for h in 0..self.filter_hashes {
                hashes.set(filter, h, h3_hash(chunk, self.hash_parameters.row_slice(h)));
            }
        }
        Ok(hashes)
    }

    /// Reduces a precomputed hash tensor to a predicted class.
    ///
    /// For every (class, filter) pair, takes the minimum counter among the
    /// filter's hash slots, thresholds it against bleach, popcounts per
    /// class, and applies the same tie-break as [`predict`]. This is the
    /// reduction rule an offload backend must reproduce to be conformant.
    ///
    /// [`predict`]: WisardClassifier::predict
    ///
    /// # Errors
    ///
    /// Returns an error if the tensor shape or any hash value doesn't match
    /// this model.
    pub fn predict_from_hashes(&self, hashes: &Matrix<u64>) -> Result<usize> {
        if hashes.shape() != (self.num_filters, self.filter_hashes) {
            return Err(SabioError::DimensionMismatch {
                expected: format!("({}, {}) hash tensor", self.num_filters, self.filter_hashes),
                actual: format!("{:?}", hashes.shape()),
            });
        }
        if let Some(&bad) = hashes
            .as_slice()
            .iter()
            .find(|&&h| h >= self.filter_entries as u64)
        {
            return Err(SabioError::Other(format!(
                "hash value {bad} outside [0, {}) filter entries",
                self.filter_entries
            )));
        }

        let bleach = u64::from(self.bleach);
        Ok(argmax_response((0..self.num_classes).map(|class| {
            (0..self.num_filters)
                .map(|filter| {
                    let reduced = filter_reduction(
                        self.data.slice2(class, filter),
                        hashes.row_slice(filter),
                    );
                    u64::from(reduced >= bleach)
                })
                .sum()
        })))
    }

    /// Classification accuracy over a batch of binarized samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the label count differs from the sample count, or
    /// any sample has the wrong width.
    pub fn score(&self, samples: &BitMatrix, labels: &[usize]) -> Result<f32> {
        if samples.n_rows() != labels.len() {
            return Err(SabioError::DimensionMismatch {
                expected: format!("{} labels", samples.n_rows()),
                actual: labels.len().to_string(),
            });
        }
        if samples.n_rows() == 0 {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for (row, &label) in labels.iter().enumerate() {
            if self.predict2(samples.row(row))? == label {
                correct += 1;
            }
        }
        Ok(correct as f32 / labels.len() as f32)
    }
}

/// Minimum counter value among a filter's addressed slots.
fn filter_reduction(counters: &[u64], hashes: &[u64]) -> u64 {
    hashes
        .iter()
        .map(|&h| counters[h as usize])
        .fold(u64::MAX, u64::min)
}

/// Argmax with the mandatory tie-break: scanning in increasing class order,
/// `>=` lets a later equal response overwrite the leader, so ties resolve to
/// the highest class index.
fn argmax_response(responses: impl Iterator<Item = u64>) -> usize {
    let mut best_response = 0u64;
    let mut best_class = 0usize;
    for (class, response) in responses.enumerate() {
        if response >= best_response {
            best_response = response;
            best_class = class;
        }
    }
    best_class
}
