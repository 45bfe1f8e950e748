//! End-to-end tests: binarize, train, predict, persist.

use sabio::prelude::*;
use sabio::wisard::permutation::InputPermutation;

/// Synthetic two-class dataset: class 0 lives near intensity 40, class 1
/// near intensity 200, 16 features per sample, deterministic jitter.
fn synthetic_dataset(samples_per_class: usize) -> (Matrix<u8>, Vec<usize>) {
    let n_features = 16;
    let mut data = Vec::with_capacity(2 * samples_per_class * n_features);
    let mut labels = Vec::with_capacity(2 * samples_per_class);
    for sample_it in 0..2 * samples_per_class {
        let class = sample_it % 2;
        let base: i32 = if class == 0 { 40 } else { 200 };
        for feature in 0..n_features {
            // Small deterministic jitter, distinct per sample and feature.
            let jitter = ((sample_it * 31 + feature * 17) % 21) as i32 - 10;
            data.push((base + jitter).clamp(0, 255) as u8);
        }
        labels.push(class);
    }
    let matrix = Matrix::from_vec(2 * samples_per_class, n_features, data)
        .expect("valid matrix dimensions");
    (matrix, labels)
}

#[test]
fn test_train_and_classify_separable_clusters() {
    let (raw, labels) = synthetic_dataset(30);

    let bits_per_input = 4;
    let mut encoder = ThermometerEncoder::new(bits_per_input).expect("valid bit width");
    let encoded = encoder.fit_transform(&raw).expect("fit_transform succeeds");
    assert_eq!(encoded.n_cols(), 16 * bits_per_input);

    let config = WisardConfig::new(encoded.n_cols(), 2)
        .with_filter_inputs(8)
        .with_filter_entries(256)
        .with_filter_hashes(2)
        .with_bits_per_input(bits_per_input);
    let mut model = WisardClassifier::with_random_state(&config, 42).expect("valid config");

    for row in 0..encoded.n_rows() {
        model.train(encoded.row(row), labels[row]).expect("train");
    }

    // Well-separated clusters must classify far above chance on the
    // training distribution.
    let accuracy = model.score(&encoded, &labels).expect("score");
    assert!(accuracy > 0.9, "accuracy {accuracy} too low for separable data");
}

#[test]
fn test_prediction_strategies_agree_across_dataset() {
    let (raw, labels) = synthetic_dataset(20);
    let mut encoder = ThermometerEncoder::new(3).expect("valid bit width");
    let encoded = encoder.fit_transform(&raw).expect("fit_transform succeeds");

    let config = WisardConfig::new(encoded.n_cols(), 2)
        .with_filter_inputs(6)
        .with_filter_entries(64)
        .with_filter_hashes(3)
        .with_bits_per_input(3);
    let mut model = WisardClassifier::with_random_state(&config, 7).expect("valid config");
    for row in 0..encoded.n_rows() {
        model.train(encoded.row(row), labels[row]).expect("train");
    }

    for row in 0..encoded.n_rows() {
        assert_eq!(
            model.predict(encoded.row(row)).expect("predict"),
            model.predict2(encoded.row(row)).expect("predict2"),
        );
    }

    let batch = batch_predict(&model, &encoded).expect("batch predict");
    for (row, &class) in batch.iter().enumerate() {
        assert_eq!(class, model.predict(encoded.row(row)).expect("predict"));
    }
}

#[test]
fn test_model_survives_save_and_load() {
    let (raw, labels) = synthetic_dataset(15);
    let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
    let encoded = encoder.fit_transform(&raw).expect("fit_transform succeeds");

    let config = WisardConfig::new(encoded.n_cols(), 2)
        .with_filter_inputs(4)
        .with_filter_entries(128)
        .with_bits_per_input(2)
        .with_bleach(2);
    let mut model = WisardClassifier::with_random_state(&config, 99).expect("valid config");
    for row in 0..encoded.n_rows() {
        model.train(encoded.row(row), labels[row]).expect("train");
    }

    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("wnn.dat");
    save_model(&model, &path).expect("save");
    let restored = load_model(&path).expect("load");

    assert_eq!(model, restored);
    for row in 0..encoded.n_rows() {
        assert_eq!(
            model.predict2(encoded.row(row)).expect("predict2"),
            restored.predict2(encoded.row(row)).expect("predict2"),
        );
    }
}

#[test]
fn test_reference_scenario() {
    // Two classes, one 2-bit filter with 4 power-of-two entries, a single
    // hash function, bleach 1. Fixed parts make the outcome exact.
    let order = InputPermutation::from_order(vec![0, 1]).expect("identity order");
    let params = Matrix::from_vec(1, 2, vec![1u64, 2]).expect("valid shape");
    let counters = Tensor3::zeros(2, 1, 4);
    let mut model = WisardClassifier::from_parts(0, 1, 1, order, params, counters)
        .expect("consistent model");

    model.train(&[1, 0], 0).expect("train class 0");
    model.train(&[0, 1], 1).expect("train class 1");

    // The trained pattern is recognized by its own class only.
    assert_eq!(model.predict(&[1, 0]).expect("predict"), 0);
    // An unseen input draws response 0 from both discriminators; the
    // tie-break picks the higher class index.
    assert_eq!(model.predict(&[0, 0]).expect("predict"), 1);
}

#[test]
fn test_bleach_sweep_after_training() {
    // Raising bleach post-training only ever lowers responses; predictions
    // stay consistent between the two strategies at every threshold.
    let (raw, labels) = synthetic_dataset(10);
    let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
    let encoded = encoder.fit_transform(&raw).expect("fit_transform succeeds");

    let config = WisardConfig::new(encoded.n_cols(), 2)
        .with_filter_inputs(4)
        .with_filter_entries(64)
        .with_bits_per_input(2);
    let mut model = WisardClassifier::with_random_state(&config, 5).expect("valid config");
    for row in 0..encoded.n_rows() {
        model.train(encoded.row(row), labels[row]).expect("train");
    }

    let probe = encoded.row(0);
    let mut prev_response = u64::MAX;
    for bleach in 1..=4u8 {
        model.set_bleach(bleach).expect("valid bleach");
        let response = model.class_response(0, probe).expect("response");
        assert!(response <= prev_response);
        prev_response = response;
        assert_eq!(
            model.predict(probe).expect("predict"),
            model.predict2(probe).expect("predict2"),
        );
    }
}
