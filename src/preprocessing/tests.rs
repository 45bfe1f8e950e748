//! Tests for the thermometer encoder.

use super::*;

#[test]
fn test_new_rejects_zero_bits() {
    assert!(ThermometerEncoder::new(0).is_err());
    assert!(ThermometerEncoder::new(1).is_ok());
    assert!(ThermometerEncoder::new(64).is_ok());
    assert!(ThermometerEncoder::new(65).is_err());
}

#[test]
fn test_not_fitted_initially() {
    let encoder = ThermometerEncoder::new(2).expect("valid bit width");
    assert!(!encoder.is_fitted());
}

#[test]
fn test_transform_before_fit_fails() {
    let encoder = ThermometerEncoder::new(2).expect("valid bit width");
    let x = Matrix::from_elem(2, 2, 0u8);
    assert!(encoder.transform(&x).is_err());
}

#[test]
fn test_fit_computes_moments() {
    let x = Matrix::from_vec(4, 1, vec![0u8, 10, 20, 30]).expect("valid matrix dimensions");
    let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
    encoder.fit(&x).expect("fit should succeed");

    assert!(encoder.is_fitted());
    assert!((encoder.mean()[0] - 15.0).abs() < 1e-9);
    // Sample std of [0, 10, 20, 30] is sqrt(500/3).
    assert!((encoder.std()[0] - (500.0f64 / 3.0).sqrt()).abs() < 1e-9);
}

#[test]
fn test_two_bit_encoding_splits_at_mean() {
    // b = 2 has a single threshold at gaussian_quantile(0.5) = 0, i.e. the mean.
    let x = Matrix::from_vec(4, 1, vec![0u8, 10, 20, 30]).expect("valid matrix dimensions");
    let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
    let bits = encoder.fit_transform(&x).expect("fit_transform should succeed");

    // Below the mean: bucket 0, both bits set. Above: bucket 1, one bit set.
    assert_eq!(bits.row(0), &[1, 1]);
    assert_eq!(bits.row(1), &[1, 1]);
    assert_eq!(bits.row(2), &[1, 0]);
    assert_eq!(bits.row(3), &[1, 0]);
}

#[test]
fn test_bucket_index_monotonic_in_value() {
    let x = Matrix::from_vec(5, 1, vec![0u8, 50, 100, 150, 200]).expect("valid matrix dimensions");
    let mut encoder = ThermometerEncoder::new(8).expect("valid bit width");
    encoder.fit(&x).expect("fit should succeed");

    let mut prev = 0;
    for v in 0..=255 {
        let bucket = encoder.bucket_index(f64::from(v), 0);
        assert!(bucket < 8);
        assert!(bucket >= prev, "bucket index must be non-decreasing");
        prev = bucket;
    }
}

#[test]
fn test_set_bits_form_contiguous_low_run() {
    let x = Matrix::from_vec(6, 1, vec![0u8, 40, 80, 120, 160, 200]).expect("valid matrix dimensions");
    let mut encoder = ThermometerEncoder::new(4).expect("valid bit width");
    let bits = encoder.fit_transform(&x).expect("fit_transform should succeed");

    for row in 0..6 {
        let group = bits.row(row);
        let ones = group.iter().filter(|&&b| b == 1).count();
        assert!(ones >= 1, "every bucket sets at least one bit");
        // Ones must be the low `ones` positions, zeros the rest.
        for (i, &b) in group.iter().enumerate() {
            assert_eq!(b, u8::from(i < ones));
        }
    }
}

#[test]
fn test_single_bit_degenerates_without_panic() {
    let x = Matrix::from_vec(3, 2, vec![0u8, 255, 10, 100, 20, 0]).expect("valid matrix dimensions");
    let mut encoder = ThermometerEncoder::new(1).expect("valid bit width");
    let bits = encoder.fit_transform(&x).expect("fit_transform should succeed");

    assert_eq!(bits.n_cols(), 2);
    // No thresholds exist: every feature lands in bucket 0 with its bit set.
    for row in 0..3 {
        assert_eq!(bits.row(row), &[1, 1]);
    }
}

#[test]
fn test_transform_rejects_feature_mismatch() {
    let train = Matrix::from_elem(3, 4, 1u8);
    let test = Matrix::from_elem(3, 5, 1u8);
    let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
    encoder.fit(&train).expect("fit should succeed");
    assert!(encoder.transform(&test).is_err());
}

#[test]
fn test_fit_rejects_empty() {
    let x = Matrix::from_vec(0, 3, vec![]).expect("valid matrix dimensions");
    let mut encoder = ThermometerEncoder::new(2).expect("valid bit width");
    assert!(encoder.fit(&x).is_err());
}

#[test]
fn test_constant_feature_has_zero_std() {
    // All values equal: std 0, every comparison v > 0 * std + mean is false.
    let x = Matrix::from_elem(4, 1, 128u8);
    let mut encoder = ThermometerEncoder::new(4).expect("valid bit width");
    let bits = encoder.fit_transform(&x).expect("fit_transform should succeed");
    for row in 0..4 {
        // Bucket depends only on thresholds at the mean; encoding stays constant.
        let ones = bits.row(row).iter().filter(|&&b| b == 1).count();
        assert!(ones >= 1);
    }
}
