//! Tests for calibration and fixed-point conversion

use super::*;
use crate::weights::{DepthwiseWeights, FirmwareGeometry, ModelWeights, PointwiseWeights};
use approx::assert_abs_diff_eq;
use ndarray::{arr1, Array2, Array3};
use proptest::prelude::*;

fn weights_from(dw: Vec<f32>, pw: Vec<f32>) -> ModelWeights {
    let g = FirmwareGeometry::FIRMWARE;
    ModelWeights::new(
        DepthwiseWeights::new(Array3::from_shape_vec((3, 3, 3), dw).unwrap(), &g).unwrap(),
        PointwiseWeights::new(Array2::from_shape_vec((10, 3), pw).unwrap(), &g).unwrap(),
    )
}

// ========================================================================
// PROPERTY TESTS
// ========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// Output codes stay inside [0, 255] for any finite input, including
    /// magnitudes far beyond the calibrated range
    #[test]
    fn prop_quantized_codes_in_range(
        values in prop::collection::vec(prop::num::f32::NORMAL | prop::num::f32::ZERO, 1..64),
        scale in 1e-6f32..10.0,
    ) {
        let params = QuantParams::new(scale, WEIGHT_ZERO_POINT);
        let q = quantize_u8(&arr1(&values), &params);
        prop_assert_eq!(q.len(), values.len());
        // u8 already bounds the value; make sure extremes hit the rails
        for (&w, &code) in values.iter().zip(q.iter()) {
            if w / scale > 200.0 {
                prop_assert_eq!(code, 255);
            }
            if w / scale < -200.0 {
                prop_assert_eq!(code, 0);
            }
        }
    }

    /// Calibration is pure: same tensors, same scale
    #[test]
    fn prop_calibration_is_idempotent(
        dw in prop::collection::vec(-5.0f32..5.0, 27),
        pw in prop::collection::vec(-5.0f32..5.0, 30),
    ) {
        let weights = weights_from(dw, pw);
        let a = calibrate_shared_scale(&weights, WEIGHT_ZERO_POINT);
        let b = calibrate_shared_scale(&weights, WEIGHT_ZERO_POINT);
        prop_assert_eq!(a, b);
        prop_assert!(a.params.scale > 0.0);
    }

    /// With the calibrated scale nothing saturates and the error is at most
    /// half a step
    #[test]
    fn prop_calibrated_scale_never_saturates(
        dw in prop::collection::vec(-3.0f32..3.0, 27),
        pw in prop::collection::vec(-3.0f32..3.0, 30),
    ) {
        let weights = weights_from(dw, pw);
        let params = calibrate_shared_scale(&weights, WEIGHT_ZERO_POINT).params;
        let stats = quant_stats(weights.depthwise.array(), &params);
        prop_assert_eq!(stats.saturated, 0);
        prop_assert!(stats.max_abs_error <= params.scale * 0.5 + 1e-6);
    }

    /// The scale covers the largest magnitude of either tensor
    #[test]
    fn prop_scale_tracks_union_max(
        dw in prop::collection::vec(-1.0f32..1.0, 27),
        spike in 1.5f32..50.0,
    ) {
        let mut pw = vec![0.0f32; 30];
        pw[17] = -spike;
        let result = calibrate_shared_scale(&weights_from(dw, pw), WEIGHT_ZERO_POINT);
        prop_assert_eq!(result.observed_max_abs, spike);
        prop_assert!((result.params.scale - spike / 127.0).abs() <= spike * 1e-6);
    }
}

// ========================================================================
// CALIBRATION
// ========================================================================

#[test]
fn test_scale_is_max_abs_over_127() {
    let mut dw = vec![0.1f32; 27];
    dw[5] = -0.635;
    let result = calibrate_shared_scale(&weights_from(dw, vec![0.2; 30]), WEIGHT_ZERO_POINT);
    assert!(!result.fallback);
    assert_abs_diff_eq!(result.params.scale, 0.005, epsilon = 1e-7);
    assert_eq!(result.params.zero_point, 128);
}

#[test]
fn test_all_zero_weights_use_fallback() {
    let weights = weights_from(vec![0.0; 27], vec![0.0; 30]);
    let result = calibrate_shared_scale(&weights, WEIGHT_ZERO_POINT);

    assert!(result.fallback);
    assert_eq!(result.params.scale, 0.01);

    let dw_q = quantize_u8(weights.depthwise.array(), &result.params);
    let pw_q = quantize_u8(weights.pointwise.array(), &result.params);
    assert!(dw_q.iter().chain(pw_q.iter()).all(|&q| q == 128));
}

#[test]
fn test_tiny_weights_count_as_degenerate() {
    let mut dw = vec![0.0f32; 27];
    dw[0] = 1e-13;
    let result = calibrate_shared_scale(&weights_from(dw, vec![0.0; 30]), WEIGHT_ZERO_POINT);
    assert!(result.fallback);
    assert_eq!(result.params.scale, FALLBACK_SCALE);
}

#[test]
fn test_empty_calibrator_falls_back() {
    let calibrator = ScaleCalibrator::default();
    let result = calibrator.compute();
    assert_eq!(calibrator.num_observed(), 0);
    assert!(result.fallback);
    assert_eq!(result.params.zero_point, WEIGHT_ZERO_POINT);
}

#[test]
fn test_calibrator_reset() {
    let mut calibrator = ScaleCalibrator::new(100);
    calibrator.observe(&[4.0, -8.0]).observe(&[1.0]);
    assert_eq!(calibrator.num_observed(), 2);
    assert_eq!(calibrator.compute().observed_max_abs, 8.0);
    assert_eq!(calibrator.compute().params.zero_point, 100);

    calibrator.reset();
    assert_eq!(calibrator.num_observed(), 0);
    assert!(calibrator.compute().fallback);
}

#[test]
fn test_firmware_constants_line() {
    let line = QuantParams::new(0.0019579321, 128).firmware_constants();
    assert!(line.starts_with("const float w_scale = 0.00195793"));
    assert!(line.ends_with("f; const int w_zp = 128;"));
}

// ========================================================================
// FIXED POINT
// ========================================================================

#[test]
fn test_plus_minus_one_scenario() {
    let weights = weights_from(vec![1.0; 27], vec![-1.0; 30]);
    let result = calibrate_shared_scale(&weights, WEIGHT_ZERO_POINT);
    assert_abs_diff_eq!(result.params.scale, 1.0 / 127.0, epsilon = 1e-9);

    let dw_q = quantize_u8(weights.depthwise.array(), &result.params);
    let pw_q = quantize_u8(weights.pointwise.array(), &result.params);
    assert!(dw_q.iter().all(|&q| q == 255));
    // -127 + 128 = 1: the lower rail is not reached
    assert!(pw_q.iter().all(|&q| q == 1));
}

#[test]
fn test_round_half_to_even() {
    let params = QuantParams::new(1.0, 128);
    assert_eq!(quantize_value(2.5, &params), 130);
    assert_eq!(quantize_value(3.5, &params), 132);
    assert_eq!(quantize_value(-2.5, &params), 126);
    assert_eq!(quantize_value(0.5, &params), 128);
    assert_eq!(quantize_value(-0.5, &params), 128);
    assert_eq!(quantize_value(0.51, &params), 129);
}

#[test]
fn test_saturation_boundaries() {
    let params = QuantParams::new(1.0, 128);
    assert_eq!(quantize_value(127.0, &params), 255);
    assert_eq!(quantize_value(128.0, &params), 255);
    assert_eq!(quantize_value(-128.0, &params), 0);
    assert_eq!(quantize_value(-129.0, &params), 0);
    assert_eq!(quantize_value(-127.0, &params), 1);
}

#[test]
fn test_extreme_inputs_clamp() {
    let params = QuantParams::new(1.0 / 127.0, 128);
    assert_eq!(quantize_value(1e30, &params), 255);
    assert_eq!(quantize_value(-1e30, &params), 0);
    assert_eq!(quantize_value(f32::MAX, &params), 255);
    assert_eq!(quantize_value(f32::MIN, &params), 0);
}

#[test]
fn test_quant_stats_counts_saturation() {
    let params = QuantParams::new(1.0, 128);
    let stats = quant_stats(&arr1(&[0.0f32, 127.0, 128.0, -129.0, 1000.0]), &params);
    assert_eq!(stats.len, 5);
    assert_eq!(stats.saturated, 3);
    assert_abs_diff_eq!(stats.max_abs_error, 1000.0 - 127.0);
}

#[test]
fn test_dequantize_inverts_within_half_step() {
    let params = QuantParams::new(0.02, 128);
    let values = arr1(&[-1.0f32, -0.31, 0.0, 0.013, 0.99]);
    let back = dequantize_u8(&quantize_u8(&values, &params), &params);
    for (&w, &r) in values.iter().zip(back.iter()) {
        assert!((w - r).abs() <= 0.01 + 1e-6);
    }
}

#[test]
fn test_quantize_keeps_shape() {
    let params = QuantParams::new(0.1, 128);
    let q = quantize_u8(&Array3::<f32>::zeros((3, 3, 3)), &params);
    assert_eq!(q.shape(), &[3, 3, 3]);
}
