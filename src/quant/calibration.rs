//! Shared-scale calibration
//!
//! The firmware API takes one weight scale for every layer, so the scale is
//! derived from the largest magnitude across all observed tensors.

use serde::{Deserialize, Serialize};

use crate::weights::ModelWeights;

/// Integer code representing real zero in the uint8 weight encoding.
pub const WEIGHT_ZERO_POINT: u8 = 128;

/// Scale used when every weight is (near) zero.
pub const FALLBACK_SCALE: f32 = 0.01;

/// Max |w| at or below which the weights count as all-zero.
pub const DEGENERATE_MAX_ABS: f32 = 1e-12;

/// Largest magnitude code of the symmetric signed range mapped onto uint8.
pub const SYMMETRIC_QMAX: f32 = 127.0;

/// Linear quantization parameters shared by both weight tensors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantParams {
    /// Real value of one integer step
    pub scale: f32,
    /// Integer code for real zero
    pub zero_point: u8,
}

impl QuantParams {
    pub fn new(scale: f32, zero_point: u8) -> Self {
        Self { scale, zero_point }
    }

    /// The line to paste into the firmware's parameter block.
    pub fn firmware_constants(&self) -> String {
        format!(
            "const float w_scale = {:.10}f; const int w_zp = {};",
            self.scale, self.zero_point
        )
    }
}

/// Result of a calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Chosen parameters
    pub params: QuantParams,
    /// Largest |w| seen across all observed tensors
    pub observed_max_abs: f32,
    /// Whether the all-zero fallback scale was used
    pub fallback: bool,
}

/// Max-abs calibrator producing a single symmetric scale with a fixed
/// zero-point.
#[derive(Clone, Debug)]
pub struct ScaleCalibrator {
    /// Zero-point handed through to the result
    zero_point: u8,
    /// Running max |w|
    running_max_abs: Option<f32>,
    /// Number of tensors observed
    num_observed: usize,
}

impl ScaleCalibrator {
    /// Calibrator with the given zero-point.
    pub fn new(zero_point: u8) -> Self {
        Self { zero_point, running_max_abs: None, num_observed: 0 }
    }

    /// Observe one tensor's values.
    pub fn observe(&mut self, data: &[f32]) -> &mut Self {
        if !data.is_empty() {
            let batch_max = data.iter().fold(0.0f32, |m, v| m.max(v.abs()));
            self.running_max_abs =
                Some(self.running_max_abs.map_or(batch_max, |m| m.max(batch_max)));
            self.num_observed += 1;
        }
        self
    }

    /// Observe values yielded by an iterator (any memory layout).
    pub fn observe_iter<'a>(&mut self, data: impl IntoIterator<Item = &'a f32>) -> &mut Self {
        let values: Vec<f32> = data.into_iter().copied().collect();
        self.observe(&values)
    }

    /// Compute `max|w| / 127`, or the fallback scale for all-zero weights.
    pub fn compute(&self) -> CalibrationResult {
        let observed_max_abs = self.running_max_abs.unwrap_or(0.0);

        let (scale, fallback) = if observed_max_abs <= DEGENERATE_MAX_ABS {
            (FALLBACK_SCALE, true)
        } else {
            ((f64::from(observed_max_abs) / f64::from(SYMMETRIC_QMAX)) as f32, false)
        };

        CalibrationResult {
            params: QuantParams::new(scale, self.zero_point),
            observed_max_abs,
            fallback,
        }
    }

    /// Number of tensors observed so far.
    pub fn num_observed(&self) -> usize {
        self.num_observed
    }

    /// Reset calibration state
    pub fn reset(&mut self) {
        self.running_max_abs = None;
        self.num_observed = 0;
    }
}

impl Default for ScaleCalibrator {
    fn default() -> Self {
        Self::new(WEIGHT_ZERO_POINT)
    }
}

/// Calibrate one scale over both tensors of `weights`.
pub fn calibrate_shared_scale(weights: &ModelWeights, zero_point: u8) -> CalibrationResult {
    let mut calibrator = ScaleCalibrator::new(zero_point);
    calibrator
        .observe_iter(weights.depthwise.array().iter())
        .observe_iter(weights.pointwise.array().iter());
    calibrator.compute()
}
