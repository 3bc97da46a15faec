//! Weight quantization
//!
//! - Shared-scale calibration across both conv layers
//! - uint8 fixed-point conversion with a fixed zero-point

mod calibration;
mod fixed_point;

#[cfg(test)]
mod tests;

pub use calibration::{
    calibrate_shared_scale, CalibrationResult, QuantParams, ScaleCalibrator, DEGENERATE_MAX_ABS,
    FALLBACK_SCALE, SYMMETRIC_QMAX, WEIGHT_ZERO_POINT,
};
pub use fixed_point::{
    dequantize_u8, dequantize_value, quant_stats, quantize_u8, quantize_value, QuantStats,
    QuantizedTensor,
};
