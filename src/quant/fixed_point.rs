//! uint8 fixed-point conversion
//!
//! `q = clamp(round_half_even(w / scale) + zero_point, 0, 255)`
//!
//! The quotient is formed in f32 and rounded half-to-even, so ties such as
//! 2.5 go to 2 and 3.5 go to 4. Out-of-range codes saturate, never wrap.

use ndarray::{Array, ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use super::QuantParams;

/// Quantized tensor: same logical shape as its float source.
pub type QuantizedTensor<D> = Array<u8, D>;

/// Unclamped integer code for `w`.
fn raw_code(w: f32, params: &QuantParams) -> i32 {
    // NaN maps to 0 here, i.e. to the zero-point after the offset.
    let q = (w / params.scale).round_ties_even() as i32;
    q.saturating_add(i32::from(params.zero_point))
}

/// Quantize a single value.
pub fn quantize_value(w: f32, params: &QuantParams) -> u8 {
    raw_code(w, params).clamp(0, 255) as u8
}

/// Real value represented by a code.
pub fn dequantize_value(q: u8, params: &QuantParams) -> f32 {
    (i32::from(q) - i32::from(params.zero_point)) as f32 * params.scale
}

/// Quantize every element of a float tensor.
pub fn quantize_u8<S, D>(weights: &ArrayBase<S, D>, params: &QuantParams) -> QuantizedTensor<D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    weights.mapv(|w| quantize_value(w, params))
}

/// Map codes back to floats.
pub fn dequantize_u8<S, D>(codes: &ArrayBase<S, D>, params: &QuantParams) -> Array<f32, D>
where
    S: Data<Elem = u8>,
    D: Dimension,
{
    codes.mapv(|q| dequantize_value(q, params))
}

/// Precision report for one quantized tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantStats {
    /// Elements whose code fell outside [0, 255] and were clamped
    pub saturated: usize,
    /// Largest |dequant(q) - w|
    pub max_abs_error: f32,
    /// Number of elements
    pub len: usize,
}

/// Compare a float tensor with its quantized form.
pub fn quant_stats<S, D>(weights: &ArrayBase<S, D>, params: &QuantParams) -> QuantStats
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    weights.iter().fold(QuantStats { len: weights.len(), ..QuantStats::default() }, |mut acc, &w| {
        let raw = raw_code(w, params);
        if !(0..=255).contains(&raw) {
            acc.saturated += 1;
        }
        let err = (dequantize_value(quantize_value(w, params), params) - w).abs();
        acc.max_abs_error = acc.max_abs_error.max(err);
        acc
    })
}
