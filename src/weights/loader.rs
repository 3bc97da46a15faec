//! SafeTensors weight loading.
//!
//! Accepts the framework's native conv shapes (with singleton axes) or the
//! already-squeezed shapes, and widens F16/BF16 to f32.

use super::{DepthwiseWeights, FirmwareGeometry, ModelWeights, PointwiseWeights};
use crate::config::InputConfig;
use fxpack_common::{FxError, Result};
use ndarray::{Array2, Array3};
use safetensors::{Dtype, SafeTensors};
use std::path::Path;
use tracing::debug;

/// Load the depthwise and pointwise tensors named in `input` from its
/// SafeTensors file.
pub fn load_model_weights(
    input: &InputConfig,
    geometry: &FirmwareGeometry,
) -> Result<ModelWeights> {
    let path = input.path.as_path();
    if !path.exists() {
        return Err(FxError::WeightsNotFound { path: path.to_path_buf() });
    }

    let data = std::fs::read(path).map_err(|e| FxError::Io {
        context: format!("reading SafeTensors file: {}", path.display()),
        source: e,
    })?;

    let tensors = SafeTensors::deserialize(&data).map_err(|e| FxError::Serialization {
        message: format!("invalid SafeTensors file {}: {e}", path.display()),
    })?;

    let c = geometry.channels;
    let k = geometry.kernel;

    let (dw_data, dw_shape) = read_f32_tensor(&tensors, &input.depthwise_tensor, path)?;
    let dw_squeezed = geometry.depthwise_shape();
    check_shape(&input.depthwise_tensor, &dw_shape, &[c, 1, k, k], &dw_squeezed)?;
    let dw = Array3::from_shape_vec(dw_squeezed, dw_data).map_err(|e| FxError::Internal {
        message: format!("depthwise reshape failed: {e}"),
    })?;

    let (pw_data, pw_shape) = read_f32_tensor(&tensors, &input.pointwise_tensor, path)?;
    let pw_squeezed = geometry.pointwise_shape();
    check_shape(&input.pointwise_tensor, &pw_shape, &[geometry.classes, c, 1, 1], &pw_squeezed)?;
    let pw = Array2::from_shape_vec(pw_squeezed, pw_data).map_err(|e| FxError::Internal {
        message: format!("pointwise reshape failed: {e}"),
    })?;

    debug!(
        path = %path.display(),
        depthwise = ?dw_shape,
        pointwise = ?pw_shape,
        "loaded float weights"
    );

    Ok(ModelWeights::new(
        DepthwiseWeights::new(dw, geometry)?,
        PointwiseWeights::new(pw, geometry)?,
    ))
}

/// Read one tensor as row-major f32 values plus its stored shape.
fn read_f32_tensor(
    tensors: &SafeTensors<'_>,
    name: &str,
    path: &Path,
) -> Result<(Vec<f32>, Vec<usize>)> {
    let tensor = tensors.tensor(name).map_err(|_| {
        let mut available: Vec<&str> = tensors.names();
        available.sort_unstable();
        FxError::TensorMissing {
            name: name.to_string(),
            path: path.to_path_buf(),
            available: available.join(", "),
        }
    })?;

    let bytes = tensor.data();
    let values: Vec<f32> = match tensor.dtype() {
        Dtype::F32 => bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        Dtype::F16 => bytes
            .chunks_exact(2)
            .map(|b| half::f16::from_bits(u16::from_le_bytes([b[0], b[1]])).to_f32())
            .collect(),
        Dtype::BF16 => bytes
            .chunks_exact(2)
            .map(|b| half::bf16::from_bits(u16::from_le_bytes([b[0], b[1]])).to_f32())
            .collect(),
        other => {
            return Err(FxError::UnsupportedDtype {
                name: name.to_string(),
                dtype: format!("{other:?}"),
            });
        }
    };

    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(FxError::NonFiniteWeight { name: name.to_string(), index, value });
    }

    Ok((values, tensor.shape().to_vec()))
}

fn check_shape(name: &str, actual: &[usize], raw: &[usize], squeezed: &[usize]) -> Result<()> {
    if actual == raw || actual == squeezed {
        Ok(())
    } else {
        Err(FxError::ShapeMismatch {
            name: name.to_string(),
            expected: raw.to_vec(),
            actual: actual.to_vec(),
        })
    }
}
