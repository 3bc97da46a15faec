//! Synthetic weight files for firmware bring-up and tests.

use super::{DepthwiseWeights, FirmwareGeometry, ModelWeights, PointwiseWeights};
use crate::config::InputConfig;
use fxpack_common::{FxError, Result};
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use safetensors::tensor::TensorView;
use safetensors::Dtype;
use std::collections::HashMap;
use std::path::Path;

/// How to populate a fixture model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureFill {
    /// Every depthwise and pointwise coefficient set to a constant
    Constant { depthwise: f32, pointwise: f32 },
    /// Uniform values in [-scale, scale] from a seeded generator
    Uniform { seed: u64, scale: f32 },
}

impl FixtureFill {
    /// Materialise the weights for `geometry`.
    pub fn build(&self, geometry: &FirmwareGeometry) -> Result<ModelWeights> {
        match *self {
            Self::Constant { depthwise, pointwise } => Ok(ModelWeights::new(
                DepthwiseWeights::filled(depthwise, geometry),
                PointwiseWeights::filled(pointwise, geometry),
            )),
            Self::Uniform { seed, scale } => {
                let mut rng = StdRng::seed_from_u64(seed);
                let dw = Array3::from_shape_simple_fn(geometry.depthwise_shape(), || {
                    rng.random_range(-scale..=scale)
                });
                let pw = Array2::from_shape_simple_fn(geometry.pointwise_shape(), || {
                    rng.random_range(-scale..=scale)
                });
                Ok(ModelWeights::new(
                    DepthwiseWeights::new(dw, geometry)?,
                    PointwiseWeights::new(pw, geometry)?,
                ))
            }
        }
    }
}

/// Write `weights` as a SafeTensors file using the framework's native conv
/// shapes: depthwise (C, 1, K, K) and pointwise (Cout, C, 1, 1).
pub fn write_weights_file(
    path: impl AsRef<Path>,
    weights: &ModelWeights,
    names: &InputConfig,
) -> Result<()> {
    let path = path.as_ref();

    let dw = weights.depthwise.array();
    let pw = weights.pointwise.array();
    let (c, kh, kw) = dw.dim();
    let (cout, cin) = pw.dim();

    // Logical order is row-major regardless of the arrays' memory layout.
    let dw_values: Vec<f32> = dw.iter().copied().collect();
    let pw_values: Vec<f32> = pw.iter().copied().collect();
    let dw_bytes: &[u8] = bytemuck::cast_slice(&dw_values);
    let pw_bytes: &[u8] = bytemuck::cast_slice(&pw_values);

    let to_ser = |e: safetensors::SafeTensorError| FxError::Serialization {
        message: format!("building SafeTensors view: {e}"),
    };
    let views = vec![
        (
            names.depthwise_tensor.as_str(),
            TensorView::new(Dtype::F32, vec![c, 1, kh, kw], dw_bytes).map_err(to_ser)?,
        ),
        (
            names.pointwise_tensor.as_str(),
            TensorView::new(Dtype::F32, vec![cout, cin, 1, 1], pw_bytes).map_err(to_ser)?,
        ),
    ];

    let mut metadata = HashMap::new();
    metadata.insert("producer".to_string(), "fxpack fixture".to_string());
    let bytes = safetensors::serialize(views, Some(metadata)).map_err(|e| FxError::Serialization {
        message: format!("serializing fixture weights: {e}"),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| FxError::io(format!("creating directory {}", parent.display()), e))?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| FxError::io(format!("writing fixture weights {}", path.display()), e))
}
