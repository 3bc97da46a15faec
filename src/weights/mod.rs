//! Floating-point weight snapshot consumed by the export pipeline.
//!
//! The trained network is reduced to two immutable tensors at load time:
//! - depthwise 3x3 filters, (channels, ky, kx)
//! - pointwise 1x1 filters, (out_channels, in_channels)

mod fixture;
mod loader;

pub use fixture::{write_weights_file, FixtureFill};
pub use loader::load_model_weights;

use fxpack_common::{FxError, Result};
use ndarray::{Array2, Array3};

/// Firmware kernel geometry the exported buffers must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareGeometry {
    /// Input channels of the depthwise stage (RGB)
    pub channels: usize,
    /// Output channels of the pointwise stage (digit classes)
    pub classes: usize,
    /// Depthwise kernel size along each spatial axis
    pub kernel: usize,
}

impl FirmwareGeometry {
    /// Geometry compiled into the current firmware image.
    pub const FIRMWARE: Self = Self { channels: 3, classes: 10, kernel: 3 };

    /// Squeezed depthwise shape (channels, ky, kx).
    pub fn depthwise_shape(&self) -> [usize; 3] {
        [self.channels, self.kernel, self.kernel]
    }

    /// Squeezed pointwise shape (out_channels, in_channels).
    pub fn pointwise_shape(&self) -> [usize; 2] {
        [self.classes, self.channels]
    }
}

impl Default for FirmwareGeometry {
    fn default() -> Self {
        Self::FIRMWARE
    }
}

/// Depthwise filter coefficients, shape (channels, ky, kx).
#[derive(Debug, Clone, PartialEq)]
pub struct DepthwiseWeights(Array3<f32>);

impl DepthwiseWeights {
    /// Wrap an array, checking it against the firmware geometry.
    pub fn new(data: Array3<f32>, geometry: &FirmwareGeometry) -> Result<Self> {
        let expected = geometry.depthwise_shape();
        if data.shape() != expected {
            return Err(FxError::ShapeMismatch {
                name: "depthwise".into(),
                expected: expected.to_vec(),
                actual: data.shape().to_vec(),
            });
        }
        Ok(Self(data))
    }

    /// Constant-filled tensor.
    pub fn filled(value: f32, geometry: &FirmwareGeometry) -> Self {
        Self(Array3::from_elem(geometry.depthwise_shape(), value))
    }

    pub fn array(&self) -> &Array3<f32> {
        &self.0
    }
}

/// Pointwise filter coefficients, shape (out_channels, in_channels).
#[derive(Debug, Clone, PartialEq)]
pub struct PointwiseWeights(Array2<f32>);

impl PointwiseWeights {
    /// Wrap an array, checking it against the firmware geometry.
    pub fn new(data: Array2<f32>, geometry: &FirmwareGeometry) -> Result<Self> {
        let expected = geometry.pointwise_shape();
        if data.shape() != expected {
            return Err(FxError::ShapeMismatch {
                name: "pointwise".into(),
                expected: expected.to_vec(),
                actual: data.shape().to_vec(),
            });
        }
        Ok(Self(data))
    }

    /// Constant-filled tensor.
    pub fn filled(value: f32, geometry: &FirmwareGeometry) -> Self {
        Self(Array2::from_elem(geometry.pointwise_shape(), value))
    }

    pub fn array(&self) -> &Array2<f32> {
        &self.0
    }
}

/// The two weight tensors the exporter reads. Nothing else of the trained
/// model is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelWeights {
    pub depthwise: DepthwiseWeights,
    pub pointwise: PointwiseWeights,
}

impl ModelWeights {
    pub fn new(depthwise: DepthwiseWeights, pointwise: PointwiseWeights) -> Self {
        Self { depthwise, pointwise }
    }

    /// Total number of scalar coefficients across both tensors.
    pub fn num_params(&self) -> usize {
        self.depthwise.array().len() + self.pointwise.array().len()
    }
}
