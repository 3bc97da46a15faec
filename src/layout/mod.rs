//! Firmware memory layouts for quantized weights.
//!
//! The depthwise and pointwise kernels index their weight arrays
//! differently, so each tensor role has its own explicit flattening rule.
//! Only these two rules exist; a new tensor shape needs a new rule.


use fxpack_common::{FxError, Result};
use ndarray::{Array2, Array3};
use std::fmt;

use crate::weights::FirmwareGeometry;

/// Kernel side the depthwise rule is defined for.
pub const DEPTHWISE_KERNEL: usize = 3;

/// Flattening rule for one tensor role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRule {
    /// `c*9 + (ky+1)*3 + (kx+1)` with ky, kx in {-1, 0, 1}
    Depthwise3x3,
    /// `co*Cin + ci`
    Pointwise1x1,
}

impl LayoutRule {
    /// Exact byte count the firmware reads for this rule.
    pub fn byte_len(&self, geometry: &FirmwareGeometry) -> usize {
        match self {
            Self::Depthwise3x3 => geometry.channels * DEPTHWISE_KERNEL * DEPTHWISE_KERNEL,
            Self::Pointwise1x1 => geometry.classes * geometry.channels,
        }
    }

    /// Expected tensor shape for this rule.
    pub fn shape(&self, geometry: &FirmwareGeometry) -> Vec<usize> {
        match self {
            Self::Depthwise3x3 => vec![geometry.channels, DEPTHWISE_KERNEL, DEPTHWISE_KERNEL],
            Self::Pointwise1x1 => geometry.pointwise_shape().to_vec(),
        }
    }
}

impl fmt::Display for LayoutRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Depthwise3x3 => write!(f, "depthwise 3x3"),
            Self::Pointwise1x1 => write!(f, "pointwise 1x1"),
        }
    }
}

/// Bytes in firmware order for one tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    rule: LayoutRule,
    bytes: Vec<u8>,
}

impl PackedBuffer {
    pub fn rule(&self) -> LayoutRule {
        self.rule
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Offset of depthwise tap (channel, ky, kx), with ky and kx centred on 0.
pub fn depthwise_offset(channel: usize, ky: isize, kx: isize, kernel: usize) -> usize {
    let half = (kernel / 2) as isize;
    channel * kernel * kernel + (ky + half) as usize * kernel + (kx + half) as usize
}

/// Offset of pointwise weight (out channel, in channel).
pub fn pointwise_offset(co: usize, ci: usize, in_channels: usize) -> usize {
    co * in_channels + ci
}

/// Pack a quantized depthwise tensor (channels, ky, kx).
pub fn pack_depthwise(q: &Array3<u8>, geometry: &FirmwareGeometry) -> Result<PackedBuffer> {
    let rule = LayoutRule::Depthwise3x3;
    check_kernel(rule, geometry)?;
    check_shape(rule, q.shape(), geometry)?;

    let k = DEPTHWISE_KERNEL;
    let half = (k / 2) as isize;
    let mut bytes = Vec::with_capacity(rule.byte_len(geometry));
    for c in 0..geometry.channels {
        for ky in -half..=half {
            for kx in -half..=half {
                debug_assert_eq!(bytes.len(), depthwise_offset(c, ky, kx, k));
                bytes.push(q[[c, (ky + half) as usize, (kx + half) as usize]]);
            }
        }
    }

    finish(rule, bytes, geometry)
}

/// Pack a quantized pointwise tensor (out_channels, in_channels).
pub fn pack_pointwise(q: &Array2<u8>, geometry: &FirmwareGeometry) -> Result<PackedBuffer> {
    let rule = LayoutRule::Pointwise1x1;
    check_shape(rule, q.shape(), geometry)?;

    let mut bytes = Vec::with_capacity(rule.byte_len(geometry));
    for co in 0..geometry.classes {
        for ci in 0..geometry.channels {
            debug_assert_eq!(bytes.len(), pointwise_offset(co, ci, geometry.channels));
            bytes.push(q[[co, ci]]);
        }
    }

    finish(rule, bytes, geometry)
}

/// The depthwise rule covers 3x3 kernels only; any other kernel needs its
/// own rule.
fn check_kernel(rule: LayoutRule, geometry: &FirmwareGeometry) -> Result<()> {
    if geometry.kernel != DEPTHWISE_KERNEL {
        return Err(FxError::LayoutMismatch {
            rule: rule.to_string(),
            expected: rule.byte_len(geometry),
            actual: geometry.channels * geometry.kernel * geometry.kernel,
        });
    }
    Ok(())
}

fn check_shape(rule: LayoutRule, actual: &[usize], geometry: &FirmwareGeometry) -> Result<()> {
    let expected = rule.shape(geometry);
    if actual != expected.as_slice() {
        return Err(FxError::ShapeMismatch {
            name: rule.to_string(),
            expected,
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

fn finish(rule: LayoutRule, bytes: Vec<u8>, geometry: &FirmwareGeometry) -> Result<PackedBuffer> {
    let expected = rule.byte_len(geometry);
    if bytes.len() != expected {
        return Err(FxError::LayoutMismatch {
            rule: rule.to_string(),
            expected,
            actual: bytes.len(),
        });
    }
    Ok(PackedBuffer { rule, bytes })
}
