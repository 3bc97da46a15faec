//! Export pipeline.
//!
//! Stages run strictly in sequence, each on the previous stage's complete
//! output: load → calibrate → quantize → pack → write → hash → compare.

use crate::artifact::{label_list, Artifact, ArtifactKind, ArtifactWriter, SampleImage};
use crate::config::{ConfigValidator, ExportConfig};
use crate::integrity::{self, Manifest};
use crate::layout::{pack_depthwise, pack_pointwise, PackedBuffer};
use crate::quant::{
    calibrate_shared_scale, quant_stats, quantize_u8, CalibrationResult, QuantStats,
    WEIGHT_ZERO_POINT,
};
use crate::weights::{load_model_weights, FirmwareGeometry, ModelWeights};
use fxpack_common::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};

/// Outcome of one export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Shared scale and zero-point
    pub calibration: CalibrationResult,
    /// Depthwise precision report
    pub depthwise_stats: QuantStats,
    /// Pointwise precision report
    pub pointwise_stats: QuantStats,
    /// Seed the sample image was drawn from
    pub sample_seed: u64,
    /// Directory holding the artifacts
    pub output_dir: PathBuf,
    /// Verified sizes and digests
    pub manifest: Manifest,
    /// Whether a reference manifest was checked
    pub verified: bool,
    /// Wall time in seconds
    pub duration_seconds: f64,
}

/// Quantized and packed weights, before anything touches disk.
#[derive(Debug, Clone)]
pub struct PackedWeights {
    pub calibration: CalibrationResult,
    pub depthwise: PackedBuffer,
    pub pointwise: PackedBuffer,
    pub depthwise_stats: QuantStats,
    pub pointwise_stats: QuantStats,
}

/// Calibrate, quantize and pack both tensors.
pub fn quantize_and_pack(
    weights: &ModelWeights,
    zero_point: u8,
    geometry: &FirmwareGeometry,
) -> Result<PackedWeights> {
    let calibration = calibrate_shared_scale(weights, zero_point);
    if calibration.fallback {
        warn!(
            max_abs = calibration.observed_max_abs,
            scale = calibration.params.scale,
            "all weights are near zero, using fallback scale"
        );
    }
    let params = &calibration.params;

    let dw = weights.depthwise.array();
    let pw = weights.pointwise.array();
    let depthwise = pack_depthwise(&quantize_u8(dw, params), geometry)?;
    let pointwise = pack_pointwise(&quantize_u8(pw, params), geometry)?;

    let depthwise_stats = quant_stats(dw, params);
    let pointwise_stats = quant_stats(pw, params);
    debug!(?depthwise_stats, ?pointwise_stats, "quantized weights");

    Ok(PackedWeights { calibration, depthwise, pointwise, depthwise_stats, pointwise_stats })
}

/// Export pipeline orchestrator.
pub struct ExportPipeline<'a> {
    config: &'a ExportConfig,
    geometry: FirmwareGeometry,
    zero_point: u8,
}

impl<'a> ExportPipeline<'a> {
    /// Pipeline for the firmware geometry and zero-point.
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config, geometry: FirmwareGeometry::FIRMWARE, zero_point: WEIGHT_ZERO_POINT }
    }

    /// Override the weight zero-point.
    pub fn with_zero_point(mut self, zero_point: u8) -> Self {
        self.zero_point = zero_point;
        self
    }

    /// Run every stage. Configuration and the reference manifest are
    /// checked before anything is written. A later failure aborts the run;
    /// artifacts already written stay on disk.
    pub fn execute(&self) -> Result<ExportReport> {
        let start = std::time::Instant::now();
        let _span = info_span!("export", output = %self.config.output.dir.display()).entered();

        ConfigValidator::validate(self.config)?;
        let reference = match &self.config.verify.expected_manifest {
            Some(path) => Some((path, Manifest::load(path)?)),
            None => None,
        };

        // Stage 1: load float weights
        let weights = load_model_weights(&self.config.input, &self.geometry)?;

        // Stage 2: calibrate, quantize, pack
        let packed = quantize_and_pack(&weights, self.zero_point, &self.geometry)?;
        info!(
            scale = packed.calibration.params.scale,
            zero_point = packed.calibration.params.zero_point,
            "calibrated shared weight scale"
        );

        // Stage 3: assemble and write artifacts
        let sample_seed = self.sample_seed();
        let artifacts = self.artifacts(&packed, sample_seed);
        let writer = ArtifactWriter::new(&self.config.output.dir);
        let written = writer.write_all(&artifacts)?;

        // Stage 4: hash what reached disk
        let manifest = integrity::report(&written)?;
        if let Some(path) = &self.config.output.manifest_file {
            manifest.save(path)?;
            debug!(path = %path.display(), "wrote manifest");
        }

        // Stage 5: optional reference comparison
        let verified = match &reference {
            Some((path, expected)) => {
                manifest.check_against(expected)?;
                info!(reference = %path.display(), "artifacts match reference manifest");
                true
            }
            None => false,
        };

        Ok(ExportReport {
            calibration: packed.calibration,
            depthwise_stats: packed.depthwise_stats,
            pointwise_stats: packed.pointwise_stats,
            sample_seed,
            output_dir: self.config.output.dir.clone(),
            manifest,
            verified,
            duration_seconds: start.elapsed().as_secs_f64(),
        })
    }

    fn sample_seed(&self) -> u64 {
        match self.config.sample.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!(seed, "drew sample image seed; pass --seed to reproduce");
                seed
            }
        }
    }

    fn artifacts(&self, packed: &PackedWeights, sample_seed: u64) -> Vec<Artifact> {
        vec![
            Artifact::new(ArtifactKind::DepthwiseWeights, packed.depthwise.as_bytes()),
            Artifact::new(ArtifactKind::PointwiseWeights, packed.pointwise.as_bytes()),
            Artifact::new(ArtifactKind::Labels, label_list(self.geometry.classes)),
            Artifact::new(
                ArtifactKind::SampleImage,
                SampleImage::random_binary(sample_seed).to_bmp(),
            ),
        ]
    }
}
