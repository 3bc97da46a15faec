//! fxpack: fixed-point weight export for a firmware CNN engine.
//!
//! Takes the two float weight tensors of a depthwise-separable classifier
//! (depthwise 3x3 and pointwise 1x1), quantizes them to uint8 with one
//! shared scale and a fixed zero-point, packs them in the byte order the
//! firmware kernels read, writes them next to a label list and a sample
//! bitmap, and reports the size and SHA-256 of every file as it sits on
//! disk.
//!
//! ```no_run
//! use fxpack::{ExportConfig, ExportPipeline};
//!
//! let mut config = ExportConfig::from_weights_path("digits_tiny_dsconv.safetensors");
//! config.sample.seed = Some(7);
//! let report = ExportPipeline::new(&config).execute()?;
//! print!("{}", report.manifest.render());
//! # Ok::<(), fxpack_common::FxError>(())
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod integrity;
pub mod layout;
pub mod pipeline;
pub mod quant;
pub mod weights;

pub use config::ExportConfig;
pub use fxpack_common::{FxError, Result};
pub use pipeline::{ExportPipeline, ExportReport};

/// Run an export with the given configuration.
pub fn export(config: &ExportConfig) -> Result<ExportReport> {
    ExportPipeline::new(config).execute()
}
