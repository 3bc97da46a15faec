//! CLI argument parsing.
//!
//! ```bash
//! fxpack export --weights model.safetensors --output artifacts
//! fxpack export --config export.yaml --expect-manifest golden.json
//! fxpack verify --dir artifacts --manifest golden.json
//! fxpack fixture --output model.safetensors --fill-depthwise 1.0 --fill-pointwise -1.0
//! fxpack validate --config export.yaml
//! ```

use clap::{Parser, Subcommand};
use fxpack_common::{CommonArgs, FxError, Result};
use std::path::PathBuf;

use super::ExportConfig;
use crate::weights::FixtureFill;

/// fxpack: fixed-point weight export for firmware inference
#[derive(Parser, Debug, Clone)]
#[command(name = "fxpack")]
#[command(version)]
#[command(about = "Quantize CNN weights to uint8 and pack them into firmware assets")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Quantize weights and write the firmware assets with a manifest
    Export(ExportArgs),

    /// Re-hash an artifact directory against a reference manifest
    Verify(VerifyArgs),

    /// Write a synthetic SafeTensors weight file
    Fixture(FixtureArgs),

    /// Validate an export configuration without running it
    Validate(ValidateArgs),
}

/// Arguments for the export command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct ExportArgs {
    /// Path to YAML export configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SafeTensors weight file (overrides input.path)
    #[arg(short, long)]
    pub weights: Option<PathBuf>,

    /// Output directory (overrides output.dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Depthwise tensor name (overrides input.depthwise_tensor)
    #[arg(long)]
    pub depthwise_tensor: Option<String>,

    /// Pointwise tensor name (overrides input.pointwise_tensor)
    #[arg(long)]
    pub pointwise_tensor: Option<String>,

    /// Seed for the sample bitmap
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also write the manifest as JSON to this path
    #[arg(long)]
    pub manifest_out: Option<PathBuf>,

    /// Fail unless the artifacts match this manifest JSON
    #[arg(long)]
    pub expect_manifest: Option<PathBuf>,
}

impl ExportArgs {
    /// Build the effective configuration: file first, then flag overrides.
    pub fn resolve_config(&self) -> Result<ExportConfig> {
        let mut config = match (&self.config, &self.weights) {
            (Some(path), _) => ExportConfig::from_file(path)?,
            (None, Some(weights)) => ExportConfig::from_weights_path(weights),
            (None, None) => {
                return Err(FxError::ConfigValue {
                    field: "input.path".into(),
                    message: "no weight source given".into(),
                    suggestion: "Pass --weights <FILE> or --config <YAML>".into(),
                });
            }
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ExportConfig) {
        if let Some(weights) = &self.weights {
            config.input.path = weights.clone();
        }
        if let Some(output) = &self.output {
            config.output.dir = output.clone();
        }
        if let Some(name) = &self.depthwise_tensor {
            config.input.depthwise_tensor = name.clone();
        }
        if let Some(name) = &self.pointwise_tensor {
            config.input.pointwise_tensor = name.clone();
        }
        if let Some(seed) = self.seed {
            config.sample.seed = Some(seed);
        }
        if let Some(path) = &self.manifest_out {
            config.output.manifest_file = Some(path.clone());
        }
        if let Some(path) = &self.expect_manifest {
            config.verify.expected_manifest = Some(path.clone());
        }
    }
}

/// Arguments for the verify command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct VerifyArgs {
    /// Directory holding the exported artifacts
    #[arg(short, long, default_value = "artifacts")]
    pub dir: PathBuf,

    /// Reference manifest JSON
    #[arg(short, long)]
    pub manifest: PathBuf,
}

/// Arguments for the fixture command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct FixtureArgs {
    /// Output SafeTensors path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Fill every depthwise weight with this value
    #[arg(long, allow_negative_numbers = true)]
    pub fill_depthwise: Option<f32>,

    /// Fill every pointwise weight with this value
    #[arg(long, allow_negative_numbers = true)]
    pub fill_pointwise: Option<f32>,

    /// Seed for uniform random weights
    #[arg(long, default_value = "0")]
    pub seed: u64,

    /// Half-width of the uniform weight range
    #[arg(long, default_value = "0.5")]
    pub scale: f32,
}

impl FixtureArgs {
    /// Constant fill when any fill flag is given, seeded uniform otherwise.
    pub fn fill(&self) -> FixtureFill {
        if self.fill_depthwise.is_some() || self.fill_pointwise.is_some() {
            FixtureFill::Constant {
                depthwise: self.fill_depthwise.unwrap_or(0.0),
                pointwise: self.fill_pointwise.unwrap_or(0.0),
            }
        } else {
            FixtureFill::Uniform { seed: self.seed, scale: self.scale }
        }
    }
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML export configuration
    #[arg(short, long)]
    pub config: PathBuf,
}

/// Parse command line arguments
pub fn parse_args<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
