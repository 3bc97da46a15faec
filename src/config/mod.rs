//! Export configuration.
//!
//! A YAML file describes where the float weights live and where the firmware
//! assets go; CLI flags override individual values.
//!
//! ```yaml
//! input:
//!   path: artifacts/digits_tiny_dsconv.safetensors
//!   depthwise_tensor: dw.weight
//!   pointwise_tensor: pw.weight
//! output:
//!   dir: artifacts
//!   manifest_file: artifacts/manifest.json
//! sample:
//!   seed: 1234
//! verify:
//!   expected_manifest: golden/manifest.json
//! ```

mod cli;
mod validate;

pub use cli::{parse_args, Cli, Command, ExportArgs, FixtureArgs, ValidateArgs, VerifyArgs};
pub use validate::ConfigValidator;

use fxpack_common::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Float weight source
    pub input: InputConfig,
    /// Artifact destination
    #[serde(default)]
    pub output: OutputConfig,
    /// Sample image generation
    #[serde(default)]
    pub sample: SampleConfig,
    /// Optional reference manifest
    #[serde(default)]
    pub verify: VerifyConfig,
}

impl ExportConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FxError::ConfigNotFound { path: path.to_path_buf() });
        }
        let content = std::fs::read_to_string(path).map_err(|e| FxError::Io {
            context: format!("reading config file: {}", path.display()),
            source: e,
        })?;

        Self::from_yaml(&content, path)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| FxError::ConfigParsing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Configuration with defaults everywhere except the weight file.
    pub fn from_weights_path(path: impl Into<PathBuf>) -> Self {
        Self {
            input: InputConfig { path: path.into(), ..InputConfig::default() },
            output: OutputConfig::default(),
            sample: SampleConfig::default(),
            verify: VerifyConfig::default(),
        }
    }

    /// Render back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| FxError::Serialization {
            message: format!("YAML serialization failed: {e}"),
        })
    }
}

/// Float weight source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// SafeTensors file produced by the training run
    pub path: PathBuf,
    /// Name of the depthwise conv weight tensor
    #[serde(default = "default_depthwise_tensor")]
    pub depthwise_tensor: String,
    /// Name of the pointwise conv weight tensor
    #[serde(default = "default_pointwise_tensor")]
    pub pointwise_tensor: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            depthwise_tensor: default_depthwise_tensor(),
            pointwise_tensor: default_pointwise_tensor(),
        }
    }
}

fn default_depthwise_tensor() -> String {
    "dw.weight".to_string()
}

fn default_pointwise_tensor() -> String {
    "pw.weight".to_string()
}

/// Artifact destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the four firmware assets
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Where to also write the manifest as JSON
    #[serde(default)]
    pub manifest_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir(), manifest_file: None }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

/// Sample image generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Seed for the sample bitmap; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Reference manifest comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Manifest JSON the emitted artifacts must match
    #[serde(default)]
    pub expected_manifest: Option<PathBuf>,
}
