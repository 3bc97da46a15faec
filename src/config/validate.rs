//! Pre-flight configuration checks.
//!
//! Catches mistakes before any artifact is touched, so a bad config never
//! leaves a half-written output directory behind.

use super::{ExportConfig, InputConfig, OutputConfig, SampleConfig, VerifyConfig};
use fxpack_common::{FxError, Result};

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate an export configuration.
    pub fn validate(config: &ExportConfig) -> Result<()> {
        Self::validate_input(&config.input)?;
        Self::validate_output(&config.output)?;
        Self::validate_verify(&config.verify, &config.sample)?;
        Ok(())
    }

    fn validate_input(input: &InputConfig) -> Result<()> {
        if input.path.as_os_str().is_empty() {
            return Err(FxError::ConfigValue {
                field: "input.path".into(),
                message: "weight file path cannot be empty".into(),
                suggestion: "Point input.path at the trained model's .safetensors file".into(),
            });
        }

        for (field, name) in [
            ("input.depthwise_tensor", &input.depthwise_tensor),
            ("input.pointwise_tensor", &input.pointwise_tensor),
        ] {
            if name.trim().is_empty() {
                return Err(FxError::ConfigValue {
                    field: field.into(),
                    message: "tensor name cannot be empty".into(),
                    suggestion: "Use the state-dict key, e.g. 'dw.weight' or 'pw.weight'".into(),
                });
            }
        }

        if input.depthwise_tensor == input.pointwise_tensor {
            return Err(FxError::ConfigValue {
                field: "input.pointwise_tensor".into(),
                message: format!(
                    "depthwise and pointwise both read '{}'",
                    input.pointwise_tensor
                ),
                suggestion: "Each layer needs its own tensor".into(),
            });
        }

        Ok(())
    }

    fn validate_output(output: &OutputConfig) -> Result<()> {
        if output.dir.as_os_str().is_empty() {
            return Err(FxError::ConfigValue {
                field: "output.dir".into(),
                message: "output directory cannot be empty".into(),
                suggestion: "Use a directory such as 'artifacts'".into(),
            });
        }

        if let Some(manifest) = &output.manifest_file {
            if crate::artifact::ArtifactKind::ALL
                .iter()
                .any(|kind| manifest == &output.dir.join(kind.file_name()))
            {
                return Err(FxError::ConfigValue {
                    field: "output.manifest_file".into(),
                    message: format!("{} would overwrite an artifact", manifest.display()),
                    suggestion: "Write the manifest to e.g. artifacts/manifest.json".into(),
                });
            }
        }

        Ok(())
    }

    /// A reference manifest pins the sample bitmap's digest, so its seed
    /// must be pinned too.
    fn validate_verify(verify: &VerifyConfig, sample: &SampleConfig) -> Result<()> {
        if verify.expected_manifest.is_some() && sample.seed.is_none() {
            return Err(FxError::ConfigValue {
                field: "sample.seed".into(),
                message: "reference manifest given without a sample seed".into(),
                suggestion: "Pass --seed (or set sample.seed) to the seed the reference \
                             was exported with"
                    .into(),
            });
        }
        Ok(())
    }
}
