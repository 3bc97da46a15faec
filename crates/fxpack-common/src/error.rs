//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context to fix the problem without reading
//! the source: the offending path, tensor name or artifact, and a hint.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fxpack operations.
pub type Result<T> = std::result::Result<T, FxError>;

/// Errors that can occur while exporting fixed-point weights.
#[derive(Error, Debug)]
pub enum FxError {
    /// Configuration file not found at expected path.
    #[error("Configuration file not found: {path}\n  → Create a config file or pass --weights to export without one")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is invalid.
    #[error("Invalid configuration value for '{field}': {message}\n  → {suggestion}")]
    ConfigValue { field: String, message: String, suggestion: String },

    /// Weight file not found.
    #[error("Weight file not found: {path}\n  → Export the trained model to SafeTensors or run `fxpack fixture`")]
    WeightsNotFound { path: PathBuf },

    /// A required tensor is absent from the weight file.
    #[error("Tensor '{name}' not found in {path}\n  → Available tensors: {available}")]
    TensorMissing { name: String, path: PathBuf, available: String },

    /// Tensor element type cannot be widened to f32.
    #[error("Unsupported dtype {dtype} for tensor '{name}'\n  → Supported dtypes: F32, F16, BF16")]
    UnsupportedDtype { name: String, dtype: String },

    /// Input tensor shape does not match the firmware geometry.
    #[error("Tensor shape mismatch for '{name}': expected {expected:?}, got {actual:?}\n  → The firmware kernels only accept this exact geometry")]
    ShapeMismatch { name: String, expected: Vec<usize>, actual: Vec<usize> },

    /// Weight contains NaN or infinity.
    #[error("Non-finite weight {value} in '{name}' at flat index {index}\n  → Retrain or sanitise the model before export")]
    NonFiniteWeight { name: String, index: usize, value: f32 },

    /// Packed buffer length disagrees with the layout rule.
    #[error("Layout mismatch for {rule}: expected {expected} bytes, produced {actual}\n  → Upstream tensor shape does not match the layout rule")]
    LayoutMismatch { rule: String, expected: usize, actual: usize },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Artifact on disk differs from the expected manifest.
    #[error("Integrity mismatch for {artifact}: expected size={expected_size} sha256={expected_digest}, got size={actual_size} sha256={actual_digest}\n  → Do not flash these artifacts; re-run the export or update the reference manifest")]
    DigestMismatch {
        artifact: String,
        expected_size: u64,
        expected_digest: String,
        actual_size: u64,
        actual_digest: String,
    },

    /// Expected manifest lacks an entry for an emitted artifact.
    #[error("Reference manifest has no entry for {artifact}\n  → Regenerate the reference with --manifest-out")]
    ManifestEntryMissing { artifact: String },

    /// Generic error for unexpected conditions.
    #[error("Internal error: {message}\n  → Please report this bug at https://github.com/paiml/fxpack/issues")]
    Internal { message: String },
}

impl FxError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Check if this error is caused by user input rather than the tool.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParsing { .. }
                | Self::ConfigValue { .. }
                | Self::WeightsNotFound { .. }
                | Self::TensorMissing { .. }
                | Self::UnsupportedDtype { .. }
                | Self::ShapeMismatch { .. }
                | Self::NonFiniteWeight { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "E001",
            Self::ConfigParsing { .. } => "E002",
            Self::ConfigValue { .. } => "E003",
            Self::WeightsNotFound { .. } => "E010",
            Self::TensorMissing { .. } => "E011",
            Self::UnsupportedDtype { .. } => "E012",
            Self::ShapeMismatch { .. } => "E040",
            Self::NonFiniteWeight { .. } => "E041",
            Self::LayoutMismatch { .. } => "E042",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
            Self::DigestMismatch { .. } => "E060",
            Self::ManifestEntryMissing { .. } => "E061",
            Self::Internal { .. } => "E999",
        }
    }
}
