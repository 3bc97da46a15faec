//! Artifact manifest: name, size and digest of every emitted file.

use crate::artifact::ArtifactKind;
use fxpack_common::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Hash algorithm recorded in manifests.
pub const DIGEST_ALGORITHM: &str = "sha256";

/// One verified artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestLine {
    /// File name of the artifact
    pub name: String,
    /// Byte length on disk
    pub size: u64,
    /// Lowercase hex SHA-256 of the bytes on disk
    pub sha256: String,
}

impl fmt::Display for ManifestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>20}  size={:4}  sha256={}", self.name, self.size, self.sha256)
    }
}

/// Manifest of one export run, in fixed artifact order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Always `sha256`
    pub algorithm: String,
    pub artifacts: Vec<ManifestLine>,
}

impl Manifest {
    pub fn new(artifacts: Vec<ManifestLine>) -> Self {
        Self { algorithm: DIGEST_ALGORITHM.to_string(), artifacts }
    }

    /// Entry for `kind`, if present.
    pub fn get(&self, kind: ArtifactKind) -> Option<&ManifestLine> {
        self.artifacts.iter().find(|line| line.name == kind.file_name())
    }

    /// Human-readable report, one line per artifact.
    pub fn render(&self) -> String {
        self.artifacts.iter().map(|line| format!("{line}\n")).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| FxError::Serialization {
            message: format!("JSON serialization failed: {e}"),
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| FxError::Serialization {
            message: format!("invalid manifest JSON: {e}"),
        })
    }

    /// Load a manifest written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FxError::io(format!("reading manifest {}", path.display()), e))?;
        Self::from_json(&content)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| FxError::io(format!("creating directory {}", parent.display()), e))?;
        }
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)
            .map_err(|e| FxError::io(format!("writing manifest {}", path.display()), e))
    }

    /// Check every entry of `self` against `expected`. Entries in `expected`
    /// that this manifest does not mention are ignored.
    pub fn check_against(&self, expected: &Manifest) -> Result<()> {
        if expected.algorithm != self.algorithm {
            return Err(FxError::Serialization {
                message: format!(
                    "reference manifest uses '{}', this tool reports '{}'",
                    expected.algorithm, self.algorithm
                ),
            });
        }

        for actual in &self.artifacts {
            let reference = expected
                .artifacts
                .iter()
                .find(|line| line.name == actual.name)
                .ok_or_else(|| FxError::ManifestEntryMissing { artifact: actual.name.clone() })?;

            if reference.size != actual.size
                || !reference.sha256.eq_ignore_ascii_case(&actual.sha256)
            {
                return Err(FxError::DigestMismatch {
                    artifact: actual.name.clone(),
                    expected_size: reference.size,
                    expected_digest: reference.sha256.clone(),
                    actual_size: actual.size,
                    actual_digest: actual.sha256.clone(),
                });
            }
        }
        Ok(())
    }
}
