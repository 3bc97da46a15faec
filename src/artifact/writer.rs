//! Artifact persistence.

use super::{Artifact, ArtifactKind};
use fxpack_common::{FxError, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Record of a file that reached disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Bytes handed to the filesystem
    pub len: u64,
}

/// Writes artifacts into one output directory, overwriting existing files.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic location of `kind` under the output directory.
    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Write one artifact, creating the directory if needed.
    pub fn write(&self, artifact: &Artifact) -> Result<WrittenArtifact> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            FxError::io(format!("creating output directory {}", self.dir.display()), e)
        })?;

        let path = self.path_for(artifact.kind);
        let context = || format!("writing {}", path.display());

        let mut file = File::create(&path).map_err(|e| FxError::io(context(), e))?;
        file.write_all(&artifact.bytes).map_err(|e| FxError::io(context(), e))?;
        file.sync_all().map_err(|e| FxError::io(context(), e))?;

        debug!(
            artifact = %artifact.kind,
            bytes = artifact.bytes.len(),
            path = %path.display(),
            "wrote artifact"
        );

        Ok(WrittenArtifact { kind: artifact.kind, path, len: artifact.bytes.len() as u64 })
    }

    /// Write artifacts in order, stopping at the first failure. Files
    /// written before the failure stay on disk.
    pub fn write_all(&self, artifacts: &[Artifact]) -> Result<Vec<WrittenArtifact>> {
        artifacts.iter().map(|artifact| self.write(artifact)).collect()
    }
}
