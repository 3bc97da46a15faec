//! Integrity reporting
//!
//! Hashes what actually reached disk rather than what was in memory, so
//! truncation or corruption during the write shows up in the manifest.

mod digest;
mod manifest;


pub use digest::{digest_file, sha256_hex};
pub use manifest::{Manifest, ManifestLine, DIGEST_ALGORITHM};

use crate::artifact::{ArtifactKind, WrittenArtifact};
use fxpack_common::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Build the manifest for freshly written artifacts, in manifest order.
pub fn report(written: &[WrittenArtifact]) -> Result<Manifest> {
    let mut ordered: Vec<&WrittenArtifact> = written.iter().collect();
    ordered.sort_by_key(|artifact| artifact.kind);

    let mut lines = Vec::with_capacity(ordered.len());
    for artifact in ordered {
        let (size, sha256) = digest_file(&artifact.path)?;
        if size != artifact.len {
            warn!(
                artifact = %artifact.kind,
                written = artifact.len,
                on_disk = size,
                "size on disk differs from bytes written"
            );
        }
        debug!(artifact = %artifact.kind, size, %sha256, "hashed artifact");
        lines.push(ManifestLine { name: artifact.kind.file_name().to_string(), size, sha256 });
    }
    Ok(Manifest::new(lines))
}

/// Hash the four artifacts in `dir` and compare them to `expected`.
pub fn verify_dir(dir: &Path, expected: &Manifest) -> Result<Manifest> {
    let mut lines = Vec::with_capacity(ArtifactKind::ALL.len());
    for kind in ArtifactKind::ALL {
        let (size, sha256) = digest_file(&dir.join(kind.file_name()))?;
        lines.push(ManifestLine { name: kind.file_name().to_string(), size, sha256 });
    }
    let actual = Manifest::new(lines);
    actual.check_against(expected)?;
    Ok(actual)
}
