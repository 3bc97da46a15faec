//! SHA-256 of on-disk bytes.

use fxpack_common::{FxError, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Re-read `path` and return its length and digest.
pub fn digest_file(path: &Path) -> Result<(u64, String)> {
    let data = std::fs::read(path)
        .map_err(|e| FxError::io(format!("re-reading {} for hashing", path.display()), e))?;
    Ok((data.len() as u64, sha256_hex(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_file_matches_memory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.txt");
        std::fs::write(&path, b"0\n1\n").unwrap();

        let (len, digest) = digest_file(&path).unwrap();
        assert_eq!(len, 4);
        assert_eq!(digest, sha256_hex(b"0\n1\n"));
    }

    #[test]
    fn test_digest_missing_file() {
        let err = digest_file(Path::new("/nonexistent/dw3x3_c3.bin")).unwrap_err();
        assert!(matches!(err, FxError::Io { .. }));
    }
}
