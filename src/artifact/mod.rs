//! Firmware assets and their persistence.
//!
//! Four files are produced per export, always under the same names because
//! the firmware opens them by path:
//!
//! | Artifact | File | Size |
//! |---|---|---|
//! | depthwise weights | `dw3x3_c3.bin` | 27 |
//! | pointwise weights | `pw1x1_c10x3.bin` | 30 |
//! | class labels | `labels.txt` | 20 |
//! | smoke-test image | `sample_32x32.bmp` | 3126 |

mod bitmap;
mod labels;
mod writer;

pub use bitmap::{SampleImage, BMP_HEADER_LEN, SAMPLE_SIDE};
pub use labels::label_list;
pub use writer::{ArtifactWriter, WrittenArtifact};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The artifacts of one export, in manifest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    DepthwiseWeights,
    PointwiseWeights,
    Labels,
    SampleImage,
}

impl ArtifactKind {
    /// Manifest order.
    pub const ALL: [Self; 4] =
        [Self::DepthwiseWeights, Self::PointwiseWeights, Self::Labels, Self::SampleImage];

    /// File name the firmware loads.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::DepthwiseWeights => "dw3x3_c3.bin",
            Self::PointwiseWeights => "pw1x1_c10x3.bin",
            Self::Labels => "labels.txt",
            Self::SampleImage => "sample_32x32.bmp",
        }
    }

    /// Reverse of [`file_name`](Self::file_name).
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Named bytes ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self { kind, bytes: bytes.into() }
    }
}
