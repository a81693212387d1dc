//! Library error type

use std::path::PathBuf;

/// Errors surfaced by configuration and shatter setup.
///
/// Geometry degeneracies are not errors: bad cells are dropped during
/// tessellation. Only an attempt budget exhausted with nothing left is reported.
#[derive(Debug, thiserror::Error)]
pub enum ShatterError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(
        "source image {image_width}x{image_height} does not cover bounding box {box_width}x{box_height}"
    )]
    SourceTooSmall {
        image_width: u32,
        image_height: u32,
        box_width: u32,
        box_height: u32,
    },

    #[error("tessellation produced no shards after {attempts} attempt(s)")]
    EmptyTessellation { attempts: u32 },

    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
