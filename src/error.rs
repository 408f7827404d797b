//! Error types for piece segmentation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for segmentation operations
pub type Result<T> = std::result::Result<T, SegmentError>;

#[derive(Error, Debug)]
pub enum SegmentError {
    /// Image file is missing, corrupt or in an unsupported format
    #[error("Failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Segmenter parameters violate their constraints
    #[error("Invalid configuration: {parameter} = {value} ({reason})")]
    Configuration {
        parameter: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a piece or visualization failed; earlier files are kept
    #[error("Failed to write image {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read directory {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The bundled label font could not be parsed
    #[error("Failed to load label font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    #[error("Debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),
}

impl SegmentError {
    pub(crate) fn configuration(
        parameter: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            parameter,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Processing stage the error originated from
    pub fn stage(&self) -> &'static str {
        match self {
            SegmentError::ImageLoad { .. } | SegmentError::ReadDir { .. } => "load",
            SegmentError::Configuration { .. }
            | SegmentError::ConfigRead { .. }
            | SegmentError::ConfigParse { .. } => "configure",
            SegmentError::DebugDirNotEmpty(_) => "debug",
            SegmentError::CreateDir { .. } | SegmentError::Write { .. } | SegmentError::Font(_) => {
                "write"
            }
            SegmentError::Manifest { .. } => "manifest",
        }
    }

    /// Path of the file or directory involved, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SegmentError::ImageLoad { path, .. }
            | SegmentError::ReadDir { path, .. }
            | SegmentError::CreateDir { path, .. }
            | SegmentError::Write { path, .. }
            | SegmentError::ConfigRead { path, .. }
            | SegmentError::ConfigParse { path, .. }
            | SegmentError::Manifest { path, .. } => Some(path),
            SegmentError::DebugDirNotEmpty(path) => Some(path),
            SegmentError::Configuration { .. } | SegmentError::Font(_) => None,
        }
    }
}
