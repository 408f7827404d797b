pub mod batch;
pub mod config;
pub mod detection;
pub mod error;
pub mod identify;
pub mod models;
pub mod pipeline;

pub use config::SegmenterConfig;
pub use detection::Segmenter;
pub use error::{Result, SegmentError};
pub use models::{BoundingBox, Contour, Piece};
pub use pipeline::{DebugConfig, Pipeline, PipelineStep};
