//! Segmenter configuration.
//!
//! All values have defaults tuned for overhead photos of small pieces at
//! typical phone resolution. A configuration can be built in code or loaded
//! from a TOML file where every field is optional:
//!
//! ```toml
//! min_area = 300
//! max_area = 80000
//! padding = 12
//! row_band = 150
//! ```

use crate::error::{Result, SegmentError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Contours with an area at or below this are treated as noise
    pub min_area: u32,

    /// Contours with an area at or above this are treated as background
    pub max_area: u32,

    /// Pixels added on every side of a box when cropping
    pub padding: u32,

    /// Height in pixels of the rows used for reading order.
    /// Boxes whose top edges fall into the same band are ordered left to right.
    /// The right value depends on piece size relative to photo resolution.
    pub row_band: u32,

    /// Side of the square Gaussian smoothing kernel
    pub blur_kernel: u32,

    /// Side of the neighbourhood used by the adaptive threshold
    pub threshold_block: u32,

    /// Amount a pixel must be darker than its local mean to count as foreground
    pub threshold_offset: i32,

    pub close_iterations: u8,
    pub open_iterations: u8,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_area: 500,
            max_area: 100_000,
            padding: 10,
            row_band: 100,
            blur_kernel: 5,
            threshold_block: 11,
            threshold_offset: 2,
            close_iterations: 2,
            open_iterations: 1,
        }
    }
}

impl SegmenterConfig {
    pub fn new(min_area: u32, max_area: u32, padding: u32) -> Self {
        Self {
            min_area,
            max_area,
            padding,
            ..Self::default()
        }
    }

    pub fn with_row_band(mut self, row_band: u32) -> Self {
        self.row_band = row_band;
        self
    }

    /// Load a configuration from a TOML file, filling missing fields with defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SegmentError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SegmentError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_area == 0 {
            return Err(SegmentError::configuration("min_area", self.min_area, "must be positive"));
        }
        if self.min_area >= self.max_area {
            return Err(SegmentError::configuration(
                "max_area",
                self.max_area,
                format!("must be greater than min_area ({})", self.min_area),
            ));
        }
        if self.row_band == 0 {
            return Err(SegmentError::configuration("row_band", self.row_band, "must be positive"));
        }
        check_kernel("blur_kernel", self.blur_kernel)?;
        check_kernel("threshold_block", self.threshold_block)?;
        Ok(())
    }
}

fn check_kernel(parameter: &'static str, size: u32) -> Result<()> {
    if size < 3 || size % 2 == 0 {
        return Err(SegmentError::configuration(
            parameter,
            size,
            "must be an odd number of at least 3",
        ));
    }
    Ok(())
}
