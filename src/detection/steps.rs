use crate::detection::preprocessing;
use crate::error::Result;
use crate::pipeline::PipelineStep;
use image::GrayImage;

/// Apply Gaussian blur
pub struct BlurStep {
    pub kernel_size: u32,
}

impl PipelineStep for BlurStep {
    fn process(&self, image: GrayImage) -> Result<GrayImage> {
        Ok(preprocessing::apply_blur(&image, self.kernel_size))
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Binarize against a local Gaussian-weighted mean; dark pixels become foreground
pub struct AdaptiveThresholdStep {
    pub block_size: u32,
    pub offset: i32,
}

impl PipelineStep for AdaptiveThresholdStep {
    fn process(&self, image: GrayImage) -> Result<GrayImage> {
        Ok(preprocessing::adaptive_threshold(&image, self.block_size, self.offset))
    }

    fn name(&self) -> &str {
        "Adaptive Threshold"
    }
}

/// Bridge small gaps inside a piece's silhouette
pub struct CloseStep {
    pub iterations: u8,
}

impl PipelineStep for CloseStep {
    fn process(&self, image: GrayImage) -> Result<GrayImage> {
        Ok(preprocessing::close(&image, self.iterations))
    }

    fn name(&self) -> &str {
        "Morphological Close"
    }
}

/// Remove speckle left over after closing
pub struct OpenStep {
    pub iterations: u8,
}

impl PipelineStep for OpenStep {
    fn process(&self, image: GrayImage) -> Result<GrayImage> {
        Ok(preprocessing::open(&image, self.iterations))
    }

    fn name(&self) -> &str {
        "Morphological Open"
    }
}
