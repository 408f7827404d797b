pub mod annotate;
pub mod contours;
pub mod ordering;
pub mod preprocessing;
pub mod steps;

use crate::config::SegmenterConfig;
use crate::error::{Result, SegmentError};
use crate::models::{BoundingBox, Piece};
use crate::pipeline::Pipeline;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use steps::{AdaptiveThresholdStep, BlurStep, CloseStep, OpenStep};

/// Locates pieces on a contrasting background and crops them out.
///
/// A `Segmenter` never changes after construction, so one instance can be
/// shared between threads working on different photos.
#[derive(Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    pipeline: Pipeline,
}

impl Segmenter {
    /// Build a segmenter, rejecting invalid configurations up front
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = build_mask_pipeline(&config);
        log::debug!("Mask pipeline: {}", pipeline.step_names().join(" -> "));
        Ok(Self { config, pipeline })
    }

    /// Save each intermediate mask of `detect` below `output_dir`.
    ///
    /// Every call gets its own `NNN_<name>` sub-directory, numbered in call
    /// order and named after the input file stem (`image` for
    /// `detect_image`). The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: impl AsRef<Path>) -> Result<Self> {
        self.pipeline = self.pipeline.with_debug(output_dir)?;
        Ok(self)
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Decode an image file; JPEG, PNG and BMP are supported
    pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
        let path = path.as_ref();
        let load_error = |source| SegmentError::ImageLoad {
            path: path.to_path_buf(),
            source,
        };
        ImageReader::open(path)
            .map_err(|e| load_error(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| load_error(image::ImageError::IoError(e)))?
            .decode()
            .map_err(load_error)
    }

    /// Load an image and find the pieces in it, in reading order
    pub fn detect(&self, path: impl AsRef<Path>) -> Result<(DynamicImage, Vec<BoundingBox>)> {
        let path = path.as_ref();
        let img = Self::load_image(path)?;
        log::debug!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let boxes = self.find_boxes(&img, &label)?;
        Ok((img, boxes))
    }

    /// Find the pieces in an already decoded image, in reading order
    pub fn detect_image(&self, img: &DynamicImage) -> Result<Vec<BoundingBox>> {
        self.find_boxes(img, "image")
    }

    fn find_boxes(&self, img: &DynamicImage, label: &str) -> Result<Vec<BoundingBox>> {
        let gray = preprocessing::to_grayscale(img);
        let mask = self.pipeline.run(gray, label)?;

        let candidates = contours::find_external_contours(&mask);
        let mut boxes =
            contours::filter_by_area(&candidates, self.config.min_area, self.config.max_area);
        log::debug!(
            "Kept {} of {} contours (area between {} and {})",
            boxes.len(),
            candidates.len(),
            self.config.min_area,
            self.config.max_area
        );

        ordering::reading_order(&mut boxes, self.config.row_band);
        Ok(boxes)
    }

    /// Rectangle cropped for `bbox`: padded on every side, clamped to the image
    pub fn crop_rect(&self, bbox: &BoundingBox, width: u32, height: u32) -> BoundingBox {
        bbox.padded(self.config.padding, width, height)
    }

    /// Crop every box out of `img`, keeping the order of `boxes`
    pub fn pieces(&self, img: &DynamicImage, boxes: &[BoundingBox]) -> Vec<Piece> {
        let (width, height) = img.dimensions();
        boxes
            .iter()
            .enumerate()
            .map(|(index, bbox)| {
                let crop = self.crop_rect(bbox, width, height);
                Piece {
                    index,
                    bbox: *bbox,
                    crop,
                    image: img.crop_imm(crop.x, crop.y, crop.width, crop.height),
                }
            })
            .collect()
    }

    /// Write one JPEG per box as `{base_name}_{index:03}.jpg` in `output_dir`.
    ///
    /// Paths come back in the order of `boxes`. A failed write stops the
    /// call; files written before it are left in place.
    pub fn extract(
        &self,
        img: &DynamicImage,
        boxes: &[BoundingBox],
        output_dir: impl AsRef<Path>,
        base_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        create_dir(output_dir)?;

        let mut saved = Vec::with_capacity(boxes.len());
        for piece in self.pieces(img, boxes) {
            let path = output_dir.join(piece.file_name(base_name));
            let rgb = DynamicImage::ImageRgb8(piece.image.to_rgb8());
            rgb.save_with_format(&path, ImageFormat::Jpeg)
                .map_err(|source| SegmentError::Write {
                    path: path.clone(),
                    source,
                })?;
            saved.push(path);
        }

        log::info!("Extracted {} pieces to {}", saved.len(), output_dir.display());
        Ok(saved)
    }

    /// Draw numbered outlines of `boxes` over a copy of `img`.
    ///
    /// The annotated copy is written to `output_path` when one is given and
    /// returned either way.
    pub fn visualize(
        &self,
        img: &DynamicImage,
        boxes: &[BoundingBox],
        output_path: Option<&Path>,
    ) -> Result<RgbImage> {
        let font = annotate::label_font()?;
        let mut canvas = img.to_rgb8();

        for (idx, bbox) in boxes.iter().enumerate() {
            annotate::draw_box(&mut canvas, bbox, annotate::BOX_COLOR);
            annotate::draw_label(&mut canvas, &font, bbox, &idx.to_string(), annotate::BOX_COLOR);
        }

        if let Some(path) = output_path {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_dir(parent)?;
            }
            canvas.save(path).map_err(|source| SegmentError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            log::info!("Visualization saved to {}", path.display());
        }

        Ok(canvas)
    }
}

/// Build the mask preparation chain used by `detect`
pub fn build_mask_pipeline(config: &SegmenterConfig) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(BlurStep {
            kernel_size: config.blur_kernel,
        }))
        .add_step(Arc::new(AdaptiveThresholdStep {
            block_size: config.threshold_block,
            offset: config.threshold_offset,
        }))
        .add_step(Arc::new(CloseStep {
            iterations: config.close_iterations,
        }))
        .add_step(Arc::new(OpenStep {
            iterations: config.open_iterations,
        }))
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| SegmentError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
