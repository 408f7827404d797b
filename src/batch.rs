//! Segment single photos or whole directories into an output tree.
//!
//! Each processed photo produces:
//!
//! ```text
//! <output>/pieces/<stem>_000.jpg ...
//! <output>/results/detected_pieces.jpg      (when visualizing)
//! <output>/results/<stem>_manifest.json
//! ```
//!
//! The manifest lists every piece with its index, file and boxes so an
//! identification step can correlate its results back to the photo.

use crate::detection::Segmenter;
use crate::error::{Result, SegmentError};
use crate::models::BoundingBox;
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File extensions picked up when scanning a directory
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub path: PathBuf,
    pub bbox: BoundingBox,
    pub crop: BoundingBox,
}

/// Outcome of segmenting one photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pieces: Vec<ManifestEntry>,
    pub pieces_dir: PathBuf,
    pub visualization: Option<PathBuf>,
    pub manifest: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub image: PathBuf,
    pub pieces_detected: usize,
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn images(&self) -> usize {
        self.entries.len()
    }

    pub fn successes(&self) -> usize {
        self.entries.iter().filter(|e| e.succeeded()).count()
    }

    pub fn failures(&self) -> usize {
        self.images() - self.successes()
    }

    pub fn total_pieces(&self) -> usize {
        self.entries.iter().map(|e| e.pieces_detected).sum()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by path
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| SegmentError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_image_extension(p))
        .collect();
    images.sort();
    Ok(images)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "piece".to_string())
}

/// Detect, extract and optionally visualize one photo into `output_dir`
pub fn process_image(
    segmenter: &Segmenter,
    input: &Path,
    output_dir: &Path,
    visualize: bool,
) -> Result<ImageReport> {
    let pieces_dir = output_dir.join("pieces");
    let results_dir = output_dir.join("results");

    let (img, boxes) = segmenter.detect(input)?;
    log::info!("Detected {} pieces in {}", boxes.len(), input.display());

    let visualization = if visualize {
        let path = results_dir.join("detected_pieces.jpg");
        segmenter.visualize(&img, &boxes, Some(path.as_path()))?;
        Some(path)
    } else {
        None
    };

    let stem = file_stem(input);
    let paths = segmenter.extract(&img, &boxes, &pieces_dir, &stem)?;
    let (width, height) = img.dimensions();

    let pieces = boxes
        .iter()
        .zip(paths)
        .enumerate()
        .map(|(index, (bbox, path))| ManifestEntry {
            index,
            path,
            bbox: *bbox,
            crop: segmenter.crop_rect(bbox, width, height),
        })
        .collect();

    let report = ImageReport {
        source: input.to_path_buf(),
        width,
        height,
        pieces,
        pieces_dir,
        visualization,
        manifest: results_dir.join(format!("{}_manifest.json", stem)),
    };
    write_manifest(&report)?;
    Ok(report)
}

fn write_manifest(report: &ImageReport) -> Result<()> {
    let path = &report.manifest;
    let manifest_error = |source| SegmentError::Manifest {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SegmentError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|e| manifest_error(serde_json::Error::io(e)))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report).map_err(manifest_error)?;
    writer
        .flush()
        .map_err(|e| manifest_error(serde_json::Error::io(e)))?;
    log::info!("Manifest saved to {}", path.display());
    Ok(())
}

/// Process every image in `input_dir`, one output sub-directory per image.
///
/// A photo that fails is logged and recorded; the rest still run.
pub fn run_batch(
    segmenter: &Segmenter,
    input_dir: &Path,
    output_dir: &Path,
    visualize: bool,
) -> Result<BatchSummary> {
    let images = collect_images(input_dir)?;
    if images.is_empty() {
        log::warn!("No images found in {}", input_dir.display());
    } else {
        log::info!("Found {} images to process", images.len());
    }

    let mut summary = BatchSummary::default();
    for (idx, image) in images.iter().enumerate() {
        log::info!("Processing image {}/{}: {}", idx + 1, images.len(), image.display());
        let image_output = output_dir.join(file_stem(image));

        let entry = match process_image(segmenter, image, &image_output, visualize) {
            Ok(report) => BatchEntry {
                image: image.clone(),
                pieces_detected: report.pieces.len(),
                error: None,
            },
            Err(e) => {
                log::warn!("Skipping {} ({} stage): {}", image.display(), e.stage(), e);
                BatchEntry {
                    image: image.clone(),
                    pieces_detected: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        summary.entries.push(entry);
    }

    Ok(summary)
}
