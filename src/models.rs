use image::DynamicImage;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Grow by `padding` on every side, clamped to a `width` x `height` image
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> BoundingBox {
        let x1 = self.x.saturating_sub(padding).min(width);
        let y1 = self.y.saturating_sub(padding).min(height);
        let x2 = self.right().saturating_add(padding).min(width);
        let y2 = self.bottom().saturating_add(padding).min(height);
        BoundingBox {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }
}

/// Boundary of one candidate region, kept only while detecting
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Enclosed area of the polygon through the boundary pixel centres
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    /// Smallest box containing every boundary pixel
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(BoundingBox {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }
}

/// A cropped piece ready to be written or handed to an identifier
#[derive(Debug, Clone)]
pub struct Piece {
    /// Position in reading order; correlates results back to the photo
    pub index: usize,
    pub bbox: BoundingBox,
    /// Padded and clamped rectangle the image was cropped from
    pub crop: BoundingBox,
    pub image: DynamicImage,
}

impl Piece {
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}_{:03}.jpg", base_name, self.index)
    }
}
