use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const DARK: Rgb<u8> = Rgb([20, 30, 25]);

/// A square region of `side` pixels with its top-left corner at (x, y)
#[derive(Debug, Clone, Copy)]
pub struct Square {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

pub const fn square(x: u32, y: u32, side: u32) -> Square {
    Square { x, y, side }
}

/// Uniformly coloured image
pub fn blank_image(width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, color)
}

/// Dark squares on a white background
pub fn squares_image(width: u32, height: u32, squares: &[Square]) -> DynamicImage {
    let mut img = blank_image(width, height, WHITE);
    paint_squares(&mut img, squares, DARK);
    DynamicImage::ImageRgb8(img)
}

/// Dark squares on a background that darkens from left to right,
/// like a table lit from one side
pub fn shaded_squares_image(width: u32, height: u32, squares: &[Square]) -> DynamicImage {
    let mut img = RgbImage::from_fn(width, height, |x, _| {
        let v = (250 - (x * 100 / width)) as u8;
        Rgb([v, v, v])
    });
    paint_squares(&mut img, squares, DARK);
    DynamicImage::ImageRgb8(img)
}

pub fn paint_squares(img: &mut RgbImage, squares: &[Square], color: Rgb<u8>) {
    for sq in squares {
        for y in sq.y..(sq.y + sq.side).min(img.height()) {
            for x in sq.x..(sq.x + sq.side).min(img.width()) {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Save `img` as PNG inside `dir` and return the path
pub fn save_png(img: &DynamicImage, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

/// Mean absolute difference between two equally sized images
pub fn mean_abs_diff(a: &RgbImage, b: &RgbImage) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());
    let total: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(p, q)| (*p as i32 - *q as i32).unsigned_abs() as u64)
        .sum();
    total as f64 / a.as_raw().len() as f64
}
