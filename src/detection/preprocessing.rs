use image::{DynamicImage, GrayImage, Luma, imageops};
use imageproc::distance_transform::Norm;
use imageproc::filter::Kernel;
use imageproc::morphology;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Normalized 1D Gaussian kernel of the given odd size.
///
/// Sizes 3, 5 and 7 use the fixed binomial weights; larger sizes derive
/// sigma from the size as `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    match size {
        1 => return vec![1.0],
        3 => return vec![0.25, 0.5, 0.25],
        5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => {
            return vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125];
        }
        _ => {}
    }

    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f64;
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Square `size` x `size` Gaussian weights, row-major
fn gaussian_kernel_2d(size: u32) -> Vec<f32> {
    let row = gaussian_kernel(size);
    row.iter()
        .flat_map(|wy| row.iter().map(move |wx| wy * wx))
        .collect()
}

fn round_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Gaussian-weighted smoothing; pixels outside the image repeat the nearest edge
fn gaussian_smooth(img: &GrayImage, size: u32) -> GrayImage {
    let weights = gaussian_kernel_2d(size);
    Kernel::new(&weights, size, size).filter(img, |out: &mut u8, acc: f32| *out = round_to_u8(acc))
}

/// Index into `0..len` mirrored about the edge pixel (`dcb|abcd|cba`)
fn reflect_101(i: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = i.rem_euclid(period);
    (if m < len { m } else { period - m }) as u32
}

fn pad_reflect_101(img: &GrayImage, pad: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width + 2 * pad, height + 2 * pad, |x, y| {
        let sx = reflect_101(x as i64 - pad as i64, width as i64);
        let sy = reflect_101(y as i64 - pad as i64, height as i64);
        *img.get_pixel(sx, sy)
    })
}

/// Gaussian blur with a square `kernel_size` x `kernel_size` kernel.
///
/// Borders are mirrored without repeating the edge pixel.
pub fn apply_blur(img: &GrayImage, kernel_size: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }
    let pad = kernel_size / 2;
    let padded = pad_reflect_101(img, pad);
    let smoothed = gaussian_smooth(&padded, kernel_size);
    imageops::crop_imm(&smoothed, pad, pad, width, height).to_image()
}

/// Inverted adaptive threshold against a Gaussian-weighted local mean.
///
/// A pixel becomes 255 when it is at least `offset` darker than the mean of
/// its `block_size` neighbourhood, 0 otherwise. Flat regions never pass.
pub fn adaptive_threshold(img: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let mean = gaussian_smooth(img, block_size);
    let (width, height) = img.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let diff = img.get_pixel(x, y)[0] as i32 - mean.get_pixel(x, y)[0] as i32;
        if diff <= -offset { Luma([255u8]) } else { Luma([0u8]) }
    })
}

/// Closing with a 3x3 square applied `iterations` times
pub fn close(mask: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return mask.clone();
    }
    morphology::close(mask, Norm::LInf, iterations)
}

/// Opening with a 3x3 square applied `iterations` times
pub fn open(mask: &GrayImage, iterations: u8) -> GrayImage {
    if iterations == 0 {
        return mask.clone();
    }
    morphology::open(mask, Norm::LInf, iterations)
}
