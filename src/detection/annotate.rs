use crate::error::Result;
use crate::models::BoundingBox;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const LINE_THICKNESS: u32 = 2;
const LABEL_GAP: i32 = 5;
const LABEL_SCALE: PxScale = PxScale { x: 16.0, y: 16.0 };

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Font used for box labels
pub fn label_font() -> Result<FontRef<'static>> {
    Ok(FontRef::try_from_slice(FONT_DATA)?)
}

/// Outline `bbox` with a rectangle `LINE_THICKNESS` pixels wide
pub fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    for inset in 0..LINE_THICKNESS {
        let width = bbox.width.saturating_sub(2 * inset);
        let height = bbox.height.saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at((bbox.x + inset) as i32, (bbox.y + inset) as i32).of_size(width, height);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

/// Top-left origin for `text` so its baseline sits `LABEL_GAP` above the box.
///
/// When the glyphs would leave the top of the image the label is placed just
/// inside the box's top-left corner instead.
pub fn label_origin(font: &FontRef<'_>, bbox: &BoundingBox, text: &str) -> (i32, i32) {
    let (_, height) = text_size(LABEL_SCALE, font, text);
    let ascent = font.as_scaled(LABEL_SCALE).ascent().round() as i32;
    let baseline = bbox.y as i32 - LABEL_GAP;
    if baseline - height as i32 >= 0 {
        (bbox.x as i32, baseline - ascent)
    } else {
        let inset = LINE_THICKNESS as i32 + 1;
        let baseline = bbox.y as i32 + inset + height as i32;
        (bbox.x as i32 + inset, baseline - ascent)
    }
}

/// Write `text` at its label position for `bbox`
pub fn draw_label(canvas: &mut RgbImage, font: &FontRef<'_>, bbox: &BoundingBox, text: &str, color: Rgb<u8>) {
    let (x, y) = label_origin(font, bbox, text);
    draw_text_mut(canvas, color, x, y, LABEL_SCALE, font, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_outline_is_two_pixels_wide() {
        let mut canvas = RgbImage::new(40, 40);
        draw_box(&mut canvas, &BoundingBox::new(5, 5, 20, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(5, 10), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(6, 10), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(7, 10), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(24, 24), BOX_COLOR);
    }

    fn inked(canvas: &RgbImage) -> Vec<(u32, u32)> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[1] > 0)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn label_is_drawn_above_the_box() {
        let font = label_font().unwrap();
        let mut canvas = RgbImage::new(60, 60);
        let bbox = BoundingBox::new(10, 40, 30, 15);
        draw_label(&mut canvas, &font, &bbox, "12", BOX_COLOR);

        let pixels = inked(&canvas);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|&(x, y)| y < bbox.y && x >= bbox.x));
    }

    #[test]
    fn label_moves_inside_near_top_edge() {
        let font = label_font().unwrap();
        let mut canvas = RgbImage::new(60, 60);
        let bbox = BoundingBox::new(10, 2, 40, 40);
        draw_label(&mut canvas, &font, &bbox, "7", BOX_COLOR);

        let pixels = inked(&canvas);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|&(x, y)| x > bbox.x && y > bbox.y && y < bbox.bottom()));
    }
}
