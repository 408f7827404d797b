use image::{Rgb, RgbImage};

fn main() -> anyhow::Result<()> {
    let (width, height) = (800u32, 600u32);

    // Background lit from the left, darker towards the right edge
    let mut img = RgbImage::from_fn(width, height, |x, _| {
        let v = (245 - x * 70 / width) as u8;
        Rgb([v, v, v.saturating_sub(5)])
    });

    // A loose 4x3 grid of pieces, rows slightly staggered
    let colors = [Rgb([180, 20, 20]), Rgb([20, 60, 170]), Rgb([30, 30, 30]), Rgb([200, 160, 10])];
    for row in 0..3u32 {
        for col in 0..4u32 {
            let x = 60 + col * 180 + row * 7;
            let y = 60 + row * 180 + col * 9;
            let (w, h) = (40 + (col * 13) % 50, 35 + (row * 17) % 45);
            let color = colors[((row + col) % 4) as usize];
            for py in y..y + h {
                for px in x..x + w {
                    img.put_pixel(px, py, color);
                }
            }
        }
    }

    img.save("tray.png")?;
    println!("Created tray.png ({}x{}, 12 pieces)", width, height);
    Ok(())
}
