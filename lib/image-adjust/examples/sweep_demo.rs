/// Parameter sweep example
/// Walks every adjustment across its range and writes each step as a PNG

use image::{ImageReader, Rgb, RgbImage};
use image_adjust::{
    grayscale,
    sweep::{AdjustmentKind, sweep},
};
use std::path::Path;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width) as u8;
        let g = (y * 255 / height) as u8;
        let b = ((x + y) * 255 / (width + height)) as u8;
        Rgb([r, g, b])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp/sweep");
    std::fs::create_dir_all(output_dir)?;

    let img_path = Path::new("data/test.png");
    let img = if img_path.exists() {
        ImageReader::open(img_path)?.decode()?.to_rgb8()
    } else {
        log::info!("{} not found, using a generated gradient", img_path.display());
        gradient(320, 240)
    };

    grayscale(&img)?.save(output_dir.join("grayscale.png"))?;

    for kind in AdjustmentKind::all() {
        let dir = output_dir.join(kind.name());
        std::fs::create_dir_all(&dir)?;

        let mut count = 0;
        for frame in sweep(&img, *kind) {
            let frame = frame?;
            frame
                .image
                .save(dir.join(format!("{}_{:+08.1}.png", kind.name(), frame.value)))?;
            count += 1;
        }

        println!("✓ {} frames of {}", count, kind.name());
    }

    println!("\n✓ Sweep finished");
    println!("  Images saved to: {}", output_dir.display());

    Ok(())
}
