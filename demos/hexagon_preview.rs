//! Paint the ring-walk and offset-grid layouts with a synthetic colour ramp.
//!
//! No video is needed: every slot gets a colour derived from its index, so
//! the order in which the layouts fill the raster is visible in the output.
//!
//! Usage:
//!   cargo run --example hexagon_preview -- [output_directory]

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use miny::{
    BarcodeOptions, CancellationToken, ColorSample, NoOpObserver, RunContext, SyntheticSource,
    generate,
};

/// A hue sweep across the source duration.
fn ramp(duration: Duration) -> impl Fn(Duration) -> ColorSample + Send + 'static {
    move |timestamp| {
        let phase = timestamp.as_secs_f64() / duration.as_secs_f64();
        let channel = |offset: f64| {
            let value = ((phase + offset) * std::f64::consts::TAU).cos() * 0.5 + 0.5;
            (value * 255.0).round() as u8
        };
        ColorSample::new(channel(0.0), channel(1.0 / 3.0), channel(2.0 / 3.0))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let output_directory = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_directory)?;

    let duration = Duration::from_secs(91);
    let previews = [
        ("ring.png", BarcodeOptions::hexagonal()),
        ("grid.png", BarcodeOptions::hex_grid()),
        ("strip.png", BarcodeOptions::linear()),
    ];

    for (file_name, options) in previews {
        let source = SyntheticSource::new(duration, ramp(duration));
        let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);
        let barcode = generate(source, &options, &mut ctx)?;

        let path = output_directory.join(file_name);
        barcode.raster.save(&path)?;
        println!(
            "{:?}: {} slots -> {}",
            options.layout(),
            barcode.colors.len(),
            path.display()
        );
    }

    Ok(())
}
