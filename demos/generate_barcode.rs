//! Generate a barcode from a video with progress reporting.
//!
//! Usage:
//!   cargo run --example generate_barcode -- <input_file> [hex|linear|strip|grid]

use std::error::Error;

use miny::{
    BarcodeOptions, ColorSample, FrameSource, LayoutKind, ProgressInfo, RunObserver, Session,
    VideoFile,
};

/// Prints every progress report to stdout.
struct PrintProgress;

impl RunObserver for PrintProgress {
    fn on_progress(&self, colors: &[ColorSample], info: &ProgressInfo) {
        let remaining = info
            .estimated_remaining
            .map_or("???".to_string(), |r| format!("{:.1}s", r.as_secs_f64()));
        let latest = colors
            .last()
            .map_or("-".to_string(), ColorSample::to_string);
        println!(
            "{}/{} ({:.1}%) elapsed={:.1}s remaining={remaining} latest={latest}",
            info.completed,
            info.total,
            info.percentage,
            info.elapsed.as_secs_f64(),
        );
    }

    fn on_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn on_processing_change(&self, processing: bool) {
        println!("processing: {processing}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| "input.mp4".to_string());
    let options = match args.next().as_deref() {
        Some("strip") => BarcodeOptions::strip(),
        Some(name) => BarcodeOptions::for_layout(
            LayoutKind::parse(name).ok_or(format!("unknown layout: {name}"))?,
        ),
        None => BarcodeOptions::hexagonal(),
    };

    let video = VideoFile::open(&input_path)?;
    let metadata = video.metadata();
    println!(
        "{input_path}: {:.2}s, {} frames",
        metadata.duration.as_secs_f64(),
        metadata.duration_in_frames
    );

    let session = Session::new();
    if let Some(barcode) = session.run(video, &options, &PrintProgress) {
        barcode.raster.save("barcode.png")?;
        println!("Saved barcode.png ({} colours)", barcode.colors.len());
    }

    Ok(())
}
