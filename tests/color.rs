//! Colour reduction tests.

use image::{Rgba, RgbaImage};
use miny::{ColorSample, average_color, average_rgba};

#[test]
fn red_and_black_average_rounds_up() {
    let pixels = [255, 0, 0, 255, 0, 0, 0, 255];
    assert_eq!(average_rgba(&pixels), ColorSample::new(128, 0, 0));
    assert_eq!(average_rgba(&pixels).to_string(), "rgb(128, 0, 0)");
}

#[test]
fn reduction_is_order_independent() {
    let forward = [10, 20, 30, 255, 200, 100, 0, 255, 7, 7, 7, 255];
    let mut backward = Vec::new();
    for pixel in forward.chunks_exact(4).rev() {
        backward.extend_from_slice(pixel);
    }
    assert_eq!(average_rgba(&forward), average_rgba(&backward));
}

#[test]
fn alpha_is_ignored() {
    let opaque = [100, 150, 200, 255, 50, 50, 50, 255];
    let transparent = [100, 150, 200, 0, 50, 50, 50, 17];
    assert_eq!(average_rgba(&opaque), average_rgba(&transparent));
}

#[test]
fn channels_are_reduced_separately() {
    let pixels = [0, 255, 1, 255, 0, 0, 2, 255, 3, 0, 2, 255];
    // r: 3/3 = 1, g: 255/3 = 85, b: 5/3 = 1.67 -> 2
    assert_eq!(average_rgba(&pixels), ColorSample::new(1, 85, 2));
}

#[test]
fn flat_image_reduces_to_its_colour() {
    let image = RgbaImage::from_pixel(32, 32, Rgba([12, 34, 56, 255]));
    assert_eq!(average_color(&image), ColorSample::new(12, 34, 56));
}

#[test]
fn half_split_image() {
    let mut image = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
    for x in 0..4 {
        image.put_pixel(x, 0, Rgba([255, 255, 255, 255]));
    }
    assert_eq!(average_color(&image), ColorSample::new(128, 128, 128));
}

#[test]
fn trailing_bytes_are_ignored() {
    let pixels = [40, 40, 40, 255, 99, 99];
    assert_eq!(average_rgba(&pixels), ColorSample::new(40, 40, 40));
}

// ── Parsing ────────────────────────────────────────────────────────

#[test]
fn parses_css_and_hex_forms() {
    assert_eq!("rgb(1, 2, 3)".parse(), Ok(ColorSample::new(1, 2, 3)));
    assert_eq!(" rgb(255,0,128) ".parse(), Ok(ColorSample::new(255, 0, 128)));
    assert_eq!("#1a1a1a".parse(), Ok(ColorSample::new(26, 26, 26)));
}

#[test]
fn rejects_malformed_colours() {
    assert!("rgb(1, 2)".parse::<ColorSample>().is_err());
    assert!("rgb(1, 2, 300)".parse::<ColorSample>().is_err());
    assert!("#12345".parse::<ColorSample>().is_err());
    assert!("blue".parse::<ColorSample>().is_err());
}

#[test]
fn display_round_trips() {
    let color = ColorSample::new(9, 99, 199);
    assert_eq!(color.to_string().parse(), Ok(color));
}
