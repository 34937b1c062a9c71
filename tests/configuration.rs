//! BarcodeOptions builder and preset tests.

use miny::{
    BarcodeOptions, ColorSample, DEFAULT_BACKGROUND, HexGridLayout, LayoutKind, MinyError,
    ScheduleMode, ThumbnailSize,
};

// ── Presets ────────────────────────────────────────────────────────

#[test]
fn hexagonal_preset() {
    let options = BarcodeOptions::hexagonal();
    assert_eq!(options.layout(), LayoutKind::HexRing);
    assert_eq!(options.frame_count(), 91);
    assert_eq!(options.raster_size(), (1200, 1200));
    assert_eq!(options.thumbnail(), ThumbnailSize::LARGE);
    assert_eq!(options.batch_size(), 1);
    assert_eq!(options.schedule_mode(), ScheduleMode::Uniform);
    assert_eq!(options.background(), DEFAULT_BACKGROUND);
    assert_eq!(BarcodeOptions::default(), options);
}

#[test]
fn linear_preset() {
    let options = BarcodeOptions::linear();
    assert_eq!(options.layout(), LayoutKind::Linear);
    assert_eq!(options.frame_count(), 200);
    assert_eq!(options.raster_size(), (1000, 200));
    assert_eq!(options.thumbnail(), ThumbnailSize::SMALL);
}

#[test]
fn strip_preset() {
    let options = BarcodeOptions::strip();
    assert_eq!(options.layout(), LayoutKind::Linear);
    assert_eq!(options.frame_count(), 300);
    assert_eq!(options.batch_size(), 5);
    assert_eq!(options.schedule_mode(), ScheduleMode::FrameIndexed);
    assert_eq!(options.thumbnail(), ThumbnailSize::square(32));
}

#[test]
fn hex_grid_preset() {
    let options = BarcodeOptions::hex_grid();
    assert_eq!(options.layout(), LayoutKind::HexGrid);
    assert_eq!(options.raster_size(), (800, 400));
    assert_eq!(
        options.frame_count(),
        HexGridLayout::capacity(800, 400, HexGridLayout::DEFAULT_RADIUS)
    );
}

#[test]
fn for_layout_picks_the_matching_preset() {
    assert_eq!(
        BarcodeOptions::for_layout(LayoutKind::Linear),
        BarcodeOptions::linear()
    );
    assert_eq!(
        BarcodeOptions::for_layout(LayoutKind::HexRing),
        BarcodeOptions::hexagonal()
    );
    assert_eq!(
        BarcodeOptions::for_layout(LayoutKind::HexGrid),
        BarcodeOptions::hex_grid()
    );
}

// ── Builder ────────────────────────────────────────────────────────

#[test]
fn builder_overrides() {
    let options = BarcodeOptions::linear()
        .with_frame_count(12)
        .with_batch_size(4)
        .with_raster_size(600, 50)
        .with_schedule_mode(ScheduleMode::FrameIndexed)
        .with_background(ColorSample::new(1, 2, 3));

    assert_eq!(options.frame_count(), 12);
    assert_eq!(options.batch_size(), 4);
    assert_eq!(options.raster_size(), (600, 50));
    assert_eq!(options.schedule_mode(), ScheduleMode::FrameIndexed);
    assert_eq!(options.background(), ColorSample::new(1, 2, 3));
}

#[test]
fn batch_size_clamps_zero() {
    let options = BarcodeOptions::strip().with_batch_size(0);
    assert_eq!(options.batch_size(), 1);
}

#[test]
fn debug_output() {
    let debug = format!("{:?}", BarcodeOptions::hexagonal());
    assert!(debug.contains("BarcodeOptions"));
    assert!(debug.contains("frame_count: 91"));
    assert!(debug.contains("thumbnail: 64x64"));
    assert!(debug.contains("raster: 1200x1200"));
    assert!(debug.contains("rgb(26, 26, 26)"));
}

// ── Validation ─────────────────────────────────────────────────────

#[test]
fn presets_are_valid() {
    for options in [
        BarcodeOptions::hexagonal(),
        BarcodeOptions::linear(),
        BarcodeOptions::strip(),
        BarcodeOptions::hex_grid(),
    ] {
        assert!(options.validate().is_ok(), "{options:?}");
    }
}

#[test]
fn validation_rejects_degenerate_options() {
    let cases = [
        BarcodeOptions::linear().with_frame_count(0),
        BarcodeOptions::linear().with_raster_size(0, 200),
        BarcodeOptions::linear().with_thumbnail(ThumbnailSize { width: 32, height: 0 }),
        BarcodeOptions::hexagonal().with_hex_radius(Some(0.0)),
        BarcodeOptions::hexagonal().with_hex_radius(Some(f64::INFINITY)),
    ];
    for options in cases {
        assert!(
            matches!(options.validate(), Err(MinyError::InvalidOptions(_))),
            "{options:?}"
        );
    }
}
