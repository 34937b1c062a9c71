//! Error handling integration tests.
//!
//! These tests verify that failures surface as the right error variant and
//! reach observers as a single normalised message.

use std::sync::Mutex;
use std::time::Duration;

use miny::{
    BarcodeOptions, CancellationToken, ColorSample, MinyError, NoOpObserver, RunContext,
    RunObserver, Session, SourceMetadata, SyntheticSource, ThumbnailSize, VideoFile, generate,
};

const PROCESSING_FAILED: &str =
    "Failed to process video. Please try uploading a different video file.";

#[derive(Default)]
struct Errors {
    messages: Mutex<Vec<String>>,
    lifecycle: Mutex<Vec<bool>>,
}

impl RunObserver for Errors {
    fn on_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn on_processing_change(&self, processing: bool) {
        self.lifecycle.lock().unwrap().push(processing);
    }
}

fn white(_: Duration) -> ColorSample {
    ColorSample::new(255, 255, 255)
}

// ── Metadata ───────────────────────────────────────────────────────

#[test]
fn open_nonexistent_file() {
    let result = VideoFile::open("this_file_does_not_exist.mp4");
    let error = result.unwrap_err();
    assert!(
        matches!(error, MinyError::Metadata { .. }),
        "expected a metadata error, got {error:?}"
    );
    assert_eq!(error.user_message(), "Failed to load video metadata");
    assert!(error.to_string().contains("this_file_does_not_exist.mp4"));
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = VideoFile::open(&invalid_file_path);
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn zero_duration_source_is_a_metadata_error() {
    let source = SyntheticSource::new(Duration::ZERO, white);
    let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);

    let result = generate(source, &BarcodeOptions::linear(), &mut ctx);
    assert!(matches!(result, Err(MinyError::Metadata { .. })));
}

#[test]
fn zero_duration_reported_through_session() {
    let metadata = SourceMetadata::from_duration(Duration::ZERO, 25.0);
    let mut source = SyntheticSource::with_metadata(metadata, white);
    let errors = Errors::default();

    let barcode = Session::new().run(&mut source, &BarcodeOptions::hexagonal(), &errors);

    assert!(barcode.is_none());
    assert!(source.requested().is_empty());
    assert_eq!(
        *errors.messages.lock().unwrap(),
        vec!["Failed to load video metadata".to_string()]
    );
    assert_eq!(*errors.lifecycle.lock().unwrap(), vec![true, false]);
}

// ── Decode ─────────────────────────────────────────────────────────

#[test]
fn decode_failure_is_terminal_and_reported_once() {
    let mut source = SyntheticSource::new(Duration::from_secs(10), white).failing_at(3);
    let errors = Errors::default();

    let barcode = Session::new().run(&mut source, &BarcodeOptions::linear(), &errors);

    assert!(barcode.is_none());
    // No retry, no further reads.
    assert_eq!(source.requested().len(), 4);
    assert_eq!(
        *errors.messages.lock().unwrap(),
        vec![PROCESSING_FAILED.to_string()]
    );
    assert_eq!(*errors.lifecycle.lock().unwrap(), vec![true, false]);
}

#[test]
fn decode_failure_keeps_internal_detail_in_display() {
    let source = SyntheticSource::new(Duration::from_secs(1), white).failing_at(0);
    let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);

    let error = generate(source, &BarcodeOptions::linear(), &mut ctx).unwrap_err();
    assert!(matches!(error, MinyError::Decode(_)));
    assert!(error.to_string().contains("synthetic failure at read 0"));
    assert_eq!(error.user_message(), PROCESSING_FAILED);
}

// ── Configuration and environment ──────────────────────────────────

#[test]
fn invalid_options_fail_before_sampling() {
    let mut source = SyntheticSource::new(Duration::from_secs(10), white);
    let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);

    let options = BarcodeOptions::linear().with_frame_count(0);
    let result = generate(&mut source, &options, &mut ctx);
    assert!(matches!(result, Err(MinyError::InvalidOptions(_))));

    let options = BarcodeOptions::linear().with_thumbnail(ThumbnailSize::square(0));
    let result = generate(&mut source, &options, &mut ctx);
    assert!(matches!(result, Err(MinyError::InvalidOptions(_))));

    assert!(source.requested().is_empty());
}

#[test]
fn oversized_raster_is_unsupported() {
    let mut source = SyntheticSource::new(Duration::from_secs(10), white);
    let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);

    let options = BarcodeOptions::linear().with_raster_size(u32::MAX, u32::MAX);
    let error = generate(&mut source, &options, &mut ctx).unwrap_err();

    assert!(matches!(error, MinyError::UnsupportedEnvironment(_)));
    assert_eq!(
        error.user_message(),
        format!("{}x{} drawing surface not supported", u32::MAX, u32::MAX)
    );
    assert!(source.requested().is_empty());
}

#[test]
fn cancellation_is_flagged() {
    assert!(MinyError::Cancelled.is_cancellation());
    assert!(!MinyError::NoVideoStream.is_cancellation());
}

#[test]
fn unsupported_environment_names_the_capability() {
    let error = MinyError::UnsupportedEnvironment("FFmpeg".to_string());
    assert_eq!(error.user_message(), "FFmpeg not supported");
    assert_eq!(error.to_string(), "Unsupported environment: FFmpeg");
}
