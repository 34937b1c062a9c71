//! Error types for the `miny` crate.
//!
//! This module defines [`MinyError`], the unified error type returned by all
//! fallible operations in the crate. Terminal run failures are normalised to
//! a single human-readable message through [`MinyError::user_message`] before
//! they reach a [`RunObserver`](crate::RunObserver).

use std::io::Error as IoError;

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// Message sent through the error channel for any failure inside the
/// sampling loop.
pub(crate) const PROCESSING_FAILED_MESSAGE: &str =
    "Failed to process video. Please try uploading a different video file.";

/// The unified error type for all `miny` operations.
///
/// Every public method that can fail returns `Result<T, MinyError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MinyError {
    /// The source could not be opened or its duration could not be resolved.
    #[error("Failed to load video metadata for {path}: {reason}")]
    Metadata {
        /// Path or URL of the source.
        path: String,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The source does not contain a video stream.
    #[error("No video stream found in source")]
    NoVideoStream,

    /// A scheduled seek or frame read failed mid-run.
    #[error("Failed to decode video frame: {0}")]
    Decode(String),

    /// The run was superseded or its consumer was torn down.
    ///
    /// Never reported through the error channel.
    #[error("Run cancelled")]
    Cancelled,

    /// A required decoding or drawing capability is unavailable.
    ///
    /// Holds the bare capability name, such as `FFmpeg` or
    /// `1200x1200 drawing surface`.
    #[error("Unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// The supplied [`BarcodeOptions`](crate::BarcodeOptions) are unusable.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while exporting the raster.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for MinyError {
    fn from(error: FfmpegError) -> Self {
        MinyError::Ffmpeg(error.to_string())
    }
}

impl MinyError {
    /// Returns `true` for [`MinyError::Cancelled`].
    pub fn is_cancellation(&self) -> bool {
        matches!(self, MinyError::Cancelled)
    }

    /// The message delivered through the error channel for this failure.
    ///
    /// Internal detail is deliberately dropped for decode failures; it is
    /// still available through `Display` and the debug log.
    pub fn user_message(&self) -> String {
        match self {
            MinyError::Metadata { .. } | MinyError::NoVideoStream => {
                "Failed to load video metadata".to_string()
            }
            MinyError::UnsupportedEnvironment(capability) => {
                format!("{capability} not supported")
            }
            MinyError::InvalidOptions(reason) => format!("Invalid options: {reason}"),
            MinyError::Cancelled => "Processing cancelled".to_string(),
            MinyError::Decode(_)
            | MinyError::Ffmpeg(_)
            | MinyError::Io(_)
            | MinyError::Image(_) => PROCESSING_FAILED_MESSAGE.to_string(),
        }
    }
}
