//! Concurrent batch decoding.
//!
//! Used by [`VideoFile::frames_at`](crate::VideoFile) when the `rayon`
//! feature is enabled. Each worker opens its own demuxer and decoder once and
//! reuses it for every frame it is handed, so no FFmpeg state is shared.
//! rayon's indexed collect keeps the results in the order the timestamps
//! were given.

use std::path::Path;
use std::time::Duration;

use ::rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use image::RgbaImage;

use crate::error::MinyError;
use crate::source::{FrameSource, ThumbnailSize};
use crate::video::VideoFile;

pub(crate) fn decode_batch(
    path: &Path,
    timestamps: &[Duration],
    size: ThumbnailSize,
) -> Result<Vec<RgbaImage>, MinyError> {
    log::debug!(
        "Decoding batch of {} frames across rayon workers",
        timestamps.len()
    );

    timestamps
        .par_iter()
        .with_min_len(1)
        .map_init(
            || VideoFile::open(path).map_err(|error| reopen_failed(path, &error)),
            |video, &timestamp| match video {
                Ok(video) => video.frame_at(timestamp, size),
                Err(error) => Err(MinyError::Decode(error.clone())),
            },
        )
        .collect()
}

/// Reopening a file the run already probed counts as a decode failure.
fn reopen_failed(path: &Path, error: &MinyError) -> String {
    format!("could not reopen {} for decoding: {error}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PROCESSING_FAILED_MESSAGE;

    #[test]
    fn reopen_failure_is_a_decode_error() {
        let timestamps = [Duration::ZERO, Duration::from_secs(1)];
        let error = decode_batch(
            Path::new("this_file_does_not_exist.mp4"),
            &timestamps,
            ThumbnailSize::SMALL,
        )
        .unwrap_err();

        assert!(matches!(error, MinyError::Decode(_)), "{error:?}");
        assert_eq!(error.user_message(), PROCESSING_FAILED_MESSAGE);
    }
}
