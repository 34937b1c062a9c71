//! FFmpeg-backed frame source.
//!
//! [`VideoFile`] opens a container, resolves its [`SourceMetadata`], and
//! serves thumbnail-sized RGBA frames at arbitrary timestamps. Every read
//! seeks to the nearest keyframe at or before the target, flushes the
//! decoder, and decodes forward until the frame whose display interval
//! covers the target comes out, so a frame is never read before the seek
//! has settled.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    mem,
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbaImage;

use crate::{
    conversion::{frame_to_buffer, pts_to_seconds, rational_to_f64, seek_timestamp},
    error::MinyError,
    metadata::SourceMetadata,
    source::{FrameSource, ThumbnailSize},
};

/// A video file (or URL understood by FFmpeg) opened for sampling.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use miny::{FrameSource, MinyError, ThumbnailSize, VideoFile};
///
/// let mut video = VideoFile::open("input.mp4")?;
/// println!("Duration: {:?}", video.metadata().duration);
/// let thumb = video.frame_at(Duration::from_secs(3), ThumbnailSize::SMALL)?;
/// assert_eq!(thumb.dimensions(), (32, 32));
/// # Ok::<(), MinyError>(())
/// ```
pub struct VideoFile {
    input_context: Input,
    metadata: SourceMetadata,
    video_stream_index: usize,
    /// Stream start offset in seconds; PTS values are reported relative to it.
    start_offset: f64,
    time_base: Rational,
    path: PathBuf,
    name: String,
    /// Decoder, scaler and scratch surface, created on first read and reused.
    decode_state: Option<DecodeState>,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .finish_non_exhaustive()
    }
}

struct DecodeState {
    decoder: VideoDecoder,
    scaler: ScalingContext,
    size: ThumbnailSize,
    scaled: VideoFrame,
}

impl VideoFile {
    /// Open a video for sampling and resolve its metadata.
    ///
    /// # Errors
    ///
    /// - [`MinyError::UnsupportedEnvironment`] if FFmpeg cannot be initialised.
    /// - [`MinyError::Metadata`] if the source cannot be opened or its codec
    ///   parameters cannot be read.
    /// - [`MinyError::NoVideoStream`] if the container holds no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MinyError> {
        let path = path.as_ref();
        let name = path.display().to_string();

        log::debug!("Opening video source: {name}");

        ffmpeg_next::init().map_err(|error| {
            log::error!("FFmpeg initialisation failed: {error}");
            MinyError::UnsupportedEnvironment("FFmpeg".to_string())
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| MinyError::Metadata {
                path: name.clone(),
                reason: error.to_string(),
            })?;

        let (video_stream_index, time_base, start_offset, stream_duration, frames_per_second) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(MinyError::NoVideoStream)?;
            let time_base = stream.time_base();
            let start_pts = stream.start_time();
            // AV_NOPTS_VALUE is i64::MIN.
            let start_offset = if start_pts > 0 && start_pts != i64::MIN {
                pts_to_seconds(start_pts, time_base)
            } else {
                0.0
            };
            let stream_duration = if stream.duration() > 0 {
                pts_to_seconds(stream.duration(), time_base)
            } else {
                0.0
            };
            let mut frames_per_second = rational_to_f64(stream.avg_frame_rate());
            if frames_per_second <= 0.0 {
                frames_per_second = rational_to_f64(stream.rate());
            }
            (
                stream.index(),
                time_base,
                start_offset,
                stream_duration,
                frames_per_second,
            )
        };

        let container_micros = input_context.duration();
        let duration = if container_micros > 0 {
            Duration::from_micros(container_micros as u64)
        } else if stream_duration.is_finite() && stream_duration > 0.0 {
            Duration::from_secs_f64(stream_duration)
        } else {
            Duration::ZERO
        };

        let decoder = open_decoder(&input_context, video_stream_index).map_err(|error| {
            MinyError::Metadata {
                path: name.clone(),
                reason: format!("failed to create video decoder: {error}"),
            }
        })?;
        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = SourceMetadata {
            duration,
            duration_in_frames: (duration.as_secs_f64() * frames_per_second) as u64,
            frames_per_second,
            width: decoder.width(),
            height: decoder.height(),
            codec,
            format: input_context.format().name().to_string(),
        };

        log::info!(
            "Opened video source: {name} (format={}, duration={:.2}s, {}x{} @ {:.2} fps, codec={})",
            metadata.format,
            metadata.duration.as_secs_f64(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
        );

        Ok(Self {
            input_context,
            metadata,
            video_stream_index,
            start_offset,
            time_base,
            path: path.to_path_buf(),
            name,
            decode_state: None,
        })
    }

    /// Open a source, read its metadata, and close it again.
    ///
    /// # Errors
    ///
    /// Same as [`open`](VideoFile::open).
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<SourceMetadata, MinyError> {
        Ok(Self::open(path)?.metadata)
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn prepare_decoder(&mut self, size: ThumbnailSize) -> Result<(), MinyError> {
        let reusable = self
            .decode_state
            .as_ref()
            .is_some_and(|state| state.size == size);

        if !reusable {
            let decoder = open_decoder(&self.input_context, self.video_stream_index)
                .map_err(|error| MinyError::Decode(error.to_string()))?;
            let scaler = ScalingContext::get(
                decoder.format(),
                decoder.width(),
                decoder.height(),
                Pixel::RGBA,
                size.width,
                size.height,
                ScalingFlags::AREA,
            )?;
            self.decode_state = Some(DecodeState {
                decoder,
                scaler,
                size,
                scaled: VideoFrame::empty(),
            });
        }

        Ok(())
    }
}

impl FrameSource for VideoFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn frame_at(
        &mut self,
        timestamp: Duration,
        size: ThumbnailSize,
    ) -> Result<RgbaImage, MinyError> {
        let target = timestamp.as_secs_f64();
        let frame_interval = if self.metadata.frames_per_second > 0.0 {
            1.0 / self.metadata.frames_per_second
        } else {
            0.0
        };
        let seek_target = seek_timestamp(timestamp + Duration::from_secs_f64(self.start_offset));
        let stream_index = self.video_stream_index;
        let time_base = self.time_base;
        let start_offset = self.start_offset;

        self.prepare_decoder(size)?;
        let input_context = &mut self.input_context;
        let state = self
            .decode_state
            .as_mut()
            .ok_or_else(|| MinyError::Decode("decoder unavailable".to_string()))?;

        input_context
            .seek(seek_target, ..seek_target)
            .map_err(|error| MinyError::Decode(format!("seek to {target:.3}s failed: {error}")))?;
        state.decoder.flush();

        // Display time of a decoded frame, relative to the stream start.
        let display_time = |frame: &VideoFrame| {
            let pts = frame.timestamp().or(frame.pts()).unwrap_or(0);
            pts_to_seconds(pts, time_base) - start_offset
        };
        let covers_target = |seconds: f64| seconds + frame_interval > target;

        let mut decoded = VideoFrame::empty();
        let mut previous = VideoFrame::empty();
        let mut have_previous = false;

        for (stream, packet) in input_context.packets() {
            if stream.index() != stream_index {
                continue;
            }
            state
                .decoder
                .send_packet(&packet)
                .map_err(|error| MinyError::Decode(error.to_string()))?;

            while state.decoder.receive_frame(&mut decoded).is_ok() {
                if covers_target(display_time(&decoded)) {
                    return state.scale(&decoded);
                }
                mem::swap(&mut decoded, &mut previous);
                have_previous = true;
            }
        }

        state
            .decoder
            .send_eof()
            .map_err(|error| MinyError::Decode(error.to_string()))?;
        while state.decoder.receive_frame(&mut decoded).is_ok() {
            if covers_target(display_time(&decoded)) {
                return state.scale(&decoded);
            }
            mem::swap(&mut decoded, &mut previous);
            have_previous = true;
        }

        if have_previous {
            log::warn!(
                "No frame covers {target:.3}s in {}; using the last decoded frame",
                self.name
            );
            return state.scale(&previous);
        }

        Err(MinyError::Decode(format!(
            "no decodable frame at {target:.3}s"
        )))
    }

    #[cfg(feature = "rayon")]
    fn frames_at(
        &mut self,
        timestamps: &[Duration],
        size: ThumbnailSize,
    ) -> Result<Vec<RgbaImage>, MinyError> {
        if timestamps.len() <= 1 {
            return timestamps
                .iter()
                .map(|&timestamp| self.frame_at(timestamp, size))
                .collect();
        }
        crate::parallel::decode_batch(&self.path, timestamps, size)
    }
}

impl DecodeState {
    fn scale(&mut self, frame: &VideoFrame) -> Result<RgbaImage, MinyError> {
        self.scaler.run(frame, &mut self.scaled)?;
        let buffer = frame_to_buffer(&self.scaled, self.size.width, self.size.height, 4);
        RgbaImage::from_raw(self.size.width, self.size.height, buffer).ok_or_else(|| {
            MinyError::Decode("scaled frame buffer has the wrong size".to_string())
        })
    }
}

fn open_decoder(input_context: &Input, stream_index: usize) -> Result<VideoDecoder, MinyError> {
    let stream = input_context
        .stream(stream_index)
        .ok_or(MinyError::NoVideoStream)?;
    let decoder_context = CodecContext::from_parameters(stream.parameters())?;
    Ok(decoder_context.decoder().video()?)
}
