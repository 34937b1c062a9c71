//! # miny
//!
//! Turn a video into a colour barcode.
//!
//! `miny` samples a fixed number of frames evenly across a video, reduces
//! each frame to its average colour and paints the resulting sequence into a
//! raster: either a strip of equal-width bars or a mosaic of hexagons walked
//! outward in rings from the centre. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; drawing by
//! [`tiny-skia`](https://crates.io/crates/tiny-skia).
//!
//! ## Quick Start
//!
//! ### Hexagonal mosaic
//!
//! ```no_run
//! use miny::{BarcodeOptions, NoOpObserver, Session, VideoFile};
//!
//! let video = VideoFile::open("input.mp4").unwrap();
//! let session = Session::new();
//! if let Some(barcode) = session.run(video, &BarcodeOptions::hexagonal(), &NoOpObserver) {
//!     barcode.raster.save("miny.png").unwrap();
//! }
//! ```
//!
//! ### Bar strip from any source
//!
//! ```
//! use std::time::Duration;
//!
//! use miny::{
//!     BarcodeOptions, CancellationToken, ColorSample, NoOpObserver, RunContext,
//!     SyntheticSource, generate,
//! };
//!
//! let source = SyntheticSource::new(Duration::from_secs(10), |t| {
//!     ColorSample::new((t.as_secs() * 25) as u8, 0, 0)
//! });
//! let options = BarcodeOptions::linear().with_frame_count(5);
//! let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);
//!
//! let barcode = generate(source, &options, &mut ctx)?;
//! assert_eq!(barcode.colors[2], ColorSample::new(100, 0, 0));
//! # Ok::<(), miny::MinyError>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. **Probe**: [`VideoFile::open`] resolves [`SourceMetadata`].
//! 2. **Schedule**: [`SampleSchedule`] fixes the timestamps up front.
//! 3. **Sample**: each timestamp is sought, decoded and scaled to a
//!    [`ThumbnailSize`].
//! 4. **Reduce**: [`average_color`] collapses the thumbnail to one
//!    [`ColorSample`].
//! 5. **Paint**: the [`Layout`] fills that sample's region of the
//!    [`Raster`] immediately.
//!
//! Progress and lifecycle updates go to a [`RunObserver`]; a [`Session`]
//! cancels its previous run whenever a new one starts.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | `RunStream` delivers run events to async code via Tokio |
//! | `rayon` | Batches are decoded concurrently on rayon threads |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod color;
pub mod configuration;
mod conversion;
pub mod error;
pub mod ffmpeg;
pub mod layout;
pub mod metadata;
#[cfg(feature = "rayon")]
mod parallel;
pub mod progress;
pub mod raster;
pub mod run;
mod sampler;
pub mod schedule;
pub mod source;
#[cfg(feature = "async")]
pub mod stream;
pub mod synthetic;
pub mod video;

pub use color::{ColorSample, average_color, average_rgba};
pub use configuration::BarcodeOptions;
pub use error::MinyError;
pub use ffmpeg::{FfmpegLogLevel, ffmpeg_log_level, set_ffmpeg_log_level};
pub use layout::{
    HexGridLayout, HexRingLayout, Layout, LayoutKind, LinearLayout, Point, RING_SPACING,
    RingWalk, hexagon_vertices,
};
pub use metadata::SourceMetadata;
pub use progress::{CancellationToken, NoOpObserver, ProgressInfo, RunObserver};
pub use raster::{DEFAULT_BACKGROUND, Raster};
pub use run::{Barcode, RunContext, RunState, Session, generate};
pub use schedule::{SampleSchedule, ScheduleMode};
pub use source::{FrameSource, ThumbnailSize};
#[cfg(feature = "async")]
pub use stream::{RunEvent, RunStream};
pub use synthetic::SyntheticSource;
pub use video::VideoFile;
