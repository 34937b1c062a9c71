//! FFmpeg console verbosity.
//!
//! FFmpeg writes its own diagnostics to stderr independently of the
//! [`log`](https://crates.io/crates/log) facade used by this crate. Decoding
//! hundreds of seeks for one barcode can make that output very noisy, so
//! the level is exposed here without requiring a direct `ffmpeg-next`
//! dependency.
//!
//! ```no_run
//! use miny::FfmpegLogLevel;
//!
//! miny::set_ffmpeg_log_level(FfmpegLogLevel::Error);
//! ```

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// No output at all.
    Quiet,
    /// Unrecoverable errors only.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl FfmpegLogLevel {
    /// Parse a user-supplied level name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" | "off" => Some(FfmpegLogLevel::Quiet),
            "fatal" => Some(FfmpegLogLevel::Fatal),
            "error" => Some(FfmpegLogLevel::Error),
            "warning" | "warn" => Some(FfmpegLogLevel::Warning),
            "info" => Some(FfmpegLogLevel::Info),
            "debug" => Some(FfmpegLogLevel::Debug),
            _ => None,
        }
    }

    fn into_ffmpeg(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }

    fn from_ffmpeg(level: Level) -> Option<Self> {
        match level {
            Level::Quiet => Some(FfmpegLogLevel::Quiet),
            Level::Panic | Level::Fatal => Some(FfmpegLogLevel::Fatal),
            Level::Error => Some(FfmpegLogLevel::Error),
            Level::Warning => Some(FfmpegLogLevel::Warning),
            Level::Info | Level::Verbose => Some(FfmpegLogLevel::Info),
            Level::Debug | Level::Trace => Some(FfmpegLogLevel::Debug),
        }
    }
}

/// Set FFmpeg's console verbosity. Does not affect `log` output.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.into_ffmpeg());
}

/// Current FFmpeg console verbosity, if it maps to a known level.
pub fn ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .and_then(FfmpegLogLevel::from_ffmpeg)
}
