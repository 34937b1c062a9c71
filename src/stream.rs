//! Async run events.
//!
//! [`RunStream`] drives a run on a `tokio::task::spawn_blocking` thread and
//! forwards everything a [`RunObserver`] would hear as [`RunEvent`]s through
//! a bounded channel. Dropping the stream tears the run's session down, so
//! the worker stops at its next checkpoint.
//!
//! # Example
//!
//! ```no_run
//! use tokio_stream::StreamExt;
//!
//! use miny::{BarcodeOptions, RunEvent, RunStream};
//!
//! # async fn example() {
//! let mut stream = RunStream::open("input.mp4", BarcodeOptions::hexagonal());
//!
//! while let Some(event) = stream.next().await {
//!     match event {
//!         RunEvent::Progress { info, .. } => println!("{:.0}%", info.percentage),
//!         RunEvent::Finished(barcode) => barcode.raster.save("miny.png").unwrap(),
//!         RunEvent::Error(message) => eprintln!("{message}"),
//!         RunEvent::Processing(_) => {}
//!     }
//! }
//! # }
//! ```

use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tokio_stream::Stream;

use crate::color::ColorSample;
use crate::configuration::BarcodeOptions;
use crate::progress::{ProgressInfo, RunObserver};
use crate::run::{Barcode, Session};
use crate::source::FrameSource;
use crate::video::VideoFile;

/// Bounded-channel capacity for [`RunStream`].
const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// One observable update from a streamed run.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// Lifecycle signal: `true` when sampling starts, `false` once it stops.
    Processing(bool),
    /// A sample or batch completed.
    Progress {
        /// All colours so far, in schedule order.
        colors: Vec<ColorSample>,
        /// Progress snapshot.
        info: ProgressInfo,
    },
    /// The run failed; sent at most once.
    Error(String),
    /// The run completed. Always the last event of a successful run.
    Finished(Barcode),
}

/// A stream of [`RunEvent`]s produced by a background run.
///
/// Implements [`tokio_stream::Stream`]. A cancelled run ends the stream
/// without an `Error` event.
pub struct RunStream {
    receiver: Receiver<RunEvent>,
    session: Arc<Session>,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

impl Stream for RunStream {
    type Item = RunEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for RunStream {
    fn drop(&mut self) {
        self.session.teardown();
    }
}

impl RunStream {
    /// Run over an already opened source.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(source: S, options: BarcodeOptions) -> Self
    where
        S: FrameSource + Send + 'static,
    {
        Self::spawn_with(options, move || Ok(source))
    }

    /// Open `path` on the worker thread and run over it.
    ///
    /// Open failures arrive as an [`RunEvent::Error`] with the usual
    /// normalised message.
    pub fn open<P: Into<PathBuf>>(path: P, options: BarcodeOptions) -> Self {
        let path = path.into();
        Self::spawn_with(options, move || VideoFile::open(path))
    }

    /// The session driving this stream's run.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn spawn_with<S, F>(options: BarcodeOptions, open: F) -> Self
    where
        S: FrameSource,
        F: FnOnce() -> Result<S, crate::error::MinyError> + Send + 'static,
    {
        let (sender, receiver) = tokio::sync::mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let session = Arc::new(Session::new());
        let worker_session = Arc::clone(&session);

        let handle = tokio::task::spawn_blocking(move || {
            let observer = ChannelObserver { sender };
            match open() {
                Ok(source) => {
                    if let Some(barcode) = worker_session.run(source, &options, &observer) {
                        observer.send(RunEvent::Finished(barcode));
                    }
                }
                Err(error) => {
                    log::error!("Error opening video: {error}");
                    observer.send(RunEvent::Processing(true));
                    observer.send(RunEvent::Error(error.user_message()));
                    observer.send(RunEvent::Processing(false));
                }
            }
        });

        RunStream {
            receiver,
            session,
            handle,
        }
    }
}

struct ChannelObserver {
    sender: Sender<RunEvent>,
}

impl ChannelObserver {
    fn send(&self, event: RunEvent) {
        // The receiver may have been dropped.
        let _ = self.sender.blocking_send(event);
    }
}

impl RunObserver for ChannelObserver {
    fn on_progress(&self, colors: &[ColorSample], info: &ProgressInfo) {
        self.send(RunEvent::Progress {
            colors: colors.to_vec(),
            info: info.clone(),
        });
    }

    fn on_error(&self, message: &str) {
        self.send(RunEvent::Error(message.to_string()));
    }

    fn on_processing_change(&self, processing: bool) {
        self.send(RunEvent::Processing(processing));
    }
}
