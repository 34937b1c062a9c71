//! Runs and the run boundary.
//!
//! A run is one pass of probe, schedule, sample, reduce and paint over a
//! single source. [`generate`] is the bare pipeline: it returns every
//! failure, including [`MinyError::Cancelled`], as an `Err`. [`Session`]
//! wraps it the way a UI consumer needs:
//!
//! - starting a run cancels whatever run the session was driving before
//!   (a single-slot token, so at most one run per session is live);
//! - the observer hears `on_processing_change(true)` first and
//!   `on_processing_change(false)` last;
//! - genuine failures are reported once through `on_error` with a
//!   normalised message, cancellation is swallowed silently;
//! - after [`Session::teardown`] nothing is reported at all.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use crate::color::ColorSample;
use crate::configuration::BarcodeOptions;
use crate::error::MinyError;
use crate::progress::{CancellationToken, ProgressInfo, RunObserver};
use crate::raster::Raster;
use crate::sampler::FrameSampler;
use crate::schedule::SampleSchedule;
use crate::source::FrameSource;

/// Per-run observable state.
///
/// Created fresh at run start and discarded when the run ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunState {
    /// Percentage complete, `0.0 ..= 100.0`; never decreases within a run.
    pub progress: f64,
    /// Remaining-time estimate in seconds, once one can be made.
    pub estimated_seconds_remaining: Option<f64>,
    /// Set when the run stopped because it was superseded or torn down.
    pub cancelled: bool,
    /// Terminal failure message, if the run failed.
    pub error: Option<String>,
}

/// Everything a sampling step needs to know about the run it belongs to.
///
/// Passed explicitly into the pipeline instead of living in captured state.
pub struct RunContext<'a> {
    token: CancellationToken,
    mounted: Arc<AtomicBool>,
    observer: &'a dyn RunObserver,
    state: RunState,
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("cancelled", &self.token.is_cancelled())
            .field("mounted", &self.is_mounted())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> RunContext<'a> {
    /// A standalone context, always mounted, cancelled through `token`.
    pub fn new(token: CancellationToken, observer: &'a dyn RunObserver) -> Self {
        Self::with_mount_flag(token, Arc::new(AtomicBool::new(true)), observer)
    }

    fn with_mount_flag(
        token: CancellationToken,
        mounted: Arc<AtomicBool>,
        observer: &'a dyn RunObserver,
    ) -> Self {
        Self {
            token,
            mounted,
            observer,
            state: RunState::default(),
        }
    }

    /// This run's cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// State as of the last update.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Whether the consumer is still listening.
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once the token has been cancelled.
    pub(crate) fn checkpoint(&self) -> Result<(), MinyError> {
        if self.token.is_cancelled() {
            Err(MinyError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub(crate) fn report_progress(&mut self, colors: &[ColorSample], info: &ProgressInfo) {
        if !self.is_mounted() {
            return;
        }
        self.state.progress = self.state.progress.max(info.percentage);
        self.state.estimated_seconds_remaining = info.estimated_seconds_remaining();
        self.observer.on_progress(colors, info);
    }

    pub(crate) fn set_processing(&self, processing: bool) {
        if self.is_mounted() {
            self.observer.on_processing_change(processing);
        }
    }

    pub(crate) fn fail(&mut self, error: &MinyError) {
        if !self.is_mounted() {
            return;
        }
        // At most one error per run.
        if self.state.error.is_some() {
            return;
        }
        let message = error.user_message();
        self.observer.on_error(&message);
        self.state.error = Some(message);
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.state.cancelled = true;
    }
}

/// The output of a successful run.
#[derive(Debug, Clone)]
pub struct Barcode {
    /// One colour per scheduled sample, in schedule order.
    pub colors: Vec<ColorSample>,
    /// The painted surface.
    pub raster: Raster,
}

impl Barcode {
    /// Colours as `rgb(r, g, b)` strings.
    pub fn color_strings(&self) -> Vec<String> {
        self.colors.iter().map(ToString::to_string).collect()
    }
}

/// Run the full pipeline over `source`.
///
/// Options are validated and the raster allocated before the source is
/// touched, so an unusable configuration or environment fails without any
/// sampling. The raster is cleared to the background colour and painted one
/// region per completed sample.
///
/// # Errors
///
/// - [`MinyError::InvalidOptions`] / [`MinyError::UnsupportedEnvironment`]
///   before any sampling.
/// - [`MinyError::Metadata`] if the source duration is zero or unresolved.
/// - [`MinyError::Decode`] (or another source error) if a read fails.
/// - [`MinyError::Cancelled`] if `ctx`'s token is cancelled.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use miny::{
///     BarcodeOptions, CancellationToken, ColorSample, NoOpObserver, RunContext,
///     SyntheticSource, generate,
/// };
///
/// let source = SyntheticSource::new(Duration::from_secs(10), |_| ColorSample::new(0, 64, 0));
/// let options = BarcodeOptions::linear().with_frame_count(5);
/// let mut ctx = RunContext::new(CancellationToken::new(), &NoOpObserver);
///
/// let barcode = generate(source, &options, &mut ctx)?;
/// assert_eq!(barcode.colors.len(), 5);
/// assert_eq!(ctx.state().progress, 100.0);
/// # Ok::<(), miny::MinyError>(())
/// ```
pub fn generate<S: FrameSource>(
    mut source: S,
    options: &BarcodeOptions,
    ctx: &mut RunContext<'_>,
) -> Result<Barcode, MinyError> {
    options.validate()?;
    let (width, height) = options.raster_size();
    let mut raster = Raster::new(width, height, options.background())?;

    ctx.checkpoint()?;
    let metadata = source.metadata().clone();
    let duration = metadata.resolved_duration(source.name())?;
    let schedule = SampleSchedule::for_mode(
        options.schedule_mode(),
        &metadata,
        duration,
        options.frame_count(),
    )?;
    let layout = options.build_layout(schedule.len());

    log::info!(
        "Generating {:?} barcode from {}: {} samples over {duration:.2}s",
        options.layout(),
        source.name(),
        schedule.len()
    );

    let colors = FrameSampler::new(&schedule, options.thumbnail(), options.batch_size()).run(
        &mut source,
        layout.as_ref(),
        &mut raster,
        ctx,
    )?;

    log::info!("Finished barcode from {} ({} colours)", source.name(), colors.len());
    Ok(Barcode { colors, raster })
}

/// Owner of the single live run for one logical source.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use miny::{BarcodeOptions, ColorSample, NoOpObserver, Session, SyntheticSource};
///
/// let session = Session::new();
/// let source = SyntheticSource::new(Duration::from_secs(3), |_| ColorSample::new(1, 2, 3));
/// let barcode = session
///     .run(source, &BarcodeOptions::hexagonal().with_frame_count(7), &NoOpObserver)
///     .unwrap();
/// assert_eq!(barcode.colors, vec![ColorSample::new(1, 2, 3); 7]);
/// assert!(session.current_token().is_none());
/// ```
#[derive(Debug)]
pub struct Session {
    current: Mutex<Option<CancellationToken>>,
    mounted: Arc<AtomicBool>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A mounted session with no run in flight.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Begin a new run: cancel the previous run's token and install a fresh
    /// one in its place.
    pub fn start(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(token.clone()) {
            log::debug!("Superseding the previous run");
            previous.cancel();
        }
        token
    }

    /// Start a run and return its context.
    pub fn context<'a>(&self, observer: &'a dyn RunObserver) -> RunContext<'a> {
        RunContext::with_mount_flag(self.start(), Arc::clone(&self.mounted), observer)
    }

    /// The consumer is going away: stop reporting and cancel the live run.
    pub fn teardown(&self) {
        self.mounted.store(false, Ordering::Release);
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.take() {
            token.cancel();
        }
    }

    /// `false` after [`teardown`](Session::teardown).
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Token of the run currently in flight, if any.
    pub fn current_token(&self) -> Option<CancellationToken> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the slot if it still holds `token`; a newer run's token is left
    /// alone.
    fn release(&self, token: &CancellationToken) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|held| held.same_as(token)) {
            *current = None;
        }
    }

    /// Run the pipeline at the run boundary.
    ///
    /// Returns the barcode on success and `None` on failure or cancellation.
    /// Failures reach `observer` as one normalised message; cancellation
    /// reaches it only as the closing `on_processing_change(false)`.
    pub fn run<S: FrameSource>(
        &self,
        source: S,
        options: &BarcodeOptions,
        observer: &dyn RunObserver,
    ) -> Option<Barcode> {
        let mut ctx = self.context(observer);
        let token = ctx.token().clone();
        ctx.set_processing(true);

        let outcome = match generate(source, options, &mut ctx) {
            Ok(barcode) => Some(barcode),
            Err(error) if error.is_cancellation() => {
                log::debug!("Run cancelled");
                ctx.mark_cancelled();
                None
            }
            Err(error) => {
                log::error!("Error processing video: {error}");
                ctx.fail(&error);
                None
            }
        };

        ctx.set_processing(false);
        self.release(&token);
        outcome
    }
}
