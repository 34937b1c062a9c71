//! Cancellation, supersession and teardown tests.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use miny::{
    BarcodeOptions, CancellationToken, ColorSample, MinyError, ProgressInfo, RunContext,
    RunObserver, Session, SyntheticSource, generate,
};

fn grey(_: Duration) -> ColorSample {
    ColorSample::new(90, 90, 90)
}

fn options(frame_count: usize) -> BarcodeOptions {
    BarcodeOptions::linear().with_frame_count(frame_count)
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl RunObserver for Recorder {
    fn on_progress(&self, _colors: &[ColorSample], info: &ProgressInfo) {
        self.events
            .lock()
            .unwrap()
            .push(format!("progress {}", info.percentage));
    }

    fn on_error(&self, message: &str) {
        self.events.lock().unwrap().push(format!("error {message}"));
    }

    fn on_processing_change(&self, processing: bool) {
        self.events
            .lock()
            .unwrap()
            .push(format!("processing {processing}"));
    }
}

// ── Token ──────────────────────────────────────────────────────────

#[test]
fn cancellation_token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
    assert!(clone.same_as(&token));
    assert!(!CancellationToken::default().same_as(&token));
}

// ── Cooperative checks ─────────────────────────────────────────────

#[test]
fn cancel_mid_run_stops_before_the_next_sample() {
    let token = CancellationToken::new();
    let hook_token = token.clone();
    let mut source = SyntheticSource::new(Duration::from_secs(10), grey).on_read(move |read| {
        if read == 2 {
            hook_token.cancel();
        }
    });
    let recorder = Recorder::default();
    let mut ctx = RunContext::new(token, &recorder);

    let result = generate(&mut source, &options(10), &mut ctx);

    assert!(matches!(result, Err(MinyError::Cancelled)));
    // The in-flight read completes; nothing after it is requested.
    assert_eq!(source.requested().len(), 3);
    assert_eq!(recorder.events(), vec!["progress 10", "progress 20"]);
    assert_eq!(ctx.state().progress, 20.0);
}

#[test]
fn cancelled_run_never_reports_completion_or_error() {
    let session = Arc::new(Session::new());
    let hook_session = Arc::clone(&session);
    let source = SyntheticSource::new(Duration::from_secs(5), grey).on_read(move |read| {
        if read == 3 {
            hook_session.current_token().unwrap().cancel();
        }
    });
    let recorder = Recorder::default();

    let barcode = session.run(source, &options(5), &recorder);

    assert!(barcode.is_none());
    let events = recorder.events();
    assert_eq!(events.first().map(String::as_str), Some("processing true"));
    assert_eq!(events.last().map(String::as_str), Some("processing false"));
    assert!(!events.iter().any(|event| event.starts_with("error")));
    assert!(!events.contains(&"progress 100".to_string()));
    assert!(session.current_token().is_none());
}

// ── Supersession ───────────────────────────────────────────────────

#[test]
fn new_run_supersedes_the_old_one() {
    let session = Arc::new(Session::new());
    let hook_session = Arc::clone(&session);
    let replacement = Arc::new(Mutex::new(None));
    let hook_replacement = Arc::clone(&replacement);

    let source = SyntheticSource::new(Duration::from_secs(4), grey).on_read(move |read| {
        if read == 1 {
            *hook_replacement.lock().unwrap() = Some(hook_session.start());
        }
    });
    let recorder = Recorder::default();

    assert!(session.run(source, &options(4), &recorder).is_none());

    // The slot still belongs to the newer run.
    let newer = replacement.lock().unwrap().clone().unwrap();
    assert!(!newer.is_cancelled());
    assert!(session.current_token().unwrap().same_as(&newer));
    assert!(!recorder.events().iter().any(|event| event.starts_with("error")));
}

#[test]
fn concurrent_runs_on_one_session() {
    let session = Session::new();
    let (reached_tx, reached_rx) = mpsc::channel();
    let (go_tx, go_rx) = mpsc::channel::<()>();
    let go_rx = Mutex::new(go_rx);

    let first_source = SyntheticSource::new(Duration::from_secs(6), grey).on_read(move |read| {
        if read == 1 {
            reached_tx.send(()).unwrap();
            go_rx.lock().unwrap().recv().unwrap();
        }
    });
    let second_source = SyntheticSource::new(Duration::from_secs(6), grey).on_read(move |read| {
        if read == 0 {
            let _ = go_tx.send(());
        }
    });

    let first = Recorder::default();
    let second = Recorder::default();

    let (first_result, second_result) = thread::scope(|scope| {
        let first_run = scope.spawn(|| session.run(first_source, &options(6), &first));
        reached_rx.recv().unwrap();
        let second_result = session.run(second_source, &options(6), &second);
        (first_run.join().unwrap(), second_result)
    });

    assert!(first_result.is_none());
    assert_eq!(second_result.unwrap().colors.len(), 6);
    assert!(!first.events().iter().any(|event| event.starts_with("error")));
    assert!(second.events().contains(&"progress 100".to_string()));
    assert!(session.current_token().is_none());
}

// ── Teardown ───────────────────────────────────────────────────────

#[test]
fn teardown_silences_every_update() {
    let session = Arc::new(Session::new());
    let hook_session = Arc::clone(&session);
    let source = SyntheticSource::new(Duration::from_secs(10), grey).on_read(move |read| {
        if read == 2 {
            hook_session.teardown();
        }
    });
    let recorder = Recorder::default();

    assert!(session.run(source, &options(10), &recorder).is_none());

    assert!(!session.is_mounted());
    assert_eq!(
        recorder.events(),
        vec!["processing true", "progress 10", "progress 20"]
    );
}
