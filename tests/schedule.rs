//! Sample schedule tests.

use std::time::Duration;

use miny::{MinyError, SampleSchedule, SourceMetadata};

// ── Uniform ────────────────────────────────────────────────────────

#[test]
fn uniform_schedule_has_exact_length_and_bounds() {
    for (duration, count) in [(10.0, 5), (1.0, 91), (0.25, 300), (3_600.0, 200), (7.3, 1)] {
        let schedule = SampleSchedule::uniform(duration, count).unwrap();
        assert_eq!(schedule.len(), count);
        assert_eq!(schedule.get(0), Some(Duration::ZERO));

        let limit = Duration::from_secs_f64(duration);
        for pair in schedule.timestamps().windows(2) {
            assert!(pair[0] <= pair[1], "schedule must be non-decreasing");
        }
        assert!(schedule.iter().all(|timestamp| timestamp < limit));
    }
}

#[test]
fn ten_second_source_five_samples() {
    let schedule = SampleSchedule::uniform(10.0, 5).unwrap();
    let expected: Vec<Duration> = (0..5).map(|i| Duration::from_secs(i * 2)).collect();
    assert_eq!(schedule.timestamps(), expected.as_slice());
    assert_eq!(schedule.duration(), Duration::from_secs(10));
}

#[test]
fn zero_duration_is_a_metadata_error() {
    let result = SampleSchedule::uniform(0.0, 10);
    assert!(matches!(result, Err(MinyError::Metadata { .. })));

    let result = SampleSchedule::uniform(f64::NAN, 10);
    assert!(matches!(result, Err(MinyError::Metadata { .. })));
}

#[test]
fn sub_nanosecond_spacing_is_a_metadata_error() {
    let result = SampleSchedule::uniform(1e-10, 4);
    assert!(matches!(result, Err(MinyError::Metadata { .. })));

    let result = SampleSchedule::uniform(1e-7, 300);
    assert!(matches!(result, Err(MinyError::Metadata { .. })));
}

#[test]
fn tiny_durations_stay_strictly_below_the_end() {
    let schedule = SampleSchedule::uniform(1e-7, 100).unwrap();
    assert_eq!(schedule.duration(), Duration::from_nanos(100));
    assert_eq!(schedule.get(99), Some(Duration::from_nanos(99)));
    assert!(schedule.iter().all(|timestamp| timestamp < schedule.duration()));
}

#[test]
fn zero_frame_count_is_rejected() {
    let result = SampleSchedule::uniform(10.0, 0);
    assert!(matches!(result, Err(MinyError::InvalidOptions(_))));
}

// ── Batches ────────────────────────────────────────────────────────

#[test]
fn batches_cover_schedule_in_order() {
    let schedule = SampleSchedule::uniform(12.0, 12).unwrap();
    let batches: Vec<(usize, usize)> = schedule
        .batches(5)
        .map(|(start, timestamps)| (start, timestamps.len()))
        .collect();
    assert_eq!(batches, vec![(0, 5), (5, 5), (10, 2)]);

    let flattened: Vec<Duration> = schedule
        .batches(5)
        .flat_map(|(_, timestamps)| timestamps.iter().copied())
        .collect();
    assert_eq!(flattened, schedule.timestamps());
}

#[test]
fn zero_batch_size_means_one() {
    let schedule = SampleSchedule::uniform(3.0, 3).unwrap();
    assert_eq!(schedule.batches(0).count(), 3);
}

// ── Frame-indexed ──────────────────────────────────────────────────

#[test]
fn frame_indexed_caps_at_frame_count() {
    // 2 seconds at 30 fps is 60 frames; asking for 300 gives 60.
    let metadata = SourceMetadata::from_duration(Duration::from_secs(2), 30.0);
    let schedule = SampleSchedule::frame_indexed(&metadata, 300).unwrap();
    assert_eq!(schedule.len(), 60);

    let expected: Vec<Duration> = (0..60)
        .map(|frame| Duration::from_secs_f64(frame as f64 / 30.0))
        .collect();
    assert_eq!(schedule.timestamps(), expected.as_slice());
}

#[test]
fn frame_indexed_snaps_to_whole_frames() {
    // 10 s at 30 fps, 4 samples: frames 0, 75, 150, 225.
    let metadata = SourceMetadata::from_duration(Duration::from_secs(10), 30.0);
    let schedule = SampleSchedule::frame_indexed(&metadata, 4).unwrap();
    let frames: Vec<u64> = schedule
        .iter()
        .map(|timestamp| (timestamp.as_secs_f64() * 30.0).round() as u64)
        .collect();
    assert_eq!(frames, vec![0, 75, 150, 225]);
}

#[test]
fn frame_indexed_without_frame_rate_falls_back_to_uniform() {
    let metadata = SourceMetadata::from_duration(Duration::from_secs(10), 0.0);
    let schedule = SampleSchedule::frame_indexed(&metadata, 5).unwrap();
    assert_eq!(schedule, SampleSchedule::uniform(10.0, 5).unwrap());
}
