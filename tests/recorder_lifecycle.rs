//! Recorder lifecycle against a real filesystem, read back with the log
//! reader to close the loop.

use anyhow::{Context, Result, ensure};
use trackside::telemetry::{ChannelTable, LogReader};
use trackside::{
    RecorderState, SegmentId, TelemetryRecorder, TickSample, Track, TrackBuilder, TrackPosition,
    TracksideError, VehicleState,
};

fn oval() -> Track {
    TrackBuilder::new()
        .width(10.0)
        .friction(0.9)
        .straight(250.0)
        .left_curve(55.0, std::f64::consts::PI)
        .straight(250.0)
        .left_curve(55.0, std::f64::consts::PI)
        .build("test-oval")
        .expect("closed ring")
}

fn sample(track: &Track, laps_done: u32, remaining_laps: u32, lap_time: f64) -> TickSample {
    let position = TrackPosition::new(SegmentId::new(0), 30.0, 0.1);
    let vehicle = VehicleState {
        speed: 40.0,
        laps_done,
        remaining_laps,
        lap_time,
        ..VehicleState::default()
    };
    let readings = vec![25.0; 19];
    TickSample::compute(track, &position, vehicle, &readings)
}

#[test]
fn records_exactly_the_gated_ticks() -> Result<()> {
    let dir = tempfile::tempdir().context("creating temp dir")?;
    let track = oval();
    let mut recorder = TelemetryRecorder::new(dir.path(), "night-ring");

    // Warmup lap, two racing laps, then the finish crossing.
    recorder.observe(&sample(&track, 0, 3, 10.0))?;
    assert_eq!(recorder.state(), RecorderState::Recording);
    recorder.observe(&sample(&track, 1, 2, 20.0))?;
    recorder.observe(&sample(&track, 2, 1, 30.0))?;
    recorder.observe(&sample(&track, 3, 0, 40.0))?;
    assert_eq!(recorder.state(), RecorderState::Shutdown);

    // Post-race ticks are ignored without reopening the stream.
    recorder.observe(&sample(&track, 3, 0, 50.0))?;
    assert_eq!(recorder.records_written(), 2);

    let path = recorder.output_path().context("stream was opened")?.to_path_buf();
    assert!(path.ends_with("night-ring.trackside.csv"));

    let mut reader = LogReader::open(&path)?;
    let expected: Vec<String> =
        ChannelTable::standard(19).labels().map(str::to_string).collect();
    assert_eq!(reader.labels(), expected.as_slice());

    let lap = reader.index_of("Lap").context("Lap channel present")?;
    let mut rows = Vec::new();
    while let Some(record) = reader.next_record()? {
        rows.push((record.time, record.values[lap]));
    }
    assert_eq!(rows, vec![(20.0, 1.0), (30.0, 2.0)]);
    Ok(())
}

#[test]
fn finish_mid_race_returns_the_log_path() -> Result<()> {
    let dir = tempfile::tempdir().context("creating temp dir")?;
    let track = oval();
    let mut recorder = TelemetryRecorder::new(dir.path(), "aborted-run");

    recorder.observe(&sample(&track, 1, 5, 12.0))?;
    let path = recorder.finish()?.context("first finish closes the stream")?;
    ensure!(path.exists(), "log should be flushed to disk at {}", path.display());

    // Idempotent: the second call has nothing left to close.
    assert_eq!(recorder.finish()?, None);
    assert_eq!(recorder.state(), RecorderState::Shutdown);

    let mut reader = LogReader::open(&path)?;
    let mut count = 0;
    while reader.next_record()?.is_some() {
        count += 1;
    }
    assert_eq!(count, 1);
    Ok(())
}

#[test]
fn race_over_before_any_gated_tick_leaves_a_bare_header() -> Result<()> {
    let dir = tempfile::tempdir().context("creating temp dir")?;
    let track = oval();
    let mut recorder = TelemetryRecorder::new(dir.path(), "formation-only");

    // Single tick with nothing left to race: open, gate fails, close.
    recorder.observe(&sample(&track, 0, 0, 5.0))?;
    assert_eq!(recorder.state(), RecorderState::Shutdown);
    assert_eq!(recorder.records_written(), 0);

    let path = recorder.output_path().context("stream was opened")?;
    let mut reader = LogReader::open(path)?;
    assert_eq!(reader.labels().len(), 23 + 19 + 16 + 16);
    assert!(reader.next_record()?.is_none());
    Ok(())
}

#[test]
fn unopenable_output_dir_poisons_the_recorder() -> Result<()> {
    let dir = tempfile::tempdir().context("creating temp dir")?;
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory")?;

    let track = oval();
    let mut recorder = TelemetryRecorder::new(blocker.join("logs"), "doomed");

    let err = recorder
        .observe(&sample(&track, 1, 2, 10.0))
        .expect_err("opening under a file must fail");
    assert!(matches!(err, TracksideError::Stream { .. }));
    assert!(err.is_fatal());
    assert_eq!(recorder.state(), RecorderState::Shutdown);

    // Poisoned for good: later ticks and finish stay quiet.
    recorder.observe(&sample(&track, 2, 1, 20.0))?;
    assert_eq!(recorder.finish()?, None);
    assert_eq!(recorder.output_path(), None);
    Ok(())
}
