//! Telemetry recording lifecycle
//!
//! The recorder is created idle and binds lazily: the first observed tick
//! builds the channel table from the snapshot, opens the output stream and
//! writes the header. From then on it appends one row per tick while the
//! lap gate holds, and shuts down for good when the race configuration
//! reports no remaining laps. A recorder is single-use; the next race gets
//! a new one.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};

use crate::error::{Result, TracksideError};

use super::{ChannelTable, TickSample};

/// File suffix of recorded telemetry logs.
pub const LOG_SUFFIX: &str = "trackside.csv";

/// Lifecycle phase of a [`TelemetryRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No tick observed yet; nothing on disk.
    Uninitialized,
    /// Stream open, channel table bound.
    Recording,
    /// Stream closed; further ticks are ignored. Terminal.
    Shutdown,
}

/// Stateful, single-use telemetry stream writer.
pub struct TelemetryRecorder {
    output_dir: PathBuf,
    track_id: String,
    state: RecorderState,
    table: Option<ChannelTable>,
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    records_written: u64,
}

impl TelemetryRecorder {
    /// Creates an idle recorder. No file is touched until the first tick.
    pub fn new(output_dir: impl Into<PathBuf>, track_id: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            track_id: track_id.into(),
            state: RecorderState::Uninitialized,
            table: None,
            writer: None,
            path: None,
            records_written: 0,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Rows appended so far.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Path of the output stream once it has been opened.
    pub fn output_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Feeds one tick snapshot through the lifecycle.
    ///
    /// The first call binds the channel table and opens the stream; a
    /// failure there is fatal and poisons the recorder. Rows are appended
    /// only while the lap gate holds (at least one lap completed and laps
    /// remaining); when the remaining-lap count reaches zero the stream is
    /// closed and every later call is a no-op.
    pub fn observe(&mut self, sample: &TickSample) -> Result<()> {
        if self.state == RecorderState::Shutdown {
            trace!("tick after shutdown ignored");
            return Ok(());
        }
        if self.state == RecorderState::Uninitialized {
            self.open_stream(sample.sensors.len())?;
        }

        if sample.vehicle.laps_done > 0 && sample.vehicle.remaining_laps > 0 {
            self.append(sample);
        }
        if sample.vehicle.remaining_laps == 0 {
            self.close()?;
            info!(laps = sample.vehicle.laps_done, "recording finished");
        }
        Ok(())
    }

    /// Closes the stream if it is open.
    ///
    /// Safe to call at any point and idempotent; returns the log path when
    /// this call performed the close. Used by the race-end and shutdown
    /// hooks for runs that end without exhausting the lap counter.
    pub fn finish(&mut self) -> Result<Option<PathBuf>> {
        match self.state {
            RecorderState::Shutdown => Ok(None),
            RecorderState::Uninitialized => {
                self.state = RecorderState::Shutdown;
                Ok(None)
            }
            RecorderState::Recording => {
                self.close()?;
                Ok(self.path.clone())
            }
        }
    }

    fn open_stream(&mut self, sensor_count: usize) -> Result<()> {
        let table = ChannelTable::standard(sensor_count);
        let path = self.output_dir.join(format!("{}.{LOG_SUFFIX}", self.track_id));

        let open_result = fs::create_dir_all(&self.output_dir)
            .and_then(|_| File::create(&path));
        let file = match open_result {
            Ok(file) => file,
            Err(source) => {
                // No degraded mode: a recorder that cannot open its stream
                // never records.
                self.state = RecorderState::Shutdown;
                return Err(TracksideError::stream_error(path, source));
            }
        };

        let mut writer = BufWriter::new(file);
        let mut header = String::from("Time");
        for label in table.labels() {
            header.push(',');
            header.push_str(label);
        }
        if let Err(source) = writeln!(writer, "{header}") {
            self.state = RecorderState::Shutdown;
            return Err(TracksideError::stream_error(path, source));
        }

        info!(path = %path.display(), channels = table.len(), "telemetry recording started");
        self.table = Some(table);
        self.writer = Some(writer);
        self.path = Some(path);
        self.state = RecorderState::Recording;
        Ok(())
    }

    fn append(&mut self, sample: &TickSample) {
        let (Some(table), Some(writer)) = (self.table.as_ref(), self.writer.as_mut()) else {
            return;
        };
        let row = table.extract_row(sample);
        let mut line = format_value(sample.vehicle.lap_time);
        for value in row {
            line.push(',');
            line.push_str(&format_value(value));
        }
        // Best effort: a dropped row is better than stalling the tick loop.
        match writeln!(writer, "{line}") {
            Ok(()) => {
                self.records_written += 1;
                trace!(records = self.records_written, "telemetry row appended");
            }
            Err(error) => warn!(%error, "telemetry write failed, row dropped"),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.state = RecorderState::Shutdown;
        self.table = None;
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        if let Err(source) = writer.flush() {
            let path = self.path.clone().unwrap_or_default();
            return Err(TracksideError::stream_error(path, source));
        }
        debug!(records = self.records_written, "telemetry stream closed");
        Ok(())
    }
}

fn format_value(value: f64) -> String {
    // Shortest round-trip formatting; the reader re-parses exactly.
    format!("{value}")
}

/// Track identifier from a host-provided path: the basename up to the first
/// extension separator.
///
/// A basename that starts with a dot is kept whole, and a path without a
/// usable basename falls back to `"track"`.
pub fn track_id_from_path(path: &Path) -> String {
    let base = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if base.is_empty() {
        return "track".to_string();
    }
    match base.find('.') {
        None | Some(0) => base.to_string(),
        Some(i) => base[..i].to_string(),
    }
}
