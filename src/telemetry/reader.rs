//! Trackside log reader for telemetry replay
//!
//! Parses the CSV streams written by [`TelemetryRecorder`](super::TelemetryRecorder)
//! back into records, so recorded runs can be replayed through the same
//! consumer surface as a live session.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use trackside::telemetry::LogReader;
//!
//! fn read_records() -> trackside::Result<()> {
//!     let mut reader = LogReader::open("street-1.trackside.csv")?;
//!     let speed = reader.index_of("Speed");
//!
//!     while let Some(record) = reader.next_record()? {
//!         if let Some(idx) = speed {
//!             println!("t={:.3} speed={:.1}", record.time, record.values[idx]);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Malformed rows are skipped with a warning rather than aborting the read:
//! a log cut short by a crashed host still yields every complete record.

use crate::{Result, TracksideError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

/// One recorded tick: the lap-relative timestamp plus the channel values in
/// header order.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Seconds into the lap at which the row was recorded.
    pub time: f64,
    /// Channel values, positionally matching [`LogReader::labels`].
    pub values: Vec<f64>,
}

impl LogRecord {
    /// Value at a channel index, typically obtained from
    /// [`LogReader::index_of`].
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

/// Streaming reader over a trackside log.
///
/// The header line is consumed at construction time; records are then read
/// one at a time without buffering the whole file.
#[derive(Debug)]
pub struct LogReader<R: BufRead = BufReader<File>> {
    source: R,
    path: PathBuf,
    labels: Vec<String>,
    line_number: usize,
    records_read: usize,
}

impl LogReader<BufReader<File>> {
    /// Open a recorded log file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| TracksideError::stream_error(path.as_ref(), e))?;
        Self::from_reader(BufReader::new(file), path.as_ref().to_path_buf())
    }
}

impl<R: BufRead> LogReader<R> {
    /// Create a reader over any buffered source, keeping `path` for error
    /// context. Tests feed `std::io::Cursor` through here.
    pub fn from_reader(mut source: R, path: PathBuf) -> Result<Self> {
        let mut header = String::new();
        let read = source
            .read_line(&mut header)
            .map_err(|e| TracksideError::stream_error(path.clone(), e))?;
        if read == 0 {
            return Err(TracksideError::parse_error(
                "log header",
                format!("{} is empty", path.display()),
            ));
        }

        let mut columns = header.trim_end().split(',');
        match columns.next() {
            Some("Time") => {}
            other => {
                return Err(TracksideError::parse_error(
                    "log header",
                    format!("expected leading Time column, found {other:?}"),
                ));
            }
        }
        let labels: Vec<String> = columns.map(str::to_string).collect();
        if labels.is_empty() {
            return Err(TracksideError::parse_error(
                "log header",
                "header declares no channels".to_string(),
            ));
        }

        Ok(LogReader { source, path, labels, line_number: 1, records_read: 0 })
    }

    /// Channel labels from the header, in column order (the `Time` column is
    /// implicit and not included).
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column index of a channel label, usable with [`LogRecord::values`].
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Number of records returned so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Path this reader was opened from.
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// Read the next record, or `None` at end of stream.
    ///
    /// Rows with the wrong column count or non-numeric fields are skipped
    /// with a warning; only I/O failures abort the read.
    pub fn next_record(&mut self) -> Result<Option<LogRecord>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .source
                .read_line(&mut line)
                .map_err(|e| TracksideError::stream_error(self.path.clone(), e))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            match self.parse_row(trimmed) {
                Some(record) => {
                    self.records_read += 1;
                    return Ok(Some(record));
                }
                None => {
                    warn!(
                        path = %self.path.display(),
                        line = self.line_number,
                        "skipping malformed log row"
                    );
                }
            }
        }
    }

    fn parse_row(&self, row: &str) -> Option<LogRecord> {
        let mut fields = row.split(',');
        let time: f64 = fields.next()?.parse().ok()?;
        let mut values = Vec::with_capacity(self.labels.len());
        for field in fields {
            values.push(field.parse().ok()?);
        }
        if values.len() != self.labels.len() {
            return None;
        }
        Some(LogRecord { time, values })
    }
}
