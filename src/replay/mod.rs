//! Replay of recorded telemetry runs
//!
//! A recorded log is replayed through a small task pipeline: a
//! [`RecordSource`] owns the reader and handles pacing internally, and a
//! [`ReplaySession`] spawns the pump task that fans records out to any
//! number of stream consumers.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use trackside::replay::{LogReplay, ReplaySession};
//!
//! #[tokio::main]
//! async fn main() -> trackside::Result<()> {
//!     let replay = LogReplay::open("street-1.trackside.csv")?;
//!     let session = ReplaySession::start(replay);
//!
//!     let mut records = session.records();
//!     while let Some(record) = records.next().await {
//!         println!("t={:.3} ({} channels)", record.time, record.values.len());
//!     }
//!     Ok(())
//! }
//! ```

use futures::{Stream, StreamExt};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Result;
use crate::telemetry::{LogReader, LogRecord};

pub mod decimate;

pub use decimate::{Decimate, DecimateExt};

/// Default replay pacing, matching the 50 Hz tick the host runs modules at.
pub const REPLAY_TICK_RATE_HZ: f64 = 50.0;

/// Trait for replayable record sources
///
/// Sources abstract over where records come from and handle their own
/// timing internally: a file replay paces itself with a timer, a test
/// source can yield records immediately.
#[async_trait::async_trait]
pub trait RecordSource: Send + 'static {
    /// Channel labels for the records this source yields.
    fn labels(&self) -> &[String];

    /// Get the next record
    ///
    /// Returns:
    /// - `Ok(Some(record))` - New record available
    /// - `Ok(None)` - Source exhausted (normal termination)
    /// - `Err(e)` - Error occurred
    async fn next_record(&mut self) -> Result<Option<LogRecord>>;

    /// Pacing rate in Hz, 0.0 when the source is unpaced.
    fn tick_rate(&self) -> f64;
}

/// Record source that replays a recorded log at a steady tick rate.
pub struct LogReplay<R: BufRead = BufReader<File>> {
    reader: LogReader<R>,
    tick_rate: f64,
    pace: Option<Duration>,
    /// Created lazily on first read so construction works outside a runtime.
    interval: Option<Interval>,
}

impl LogReplay<BufReader<File>> {
    /// Open a recorded log for replay at the default tick rate.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = LogReader::open(path)?;
        info!(
            path = %reader.file_path().display(),
            channels = reader.labels().len(),
            "opened log for replay"
        );
        Ok(Self::from_reader(reader))
    }
}

impl<R: BufRead> LogReplay<R> {
    /// Wrap an already-open reader, paced at the default tick rate.
    pub fn from_reader(reader: LogReader<R>) -> Self {
        Self { reader, tick_rate: REPLAY_TICK_RATE_HZ, pace: None, interval: None }
            .with_tick_rate(REPLAY_TICK_RATE_HZ)
    }

    /// Set the pacing rate in Hz. A rate of 0 disables pacing and the
    /// replay runs as fast as the consumer can drain it.
    pub fn with_tick_rate(mut self, hz: f64) -> Self {
        self.tick_rate = hz.max(0.0);
        self.pace = (self.tick_rate > 0.0).then(|| Duration::from_secs_f64(1.0 / self.tick_rate));
        self.interval = None;
        debug!(hz = self.tick_rate, "replay tick rate set");
        self
    }

    /// The reader this replay draws from.
    pub fn reader(&self) -> &LogReader<R> {
        &self.reader
    }
}

#[async_trait::async_trait]
impl<R: BufRead + Send + 'static> RecordSource for LogReplay<R> {
    fn labels(&self) -> &[String] {
        self.reader.labels()
    }

    async fn next_record(&mut self) -> Result<Option<LogRecord>> {
        if let Some(period) = self.pace {
            let interval = self.interval.get_or_insert_with(|| {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval
            });
            interval.tick().await;
        }
        self.reader.next_record()
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }
}

/// Running replay: a pump task reading from a [`RecordSource`] and fanning
/// records out through a watch channel.
///
/// Consumers subscribe with [`records`](Self::records); late subscribers
/// start from the most recent record. The pump stops when the source ends,
/// when [`stop`](Self::stop) is called, or when the session is dropped.
pub struct ReplaySession {
    labels: Vec<String>,
    records: watch::Receiver<Option<Arc<LogRecord>>>,
    cancel: CancellationToken,
}

impl ReplaySession {
    /// Spawn the pump task for the given source.
    pub fn start<S: RecordSource>(source: S) -> Self {
        let labels = source.labels().to_vec();
        let (record_tx, record_rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let cancel_pump = cancel.clone();
        tokio::spawn(async move {
            Self::pump_task(source, record_tx, cancel_pump).await;
        });

        ReplaySession { labels, records: record_rx, cancel }
    }

    /// Channel labels for the replayed records.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column index of a channel label within replayed records.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Subscribe to replayed records.
    ///
    /// The stream ends when the pump task does. Each subscriber observes
    /// the latest record at subscription time, then every record after it.
    pub fn records(&self) -> impl Stream<Item = Arc<LogRecord>> + Unpin + use<> {
        WatchStream::new(self.records.clone()).filter_map(|opt| async move { opt }).boxed()
    }

    /// Most recent record, if the pump has produced one.
    pub fn current_record(&self) -> Option<Arc<LogRecord>> {
        self.records.borrow().clone()
    }

    /// Stop the pump task. Subscribed streams end once it exits.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Pump task - reads records from the source and fans them out
    async fn pump_task<S: RecordSource>(
        mut source: S,
        record_tx: watch::Sender<Option<Arc<LogRecord>>>,
        cancel: CancellationToken,
    ) {
        debug!(rate = source.tick_rate(), "replay pump started");
        let mut record_count = 0u64;

        loop {
            // Use select so cancellation interrupts a paced wait
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("replay pump cancelled");
                    break;
                }
                result = source.next_record() => result,
            };

            match result {
                Ok(Some(record)) => {
                    record_count += 1;
                    if record_tx.send(Some(Arc::new(record))).is_err() {
                        debug!("record receiver dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!(records = record_count, "replay source ended");
                    break;
                }
                Err(error) => {
                    warn!(%error, records = record_count, "replay source failed");
                    break;
                }
            }
        }

        debug!(records = record_count, "replay pump ended");
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        debug!("dropping replay session");
        // Cancel the pump on drop for clean shutdown
        self.cancel.cancel();
    }
}
