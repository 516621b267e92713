//! Track perception and telemetry recording for TORCS-style racing hosts.
//!
//! Trackside turns the state a racing simulator hands its driver modules
//! every tick into derived track features, records them to per-track log
//! files, and replays those logs through an async stream surface.
//!
//! # Features
//!
//! - **Track model**: indexed segment arena with a geometric layout builder
//! - **Perception**: point resolution, curvature windowing, range sensors
//! - **Recording**: lap-gated channel recorder with lazy stream binding
//! - **Replay**: paced record streams with decimation for analysis tools
//!
//! # Quick Start
//!
//! ## Recording (host side)
//!
//! ```rust,no_run
//! use trackside::{
//!     DriverModule, ModuleConfig, RangeFinder, TelemetryDriver, TickInput, TrackBuilder,
//!     TrackPosition, VehicleState,
//! };
//!
//! struct OpenRoad;
//!
//! impl RangeFinder for OpenRoad {
//!     fn cast(&self, _angle_deg: f64, max_range: f64) -> f64 {
//!         max_range
//!     }
//! }
//!
//! fn main() -> trackside::Result<()> {
//!     let track = TrackBuilder::new()
//!         .width(10.0)
//!         .straight(400.0)
//!         .left_curve(100.0, std::f64::consts::PI)
//!         .straight(400.0)
//!         .left_curve(100.0, std::f64::consts::PI)
//!         .build("demo-oval")?;
//!
//!     let mut driver = TelemetryDriver::new(ModuleConfig::default());
//!     driver.on_new_track(&track)?;
//!     driver.on_new_race()?;
//!
//!     // The host calls this once per simulation tick.
//!     let input = TickInput {
//!         track: &track,
//!         position: TrackPosition::new(track.first_segment(), 0.0, 0.0),
//!         vehicle: VehicleState {
//!             speed: 25.0,
//!             laps_done: 1,
//!             remaining_laps: 3,
//!             ..VehicleState::default()
//!         },
//!         range_finder: &OpenRoad,
//!     };
//!     driver.on_tick(&input)?;
//!     driver.on_shutdown()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Replay (analysis side)
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use trackside::replay::{DecimateExt, LogReplay, ReplaySession};
//!
//! #[tokio::main]
//! async fn main() -> trackside::Result<()> {
//!     let session = ReplaySession::start(LogReplay::open("demo-oval.trackside.csv")?);
//!
//!     // Thin the 50 Hz replay to every fifth record.
//!     let mut records = session.records().decimate(5);
//!     while let Some(record) = records.next().await {
//!         println!("t={:.2} ({} channels)", record.time, record.values.len());
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod vehicle;

// Track model and perception
pub mod geometry;
pub mod sensors;
pub mod track;
pub mod walker;

// Recording and replay surfaces
pub mod driver;
pub mod replay;
pub mod telemetry;

// Core exports
pub use config::ModuleConfig;
pub use error::*;
pub use vehicle::VehicleState;

// Track model exports
pub use track::{
    CURVATURE_RADIUS_CEILING, PathSegment, Point2, SegmentId, SegmentKind, Track, TrackBuilder,
    TrackPosition,
};

// Perception exports
pub use geometry::{edge_points, normalize_angle, resolve_point, tangent_angle};
pub use sensors::{RangeFinder, SENSOR_SENTINEL, SensorArray, SensorLayout, SensorSpec};
pub use walker::{
    CURVATURE_SAMPLES, CurvatureWindow, SAMPLE_WINDOW_LENGTH, WalkDirection, sample_curvature,
};

// Recording exports
pub use driver::{DriverModule, PitAction, TelemetryDriver, TickInput};
pub use telemetry::{GRAVITY, LogReader, LogRecord, RecorderState, TelemetryRecorder, TickSample};

// Replay exports
pub use replay::{LogReplay, RecordSource, ReplaySession};
