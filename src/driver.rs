//! Host-facing driver module surface
//!
//! A racing host drives a module through a fixed callback sequence over a
//! session: track announcement, race start, one call per simulation tick,
//! pit stops, race end, unload. [`DriverModule`] is that callback table as
//! a trait; [`TelemetryDriver`] is the recording module built on it.

use tracing::{info, warn};

use crate::Result;
use crate::config::ModuleConfig;
use crate::sensors::{RangeFinder, SensorArray};
use crate::telemetry::{TelemetryRecorder, TickSample, track_id_from_path};
use crate::track::{Track, TrackPosition};
use crate::vehicle::VehicleState;

/// What the host should do once a pit stop callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitAction {
    /// Pit values are already set; resume the stop without interaction.
    #[default]
    Immediate,
    /// Open the interactive pit menu and wait for the driver.
    Menu,
}

/// Everything the host hands a module for one simulation tick.
pub struct TickInput<'a> {
    pub track: &'a Track,
    pub position: TrackPosition,
    pub vehicle: VehicleState,
    /// Host-side distance caster the sensor array reads through.
    pub range_finder: &'a dyn RangeFinder,
}

/// Callback table a host drives a module through.
///
/// Callbacks default to no-ops where a module can reasonably ignore them;
/// only the track announcement and the tick itself are mandatory.
pub trait DriverModule {
    /// The next session runs on `track`.
    fn on_new_track(&mut self, track: &Track) -> Result<()>;

    /// A race on the announced track is starting.
    fn on_new_race(&mut self) -> Result<()> {
        Ok(())
    }

    /// One simulation tick.
    fn on_tick(&mut self, input: &TickInput<'_>) -> Result<()>;

    /// The car is stationary in its pit box.
    fn on_pit(&mut self) -> Result<PitAction> {
        Ok(PitAction::Immediate)
    }

    /// The race finished.
    fn on_end_race(&mut self) -> Result<()> {
        Ok(())
    }

    /// The host is unloading the module.
    fn on_shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Driver module that records every gated tick to a trackside log.
///
/// Holds no control logic of its own: it observes the host state it is
/// given, derives the per-tick features and feeds them to the recorder.
/// The latest [`TickSample`] stays available to same-tick collaborators
/// through [`last_sample`](Self::last_sample).
#[derive(Default)]
pub struct TelemetryDriver {
    config: ModuleConfig,
    track_id: Option<String>,
    sensors: Option<SensorArray>,
    recorder: Option<TelemetryRecorder>,
    last_sample: Option<TickSample>,
}

impl TelemetryDriver {
    pub fn new(config: ModuleConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Identifier of the announced track, once the host has announced one.
    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    /// Snapshot assembled by the most recent tick.
    pub fn last_sample(&self) -> Option<&TickSample> {
        self.last_sample.as_ref()
    }

    fn finish_recording(&mut self) -> Result<()> {
        if let Some(recorder) = self.recorder.as_mut() {
            if let Some(path) = recorder.finish()? {
                info!(path = %path.display(), "recording finished");
            }
        }
        Ok(())
    }
}

impl DriverModule for TelemetryDriver {
    fn on_new_track(&mut self, track: &Track) -> Result<()> {
        let id = track
            .source_path()
            .map(track_id_from_path)
            .unwrap_or_else(|| track.name().to_string());
        info!(track = %track.name(), id = %id, "track announced");
        self.track_id = Some(id);
        self.last_sample = None;
        Ok(())
    }

    fn on_new_race(&mut self) -> Result<()> {
        let track_id = match &self.track_id {
            Some(id) => id.clone(),
            None => {
                warn!("race start before track announcement, using fallback id");
                "track".to_string()
            }
        };
        self.sensors = Some(SensorArray::new(self.config.sensor_layout()));
        self.recorder = Some(TelemetryRecorder::new(&self.config.output_dir, track_id));
        self.last_sample = None;
        Ok(())
    }

    fn on_tick(&mut self, input: &TickInput<'_>) -> Result<()> {
        if self.sensors.is_none() || self.recorder.is_none() {
            warn!("tick before race start, initializing on the fly");
            self.on_new_race()?;
        }
        let (Some(sensors), Some(recorder)) = (self.sensors.as_mut(), self.recorder.as_mut())
        else {
            return Ok(());
        };

        let readings = sensors.update(input.position.to_middle, input.range_finder);
        let sample = TickSample::compute(input.track, &input.position, input.vehicle, readings);
        let observed = recorder.observe(&sample);
        self.last_sample = Some(sample);
        observed
    }

    fn on_end_race(&mut self) -> Result<()> {
        self.finish_recording()
    }

    fn on_shutdown(&mut self) -> Result<()> {
        self.finish_recording()
    }
}
