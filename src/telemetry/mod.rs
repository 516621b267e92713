//! Telemetry channels and per-tick samples
//!
//! A channel is a named binding between a label and one numeric feature of
//! the tick snapshot. The table is built once when recording starts and its
//! layout never changes for the rest of the run; rows extract in table
//! order, which is the on-disk column order.

pub mod reader;
pub mod recorder;

use crate::geometry::{edge_points, normalize_angle, tangent_angle};
use crate::sensors::SENSOR_SENTINEL;
use crate::track::{Point2, Track, TrackPosition};
use crate::vehicle::VehicleState;
use crate::walker::{CURVATURE_SAMPLES, CurvatureWindow, WalkDirection, sample_curvature};

pub use reader::{LogReader, LogRecord};
pub use recorder::{RecorderState, TelemetryRecorder, track_id_from_path};

/// Gravitational acceleration used by the derived estimates.
pub const GRAVITY: f64 = 9.81;

/// One consistent snapshot of everything observable in a tick.
///
/// Assembled once per tick so every consumer, the recorder included, sees
/// the same values.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSample {
    pub vehicle: VehicleState,
    /// Normalized lateral offset, −1 right edge to +1 left edge.
    pub to_middle: f64,
    /// Vehicle heading error against the track tangent, in [−π, π].
    pub angle_error: f64,
    /// Host type code of the current segment.
    pub segment_type: f64,
    /// Raw radius of the current segment, 0 on straights.
    pub segment_radius: f64,
    /// Distance needed to brake to zero at the current speed.
    pub braking_distance: f64,
    /// Cornering speed the current segment supports.
    pub allowed_speed: f64,
    pub right_edge: Point2,
    pub left_edge: Point2,
    /// Surface friction µ of the current segment.
    pub friction: f64,
    pub sensors: Vec<f64>,
    pub forward: CurvatureWindow,
    pub backward: CurvatureWindow,
}

impl TickSample {
    /// Derives the full per-tick feature set from host state.
    ///
    /// `sensors` are the readings already refreshed for this tick; the
    /// curvature windows and edge points are computed here.
    pub fn compute(
        track: &Track,
        position: &TrackPosition,
        vehicle: VehicleState,
        sensors: &[f64],
    ) -> Self {
        let seg = track.segment(position.segment);
        let mu = seg.friction;
        let angle_error = normalize_angle(tangent_angle(track, position) - vehicle.yaw);
        let (right_edge, left_edge) = edge_points(track, position);

        Self {
            vehicle,
            to_middle: position.to_middle,
            angle_error,
            segment_type: seg.kind.type_code(),
            segment_radius: seg.radius,
            braking_distance: vehicle.speed * vehicle.speed / (2.0 * mu * GRAVITY),
            allowed_speed: (mu * GRAVITY * seg.radius).sqrt(),
            right_edge,
            left_edge,
            friction: mu,
            sensors: sensors.to_vec(),
            forward: sample_curvature(track, position, WalkDirection::Forward),
            backward: sample_curvature(track, position, WalkDirection::Backward),
        }
    }
}

/// Which feature of the snapshot a channel reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSource {
    Lap,
    AccelX,
    AccelY,
    Steer,
    Throttle,
    Brake,
    Gear,
    Speed,
    DistFromStart,
    Rpm,
    ToMiddle,
    AngleError,
    SegmentType,
    SegmentRadius,
    BrakingDistance,
    AllowedSpeed,
    PosX,
    PosY,
    RightEdgeX,
    RightEdgeY,
    LeftEdgeX,
    LeftEdgeY,
    Friction,
    Sensor(usize),
    ForwardCurvature(usize),
    BackwardCurvature(usize),
}

impl ChannelSource {
    /// Reads this channel's value out of a snapshot.
    pub fn extract(self, sample: &TickSample) -> f64 {
        match self {
            ChannelSource::Lap => sample.vehicle.laps_done as f64,
            ChannelSource::AccelX => sample.vehicle.accel_x,
            ChannelSource::AccelY => sample.vehicle.accel_y,
            ChannelSource::Steer => sample.vehicle.steer_cmd,
            ChannelSource::Throttle => sample.vehicle.throttle_cmd,
            ChannelSource::Brake => sample.vehicle.brake_cmd,
            ChannelSource::Gear => sample.vehicle.gear_cmd as f64,
            ChannelSource::Speed => sample.vehicle.speed,
            ChannelSource::DistFromStart => sample.vehicle.dist_from_start,
            ChannelSource::Rpm => sample.vehicle.engine_rpm,
            ChannelSource::ToMiddle => sample.to_middle,
            ChannelSource::AngleError => sample.angle_error,
            ChannelSource::SegmentType => sample.segment_type,
            ChannelSource::SegmentRadius => sample.segment_radius,
            ChannelSource::BrakingDistance => sample.braking_distance,
            ChannelSource::AllowedSpeed => sample.allowed_speed,
            ChannelSource::PosX => sample.vehicle.pos_x,
            ChannelSource::PosY => sample.vehicle.pos_y,
            ChannelSource::RightEdgeX => sample.right_edge.x,
            ChannelSource::RightEdgeY => sample.right_edge.y,
            ChannelSource::LeftEdgeX => sample.left_edge.x,
            ChannelSource::LeftEdgeY => sample.left_edge.y,
            ChannelSource::Friction => sample.friction,
            ChannelSource::Sensor(i) => sample.sensors.get(i).copied().unwrap_or(SENSOR_SENTINEL),
            ChannelSource::ForwardCurvature(i) => sample.forward[i],
            ChannelSource::BackwardCurvature(i) => sample.backward[i],
        }
    }
}

/// A named binding between a label and a snapshot feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    label: String,
    source: ChannelSource,
}

impl Channel {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> ChannelSource {
        self.source
    }
}

const SCALAR_CHANNELS: [(&str, ChannelSource); 23] = [
    ("Lap", ChannelSource::Lap),
    ("Ax", ChannelSource::AccelX),
    ("Ay", ChannelSource::AccelY),
    ("Steer", ChannelSource::Steer),
    ("Accel", ChannelSource::Throttle),
    ("Brake", ChannelSource::Brake),
    ("Gear", ChannelSource::Gear),
    ("Speed", ChannelSource::Speed),
    ("FromStart", ChannelSource::DistFromStart),
    ("RPM", ChannelSource::Rpm),
    ("ToMiddle", ChannelSource::ToMiddle),
    ("Angle", ChannelSource::AngleError),
    ("SegType", ChannelSource::SegmentType),
    ("SegRadius", ChannelSource::SegmentRadius),
    ("BrakeDistance", ChannelSource::BrakingDistance),
    ("MaxSpeed", ChannelSource::AllowedSpeed),
    ("PosX", ChannelSource::PosX),
    ("PosY", ChannelSource::PosY),
    ("RightX", ChannelSource::RightEdgeX),
    ("RightY", ChannelSource::RightEdgeY),
    ("LeftX", ChannelSource::LeftEdgeX),
    ("LeftY", ChannelSource::LeftEdgeY),
    ("Friction", ChannelSource::Friction),
];

/// The fixed channel layout for one recording run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable {
    channels: Vec<Channel>,
}

impl ChannelTable {
    /// The standard layout: scalar channels, then one channel per sensor,
    /// then the forward and backward curvature windows.
    pub fn standard(sensor_count: usize) -> Self {
        let mut channels =
            Vec::with_capacity(SCALAR_CHANNELS.len() + sensor_count + 2 * CURVATURE_SAMPLES);
        for (label, source) in SCALAR_CHANNELS {
            channels.push(Channel { label: label.to_string(), source });
        }
        for i in 0..sensor_count {
            channels.push(Channel {
                label: format!("TrackSens{i}"),
                source: ChannelSource::Sensor(i),
            });
        }
        for i in 0..CURVATURE_SAMPLES {
            channels.push(Channel {
                label: format!("RadiusFw{i}"),
                source: ChannelSource::ForwardCurvature(i),
            });
        }
        for i in 0..CURVATURE_SAMPLES {
            channels.push(Channel {
                label: format!("RadiusBw{i}"),
                source: ChannelSource::BackwardCurvature(i),
            });
        }
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.label.as_str())
    }

    /// Extracts one row of values in table order.
    pub fn extract_row(&self, sample: &TickSample) -> Vec<f64> {
        self.channels.iter().map(|c| c.source.extract(sample)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{SensorArray, SensorLayout};
    use crate::track::{SegmentId, TrackBuilder};

    struct FixedRange(f64);

    impl crate::sensors::RangeFinder for FixedRange {
        fn cast(&self, _angle_deg: f64, max_range: f64) -> f64 {
            self.0.min(max_range)
        }
    }

    fn sample_on_builder_track() -> TickSample {
        let track = TrackBuilder::new()
            .width(10.0)
            .friction(0.8)
            .straight(200.0)
            .left_curve(80.0, 2.0)
            .build("test-ring")
            .unwrap();
        let position = TrackPosition::new(SegmentId::new(0), 50.0, 0.25);
        let vehicle = VehicleState {
            speed: 20.0,
            yaw: 0.1,
            laps_done: 2,
            remaining_laps: 3,
            gear_cmd: 4,
            ..VehicleState::default()
        };
        let mut sensors = SensorArray::new(SensorLayout::forward_arc(19, 200.0));
        let readings = sensors.update(position.to_middle, &FixedRange(42.0)).to_vec();
        TickSample::compute(&track, &position, vehicle, &readings)
    }

    #[test]
    fn standard_table_has_the_fixed_layout() {
        let table = ChannelTable::standard(19);
        assert_eq!(table.len(), 23 + 19 + 16 + 16);

        let labels: Vec<&str> = table.labels().collect();
        assert_eq!(labels[0], "Lap");
        assert_eq!(labels[6], "Gear");
        assert_eq!(labels[15], "MaxSpeed");
        assert_eq!(labels[22], "Friction");
        assert_eq!(labels[23], "TrackSens0");
        assert_eq!(labels[41], "TrackSens18");
        assert_eq!(labels[42], "RadiusFw0");
        assert_eq!(labels[58], "RadiusBw0");
        assert_eq!(labels[73], "RadiusBw15");
    }

    #[test]
    fn extraction_follows_table_order() {
        let sample = sample_on_builder_track();
        let table = ChannelTable::standard(19);
        let row = table.extract_row(&sample);

        assert_eq!(row.len(), table.len());
        assert_eq!(row[0], 2.0); // Lap
        assert_eq!(row[6], 4.0); // Gear
        assert_eq!(row[7], 20.0); // Speed
        assert_eq!(row[10], 0.25); // ToMiddle
        assert_eq!(row[12], 3.0); // SegType of a straight
        assert_eq!(row[23], 42.0); // first sensor
        assert_eq!(row[42], sample.forward[0]);
        assert_eq!(row[58], sample.backward[0]);
    }

    #[test]
    fn braking_distance_follows_the_friction_model() {
        let sample = sample_on_builder_track();
        // speed 20, µ 0.8: v² / (2µg)
        let expected = 400.0 / (2.0 * 0.8 * GRAVITY);
        assert!((sample.braking_distance - expected).abs() < 1e-9);
        // Straight segment: no cornering limit to speak of.
        assert_eq!(sample.allowed_speed, 0.0);
    }

    #[test]
    fn allowed_speed_uses_the_segment_radius() {
        let track = TrackBuilder::new()
            .friction(1.0)
            .left_curve(100.0, 2.0)
            .left_curve(100.0, 2.0 * std::f64::consts::PI - 2.0)
            .build("circle")
            .unwrap();
        let position = TrackPosition::new(SegmentId::new(0), 0.5, 0.0);
        let sample =
            TickSample::compute(&track, &position, VehicleState::default(), &[]);

        let expected = (GRAVITY * 100.0).sqrt();
        assert!((sample.allowed_speed - expected).abs() < 1e-9);
        assert_eq!(sample.segment_type, 2.0);
        assert_eq!(sample.segment_radius, 100.0);
    }

    #[test]
    fn angle_error_is_tangent_minus_yaw_normalized() {
        let sample = sample_on_builder_track();
        // Straight with start angle 0, yaw 0.1.
        assert!((sample.angle_error + 0.1).abs() < 1e-9);
    }

    #[test]
    fn missing_sensor_values_extract_as_sentinel() {
        let sample = sample_on_builder_track();
        let short_table = ChannelTable::standard(25);
        let row = short_table.extract_row(&sample);
        // Snapshot only has 19 sensor values; the extra columns degrade.
        assert_eq!(row[23 + 19], SENSOR_SENTINEL);
        assert_eq!(row[23 + 24], SENSOR_SENTINEL);
    }
}
