//! Angularly distributed track-edge range sensors
//!
//! The array owns the fixed layout and the off-track guard; the actual ray
//! cast against the track boundary belongs to the host and enters through
//! [`RangeFinder`].

use tracing::debug;

/// Reading reported while the vehicle is outside the track bounds.
pub const SENSOR_SENTINEL: f64 = -1.0;

/// Host collaborator that measures distance to the track edge.
pub trait RangeFinder {
    /// Distance to the track boundary along a ray at `angle_deg` relative
    /// to the vehicle heading, clipped to `max_range`.
    fn cast(&self, angle_deg: f64, max_range: f64) -> f64;
}

/// One sensor's fixed mounting: angular offset and maximum range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSpec {
    pub angle_deg: f64,
    pub range: f64,
}

/// Immutable sensor arrangement, fixed at configuration time.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorLayout {
    specs: Vec<SensorSpec>,
}

impl SensorLayout {
    /// Evenly spaced sensors over the forward arc [−90°, +90°].
    ///
    /// The reference arrangement is 19 sensors in 10° steps; a single
    /// sensor aims straight ahead.
    pub fn forward_arc(count: usize, range: f64) -> Self {
        let specs = match count {
            0 => Vec::new(),
            1 => vec![SensorSpec { angle_deg: 0.0, range }],
            _ => {
                let step = 180.0 / (count - 1) as f64;
                (0..count)
                    .map(|i| SensorSpec { angle_deg: -90.0 + step * i as f64, range })
                    .collect()
            }
        };
        Self { specs }
    }

    /// Arbitrary arrangement supplied by the caller.
    pub fn custom(specs: Vec<SensorSpec>) -> Self {
        Self { specs }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[SensorSpec] {
        &self.specs
    }
}

/// Per-tick range readings with the off-track sentinel guard.
#[derive(Debug, Clone)]
pub struct SensorArray {
    layout: SensorLayout,
    readings: Vec<f64>,
}

impl SensorArray {
    pub fn new(layout: SensorLayout) -> Self {
        let readings = vec![SENSOR_SENTINEL; layout.len()];
        debug!(sensors = layout.len(), "sensor array ready");
        Self { layout, readings }
    }

    /// Refreshes all readings for this tick.
    ///
    /// Rays are only cast while the normalized lateral offset stays within
    /// [−1, 1]; beyond the track edge every reading is the sentinel. The
    /// returned slice is valid until the next update.
    pub fn update(&mut self, lateral_offset: f64, finder: &dyn RangeFinder) -> &[f64] {
        if lateral_offset.abs() <= 1.0 {
            for (reading, spec) in self.readings.iter_mut().zip(self.layout.specs()) {
                *reading = finder.cast(spec.angle_deg, spec.range);
            }
        } else {
            self.readings.fill(SENSOR_SENTINEL);
        }
        &self.readings
    }

    /// Readings from the most recent update.
    pub fn readings(&self) -> &[f64] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn layout(&self) -> &SensorLayout {
        &self.layout
    }
}
