//! Test utilities shared by unit tests and benchmarks
//!
//! Provides a reference track layout and a deterministic range finder so
//! tests that only need "some valid circuit" do not rebuild one by hand.

#![cfg(any(test, feature = "benchmark"))]

use crate::sensors::RangeFinder;
use crate::track::{Track, TrackBuilder};
use std::f64::consts::PI;

/// Closed reference circuit: two long straights joined by two 180 degree
/// left curves, 12 m wide with uniform grip.
///
/// Useful wherever a test needs a plausible track without caring about the
/// exact layout.
pub fn reference_track() -> Track {
    TrackBuilder::new()
        .width(12.0)
        .friction(0.9)
        .straight(300.0)
        .left_curve(60.0, PI)
        .straight(300.0)
        .left_curve(60.0, PI)
        .build("reference-ring")
        .expect("reference layout is closed and well formed")
}

/// Range finder double reporting a fixed distance, clamped to the sensor's
/// maximum range.
pub struct FixedRange(pub f64);

impl RangeFinder for FixedRange {
    fn cast(&self, _angle_deg: f64, max_range: f64) -> f64 {
        self.0.min(max_range)
    }
}
