//! Fixed-window curvature sampling along the segment ring
//!
//! Walks the track forward or backward from the vehicle's position and
//! condenses the path into a fixed number of fixed-length windows, each
//! holding the length-weighted mean of the signed curvature scale defined by
//! [`PathSegment::curvature_value`](crate::track::PathSegment::curvature_value).
//! Fixed distance windows make the profile independent of the vehicle's
//! instantaneous speed, which is what lookahead/look-behind consumers want.

use std::ops::Index;

use crate::track::{Track, TrackPosition};

/// Number of samples per window set.
pub const CURVATURE_SAMPLES: usize = 16;

/// Length of one sampling window, in distance units.
pub const SAMPLE_WINDOW_LENGTH: f64 = 10.0;

/// Walk orientation relative to the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDirection {
    /// Follow `next` links, measuring from the current offset to each
    /// segment end.
    Forward,
    /// Follow `prev` links, measuring from each segment start to the
    /// current offset.
    Backward,
}

/// A fresh per-tick set of curvature samples, nearest window first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureWindow {
    samples: [f64; CURVATURE_SAMPLES],
}

impl CurvatureWindow {
    pub fn samples(&self) -> &[f64; CURVATURE_SAMPLES] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Index<usize> for CurvatureWindow {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a CurvatureWindow {
    type Item = f64;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter().copied()
    }
}

/// Samples the curvature profile ahead of or behind the position.
///
/// Emits exactly [`CURVATURE_SAMPLES`] windows of [`SAMPLE_WINDOW_LENGTH`]
/// distance units each, wrapping around the cyclic ring as often as needed;
/// a short loop spreads its segments over multiple windows. The accumulator
/// carries (distance covered, length-weighted mean curvature) across segment
/// boundaries, so a window straddling a boundary blends both sides in
/// proportion to the distance each contributes. Zero-length contributions
/// are skipped before they can reach a division.
pub fn sample_curvature(
    track: &Track,
    position: &TrackPosition,
    direction: WalkDirection,
) -> CurvatureWindow {
    let mut samples = [0.0; CURVATURE_SAMPLES];
    let mut emitted = 0;
    let mut segment = position.segment;
    let mut carry_len = 0.0;
    let mut carry_mean = 0.0;
    let mut at_origin = true;

    while emitted < CURVATURE_SAMPLES {
        let seg = track.segment(segment);
        let curvature = seg.curvature_value();

        let mut available = if at_origin {
            let covered = track.distance_from_segment_start(position);
            match direction {
                WalkDirection::Forward => seg.run_length() - covered,
                WalkDirection::Backward => covered,
            }
        } else {
            seg.run_length()
        };
        at_origin = false;

        while available > 0.0 && emitted < CURVATURE_SAMPLES {
            if carry_len + available >= SAMPLE_WINDOW_LENGTH {
                // Enough distance to close a window: blend the carry with
                // this segment's share and emit.
                let fill = SAMPLE_WINDOW_LENGTH - carry_len;
                samples[emitted] = carry_mean * (carry_len / SAMPLE_WINDOW_LENGTH)
                    + curvature * (fill / SAMPLE_WINDOW_LENGTH);
                emitted += 1;
                available -= fill;
                carry_len = 0.0;
                carry_mean = curvature;
            } else {
                // Absorb the remainder of this segment into the carry.
                let total = carry_len + available;
                carry_mean = carry_mean * (carry_len / total) + curvature * (available / total);
                carry_len = total;
                available = 0.0;
            }
        }

        segment = match direction {
            WalkDirection::Forward => seg.next,
            WalkDirection::Backward => seg.prev,
        };
    }

    CurvatureWindow { samples }
}
