//! Track arena, segment identifiers and on-track positions
//!
//! The track is a closed loop of immutable segments held in an arena;
//! `next`/`prev` links are plain indices into it, so traversal is O(1) and
//! shared read access needs no aliasing tricks.

mod builder;
mod segment;

use std::path::{Path, PathBuf};

use crate::error::{Result, TracksideError};

pub use builder::TrackBuilder;
pub use segment::{CURVATURE_RADIUS_CEILING, PathSegment, Point2, SegmentKind, SegmentVertices};

/// Stable index of a segment in the track arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the vehicle sits on the track, host-computed every tick.
///
/// `to_start` keeps the host's dual convention: distance units on straights,
/// swept radians on curves. `to_middle` is the normalized lateral offset,
/// −1 at the right edge through +1 at the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackPosition {
    pub segment: SegmentId,
    pub to_start: f64,
    pub to_middle: f64,
}

impl TrackPosition {
    pub fn new(segment: SegmentId, to_start: f64, to_middle: f64) -> Self {
        Self { segment, to_start, to_middle }
    }
}

/// The closed track path: a validated, immutable segment arena.
#[derive(Debug, Clone)]
pub struct Track {
    name: String,
    source_path: Option<PathBuf>,
    segments: Vec<PathSegment>,
}

impl Track {
    /// Builds a track from an arena of linked segments.
    ///
    /// Validates the ring invariant: the arena is non-empty, every link is
    /// in range, following `next` from the first segment visits each segment
    /// exactly once before returning, `prev` inverts `next`, and the loop
    /// has positive total run length.
    pub fn new(name: impl Into<String>, segments: Vec<PathSegment>) -> Result<Self> {
        let count = segments.len();
        if count == 0 {
            return Err(TracksideError::layout_error("track has no segments"));
        }

        for (index, seg) in segments.iter().enumerate() {
            if seg.next.0 >= count || seg.prev.0 >= count {
                return Err(TracksideError::layout_error(format!(
                    "segment {index} links outside the arena (next {}, prev {}, arena {count})",
                    seg.next, seg.prev
                )));
            }
            if segments[seg.next.0].prev.0 != index {
                return Err(TracksideError::layout_error(format!(
                    "segment {index} is not the prev of its next segment {}",
                    seg.next
                )));
            }
        }

        let mut visited = vec![false; count];
        let mut cursor = 0usize;
        for _ in 0..count {
            if visited[cursor] {
                return Err(TracksideError::layout_error(format!(
                    "ring revisits segment #{cursor} before closing"
                )));
            }
            visited[cursor] = true;
            cursor = segments[cursor].next.0;
        }
        if cursor != 0 {
            return Err(TracksideError::layout_error(
                "ring does not close back on the first segment",
            ));
        }

        let total: f64 = segments.iter().map(PathSegment::run_length).sum();
        if !(total > 0.0) {
            return Err(TracksideError::layout_error(
                "track has no positive run length",
            ));
        }

        Ok(Self { name: name.into(), source_path: None, segments })
    }

    /// Attaches the host path this track was loaded from, used for naming
    /// output artifacts.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segment lookup.
    ///
    /// `id` must come from this track's arena; out-of-range ids panic, the
    /// same contract as slice indexing.
    pub fn segment(&self, id: SegmentId) -> &PathSegment {
        &self.segments[id.0]
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// First segment of the ring, the conventional start/finish location.
    pub fn first_segment(&self) -> SegmentId {
        SegmentId(0)
    }

    /// Total centerline length of the loop.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(PathSegment::run_length).sum()
    }

    /// Longitudinal distance from the segment start to `position`.
    ///
    /// Resolves the dual `to_start` convention: the raw offset on straights,
    /// offset × radius (arc length) on curves.
    pub fn distance_from_segment_start(&self, position: &TrackPosition) -> f64 {
        let seg = self.segment(position.segment);
        match seg.kind {
            SegmentKind::Straight => position.to_start,
            _ => position.to_start * seg.radius,
        }
    }
}
