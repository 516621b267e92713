//! Segment geometry primitives

use super::SegmentId;

/// Radius ceiling applied before curvature normalization.
pub const CURVATURE_RADIUS_CEILING: f64 = 300.0;

/// A 2-D point in track-world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates this point about `center` by `angle` radians,
    /// counter-clockwise positive.
    pub fn rotate_about(self, center: Point2, angle: f64) -> Point2 {
        let (sin_a, cos_a) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point2 {
            x: center.x + dx * cos_a - dy * sin_a,
            y: center.y + dx * sin_a + dy * cos_a,
        }
    }
}

/// Shape class of a path segment.
///
/// The discriminants keep the host's segment type codes, which the telemetry
/// stream emits verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    RightCurve,
    LeftCurve,
    Straight,
}

impl SegmentKind {
    /// Numeric type code as exported in the telemetry stream.
    pub fn type_code(self) -> f64 {
        match self {
            SegmentKind::RightCurve => 1.0,
            SegmentKind::LeftCurve => 2.0,
            SegmentKind::Straight => 3.0,
        }
    }

    pub fn is_curve(self) -> bool {
        !matches!(self, SegmentKind::Straight)
    }
}

/// The four boundary vertices of a segment.
///
/// Left and right are relative to the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentVertices {
    pub start_left: Point2,
    pub start_right: Point2,
    pub end_left: Point2,
    pub end_right: Point2,
}

/// One atomic piece of the closed track path.
///
/// Segments are immutable once the track is built; the ring links are arena
/// indices, wired by [`TrackBuilder`](super::TrackBuilder) or the host
/// adapter and validated by [`Track::new`](super::Track::new).
///
/// Field semantics follow the host's track structures: `length` is the
/// centerline run length for every kind, `arc` and `radius` are zero for
/// straights, and `center` is only meaningful for curves.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    /// Centerline run length in distance units.
    pub length: f64,
    /// Subtended angle in radians (curves only).
    pub arc: f64,
    /// Centerline radius in distance units (curves only).
    pub radius: f64,
    /// Rotation center (curves only).
    pub center: Point2,
    pub vertices: SegmentVertices,
    /// Tangent direction at the segment start, in radians.
    pub start_angle: f64,
    /// Track width across this segment.
    pub width: f64,
    /// Surface friction coefficient µ.
    pub friction: f64,
    /// Arena index of the segment ahead.
    pub next: SegmentId,
    /// Arena index of the segment behind.
    pub prev: SegmentId,
}

impl PathSegment {
    /// Centerline run length in the direction of travel.
    ///
    /// Straights use the stored length; curves derive it from arc and
    /// radius, matching how the host measures traversal.
    pub fn run_length(&self) -> f64 {
        match self.kind {
            SegmentKind::Straight => self.length,
            _ => self.arc * self.radius,
        }
    }

    /// Signed curvature scalar on the common comparison scale.
    ///
    /// The radius is clamped to [`CURVATURE_RADIUS_CEILING`] and remapped so
    /// left curves read positive, right curves negative and straights zero.
    /// The scale is part of the output contract and must not change.
    pub fn curvature_value(&self) -> f64 {
        let clamped = self.radius.min(CURVATURE_RADIUS_CEILING);
        match self.kind {
            SegmentKind::Straight => 0.0,
            SegmentKind::LeftCurve => CURVATURE_RADIUS_CEILING - clamped,
            SegmentKind::RightCurve => clamped - CURVATURE_RADIUS_CEILING,
        }
    }
}
