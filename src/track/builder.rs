//! Programmatic track layout
//!
//! Lays out a closed loop from shape commands, advancing a centerline pose
//! and deriving the boundary vertices, curve centers and start angles that
//! the perception code reads. Hosts with their own track structures adapt
//! them directly; this is the construction path for synthetic layouts.

use super::segment::{PathSegment, Point2, SegmentKind, SegmentVertices};
use super::{Result, SegmentId, Track};

#[derive(Debug, Clone, Copy)]
struct Pose {
    position: Point2,
    heading: f64,
}

impl Pose {
    /// Unit normal pointing at the left edge.
    fn left_normal(&self) -> Point2 {
        Point2::new(-self.heading.sin(), self.heading.cos())
    }
}

/// Builder for closed track loops.
///
/// ```rust
/// use trackside::track::TrackBuilder;
///
/// let track = TrackBuilder::new()
///     .width(12.0)
///     .straight(200.0)
///     .left_curve(60.0, std::f64::consts::PI)
///     .straight(200.0)
///     .left_curve(60.0, std::f64::consts::PI)
///     .build("stadium")?;
/// assert_eq!(track.segment_count(), 4);
/// # Ok::<(), trackside::TracksideError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    width: f64,
    friction: f64,
    cursor: Pose,
    segments: Vec<PathSegment>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self {
            width: 10.0,
            friction: 0.8,
            cursor: Pose { position: Point2::default(), heading: 0.0 },
            segments: Vec::new(),
        }
    }

    /// Track width for segments appended after this call.
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Surface friction for segments appended after this call.
    pub fn friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Moves the layout origin before any segment is appended.
    pub fn starting_at(mut self, x: f64, y: f64, heading: f64) -> Self {
        if self.segments.is_empty() {
            self.cursor = Pose { position: Point2::new(x, y), heading };
        }
        self
    }

    /// Appends a straight of the given centerline length.
    pub fn straight(mut self, length: f64) -> Self {
        let half = self.width / 2.0;
        let left = self.cursor.left_normal();
        let pos = self.cursor.position;
        let heading = self.cursor.heading;

        let start_left = Point2::new(pos.x + left.x * half, pos.y + left.y * half);
        let start_right = Point2::new(pos.x - left.x * half, pos.y - left.y * half);
        let end = Point2::new(
            pos.x + heading.cos() * length,
            pos.y + heading.sin() * length,
        );
        let end_left = Point2::new(end.x + left.x * half, end.y + left.y * half);
        let end_right = Point2::new(end.x - left.x * half, end.y - left.y * half);

        self.segments.push(PathSegment {
            kind: SegmentKind::Straight,
            length,
            arc: 0.0,
            radius: 0.0,
            center: Point2::default(),
            vertices: SegmentVertices { start_left, start_right, end_left, end_right },
            start_angle: heading,
            width: self.width,
            friction: self.friction,
            next: SegmentId(0),
            prev: SegmentId(0),
        });
        self.cursor.position = end;
        self
    }

    /// Appends a left-hand curve with the given centerline radius and
    /// subtended angle in radians.
    pub fn left_curve(self, radius: f64, arc: f64) -> Self {
        self.curve(SegmentKind::LeftCurve, radius, arc)
    }

    /// Appends a right-hand curve with the given centerline radius and
    /// subtended angle in radians.
    pub fn right_curve(self, radius: f64, arc: f64) -> Self {
        self.curve(SegmentKind::RightCurve, radius, arc)
    }

    fn curve(mut self, kind: SegmentKind, radius: f64, arc: f64) -> Self {
        let half = self.width / 2.0;
        let left = self.cursor.left_normal();
        let pos = self.cursor.position;
        let heading = self.cursor.heading;

        // Left curves rotate counter-clockwise about a center on the left
        // side; right curves mirror both.
        let (center, signed_arc) = match kind {
            SegmentKind::RightCurve => (
                Point2::new(pos.x - left.x * radius, pos.y - left.y * radius),
                -arc,
            ),
            _ => (
                Point2::new(pos.x + left.x * radius, pos.y + left.y * radius),
                arc,
            ),
        };

        let start_left = Point2::new(pos.x + left.x * half, pos.y + left.y * half);
        let start_right = Point2::new(pos.x - left.x * half, pos.y - left.y * half);
        let end_left = start_left.rotate_about(center, signed_arc);
        let end_right = start_right.rotate_about(center, signed_arc);

        self.segments.push(PathSegment {
            kind,
            length: radius * arc,
            arc,
            radius,
            center,
            vertices: SegmentVertices { start_left, start_right, end_left, end_right },
            start_angle: heading,
            width: self.width,
            friction: self.friction,
            next: SegmentId(0),
            prev: SegmentId(0),
        });
        self.cursor.position = pos.rotate_about(center, signed_arc);
        self.cursor.heading = heading + signed_arc;
        self
    }

    /// Wires the cyclic ring links and returns the raw arena without
    /// validation. Test hook for assembling broken rings.
    pub fn into_segments(self) -> Vec<PathSegment> {
        let count = self.segments.len();
        let mut segments = self.segments;
        for (index, seg) in segments.iter_mut().enumerate() {
            seg.next = SegmentId((index + 1) % count);
            seg.prev = SegmentId((index + count - 1) % count);
        }
        segments
    }

    /// Wires the ring and validates it into a [`Track`].
    pub fn build(self, name: impl Into<String>) -> Result<Track> {
        Track::new(name, self.into_segments())
    }
}

impl Default for TrackBuilder {
    fn default() -> Self {
        Self::new()
    }
}
