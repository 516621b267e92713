//! Point resolution on the track surface
//!
//! Maps a track position plus a lateral offset to world coordinates, for
//! both straight and curved segments, and derives the track tangent used
//! for heading-error computation. These run on every tick and never fail;
//! degenerate segment dimensions fall back to the unadvanced anchor point
//! instead of dividing by zero.

use std::f64::consts::PI;

use crate::track::{Point2, SegmentKind, Track, TrackPosition};

/// Resolves a lateral offset at the given position into world coordinates.
///
/// `lateral_offset` spans −1 (right edge) to +1 (left edge); values outside
/// that range extrapolate beyond the track boundary. The offset is remapped
/// to a blend factor over the start-left/start-right vertices, then the
/// blended anchor is carried down the segment: advanced along the direction
/// vector on straights, rotated about the curve center on curves
/// (right-hand curves sweep clockwise).
pub fn resolve_point(track: &Track, position: &TrackPosition, lateral_offset: f64) -> Point2 {
    let seg = track.segment(position.segment);
    let blend = (lateral_offset + 1.0) / 2.0;
    let sl = seg.vertices.start_left;
    let sr = seg.vertices.start_right;
    let anchor = Point2::new(
        sl.x * blend + sr.x * (1.0 - blend),
        sl.y * blend + sr.y * (1.0 - blend),
    );
    let distance = track.distance_from_segment_start(position);

    match seg.kind {
        SegmentKind::Straight => {
            if seg.length <= 0.0 {
                return anchor;
            }
            let el = seg.vertices.end_left;
            // All four boundary vertices advance in parallel, so the left
            // edge supplies the direction for every lateral offset.
            Point2::new(
                anchor.x + (el.x - sl.x) / seg.length * distance,
                anchor.y + (el.y - sl.y) / seg.length * distance,
            )
        }
        kind => {
            if seg.radius <= 0.0 {
                return anchor;
            }
            let mut arc = distance / seg.radius;
            if kind == SegmentKind::RightCurve {
                arc = -arc;
            }
            anchor.rotate_about(seg.center, arc)
        }
    }
}

/// Right and left track boundary points at the current position.
pub fn edge_points(track: &Track, position: &TrackPosition) -> (Point2, Point2) {
    (
        resolve_point(track, position, -1.0),
        resolve_point(track, position, 1.0),
    )
}

/// Track tangent direction at the position, in radians.
///
/// Straights keep their start angle; curves sweep it by the stored offset,
/// which is the swept angle on curved segments.
pub fn tangent_angle(track: &Track, position: &TrackPosition) -> f64 {
    let seg = track.segment(position.segment);
    match seg.kind {
        SegmentKind::Straight => seg.start_angle,
        SegmentKind::LeftCurve => seg.start_angle + position.to_start,
        SegmentKind::RightCurve => seg.start_angle - position.to_start,
    }
}

/// Normalizes an angle into [−π, π].
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{SegmentId, TrackBuilder};
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOL: f64 = 1e-9;

    fn assert_close(a: Point2, b: Point2) {
        assert!(
            (a.x - b.x).abs() < TOL && (a.y - b.y).abs() < TOL,
            "{a:?} != {b:?}"
        );
    }

    fn hook() -> Track {
        TrackBuilder::new()
            .width(10.0)
            .straight(100.0)
            .left_curve(50.0, FRAC_PI_2)
            .right_curve(50.0, FRAC_PI_2)
            .straight(100.0)
            .build("hook")
            .unwrap()
    }

    #[test]
    fn extreme_offsets_recover_the_start_vertices() {
        let track = hook();
        for id in 0..track.segment_count() {
            let seg = track.segment(SegmentId::new(id));
            let at_start = TrackPosition::new(SegmentId::new(id), 0.0, 0.0);
            assert_close(resolve_point(&track, &at_start, -1.0), seg.vertices.start_right);
            assert_close(resolve_point(&track, &at_start, 1.0), seg.vertices.start_left);
        }
    }

    #[test]
    fn full_traversal_recovers_the_end_vertices() {
        let track = hook();
        for id in 0..track.segment_count() {
            let seg = track.segment(SegmentId::new(id));
            // Offset convention differs per kind: run length on straights,
            // full arc on curves.
            let to_start = match seg.kind {
                SegmentKind::Straight => seg.length,
                _ => seg.arc,
            };
            let at_end = TrackPosition::new(SegmentId::new(id), to_start, 0.0);
            assert_close(resolve_point(&track, &at_end, -1.0), seg.vertices.end_right);
            assert_close(resolve_point(&track, &at_end, 1.0), seg.vertices.end_left);
        }
    }

    #[test]
    fn centerline_blend_is_the_vertex_midpoint() {
        let track = hook();
        let pos = TrackPosition::new(SegmentId::new(0), 0.0, 0.0);
        let mid = resolve_point(&track, &pos, 0.0);
        assert_close(mid, Point2::new(0.0, 0.0));
    }

    #[test]
    fn straight_advance_is_linear_in_distance() {
        let track = hook();
        let pos = TrackPosition::new(SegmentId::new(0), 40.0, 0.0);
        assert_close(resolve_point(&track, &pos, 0.0), Point2::new(40.0, 0.0));
    }

    #[test]
    fn edge_points_orders_right_then_left() {
        let track = hook();
        let pos = TrackPosition::new(SegmentId::new(0), 0.0, 0.0);
        let (right, left) = edge_points(&track, &pos);
        assert_close(right, Point2::new(0.0, -5.0));
        assert_close(left, Point2::new(0.0, 5.0));
    }

    #[test]
    fn tangent_follows_the_swept_angle_on_curves() {
        let track = hook();

        let start_of_straight = TrackPosition::new(SegmentId::new(0), 17.0, 0.0);
        assert!((tangent_angle(&track, &start_of_straight) - 0.0).abs() < TOL);

        let mid_left = TrackPosition::new(SegmentId::new(1), FRAC_PI_2 / 2.0, 0.0);
        assert!((tangent_angle(&track, &mid_left) - FRAC_PI_2 / 2.0).abs() < TOL);

        // The right curve starts at π/2 and sweeps back down.
        let mid_right = TrackPosition::new(SegmentId::new(2), FRAC_PI_2 / 2.0, 0.0);
        assert!((tangent_angle(&track, &mid_right) - FRAC_PI_2 / 2.0).abs() < TOL);
    }

    #[test]
    fn normalize_angle_wraps_into_pi_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < TOL);
        assert!((normalize_angle(-3.0 * PI) + PI).abs() < TOL);
        assert_eq!(normalize_angle(0.25), 0.25);
        assert_eq!(normalize_angle(-0.25), -0.25);
    }

    #[test]
    fn degenerate_segments_return_the_anchor() {
        let track = TrackBuilder::new()
            .straight(0.0)
            .straight(100.0)
            .build("stub")
            .unwrap();
        let pos = TrackPosition::new(SegmentId::new(0), 0.0, 0.0);
        let point = resolve_point(&track, &pos, 1.0);
        let seg = track.segment(SegmentId::new(0));
        assert_close(point, seg.vertices.start_left);
    }
}
