//! Separating-axis queries used by the narrow phase.

use crate::math::{LineSegment, Vec2};
use crate::shapes::{WorldCircle, WorldPolygon};

/// Best separating side found on one polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationInfo {
    /// Signed distance along `axis`; negative when overlapping.
    pub separation: f64,
    /// Outward normal of `side`.
    pub axis: Vec2,
    pub side: LineSegment,
    pub side_index: usize,
    /// Deepest point of the other polygon against `side`.
    pub point: Vec2,
}

/// For every side of `a`, measures how far the deepest point of `b` lies
/// outside it and keeps the largest. A positive result means `a`'s side is
/// a separating axis.
pub fn find_polygon_separation(a: &WorldPolygon, b: &WorldPolygon) -> SeparationInfo {
    let mut best = SeparationInfo {
        separation: f64::NEG_INFINITY,
        axis: Vec2::ZERO,
        side: a.side(0),
        side_index: 0,
        point: b.points[0],
    };
    for (i, side) in a.sides().enumerate() {
        let axis = side.normal();
        let point = b.support(-axis);
        let separation = side.distance_to_point(point, true);
        if separation > best.separation {
            best = SeparationInfo {
                separation,
                axis,
                side,
                side_index: i,
                point,
            };
        }
    }
    best
}

/// Minimum overlap between a circle and a polygon over the polygon's side
/// normals and the axis through the polygon vertex closest to the circle.
///
/// Returns the overlap and the axis oriented from the circle to the polygon,
/// or `None` when some axis separates them.
pub fn find_circle_polygon_overlap(circle: &WorldCircle, polygon: &WorldPolygon) -> Option<(f64, Vec2)> {
    let closest_vertex = polygon
        .points
        .iter()
        .copied()
        .min_by(|p, q| {
            p.distance_squared(circle.center)
                .total_cmp(&q.distance_squared(circle.center))
        })?;
    let vertex_axis = (closest_vertex - circle.center).normalize();

    let mut min_overlap = f64::INFINITY;
    let mut min_axis = Vec2::ZERO;
    let axes = polygon
        .sides()
        .map(|side| side.normal())
        .chain(std::iter::once(vertex_axis))
        .filter(|axis| *axis != Vec2::ZERO);
    for axis in axes {
        let overlap = circle.project(axis).overlap(&polygon.project(axis));
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = axis;
        }
    }

    if (polygon.center - circle.center).dot(min_axis) < 0.0 {
        min_axis = -min_axis;
    }
    Some((min_overlap, min_axis))
}
