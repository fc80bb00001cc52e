pub mod circle;
pub mod composite;
pub mod edge;
pub mod polygon;

pub use circle::{Circle, WorldCircle};
pub use composite::Composite;
pub use edge::Edge;
pub use polygon::{Polygon, WorldPolygon};

use crate::collision::AABB;
use crate::math::{LineSegment, Ray, Transform, Vec2};

/// Enum representing the geometric shape of a collider, in the body's local frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
    Edge(Edge),
    Composite(Composite),
}

impl Shape {
    /// Moment of inertia about the body origin for a body of `mass`.
    pub fn inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Circle(c) => c.inertia(mass),
            Shape::Polygon(p) => p.inertia(mass),
            Shape::Edge(e) => e.inertia(mass),
            Shape::Composite(c) => c.inertia(mass),
        }
    }

    pub fn local_bounds(&self) -> AABB {
        match self {
            Shape::Circle(c) => c.local_bounds(),
            Shape::Polygon(p) => p.local_bounds(),
            Shape::Edge(e) => e.local_bounds(),
            Shape::Composite(c) => c.local_bounds(),
        }
    }

    pub fn local_center(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Polygon(p) => p.centroid(),
            Shape::Edge(e) => e.segment().midpoint(),
            Shape::Composite(c) => c.local_center(),
        }
    }

    pub fn to_world(&self, xf: &Transform) -> WorldShape {
        match self {
            Shape::Circle(c) => WorldShape::Circle(c.to_world(xf)),
            Shape::Polygon(p) => WorldShape::Polygon(p.to_world(xf)),
            Shape::Edge(e) => WorldShape::Edge(e.to_world(xf)),
            Shape::Composite(c) => WorldShape::Composite(c.shapes().iter().map(|s| s.to_world(xf)).collect()),
        }
    }

    /// Recomputes `out` for a new transform, reusing polygon buffers when
    /// `out` already has the matching layout.
    pub fn write_world(&self, xf: &Transform, out: &mut WorldShape) {
        match (self, out) {
            (Shape::Polygon(p), WorldShape::Polygon(world)) => p.write_world(xf, world),
            (Shape::Composite(c), WorldShape::Composite(children)) if children.len() == c.shapes().len() => {
                for (shape, child) in c.shapes().iter().zip(children.iter_mut()) {
                    shape.write_world(xf, child);
                }
            }
            (shape, out) => *out = shape.to_world(xf),
        }
    }
}

/// A shape placed in world space. Cached on the collider and refreshed
/// whenever the owning body moves.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Circle(WorldCircle),
    Polygon(WorldPolygon),
    Edge(LineSegment),
    Composite(Vec<WorldShape>),
}

impl WorldShape {
    pub fn bounds(&self) -> AABB {
        match self {
            WorldShape::Circle(c) => c.bounds(),
            WorldShape::Polygon(p) => p.bounds(),
            WorldShape::Edge(e) => AABB::new(e.begin, e.end),
            WorldShape::Composite(children) => {
                let mut iter = children.iter().map(WorldShape::bounds);
                let first = iter.next().unwrap_or_else(|| AABB::new(Vec2::ZERO, Vec2::ZERO));
                iter.fold(first, |acc, b| acc.combine(&b))
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            WorldShape::Circle(c) => c.center,
            WorldShape::Polygon(p) => p.center,
            WorldShape::Edge(e) => e.midpoint(),
            WorldShape::Composite(children) => {
                let sum = children.iter().fold(Vec2::ZERO, |acc, c| acc + c.center());
                sum / children.len().max(1) as f64
            }
        }
    }

    /// Point containment. Edges have no interior and contain nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            WorldShape::Circle(c) => c.contains(point),
            WorldShape::Polygon(p) => p.contains(point),
            WorldShape::Edge(_) => false,
            WorldShape::Composite(children) => children.iter().any(|c| c.contains(point)),
        }
    }

    /// Distance along `ray` to the nearest surface within `max_distance`.
    pub fn ray_cast(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        match self {
            WorldShape::Circle(c) => c.ray_cast(ray, max_distance),
            WorldShape::Polygon(p) => p.ray_cast(ray, max_distance),
            WorldShape::Edge(e) => ray.intersect_segment(e).filter(|&t| t <= max_distance),
            WorldShape::Composite(children) => children
                .iter()
                .filter_map(|c| c.ray_cast(ray, max_distance))
                .min_by(|a, b| a.total_cmp(b)),
        }
    }
}
