use crate::collision::AABB;
use crate::common::{PhysicsError, Result};
use crate::math::{LineSegment, Transform, Vec2};

/// A line segment collider, typically used for static ground.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub begin: Vec2,
    pub end: Vec2,
}

impl Edge {
    pub fn new(begin: Vec2, end: Vec2) -> Result<Self> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(PhysicsError::InvalidShape("edge points must be finite"));
        }
        if begin.distance_squared(end) < 1e-12 {
            return Err(PhysicsError::InvalidShape("edge must have non-zero length"));
        }
        Ok(Self { begin, end })
    }

    pub fn segment(&self) -> LineSegment {
        LineSegment::new(self.begin, self.end)
    }

    pub fn length(&self) -> f64 {
        self.begin.distance(self.end)
    }

    pub fn local_bounds(&self) -> AABB {
        AABB::new(self.begin, self.end)
    }

    pub fn inertia(&self, mass: f64) -> f64 {
        let half = self.length() / 2.0;
        mass * half * half
    }

    pub fn to_world(&self, xf: &Transform) -> LineSegment {
        self.segment().transform(xf)
    }
}
