use super::Shape;
use crate::collision::AABB;
use crate::common::{PhysicsError, Result};
use crate::math::Vec2;

/// Several shapes attached to one body.
///
/// Nested composites are flattened on construction, so `shapes()` never
/// yields a `Shape::Composite`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Composite {
    shapes: Vec<Shape>,
}

impl Composite {
    pub fn new(shapes: Vec<Shape>) -> Result<Self> {
        let mut flat = Vec::with_capacity(shapes.len());
        for shape in shapes {
            match shape {
                Shape::Composite(inner) => flat.extend(inner.shapes),
                other => flat.push(other),
            }
        }
        if flat.is_empty() {
            return Err(PhysicsError::InvalidShape("composite needs at least one shape"));
        }
        Ok(Self { shapes: flat })
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Mass is split evenly across children.
    pub fn inertia(&self, mass: f64) -> f64 {
        let share = mass / self.shapes.len() as f64;
        self.shapes.iter().map(|s| s.inertia(share)).sum()
    }

    pub fn local_bounds(&self) -> AABB {
        let mut iter = self.shapes.iter().map(Shape::local_bounds);
        let first = iter.next().unwrap_or_else(|| AABB::new(Vec2::ZERO, Vec2::ZERO));
        iter.fold(first, |acc, b| acc.combine(&b))
    }

    pub fn local_center(&self) -> Vec2 {
        let sum = self.shapes.iter().fold(Vec2::ZERO, |acc, s| acc + s.local_center());
        sum / self.shapes.len() as f64
    }
}
