use crate::collision::AABB;
use crate::common::{PhysicsError, Result};
use crate::math::{Projection, Ray, Transform, Vec2};

/// A circle in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    pub radius: f64,
    /// Offset of the circle's center from the body origin.
    pub center: Vec2,
}

impl Circle {
    /// Circle centered on the body origin.
    pub fn new(radius: f64) -> Result<Self> {
        Self::with_center(radius, Vec2::ZERO)
    }

    pub fn with_center(radius: f64, center: Vec2) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidShape("circle radius must be positive and finite"));
        }
        if !center.is_finite() {
            return Err(PhysicsError::InvalidShape("circle center must be finite"));
        }
        Ok(Self { radius, center })
    }

    pub fn local_bounds(&self) -> AABB {
        AABB::from_center_half_extents(self.center, Vec2::new(self.radius, self.radius))
    }

    /// Moment of inertia about the body origin (solid disc plus parallel axis term).
    pub fn inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius + mass * self.center.magnitude_squared()
    }

    pub fn to_world(&self, xf: &Transform) -> WorldCircle {
        WorldCircle {
            center: xf.apply(self.center),
            radius: self.radius,
        }
    }
}

/// A circle placed in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCircle {
    pub center: Vec2,
    pub radius: f64,
}

impl WorldCircle {
    /// Point on the circle furthest along `direction`.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        self.center + direction.normalize() * self.radius
    }

    /// Projects onto a unit `axis`.
    pub fn project(&self, axis: Vec2) -> Projection {
        let c = self.center.dot(axis);
        Projection::new(c - self.radius, c + self.radius)
    }

    pub fn bounds(&self) -> AABB {
        AABB::from_center_half_extents(self.center, Vec2::new(self.radius, self.radius))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Distance along `ray` to the first crossing of the circle boundary.
    pub fn ray_cast(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        let to_origin = ray.origin - self.center;
        let b = to_origin.dot(ray.direction);
        let c = to_origin.magnitude_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        let t = if near >= 0.0 { near } else { far };
        if t >= 0.0 && t <= max_distance {
            Some(t)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_circle_new() {
        let c = Circle::new(5.0).unwrap();
        assert_eq!(c.radius, 5.0);
        assert_eq!(c.center, Vec2::ZERO);
    }

    #[test]
    fn test_circle_rejects_degenerate_radius() {
        assert!(Circle::new(-1.0).is_err());
        assert!(Circle::new(0.0).is_err());
        assert!(Circle::new(f64::NAN).is_err());
        assert!(Circle::with_center(1.0, Vec2::new(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_circle_inertia() {
        let c = Circle::new(2.0).unwrap();
        assert!((c.inertia(3.0) - 6.0).abs() < EPSILON);
        let offset = Circle::with_center(2.0, Vec2::new(1.0, 0.0)).unwrap();
        assert!((offset.inertia(3.0) - 9.0).abs() < EPSILON);
    }

    #[test]
    fn test_world_circle_queries() {
        let xf = Transform::new(Vec2::new(10.0, 0.0), std::f64::consts::PI);
        let world = Circle::with_center(1.0, Vec2::new(2.0, 0.0)).unwrap().to_world(&xf);
        assert!(world.center.approx_eq(Vec2::new(8.0, 0.0), EPSILON));
        assert!(world.support(Vec2::new(0.0, 5.0)).approx_eq(Vec2::new(8.0, 1.0), EPSILON));
        assert!(world.contains(Vec2::new(8.5, 0.5)));
        assert!(!world.contains(Vec2::new(9.5, 0.5)));

        let p = world.project(Vec2::RIGHT);
        assert!((p.min - 7.0).abs() < EPSILON);
        assert!((p.max - 9.0).abs() < EPSILON);
    }

    #[test]
    fn test_world_circle_ray_cast() {
        let world = WorldCircle {
            center: Vec2::new(5.0, 0.0),
            radius: 1.0,
        };
        let ray = Ray::new(Vec2::ZERO, Vec2::RIGHT);
        assert!((world.ray_cast(&ray, 100.0).unwrap() - 4.0).abs() < EPSILON);
        assert!(world.ray_cast(&ray, 3.0).is_none());
        let inside = Ray::new(Vec2::new(5.0, 0.0), Vec2::RIGHT);
        assert!((world.ray_cast(&inside, 100.0).unwrap() - 1.0).abs() < EPSILON);
        let miss = Ray::new(Vec2::new(0.0, 3.0), Vec2::RIGHT);
        assert!(world.ray_cast(&miss, 100.0).is_none());
    }
}
