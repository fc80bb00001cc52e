// Axis-aligned bounding boxes used by both broad-phase strategies.

use crate::math::{Ray, Vec2};

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, ordering the corners so that `min <= max`.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        AABB::new(center - half_extents, center + half_extents)
    }

    /// Creates an AABB that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min_pt = *first;
        let mut max_pt = *first;
        for point in rest {
            min_pt.x = min_pt.x.min(point.x);
            min_pt.y = min_pt.y.min(point.y);
            max_pt.x = max_pt.x.max(point.x);
            max_pt.y = max_pt.y.max(point.y);
        }
        Some(AABB::new(min_pt, max_pt))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// 2D analogue of surface area, used as the tree insertion cost.
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Strict overlap test. Boxes that only touch, or overlap by no more than
    /// `epsilon`, do not count.
    pub fn overlaps(&self, other: &AABB, epsilon: f64) -> bool {
        let x_overlap = self.max.x - epsilon > other.min.x && self.min.x + epsilon < other.max.x;
        let y_overlap = self.max.y - epsilon > other.min.y && self.min.y + epsilon < other.max.y;
        x_overlap && y_overlap
    }

    /// Inclusive overlap test: touching boxes intersect.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.max.x >= other.min.x
            && self.min.x <= other.max.x
            && self.max.y >= other.min.y
            && self.min.y <= other.max.y
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &AABB) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Merges another AABB into this one, expanding this AABB to contain both.
    pub fn merge(&mut self, other: &AABB) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    /// Smallest box containing both.
    pub fn combine(&self, other: &AABB) -> AABB {
        let mut out = *self;
        out.merge(other);
        out
    }

    /// Grows the box by `padding` on every side.
    pub fn expanded(&self, padding: f64) -> AABB {
        let pad = Vec2::new(padding, padding);
        AABB::new(self.min - pad, self.max + pad)
    }

    pub fn translated(&self, offset: Vec2) -> AABB {
        AABB {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab test: does the ray enter this box within `max_distance`?
    pub fn ray_cast(&self, ray: &Ray, max_distance: f64) -> bool {
        let mut t_min = 0.0_f64;
        let mut t_max = max_distance;

        for (origin, dir, lo, hi) in [
            (ray.origin.x, ray.direction.x, self.min.x, self.max.x),
            (ray.origin.y, ray.direction.y, self.min.y, self.max.y),
        ] {
            if dir.abs() < 1e-12 {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t1 = (lo - origin) * inv;
            let mut t2 = (hi - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-12;

    fn unit_box_at(x: f64, y: f64) -> AABB {
        AABB::new(Vec2::new(x, y), Vec2::new(x + 1.0, y + 1.0))
    }

    #[test]
    fn test_aabb_new_orders_corners() {
        let b = AABB::new(Vec2::new(3.0, -1.0), Vec2::new(1.0, 2.0));
        assert_eq!(b.min, Vec2::new(1.0, -1.0));
        assert_eq!(b.max, Vec2::new(3.0, 2.0));
        assert!((b.width() - 2.0).abs() < EPSILON);
        assert!((b.height() - 3.0).abs() < EPSILON);
        assert!((b.perimeter() - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_aabb_from_points() {
        assert!(AABB::from_points(&[]).is_none());
        let b = AABB::from_points(&[Vec2::new(1.0, 5.0), Vec2::new(-2.0, 3.0), Vec2::new(0.0, 7.0)]).unwrap();
        assert_eq!(b.min, Vec2::new(-2.0, 3.0));
        assert_eq!(b.max, Vec2::new(1.0, 7.0));
    }

    #[test]
    fn test_aabb_overlap_vs_touching() {
        let a = unit_box_at(0.0, 0.0);
        let touching = unit_box_at(1.0, 0.0);
        let overlapping = unit_box_at(0.5, 0.5);
        assert!(!a.overlaps(&touching, 0.0));
        assert!(a.intersects(&touching));
        assert!(a.overlaps(&overlapping, 0.0));
        assert!(!a.overlaps(&overlapping, 0.6));
    }

    #[test]
    fn test_aabb_contains_and_merge() {
        let mut a = unit_box_at(0.0, 0.0);
        let b = unit_box_at(3.0, 3.0);
        assert!(!a.contains(&b));
        a.merge(&b);
        assert!(a.contains(&b));
        assert!(a.contains(&unit_box_at(0.0, 0.0)));
        assert!(a.contains_point(Vec2::new(2.0, 2.0)));
        assert_eq!(unit_box_at(0.0, 0.0).combine(&b), a);
    }

    #[test]
    fn test_aabb_zero_area_box() {
        let p = AABB::new(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        assert!((p.perimeter()).abs() < EPSILON);
        assert!(unit_box_at(1.5, 1.5).intersects(&p));
        assert!(p.expanded(1.0).contains_point(Vec2::new(1.0, 3.0)));
    }

    #[test]
    fn test_aabb_ray_cast() {
        let b = unit_box_at(5.0, 0.0);
        let ray = Ray::new(Vec2::new(0.0, 0.5), Vec2::RIGHT);
        assert!(b.ray_cast(&ray, 10.0));
        assert!(!b.ray_cast(&ray, 4.0));
        let away = Ray::new(Vec2::new(0.0, 0.5), Vec2::LEFT);
        assert!(!b.ray_cast(&away, 100.0));
        let above = Ray::new(Vec2::new(0.0, -2.0), Vec2::RIGHT);
        assert!(!b.ray_cast(&above, 100.0));
    }
}
