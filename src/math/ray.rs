use super::line_segment::LineSegment;
use super::vec2::Vec2;

/// A half-infinite line. `direction` is kept normalized so that ray
/// parameters are distances.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, distance: f64) -> Vec2 {
        self.origin + self.direction * distance
    }

    /// Distance along the ray to where it crosses `segment`, if it does.
    pub fn intersect_segment(&self, segment: &LineSegment) -> Option<f64> {
        let seg_dir = segment.direction();
        let denominator = self.direction.cross(seg_dir);
        if denominator.abs() < 1e-12 {
            return None;
        }
        let delta = segment.begin - self.origin;
        let t = delta.cross(seg_dir) / denominator;
        let u = delta.cross(self.direction) / denominator;
        if t >= 0.0 && (0.0..=1.0).contains(&u) {
            Some(t)
        } else {
            None
        }
    }
}
