use super::transform::Transform;
use super::vec2::Vec2;

/// A directed segment from `begin` to `end`.
///
/// Its [`normal`](LineSegment::normal) points to the right of the direction
/// of travel, which is the outside of a counter-clockwise polygon. Signed
/// distances are positive on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub begin: Vec2,
    pub end: Vec2,
}

impl LineSegment {
    pub fn new(begin: Vec2, end: Vec2) -> Self {
        Self { begin, end }
    }

    /// Returns the direction vector of the segment (from begin to end).
    pub fn direction(&self) -> Vec2 {
        self.end - self.begin
    }

    /// Unit normal, `(dy, -dx)` normalized.
    pub fn normal(&self) -> Vec2 {
        let d = self.direction();
        Vec2::new(d.y, -d.x).normalize()
    }

    pub fn length(&self) -> f64 {
        self.begin.distance(self.end)
    }

    pub fn length_squared(&self) -> f64 {
        self.begin.distance_squared(self.end)
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.begin + self.end) * 0.5
    }

    /// Same segment walked the other way; the normal flips with it.
    pub fn flipped(&self) -> Self {
        Self::new(self.end, self.begin)
    }

    pub fn transform(&self, xf: &Transform) -> Self {
        Self::new(xf.apply(self.begin), xf.apply(self.end))
    }

    pub fn inverse_transform(&self, xf: &Transform) -> Self {
        Self::new(xf.apply_inverse(self.begin), xf.apply_inverse(self.end))
    }

    /// Distance from the infinite line through this segment to `point`.
    /// With `signed`, points on the normal side are positive.
    /// A zero-length segment measures from `begin`.
    pub fn distance_to_point(&self, point: Vec2, signed: bool) -> f64 {
        if self.length_squared() < 1e-24 {
            return point.distance(self.begin);
        }
        let distance = (point - self.begin).dot(self.normal());
        if signed {
            distance
        } else {
            distance.abs()
        }
    }

    /// True when `point` lies on the line or on the side opposite the normal.
    pub fn below(&self, point: Vec2) -> bool {
        (point - self.begin).dot(self.normal()) <= 0.0
    }

    /// Finds the point on the segment closest to `point`.
    /// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
    pub fn closest_point(&self, point: Vec2) -> (Vec2, f64) {
        let segment_vec = self.direction();
        let length_sq = segment_vec.magnitude_squared();
        if length_sq < 1e-12 {
            return (self.begin, 0.0);
        }
        let t = ((point - self.begin).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
        (self.begin + segment_vec * t, t)
    }

    /// Clips the segment against the half plane `dot(normalize(side_vector), p) <= length`.
    ///
    /// Returns `None` unless two points survive, which is how callers learn
    /// that the segment lies entirely outside.
    pub fn clip(&self, side_vector: Vec2, length: f64) -> Option<LineSegment> {
        let dir = side_vector.normalize();
        let near = dir.dot(self.begin) - length;
        let far = dir.dot(self.end) - length;

        let mut points = [Vec2::ZERO; 2];
        let mut count = 0;
        if near <= 0.0 {
            points[count] = self.begin;
            count += 1;
        }
        if far <= 0.0 {
            points[count] = self.end;
            count += 1;
        }
        if near * far < 0.0 && count < 2 {
            let clip_time = near / (near - far);
            points[count] = self.begin + self.direction() * clip_time;
            count += 1;
        }

        if count == 2 {
            Some(LineSegment::new(points[0], points[1]))
        } else {
            None
        }
    }

    /// Intersects two segments.
    /// Returns the parameter `t` along `self` of the crossing, or `None`
    /// when they miss or are parallel.
    pub fn intersect(&self, other: &LineSegment) -> Option<f64> {
        let d1 = self.direction();
        let d2 = other.direction();
        let denominator = d1.cross(d2);
        if denominator.abs() < 1e-12 {
            return None;
        }

        let delta_start = other.begin - self.begin;
        let t = delta_start.cross(d2) / denominator;
        let u = delta_start.cross(d1) / denominator;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
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
    fn test_line_segment_basics() {
        let line = LineSegment::new(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0));
        assert!((line.length() - 5.0).abs() < EPSILON);
        assert!((line.length_squared() - 25.0).abs() < EPSILON);
        assert_eq!(line.direction(), Vec2::new(3.0, 4.0));
        assert!(line.midpoint().approx_eq(Vec2::new(2.5, 4.0), EPSILON));
        assert_eq!(line.flipped().begin, line.end);
    }

    #[test]
    fn test_normal_points_right_of_travel() {
        // Travelling +x, the right-hand side in these axes is -y.
        let line = LineSegment::new(Vec2::ZERO, Vec2::new(2.0, 0.0));
        assert!(line.normal().approx_eq(Vec2::new(0.0, -1.0), EPSILON));
        assert!(line.flipped().normal().approx_eq(Vec2::new(0.0, 1.0), EPSILON));
    }

    #[test]
    fn test_signed_distance_and_below() {
        let line = LineSegment::new(Vec2::ZERO, Vec2::new(2.0, 0.0));
        let outside = Vec2::new(1.0, -3.0);
        let inside = Vec2::new(1.0, 0.5);
        assert!((line.distance_to_point(outside, true) - 3.0).abs() < EPSILON);
        assert!((line.distance_to_point(inside, true) - -0.5).abs() < EPSILON);
        assert!((line.distance_to_point(inside, false) - 0.5).abs() < EPSILON);
        assert!(!line.below(outside));
        assert!(line.below(inside));
        assert!(line.below(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let line = LineSegment::new(Vec2::ZERO, Vec2::new(4.0, 0.0));
        let (p, t) = line.closest_point(Vec2::new(2.0, 3.0));
        assert!(p.approx_eq(Vec2::new(2.0, 0.0), EPSILON));
        assert!((t - 0.5).abs() < EPSILON);

        let (p, t) = line.closest_point(Vec2::new(-3.0, 1.0));
        assert_eq!(p, Vec2::ZERO);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_clip_keeps_inside_part() {
        let line = LineSegment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        // keep x <= 4
        let clipped = line.clip(Vec2::new(1.0, 0.0), 4.0).unwrap();
        assert!(clipped.begin.approx_eq(Vec2::new(0.0, 0.0), EPSILON));
        assert!(clipped.end.approx_eq(Vec2::new(4.0, 0.0), EPSILON));

        // keep x >= 4, expressed as -x <= -4
        let clipped = line.clip(Vec2::new(-1.0, 0.0), -4.0).unwrap();
        assert!(clipped.begin.approx_eq(Vec2::new(10.0, 0.0), EPSILON));
        assert!(clipped.end.approx_eq(Vec2::new(4.0, 0.0), EPSILON));
    }

    #[test]
    fn test_clip_entirely_outside_is_none() {
        let line = LineSegment::new(Vec2::new(5.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(line.clip(Vec2::new(1.0, 0.0), 4.0).is_none());
    }

    #[test]
    fn test_intersect_segments() {
        let a = LineSegment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = LineSegment::new(Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0));
        let t = a.intersect(&b).unwrap();
        assert!((t - 0.5).abs() < EPSILON);

        let c = LineSegment::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 0.0));
        let d = LineSegment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(d.intersect(&c).is_none(), "crossing lies beyond the end of d");

        let parallel = LineSegment::new(Vec2::new(0.0, 1.0), Vec2::new(2.0, 3.0));
        assert!(a.intersect(&parallel).is_none());
    }
}
