use crate::collision::AABB;
use crate::common::{PhysicsError, Result};
use crate::math::{LineSegment, Projection, Ray, Transform, Vec2};

/// A polygon defined by its vertices in the body's local frame.
///
/// Vertices are stored counter-clockwise (positive signed area); the
/// constructor reverses clockwise input. Collision routines assume the
/// polygon is convex. Concave outlines should be split with
/// [`triangulate`](Polygon::triangulate) and wrapped in a
/// [`Composite`](super::Composite).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices.
    ///
    /// Fails with fewer than 3 vertices, non-finite vertices or zero area.
    pub fn new(mut points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 3 {
            return Err(PhysicsError::InvalidShape("polygon needs at least 3 points"));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(PhysicsError::InvalidShape("polygon points must be finite"));
        }
        let signed_area = signed_area(&points);
        if signed_area.abs() < 1e-10 {
            return Err(PhysicsError::InvalidShape("polygon area must be non-zero"));
        }
        if signed_area < 0.0 {
            points.reverse();
        }

        let polygon = Polygon { points };
        if !polygon.is_convex() {
            log::warn!(
                "polygon with {} points is concave; triangulate() it before using it as a collider",
                polygon.points.len()
            );
        }
        Ok(polygon)
    }

    /// Axis-aligned box centered on the body origin.
    pub fn box_shape(width: f64, height: f64) -> Result<Self> {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`.
    pub fn regular(sides: usize, radius: f64) -> Result<Self> {
        let step = std::f64::consts::TAU / sides as f64;
        Self::new(
            (0..sides)
                .map(|i| Vec2::new(radius, 0.0).rotate(step * i as f64))
                .collect(),
        )
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Local-space sides, in winding order.
    pub fn sides(&self) -> impl Iterator<Item = LineSegment> + '_ {
        sides_of(&self.points)
    }

    /// Outward unit normals of each side.
    pub fn axes(&self) -> Vec<Vec2> {
        self.sides().map(|side| side.normal()).collect()
    }

    /// True when every turn along the outline bends the same way.
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            (b - a).cross(c - b) >= -1e-12
        })
    }

    /// Calculates the area of the polygon using the Shoelace formula.
    pub fn area(&self) -> f64 {
        signed_area(&self.points).abs()
    }

    /// Calculates the centroid (center of mass for uniform density) of the polygon.
    pub fn centroid(&self) -> Vec2 {
        let origin = self.points[0];
        let mut centroid = Vec2::ZERO;
        let mut signed_area_sum = 0.0;

        for i in 1..(self.points.len() - 1) {
            let v2 = self.points[i];
            let v3 = self.points[i + 1];
            let triangle_signed_area = (v2 - origin).cross(v3 - origin) / 2.0;
            signed_area_sum += triangle_signed_area;
            centroid += (origin + v2 + v3) / 3.0 * triangle_signed_area;
        }

        centroid / signed_area_sum
    }

    /// Calculates the moment of inertia for the polygon (with density=1) about the origin (0,0).
    fn unit_density_inertia(&self) -> f64 {
        let mut inertia_sum = 0.0;
        for side in self.sides() {
            let (v1, v2) = (side.begin, side.end);
            inertia_sum += v1.cross(v2) * (v1.magnitude_squared() + v1.dot(v2) + v2.magnitude_squared());
        }
        inertia_sum / 12.0
    }

    /// Moment of inertia about the body origin for a uniform body of `mass`.
    pub fn inertia(&self, mass: f64) -> f64 {
        self.unit_density_inertia() * mass / self.area()
    }

    pub fn local_bounds(&self) -> AABB {
        bounds_of(&self.points)
    }

    /// Point containment in the polygon's own frame. Points on a side count
    /// as inside.
    pub fn contains_local(&self, point: Vec2) -> bool {
        if self.is_convex() {
            return self.sides().all(|side| side.below(point));
        }
        WorldPolygon::from_points(self.points.clone()).contains(point)
    }

    /// Splits the polygon into a fan of triangles around its first vertex.
    /// Only meaningful for convex or star-shaped outlines.
    pub fn tessellate(&self) -> Vec<Polygon> {
        let first = self.points[0];
        self.points[1..]
            .windows(2)
            .filter_map(|w| Polygon::new(vec![first, w[0], w[1]]).ok())
            .collect()
    }

    /// Ear-clipping triangulation. Works for any simple polygon, convex or not.
    pub fn triangulate(&self) -> Vec<Polygon> {
        let pts = &self.points;
        let mut remaining: Vec<usize> = (0..pts.len()).collect();
        let mut triangles = Vec::with_capacity(pts.len().saturating_sub(2));

        while remaining.len() > 3 {
            let m = remaining.len();
            let ear = (0..m).find(|&i| {
                let prev = pts[remaining[(i + m - 1) % m]];
                let curr = pts[remaining[i]];
                let next = pts[remaining[(i + 1) % m]];
                if (curr - prev).cross(next - curr) <= 0.0 {
                    return false;
                }
                remaining.iter().all(|&j| {
                    let p = pts[j];
                    p == prev || p == curr || p == next || !point_in_triangle(p, prev, curr, next)
                })
            });

            let Some(i) = ear else {
                log::warn!("ear clipping stalled with {} vertices left; outline is not simple", m);
                break;
            };
            let prev = pts[remaining[(i + m - 1) % m]];
            let curr = pts[remaining[i]];
            let next = pts[remaining[(i + 1) % m]];
            if let Ok(triangle) = Polygon::new(vec![prev, curr, next]) {
                triangles.push(triangle);
            }
            remaining.remove(i);
        }

        if remaining.len() == 3 {
            if let Ok(triangle) = Polygon::new(remaining.iter().map(|&i| pts[i]).collect()) {
                triangles.push(triangle);
            }
        }
        triangles
    }

    pub fn to_world(&self, xf: &Transform) -> WorldPolygon {
        let mut world = WorldPolygon {
            points: Vec::with_capacity(self.points.len()),
            center: Vec2::ZERO,
        };
        self.write_world(xf, &mut world);
        world
    }

    /// Like [`to_world`](Polygon::to_world) but reuses `out`'s allocation.
    pub fn write_world(&self, xf: &Transform, out: &mut WorldPolygon) {
        out.points.clear();
        out.points.extend(self.points.iter().map(|&p| xf.apply(p)));
        out.center = xf.apply(self.centroid());
    }
}

/// A convex polygon placed in world space, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPolygon {
    pub points: Vec<Vec2>,
    pub center: Vec2,
}

impl WorldPolygon {
    /// Builds a world polygon directly from world points, fixing the winding.
    pub fn from_points(mut points: Vec<Vec2>) -> Self {
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        let center = points.iter().fold(Vec2::ZERO, |acc, &p| acc + p) / points.len().max(1) as f64;
        Self { points, center }
    }

    pub fn sides(&self) -> impl Iterator<Item = LineSegment> + '_ {
        sides_of(&self.points)
    }

    pub fn side(&self, index: usize) -> LineSegment {
        let n = self.points.len();
        LineSegment::new(self.points[index % n], self.points[(index + 1) % n])
    }

    /// Vertex furthest along `direction`.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let mut best = self.points[0];
        let mut best_dot = best.dot(direction);
        for &p in &self.points[1..] {
            let d = p.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = p;
            }
        }
        best
    }

    /// Side whose outward normal is most aligned with `direction`.
    pub fn find_side(&self, direction: Vec2) -> (usize, LineSegment) {
        let mut best = (0, self.side(0));
        let mut best_dot = f64::NEG_INFINITY;
        for (i, side) in self.sides().enumerate() {
            let d = side.normal().dot(direction);
            if d > best_dot {
                best_dot = d;
                best = (i, side);
            }
        }
        best
    }

    /// Projects onto a unit `axis`.
    pub fn project(&self, axis: Vec2) -> Projection {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in &self.points {
            let d = p.dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        Projection::new(min, max)
    }

    pub fn bounds(&self) -> AABB {
        bounds_of(&self.points)
    }

    /// Even-odd containment test; also correct for concave outlines.
    pub fn contains(&self, point: Vec2) -> bool {
        let mut inside = false;
        for side in self.sides() {
            let (a, b) = (side.begin, side.end);
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Distance along `ray` to the nearest side it crosses.
    pub fn ray_cast(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        self.sides()
            .filter_map(|side| ray.intersect_segment(&side))
            .filter(|&t| t <= max_distance)
            .min_by(|a, b| a.total_cmp(b))
    }
}

fn signed_area(points: &[Vec2]) -> f64 {
    let n = points.len();
    (0..n).map(|i| points[i].cross(points[(i + 1) % n])).sum::<f64>() / 2.0
}

fn sides_of(points: &[Vec2]) -> impl Iterator<Item = LineSegment> + '_ {
    let n = points.len();
    (0..n).map(move |i| LineSegment::new(points[i], points[(i + 1) % n]))
}

fn bounds_of(points: &[Vec2]) -> AABB {
    AABB::from_points(points).unwrap_or_else(|| AABB::new(Vec2::ZERO, Vec2::ZERO))
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).cross(p - a);
    let d2 = (c - b).cross(p - b);
    let d3 = (a - c).cross(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}
