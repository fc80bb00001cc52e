pub mod line_segment;
pub mod projection;
pub mod ray;
pub mod transform;
pub mod vec2;

pub use line_segment::LineSegment;
pub use projection::Projection;
pub use ray::Ray;
pub use transform::Transform;
pub use vec2::Vec2;

/// Clamps `value` into `[min, max]` without panicking when the bounds cross.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
