use crate::math::Vec2;
use crate::objects::{CollisionType, RigidBody};

/// Integrates the rigid body's state forward in time using Semi-Implicit Euler.
///
/// Fixed and sleeping bodies are left untouched, accumulators included.
pub fn integrate(body: &mut RigidBody, gravity: Vec2, dt: f64) {
    if body.collision_type == CollisionType::Fixed || body.is_sleeping() {
        return;
    }

    // --- Linear Motion --- //
    let gravity = if body.use_gravity { gravity } else { Vec2::ZERO };
    let linear_acceleration = body.acceleration + gravity + body.force * body.inverse_mass();
    body.linear_velocity += linear_acceleration * dt;
    body.position += body.linear_velocity * dt;

    // --- Angular Motion --- //
    let angular_acceleration = body.torque * body.inverse_inertia();
    body.angular_velocity += angular_acceleration * dt;
    body.rotation = wrap_angle(body.rotation + body.angular_velocity * dt);

    body.clear_accumulators();
}

/// Wraps an angle in radians to the range [-PI, PI].
fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
