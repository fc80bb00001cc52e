use std::cell::Cell;

use crate::collision::{Collider, CollisionGroup};
use crate::common::{BodyConfig, Material, PhysicsError, Result};
use crate::math::{clamp, Transform, Vec2};
use crate::shapes::Shape;

/// How a body takes part in collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionType {
    /// Never collides with anything.
    PreventCollision,
    /// Reports collisions but is never resolved against.
    Passive,
    /// Moved by collisions.
    #[default]
    Active,
    /// Immovable; other bodies are resolved against it.
    Fixed,
}

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) collider: Collider,
    pub collision_type: CollisionType,
    pub material: Material,
    pub group: CollisionGroup,

    // Primary state
    pub position: Vec2,
    pub rotation: f64, // Radians
    pub linear_velocity: Vec2,
    pub angular_velocity: f64, // Radians per second
    /// Constant acceleration added every step on top of gravity.
    pub acceleration: Vec2,

    // Accumulators, cleared after every integration step
    pub force: Vec2,
    pub torque: f64,

    pub use_gravity: bool,

    mass: f64,
    /// Lazily computed from the shape; `None` after the mass or shape changed.
    inertia: Cell<Option<f64>>,

    can_sleep: bool,
    sleeping: bool,
    sleep_motion: f64,
    sleep_epsilon: f64,
}

impl RigidBody {
    /// Creates an Active body at the origin with the default body settings.
    pub fn new(shape: Shape) -> Self {
        Self::with_config(shape, &BodyConfig::default())
    }

    /// Creates an Active body at the origin using `config` for its mass and
    /// sleep defaults.
    pub fn with_config(shape: Shape, config: &BodyConfig) -> Self {
        let mut body = Self {
            collider: Collider::new(shape),
            collision_type: CollisionType::Active,
            material: Material::default(),
            group: CollisionGroup::ALL,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            acceleration: Vec2::ZERO,
            force: Vec2::ZERO,
            torque: 0.0,
            use_gravity: true,
            mass: config.default_mass,
            inertia: Cell::new(None),
            can_sleep: config.can_sleep_by_default,
            sleeping: false,
            sleep_motion: 0.0,
            sleep_epsilon: config.sleep_epsilon,
        };
        body.sleep_motion = body.sleep_epsilon * 5.0;
        body
    }

    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// Replaces the body's shape, keeping its owner and placement.
    pub fn set_collider(&mut self, shape: Shape) {
        self.collider.set_shape(shape);
        self.inertia.set(None);
        self.update_collider();
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    /// Moves the collider's cached world geometry to the body's transform.
    pub fn update_collider(&mut self) {
        let xf = self.transform();
        self.collider.update(&xf);
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        self.inertia.set(None);
        Ok(())
    }

    /// Moment of inertia about the body origin, derived from the shape.
    pub fn inertia(&self) -> f64 {
        if let Some(inertia) = self.inertia.get() {
            return inertia;
        }
        let inertia = self.collider.shape().inertia(self.mass);
        self.inertia.set(Some(inertia));
        inertia
    }

    pub fn inverse_mass(&self) -> f64 {
        if self.collision_type == CollisionType::Fixed {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    pub fn inverse_inertia(&self) -> f64 {
        let inertia = self.inertia();
        if self.collision_type == CollisionType::Fixed || inertia <= 0.0 || !inertia.is_finite() {
            0.0
        } else {
            1.0 / inertia
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Putting a body to sleep stops it dead; waking it gives it enough
    /// motion not to fall straight back asleep.
    pub fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
        if sleeping {
            self.linear_velocity = Vec2::ZERO;
            self.acceleration = Vec2::ZERO;
            self.angular_velocity = 0.0;
            self.sleep_motion = 0.0;
        } else {
            self.sleep_motion = self.sleep_epsilon * 5.0;
        }
    }

    pub fn wake(&mut self) {
        self.set_sleeping(false);
    }

    pub fn can_sleep(&self) -> bool {
        self.can_sleep
    }

    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        self.can_sleep = can_sleep;
        if !can_sleep && self.sleeping {
            self.wake();
        }
    }

    /// Running average of the body's squared speed, used to decide sleep.
    pub fn sleep_motion(&self) -> f64 {
        self.sleep_motion
    }

    /// Folds this step's motion into the running average and puts the body
    /// to sleep once it falls under `config.sleep_epsilon`.
    pub fn update_motion(&mut self, config: &BodyConfig) {
        self.sleep_epsilon = config.sleep_epsilon;
        // Fixed bodies never move, so they never need to sleep.
        if self.sleeping || self.collision_type == CollisionType::Fixed {
            return;
        }
        let current = self.linear_velocity.magnitude_squared() + self.angular_velocity * self.angular_velocity;
        let bias = config.sleep_bias;
        self.sleep_motion = bias * self.sleep_motion + (1.0 - bias) * current;
        self.sleep_motion = clamp(self.sleep_motion, 0.0, 10.0 * config.sleep_epsilon);
        if self.can_sleep && self.sleep_motion < config.sleep_epsilon {
            self.set_sleeping(true);
        }
    }

    /// Applies an instantaneous impulse at a world point. Only Active bodies
    /// respond; a sleeping body is woken first.
    pub fn apply_impulse(&mut self, point: Vec2, impulse: Vec2) {
        if self.collision_type != CollisionType::Active || impulse == Vec2::ZERO {
            return;
        }
        if self.sleeping {
            self.wake();
        }
        self.linear_velocity += impulse * self.inverse_mass();
        let r = point - self.position;
        self.angular_velocity += r.cross(impulse) * self.inverse_inertia();
    }

    /// Applies a force at the body origin.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Applies a force at a world point, producing torque about the origin.
    pub fn apply_force_at_point(&mut self, force: Vec2, point: Vec2) {
        self.force += force;
        let r = point - self.position;
        self.torque += r.cross(force);
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    pub(crate) fn configure(&mut self, config: &BodyConfig) {
        self.sleep_epsilon = config.sleep_epsilon;
    }
}
