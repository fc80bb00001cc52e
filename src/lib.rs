//! A 2D physics and collision core for games.
//!
//! Bodies live in a [`PhysicsWorld`] that is stepped once per fixed tick.
//! Each tick runs a broad phase (dynamic AABB tree or sparse hash grid), a
//! separating-axis narrow phase and one of two solvers: an arcade solver
//! for platformer-style response or a realistic sequential impulse solver.
//! Collision start, pre-solve, post-solve and end events are returned from
//! [`PhysicsWorld::step`].

pub mod collision;
pub mod common;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod solver;
pub mod world;

// Re-export key types for easier use
pub use collision::{Collider, CollisionGroup, Contact, ContactId, AABB};
pub use common::{
    BroadphaseStrategy, CompositeStrategy, ContactSolveBias, Material, PhysicsConfig, PhysicsError, Result, Side,
    SolverStrategy,
};
pub use math::{LineSegment, Ray, Transform, Vec2};
pub use objects::{BodyHandle, BodySet, CollisionType, RigidBody};
pub use shapes::{Circle, Composite, Edge, Polygon, Shape};
pub use world::{CollisionEvent, CollisionEventKind, PhysicsWorld, RayHit};
