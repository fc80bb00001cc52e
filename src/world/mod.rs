pub mod events;
pub mod physics_world;

pub use events::{CollisionEvent, CollisionEventKind, EventQueue, RayHit};
pub use physics_world::PhysicsWorld;
