pub mod body_set;
pub mod rigid_body;

pub use body_set::{BodyHandle, BodySet};
pub use rigid_body::{CollisionType, RigidBody};
