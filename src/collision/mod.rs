pub mod aabb;
pub mod broadphase;
pub mod collider;
pub mod detection;
pub mod group;
pub mod manifold;
pub mod pair;
pub mod separating_axis;

// Re-export key types
pub use aabb::AABB;
pub use broadphase::{DynamicTree, Proxy, SparseHashGrid, SpatialPartition};
pub use collider::Collider;
pub use detection::{collide, collide_into, NarrowPhaseSettings};
pub use group::CollisionGroup;
pub use manifold::{Contact, ContactId, ContactPool, Participant, SeparationModel};
pub use pair::{Pair, PairId};
