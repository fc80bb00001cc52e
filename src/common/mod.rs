pub mod config;
pub mod error;
pub mod material;
pub mod side;

pub use config::{
    ArcadeConfig, BodyConfig, BroadphaseStrategy, ColliderConfig, CompositeStrategy, ContactConfig,
    ContactSolveBias, DynamicTreeConfig, PhysicsConfig, RealisticConfig, SolverStrategy,
    SparseHashGridConfig,
};
pub use error::{PhysicsError, Result};
pub use material::Material;
pub use side::Side;
