//! World configuration.
//!
//! Every tuning knob the simulation reads lives here and is handed to
//! [`PhysicsWorld::new`](crate::PhysicsWorld::new). Defaults are the values
//! the engine has been tuned with; the epsilons, sleep thresholds, slop and
//! steering factor are empirical and meant to be adjusted per game.

use super::error::{PhysicsError, Result};
use crate::math::Vec2;

/// Which solver resolves contacts each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStrategy {
    /// Positional separation plus velocity zeroing along the normal.
    #[default]
    Arcade,
    /// Sequential impulses with friction, restitution and warm starting.
    Realistic,
}

/// Which spatial partition produces candidate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BroadphaseStrategy {
    #[default]
    DynamicTree,
    SparseHashGrid,
}

/// Ordering applied to contacts before solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactSolveBias {
    /// Order by separation distance only.
    #[default]
    None,
    /// Resolve horizontal contacts before vertical ones.
    HorizontalFirst,
    /// Resolve vertical contacts before horizontal ones.
    VerticalFirst,
}

/// How contacts against composite colliders are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompositeStrategy {
    /// The composite acts as one collider: one contact (the deepest) per pair.
    #[default]
    Together,
    /// Each child reports its own contact and its own start/end events.
    Separate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparseHashGridConfig {
    /// Width and height of a grid cell in world units.
    pub size: f64,
}

impl Default for SparseHashGridConfig {
    fn default() -> Self {
        Self { size: 100.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicTreeConfig {
    /// Padding added around tight bounds when a leaf is (re)inserted.
    pub bounds_padding: f64,
    /// Scales the velocity expansion of leaf bounds in the direction of motion.
    pub velocity_multiplier: f64,
}

impl Default for DynamicTreeConfig {
    fn default() -> Self {
        Self {
            bounds_padding: 5.0,
            velocity_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcadeConfig {
    pub contact_solve_bias: ContactSolveBias,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RealisticConfig {
    pub contact_solve_bias: ContactSolveBias,
    pub position_iterations: u32,
    pub velocity_iterations: u32,
    /// Penetration allowed to remain after position correction.
    pub slop: f64,
    /// Fraction of the remaining penetration corrected per position iteration.
    pub steering_factor: f64,
    /// Seed each tick's impulses with the previous tick's accumulated impulses.
    pub warm_start: bool,
}

impl Default for RealisticConfig {
    fn default() -> Self {
        Self {
            contact_solve_bias: ContactSolveBias::None,
            position_iterations: 3,
            velocity_iterations: 8,
            slop: 1.0,
            steering_factor: 0.2,
            warm_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyConfig {
    pub can_sleep_by_default: bool,
    pub default_mass: f64,
    /// Motion below this puts a sleep-capable body to sleep.
    pub sleep_epsilon: f64,
    /// Motion a body needs to wake a sleeping body it touches.
    pub wake_threshold: f64,
    /// Weight of the previous motion in the running motion average.
    pub sleep_bias: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            can_sleep_by_default: false,
            default_mass: 10.0,
            sleep_epsilon: 0.07,
            wake_threshold: 0.07 * 3.0,
            sleep_bias: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderConfig {
    pub composite_strategy: CompositeStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactConfig {
    /// Narrow-phase overlaps at or below this depth count as touching.
    pub touching_epsilon: f64,
    /// Contacts whose MTV components are both below this are canceled.
    pub mtv_epsilon: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            touching_epsilon: 1e-4,
            mtv_epsilon: 1e-4,
        }
    }
}

/// Complete configuration of a [`PhysicsWorld`](crate::PhysicsWorld).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsConfig {
    pub gravity: Vec2,
    pub solver: SolverStrategy,
    /// Number of integrate/solve passes per fixed tick.
    pub substep: u32,
    pub broadphase: BroadphaseStrategy,
    pub sparse_hash_grid: SparseHashGridConfig,
    pub dynamic_tree: DynamicTreeConfig,
    pub arcade: ArcadeConfig,
    pub realistic: RealisticConfig,
    pub bodies: BodyConfig,
    pub colliders: ColliderConfig,
    pub contact: ContactConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            solver: SolverStrategy::default(),
            substep: 1,
            broadphase: BroadphaseStrategy::default(),
            sparse_hash_grid: SparseHashGridConfig::default(),
            dynamic_tree: DynamicTreeConfig::default(),
            arcade: ArcadeConfig::default(),
            realistic: RealisticConfig::default(),
            bodies: BodyConfig::default(),
            colliders: ColliderConfig::default(),
            contact: ContactConfig::default(),
        }
    }
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(PhysicsError::InvalidConfig { field, reason })
    }
}

impl PhysicsConfig {
    /// Rejects settings that would make the simulation divide by zero,
    /// never converge or propagate NaNs.
    pub fn validate(&self) -> Result<()> {
        check(self.gravity.is_finite(), "gravity", "must be finite")?;
        check(self.substep >= 1, "substep", "must be at least 1")?;

        let grid = self.sparse_hash_grid.size;
        check(grid.is_finite() && grid > 0.0, "sparse_hash_grid.size", "must be positive and finite")?;

        let tree = &self.dynamic_tree;
        check(
            tree.bounds_padding.is_finite() && tree.bounds_padding >= 0.0,
            "dynamic_tree.bounds_padding",
            "must be non-negative and finite",
        )?;
        check(
            tree.velocity_multiplier.is_finite() && tree.velocity_multiplier >= 0.0,
            "dynamic_tree.velocity_multiplier",
            "must be non-negative and finite",
        )?;

        let realistic = &self.realistic;
        check(
            realistic.velocity_iterations >= 1,
            "realistic.velocity_iterations",
            "must be at least 1",
        )?;
        check(
            realistic.slop.is_finite() && realistic.slop >= 0.0,
            "realistic.slop",
            "must be non-negative and finite",
        )?;
        check(
            realistic.steering_factor > 0.0 && realistic.steering_factor <= 1.0,
            "realistic.steering_factor",
            "must be in (0, 1]",
        )?;

        let bodies = &self.bodies;
        check(
            bodies.default_mass.is_finite() && bodies.default_mass > 0.0,
            "bodies.default_mass",
            "must be positive and finite",
        )?;
        check(
            bodies.sleep_epsilon.is_finite() && bodies.sleep_epsilon > 0.0,
            "bodies.sleep_epsilon",
            "must be positive and finite",
        )?;
        check(
            bodies.wake_threshold.is_finite() && bodies.wake_threshold >= 0.0,
            "bodies.wake_threshold",
            "must be non-negative and finite",
        )?;
        check(
            bodies.sleep_bias >= 0.0 && bodies.sleep_bias < 1.0,
            "bodies.sleep_bias",
            "must be in [0, 1)",
        )?;

        let contact = &self.contact;
        check(
            contact.touching_epsilon.is_finite() && contact.touching_epsilon >= 0.0,
            "contact.touching_epsilon",
            "must be non-negative and finite",
        )?;
        check(
            contact.mtv_epsilon.is_finite() && contact.mtv_epsilon >= 0.0,
            "contact.mtv_epsilon",
            "must be non-negative and finite",
        )?;
        Ok(())
    }
}
