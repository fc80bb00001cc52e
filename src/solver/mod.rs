//! Contact solvers.
//!
//! A solver receives the tick's contacts after the narrow phase and moves
//! bodies so they no longer overlap. Contacts a solver cancels are not
//! resolved and do not count as touching for start/end events.

pub mod arcade;
pub mod realistic;

pub use arcade::ArcadeSolver;
pub use realistic::{ContactConstraintPoint, RealisticSolver};

use crate::collision::Contact;
use crate::common::{ContactSolveBias, Side};
use crate::math::Vec2;
use crate::objects::{BodySet, CollisionType, RigidBody};
use crate::world::EventQueue;

pub trait CollisionSolver {
    /// Cancels degenerate contacts, prepares per-contact state and emits
    /// `PreSolve` events.
    fn pre_solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, events: &mut EventQueue);

    /// Resolves the non-canceled contacts.
    fn solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, elapsed_ms: f64);

    /// Emits `PostSolve` events and does any bookkeeping after solving.
    fn post_solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, events: &mut EventQueue);

    /// Runs the three phases in order.
    fn run(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, elapsed_ms: f64, events: &mut EventQueue) {
        self.pre_solve(contacts, bodies, events);
        self.solve(contacts, bodies, elapsed_ms);
        self.post_solve(contacts, bodies, events);
    }
}

/// Whether a contact cannot separate anything: both MTV components are
/// within `epsilon` of zero.
pub(crate) fn is_negligible(mtv: Vec2, epsilon: f64) -> bool {
    mtv.x.abs() < epsilon && mtv.y.abs() < epsilon
}

fn bias_rank(bias: ContactSolveBias, mtv: Vec2) -> u8 {
    let horizontal = Side::from_direction(mtv).is_horizontal();
    match bias {
        ContactSolveBias::None => 0,
        ContactSolveBias::HorizontalFirst => u8::from(!horizontal),
        ContactSolveBias::VerticalFirst => u8::from(horizontal),
    }
}

/// Indices of the non-canceled contacts in solve order: by bias rank, then
/// shallowest first, then contact id.
pub(crate) fn solve_order(contacts: &[Contact], bias: ContactSolveBias) -> Vec<usize> {
    let mut order: Vec<usize> = (0..contacts.len()).filter(|&i| !contacts[i].is_canceled()).collect();
    order.sort_by(|&i, &j| {
        let (a, b) = (&contacts[i], &contacts[j]);
        bias_rank(bias, a.mtv)
            .cmp(&bias_rank(bias, b.mtv))
            .then(a.depth.total_cmp(&b.depth))
            .then(a.id.cmp(&b.id))
    });
    order
}

/// Whether either participant only reports collisions.
pub(crate) fn involves_passive(a: &RigidBody, b: &RigidBody) -> bool {
    a.collision_type == CollisionType::Passive || b.collision_type == CollisionType::Passive
}

/// Mass properties as the solvers see them: anything that is not an awake
/// Active body is immovable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SolverMass {
    pub inverse_mass: f64,
    pub inverse_inertia: f64,
}

impl SolverMass {
    pub(crate) fn of(body: &RigidBody) -> Self {
        if body.collision_type != CollisionType::Active || body.is_sleeping() {
            return Self {
                inverse_mass: 0.0,
                inverse_inertia: 0.0,
            };
        }
        Self {
            inverse_mass: body.inverse_mass(),
            inverse_inertia: body.inverse_inertia(),
        }
    }

    pub(crate) fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0 && self.inverse_inertia == 0.0
    }

    /// Applies `impulse` at offset `r` from the body origin.
    pub(crate) fn apply(&self, body: &mut RigidBody, r: Vec2, impulse: Vec2) {
        if self.is_immovable() {
            return;
        }
        body.linear_velocity += impulse * self.inverse_mass;
        body.angular_velocity += r.cross(impulse) * self.inverse_inertia;
    }
}
