//! Sequential impulse solver with friction, restitution and warm starting.
//!
//! Each contact point becomes a [`ContactConstraintPoint`] holding its
//! effective masses and accumulated impulses. Velocity iterations enforce
//! non-penetration and Coulomb friction; position iterations then push the
//! remaining overlap out directly, without adding energy.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{involves_passive, is_negligible, solve_order, CollisionSolver, SolverMass};
use crate::collision::{Contact, ContactId};
use crate::common::{BodyConfig, ContactConfig, RealisticConfig};
use crate::math::{clamp, Vec2};
use crate::objects::{BodySet, CollisionType, RigidBody};
use crate::world::{CollisionEventKind, EventQueue};

/// Largest position correction applied by one position iteration.
const MAX_CORRECTION: f64 = 5.0;
/// Approach speed below which restitution is ignored.
const BOUNCE_THRESHOLD: f64 = 0.1;
/// Points that moved less than this (squared) keep their impulses.
const REUSE_DISTANCE_SQUARED: f64 = 4.0;

/// Solver state for one contact point, kept across ticks for warm starting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactConstraintPoint {
    /// World position of the point when last prepared.
    pub point: Vec2,
    /// The point in the incident body's frame.
    pub local: Vec2,
    /// Offsets from each body origin to the point.
    pub r_a: Vec2,
    pub r_b: Vec2,
    pub normal_mass: f64,
    pub tangent_mass: f64,
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
    /// Target separating velocity from restitution.
    pub bounce: f64,
}

impl ContactConstraintPoint {
    fn new(point: Vec2, local: Vec2) -> Self {
        Self {
            point,
            local,
            r_a: Vec2::ZERO,
            r_b: Vec2::ZERO,
            normal_mass: 0.0,
            tangent_mass: 0.0,
            normal_impulse: 0.0,
            tangent_impulse: 0.0,
            bounce: 0.0,
        }
    }

    /// Velocity of B relative to A at this point.
    pub fn relative_velocity(&self, a: &RigidBody, b: &RigidBody) -> Vec2 {
        let va = a.linear_velocity + self.r_a.cross_scalar(a.angular_velocity);
        let vb = b.linear_velocity + self.r_b.cross_scalar(b.angular_velocity);
        vb - va
    }
}

fn effective_mass(ma: SolverMass, mb: SolverMass, r_a: Vec2, r_b: Vec2, axis: Vec2) -> f64 {
    let (ra_n, rb_n) = (r_a.cross(axis), r_b.cross(axis));
    let k = ma.inverse_mass + mb.inverse_mass + ma.inverse_inertia * ra_n * ra_n + mb.inverse_inertia * rb_n * rb_n;
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

/// Whether `body` moves enough to wake what it touches. Fixed bodies never do.
fn is_waking(body: &RigidBody, wake_threshold: f64) -> bool {
    body.collision_type != CollisionType::Fixed && body.sleep_motion() >= wake_threshold
}

/// Wakes a sleeping participant when the other one moves enough.
fn match_awake(a: &mut RigidBody, b: &mut RigidBody, wake_threshold: f64) {
    if a.is_sleeping() == b.is_sleeping() {
        return;
    }
    if a.is_sleeping() && a.collision_type != CollisionType::Fixed && is_waking(b, wake_threshold) {
        a.wake();
    }
    if b.is_sleeping() && b.collision_type != CollisionType::Fixed && is_waking(a, wake_threshold) {
        b.wake();
    }
}

#[derive(Debug, Clone)]
pub struct RealisticSolver {
    config: RealisticConfig,
    bodies: BodyConfig,
    mtv_epsilon: f64,
    constraints: FxHashMap<ContactId, Vec<ContactConstraintPoint>>,
}

impl RealisticSolver {
    pub fn new(config: RealisticConfig, bodies: BodyConfig, contact: ContactConfig) -> Self {
        Self {
            config,
            bodies,
            mtv_epsilon: contact.mtv_epsilon,
            constraints: FxHashMap::default(),
        }
    }

    /// Constraint points currently held for a contact.
    pub fn constraints(&self, id: &ContactId) -> &[ContactConstraintPoint] {
        self.constraints.get(id).map_or(&[], Vec::as_slice)
    }

    fn prepare(&mut self, contact: &Contact, a: &RigidBody, b: &RigidBody) {
        let (ma, mb) = (SolverMass::of(a), SolverMass::of(b));
        let restitution = a.material.combined_bounciness(&b.material);
        let points = self.constraints.entry(contact.id).or_default();
        points.truncate(contact.points().len());

        for (j, (&point, &local)) in contact.points().iter().zip(contact.local_points()).enumerate() {
            match points.get_mut(j) {
                Some(kept) if kept.point.distance_squared(point) < REUSE_DISTANCE_SQUARED => {
                    kept.point = point;
                    kept.local = local;
                }
                Some(stale) => *stale = ContactConstraintPoint::new(point, local),
                None => points.push(ContactConstraintPoint::new(point, local)),
            }
            let cp = &mut points[j];
            cp.r_a = point - a.position;
            cp.r_b = point - b.position;
            cp.normal_mass = effective_mass(ma, mb, cp.r_a, cp.r_b, contact.normal);
            cp.tangent_mass = effective_mass(ma, mb, cp.r_a, cp.r_b, contact.tangent);

            let normal_velocity = contact.normal.dot(cp.relative_velocity(a, b));
            cp.bounce = if normal_velocity < -BOUNCE_THRESHOLD {
                -restitution * normal_velocity
            } else {
                0.0
            };
        }
    }

    fn warm_start(&mut self, contacts: &[Contact], bodies: &mut BodySet) {
        for contact in contacts.iter().filter(|c| !c.is_canceled()) {
            let Some(points) = self.constraints.get_mut(&contact.id) else {
                continue;
            };
            if !self.config.warm_start {
                for cp in points.iter_mut() {
                    cp.normal_impulse = 0.0;
                    cp.tangent_impulse = 0.0;
                }
                continue;
            }
            let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
                continue;
            };
            let (ma, mb) = (SolverMass::of(a), SolverMass::of(b));
            for cp in points.iter() {
                let impulse = contact.normal * cp.normal_impulse + contact.tangent * cp.tangent_impulse;
                ma.apply(a, cp.r_a, -impulse);
                mb.apply(b, cp.r_b, impulse);
            }
        }
    }

    fn solve_velocity(&mut self, contacts: &[Contact], order: &[usize], bodies: &mut BodySet) {
        for _ in 0..self.config.velocity_iterations {
            for &index in order {
                let contact = &contacts[index];
                let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
                    continue;
                };
                if involves_passive(a, b) {
                    continue;
                }
                let (ma, mb) = (SolverMass::of(a), SolverMass::of(b));
                if ma.is_immovable() && mb.is_immovable() {
                    continue;
                }
                let Some(points) = self.constraints.get_mut(&contact.id) else {
                    continue;
                };
                let friction = a.material.combined_friction(&b.material);

                // Friction first, bounded by the current normal impulse.
                for cp in points.iter_mut() {
                    let tangent_velocity = -cp.relative_velocity(a, b).dot(contact.tangent);
                    let max_friction = friction * cp.normal_impulse;
                    let accumulated = clamp(
                        cp.tangent_impulse + tangent_velocity * cp.tangent_mass,
                        -max_friction,
                        max_friction,
                    );
                    let delta = accumulated - cp.tangent_impulse;
                    cp.tangent_impulse = accumulated;

                    let impulse = contact.tangent * delta;
                    ma.apply(a, cp.r_a, -impulse);
                    mb.apply(b, cp.r_b, impulse);
                }

                // The accumulated normal impulse may only push.
                for cp in points.iter_mut() {
                    let normal_velocity = cp.relative_velocity(a, b).dot(contact.normal);
                    let delta = -cp.normal_mass * (normal_velocity - cp.bounce);
                    let accumulated = (cp.normal_impulse + delta).max(0.0);
                    let delta = accumulated - cp.normal_impulse;
                    cp.normal_impulse = accumulated;

                    let impulse = contact.normal * delta;
                    ma.apply(a, cp.r_a, -impulse);
                    mb.apply(b, cp.r_b, impulse);
                }
            }
        }
    }

    fn solve_position(&mut self, contacts: &[Contact], order: &[usize], bodies: &mut BodySet) {
        let beta = self.config.steering_factor;
        let slop = self.config.slop;
        for _ in 0..self.config.position_iterations {
            for &index in order {
                let contact = &contacts[index];
                let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
                    continue;
                };
                if involves_passive(a, b) {
                    continue;
                }
                let (ma, mb) = (SolverMass::of(a), SolverMass::of(b));
                if ma.is_immovable() && mb.is_immovable() {
                    continue;
                }
                let Some(points) = self.constraints.get(&contact.id) else {
                    continue;
                };

                for (j, cp) in points.iter().enumerate() {
                    let separation = contact.separation(&a.transform(), &b.transform(), j);
                    let steering = clamp(beta * (separation + slop), -MAX_CORRECTION, 0.0);
                    let impulse = contact.normal * (-steering * cp.normal_mass);

                    // Pseudo impulse: moves the bodies, leaves velocities alone.
                    if !ma.is_immovable() {
                        a.position -= impulse * ma.inverse_mass;
                        a.rotation -= cp.r_a.cross(impulse) * ma.inverse_inertia;
                    }
                    if !mb.is_immovable() {
                        b.position += impulse * mb.inverse_mass;
                        b.rotation += cp.r_b.cross(impulse) * mb.inverse_inertia;
                    }
                }
            }
        }

        let mut moved = FxHashSet::default();
        for &index in order {
            moved.insert(contacts[index].body_a);
            moved.insert(contacts[index].body_b);
        }
        for handle in moved {
            if let Some(body) = bodies.get_mut(handle) {
                body.update_collider();
            }
        }
    }
}

impl CollisionSolver for RealisticSolver {
    fn pre_solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, events: &mut EventQueue) {
        for contact in contacts.iter_mut() {
            if contact.is_canceled() {
                continue;
            }
            let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
                contact.cancel();
                continue;
            };
            if is_negligible(contact.mtv, self.mtv_epsilon) {
                contact.cancel();
                continue;
            }
            events.emit(CollisionEventKind::PreSolve, contact);
            match_awake(a, b, self.bodies.wake_threshold);
        }

        let mut live = FxHashSet::default();
        for contact in contacts.iter().filter(|c| !c.is_canceled()) {
            live.insert(contact.id);
            if let (Some(a), Some(b)) = (bodies.get(contact.body_a), bodies.get(contact.body_b)) {
                self.prepare(contact, a, b);
            }
        }
        // Contacts that ended lose their impulses.
        self.constraints.retain(|id, _| live.contains(id));

        self.warm_start(contacts, bodies);
    }

    fn solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, _elapsed_ms: f64) {
        let order = solve_order(contacts, self.config.contact_solve_bias);
        self.solve_velocity(contacts, &order, bodies);
        self.solve_position(contacts, &order, bodies);
    }

    fn post_solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, events: &mut EventQueue) {
        for contact in contacts.iter().filter(|c| !c.is_canceled()) {
            let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
                continue;
            };
            if involves_passive(a, b) {
                continue;
            }
            a.update_motion(&self.bodies);
            b.update_motion(&self.bodies);
            events.emit(CollisionEventKind::PostSolve, contact);
        }
    }
}
