use super::{involves_passive, is_negligible, solve_order, CollisionSolver};
use crate::collision::Contact;
use crate::common::{ArcadeConfig, ContactConfig};
use crate::objects::{BodySet, CollisionType, RigidBody};
use crate::world::{CollisionEventKind, EventQueue};

/// Resolves overlap by moving bodies straight out along the MTV and
/// removing the velocity that points into the contact. No impulses and no
/// rotation: the classic platformer response.
#[derive(Debug, Clone)]
pub struct ArcadeSolver {
    config: ArcadeConfig,
    mtv_epsilon: f64,
}

fn movable(body: &RigidBody) -> bool {
    body.collision_type == CollisionType::Active && !body.is_sleeping()
}

impl ArcadeSolver {
    pub fn new(config: ArcadeConfig, contact: ContactConfig) -> Self {
        Self {
            config,
            mtv_epsilon: contact.mtv_epsilon,
        }
    }

    fn solve_position(&self, contact: &mut Contact, bodies: &mut BodySet) {
        let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
            contact.cancel();
            return;
        };
        // An earlier contact may already have pushed the pair apart.
        if !a.collider().bounds().overlaps(&b.collider().bounds(), self.mtv_epsilon) {
            contact.cancel();
            return;
        }
        if is_negligible(contact.mtv, self.mtv_epsilon) {
            contact.cancel();
            return;
        }
        if involves_passive(a, b) {
            return;
        }

        let mut mtv = contact.mtv;
        if movable(a) && movable(b) {
            mtv = mtv * 0.5;
        }
        if movable(a) {
            a.position -= mtv;
            a.update_collider();
        }
        if movable(b) {
            b.position += mtv;
            b.update_collider();
        }
    }

    fn solve_velocity(&self, contact: &Contact, bodies: &mut BodySet) {
        if contact.is_canceled() {
            return;
        }
        let Some((a, b)) = bodies.pair_mut(contact.body_a, contact.body_b) else {
            return;
        };
        if involves_passive(a, b) {
            return;
        }

        let normal = contact.normal;
        // Only velocity heading into the other body is removed, so bodies
        // sliding off a ledge keep their motion.
        if movable(a) && a.linear_velocity.normalize().dot(normal) > 0.0 {
            a.linear_velocity -= normal * normal.dot(a.linear_velocity);
        }
        if movable(b) && b.linear_velocity.normalize().dot(-normal) > 0.0 {
            b.linear_velocity -= normal * normal.dot(b.linear_velocity);
        }
    }
}

impl CollisionSolver for ArcadeSolver {
    fn pre_solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, events: &mut EventQueue) {
        for contact in contacts.iter_mut() {
            if contact.is_canceled() {
                continue;
            }
            if is_negligible(contact.mtv, self.mtv_epsilon)
                || !bodies.contains(contact.body_a)
                || !bodies.contains(contact.body_b)
            {
                contact.cancel();
                continue;
            }
            events.emit(CollisionEventKind::PreSolve, contact);
        }
    }

    fn solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, _elapsed_ms: f64) {
        for index in solve_order(contacts, self.config.contact_solve_bias) {
            let contact = &mut contacts[index];
            self.solve_position(contact, bodies);
            self.solve_velocity(contact, bodies);
        }
    }

    fn post_solve(&mut self, contacts: &mut [Contact], bodies: &mut BodySet, events: &mut EventQueue) {
        for contact in contacts.iter() {
            if contact.is_canceled() {
                continue;
            }
            let passive = match (bodies.get(contact.body_a), bodies.get(contact.body_b)) {
                (Some(a), Some(b)) => involves_passive(a, b),
                _ => true,
            };
            if !passive {
                events.emit(CollisionEventKind::PostSolve, contact);
            }
        }
    }
}
