//! Collision events returned from [`PhysicsWorld::step`](super::PhysicsWorld::step).

use crate::collision::Contact;
use crate::common::Side;
use crate::math::Vec2;
use crate::objects::BodyHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionEventKind {
    /// The pair started touching this tick.
    Start,
    /// The pair is about to be resolved.
    PreSolve,
    /// The pair has been resolved.
    PostSolve,
    /// The pair stopped touching this tick.
    End,
}

/// One collision seen from `this` body's point of view.
///
/// `side` is the side of `this` that was hit and `contact` is oriented so
/// that `contact.body_a == this`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub this: BodyHandle,
    pub other: BodyHandle,
    pub side: Side,
    pub contact: Contact,
    pub elapsed_ms: f64,
}

/// Result of a world raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RayHit {
    pub body: BodyHandle,
    pub point: Vec2,
    pub distance: f64,
}

/// Events collected during one tick.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    elapsed_ms: f64,
    events: Vec<CollisionEvent>,
}

impl EventQueue {
    pub fn new(elapsed_ms: f64) -> Self {
        Self {
            elapsed_ms,
            events: Vec::new(),
        }
    }

    /// Emits `kind` for both participants of `contact`.
    pub fn emit(&mut self, kind: CollisionEventKind, contact: &Contact) {
        let side = Side::from_direction(contact.mtv);
        self.events.push(CollisionEvent {
            kind,
            this: contact.body_a,
            other: contact.body_b,
            side,
            contact: *contact,
            elapsed_ms: self.elapsed_ms,
        });
        self.events.push(CollisionEvent {
            kind,
            this: contact.body_b,
            other: contact.body_a,
            side: side.opposite(),
            contact: contact.swapped(),
            elapsed_ms: self.elapsed_ms,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollisionEvent> {
        self.events.iter()
    }

    pub fn into_vec(self) -> Vec<CollisionEvent> {
        self.events
    }
}
