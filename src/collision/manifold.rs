use super::pair::PairId;
use crate::math::{LineSegment, Transform, Vec2};
use crate::objects::BodyHandle;

/// Identity of a contact across ticks.
///
/// `children` is set when composite colliders report per-child contacts, so
/// each child pairing keeps its own solver state. Start and end events are
/// tracked per body pair, see [`ContactId::body_pair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactId {
    pub pair: PairId,
    pub children: Option<(u32, u32)>,
}

impl ContactId {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self {
            pair: PairId::new(a, b),
            children: None,
        }
    }

    /// The id with child indices dropped, shared by every child contact of
    /// the same two bodies.
    pub fn body_pair(self) -> Self {
        Self { children: None, ..self }
    }
}

/// Which participant of a contact owns the reference side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    A,
    B,
}

impl Participant {
    pub fn other(self) -> Participant {
        match self {
            Participant::A => Participant::B,
            Participant::B => Participant::A,
        }
    }
}

/// Enough local geometry to re-measure a contact's separation after the
/// bodies have moved, without running the narrow phase again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeparationModel {
    /// Two circles; centers in their own body frames.
    Circles {
        local_a: Vec2,
        radius_a: f64,
        local_b: Vec2,
        radius_b: f64,
    },
    /// A side of the reference body, in that body's frame. Contact local
    /// points live in the other body's frame and are pushed out by `radius`
    /// (zero for polygons).
    Side {
        reference: Participant,
        local_side: LineSegment,
        radius: f64,
    },
}

/// A narrow-phase contact between two bodies.
///
/// `normal` points from A to B and `mtv` is the translation that, applied to
/// B (or its negation to A), separates the shapes. `mtv.dot(normal) >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub mtv: Vec2,
    pub normal: Vec2,
    pub tangent: Vec2,
    points: [Vec2; 2],
    local_points: [Vec2; 2],
    point_count: usize,
    pub depth: f64,
    pub model: SeparationModel,
    pub canceled: bool,
}

impl Contact {
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        mtv: Vec2,
        normal: Vec2,
        points: &[Vec2],
        local_points: &[Vec2],
        model: SeparationModel,
    ) -> Self {
        let count = points.len().min(2);
        let mut world = [Vec2::ZERO; 2];
        let mut local = [Vec2::ZERO; 2];
        world[..count].copy_from_slice(&points[..count]);
        let local_count = local_points.len().min(count);
        local[..local_count].copy_from_slice(&local_points[..local_count]);
        Self {
            id: ContactId::new(body_a, body_b),
            body_a,
            body_b,
            mtv,
            normal,
            tangent: normal.perpendicular(),
            points: world,
            local_points: local,
            point_count: count,
            depth: mtv.magnitude(),
            model,
            canceled: false,
        }
    }

    /// World-space contact points (one or two).
    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.point_count]
    }

    pub fn local_points(&self) -> &[Vec2] {
        &self.local_points[..self.point_count]
    }

    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// The same contact seen from B's side.
    pub fn swapped(&self) -> Contact {
        let model = match self.model {
            SeparationModel::Circles {
                local_a,
                radius_a,
                local_b,
                radius_b,
            } => SeparationModel::Circles {
                local_a: local_b,
                radius_a: radius_b,
                local_b: local_a,
                radius_b: radius_a,
            },
            SeparationModel::Side {
                reference,
                local_side,
                radius,
            } => SeparationModel::Side {
                reference: reference.other(),
                local_side,
                radius,
            },
        };
        let normal = -self.normal;
        Contact {
            body_a: self.body_b,
            body_b: self.body_a,
            mtv: -self.mtv,
            normal,
            tangent: normal.perpendicular(),
            model,
            ..*self
        }
    }

    /// Signed separation of the contact point `index` for the given body
    /// transforms. Negative while the shapes overlap.
    pub fn separation(&self, xf_a: &Transform, xf_b: &Transform, index: usize) -> f64 {
        match self.model {
            SeparationModel::Circles {
                local_a,
                radius_a,
                local_b,
                radius_b,
            } => {
                let a = xf_a.apply(local_a);
                let b = xf_b.apply(local_b);
                a.distance(b) - radius_a - radius_b
            }
            SeparationModel::Side {
                reference,
                local_side,
                radius,
            } => {
                let (ref_xf, incident_xf) = match reference {
                    Participant::A => (xf_a, xf_b),
                    Participant::B => (xf_b, xf_a),
                };
                let side = local_side.transform(ref_xf);
                let point = incident_xf.apply(self.local_points[index.min(1)]);
                side.distance_to_point(point, true) - radius
            }
        }
    }
}

/// Contact storage reused from tick to tick.
#[derive(Debug, Clone, Default)]
pub struct ContactPool {
    contacts: Vec<Contact>,
}

impl ContactPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contacts: Vec::with_capacity(capacity),
        }
    }

    /// Empties the pool but keeps its allocation.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn push(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.contacts.capacity()
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn as_mut_slice(&mut self) -> &mut [Contact] {
        &mut self.contacts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }
}
