use crate::objects::{BodyHandle, CollisionType, RigidBody};

/// Order-independent identity of two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairId(pub BodyHandle, pub BodyHandle);

impl PairId {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a <= b {
            PairId(a, b)
        } else {
            PairId(b, a)
        }
    }
}

/// Candidate pair produced by the broad phase. `a` is always the smaller handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub id: PairId,
}

impl Pair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        let id = PairId::new(a, b);
        Self { a: id.0, b: id.1, id }
    }

    /// Whether two bodies should reach the narrow phase at all.
    pub fn can_collide(body_a: &RigidBody, body_b: &RigidBody) -> bool {
        if body_a.collider().owner() == body_b.collider().owner() {
            return false;
        }
        let (ta, tb) = (body_a.collision_type, body_b.collision_type);
        if ta == CollisionType::PreventCollision || tb == CollisionType::PreventCollision {
            return false;
        }
        if ta == CollisionType::Fixed && tb == CollisionType::Fixed {
            return false;
        }
        if body_a.is_sleeping() && body_b.is_sleeping() {
            return false;
        }
        body_a.group.can_collide(&body_b.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionGroup;
    use crate::objects::BodySet;
    use crate::shapes::{Circle, Shape};

    fn body(kind: CollisionType) -> RigidBody {
        let mut body = RigidBody::new(Shape::Circle(Circle::new(1.0).unwrap()));
        body.collision_type = kind;
        body
    }

    #[test]
    fn test_pair_is_order_independent() {
        let mut set = BodySet::new();
        let a = set.insert(body(CollisionType::Active));
        let b = set.insert(body(CollisionType::Active));
        assert_eq!(Pair::new(a, b), Pair::new(b, a));
        assert_eq!(Pair::new(b, a).a, a);
    }

    #[test]
    fn test_can_collide_filters() {
        let mut set = BodySet::new();
        let active = set.insert(body(CollisionType::Active));
        let fixed = set.insert(body(CollisionType::Fixed));
        let fixed2 = set.insert(body(CollisionType::Fixed));
        let ghost = set.insert(body(CollisionType::PreventCollision));
        let passive = set.insert(body(CollisionType::Passive));
        let get = |h| set.get(h).unwrap();

        assert!(Pair::can_collide(get(active), get(fixed)));
        assert!(Pair::can_collide(get(passive), get(fixed)));
        assert!(!Pair::can_collide(get(fixed), get(fixed2)));
        assert!(!Pair::can_collide(get(active), get(ghost)));
        assert!(!Pair::can_collide(get(active), get(active)));
    }

    #[test]
    fn test_can_collide_respects_sleep_and_groups() {
        let mut set = BodySet::new();
        let a = set.insert(body(CollisionType::Active));
        let b = set.insert(body(CollisionType::Active));
        {
            let (body_a, body_b) = set.pair_mut(a, b).unwrap();
            body_a.set_sleeping(true);
            body_b.set_sleeping(true);
        }
        assert!(!Pair::can_collide(set.get(a).unwrap(), set.get(b).unwrap()));

        set.get_mut(a).unwrap().set_sleeping(false);
        assert!(Pair::can_collide(set.get(a).unwrap(), set.get(b).unwrap()));

        set.get_mut(a).unwrap().group = CollisionGroup::new(0b01, 0b01);
        set.get_mut(b).unwrap().group = CollisionGroup::new(0b10, 0b10);
        assert!(!Pair::can_collide(set.get(a).unwrap(), set.get(b).unwrap()));
    }
}
