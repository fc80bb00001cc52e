use super::rigid_body::RigidBody;

/// Stable reference to a body stored in a [`BodySet`].
///
/// The generation detects handles that outlived their body: once a slot is
/// reused, old handles no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Handle of a body that has not been added to a world yet.
    pub const DANGLING: BodyHandle = BodyHandle {
        index: u32::MAX,
        generation: u32::MAX,
    };

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<RigidBody>,
}

/// Generational arena of rigid bodies.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `body` and stamps its collider with the new handle.
    pub fn insert(&mut self, mut body: RigidBody) -> BodyHandle {
        let handle = match self.free.pop() {
            Some(index) => BodyHandle {
                index,
                generation: self.slots[index as usize].generation,
            },
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    body: None,
                });
                BodyHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        body.collider.set_owner(handle);
        self.slots[handle.index()].body = Some(body);
        self.len += 1;
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let mut body = slot.body.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        body.collider.set_owner(BodyHandle::DANGLING);
        Some(body)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_ref()
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_mut()
    }

    /// Two distinct bodies borrowed mutably at once.
    pub fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut RigidBody, &mut RigidBody)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (low, high, swapped) = if a.index < b.index {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.slots.split_at_mut(high);
        let first = head[low].body.as_mut()?;
        let second = tail[0].body.as_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.body.as_ref().map(|body| {
                (
                    BodyHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    body,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut RigidBody)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.body.as_mut().map(|body| {
                (
                    BodyHandle {
                        index: i as u32,
                        generation,
                    },
                    body,
                )
            })
        })
    }

    pub fn handles(&self) -> Vec<BodyHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::shapes::{Circle, Shape};

    fn ball(x: f64) -> RigidBody {
        let mut body = RigidBody::new(Shape::Circle(Circle::new(1.0).unwrap()));
        body.position = Vec2::new(x, 0.0);
        body
    }

    #[test]
    fn test_insert_stamps_owner() {
        let mut set = BodySet::new();
        let handle = set.insert(ball(1.0));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(handle).unwrap().collider().owner(), handle);
    }

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut set = BodySet::new();
        let old = set.insert(ball(1.0));
        assert!(set.remove(old).is_some());
        let new = set.insert(ball(2.0));
        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(set.get(old).is_none());
        assert!(set.remove(old).is_none());
        assert_eq!(set.get(new).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_pair_mut_keeps_argument_order() {
        let mut set = BodySet::new();
        let a = set.insert(ball(1.0));
        let b = set.insert(ball(2.0));
        {
            let (first, second) = set.pair_mut(b, a).unwrap();
            assert_eq!(first.position.x, 2.0);
            assert_eq!(second.position.x, 1.0);
            first.position.x = 20.0;
        }
        assert_eq!(set.get(b).unwrap().position.x, 20.0);
        assert!(set.pair_mut(a, a).is_none());
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut set = BodySet::new();
        let a = set.insert(ball(1.0));
        let b = set.insert(ball(2.0));
        let c = set.insert(ball(3.0));
        set.remove(b);
        assert_eq!(set.handles(), vec![a, c]);
        for (_, body) in set.iter_mut() {
            body.position.y = 5.0;
        }
        assert!(set.iter().all(|(_, body)| body.position.y == 5.0));
    }
}
