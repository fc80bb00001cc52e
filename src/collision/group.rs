/// Bitmask filter deciding which bodies may interact.
///
/// Two groups collide when each one's `category` is accepted by the other's
/// `mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionGroup {
    pub category: u32,
    pub mask: u32,
}

impl CollisionGroup {
    /// Collides with every group.
    pub const ALL: CollisionGroup = CollisionGroup {
        category: u32::MAX,
        mask: u32::MAX,
    };

    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    pub fn can_collide(&self, other: &CollisionGroup) -> bool {
        (self.category & other.mask) != 0 && (other.category & self.mask) != 0
    }

    /// Group that collides with exactly what this one does not.
    pub fn invert(&self) -> CollisionGroup {
        CollisionGroup {
            category: !self.category,
            mask: !self.mask,
        }
    }

    /// Group that only collides with members of `groups`.
    pub fn collides_with(groups: &[CollisionGroup]) -> CollisionGroup {
        let mask = groups.iter().fold(0, |acc, g| acc | g.category);
        CollisionGroup {
            category: u32::MAX,
            mask,
        }
    }
}

impl Default for CollisionGroup {
    fn default() -> Self {
        CollisionGroup::ALL
    }
}
