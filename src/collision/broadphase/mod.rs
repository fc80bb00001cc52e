//! Broad phase: cheap candidate pairs, never missing a real overlap.

pub mod dynamic_tree;
pub mod sparse_hash_grid;

pub use dynamic_tree::DynamicTree;
pub use sparse_hash_grid::SparseHashGrid;

use super::aabb::AABB;
use super::pair::Pair;
use crate::common::{BroadphaseStrategy, PhysicsConfig};
use crate::math::{Ray, Vec2};
use crate::objects::BodyHandle;

/// What the broad phase knows about a body for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proxy {
    pub id: BodyHandle,
    /// Tight world bounds of the body's collider.
    pub bounds: AABB,
    pub velocity: Vec2,
}

/// A spatial index over body bounds.
///
/// Both implementations answer with tight-bounds overlaps only, so they
/// return the same pairs and hits; they differ in cost.
pub trait SpatialPartition {
    /// Synchronizes the index with `proxies`: unknown ids are added, ids no
    /// longer present are dropped and the rest are refreshed.
    fn update(&mut self, proxies: &[Proxy], elapsed_ms: f64);

    /// Bodies whose bounds touch `bounds`, sorted by handle.
    fn query(&self, bounds: &AABB) -> Vec<BodyHandle>;

    /// Every pair of bodies whose bounds touch, deduplicated and sorted by id.
    fn candidate_pairs(&self) -> Vec<Pair>;

    /// Bodies whose bounds the ray enters within `max_distance`, sorted by handle.
    fn raycast(&self, ray: &Ray, max_distance: f64) -> Vec<BodyHandle>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the partition selected by `config.broadphase`.
pub fn create(config: &PhysicsConfig) -> Box<dyn SpatialPartition> {
    match config.broadphase {
        BroadphaseStrategy::DynamicTree => Box::new(DynamicTree::new(config.dynamic_tree)),
        BroadphaseStrategy::SparseHashGrid => Box::new(SparseHashGrid::new(config.sparse_hash_grid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{BodySet, RigidBody};
    use crate::shapes::{Circle, Shape};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    /// Real handles for `n` bodies.
    fn handles(n: usize) -> Vec<BodyHandle> {
        let mut set = BodySet::new();
        (0..n)
            .map(|_| set.insert(RigidBody::new(Shape::Circle(Circle::new(1.0).unwrap()))))
            .collect()
    }

    fn proxies(boxes: &[(f64, f64, f64, f64)]) -> Vec<Proxy> {
        handles(boxes.len())
            .into_iter()
            .zip(boxes)
            .map(|(id, &(x, y, w, h))| Proxy {
                id,
                bounds: AABB::new(Vec2::new(x, y), Vec2::new(x + w, y + h)),
                velocity: Vec2::ZERO,
            })
            .collect()
    }

    fn brute_force_pairs(proxies: &[Proxy]) -> BTreeSet<(BodyHandle, BodyHandle)> {
        let mut out = BTreeSet::new();
        for (i, a) in proxies.iter().enumerate() {
            for b in &proxies[i + 1..] {
                if a.bounds.intersects(&b.bounds) {
                    let pair = Pair::new(a.id, b.id);
                    out.insert((pair.a, pair.b));
                }
            }
        }
        out
    }

    fn pair_set(partition: &dyn SpatialPartition) -> BTreeSet<(BodyHandle, BodyHandle)> {
        partition.candidate_pairs().into_iter().map(|p| (p.a, p.b)).collect()
    }

    fn both() -> Vec<Box<dyn SpatialPartition>> {
        let mut grid_config = PhysicsConfig::default();
        grid_config.broadphase = BroadphaseStrategy::SparseHashGrid;
        vec![create(&PhysicsConfig::default()), create(&grid_config)]
    }

    #[test]
    fn test_empty_partition_has_no_pairs() {
        for mut partition in both() {
            partition.update(&[], 16.0);
            assert!(partition.is_empty());
            assert!(partition.candidate_pairs().is_empty());
            assert!(partition.query(&AABB::new(Vec2::ZERO, Vec2::ONE)).is_empty());
        }
    }

    #[test]
    fn test_zero_area_bounds_are_tolerated() {
        let proxies = proxies(&[(5.0, 5.0, 0.0, 0.0), (4.0, 4.0, 2.0, 2.0), (50.0, 50.0, 0.0, 0.0)]);
        for mut partition in both() {
            partition.update(&proxies, 16.0);
            assert_eq!(partition.len(), 3);
            assert_eq!(pair_set(partition.as_ref()), brute_force_pairs(&proxies));
        }
    }

    #[test]
    fn test_removed_proxies_disappear() {
        let all = proxies(&[(0.0, 0.0, 2.0, 2.0), (1.0, 1.0, 2.0, 2.0), (1.5, 1.5, 2.0, 2.0)]);
        for mut partition in both() {
            partition.update(&all, 16.0);
            assert_eq!(partition.candidate_pairs().len(), 3);
            partition.update(&all[..2], 16.0);
            assert_eq!(partition.len(), 2);
            assert_eq!(partition.candidate_pairs().len(), 1);
        }
    }

    #[test]
    fn test_query_and_raycast_agree() {
        let proxies = proxies(&[(0.0, 0.0, 1.0, 1.0), (10.0, 0.0, 1.0, 1.0), (-300.0, -300.0, 1.0, 1.0)]);
        let ray = Ray::new(Vec2::new(-5.0, 0.5), Vec2::RIGHT);
        for mut partition in both() {
            partition.update(&proxies, 16.0);
            assert_eq!(partition.query(&AABB::new(Vec2::new(-1.0, -1.0), Vec2::new(12.0, 2.0))), vec![proxies[0].id, proxies[1].id]);
            assert_eq!(partition.raycast(&ray, 100.0), vec![proxies[0].id, proxies[1].id]);
            assert_eq!(partition.raycast(&ray, 8.0), vec![proxies[0].id]);
        }
    }

    proptest! {
        #[test]
        fn prop_candidate_pairs_cover_every_overlap(
            boxes in prop::collection::vec(
                (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..120.0, 0.0f64..120.0),
                0..40,
            ),
            moved in -50.0f64..50.0,
        ) {
            let proxies = proxies(&boxes);
            // shift every other box for an incremental update
            let mut moved_proxies = proxies.clone();
            for (i, proxy) in moved_proxies.iter_mut().enumerate() {
                if i % 2 == 0 {
                    proxy.bounds = proxy.bounds.translated(Vec2::new(moved, -moved));
                    proxy.velocity = Vec2::new(moved, -moved) * 60.0;
                }
            }
            for mut partition in both() {
                partition.update(&proxies, 16.0);
                prop_assert_eq!(pair_set(partition.as_ref()), brute_force_pairs(&proxies));
                partition.update(&moved_proxies, 16.0);
                prop_assert_eq!(pair_set(partition.as_ref()), brute_force_pairs(&moved_proxies));
            }
        }
    }
}
