//! Incrementally balanced bounding-volume hierarchy.
//!
//! Leaves hold fattened bounds so that small motions do not touch the tree.
//! Insertion descends by perimeter cost and every ancestor on the way back up
//! is rebalanced with a rotation when its children's heights differ by more
//! than one.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{Proxy, SpatialPartition};
use crate::collision::aabb::AABB;
use crate::collision::pair::Pair;
use crate::common::DynamicTreeConfig;
use crate::math::{Ray, Vec2};
use crate::objects::BodyHandle;

const NULL_NODE: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Node {
    /// Fat bounds for leaves, union of children for internal nodes.
    bounds: AABB,
    body: Option<BodyHandle>,
    parent: usize,
    children: [usize; 2],
    /// 0 for leaves.
    height: i32,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.children[0] == NULL_NODE
    }
}

#[derive(Debug, Clone, Copy)]
struct Leaf {
    node: usize,
    /// Tight bounds as of the last update.
    bounds: AABB,
}

#[derive(Debug, Clone)]
pub struct DynamicTree {
    config: DynamicTreeConfig,
    root: usize,
    nodes: Vec<Node>,
    free_list: usize,
    leaves: FxHashMap<BodyHandle, Leaf>,
}

impl DynamicTree {
    pub fn new(config: DynamicTreeConfig) -> Self {
        Self {
            config,
            root: NULL_NODE,
            nodes: Vec::new(),
            free_list: NULL_NODE,
            leaves: FxHashMap::default(),
        }
    }

    /// Height of the root; 0 for a single leaf, -1 when empty.
    pub fn height(&self) -> i32 {
        if self.root == NULL_NODE {
            -1
        } else {
            self.nodes[self.root].height
        }
    }

    /// Fat bounds stored for `body`, if tracked.
    pub fn fat_bounds(&self, body: BodyHandle) -> Option<AABB> {
        self.leaves.get(&body).map(|leaf| self.nodes[leaf.node].bounds)
    }

    /// Tight bounds padded, then stretched along the direction of travel.
    fn fatten(&self, bounds: &AABB, velocity: Vec2, elapsed_ms: f64) -> AABB {
        let mut fat = bounds.expanded(self.config.bounds_padding);
        let travel = velocity * (elapsed_ms / 1000.0) * self.config.velocity_multiplier;
        if travel.x < 0.0 {
            fat.min.x += travel.x;
        } else {
            fat.max.x += travel.x;
        }
        if travel.y < 0.0 {
            fat.min.y += travel.y;
        } else {
            fat.max.y += travel.y;
        }
        fat
    }

    fn track(&mut self, proxy: &Proxy, elapsed_ms: f64) {
        let fat = self.fatten(&proxy.bounds, proxy.velocity, elapsed_ms);
        let node = self.allocate_node();
        self.nodes[node].bounds = fat;
        self.nodes[node].body = Some(proxy.id);
        self.insert_leaf(node);
        self.leaves.insert(
            proxy.id,
            Leaf {
                node,
                bounds: proxy.bounds,
            },
        );
    }

    fn untrack(&mut self, body: BodyHandle) {
        if let Some(leaf) = self.leaves.remove(&body) {
            self.remove_leaf(leaf.node);
            self.free_node(leaf.node);
        }
    }

    /// Re-inserts the leaf only when its fat bounds no longer cover the
    /// tight bounds.
    fn refresh(&mut self, proxy: &Proxy, elapsed_ms: f64) {
        let Some(leaf) = self.leaves.get_mut(&proxy.id) else {
            return;
        };
        leaf.bounds = proxy.bounds;
        let node = leaf.node;
        if self.nodes[node].bounds.contains(&proxy.bounds) {
            return;
        }
        let fat = self.fatten(&proxy.bounds, proxy.velocity, elapsed_ms);
        self.remove_leaf(node);
        self.nodes[node].bounds = fat;
        self.insert_leaf(node);
    }

    /// Visits every leaf whose fat bounds touch `bounds`.
    fn visit_overlaps(&self, bounds: &AABB, mut visit: impl FnMut(BodyHandle)) {
        if self.root == NULL_NODE {
            return;
        }
        let mut stack = Vec::with_capacity(64);
        stack.push(self.root);
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.bounds.intersects(bounds) {
                continue;
            }
            if node.is_leaf() {
                if let Some(body) = node.body {
                    visit(body);
                }
            } else {
                stack.push(node.children[0]);
                stack.push(node.children[1]);
            }
        }
    }

    fn tight_bounds(&self, body: BodyHandle) -> Option<AABB> {
        self.leaves.get(&body).map(|leaf| leaf.bounds)
    }

    fn allocate_node(&mut self) -> usize {
        let fresh = Node {
            bounds: AABB::new(Vec2::ZERO, Vec2::ZERO),
            body: None,
            parent: NULL_NODE,
            children: [NULL_NODE, NULL_NODE],
            height: 0,
        };
        if self.free_list != NULL_NODE {
            let index = self.free_list;
            self.free_list = self.nodes[index].parent;
            self.nodes[index] = fresh;
            index
        } else {
            self.nodes.push(fresh);
            self.nodes.len() - 1
        }
    }

    fn free_node(&mut self, index: usize) {
        self.nodes[index].parent = self.free_list;
        self.nodes[index].body = None;
        self.nodes[index].height = -1;
        self.free_list = index;
    }

    /// Cheapest sibling for a new leaf, by the perimeter growth it causes.
    fn find_sibling(&self, leaf_bounds: &AABB) -> usize {
        let mut index = self.root;
        while !self.nodes[index].is_leaf() {
            let node = &self.nodes[index];
            let perimeter = node.bounds.perimeter();
            let combined = node.bounds.combine(leaf_bounds).perimeter();

            // pairing with this node under a new parent
            let cost = 2.0 * combined;
            // what every level below pays for growing this node
            let inherited = 2.0 * (combined - perimeter);

            let descend_cost = |child: usize| {
                let child = &self.nodes[child];
                let grown = child.bounds.combine(leaf_bounds).perimeter();
                if child.is_leaf() {
                    grown + inherited
                } else {
                    grown - child.bounds.perimeter() + inherited
                }
            };
            let [left, right] = node.children;
            let cost_left = descend_cost(left);
            let cost_right = descend_cost(right);

            if cost < cost_left && cost < cost_right {
                break;
            }
            index = if cost_left < cost_right { left } else { right };
        }
        index
    }

    fn insert_leaf(&mut self, leaf: usize) {
        if self.root == NULL_NODE {
            self.root = leaf;
            self.nodes[leaf].parent = NULL_NODE;
            return;
        }

        let leaf_bounds = self.nodes[leaf].bounds;
        let sibling = self.find_sibling(&leaf_bounds);

        let old_parent = self.nodes[sibling].parent;
        let new_parent = self.allocate_node();
        self.nodes[new_parent].parent = old_parent;
        self.nodes[new_parent].bounds = leaf_bounds.combine(&self.nodes[sibling].bounds);
        self.nodes[new_parent].height = self.nodes[sibling].height + 1;
        self.nodes[new_parent].children = [sibling, leaf];
        self.nodes[sibling].parent = new_parent;
        self.nodes[leaf].parent = new_parent;

        if old_parent == NULL_NODE {
            self.root = new_parent;
        } else {
            self.replace_child(old_parent, sibling, new_parent);
        }

        self.refit_from(new_parent);
    }

    fn remove_leaf(&mut self, leaf: usize) {
        if leaf == self.root {
            self.root = NULL_NODE;
            return;
        }

        let parent = self.nodes[leaf].parent;
        let grand_parent = self.nodes[parent].parent;
        let [first, second] = self.nodes[parent].children;
        let sibling = if first == leaf { second } else { first };

        if grand_parent == NULL_NODE {
            self.root = sibling;
            self.nodes[sibling].parent = NULL_NODE;
            self.free_node(parent);
        } else {
            self.replace_child(grand_parent, parent, sibling);
            self.nodes[sibling].parent = grand_parent;
            self.free_node(parent);
            self.refit_from(grand_parent);
        }
        self.nodes[leaf].parent = NULL_NODE;
    }

    fn replace_child(&mut self, parent: usize, old: usize, new: usize) {
        let children = &mut self.nodes[parent].children;
        if children[0] == old {
            children[0] = new;
        } else {
            children[1] = new;
        }
    }

    /// Walks to the root, rebalancing and recomputing heights and bounds.
    fn refit_from(&mut self, start: usize) {
        let mut index = start;
        while index != NULL_NODE {
            index = self.balance(index);
            self.refit(index);
            index = self.nodes[index].parent;
        }
    }

    fn refit(&mut self, index: usize) {
        let [left, right] = self.nodes[index].children;
        self.nodes[index].bounds = self.nodes[left].bounds.combine(&self.nodes[right].bounds);
        self.nodes[index].height = 1 + self.nodes[left].height.max(self.nodes[right].height);
    }

    /// Rotates the taller child of `a` up when the subtree is unbalanced.
    /// Returns the index now at `a`'s position.
    fn balance(&mut self, a: usize) -> usize {
        if self.nodes[a].is_leaf() || self.nodes[a].height < 2 {
            return a;
        }
        let [b, c] = self.nodes[a].children;
        let imbalance = self.nodes[c].height - self.nodes[b].height;
        if imbalance > 1 {
            self.rotate_up(a, c, 1);
            c
        } else if imbalance < -1 {
            self.rotate_up(a, b, 0);
            b
        } else {
            a
        }
    }

    /// Promotes `child` (at slot `slot` of `a`) above `a`. The taller of the
    /// child's own children stays with it; the shorter one moves under `a`.
    fn rotate_up(&mut self, a: usize, child: usize, slot: usize) {
        let [f, g] = self.nodes[child].children;

        self.nodes[child].children[0] = a;
        self.nodes[child].parent = self.nodes[a].parent;
        self.nodes[a].parent = child;

        let grand = self.nodes[child].parent;
        if grand == NULL_NODE {
            self.root = child;
        } else {
            self.replace_child(grand, a, child);
        }

        let (keep, give) = if self.nodes[f].height > self.nodes[g].height {
            (f, g)
        } else {
            (g, f)
        };
        self.nodes[child].children[1] = keep;
        self.nodes[a].children[slot] = give;
        self.nodes[give].parent = a;

        self.refit(a);
        self.refit(child);
    }
}

impl SpatialPartition for DynamicTree {
    fn update(&mut self, proxies: &[Proxy], elapsed_ms: f64) {
        let mut seen = FxHashSet::default();
        seen.reserve(proxies.len());
        for proxy in proxies {
            seen.insert(proxy.id);
            if self.leaves.contains_key(&proxy.id) {
                self.refresh(proxy, elapsed_ms);
            } else {
                self.track(proxy, elapsed_ms);
            }
        }

        let stale: Vec<BodyHandle> = self
            .leaves
            .keys()
            .filter(|body| !seen.contains(*body))
            .copied()
            .collect();
        for body in stale {
            self.untrack(body);
        }
    }

    fn query(&self, bounds: &AABB) -> Vec<BodyHandle> {
        let mut hits = Vec::new();
        self.visit_overlaps(bounds, |body| {
            if self.tight_bounds(body).is_some_and(|tight| tight.intersects(bounds)) {
                hits.push(body);
            }
        });
        hits.sort_unstable();
        hits
    }

    fn candidate_pairs(&self) -> Vec<Pair> {
        let mut pairs = Vec::new();
        for (&body, leaf) in &self.leaves {
            self.visit_overlaps(&leaf.bounds, |other| {
                // each pair is found from both ends; keep one
                if other <= body {
                    return;
                }
                if self.tight_bounds(other).is_some_and(|tight| tight.intersects(&leaf.bounds)) {
                    pairs.push(Pair::new(body, other));
                }
            });
        }
        pairs.sort_unstable_by_key(|pair: &Pair| pair.id);
        pairs.dedup_by_key(|pair| pair.id);
        pairs
    }

    fn raycast(&self, ray: &Ray, max_distance: f64) -> Vec<BodyHandle> {
        let mut hits = Vec::new();
        if self.root == NULL_NODE {
            return hits;
        }
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.bounds.ray_cast(ray, max_distance) {
                continue;
            }
            if node.is_leaf() {
                if let Some(body) = node.body {
                    if self.tight_bounds(body).is_some_and(|tight| tight.ray_cast(ray, max_distance)) {
                        hits.push(body);
                    }
                }
            } else {
                stack.extend(node.children);
            }
        }
        hits.sort_unstable();
        hits
    }

    fn len(&self) -> usize {
        self.leaves.len()
    }
}

/// Checks parent links, heights and bounds of every reachable node.
#[cfg(test)]
fn validate(tree: &DynamicTree) {
    fn walk(tree: &DynamicTree, index: usize, parent: usize) -> i32 {
        let node = &tree.nodes[index];
        assert_eq!(node.parent, parent);
        if node.is_leaf() {
            assert_eq!(node.height, 0);
            return 0;
        }
        let [l, r] = node.children;
        let hl = walk(tree, l, index);
        let hr = walk(tree, r, index);
        assert_eq!(node.height, 1 + hl.max(hr));
        assert!(node.bounds.contains(&tree.nodes[l].bounds));
        assert!(node.bounds.contains(&tree.nodes[r].bounds));
        node.height
    }
    if tree.root != NULL_NODE {
        walk(tree, tree.root, NULL_NODE);
    }
}
