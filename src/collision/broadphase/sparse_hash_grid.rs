// Uniform grid for broadphase collision detection, stored sparsely so that
// only occupied cells cost memory and any coordinate range works.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{Proxy, SpatialPartition};
use crate::collision::aabb::AABB;
use crate::collision::pair::{Pair, PairId};
use crate::common::SparseHashGridConfig;
use crate::math::{Ray, Vec2};
use crate::objects::BodyHandle;

/// Proxies covering more cells than this skip the cells entirely and are
/// tested against everything instead.
pub const MAX_CELLS_PER_PROXY: u64 = 4096;

type CellKey = (i64, i64);

/// Inclusive range of cell coordinates covered by some bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: CellKey,
    max: CellKey,
}

impl CellRange {
    fn cell_count(&self) -> u64 {
        let w = (self.max.0 as i128 - self.min.0 as i128 + 1) as u128;
        let h = (self.max.1 as i128 - self.min.1 as i128 + 1) as u128;
        u64::try_from(w.saturating_mul(h)).unwrap_or(u64::MAX)
    }

    fn cells(&self) -> impl Iterator<Item = CellKey> {
        let (min, max) = (self.min, self.max);
        (min.0..=max.0).flat_map(move |x| (min.1..=max.1).map(move |y| (x, y)))
    }
}

#[derive(Debug, Clone, Copy)]
struct GridProxy {
    bounds: AABB,
    range: CellRange,
    oversized: bool,
}

#[derive(Debug, Clone)]
pub struct SparseHashGrid {
    cell_size: f64,
    cells: FxHashMap<CellKey, Vec<BodyHandle>>,
    proxies: FxHashMap<BodyHandle, GridProxy>,
    oversized: Vec<BodyHandle>,
}

impl SparseHashGrid {
    pub fn new(config: SparseHashGridConfig) -> Self {
        Self {
            cell_size: config.size,
            cells: FxHashMap::default(),
            proxies: FxHashMap::default(),
            oversized: Vec::new(),
        }
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Converts world coordinates to cell coordinates. `as` saturates, so
    /// huge coordinates land in the outermost cells instead of wrapping.
    fn cell_of(&self, point: Vec2) -> CellKey {
        (
            (point.x / self.cell_size).floor() as i64,
            (point.y / self.cell_size).floor() as i64,
        )
    }

    fn range_of(&self, bounds: &AABB) -> CellRange {
        CellRange {
            min: self.cell_of(bounds.min),
            max: self.cell_of(bounds.max),
        }
    }

    fn insert_cells(&mut self, body: BodyHandle, range: CellRange) {
        for key in range.cells() {
            self.cells.entry(key).or_default().push(body);
        }
    }

    fn remove_cells(&mut self, body: BodyHandle, range: CellRange) {
        for key in range.cells() {
            if let Some(bucket) = self.cells.get_mut(&key) {
                bucket.retain(|b| *b != body);
                if bucket.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    fn track(&mut self, proxy: &Proxy) {
        let range = self.range_of(&proxy.bounds);
        let oversized = range.cell_count() > MAX_CELLS_PER_PROXY;
        if oversized {
            self.oversized.push(proxy.id);
        } else {
            self.insert_cells(proxy.id, range);
        }
        self.proxies.insert(
            proxy.id,
            GridProxy {
                bounds: proxy.bounds,
                range,
                oversized,
            },
        );
    }

    fn untrack(&mut self, body: BodyHandle) {
        let Some(old) = self.proxies.remove(&body) else {
            return;
        };
        if old.oversized {
            self.oversized.retain(|b| *b != body);
        } else {
            self.remove_cells(body, old.range);
        }
    }

    /// Re-bins only when the covered cell range changed.
    fn refresh(&mut self, proxy: &Proxy) {
        let range = self.range_of(&proxy.bounds);
        match self.proxies.get_mut(&proxy.id) {
            Some(existing) if existing.range == range => existing.bounds = proxy.bounds,
            Some(_) => {
                self.untrack(proxy.id);
                self.track(proxy);
            }
            None => self.track(proxy),
        }
    }

    fn touches(&self, body: BodyHandle, bounds: &AABB) -> bool {
        self.proxies.get(&body).is_some_and(|p| p.bounds.intersects(bounds))
    }

    /// Every tracked body, for queries too large to walk cell by cell.
    fn scan(&self, mut keep: impl FnMut(&GridProxy) -> bool) -> Vec<BodyHandle> {
        let mut hits: Vec<BodyHandle> = self
            .proxies
            .iter()
            .filter(|(_, proxy)| keep(proxy))
            .map(|(body, _)| *body)
            .collect();
        hits.sort_unstable();
        hits
    }
}

impl SpatialPartition for SparseHashGrid {
    fn update(&mut self, proxies: &[Proxy], _elapsed_ms: f64) {
        let mut seen = FxHashSet::default();
        seen.reserve(proxies.len());
        for proxy in proxies {
            seen.insert(proxy.id);
            self.refresh(proxy);
        }
        let stale: Vec<BodyHandle> = self.proxies.keys().filter(|b| !seen.contains(*b)).copied().collect();
        for body in stale {
            self.untrack(body);
        }
    }

    fn query(&self, bounds: &AABB) -> Vec<BodyHandle> {
        let range = self.range_of(bounds);
        if range.cell_count() > MAX_CELLS_PER_PROXY {
            return self.scan(|proxy| proxy.bounds.intersects(bounds));
        }

        let mut found = FxHashSet::default();
        for key in range.cells() {
            if let Some(bucket) = self.cells.get(&key) {
                found.extend(bucket.iter().copied().filter(|b| self.touches(*b, bounds)));
            }
        }
        found.extend(self.oversized.iter().copied().filter(|b| self.touches(*b, bounds)));

        let mut hits: Vec<BodyHandle> = found.into_iter().collect();
        hits.sort_unstable();
        hits
    }

    fn candidate_pairs(&self) -> Vec<Pair> {
        let mut seen: FxHashSet<PairId> = FxHashSet::default();
        let mut pairs = Vec::new();
        let mut consider = |a: BodyHandle, b: BodyHandle, pairs: &mut Vec<Pair>| {
            if a == b {
                return;
            }
            let (Some(pa), Some(pb)) = (self.proxies.get(&a), self.proxies.get(&b)) else {
                return;
            };
            if !pa.bounds.intersects(&pb.bounds) {
                return;
            }
            let pair = Pair::new(a, b);
            if seen.insert(pair.id) {
                pairs.push(pair);
            }
        };

        for bucket in self.cells.values() {
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    consider(a, b, &mut pairs);
                }
            }
        }
        for &big in &self.oversized {
            for &other in self.proxies.keys() {
                consider(big, other, &mut pairs);
            }
        }

        pairs.sort_unstable_by_key(|pair| pair.id);
        pairs
    }

    fn raycast(&self, ray: &Ray, max_distance: f64) -> Vec<BodyHandle> {
        let reach = AABB::new(ray.origin, ray.point_at(max_distance));
        if self.range_of(&reach).cell_count() > MAX_CELLS_PER_PROXY {
            return self.scan(|proxy| proxy.bounds.ray_cast(ray, max_distance));
        }
        self.query(&reach)
            .into_iter()
            .filter(|body| {
                self.proxies
                    .get(body)
                    .is_some_and(|proxy| proxy.bounds.ray_cast(ray, max_distance))
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.proxies.len()
    }
}
