//! Bounded region biome map cache
//!
//! Populating a region's biome map is the expensive step of a blend
//! query, and world generation keeps coming back to the same few regions,
//! so populated maps live in a small strict-LRU cache. The cache owns an
//! injected populator and fills maps on demand; a map is never mutated
//! once it has been inserted.

use std::collections::HashMap;

use thiserror::Error;

use crate::geometry::BlendGeometry;

/// Biome identifier: a small non-negative integer assigned by the populator.
pub type BiomeId = u16;

/// Error type populators are free to fail with.
pub type PopulateError = Box<dyn std::error::Error + Send + Sync>;

/// Maximum number of cached region maps.
pub const CACHE_MAX_ENTRIES: usize = 12;

/// Capability contract for filling a padded region biome map.
///
/// `map` is the region's padded grid (`padded_region_size²` cells,
/// row-major); every cell must be written before returning. Population
/// must be deterministic for a given region and seed state, so a region
/// repopulated after eviction comes back identical.
pub trait BiomeMapPopulator {
    fn populate_biome_map(
        &self,
        region_x: i32,
        region_z: i32,
        map: &mut [BiomeId],
    ) -> Result<(), PopulateError>;
}

/// Any plain `Fn` with the populate shape is a populator.
impl<F> BiomeMapPopulator for F
where
    F: Fn(i32, i32, &mut [BiomeId]) -> Result<(), PopulateError>,
{
    fn populate_biome_map(
        &self,
        region_x: i32,
        region_z: i32,
        map: &mut [BiomeId],
    ) -> Result<(), PopulateError> {
        self(region_x, region_z, map)
    }
}

/// Population failed for one region. Nothing was cached for it.
#[derive(Debug, Error)]
#[error("failed to populate biome map for region ({region_x}, {region_z})")]
pub struct PopulationError {
    pub region_x: i32,
    pub region_z: i32,
    #[source]
    pub source: PopulateError,
}

/// Index value marking the end of the recency list.
const NIL: usize = usize::MAX;

/// One cached padded map plus its links in the recency list.
struct Slot {
    coord: (i32, i32),
    map: Vec<BiomeId>,
    prev: usize,
    next: usize,
}

/// Strict-LRU cache of populated padded region maps.
///
/// A hash index gives O(1) lookup by region coordinate; recency order is
/// an intrusive doubly-linked list threaded through an arena of slots by
/// index, so hits, inserts and evictions are all O(1) with no pointer
/// juggling. Capacity is fixed at [`CACHE_MAX_ENTRIES`].
pub struct RegionMapCache {
    geometry: BlendGeometry,
    populator: Box<dyn BiomeMapPopulator>,
    index: HashMap<(i32, i32), usize>,
    slots: Vec<Slot>,
    /// Most recently used slot, or NIL when empty.
    head: usize,
    /// Least recently used slot, or NIL when empty.
    tail: usize,
}

impl RegionMapCache {
    pub fn new(geometry: BlendGeometry, populator: Box<dyn BiomeMapPopulator>) -> Self {
        Self {
            geometry,
            populator,
            index: HashMap::with_capacity(CACHE_MAX_ENTRIES),
            slots: Vec::with_capacity(CACHE_MAX_ENTRIES),
            head: NIL,
            tail: NIL,
        }
    }

    /// Number of cached regions.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether a region is currently cached. Does not touch recency order.
    pub fn contains(&self, region_x: i32, region_z: i32) -> bool {
        self.index.contains_key(&(region_x, region_z))
    }

    /// Fetch the padded biome map for a region, populating it on a miss.
    ///
    /// A hit moves the entry to most-recently-used and never re-invokes
    /// the populator. A miss populates a fresh buffer synchronously and
    /// inserts it only on success, evicting the least-recently-used entry
    /// when the cache is full; a populator error propagates and leaves
    /// the cache exactly as it was.
    pub fn get_or_populate(
        &mut self,
        region_x: i32,
        region_z: i32,
    ) -> Result<&[BiomeId], PopulationError> {
        let coord = (region_x, region_z);

        if let Some(&slot) = self.index.get(&coord) {
            self.detach(slot);
            self.attach_front(slot);
            return Ok(&self.slots[slot].map);
        }

        let padded = self.geometry.padded_region_size();
        let mut map = vec![0; padded * padded];
        self.populator
            .populate_biome_map(region_x, region_z, &mut map)
            .map_err(|source| PopulationError {
                region_x,
                region_z,
                source,
            })?;

        let slot = if self.slots.len() < CACHE_MAX_ENTRIES {
            self.slots.push(Slot {
                coord,
                map,
                prev: NIL,
                next: NIL,
            });
            self.slots.len() - 1
        } else {
            // Full: the least-recently-used slot is evicted and reused.
            let slot = self.tail;
            self.detach(slot);
            self.index.remove(&self.slots[slot].coord);
            self.slots[slot].coord = coord;
            self.slots[slot].map = map;
            slot
        };

        self.index.insert(coord, slot);
        self.attach_front(slot);
        Ok(&self.slots[slot].map)
    }

    /// Unlink a slot from the recency list.
    fn detach(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.slots[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.slots[next].prev = prev;
        }
    }

    /// Link a detached slot in as most-recently-used.
    fn attach_front(&mut self, slot: usize) {
        self.slots[slot].prev = NIL;
        self.slots[slot].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}
