//! Discrete biome territories on a coarse cell grid.
//!
//! Each requested territory gets a seeded anchor cell and grows outward by a
//! randomized breadth-first search until it reaches its target size or runs
//! out of claimable neighbours. A whole layout is accepted or rejected as a
//! unit; a rejected layout is discarded and redrawn from a fresh stream.

use std::collections::VecDeque;

use glam::IVec2;
use hashbrown::HashMap;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::BiomeId;
use super::validity::{self, RegionCounts};
use crate::error::{GenerationStage, WorldgenError};
use crate::seed::{TERRITORY_SALT, attempt_stream};
use crate::settings::{RegionRule, TerritorySettings, WorldSettings};
use crate::terrain_height::{chebyshev, in_core};

const NEIGHBOURS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// One contiguous group of cells assigned to a biome.
#[derive(Clone, Debug, PartialEq)]
pub struct Territory {
    /// Biome every cell of this territory resolves to.
    pub biome: BiomeId,
    /// Cell the territory grew from.
    pub anchor: IVec2,
    /// Claimed cells in claim order; the anchor comes first.
    pub cells: Vec<IVec2>,
}

/// An accepted territory layout.
#[derive(Clone, Debug)]
pub struct TerritoryMap {
    grid: CellGrid,
    territories: Vec<Territory>,
    owner: HashMap<IVec2, usize>,
    attempts: u32,
}

impl TerritoryMap {
    /// All territories in growth order.
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Grid cell containing block `(x, z)`.
    pub fn cell_of(&self, x: i32, z: i32) -> IVec2 {
        self.grid.cell_of(x, z)
    }

    /// Side length of a cell, in blocks.
    pub fn cell_size(&self) -> i32 {
        self.grid.cell_size
    }

    /// Inclusive `(min, max)` cell indices of the grid.
    pub fn extent(&self) -> (IVec2, IVec2) {
        (self.grid.min, self.grid.max)
    }

    /// Index into [`TerritoryMap::territories`] of the territory owning `cell`.
    pub fn owner_of_cell(&self, cell: IVec2) -> Option<usize> {
        self.owner.get(&cell).copied()
    }

    /// Territory owning the cell that contains block `(x, z)`.
    pub fn territory_at(&self, x: i32, z: i32) -> Option<&Territory> {
        self.owner_of_cell(self.cell_of(x, z))
            .map(|i| &self.territories[i])
    }

    /// Number of territories per biome.
    pub fn counts(&self) -> RegionCounts {
        let mut counts = RegionCounts::default();
        for t in &self.territories {
            counts.increment(t.biome);
        }
        counts
    }

    /// Attempt index (0-based) that produced this layout.
    pub fn attempt(&self) -> u32 {
        self.attempts
    }

    /// Returns `true` if no cell is listed by more than one territory.
    pub fn is_disjoint(&self) -> bool {
        let total: usize = self.territories.iter().map(|t| t.cells.len()).sum();
        total == self.owner.len()
    }
}

/// The cell grid partitioning `[-radius, radius)²`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellGrid {
    cell_size: i32,
    min: IVec2,
    max: IVec2,
}

impl CellGrid {
    fn new(radius: i32, cell_size: i32) -> Self {
        let lo = (-radius).div_euclid(cell_size);
        let hi = (radius - 1).div_euclid(cell_size);
        Self {
            cell_size,
            min: IVec2::splat(lo),
            max: IVec2::splat(hi),
        }
    }

    fn cell_of(&self, x: i32, z: i32) -> IVec2 {
        IVec2::new(x.div_euclid(self.cell_size), z.div_euclid(self.cell_size))
    }

    fn contains(&self, cell: IVec2) -> bool {
        cell.cmpge(self.min).all() && cell.cmple(self.max).all()
    }

    /// Block coordinates of the cell centre.
    fn center(&self, cell: IVec2) -> IVec2 {
        cell * self.cell_size + IVec2::splat(self.cell_size / 2)
    }

    fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (self.min.y..=self.max.y)
            .flat_map(move |z| (self.min.x..=self.max.x).map(move |x| IVec2::new(x, z)))
    }
}

/// Places and grows territories, retrying until a layout passes validation.
pub struct BiomeRegionAllocator<'a> {
    world: &'a WorldSettings,
    settings: &'a TerritorySettings,
    grid: CellGrid,
}

impl<'a> BiomeRegionAllocator<'a> {
    /// Allocator for the given world bounds and territory settings.
    pub fn new(world: &'a WorldSettings, settings: &'a TerritorySettings) -> Self {
        Self {
            world,
            settings,
            grid: CellGrid::new(world.radius, settings.cell_size.max(1)),
        }
    }

    /// Inside the grid, outside the plains core, and inland of the beach band.
    fn claimable(&self, cell: IVec2) -> bool {
        if !self.grid.contains(cell) {
            return false;
        }
        let c = self.grid.center(cell);
        !in_core(c.x, c.y, self.world.plains_core_radius)
            && chebyshev(c.x, c.y) < self.settings.beach_start(self.world) as i64
    }

    fn anchor_allowed(&self, cell: IVec2, anchors: &[IVec2]) -> bool {
        if !self.claimable(cell) {
            return false;
        }
        let c = self.grid.center(cell);
        let min_dist = self.settings.min_anchor_distance as i64;
        let min_sep = self.settings.min_separation as i64;
        let from_origin = (c.x as i64).pow(2) + (c.y as i64).pow(2);

        from_origin >= min_dist * min_dist
            && chebyshev(c.x, c.y) <= self.settings.max_anchor_distance(self.world) as i64
            && anchors.iter().all(|a| {
                let d = (self.grid.center(*a) - c).as_i64vec2();
                d.x * d.x + d.y * d.y >= min_sep * min_sep
            })
    }

    fn total_requested(&self) -> usize {
        self.settings
            .territories
            .iter()
            .map(|t| t.count as usize)
            .sum()
    }

    /// Cells that could host an anchor if no other anchor existed.
    fn anchor_capacity(&self) -> usize {
        self.grid
            .cells()
            .filter(|c| self.anchor_allowed(*c, &[]))
            .count()
    }

    /// Run the bounded retry loop.
    ///
    /// # Errors
    ///
    /// Returns [`WorldgenError::Configuration`] if the requested anchors can
    /// never fit, or if no attempt within `max_attempts` satisfies `rules`.
    pub fn allocate(
        &self,
        seed: u64,
        rules: &[RegionRule],
        max_attempts: u32,
    ) -> Result<TerritoryMap, WorldgenError> {
        let fail = |attempts: u32, reason: String| WorldgenError::Configuration {
            stage: GenerationStage::TerritoryAllocation,
            seed,
            attempts,
            reason,
        };

        let capacity = self.anchor_capacity();
        let requested = self.total_requested();
        if capacity < requested {
            return Err(fail(
                0,
                format!("{requested} anchor(s) requested but only {capacity} cell(s) qualify"),
            ));
        }

        let mut last_reason = String::new();
        for attempt in 0..max_attempts {
            let mut rng = attempt_stream(seed, TERRITORY_SALT, attempt);
            let outcome = self.try_allocate(&mut rng, attempt).and_then(|map| {
                if let Some(t) = map.territories.iter().find(|t| t.cells.is_empty()) {
                    return Err(format!("{} territory is empty", t.biome));
                }
                validity::check(rules, &map.counts()).map(|()| map)
            });

            match outcome {
                Ok(map) => {
                    info!(
                        seed,
                        attempt,
                        territories = map.territories.len(),
                        "Territory layout accepted"
                    );
                    return Ok(map);
                }
                Err(reason) => {
                    warn!(seed, attempt, %reason, "Territory layout rejected");
                    last_reason = reason;
                }
            }
        }

        Err(fail(max_attempts, last_reason))
    }

    /// One attempt: place every anchor, then grow each territory in order.
    fn try_allocate(&self, rng: &mut ChaCha8Rng, attempt: u32) -> Result<TerritoryMap, String> {
        debug!(attempt, "Allocating territories");

        let mut anchors: Vec<IVec2> = Vec::with_capacity(self.total_requested());
        let mut territories = Vec::with_capacity(anchors.capacity());

        for request in &self.settings.territories {
            let mut first: Option<IVec2> = None;
            for k in 0..request.count {
                let anchor = match first {
                    Some(f) if k == 1 && self.settings.mirror_pairs => {
                        let mirrored = -f - IVec2::ONE;
                        if !self.anchor_allowed(mirrored, &anchors) {
                            return Err(format!(
                                "mirrored {} anchor at cell {mirrored} violates placement rules",
                                request.biome
                            ));
                        }
                        mirrored
                    }
                    _ => self.draw_anchor(rng, &anchors).ok_or_else(|| {
                        format!(
                            "no valid {} anchor after {} draw(s)",
                            request.biome, self.settings.anchor_attempts
                        )
                    })?,
                };
                first.get_or_insert(anchor);
                anchors.push(anchor);
                territories.push(Territory {
                    biome: request.biome,
                    anchor,
                    cells: Vec::new(),
                });
            }
        }

        let mut owner: HashMap<IVec2, usize> = HashMap::new();
        for (i, anchor) in anchors.iter().enumerate() {
            owner.insert(*anchor, i);
            territories[i].cells.push(*anchor);
        }

        let targets = self
            .settings
            .territories
            .iter()
            .flat_map(|r| std::iter::repeat_n(r.target_cells as usize, r.count as usize));
        for (i, target) in targets.enumerate() {
            self.grow(rng, i, target.max(1), &mut territories[i], &mut owner);
        }

        Ok(TerritoryMap {
            grid: self.grid,
            territories,
            owner,
            attempts: attempt,
        })
    }

    fn draw_anchor(&self, rng: &mut ChaCha8Rng, anchors: &[IVec2]) -> Option<IVec2> {
        (0..self.settings.anchor_attempts).find_map(|_| {
            let cell = IVec2::new(
                rng.random_range(self.grid.min.x..=self.grid.max.x),
                rng.random_range(self.grid.min.y..=self.grid.max.y),
            );
            self.anchor_allowed(cell, anchors).then_some(cell)
        })
    }

    /// Randomized BFS from the territory's anchor.
    fn grow(
        &self,
        rng: &mut ChaCha8Rng,
        index: usize,
        target: usize,
        territory: &mut Territory,
        owner: &mut HashMap<IVec2, usize>,
    ) {
        let mut frontier = VecDeque::from([territory.anchor]);
        let mut order = NEIGHBOURS;

        while let Some(cell) = frontier.pop_front() {
            if territory.cells.len() >= target {
                break;
            }
            order.shuffle(rng);
            for step in order {
                if territory.cells.len() >= target {
                    break;
                }
                let next = cell + step;
                if self.claimable(next) && !owner.contains_key(&next) {
                    owner.insert(next, index);
                    territory.cells.push(next);
                    frontier.push_back(next);
                }
            }
        }
    }
}
