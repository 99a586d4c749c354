//! The world generation entry point.
//!
//! [`WorldgenCore`] owns everything derived from a seed. Derived state is
//! built at most once, on first use, inside a [`OnceLock`]; the validity
//! retry loops run entirely inside that initializer. Afterwards every query
//! is a read-only, lock-free function of position.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::biome::{
    BiomeBlender, BiomeId, BiomeRegionAllocator, BiomeRegistry, BlendWeights, RegionCounts,
    TerritoryMap, validity,
};
use crate::climate::{ClimateModel, ClimateSample};
use crate::column::{Column, ColumnBuilder};
use crate::error::{DomainError, GenerationStage, WorldgenError};
use crate::settings::{GenerationSettings, PlacementMode, WorldSettings};
use crate::terrain_height::{SurfaceHeightResolver, chebyshev, in_core};

/// Everything computed once per seed.
struct DerivedState {
    climate: ClimateModel,
    blender: BiomeBlender,
    heights: SurfaceHeightResolver,
    columns: ColumnBuilder,
    territories: Option<TerritoryMap>,
}

/// Deterministic world generator for a single seed.
///
/// Cheap to construct; the expensive state is derived lazily. Safe to share
/// across threads.
pub struct WorldgenCore {
    seed: u64,
    settings: GenerationSettings,
    registry: BiomeRegistry,
    state: OnceLock<Result<DerivedState, WorldgenError>>,
}

impl WorldgenCore {
    /// Lazily-initialized core with the standard biome registry.
    pub fn new(seed: u64, settings: GenerationSettings) -> Self {
        Self::with_registry(seed, settings, BiomeRegistry::standard())
    }

    /// Lazily-initialized core with a custom biome registry.
    pub fn with_registry(
        seed: u64,
        settings: GenerationSettings,
        registry: BiomeRegistry,
    ) -> Self {
        Self {
            seed,
            settings,
            registry,
            state: OnceLock::new(),
        }
    }

    /// Build a core and derive its state immediately.
    ///
    /// # Errors
    ///
    /// Returns [`WorldgenError::Configuration`] if the settings are invalid or
    /// a retry budget runs out.
    pub fn initialize(seed: u64, settings: GenerationSettings) -> Result<Self, WorldgenError> {
        let core = Self::new(seed, settings);
        core.ensure_initialized()?;
        Ok(core)
    }

    /// Derive the state if that has not happened yet. Idempotent; a failed
    /// initialization is cached and returned to every caller.
    ///
    /// # Errors
    ///
    /// Returns the initialization error, if any.
    pub fn ensure_initialized(&self) -> Result<(), WorldgenError> {
        self.state().map(|_| ())
    }

    /// World seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Settings the core was built with.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Biome definitions in use.
    pub fn registry(&self) -> &BiomeRegistry {
        &self.registry
    }

    /// Territory layout, when running in territory mode and initialized
    /// successfully.
    pub fn territories(&self) -> Option<&TerritoryMap> {
        self.state().ok()?.territories.as_ref()
    }

    /// Climate at `(x, z)`.
    ///
    /// # Errors
    ///
    /// Fails on an initialization error or an out-of-range coordinate.
    pub fn sample_climate(&self, x: i32, z: i32) -> Result<ClimateSample, WorldgenError> {
        self.check_horizontal(GenerationStage::BiomeLookup, x, 0, z)?;
        let state = self.state()?;
        Ok(state.climate.sample(x as f64, z as f64))
    }

    /// Blend weights at `(x, z)`.
    ///
    /// In territory mode all weight sits on the resolved territory biome.
    ///
    /// # Errors
    ///
    /// Fails on an initialization error or an out-of-range coordinate.
    pub fn blend_weights(&self, x: i32, z: i32) -> Result<BlendWeights, WorldgenError> {
        self.check_horizontal(GenerationStage::BiomeLookup, x, 0, z)?;
        let state = self.state()?;
        Ok(match &state.territories {
            Some(map) => BlendWeights::single(self.territory_biome(map, x, z)),
            None => {
                let sample = state.climate.sample(x as f64, z as f64);
                state.blender.weights(&sample, x, z)
            }
        })
    }

    /// Biome at block `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Fails on an initialization error, a coordinate outside the world, or a
    /// resolved biome with no registered definition.
    pub fn biome_at(&self, x: i32, y: i32, z: i32) -> Result<BiomeId, WorldgenError> {
        let stage = GenerationStage::BiomeLookup;
        let world = &self.settings.world;
        if !world.contains_y(y) {
            return Err(self.domain(
                stage,
                x,
                y,
                z,
                DomainError::CoordinateOutOfRange {
                    reason: format!("y {y} outside [{}, {}]", world.min_y, world.top_y()),
                },
            ));
        }
        self.check_horizontal(stage, x, y, z)?;

        let state = self.state()?;
        let biome = self.column_biome(state, x, z);
        if !self.registry.contains(biome) {
            return Err(self.domain(stage, x, y, z, DomainError::MissingBiome(biome)));
        }
        Ok(biome)
    }

    /// Surface elevation of column `(x, z)`.
    ///
    /// # Errors
    ///
    /// Fails on an initialization error, an out-of-range coordinate, or a
    /// missing biome height field.
    pub fn surface_height(&self, x: i32, z: i32) -> Result<i32, WorldgenError> {
        let stage = GenerationStage::HeightResolution;
        self.check_horizontal(stage, x, 0, z)?;
        let state = self.state()?;
        self.resolve_height(state, x, z)
            .map_err(|source| self.domain(stage, x, 0, z, source))
    }

    /// Full block column at `(x, z)`.
    ///
    /// # Errors
    ///
    /// Fails on an initialization error, an out-of-range coordinate, or a
    /// missing biome definition.
    pub fn build_column(&self, x: i32, z: i32) -> Result<Column, WorldgenError> {
        let stage = GenerationStage::ColumnBuild;
        self.check_horizontal(stage, x, 0, z)?;
        let state = self.state()?;

        let height = self
            .resolve_height(state, x, z)
            .map_err(|source| self.domain(GenerationStage::HeightResolution, x, 0, z, source))?;
        let biome = self.column_biome(state, x, z);
        let def = self
            .registry
            .get(biome)
            .map_err(|_| self.domain(stage, x, height, z, DomainError::MissingBiome(biome)))?;

        Ok(state.columns.build(x, z, height, def))
    }

    fn state(&self) -> Result<&DerivedState, WorldgenError> {
        self.state
            .get_or_init(|| self.derive())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn derive(&self) -> Result<DerivedState, WorldgenError> {
        let start = Instant::now();
        let seed = self.seed;
        let s = &self.settings;

        s.validate()
            .map_err(|reason| WorldgenError::Configuration {
                stage: GenerationStage::NoiseInit,
                seed,
                attempts: 0,
                reason,
            })?;

        let blender =
            BiomeBlender::new(&self.registry, s.blend.clone(), s.world.plains_core_radius);

        let (climate, territories) = match s.placement {
            PlacementMode::Blended => (self.derive_climate(&blender)?, None),
            PlacementMode::Territory => {
                let map = BiomeRegionAllocator::new(&s.world, &s.territory).allocate(
                    seed,
                    &s.validation.rules,
                    s.validation.max_attempts,
                )?;
                (ClimateModel::new(seed, &s.climate, 0), Some(map))
            }
        };

        let heights = SurfaceHeightResolver::new(
            seed,
            &self.registry,
            s.world.clone(),
            s.blend.min_contribution,
        );
        let columns = ColumnBuilder::new(seed, s.world.clone(), s.decoration.clone());

        info!(
            seed,
            placement = %s.placement,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Worldgen core initialized"
        );

        Ok(DerivedState {
            climate,
            blender,
            heights,
            columns,
            territories,
        })
    }

    /// Climate for blended mode, re-rolled until region counts pass when
    /// climate validation is enabled.
    fn derive_climate(&self, blender: &BiomeBlender) -> Result<ClimateModel, WorldgenError> {
        let seed = self.seed;
        let s = &self.settings;
        if !s.validation.climate {
            return Ok(ClimateModel::new(seed, &s.climate, 0));
        }

        let mut last_reason = String::new();
        for attempt in 0..s.validation.max_attempts {
            debug!(seed, attempt, "Validating climate layout");
            let climate = ClimateModel::new(seed, &s.climate, attempt);
            let counts = climate_regions(&climate, blender, &s.world, s.territory.cell_size);
            match validity::check(&s.validation.rules, &counts) {
                Ok(()) => {
                    info!(seed, attempt, "Climate layout accepted");
                    return Ok(climate);
                }
                Err(reason) => {
                    warn!(seed, attempt, %reason, "Climate layout rejected");
                    last_reason = reason;
                }
            }
        }

        Err(WorldgenError::Configuration {
            stage: GenerationStage::ClimateValidation,
            seed,
            attempts: s.validation.max_attempts,
            reason: last_reason,
        })
    }

    fn column_biome(&self, state: &DerivedState, x: i32, z: i32) -> BiomeId {
        match &state.territories {
            Some(map) => self.territory_biome(map, x, z),
            None => {
                let sample = state.climate.sample(x as f64, z as f64);
                state.blender.classify(&sample, x, z)
            }
        }
    }

    fn territory_biome(&self, map: &TerritoryMap, x: i32, z: i32) -> BiomeId {
        let world = &self.settings.world;
        let territory = &self.settings.territory;
        let cheb = chebyshev(x, z);

        if cheb >= territory.ocean_start(world) as i64 {
            BiomeId::Ocean
        } else if cheb >= territory.beach_start(world) as i64 {
            BiomeId::Beach
        } else if in_core(x, z, world.plains_core_radius) {
            BiomeId::Plains
        } else {
            map.territory_at(x, z).map_or(BiomeId::Plains, |t| t.biome)
        }
    }

    fn resolve_height(&self, state: &DerivedState, x: i32, z: i32) -> Result<i32, DomainError> {
        match &state.territories {
            Some(map) => {
                let biome = self.territory_biome(map, x, z);
                state.heights.height_single(biome, x, z)
            }
            None => {
                let sample = state.climate.sample(x as f64, z as f64);
                let weights = state.blender.weights(&sample, x, z);
                state.heights.height_blended(&weights, x, z)
            }
        }
    }

    fn check_horizontal(
        &self,
        stage: GenerationStage,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<(), WorldgenError> {
        let limit = self.settings.world.max_coordinate as i64;
        if chebyshev(x, z) > limit {
            return Err(self.domain(
                stage,
                x,
                y,
                z,
                DomainError::CoordinateOutOfRange {
                    reason: format!("|x| or |z| exceeds {limit}"),
                },
            ));
        }
        Ok(())
    }

    fn domain(
        &self,
        stage: GenerationStage,
        x: i32,
        y: i32,
        z: i32,
        source: DomainError,
    ) -> WorldgenError {
        WorldgenError::Domain {
            stage,
            seed: self.seed,
            x,
            y,
            z,
            source,
        }
    }
}

/// Classify the centre of every territory-grid cell and count connected
/// regions per biome.
fn climate_regions(
    climate: &ClimateModel,
    blender: &BiomeBlender,
    world: &WorldSettings,
    cell_size: i32,
) -> RegionCounts {
    let cs = cell_size.max(1);
    let lo = (-world.radius).div_euclid(cs);
    let hi = (world.radius - 1).div_euclid(cs);
    let width = (hi - lo + 1) as usize;

    let mut grid = Vec::with_capacity(width * width);
    for cz in lo..=hi {
        for cx in lo..=hi {
            let x = cx * cs + cs / 2;
            let z = cz * cs + cs / 2;
            let sample = climate.sample(x as f64, z as f64);
            grid.push(blender.classify(&sample, x, z));
        }
    }
    validity::count_regions(&grid, width, width)
}

/// Hands out one shared [`WorldgenCore`] per seed.
///
/// Concurrent first requests for the same seed share a single core, so its
/// state is derived at most once.
pub struct CoreRegistry {
    settings: GenerationSettings,
    cores: DashMap<u64, Arc<WorldgenCore>>,
}

impl CoreRegistry {
    /// Registry whose cores all use `settings`.
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            cores: DashMap::new(),
        }
    }

    /// The initialized core for `seed`, creating it on first request.
    ///
    /// # Errors
    ///
    /// Returns the core's initialization error. The failed core stays cached.
    pub fn get_or_init(&self, seed: u64) -> Result<Arc<WorldgenCore>, WorldgenError> {
        // Clone the handle out so the shard lock is released before deriving.
        let core = Arc::clone(
            &self
                .cores
                .entry(seed)
                .or_insert_with(|| Arc::new(WorldgenCore::new(seed, self.settings.clone()))),
        );
        core.ensure_initialized()?;
        Ok(core)
    }

    /// Number of seeds with a core.
    pub fn len(&self) -> usize {
        self.cores.len()
    }

    /// Returns `true` if no core has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }
}

impl Default for CoreRegistry {
    fn default() -> Self {
        Self::new(GenerationSettings::default())
    }
}
