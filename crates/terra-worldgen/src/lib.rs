//! Deterministic procedural world generation: climate noise, biome placement,
//! surface heights, and block columns for a square island world.
//!
//! Every answer is a pure function of the world seed and the queried position.
//! Derived state is built once per seed by [`WorldgenCore`] and is read-only
//! afterwards, so a core can be queried from any number of threads.

mod batch;
mod block;
mod climate;
mod column;
mod error;
mod generator;
mod noise_field;
mod settings;
mod terrain_height;

pub mod biome;
pub mod debug_viz;
pub mod seed;

pub use batch::{ColumnBatchGenerator, GeneratedRegion, REGION_SIZE, generate_region_sync};
pub use biome::{
    BiomeBlender, BiomeDef, BiomeId, BiomeRegionAllocator, BiomeRegistry, BiomeRegistryError,
    BlendWeights, ClimateTarget, HeightRecipe, RegionCounts, Territory, TerritoryMap,
};
pub use block::Block;
pub use climate::{ClimateModel, ClimateSample};
pub use column::{Column, ColumnBuilder, Plant};
pub use error::{DomainError, GenerationStage, WorldgenError};
pub use generator::{CoreRegistry, WorldgenCore};
pub use noise_field::NoiseField;
pub use settings::{
    BlendSettings, ClimateSettings, CoastBias, DecorationSettings, GenerationSettings,
    PlacementMode, RegionRule, TerritoryRequest, TerritorySettings, ValidationSettings,
    WorldSettings,
};
pub use terrain_height::{SurfaceHeightResolver, chebyshev, ocean_blend, smoothstep};
