//! Biome system: registry, climate-space blending, and discrete territories.
//!
//! Biomes are a closed set. Blended placement weighs every biome by its
//! climate-space distance; territory placement grows contiguous regions from
//! seeded anchors on a coarse grid.

mod blend;
mod def;
mod registry;
mod territory;
pub mod validity;

pub use blend::{BiomeBlender, BlendWeights};
pub use def::{BiomeDef, ClimateTarget, HeightRecipe};
pub use registry::{BiomeId, BiomeRegistry, BiomeRegistryError};
pub use territory::{BiomeRegionAllocator, Territory, TerritoryMap};
pub use validity::RegionCounts;
