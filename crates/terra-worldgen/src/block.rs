//! Block kinds placed by the column builder.

use serde::{Deserialize, Serialize};

/// A block kind inside a generated column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Block {
    /// Empty space.
    #[default]
    Air,
    /// Indestructible floor at `min_y`.
    Bedrock,
    /// Generic terrain fill.
    Stone,
    /// Soil.
    Dirt,
    /// Grass-covered soil.
    Grass,
    /// Beach and sea-floor sand.
    Sand,
    /// Desert sand.
    RedSand,
    /// Compacted beach sand.
    Sandstone,
    /// Compacted desert sand.
    RedSandstone,
    /// Packed snow.
    SnowBlock,
    /// Jungle floor soil.
    Podzol,
    /// Still water up to sea level.
    Water,
    /// Single-block grass plant.
    ShortGrass,
    /// Single-block fern plant.
    Fern,
    /// Single-block bush plant.
    Bush,
    /// Lower half of a two-block grass plant.
    TallGrassLower,
    /// Upper half of a two-block grass plant.
    TallGrassUpper,
}

impl Block {
    /// Returns `true` for [`Block::Air`].
    pub fn is_air(self) -> bool {
        self == Self::Air
    }

    /// Returns `true` for non-solid plant blocks.
    pub fn is_plant(self) -> bool {
        matches!(
            self,
            Self::ShortGrass | Self::Fern | Self::Bush | Self::TallGrassLower | Self::TallGrassUpper
        )
    }

    /// Returns `true` for blocks that form the solid ground.
    pub fn is_solid(self) -> bool {
        !self.is_air() && !self.is_plant() && self != Self::Water
    }

    /// Snake-case identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Bedrock => "bedrock",
            Self::Stone => "stone",
            Self::Dirt => "dirt",
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::RedSand => "red_sand",
            Self::Sandstone => "sandstone",
            Self::RedSandstone => "red_sandstone",
            Self::SnowBlock => "snow_block",
            Self::Podzol => "podzol",
            Self::Water => "water",
            Self::ShortGrass => "short_grass",
            Self::Fern => "fern",
            Self::Bush => "bush",
            Self::TallGrassLower => "tall_grass_lower",
            Self::TallGrassUpper => "tall_grass_upper",
        }
    }
}
