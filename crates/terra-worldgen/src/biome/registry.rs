//! Biome registry: maps [`BiomeId`] to [`BiomeDef`] with name-based lookup.

use std::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{BiomeDef, ClimateTarget, HeightRecipe};
use crate::block::Block;

/// Identifier of one of the closed set of biomes.
///
/// Declaration order is the fixed iteration and tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BiomeId {
    /// Temperate grassland; also the spawn core and the fallback.
    Plains,
    /// Hot and dry.
    Desert,
    /// Cold.
    Snow,
    /// Hot and wet.
    Jungle,
    /// Outer water ring.
    Ocean,
    /// Shoreline between land and ocean.
    Beach,
}

impl BiomeId {
    /// Number of biomes.
    pub const COUNT: usize = 6;

    /// Every biome in iteration order.
    pub const ALL: [BiomeId; Self::COUNT] = [
        Self::Plains,
        Self::Desert,
        Self::Snow,
        Self::Jungle,
        Self::Ocean,
        Self::Beach,
    ];

    /// Dense index in `0..COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case identifier.
    pub fn name(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Desert => "desert",
            Self::Snow => "snow",
            Self::Jungle => "jungle",
            Self::Ocean => "ocean",
            Self::Beach => "beach",
        }
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur when registering or resolving biomes.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BiomeRegistryError {
    /// A definition for this biome is already registered.
    #[error("duplicate biome definition: {0}")]
    Duplicate(BiomeId),
    /// No definition is registered for this biome.
    #[error("no definition registered for biome {0}")]
    Missing(BiomeId),
}

/// Stores biome definitions with O(1) lookup by ID.
#[derive(Clone, Debug)]
pub struct BiomeRegistry {
    biomes: Vec<Option<BiomeDef>>,
    name_to_id: HashMap<&'static str, BiomeId>,
}

impl BiomeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            biomes: vec![None; BiomeId::COUNT],
            name_to_id: HashMap::new(),
        }
    }

    /// The six built-in biomes with their default blocks, recipes, and
    /// climate targets.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for def in standard_defs() {
            // The standard table lists each biome once.
            let _ = registry.register(def);
        }
        registry
    }

    /// Registers a biome definition.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::Duplicate`] if the biome already has a definition.
    pub fn register(&mut self, def: BiomeDef) -> Result<BiomeId, BiomeRegistryError> {
        let id = def.id;
        let slot = &mut self.biomes[id.index()];
        if slot.is_some() {
            return Err(BiomeRegistryError::Duplicate(id));
        }
        *slot = Some(def);
        self.name_to_id.insert(id.name(), id);
        Ok(id)
    }

    /// Returns the definition for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BiomeRegistryError::Missing`] if nothing is registered for `id`.
    pub fn get(&self, id: BiomeId) -> Result<&BiomeDef, BiomeRegistryError> {
        self.biomes[id.index()]
            .as_ref()
            .ok_or(BiomeRegistryError::Missing(id))
    }

    /// Returns `true` if `id` has a definition.
    pub fn contains(&self, id: BiomeId) -> bool {
        self.biomes[id.index()].is_some()
    }

    /// Looks up a registered biome ID by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<BiomeId> {
        self.name_to_id.get(name).copied()
    }

    /// Registered definitions in enum order.
    pub fn iter(&self) -> impl Iterator<Item = &BiomeDef> {
        self.biomes.iter().flatten()
    }

    /// Returns the number of registered biomes.
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    /// Returns `true` if no biomes are registered.
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}

impl Default for BiomeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_defs() -> [BiomeDef; BiomeId::COUNT] {
    [
        BiomeDef {
            id: BiomeId::Plains,
            terrain_block: Block::Stone,
            surface_block: Block::Grass,
            surface_depth: 1,
            height_recipe: HeightRecipe::rolling(16.0, 64.0),
            climate_target: ClimateTarget::new(0.0, 0.2),
            aquatic: false,
            decorated: true,
        },
        BiomeDef {
            id: BiomeId::Desert,
            terrain_block: Block::RedSandstone,
            surface_block: Block::RedSand,
            surface_depth: 8,
            height_recipe: HeightRecipe::rolling(2.0, 64.0),
            climate_target: ClimateTarget::new(1.0, -0.5),
            aquatic: false,
            decorated: false,
        },
        BiomeDef {
            id: BiomeId::Snow,
            terrain_block: Block::Stone,
            surface_block: Block::SnowBlock,
            surface_depth: 8,
            height_recipe: HeightRecipe::rolling(20.0, 64.0),
            climate_target: ClimateTarget::new(-1.0, 0.3),
            aquatic: false,
            decorated: false,
        },
        BiomeDef {
            id: BiomeId::Jungle,
            terrain_block: Block::Stone,
            surface_block: Block::Podzol,
            surface_depth: 1,
            height_recipe: HeightRecipe::rolling(24.0, 64.0),
            climate_target: ClimateTarget::new(0.8, 0.8),
            aquatic: false,
            decorated: true,
        },
        BiomeDef {
            id: BiomeId::Ocean,
            terrain_block: Block::Sand,
            surface_block: Block::Sand,
            surface_depth: 1,
            height_recipe: HeightRecipe::rolling(1.0, 32.0),
            climate_target: ClimateTarget::new(0.0, 0.0),
            aquatic: true,
            decorated: false,
        },
        BiomeDef {
            id: BiomeId::Beach,
            terrain_block: Block::Sandstone,
            surface_block: Block::Sand,
            surface_depth: 8,
            height_recipe: HeightRecipe::rolling(1.0, 64.0),
            climate_target: ClimateTarget::new(0.1, 0.1),
            aquatic: true,
            decorated: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_complete() {
        let registry = BiomeRegistry::standard();
        assert_eq!(registry.len(), BiomeId::COUNT);
        for id in BiomeId::ALL {
            let def = registry.get(id).expect("standard biome missing");
            assert_eq!(def.id, id);
            assert!(def.surface_depth >= 1);
        }
    }

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, id) in BiomeId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = BiomeRegistry::standard();
        let plains = registry.get(BiomeId::Plains).cloned().expect("plains");
        let result = registry.register(plains);
        assert_eq!(result, Err(BiomeRegistryError::Duplicate(BiomeId::Plains)));
    }

    #[test]
    fn test_missing_biome_is_an_error() {
        let registry = BiomeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get(BiomeId::Ocean).map(|d| d.id),
            Err(BiomeRegistryError::Missing(BiomeId::Ocean))
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = BiomeRegistry::standard();
        assert_eq!(registry.lookup_by_name("jungle"), Some(BiomeId::Jungle));
        assert_eq!(registry.lookup_by_name("tundra"), None);
    }

    #[test]
    fn test_default_climate_targets() {
        let registry = BiomeRegistry::standard();
        let desert = registry.get(BiomeId::Desert).expect("desert");
        assert_eq!(desert.climate_target, ClimateTarget::new(1.0, -0.5));
        let ocean = registry.get(BiomeId::Ocean).expect("ocean");
        assert!(ocean.aquatic);
        assert_eq!(ocean.height_recipe.base, 32.0);
    }
}
