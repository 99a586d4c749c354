//! Block column filling and surface plant decoration.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::biome::{BiomeDef, BiomeId};
use crate::block::Block;
use crate::seed::{PLANT_SALT, column_rng};
use crate::settings::{DecorationSettings, WorldSettings};

/// A full vertical column of blocks.
///
/// Index `0` of the block buffer is `min_y`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Block X.
    pub x: i32,
    /// Block Z.
    pub z: i32,
    /// Y of the lowest block.
    pub min_y: i32,
    /// Biome the column was built for.
    pub biome: BiomeId,
    /// Y of the topmost ground block.
    pub surface_height: i32,
    blocks: Vec<Block>,
}

impl Column {
    /// Block at `y`, or `None` outside the column.
    pub fn get(&self, y: i32) -> Option<Block> {
        let i = usize::try_from(y.checked_sub(self.min_y)?).ok()?;
        self.blocks.get(i).copied()
    }

    /// Blocks from `min_y` upward.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// `(y, block)` pairs from `min_y` upward.
    pub fn iter(&self) -> impl Iterator<Item = (i32, Block)> + '_ {
        (self.min_y..).zip(self.blocks.iter().copied())
    }

    /// Y of the highest block in the column.
    pub fn top_y(&self) -> i32 {
        self.min_y + self.blocks.len() as i32 - 1
    }

    /// Number of blocks equal to `block`.
    pub fn count(&self, block: Block) -> usize {
        self.blocks.iter().filter(|b| **b == block).count()
    }

    /// Plant placed on the surface, if any.
    pub fn plant(&self) -> Option<Block> {
        self.get(self.surface_height + 1).filter(|b| b.is_plant())
    }

    fn set(&mut self, y: i32, block: Block) {
        if let Some(slot) = usize::try_from(y - self.min_y)
            .ok()
            .and_then(|i| self.blocks.get_mut(i))
        {
            *slot = block;
        }
    }
}

/// Plant chosen for a decorated column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plant {
    /// Two-block grass.
    TallGrass,
    /// Fern.
    Fern,
    /// Bush.
    Bush,
    /// Short grass.
    ShortGrass,
}

/// Fills columns for a single world seed.
#[derive(Clone, Debug)]
pub struct ColumnBuilder {
    seed: u64,
    world: WorldSettings,
    decoration: DecorationSettings,
}

impl ColumnBuilder {
    /// Builder for `seed` with the given bounds and decoration odds.
    pub fn new(seed: u64, world: WorldSettings, decoration: DecorationSettings) -> Self {
        Self {
            seed,
            world,
            decoration,
        }
    }

    /// Build the column at `(x, z)` with its surface at `height`.
    ///
    /// `height` is expected inside `[min_y + 1, min_y + world_height - 2]`;
    /// layers outside the column are dropped.
    pub fn build(&self, x: i32, z: i32, height: i32, def: &BiomeDef) -> Column {
        let w = &self.world;
        let mut column = Column {
            x,
            z,
            min_y: w.min_y,
            biome: def.id,
            surface_height: height,
            blocks: vec![Block::Air; w.world_height.max(0) as usize],
        };

        column.set(w.min_y, Block::Bedrock);

        let depth = def.surface_depth.max(1) as i32;
        let cap_bottom = (height - depth + 1).max(w.min_y + 1);
        for y in w.min_y + 1..cap_bottom {
            column.set(y, def.terrain_block);
        }
        for y in cap_bottom..=height {
            column.set(y, def.surface_block);
        }

        if def.aquatic && height < w.sea_level {
            for y in height + 1..=w.sea_level.min(column.top_y()) {
                column.set(y, Block::Water);
            }
        }

        if def.decorated && def.surface_block == Block::Grass {
            self.decorate(&mut column);
        }

        column
    }

    /// Roll the plant for `(x, z)`. Always consumes the same draws in the
    /// same order: density, tall, fern, bush.
    pub fn roll_plant(&self, x: i32, z: i32) -> Option<Plant> {
        let mut rng = column_rng(self.seed, PLANT_SALT, x, z);
        let d = &self.decoration;

        if roll(&mut rng) >= d.density_percent {
            return None;
        }
        let tall = roll(&mut rng) < d.tall_percent;
        let fern = roll(&mut rng) < d.fern_percent;
        let bush = roll(&mut rng) < d.bush_percent;

        Some(if tall {
            Plant::TallGrass
        } else if fern {
            Plant::Fern
        } else if bush {
            Plant::Bush
        } else {
            Plant::ShortGrass
        })
    }

    fn decorate(&self, column: &mut Column) {
        let Some(plant) = self.roll_plant(column.x, column.z) else {
            return;
        };
        let y = column.surface_height + 1;
        if column.get(y) != Some(Block::Air) {
            return;
        }

        match plant {
            Plant::TallGrass => {
                if column.get(y + 1) == Some(Block::Air) {
                    column.set(y, Block::TallGrassLower);
                    column.set(y + 1, Block::TallGrassUpper);
                }
            }
            Plant::Fern => column.set(y, Block::Fern),
            Plant::Bush => column.set(y, Block::Bush),
            Plant::ShortGrass => column.set(y, Block::ShortGrass),
        }
    }
}

#[inline]
fn roll(rng: &mut ChaCha8Rng) -> u32 {
    rng.random_range(0..100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeRegistry;

    fn builder(seed: u64) -> ColumnBuilder {
        ColumnBuilder::new(seed, WorldSettings::default(), DecorationSettings::default())
    }

    fn def(id: BiomeId) -> BiomeDef {
        BiomeRegistry::standard().get(id).cloned().expect("standard biome")
    }

    /// Asserts bedrock → fill → cap → water → plant → air ordering.
    fn assert_layered(column: &Column, def: &BiomeDef) {
        let rank = |b: Block| -> u8 {
            match b {
                Block::Bedrock => 0,
                b if b == def.terrain_block && b != def.surface_block => 1,
                b if b == def.surface_block => 2,
                Block::Water => 3,
                b if b.is_plant() => 4,
                Block::Air => 5,
                other => panic!("unexpected block {other:?}"),
            }
        };
        assert_eq!(column.get(column.min_y), Some(Block::Bedrock));
        assert_eq!(column.count(Block::Bedrock), 1);
        let ranks: Vec<u8> = column.blocks().iter().map(|b| rank(*b)).collect();
        assert!(
            ranks.windows(2).all(|w| w[0] <= w[1]),
            "column layering is not monotonic: {ranks:?}"
        );
    }

    #[test]
    fn test_plains_column_layers() {
        let plains = def(BiomeId::Plains);
        let column = builder(42).build(10, 20, 70, &plains);

        assert_layered(&column, &plains);
        assert_eq!(column.get(70), Some(Block::Grass));
        assert_eq!(column.get(69), Some(Block::Stone));
        assert_eq!(column.get(-63), Some(Block::Stone));
        assert!(matches!(column.get(71), Some(b) if b.is_air() || b.is_plant()));
        assert_eq!(column.get(73), Some(Block::Air));
        assert_eq!(column.count(Block::Water), 0);
    }

    #[test]
    fn test_surface_depth_cap() {
        let desert = def(BiomeId::Desert);
        let column = builder(1).build(0, 0, 64, &desert);
        assert_layered(&column, &desert);
        assert_eq!(column.count(Block::RedSand), 8);
        for y in 57..=64 {
            assert_eq!(column.get(y), Some(Block::RedSand));
        }
        assert_eq!(column.get(56), Some(Block::RedSandstone));
        assert_eq!(column.get(65), Some(Block::Air));
    }

    #[test]
    fn test_ocean_fills_water_to_sea_level() {
        let ocean = def(BiomeId::Ocean);
        let column = builder(42).build(600, 0, 36, &ocean);
        assert_layered(&column, &ocean);
        assert_eq!(column.get(36), Some(Block::Sand));
        for y in 37..=50 {
            assert_eq!(column.get(y), Some(Block::Water), "expected water at y={y}");
        }
        assert_eq!(column.get(51), Some(Block::Air));
        assert_eq!(column.count(Block::Water), 14);
    }

    #[test]
    fn test_dry_land_never_floods() {
        let snow = def(BiomeId::Snow);
        let column = builder(42).build(0, 0, 30, &snow);
        assert_eq!(column.count(Block::Water), 0, "non-aquatic biomes stay dry");
    }

    #[test]
    fn test_surface_at_floor_keeps_bedrock() {
        let beach = def(BiomeId::Beach);
        let world = WorldSettings::default();
        let column = builder(3).build(0, 0, world.min_surface_y(), &beach);
        assert_layered(&column, &beach);
        assert_eq!(column.get(world.min_y), Some(Block::Bedrock));
        assert_eq!(column.get(world.min_surface_y()), Some(Block::Sand));
    }

    #[test]
    fn test_plant_roll_is_deterministic() {
        let b = builder(7);
        for x in -50..50 {
            assert_eq!(b.roll_plant(x, -x * 3), b.roll_plant(x, -x * 3));
        }
    }

    #[test]
    fn test_plant_density_roughly_matches() {
        let b = builder(99);
        let planted = (0..2000).filter(|i| b.roll_plant(*i, 17).is_some()).count();
        assert!(
            (1300..=1700).contains(&planted),
            "expected about 75% planted, got {planted}/2000"
        );
    }

    #[test]
    fn test_zero_density_never_plants() {
        let b = ColumnBuilder::new(
            5,
            WorldSettings::default(),
            DecorationSettings {
                density_percent: 0,
                ..DecorationSettings::default()
            },
        );
        let plains = def(BiomeId::Plains);
        for x in 0..200 {
            let column = b.build(x, 0, 64, &plains);
            assert!(column.plant().is_none());
        }
    }

    #[test]
    fn test_only_grass_surfaces_are_decorated() {
        let b = builder(11);
        let jungle = def(BiomeId::Jungle);
        assert!(jungle.decorated);
        for x in 0..200 {
            let column = b.build(x, 3, 64, &jungle);
            assert!(column.plant().is_none(), "podzol must not carry plants");
        }
    }

    #[test]
    fn test_tall_grass_needs_headroom() {
        let b = ColumnBuilder::new(
            5,
            WorldSettings::default(),
            DecorationSettings {
                density_percent: 100,
                tall_percent: 100,
                ..DecorationSettings::default()
            },
        );
        let plains = def(BiomeId::Plains);
        let world = WorldSettings::default();

        let column = b.build(0, 0, 64, &plains);
        assert_eq!(column.get(65), Some(Block::TallGrassLower));
        assert_eq!(column.get(66), Some(Block::TallGrassUpper));

        let column = b.build(0, 0, world.max_surface_y(), &plains);
        assert!(column.plant().is_none(), "tall grass past the ceiling is skipped");
        assert_eq!(column.get(world.top_y()), Some(Block::Air));
    }

    #[test]
    fn test_column_get_out_of_range() {
        let column = builder(1).build(0, 0, 64, &def(BiomeId::Plains));
        assert_eq!(column.get(-65), None);
        assert_eq!(column.get(320), None);
        assert_eq!(column.get(i32::MIN), None);
        assert_eq!(column.top_y(), 319);
        assert_eq!(column.iter().count(), 384);
    }
}
