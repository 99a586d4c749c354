//! Generation settings with sensible defaults.
//!
//! All structs are `#[serde(default)]` so a partial RON file only overrides
//! the fields it names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::biome::BiomeId;

/// How biomes are assigned to positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Smooth inverse-distance blending in climate space.
    #[default]
    Blended,
    /// Discrete, contiguous territories grown from seeded anchors.
    Territory,
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blended => f.write_str("blended"),
            Self::Territory => f.write_str("territory"),
        }
    }
}

impl FromStr for PlacementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blended" | "blend" => Ok(Self::Blended),
            "territory" | "territories" => Ok(Self::Territory),
            other => Err(format!(
                "unknown placement mode '{other}' (expected 'blended' or 'territory')"
            )),
        }
    }
}

/// Top-level generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Biome placement strategy.
    pub placement: PlacementMode,
    /// World bounds and edge falloff.
    pub world: WorldSettings,
    /// Climate noise fields.
    pub climate: ClimateSettings,
    /// Climate-space blending.
    pub blend: BlendSettings,
    /// Discrete territory allocation.
    pub territory: TerritorySettings,
    /// Surface plant decoration.
    pub decoration: DecorationSettings,
    /// Validity-retry loop.
    pub validation: ValidationSettings,
}

/// World bounds, sea level, and ocean falloff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldSettings {
    /// Half-width of the playable square, in blocks.
    pub radius: i32,
    /// Water fills aquatic columns up to and including this Y.
    pub sea_level: i32,
    /// Lowest Y of every column; bedrock lives here.
    pub min_y: i32,
    /// Number of blocks in a column.
    pub world_height: i32,
    /// Positions closer than this to the origin are always plains.
    pub plains_core_radius: i32,
    /// Reference surface elevation for coastal flattening.
    pub base_surface_y: i32,
    /// Width of the band, inside the radius, over which land falls into ocean.
    pub beach_width: i32,
    /// Extra falloff distance past the radius.
    pub slope_width: i32,
    /// Maximum coastal elevation above sea level.
    pub beach_dry_height: i32,
    /// Lower ocean-blend bound of the coastal dampening band.
    pub ocean_blend_min: f64,
    /// Upper ocean-blend bound of the coastal dampening band.
    pub ocean_blend_max: f64,
    /// Shallow ocean floor depth below sea level.
    pub ocean_floor_depth: i32,
    /// Deep ocean floor depth below sea level.
    pub deep_ocean_floor_depth: i32,
    /// Frequency of the ocean floor perturbation noise.
    pub ocean_noise_frequency: f64,
    /// Amplitude of the ocean floor perturbation noise.
    pub ocean_noise_amplitude: f64,
    /// Largest accepted absolute horizontal coordinate.
    pub max_coordinate: i32,
}

impl WorldSettings {
    /// Y of the shallow ocean floor.
    pub fn ocean_floor_y(&self) -> i32 {
        self.sea_level - self.ocean_floor_depth
    }

    /// Y of the deep ocean floor.
    pub fn deep_ocean_floor_y(&self) -> i32 {
        self.sea_level - self.deep_ocean_floor_depth
    }

    /// Lowest surface elevation (one above bedrock).
    pub fn min_surface_y(&self) -> i32 {
        self.min_y + 1
    }

    /// Highest surface elevation (leaves a ceiling margin).
    pub fn max_surface_y(&self) -> i32 {
        self.min_y + self.world_height - 2
    }

    /// Highest Y inside a column.
    pub fn top_y(&self) -> i32 {
        self.min_y + self.world_height - 1
    }

    /// Returns `true` if `y` lies inside a column.
    pub fn contains_y(&self, y: i32) -> bool {
        y >= self.min_y && y <= self.top_y()
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            radius: 512,
            sea_level: 50,
            min_y: -64,
            world_height: 384,
            plains_core_radius: 128,
            base_surface_y: 63,
            beach_width: 256,
            slope_width: 10,
            beach_dry_height: 100,
            ocean_blend_min: 0.4,
            ocean_blend_max: 0.75,
            ocean_floor_depth: 8,
            deep_ocean_floor_depth: 16,
            ocean_noise_frequency: 0.02,
            ocean_noise_amplitude: 2.0,
            max_coordinate: 30_000_000,
        }
    }
}

/// Climate noise configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimateSettings {
    /// Temperature period in blocks; coordinates are divided by this.
    pub temperature_scale: f64,
    /// Humidity period in blocks.
    pub humidity_scale: f64,
    /// Octaves of the temperature and humidity fields.
    pub octaves: u32,
    /// Lacunarity of the temperature and humidity fields.
    pub lacunarity: f64,
    /// Gain of the temperature and humidity fields.
    pub gain: f64,
    /// Coastline perturbation amplitude, in blocks.
    pub coastline_amplitude: f64,
    /// Coastline perturbation frequency.
    pub coastline_frequency: f64,
    /// Offset applied to the second (transposed) coastline sample.
    pub coastline_offset: f64,
    /// Frequency of the normalized-elevation axis.
    pub elevation_frequency: f64,
}

impl Default for ClimateSettings {
    fn default() -> Self {
        Self {
            temperature_scale: 512.0,
            humidity_scale: 512.0,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            coastline_amplitude: 8.0,
            coastline_frequency: 0.01,
            coastline_offset: 128.0,
            elevation_frequency: 0.008,
        }
    }
}

/// A coastline distance bias: `dist += base - (coast + chebyshev) / divisor`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoastBias {
    /// Bias at the origin.
    pub base: f64,
    /// Blocks per unit of bias reduction.
    pub divisor: f64,
}

/// Climate-space blending configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlendSettings {
    /// Inverse-power exponent; larger values sharpen borders.
    pub power: f64,
    /// Added to every distance so an exact target match stays finite.
    pub epsilon: f64,
    /// Height contributions below this weight are skipped.
    pub min_contribution: f64,
    /// Bias applied to the ocean distance.
    pub ocean_bias: CoastBias,
    /// Bias applied to the beach distance.
    pub beach_bias: CoastBias,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            power: 10.0,
            epsilon: 0.0001,
            min_contribution: 0.01,
            ocean_bias: CoastBias {
                base: 6.5,
                divisor: 64.0,
            },
            beach_bias: CoastBias {
                base: 2.0,
                divisor: 192.0,
            },
        }
    }
}

/// One requested group of territories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerritoryRequest {
    /// Biome the territories belong to.
    pub biome: BiomeId,
    /// Number of territories of this biome.
    pub count: u32,
    /// Target size of each territory, in cells.
    pub target_cells: u32,
}

/// Discrete territory allocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerritorySettings {
    /// Side length of a grid cell, in blocks.
    pub cell_size: i32,
    /// Width of the outer ocean band, in blocks.
    pub ocean_band: i32,
    /// Width of the beach band just inside the ocean band, in blocks.
    pub beach_band: i32,
    /// Minimum Euclidean distance of an anchor from the origin.
    pub min_anchor_distance: i32,
    /// Anchors stay this far inside the beach band.
    pub anchor_margin: i32,
    /// Minimum Euclidean distance between any two anchors.
    pub min_separation: i32,
    /// Random draws per anchor before placement gives up.
    pub anchor_attempts: u32,
    /// Place the second territory of a biome at the negated first anchor.
    pub mirror_pairs: bool,
    /// Territories to grow, in growth order.
    pub territories: Vec<TerritoryRequest>,
}

impl TerritorySettings {
    /// Chebyshev distance at which the beach band begins.
    pub fn beach_start(&self, world: &WorldSettings) -> i32 {
        world.radius - self.ocean_band - self.beach_band
    }

    /// Chebyshev distance at which the ocean band begins.
    pub fn ocean_start(&self, world: &WorldSettings) -> i32 {
        world.radius - self.ocean_band
    }

    /// Largest Chebyshev distance an anchor may sit at.
    pub fn max_anchor_distance(&self, world: &WorldSettings) -> i32 {
        self.beach_start(world) - self.anchor_margin
    }
}

impl Default for TerritorySettings {
    fn default() -> Self {
        Self {
            cell_size: 16,
            ocean_band: 96,
            beach_band: 64,
            min_anchor_distance: 192,
            anchor_margin: 32,
            min_separation: 160,
            anchor_attempts: 64,
            mirror_pairs: true,
            territories: vec![
                TerritoryRequest {
                    biome: BiomeId::Desert,
                    count: 1,
                    target_cells: 160,
                },
                TerritoryRequest {
                    biome: BiomeId::Snow,
                    count: 2,
                    target_cells: 96,
                },
                TerritoryRequest {
                    biome: BiomeId::Jungle,
                    count: 1,
                    target_cells: 140,
                },
            ],
        }
    }
}

/// Plant decoration probabilities, each out of 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationSettings {
    /// Percentage of eligible columns that receive a plant.
    pub density_percent: u32,
    /// Percentage of planted columns that get two-block tall grass.
    pub tall_percent: u32,
    /// Percentage of short plants that are ferns.
    pub fern_percent: u32,
    /// Percentage of remaining short plants that are bushes.
    pub bush_percent: u32,
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            density_percent: 75,
            tall_percent: 1,
            fern_percent: 10,
            bush_percent: 15,
        }
    }
}

/// Allowed number of territories (or connected regions) of one biome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionRule {
    /// Biome the rule applies to.
    pub biome: BiomeId,
    /// Minimum count, inclusive.
    pub min: u32,
    /// Maximum count, inclusive. `None` means unbounded.
    pub max: Option<u32>,
}

/// Validity-retry loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationSettings {
    /// Re-roll the climate fields in blended mode until the region counts
    /// satisfy [`ValidationSettings::rules`].
    pub climate: bool,
    /// Attempts before initialization fails with a configuration error.
    pub max_attempts: u32,
    /// Per-biome count bounds.
    pub rules: Vec<RegionRule>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            climate: false,
            max_attempts: 64,
            rules: vec![
                RegionRule {
                    biome: BiomeId::Snow,
                    min: 1,
                    max: Some(2),
                },
                RegionRule {
                    biome: BiomeId::Desert,
                    min: 1,
                    max: None,
                },
                RegionRule {
                    biome: BiomeId::Jungle,
                    min: 1,
                    max: None,
                },
            ],
        }
    }
}

impl GenerationSettings {
    /// Check internal consistency. Returns a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.world;
        if w.radius <= 0 {
            return Err(format!("world radius must be positive, got {}", w.radius));
        }
        if w.world_height < 4 {
            return Err(format!(
                "world height must be at least 4, got {}",
                w.world_height
            ));
        }
        if !w.contains_y(w.sea_level) {
            return Err(format!(
                "sea level {} lies outside the column [{}, {}]",
                w.sea_level,
                w.min_y,
                w.top_y()
            ));
        }
        if w.beach_width + w.slope_width <= 0 {
            return Err("beach width plus slope width must be positive".to_string());
        }
        if w.ocean_blend_min >= w.ocean_blend_max {
            return Err(format!(
                "ocean blend band [{}, {}] is empty",
                w.ocean_blend_min, w.ocean_blend_max
            ));
        }
        if w.max_coordinate <= 0 {
            return Err("max coordinate must be positive".to_string());
        }
        if self.climate.octaves == 0 {
            return Err("climate octaves must be at least 1".to_string());
        }
        if self.climate.temperature_scale <= 0.0 || self.climate.humidity_scale <= 0.0 {
            return Err("climate scales must be positive".to_string());
        }
        if self.blend.epsilon <= 0.0 || self.blend.power <= 0.0 {
            return Err("blend epsilon and power must be positive".to_string());
        }
        if self.territory.cell_size <= 0 {
            return Err(format!(
                "territory cell size must be positive, got {}",
                self.territory.cell_size
            ));
        }
        let d = &self.decoration;
        for (name, value) in [
            ("density", d.density_percent),
            ("tall", d.tall_percent),
            ("fern", d.fern_percent),
            ("bush", d.bush_percent),
        ] {
            if value > 100 {
                return Err(format!("{name} percentage {value} exceeds 100"));
            }
        }
        if self.validation.max_attempts == 0 {
            return Err("validation needs at least one attempt".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GenerationSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_derived_world_bounds() {
        let w = WorldSettings::default();
        assert_eq!(w.ocean_floor_y(), 42);
        assert_eq!(w.deep_ocean_floor_y(), 34);
        assert_eq!(w.min_surface_y(), -63);
        assert_eq!(w.max_surface_y(), 318);
        assert_eq!(w.top_y(), 319);
        assert!(w.contains_y(-64));
        assert!(!w.contains_y(320));
    }

    #[test]
    fn test_territory_bands() {
        let w = WorldSettings::default();
        let t = TerritorySettings::default();
        assert_eq!(t.ocean_start(&w), 416);
        assert_eq!(t.beach_start(&w), 352);
        assert_eq!(t.max_anchor_distance(&w), 320);
    }

    #[test]
    fn test_placement_mode_parsing() {
        assert_eq!("blended".parse(), Ok(PlacementMode::Blended));
        assert_eq!("Territory".parse(), Ok(PlacementMode::Territory));
        assert!("voronoi".parse::<PlacementMode>().is_err());
        assert_eq!(PlacementMode::Territory.to_string(), "territory");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = GenerationSettings::default();
        settings.world.sea_level = 10_000;
        assert!(settings.validate().is_err());

        let mut settings = GenerationSettings::default();
        settings.climate.octaves = 0;
        assert!(settings.validate().is_err());

        let mut settings = GenerationSettings::default();
        settings.decoration.density_percent = 101;
        assert!(settings.validate().is_err());

        let mut settings = GenerationSettings::default();
        settings.validation.max_attempts = 0;
        assert!(settings.validate().is_err());
    }
}
