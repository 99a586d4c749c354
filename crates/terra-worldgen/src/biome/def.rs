//! Biome definition: describes the properties of a single biome type.

use rand_chacha::ChaCha8Rng;

use super::BiomeId;
use crate::block::Block;
use crate::climate::ClimateSample;
use crate::noise_field::NoiseField;
use crate::seed::det_sqrt;

/// Recipe for a biome's surface height field:
/// `simplex.scale(amplitude).offset(base).octavate(octaves, lacunarity, gain).frequency(frequency)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightRecipe {
    /// Peak deviation from `base`, in blocks.
    pub amplitude: f64,
    /// Mean surface elevation.
    pub base: f64,
    /// Octave count.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub gain: f64,
    /// Input coordinate multiplier.
    pub frequency: f64,
}

impl HeightRecipe {
    /// Four-octave rolling terrain at a 128-block period.
    pub fn rolling(amplitude: f64, base: f64) -> Self {
        Self {
            amplitude,
            base,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            frequency: 1.0 / 128.0,
        }
    }

    /// Build the height field, drawing its lattice from `rng`.
    pub fn build(&self, rng: &mut ChaCha8Rng) -> NoiseField {
        NoiseField::from_stream(rng)
            .scale(self.amplitude)
            .offset(self.base)
            .octavate(self.octaves, self.lacunarity, self.gain)
            .frequency(self.frequency)
    }
}

/// Point in climate space a biome is attracted to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateTarget {
    /// Target temperature.
    pub temperature: f64,
    /// Target humidity.
    pub humidity: f64,
    /// Optional target on the normalized-elevation axis.
    pub elevation: Option<f64>,
}

impl ClimateTarget {
    /// Temperature/humidity target with no elevation preference.
    pub const fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
            elevation: None,
        }
    }

    /// Euclidean distance from `sample` to this target.
    ///
    /// The elevation axis only contributes when the target carries one.
    pub fn distance(&self, sample: &ClimateSample) -> f64 {
        let dt = sample.temperature - self.temperature;
        let dh = sample.humidity - self.humidity;
        let de = self.elevation.map_or(0.0, |e| sample.elevation - e);
        det_sqrt(dt * dt + dh * dh + de * de)
    }
}

/// Full descriptor for a biome type.
#[derive(Clone, Debug)]
pub struct BiomeDef {
    /// Which biome this describes.
    pub id: BiomeId,
    /// Block filling the column between bedrock and the surface cap.
    pub terrain_block: Block,
    /// Block forming the top `surface_depth` layers.
    pub surface_block: Block,
    /// Thickness of the surface cap, at least 1.
    pub surface_depth: u32,
    /// Surface height field recipe.
    pub height_recipe: HeightRecipe,
    /// Climate attractor used by blending.
    pub climate_target: ClimateTarget,
    /// Columns below sea level are flooded with water.
    pub aquatic: bool,
    /// Columns may receive surface plants.
    pub decorated: bool,
}
