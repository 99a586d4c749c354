//! Surface height resolution.
//!
//! Combines the biome height fields with a radial ocean falloff so that the
//! square world slopes into a deep ocean past its radius.

use crate::biome::{BiomeId, BiomeRegistry, BlendWeights};
use crate::error::DomainError;
use crate::noise_field::NoiseField;
use crate::seed::{HEIGHT_SALT, OCEAN_FLOOR_SALT, stream};
use crate::settings::WorldSettings;

/// `max(|x|, |z|)` without overflowing at `i32::MIN`.
#[inline]
pub fn chebyshev(x: i32, z: i32) -> i64 {
    (x as i64).abs().max((z as i64).abs())
}

/// Returns `true` if `(x, z)` lies strictly inside the circle of `radius`.
#[inline]
pub fn in_core(x: i32, z: i32, radius: i32) -> bool {
    let (x, z, r) = (x as i64, z as i64, radius as i64);
    x * x + z * z < r * r
}

/// Cubic Hermite step `t²(3 − 2t)` over `t` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// `a + t * (b - a)`.
#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// How far `(x, z)` has fallen into the ocean, from `0` inland to `1` past
/// the radius.
pub fn ocean_blend(world: &WorldSettings, x: i32, z: i32) -> f64 {
    let start = (world.radius - world.beach_width) as f64;
    let span = (world.beach_width + world.slope_width) as f64;
    smoothstep((chebyshev(x, z) as f64 - start) / span)
}

/// Resolves the integer surface elevation of a column.
#[derive(Clone, Debug)]
pub struct SurfaceHeightResolver {
    world: WorldSettings,
    min_contribution: f64,
    fields: [Option<NoiseField>; BiomeId::COUNT],
    ocean_floor: NoiseField,
}

impl SurfaceHeightResolver {
    /// Build height fields for every registered biome.
    ///
    /// Each biome draws its lattice from its own stream, so adding a biome
    /// never changes another biome's terrain.
    pub fn new(
        seed: u64,
        registry: &BiomeRegistry,
        world: WorldSettings,
        min_contribution: f64,
    ) -> Self {
        let mut fields: [Option<NoiseField>; BiomeId::COUNT] = Default::default();
        for def in registry.iter() {
            let salt = format!("{HEIGHT_SALT}/{}", def.id.name());
            fields[def.id.index()] = Some(def.height_recipe.build(&mut stream(seed, &salt)));
        }

        let ocean_floor = NoiseField::from_stream(&mut stream(seed, OCEAN_FLOOR_SALT))
            .frequency(world.ocean_noise_frequency)
            .scale(world.ocean_noise_amplitude);

        Self {
            world,
            min_contribution,
            fields,
            ocean_floor,
        }
    }

    /// Raw (unrounded) height of a single biome's field.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingBiome`] if `biome` has no height field.
    pub fn biome_height(&self, biome: BiomeId, x: i32, z: i32) -> Result<f64, DomainError> {
        let field = self.fields[biome.index()]
            .as_ref()
            .ok_or(DomainError::MissingBiome(biome))?;
        Ok(field.sample(x as f64, z as f64))
    }

    /// Weighted inland elevation.
    ///
    /// Biomes contributing less than the minimum weight are skipped and the
    /// remaining weights renormalized. If every weight is below the minimum,
    /// the dominant biome is used alone.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingBiome`] if a contributing biome has no height field.
    pub fn blended_height(
        &self,
        weights: &BlendWeights,
        x: i32,
        z: i32,
    ) -> Result<f64, DomainError> {
        let mut total = 0.0;
        let mut kept = 0.0;
        for (id, w) in weights.iter() {
            if w < self.min_contribution {
                continue;
            }
            total += self.biome_height(id, x, z)? * w;
            kept += w;
        }

        if kept > 0.0 {
            Ok(total / kept)
        } else {
            self.biome_height(weights.dominant(), x, z)
        }
    }

    /// Apply ocean falloff, coastal flattening, and dampening to an inland
    /// elevation, then round and clamp to the world's surface range.
    pub fn resolve(&self, inland: f64, x: i32, z: i32) -> i32 {
        let w = &self.world;
        let b = ocean_blend(w, x, z);

        let n = self.ocean_floor.sample(x as f64, z as f64);
        let ocean_target = lerp(
            b,
            w.ocean_floor_y() as f64 + n,
            w.deep_ocean_floor_y() as f64 + n,
        );

        let base = w.base_surface_y as f64;
        let coast_factor = 1.0 - (1.3 * b).clamp(0.0, 1.0);
        let coastal_inland = base + (inland - base) * coast_factor;

        let mut h = lerp(b, coastal_inland, ocean_target);
        if b > w.ocean_blend_min && b < w.ocean_blend_max {
            h = h.min((w.sea_level + w.beach_dry_height) as f64);
        }

        (h.round() as i32).clamp(w.min_surface_y(), w.max_surface_y())
    }

    /// Surface height of a blended column.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingBiome`] if a contributing biome has no height field.
    pub fn height_blended(
        &self,
        weights: &BlendWeights,
        x: i32,
        z: i32,
    ) -> Result<i32, DomainError> {
        Ok(self.resolve(self.blended_height(weights, x, z)?, x, z))
    }

    /// Surface height of a column owned by a single biome.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingBiome`] if `biome` has no height field.
    pub fn height_single(&self, biome: BiomeId, x: i32, z: i32) -> Result<i32, DomainError> {
        Ok(self.resolve(self.biome_height(biome, x, z)?, x, z))
    }

    /// World settings the resolver clamps against.
    pub fn world(&self) -> &WorldSettings {
        &self.world
    }
}
