//! Climate-space biome blending.
//!
//! Every biome is weighted by an inverse power of its distance to the sampled
//! climate. Ocean and beach distances are additionally biased by how far the
//! position sits from the origin, so water dominates towards the world edge.

use super::{BiomeId, BiomeRegistry, ClimateTarget};
use crate::climate::ClimateSample;
use crate::seed::det_pow;
use crate::settings::{BlendSettings, CoastBias};
use crate::terrain_height::{chebyshev, in_core};

/// Normalized per-biome weights in [`BiomeId`] order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendWeights {
    weights: [f64; BiomeId::COUNT],
}

impl BlendWeights {
    /// All weight on a single biome.
    pub fn single(id: BiomeId) -> Self {
        let mut weights = [0.0; BiomeId::COUNT];
        weights[id.index()] = 1.0;
        Self { weights }
    }

    /// Weight of `id`.
    pub fn get(&self, id: BiomeId) -> f64 {
        self.weights[id.index()]
    }

    /// `(biome, weight)` pairs in enum order.
    pub fn iter(&self) -> impl Iterator<Item = (BiomeId, f64)> + '_ {
        BiomeId::ALL.iter().map(|id| (*id, self.weights[id.index()]))
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Biome with the largest weight. Ties go to the earliest biome.
    pub fn dominant(&self) -> BiomeId {
        let mut best = BiomeId::ALL[0];
        for (id, w) in self.iter() {
            if w > self.get(best) {
                best = id;
            }
        }
        best
    }
}

/// Turns climate samples into [`BlendWeights`] or a single biome.
#[derive(Clone, Debug)]
pub struct BiomeBlender {
    targets: [Option<ClimateTarget>; BiomeId::COUNT],
    settings: BlendSettings,
    core_radius: i32,
}

impl BiomeBlender {
    /// Blender over every biome registered in `registry`.
    pub fn new(registry: &BiomeRegistry, settings: BlendSettings, core_radius: i32) -> Self {
        let mut targets = [None; BiomeId::COUNT];
        for def in registry.iter() {
            targets[def.id.index()] = Some(def.climate_target);
        }
        Self {
            targets,
            settings,
            core_radius,
        }
    }

    /// Biased climate-space distance from `sample` to `id`'s target, or
    /// `None` if `id` is not registered.
    pub fn distance(&self, id: BiomeId, sample: &ClimateSample, x: i32, z: i32) -> Option<f64> {
        let target = self.targets[id.index()]?;
        let cheb = chebyshev(x, z) as f64;
        let bias = |bias: &CoastBias, coast: f64| bias.base - (coast + cheb) / bias.divisor;

        let mut dist = target.distance(sample);
        match id {
            BiomeId::Ocean => dist += bias(&self.settings.ocean_bias, sample.coast_primary),
            BiomeId::Beach => dist += bias(&self.settings.beach_bias, sample.coast_secondary),
            _ => {}
        }
        Some(dist.max(0.0))
    }

    /// Normalized weights at `(x, z)` for `sample`.
    pub fn weights(&self, sample: &ClimateSample, x: i32, z: i32) -> BlendWeights {
        let mut weights = [0.0; BiomeId::COUNT];
        let mut total = 0.0;

        for id in BiomeId::ALL {
            if let Some(dist) = self.distance(id, sample, x, z) {
                let w = 1.0 / det_pow(dist + self.settings.epsilon, self.settings.power);
                weights[id.index()] = w;
                total += w;
            }
        }

        if total > 0.0 {
            for w in &mut weights {
                *w /= total;
            }
        }
        BlendWeights { weights }
    }

    /// Winner-takes-all biome at `(x, z)`.
    ///
    /// Positions inside the plains core are always [`BiomeId::Plains`].
    pub fn classify(&self, sample: &ClimateSample, x: i32, z: i32) -> BiomeId {
        if in_core(x, z, self.core_radius) {
            return BiomeId::Plains;
        }
        self.weights(sample, x, z).dominant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temperature: f64, humidity: f64) -> ClimateSample {
        ClimateSample {
            temperature,
            humidity,
            elevation: 0.5,
            coast_primary: 0.0,
            coast_secondary: 0.0,
        }
    }

    fn blender() -> BiomeBlender {
        BiomeBlender::new(&BiomeRegistry::standard(), BlendSettings::default(), 128)
    }

    #[test]
    fn test_weights_sum_to_one() {
        let blender = blender();
        for t in -10..=10 {
            for h in -10..=10 {
                let s = sample(t as f64 / 10.0, h as f64 / 10.0);
                let w = blender.weights(&s, t * 40, h * 40);
                assert!((w.sum() - 1.0).abs() < 1e-9, "sum {} at ({t}, {h})", w.sum());
                assert!(w.iter().all(|(_, v)| v >= 0.0));
            }
        }
    }

    #[test]
    fn test_exact_target_match_dominates() {
        let blender = blender();
        let w = blender.weights(&sample(1.0, -0.5), 300, 0);
        assert_eq!(w.dominant(), BiomeId::Desert);
        assert!(w.get(BiomeId::Desert) > 0.99);
    }

    #[test]
    fn test_far_positions_become_ocean() {
        let blender = blender();
        let s = sample(0.0, 0.2);
        assert_eq!(blender.classify(&s, 600, 0), BiomeId::Ocean);
        assert_eq!(blender.classify(&s, -20, 700), BiomeId::Ocean);
    }

    #[test]
    fn test_core_is_always_plains() {
        let blender = blender();
        let s = sample(1.0, -0.5);
        assert_eq!(blender.classify(&s, 0, 0), BiomeId::Plains);
        assert_eq!(blender.classify(&s, 90, -90), BiomeId::Plains);
        assert_eq!(blender.classify(&s, 300, 0), BiomeId::Desert);
    }

    #[test]
    fn test_dominant_ties_go_to_first_biome() {
        let mut weights = [0.0; BiomeId::COUNT];
        weights[BiomeId::Snow.index()] = 0.5;
        weights[BiomeId::Desert.index()] = 0.5;
        let w = BlendWeights { weights };
        assert_eq!(w.dominant(), BiomeId::Desert);
    }

    #[test]
    fn test_unregistered_biomes_get_no_weight() {
        let mut registry = BiomeRegistry::new();
        let standard = BiomeRegistry::standard();
        for id in [BiomeId::Plains, BiomeId::Snow] {
            let def = standard.get(id).cloned().expect("standard biome");
            registry.register(def).expect("fresh registry");
        }
        let blender = BiomeBlender::new(&registry, BlendSettings::default(), 128);
        let w = blender.weights(&sample(1.0, -0.5), 300, 0);
        assert_eq!(w.get(BiomeId::Desert), 0.0);
        assert!((w.get(BiomeId::Plains) + w.get(BiomeId::Snow) - 1.0).abs() < 1e-9);
    }
}
