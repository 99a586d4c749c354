//! Per-position climate: temperature, humidity, coastline, and elevation hint.

use crate::noise_field::NoiseField;
use crate::seed::{
    COASTLINE_SALT, ELEVATION_SALT, HUMIDITY_SALT, TEMPERATURE_SALT, attempt_stream,
};
use crate::settings::ClimateSettings;

/// Climate values at one horizontal position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    /// Temperature, approximately in `[-1, 1]`.
    pub temperature: f64,
    /// Humidity, approximately in `[-1, 1]`.
    pub humidity: f64,
    /// Normalized elevation hint in `[0, 1]`.
    pub elevation: f64,
    /// Coastline perturbation at `(x, z)`, in blocks.
    pub coast_primary: f64,
    /// Coastline perturbation at the transposed, offset position, in blocks.
    pub coast_secondary: f64,
}

/// Climate noise fields for one seed and one validation attempt.
///
/// Construction draws every lattice from streams derived from
/// `(seed, salt, attempt)`; after that the model is read-only.
#[derive(Clone, Debug)]
pub struct ClimateModel {
    temperature: NoiseField,
    humidity: NoiseField,
    coastline: NoiseField,
    elevation: NoiseField,
    coastline_offset: f64,
}

impl ClimateModel {
    /// Build the climate fields for `seed`.
    ///
    /// `attempt` selects an independent draw; the validity loop increments it
    /// to re-roll the climate.
    pub fn new(seed: u64, settings: &ClimateSettings, attempt: u32) -> Self {
        let octaved = |salt: &str, scale: f64| {
            NoiseField::from_stream(&mut attempt_stream(seed, salt, attempt))
                .octavate(settings.octaves, settings.lacunarity, settings.gain)
                .frequency(1.0 / scale)
        };

        let temperature = octaved(TEMPERATURE_SALT, settings.temperature_scale);
        let humidity = octaved(HUMIDITY_SALT, settings.humidity_scale);
        let coastline = NoiseField::from_stream(&mut attempt_stream(seed, COASTLINE_SALT, attempt))
            .scale(settings.coastline_amplitude)
            .frequency(settings.coastline_frequency);
        let elevation = NoiseField::from_stream(&mut attempt_stream(seed, ELEVATION_SALT, attempt))
            .frequency(settings.elevation_frequency);

        Self {
            temperature,
            humidity,
            coastline,
            elevation,
            coastline_offset: settings.coastline_offset,
        }
    }

    /// Sample every climate axis at `(x, z)`.
    pub fn sample(&self, x: f64, z: f64) -> ClimateSample {
        let elevation = ((self.elevation.sample(x, z) + 1.0) * 0.5).clamp(0.0, 1.0);
        ClimateSample {
            temperature: self.temperature.sample(x, z),
            humidity: self.humidity.sample(x, z),
            elevation,
            coast_primary: self.coastline.sample(x, z),
            coast_secondary: self
                .coastline
                .sample(z + self.coastline_offset, x + self.coastline_offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_climate() {
        let settings = ClimateSettings::default();
        let a = ClimateModel::new(42, &settings, 0);
        let b = ClimateModel::new(42, &settings, 0);
        for i in -20..20 {
            let (x, z) = (i as f64 * 37.0, i as f64 * -11.0);
            assert_eq!(a.sample(x, z), b.sample(x, z));
        }
    }

    #[test]
    fn test_attempts_reroll_the_climate() {
        let settings = ClimateSettings::default();
        let a = ClimateModel::new(42, &settings, 0);
        let b = ClimateModel::new(42, &settings, 1);
        let differs = (0..32).any(|i| {
            let x = i as f64 * 97.0 + 13.0;
            a.sample(x, x * 0.3).temperature != b.sample(x, x * 0.3).temperature
        });
        assert!(differs, "A new attempt must draw new temperature lattices");
    }

    #[test]
    fn test_temperature_and_humidity_are_decorrelated() {
        let model = ClimateModel::new(9, &ClimateSettings::default(), 0);
        let differs = (0..32).any(|i| {
            let s = model.sample(i as f64 * 53.0, i as f64 * 29.0);
            (s.temperature - s.humidity).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn test_ranges() {
        let model = ClimateModel::new(3, &ClimateSettings::default(), 0);
        for x in (-512..512).step_by(61) {
            for z in (-512..512).step_by(67) {
                let s = model.sample(x as f64, z as f64);
                assert!(s.temperature.abs() <= 1.1, "temperature {}", s.temperature);
                assert!(s.humidity.abs() <= 1.1, "humidity {}", s.humidity);
                assert!((0.0..=1.0).contains(&s.elevation));
                assert!(s.coast_primary.abs() <= 8.8);
                assert!(s.coast_secondary.abs() <= 8.8);
            }
        }
    }

    #[test]
    fn test_climate_varies_slowly() {
        let model = ClimateModel::new(5, &ClimateSettings::default(), 0);
        let a = model.sample(100.0, 100.0);
        let b = model.sample(101.0, 100.0);
        assert!((a.temperature - b.temperature).abs() < 0.05);
        assert!((a.humidity - b.humidity).abs() < 0.05);
    }
}
