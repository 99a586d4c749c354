//! Debug renderers: biome map, height map, and ASCII layouts.

use std::fmt::Write as _;

use super::MapRegion;
use super::image::{DebugImage, Rgb};
use crate::biome::{BiomeId, TerritoryMap};
use crate::error::WorldgenError;
use crate::generator::WorldgenCore;
use crate::settings::WorldSettings;

/// RGB color for a biome.
pub fn biome_color(biome: BiomeId) -> Rgb {
    match biome {
        BiomeId::Plains => (100, 180, 60),
        BiomeId::Desert => (220, 150, 70),
        BiomeId::Snow => (235, 240, 250),
        BiomeId::Jungle => (20, 110, 30),
        BiomeId::Ocean => (20, 50, 180),
        BiomeId::Beach => (230, 210, 140),
    }
}

/// Single-character glyph for a biome.
pub fn biome_glyph(biome: BiomeId) -> char {
    match biome {
        BiomeId::Plains => '.',
        BiomeId::Desert => 'D',
        BiomeId::Snow => 'S',
        BiomeId::Jungle => 'J',
        BiomeId::Ocean => '~',
        BiomeId::Beach => 'b',
    }
}

/// Map a surface elevation to an RGB color.
///
/// Color bands: deep water → shallow water → shore → lowlands → hills → peaks.
pub fn height_to_color(height: i32, world: &WorldSettings) -> Rgb {
    let sea = world.sea_level;
    if height < world.deep_ocean_floor_y() + 4 {
        (0, 0, 128)
    } else if height <= sea {
        (30, 80, 200)
    } else if height <= sea + 3 {
        (220, 200, 130)
    } else {
        let span = (world.max_surface_y() - sea).max(1) as f64;
        let t = ((height - sea) as f64 / span * 4.0).clamp(0.0, 1.0);
        if t < 0.5 {
            let t = t * 2.0;
            (
                (30.0 + t * 80.0) as u8,
                (160.0 - t * 40.0) as u8,
                (30.0 + t * 20.0) as u8,
            )
        } else {
            let base = 110.0 + (t - 0.5) * 2.0 * 145.0;
            (base as u8, base as u8, base as u8)
        }
    }
}

/// Render the biome of every sampled column.
///
/// # Errors
///
/// Returns the first query error.
pub fn render_biome_map(
    core: &WorldgenCore,
    region: &MapRegion,
) -> Result<DebugImage, WorldgenError> {
    let y = core.settings().world.sea_level;
    DebugImage::try_from_fn(region.width, region.height, |px, py| {
        let (x, z) = region.block(px, py);
        core.biome_at(x, y, z).map(biome_color)
    })
}

/// Render the surface height of every sampled column.
///
/// # Errors
///
/// Returns the first query error.
pub fn render_height_map(
    core: &WorldgenCore,
    region: &MapRegion,
) -> Result<DebugImage, WorldgenError> {
    let world = &core.settings().world;
    DebugImage::try_from_fn(region.width, region.height, |px, py| {
        let (x, z) = region.block(px, py);
        core.surface_height(x, z).map(|h| height_to_color(h, world))
    })
}

/// One glyph per sampled column, one line per row.
///
/// # Errors
///
/// Returns the first query error.
pub fn render_biome_ascii(
    core: &WorldgenCore,
    region: &MapRegion,
) -> Result<String, WorldgenError> {
    let y = core.settings().world.sea_level;
    let mut out = String::with_capacity(((region.width + 1) * region.height) as usize);
    for py in 0..region.height {
        for px in 0..region.width {
            let (x, z) = region.block(px, py);
            out.push(biome_glyph(core.biome_at(x, y, z)?));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Two characters per grid cell: territory index (base 36) and biome glyph.
/// Unclaimed cells render as `..`.
pub fn render_territory_ascii(map: &TerritoryMap) -> String {
    let (min, max) = map.extent();
    let mut out = String::new();
    for cz in min.y..=max.y {
        for cx in min.x..=max.x {
            match map.owner_of_cell(glam::IVec2::new(cx, cz)) {
                Some(i) => {
                    let index = char::from_digit((i % 36) as u32, 36).unwrap_or('?');
                    let glyph = biome_glyph(map.territories()[i].biome);
                    let _ = write!(out, "{index}{glyph}");
                }
                None => out.push_str(".."),
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GenerationSettings, PlacementMode};

    #[test]
    fn test_biome_colors_are_distinct() {
        let mut image = DebugImage::new(BiomeId::COUNT as u32, 1);
        for (i, id) in BiomeId::ALL.iter().enumerate() {
            image.set_rgb(i as u32, 0, biome_color(*id));
        }
        assert_eq!(image.unique_color_count(), BiomeId::COUNT);
    }

    #[test]
    fn test_height_colors_separate_water_and_land() {
        let world = WorldSettings::default();
        assert_eq!(height_to_color(world.sea_level, &world), (30, 80, 200));
        assert_ne!(height_to_color(world.sea_level + 20, &world), (30, 80, 200));
    }

    #[test]
    fn test_biome_map_center_is_plains() {
        let core = WorldgenCore::new(42, GenerationSettings::default());
        let region = MapRegion::centered(640, 64);
        let image = render_biome_map(&core, &region).expect("render");
        assert_eq!(image.dimensions(), (20, 20));

        let (r, g, b, _) = image.get_pixel(10, 10);
        assert_eq!((r, g, b), biome_color(BiomeId::Plains));
        let (r, g, b, _) = image.get_pixel(0, 0);
        assert_eq!((r, g, b), biome_color(BiomeId::Ocean));
    }

    #[test]
    fn test_height_map_has_relief() {
        let core = WorldgenCore::new(7, GenerationSettings::default());
        let image = render_height_map(&core, &MapRegion::centered(640, 32)).expect("render");
        assert!(image.unique_color_count() > 2);
    }

    #[test]
    fn test_ascii_map_shape() {
        let core = WorldgenCore::new(1, GenerationSettings::default());
        let ascii = render_biome_ascii(&core, &MapRegion::centered(640, 64)).expect("render");
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.chars().count() == 20));
        assert!(lines[0].starts_with('~'));
    }

    #[test]
    fn test_territory_ascii_marks_every_territory() {
        let settings = GenerationSettings {
            placement: PlacementMode::Territory,
            ..GenerationSettings::default()
        };
        let core = WorldgenCore::initialize(42, settings).expect("init");
        let map = core.territories().expect("territory map");
        let ascii = render_territory_ascii(map);

        assert_eq!(ascii.lines().count(), 64);
        for (i, t) in map.territories().iter().enumerate() {
            let index = char::from_digit(i as u32, 36).unwrap_or('?');
            let tag = format!("{index}{}", biome_glyph(t.biome));
            assert!(ascii.contains(&tag), "territory {i} missing from map");
        }
    }
}
