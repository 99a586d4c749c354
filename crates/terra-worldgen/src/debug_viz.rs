//! Debug visualization of generated worlds.
//!
//! Provides [`DebugImage`] plus renderers that turn biome and height queries
//! into RGBA images or compact ASCII maps, for diagnosing layouts without an
//! engine attached.

mod image;
mod renderers;

pub use self::image::{DebugImage, Rgb};
pub use renderers::{
    biome_color, biome_glyph, height_to_color, render_biome_ascii, render_biome_map,
    render_height_map, render_territory_ascii,
};

/// Rectangle of block columns sampled by the renderers, one sample per
/// `step` blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapRegion {
    /// Block X of the first sample.
    pub min_x: i32,
    /// Block Z of the first sample.
    pub min_z: i32,
    /// Samples along X.
    pub width: u32,
    /// Samples along Z.
    pub height: u32,
    /// Blocks between samples.
    pub step: u32,
}

impl MapRegion {
    /// Square region covering `[-half_extent, half_extent)` on both axes.
    pub fn centered(half_extent: i32, step: u32) -> Self {
        let step = step.max(1);
        let samples = (2 * half_extent.max(0) as u32).div_ceil(step);
        Self {
            min_x: -half_extent,
            min_z: -half_extent,
            width: samples,
            height: samples,
            step,
        }
    }

    /// Block coordinates of sample `(px, py)`.
    pub fn block(&self, px: u32, py: u32) -> (i32, i32) {
        (
            self.min_x + (px * self.step) as i32,
            self.min_z + (py * self.step) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_region_covers_extent() {
        let region = MapRegion::centered(512, 16);
        assert_eq!(region.width, 64);
        assert_eq!(region.block(0, 0), (-512, -512));
        assert_eq!(region.block(63, 63), (496, 496));
    }

    #[test]
    fn test_step_is_never_zero() {
        let region = MapRegion::centered(8, 0);
        assert_eq!(region.step, 1);
        assert_eq!(region.width, 16);
    }
}
