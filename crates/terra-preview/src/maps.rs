//! PNG export of the debug maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use terra_worldgen::WorldgenError;
use terra_worldgen::debug_viz::{DebugImage, MapRegion, render_biome_map, render_height_map};

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error(transparent)]
    Generation(#[from] WorldgenError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
}

/// Render the biome and height maps of `region` into `dir`.
pub fn write_maps(
    core: &terra_worldgen::WorldgenCore,
    region: &MapRegion,
    dir: &Path,
) -> Result<Vec<PathBuf>, MapError> {
    std::fs::create_dir_all(dir).map_err(|source| MapError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let seed = core.seed();
    let biome_path = dir.join(format!("biomes-{seed}.png"));
    write_png(&render_biome_map(core, region)?, &biome_path)?;
    let height_path = dir.join(format!("heights-{seed}.png"));
    write_png(&render_height_map(core, region)?, &height_path)?;

    Ok(vec![biome_path, height_path])
}

fn write_png(image: &DebugImage, path: &Path) -> Result<(), MapError> {
    let file = File::create(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let encode_err = |source| MapError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(encode_err)?;
    writer.write_image_data(&image.pixels).map_err(encode_err)?;
    writer.finish().map_err(encode_err)
}
