//! Command-line argument parsing for the preview tool.

use std::path::PathBuf;

use clap::Parser;
use terra_worldgen::PlacementMode;

use crate::Config;

/// Terra world generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terra-preview", about = "Preview a generated terra world")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Island radius in blocks.
    #[arg(long)]
    pub radius: Option<i32>,

    /// Sea level y.
    #[arg(long)]
    pub sea_level: Option<i32>,

    /// Biome placement mode (blended or territory).
    #[arg(long)]
    pub placement: Option<PlacementMode>,

    /// Reject climates that violate the region rules.
    #[arg(long)]
    pub validate_climate: Option<bool>,

    /// Block x of the probed column.
    #[arg(long)]
    pub x: Option<i32>,

    /// Block z of the probed column.
    #[arg(long)]
    pub z: Option<i32>,

    /// Blocks per map character / pixel.
    #[arg(long)]
    pub step: Option<u32>,

    /// Directory for PNG maps.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.preview.seed = seed;
        }
        if let Some(radius) = args.radius {
            self.generation.world.radius = radius;
        }
        if let Some(sea) = args.sea_level {
            self.generation.world.sea_level = sea;
        }
        if let Some(placement) = args.placement {
            self.generation.placement = placement;
        }
        if let Some(validate) = args.validate_climate {
            self.generation.validation.climate = validate;
        }
        if let Some(x) = args.x {
            self.preview.probe_x = x;
        }
        if let Some(z) = args.z {
            self.preview.probe_z = z;
        }
        if let Some(step) = args.step {
            self.preview.map_step = step;
        }
        if let Some(ref dir) = args.png {
            self.preview.png_dir = Some(dir.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
