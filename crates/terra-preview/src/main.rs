//! Preview binary for the terra world generator.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p terra-preview -- --seed 7 --placement territory`.

mod maps;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::IVec2;
use terra_config::{CliArgs, Config, default_config_dir};
use terra_worldgen::debug_viz::{MapRegion, render_biome_ascii, render_territory_ascii};
use terra_worldgen::{ColumnBatchGenerator, REGION_SIZE, WorldgenCore, WorldgenError};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| std::path::PathBuf::from(".terra"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    terra_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        error!(error = %e, stage = %e.stage(), "World generation failed");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), WorldgenError> {
    let preview = &config.preview;
    let core = Arc::new(WorldgenCore::initialize(
        preview.seed,
        config.generation.clone(),
    )?);
    info!(seed = core.seed(), placement = %core.settings().placement, "World initialized");

    probe(&core, preview.probe_x, preview.probe_z)?;

    let region = MapRegion::centered(preview.map_half_extent, preview.map_step);
    if preview.ascii_map {
        println!("{}", render_biome_ascii(&core, &region)?);
    }
    if let Some(map) = core.territories() {
        for (i, t) in map.territories().iter().enumerate() {
            println!(
                "territory {i}: {} anchored at cell {} with {} cells",
                t.biome,
                t.anchor,
                t.cells.len()
            );
        }
        println!("{}", render_territory_ascii(map));
    }

    if let Some(dir) = &preview.png_dir {
        match maps::write_maps(&core, &region, dir) {
            Ok(paths) => {
                for path in paths {
                    info!(path = %path.display(), "Wrote map");
                }
            }
            Err(maps::MapError::Generation(e)) => return Err(e),
            Err(e) => warn!(error = %e, "Could not write PNG maps"),
        }
    }

    if preview.benchmark_regions > 0 {
        benchmark(&core, preview.benchmark_regions);
    }
    Ok(())
}

fn probe(core: &WorldgenCore, x: i32, z: i32) -> Result<(), WorldgenError> {
    let climate = core.sample_climate(x, z)?;
    let height = core.surface_height(x, z)?;
    let biome = core.biome_at(x, height, z)?;
    let column = core.build_column(x, z)?;

    println!("column ({x}, {z}): {biome}, surface y={height}");
    println!(
        "  temperature {:.3}  humidity {:.3}  elevation {:.3}",
        climate.temperature, climate.humidity, climate.elevation
    );
    let top = column.top_y();
    for y in (height - 3..=height + 2).rev() {
        if let Some(block) = column.get(y) {
            println!("  y={y:>4} {}", block.name());
        }
    }
    if let Some(plant) = column.plant() {
        println!("  plant: {}", plant.name());
    }
    println!("  column spans {}..={top}", column.min_y);
    Ok(())
}

fn benchmark(core: &Arc<WorldgenCore>, regions: u32) {
    let generator = match ColumnBatchGenerator::with_defaults(Arc::clone(core)) {
        Ok(generator) => generator,
        Err(e) => {
            warn!(error = %e, "Could not start column workers");
            return;
        }
    };

    let side = (regions as f64).sqrt().ceil() as i32;
    let start = Instant::now();
    let mut submitted = 0;
    for i in 0..regions as i32 {
        let origin = IVec2::new(i % side - side / 2, i / side - side / 2) * REGION_SIZE;
        if generator.submit(origin).is_ok() {
            submitted += 1;
        }
    }

    let mut total_us = 0;
    let mut failed = 0;
    for _ in 0..submitted {
        let Some(region) = generator.recv() else {
            break;
        };
        total_us += region.generation_time_us;
        if region.columns.is_err() {
            failed += 1;
        }
    }

    info!(
        regions = submitted,
        failed,
        wall_ms = start.elapsed().as_millis() as u64,
        avg_region_us = total_us / submitted.max(1),
        "Column benchmark finished"
    );
}
