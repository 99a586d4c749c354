//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terra_worldgen::GenerationSettings;

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World generation settings handed to the core.
    pub generation: GenerationSettings,
    /// Preview tool settings.
    pub preview: PreviewConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Settings for the preview binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    /// World seed.
    pub seed: u64,
    /// Block x of the probed column.
    pub probe_x: i32,
    /// Block z of the probed column.
    pub probe_z: i32,
    /// Half the side length of the rendered map, in blocks.
    pub map_half_extent: i32,
    /// Blocks per ASCII character / image pixel.
    pub map_step: u32,
    /// Print the biome map as ASCII.
    pub ascii_map: bool,
    /// Regions generated in the background to time the column builder.
    pub benchmark_regions: u32,
    /// Where to write the PNG biome and height maps (nothing is written if unset).
    pub png_dir: Option<PathBuf>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "terra_worldgen=trace").
    pub log_level: String,
    /// Also write JSON logs to the config directory in debug builds.
    pub file_logging: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            probe_x: 0,
            probe_z: 0,
            map_half_extent: 640,
            map_step: 16,
            ascii_map: true,
            benchmark_regions: 0,
            png_dir: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: true,
        }
    }
}

/// Platform config directory for terra, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("terra-worldgen"))
}

impl Config {
    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// when the file does not exist yet.
    ///
    /// A loaded file must also pass [`Config::validate`].
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.is_file() {
            let defaults = Self::default();
            defaults.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(defaults);
        }

        let config = Self::read(&path)?;
        config.validate()?;
        log::info!(
            "Loaded config from {} (seed {}, {} placement)",
            path.display(),
            config.preview.seed,
            config.generation.placement
        );
        Ok(config)
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(write_err)
    }

    /// Re-read the file and return it only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }

    /// Check the generation settings for values the core would reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate().map_err(ConfigError::Invalid)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
