//! Configuration for the terra world generator.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Every section falls back to defaults when absent, so older
//! config files keep loading after new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, PreviewConfig, default_config_dir};
pub use error::ConfigError;
