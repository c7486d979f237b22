use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

mod key_bindings;
pub use key_bindings::{KeyBinding, KeyBindings};

use crate::game::MapDefinition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_initial_length")]
    pub initial_length: usize,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_leaderboard_capacity")]
    pub leaderboard_capacity: usize,
    #[serde(default)]
    pub wrap: bool,
    /// Leaderboard file; defaults to `record.dat` in the data directory
    #[serde(default)]
    pub record_file: Option<PathBuf>,
    #[serde(default = "default_min_board_width")]
    pub min_board_width: i32,
    #[serde(default = "default_min_board_height")]
    pub min_board_height: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maps: Vec<MapDefinition>,
    #[serde(default)]
    pub key_bindings: KeyBindings,
}

fn default_initial_length() -> usize { 2 }
fn default_base_delay_ms() -> u64 { 150 }
fn default_min_delay_ms() -> u64 { 10 }
fn default_leaderboard_capacity() -> usize { 3 }
fn default_min_board_width() -> i32 { 20 }
fn default_min_board_height() -> i32 { 10 }

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_length: default_initial_length(),
            base_delay_ms: default_base_delay_ms(),
            min_delay_ms: default_min_delay_ms(),
            leaderboard_capacity: default_leaderboard_capacity(),
            wrap: false,
            record_file: None,
            min_board_width: default_min_board_width(),
            min_board_height: default_min_board_height(),
            maps: Vec::new(),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Read `path`, writing a default file there on first run.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let config_str = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;

            let config: Config = toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;

            Ok(config.sanitized())
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
        }

        let config_str = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Clamp every tunable to its lower bound.
    pub fn sanitized(mut self) -> Self {
        self.initial_length = self.initial_length.max(1);
        self.base_delay_ms = self.base_delay_ms.max(1);
        self.min_delay_ms = self.min_delay_ms.max(1);
        self.leaderboard_capacity = self.leaderboard_capacity.max(1);
        // Room for the wall ring, a cross-shaped cluster and the snake
        self.min_board_width = self.min_board_width.max(8);
        self.min_board_height = self.min_board_height.max(6);
        self
    }

    pub fn record_path(&self) -> PathBuf {
        self.record_file
            .clone()
            .unwrap_or_else(|| data_dir().join("record.dat"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .with_context(|| "Failed to determine config directory")?
        .join("snake");

    Ok(config_dir)
}

/// Where the leaderboard and log live; the working directory if the
/// platform has no data directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("snake"))
        .unwrap_or_else(|| PathBuf::from("."))
}
