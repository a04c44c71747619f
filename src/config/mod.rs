//! Configuration module for photo-bingo
//!
//! A game is configured by a small TOML file: board size, zoom bounds,
//! renderer layout and the default challenge file. Missing keys fall back to
//! the defaults, and the whole file is optional.

pub mod grid;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{GridSettings, RenderSettings, SettingsError, ZoomSettings};

/// Name of the default challenge file
pub const DEFAULT_CHALLENGE_FILE: &str = "challenges.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] SettingsError),
}

/// Everything needed to set up a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub challenge_file: PathBuf,
    pub grid: GridSettings,
    pub zoom: ZoomSettings,
    pub render: RenderSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            challenge_file: PathBuf::from(DEFAULT_CHALLENGE_FILE),
            grid: GridSettings::default(),
            zoom: ZoomSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

impl GameConfig {
    /// Checks every section and normalizes the renderer settings
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first section that fails.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.grid.validate()?;
        self.zoom.validate()?;
        self.render = self.render.sanitized()?;
        Ok(self)
    }

    /// Parses and validates a TOML document
    ///
    /// # Errors
    /// Parse or validation failures.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()
    }

    /// Loads the config at `path`, or the default location when `None`
    ///
    /// A missing file yields the defaults; a present but broken file is an
    /// error.
    ///
    /// # Errors
    /// IO, parse and validation failures.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => config_path().ok_or(ConfigError::NoConfigDir)?,
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml(&contents)
    }

    /// Writes the config as pretty TOML, creating parent directories
    ///
    /// # Errors
    /// IO and serialization failures.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Base configuration directory for photo-bingo
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "photo-bingo", "photo-bingo").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default config file path
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_document_overrides_keys() {
        let config = GameConfig::from_toml(
            r#"
            challenge_file = "party.csv"

            [grid]
            size = 3

            [zoom]
            max = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.size, 3);
        assert_eq!(config.zoom.max, 4.0);
        assert_eq!(config.zoom.min, ZoomSettings::default().min);
        assert_eq!(config.challenge_file, PathBuf::from("party.csv"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = GameConfig::from_toml("[grid]\nsize = 40\n");
        assert!(matches!(result, Err(ConfigError::Invalid(SettingsError::GridSize { .. }))));

        let result = GameConfig::from_toml("[grid]\nsize = \"five\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn cell_size_is_sanitized_on_load() {
        let config = GameConfig::from_toml("[render]\ncell_px = 5000.0\n").unwrap();
        assert_eq!(config.render.cell_px, RenderSettings::MAX_CELL_LIMIT);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = Path::new("/definitely/not/here/config.toml");
        let config = GameConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("photo_bingo_config_{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = GameConfig::default();
        config.grid.size = 3;
        config.render.font_path = Some(PathBuf::from("fonts/Inter.ttf"));

        config.save(&path).unwrap();
        let loaded = GameConfig::load_or_default(Some(&path)).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn config_path_names_file() {
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
