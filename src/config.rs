use directories::ProjectDirs;
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entity::{AttributeLayout, DEFAULT_SIZE, MIN_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,

    #[error("failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid settings in {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_entity_width() -> f32 {
    DEFAULT_SIZE
}

fn default_entity_height() -> f32 {
    DEFAULT_SIZE
}

fn usable_size(name: &str, value: f32, path: &Path) -> f32 {
    if value > MIN_SIZE {
        return value;
    }
    warn!(
        "{} in {} must exceed {MIN_SIZE}, got {value}; using {DEFAULT_SIZE}",
        name,
        path.display()
    );
    DEFAULT_SIZE
}

/// User settings. Diagrams themselves are never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub attribute_layout: AttributeLayout,
    #[serde(default = "default_entity_width")]
    pub entity_width: f32,
    #[serde(default = "default_entity_height")]
    pub entity_height: f32,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attribute_layout: AttributeLayout::default(),
            entity_width: default_entity_width(),
            entity_height: default_entity_height(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Reads the settings file, falling back to defaults when it does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.entity_width = usable_size("entity_width", config.entity_width, path);
        config.entity_height = usable_size("entity_height", config.entity_height, path);
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, contents).map_err(io_error)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "schemer").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("schemer-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load_from(&scratch_path("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "attribute_layout": "identifiers_first" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.attribute_layout, AttributeLayout::IdentifiersFirst);
        assert_eq!(config.entity_width, 50.0);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn saved_settings_load_back() {
        let path = scratch_path("nested/settings.json");
        let config = Config {
            entity_width: 120.0,
            log_level: LogLevel::Debug,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn undersized_entity_dimensions_fall_back() {
        let path = scratch_path("tiny.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "entity_width": 4.0, "entity_height": -20.0 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!((config.entity_width, config.entity_height), (DEFAULT_SIZE, DEFAULT_SIZE));

        let mut graph = crate::graph::GraphHandler::new(config.attribute_layout);
        let id = graph.add_next_entity(iced::Size::new(config.entity_width, config.entity_height));
        let geometry = graph.entity(id).unwrap().geometry;
        assert!(geometry.width > MIN_SIZE && geometry.height > MIN_SIZE);
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = scratch_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
