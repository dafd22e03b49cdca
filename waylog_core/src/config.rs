//! Configuration file support for Waylog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/waylog/config.toml`.

use crate::map::TileLayer;
use crate::{Coordinates, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub location: LocationConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Map widget configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    #[serde(default)]
    pub tiles: TileLayer,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
            tiles: TileLayer::default(),
        }
    }
}

/// Position fallback configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LocationConfig {
    /// `[lat, lng]` used when no position fix is available
    #[serde(default)]
    pub home: Option<[f64; 2]>,
}

impl LocationConfig {
    pub fn home_coordinates(&self) -> Option<Coordinates> {
        self.home.map(Coordinates::from)
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("waylog")
}

fn default_zoom() -> u8 {
    13
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("waylog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.map.default_zoom, 13);
        assert!(config.map.tiles.url_template.contains("{z}/{x}/{y}"));
        assert!(config.location.home.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.location.home = Some([51.5, -0.1]);

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.map.default_zoom, parsed.map.default_zoom);
        assert_eq!(config.location.home, parsed.location.home);
        assert_eq!(
            parsed.location.home_coordinates(),
            Some(Coordinates::new(51.5, -0.1))
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[map]
default_zoom = 15
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.map.default_zoom, 15);
        assert_eq!(config.map.tiles, TileLayer::default()); // default
    }
}
