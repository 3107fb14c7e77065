//! User configuration
//!
//! Stored as pretty-printed JSON in ~/.config/mdrs/config.json. Missing
//! keys and blank colors fall back to the defaults, so a config written by
//! an older version keeps working.

mod colors;
mod keybindings;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use colors::ColorTable;
pub use keybindings::KeyBindings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorTable,
    pub keybindings: KeyBindings,
}

/// Location of the config file
pub fn config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("mdrs").join("config.json"),
        None => PathBuf::from("mdrs-config.json"),
    }
}

impl Config {
    /// Load from the default location.
    ///
    /// A missing file is created with the defaults (best effort). A file
    /// that cannot be read or parsed is reported and the defaults are used;
    /// configuration problems never keep the viewer from starting.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save_to(&path) {
                tracing::warn!("could not write default config: {:#}", e);
            }
            return config;
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.colors.fill_blanks();
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.colors.search_match = "#123456".to_string();
        config.keybindings.quit = vec!["x".to_string()];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r##"{ "colors": { "heading1": "#ff0000", "bold": "" }, "keybindings": { "quit": ["Q"] } }"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let defaults = Config::default();
        assert_eq!(config.colors.heading1, "#ff0000");
        assert_eq!(config.colors.bold, defaults.colors.bold);
        assert_eq!(config.colors.code, defaults.colors.code);
        assert_eq!(config.keybindings.keys_for(Action::Quit), ["Q".to_string()]);
        assert_eq!(config.keybindings.scroll_up, defaults.keybindings.scroll_up);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
    }

    #[test]
    fn test_color_lookup_by_name() {
        let colors = ColorTable::default();
        assert_eq!(colors.get("search_current"), Some("#ffff00"));
        assert_eq!(colors.get("link_url"), Some("#0087af"));
        assert_eq!(colors.get("nope"), None);
        assert_eq!(colors.heading(3), "#0087ff");
        assert_eq!(colors.heading(9), "#001fff");
    }

    #[test]
    fn test_config_path_file_name() {
        assert!(config_path().ends_with("config.json"));
    }
}
