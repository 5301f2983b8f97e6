//! Application settings, stored as JSON in the local data directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "flashcards";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Where card files live (default: the settings directory)
    pub data_dir: Option<PathBuf>,
    pub user_id: String,
    /// Fixed seed for the interval fuzz; random when unset
    pub fuzz_seed: Option<u64>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            user_id: "local".to_string(),
            fuzz_seed: None,
            window_width: 500.0,
            window_height: 700.0,
        }
    }
}

impl Settings {
    /// `{data_local_dir}/flashcards`, or the working directory when the
    /// platform has no data directory.
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE_NAME)
    }

    /// Loads settings, falling back to defaults when the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Like `load`, but writes the defaults out when the file is missing so
    /// there is a file to edit.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }

        let settings = Self::default();
        settings.save(path)?;
        log::info!("Wrote default settings to {:?}", path);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(Self::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&Settings::path_in(dir.path())).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.user_id, "local");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = Settings::path_in(dir.path());
        fs::write(&path, r#"{ "userId": "alice", "fuzzSeed": 7 }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.user_id, "alice");
        assert_eq!(settings.fuzz_seed, Some(7));
        assert_eq!(settings.window_width, 500.0);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_load_or_init_writes_defaults_once() {
        let dir = TempDir::new().unwrap();
        let path = Settings::path_in(&dir.path().join("flashcards"));

        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        fs::write(&path, r#"{ "userId": "alice" }"#).unwrap();
        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings.user_id, "alice");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = Settings::path_in(&dir.path().join("nested"));
        let settings = Settings {
            data_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        assert_eq!(settings.cards_dir(), dir.path());
    }
}
