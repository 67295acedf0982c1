//! Persisted user settings.
//!
//! The settings file is a small JSON document in the user's home directory
//! holding the directory atlas and spritesheet paths are resolved against.

use crate::atlas::loader::to_json_pretty;
use crate::error::{Result, UnpackError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the settings document inside the home directory.
pub const SETTINGS_FILE_NAME: &str = "sprite-unpacker.json";

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory containing atlas documents and spritesheets.
    pub resource_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource_path: default_resource_path(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, writing the defaults first if the file
    /// does not exist yet.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            tracing::info!("Initialized settings at {:?}", path);
            return Ok(settings);
        }
        if path.is_dir() {
            return Err(UnpackError::Settings(format!(
                "{:?} is a directory, not a settings file",
                path
            )));
        }

        let data = std::fs::read(path)?;
        serde_json::from_slice(&data)
            .map_err(|e| UnpackError::Settings(format!("Malformed settings JSON: {}", e)))
    }

    /// Write settings to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, to_json_pretty(self)?)?;
        Ok(())
    }
}

/// Location of the settings file in the user's home directory.
pub fn settings_file() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(SETTINGS_FILE_NAME))
        .ok_or_else(|| UnpackError::Settings("could not determine home directory".to_string()))
}

/// Directory a Steam install lives under.
///
/// Windows installs into Program Files; elsewhere Steam keeps its library in
/// the user data directory (`~/.local/share`, `~/Library/Application Support`).
fn steam_base_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        let var = if cfg!(target_pointer_width = "64") {
            "ProgramFiles(x86)"
        } else {
            "ProgramFiles"
        };
        std::env::var_os(var).map(PathBuf::from)
    } else {
        dirs::data_dir()
    }
}

/// Default Geometry Dash resource directory of a Steam install.
fn default_resource_path() -> PathBuf {
    let base = steam_base_dir().unwrap_or_else(|| PathBuf::from("."));

    let game = if cfg!(target_os = "macos") {
        "Geometry Dash.app"
    } else {
        "Geometry Dash"
    };
    let mut path = base.join("Steam").join("steamapps").join("common").join(game);
    if cfg!(target_os = "macos") {
        path.push("Contents");
    }
    path.join("Resources")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_resources() {
        let settings = Settings::default();
        assert!(settings.resource_path.ends_with("Resources"));
        assert!(settings
            .resource_path
            .components()
            .any(|c| c.as_os_str() == "steamapps"));
    }

    #[test]
    fn test_paths_follow_platform_dirs() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(settings_file().unwrap(), home.join(SETTINGS_FILE_NAME));
        }

        if let (false, Some(data)) = (cfg!(windows), dirs::data_dir()) {
            assert!(default_resource_path().starts_with(data.join("Steam")));
        }
    }

    #[test]
    fn test_load_or_init_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let created = Settings::load_or_init(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(created, Settings::default());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("{\n    \"resourcePath\": "));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let settings = Settings {
            resource_path: PathBuf::from("/games/gd/Resources"),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load_or_init(&path).unwrap(), settings);
    }

    #[test]
    fn test_rejects_directory_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Settings::load_or_init(dir.path()),
            Err(UnpackError::Settings(_))
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ resourcePath: nope").unwrap();
        assert!(matches!(
            Settings::load_or_init(&path),
            Err(UnpackError::Settings(_))
        ));
    }
}
