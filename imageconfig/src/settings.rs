use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::{Path, PathBuf};

use crate::decode::Format;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root that relative image paths are resolved against
    pub working_dir: PathBuf,
    pub formats: Vec<Format>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            formats: Format::all(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings: {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::home_dir()?;
        Some(home.join(".config").join("imageconfig").join("config.json"))
    }
}

#[test]
fn settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let settings = Settings {
        working_dir: PathBuf::from("/srv/site"),
        formats: vec![Format::Png, Format::Gif],
    };
    settings.save(&path).unwrap();

    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn missing_fields_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"formats": ["jpeg"]}"#).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.working_dir, PathBuf::from("."));
    assert_eq!(settings.formats, vec![Format::Jpeg]);

    assert!(Settings::load(&dir.path().join("nope.json")).is_err());
}
