//! Persisted viewer settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::DependencyKind;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial zoom level.
    pub pixels_per_day: f32,
    /// Kind given to dependencies created by dragging.
    pub default_dependency_kind: DependencyKind,
    /// Project JSON to open at startup; a sample project is used otherwise.
    pub project_path: Option<PathBuf>,
    /// Log filter, e.g. "info" or "gantt_deps=debug".
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pixels_per_day: 18.0,
            default_dependency_kind: DependencyKind::FinishToStart,
            project_path: None,
            log_level: None,
        }
    }
}

impl Settings {
    /// Load from the user's config directory. No config directory or no file
    /// means defaults; a file that can't be read or parsed is an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from a specific file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "RustGanttDeps")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }
}
