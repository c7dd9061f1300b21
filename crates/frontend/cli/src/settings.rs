use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where shared resources live relative to a map layout folder.
///
/// Layout folders sit at `<data root>/maps/map_layout_NNN/`, so by default the
/// data root is two levels above the folder holding the `.lsmap` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_root: Option<PathBuf>,
    pub resources_dir: Option<PathBuf>,
    pub heightmap_tileset: String,
    pub meta_tileset: String,
    pub entities_tileset: String,
    /// Render `blocksets/renders/*.png` on import
    pub render_blockset: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: None,
            resources_dir: None,
            heightmap_tileset: "heightmap_flat.tsx".to_string(),
            meta_tileset: "meta_tiles.tsx".to_string(),
            entities_tileset: "entities.tsx".to_string(),
            render_blockset: true,
        }
    }
}

impl Settings {
    /// Get the config file path relative to the executable
    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("config.json");
        path
    }

    /// Load settings from `config.json` next to the executable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults on error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!(
                        "Failed to parse {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            // File doesn't exist or can't be read, use defaults
            Err(_) => Self::default(),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn data_root_for(&self, map_path: &Path) -> PathBuf {
        match &self.data_root {
            Some(root) => root.clone(),
            None => crate::layout::layout_dir(map_path).join("..").join(".."),
        }
    }

    pub fn resources_dir_for(&self, map_path: &Path) -> PathBuf {
        match &self.resources_dir {
            Some(dir) => dir.clone(),
            None => self.data_root_for(map_path).join("resources"),
        }
    }
}
