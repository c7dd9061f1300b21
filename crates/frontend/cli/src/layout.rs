//! Map layout folders.
//!
//! ```text
//! maps/map_layout_NNN/
//!     background.csv         block indices, drawn half a block to the right
//!     foreground.csv         block indices
//!     heightmap.csv          heightmap words
//!     layout_metadata.json   LayoutMetadata
//!     map_NNN.lsmap          MapMetadata (one per map using the layout)
//! ```

use crate::metadata::{LayoutMetadata, MapMetadata};
use crate::{read_json, read_text, write_bytes, write_json, Result};
use lsmap_core::heightmap::{format_matrix, parse_matrix};
use std::path::{Path, PathBuf};

pub const BACKGROUND_FILE: &str = "background.csv";
pub const FOREGROUND_FILE: &str = "foreground.csv";
pub const HEIGHTMAP_FILE: &str = "heightmap.csv";
pub const LAYOUT_METADATA_FILE: &str = "layout_metadata.json";

/// Folder holding the layout files of a `.lsmap` file.
pub fn layout_dir(map_path: &Path) -> PathBuf {
    match map_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Everything stored on disk for one map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapLayout {
    pub background: Vec<Vec<u16>>,
    pub foreground: Vec<Vec<u16>>,
    pub heightmap: Vec<Vec<u16>>,
    pub layout: LayoutMetadata,
    pub metadata: MapMetadata,
}

impl MapLayout {
    pub fn read(map_path: &Path) -> Result<Self> {
        let dir = layout_dir(map_path);
        let metadata: MapMetadata = read_json(map_path)?;
        let layout: LayoutMetadata = read_json(&dir.join(LAYOUT_METADATA_FILE))?;
        let heightmap = parse_matrix(&read_text(&dir.join(HEIGHTMAP_FILE))?)?;
        let background = parse_matrix(&read_text(&dir.join(BACKGROUND_FILE))?)?;
        let foreground = parse_matrix(&read_text(&dir.join(FOREGROUND_FILE))?)?;
        log::debug!(
            "Layout {}: heightmap {}x{}, background {}x{}",
            dir.display(),
            heightmap.first().map_or(0, Vec::len),
            heightmap.len(),
            background.first().map_or(0, Vec::len),
            background.len()
        );
        Ok(Self {
            background,
            foreground,
            heightmap,
            layout,
            metadata,
        })
    }

    pub fn write(&self, map_path: &Path) -> Result<()> {
        let dir = layout_dir(map_path);
        write_bytes(&dir.join(BACKGROUND_FILE), format_matrix(&self.background))?;
        write_bytes(&dir.join(FOREGROUND_FILE), format_matrix(&self.foreground))?;
        write_bytes(&dir.join(HEIGHTMAP_FILE), format_matrix(&self.heightmap))?;
        write_json(&dir.join(LAYOUT_METADATA_FILE), &self.layout)?;
        write_json(map_path, &self.metadata)
    }
}
