//! Whole-map import and export.

use crate::blockset;
use crate::document::{MapDocument, TilesetSources};
use crate::layout::MapLayout;
use crate::settings::Settings;
use crate::{read_json, read_text, write_json, Result};
use lsmap_core::heightmap::{self, TileFlag};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read a map layout and turn it into an editable document.
///
/// When `render_blockset` is set the blockset atlas is rebuilt first and the
/// document points at the fresh render. Otherwise an existing render is used
/// if there is one.
pub fn import_map(map_path: &Path, settings: &Settings) -> Result<MapDocument> {
    let layout = MapLayout::read(map_path)?;
    let data_root = settings.data_root_for(map_path);
    let id = layout.metadata.blockset_id();

    let blockset = if settings.render_blockset {
        Some(blockset::build_and_save(&data_root, id)?)
    } else {
        let existing = blockset::render_path(&data_root, id);
        if !existing.exists() {
            log::warn!(
                "No blockset render at {}, block layers will have no image",
                existing.display()
            );
        }
        existing.exists().then_some(existing)
    };

    let resources = settings.resources_dir_for(map_path);
    let tilesets = TilesetSources {
        blockset,
        heightmap: resources.join(&settings.heightmap_tileset),
        meta: resources.join(&settings.meta_tileset),
        entities: resources.join(&settings.entities_tileset),
    };

    let doc = MapDocument::from_layout(&layout, tilesets);
    log::info!(
        "Imported {} ({}x{}, {} entities)",
        map_path.display(),
        doc.width,
        doc.height,
        layout.metadata.entities.len()
    );
    Ok(doc)
}

/// Write a document back into the layout folder of `map_path`.
pub fn export_map(doc: &MapDocument, map_path: &Path) -> Result<()> {
    let layout = doc.to_layout()?;
    layout.write(map_path)?;
    log::info!("Exported {}", map_path.display());
    Ok(())
}

/// Re-render the blockset atlas used by a map.
pub fn rebuild_blockset(map_path: &Path, settings: &Settings) -> Result<PathBuf> {
    let layout = MapLayout::read(map_path)?;
    blockset::build_and_save(
        &settings.data_root_for(map_path),
        layout.metadata.blockset_id(),
    )
}

pub fn read_document(path: &Path) -> Result<MapDocument> {
    read_json(path)
}

pub fn write_document(doc: &MapDocument, path: &Path) -> Result<()> {
    write_json(path, doc)
}

/// Outcome of decoding and re-encoding a heightmap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightmapReport {
    pub width: usize,
    pub height: usize,
    /// Every word survived decode then encode
    pub words_preserved: bool,
    /// The re-encoded text equals the input byte for byte
    pub text_identical: bool,
    pub blocked_void: usize,
    pub flags: Vec<(TileFlag, usize)>,
    pub floor_types: BTreeMap<u8, usize>,
}

pub fn check_heightmap(path: &Path) -> Result<HeightmapReport> {
    let text = read_text(path)?;
    let words = heightmap::parse_matrix(&text)?;
    let cells = heightmap::decode_matrix(&words);
    let reencoded = heightmap::encode_matrix(&cells);

    let mut flags: Vec<(TileFlag, usize)> = [
        TileFlag::None,
        TileFlag::RaftTrack,
        TileFlag::NpcBlocker,
        TileFlag::UniversalBlocker,
        TileFlag::LockedDoor,
    ]
    .into_iter()
    .map(|f| (f, 0))
    .collect();
    let mut floor_types = BTreeMap::new();
    let mut blocked_void = 0;
    for cell in cells.iter().flatten() {
        if cell.is_blocked_void() {
            blocked_void += 1;
            continue;
        }
        if let Some(entry) = flags.iter_mut().find(|(f, _)| *f == cell.flag()) {
            entry.1 += 1;
        }
        if let Some(floor) = cell.floor_type() {
            *floor_types.entry(floor).or_insert(0) += 1;
        }
    }

    Ok(HeightmapReport {
        width: words.iter().map(Vec::len).max().unwrap_or(0),
        height: words.len(),
        words_preserved: reencoded == words,
        text_identical: heightmap::format_matrix(&reencoded) == text,
        blocked_void,
        flags,
        floor_types,
    })
}
