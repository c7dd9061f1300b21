//! Building blockset atlases from the data tree.
//!
//! ```text
//! <data root>/blocksets/blockset_P_0.csv     primary block table
//! <data root>/blocksets/blockset_P_S.csv     secondary table, appended when S > 0
//! <data root>/tilesets/T.bin                 4bpp tiles, T = P & 0x1F
//! <data root>/map_palettes/N.csv             raw palette
//! <data root>/blocksets/renders/P_S_N.png    output
//! ```

use crate::{atlas_png, read_bytes, read_text, Result};
use lsmap_core::ppu::blockset::{compose, parse_block_table};
use lsmap_core::ppu::{Block, BlocksetId, Palette, PixelIndexBuffer};
use lsmap_core::types::Bitmap;
use lsmap_core::LsmapError;
use std::fs;
use std::path::{Path, PathBuf};

pub fn blocksets_dir(data_root: &Path) -> PathBuf {
    data_root.join("blocksets")
}

pub fn render_path(data_root: &Path, id: BlocksetId) -> PathBuf {
    blocksets_dir(data_root).join("renders").join(id.render_name())
}

/// Primary blocks followed by the secondary ones.
pub fn load_blocks(data_root: &Path, id: BlocksetId) -> Result<Vec<Block>> {
    let dir = blocksets_dir(data_root);
    let mut blocks = parse_block_table(&read_text(&dir.join(id.primary_table_name()))?)?;
    if let Some(secondary) = id.secondary_table_name() {
        blocks.extend(parse_block_table(&read_text(&dir.join(secondary))?)?);
    }
    if blocks.is_empty() {
        return Err(LsmapError::MissingResource(format!(
            "blockset {}_{} has no blocks",
            id.primary, id.secondary
        ))
        .into());
    }
    Ok(blocks)
}

pub fn build_blockset(data_root: &Path, id: BlocksetId) -> Result<Bitmap> {
    let blocks = load_blocks(data_root, id)?;
    let tiles = read_bytes(&data_root.join("tilesets").join(id.tileset_name()))?;
    let palette = Palette::load(&read_text(
        &data_root.join("map_palettes").join(id.palette_name()),
    )?)?;

    let pixels = PixelIndexBuffer::unpack(&tiles);
    let atlas = compose(&blocks, &palette.augment(), &pixels)?;
    log::debug!(
        "Blockset image is {} x {} ({} blocks, {} tiles)",
        atlas.width,
        atlas.height,
        blocks.len(),
        pixels.tile_count()
    );
    Ok(atlas)
}

/// Build the atlas and write it under `blocksets/renders/`.
pub fn build_and_save(data_root: &Path, id: BlocksetId) -> Result<PathBuf> {
    let atlas = build_blockset(data_root, id)?;
    let path = render_path(data_root, id);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| crate::io_error(dir, e))?;
    }
    atlas_png::save(&atlas, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConvertError;

    fn data_tree(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(name);
        fs::remove_dir_all(&root).ok();
        fs::create_dir_all(root.join("blocksets")).expect("mkdir");
        fs::create_dir_all(root.join("tilesets")).expect("mkdir");
        fs::create_dir_all(root.join("map_palettes")).expect("mkdir");
        // Two tiles: all index 2, all index 3
        let mut tiles = vec![0x22u8; 32];
        tiles.extend(vec![0x33u8; 32]);
        fs::write(root.join("tilesets/1.bin"), tiles).expect("write");
        fs::write(root.join("map_palettes/0.csv"), "#ff0000ff,#ff00ff00\n").expect("write");
        fs::write(root.join("blocksets/blockset_1_0.csv"), "0,,0,,0,,0,\n").expect("write");
        fs::write(root.join("blocksets/blockset_1_1.csv"), "1,p,1,,1,,1,h\n").expect("write");
        root
    }

    const ID: BlocksetId = BlocksetId {
        primary: 1,
        secondary: 1,
        palette: 0,
    };

    #[test]
    fn test_load_blocks_appends_secondary() {
        let root = data_tree("lsmap_blockset_load");
        assert_eq!(load_blocks(&root, ID).expect("load").len(), 2);
        let standalone = BlocksetId { secondary: 0, ..ID };
        assert_eq!(load_blocks(&root, standalone).expect("load").len(), 1);
        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_build_blockset() {
        let root = data_tree("lsmap_blockset_build");
        let atlas = build_blockset(&root, ID).expect("build");
        assert_eq!((atlas.width, atlas.height), (256, 16));
        assert_eq!(atlas.get(0, 0), Some(0xFF0000FF));
        assert_eq!(atlas.get(31, 15), Some(0xFF00FF00));
        // Priority marker on block 1
        assert_eq!(atlas.get(16, 0), Some(lsmap_core::ppu::blockset::PRIORITY_MARKER));
        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_build_and_save_writes_render() {
        let root = data_tree("lsmap_blockset_save");
        let path = build_and_save(&root, ID).expect("save");
        assert!(path.ends_with("blocksets/renders/1_1_0.png"));
        let bytes = fs::read(&path).expect("read");
        assert_eq!(&bytes[1..4], b"PNG");
        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_missing_palette() {
        let root = data_tree("lsmap_blockset_missing");
        let id = BlocksetId { primary: 1, secondary: 1, palette: 3 };
        let err = build_blockset(&root, id).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Core(LsmapError::MissingResource(ref p)) if p.ends_with("3.csv")
        ));
        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_tile_out_of_range_aborts() {
        let root = data_tree("lsmap_blockset_range");
        fs::write(root.join("blocksets/blockset_1_1.csv"), "9,,1,,1,,1,\n").expect("write");
        assert!(matches!(
            build_and_save(&root, ID),
            Err(ConvertError::Core(LsmapError::TileIndexOutOfRange { tile_index: 9, .. }))
        ));
        assert!(!render_path(&root, ID).exists());
        fs::remove_dir_all(root).ok();
    }
}
