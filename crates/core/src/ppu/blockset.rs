//! Blocks and the blockset atlas.
//!
//! A block is a 16x16 placement unit made of four 8x8 tile references in
//! quadrant order top-left, top-right, bottom-left, bottom-right. Block tables
//! are text, one block per line:
//!
//! ```text
//! tile0,attrs0,tile1,attrs1,tile2,attrs2,tile3,attrs3
//! ```
//!
//! where each `attrs` field may contain `p` (priority), `h` (horizontal flip)
//! and `v` (vertical flip). Attribute fields are matched by substring, so any
//! other characters are ignored.
//!
//! [`compose`] renders a block table into an atlas 16 blocks wide, block `i`
//! sitting in grid cell `(i % 16, i / 16)`.

use super::palette::{AugmentedPalette, TRANSPARENT};
use super::tile::{PixelIndexBuffer, TILE_SIZE};
use crate::types::Bitmap;
use crate::{LsmapError, Result};
use serde::{Deserialize, Serialize};

pub const BLOCK_SIZE: u32 = 16;
pub const BLOCKS_PER_ROW: u32 = 16;
pub const TILES_PER_BLOCK: usize = 4;
/// Translucent red drawn over priority tiles.
pub const PRIORITY_MARKER: u32 = 0x88FF0000;

const FIELDS_PER_BLOCK: usize = TILES_PER_BLOCK * 2;

/// One 8x8 tile of a block plus its placement transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileReference {
    pub tile_index: u32,
    pub flip_h: bool,
    pub flip_v: bool,
    pub priority: bool,
}

impl TileReference {
    fn parse(index: &str, attrs: &str, row: usize, column: usize) -> Result<Self> {
        let tile_index = index.trim().parse().map_err(|_| {
            LsmapError::MalformedRecord(format!(
                "block {}, field {}: {:?} is not a tile index",
                row, column, index
            ))
        })?;
        Ok(Self {
            tile_index,
            flip_h: attrs.contains('h'),
            flip_v: attrs.contains('v'),
            priority: attrs.contains('p'),
        })
    }

    /// Attribute letters in `p`, `h`, `v` order.
    pub fn attrs(&self) -> String {
        let mut attrs = String::new();
        if self.priority {
            attrs.push('p');
        }
        if self.flip_h {
            attrs.push('h');
        }
        if self.flip_v {
            attrs.push('v');
        }
        attrs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub tiles: [TileReference; TILES_PER_BLOCK],
}

impl Block {
    pub fn new(tiles: [TileReference; TILES_PER_BLOCK]) -> Self {
        Self { tiles }
    }
}

/// Parse a block table. Blank lines are skipped; every other line must hold
/// exactly eight fields.
pub fn parse_block_table(text: &str) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let row = blocks.len();
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != FIELDS_PER_BLOCK {
            return Err(LsmapError::MalformedRecord(format!(
                "block {}: expected {} fields, found {}",
                row,
                FIELDS_PER_BLOCK,
                fields.len()
            )));
        }
        let mut tiles = [TileReference::default(); TILES_PER_BLOCK];
        for (quadrant, tile) in tiles.iter_mut().enumerate() {
            let column = quadrant * 2;
            *tile = TileReference::parse(fields[column], fields[column + 1], row, column)?;
        }
        blocks.push(Block::new(tiles));
    }
    Ok(blocks)
}

pub fn format_block_table(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        let fields: Vec<String> = block
            .tiles
            .iter()
            .map(|t| format!("{},{}", t.tile_index, t.attrs()))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Atlas dimensions for `block_count` blocks.
///
/// Fails with `MalformedRecord` when the atlas could not be addressed.
pub fn atlas_size(block_count: usize) -> Result<(u32, u32)> {
    let width = BLOCKS_PER_ROW * BLOCK_SIZE;
    let height = block_count
        .div_ceil(BLOCKS_PER_ROW as usize)
        .checked_mul(BLOCK_SIZE as usize)
        .filter(|&h| h.checked_mul(width as usize).is_some())
        .and_then(|h| u32::try_from(h).ok())
        .ok_or_else(|| {
            LsmapError::MalformedRecord(format!(
                "{} blocks do not fit in one atlas",
                block_count
            ))
        })?;
    Ok((width, height))
}

/// Render a block table into an atlas.
///
/// Flips move where a source pixel lands, the source tile is always read in
/// row-major order. Priority tiles get a marker triangle in their top-left
/// corner, except in block 0. Any out-of-range tile or colour aborts the
/// whole render.
pub fn compose(
    blocks: &[Block],
    palette: &AugmentedPalette,
    pixels: &PixelIndexBuffer,
) -> Result<Bitmap> {
    let (width, height) = atlas_size(blocks.len())?;
    let mut atlas = Bitmap::filled(width, height, TRANSPARENT);
    let tile_size = TILE_SIZE as u32;

    for (i, block) in blocks.iter().enumerate() {
        let block_x = (i as u32 % BLOCKS_PER_ROW) * BLOCK_SIZE;
        let block_y = (i as u32 / BLOCKS_PER_ROW) * BLOCK_SIZE;
        let quadrant_origin = |quadrant: usize| {
            (
                block_x + (quadrant as u32 % 2) * tile_size,
                block_y + (quadrant as u32 / 2) * tile_size,
            )
        };

        for (quadrant, tile) in block.tiles.iter().enumerate() {
            let (origin_x, origin_y) = quadrant_origin(quadrant);
            let source = pixels.tile_pixels(tile.tile_index as usize)?;
            for (p, &index) in source.iter().enumerate() {
                let col = p as u32 % tile_size;
                let row = p as u32 / tile_size;
                let dest_col = if tile.flip_h { tile_size - 1 - col } else { col };
                let dest_row = if tile.flip_v { tile_size - 1 - row } else { row };
                let color = palette.resolve(index as usize)?;
                atlas.set(origin_x + dest_col, origin_y + dest_row, color);
            }
        }

        if i == 0 {
            continue;
        }
        for (quadrant, tile) in block.tiles.iter().enumerate() {
            if tile.priority {
                let (origin_x, origin_y) = quadrant_origin(quadrant);
                draw_priority_marker(&mut atlas, origin_x, origin_y);
            }
        }
    }

    Ok(atlas)
}

fn draw_priority_marker(atlas: &mut Bitmap, origin_x: u32, origin_y: u32) {
    for x in 0..4 {
        for y in 0..(4 - x) {
            atlas.set(origin_x + x, origin_y + y, PRIORITY_MARKER);
        }
    }
}

/// Which block tables and palette make up a map's blockset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlocksetId {
    pub primary: u8,
    pub secondary: u8,
    pub palette: u8,
}

impl BlocksetId {
    /// Tileset graphics shared by every blockset of a primary group.
    pub fn tileset_id(&self) -> u8 {
        self.primary & 0x1F
    }

    pub fn primary_table_name(&self) -> String {
        format!("blockset_{}_0.csv", self.primary)
    }

    /// Secondary id 0 means the primary table stands alone.
    pub fn secondary_table_name(&self) -> Option<String> {
        (self.secondary > 0).then(|| format!("blockset_{}_{}.csv", self.primary, self.secondary))
    }

    pub fn tileset_name(&self) -> String {
        format!("{}.bin", self.tileset_id())
    }

    pub fn palette_name(&self) -> String {
        format!("{}.csv", self.palette)
    }

    pub fn render_name(&self) -> String {
        format!("{}_{}_{}.png", self.primary, self.secondary, self.palette)
    }
}
