//! Genesis/Mega Drive 4bpp linear tile graphics.
//!
//! Each 8x8 tile is 32 bytes, pixels stored row-major two per byte with the
//! high nibble first. Decoding is a plain nibble split; tile boundaries fall
//! every 64 pixel indices.

use crate::{LsmapError, Result};

/// Width and height of a tile, in pixels.
pub const TILE_SIZE: usize = 8;
pub const PIXELS_PER_TILE: usize = TILE_SIZE * TILE_SIZE;
pub const BYTES_PER_TILE: usize = PIXELS_PER_TILE / 2;

/// Unpacked tileset: one palette index (0-15) per pixel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelIndexBuffer {
    indices: Vec<u8>,
}

impl PixelIndexBuffer {
    /// Split every byte into its high then low nibble.
    pub fn unpack(bytes: &[u8]) -> Self {
        let mut indices = Vec::with_capacity(bytes.len() * 2);
        for &byte in bytes {
            indices.push((byte >> 4) & 0xF);
            indices.push(byte & 0xF);
        }
        Self { indices }
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of complete tiles in the buffer.
    pub fn tile_count(&self) -> usize {
        self.indices.len() / PIXELS_PER_TILE
    }

    /// The 64 row-major pixel indices of one tile.
    pub fn tile_pixels(&self, tile_index: usize) -> Result<&[u8]> {
        let out_of_range = || LsmapError::TileIndexOutOfRange {
            tile_index,
            tile_count: self.tile_count(),
        };
        let range = tile_index
            .checked_mul(PIXELS_PER_TILE)
            .and_then(|start| Some(start..start.checked_add(PIXELS_PER_TILE)?))
            .ok_or_else(out_of_range)?;
        self.indices.get(range).ok_or_else(out_of_range)
    }
}
