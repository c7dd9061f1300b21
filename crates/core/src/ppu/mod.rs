//! Mega Drive style tile graphics: palettes, 4bpp tiles and 16x16 blocks.
//!
//! The blockset atlas is built bottom-up: [`palette`] resolves colour
//! indices, [`tile`] unpacks the tileset into palette indices and
//! [`blockset`] places tiles into blocks on the atlas.

pub mod blockset;
pub mod palette;
pub mod tile;

pub use blockset::{compose, Block, BlocksetId, TileReference};
pub use palette::{AugmentedPalette, Palette};
pub use tile::PixelIndexBuffer;
