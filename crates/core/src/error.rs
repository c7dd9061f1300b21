use thiserror::Error;

/// Failures raised by the codecs and the compositor.
///
/// Every failure is terminal for the conversion that raised it: callers get no
/// partial matrix or image back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LsmapError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Invalid palette entry {entry:?} at index {index}")]
    PaletteParseError { index: usize, entry: String },
    #[error("Palette index {index} out of range (palette has {len} colors)")]
    PaletteIndexOutOfRange { index: usize, len: usize },
    #[error("Tile {tile_index} out of range (tileset has {tile_count} tiles)")]
    TileIndexOutOfRange { tile_index: usize, tile_count: usize },
    #[error("Missing resource: {0}")]
    MissingResource(String),
}
