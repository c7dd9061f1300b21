//! Map palettes.
//!
//! Palette files hold the raw colours of a map palette as rows of `#AARRGGBB`
//! literals. Before tile pixels can index it, the raw palette is augmented
//! with reserved slots:
//!
//! ```text
//! [TRANSPARENT, HIGHLIGHT] ++ raw ++ [BLACK_OPAQUE]
//! ```
//!
//! so pixel index 0 is always transparent, index 1 the highlight colour and
//! the last slot opaque black, whatever the raw colours are.

use crate::graphics::ColorOps;
use crate::{LsmapError, Result};

pub const TRANSPARENT: u32 = 0x00000000;
pub const HIGHLIGHT: u32 = 0xFFCCCCCC;
pub const BLACK_OPAQUE: u32 = 0xFF000000;

/// Number of reserved slots in front of the raw colours.
pub const RESERVED_FRONT: usize = 2;

/// Raw palette as read from a palette file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    pub fn from_colors(colors: Vec<u32>) -> Self {
        Self { colors }
    }

    /// Parse palette text, flattening rows in order.
    ///
    /// Entries are comma separated; blank lines are skipped. Entry indices in
    /// errors count entries across all rows.
    pub fn load(text: &str) -> Result<Self> {
        let mut colors = Vec::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            for entry in line.split(',') {
                let color = ColorOps::parse_hex(entry).ok_or_else(|| {
                    LsmapError::PaletteParseError {
                        index: colors.len(),
                        entry: entry.trim().to_string(),
                    }
                })?;
                colors.push(color);
            }
        }
        Ok(Self { colors })
    }

    /// Palette file text, one literal per line.
    pub fn format(&self) -> String {
        let mut out = String::new();
        for &c in &self.colors {
            out.push_str(&ColorOps::to_hex(c));
            out.push('\n');
        }
        out
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn augment(&self) -> AugmentedPalette {
        let mut colors = Vec::with_capacity(self.colors.len() + RESERVED_FRONT + 1);
        colors.push(TRANSPARENT);
        colors.push(HIGHLIGHT);
        colors.extend_from_slice(&self.colors);
        colors.push(BLACK_OPAQUE);
        AugmentedPalette { colors }
    }
}

/// Raw palette with the reserved slots affixed. Only built by
/// [`Palette::augment`], so it always holds `raw.len() + 3` colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedPalette {
    colors: Vec<u32>,
}

impl AugmentedPalette {
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Colour of a raw tile pixel index.
    pub fn resolve(&self, index: usize) -> Result<u32> {
        self.colors
            .get(index)
            .copied()
            .ok_or(LsmapError::PaletteIndexOutOfRange {
                index,
                len: self.colors.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_flattens_rows() {
        let palette = Palette::load("#ff112233,#ff445566\n\n#FF778899\n").expect("load");
        assert_eq!(palette.colors(), &[0xFF112233, 0xFF445566, 0xFF778899]);
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_load_rejects_bad_entry() {
        let err = Palette::load("#ff112233\n#ff44556\n").unwrap_err();
        assert_eq!(
            err,
            LsmapError::PaletteParseError {
                index: 1,
                entry: "#ff44556".to_string()
            }
        );
        assert!(Palette::load("#ff112233,\n").is_err());
    }

    #[test]
    fn test_augment_order_and_count() {
        let raw = Palette::load("#11223344").expect("load");
        let augmented = raw.augment();
        assert_eq!(
            augmented.colors(),
            &[TRANSPARENT, HIGHLIGHT, 0x11223344, BLACK_OPAQUE]
        );
        assert_eq!(augmented.len(), raw.len() + 3);
    }

    #[test]
    fn test_augment_empty() {
        let augmented = Palette::default().augment();
        assert_eq!(augmented.colors(), &[TRANSPARENT, HIGHLIGHT, BLACK_OPAQUE]);
    }

    #[test]
    fn test_reserved_slots_ignore_raw_contents() {
        let raw = Palette::from_colors(vec![0xFFFFFFFF; 13]);
        let augmented = raw.augment();
        assert_eq!(augmented.resolve(0), Ok(TRANSPARENT));
        assert_eq!(augmented.resolve(1), Ok(HIGHLIGHT));
        assert_eq!(augmented.resolve(15), Ok(BLACK_OPAQUE));
    }

    #[test]
    fn test_resolve_out_of_range() {
        let augmented = Palette::from_colors(vec![0xFF00FF00]).augment();
        assert_eq!(
            augmented.resolve(4),
            Err(LsmapError::PaletteIndexOutOfRange { index: 4, len: 4 })
        );
        assert!(Palette::default().is_empty());
    }

    #[test]
    fn test_format_roundtrip() {
        let raw = Palette::from_colors(vec![0xFF112233, 0xFFEEDDCC]);
        assert_eq!(raw.format(), "#ff112233\n#ffeeddcc\n");
        assert_eq!(Palette::load(&raw.format()), Ok(raw));
    }
}
