//! Core codecs for converting Landstalker map data.
//!
//! Everything in this crate is a pure transform over plain values: heightmap
//! words, block tables, palettes and packed tile graphics go in, decoded
//! matrices and composed atlas bitmaps come out. File access, the editable map
//! document and logging live in the frontend crate.

pub mod error;
pub mod graphics;
pub mod heightmap;
pub mod ppu;

pub use error::LsmapError;

pub type Result<T> = std::result::Result<T, LsmapError>;

pub mod types {
    use crate::graphics::ColorOps;
    use serde::{Deserialize, Serialize};

    /// An ARGB8888 (0xAARRGGBB) image, row-major.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Bitmap {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Bitmap {
        pub fn new(width: u32, height: u32) -> Self {
            Self::filled(width, height, 0)
        }

        pub fn filled(width: u32, height: u32, color: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![color; (width as usize).saturating_mul(height as usize)],
            }
        }

        /// Pixel at `(x, y)`, or `None` outside the image.
        pub fn get(&self, x: u32, y: u32) -> Option<u32> {
            if x >= self.width || y >= self.height {
                return None;
            }
            self.pixels.get(self.offset(x, y)).copied()
        }

        /// Writes are clipped to the image bounds.
        pub fn set(&mut self, x: u32, y: u32, color: u32) {
            if x < self.width && y < self.height {
                let offset = self.offset(x, y);
                if let Some(pixel) = self.pixels.get_mut(offset) {
                    *pixel = color;
                }
            }
        }

        fn offset(&self, x: u32, y: u32) -> usize {
            y as usize * self.width as usize + x as usize
        }

        /// Pixels as straight RGBA bytes, the layout image encoders expect.
        pub fn to_rgba8(&self) -> Vec<u8> {
            let mut out = Vec::with_capacity(self.pixels.len() * 4);
            for &argb in &self.pixels {
                out.extend_from_slice(&[
                    ColorOps::red(argb),
                    ColorOps::green(argb),
                    ColorOps::blue(argb),
                    ColorOps::alpha(argb),
                ]);
            }
            out
        }
    }
}
