//! Colour utilities shared by the palette loader and the compositor.

pub mod color;

pub use color::ColorOps;
