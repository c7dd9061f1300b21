//! File-level conversion between Landstalker map layouts and the editable map
//! document.
//!
//! `lsmap_core` only transforms values. This crate owns everything around it:
//! the on-disk tree (`maps/`, `blocksets/`, `tilesets/`, `map_palettes/`), the
//! metadata schemas, the layered [`document::MapDocument`], PNG output of the
//! blockset atlas and the settings that locate shared resources.

pub mod atlas_png;
pub mod blockset;
pub mod convert;
pub mod document;
pub mod layout;
pub mod metadata;
pub mod settings;

use lsmap_core::LsmapError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Core(#[from] LsmapError),
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

fn io_error(path: &Path, source: io::Error) -> ConvertError {
    if source.kind() == io::ErrorKind::NotFound {
        LsmapError::MissingResource(path.display().to_string()).into()
    } else {
        ConvertError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    log::info!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    log::info!("Reading {}", path.display());
    fs::read(path).map_err(|e| io_error(path, e))
}

pub(crate) fn write_bytes(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    log::info!("Writing {}", path.display());
    fs::write(path, contents).map_err(|e| io_error(path, e))
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_bytes(path, text)
}
