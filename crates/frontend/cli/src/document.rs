//! The editable, layered view of a map.
//!
//! A [`MapDocument`] is what a map editor works on: an isometric tile map with
//! the two block layers, three hidden metadata layers painted with meta tiles,
//! and an object layer of entities. It serialises to JSON and converts to and
//! from a [`MapLayout`] without touching the filesystem.

use crate::layout::MapLayout;
use crate::metadata::{Entity, EntityProperties, LayoutMetadata, MapMetadata, Position};
use lsmap_core::heightmap::{self, HeightCell, TileFlag};
use lsmap_core::ppu::BlocksetId;
use lsmap_core::{LsmapError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const LAYER_BACKGROUND: &str = "Background";
pub const LAYER_FOREGROUND: &str = "Foreground";
pub const LAYER_HEIGHTMAP: &str = "Heightmap";
pub const LAYER_FLAGS: &str = "Flags";
pub const LAYER_FLOOR_TYPES: &str = "Floor Types";
pub const LAYER_ENTITIES: &str = "Entities";

pub const TILE_WIDTH: u32 = 32;
pub const TILE_HEIGHT: u32 = 16;
pub const ENTITY_WIDTH: f64 = 32.0;
pub const ENTITY_HEIGHT: f64 = 48.0;

// Meta tileset ids used by the Flags and Floor Types layers
pub const META_TILE_NONE: u32 = 0;
pub const META_TILE_UNIVERSAL_BLOCKER: u32 = 1;
pub const META_TILE_NPC_BLOCKER: u32 = 2;
pub const META_TILE_LOCKED_DOOR: u32 = 3;
pub const META_TILE_RAFT_TRACK: u32 = 4;
pub const META_TILE_FLOOR_TYPE_BEGIN: u32 = 5;

/// Pixel distance covered by one map tile step on the isometric grid.
const GRID_STEP: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Isometric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilesetKind {
    Blockset,
    Heightmap,
    Meta,
    Entities,
}

/// Image/tileset files the layers draw from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilesetSources {
    pub blockset: Option<PathBuf>,
    pub heightmap: PathBuf,
    pub meta: PathBuf,
    pub entities: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub tileset: TilesetKind,
    pub offset: Offset,
    pub visible: bool,
    /// Row-major tile ids, `None` for an empty cell.
    pub tiles: Vec<Vec<Option<u32>>>,
}

impl TileLayer {
    fn tile(&self, x: usize, y: usize) -> Option<u32> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Entity type name
    pub name: String,
    /// Entity type id, which is also its tile in the entities tileset
    pub tile: u16,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub position_z: u16,
    pub properties: EntityProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayer {
    pub name: String,
    pub offset: Offset,
    pub opacity: f64,
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    Tiles(TileLayer),
    Objects(ObjectLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub orientation: Orientation,
    pub tile_width: u32,
    pub tile_height: u32,
    pub width: usize,
    pub height: usize,
    pub background_color: String,
    pub tilesets: TilesetSources,
    /// Map properties; entities live in the object layer instead.
    pub properties: MapMetadata,
    pub layout: LayoutMetadata,
    pub layers: Vec<Layer>,
}

fn block_layer(name: &str, offset: Offset, rows: &[Vec<u16>]) -> TileLayer {
    TileLayer {
        name: name.to_string(),
        tileset: TilesetKind::Blockset,
        offset,
        visible: true,
        tiles: rows
            .iter()
            .map(|row| row.iter().map(|&v| Some(v as u32)).collect())
            .collect(),
    }
}

fn meta_layer(
    name: &str,
    tileset: TilesetKind,
    offset: Offset,
    cells: &[Vec<HeightCell>],
    tile_of: impl Fn(&HeightCell) -> Option<u32>,
) -> Layer {
    Layer::Tiles(TileLayer {
        name: name.to_string(),
        tileset,
        offset,
        visible: false,
        tiles: cells
            .iter()
            .map(|row| row.iter().map(&tile_of).collect())
            .collect(),
    })
}

fn flag_tile(flag: TileFlag) -> u32 {
    match flag {
        TileFlag::None => META_TILE_NONE,
        TileFlag::UniversalBlocker => META_TILE_UNIVERSAL_BLOCKER,
        TileFlag::NpcBlocker => META_TILE_NPC_BLOCKER,
        TileFlag::LockedDoor => META_TILE_LOCKED_DOOR,
        TileFlag::RaftTrack => META_TILE_RAFT_TRACK,
    }
}

fn flag_from_tile(tile: Option<u32>) -> TileFlag {
    match tile {
        Some(META_TILE_UNIVERSAL_BLOCKER) => TileFlag::UniversalBlocker,
        Some(META_TILE_NPC_BLOCKER) => TileFlag::NpcBlocker,
        Some(META_TILE_LOCKED_DOOR) => TileFlag::LockedDoor,
        Some(META_TILE_RAFT_TRACK) => TileFlag::RaftTrack,
        _ => TileFlag::None,
    }
}

fn floor_tile(floor_type: Option<u8>) -> u32 {
    floor_type.map_or(META_TILE_NONE, |f| META_TILE_FLOOR_TYPE_BEGIN + f as u32)
}

/// Tiles below the first floor-type tile carry no floor type.
fn floor_from_tile(tile: Option<u32>, x: usize, y: usize) -> Result<Option<u8>> {
    match tile {
        Some(t) if t >= META_TILE_FLOOR_TYPE_BEGIN => {
            let floor = t - META_TILE_FLOOR_TYPE_BEGIN;
            u8::try_from(floor).map(Some).map_err(|_| {
                LsmapError::MalformedRecord(format!(
                    "floor type {} at ({}, {}) does not fit in 8 bits",
                    floor, x, y
                ))
            })
        }
        _ => Ok(None),
    }
}

fn height_from_tile(tile: Option<u32>, x: usize, y: usize) -> Result<Option<u8>> {
    tile.map(|t| {
        u8::try_from(t).map_err(|_| {
            LsmapError::MalformedRecord(format!("height {} at ({}, {}) out of range", t, x, y))
        })
    })
    .transpose()
}

/// Offset shared by the three metadata layers. The heightmap grid is anchored
/// at tilemap offset 12; any other offset shifts it along both iso axes.
pub fn metadata_layer_offset(layout: &LayoutMetadata) -> Offset {
    let dx = (layout.offset_x() - LayoutMetadata::DEFAULT_TILEMAP_OFFSET) as f64;
    let dy = (layout.offset_y() - LayoutMetadata::DEFAULT_TILEMAP_OFFSET) as f64;
    Offset {
        x: dy * GRID_STEP - dx * GRID_STEP,
        y: -dx * (GRID_STEP / 2.0) - dy * (GRID_STEP / 2.0),
    }
}

fn dimensions(matrices: &[&[Vec<u16>]]) -> (usize, usize) {
    let height = matrices.iter().map(|m| m.len()).max().unwrap_or(0);
    let width = matrices
        .iter()
        .flat_map(|m| m.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    (width, height)
}

impl MapDocument {
    pub fn from_layout(layout: &MapLayout, tilesets: TilesetSources) -> Self {
        let (width, height) = dimensions(&[
            layout.heightmap.as_slice(),
            layout.background.as_slice(),
            layout.foreground.as_slice(),
        ]);

        let mut layers = vec![
            Layer::Tiles(block_layer(
                LAYER_BACKGROUND,
                Offset { x: 16.0, y: 0.0 },
                &layout.background,
            )),
            Layer::Tiles(block_layer(
                LAYER_FOREGROUND,
                Offset::default(),
                &layout.foreground,
            )),
        ];

        let cells = heightmap::decode_matrix(&layout.heightmap);
        let offset = metadata_layer_offset(&layout.layout);
        layers.push(meta_layer(LAYER_HEIGHTMAP, TilesetKind::Heightmap, offset, &cells, |c| {
            c.height().map(u32::from)
        }));
        layers.push(meta_layer(LAYER_FLAGS, TilesetKind::Meta, offset, &cells, |c| {
            Some(flag_tile(c.flag()))
        }));
        layers.push(meta_layer(LAYER_FLOOR_TYPES, TilesetKind::Meta, offset, &cells, |c| {
            Some(floor_tile(c.floor_type()))
        }));

        let origin_x = layout.layout.offset_x() as f64;
        let origin_y = layout.layout.offset_y() as f64;
        let objects = layout
            .metadata
            .entities
            .iter()
            .map(|e| MapObject {
                name: e.entity_type.clone(),
                tile: e.entity_type_id,
                x: (e.position.x - origin_x) * GRID_STEP,
                y: (e.position.y - origin_y) * GRID_STEP,
                width: ENTITY_WIDTH,
                height: ENTITY_HEIGHT,
                position_z: e.position.z,
                properties: e.properties.clone(),
            })
            .collect();
        layers.push(Layer::Objects(ObjectLayer {
            name: LAYER_ENTITIES.to_string(),
            offset: Offset { x: 0.0, y: 16.0 },
            opacity: 0.8,
            objects,
        }));

        let properties = MapMetadata {
            entities: Vec::new(),
            ..layout.metadata.clone()
        };

        Self {
            orientation: Orientation::Isometric,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            width,
            height,
            background_color: "#000000".to_string(),
            tilesets,
            properties,
            layout: layout.layout.clone(),
            layers,
        }
    }

    /// Blockset the block layers index into.
    pub fn blockset_id(&self) -> BlocksetId {
        self.properties.blockset_id()
    }

    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Tiles(t) if t.name == name => Some(t),
            _ => None,
        })
    }

    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Objects(o) if o.name == name => Some(o),
            _ => None,
        })
    }

    fn require_tile_layer(&self, name: &str) -> Result<&TileLayer> {
        self.tile_layer(name)
            .ok_or_else(|| LsmapError::MissingResource(format!("'{}' layer missing", name)))
    }

    /// Rebuild the on-disk layout. Empty block cells are written as block 0.
    pub fn to_layout(&self) -> Result<MapLayout> {
        let background = block_matrix(self.require_tile_layer(LAYER_BACKGROUND)?)?;
        let foreground = block_matrix(self.require_tile_layer(LAYER_FOREGROUND)?)?;
        let heights = self.require_tile_layer(LAYER_HEIGHTMAP)?;
        let floors = self.require_tile_layer(LAYER_FLOOR_TYPES)?;
        let flags = self.require_tile_layer(LAYER_FLAGS)?;

        let mut cells = Vec::with_capacity(heights.tiles.len());
        for (y, row) in heights.tiles.iter().enumerate() {
            let mut line = Vec::with_capacity(row.len());
            for (x, &height) in row.iter().enumerate() {
                line.push(HeightCell::new(
                    height_from_tile(height, x, y)?,
                    flag_from_tile(flags.tile(x, y)),
                    floor_from_tile(floors.tile(x, y), x, y)?,
                )?);
            }
            cells.push(line);
        }

        let origin_x = self.layout.offset_x() as f64;
        let origin_y = self.layout.offset_y() as f64;
        let entities = self
            .object_layer(LAYER_ENTITIES)
            .map(|layer| {
                layer
                    .objects
                    .iter()
                    .map(|o| Entity {
                        entity_type: o.name.clone(),
                        entity_type_id: o.tile,
                        position: Position {
                            x: o.x / GRID_STEP + origin_x,
                            y: o.y / GRID_STEP + origin_y,
                            z: o.position_z,
                        },
                        properties: o.properties.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(MapLayout {
            background,
            foreground,
            heightmap: heightmap::encode_matrix(&cells),
            layout: self.layout.clone(),
            metadata: MapMetadata {
                entities,
                ..self.properties.clone()
            },
        })
    }
}

fn block_matrix(layer: &TileLayer) -> Result<Vec<Vec<u16>>> {
    layer
        .tiles
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, tile)| {
                    let id = tile.unwrap_or(0);
                    u16::try_from(id).map_err(|_| {
                        LsmapError::MalformedRecord(format!(
                            "{} block {} at ({}, {}) does not fit in 16 bits",
                            layer.name, id, x, y
                        ))
                    })
                })
                .collect()
        })
        .collect()
}
