//! JSON metadata stored next to a map layout.
//!
//! `layout_metadata.json` holds what every map sharing the layout has in
//! common; each `map_NNN.lsmap` holds one map's properties and entities.
//! Optional fields stay `None` when absent from the file; the documented
//! defaults are applied through the accessor methods only.

use lsmap_core::ppu::BlocksetId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilemap_offset_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilemap_offset_y: Option<i32>,
}

impl LayoutMetadata {
    pub const DEFAULT_TILEMAP_OFFSET: i32 = 12;

    pub fn offset_x(&self) -> i32 {
        self.tilemap_offset_x.unwrap_or(Self::DEFAULT_TILEMAP_OFFSET)
    }

    pub fn offset_y(&self) -> i32 {
        self.tilemap_offset_y.unwrap_or(Self::DEFAULT_TILEMAP_OFFSET)
    }
}

/// Story flag set when the player first enters a map, written `byte:bit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlagOnVisit {
    pub byte: u16,
    pub bit: u8,
}

impl fmt::Display for FlagOnVisit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.byte, self.bit)
    }
}

impl FromStr for FlagOnVisit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (byte, bit) = s
            .split_once(':')
            .ok_or_else(|| format!("expected byte:bit, got {:?}", s))?;
        let byte = byte
            .trim()
            .parse()
            .map_err(|_| format!("invalid flag byte in {:?}", s))?;
        let bit: u8 = bit
            .trim()
            .parse()
            .map_err(|_| format!("invalid flag bit in {:?}", s))?;
        if bit > 7 {
            return Err(format!("flag bit {} out of range in {:?}", bit, s));
        }
        Ok(Self { byte, bit })
    }
}

impl TryFrom<String> for FlagOnVisit {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FlagOnVisit> for String {
    fn from(flag: FlagOnVisit) -> Self {
        flag.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: u16,
}

/// Entity fields that the document keeps as object properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityProperties {
    #[serde(default)]
    pub orientation: String,
    #[serde(default)]
    pub palette: u8,
    #[serde(default)]
    pub speed: u8,
    #[serde(default)]
    pub fightable: bool,
    #[serde(default)]
    pub liftable: bool,
    #[serde(default)]
    pub can_pass_through: bool,
    #[serde(default)]
    pub appear_after_player_moved_away: bool,
    #[serde(default)]
    pub gravity_immune: bool,
    #[serde(default)]
    pub talkable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<u16>,
    #[serde(default)]
    pub behavior_id: u16,
    #[serde(default)]
    pub use_tiles_from_other_entity: Option<u16>,
    #[serde(default, rename = "flagUnknown_2_3")]
    pub flag_unknown_2_3: bool,
    #[serde(default, rename = "flagUnknown_2_4")]
    pub flag_unknown_2_4: bool,
}

impl EntityProperties {
    pub fn dialogue(&self) -> u16 {
        self.dialogue.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub entity_type: String,
    pub entity_type_id: u16,
    pub position: Position,
    #[serde(flatten)]
    pub properties: EntityProperties,
}

/// Contents of a `.lsmap` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockset_primary: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockset_secondary: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette_id: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling_height: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_chest_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_param_1: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_param_2: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climb_destination: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall_destination: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_on_visit: Option<FlagOnVisit>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl MapMetadata {
    pub const DEFAULT_BLOCKSET_PRIMARY: u8 = 1;
    pub const DEFAULT_BLOCKSET_SECONDARY: u8 = 1;
    pub const DEFAULT_PALETTE_ID: u8 = 0;

    pub fn blockset_id(&self) -> BlocksetId {
        BlocksetId {
            primary: self
                .blockset_primary
                .unwrap_or(Self::DEFAULT_BLOCKSET_PRIMARY),
            secondary: self
                .blockset_secondary
                .unwrap_or(Self::DEFAULT_BLOCKSET_SECONDARY),
            palette: self.palette_id.unwrap_or(Self::DEFAULT_PALETTE_ID),
        }
    }
}
