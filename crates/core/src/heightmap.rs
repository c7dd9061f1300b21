//! Heightmap word codec.
//!
//! Each map tile's physical metadata is stored on disk as one 16-bit word:
//!
//! ```text
//! bits 12-15  flag code   (0 none, 1 raft track, 2 NPC blocker, 4 blocker, 6 locked door)
//! bits  8-11  height      (0-15)
//! bits  0-7   floor code  (0 none, otherwise floor type + 1)
//! ```
//!
//! Flag code 4 with a zero height is the blocked-void sentinel: the tile has
//! no traversable height at all, which is distinct from height 0.
//!
//! Heightmap files are text, one map row per line, comma-separated decimal
//! words. [`parse_matrix`] and [`format_matrix`] handle that layer; the
//! background and foreground tile index files share the same shape.

use crate::{LsmapError, Result};
use serde::{Deserialize, Serialize};

/// Word of the blocked-void sentinel.
pub const BLOCKED_VOID: u16 = 0x4000;
pub const MAX_HEIGHT: u8 = 0x0F;
/// Largest floor type that still fits the floor code after its +1 bias.
pub const MAX_FLOOR_TYPE: u8 = 0xFE;

const FLAG_RAFT_TRACK: u16 = 1;
const FLAG_NPC_BLOCKER: u16 = 2;
const FLAG_BLOCKER: u16 = 4;
const FLAG_LOCKED_DOOR: u16 = 6;

/// Collision/behaviour classification of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileFlag {
    #[default]
    None,
    RaftTrack,
    NpcBlocker,
    UniversalBlocker,
    LockedDoor,
}

impl TileFlag {
    fn code(self) -> u16 {
        match self {
            TileFlag::None => 0,
            TileFlag::RaftTrack => FLAG_RAFT_TRACK,
            TileFlag::NpcBlocker => FLAG_NPC_BLOCKER,
            TileFlag::UniversalBlocker => FLAG_BLOCKER,
            TileFlag::LockedDoor => FLAG_LOCKED_DOOR,
        }
    }
}

/// Decoded heightmap word.
///
/// Fields are private so that every value is canonical: a cell without height
/// never carries a flag or floor type, since the sentinel has no room for them.
/// Deserialization goes through [`HeightCell::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHeightCell")]
pub struct HeightCell {
    height: Option<u8>,
    flag: TileFlag,
    floor_type: Option<u8>,
}

/// Unchecked field mirror of [`HeightCell`] for deserialization.
#[derive(Deserialize)]
struct RawHeightCell {
    height: Option<u8>,
    #[serde(default)]
    flag: TileFlag,
    floor_type: Option<u8>,
}

impl TryFrom<RawHeightCell> for HeightCell {
    type Error = LsmapError;

    fn try_from(raw: RawHeightCell) -> Result<Self> {
        HeightCell::new(raw.height, raw.flag, raw.floor_type)
    }
}

impl HeightCell {
    /// Build a cell, rejecting values that do not fit their bit fields.
    ///
    /// An absent height discards `flag` and `floor_type`.
    pub fn new(height: Option<u8>, flag: TileFlag, floor_type: Option<u8>) -> Result<Self> {
        match height {
            None => return Ok(Self::blocked_void()),
            Some(h) if h > MAX_HEIGHT => {
                return Err(LsmapError::MalformedRecord(format!(
                    "height {} exceeds {}",
                    h, MAX_HEIGHT
                )))
            }
            Some(_) => {}
        }
        if let Some(floor) = floor_type {
            if floor > MAX_FLOOR_TYPE {
                return Err(LsmapError::MalformedRecord(format!(
                    "floor type {} exceeds {}",
                    floor, MAX_FLOOR_TYPE
                )));
            }
        }
        Ok(Self {
            height,
            flag,
            floor_type,
        })
    }

    /// The "no height, fully blocked" cell.
    pub const fn blocked_void() -> Self {
        Self {
            height: None,
            flag: TileFlag::None,
            floor_type: None,
        }
    }

    pub fn height(&self) -> Option<u8> {
        self.height
    }

    pub fn flag(&self) -> TileFlag {
        self.flag
    }

    pub fn floor_type(&self) -> Option<u8> {
        self.floor_type
    }

    pub fn is_blocked_void(&self) -> bool {
        self.height.is_none()
    }
}

/// Unpack a heightmap word.
///
/// Unknown flag codes decode to [`TileFlag::None`]; such words do not survive
/// a re-encode.
pub fn decode(word: u16) -> HeightCell {
    let flag_code = (word >> 12) & 0xF;
    let height_field = ((word >> 8) & 0xF) as u8;
    let floor_field = (word & 0xFF) as u8;

    if height_field == 0 && flag_code == FLAG_BLOCKER {
        return HeightCell::blocked_void();
    }

    let flag = match flag_code {
        FLAG_RAFT_TRACK => TileFlag::RaftTrack,
        FLAG_NPC_BLOCKER => TileFlag::NpcBlocker,
        FLAG_BLOCKER => TileFlag::UniversalBlocker,
        FLAG_LOCKED_DOOR => TileFlag::LockedDoor,
        _ => TileFlag::None,
    };
    let floor_type = match floor_field {
        0 => None,
        f => Some(f - 1),
    };

    HeightCell {
        height: Some(height_field),
        flag,
        floor_type,
    }
}

/// Pack a cell into its heightmap word.
pub fn encode(cell: &HeightCell) -> u16 {
    let Some(height) = cell.height else {
        return BLOCKED_VOID;
    };
    let floor_field = cell.floor_type.map_or(0, |f| f as u16 + 1);
    (cell.flag.code() << 12) | ((height as u16) << 8) | floor_field
}

pub fn decode_matrix(words: &[Vec<u16>]) -> Vec<Vec<HeightCell>> {
    words
        .iter()
        .map(|row| row.iter().map(|&w| decode(w)).collect())
        .collect()
}

pub fn encode_matrix(cells: &[Vec<HeightCell>]) -> Vec<Vec<u16>> {
    cells
        .iter()
        .map(|row| row.iter().map(encode).collect())
        .collect()
}

/// Parse comma-separated rows of decimal 16-bit words.
///
/// Blank lines are skipped and fields are trimmed, so `\r\n` line endings are
/// accepted. The first bad field aborts the whole parse.
pub fn parse_matrix(text: &str) -> Result<Vec<Vec<u16>>> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row_index = rows.len();
        let row = line
            .split(',')
            .enumerate()
            .map(|(column, field)| parse_field(field.trim(), row_index, column))
            .collect::<Result<Vec<u16>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_field(field: &str, row: usize, column: usize) -> Result<u16> {
    let value: u64 = field.parse().map_err(|_| {
        LsmapError::MalformedRecord(format!(
            "row {}, column {}: {:?} is not an integer",
            row, column, field
        ))
    })?;
    u16::try_from(value).map_err(|_| {
        LsmapError::MalformedRecord(format!(
            "row {}, column {}: {} does not fit in 16 bits",
            row, column, value
        ))
    })
}

/// Canonical text form: fields joined by `,`, every row ends with `\n`.
pub fn format_matrix(rows: &[Vec<u16>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(height: Option<u8>, flag: TileFlag, floor: Option<u8>) -> HeightCell {
        HeightCell::new(height, flag, floor).expect("valid cell")
    }

    #[test]
    fn test_decode_fields() {
        let c = decode(0x2305);
        assert_eq!(c.height(), Some(3));
        assert_eq!(c.flag(), TileFlag::NpcBlocker);
        assert_eq!(c.floor_type(), Some(4));

        let c = decode(0x0000);
        assert_eq!(c.height(), Some(0));
        assert_eq!(c.flag(), TileFlag::None);
        assert_eq!(c.floor_type(), None);
    }

    #[test]
    fn test_decode_flag_codes() {
        assert_eq!(decode(0x1100).flag(), TileFlag::RaftTrack);
        assert_eq!(decode(0x2100).flag(), TileFlag::NpcBlocker);
        assert_eq!(decode(0x4100).flag(), TileFlag::UniversalBlocker);
        assert_eq!(decode(0x6100).flag(), TileFlag::LockedDoor);
        assert_eq!(decode(0x3100).flag(), TileFlag::None);
        assert_eq!(decode(0xF100).flag(), TileFlag::None);
    }

    #[test]
    fn test_blocked_void_sentinel() {
        let c = decode(0x4000);
        assert_eq!(c, HeightCell::blocked_void());
        assert_eq!(c.height(), None);
        assert_eq!(c.flag(), TileFlag::None);
        assert_eq!(c.floor_type(), None);
        assert_eq!(encode(&c), 0x4000);
    }

    #[test]
    fn test_blocked_void_ignores_floor_field() {
        let c = decode(0x4007);
        assert!(c.is_blocked_void());
        assert_eq!(c.floor_type(), None);
    }

    #[test]
    fn test_absent_height_encodes_sentinel_regardless_of_flag() {
        let c = cell(None, TileFlag::LockedDoor, Some(3));
        assert_eq!(c, HeightCell::blocked_void());
        assert_eq!(encode(&c), BLOCKED_VOID);
    }

    #[test]
    fn test_height_zero_is_not_void() {
        let c = cell(Some(0), TileFlag::None, None);
        assert_eq!(encode(&c), 0x0000);
        assert!(!decode(0x0000).is_blocked_void());
    }

    #[test]
    fn test_encode_layout() {
        let c = cell(Some(0xA), TileFlag::LockedDoor, Some(0));
        assert_eq!(encode(&c), 0x6A01);
        let c = cell(Some(15), TileFlag::UniversalBlocker, Some(MAX_FLOOR_TYPE));
        assert_eq!(encode(&c), 0x4FFF);
    }

    #[test]
    fn test_cell_roundtrip_all_constructible() {
        let flags = [
            TileFlag::None,
            TileFlag::RaftTrack,
            TileFlag::NpcBlocker,
            TileFlag::UniversalBlocker,
            TileFlag::LockedDoor,
        ];
        for height in (0..=MAX_HEIGHT).map(Some).chain([None]) {
            for flag in flags {
                for floor in [None, Some(0), Some(1), Some(17), Some(MAX_FLOOR_TYPE)] {
                    let c = cell(height, flag, floor);
                    assert_eq!(decode(encode(&c)), c, "{:?}", c);
                }
            }
        }
    }

    #[test]
    fn test_word_roundtrip_for_mapped_codes() {
        for flag_code in [0u16, 1, 2, 4, 6] {
            for height in 0..=0xFu16 {
                if flag_code == 4 && height == 0 {
                    continue;
                }
                for floor in [0u16, 1, 0x80, 0xFF] {
                    let w = (flag_code << 12) | (height << 8) | floor;
                    assert_eq!(encode(&decode(w)), w, "{:#06x}", w);
                }
            }
        }
    }

    #[test]
    fn test_unmapped_flag_code_is_lossy() {
        assert_eq!(encode(&decode(0x3201)), 0x0201);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            HeightCell::new(Some(16), TileFlag::None, None),
            Err(LsmapError::MalformedRecord(_))
        ));
        assert!(matches!(
            HeightCell::new(Some(1), TileFlag::None, Some(255)),
            Err(LsmapError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_deserialize_validates_cell() {
        let c: HeightCell =
            serde_json::from_str(r#"{"height":3,"flag":"NpcBlocker","floor_type":4}"#)
                .expect("valid cell");
        assert_eq!(c, decode(0x2305));

        let json = serde_json::to_string(&c).expect("serialize");
        assert_eq!(serde_json::from_str::<HeightCell>(&json).expect("parse"), c);

        assert!(serde_json::from_str::<HeightCell>(
            r#"{"height":16,"flag":"None","floor_type":null}"#
        )
        .is_err());
        assert!(serde_json::from_str::<HeightCell>(
            r#"{"height":1,"flag":"None","floor_type":255}"#
        )
        .is_err());
    }

    #[test]
    fn test_deserialize_void_is_canonical() {
        let c: HeightCell =
            serde_json::from_str(r#"{"height":null,"flag":"LockedDoor","floor_type":3}"#)
                .expect("void cell");
        assert_eq!(c, HeightCell::blocked_void());
        assert_eq!(encode(&c), BLOCKED_VOID);
    }

    #[test]
    fn test_parse_matrix() {
        let rows = parse_matrix("16384,256, 513\r\n\n0,1,2\n").expect("parse");
        assert_eq!(rows, vec![vec![16384, 256, 513], vec![0, 1, 2]]);
    }

    #[test]
    fn test_parse_matrix_rejects_bad_fields() {
        let err = parse_matrix("1,2\n3,x\n").unwrap_err();
        match err {
            LsmapError::MalformedRecord(msg) => assert!(msg.contains("row 1, column 1")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(parse_matrix("65536").is_err());
        assert!(parse_matrix("-1").is_err());
        assert!(parse_matrix("1.5").is_err());
        assert!(parse_matrix("1,,2").is_err());
    }

    #[test]
    fn test_matrix_text_roundtrip() {
        let text = "16384,16384,4354,8963\n1281,25344,0,16640\n";
        let cells = decode_matrix(&parse_matrix(text).expect("parse"));
        assert_eq!(cells[0][0], HeightCell::blocked_void());
        assert_eq!(cells[1][1].flag(), TileFlag::LockedDoor);
        assert_eq!(format_matrix(&encode_matrix(&cells)), text);
    }

    #[test]
    fn test_format_empty_matrix() {
        assert_eq!(format_matrix(&[]), "");
    }
}
