//! On-disk structures of map headers, lump directories and sidecar lump files.
//!
//! None of these carry a fixed byte order: Source maps written for consoles are big endian, so
//! every structure is read with [`binrw::BinRead::read_options`] and the map's [`binrw::Endian`].

use binrw::BinRead;

use crate::lump::LumpInfo;

/// Directory slot storing an offset then a length
///
/// Used by Quake, Quake 2, Quake 3, Nightfire and the Ritual engines.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct OffsetLengthSlot {
    pub offset: i32,
    pub length: i32,
}

impl From<OffsetLengthSlot> for LumpInfo {
    fn from(slot: OffsetLengthSlot) -> Self {
        LumpInfo {
            offset: non_negative(slot.offset),
            length: non_negative(slot.length),
            ..Default::default()
        }
    }
}

/// Directory slot storing a length then an offset, used by Call of Duty 2
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct LengthOffsetSlot {
    pub length: i32,
    pub offset: i32,
}

impl From<LengthOffsetSlot> for LumpInfo {
    fn from(slot: LengthOffsetSlot) -> Self {
        LumpInfo {
            offset: non_negative(slot.offset),
            length: non_negative(slot.length),
            ..Default::default()
        }
    }
}

/// Call of Duty 4 directory entry
///
/// The directory only lists the lumps that are present. Their data follows the directory back
/// to back, each lump starting on a four byte boundary.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct IdLengthSlot {
    pub id: i32,
    pub length: i32,
}

/// Source and Titanfall directory slot
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct SourceSlot {
    pub offset: i32,
    pub length: i32,
    pub version: i32,
    pub ident: [u8; 4],
}

impl From<SourceSlot> for LumpInfo {
    fn from(slot: SourceSlot) -> Self {
        LumpInfo {
            ident: i32::from_le_bytes(slot.ident),
            version: slot.version,
            offset: non_negative(slot.offset),
            length: non_negative(slot.length),
            ..Default::default()
        }
    }
}

/// Left 4 Dead 2 reorders the Source slot to put the version first
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct L4D2Slot {
    pub version: i32,
    pub offset: i32,
    pub length: i32,
    pub ident: [u8; 4],
}

impl From<L4D2Slot> for LumpInfo {
    fn from(slot: L4D2Slot) -> Self {
        LumpInfo {
            ident: i32::from_le_bytes(slot.ident),
            version: slot.version,
            offset: non_negative(slot.offset),
            length: non_negative(slot.length),
            ..Default::default()
        }
    }
}

/// Header of a Source `<map>_l_<index>.lmp` sidecar file
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct LumpFileHeader {
    /// Offset of the data from the start of the sidecar, normally the header size
    pub offset: i32,
    pub id: i32,
    pub version: i32,
    pub length: i32,
    pub revision: i32,
}

impl LumpFileHeader {
    pub const SIZE: u64 = 20;
}

/// Source game lump directory entry
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct GameLumpEntry {
    pub id: u32,
    pub flags: u16,
    pub version: u16,
    pub offset: i32,
    pub length: i32,
}

/// Vindictus widens the flags and version of a game lump entry
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
pub struct WideGameLumpEntry {
    pub id: u32,
    pub flags: i32,
    pub version: i32,
    pub offset: i32,
    pub length: i32,
}

impl From<WideGameLumpEntry> for GameLumpEntry {
    fn from(entry: WideGameLumpEntry) -> Self {
        GameLumpEntry {
            id: entry.id,
            flags: entry.flags as u16,
            version: entry.version as u16,
            offset: entry.offset,
            length: entry.length,
        }
    }
}

/// Negative offsets and lengths only appear in corrupt files and are read as zero
fn non_negative(value: i32) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
