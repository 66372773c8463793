//! The game lump: a directory of sub-lumps nested inside one lump's payload.
//!
//! Sub-lump offsets are written relative to the start of the file by most compilers, and
//! relative to the start of the game lump by some console and third-party ones. Nothing in the
//! directory says which, so the origin is inferred once per directory: when the smallest
//! sub-lump offset lies before the game lump itself, the offsets cannot be file-relative and
//! the game lump's own offset is added to every entry.

use std::fmt;

use binrw::{BinRead, Endian};
use indexmap::IndexMap;
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Error, Result};
use crate::format::MapType;
use crate::lump::LumpInfo;
use crate::types::{GameLumpEntry, WideGameLumpEntry};

/// Identifier of a game sub-lump, a four character code read as an integer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GameLumpId(pub u32);

impl GameLumpId {
    pub const STATIC_PROPS: GameLumpId = GameLumpId::from_fourcc(b"sprp");
    pub const DETAIL_PROPS: GameLumpId = GameLumpId::from_fourcc(b"dprp");
    pub const DETAIL_PROP_LIGHTING: GameLumpId = GameLumpId::from_fourcc(b"dplt");
    pub const DETAIL_PROP_LIGHTING_HDR: GameLumpId = GameLumpId::from_fourcc(b"dplh");

    pub const fn from_fourcc(code: &[u8; 4]) -> GameLumpId {
        GameLumpId(u32::from_be_bytes(*code))
    }

    /// The four character code, if every byte is printable
    pub fn fourcc(self) -> Option<String> {
        let bytes = self.0.to_be_bytes();
        bytes
            .iter()
            .all(u8::is_ascii_graphic)
            .then(|| String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Display for GameLumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fourcc() {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

/// A decoded game lump directory
///
/// Every entry's [`LumpInfo::offset`] is already resolved to an absolute position in the file
/// the game lump lives in, so entries can be handed straight to [`crate::MapReader::read_lump`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameLump {
    entries: IndexMap<GameLumpId, LumpInfo>,
    info: LumpInfo,
    payload_relative: bool,
}

impl GameLump {
    /// Decode the directory held in `payload`, the bytes of the lump described by `outer`
    ///
    /// With `strict` set, every resolved sub-lump must lie inside the outer lump.
    #[instrument(skip(payload), fields(length = payload.len()), err)]
    pub fn parse(
        payload: &[u8],
        outer: &LumpInfo,
        map_type: MapType,
        endian: Endian,
        strict: bool,
    ) -> Result<GameLump> {
        if payload.is_empty() {
            return Ok(GameLump {
                info: outer.clone(),
                ..Default::default()
            });
        }

        let entries = read_entries(payload, map_type, endian)?;

        // Decided once for the whole directory
        let min_offset = entries.iter().map(|e| i64::from(e.offset)).min();
        let outer_offset = outer.offset as i64;
        let payload_relative = min_offset.is_some_and(|min| min < outer_offset);
        let base = if payload_relative { outer_offset } else { 0 };
        debug!(payload_relative, count = entries.len(), "game lump directory");

        let mut resolved = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let id = GameLumpId(entry.id);
            let offset = u64::try_from(i64::from(entry.offset) + base).map_err(|_| {
                Error::InvalidInput(format!("game lump {id} has a negative offset"))
            })?;
            let info = LumpInfo {
                ident: entry.id as i32,
                flags: i32::from(entry.flags),
                version: i32::from(entry.version),
                offset,
                length: u64::try_from(entry.length).unwrap_or(0),
                lump_file: outer.lump_file.clone(),
            };

            if strict && (info.offset < outer.offset || info.end() > outer.end()) {
                return Err(Error::InvalidInput(format!(
                    "game lump {id} at {} with length {} lies outside of its directory at {} with length {}",
                    info.offset, info.length, outer.offset, outer.length
                )));
            }

            if resolved.insert(id, info).is_some() {
                return Err(Error::DuplicateGameLump(id));
            }
        }

        Ok(GameLump {
            entries: resolved,
            info: outer.clone(),
            payload_relative,
        })
    }

    /// The resolved descriptor of sub-lump `id`, `None` when the directory does not list it
    pub fn get(&self, id: GameLumpId) -> Option<&LumpInfo> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: GameLumpId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Sub-lumps in directory order
    pub fn iter(&self) -> impl Iterator<Item = (GameLumpId, &LumpInfo)> {
        self.entries.iter().map(|(id, info)| (*id, info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The descriptor of the lump holding this directory
    pub fn info(&self) -> &LumpInfo {
        &self.info
    }

    /// Whether the sub-lump offsets were written relative to the game lump
    pub fn is_payload_relative(&self) -> bool {
        self.payload_relative
    }
}

fn read_entries(payload: &[u8], map_type: MapType, endian: Endian) -> Result<Vec<GameLumpEntry>> {
    let truncated =
        || Error::InvalidInput(format!("game lump directory truncated at {} bytes", payload.len()));

    let count_bytes: [u8; 4] = payload
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(truncated)?;
    let count = match endian {
        Endian::Big => i32::from_be_bytes(count_bytes),
        Endian::Little => i32::from_le_bytes(count_bytes),
    };
    let count = usize::try_from(count)
        .map_err(|_| Error::InvalidInput(format!("game lump directory has {count} entries")))?;

    let entry_size = match map_type {
        MapType::Vindictus => 20,
        _ => 16,
    };
    if count
        .checked_mul(entry_size)
        .and_then(|size| size.checked_add(4))
        .map_or(true, |size| size > payload.len())
    {
        return Err(truncated());
    }

    let mut cursor = std::io::Cursor::new(&payload[4..]);
    (0..count)
        .map(|_| {
            Ok(match map_type {
                MapType::Vindictus => {
                    WideGameLumpEntry::read_options(&mut cursor, endian, ())?.into()
                }
                _ => GameLumpEntry::read_options(&mut cursor, endian, ())?,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use binrw::Endian;
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::format::MapType;
    use crate::game_lump::{GameLump, GameLumpId};
    use crate::lump::LumpInfo;

    fn directory(entries: &[(&[u8; 4], u16, i32, i32)]) -> Vec<u8> {
        let mut data = (entries.len() as i32).to_le_bytes().to_vec();
        for (id, version, offset, length) in entries {
            data.extend_from_slice(&GameLumpId::from_fourcc(id).0.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
            data.extend_from_slice(&version.to_le_bytes());
            data.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&length.to_le_bytes());
        }
        data
    }

    fn outer(offset: u64, length: u64) -> LumpInfo {
        LumpInfo {
            offset,
            length,
            ..Default::default()
        }
    }

    #[test]
    fn ids_display_as_fourcc() {
        assert_eq!(GameLumpId::STATIC_PROPS.0, 1936749168);
        assert_eq!(GameLumpId::STATIC_PROPS.to_string(), "sprp");
        assert_eq!(GameLumpId(1).to_string(), "0x00000001");
    }

    #[test]
    fn payload_relative_offsets_are_rebased() -> Result<()> {
        let payload = directory(&[(b"sprp", 10, 20, 8)]);
        let lump = GameLump::parse(
            &payload,
            &outer(2000, 40),
            MapType::Source20,
            Endian::Little,
            true,
        )?;

        let info = lump.get(GameLumpId::STATIC_PROPS).expect("sprp is listed");
        assert!(lump.is_payload_relative());
        assert_eq!((info.offset, info.length, info.version), (2020, 8, 10));

        Ok(())
    }

    #[test]
    fn file_relative_offsets_are_kept() -> Result<()> {
        let payload = directory(&[(b"sprp", 10, 2020, 8), (b"dprp", 4, 2028, 4)]);
        let lump = GameLump::parse(
            &payload,
            &outer(2000, 40),
            MapType::Source20,
            Endian::Little,
            true,
        )?;

        assert!(!lump.is_payload_relative());
        assert_eq!(lump.get(GameLumpId::STATIC_PROPS).map(|i| i.offset), Some(2020));
        assert_eq!(lump.get(GameLumpId::DETAIL_PROPS).map(|i| i.offset), Some(2028));
        assert_eq!(lump.get(GameLumpId::DETAIL_PROP_LIGHTING), None);
        assert_eq!(
            lump.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![GameLumpId::STATIC_PROPS, GameLumpId::DETAIL_PROPS]
        );

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let payload = directory(&[(b"sprp", 10, 2020, 8), (b"sprp", 10, 2028, 8)]);
        let result = GameLump::parse(
            &payload,
            &outer(2000, 40),
            MapType::Source20,
            Endian::Little,
            false,
        );

        assert!(matches!(
            result,
            Err(Error::DuplicateGameLump(id)) if id == GameLumpId::STATIC_PROPS
        ));
    }

    #[test]
    fn truncated_directory() {
        let mut payload = directory(&[(b"sprp", 10, 2020, 8)]);
        payload.truncate(12);

        for payload in [&payload[..], &payload[..2]] {
            let result = GameLump::parse(
                payload,
                &outer(2000, 40),
                MapType::Source20,
                Endian::Little,
                false,
            );
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn strict_mode_bounds_sub_lumps() -> Result<()> {
        let payload = directory(&[(b"sprp", 10, 2030, 64)]);

        let lenient = GameLump::parse(
            &payload,
            &outer(2000, 40),
            MapType::Source20,
            Endian::Little,
            false,
        )?;
        assert_eq!(lenient.len(), 1);

        let strict = GameLump::parse(
            &payload,
            &outer(2000, 40),
            MapType::Source20,
            Endian::Little,
            true,
        );
        assert!(matches!(strict, Err(Error::InvalidInput(_))));

        Ok(())
    }

    #[test]
    fn empty_payload_is_empty_directory() -> Result<()> {
        let lump = GameLump::parse(&[], &outer(0, 0), MapType::Source20, Endian::Little, true)?;
        assert!(lump.is_empty());
        Ok(())
    }
}
