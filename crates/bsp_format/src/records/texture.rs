use binrw::Endian;
use tracing::warn;

use crate::decode::{null_terminated, RecordReader};
use crate::error::Result;
use crate::format::MapType;
use crate::records::{decode_records, to_usize, DecodeContext, LumpObject};
use crate::registry::LumpKind;

/// A named surface material
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub flags: i32,
    pub contents: i32,
    pub width: u32,
    pub height: u32,

    /// Byte position of the texture inside its lump
    pub offset: usize,
}

impl LumpObject for Texture {
    const NAME: &'static str = "Texture";
    const KINDS: &'static [LumpKind] = &[LumpKind::Textures, LumpKind::Materials];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        use MapType::*;

        match map_type {
            Nightfire => Some(64),
            Quake3 | Raven => Some(72),
            _ if map_type.is_cod() => Some(72),
            Mohaa => Some(140),
            Fakk | Stef2 | Stef2Demo => Some(76),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        let mut texture = Texture {
            name: record.string(64)?,
            ..Default::default()
        };

        if map_type != MapType::Nightfire {
            texture.flags = record.i32()?;
            texture.contents = record.i32()?;
        }

        Ok(texture)
    }

    fn decode_lump(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<Option<Vec<Self>>> {
        match ctx.map_type {
            MapType::Quake => read_mip_textures(bytes, ctx.endian).map(Some),
            MapType::Titanfall => Ok(Some(read_string_table(bytes))),
            map_type if map_type.is_source() => Ok(Some(read_string_table(bytes))),
            _ => decode_records(bytes, ctx),
        }
    }
}

/// Quake stores a count, a table of offsets, then a mip texture header at each offset
fn read_mip_textures(bytes: &[u8], endian: Endian) -> Result<Vec<Texture>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = RecordReader::new(bytes, endian);
    let count = to_usize(reader.i32()?);
    let offsets = (0..count)
        .map(|_| reader.i32())
        .collect::<Result<Vec<_>>>()?;

    let mut textures = Vec::with_capacity(count);
    for offset in offsets {
        // Missing textures are marked with a negative offset
        let Some(offset) = usize::try_from(offset)
            .ok()
            .filter(|offset| offset + 24 <= bytes.len())
        else {
            warn!(offset, "skipping mip texture outside of the texture lump");
            textures.push(Texture::default());
            continue;
        };

        reader.seek_to(offset)?;
        textures.push(Texture {
            name: reader.string(16)?,
            width: reader.u32()?,
            height: reader.u32()?,
            offset,
            ..Default::default()
        });
    }

    Ok(textures)
}

/// Source keeps texture names as one blob of NUL separated strings
fn read_string_table(bytes: &[u8]) -> Vec<Texture> {
    let mut textures = Vec::new();
    let mut offset = 0;

    for raw in bytes.split(|b| *b == 0) {
        if !raw.is_empty() {
            textures.push(Texture {
                name: null_terminated(raw),
                offset,
                ..Default::default()
            });
        }
        offset += raw.len() + 1;
    }

    textures
}

/// Source's per-material properties, naming its texture through the texture table
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextureData {
    pub reflectivity: [f32; 3],

    /// Index into the texture table lump
    pub name_index: i32,
    pub width: i32,
    pub height: i32,
    pub view_width: i32,
    pub view_height: i32,
}

impl LumpObject for TextureData {
    const NAME: &'static str = "TextureData";
    const KINDS: &'static [LumpKind] = &[LumpKind::TexDatas];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        match map_type {
            MapType::Titanfall => Some(36),
            _ if map_type.is_source() => Some(32),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, _map_type: MapType, _version: i32) -> Result<Self> {
        Ok(Self {
            reflectivity: record.vec3()?,
            name_index: record.i32()?,
            width: record.i32()?,
            height: record.i32()?,
            view_width: record.i32()?,
            view_height: record.i32()?,
        })
    }
}
