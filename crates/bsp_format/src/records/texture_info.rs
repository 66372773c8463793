use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::LumpObject;
use crate::registry::LumpKind;

/// Texture projection of a face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextureInfo {
    /// The `s` and `t` axes, each a direction followed by an offset
    pub texture_vectors: [[f32; 4]; 2],
    pub lightmap_vectors: [[f32; 4]; 2],
    pub flags: i32,

    /// Texture or texture data index, `-1` when the layout names the texture instead
    pub texture: i32,

    /// Quake 2 derived formats name the texture inline
    pub texture_name: String,
    pub next: i32,
}

impl LumpObject for TextureInfo {
    const NAME: &'static str = "TextureInfo";
    const KINDS: &'static [LumpKind] = &[LumpKind::TexInfo];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        match map_type {
            MapType::Quake => Some(40),
            MapType::Nightfire => Some(32),
            _ if map_type.is_quake2_like() => Some(76),
            _ if map_type.is_source() => Some(72),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        let mut info = TextureInfo {
            texture_vectors: record.read()?,
            texture: -1,
            next: -1,
            ..Default::default()
        };

        match map_type {
            MapType::Quake => {
                info.texture = record.i32()?;
                info.flags = record.i32()?;
            }
            _ if map_type.is_quake2_like() => {
                info.flags = record.i32()?;
                record.skip(4)?;
                info.texture_name = record.string(32)?;
                info.next = record.i32()?;
            }
            _ if map_type.is_source() => {
                info.lightmap_vectors = record.read()?;
                info.flags = record.i32()?;
                info.texture = record.i32()?;
            }
            _ => {}
        }

        Ok(info)
    }
}
