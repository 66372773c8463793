use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::LumpObject;
use crate::registry::LumpKind;

/// A level of detail terrain patch from Medal of Honor: Allied Assault
#[derive(Debug, Clone, PartialEq)]
pub struct LodTerrain {
    pub flags: u8,
    pub scale: u8,
    pub lightmap_coords: [u8; 2],
    pub texture_coords: [f32; 8],
    pub x: i8,
    pub y: i8,
    pub base_z: i16,
    pub texture: u16,
    pub lightmap: i16,
    pub vertex_flags: [[u16; 63]; 2],

    /// Nine by nine grid of heights above `base_z`
    pub heightmap: [u8; 81],
}

impl LumpObject for LodTerrain {
    const NAME: &'static str = "LodTerrain";
    const KINDS: &'static [LumpKind] = &[LumpKind::LodTerrains];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        (map_type == MapType::Mohaa).then_some(388)
    }

    fn read(record: &mut RecordReader<'_>, _map_type: MapType, _version: i32) -> Result<Self> {
        let flags = record.u8()?;
        let scale = record.u8()?;
        let lightmap_coords = record.read()?;
        let texture_coords = record.read()?;
        let x = record.i8()?;
        let y = record.i8()?;
        let base_z = record.i16()?;
        let texture = record.u16()?;
        let lightmap = record.i16()?;
        record.skip(8)?;
        let vertex_flags = record.read()?;
        let heightmap = record.read()?;

        Ok(Self {
            flags,
            scale,
            lightmap_coords,
            texture_coords,
            x,
            y,
            base_z,
            texture,
            lightmap,
            vertex_flags,
            heightmap,
        })
    }
}
