use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::LumpObject;
use crate::registry::LumpKind;

/// A point in the map, with the surface attributes formats store alongside it
///
/// Layouts that only store a position leave the other fields at their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texture_coords: [f32; 2],
    pub lightmap_coords: [f32; 2],
    pub color: [u8; 4],
}

impl LumpObject for Vertex {
    const NAME: &'static str = "Vertex";
    const KINDS: &'static [LumpKind] = &[LumpKind::Vertices, LumpKind::PatchVerts];

    fn record_size(map_type: MapType, version: i32) -> Option<usize> {
        use MapType::*;

        // Plain float triples regardless of the map's own vertex layout
        if version == 1 {
            return Some(12);
        }

        match map_type {
            Quake | Nightfire | Titanfall => Some(12),
            _ if map_type.is_quake2_like() || map_type.is_source() => Some(12),
            Quake3 | Fakk | Mohaa | CoD => Some(44),
            Stef2 | Stef2Demo => Some(48),
            Raven => Some(80),
            CoD2 | CoD4 => Some(68),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, version: i32) -> Result<Self> {
        use MapType::*;

        let mut vertex = Vertex {
            position: record.vec3()?,
            ..Default::default()
        };

        match Self::record_size(map_type, version) {
            Some(44 | 48) => {
                vertex.texture_coords = record.read()?;
                vertex.lightmap_coords = record.read()?;
                vertex.normal = record.vec3()?;
                vertex.color = record.read()?;
            }
            Some(80) if map_type == Raven => {
                vertex.texture_coords = record.read()?;
                // Four lightmap coordinate pairs, the first one is the base style
                let lightmaps: [[f32; 2]; 4] = record.read()?;
                vertex.lightmap_coords = lightmaps[0];
                vertex.normal = record.vec3()?;
                let colors: [[u8; 4]; 4] = record.read()?;
                vertex.color = colors[0];
            }
            Some(68) => {
                vertex.normal = record.vec3()?;
                vertex.color = record.read()?;
                vertex.texture_coords = record.read()?;
                vertex.lightmap_coords = record.read()?;
            }
            _ => {}
        }

        Ok(vertex)
    }
}
