use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject, LumpReference};
use crate::registry::LumpKind;

/// A renderable surface
///
/// Quake and Source families describe a face as a loop of surface edges, the Quake 3 and Call
/// of Duty families as a run of vertices plus a run of triangle indices. Ranges a layout does
/// not store are left empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Face {
    pub plane: i32,
    pub side: u8,
    pub first_edge: usize,
    pub num_edges: usize,
    pub first_vertex: usize,
    pub num_vertices: usize,
    pub first_index: usize,
    pub num_indices: usize,
    pub texture: i32,
    pub texture_info: i32,
    pub material: i32,
    pub lightmap: i32,
    pub displacement: i32,
    pub original_face: i32,

    /// Surface type (planar, patch, triangle soup, billboard) in Quake 3 derived formats
    pub face_type: i32,
    pub normal: [f32; 3],
    pub patch_size: [i32; 2],
}

impl LumpObject for Face {
    const NAME: &'static str = "Face";
    const KINDS: &'static [LumpKind] = &[LumpKind::Faces, LumpKind::OriginalFaces];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        use MapType::*;

        match map_type {
            Quake => Some(20),
            _ if map_type.is_quake2_like() => Some(20),
            Source17 => Some(104),
            Vindictus => Some(72),
            _ if map_type.is_source() => Some(56),
            Nightfire => Some(48),
            Quake3 => Some(104),
            Raven => Some(148),
            Fakk | Mohaa => Some(108),
            Stef2 | Stef2Demo => Some(132),
            CoD => Some(16),
            CoD2 | CoD4 => Some(24),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        use MapType::*;

        let mut face = Face {
            texture: -1,
            texture_info: -1,
            material: -1,
            lightmap: -1,
            displacement: -1,
            original_face: -1,
            ..Default::default()
        };

        match map_type {
            _ if map_type == Quake || map_type.is_quake2_like() => {
                face.plane = record.u16()? as i32;
                face.side = record.u16()? as u8;
                face.first_edge = to_usize(record.i32()?);
                face.num_edges = record.u16()? as usize;
                face.texture_info = record.u16()? as i32;
                record.skip(4)?;
                face.lightmap = record.i32()?;
            }
            Vindictus => {
                face.plane = record.i32()?;
                face.side = record.u8()?;
                record.skip(3)?;
                face.first_edge = to_usize(record.i32()?);
                face.num_edges = to_usize(record.i32()?);
                face.texture_info = record.i32()?;
                face.displacement = record.i32()?;
                record.skip(4)?;
                face.lightmap = record.i32()?;
                record.skip(20)?;
                face.original_face = record.i32()?;
            }
            _ if map_type.is_source() => {
                // Vampire prefixes each face with eight average lighting colours
                if map_type == Source17 {
                    record.skip(32)?;
                }
                face.plane = record.u16()? as i32;
                face.side = record.u8()?;
                record.skip(1)?;
                face.first_edge = to_usize(record.i32()?);
                face.num_edges = record.u16()? as usize;
                face.texture_info = record.i16()? as i32;
                face.displacement = record.i16()? as i32;
                record.skip(6)?;
                face.lightmap = record.i32()?;
                record.skip(20)?;
                face.original_face = record.i32()?;
            }
            Nightfire => {
                face.plane = record.i32()?;
                face.first_vertex = to_usize(record.i32()?);
                face.num_vertices = to_usize(record.i32()?);
                face.first_index = to_usize(record.i32()?);
                face.num_indices = to_usize(record.i32()?);
                record.skip(4)?;
                face.texture = record.i32()?;
                face.material = record.i32()?;
                face.texture_info = record.i32()?;
                record.skip(4)?;
                face.lightmap = record.i32()?;
            }
            _ if map_type.is_quake3_like() => {
                face.texture = record.i32()?;
                record.skip(4)?;
                face.face_type = record.i32()?;
                face.first_vertex = to_usize(record.i32()?);
                face.num_vertices = to_usize(record.i32()?);
                face.first_index = to_usize(record.i32()?);
                face.num_indices = to_usize(record.i32()?);
                if map_type == Raven {
                    record.skip(8)?;
                    let lightmaps: [i32; 4] = record.read()?;
                    face.lightmap = lightmaps[0];
                    record.skip(32 + 8)?;
                } else {
                    face.lightmap = record.i32()?;
                    record.skip(16)?;
                }
                // Lightmap origin and the two lightmap vectors
                record.skip(36)?;
                face.normal = record.vec3()?;
                face.patch_size = record.read()?;
            }
            _ => {
                face.texture = record.i16()? as i32;
                face.lightmap = record.i16()? as i32;
                face.first_vertex = to_usize(record.i32()?);
                face.num_vertices = record.u16()? as usize;
                face.num_indices = record.u16()? as usize;
                face.first_index = to_usize(record.i32()?);
            }
        }

        Ok(face)
    }
}

impl LumpReference for Face {
    const NAME: &'static str = "Face";
    const REFERENCES: &'static [LumpKind] =
        &[LumpKind::SurfEdges, LumpKind::Vertices, LumpKind::Indices];

    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)> {
        match kind {
            LumpKind::SurfEdges => Some((self.first_edge, self.num_edges)),
            LumpKind::Vertices => Some((self.first_vertex, self.num_vertices)),
            LumpKind::Indices => Some((self.first_index, self.num_indices)),
            _ => None,
        }
    }
}
