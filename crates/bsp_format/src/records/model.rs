use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject, LumpReference};
use crate::registry::LumpKind;

/// A brush model; model zero is the world
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Model {
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
    pub origin: [f32; 3],
    pub head_node: i32,
    pub first_face: usize,
    pub num_faces: usize,
    pub first_brush: usize,
    pub num_brushes: usize,
    pub first_leaf: usize,
    pub num_leaves: usize,
}

impl LumpObject for Model {
    const NAME: &'static str = "Model";
    const KINDS: &'static [LumpKind] = &[LumpKind::Models];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        use MapType::*;

        match map_type {
            Quake => Some(64),
            _ if map_type.is_quake2_like() || map_type.is_source() => Some(48),
            _ if map_type.is_quake3_like() => Some(40),
            Nightfire => Some(56),
            _ if map_type.is_cod() => Some(48),
            Titanfall => Some(32),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        use MapType::*;

        let mut model = Model {
            mins: record.vec3()?,
            maxs: record.vec3()?,
            head_node: -1,
            ..Default::default()
        };

        match map_type {
            Quake => {
                model.origin = record.vec3()?;
                let head_nodes: [i32; 4] = record.read()?;
                model.head_node = head_nodes[0];
                record.skip(4)?;
                model.first_face = to_usize(record.i32()?);
                model.num_faces = to_usize(record.i32()?);
            }
            _ if map_type.is_quake2_like() || map_type.is_source() => {
                model.origin = record.vec3()?;
                model.head_node = record.i32()?;
                model.first_face = to_usize(record.i32()?);
                model.num_faces = to_usize(record.i32()?);
            }
            Nightfire => {
                record.skip(8)?;
                model.first_leaf = to_usize(record.i32()?);
                model.num_leaves = to_usize(record.i32()?);
                model.first_face = to_usize(record.i32()?);
                model.num_faces = to_usize(record.i32()?);
            }
            Titanfall => {
                // Meshes take the place of faces
                model.first_face = to_usize(record.i32()?);
                model.num_faces = to_usize(record.i32()?);
            }
            _ => {
                model.first_face = to_usize(record.i32()?);
                model.num_faces = to_usize(record.i32()?);
                // Call of Duty interleaves a patch range before the brushes
                if map_type.is_cod() {
                    record.skip(8)?;
                }
                model.first_brush = to_usize(record.i32()?);
                model.num_brushes = to_usize(record.i32()?);
            }
        }

        Ok(model)
    }
}

impl LumpReference for Model {
    const NAME: &'static str = "Model";
    const REFERENCES: &'static [LumpKind] =
        &[LumpKind::Faces, LumpKind::Brushes, LumpKind::Leaves];

    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)> {
        match kind {
            LumpKind::Faces => Some((self.first_face, self.num_faces)),
            LumpKind::Brushes => Some((self.first_brush, self.num_brushes)),
            LumpKind::Leaves => Some((self.first_leaf, self.num_leaves)),
            _ => None,
        }
    }
}
