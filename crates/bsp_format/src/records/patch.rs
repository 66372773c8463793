use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject, LumpReference};
use crate::registry::LumpKind;

/// A curved surface or terrain mesh used for collision in Call of Duty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Patch {
    pub texture: i16,

    /// Zero for a control point grid, one for a triangulated terrain mesh
    pub patch_type: i16,
    pub dimensions: [i16; 2],
    pub first_vertex: usize,
    pub num_vertices: usize,
    pub first_index: usize,
    pub num_indices: usize,
}

impl LumpObject for Patch {
    const NAME: &'static str = "Patch";
    const KINDS: &'static [LumpKind] = &[LumpKind::Patches];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        (map_type == MapType::CoD).then_some(16)
    }

    fn read(record: &mut RecordReader<'_>, _map_type: MapType, _version: i32) -> Result<Self> {
        let mut patch = Patch {
            texture: record.i16()?,
            patch_type: record.i16()?,
            ..Default::default()
        };

        if patch.patch_type == 0 {
            patch.dimensions = record.read()?;
            patch.first_vertex = to_usize(record.i32()?);
            patch.num_vertices = patch
                .dimensions
                .iter()
                .map(|d| (*d).max(0) as usize)
                .product();
        } else {
            patch.num_vertices = record.u16()? as usize;
            patch.num_indices = record.u16()? as usize;
            patch.first_vertex = to_usize(record.i32()?);
            patch.first_index = to_usize(record.i32()?);
        }

        Ok(patch)
    }
}

impl LumpReference for Patch {
    const NAME: &'static str = "Patch";
    const REFERENCES: &'static [LumpKind] = &[LumpKind::PatchVerts, LumpKind::PatchIndices];

    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)> {
        match kind {
            LumpKind::PatchVerts => Some((self.first_vertex, self.num_vertices)),
            LumpKind::PatchIndices => Some((self.first_index, self.num_indices)),
            _ => None,
        }
    }
}
