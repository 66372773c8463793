use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject, LumpReference};
use crate::registry::LumpKind;

/// A convex region at the bottom of the BSP tree
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Leaf {
    pub contents: i32,
    pub cluster: i32,
    pub area: i32,
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
    pub first_mark_surface: usize,
    pub num_mark_surfaces: usize,
    pub first_mark_brush: usize,
    pub num_mark_brushes: usize,
    pub first_leaf_patch: usize,
    pub num_leaf_patches: usize,
}

impl LumpObject for Leaf {
    const NAME: &'static str = "Leaf";
    const KINDS: &'static [LumpKind] = &[LumpKind::Leaves];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        use MapType::*;

        match map_type {
            Quake => Some(28),
            _ if map_type.is_quake2_like() => Some(28),
            Source17 | Source18 | Source19 | Vindictus => Some(56),
            _ if map_type.is_source() => Some(32),
            Quake3 | Raven | Nightfire => Some(48),
            _ if map_type.is_fakk_like() => Some(64),
            CoD => Some(36),
            CoD2 => Some(32),
            CoD4 => Some(24),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        use MapType::*;

        let mut leaf = Leaf {
            cluster: -1,
            ..Default::default()
        };

        match map_type {
            Quake => {
                leaf.contents = record.i32()?;
                record.skip(4)?;
                leaf.mins = record.read::<[i16; 3]>()?.map(f32::from);
                leaf.maxs = record.read::<[i16; 3]>()?.map(f32::from);
                leaf.first_mark_surface = record.u16()? as usize;
                leaf.num_mark_surfaces = record.u16()? as usize;
            }
            Vindictus => {
                leaf.contents = record.i32()?;
                leaf.cluster = record.i32()?;
                leaf.area = record.i32()?;
                leaf.mins = record.read::<[i32; 3]>()?.map(|v| v as f32);
                leaf.maxs = record.read::<[i32; 3]>()?.map(|v| v as f32);
                leaf.first_mark_surface = to_usize(record.i32()?);
                leaf.num_mark_surfaces = to_usize(record.i32()?);
                leaf.first_mark_brush = to_usize(record.i32()?);
                leaf.num_mark_brushes = to_usize(record.i32()?);
            }
            _ if map_type.is_quake2_like() || map_type.is_source() => {
                leaf.contents = record.i32()?;
                leaf.cluster = record.i16()? as i32;
                // Source packs nine bits of area with seven bits of flags
                let area = record.u16()?;
                leaf.area = match map_type.is_source() {
                    true => (area & 0x1FF) as i32,
                    false => area as i16 as i32,
                };
                leaf.mins = record.read::<[i16; 3]>()?.map(f32::from);
                leaf.maxs = record.read::<[i16; 3]>()?.map(f32::from);
                leaf.first_mark_surface = record.u16()? as usize;
                leaf.num_mark_surfaces = record.u16()? as usize;
                leaf.first_mark_brush = record.u16()? as usize;
                leaf.num_mark_brushes = record.u16()? as usize;
            }
            Nightfire => {
                leaf.contents = record.i32()?;
                leaf.mins = record.vec3()?;
                leaf.maxs = record.vec3()?;
                leaf.first_mark_surface = to_usize(record.i32()?);
                leaf.num_mark_surfaces = to_usize(record.i32()?);
                leaf.first_mark_brush = to_usize(record.i32()?);
                leaf.num_mark_brushes = to_usize(record.i32()?);
            }
            _ if map_type.is_quake3_like() => {
                leaf.cluster = record.i32()?;
                leaf.area = record.i32()?;
                leaf.mins = record.read::<[i32; 3]>()?.map(|v| v as f32);
                leaf.maxs = record.read::<[i32; 3]>()?.map(|v| v as f32);
                leaf.first_mark_surface = to_usize(record.i32()?);
                leaf.num_mark_surfaces = to_usize(record.i32()?);
                leaf.first_mark_brush = to_usize(record.i32()?);
                leaf.num_mark_brushes = to_usize(record.i32()?);
            }
            _ => {
                leaf.cluster = record.i32()?;
                leaf.area = record.i32()?;
                leaf.first_mark_surface = to_usize(record.i32()?);
                leaf.num_mark_surfaces = to_usize(record.i32()?);
                leaf.first_mark_brush = to_usize(record.i32()?);
                leaf.num_mark_brushes = to_usize(record.i32()?);
                if map_type == CoD {
                    leaf.first_leaf_patch = to_usize(record.i32()?);
                    leaf.num_leaf_patches = to_usize(record.i32()?);
                }
            }
        }

        Ok(leaf)
    }
}

impl LumpReference for Leaf {
    const NAME: &'static str = "Leaf";
    const REFERENCES: &'static [LumpKind] = &[
        LumpKind::MarkSurfaces,
        LumpKind::MarkBrushes,
        LumpKind::LeafPatches,
    ];

    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)> {
        match kind {
            LumpKind::MarkSurfaces => Some((self.first_mark_surface, self.num_mark_surfaces)),
            LumpKind::MarkBrushes => Some((self.first_mark_brush, self.num_mark_brushes)),
            LumpKind::LeafPatches => Some((self.first_leaf_patch, self.num_leaf_patches)),
            _ => None,
        }
    }
}
