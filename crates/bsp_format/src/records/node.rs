use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject};
use crate::registry::LumpKind;

/// An interior node of the BSP tree
///
/// Negative children are leaves, encoded as `-(leaf + 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Node {
    pub plane: i32,
    pub children: [i32; 2],
    pub mins: [f32; 3],
    pub maxs: [f32; 3],
    pub first_face: usize,
    pub num_faces: usize,
}

impl LumpObject for Node {
    const NAME: &'static str = "Node";
    const KINDS: &'static [LumpKind] = &[LumpKind::Nodes];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        use MapType::*;

        match map_type {
            Quake => Some(24),
            Vindictus => Some(48),
            _ if map_type.is_source() => Some(32),
            _ if map_type.is_quake2_like() => Some(28),
            Nightfire => Some(36),
            _ if map_type.is_quake3_like() || map_type.is_cod() => Some(36),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        use MapType::*;

        let mut node = Node {
            plane: record.i32()?,
            ..Default::default()
        };

        node.children = match map_type {
            Quake => {
                let children: [i16; 2] = record.read()?;
                children.map(i32::from)
            }
            _ => record.read()?,
        };

        match map_type {
            Vindictus => {
                node.mins = record.read::<[i32; 3]>()?.map(|v| v as f32);
                node.maxs = record.read::<[i32; 3]>()?.map(|v| v as f32);
                node.first_face = to_usize(record.i32()?);
                node.num_faces = to_usize(record.i32()?);
            }
            _ if map_type == Quake || map_type.is_quake2_like() || map_type.is_source() => {
                node.mins = record.read::<[i16; 3]>()?.map(f32::from);
                node.maxs = record.read::<[i16; 3]>()?.map(f32::from);
                node.first_face = record.u16()? as usize;
                node.num_faces = record.u16()? as usize;
            }
            Nightfire => {
                node.mins = record.vec3()?;
                node.maxs = record.vec3()?;
            }
            _ => {
                node.mins = record.read::<[i32; 3]>()?.map(|v| v as f32);
                node.maxs = record.read::<[i32; 3]>()?.map(|v| v as f32);
            }
        }

        Ok(node)
    }
}
