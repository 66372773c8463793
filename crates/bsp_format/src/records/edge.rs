use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::LumpObject;
use crate::registry::LumpKind;

/// A pair of vertex indices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edge {
    pub first_vertex: u32,
    pub second_vertex: u32,
}

impl LumpObject for Edge {
    const NAME: &'static str = "Edge";
    const KINDS: &'static [LumpKind] = &[LumpKind::Edges];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        match map_type {
            MapType::Vindictus => Some(8),
            MapType::Quake => Some(4),
            _ if map_type.is_quake2_like() || map_type.is_source() => Some(4),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        Ok(match map_type {
            MapType::Vindictus => Self {
                first_vertex: record.u32()?,
                second_vertex: record.u32()?,
            },
            _ => Self {
                first_vertex: record.u16()? as u32,
                second_vertex: record.u16()? as u32,
            },
        })
    }
}
