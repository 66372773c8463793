use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject};
use crate::registry::LumpKind;

/// A model placed into a Medal of Honor: Allied Assault map by the compiler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticModel {
    pub name: String,
    pub origin: [f32; 3],
    pub angles: [f32; 3],
    pub scale: f32,
    pub first_vertex_data: usize,
    pub num_vertex_data: usize,
}

impl LumpObject for StaticModel {
    const NAME: &'static str = "StaticModel";
    const KINDS: &'static [LumpKind] = &[LumpKind::StaticModels];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        (map_type == MapType::Mohaa).then_some(164)
    }

    fn read(record: &mut RecordReader<'_>, _map_type: MapType, _version: i32) -> Result<Self> {
        Ok(Self {
            name: record.string(128)?,
            origin: record.vec3()?,
            angles: record.vec3()?,
            scale: record.f32()?,
            first_vertex_data: to_usize(record.i32()?),
            num_vertex_data: record.u16()? as usize,
        })
    }
}
