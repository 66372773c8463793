use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::LumpObject;
use crate::registry::LumpKind;

/// A splitting plane `normal · p = distance`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Plane {
    pub normal: [f32; 3],
    pub distance: f32,

    /// Axis the plane is closest to, only stored by Quake-derived formats
    pub axis_type: i32,
}

impl LumpObject for Plane {
    const NAME: &'static str = "Plane";
    const KINDS: &'static [LumpKind] = &[LumpKind::Planes];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        match map_type {
            MapType::Quake | MapType::Nightfire => Some(20),
            _ if map_type.is_quake2_like() || map_type.is_source() => Some(20),
            MapType::Titanfall => Some(16),
            _ if map_type.is_quake3_like() || map_type.is_cod() => Some(16),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, version: i32) -> Result<Self> {
        let normal = record.vec3()?;
        let distance = record.f32()?;
        let axis_type = match Self::record_size(map_type, version) {
            Some(20) => record.i32()?,
            _ => 0,
        };

        Ok(Self {
            normal,
            distance,
            axis_type,
        })
    }
}
