use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::LumpObject;
use crate::registry::LumpKind;

/// An environment map sample point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cubemap {
    pub origin: [i32; 3],
    pub size: i32,
}

impl LumpObject for Cubemap {
    const NAME: &'static str = "Cubemap";
    const KINDS: &'static [LumpKind] = &[LumpKind::Cubemaps];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        match map_type {
            MapType::Titanfall => Some(16),
            _ if map_type.is_source() => Some(16),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, _map_type: MapType, _version: i32) -> Result<Self> {
        Ok(Self {
            origin: record.read()?,
            size: record.i32()?,
        })
    }
}
