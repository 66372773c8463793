use crate::decode::RecordReader;
use crate::error::Result;
use crate::format::MapType;
use crate::records::{to_usize, LumpObject, LumpReference};
use crate::registry::LumpKind;

/// A convex volume bounded by brush sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Brush {
    /// First side in the brush sides lump, `None` where sides are implied by brush order
    pub first_side: Option<usize>,
    pub num_sides: usize,
    pub texture: i32,
    pub contents: i32,
}

impl LumpObject for Brush {
    const NAME: &'static str = "Brush";
    const KINDS: &'static [LumpKind] = &[LumpKind::Brushes];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        match map_type {
            _ if map_type.is_cod() => Some(4),
            MapType::Nightfire | MapType::Quake3 | MapType::Raven => Some(12),
            _ if map_type.is_quake2_like() || map_type.is_source() => Some(12),
            _ if map_type.is_fakk_like() => Some(12),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        let mut brush = Brush::default();

        match map_type {
            _ if map_type.is_cod() => {
                brush.num_sides = record.u16()? as usize;
                brush.texture = record.u16()? as i32;
            }
            MapType::Nightfire => {
                brush.contents = record.i32()?;
                brush.first_side = Some(to_usize(record.i32()?));
                brush.num_sides = to_usize(record.i32()?);
            }
            _ if map_type.is_quake2_like() || map_type.is_source() => {
                brush.first_side = Some(to_usize(record.i32()?));
                brush.num_sides = to_usize(record.i32()?);
                brush.contents = record.i32()?;
            }
            _ => {
                brush.first_side = Some(to_usize(record.i32()?));
                brush.num_sides = to_usize(record.i32()?);
                brush.texture = record.i32()?;
            }
        }

        Ok(brush)
    }
}

impl LumpReference for Brush {
    const NAME: &'static str = "Brush";
    const REFERENCES: &'static [LumpKind] = &[LumpKind::BrushSides];

    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)> {
        match kind {
            LumpKind::BrushSides => self.first_side.map(|first| (first, self.num_sides)),
            _ => None,
        }
    }
}

/// One bounding plane of a brush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrushSide {
    pub plane: i32,
    pub texture: i32,
    pub texture_info: i32,
    pub displacement: i32,
    pub face: i32,
    pub bevel: bool,
}

impl LumpObject for BrushSide {
    const NAME: &'static str = "BrushSide";
    const KINDS: &'static [LumpKind] = &[LumpKind::BrushSides];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        use MapType::*;

        match map_type {
            Vindictus => Some(16),
            _ if map_type.is_source() => Some(8),
            _ if map_type.is_quake2_like() => Some(4),
            Quake3 | Nightfire => Some(8),
            Raven => Some(12),
            _ if map_type.is_fakk_like() => Some(12),
            _ if map_type.is_cod() => Some(8),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        use MapType::*;

        let mut side = BrushSide {
            texture: -1,
            texture_info: -1,
            displacement: -1,
            face: -1,
            ..Default::default()
        };

        match map_type {
            Vindictus => {
                side.plane = record.i32()?;
                side.texture_info = record.i32()?;
                side.displacement = record.i32()?;
                side.bevel = record.i32()? != 0;
            }
            _ if map_type.is_source() => {
                side.plane = record.u16()? as i32;
                side.texture_info = record.i16()? as i32;
                side.displacement = record.i16()? as i32;
                side.bevel = record.u8()? != 0;
            }
            _ if map_type.is_quake2_like() => {
                side.plane = record.u16()? as i32;
                side.texture_info = record.i16()? as i32;
            }
            Nightfire => {
                side.face = record.i32()?;
                side.plane = record.i32()?;
            }
            _ => {
                // Call of Duty stores the plane distance bit pattern in the first field
                side.plane = record.i32()?;
                side.texture = record.i32()?;
                if Self::record_size(map_type, 0) == Some(12) {
                    side.face = record.i32()?;
                }
            }
        }

        Ok(side)
    }
}
