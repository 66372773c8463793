use crate::decode::RecordReader;
use crate::error::{Error, Result};
use crate::format::MapType;
use crate::records::{to_usize, LumpObject, LumpReference};
use crate::registry::LumpKind;

/// A subdivided surface replacing a four sided face
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Displacement {
    pub start_position: [f32; 3],
    pub first_vertex: usize,
    pub first_triangle: usize,

    /// Each edge is split into `2^power` segments
    pub power: u32,
    pub min_tesselation: i32,
    pub smoothing_angle: f32,
    pub contents: i32,
    pub map_face: i32,
    pub lightmap_alpha_start: i32,
    pub lightmap_sample_position_start: i32,
    pub allowed_vertices: [u32; 10],
}

impl Displacement {
    /// Vertices per edge for this displacement's power
    pub fn side_vertices(&self) -> usize {
        (1usize << self.power) + 1
    }

    pub fn num_vertices(&self) -> usize {
        self.side_vertices() * self.side_vertices()
    }

    pub fn num_triangles(&self) -> usize {
        2 * (1usize << (2 * self.power))
    }

    /// Compilers only subdivide two to four times
    fn read_power(record: &mut RecordReader<'_>) -> Result<u32> {
        match record.i32()? {
            power @ 2..=4 => Ok(power as u32),
            power => Err(Error::InvalidInput(format!(
                "displacement power {power} is outside 2 to 4"
            ))),
        }
    }

    /// Offset of the allowed vertex bitfield, which moves as neighbour data grows between games
    fn allowed_vertices_offset(map_type: MapType) -> Option<usize> {
        match map_type {
            MapType::Vindictus => Some(192),
            MapType::Source22 => Some(140),
            MapType::Source23 => Some(144),
            _ if map_type.is_source() => Some(136),
            _ => None,
        }
    }
}

impl LumpObject for Displacement {
    const NAME: &'static str = "Displacement";
    const KINDS: &'static [LumpKind] = &[LumpKind::DispInfos];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        Self::allowed_vertices_offset(map_type).map(|offset| offset + 40)
    }

    fn read(record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        let mut displacement = Displacement {
            start_position: record.vec3()?,
            first_vertex: to_usize(record.i32()?),
            first_triangle: to_usize(record.i32()?),
            power: Self::read_power(record)?,
            min_tesselation: record.i32()?,
            smoothing_angle: record.f32()?,
            contents: record.i32()?,
            ..Default::default()
        };

        if map_type == MapType::Vindictus {
            displacement.map_face = record.i32()?;
        } else {
            displacement.map_face = record.u16()? as i32;
            record.skip(2)?;
        }
        displacement.lightmap_alpha_start = record.i32()?;
        displacement.lightmap_sample_position_start = record.i32()?;

        if let Some(offset) = Self::allowed_vertices_offset(map_type) {
            record.seek_to(offset)?;
            displacement.allowed_vertices = record.read()?;
        }

        Ok(displacement)
    }
}

impl LumpReference for Displacement {
    const NAME: &'static str = "Displacement";
    const REFERENCES: &'static [LumpKind] =
        &[LumpKind::DispVerts, LumpKind::DisplacementTriangles];

    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)> {
        match kind {
            LumpKind::DispVerts => Some((self.first_vertex, self.num_vertices())),
            LumpKind::DisplacementTriangles => {
                Some((self.first_triangle, self.num_triangles()))
            }
            _ => None,
        }
    }
}

/// One displaced vertex, offset from the base surface along `vector` by `distance`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplacementVertex {
    pub vector: [f32; 3],
    pub distance: f32,
    pub alpha: f32,
}

impl LumpObject for DisplacementVertex {
    const NAME: &'static str = "DisplacementVertex";
    const KINDS: &'static [LumpKind] = &[LumpKind::DispVerts];

    fn record_size(map_type: MapType, _version: i32) -> Option<usize> {
        map_type.is_source().then_some(20)
    }

    fn read(record: &mut RecordReader<'_>, _map_type: MapType, _version: i32) -> Result<Self> {
        Ok(Self {
            vector: record.vec3()?,
            distance: record.f32()?,
            alpha: record.f32()?,
        })
    }
}

#[cfg(test)]
mod test {
    use binrw::Endian;
    use pretty_assertions::assert_eq;

    use crate::decode::RecordReader;
    use crate::error::{Error, Result};
    use crate::format::MapType;
    use crate::records::{Displacement, LumpObject, LumpReference};
    use crate::registry::LumpKind;

    #[test]
    fn record_sizes_follow_neighbour_data() {
        assert_eq!(Displacement::record_size(MapType::Source20, 0), Some(176));
        assert_eq!(Displacement::record_size(MapType::Source22, 0), Some(180));
        assert_eq!(Displacement::record_size(MapType::Source23, 0), Some(184));
        assert_eq!(Displacement::record_size(MapType::Vindictus, 0), Some(232));
        assert_eq!(Displacement::record_size(MapType::Quake3, 0), None);
    }

    #[test]
    fn power_three_references() -> Result<()> {
        let mut input = vec![0u8; 176];
        input[12..16].copy_from_slice(&100i32.to_le_bytes());
        input[16..20].copy_from_slice(&40i32.to_le_bytes());
        input[20..24].copy_from_slice(&3i32.to_le_bytes());
        input[136..140].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());

        let displacement = Displacement::read(
            &mut RecordReader::new(&input, Endian::Little),
            MapType::Source20,
            0,
        )?;

        assert_eq!(displacement.power, 3);
        assert_eq!(displacement.allowed_vertices[0], u32::MAX);
        assert_eq!(
            displacement.reference(LumpKind::DispVerts),
            Some((100, 81))
        );
        assert_eq!(
            displacement.reference(LumpKind::DisplacementTriangles),
            Some((40, 128))
        );

        Ok(())
    }

    #[test]
    fn power_outside_compiler_range_is_rejected() {
        for power in [0i32, 1, 5, 7, -1] {
            let mut input = vec![0u8; 176];
            input[20..24].copy_from_slice(&power.to_le_bytes());

            let result = Displacement::read(
                &mut RecordReader::new(&input, Endian::Little),
                MapType::Source20,
                0,
            );

            assert!(matches!(result, Err(Error::InvalidInput(_))), "{power}");
        }
    }
}
