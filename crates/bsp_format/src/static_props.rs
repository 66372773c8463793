//! Static props: models placed by the Source compiler, stored in the `sprp` game sub-lump.

use binrw::Endian;

use crate::decode::{check_whole_records, RecordReader};
use crate::error::{Error, Result};
use crate::records::to_usize;
use crate::registry::LumpKind;

/// One placed model
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticProp {
    pub origin: [f32; 3],
    pub angles: [f32; 3],

    /// Index into [`StaticProps::names`]
    pub model: u16,
    pub first_leaf: usize,
    pub num_leaves: usize,
    pub solid: u8,
    pub flags: u8,
    pub skin: i32,
    pub fade_min_distance: f32,
    pub fade_max_distance: f32,
    pub lighting_origin: [f32; 3],
    pub forced_fade_scale: f32,
    pub diffuse_modulation: [u8; 4],
    pub flags_ex: u32,
    pub uniform_scale: f32,
}

impl StaticProp {
    /// Encoded size of one prop for a sub-lump version
    pub fn record_size(version: i32) -> Option<usize> {
        match version {
            4 => Some(56),
            5 => Some(60),
            6 => Some(64),
            7 | 8 => Some(68),
            9 => Some(72),
            10 => Some(76),
            11 => Some(80),
            _ => None,
        }
    }

    fn read(record: &mut RecordReader<'_>, version: i32) -> Result<Self> {
        let mut prop = StaticProp {
            origin: record.vec3()?,
            angles: record.vec3()?,
            model: record.u16()?,
            first_leaf: record.u16()? as usize,
            num_leaves: record.u16()? as usize,
            solid: record.u8()?,
            flags: record.u8()?,
            skin: record.i32()?,
            fade_min_distance: record.f32()?,
            fade_max_distance: record.f32()?,
            lighting_origin: record.vec3()?,
            uniform_scale: 1.0,
            ..Default::default()
        };

        if version < 5 {
            return Ok(prop);
        }
        prop.forced_fade_scale = record.f32()?;

        // DirectX levels up to version 7, CPU and GPU levels after
        if version >= 6 {
            record.skip(4)?;
        }
        if version >= 7 {
            prop.diffuse_modulation = record.read()?;
        }
        if version >= 9 {
            // Disabled on Xbox 360
            record.skip(4)?;
        }
        if version >= 10 {
            prop.flags_ex = record.u32()?;
        }
        if version >= 11 {
            prop.uniform_scale = record.f32()?;
        }

        Ok(prop)
    }
}

/// The decoded static prop sub-lump
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticProps {
    pub version: i32,

    /// Model paths referenced by [`StaticProp::model`]
    pub names: Vec<String>,

    /// Leaf indices referenced by each prop's leaf range
    pub leaves: Vec<u32>,
    pub props: Vec<StaticProp>,
}

impl StaticProps {
    /// Decode the bytes of a static prop sub-lump of `version`
    pub fn parse(bytes: &[u8], version: i32, endian: Endian, strict: bool) -> Result<StaticProps> {
        let record_size = StaticProp::record_size(version).ok_or_else(|| {
            Error::InvalidInput(format!("unsupported static prop version {version}"))
        })?;

        let mut reader = RecordReader::new(bytes, endian);

        let name_count = to_usize(reader.i32()?);
        let names = (0..name_count)
            .map(|_| reader.string(128))
            .collect::<Result<Vec<_>>>()?;

        let leaf_count = to_usize(reader.i32()?);
        let leaves = (0..leaf_count)
            .map(|_| reader.u16().map(u32::from))
            .collect::<Result<Vec<_>>>()?;

        let prop_count = to_usize(reader.i32()?);
        let start = reader.position();
        let available = bytes.len() - start;
        let needed = prop_count.saturating_mul(record_size);
        if needed > available {
            return Err(Error::InvalidInput(format!(
                "{prop_count} static props of {record_size} bytes need {needed} bytes, {available} remain"
            )));
        }
        check_whole_records(LumpKind::GameLump, available, record_size, strict)?;

        let props = bytes[start..start + needed]
            .chunks_exact(record_size)
            .map(|chunk| StaticProp::read(&mut RecordReader::new(chunk, endian), version))
            .collect::<Result<Vec<_>>>()?;

        Ok(StaticProps {
            version,
            names,
            leaves,
            props,
        })
    }

    /// The model path of `prop`
    pub fn model_name(&self, prop: &StaticProp) -> Option<&str> {
        self.names.get(prop.model as usize).map(String::as_str)
    }

    /// Copy out the leaves `prop` is placed in
    pub fn leaves_of(&self, prop: &StaticProp) -> Result<Vec<u32>> {
        let (start, count) = (prop.first_leaf, prop.num_leaves);
        self.leaves
            .get(start..start + count)
            .map(<[u32]>::to_vec)
            .ok_or(Error::ReferenceOutOfRange {
                kind: LumpKind::GameLump,
                start,
                count,
                len: self.leaves.len(),
            })
    }
}
