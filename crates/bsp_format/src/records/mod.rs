//! Record layouts for each semantic lump.
//!
//! A record type knows its encoded size for every format it supports and how to pull its fields
//! out of one record's bytes. Types that cannot be described as fixed-size records (entity text,
//! texture name tables, index lists) override [`LumpObject::decode_lump`] instead.

use binrw::Endian;

use crate::bsp::BspOptions;
use crate::decode::{check_whole_records, decode_fixed, decode_indices, RecordReader};
use crate::error::{Error, Result};
use crate::format::MapType;
use crate::lump::LumpInfo;
use crate::registry::{element_width, LumpKind};

mod brush;
mod cubemap;
mod displacement;
mod edge;
mod entity;
mod face;
mod leaf;
mod lod_terrain;
mod model;
mod node;
mod patch;
mod plane;
mod static_model;
mod texture;
mod texture_info;
mod vertex;

pub use brush::{Brush, BrushSide};
pub use cubemap::Cubemap;
pub use displacement::{Displacement, DisplacementVertex};
pub use edge::Edge;
pub use entity::Entity;
pub use face::Face;
pub use leaf::Leaf;
pub use lod_terrain::LodTerrain;
pub use model::Model;
pub use node::Node;
pub use patch::Patch;
pub use plane::Plane;
pub use static_model::StaticModel;
pub use texture::{Texture, TextureData};
pub use texture_info::TextureInfo;
pub use vertex::Vertex;

/// Everything a record decoder may need to know about the lump it is reading
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub kind: LumpKind,
    pub map_type: MapType,
    pub info: &'a LumpInfo,
    pub endian: Endian,
    pub options: &'a BspOptions,
}

/// A type that can be stored in a decoded [`crate::Lump`]
pub trait LumpObject: Sized + Send + Sync + 'static {
    /// Name used in diagnostics
    const NAME: &'static str;

    /// The semantic kinds whose lumps hold this type
    const KINDS: &'static [LumpKind];

    /// Encoded size of one record, `None` when the format has no layout for this type
    fn record_size(_map_type: MapType, _version: i32) -> Option<usize> {
        None
    }

    /// Decode the fields of one record
    fn read(_record: &mut RecordReader<'_>, map_type: MapType, _version: i32) -> Result<Self> {
        Err(Error::InvalidInput(format!(
            "{} has no fixed record layout for {map_type}",
            Self::NAME
        )))
    }

    /// Decode a whole lump, `None` when the format has no layout for this type
    fn decode_lump(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<Option<Vec<Self>>> {
        decode_records(bytes, ctx)
    }
}

/// Decode `bytes` as back to back records of `T`'s fixed layout
pub(crate) fn decode_records<T: LumpObject>(
    bytes: &[u8],
    ctx: &DecodeContext<'_>,
) -> Result<Option<Vec<T>>> {
    let Some(record_size) = T::record_size(ctx.map_type, ctx.info.version) else {
        return Ok(None);
    };

    decode_fixed(
        ctx.kind,
        bytes,
        record_size,
        ctx.options.strict_records,
        |record| {
            T::read(
                &mut RecordReader::new(record, ctx.endian),
                ctx.map_type,
                ctx.info.version,
            )
        },
    )
    .map(Some)
}

/// Index lists decode to plain `u32`s with a registry-sourced width
impl LumpObject for u32 {
    const NAME: &'static str = "index list";

    const KINDS: &'static [LumpKind] = &[
        LumpKind::MarkSurfaces,
        LumpKind::SurfEdges,
        LumpKind::MarkBrushes,
        LumpKind::PatchIndices,
        LumpKind::LeafPatches,
        LumpKind::Indices,
        LumpKind::TexTable,
        LumpKind::DisplacementTriangles,
    ];

    fn decode_lump(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<Option<Vec<Self>>> {
        let Some(width) = element_width(ctx.kind, ctx.map_type) else {
            return Ok(None);
        };

        check_whole_records(
            ctx.kind,
            bytes.len(),
            width.bytes(),
            ctx.options.strict_records,
        )?;
        Ok(Some(decode_indices(bytes, width, ctx.endian)))
    }
}

/// A record addressing contiguous ranges of other lumps by start index and count
///
/// Implementations replace field discovery at runtime: every kind a record points into is
/// listed in [`LumpReference::REFERENCES`] and answered by [`LumpReference::reference`].
pub trait LumpReference {
    /// Name used in diagnostics
    const NAME: &'static str;

    /// Every kind this record can point into
    const REFERENCES: &'static [LumpKind];

    /// The `(start, count)` range this record covers in `kind`
    ///
    /// `None` when the record does not reference `kind`, or when the layout it was decoded from
    /// carries no such range.
    fn reference(&self, kind: LumpKind) -> Option<(usize, usize)>;
}

/// Clamp a signed on-disk index or count to `usize`, treating negatives as zero
pub(crate) fn to_usize(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}
