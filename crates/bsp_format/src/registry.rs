//! Static tables mapping semantic lumps to directory slots and element widths.
//!
//! Every function here is total over `(LumpKind, MapType)`. A pair that a format does not use
//! maps to `None`; absence is how a format opts out of a kind, never an error.

use derive_more::Display;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::format::MapType;

/// A role a lump plays in a map, independent of where a given format stores it
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum LumpKind {
    Entities,
    Planes,
    Textures,
    Vertices,
    Nodes,
    TexInfo,
    Faces,
    Leaves,
    Edges,
    Models,
    Brushes,
    BrushSides,
    Materials,
    OriginalFaces,
    TexDatas,
    DispInfos,
    DispVerts,
    Cubemaps,
    StaticModels,
    LodTerrains,
    Patches,
    PatchVerts,
    GameLump,
    MarkSurfaces,
    SurfEdges,
    MarkBrushes,
    PatchIndices,
    LeafPatches,
    Indices,
    TexTable,
    DisplacementTriangles,
}

impl LumpKind {
    /// Number of kinds, used to size per-kind caches
    pub const COUNT: usize = 31;

    /// Every kind in declaration order
    pub const ALL: [LumpKind; LumpKind::COUNT] = [
        LumpKind::Entities,
        LumpKind::Planes,
        LumpKind::Textures,
        LumpKind::Vertices,
        LumpKind::Nodes,
        LumpKind::TexInfo,
        LumpKind::Faces,
        LumpKind::Leaves,
        LumpKind::Edges,
        LumpKind::Models,
        LumpKind::Brushes,
        LumpKind::BrushSides,
        LumpKind::Materials,
        LumpKind::OriginalFaces,
        LumpKind::TexDatas,
        LumpKind::DispInfos,
        LumpKind::DispVerts,
        LumpKind::Cubemaps,
        LumpKind::StaticModels,
        LumpKind::LodTerrains,
        LumpKind::Patches,
        LumpKind::PatchVerts,
        LumpKind::GameLump,
        LumpKind::MarkSurfaces,
        LumpKind::SurfEdges,
        LumpKind::MarkBrushes,
        LumpKind::PatchIndices,
        LumpKind::LeafPatches,
        LumpKind::Indices,
        LumpKind::TexTable,
        LumpKind::DisplacementTriangles,
    ];

    /// Position of this kind in [`LumpKind::ALL`]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Whether this kind is a list of integers whose width depends on the format
    pub const fn is_index_list(self) -> bool {
        matches!(
            self,
            LumpKind::MarkSurfaces
                | LumpKind::SurfEdges
                | LumpKind::MarkBrushes
                | LumpKind::PatchIndices
                | LumpKind::LeafPatches
                | LumpKind::Indices
                | LumpKind::TexTable
                | LumpKind::DisplacementTriangles
        )
    }
}

/// On-disk width of one element of an index list
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum IndexWidth {
    #[display("u8")]
    U8 = 1,
    #[display("u16")]
    U16 = 2,
    #[display("u32")]
    U32 = 4,
}

impl IndexWidth {
    /// Number of bytes per element
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

/// Total number of directory slots in a format
pub fn directory_size(map_type: MapType) -> Option<usize> {
    use MapType::*;

    match map_type {
        Quake => Some(15),
        Quake2 | Daikatana => Some(16),
        Quake3 => Some(17),
        Raven | Nightfire => Some(18),
        Fakk | SiN => Some(20),
        SoF => Some(22),
        Mohaa => Some(28),
        Stef2 | Stef2Demo => Some(30),
        CoD => Some(31),
        CoD2 => Some(39),
        CoD4 => Some(55),
        Source17 | Source18 | Source19 | Source20 | Source21 | Source22 | Source23
        | Source27 | L4D2 | Vindictus | DMoMaM | TacticalInterventionEncrypted => Some(64),
        Titanfall => Some(128),
        Undefined => None,
    }
}

/// Directory slot holding `kind` in a format
pub fn index_for(kind: LumpKind, map_type: MapType) -> Option<usize> {
    use MapType::*;

    // Encrypted lumps cannot be decoded; every kind is absent
    if map_type == TacticalInterventionEncrypted {
        return None;
    }

    let source = map_type.is_source();
    let quake2 = map_type.is_quake2_like();
    let fakk = map_type.is_fakk_like();
    let quake3 = matches!(map_type, Quake3 | Raven);

    match kind {
        LumpKind::Entities => match map_type {
            Quake | Nightfire => Some(0),
            _ if quake2 || quake3 || source => Some(0),
            _ if fakk => Some(14),
            CoD => Some(29),
            CoD2 => Some(37),
            CoD4 => Some(39),
            _ => None,
        },
        LumpKind::Planes => match map_type {
            Quake | Nightfire | Titanfall => Some(1),
            _ if quake2 || source || fakk => Some(1),
            Quake3 | Raven | CoD => Some(2),
            CoD2 | CoD4 => Some(4),
            _ => None,
        },
        LumpKind::Textures => match map_type {
            Quake | Nightfire => Some(2),
            Quake3 | Raven => Some(1),
            _ if fakk || map_type.is_cod() => Some(0),
            _ if source => Some(43),
            Titanfall => Some(43),
            _ => None,
        },
        LumpKind::Vertices => match map_type {
            Quake | Titanfall => Some(3),
            _ if source => Some(3),
            _ if quake2 => Some(2),
            Nightfire | Mohaa | Fakk | Stef2 | Stef2Demo => Some(4),
            Quake3 | Raven => Some(10),
            CoD => Some(7),
            CoD2 => Some(8),
            CoD4 => Some(10),
            _ => None,
        },
        LumpKind::Nodes => match map_type {
            Quake => Some(5),
            _ if source => Some(5),
            _ if quake2 => Some(4),
            Quake3 | Raven => Some(3),
            _ if fakk => Some(9),
            Nightfire => Some(8),
            CoD | CoD4 => Some(20),
            CoD2 => Some(25),
            _ => None,
        },
        LumpKind::TexInfo => match map_type {
            Quake => Some(6),
            _ if source => Some(6),
            _ if quake2 => Some(5),
            Nightfire => Some(17),
            _ => None,
        },
        LumpKind::Faces => match map_type {
            Quake => Some(7),
            _ if source => Some(7),
            _ if quake2 => Some(6),
            Quake3 | Raven => Some(13),
            _ if fakk => Some(3),
            Nightfire | CoD4 => Some(9),
            CoD => Some(6),
            CoD2 => Some(7),
            _ => None,
        },
        LumpKind::Leaves => match map_type {
            Quake => Some(10),
            _ if source => Some(10),
            _ if quake2 || fakk => Some(8),
            Quake3 | Raven => Some(4),
            Nightfire => Some(11),
            CoD | CoD4 => Some(21),
            CoD2 => Some(26),
            _ => None,
        },
        LumpKind::Edges => match map_type {
            Quake => Some(12),
            _ if source => Some(12),
            _ if quake2 => Some(11),
            _ => None,
        },
        LumpKind::Models => match map_type {
            Quake | Titanfall | Nightfire => Some(14),
            _ if source => Some(14),
            _ if quake2 || fakk => Some(13),
            Quake3 | Raven => Some(7),
            CoD => Some(27),
            CoD2 => Some(35),
            CoD4 => Some(37),
            _ => None,
        },
        LumpKind::Brushes => match map_type {
            _ if source => Some(18),
            _ if quake2 => Some(14),
            Quake3 | Raven => Some(8),
            Mohaa => Some(12),
            Fakk | Stef2 | Stef2Demo => Some(11),
            Nightfire => Some(15),
            CoD => Some(4),
            CoD2 => Some(6),
            CoD4 => Some(8),
            _ => None,
        },
        LumpKind::BrushSides => match map_type {
            _ if source => Some(19),
            _ if quake2 => Some(15),
            Quake3 | Raven => Some(9),
            Mohaa => Some(11),
            Fakk | Stef2 | Stef2Demo => Some(10),
            Nightfire => Some(16),
            CoD => Some(3),
            CoD2 | CoD4 => Some(5),
            _ => None,
        },
        LumpKind::Materials => match map_type {
            Nightfire => Some(3),
            _ => None,
        },
        LumpKind::OriginalFaces => match map_type {
            _ if source => Some(27),
            _ => None,
        },
        LumpKind::TexDatas => match map_type {
            Titanfall => Some(2),
            _ if source => Some(2),
            _ => None,
        },
        LumpKind::DispInfos => match map_type {
            _ if source => Some(26),
            _ => None,
        },
        LumpKind::DispVerts => match map_type {
            _ if source => Some(33),
            _ => None,
        },
        LumpKind::Cubemaps => match map_type {
            Titanfall => Some(42),
            _ if source => Some(42),
            _ => None,
        },
        LumpKind::StaticModels => match map_type {
            Mohaa => Some(25),
            _ => None,
        },
        LumpKind::LodTerrains => match map_type {
            Mohaa => Some(22),
            _ => None,
        },
        LumpKind::Patches => match map_type {
            CoD => Some(24),
            _ => None,
        },
        LumpKind::PatchVerts => match map_type {
            CoD => Some(25),
            CoD2 => Some(29),
            CoD4 => Some(25),
            _ => None,
        },
        LumpKind::GameLump => match map_type {
            Titanfall => Some(35),
            _ if source => Some(35),
            _ => None,
        },
        LumpKind::MarkSurfaces => match map_type {
            Quake => Some(11),
            _ if source => Some(16),
            _ if quake2 => Some(9),
            Quake3 | Raven => Some(5),
            _ if fakk => Some(7),
            Nightfire => Some(12),
            CoD | CoD4 => Some(23),
            CoD2 => Some(28),
            _ => None,
        },
        LumpKind::SurfEdges => match map_type {
            Quake => Some(13),
            _ if source => Some(13),
            _ if quake2 => Some(12),
            _ => None,
        },
        LumpKind::MarkBrushes => match map_type {
            _ if source => Some(17),
            _ if quake2 => Some(10),
            Quake3 | Raven => Some(6),
            _ if fakk => Some(6),
            Nightfire => Some(13),
            CoD | CoD4 => Some(22),
            CoD2 => Some(27),
            _ => None,
        },
        LumpKind::PatchIndices => match map_type {
            CoD | CoD4 => Some(26),
            CoD2 => Some(31),
            _ => None,
        },
        LumpKind::LeafPatches => match map_type {
            CoD => Some(28),
            _ => None,
        },
        LumpKind::Indices => match map_type {
            Quake3 | Raven => Some(11),
            _ if fakk => Some(5),
            Nightfire => Some(6),
            CoD => Some(8),
            CoD2 => Some(9),
            CoD4 => Some(11),
            _ => None,
        },
        LumpKind::TexTable => match map_type {
            Titanfall => Some(44),
            _ if source => Some(44),
            _ => None,
        },
        LumpKind::DisplacementTriangles => match map_type {
            _ if source => Some(48),
            _ => None,
        },
    }
}

/// Width of one element of an index-list kind in a format
///
/// Defined exactly where [`index_for`] returns a slot for an index-list kind.
pub fn element_width(kind: LumpKind, map_type: MapType) -> Option<IndexWidth> {
    use MapType::*;

    if !kind.is_index_list() {
        return None;
    }
    index_for(kind, map_type)?;

    let narrow = map_type == Quake || map_type.is_quake2_like() || map_type.is_source();

    Some(match kind {
        LumpKind::MarkSurfaces | LumpKind::MarkBrushes => match map_type {
            Vindictus => IndexWidth::U32,
            _ if narrow => IndexWidth::U16,
            _ => IndexWidth::U32,
        },
        LumpKind::PatchIndices | LumpKind::DisplacementTriangles => IndexWidth::U16,
        LumpKind::Indices => match map_type {
            CoD2 | CoD4 => IndexWidth::U16,
            _ => IndexWidth::U32,
        },
        _ => IndexWidth::U32,
    })
}
