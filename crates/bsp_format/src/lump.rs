//! Directory entries and decoded lump sequences.

use std::path::PathBuf;

use derive_more::{Deref, IntoIterator};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::format::MapType;

/// One entry of a map's lump directory
///
/// Produced by the reader the first time a directory slot is requested and kept unchanged for
/// the lifetime of the owning [`crate::Bsp`]. Derived copies are made with
/// [`LumpInfo::with_version`] and [`LumpInfo::with_offset`], never by mutating a cached entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LumpInfo {
    /// Four character code or numeric identifier of the lump, zero when the format has none
    pub ident: i32,

    /// Format-specific flags
    pub flags: i32,

    /// Version of the data stored in this lump
    pub version: i32,

    /// Offset of the data from the start of the file it lives in
    pub offset: u64,

    /// Length of the data in bytes
    pub length: u64,

    /// Sidecar file holding the data instead of the map file itself
    pub lump_file: Option<PathBuf>,
}

impl LumpInfo {
    /// The offset just past the end of this lump's data
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    /// Whether the directory entry describes no data at all
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// A copy of this entry forcing a different data version
    pub fn with_version(&self, version: i32) -> LumpInfo {
        LumpInfo {
            version,
            ..self.clone()
        }
    }

    /// A copy of this entry pointing at a different offset
    pub fn with_offset(&self, offset: u64) -> LumpInfo {
        LumpInfo {
            offset,
            ..self.clone()
        }
    }
}

/// An ordered sequence of decoded records together with where they came from
///
/// Dereferences to a slice of the records.
#[derive(Debug, Clone, PartialEq, Deref, IntoIterator)]
pub struct Lump<T> {
    #[deref]
    #[into_iterator(owned, ref)]
    items: Vec<T>,
    info: LumpInfo,
    map_type: MapType,
}

impl<T> Lump<T> {
    pub(crate) fn new(items: Vec<T>, info: LumpInfo, map_type: MapType) -> Self {
        Self {
            items,
            info,
            map_type,
        }
    }

    /// The directory entry the records were decoded from
    pub fn info(&self) -> &LumpInfo {
        &self.info
    }

    /// The layout the records were decoded with
    pub fn map_type(&self) -> MapType {
        self.map_type
    }

    /// The records as an owned vector
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

/// A lump of unsigned indices decoded from 1, 2 or 4 byte elements
pub type NumList = Lump<u32>;
