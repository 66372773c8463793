#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use bsp_format::{BspReader, LumpInfo, MapReader, MapType, Result};

/// Lays out a map with an `{offset, length}` directory, data packed after the header
pub struct QuakeMap {
    lumps: Vec<Vec<u8>>,
}

impl QuakeMap {
    pub const HEADER_SIZE: usize = 4 + 15 * 8;

    pub fn new() -> Self {
        Self {
            lumps: vec![Vec::new(); 15],
        }
    }

    pub fn lump(mut self, index: usize, data: impl Into<Vec<u8>>) -> Self {
        self.lumps[index] = data.into();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut header = 29i32.to_le_bytes().to_vec();
        let mut data = Vec::new();
        for lump in &self.lumps {
            let offset = Self::HEADER_SIZE + data.len();
            header.extend_from_slice(&(offset as i32).to_le_bytes());
            header.extend_from_slice(&(lump.len() as i32).to_le_bytes());
            data.extend_from_slice(lump);
        }
        header.extend(data);
        header
    }
}

/// Lays out a Source map, lump data packed after the header in insertion order
pub struct SourceMap {
    version: i32,
    big_endian: bool,
    slots: Vec<(i32, i32, i32)>,
    data: Vec<u8>,
}

impl SourceMap {
    pub const HEADER_SIZE: usize = 1036;

    pub fn new(version: i32) -> Self {
        Self {
            version,
            big_endian: false,
            slots: vec![(0, 0, 0); 64],
            data: Vec::new(),
        }
    }

    /// A console map, identified by `PSBV` and storing every value big endian
    pub fn big_endian(version: i32) -> Self {
        Self {
            big_endian: true,
            ..Self::new(version)
        }
    }

    /// File offset the next lump will be written at
    pub fn next_offset(&self) -> usize {
        Self::HEADER_SIZE + self.data.len()
    }

    pub fn lump(mut self, index: usize, version: i32, data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        self.slots[index] = (self.next_offset() as i32, data.len() as i32, version);
        self.data.extend_from_slice(data);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let int = |value: i32| match self.big_endian {
            true => value.to_be_bytes(),
            false => value.to_le_bytes(),
        };

        let mut out = match self.big_endian {
            true => b"PSBV".to_vec(),
            false => b"VBSP".to_vec(),
        };
        out.extend_from_slice(&int(self.version));
        for (offset, length, version) in &self.slots {
            out.extend_from_slice(&int(*offset));
            out.extend_from_slice(&int(*length));
            out.extend_from_slice(&int(*version));
            out.extend_from_slice(&[0; 4]);
        }
        // Map revision
        out.extend_from_slice(&int(1));
        out.extend_from_slice(&self.data);
        out
    }
}

/// Lays out a Titanfall map header whose lumps all live in sidecar files
pub struct TitanfallMap {
    slots: Vec<(i32, i32, i32, [u8; 4])>,
}

impl TitanfallMap {
    pub const HEADER_SIZE: usize = 16 + 128 * 16;

    pub fn new() -> Self {
        Self {
            slots: vec![(0, 0, 0, [0; 4]); 128],
        }
    }

    /// Describe slot `index` as `length` bytes of `version` data tagged `ident`
    pub fn slot(mut self, index: usize, length: i32, version: i32, ident: [u8; 4]) -> Self {
        self.slots[index] = (0, length, version, ident);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = b"rBSP".to_vec();
        out.extend_from_slice(&29i32.to_le_bytes());
        // Map revision and the highest lump index
        out.extend_from_slice(&1i32.to_le_bytes());
        out.extend_from_slice(&127i32.to_le_bytes());
        for (offset, length, version, ident) in &self.slots {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&length.to_le_bytes());
            out.extend_from_slice(&version.to_le_bytes());
            out.extend_from_slice(ident);
        }
        out
    }
}

/// Lays out a Call of Duty 4 map: only listed lumps, packed on four byte boundaries
pub struct CoD4Map {
    lumps: Vec<(i32, Vec<u8>)>,
}

impl CoD4Map {
    pub fn new() -> Self {
        Self { lumps: Vec::new() }
    }

    pub fn lump(mut self, id: i32, data: impl Into<Vec<u8>>) -> Self {
        self.lumps.push((id, data.into()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = b"IBSP".to_vec();
        out.extend_from_slice(&22i32.to_le_bytes());
        out.extend_from_slice(&(self.lumps.len() as i32).to_le_bytes());
        for (id, data) in &self.lumps {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&(data.len() as i32).to_le_bytes());
        }
        for (_, data) in &self.lumps {
            out.extend_from_slice(data);
            out.resize(out.len().next_multiple_of(4), 0);
        }
        out
    }
}

/// Game lump payload with one entry per `(fourcc, version, offset, data length)`
pub fn game_lump_directory(entries: &[(&[u8; 4], u16, i32, i32)]) -> Vec<u8> {
    let mut out = (entries.len() as i32).to_le_bytes().to_vec();
    for (id, version, offset, length) in entries {
        out.extend_from_slice(&u32::from_be_bytes(**id).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&version.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
    }
    out
}

/// A version 10 static prop sub-lump with a single model and prop
pub fn static_prop_lump(model: &str, origin: [f32; 3], leaves: &[u16]) -> Vec<u8> {
    let mut out = 1i32.to_le_bytes().to_vec();
    let mut name = model.as_bytes().to_vec();
    name.resize(128, 0);
    out.extend(name);

    out.extend_from_slice(&(leaves.len() as i32).to_le_bytes());
    for leaf in leaves {
        out.extend_from_slice(&leaf.to_le_bytes());
    }

    out.extend_from_slice(&1i32.to_le_bytes());
    let mut prop = Vec::new();
    for value in origin {
        prop.extend_from_slice(&value.to_le_bytes());
    }
    prop.extend_from_slice(&[0; 12]);
    prop.extend_from_slice(&0u16.to_le_bytes());
    prop.extend_from_slice(&0u16.to_le_bytes());
    prop.extend_from_slice(&(leaves.len() as u16).to_le_bytes());
    prop.resize(76, 0);
    out.extend(prop);
    out
}

pub fn floats(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn floats_be(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn shorts(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Reader counting how often the container reaches the file
pub struct CountingReader {
    inner: BspReader<Cursor<Vec<u8>>>,
    pub sniffs: AtomicUsize,
    pub slots: AtomicUsize,
    pub reads: AtomicUsize,
}

impl CountingReader {
    pub fn new(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            inner: BspReader::new(Cursor::new(data))?,
            sniffs: AtomicUsize::new(0),
            slots: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn touches(&self) -> usize {
        self.sniffs.load(Ordering::SeqCst)
            + self.slots.load(Ordering::SeqCst)
            + self.reads.load(Ordering::SeqCst)
    }
}

impl MapReader for CountingReader {
    fn map_type(&self) -> Result<MapType> {
        self.sniffs.fetch_add(1, Ordering::SeqCst);
        self.inner.map_type()
    }

    fn lump_info(&self, index: usize, map_type: MapType) -> Result<LumpInfo> {
        self.slots.fetch_add(1, Ordering::SeqCst);
        self.inner.lump_info(index, map_type)
    }

    fn read_lump(&self, info: &LumpInfo) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_lump(info)
    }

    fn is_big_endian(&self) -> bool {
        self.inner.is_big_endian()
    }
}
