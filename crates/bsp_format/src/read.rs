//! Types for reading map files
//!

use std::{
    fmt::{self, Debug},
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::Mutex,
};

use binrw::{BinRead, Endian};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    format::MapType,
    lump::LumpInfo,
    registry::directory_size,
    types::{
        IdLengthSlot, L4D2Slot, LengthOffsetSlot, LumpFileHeader, OffsetLengthSlot, SourceSlot,
    },
};

/// Size of a Source header: identifier, version, 64 slots and the map revision
const SOURCE_HEADER_SIZE: i32 = 1036;

/// Access to the raw bytes of a map
///
/// The container owns one of these and calls it lazily: the directory slot of a kind is only
/// read the first time that kind is requested, and lump data only when it is decoded.
pub trait MapReader: Send + Sync {
    /// Identify the layout from the file header
    fn map_type(&self) -> Result<MapType>;

    /// Read directory slot `index`, interpreted with `map_type`'s layout
    fn lump_info(&self, index: usize, map_type: MapType) -> Result<LumpInfo>;

    /// Read the bytes described by `info`
    fn read_lump(&self, info: &LumpInfo) -> Result<Vec<u8>>;

    /// Whether multi-byte values in this map are big endian
    fn is_big_endian(&self) -> bool {
        false
    }
}

/// How a format lays out its directory slots
#[derive(Debug, Copy, Clone, PartialEq)]
enum Directory {
    OffsetLength { start: u64 },
    LengthOffset { start: u64 },
    Source { start: u64 },
    L4D2,
    IdLength,
}

impl Directory {
    fn of(map_type: MapType) -> Option<Directory> {
        use MapType::*;

        match map_type {
            Quake | Nightfire => Some(Directory::OffsetLength { start: 4 }),
            Quake2 | Daikatana | SoF | SiN | Quake3 | Raven | CoD => {
                Some(Directory::OffsetLength { start: 8 })
            }
            Fakk | Stef2 | Stef2Demo | Mohaa => Some(Directory::OffsetLength { start: 12 }),
            CoD2 => Some(Directory::LengthOffset { start: 8 }),
            CoD4 => Some(Directory::IdLength),
            L4D2 => Some(Directory::L4D2),
            Titanfall => Some(Directory::Source { start: 16 }),
            TacticalInterventionEncrypted | Undefined => None,
            _ if map_type.is_source() => Some(Directory::Source { start: 8 }),
            _ => None,
        }
    }
}

/// Identify a map layout from the first bytes of its file
///
/// Twelve bytes are enough for every format; fewer are accepted as long as the identifying
/// fields are present. Layouts whose headers are indistinguishable from another one (SiN,
/// Soldier of Fortune, Vindictus, Dark Messiah) are reported as the layout they collide with
/// and must be selected explicitly.
pub fn sniff(header: &[u8]) -> Result<MapType> {
    if header.len() < 4 {
        return Err(Error::InvalidInput(format!(
            "map header is {} bytes long",
            header.len()
        )));
    }

    let magic: [u8; 4] = [header[0], header[1], header[2], header[3]];
    let int_at = |offset: usize, big: bool| -> Option<i32> {
        let bytes: [u8; 4] = header.get(offset..offset + 4)?.try_into().ok()?;
        Some(match big {
            true => i32::from_be_bytes(bytes),
            false => i32::from_le_bytes(bytes),
        })
    };

    // Quake and Nightfire have no identifier, only a version
    match i32::from_le_bytes(magic) {
        29 | 30 => return Ok(MapType::Quake),
        42 => return Ok(MapType::Nightfire),
        _ => {}
    }

    let big = &magic == b"PSBV";
    let version = int_at(4, big).ok_or_else(|| {
        Error::InvalidInput(format!("map header is {} bytes long", header.len()))
    })?;
    let unknown = || Error::UnknownFormat { magic, version };

    let map_type = match &magic {
        b"IBSP" => match version {
            38 => MapType::Quake2,
            41 => MapType::Daikatana,
            46 | 47 => MapType::Quake3,
            59 => MapType::CoD,
            4 => MapType::CoD2,
            22 => MapType::CoD4,
            _ => return Err(unknown()),
        },
        b"RBSP" if version == 1 => MapType::Raven,
        b"FAKK" => match version {
            12 => MapType::Fakk,
            19 => MapType::Stef2Demo,
            _ => return Err(unknown()),
        },
        b"EF2!" => MapType::Stef2,
        b"2015" | b"EALA" => MapType::Mohaa,
        b"rBSP" => MapType::Titanfall,
        b"VBSP" | b"PSBV" => match version {
            17 => MapType::Source17,
            18 => MapType::Source18,
            19 => MapType::Source19,
            20 => MapType::Source20,
            // A version where an offset should be means the Left 4 Dead 2 slot order
            21 => match int_at(8, big) {
                Some(first) if first < SOURCE_HEADER_SIZE => MapType::L4D2,
                _ => MapType::Source21,
            },
            22 => MapType::Source22,
            23 => MapType::Source23,
            27 => MapType::Source27,
            _ => return Err(unknown()),
        },
        _ => return Err(unknown()),
    };

    Ok(map_type)
}

/// Map reader over any seekable byte source
///
/// ```no_run
/// use bsp_format::BspReader;
///
/// let reader = BspReader::open("maps/de_dust2.bsp")?;
/// # Ok::<(), bsp_format::Error>(())
/// ```
pub struct BspReader<R> {
    inner: Mutex<R>,
    len: u64,
    endian: Endian,
    path: Option<PathBuf>,
}

impl<R> Debug for BspReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BspReader")
            .field("len", &self.len)
            .field("endian", &self.endian)
            .field("path", &self.path)
            .finish()
    }
}

impl BspReader<BufReader<File>> {
    /// Open a map file, allowing lumps stored in sidecar files next to it to be found
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);
        Ok(Self::new(file)?.with_path(path))
    }
}

impl<R: Read + Seek + Send> BspReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut magic = [0u8; 4];
        let endian = match reader.read_exact(&mut magic) {
            Ok(()) if &magic == b"PSBV" => Endian::Big,
            _ => Endian::Little,
        };

        Ok(Self {
            inner: Mutex::new(reader),
            len,
            endian,
            path: None,
        })
    }

    /// Path of the map file, used to find sidecar lump files
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Size of the map file in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn read_at<T>(&self, offset: u64) -> Result<T>
    where
        T: for<'a> BinRead<Args<'a> = ()>,
    {
        let mut inner = self.inner.lock().map_err(|_| Error::ReaderPoisoned)?;
        inner.seek(SeekFrom::Start(offset))?;
        Ok(T::read_options(&mut *inner, self.endian, ())?)
    }

    fn read_header(&self) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock().map_err(|_| Error::ReaderPoisoned)?;
        inner.seek(SeekFrom::Start(0))?;
        let mut header = Vec::with_capacity(12);
        (&mut *inner).take(12).read_to_end(&mut header)?;
        Ok(header)
    }

    /// Call of Duty 4 only lists present lumps, packed after the directory
    fn id_length_info(&self, index: usize) -> Result<LumpInfo> {
        let count: u32 = self.read_at(8)?;
        let mut offset = 12 + u64::from(count) * 8;

        for entry in 0..u64::from(count) {
            let slot: IdLengthSlot = self.read_at(12 + entry * 8)?;
            let length = u64::try_from(slot.length).unwrap_or(0);
            if usize::try_from(slot.id).ok() == Some(index) {
                return Ok(LumpInfo {
                    ident: slot.id,
                    offset,
                    length,
                    ..Default::default()
                });
            }
            offset = (offset + length).next_multiple_of(4);
        }

        Ok(LumpInfo {
            ident: index as i32,
            ..Default::default()
        })
    }

    /// Look for `index` stored outside the map file
    ///
    /// `slot` is the entry read from the map's own directory. Titanfall lump files carry no
    /// header, so only where the data lives changes.
    fn sidecar_info(
        &self,
        index: usize,
        map_type: MapType,
        slot: &LumpInfo,
    ) -> Result<Option<LumpInfo>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        if map_type == MapType::Titanfall {
            let mut name = path.as_os_str().to_owned();
            name.push(format!(".{index:04x}.bsp_lump"));
            let lump_file = PathBuf::from(name);
            if !lump_file.is_file() {
                return Ok(None);
            }

            debug!(?lump_file, index, "lump stored in sidecar file");
            return Ok(Some(LumpInfo {
                length: lump_file.metadata()?.len(),
                lump_file: Some(lump_file),
                ..slot.with_offset(0)
            }));
        }

        if !map_type.is_source() {
            return Ok(None);
        }

        let Some(stem) = path.file_stem() else {
            return Ok(None);
        };
        let lump_file = path.with_file_name(format!("{}_l_{index}.lmp", stem.to_string_lossy()));
        if !lump_file.is_file() {
            return Ok(None);
        }

        let mut file = BufReader::new(File::open(&lump_file)?);
        let header = LumpFileHeader::read_options(&mut file, self.endian, ())?;
        debug!(?lump_file, index, "lump stored in sidecar file");

        Ok(Some(LumpInfo {
            ident: header.id,
            version: header.version,
            offset: u64::try_from(header.offset).unwrap_or(LumpFileHeader::SIZE),
            length: u64::try_from(header.length).unwrap_or(0),
            lump_file: Some(lump_file),
            ..Default::default()
        }))
    }
}

impl<R: Read + Seek + Send> MapReader for BspReader<R> {
    #[instrument(skip(self), err)]
    fn map_type(&self) -> Result<MapType> {
        sniff(&self.read_header()?)
    }

    #[instrument(skip(self), err)]
    fn lump_info(&self, index: usize, map_type: MapType) -> Result<LumpInfo> {
        let size = directory_size(map_type).ok_or_else(|| {
            Error::InvalidInput(format!("{map_type} has no lump directory"))
        })?;
        if index >= size {
            return Err(Error::OutOfRange { index, size });
        }

        let Some(directory) = Directory::of(map_type) else {
            return Err(Error::InvalidInput(format!(
                "the lump directory of {map_type} cannot be read"
            )));
        };

        let slot = index as u64;
        let info: LumpInfo = match directory {
            Directory::OffsetLength { start } => self
                .read_at::<OffsetLengthSlot>(start + slot * 8)?
                .into(),
            Directory::LengthOffset { start } => self
                .read_at::<LengthOffsetSlot>(start + slot * 8)?
                .into(),
            Directory::Source { start } => self.read_at::<SourceSlot>(start + slot * 16)?.into(),
            Directory::L4D2 => self.read_at::<L4D2Slot>(8 + slot * 16)?.into(),
            Directory::IdLength => self.id_length_info(index)?,
        };

        Ok(self.sidecar_info(index, map_type, &info)?.unwrap_or(info))
    }

    #[instrument(skip(self), err)]
    fn read_lump(&self, info: &LumpInfo) -> Result<Vec<u8>> {
        if info.is_empty() {
            return Ok(Vec::new());
        }

        match &info.lump_file {
            Some(lump_file) => {
                let mut file = File::open(lump_file)?;
                check_bounds(info, file.metadata()?.len())?;
                read_range(&mut file, info)
            }
            None => {
                check_bounds(info, self.len)?;
                let mut inner = self.inner.lock().map_err(|_| Error::ReaderPoisoned)?;
                read_range(&mut *inner, info)
            }
        }
    }

    fn is_big_endian(&self) -> bool {
        self.endian == Endian::Big
    }
}

fn check_bounds(info: &LumpInfo, size: u64) -> Result<()> {
    match info.offset.checked_add(info.length) {
        Some(end) if end <= size => Ok(()),
        _ => Err(Error::OutOfBounds {
            offset: info.offset,
            length: info.length,
            size,
        }),
    }
}

fn read_range<R: Read + Seek>(reader: &mut R, info: &LumpInfo) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(info.offset))?;
    let mut data = vec![0u8; info.length as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}
