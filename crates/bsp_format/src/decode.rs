//! Generic decoding of byte ranges into fixed-size records and index lists.

use std::io::{Cursor, Seek, SeekFrom};

use binrw::{BinRead, Endian};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use tracing::warn;

use crate::error::{Error, Result};
use crate::registry::{IndexWidth, LumpKind};

/// Split `bytes` into `record_size` chunks and decode each one with `read`
///
/// Trailing bytes that do not fill a whole record are dropped with a warning, unless `strict`
/// is set, in which case the lump is rejected with [`Error::MalformedRecordLength`]. Every
/// slice handed to `read` is exactly `record_size` bytes long.
pub fn decode_fixed<T, F>(
    kind: LumpKind,
    bytes: &[u8],
    record_size: usize,
    strict: bool,
    mut read: F,
) -> Result<Vec<T>>
where
    F: FnMut(&[u8]) -> Result<T>,
{
    if record_size == 0 {
        return Err(Error::InvalidInput(format!(
            "{kind} records cannot be zero bytes long"
        )));
    }

    check_whole_records(kind, bytes.len(), record_size, strict)?;

    bytes.chunks_exact(record_size).map(&mut read).collect()
}

/// Decode an index list whose element width comes from the registry
///
/// Each element is zero-extended to `u32`. The element count is `bytes.len() / width`.
pub fn decode_indices(bytes: &[u8], width: IndexWidth, endian: Endian) -> Vec<u32> {
    let chunks = bytes.chunks_exact(width.bytes());
    match (width, endian) {
        (IndexWidth::U8, _) => chunks.map(|c| c[0] as u32).collect(),
        (IndexWidth::U16, Endian::Little) => {
            chunks.map(|c| LittleEndian::read_u16(c) as u32).collect()
        }
        (IndexWidth::U16, Endian::Big) => chunks.map(|c| BigEndian::read_u16(c) as u32).collect(),
        (IndexWidth::U32, Endian::Little) => chunks.map(LittleEndian::read_u32).collect(),
        (IndexWidth::U32, Endian::Big) => chunks.map(BigEndian::read_u32).collect(),
    }
}

pub(crate) fn check_whole_records(
    kind: LumpKind,
    length: usize,
    record_size: usize,
    strict: bool,
) -> Result<()> {
    if length % record_size == 0 {
        return Ok(());
    }

    if strict {
        return Err(Error::MalformedRecordLength {
            kind,
            length,
            record_size,
        });
    }

    warn!(
        %kind,
        length,
        record_size,
        "lump is not a whole number of records, ignoring {} trailing bytes",
        length % record_size
    );
    Ok(())
}

/// Field reader over the bytes of a single record
///
/// Reads honour the endianness of the map the record came from.
pub struct RecordReader<'a> {
    cursor: Cursor<&'a [u8]>,
    endian: Endian,
}

impl<'a> RecordReader<'a> {
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            cursor: Cursor::new(data),
            endian,
        }
    }

    /// Read any binrw type with this record's endianness
    pub fn read<T>(&mut self) -> Result<T>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        Ok(T::read_options(&mut self.cursor, self.endian, ())?)
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.read()
    }

    pub fn i8(&mut self) -> Result<i8> {
        self.read()
    }

    pub fn u16(&mut self) -> Result<u16> {
        self.read()
    }

    pub fn i16(&mut self) -> Result<i16> {
        self.read()
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.read()
    }

    pub fn i32(&mut self) -> Result<i32> {
        self.read()
    }

    pub fn f32(&mut self) -> Result<f32> {
        self.read()
    }

    pub fn vec3(&mut self) -> Result<[f32; 3]> {
        self.read()
    }

    /// A fixed-width, NUL padded string
    pub fn string(&mut self, len: usize) -> Result<String> {
        let start = self.position();
        let data = *self.cursor.get_ref();
        let raw = data
            .get(start..start + len)
            .ok_or_else(|| Error::InvalidInput(format!("string of {len} bytes at {start}")))?;
        self.skip(len)?;
        Ok(null_terminated(raw))
    }

    /// Advance past `count` bytes
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.cursor.seek(SeekFrom::Current(count as i64))?;
        Ok(())
    }

    /// Move to an absolute offset inside the record
    pub fn seek_to(&mut self, offset: usize) -> Result<()> {
        self.cursor.seek(SeekFrom::Start(offset as u64))?;
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }
}

/// Interpret `raw` as a string ending at its first NUL byte
pub(crate) fn null_terminated(raw: &[u8]) -> String {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
