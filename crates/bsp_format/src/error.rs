//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::registry::LumpKind;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// The file header does not match any known map format
    #[error("unknown map format (magic {magic:02x?}, version {version})")]
    UnknownFormat { magic: [u8; 4], version: i32 },

    /// Content was required but missing, or a header was too short to parse
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A directory slot past the end of the format's directory was requested
    #[error("directory index {index} is out of range for a directory of {size} slots")]
    OutOfRange { index: usize, size: usize },

    /// A lump descriptor points past the end of the backing file
    #[error("lump at offset {offset} with length {length} exceeds file size {size}")]
    OutOfBounds { offset: u64, length: u64, size: u64 },

    /// A start/count pair does not fit inside the referenced lump
    #[error("reference [{start}, {start} + {count}) exceeds the {len} elements of {kind}")]
    ReferenceOutOfRange {
        kind: LumpKind,
        start: usize,
        count: usize,
        len: usize,
    },

    /// A record type was asked for a lump it does not reference or hold
    #[error("{object} does not reference the {kind} lump")]
    Configuration { object: &'static str, kind: LumpKind },

    /// A lump is not a whole number of records
    #[error("{kind} lump length {length} is not a multiple of its {record_size} byte records")]
    MalformedRecordLength {
        kind: LumpKind,
        length: usize,
        record_size: usize,
    },

    /// A game lump directory lists the same sub-identifier twice
    #[error("game lump {0} appears more than once")]
    DuplicateGameLump(crate::game_lump::GameLumpId),

    /// The reader lock was poisoned by a panicking thread
    #[error("the map reader lock was poisoned")]
    ReaderPoisoned,

    /// A failure while decoding one semantic lump
    #[error("unable to decode the {kind} lump")]
    Lump {
        kind: LumpKind,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attribute this error to the decoding of `kind`
    pub(crate) fn in_lump(self, kind: LumpKind) -> Self {
        match self {
            err @ Error::Lump { .. } => err,
            err => Error::Lump {
                kind,
                source: Box::new(err),
            },
        }
    }

    /// The error behind any [`Error::Lump`] wrapping
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Lump { source, .. } = err {
            err = source;
        }
        err
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
