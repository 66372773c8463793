//! This library lazily decodes **BSP** map files produced by the id Tech, Source, Call of Duty
//! and related engine families.
//!
//! # BSP Map Format Documentation
//!
//! A BSP file is a small header followed by a directory of *lumps*. Each lump is a region of the
//! file holding one homogeneous array: planes, vertices, faces, an entity text block, and so on.
//! Roughly thirty producers ship incompatible variations of this idea, differing in where the
//! directory starts, how many slots it has, which slot holds which array, and how each record is
//! laid out. This crate identifies the variation with [`MapType`] and keeps every difference in
//! static tables, so one [`Bsp`] type reads all of them.
//!
//! ## Header
//!
//! | Family                 | Identifier           | Version            | Directory                                    |
//! |------------------------|----------------------|--------------------|----------------------------------------------|
//! | Quake, GoldSrc         | none                 | 29, 30 at 0x00     | 15 × {offset, length} at 0x04                |
//! | Nightfire              | none                 | 42 at 0x00         | 18 × {offset, length} at 0x04                |
//! | Quake 2, Daikatana     | `IBSP`               | 38, 41             | {offset, length} at 0x08                     |
//! | Quake 3, RtCW          | `IBSP`               | 46, 47             | 17 × {offset, length} at 0x08                |
//! | Raven                  | `RBSP`               | 1                  | 18 × {offset, length} at 0x08                |
//! | FAKK2, Elite Force 2   | `FAKK`, `EF2!`       | 12, 19, 20         | {offset, length} at 0x0C after a checksum    |
//! | MoH: Allied Assault    | `2015`, `EALA`       | 19, 21             | 28 × {offset, length} at 0x0C                |
//! | Call of Duty           | `IBSP`               | 59                 | 31 × {offset, length} at 0x08                |
//! | Call of Duty 2         | `IBSP`               | 4                  | 39 × {length, offset} at 0x08                |
//! | Call of Duty 4         | `IBSP`               | 22                 | count at 0x08, then {id, length} per lump    |
//! | Source                 | `VBSP`, `PSBV`       | 17 to 23, 27       | 64 × {offset, length, version, fourCC}       |
//! | Left 4 Dead 2          | `VBSP`               | 21                 | 64 × {version, offset, length, fourCC}       |
//! | Titanfall              | `rBSP`               | any                | 128 × {offset, length, version, fourCC}      |
//!
//! - **Identifier**: four ASCII bytes naming the family. Quake and Nightfire have none and start
//!   directly with the version.
//! - **Endianness**: little endian, except Source maps built for consoles, which are identified
//!   by the reversed `PSBV` and store every multi-byte value big endian.
//! - **Call of Duty 4**: only present lumps are listed. Their data follows the directory in
//!   listing order, each lump starting on a four byte boundary.
//! - **Left 4 Dead 2** shares version 21 with other Source games. Its first slot starts with a
//!   lump version, which is always smaller than the 1036 byte header, where every other layout
//!   has an offset past the header.
//!
//! Some headers cannot be told apart: SiN matches Raven, Soldier of Fortune matches Quake 3, and
//! Vindictus and Dark Messiah match ordinary Source versions. Those layouts must be chosen
//! explicitly with [`BspOptions::map_type`] or [`Bsp::set_map_type`].
//!
//! ## Lumps
//!
//! Lumps are addressed by role through [`LumpKind`]. The [`registry`] maps each
//! `(LumpKind, MapType)` pair to a directory slot, or to nothing when the format has no such
//! lump; an absent lump is returned as `Ok(None)`, never as an error.
//!
//! Most lumps are arrays of fixed-size records whose size depends on the format and on the
//! lump's version. Index lists (surface edges, mark surfaces, triangle indices and similar) are
//! arrays of unsigned integers one, two or four bytes wide; the width also comes from the
//! registry and is never guessed from the data.
//!
//! ### Game Lump
//!
//! Source maps store runtime content such as static props in the *game lump*, whose payload is
//! itself a directory:
//!
//! | Offset (bytes) | Field        | Description                                        |
//! |----------------|--------------|----------------------------------------------------|
//! | 0x0000         | Count        | 4 bytes: number of entries                         |
//! | 0x0004         | Id           | 4 bytes: four character code, e.g. `sprp`          |
//! | 0x0008         | Flags        | 2 bytes                                            |
//! | 0x000A         | Version      | 2 bytes: version of the sub-lump                   |
//! | 0x000C         | Offset       | 4 bytes: see below                                 |
//! | 0x0010         | Length       | 4 bytes: length of the sub-lump                    |
//!
//! Offsets are normally relative to the start of the file, but some compilers write them
//! relative to the start of the game lump. When the smallest offset in a directory lies before
//! the game lump itself, every offset of that directory is taken as relative to the game lump.
//!
//! ### Sidecar Lumps
//!
//! Source can override a lump with a `<map>_l_<index>.lmp` file next to the map, and Titanfall
//! stores most lumps in `<map>.bsp.<index>.bsp_lump` files. [`BspReader::open`] looks for
//! both; the resulting [`LumpInfo::lump_file`] records where the data came from.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.bsp`
//! - **Cross references**: records such as faces and leaves address ranges of other lumps by a
//!   start index and count. [`Bsp::referenced`] copies such a range out for any record
//!   implementing [`records::LumpReference`].
//!

pub mod bsp;
pub mod decode;
pub mod error;
pub mod format;
pub mod game_lump;
pub mod lump;
pub mod read;
pub mod records;
pub mod registry;
pub mod static_props;
pub mod types;

pub use bsp::{Bsp, BspOptions};
pub use error::{Error, Result};
pub use format::MapType;
pub use game_lump::{GameLump, GameLumpId};
pub use lump::{Lump, LumpInfo, NumList};
pub use read::{BspReader, MapReader};
pub use registry::{IndexWidth, LumpKind};
pub use static_props::{StaticProp, StaticProps};
