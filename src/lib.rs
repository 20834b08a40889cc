//! # flowpack — flow puzzle level packs to bit-packed records
//!
//! Converts the one-line-per-level text format of flow-style puzzle packs (colored
//! endpoints to connect, bridges, holes, walls, optional wrap-around topology) into
//! the compact binary record consumed at runtime.
//!
//! ## Pipeline
//!
//! One text line goes through:
//!
//! 1. [`parser`]: PEST grammar → [`LevelDescriptor`] (dimension token decoded by
//!    [`geometry`], endpoints, bridges, holes, explicit wall segments).
//! 2. [`walls`]: explicit segments, hole adjacency and implicit border → [`WallMap`].
//! 3. [`codec`]: [`LevelRecord`] ⇄ bytes (magic `CLFL`, little-endian, 4-byte aligned).
//!
//! [`pack::encode_level`] runs the whole pipeline for one line and returns an empty
//! vector for hexagonal levels, which are skipped. [`pack::encode_pack`] does it for a
//! whole pack and frames the records with length prefixes.
//!
//! ## Example line
//!
//! ```text
//! 5,0,1,2,12,7_a,3|4;0,1,2;20,21,22,23,24
//! ```
//!
//! A 5x5 board, level 1, two colors, a bridge on cell 12, a hole on cell 7, a wall
//! between cells 3 and 4. Color 0 runs from cell 0 to 2, color 1 from 20 to 24.
//!
//! ## Usage
//!
//! ```ignore
//! let record = flowpack::encode_level("5,0,1,1;0,1,2", 0)?;
//! let level = flowpack::LevelRecord::decode(&record)?;
//! println!("{}", flowpack::dump::render_board(&level));
//! ```

pub mod codec;
pub mod dump;
pub mod geometry;
pub mod level;
pub mod pack;
pub mod parser;
pub mod walls;

pub use codec::{CodecError, LevelRecord};
pub use geometry::{DimensionError, Geometry, Grid};
pub use level::{ColorEndpoints, LevelDescriptor, WallSegment};
pub use pack::{
    decode_pack, encode_level, encode_pack, encode_record, LevelError, LevelPack, PackError,
    PackOptions, PackReport, SkipReason, SkippedLevel,
};
pub use parser::{parse_level, ParseError};
pub use walls::{derive_walls, WallFlags, WallMap};
