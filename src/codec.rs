//! Encode/decode the bit-packed level record.
//!
//! Layout (little-endian, no implicit alignment):
//!
//! | Field | Size |
//! |-------|------|
//! | magic `CLFL` | 4 |
//! | width, height, colors count | 1 each |
//! | warp | 1 (0 or 1) |
//! | bridge count, hole count, wall count | 4 each |
//! | per color: start cell, end cell | 2 + 2 |
//! | bridges, ascending | 2 each |
//! | holes, ascending | 2 each |
//! | walls, ascending by cell: `flags << 12 \| cell` | 2 each |
//! | zero padding to a multiple of 4 | 0..=3 |

use crate::level::{ColorEndpoints, LevelDescriptor};
use crate::walls::{WallFlags, WallMap};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

pub const MAGIC: [u8; 4] = *b"CLFL";
pub const HEADER_LEN: usize = 20;
pub const RECORD_ALIGN: usize = 4;

const CELL_MASK: u16 = 0x0FFF;
const FLAGS_SHIFT: u32 = 12;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad magic: {0:02x?}")]
    BadMagic([u8; 4]),
    #[error("Count overflow: {0}")]
    CountOverflow(String),
    #[error("Record padding truncated: {0} byte(s) missing")]
    MissingPadding(usize),
}

/// One level as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRecord {
    pub width: u8,
    pub height: u8,
    pub warp: bool,
    pub colors: Vec<ColorEndpoints>,
    /// Ascending.
    pub bridges: Vec<u16>,
    /// Ascending.
    pub holes: Vec<u16>,
    pub walls: WallMap,
}

impl LevelRecord {
    /// Assemble a record from a parsed level and its derived walls.
    pub fn new(level: &LevelDescriptor, walls: WallMap) -> Self {
        LevelRecord {
            width: level.geometry.width,
            height: level.geometry.height,
            warp: level.geometry.warp,
            colors: level.colors.clone(),
            bridges: level.bridges.iter().copied().collect(),
            holes: level.holes.iter().copied().collect(),
            walls,
        }
    }

    /// Encoded size including alignment padding.
    pub fn encoded_len(&self) -> usize {
        self.unpadded_len().next_multiple_of(RECORD_ALIGN)
    }

    fn unpadded_len(&self) -> usize {
        HEADER_LEN
            + self.colors.len() * 4
            + (self.bridges.len() + self.holes.len() + self.walls.len()) * 2
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Write the record, padding included, and return the number of bytes written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize, CodecError> {
        let colors = u8::try_from(self.colors.len())
            .map_err(|_| CodecError::CountOverflow(format!("{} colors", self.colors.len())))?;
        w.write_all(&MAGIC)?;
        w.write_u8(self.width)?;
        w.write_u8(self.height)?;
        w.write_u8(colors)?;
        w.write_u8(u8::from(self.warp))?;
        w.write_u32::<LittleEndian>(count_u32(self.bridges.len(), "bridges")?)?;
        w.write_u32::<LittleEndian>(count_u32(self.holes.len(), "holes")?)?;
        w.write_u32::<LittleEndian>(count_u32(self.walls.len(), "walls")?)?;

        for c in &self.colors {
            w.write_u16::<LittleEndian>(c.start)?;
            w.write_u16::<LittleEndian>(c.end)?;
        }
        for &b in &self.bridges {
            w.write_u16::<LittleEndian>(b)?;
        }
        for &h in &self.holes {
            w.write_u16::<LittleEndian>(h)?;
        }
        for (cell, flags) in self.walls.iter() {
            w.write_u16::<LittleEndian>(pack_wall(cell, flags))?;
        }

        let len = self.encoded_len();
        w.write_all(&[0u8; RECORD_ALIGN][..len - self.unpadded_len()])?;
        Ok(len)
    }

    /// Decode one record from the start of `bytes`. Trailing bytes past the padded
    /// record are left alone; see [`LevelRecord::decode_with_extent`] for the size consumed.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::decode_with_extent(bytes).map(|(record, _)| record)
    }

    /// Decode one record and return it with the number of bytes it occupies, padding
    /// included. The alignment padding must be present in `bytes`.
    pub fn decode_with_extent(bytes: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut r = Cursor::new(bytes);
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(CodecError::BadMagic(magic));
        }
        let width = r.read_u8()?;
        let height = r.read_u8()?;
        let colors_count = r.read_u8()?;
        let warp = r.read_u8()? != 0;
        let bridges_count = r.read_u32::<LittleEndian>()? as usize;
        let holes_count = r.read_u32::<LittleEndian>()? as usize;
        let walls_count = r.read_u32::<LittleEndian>()? as usize;

        let mut colors = Vec::with_capacity(colors_count as usize);
        for _ in 0..colors_count {
            let start = r.read_u16::<LittleEndian>()?;
            let end = r.read_u16::<LittleEndian>()?;
            colors.push(ColorEndpoints { start, end });
        }
        let bridges = read_cells(&mut r, bridges_count)?;
        let holes = read_cells(&mut r, holes_count)?;
        let mut walls = WallMap::new();
        for _ in 0..walls_count {
            let (cell, flags) = unpack_wall(r.read_u16::<LittleEndian>()?);
            walls.add(cell, flags);
        }

        let consumed = (r.position() as usize).next_multiple_of(RECORD_ALIGN);
        if consumed > bytes.len() {
            return Err(CodecError::MissingPadding(consumed - bytes.len()));
        }
        let record = LevelRecord {
            width,
            height,
            warp,
            colors,
            bridges,
            holes,
            walls,
        };
        Ok((record, consumed))
    }
}

pub(crate) fn count_u32(n: usize, what: &str) -> Result<u32, CodecError> {
    u32::try_from(n).map_err(|_| CodecError::CountOverflow(format!("{} {}", n, what)))
}

fn read_cells(r: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<u16>, CodecError> {
    // Counts come from untrusted input: bound the allocation by what is left.
    let remaining = r.get_ref().len().saturating_sub(r.position() as usize) / 2;
    let mut out = Vec::with_capacity(count.min(remaining));
    for _ in 0..count {
        out.push(r.read_u16::<LittleEndian>()?);
    }
    Ok(out)
}

/// Wall entry: direction flags in bits 12..16, cell index in bits 0..12.
pub fn pack_wall(cell: u16, flags: WallFlags) -> u16 {
    ((flags.bits() as u16) << FLAGS_SHIFT) | (cell & CELL_MASK)
}

pub fn unpack_wall(v: u16) -> (u16, WallFlags) {
    (
        v & CELL_MASK,
        WallFlags::from_bits_truncate((v >> FLAGS_SHIFT) as u8),
    )
}
