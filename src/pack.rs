//! Level packs: one text line per level in, length-prefixed records out.
//!
//! A pack blob is a `u32` level count followed, per level, by a `u32` record length and
//! the record itself (all little-endian). Lines that cannot be encoded are skipped and
//! reported, so one bad level does not cost the rest of the pack.

use crate::codec::{count_u32, CodecError, LevelRecord};
use crate::parser::{parse_level, ParseError};
use crate::walls::derive_walls;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info, warn};
use std::io::{BufRead, Cursor, Read, Write};

/// Why a single level line could not be encoded.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("line is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Level {
        line: usize,
        #[source]
        source: LevelError,
    },
    #[error("Codec: {0}")]
    Codec(#[from] CodecError),
    #[error("pack truncated: {0}")]
    Truncated(String),
    #[error("record {index}: declared {declared} bytes, decoded {decoded}")]
    RecordLength {
        index: usize,
        declared: usize,
        decoded: usize,
    },
    #[error("{0} trailing bytes after last record")]
    TrailingBytes(usize),
}

/// Conversion policy for a pack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// Fail on the first malformed line instead of skipping it.
    pub strict: bool,
}

/// A line that produced no record.
#[derive(Debug)]
pub struct SkippedLevel {
    /// 1-based line number in the pack source.
    pub line: usize,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub enum SkipReason {
    Hexagonal,
    Malformed(LevelError),
}

/// Encode one level line. An empty vector means the level is hexagonal and is skipped.
/// `level_index` is the running count of encoded levels, used for diagnostics.
pub fn encode_level(line: &str, level_index: usize) -> Result<Vec<u8>, LevelError> {
    match encode_record(line, level_index)? {
        Some(record) => Ok(record.encode()?),
        None => Ok(Vec::new()),
    }
}

/// Parse and derive one level line into its record. `Ok(None)` for hexagonal boards.
pub fn encode_record(line: &str, level_index: usize) -> Result<Option<LevelRecord>, ParseError> {
    let Some(level) = parse_level(line)? else {
        info!("level {}: skipping hex level", level_index);
        return Ok(None);
    };
    let walls = derive_walls(&level);
    debug!(
        "level {} (file level {}) size: {}x{} colors: {} warp: {} bridges: {} walls: {} holes: {}",
        level_index,
        level.file_level,
        level.geometry.width,
        level.geometry.height,
        level.colors_count(),
        level.geometry.warp,
        level.bridges.len(),
        walls.len(),
        level.holes.len()
    );
    Ok(Some(LevelRecord::new(&level, walls)))
}

/// Encoded records of one pack, in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelPack {
    records: Vec<Vec<u8>>,
}

impl LevelPack {
    pub fn new() -> Self {
        LevelPack::default()
    }

    /// Append an encoded record. Empty records (skip signals) are ignored.
    pub fn push(&mut self, record: Vec<u8>) {
        if !record.is_empty() {
            self.records.push(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Vec<u8>] {
        &self.records
    }

    /// Serialized size of the pack blob.
    pub fn encoded_len(&self) -> usize {
        4 + self.records.iter().map(|r| 4 + r.len()).sum::<usize>()
    }

    /// Write the pack as `count, (len, record)*` and return the bytes written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize, CodecError> {
        w.write_u32::<LittleEndian>(count_u32(self.records.len(), "records")?)?;
        for record in &self.records {
            w.write_u32::<LittleEndian>(count_u32(record.len(), "record bytes")?)?;
            w.write_all(record)?;
        }
        Ok(self.encoded_len())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// Result of converting a pack: the encoded levels and the lines left out.
#[derive(Debug, Default)]
pub struct PackReport {
    pub pack: LevelPack,
    pub skipped: Vec<SkippedLevel>,
}

/// Encode every non-blank line read from `reader`.
pub fn encode_pack<R: BufRead>(reader: R, options: PackOptions) -> Result<PackReport, PackError> {
    let mut report = PackReport::default();
    for (i, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        let line_no = i + 1;
        match encode_line(raw, report.pack.len()) {
            Ok(None) => {}
            Ok(Some(record)) if record.is_empty() => report.skipped.push(SkippedLevel {
                line: line_no,
                reason: SkipReason::Hexagonal,
            }),
            Ok(Some(record)) => report.pack.push(record),
            Err(source) if options.strict => {
                return Err(PackError::Level {
                    line: line_no,
                    source,
                })
            }
            Err(e) => {
                warn!("line {}: skipping malformed level: {}", line_no, e);
                report.skipped.push(SkippedLevel {
                    line: line_no,
                    reason: SkipReason::Malformed(e),
                });
            }
        }
    }
    Ok(report)
}

/// `Ok(None)` for a blank line.
fn encode_line(raw: Vec<u8>, level_index: usize) -> Result<Option<Vec<u8>>, LevelError> {
    let line = String::from_utf8(raw)?;
    if line.trim().is_empty() {
        return Ok(None);
    }
    encode_level(&line, level_index).map(Some)
}

/// Decode a pack blob produced by [`LevelPack::to_bytes`].
pub fn decode_pack(bytes: &[u8]) -> Result<Vec<LevelRecord>, PackError> {
    let mut r = Cursor::new(bytes);
    let count = r
        .read_u32::<LittleEndian>()
        .map_err(|_| PackError::Truncated("level count".to_string()))? as usize;
    let mut levels = Vec::new();
    for index in 0..count {
        let declared = r
            .read_u32::<LittleEndian>()
            .map_err(|_| PackError::Truncated(format!("record {} length", index)))?
            as usize;
        let start = r.position() as usize;
        let end = start
            .checked_add(declared)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| PackError::Truncated(format!("record {} body", index)))?;
        let (record, decoded) = LevelRecord::decode_with_extent(&bytes[start..end])?;
        if decoded != declared {
            return Err(PackError::RecordLength {
                index,
                declared,
                decoded,
            });
        }
        levels.push(record);
        r.set_position(end as u64);
    }
    let mut rest = Vec::new();
    r.read_to_end(&mut rest)?;
    if !rest.is_empty() {
        return Err(PackError::TrailingBytes(rest.len()));
    }
    Ok(levels)
}

/// Pack name for a level-pack file name: the part before the first `.`, without a
/// leading `levelpack_`.
pub fn pack_name(file_name: &str) -> &str {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    stem.strip_prefix("levelpack_").unwrap_or(stem)
}
