//! Board geometry: the composite dimension token and row-major cell indexing.
//!
//! A dimension token is a side length (`"5"`) or a colon pair (`"5:7"`), optionally
//! decorated with two-character markers:
//!
//! | Marker | Position | Meaning |
//! |--------|----------|---------|
//! | `X`    | first char | hexagonal board (unsupported, level is skipped) |
//! | `I?`   | last two chars | ignored flag, stripped and discarded |
//! | `W?`   | first two chars | warp: board wraps top/bottom and left/right |
//! | `?B`   | last two chars | invert: changes how a colon pair is read |
//!
//! A colon pair is read as `width:height` when exactly one of warp/invert is set,
//! and as `height:width` otherwise.

const HEX_MARKER: char = 'X';
const IGNORED_MARKER: char = 'I';
const WARP_MARKER: char = 'W';
const INVERT_MARKER: char = 'B';

/// Cells addressable by the 12-bit position field of an encoded wall entry.
pub const MAX_CELLS: usize = 1 << 12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    #[error("empty dimension token")]
    Empty,
    #[error("marker without dimensions in token {0:?}")]
    DanglingMarker(String),
    #[error("non-numeric dimension {0:?}")]
    NotNumeric(String),
    #[error("expected `N` or `X:Y`, got {0:?}")]
    Shape(String),
    #[error("side length {0} outside 1..=255")]
    SideLength(u32),
}

/// Decoded board shape and topology flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u8,
    pub height: u8,
    pub warp: bool,
    pub invert: bool,
}

impl Geometry {
    /// Decode a dimension token. `Ok(None)` means the board is hexagonal and the level
    /// must be skipped.
    pub fn decode(token: &str) -> Result<Option<Geometry>, DimensionError> {
        let mut dim = token.trim();
        if dim.is_empty() {
            return Err(DimensionError::Empty);
        }
        if dim.starts_with(HEX_MARKER) {
            return Ok(None);
        }
        if dim.ends_with(IGNORED_MARKER) {
            dim = strip_marker_suffix(dim, token)?;
        }
        let mut warp = false;
        if dim.starts_with(WARP_MARKER) {
            dim = strip_marker_prefix(dim, token)?;
            warp = true;
        }
        let mut invert = false;
        if dim.ends_with(INVERT_MARKER) {
            dim = strip_marker_suffix(dim, token)?;
            invert = true;
        }

        let (width, height) = match dim.split_once(':') {
            Some((a, b)) => {
                if b.contains(':') {
                    return Err(DimensionError::Shape(token.to_string()));
                }
                let a = parse_side(a)?;
                let b = parse_side(b)?;
                if warp != invert {
                    (a, b)
                } else {
                    (b, a)
                }
            }
            None => {
                let n = parse_side(dim)?;
                (n, n)
            }
        };

        Ok(Some(Geometry {
            width,
            height,
            warp,
            invert,
        }))
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.width as usize, self.height as usize)
    }
}

fn parse_side(s: &str) -> Result<u8, DimensionError> {
    let s = s.trim();
    let n: u32 = s
        .parse()
        .map_err(|_| DimensionError::NotNumeric(s.to_string()))?;
    match u8::try_from(n) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(DimensionError::SideLength(n)),
    }
}

/// Drop the last two characters of `dim`.
fn strip_marker_suffix<'a>(dim: &'a str, token: &str) -> Result<&'a str, DimensionError> {
    match dim.char_indices().rev().nth(1) {
        Some((i, _)) => Ok(&dim[..i]),
        None => Err(DimensionError::DanglingMarker(token.to_string())),
    }
}

/// Drop the first two characters of `dim`.
fn strip_marker_prefix<'a>(dim: &'a str, token: &str) -> Result<&'a str, DimensionError> {
    let mut chars = dim.char_indices().skip(1);
    match chars.next() {
        Some((i, c)) => Ok(&dim[i + c.len_utf8()..]),
        None => Err(DimensionError::DanglingMarker(token.to_string())),
    }
}

/// Row-major index arithmetic and boundary predicates for a `width` x `height` board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_first_row(&self, p: usize) -> bool {
        p < self.width
    }

    pub fn is_last_row(&self, p: usize) -> bool {
        p >= self.width * (self.height - 1)
    }

    pub fn is_first_col(&self, p: usize) -> bool {
        p % self.width == 0
    }

    pub fn is_last_col(&self, p: usize) -> bool {
        p % self.width == self.width - 1
    }

    /// `(row, col)` of cell `p`.
    pub fn row_col_of(&self, p: usize) -> (usize, usize) {
        (p / self.width, p % self.width)
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }
}
