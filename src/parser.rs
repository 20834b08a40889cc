//! Parse one level line into a [`LevelDescriptor`] using PEST.

use crate::geometry::{DimensionError, Geometry, MAX_CELLS};
use crate::level::{ColorEndpoints, LevelDescriptor, WallSegment};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::collections::BTreeSet;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct LevelParser;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax: {0}")]
    Syntax(String),
    #[error("Dimension: {0}")]
    Dimension(#[from] DimensionError),
    #[error("number {0:?} out of range")]
    Number(String),
    #[error("{declared} colors declared but only {found} paths present")]
    MissingColorPath { declared: usize, found: usize },
    #[error("color {color} has an empty path")]
    EmptyColorPath { color: usize },
    #[error("color {color} path is a single cell, so it has no end endpoint")]
    SinglePointPath { color: usize },
    #[error("{what} cell {cell} outside board of {cells} cells")]
    CellOutOfRange {
        what: &'static str,
        cell: u32,
        cells: usize,
    },
    #[error("board of {cells} cells exceeds the {max}-cell limit")]
    BoardTooLarge { cells: usize, max: usize },
    #[error("{0} colors exceed the 255-color limit")]
    TooManyColors(u32),
}

/// Parse a level line. Returns `Ok(None)` for hexagonal boards, which are skipped
/// rather than rejected.
pub fn parse_level(line: &str) -> Result<Option<LevelDescriptor>, ParseError> {
    // Hex lines are recognised from the dimension token alone, before the grammar runs.
    let token = line.split([',', ';']).next().unwrap_or_default();
    let Some(geometry) = Geometry::decode(token)? else {
        return Ok(None);
    };
    let cells = geometry.cell_count();
    if cells > MAX_CELLS {
        return Err(ParseError::BoardTooLarge {
            cells,
            max: MAX_CELLS,
        });
    }

    let pairs = LevelParser::parse(Rule::level, line)
        .map_err(|e| ParseError::Syntax(e.to_string()))?;
    let pair = pairs
        .into_iter()
        .next()
        .ok_or_else(|| ParseError::Syntax("empty parse".to_string()))?;
    build_level(pair, geometry).map(Some)
}

#[derive(Default)]
struct Header {
    file_level: u32,
    colors_count: u32,
    bridges: BTreeSet<u16>,
    holes: BTreeSet<u16>,
    wall_segments: BTreeSet<WallSegment>,
}

fn build_level(pair: Pair<Rule>, geometry: Geometry) -> Result<LevelDescriptor, ParseError> {
    let cells = geometry.cell_count();
    let mut header = Header::default();
    let mut paths: Vec<Vec<Pair<Rule>>> = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::header => header = build_header(inner, cells)?,
            Rule::path => paths.push(inner.into_inner().collect()),
            _ => {}
        }
    }

    let declared = header.colors_count as usize;
    if declared > u8::MAX as usize {
        return Err(ParseError::TooManyColors(header.colors_count));
    }
    if paths.len() < declared {
        return Err(ParseError::MissingColorPath {
            declared,
            found: paths.len(),
        });
    }
    // Only the first and last cell of a path are kept; extra path fields are ignored.
    let mut colors = Vec::with_capacity(declared);
    for (color, path) in paths.iter().take(declared).enumerate() {
        let endpoints = match path.as_slice() {
            [] => return Err(ParseError::EmptyColorPath { color }),
            [_] => return Err(ParseError::SinglePointPath { color }),
            [first, .., last] => ColorEndpoints {
                start: parse_cell(first, "endpoint", cells)?,
                end: parse_cell(last, "endpoint", cells)?,
            },
        };
        colors.push(endpoints);
    }

    Ok(LevelDescriptor {
        geometry,
        file_level: header.file_level,
        colors,
        bridges: header.bridges,
        holes: header.holes,
        wall_segments: header.wall_segments,
    })
}

fn build_header(pair: Pair<Rule>, cells: usize) -> Result<Header, ParseError> {
    let mut header = Header::default();
    let mut numbers = 0;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::number => {
                let n = parse_number(&inner)?;
                if numbers == 0 {
                    header.file_level = n;
                } else {
                    header.colors_count = n;
                }
                numbers += 1;
            }
            Rule::bridge_list => {
                for b in inner.into_inner() {
                    header.bridges.insert(parse_cell(&b, "bridge", cells)?);
                }
            }
            Rule::hole_list => {
                for hole in inner.into_inner() {
                    let number = hole
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::number)
                        .ok_or_else(|| ParseError::Syntax("hole: missing cell".to_string()))?;
                    header.holes.insert(parse_cell(&number, "hole", cells)?);
                }
            }
            Rule::wall_list => {
                for wall in inner.into_inner() {
                    let mut it = wall.into_inner();
                    let (lo, hi) = match (it.next(), it.next()) {
                        (Some(lo), Some(hi)) => (lo, hi),
                        _ => return Err(ParseError::Syntax("wall: expected lo|hi".to_string())),
                    };
                    header.wall_segments.insert(WallSegment {
                        lo: parse_cell(&lo, "wall", cells)?,
                        hi: parse_cell(&hi, "wall", cells)?,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(header)
}

fn parse_number(pair: &Pair<Rule>) -> Result<u32, ParseError> {
    pair.as_str()
        .parse()
        .map_err(|_| ParseError::Number(pair.as_str().to_string()))
}

fn parse_cell(pair: &Pair<Rule>, what: &'static str, cells: usize) -> Result<u16, ParseError> {
    let cell = parse_number(pair)?;
    if cell as usize >= cells {
        return Err(ParseError::CellOutOfRange { what, cell, cells });
    }
    u16::try_from(cell).map_err(|_| ParseError::Number(pair.as_str().to_string()))
}
