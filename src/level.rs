//! Parsed level data, one value per input line.

use crate::geometry::Geometry;
use std::collections::BTreeSet;

/// First and last cell of one color's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEndpoints {
    pub start: u16,
    pub end: u16,
}

/// Explicit wall between two cells; `lo < hi` as written in the level line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallSegment {
    pub lo: u16,
    pub hi: u16,
}

/// Everything a level line describes, before wall derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub geometry: Geometry,
    /// Level number as written in the line (diagnostics only).
    pub file_level: u32,
    /// Indexed by color.
    pub colors: Vec<ColorEndpoints>,
    pub bridges: BTreeSet<u16>,
    pub holes: BTreeSet<u16>,
    pub wall_segments: BTreeSet<WallSegment>,
}

impl LevelDescriptor {
    pub fn colors_count(&self) -> usize {
        self.colors.len()
    }

    pub fn is_hole(&self, cell: usize) -> bool {
        u16::try_from(cell).is_ok_and(|c| self.holes.contains(&c))
    }
}
