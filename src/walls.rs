//! Wall derivation: explicit segments, hole adjacency and the implicit border.
//!
//! The result is a sparse map from cell index to the sides of that cell that cannot be
//! crossed. Every contribution is a bitwise OR, so the three passes never clear a flag
//! set by an earlier one.

use crate::geometry::Grid;
use crate::level::LevelDescriptor;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Blocked sides of a cell (low four bits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WallFlags(u8);

impl WallFlags {
    pub const NONE: WallFlags = WallFlags(0);
    pub const NORTH: WallFlags = WallFlags(0b0001);
    pub const EAST: WallFlags = WallFlags(0b0010);
    pub const SOUTH: WallFlags = WallFlags(0b0100);
    pub const WEST: WallFlags = WallFlags(0b1000);

    /// Keeps only the four direction bits.
    pub fn from_bits_truncate(bits: u8) -> WallFlags {
        WallFlags(bits & 0xF)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: WallFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of blocked sides.
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for WallFlags {
    type Output = WallFlags;

    fn bitor(self, rhs: WallFlags) -> WallFlags {
        WallFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WallFlags {
    fn bitor_assign(&mut self, rhs: WallFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for WallFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [
            (WallFlags::NORTH, 'N'),
            (WallFlags::EAST, 'E'),
            (WallFlags::SOUTH, 'S'),
            (WallFlags::WEST, 'W'),
        ] {
            if self.contains(flag) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Cell index → blocked sides. Only cells with at least one flag are present; iteration
/// is in ascending cell order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallMap {
    cells: BTreeMap<u16, WallFlags>,
}

impl WallMap {
    pub fn new() -> Self {
        WallMap::default()
    }

    /// OR `flags` into `cell`. Empty flags are not stored.
    pub fn add(&mut self, cell: u16, flags: WallFlags) {
        if flags.is_empty() {
            return;
        }
        *self.cells.entry(cell).or_default() |= flags;
    }

    pub fn get(&self, cell: u16) -> WallFlags {
        self.cells.get(&cell).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, WallFlags)> + '_ {
        self.cells.iter().map(|(&c, &f)| (c, f))
    }
}

impl FromIterator<(u16, WallFlags)> for WallMap {
    fn from_iter<I: IntoIterator<Item = (u16, WallFlags)>>(iter: I) -> Self {
        let mut map = WallMap::new();
        for (cell, flags) in iter {
            map.add(cell, flags);
        }
        map
    }
}

/// Build the wall map of a level. Cell indices are assumed to be in range (the parser
/// checks them).
pub fn derive_walls(level: &LevelDescriptor) -> WallMap {
    let grid = level.geometry.grid();
    let warp = level.geometry.warp;
    let mut walls = WallMap::new();
    add_segment_walls(&mut walls, level, &grid, warp);
    add_hole_walls(&mut walls, level, &grid, warp);
    if !warp {
        add_border_walls(&mut walls, level, &grid);
    }
    walls
}

fn add_segment_walls(walls: &mut WallMap, level: &LevelDescriptor, grid: &Grid, warp: bool) {
    for seg in &level.wall_segments {
        let (lo, hi) = (seg.lo as usize, seg.hi as usize);
        let (lo_flag, hi_flag) = if lo + 1 == hi {
            (WallFlags::EAST, WallFlags::WEST)
        } else if warp && grid.is_first_row(lo) && grid.is_last_row(hi) {
            (WallFlags::NORTH, WallFlags::SOUTH)
        } else if warp && grid.is_first_col(lo) && grid.is_last_col(hi) {
            (WallFlags::WEST, WallFlags::EAST)
        } else {
            (WallFlags::SOUTH, WallFlags::NORTH)
        };
        walls.add(seg.lo, lo_flag);
        walls.add(seg.hi, hi_flag);
    }
}

/// Wall the side of each hole's neighbours that faces the hole. Across a board edge the
/// neighbour is the wrapped cell on warp boards and absent otherwise.
fn add_hole_walls(walls: &mut WallMap, level: &LevelDescriptor, grid: &Grid, warp: bool) {
    let total = grid.cell_count();
    let w = grid.width;
    for &hole in &level.holes {
        let h = hole as usize;

        let north = if !grid.is_first_row(h) {
            Some(h - w)
        } else if warp {
            Some(total - (w - h))
        } else {
            None
        };
        let south = if !grid.is_last_row(h) {
            Some(h + w)
        } else if warp {
            Some(h + w - total)
        } else {
            None
        };
        let west = if !grid.is_first_col(h) {
            Some(h - 1)
        } else if warp {
            Some(h + w - 1)
        } else {
            None
        };
        let east = if !grid.is_last_col(h) {
            Some(h + 1)
        } else if warp {
            Some(h + 1 - w)
        } else {
            None
        };

        for (neighbour, facing) in [
            (north, WallFlags::SOUTH),
            (south, WallFlags::NORTH),
            (west, WallFlags::EAST),
            (east, WallFlags::WEST),
        ] {
            if let Some(p) = neighbour {
                add_unless_hole(walls, level, p, facing);
            }
        }
    }
}

fn add_border_walls(walls: &mut WallMap, level: &LevelDescriptor, grid: &Grid) {
    let total = grid.cell_count();
    for x in 0..grid.width {
        add_unless_hole(walls, level, x, WallFlags::NORTH);
        add_unless_hole(walls, level, total - x - 1, WallFlags::SOUTH);
    }
    for y in 0..grid.height {
        let first = grid.index_of(y, 0);
        add_unless_hole(walls, level, first, WallFlags::WEST);
        add_unless_hole(walls, level, first + grid.width - 1, WallFlags::EAST);
    }
}

fn add_unless_hole(walls: &mut WallMap, level: &LevelDescriptor, cell: usize, flags: WallFlags) {
    if level.is_hole(cell) {
        return;
    }
    // Cells come from a board of at most MAX_CELLS, so they always fit.
    if let Ok(cell) = u16::try_from(cell) {
        walls.add(cell, flags);
    }
}
