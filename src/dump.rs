//! Format decoded level records for display: a one-line summary and a text board.
//!
//! The board uses a doubled grid: cell `(row, col)` sits at text position
//! `(2*row + 1, 2*col + 1)` and the positions between cells carry walls.
//!
//! | Glyph | Meaning |
//! |-------|---------|
//! | `.` | open cell |
//! | `0`-`9`, `A`-`Z` | endpoint of the color with that index (`*` past 36 colors) |
//! | `+` | bridge |
//! | blank | hole |
//! | `-`, `\|` | wall on that side |
//! | `~` | open wrap seam (warp boards only) |

use crate::codec::LevelRecord;
use crate::geometry::Grid;
use crate::walls::WallFlags;
use std::collections::BTreeSet;

const COLOR_GLYPHS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `size: WxH colors: N warp: B bridges: N walls: N holes: N`.
pub fn summary(record: &LevelRecord) -> String {
    format!(
        "size: {}x{} colors: {} warp: {} bridges: {} walls: {} holes: {}",
        record.width,
        record.height,
        record.colors.len(),
        record.warp,
        record.bridges.len(),
        record.walls.len(),
        record.holes.len()
    )
}

pub fn color_glyph(color: usize) -> char {
    COLOR_GLYPHS.get(color).map_or('*', |&b| b as char)
}

/// Render the board. Cell indices outside the board are ignored.
pub fn render_board(record: &LevelRecord) -> String {
    let grid = Grid::new(record.width as usize, record.height as usize);
    let rows = 2 * grid.height + 1;
    let cols = 2 * grid.width + 1;
    let mut canvas = vec![vec![' '; cols]; rows];
    let holes: BTreeSet<u16> = record.holes.iter().copied().collect();

    for p in 0..grid.cell_count() {
        if holes.contains(&(p as u16)) {
            continue;
        }
        let (r, c) = grid.row_col_of(p);
        canvas[2 * r + 1][2 * c + 1] = '.';
    }
    for &b in &record.bridges {
        put_cell(&mut canvas, &grid, b, '+');
    }
    for (i, ep) in record.colors.iter().enumerate() {
        let glyph = color_glyph(i);
        put_cell(&mut canvas, &grid, ep.start, glyph);
        put_cell(&mut canvas, &grid, ep.end, glyph);
    }

    if record.warp {
        for p in 0..grid.cell_count() {
            if holes.contains(&(p as u16)) {
                continue;
            }
            let (r, c) = grid.row_col_of(p);
            let flags = record.walls.get(p as u16);
            if grid.is_first_row(p) && !flags.contains(WallFlags::NORTH) {
                canvas[0][2 * c + 1] = '~';
            }
            if grid.is_last_row(p) && !flags.contains(WallFlags::SOUTH) {
                canvas[rows - 1][2 * c + 1] = '~';
            }
            if grid.is_first_col(p) && !flags.contains(WallFlags::WEST) {
                canvas[2 * r + 1][0] = '~';
            }
            if grid.is_last_col(p) && !flags.contains(WallFlags::EAST) {
                canvas[2 * r + 1][cols - 1] = '~';
            }
        }
    }

    for (cell, flags) in record.walls.iter() {
        if cell as usize >= grid.cell_count() {
            continue;
        }
        let (r, c) = grid.row_col_of(cell as usize);
        let (y, x) = (2 * r + 1, 2 * c + 1);
        if flags.contains(WallFlags::NORTH) {
            canvas[y - 1][x] = '-';
        }
        if flags.contains(WallFlags::SOUTH) {
            canvas[y + 1][x] = '-';
        }
        if flags.contains(WallFlags::WEST) {
            canvas[y][x - 1] = '|';
        }
        if flags.contains(WallFlags::EAST) {
            canvas[y][x + 1] = '|';
        }
    }

    let mut out = String::with_capacity(rows * (cols + 1));
    for line in canvas {
        let line: String = line.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn put_cell(canvas: &mut [Vec<char>], grid: &Grid, cell: u16, glyph: char) {
    let p = cell as usize;
    if p >= grid.cell_count() {
        return;
    }
    let (r, c) = grid.row_col_of(p);
    canvas[2 * r + 1][2 * c + 1] = glyph;
}
