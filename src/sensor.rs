/// Sensor and line-of-sight (spec section 4.1). Never mutates state; an
/// empty return is a valid result, never an error.
use crate::grid::Grid;
use crate::types::{Cell, CellState, Heading};

/// Candidate cells, then visible cells after the line-of-sight filter, for
/// an agent at `pos` facing `heading` with the given sensor `range`.
/// `heading` is accepted for API parity with spec section 4.1's signature;
/// the candidate set it describes is the omnidirectional square around the
/// agent, not a cone in front of it (see DESIGN.md).
pub fn visible_cells(pos: Cell, _heading: Heading, range: u32, ground_truth: &Grid) -> Vec<Cell> {
    let range_i = range as i64;
    let range_f = range as f64;
    let mut out = Vec::new();

    let row_lo = pos.row as i64 - range_i;
    let row_hi = pos.row as i64 + range_i;
    let col_lo = pos.col as i64 - range_i;
    let col_hi = pos.col as i64 + range_i;

    for r in row_lo..=row_hi {
        if r < 0 || r as usize >= ground_truth.height {
            continue;
        }
        for c in col_lo..=col_hi {
            if c < 0 || c as usize >= ground_truth.width {
                continue;
            }
            let candidate = Cell::new(r as usize, c as usize);
            if candidate == pos {
                out.push(candidate);
                continue;
            }
            let dr = r - pos.row as i64;
            let dc = c - pos.col as i64;
            if ((dr * dr + dc * dc) as f64).sqrt() > range_f {
                continue;
            }
            if has_line_of_sight(pos, candidate, ground_truth) {
                out.push(candidate);
            }
        }
    }
    out
}

/// True if the integer Bresenham segment from `from` to `to` contains no
/// `Wall` cell strictly between the two endpoints (spec section 4.1 / 8's
/// sensor-soundness invariant).
pub fn has_line_of_sight(from: Cell, to: Cell, ground_truth: &Grid) -> bool {
    for cell in bresenham_line(from, to).into_iter().skip(1) {
        if cell == to {
            break;
        }
        if ground_truth.try_get(cell) == Some(CellState::Wall) {
            return false;
        }
    }
    true
}

/// Integer Bresenham line from `from` to `to`, inclusive of both endpoints.
pub fn bresenham_line(from: Cell, to: Cell) -> Vec<Cell> {
    let mut points = Vec::new();
    let mut x0 = from.col as i64;
    let mut y0 = from.row as i64;
    let x1 = to.col as i64;
    let y1 = to.row as i64;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        points.push(Cell::new(y0 as usize, x0 as usize));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agents_own_cell_is_always_visible() {
        let truth = Grid::new(5, 5, CellState::Walkable);
        let cells = visible_cells(Cell::new(2, 2), Heading::N, 0, &truth);
        assert_eq!(cells, vec![Cell::new(2, 2)]);
    }

    #[test]
    fn wall_occludes_cells_behind_it() {
        let mut truth = Grid::new(5, 1, CellState::Walkable);
        truth.set(Cell::new(0, 2), CellState::Wall);
        let cells = visible_cells(Cell::new(0, 0), Heading::E, 10, &truth);
        assert!(cells.contains(&Cell::new(0, 1)));
        assert!(cells.contains(&Cell::new(0, 2))); // the wall cell itself is visible
        assert!(!cells.contains(&Cell::new(0, 3)));
        assert!(!cells.contains(&Cell::new(0, 4)));
    }

    #[test]
    fn radius_filter_excludes_corners_beyond_euclidean_range() {
        let truth = Grid::new(11, 11, CellState::Walkable);
        let cells = visible_cells(Cell::new(5, 5), Heading::N, 3, &truth);
        // (5,5)+(3,3) is Euclidean distance ~4.24 > 3, must be excluded even
        // though it's within the axis-aligned square.
        assert!(!cells.contains(&Cell::new(8, 8)));
        assert!(cells.contains(&Cell::new(8, 5)));
    }

    #[test]
    fn line_of_sight_is_sound_for_every_visible_cell() {
        let mut truth = Grid::new(15, 15, CellState::Walkable);
        for r in 0..15 {
            truth.set(Cell::new(r, 7), CellState::Wall);
        }
        truth.set(Cell::new(7, 7), CellState::Walkable);
        let cells = visible_cells(Cell::new(7, 0), Heading::E, 20, &truth);
        for cell in &cells {
            assert!(has_line_of_sight(Cell::new(7, 0), *cell, &truth));
        }
    }
}
