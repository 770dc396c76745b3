/// Connected components within a region (spec section 4.3): 8-connected
/// flood fill over a REGION_SIZE x REGION_SIZE tile, respecting the
/// diagonal-squeeze rule.
use crate::grid::Grid;
use crate::types::{Cell, CellState};

/// Two diagonally adjacent cells (r,c) and (r+dr,c+dc), |dr|=|dc|=1, are
/// connected only if both intervening axial neighbors (r,c+dc) and
/// (r+dr,c) are walkable. Axial neighbors are unconditionally connected.
/// Authoritative everywhere per spec section 9 open question (a): this
/// same function backs component flood fill, abstract-edge construction,
/// and within-component A*.
pub fn diagonally_connected(known: &Grid, a: Cell, b: Cell) -> bool {
    let dr = b.row as i64 - a.row as i64;
    let dc = b.col as i64 - a.col as i64;
    if dr.abs() != 1 || dc.abs() != 1 {
        return true; // not a diagonal step; squeeze rule doesn't apply
    }
    let side1 = Cell::new(a.row, b.col);
    let side2 = Cell::new(b.row, a.col);
    known.try_get(side1) == Some(CellState::Walkable) && known.try_get(side2) == Some(CellState::Walkable)
}

/// True if `a` and `b` are 8-adjacent and, for diagonal pairs, satisfy the
/// squeeze rule.
pub fn are_neighbors(known: &Grid, a: Cell, b: Cell) -> bool {
    let dr = (b.row as i64 - a.row as i64).abs();
    let dc = (b.col as i64 - a.col as i64).abs();
    if dr > 1 || dc > 1 || (dr == 0 && dc == 0) {
        return false;
    }
    diagonally_connected(known, a, b)
}

const OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The maximal 8-connected (squeeze-respecting) walkable components inside
/// one region, in raster discovery order; component ids are dense
/// `0..components.len()`.
pub fn region_components(known: &Grid, region_row: usize, region_col: usize, region_size: usize) -> Vec<Vec<Cell>> {
    let cells = known.region_cells(region_row, region_col, region_size);
    let mut visited = vec![false; cells.len()];
    let index_of = |cell: Cell| -> Option<usize> {
        if cell.row / region_size != region_row || cell.col / region_size != region_col {
            return None;
        }
        let local_r = cell.row % region_size;
        let local_c = cell.col % region_size;
        Some(local_r * region_size + local_c)
    };

    let mut components = Vec::new();
    for &start in &cells {
        let start_idx = index_of(start).unwrap();
        if visited[start_idx] || known.try_get(start) != Some(CellState::Walkable) {
            continue;
        }
        let mut stack = vec![start];
        visited[start_idx] = true;
        let mut members = Vec::new();
        while let Some(cell) = stack.pop() {
            members.push(cell);
            for (dr, dc) in OFFSETS {
                let nr = cell.row as i64 + dr as i64;
                let nc = cell.col as i64 + dc as i64;
                if nr < 0 || nc < 0 {
                    continue;
                }
                let neighbor = Cell::new(nr as usize, nc as usize);
                let Some(n_idx) = index_of(neighbor) else {
                    continue;
                };
                if visited[n_idx] {
                    continue;
                }
                if known.try_get(neighbor) != Some(CellState::Walkable) {
                    continue;
                }
                if !diagonally_connected(known, cell, neighbor) {
                    continue;
                }
                visited[n_idx] = true;
                stack.push(neighbor);
            }
        }
        members.sort();
        components.push(members);
    }
    components
}
