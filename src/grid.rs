/// Grid model (spec section 3, section 4.2): a dense SIZE x SIZE array of
/// cell states, shared by the ground-truth grid and the agent's known map.
use crate::error::{ExploreError, Result};
use crate::types::{Cell, CellState};

/// A dense rectangular grid of cell states. Used both as the read-only
/// ground truth and as the agent's known map (spec section 3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: CellState) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// An all-`Unknown` grid the same shape as `other`, the known map's
    /// initial state (spec section 3: "initial value UNKNOWN everywhere").
    pub fn blank_like(other: &Grid) -> Self {
        Self::new(other.width, other.height, CellState::Unknown)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    pub fn get(&self, cell: Cell) -> CellState {
        self.cells[cell.row * self.width + cell.col]
    }

    pub fn try_get(&self, cell: Cell) -> Option<CellState> {
        if self.in_bounds(cell) {
            Some(self.get(cell))
        } else {
            None
        }
    }

    pub fn set(&mut self, cell: Cell, state: CellState) {
        let idx = cell.row * self.width + cell.col;
        self.cells[idx] = state;
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.try_get(cell) == Some(CellState::Walkable)
    }

    /// Region side length must divide the grid evenly (spec section 3).
    pub fn check_region_size(&self, region_size: usize) -> Result<()> {
        if region_size == 0 || self.width % region_size != 0 || self.height % region_size != 0 {
            return Err(ExploreError::MapFormat(format!(
                "grid {}x{} is not divisible by region size {}",
                self.width, self.height, region_size
            )));
        }
        Ok(())
    }

    pub fn region_count(&self, region_size: usize) -> (usize, usize) {
        (self.height / region_size, self.width / region_size)
    }

    /// Every cell in the given region, in raster order.
    pub fn region_cells(&self, region_row: usize, region_col: usize, region_size: usize) -> Vec<Cell> {
        let mut out = Vec::with_capacity(region_size * region_size);
        for dr in 0..region_size {
            for dc in 0..region_size {
                out.push(Cell::new(region_row * region_size + dr, region_col * region_size + dc));
            }
        }
        out
    }

    /// Fraction of ground-truth-walkable cells that are walkable in this
    /// grid, used as `self` = known map against `ground_truth` (spec 4.8
    /// step 2).
    pub fn coverage(&self, ground_truth: &Grid) -> f64 {
        let mut total = 0usize;
        let mut known = 0usize;
        for (idx, gt) in ground_truth.cells.iter().enumerate() {
            if *gt == CellState::Walkable {
                total += 1;
                if self.cells[idx] == CellState::Walkable {
                    known += 1;
                }
            }
        }
        if total == 0 {
            100.0
        } else {
            100.0 * known as f64 / total as f64
        }
    }

    pub fn cells_iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, c)| (Cell::new(idx / width, idx % width), *c))
    }
}

/// Reveal every visible cell not yet known, copying its ground-truth state
/// into `known`. Returns the cells that transitioned out of `Unknown`
/// (spec section 4.2). Idempotent in the absence of new observations: a
/// re-sense over already-known cells returns an empty `new_cells`.
pub fn update_known(known: &mut Grid, ground_truth: &Grid, visible: &[Cell]) -> Vec<(Cell, CellState)> {
    let mut new_cells = Vec::new();
    for &cell in visible {
        if known.try_get(cell) == Some(CellState::Unknown) {
            let truth = ground_truth.get(cell);
            known.set(cell, truth);
            new_cells.push((cell, truth));
        }
    }
    new_cells
}
