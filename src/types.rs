/// Shared data types for the exploration engine: grid cells, headings,
/// abstract-graph node ids, and the configuration/result types that make up
/// the explorer's external surface (spec section 6).
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::*;

/// The state of a single grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CellState {
    Walkable,
    Wall,
    Unknown,
}

/// A grid coordinate, row-major, origin at the top-left.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        (self.row as i64 - other.row as i64).unsigned_abs() as u32
            + (self.col as i64 - other.col as i64).unsigned_abs() as u32
    }

    pub fn chebyshev(self, other: Cell) -> u32 {
        ((self.row as i64 - other.row as i64).unsigned_abs())
            .max((self.col as i64 - other.col as i64).unsigned_abs()) as u32
    }

    pub fn euclidean(self, other: Cell) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }

    /// The region (region_row, region_col) this cell falls into, given a
    /// region side length.
    pub fn region(self, region_size: usize) -> (usize, usize) {
        (self.row / region_size, self.col / region_size)
    }
}

/// The agent's heading, one of eight compass directions. `to_index`/
/// `from_index` give the 0..8 encoding used by rotation arithmetic (spec
/// section 4.10).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Heading {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Heading {
    pub const ALL: [Heading; 8] = [
        Heading::N,
        Heading::NE,
        Heading::E,
        Heading::SE,
        Heading::S,
        Heading::SW,
        Heading::W,
        Heading::NW,
    ];

    pub fn to_index(self) -> i32 {
        match self {
            Heading::N => 0,
            Heading::NE => 1,
            Heading::E => 2,
            Heading::SE => 3,
            Heading::S => 4,
            Heading::SW => 5,
            Heading::W => 6,
            Heading::NW => 7,
        }
    }

    pub fn from_index(idx: i32) -> Heading {
        Self::ALL[idx.rem_euclid(8) as usize]
    }

    /// Row/col delta for a unit step in this heading.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::N => (-1, 0),
            Heading::NE => (-1, 1),
            Heading::E => (0, 1),
            Heading::SE => (1, 1),
            Heading::S => (1, 0),
            Heading::SW => (1, -1),
            Heading::W => (0, -1),
            Heading::NW => (-1, -1),
        }
    }

    /// The heading whose delta most closely matches the given step,
    /// snapping to the nearest of the eight axial/diagonal directions.
    pub fn from_delta(dr: i32, dc: i32) -> Heading {
        Self::ALL
            .iter()
            .copied()
            .min_by_key(|h| {
                let (hr, hc) = h.delta();
                let ang = |r: i32, c: i32| (r as f64).atan2(c as f64);
                let a = ang(dr, dc);
                let b = ang(hr, hc);
                let mut diff = (a - b).abs();
                if diff > std::f64::consts::PI {
                    diff = 2.0 * std::f64::consts::PI - diff;
                }
                (diff * 1_000_000.0) as i64
            })
            .unwrap_or(Heading::N)
    }
}

/// Which distance metric an operation is configured to use.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum HeuristicKind {
    Manhattan,
    Chebyshev,
    /// Octile distance, admissible for 8-connected grids with unit axial /
    /// sqrt(2) diagonal costs. See SPEC_FULL.md section 4 and DESIGN.md for
    /// why this is offered alongside the two the spec names.
    Octile,
}

/// Which cell in a frontier group is reported as its target.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FrontierStrategy {
    Nearest,
    Centroid,
    Median,
}

/// The identity of an abstract-graph node: a component local to one region.
/// Packs into a single u64 for use as a dense/hash key (see DESIGN.md's
/// note on the spec's string-keyed node ids).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId {
    pub region_row: u32,
    pub region_col: u32,
    pub local: u32,
}

impl NodeId {
    pub fn new(region_row: usize, region_col: usize, local: usize) -> Self {
        Self {
            region_row: region_row as u32,
            region_col: region_col as u32,
            local: local as u32,
        }
    }

    pub fn region(self) -> (usize, usize) {
        (self.region_row as usize, self.region_col as usize)
    }

    pub fn key(self) -> u64 {
        (self.region_row as u64) << 40 | (self.region_col as u64) << 16 | self.local as u64
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}_{}", self.region_row, self.region_col, self.local)
    }
}

/// A cross-boundary cell pair realizing an abstract-graph edge.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Transition {
    pub from_cell: Cell,
    pub to_cell: Cell,
}

/// Caller-supplied exploration options (spec section 6). Out-of-range
/// values are clamped into range by `ExploreOptions::normalized` rather
/// than rejected; see DESIGN.md for why the core never panics on
/// caller-supplied configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreOptions {
    pub sensor_range: u32,
    pub step_size: f64,
    pub max_iter: usize,
    pub coverage_threshold: f64,
    pub use_wfd: bool,
    pub frontier_strategy: FrontierStrategy,
    pub target_switch_cooldown: u32,
    pub scan_360: bool,
    pub delay_ms: u64,
    pub region_size: usize,
    pub heuristic: HeuristicKind,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            sensor_range: DEFAULT_SENSOR_RANGE,
            step_size: DEFAULT_STEP_SIZE,
            max_iter: DEFAULT_MAX_ITER,
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            use_wfd: DEFAULT_USE_WFD,
            frontier_strategy: FrontierStrategy::Median,
            target_switch_cooldown: DEFAULT_TARGET_SWITCH_COOLDOWN,
            scan_360: DEFAULT_SCAN_360,
            delay_ms: DEFAULT_DELAY_MS,
            region_size: DEFAULT_REGION_SIZE,
            heuristic: HeuristicKind::Manhattan,
        }
    }
}

impl ExploreOptions {
    /// Clamp every field into the range spec section 6 declares for it.
    pub fn normalized(mut self) -> Self {
        self.sensor_range = self.sensor_range.clamp(MIN_SENSOR_RANGE, MAX_SENSOR_RANGE);
        self.step_size = self.step_size.clamp(MIN_STEP_SIZE, MAX_STEP_SIZE);
        self.max_iter = self.max_iter.clamp(MIN_MAX_ITER, MAX_MAX_ITER);
        self.coverage_threshold = self
            .coverage_threshold
            .clamp(MIN_COVERAGE_THRESHOLD, MAX_COVERAGE_THRESHOLD);
        self.target_switch_cooldown = self
            .target_switch_cooldown
            .clamp(MIN_TARGET_SWITCH_COOLDOWN, MAX_TARGET_SWITCH_COOLDOWN);
        if self.region_size == 0 {
            self.region_size = DEFAULT_REGION_SIZE;
        }
        self
    }
}

/// Bounded FIFO of recently-targeted frontier cells (spec section 3).
#[derive(Clone, Debug, Default)]
pub struct RecentTargets {
    history: VecDeque<Cell>,
}

impl RecentTargets {
    pub fn push(&mut self, cell: Cell) {
        self.history.push_back(cell);
        while self.history.len() > RECENT_TARGET_HISTORY_LEN {
            self.history.pop_front();
        }
    }

    /// The most recent `n` entries, most-recent first.
    pub fn recent(&self, n: usize) -> Vec<Cell> {
        self.history.iter().rev().take(n).copied().collect()
    }

    pub fn contains_in(&self, cell: Cell, n: usize) -> bool {
        self.recent(n).contains(&cell)
    }
}

/// Live agent state: position, heading, trajectory, and target-selection
/// bookkeeping (spec section 3).
#[derive(Clone, Debug)]
pub struct AgentState {
    pub position: Cell,
    pub heading: Heading,
    pub trajectory: Vec<Cell>,
    pub current_target: Option<Cell>,
    pub recent_targets: RecentTargets,
    pub last_switch_iteration: Option<usize>,
}

impl AgentState {
    pub fn new(start: Cell, heading: Heading) -> Self {
        Self {
            position: start,
            heading,
            trajectory: vec![start],
            current_target: None,
            recent_targets: RecentTargets::default(),
            last_switch_iteration: None,
        }
    }
}

/// Per-run counters, the structured analogue of the teacher's per-tick
/// println summaries.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Metrics {
    pub iterations: usize,
    pub replans: usize,
    pub abandonments: usize,
    pub full_scans: usize,
    pub final_coverage: f64,
}

/// Why the explorer stopped.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub enum ExploreOutcome {
    CoverageReached,
    NoFrontier,
    NoReachableFrontier,
    IterationCap,
}

/// Per-iteration event delivered to an optional progress callback (spec
/// section 6's Explorer API: "agent state, coverage, iteration count,
/// current planned path, current target, and a snapshot of the known
/// map"). The callback must not mutate controller state (spec section 5);
/// it only ever sees shared references.
#[derive(Clone, Debug)]
pub struct ProgressEvent<'a> {
    pub iteration: usize,
    pub coverage: f64,
    pub agent_position: Cell,
    pub agent_heading: Heading,
    pub planned_path: Option<&'a [Cell]>,
    pub current_target: Option<Cell>,
    pub known_map: &'a crate::grid::Grid,
}
