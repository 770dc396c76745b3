/// Constants used throughout the exploration engine

/// Default grid side length. SIZE must be divisible by REGION_SIZE.
pub const DEFAULT_SIZE: usize = 256;

/// Default region (cluster) side length for the abstraction hierarchy.
pub const DEFAULT_REGION_SIZE: usize = 16;

/// Sensor range bounds, in cells.
pub const MIN_SENSOR_RANGE: u32 = 5;
pub const MAX_SENSOR_RANGE: u32 = 30;
pub const DEFAULT_SENSOR_RANGE: u32 = 15;

/// Step size bounds, in cells per iteration.
pub const MIN_STEP_SIZE: f64 = 0.5;
pub const MAX_STEP_SIZE: f64 = 2.0;
pub const DEFAULT_STEP_SIZE: f64 = 1.0;

/// Iteration cap bounds.
pub const MIN_MAX_ITER: usize = 100;
pub const MAX_MAX_ITER: usize = 50_000;
pub const DEFAULT_MAX_ITER: usize = 10_000;

/// Coverage threshold bounds, in percent.
pub const MIN_COVERAGE_THRESHOLD: f64 = 80.0;
pub const MAX_COVERAGE_THRESHOLD: f64 = 100.0;
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 100.0;

pub const DEFAULT_USE_WFD: bool = true;
pub const DEFAULT_TARGET_SWITCH_COOLDOWN: u32 = 5;
pub const MIN_TARGET_SWITCH_COOLDOWN: u32 = 0;
pub const MAX_TARGET_SWITCH_COOLDOWN: u32 = 20;
pub const DEFAULT_SCAN_360: bool = true;
pub const DEFAULT_DELAY_MS: u64 = 50;

/// Diagonal step cost, used by within-component A* and path-admissibility checks.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;
pub const AXIAL_COST: f64 = 1.0;

/// Frontier grouping distance: two frontier cells join the same group when
/// their Euclidean distance is strictly less than this.
pub const FRONTIER_GROUP_DISTANCE: f64 = 2.0;

/// Frontiers within this Manhattan distance of the agent are discarded as
/// already visited.
pub const FRONTIER_MIN_AGENT_DISTANCE: f64 = 1.5;

/// Bounded FIFO length for the agent's recently-targeted-frontier history.
pub const RECENT_TARGET_HISTORY_LEN: usize = 20;
pub const RECENT_TARGET_ANTI_YOYO_SLICE: usize = 5;
pub const RECENT_TARGET_ABANDON_EXCLUDE_SLICE: usize = 3;
