//! Hierarchical frontier-based exploration of an unknown 2D grid by a
//! single simulated agent with a limited-range directional sensor. See
//! `SPEC_FULL.md` for the full module map; `controller::explore` is the
//! entry point.

pub mod components;
pub mod constants;
pub mod controller;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod grid;
pub mod heading;
pub mod map_loader;
pub mod planner;
pub mod sensor;
pub mod types;

pub use controller::{explore, ExploreInput, ExploreResult};
pub use error::{ExploreError, Result};
pub use types::{Cell, CellState, ExploreOptions, ExploreOutcome, FrontierStrategy, Heading, HeuristicKind, ProgressEvent};
