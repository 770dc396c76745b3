/// Error taxonomy (spec section 7). Most entries in the taxonomy are
/// surfaced as data — a `None` path, an `ExploreOutcome` variant — rather
/// than as `Err`; `ExploreError` exists for the one unrecoverable case
/// (`InvariantViolation`) and for the ambient ASCII map loader.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExploreError {
    /// A repaired abstract graph would disagree with a from-scratch
    /// rebuild: an edge's transition cells are no longer both walkable,
    /// or a colored-grid entry disagrees with its node's membership.
    /// Defensive; not expected to occur given correct repair (spec 4.5/4.6
    /// maintain this as an invariant). Not recoverable.
    #[error("graph invariant violated: {0}")]
    InvariantViolation(String),

    #[error("failed to load map: {0}")]
    MapLoad(#[from] std::io::Error),

    #[error("malformed map data: {0}")]
    MapFormat(String),
}

pub type Result<T> = std::result::Result<T, ExploreError>;
