use thiserror::Error;

/// Recoverable misuse caught before the tree is touched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("bounding box corners must be finite (corner1: ({x1}, {y1}), corner2: ({x2}, {y2}))")]
    InvalidBounds { x1: f64, y1: f64, x2: f64, y2: f64 },
    #[error("position must be finite (x: {x}, y: {y})")]
    InvalidPosition { x: f64, y: f64 },
    #[error("query radius must be finite and non-negative (radius: {radius})")]
    InvalidRadius { radius: f64 },
    #[error("invalid quadtree config: {reason}")]
    InvalidConfig { reason: &'static str },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

/// Broken structural invariant. The tree is corrupt once one of these is
/// observed, so it is never returned as a `Result`; see [`fatal`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("object count would drop below zero at depth {depth}")]
    CountUnderflow { depth: u32 },
    #[error("object not found in the leaf at depth {depth} that ({x}, {y}) routes to")]
    MissingObject { depth: u32, x: f64, y: f64 },
    #[error("node at depth {depth} records {recorded} objects but holds {actual}")]
    CountMismatch {
        depth: u32,
        recorded: usize,
        actual: usize,
    },
    #[error("object at ({x}, {y}) is filed in a quadrant it does not route to")]
    Misfiled { x: f64, y: f64 },
    #[error("object at ({x}, {y}) is filed more than once")]
    Duplicate { x: f64, y: f64 },
    #[error("node at depth {depth} is past the depth limit {max_depth}")]
    TooDeep { depth: u32, max_depth: u32 },
    #[error("index was left corrupt by an earlier invariant violation")]
    Poisoned,
}

/// Aborts the current operation on a corrupt tree.
#[cold]
#[track_caller]
pub(crate) fn fatal(violation: InvariantViolation) -> ! {
    log::error!("quadtree invariant violated: {}", violation);
    panic!("quadtree invariant violated: {}", violation);
}
