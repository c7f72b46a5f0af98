pub mod error;
pub mod quadtree;

pub use common::shapes::{BoundingBox, Point};
pub use error::{InvariantViolation, QuadtreeError, QuadtreeResult};
pub use quadtree::{Config, PositionCell, Positioned, QuadIndex, TreeStats};
