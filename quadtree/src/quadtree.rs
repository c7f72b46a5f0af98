//! Point quadtree over shared, moving objects.
//!
//! A node is either a leaf holding a short list of objects or an internal
//! node with four children quartering its box at the center. Leaves split
//! once they hold more than `split_threshold` objects and subtrees collapse
//! back into a leaf below `merge_threshold`; the gap between the two keeps a
//! node from flapping when objects come and go near the limit.
//!
//! Positions outside the root box grow it (see [`Config::expand_factor`]),
//! which drops all structure and lets the tree re-split lazily.

mod config;
mod index;
mod node;
mod position;

pub use config::Config;
pub use index::{QuadIndex, TreeStats};
pub use position::{PositionCell, Positioned};
