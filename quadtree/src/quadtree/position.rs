use common::shapes::Point;
use parking_lot::Mutex;

/// Position capability of anything stored in a [`QuadIndex`].
///
/// The index routes an object by the position it reads back from it, so
/// `set_position` must only ever be called by the index itself. Moving an
/// object any other way leaves it filed under the wrong quadrant.
///
/// Writes take `&self` because local moves happen while other threads hold
/// the shared lock.
///
/// [`QuadIndex`]: super::QuadIndex
pub trait Positioned: Send + Sync {
    fn position(&self) -> Point;
    fn set_position(&self, pos: Point);
}

/// Position storage that can be embedded in a user type, which then
/// implements [`Positioned`] by delegating to it.
#[derive(Debug, Default)]
pub struct PositionCell {
    pos: Mutex<Point>,
}

impl PositionCell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Positioned for PositionCell {
    #[inline]
    fn position(&self) -> Point {
        *self.pos.lock()
    }

    #[inline]
    fn set_position(&self, pos: Point) {
        *self.pos.lock() = pos;
    }
}
