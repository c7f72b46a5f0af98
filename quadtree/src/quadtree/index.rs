use super::node::Node;
use super::{Config, Positioned};
use crate::error::{fatal, InvariantViolation, QuadtreeError, QuadtreeResult};
use common::shapes::{BoundingBox, Point};
use fxhash::FxHashSet;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shape of the tree at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub objects: usize,
    pub nodes: usize,
    pub leaves: usize,
    /// Deepest node present, the root being 0.
    pub depth: u32,
}

/// Thread-safe point quadtree answering "everything within `r` of `p`".
///
/// Objects are shared with the index as `Arc<T>` and identified by pointer,
/// never by position. The whole tree sits behind one reader/writer lock:
/// inserts, removals and moves that change quadrant take it exclusively,
/// queries and moves that stay inside their leaf share it.
///
/// The index writes each object's position through [`Positioned`] and
/// relies on nobody else doing so.
///
/// A panic while the exclusive lock is held poisons the index: every later
/// operation panics too instead of running on a half-updated tree.
pub struct QuadIndex<T: ?Sized> {
    root: RwLock<Node<T>>,
    config: Config,
    len: AtomicUsize,
    poisoned: AtomicBool,
}

/// Poisons the index if dropped while a panic unwinds out of a write.
struct PoisonOnUnwind<'a>(&'a AtomicBool);

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.store(true, Ordering::Release);
        }
    }
}

impl<T: Positioned + ?Sized> QuadIndex<T> {
    pub fn new(corner1: impl Into<Point>, corner2: impl Into<Point>) -> QuadtreeResult<Self> {
        Self::with_config(corner1, corner2, Config::default())
    }

    /// Creates an index covering the box between two opposite corners. The
    /// corners need not be ordered.
    pub fn with_config(
        corner1: impl Into<Point>,
        corner2: impl Into<Point>,
        config: Config,
    ) -> QuadtreeResult<Self> {
        config.validate()?;
        let (c1, c2) = (corner1.into(), corner2.into());
        if !c1.is_finite() || !c2.is_finite() {
            return Err(QuadtreeError::InvalidBounds {
                x1: c1.x,
                y1: c1.y,
                x2: c2.x,
                y2: c2.y,
            });
        }
        let bounds = BoundingBox::new(c1, c2);
        log::debug!("created quadtree index over {:?} with {:?}", bounds, config);
        Ok(Self {
            root: RwLock::new(Node::new_leaf(bounds, 0)),
            config,
            len: AtomicUsize::new(0),
            poisoned: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stores `pos` in `object` and files it, growing the box if needed.
    pub fn insert(&self, object: Arc<T>, pos: impl Into<Point>) -> QuadtreeResult<()> {
        let pos = checked_position(pos.into())?;
        let (mut root, _poison) = self.write();
        object.set_position(pos);
        self.expand_to_include(&mut root, &pos);
        root.add(object, pos, &self.config);
        self.len.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Removes `object` from wherever its recorded position files it.
    ///
    /// # Panics
    ///
    /// If `object` is not in the index, or its position was changed behind
    /// the index's back. The index is poisoned after either.
    pub fn remove(&self, object: &Arc<T>) {
        let (mut root, _poison) = self.write();
        let pos = object.position();
        root.remove(object, pos, &self.config);
        self.len.fetch_sub(1, Ordering::Release);
    }

    /// Moves `object` to `new_pos`.
    ///
    /// Under the shared lock, checks whether `new_pos` lands in the leaf the
    /// object already sits in; if so only the stored position changes. Any
    /// other move is redone as remove then insert under the exclusive lock.
    ///
    /// # Panics
    ///
    /// If `object` is not in the index.
    pub fn relocate(&self, object: &Arc<T>, new_pos: impl Into<Point>) -> QuadtreeResult<()> {
        let new_pos = checked_position(new_pos.into())?;
        {
            let root = self.read();
            if root.bounds().contains_point(&new_pos) && root.present_at(object, new_pos) {
                object.set_position(new_pos);
                return Ok(());
            }
        }

        let (mut root, _poison) = self.write();
        let old_pos = object.position();
        root.remove(object, old_pos, &self.config);
        object.set_position(new_pos);
        self.expand_to_include(&mut root, &new_pos);
        root.add(Arc::clone(object), new_pos, &self.config);
        Ok(())
    }

    /// Every object whose squared distance to `pos` is at most `radius²`,
    /// each at most once, in no particular order.
    pub fn find_near(&self, pos: impl Into<Point>, radius: f64) -> QuadtreeResult<Vec<Arc<T>>> {
        let mut found = Vec::new();
        self.find_near_into(pos, radius, &mut found)?;
        Ok(found)
    }

    /// Like [`find_near`](Self::find_near), appending to a caller-owned
    /// buffer so it can be reused every tick.
    pub fn find_near_into(
        &self,
        pos: impl Into<Point>,
        radius: f64,
        found: &mut Vec<Arc<T>>,
    ) -> QuadtreeResult<()> {
        let pos = checked_position(pos.into())?;
        if !radius.is_finite() || radius < 0.0 {
            return Err(QuadtreeError::InvalidRadius { radius });
        }
        self.read().find_near(pos, radius, found);
        Ok(())
    }

    /// Lock-free; only a hint while other threads are mutating.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lock-free object count.
    pub fn len(&self) -> usize {
        self.ensure_sound();
        self.len.load(Ordering::Acquire)
    }

    /// True once a broken invariant has been hit under the exclusive lock.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    pub fn bounds(&self) -> BoundingBox {
        self.read().bounds()
    }

    /// Full-tree search by identity, regardless of position. Slow.
    pub fn contains(&self, object: &Arc<T>) -> bool {
        self.read().search(object)
    }

    /// Snapshot of every tracked object.
    pub fn objects(&self) -> Vec<Arc<T>> {
        let root = self.read();
        let mut objects = Vec::with_capacity(root.count());
        root.for_each_object(&mut |o| objects.push(Arc::clone(o)));
        objects
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.read().accumulate_stats(&mut stats);
        stats
    }

    /// Walks the whole tree and reports the first broken invariant: a count
    /// that disagrees with the contents, an object filed twice, or an object
    /// sitting in a leaf its position does not route to.
    /// A poisoned index reports [`InvariantViolation::Poisoned`].
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let root = self.root.read();
        if self.is_poisoned() {
            return Err(InvariantViolation::Poisoned);
        }
        root.validate(&self.config, &mut FxHashSet::default())?;
        let recorded = self.len.load(Ordering::Acquire);
        if recorded != root.count() {
            return Err(InvariantViolation::CountMismatch {
                depth: 0,
                recorded,
                actual: root.count(),
            });
        }
        let mut misfiled = None;
        root.for_each_object(&mut |o| {
            let pos = o.position();
            if misfiled.is_none() && !root.present_at(o, pos) {
                misfiled = Some(InvariantViolation::Misfiled { x: pos.x, y: pos.y });
            }
        });
        misfiled.map_or(Ok(()), Err)
    }

    #[track_caller]
    fn ensure_sound(&self) {
        if self.is_poisoned() {
            fatal(InvariantViolation::Poisoned);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Node<T>> {
        let root = self.root.read();
        self.ensure_sound();
        root
    }

    // The guard must be bound after the lock so it drops first and the flag
    // is set before another writer can get in.
    fn write(&self) -> (RwLockWriteGuard<'_, Node<T>>, PoisonOnUnwind<'_>) {
        let root = self.root.write();
        self.ensure_sound();
        (root, PoisonOnUnwind(&self.poisoned))
    }

    fn expand_to_include(&self, root: &mut Node<T>, pos: &Point) {
        let bounds = root.bounds();
        if let Some(grown) = bounds.expanded_to_include(pos, self.config.expand_factor) {
            log::debug!(
                "expanding quadtree bounds from {:?} to {:?} to fit {:?}, collapsing {} objects",
                bounds,
                grown,
                pos,
                root.count()
            );
            root.collapse_into(grown);
        }
    }
}

fn checked_position(pos: Point) -> QuadtreeResult<Point> {
    if pos.is_finite() {
        Ok(pos)
    } else {
        Err(QuadtreeError::InvalidPosition { x: pos.x, y: pos.y })
    }
}
