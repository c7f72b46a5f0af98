use super::{Config, Positioned, TreeStats};
use crate::error::{fatal, InvariantViolation};
use common::shapes::{BoundingBox, Point};
use fxhash::FxHashSet;
use smallvec::{smallvec, SmallVec};
use std::sync::Arc;

pub(crate) type ObjectList<T> = SmallVec<[Arc<T>; 8]>;

type NodeStack<'a, T> = SmallVec<[&'a Node<T>; 32]>;

enum Contents<T: ?Sized> {
    Leaf(ObjectList<T>),
    Split(Box<[Node<T>; 4]>),
}

/// One quadrant of space. Either a leaf holding objects directly or an
/// internal node owning four children that tile its box at the center.
pub(crate) struct Node<T: ?Sized> {
    bounds: BoundingBox,
    depth: u32,
    // Objects anywhere in this subtree.
    count: usize,
    contents: Contents<T>,
}

impl<T: Positioned + ?Sized> Node<T> {
    pub(crate) fn new_leaf(bounds: BoundingBox, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            count: 0,
            contents: Contents::Leaf(ObjectList::new()),
        }
    }

    #[inline]
    pub(crate) fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.contents, Contents::Leaf(_))
    }

    /// Files `object` under `pos`, splitting this leaf first if it is full.
    pub(crate) fn add(&mut self, object: Arc<T>, pos: Point, config: &Config) {
        self.count += 1;
        if self.is_leaf() && self.depth < config.max_depth && self.count > config.split_threshold
        {
            self.split(config);
        }

        let index = self.bounds.quadrant_of(&pos);
        match &mut self.contents {
            Contents::Leaf(objects) => objects.push(object),
            Contents::Split(children) => children[index].add(object, pos, config),
        }
    }

    /// Removes `object`, which must be filed under `pos`. Collapses this node
    /// first if the subtree drops below the merge threshold.
    pub(crate) fn remove(&mut self, object: &Arc<T>, pos: Point, config: &Config) {
        if self.count == 0 {
            fatal(InvariantViolation::CountUnderflow { depth: self.depth });
        }
        self.count -= 1;
        if !self.is_leaf() && self.count < config.merge_threshold {
            self.merge();
        }

        let index = self.bounds.quadrant_of(&pos);
        match &mut self.contents {
            Contents::Leaf(objects) => match objects.iter().position(|o| Arc::ptr_eq(o, object)) {
                Some(i) => {
                    objects.swap_remove(i);
                }
                None => fatal(InvariantViolation::MissingObject {
                    depth: self.depth,
                    x: pos.x,
                    y: pos.y,
                }),
            },
            Contents::Split(children) => children[index].remove(object, pos, config),
        }
    }

    fn split(&mut self, config: &Config) {
        let Contents::Leaf(objects) =
            std::mem::replace(&mut self.contents, Contents::Leaf(ObjectList::new()))
        else {
            unreachable!("only leaves split");
        };

        let bounds = self.bounds;
        let depth = self.depth + 1;
        let mut children: Box<[Node<T>; 4]> =
            Box::new(std::array::from_fn(|i| Node::new_leaf(bounds.quadrant(i), depth)));
        for object in objects {
            let pos = object.position();
            children[bounds.quadrant_of(&pos)].add(object, pos, config);
        }
        log::trace!(
            "split node at depth {} holding {} objects",
            self.depth,
            self.count
        );
        self.contents = Contents::Split(children);
    }

    fn merge(&mut self) {
        let mut objects = ObjectList::new();
        self.collect_all(&mut objects);
        log::trace!(
            "merged node at depth {} into {} objects",
            self.depth,
            objects.len()
        );
        self.contents = Contents::Leaf(objects);
    }

    /// Moves every object in the subtree into `out`, leaving the leaves empty.
    pub(crate) fn collect_all(&mut self, out: &mut ObjectList<T>) {
        match &mut self.contents {
            Contents::Leaf(objects) => out.extend(objects.drain(..)),
            Contents::Split(children) => {
                for child in children.iter_mut() {
                    child.collect_all(out);
                }
            }
        }
    }

    /// Drops all structure below this node and adopts `bounds`, keeping every
    /// object in a single leaf. Counts are unchanged.
    pub(crate) fn collapse_into(&mut self, bounds: BoundingBox) {
        if !self.is_leaf() {
            let mut objects = ObjectList::new();
            self.collect_all(&mut objects);
            self.contents = Contents::Leaf(objects);
        }
        self.bounds = bounds;
    }

    /// Pushes every object within `radius` of `pos` onto `out`.
    ///
    /// A child is skipped only when, on some axis, the query square lies
    /// entirely on the far side of the center. That never drops a real match
    /// but can visit a quadrant the disc misses near its corner.
    pub(crate) fn find_near(&self, pos: Point, radius: f64, out: &mut Vec<Arc<T>>) {
        let radius_sq = radius * radius;
        let mut stack: NodeStack<'_, T> = smallvec![self];
        while let Some(node) = stack.pop() {
            match &node.contents {
                Contents::Leaf(objects) => out.extend(
                    objects
                        .iter()
                        .filter(|o| o.position().distance_sq(&pos) <= radius_sq)
                        .cloned(),
                ),
                Contents::Split(children) => {
                    let center = node.bounds.center();
                    for (i, child) in children.iter().enumerate() {
                        let low_x = i & 0b10 == 0;
                        if (low_x && pos.x - radius > center.x)
                            || (!low_x && pos.x + radius < center.x)
                        {
                            continue;
                        }
                        let low_y = i & 0b01 == 0;
                        if (low_y && pos.y - radius > center.y)
                            || (!low_y && pos.y + radius < center.y)
                        {
                            continue;
                        }
                        if child.count > 0 {
                            stack.push(child);
                        }
                    }
                }
            }
        }
    }

    /// True if `object` sits in the leaf that `pos` routes to.
    pub(crate) fn present_at(&self, object: &Arc<T>, pos: Point) -> bool {
        let mut node = self;
        loop {
            match &node.contents {
                Contents::Leaf(objects) => return objects.iter().any(|o| Arc::ptr_eq(o, object)),
                Contents::Split(children) => node = &children[node.bounds.quadrant_of(&pos)],
            }
        }
    }

    /// Looks for `object` in every leaf, ignoring its position.
    pub(crate) fn search(&self, object: &Arc<T>) -> bool {
        match &self.contents {
            Contents::Leaf(objects) => objects.iter().any(|o| Arc::ptr_eq(o, object)),
            Contents::Split(children) => children.iter().any(|child| child.search(object)),
        }
    }

    pub(crate) fn for_each_object<F>(&self, f: &mut F)
    where
        F: FnMut(&Arc<T>),
    {
        match &self.contents {
            Contents::Leaf(objects) => objects.iter().for_each(|o| f(o)),
            Contents::Split(children) => {
                for child in children.iter() {
                    child.for_each_object(f);
                }
            }
        }
    }

    pub(crate) fn accumulate_stats(&self, stats: &mut TreeStats) {
        stats.nodes += 1;
        stats.depth = stats.depth.max(self.depth);
        match &self.contents {
            Contents::Leaf(objects) => {
                stats.leaves += 1;
                stats.objects += objects.len();
            }
            Contents::Split(children) => {
                for child in children.iter() {
                    child.accumulate_stats(stats);
                }
            }
        }
    }

    /// Checks counts, depth and that no object is filed twice. `seen` holds
    /// the addresses of objects met so far.
    pub(crate) fn validate(
        &self,
        config: &Config,
        seen: &mut FxHashSet<usize>,
    ) -> Result<(), InvariantViolation> {
        if self.depth > config.max_depth {
            return Err(InvariantViolation::TooDeep {
                depth: self.depth,
                max_depth: config.max_depth,
            });
        }
        let actual = match &self.contents {
            Contents::Leaf(objects) => {
                for o in objects.iter() {
                    if !seen.insert(Arc::as_ptr(o) as *const () as usize) {
                        let pos = o.position();
                        return Err(InvariantViolation::Duplicate { x: pos.x, y: pos.y });
                    }
                }
                objects.len()
            }
            Contents::Split(children) => {
                for child in children.iter() {
                    child.validate(config, seen)?;
                }
                children.iter().map(|child| child.count).sum()
            }
        };
        if actual != self.count {
            return Err(InvariantViolation::CountMismatch {
                depth: self.depth,
                recorded: self.count,
                actual,
            });
        }
        Ok(())
    }
}
