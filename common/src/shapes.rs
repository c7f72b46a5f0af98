#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate on the given axis, 0 for x and 1 for y.
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => unreachable!("points are two-dimensional"),
        }
    }

    #[inline]
    fn axis_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => unreachable!("points are two-dimensional"),
        }
    }

    #[inline]
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn midpoint(a: Point, b: Point) -> Point {
        Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box between two corners, with the midpoint cached.
///
/// `min` is componentwise less than or equal to `max`. The box is closed on
/// both edges.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    min: Point,
    max: Point,
    center: Point,
}

impl BoundingBox {
    /// Builds a box from any two opposite corners.
    pub fn new(corner1: Point, corner2: Point) -> Self {
        let min = Point::new(corner1.x.min(corner2.x), corner1.y.min(corner2.y));
        let max = Point::new(corner1.x.max(corner2.x), corner1.y.max(corner2.y));
        Self {
            min,
            max,
            center: Point::midpoint(min, max),
        }
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Index of the quadrant `p` is filed under: `xbit * 2 + ybit`, where a
    /// bit is 0 when the coordinate is at or below the center. Ties go low.
    #[inline]
    pub fn quadrant_of(&self, p: &Point) -> usize {
        let xbit = usize::from(p.x > self.center.x);
        let ybit = usize::from(p.y > self.center.y);
        xbit * 2 + ybit
    }

    /// The sub-box for quadrant `index` as numbered by [`quadrant_of`].
    ///
    /// [`quadrant_of`]: BoundingBox::quadrant_of
    pub fn quadrant(&self, index: usize) -> BoundingBox {
        debug_assert!(index < 4);
        let (min_x, max_x) = if index & 0b10 == 0 {
            (self.min.x, self.center.x)
        } else {
            (self.center.x, self.max.x)
        };
        let (min_y, max_y) = if index & 0b01 == 0 {
            (self.min.y, self.center.y)
        } else {
            (self.center.y, self.max.y)
        };
        BoundingBox::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Grows the box so that `p` falls inside it.
    ///
    /// On every axis where `p` is outside, the edge nearest `p` is pushed out
    /// to `factor` times the distance from the opposite edge to `p`, so the
    /// new edge overshoots the point. Returns `None` when `p` is already
    /// inside.
    pub fn expanded_to_include(&self, p: &Point, factor: f64) -> Option<BoundingBox> {
        let mut min = self.min;
        let mut max = self.max;
        let mut changed = false;
        for axis in 0..2 {
            let v = p.axis(axis);
            if v < self.min.axis(axis) {
                changed = true;
                *min.axis_mut(axis) = self.max.axis(axis) - (self.max.axis(axis) - v) * factor;
            }
            if v > self.max.axis(axis) {
                changed = true;
                *max.axis_mut(axis) = self.min.axis(axis) + (v - self.min.axis(axis)) * factor;
            }
        }
        changed.then(|| BoundingBox::new(min, max))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(Point::default(), Point::default())
    }
}
