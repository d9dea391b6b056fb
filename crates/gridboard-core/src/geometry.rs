//! Geometric primitives for the two coordinate spaces of a grid board.
//!
//! Grid space is integral: columns grow rightwards from 0, rows grow
//! downwards from 0 without an upper bound. Pixel space is the host's
//! container coordinate system (origin at the top-left of the grid surface).

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A single grid cell, addressed by column and row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct GridCell {
    pub col: u32,
    pub row: u32,
}

impl GridCell {
    #[inline]
    #[must_use]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// A signed offset in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridDelta {
    pub cols: i32,
    pub rows: i32,
}

impl GridDelta {
    #[inline]
    #[must_use]
    pub const fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cols == 0 && self.rows == 0
    }
}

/// A rectangle in grid cells covering `[x, x + cols) × [y, y + rows)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Left column (inclusive).
    pub x: u32,
    /// Top row (inclusive).
    pub y: u32,
    /// Width in columns.
    pub cols: u32,
    /// Height in rows.
    pub rows: u32,
}

impl GridRect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, cols: u32, rows: u32) -> Self {
        Self { x, y, cols, rows }
    }

    /// Create a rectangle anchored at a cell.
    #[inline]
    #[must_use]
    pub const fn at(origin: GridCell, cols: u32, rows: u32) -> Self {
        Self::new(origin.col, origin.row, cols, rows)
    }

    /// Top-left cell.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> GridCell {
        GridCell::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.cols)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.rows)
    }

    /// Area in cells.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }

    /// Check if the rectangle covers no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Check if a cell lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, cell: GridCell) -> bool {
        cell.col >= self.x && cell.col < self.right() && cell.row >= self.y && cell.row < self.bottom()
    }

    /// Non-zero-area intersection test.
    ///
    /// Rectangles that only share an edge do not overlap, and an empty
    /// rectangle never overlaps anything.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &GridRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    #[must_use]
    pub fn intersection_opt(&self, other: &GridRect) -> Option<GridRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(GridRect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &GridRect) -> GridRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        GridRect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Same span, different origin.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, origin: GridCell) -> Self {
        Self::new(origin.col, origin.row, self.cols, self.rows)
    }

    /// Same origin, different span.
    #[inline]
    #[must_use]
    pub const fn with_span(self, cols: u32, rows: u32) -> Self {
        Self::new(self.x, self.y, cols, rows)
    }
}

/// A position in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Replace non-finite components with zero.
    #[inline]
    #[must_use]
    pub fn finite_or_zero(self) -> Self {
        Self::new(finite_or_zero(self.x), finite_or_zero(self.y))
    }
}

impl Add for PixelPoint {
    type Output = PixelPoint;

    fn add(self, rhs: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PixelPoint {
    type Output = PixelPoint;

    fn sub(self, rhs: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A size in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_parts(origin: PixelPoint, size: PixelSize) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment test (`[x, x + width) × [y, y + height)`).
    #[inline]
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
