//! Collision and bounds validation for candidate placements.
//!
//! Everything here is a pure predicate or a pure transform. Validation never
//! fails loudly; an invalid candidate is reported as a [`RejectReason`] and
//! the caller decides whether that is silent (live preview) or surfaced
//! (rejected commit).
//!
//! # Self-exclusion
//!
//! The comparison set passed to [`is_valid_placement`] / [`check_placement`]
//! must not contain the widget being moved or resized; otherwise every
//! candidate that overlaps its own old position is rejected. Use
//! [`Layout::others`](crate::board::Layout::others) to build it.

use std::borrow::Borrow;
use std::fmt;

use gridboard_core::geometry::GridRect;
use gridboard_core::widget::WidgetId;
use serde::{Deserialize, Serialize};

use crate::board::WidgetPlacement;
use crate::catalog::fit_to_columns;

/// Why a candidate placement cannot be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// The candidate intersects another widget.
    Overlap { with: WidgetId },
    /// The candidate extends past the last column.
    OutOfBounds { right_edge: u32, columns: u32 },
    /// The widget left the layout while the gesture was in flight.
    WidgetMissing,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap { with } => write!(f, "position unavailable: overlaps {with}"),
            Self::OutOfBounds {
                right_edge,
                columns,
            } => write!(
                f,
                "position unavailable: right edge {right_edge} exceeds {columns} columns"
            ),
            Self::WidgetMissing => write!(f, "widget is no longer on the board"),
        }
    }
}

/// Axis-aligned intersection with non-zero area.
///
/// Edge-to-edge neighbours do not overlap.
#[inline]
#[must_use]
pub fn rectangles_overlap(a: &GridRect, b: &GridRect) -> bool {
    a.overlaps(b)
}

/// Whether the candidate's horizontal extent fits `columns`.
///
/// `x >= 0` and `y >= 0` hold by construction (unsigned cells); rows are
/// unbounded.
#[inline]
#[must_use]
pub fn is_within_bounds(candidate: &GridRect, columns: u32) -> bool {
    candidate.right() <= columns
}

/// Boolean validity check against an already self-excluded set.
#[must_use]
pub fn is_valid_placement<I>(candidate: &GridRect, others: I, columns: u32) -> bool
where
    I: IntoIterator,
    I::Item: Borrow<GridRect>,
{
    is_within_bounds(candidate, columns)
        && others
            .into_iter()
            .all(|other| !candidate.overlaps(other.borrow()))
}

/// Validity check that also names the first conflict.
///
/// Bounds are checked before collisions.
pub fn check_placement<I>(candidate: &GridRect, others: I, columns: u32) -> Result<(), RejectReason>
where
    I: IntoIterator<Item = (WidgetId, GridRect)>,
{
    if !is_within_bounds(candidate, columns) {
        return Err(RejectReason::OutOfBounds {
            right_edge: candidate.right(),
            columns,
        });
    }
    match others
        .into_iter()
        .find(|(_, rect)| candidate.overlaps(rect))
    {
        Some((with, _)) => Err(RejectReason::Overlap { with }),
        None => Ok(()),
    }
}

/// Pull a rectangle inside `[0, columns)` horizontally.
///
/// The span is truncated to `columns` first, then `x` shifts left so the
/// right edge lands on the boundary. Columns never increase and the result
/// is idempotent. A column count of 0 is treated as 1.
#[must_use]
pub fn clamp_to_bounds(candidate: GridRect, columns: u32) -> GridRect {
    let columns = columns.max(1);
    let cols = candidate.cols.min(columns);
    let x = candidate.x.min(columns - cols);
    GridRect::new(x, candidate.y, cols, candidate.rows)
}

/// [`clamp_to_bounds`] for a placement: narrows the size label through the
/// catalog when the grid is too narrow, then shifts the origin.
#[must_use]
pub fn clamp_placement(candidate: WidgetPlacement, columns: u32) -> WidgetPlacement {
    let size = fit_to_columns(candidate.size, columns);
    let rect = clamp_to_bounds(candidate.with_size(size).rect(), columns);
    candidate.with_size(size).with_position(rect.origin())
}
