//! Pixel ↔ grid conversion for a responsive widget grid.
//!
//! A [`GridConfig`] holds the fixed constants (row height, gap, breakpoints).
//! Measuring a container width produces [`GridMetrics`], which carries the
//! derived column count and cell width and performs every conversion.
//!
//! # Geometry
//!
//! ```text
//! |<- cell ->|<gap>|<- cell ->|<gap>| ... |<- cell ->|
//! 0          pitch                                   width
//! ```
//!
//! Column `c` starts at `c * (cell + gap)`; row `r` starts at
//! `r * (row_height + gap)`. `columns * cell + (columns - 1) * gap == width`
//! whenever the cell is above its minimum.
//!
//! # Snapping
//!
//! Absolute positions snap with `floor((px + gap / 2) / pitch)`: each cell
//! owns half of the gutter on either side, so a pointer inside a gap selects
//! the nearer cell. Deltas snap with `round(px / pitch)` so small movements
//! in either direction register.
//!
//! # Failure Modes
//!
//! None. Zero, negative, or non-finite widths yield one column and a cell of
//! `min_cell_px`; negative pixel positions clamp to cell 0.

use std::fmt;

use gridboard_core::geometry::{GridCell, GridDelta, GridRect, PixelPoint, PixelRect, PixelSize};
use gridboard_core::trace;
use serde::{Deserialize, Serialize};

use crate::responsive::{Breakpoint, ColumnBreakpoints};

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT_PX: f64 = 120.0;
/// Default gutter between cells in pixels (both axes).
pub const DEFAULT_GAP_PX: f64 = 16.0;
/// Default floor for the derived cell width.
pub const DEFAULT_MIN_CELL_PX: f64 = 1.0;

/// Fixed grid constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub row_height_px: f64,
    pub gap_px: f64,
    /// Lower bound for the derived cell width on pathological container widths.
    pub min_cell_px: f64,
    pub breakpoints: ColumnBreakpoints,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height_px: DEFAULT_ROW_HEIGHT_PX,
            gap_px: DEFAULT_GAP_PX,
            min_cell_px: DEFAULT_MIN_CELL_PX,
            breakpoints: ColumnBreakpoints::DEFAULT,
        }
    }
}

impl GridConfig {
    /// Check the constants a host supplied (e.g. from a JSON config).
    ///
    /// The conversion functions never rely on this; they sanitize on use.
    pub fn validate(&self) -> Result<(), GridConfigError> {
        check_non_negative("row_height_px", self.row_height_px)?;
        check_non_negative("gap_px", self.gap_px)?;
        check_non_negative("min_cell_px", self.min_cell_px)?;
        if self.min_cell_px == 0.0 {
            return Err(GridConfigError::NonPositive {
                field: "min_cell_px",
                value: self.min_cell_px,
            });
        }
        for (field, value) in [
            ("breakpoints.sm", self.breakpoints.sm),
            ("breakpoints.md", self.breakpoints.md),
            ("breakpoints.lg", self.breakpoints.lg),
            ("breakpoints.xl", self.breakpoints.xl),
        ] {
            check_non_negative(field, value)?;
        }
        if !self.breakpoints.is_sanitized() {
            return Err(GridConfigError::NonMonotonicBreakpoints);
        }
        Ok(())
    }

    fn gap(&self) -> f64 {
        sanitize(self.gap_px, 0.0)
    }

    fn min_cell(&self) -> f64 {
        let min = sanitize(self.min_cell_px, DEFAULT_MIN_CELL_PX);
        if min > 0.0 { min } else { DEFAULT_MIN_CELL_PX }
    }

    fn row_height(&self) -> f64 {
        sanitize(self.row_height_px, 0.0).max(self.min_cell())
    }

    /// Responsive column count for a container width (≥ 1, monotonic).
    #[must_use]
    pub fn columns_for_width(&self, container_width_px: f64) -> u32 {
        self.breakpoints.columns_for_width(container_width_px)
    }

    /// Cell width for a container width and column count.
    ///
    /// `(width - gap * (columns - 1)) / columns`, floored at `min_cell_px`.
    /// A column count of 0 is treated as 1.
    #[must_use]
    pub fn cell_unit_px(&self, container_width_px: f64, columns: u32) -> f64 {
        let columns = columns.max(1);
        let width = sanitize(container_width_px, 0.0);
        let raw = (width - self.gap() * f64::from(columns - 1)) / f64::from(columns);
        let min = self.min_cell();
        if raw.is_finite() && raw >= min {
            raw
        } else {
            trace!(container_width_px, columns, "cell width clamped to minimum");
            min
        }
    }

    /// Derive the full metrics for one measured container width.
    #[must_use]
    pub fn metrics(&self, container_width_px: f64) -> GridMetrics {
        let container_width_px = sanitize(container_width_px, 0.0);
        let table = self.breakpoints.sanitized();
        let breakpoint = table.classify_width(container_width_px);
        let columns = table.columns_for(breakpoint);
        GridMetrics {
            container_width_px,
            breakpoint,
            columns,
            cell_unit_px: self.cell_unit_px(container_width_px, columns),
            row_height_px: self.row_height(),
            gap_px: self.gap(),
        }
    }

    /// Map a pixel position to the grid cell under it.
    #[must_use]
    pub fn pixel_to_grid_cell(&self, px: PixelPoint, container_width_px: f64) -> GridCell {
        self.metrics(container_width_px).pixel_to_cell(px)
    }

    /// Map a pixel delta to a whole-cell delta.
    #[must_use]
    pub fn delta_to_grid_delta(&self, delta: PixelPoint, container_width_px: f64) -> GridDelta {
        self.metrics(container_width_px).delta_to_grid(delta)
    }
}

/// Geometry derived from one container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub container_width_px: f64,
    pub breakpoint: Breakpoint,
    pub columns: u32,
    pub cell_unit_px: f64,
    pub row_height_px: f64,
    pub gap_px: f64,
}

impl GridMetrics {
    /// Horizontal distance between consecutive column origins.
    #[inline]
    #[must_use]
    pub fn col_pitch(&self) -> f64 {
        self.cell_unit_px + self.gap_px
    }

    /// Vertical distance between consecutive row origins.
    #[inline]
    #[must_use]
    pub fn row_pitch(&self) -> f64 {
        self.row_height_px + self.gap_px
    }

    /// Snap an absolute pixel position to a cell.
    ///
    /// Columns clamp to `[0, columns - 1]`; rows clamp only at 0.
    #[must_use]
    pub fn pixel_to_cell(&self, px: PixelPoint) -> GridCell {
        let px = px.finite_or_zero();
        let half_gap = self.gap_px / 2.0;
        let col = snap_floor(px.x + half_gap, self.col_pitch());
        let row = snap_floor(px.y + half_gap, self.row_pitch());
        GridCell::new(col.min(self.columns.saturating_sub(1)), row)
    }

    /// Convert a pixel delta into whole cells, rounding to nearest per axis.
    #[must_use]
    pub fn delta_to_grid(&self, delta: PixelPoint) -> GridDelta {
        let delta = delta.finite_or_zero();
        GridDelta::new(
            snap_round(delta.x, self.col_pitch()),
            snap_round(delta.y, self.row_pitch()),
        )
    }

    /// Pixel origin of a cell.
    #[must_use]
    pub fn cell_origin_px(&self, cell: GridCell) -> PixelPoint {
        PixelPoint::new(
            f64::from(cell.col) * self.col_pitch(),
            f64::from(cell.row) * self.row_pitch(),
        )
    }

    /// Pixel size of a span, including the gaps it swallows.
    #[must_use]
    pub fn span_size_px(&self, cols: u32, rows: u32) -> PixelSize {
        let extent = |n: u32, unit: f64| {
            if n == 0 {
                0.0
            } else {
                f64::from(n) * unit + f64::from(n - 1) * self.gap_px
            }
        };
        PixelSize::new(
            extent(cols, self.cell_unit_px),
            extent(rows, self.row_height_px),
        )
    }

    /// Pixel rectangle covered by a grid rectangle.
    #[must_use]
    pub fn rect_to_pixels(&self, rect: GridRect) -> PixelRect {
        PixelRect::from_parts(
            self.cell_origin_px(rect.origin()),
            self.span_size_px(rect.cols, rect.rows),
        )
    }
}

/// Invalid [`GridConfig`] constants.
#[derive(Debug, Clone, PartialEq)]
pub enum GridConfigError {
    NonFinite { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    NonPositive { field: &'static str, value: f64 },
    NonMonotonicBreakpoints,
}

impl fmt::Display for GridConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field, value } => write!(f, "{field} must be finite (got {value})"),
            Self::Negative { field, value } => {
                write!(f, "{field} must be non-negative (got {value})")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            Self::NonMonotonicBreakpoints => write!(
                f,
                "breakpoint thresholds and column counts must be non-decreasing (columns >= 1)"
            ),
        }
    }
}

impl std::error::Error for GridConfigError {}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), GridConfigError> {
    if !value.is_finite() {
        return Err(GridConfigError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(GridConfigError::Negative { field, value });
    }
    Ok(())
}

#[inline]
fn sanitize(v: f64, fallback: f64) -> f64 {
    if v.is_finite() && v >= 0.0 { v } else { fallback }
}

#[inline]
fn snap_floor(px: f64, pitch: f64) -> u32 {
    if px <= 0.0 || pitch <= 0.0 {
        return 0;
    }
    // Float-to-int casts saturate.
    (px / pitch).floor() as u32
}

#[inline]
fn snap_round(px: f64, pitch: f64) -> i32 {
    if pitch <= 0.0 {
        return 0;
    }
    (px / pitch).round() as i32
}
