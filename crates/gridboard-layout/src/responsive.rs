//! Responsive column counts: container width → breakpoint tier → columns.
//!
//! [`ColumnBreakpoints`] classifies a container width (in pixels) into a
//! [`Breakpoint`] tier and maps each tier to a column count.
//!
//! # Usage
//!
//! ```
//! use gridboard_layout::responsive::{Breakpoint, ColumnBreakpoints};
//!
//! let bps = ColumnBreakpoints::DEFAULT.at(Breakpoint::Xl, 10);
//! assert_eq!(bps.columns_for_width(1200.0), 6);
//! assert_eq!(bps.columns_for_width(2000.0), 10);
//! ```
//!
//! # Invariants
//!
//! 1. Thresholds are non-decreasing from `Sm` to `Xl` after [`ColumnBreakpoints::sanitized`].
//! 2. Column counts are ≥ 1 and non-decreasing across tiers after sanitizing,
//!    so `columns_for_width` is monotonic in width.
//! 3. Any width (negative, zero, NaN) resolves to a tier; nothing fails.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Responsive breakpoint tiers, ordered from narrowest to widest.
///
/// | Breakpoint | Default min width | Default columns |
/// |-----------|-------------------|-----------------|
/// | `Xs`      | 0 px              | 1               |
/// | `Sm`      | 480 px            | 2               |
/// | `Md`      | 768 px            | 4               |
/// | `Lg`      | 1024 px           | 6               |
/// | `Xl`      | 1600 px           | 8               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Breakpoint::Xs => 0,
            Breakpoint::Sm => 1,
            Breakpoint::Md => 2,
            Breakpoint::Lg => 3,
            Breakpoint::Xl => 4,
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Width thresholds and per-tier column counts.
///
/// Each threshold is the minimum container width in pixels for that tier;
/// `Xs` implicitly starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBreakpoints {
    pub sm: f64,
    pub md: f64,
    pub lg: f64,
    pub xl: f64,
    /// Column count per tier, indexed `[xs, sm, md, lg, xl]`.
    pub columns: [u32; 5],
}

impl Default for ColumnBreakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ColumnBreakpoints {
    /// Default table: 480 / 768 / 1024 / 1600 px → 1 / 2 / 4 / 6 / 8 columns.
    pub const DEFAULT: Self = Self {
        sm: 480.0,
        md: 768.0,
        lg: 1024.0,
        xl: 1600.0,
        columns: [1, 2, 4, 6, 8],
    };

    /// Create a table with explicit thresholds and the default column counts.
    ///
    /// Thresholds are sanitized to be monotonically non-decreasing.
    #[must_use]
    pub fn new(sm: f64, md: f64, lg: f64, xl: f64) -> Self {
        Self {
            sm,
            md,
            lg,
            xl,
            columns: Self::DEFAULT.columns,
        }
        .sanitized()
    }

    /// Override the column count for one tier (builder pattern).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, columns: u32) -> Self {
        self.columns[bp.index()] = columns;
        self
    }

    /// Repair thresholds and column counts so the monotonicity invariants hold.
    ///
    /// Non-finite thresholds collapse onto the previous tier; column counts
    /// are raised to at least 1 and to at least the previous tier's count.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: f64, floor: f64| if v.is_finite() { v.max(floor) } else { floor };
        let sm = clean(self.sm, 0.0);
        let md = clean(self.md, sm);
        let lg = clean(self.lg, md);
        let xl = clean(self.xl, lg);

        let mut columns = self.columns;
        let mut floor = 1;
        for c in &mut columns {
            *c = (*c).max(floor);
            floor = *c;
        }

        Self {
            sm,
            md,
            lg,
            xl,
            columns,
        }
    }

    /// Whether the table already satisfies the monotonicity invariants.
    #[must_use]
    pub fn is_sanitized(&self) -> bool {
        self.sanitized() == *self
    }

    /// Classify a container width into a breakpoint tier.
    ///
    /// Negative and non-finite widths classify as `Xs`.
    #[must_use]
    pub fn classify_width(&self, width_px: f64) -> Breakpoint {
        let w = if width_px.is_finite() { width_px } else { 0.0 };
        if w >= self.xl {
            Breakpoint::Xl
        } else if w >= self.lg {
            Breakpoint::Lg
        } else if w >= self.md {
            Breakpoint::Md
        } else if w >= self.sm {
            Breakpoint::Sm
        } else {
            Breakpoint::Xs
        }
    }

    /// Column count configured for a tier (never 0).
    #[must_use]
    pub fn columns_for(&self, bp: Breakpoint) -> u32 {
        self.columns[bp.index()].max(1)
    }

    /// Column count for a container width.
    #[must_use]
    pub fn columns_for_width(&self, width_px: f64) -> u32 {
        let table = self.sanitized();
        table.columns_for(table.classify_width(width_px))
    }

    /// Minimum width threshold for a given tier.
    #[must_use]
    pub const fn threshold(&self, bp: Breakpoint) -> f64 {
        match bp {
            Breakpoint::Xs => 0.0,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }
}
