//! Widget placements and the layout that holds them.
//!
//! A [`Layout`] is an ordered list of [`WidgetPlacement`]s sharing one grid.
//! Non-overlap is enforced only when a gesture commits; layouts built from
//! stored data are accepted as-is (apart from duplicate ids) and can be
//! inspected with [`Layout::invariant_report`] without being corrected.
//!
//! # Snapshot schema
//!
//! [`LayoutSnapshot`] is the versioned serde form hosts persist. Unknown
//! fields belong in `extensions`; breaking changes bump
//! [`LAYOUT_SCHEMA_VERSION`].
//!
//! ```
//! use gridboard_core::{GridCell, WidgetId};
//! use gridboard_layout::board::{Layout, WidgetPlacement};
//! use gridboard_layout::catalog::SizeLabel;
//!
//! let mut layout = Layout::new();
//! layout
//!     .insert(WidgetPlacement::new(WidgetId::new(1), GridCell::new(0, 0), SizeLabel::S3x2))
//!     .unwrap();
//! assert_eq!(layout.first_free_slot(SizeLabel::S2x2, 6), GridCell::new(3, 0));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use gridboard_core::geometry::{GridCell, GridRect};
use gridboard_core::widget::WidgetId;
use gridboard_core::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{SizeLabel, fit_to_columns};
use crate::collision::{is_valid_placement, is_within_bounds};

/// Current layout snapshot schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// One widget's origin cell and declared size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetPlacement {
    pub id: WidgetId,
    pub position: GridCell,
    pub size: SizeLabel,
}

impl WidgetPlacement {
    #[must_use]
    pub const fn new(id: WidgetId, position: GridCell, size: SizeLabel) -> Self {
        Self { id, position, size }
    }

    /// Covered cells: `[x, x + cols) × [y, y + rows)`.
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        let span = self.size.span();
        GridRect::at(self.position, span.cols, span.rows)
    }

    #[must_use]
    pub const fn with_position(self, position: GridCell) -> Self {
        Self { position, ..self }
    }

    #[must_use]
    pub const fn with_size(self, size: SizeLabel) -> Self {
        Self { size, ..self }
    }
}

/// Ordered placements with an id index.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    placements: Vec<WidgetPlacement>,
    index: FxHashMap<WidgetId, usize>,
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.placements == other.placements
    }
}

impl Eq for Layout {}

impl Layout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from existing placements, keeping their order.
    ///
    /// Overlapping or out-of-bounds placements are kept; duplicate ids are
    /// rejected because every later operation addresses widgets by id.
    pub fn from_placements<I>(placements: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = WidgetPlacement>,
    {
        let mut layout = Self::new();
        for placement in placements {
            layout.insert(placement)?;
        }
        Ok(layout)
    }

    /// Append a placement. The caller chooses the position.
    pub fn insert(&mut self, placement: WidgetPlacement) -> Result<(), LayoutError> {
        if self.index.contains_key(&placement.id) {
            return Err(LayoutError::DuplicateWidget { id: placement.id });
        }
        self.index.insert(placement.id, self.placements.len());
        self.placements.push(placement);
        Ok(())
    }

    /// Remove a widget, preserving the order of the rest.
    pub fn remove(&mut self, id: WidgetId) -> Result<WidgetPlacement, LayoutError> {
        let idx = self
            .index
            .remove(&id)
            .ok_or(LayoutError::UnknownWidget { id })?;
        let removed = self.placements.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Ok(removed)
    }

    /// Swap one placement for its updated version, returning the old one.
    pub fn replace(&mut self, placement: WidgetPlacement) -> Result<WidgetPlacement, LayoutError> {
        let idx = *self
            .index
            .get(&placement.id)
            .ok_or(LayoutError::UnknownWidget { id: placement.id })?;
        Ok(std::mem::replace(&mut self.placements[idx], placement))
    }

    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&WidgetPlacement> {
        self.index.get(&id).map(|&idx| &self.placements[idx])
    }

    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetPlacement> + '_ {
        self.placements.iter()
    }

    #[must_use]
    pub fn placements(&self) -> &[WidgetPlacement] {
        &self.placements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Every widget except `id`, as `(id, rect)` pairs: the comparison set for
    /// validating a move or resize of `id`.
    pub fn others(&self, id: WidgetId) -> impl Iterator<Item = (WidgetId, GridRect)> + '_ {
        self.placements
            .iter()
            .filter(move |p| p.id != id)
            .map(|p| (p.id, p.rect()))
    }

    /// Number of rows down to the lowest widget bottom edge.
    #[must_use]
    pub fn content_rows(&self) -> u32 {
        self.placements
            .iter()
            .map(|p| p.rect().bottom())
            .max()
            .unwrap_or(0)
    }

    /// First origin, scanning rows top-down and columns left-to-right, where a
    /// widget of `size` fits without overlapping anything.
    ///
    /// `size` is narrowed to `columns` first. A slot always exists at column 0
    /// of the first row below all content.
    #[must_use]
    pub fn first_free_slot(&self, size: SizeLabel, columns: u32) -> GridCell {
        let columns = columns.max(1);
        let span = fit_to_columns(size, columns).span();
        let bottom = self.content_rows();
        let rects: Vec<GridRect> = self.placements.iter().map(WidgetPlacement::rect).collect();

        for row in 0..=bottom {
            for col in 0..=(columns - span.cols) {
                let candidate = GridRect::new(col, row, span.cols, span.rows);
                if is_valid_placement(&candidate, &rects, columns) {
                    return candidate.origin();
                }
            }
        }
        GridCell::new(0, bottom)
    }

    /// Report overlaps and out-of-bounds placements without fixing them.
    #[must_use]
    pub fn invariant_report(&self, columns: u32) -> LayoutInvariantReport {
        let mut issues = Vec::new();
        for (i, a) in self.placements.iter().enumerate() {
            let rect = a.rect();
            if !is_within_bounds(&rect, columns) {
                issues.push(LayoutIssue::OutOfBounds {
                    id: a.id,
                    right_edge: rect.right(),
                    columns,
                });
            }
            for b in &self.placements[i + 1..] {
                if rect.overlaps(&b.rect()) {
                    issues.push(LayoutIssue::Overlap { a: a.id, b: b.id });
                }
            }
        }
        LayoutInvariantReport { columns, issues }
    }

    /// Capture the current placements for persistence.
    #[must_use]
    pub fn to_snapshot(&self, columns_hint: Option<u32>) -> LayoutSnapshot {
        LayoutSnapshot {
            schema_version: LAYOUT_SCHEMA_VERSION,
            columns_hint,
            widgets: self.placements.clone(),
            extensions: BTreeMap::new(),
        }
    }

    /// Restore a layout from a stored snapshot.
    ///
    /// Overlaps and out-of-bounds widgets are tolerated and only logged.
    pub fn from_snapshot(snapshot: LayoutSnapshot) -> Result<Self, LayoutError> {
        snapshot.validate()?;
        let columns_hint = snapshot.columns_hint;
        let layout = Self::from_placements(snapshot.widgets)?;
        if let Some(columns) = columns_hint {
            let report = layout.invariant_report(columns);
            if !report.is_clean() {
                warn!(
                    issues = report.issues.len(),
                    columns, "restored layout has overlapping or out-of-bounds widgets"
                );
            }
        }
        Ok(layout)
    }
}

/// Versioned, serializable layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default = "default_layout_schema_version")]
    pub schema_version: u16,
    /// Column count the layout was last edited under, if known.
    #[serde(default)]
    pub columns_hint: Option<u32>,
    pub widgets: Vec<WidgetPlacement>,
    /// Forward-compatible extension bag.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

fn default_layout_schema_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

impl LayoutSnapshot {
    /// Check the schema version.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.schema_version != LAYOUT_SCHEMA_VERSION {
            return Err(LayoutError::UnsupportedSchemaVersion {
                version: self.schema_version,
                expected: LAYOUT_SCHEMA_VERSION,
            });
        }
        Ok(())
    }
}

/// One violated layout invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum LayoutIssue {
    Overlap {
        a: WidgetId,
        b: WidgetId,
    },
    OutOfBounds {
        id: WidgetId,
        right_edge: u32,
        columns: u32,
    },
}

/// Result of [`Layout::invariant_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantReport {
    pub columns: u32,
    pub issues: Vec<LayoutIssue>,
}

impl LayoutInvariantReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether `id` is involved in any issue.
    #[must_use]
    pub fn involves(&self, id: WidgetId) -> bool {
        self.issues.iter().any(|issue| match *issue {
            LayoutIssue::Overlap { a, b } => a == id || b == id,
            LayoutIssue::OutOfBounds { id: issue_id, .. } => issue_id == id,
        })
    }
}

/// Layout construction and bookkeeping errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    DuplicateWidget { id: WidgetId },
    UnknownWidget { id: WidgetId },
    UnsupportedSchemaVersion { version: u16, expected: u16 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateWidget { id } => write!(f, "{id} is already on the board"),
            Self::UnknownWidget { id } => write!(f, "{id} is not on the board"),
            Self::UnsupportedSchemaVersion { version, expected } => write!(
                f,
                "unsupported layout schema version {version} (expected {expected})"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}
