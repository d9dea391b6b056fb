//! Normalized pointer input for drag and resize gestures.
//!
//! Host adapters translate their native events (DOM pointer events, winit
//! mouse input, terminal mouse reports) into [`PointerInput`] values. The
//! layout engine consumes only this vocabulary.
//!
//! # Invariants
//!
//! 1. A gesture is `Start`, zero or more `Move`, then exactly one of
//!    `Release` or `Cancel`.
//! 2. Positions are container pixels, never grid cells.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::PixelPoint;
use crate::widget::WidgetId;

bitflags! {
    /// Grid axes a resize gesture is allowed to change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeAxes: u8 {
        /// Horizontal span (column count).
        const COLUMNS = 0b01;
        /// Vertical span (row count).
        const ROWS = 0b10;
    }
}

/// Which resize handle the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    /// Right edge: changes columns only.
    East,
    /// Bottom edge: changes rows only.
    South,
    /// Bottom-right corner: changes both.
    Corner,
}

impl ResizeHandle {
    /// Axes this handle is allowed to change.
    #[must_use]
    pub const fn axes(self) -> ResizeAxes {
        match self {
            Self::East => ResizeAxes::COLUMNS,
            Self::South => ResizeAxes::ROWS,
            Self::Corner => ResizeAxes::COLUMNS.union(ResizeAxes::ROWS),
        }
    }
}

/// Gesture kind selected at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionKind {
    Drag,
    Resize { handle: ResizeHandle },
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drag => f.write_str("drag"),
            Self::Resize { handle } => write!(f, "resize({handle:?})"),
        }
    }
}

/// Why an in-flight gesture was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EscapeKey,
    PointerCancel,
    PointerLeft,
    FocusLost,
    /// Host-initiated: edit mode switched off, widget removed, etc.
    Programmatic,
}

/// One pointer event in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerInput {
    Start {
        widget: WidgetId,
        position: PixelPoint,
        #[serde(flatten)]
        kind: SessionKind,
    },
    Move {
        position: PixelPoint,
    },
    Release,
    Cancel {
        reason: CancelReason,
    },
}

impl PointerInput {
    /// Pointer-down on a widget body.
    #[must_use]
    pub const fn drag(widget: WidgetId, position: PixelPoint) -> Self {
        Self::Start {
            widget,
            position,
            kind: SessionKind::Drag,
        }
    }

    /// Pointer-down on a widget resize handle.
    #[must_use]
    pub const fn resize(widget: WidgetId, position: PixelPoint, handle: ResizeHandle) -> Self {
        Self::Start {
            widget,
            position,
            kind: SessionKind::Resize { handle },
        }
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::Move {
            position: PixelPoint::new(x, y),
        }
    }
}
