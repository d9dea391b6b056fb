#![forbid(unsafe_code)]

//! Responsive widget grid: geometry, collision, size catalog, and interaction.
//!
//! # Role in gridboard
//! `gridboard-layout` is the engine. Given a [`Layout`] of widget placements
//! and a measured container width it derives the column count, answers
//! whether a candidate placement is legal, and turns pointer gestures into
//! at most one committed change per gesture.
//!
//! # Modules
//! - [`responsive`]: breakpoint thresholds and per-tier column counts.
//! - [`geometry`]: [`GridConfig`] constants and pixel/grid conversion.
//! - [`catalog`]: the fixed set of [`SizeLabel`] variants.
//! - [`collision`]: overlap and bounds predicates, clamping.
//! - [`board`]: [`WidgetPlacement`], [`Layout`], snapshots.
//! - [`interaction`]: the drag/resize [`InteractionController`].
//! - [`surface`]: [`GridSurface`], the host-facing adapter.
//!
//! # Example
//!
//! ```
//! use gridboard_core::{GridCell, WidgetId};
//! use gridboard_layout::{EditMode, GridConfig, GridSurface, InteractionEffect, SizeLabel};
//!
//! let mut surface = GridSurface::new(GridConfig::default(), 1200.0, EditMode::Editing).unwrap();
//! assert_eq!(surface.columns(), 6);
//!
//! let id = WidgetId::new(1);
//! surface.add_widget(id, SizeLabel::S2x2, None).unwrap();
//!
//! let metrics = *surface.metrics();
//! surface.pointer_down_widget(id, metrics.cell_origin_px(GridCell::new(0, 0)));
//! surface.pointer_move(metrics.cell_origin_px(GridCell::new(3, 1)));
//! let done = surface.pointer_up();
//! assert!(matches!(done.effect, InteractionEffect::Committed { .. }));
//! assert_eq!(surface.layout().get(id).unwrap().position, GridCell::new(3, 1));
//! ```
//!
//! # Feature flags
//! - `tracing`: emit `tracing` events for session lifecycle and previews.
//! - `tracing-json`: also enable `gridboard_core::logging::init_json_subscriber`.

pub mod board;
pub mod catalog;
pub mod collision;
pub mod geometry;
pub mod interaction;
pub mod responsive;
pub mod surface;

pub use board::{
    LAYOUT_SCHEMA_VERSION, Layout, LayoutError, LayoutInvariantReport, LayoutIssue,
    LayoutSnapshot, WidgetPlacement,
};
pub use catalog::{
    MAX_CATALOG_COLS, MAX_CATALOG_ROWS, SizeLabel, SizeLabelParseError, Span, fit_to_columns,
    label_of, next_size_from_delta, span_of,
};
pub use collision::{
    RejectReason, check_placement, clamp_placement, clamp_to_bounds, is_valid_placement,
    is_within_bounds, rectangles_overlap,
};
pub use geometry::{GridConfig, GridConfigError, GridMetrics};
pub use interaction::{
    EditMode, InteractionController, InteractionEffect, InteractionSession, InteractionState,
    InteractionTransition, LivePreview, NoopReason,
};
pub use responsive::{Breakpoint, ColumnBreakpoints};
pub use surface::{GridSurface, LayoutObserver, RenderedPreview, RenderedWidget};
