#![forbid(unsafe_code)]

//! Core: coordinate primitives, pointer input, and logging for gridboard.
//!
//! # Role in gridboard
//! `gridboard-core` is the vocabulary layer. It owns the two coordinate
//! spaces the engine converts between (grid cells and container pixels),
//! the normalized pointer input that host adapters emit, and the logging
//! facade used by the layout engine.
//!
//! # Primary responsibilities
//! - **GridRect / GridCell**: integer rectangles in grid-cell space.
//! - **PixelPoint / PixelRect**: floating-point positions in container pixels.
//! - **PointerInput**: start/move/release/cancel gestures for drag and resize.
//! - **Logging**: `tracing` macros when the `tracing` feature is on, no-ops
//!   otherwise.

pub mod geometry;
pub mod logging;
pub mod pointer;
pub mod widget;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, warn};

pub use geometry::{GridCell, GridDelta, GridRect, PixelPoint, PixelRect, PixelSize};
pub use pointer::{CancelReason, PointerInput, ResizeAxes, ResizeHandle, SessionKind};
pub use widget::WidgetId;
