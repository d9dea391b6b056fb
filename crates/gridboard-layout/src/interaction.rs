//! Drag/resize interaction controller.
//!
//! [`InteractionController`] turns a pointer gesture into at most one layout
//! mutation. Every input produces an [`InteractionTransition`] describing the
//! state change and its [`InteractionEffect`].
//!
//! # State Machine
//!
//! ```text
//! Idle --start(drag)---> Dragging --release--> [Committed | Rejected | Unchanged] --> Idle
//!   \                        \------cancel---> [Canceled] ------------------------> Idle
//!    \--start(resize)--> Resizing --release--> [Committed | Rejected | Unchanged] --> Idle
//!                            \------cancel---> [Canceled] ------------------------> Idle
//! ```
//!
//! # Invariants
//!
//! 1. At most one session exists; `start` while active is a `Noop`.
//! 2. The layout is only written on a successful release, by replacing the
//!    one placement under the gesture. Previews and cancels never mutate it.
//! 3. The moving widget is always excluded from its own collision set.
//! 4. Previews are emitted whether valid or not; only release surfaces a
//!    rejection.
//! 5. Inputs that do not apply (view mode, unknown widget, no session) yield
//!    `Noop` with a reason rather than an error.
//!
//! # Host contract
//!
//! The host delivers one pointer sequence at a time. The guard in invariant 1
//! turns a second overlapping sequence (e.g. touch + mouse) into no-ops
//! instead of corrupting the active session.

use gridboard_core::geometry::{GridDelta, PixelPoint};
use gridboard_core::pointer::{CancelReason, PointerInput, ResizeAxes, ResizeHandle, SessionKind};
use gridboard_core::widget::WidgetId;
use gridboard_core::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::{Layout, WidgetPlacement};
use crate::catalog::next_size_from_delta;
use crate::collision::{RejectReason, check_placement, clamp_placement};
use crate::geometry::GridMetrics;

/// Whether the board currently accepts layout edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    Idle,
    Dragging {
        widget: WidgetId,
    },
    Resizing {
        widget: WidgetId,
        handle: ResizeHandle,
    },
}

/// Tentative placement shown while a gesture is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivePreview {
    pub placement: WidgetPlacement,
    /// `None` when the placement would commit.
    pub rejection: Option<RejectReason>,
}

impl LivePreview {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }
}

/// One in-flight gesture. Owned by the controller, discarded on release or cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    pub widget: WidgetId,
    pub kind: SessionKind,
    pub anchor_pointer: PixelPoint,
    /// Placement as drawn at start: the stored placement clamped to the
    /// column count.
    pub anchor_placement: WidgetPlacement,
    /// Pointer position relative to the widget's drawn pixel origin at start.
    pub grab_offset: PixelPoint,
    pub live_preview: Option<LivePreview>,
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    ViewOnly,
    UnknownWidget,
    SessionAlreadyActive,
    NoActiveSession,
}

/// What one transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    Started {
        widget: WidgetId,
        kind: SessionKind,
        anchor: WidgetPlacement,
    },
    Preview {
        widget: WidgetId,
        preview: LivePreview,
    },
    Committed {
        widget: WidgetId,
        previous: WidgetPlacement,
        placement: WidgetPlacement,
    },
    /// Released without a net change.
    Unchanged {
        widget: WidgetId,
    },
    Rejected {
        widget: WidgetId,
        attempted: WidgetPlacement,
        reason: RejectReason,
    },
    Canceled {
        widget: WidgetId,
        reason: CancelReason,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTransition {
    pub transition_id: u64,
    pub from: InteractionState,
    pub to: InteractionState,
    pub effect: InteractionEffect,
}

/// Pointer-driven drag/resize state machine.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: EditMode,
    session: Option<InteractionSession>,
    transition_counter: u64,
}

impl InteractionController {
    #[must_use]
    pub fn new(mode: EditMode) -> Self {
        Self {
            mode,
            session: None,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switch edit mode. Leaving `Editing` cancels any active session.
    pub fn set_mode(&mut self, mode: EditMode) -> Option<InteractionTransition> {
        self.mode = mode;
        if mode == EditMode::Viewing && self.session.is_some() {
            Some(self.cancel(CancelReason::Programmatic))
        } else {
            None
        }
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        match &self.session {
            None => InteractionState::Idle,
            Some(session) => match session.kind {
                SessionKind::Drag => InteractionState::Dragging {
                    widget: session.widget,
                },
                SessionKind::Resize { handle } => InteractionState::Resizing {
                    widget: session.widget,
                    handle,
                },
            },
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Route one normalized pointer input.
    pub fn apply(
        &mut self,
        layout: &mut Layout,
        metrics: &GridMetrics,
        input: PointerInput,
    ) -> InteractionTransition {
        match input {
            PointerInput::Start {
                widget,
                position,
                kind,
            } => self.start(layout, metrics, widget, position, kind),
            PointerInput::Move { position } => self.pointer_move(layout, metrics, position),
            PointerInput::Release => self.release(layout, metrics),
            PointerInput::Cancel { reason } => self.cancel(reason),
        }
    }

    /// Pointer-down on a widget body.
    pub fn start_drag(
        &mut self,
        layout: &Layout,
        metrics: &GridMetrics,
        widget: WidgetId,
        pointer: PixelPoint,
    ) -> InteractionTransition {
        self.start(layout, metrics, widget, pointer, SessionKind::Drag)
    }

    /// Pointer-down on a resize handle.
    pub fn start_resize(
        &mut self,
        layout: &Layout,
        metrics: &GridMetrics,
        widget: WidgetId,
        pointer: PixelPoint,
        handle: ResizeHandle,
    ) -> InteractionTransition {
        self.start(layout, metrics, widget, pointer, SessionKind::Resize { handle })
    }

    /// Open a session for `widget`, capturing its drawn placement as the anchor.
    pub fn start(
        &mut self,
        layout: &Layout,
        metrics: &GridMetrics,
        widget: WidgetId,
        pointer: PixelPoint,
        kind: SessionKind,
    ) -> InteractionTransition {
        let from = self.state();
        if self.mode != EditMode::Editing {
            return self.noop(from, NoopReason::ViewOnly);
        }
        if self.session.is_some() {
            return self.noop(from, NoopReason::SessionAlreadyActive);
        }
        let Some(&stored) = layout.get(widget) else {
            return self.noop(from, NoopReason::UnknownWidget);
        };
        // Gestures start from where the widget is drawn, which differs from
        // the stored placement once the grid is narrower than it.
        let anchor = clamp_placement(stored, metrics.columns);

        let pointer = pointer.finite_or_zero();
        let grab_offset = match kind {
            SessionKind::Drag => pointer - metrics.cell_origin_px(anchor.position),
            SessionKind::Resize { .. } => PixelPoint::ORIGIN,
        };
        self.session = Some(InteractionSession {
            widget,
            kind,
            anchor_pointer: pointer,
            anchor_placement: anchor,
            grab_offset,
            live_preview: None,
        });
        debug!(widget = widget.get(), %kind, "interaction started");
        self.transition(
            from,
            InteractionEffect::Started {
                widget,
                kind,
                anchor,
            },
        )
    }

    /// Recompute the live preview for a new pointer position.
    pub fn pointer_move(
        &mut self,
        layout: &Layout,
        metrics: &GridMetrics,
        pointer: PixelPoint,
    ) -> InteractionTransition {
        let from = self.state();
        let Some(session) = self.session.as_mut() else {
            return self.noop(from, NoopReason::NoActiveSession);
        };

        let pointer = pointer.finite_or_zero();
        let candidate = match session.kind {
            SessionKind::Drag => drag_candidate(session, metrics, pointer),
            SessionKind::Resize { handle } => resize_candidate(session, metrics, pointer, handle),
        };
        let preview = if layout.contains(session.widget) {
            evaluate(candidate, layout, metrics.columns)
        } else {
            LivePreview {
                placement: candidate,
                rejection: Some(RejectReason::WidgetMissing),
            }
        };
        session.live_preview = Some(preview);
        let widget = session.widget;

        trace!(
            widget = widget.get(),
            col = preview.placement.position.col,
            row = preview.placement.position.row,
            size = preview.placement.size.as_str(),
            valid = preview.is_valid(),
            "live preview"
        );
        self.transition(from, InteractionEffect::Preview { widget, preview })
    }

    /// End the gesture, committing the preview if it is still valid.
    ///
    /// The preview is re-validated against `layout` as it is now, so a
    /// concurrent change to another widget cannot produce an overlap.
    pub fn release(&mut self, layout: &mut Layout, metrics: &GridMetrics) -> InteractionTransition {
        let from = self.state();
        let Some(session) = self.session.take() else {
            return self.noop(from, NoopReason::NoActiveSession);
        };
        let widget = session.widget;
        let attempted = session
            .live_preview
            .map_or(session.anchor_placement, |preview| preview.placement);

        let effect = if !layout.contains(widget) {
            InteractionEffect::Rejected {
                widget,
                attempted,
                reason: RejectReason::WidgetMissing,
            }
        } else if attempted == session.anchor_placement {
            InteractionEffect::Unchanged { widget }
        } else {
            match check_placement(&attempted.rect(), layout.others(widget), metrics.columns) {
                Err(reason) => InteractionEffect::Rejected {
                    widget,
                    attempted,
                    reason,
                },
                Ok(()) => match layout.replace(attempted) {
                    Ok(previous) => InteractionEffect::Committed {
                        widget,
                        previous,
                        placement: attempted,
                    },
                    Err(_) => InteractionEffect::Rejected {
                        widget,
                        attempted,
                        reason: RejectReason::WidgetMissing,
                    },
                },
            }
        };

        log_release(widget, &effect);
        self.transition(from, effect)
    }

    /// Abandon the gesture. The layout is untouched.
    pub fn cancel(&mut self, reason: CancelReason) -> InteractionTransition {
        let from = self.state();
        let Some(session) = self.session.take() else {
            return self.noop(from, NoopReason::NoActiveSession);
        };
        debug!(widget = session.widget.get(), ?reason, "interaction canceled");
        self.transition(
            from,
            InteractionEffect::Canceled {
                widget: session.widget,
                reason,
            },
        )
    }

    fn noop(&mut self, from: InteractionState, reason: NoopReason) -> InteractionTransition {
        trace!(?reason, "pointer input ignored");
        self.transition(from, InteractionEffect::Noop { reason })
    }

    fn transition(
        &mut self,
        from: InteractionState,
        effect: InteractionEffect,
    ) -> InteractionTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        InteractionTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state(),
            effect,
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_release(widget: WidgetId, effect: &InteractionEffect) {
    match effect {
        InteractionEffect::Committed { placement, .. } => debug!(
            widget = widget.get(),
            col = placement.position.col,
            row = placement.position.row,
            size = placement.size.as_str(),
            "placement committed"
        ),
        InteractionEffect::Rejected { reason, .. } => {
            debug!(widget = widget.get(), %reason, "placement rejected");
        }
        _ => trace!(widget = widget.get(), "released without change"),
    }
}

fn drag_candidate(
    session: &InteractionSession,
    metrics: &GridMetrics,
    pointer: PixelPoint,
) -> WidgetPlacement {
    let cell = metrics.pixel_to_cell(pointer - session.grab_offset);
    clamp_placement(
        session.anchor_placement.with_position(cell),
        metrics.columns,
    )
}

fn resize_candidate(
    session: &InteractionSession,
    metrics: &GridMetrics,
    pointer: PixelPoint,
    handle: ResizeHandle,
) -> WidgetPlacement {
    let anchor = session.anchor_placement;
    let raw = metrics.delta_to_grid(pointer - session.anchor_pointer);
    let axes = handle.axes();
    let delta = GridDelta::new(
        if axes.contains(ResizeAxes::COLUMNS) { raw.cols } else { 0 },
        if axes.contains(ResizeAxes::ROWS) { raw.rows } else { 0 },
    );
    // Width available to the right of the fixed origin.
    let room = metrics.columns.saturating_sub(anchor.position.col).max(1);
    let size = next_size_from_delta(anchor.size, delta, room);

    // A catalog snap must not move an axis the handle does not control.
    let locked_cols = !axes.contains(ResizeAxes::COLUMNS) && size.cols() != anchor.size.cols();
    let locked_rows = !axes.contains(ResizeAxes::ROWS) && size.rows() != anchor.size.rows();
    if locked_cols || locked_rows {
        anchor
    } else {
        anchor.with_size(size)
    }
}

fn evaluate(candidate: WidgetPlacement, layout: &Layout, columns: u32) -> LivePreview {
    LivePreview {
        placement: candidate,
        rejection: check_placement(&candidate.rect(), layout.others(candidate.id), columns).err(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SizeLabel;
    use crate::geometry::GridConfig;
    use gridboard_core::geometry::GridCell;

    fn id(raw: u64) -> WidgetId {
        WidgetId::new(raw)
    }

    fn place(raw: u64, col: u32, row: u32, size: SizeLabel) -> WidgetPlacement {
        WidgetPlacement::new(id(raw), GridCell::new(col, row), size)
    }

    fn metrics() -> GridMetrics {
        GridConfig::default().metrics(1200.0)
    }

    fn board() -> Layout {
        Layout::from_placements([
            place(1, 0, 0, SizeLabel::S3x2),
            place(2, 3, 0, SizeLabel::S2x2),
        ])
        .expect("layout")
    }

    fn editing() -> InteractionController {
        InteractionController::new(EditMode::Editing)
    }

    fn cell_px(m: &GridMetrics, col: u32, row: u32) -> PixelPoint {
        m.cell_origin_px(GridCell::new(col, row))
    }

    #[test]
    fn view_mode_ignores_start() {
        let layout = board();
        let mut ctl = InteractionController::default();
        let t = ctl.start_drag(&layout, &metrics(), id(1), PixelPoint::ORIGIN);
        assert_eq!(
            t.effect,
            InteractionEffect::Noop {
                reason: NoopReason::ViewOnly
            }
        );
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn unknown_widget_is_noop() {
        let layout = board();
        let mut ctl = editing();
        let t = ctl.start_drag(&layout, &metrics(), id(99), PixelPoint::ORIGIN);
        assert_eq!(
            t.effect,
            InteractionEffect::Noop {
                reason: NoopReason::UnknownWidget
            }
        );
    }

    #[test]
    fn second_start_is_guarded() {
        let layout = board();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(1), PixelPoint::ORIGIN);
        let t = ctl.start_resize(&layout, &m, id(2), PixelPoint::ORIGIN, ResizeHandle::East);
        assert_eq!(
            t.effect,
            InteractionEffect::Noop {
                reason: NoopReason::SessionAlreadyActive
            }
        );
        assert_eq!(ctl.state(), InteractionState::Dragging { widget: id(1) });
    }

    #[test]
    fn move_and_release_without_session_are_noops() {
        let mut layout = board();
        let m = metrics();
        let mut ctl = editing();
        for t in [
            ctl.pointer_move(&layout, &m, PixelPoint::ORIGIN),
            ctl.release(&mut layout, &m),
            ctl.cancel(CancelReason::EscapeKey),
        ] {
            assert_eq!(
                t.effect,
                InteractionEffect::Noop {
                    reason: NoopReason::NoActiveSession
                }
            );
        }
    }

    #[test]
    fn drag_keeps_grab_offset() {
        let layout = board();
        let m = metrics();
        let mut ctl = editing();
        // Grab widget 2 near its right edge.
        let grab = cell_px(&m, 4, 0) + PixelPoint::new(100.0, 40.0);
        ctl.start_drag(&layout, &m, id(2), grab);

        // No movement: same cell.
        let t = ctl.pointer_move(&layout, &m, grab);
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview, got {:?}", t.effect);
        };
        assert_eq!(preview.placement.position, GridCell::new(3, 0));
        assert!(preview.is_valid());

        // Two rows down.
        let t = ctl.pointer_move(&layout, &m, grab + PixelPoint::new(0.0, 2.0 * m.row_pitch()));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(preview.placement.position, GridCell::new(3, 2));
    }

    #[test]
    fn invalid_preview_is_reported_but_not_committed() {
        let mut layout = board();
        let before = layout.clone();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 3, 0));
        let t = ctl.pointer_move(&layout, &m, cell_px(&m, 2, 0));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(
            preview.rejection,
            Some(RejectReason::Overlap { with: id(1) })
        );

        let t = ctl.release(&mut layout, &m);
        assert!(matches!(
            t.effect,
            InteractionEffect::Rejected {
                reason: RejectReason::Overlap { .. },
                ..
            }
        ));
        assert_eq!(t.to, InteractionState::Idle);
        assert_eq!(layout, before);
    }

    #[test]
    fn passing_over_invalid_cell_then_valid_commits() {
        let mut layout = board();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 3, 0));
        ctl.pointer_move(&layout, &m, cell_px(&m, 1, 0));
        ctl.pointer_move(&layout, &m, cell_px(&m, 4, 1));
        let t = ctl.release(&mut layout, &m);
        assert_eq!(
            t.effect,
            InteractionEffect::Committed {
                widget: id(2),
                previous: place(2, 3, 0, SizeLabel::S2x2),
                placement: place(2, 4, 1, SizeLabel::S2x2),
            }
        );
        assert_eq!(
            layout.get(id(2)).map(|p| p.position),
            Some(GridCell::new(4, 1))
        );
    }

    #[test]
    fn drag_past_right_edge_clamps() {
        let layout = board();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 3, 0));
        let t = ctl.pointer_move(&layout, &m, PixelPoint::new(5000.0, 3.0 * m.row_pitch()));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(preview.placement.position, GridCell::new(4, 3));
        assert!(preview.is_valid());
    }

    #[test]
    fn release_without_move_is_unchanged() {
        let mut layout = Layout::from_placements([
            place(1, 0, 0, SizeLabel::S2x2),
            place(2, 1, 1, SizeLabel::S2x2),
        ])
        .expect("pre-existing overlap is tolerated");
        let before = layout.clone();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 1, 1));
        let t = ctl.release(&mut layout, &m);
        assert_eq!(t.effect, InteractionEffect::Unchanged { widget: id(2) });
        assert_eq!(layout, before);
    }

    #[test]
    fn cancel_discards_preview() {
        let mut layout = board();
        let before = layout.clone();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 3, 0));
        ctl.pointer_move(&layout, &m, cell_px(&m, 3, 4));
        let t = ctl.apply(
            &mut layout,
            &m,
            PointerInput::Cancel {
                reason: CancelReason::EscapeKey,
            },
        );
        assert_eq!(
            t.effect,
            InteractionEffect::Canceled {
                widget: id(2),
                reason: CancelReason::EscapeKey
            }
        );
        assert_eq!(t.from, InteractionState::Dragging { widget: id(2) });
        assert_eq!(t.to, InteractionState::Idle);
        assert!(ctl.session().is_none());
        assert_eq!(layout, before);
    }

    #[test]
    fn east_resize_changes_columns_only() {
        let mut layout = Layout::from_placements([place(1, 0, 0, SizeLabel::S1x1)]).expect("layout");
        let m = metrics();
        let mut ctl = editing();
        let start = PixelPoint::new(180.0, 110.0);
        ctl.start_resize(&layout, &m, id(1), start, ResizeHandle::East);
        let t = ctl.pointer_move(
            &layout,
            &m,
            start + PixelPoint::new(m.col_pitch(), 3.0 * m.row_pitch()),
        );
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(preview.placement.size, SizeLabel::S2x1);
        let t = ctl.release(&mut layout, &m);
        assert!(matches!(t.effect, InteractionEffect::Committed { .. }));
        assert_eq!(layout.get(id(1)).map(|p| p.size), Some(SizeLabel::S2x1));
    }

    #[test]
    fn resize_does_not_snap_locked_axis() {
        let layout = Layout::from_placements([place(1, 0, 0, SizeLabel::S2x4)]).expect("layout");
        let m = metrics();
        let mut ctl = editing();
        ctl.start_resize(&layout, &m, id(1), PixelPoint::ORIGIN, ResizeHandle::East);
        // 3x4 is not in the catalog; the nearest (3x3) would change rows.
        let t = ctl.pointer_move(&layout, &m, PixelPoint::new(m.col_pitch(), 0.0));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(preview.placement.size, SizeLabel::S2x4);
    }

    #[test]
    fn resize_stops_at_right_edge() {
        let layout = Layout::from_placements([place(1, 4, 0, SizeLabel::S1x1)]).expect("layout");
        let m = metrics();
        let mut ctl = editing();
        ctl.start_resize(&layout, &m, id(1), PixelPoint::ORIGIN, ResizeHandle::East);
        let t = ctl.pointer_move(&layout, &m, PixelPoint::new(10.0 * m.col_pitch(), 0.0));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(preview.placement.size, SizeLabel::S2x1);
        assert!(preview.is_valid());
    }

    #[test]
    fn narrowed_widget_resizes_from_drawn_position() {
        // Stored for six columns, drawn at col 2 on four.
        let mut layout = Layout::from_placements([place(1, 4, 0, SizeLabel::S2x1)]).expect("layout");
        let m = GridConfig::default().metrics(800.0);
        assert_eq!(m.columns, 4);
        let mut ctl = editing();
        let t = ctl.start_resize(&layout, &m, id(1), PixelPoint::ORIGIN, ResizeHandle::South);
        assert!(matches!(
            t.effect,
            InteractionEffect::Started { anchor, .. } if anchor == place(1, 2, 0, SizeLabel::S2x1)
        ));

        let t = ctl.pointer_move(&layout, &m, PixelPoint::new(0.0, 1.0));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview, got {:?}", t.effect);
        };
        assert_eq!(preview.placement, place(1, 2, 0, SizeLabel::S2x1));
        assert!(preview.is_valid());

        let t = ctl.pointer_move(&layout, &m, PixelPoint::new(0.0, m.row_pitch()));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview, got {:?}", t.effect);
        };
        assert_eq!(preview.placement, place(1, 2, 0, SizeLabel::S2x2));
        assert!(preview.is_valid());

        let t = ctl.release(&mut layout, &m);
        assert_eq!(
            t.effect,
            InteractionEffect::Committed {
                widget: id(1),
                previous: place(1, 4, 0, SizeLabel::S2x1),
                placement: place(1, 2, 0, SizeLabel::S2x2),
            }
        );
    }

    #[test]
    fn narrowed_widget_release_in_place_is_unchanged() {
        let mut layout = Layout::from_placements([place(1, 4, 0, SizeLabel::S2x1)]).expect("layout");
        let before = layout.clone();
        let m = GridConfig::default().metrics(800.0);
        let mut ctl = editing();
        ctl.start_resize(&layout, &m, id(1), PixelPoint::ORIGIN, ResizeHandle::East);
        ctl.pointer_move(&layout, &m, PixelPoint::new(1.0, 0.0));
        let t = ctl.release(&mut layout, &m);
        assert_eq!(t.effect, InteractionEffect::Unchanged { widget: id(1) });
        assert_eq!(layout, before);
    }

    #[test]
    fn narrowed_widget_drag_measures_grab_from_drawn_origin() {
        let layout = Layout::from_placements([place(1, 4, 0, SizeLabel::S2x1)]).expect("layout");
        let m = GridConfig::default().metrics(800.0);
        let mut ctl = editing();
        let grab = cell_px(&m, 2, 0);
        ctl.start_drag(&layout, &m, id(1), grab);

        let t = ctl.pointer_move(&layout, &m, grab);
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview, got {:?}", t.effect);
        };
        assert_eq!(preview.placement.position, GridCell::new(2, 0));

        let t = ctl.pointer_move(&layout, &m, grab - PixelPoint::new(m.col_pitch(), 0.0));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview, got {:?}", t.effect);
        };
        assert_eq!(preview.placement.position, GridCell::new(1, 0));
        assert!(preview.is_valid());
    }

    #[test]
    fn resize_into_neighbor_is_rejected() {
        let mut layout = Layout::from_placements([
            place(1, 0, 0, SizeLabel::S1x1),
            place(2, 2, 0, SizeLabel::S1x1),
        ])
        .expect("layout");
        let before = layout.clone();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_resize(&layout, &m, id(1), PixelPoint::ORIGIN, ResizeHandle::East);
        ctl.pointer_move(&layout, &m, PixelPoint::new(2.0 * m.col_pitch(), 0.0));
        let t = ctl.release(&mut layout, &m);
        assert_eq!(
            t.effect,
            InteractionEffect::Rejected {
                widget: id(1),
                attempted: place(1, 0, 0, SizeLabel::S3x1),
                reason: RejectReason::Overlap { with: id(2) },
            }
        );
        assert_eq!(layout, before);
    }

    #[test]
    fn widget_removed_mid_session_is_rejected() {
        let mut layout = board();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 3, 0));
        layout.remove(id(2)).expect("remove");
        let t = ctl.pointer_move(&layout, &m, cell_px(&m, 3, 3));
        let InteractionEffect::Preview { preview, .. } = t.effect else {
            panic!("expected preview");
        };
        assert_eq!(preview.rejection, Some(RejectReason::WidgetMissing));
        let t = ctl.release(&mut layout, &m);
        assert!(matches!(
            t.effect,
            InteractionEffect::Rejected {
                reason: RejectReason::WidgetMissing,
                ..
            }
        ));
    }

    #[test]
    fn commit_revalidates_against_current_layout() {
        let mut layout = board();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(2), cell_px(&m, 3, 0));
        ctl.pointer_move(&layout, &m, cell_px(&m, 0, 2));
        // A remote edit lands on the target before release.
        layout.insert(place(3, 0, 2, SizeLabel::S1x1)).expect("insert");
        let t = ctl.release(&mut layout, &m);
        assert!(matches!(
            t.effect,
            InteractionEffect::Rejected {
                reason: RejectReason::Overlap { .. },
                ..
            }
        ));
    }

    #[test]
    fn leaving_edit_mode_cancels() {
        let layout = board();
        let m = metrics();
        let mut ctl = editing();
        ctl.start_drag(&layout, &m, id(1), PixelPoint::ORIGIN);
        let t = ctl.set_mode(EditMode::Viewing).expect("cancel transition");
        assert_eq!(
            t.effect,
            InteractionEffect::Canceled {
                widget: id(1),
                reason: CancelReason::Programmatic
            }
        );
        assert!(ctl.set_mode(EditMode::Editing).is_none());
    }

    #[test]
    fn transition_ids_increase() {
        let mut layout = board();
        let m = metrics();
        let mut ctl = editing();
        let ids: Vec<u64> = [
            ctl.start_drag(&layout, &m, id(1), PixelPoint::ORIGIN),
            ctl.pointer_move(&layout, &m, PixelPoint::new(1.0, 1.0)),
            ctl.release(&mut layout, &m),
            ctl.release(&mut layout, &m),
        ]
        .iter()
        .map(|t| t.transition_id)
        .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn effect_wire_shape() {
        let effect = InteractionEffect::Noop {
            reason: NoopReason::ViewOnly,
        };
        let json = serde_json::to_string(&effect).expect("serialize");
        assert_eq!(json, r#"{"effect":"noop","reason":"view_only"}"#);
    }
}
