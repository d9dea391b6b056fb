//! Grid surface: the adapter between host UI events and the engine.
//!
//! [`GridSurface`] owns the measured container width, the [`Layout`], and an
//! [`InteractionController`]. Hosts feed it widths and pointer events and
//! read back rendered rectangles; outcomes are reported through a
//! [`LayoutObserver`].
//!
//! The surface holds no placement logic of its own. Geometry comes from
//! [`GridConfig`], validation from the collision module, and state changes
//! from the controller.
//!
//! # Reflow
//!
//! Shrinking the container never rewrites stored placements. [`GridSurface::render`]
//! clamps each widget into the current column count for display only and
//! flags it as `clamped`; the stored placement keeps its original origin and
//! size, so widening the container restores the old arrangement.

use gridboard_core::geometry::{GridCell, GridRect, PixelPoint, PixelRect};
use gridboard_core::pointer::{CancelReason, PointerInput, ResizeHandle};
use gridboard_core::widget::WidgetId;
use gridboard_core::{debug, warn};

use crate::board::{Layout, LayoutError, WidgetPlacement};
use crate::catalog::{SizeLabel, fit_to_columns};
use crate::collision::{RejectReason, clamp_placement};
use crate::geometry::{GridConfig, GridConfigError, GridMetrics};
use crate::interaction::{
    EditMode, InteractionController, InteractionEffect, InteractionState, InteractionTransition,
    LivePreview,
};

/// Host callbacks for interaction outcomes.
///
/// Every method defaults to a no-op so hosts implement only what they show.
pub trait LayoutObserver {
    /// A gesture produced a new tentative placement.
    fn on_live_preview(&mut self, _widget: WidgetId, _preview: &LivePreview) {}

    /// A gesture committed. The surface's layout already holds `placement`.
    fn on_placement_committed(&mut self, _previous: &WidgetPlacement, _placement: &WidgetPlacement) {
    }

    /// A release was refused; the layout is unchanged.
    fn on_placement_rejected(
        &mut self,
        _widget: WidgetId,
        _attempted: &WidgetPlacement,
        _reason: RejectReason,
    ) {
    }

    /// A gesture was abandoned before release.
    fn on_session_canceled(&mut self, _widget: WidgetId, _reason: CancelReason) {}
}

impl LayoutObserver for () {}

impl<O: LayoutObserver + ?Sized> LayoutObserver for &mut O {
    fn on_live_preview(&mut self, widget: WidgetId, preview: &LivePreview) {
        (**self).on_live_preview(widget, preview);
    }

    fn on_placement_committed(&mut self, previous: &WidgetPlacement, placement: &WidgetPlacement) {
        (**self).on_placement_committed(previous, placement);
    }

    fn on_placement_rejected(
        &mut self,
        widget: WidgetId,
        attempted: &WidgetPlacement,
        reason: RejectReason,
    ) {
        (**self).on_placement_rejected(widget, attempted, reason);
    }

    fn on_session_canceled(&mut self, widget: WidgetId, reason: CancelReason) {
        (**self).on_session_canceled(widget, reason);
    }
}

/// One widget as it should be drawn at the current width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedWidget {
    pub id: WidgetId,
    /// Size variant to draw; narrower than the stored label when clamped.
    pub size: SizeLabel,
    /// Stored cells, possibly out of bounds.
    pub stored: GridRect,
    /// Cells actually occupied on screen.
    pub span: GridRect,
    pub pixel_rect: PixelRect,
    /// `span` differs from `stored` because the grid is too narrow.
    pub clamped: bool,
    /// This widget is under an active drag or resize.
    pub interacting: bool,
}

/// Ghost overlay for the active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedPreview {
    pub widget: WidgetId,
    pub placement: WidgetPlacement,
    pub pixel_rect: PixelRect,
    pub valid: bool,
}

/// Container-width-aware owner of a layout and its interaction controller.
#[derive(Debug)]
pub struct GridSurface<O = ()> {
    config: GridConfig,
    metrics: GridMetrics,
    layout: Layout,
    controller: InteractionController,
    observer: O,
}

impl GridSurface<()> {
    /// Surface with no observer. Rejects invalid configuration.
    pub fn new(
        config: GridConfig,
        container_width_px: f64,
        mode: EditMode,
    ) -> Result<Self, GridConfigError> {
        Self::with_observer(config, container_width_px, mode, ())
    }
}

impl<O: LayoutObserver> GridSurface<O> {
    pub fn with_observer(
        config: GridConfig,
        container_width_px: f64,
        mode: EditMode,
        observer: O,
    ) -> Result<Self, GridConfigError> {
        config.validate()?;
        let metrics = config.metrics(container_width_px);
        Ok(Self {
            config,
            metrics,
            layout: Layout::new(),
            controller: InteractionController::new(mode),
            observer,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn columns(&self) -> u32 {
        self.metrics.columns
    }

    #[must_use]
    pub fn container_width_px(&self) -> f64 {
        self.metrics.container_width_px
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Record a new measured width. Returns `true` when the column count changed.
    ///
    /// An active gesture continues; later previews use the new geometry.
    pub fn set_container_width(&mut self, container_width_px: f64) -> bool {
        let previous = self.metrics.columns;
        self.metrics = self.config.metrics(container_width_px);
        let changed = previous != self.metrics.columns;
        if changed {
            debug!(
                width = self.metrics.container_width_px,
                breakpoint = self.metrics.breakpoint.label(),
                from = previous,
                to = self.metrics.columns,
                "column count changed"
            );
        }
        changed
    }

    /// Swap in a layout from outside (load or remote update).
    ///
    /// Any active gesture is canceled. Malformed layouts are kept as given.
    pub fn replace_layout(&mut self, layout: Layout) -> Option<InteractionTransition> {
        let canceled = self.cancel_if_active();
        let report = layout.invariant_report(self.metrics.columns);
        if !report.is_clean() {
            warn!(
                issues = report.issues.len(),
                columns = self.metrics.columns,
                "layout replaced with pre-existing overlaps or overflow"
            );
        }
        self.layout = layout;
        canceled
    }

    /// Add a widget at `position`, or at the first free slot when `None`.
    ///
    /// The size is narrowed to fit the current column count. An explicit
    /// position is taken as-is, like any host-supplied placement.
    pub fn add_widget(
        &mut self,
        id: WidgetId,
        size: SizeLabel,
        position: Option<GridCell>,
    ) -> Result<WidgetPlacement, LayoutError> {
        let columns = self.metrics.columns;
        let size = fit_to_columns(size, columns);
        let position = position.unwrap_or_else(|| self.layout.first_free_slot(size, columns));
        let placement = WidgetPlacement::new(id, position, size);
        self.layout.insert(placement)?;
        debug!(
            widget = id.get(),
            col = position.col,
            row = position.row,
            size = size.as_str(),
            "widget added"
        );
        Ok(placement)
    }

    /// Remove a widget, canceling a gesture that targets it.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<WidgetPlacement, LayoutError> {
        if self.controller.session().is_some_and(|s| s.widget == id) {
            self.cancel_if_active();
        }
        self.layout.remove(id)
    }

    /// Switch edit mode; leaving `Editing` cancels the active gesture.
    pub fn set_mode(&mut self, mode: EditMode) -> Option<InteractionTransition> {
        let transition = self.controller.set_mode(mode)?;
        self.notify(&transition);
        Some(transition)
    }

    pub fn pointer_down_widget(
        &mut self,
        widget: WidgetId,
        position: PixelPoint,
    ) -> InteractionTransition {
        self.dispatch(PointerInput::drag(widget, position))
    }

    pub fn pointer_down_handle(
        &mut self,
        widget: WidgetId,
        position: PixelPoint,
        handle: ResizeHandle,
    ) -> InteractionTransition {
        self.dispatch(PointerInput::resize(widget, position, handle))
    }

    pub fn pointer_move(&mut self, position: PixelPoint) -> InteractionTransition {
        self.dispatch(PointerInput::Move { position })
    }

    pub fn pointer_up(&mut self) -> InteractionTransition {
        self.dispatch(PointerInput::Release)
    }

    pub fn cancel(&mut self, reason: CancelReason) -> InteractionTransition {
        self.dispatch(PointerInput::Cancel { reason })
    }

    /// Route one pointer input through the controller and notify the observer.
    pub fn dispatch(&mut self, input: PointerInput) -> InteractionTransition {
        let transition = self
            .controller
            .apply(&mut self.layout, &self.metrics, input);
        self.notify(&transition);
        transition
    }

    /// Draw list for the current width, in layout order.
    #[must_use]
    pub fn render(&self) -> Vec<RenderedWidget> {
        let columns = self.metrics.columns;
        let active = self.controller.session().map(|s| s.widget);
        self.layout
            .iter()
            .map(|placement| {
                let shown = clamp_placement(*placement, columns);
                let stored = placement.rect();
                let span = shown.rect();
                RenderedWidget {
                    id: placement.id,
                    size: shown.size,
                    stored,
                    span,
                    pixel_rect: self.metrics.rect_to_pixels(span),
                    clamped: span != stored,
                    interacting: active == Some(placement.id),
                }
            })
            .collect()
    }

    /// Ghost overlay for the active gesture, once the pointer has moved.
    #[must_use]
    pub fn render_preview(&self) -> Option<RenderedPreview> {
        let session = self.controller.session()?;
        let preview = session.live_preview?;
        Some(RenderedPreview {
            widget: session.widget,
            placement: preview.placement,
            pixel_rect: self.metrics.rect_to_pixels(preview.placement.rect()),
            valid: preview.is_valid(),
        })
    }

    /// Rows the surface must show, including an in-flight preview.
    #[must_use]
    pub fn content_rows(&self) -> u32 {
        let preview_bottom = self
            .render_preview()
            .map_or(0, |p| p.placement.rect().bottom());
        self.layout.content_rows().max(preview_bottom)
    }

    /// Pixel height for [`content_rows`](Self::content_rows).
    #[must_use]
    pub fn content_height_px(&self) -> f64 {
        self.metrics.span_size_px(1, self.content_rows()).height
    }

    fn cancel_if_active(&mut self) -> Option<InteractionTransition> {
        if !self.controller.is_active() {
            return None;
        }
        let transition = self.controller.cancel(CancelReason::Programmatic);
        self.notify(&transition);
        Some(transition)
    }

    fn notify(&mut self, transition: &InteractionTransition) {
        match &transition.effect {
            InteractionEffect::Preview { widget, preview } => {
                self.observer.on_live_preview(*widget, preview);
            }
            InteractionEffect::Committed {
                previous,
                placement,
                ..
            } => self.observer.on_placement_committed(previous, placement),
            InteractionEffect::Rejected {
                widget,
                attempted,
                reason,
            } => self.observer.on_placement_rejected(*widget, attempted, *reason),
            InteractionEffect::Canceled { widget, reason } => {
                self.observer.on_session_canceled(*widget, *reason);
            }
            InteractionEffect::Started { .. }
            | InteractionEffect::Unchanged { .. }
            | InteractionEffect::Noop { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        previews: Vec<(WidgetId, bool)>,
        committed: Vec<WidgetPlacement>,
        rejected: Vec<(WidgetId, RejectReason)>,
        canceled: Vec<(WidgetId, CancelReason)>,
    }

    impl LayoutObserver for Recorder {
        fn on_live_preview(&mut self, widget: WidgetId, preview: &LivePreview) {
            self.previews.push((widget, preview.is_valid()));
        }

        fn on_placement_committed(
            &mut self,
            _previous: &WidgetPlacement,
            placement: &WidgetPlacement,
        ) {
            self.committed.push(*placement);
        }

        fn on_placement_rejected(
            &mut self,
            widget: WidgetId,
            _attempted: &WidgetPlacement,
            reason: RejectReason,
        ) {
            self.rejected.push((widget, reason));
        }

        fn on_session_canceled(&mut self, widget: WidgetId, reason: CancelReason) {
            self.canceled.push((widget, reason));
        }
    }

    fn id(raw: u64) -> WidgetId {
        WidgetId::new(raw)
    }

    fn surface(width: f64) -> GridSurface<Recorder> {
        GridSurface::with_observer(
            GridConfig::default(),
            width,
            EditMode::Editing,
            Recorder::default(),
        )
        .expect("default config is valid")
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = GridConfig {
            gap_px: f64::NAN,
            ..GridConfig::default()
        };
        assert!(GridSurface::new(config, 1200.0, EditMode::Viewing).is_err());
    }

    #[test]
    fn add_widget_fills_first_free_slot() {
        let mut s = surface(1200.0);
        let a = s.add_widget(id(1), SizeLabel::S3x2, None).expect("add");
        let b = s.add_widget(id(2), SizeLabel::S3x1, None).expect("add");
        let c = s.add_widget(id(3), SizeLabel::S4x1, None).expect("add");
        assert_eq!(a.position, GridCell::new(0, 0));
        assert_eq!(b.position, GridCell::new(3, 0));
        assert_eq!(c.position, GridCell::new(0, 2));
        assert_eq!(
            s.add_widget(id(1), SizeLabel::S1x1, None),
            Err(LayoutError::DuplicateWidget { id: id(1) })
        );
    }

    #[test]
    fn add_widget_narrows_to_columns() {
        let mut s = surface(600.0);
        assert_eq!(s.columns(), 2);
        let placed = s.add_widget(id(1), SizeLabel::S4x2, None).expect("add");
        assert_eq!(placed.size, SizeLabel::S2x2);
    }

    #[test]
    fn width_change_reports_column_change() {
        let mut s = surface(1200.0);
        assert!(!s.set_container_width(1100.0));
        assert!(s.set_container_width(800.0));
        assert_eq!(s.columns(), 4);
        assert!(s.set_container_width(0.0));
        assert_eq!(s.columns(), 1);
    }

    #[test]
    fn render_clamps_without_touching_storage() {
        let mut s = surface(1200.0);
        s.add_widget(id(1), SizeLabel::S2x1, Some(GridCell::new(4, 0)))
            .expect("add");
        s.set_container_width(800.0);

        let drawn = s.render();
        assert_eq!(drawn.len(), 1);
        assert!(drawn[0].clamped);
        assert_eq!(drawn[0].span, GridRect::new(2, 0, 2, 1));
        assert_eq!(drawn[0].stored, GridRect::new(4, 0, 2, 1));
        assert_eq!(
            s.layout().get(id(1)).map(|p| p.position),
            Some(GridCell::new(4, 0))
        );

        s.set_container_width(1200.0);
        assert!(!s.render()[0].clamped);
    }

    #[test]
    fn gesture_events_reach_observer() {
        let mut s = surface(1200.0);
        s.add_widget(id(1), SizeLabel::S2x2, None).expect("add");
        s.add_widget(id(2), SizeLabel::S2x2, None).expect("add");
        let m = *s.metrics();

        s.pointer_down_widget(id(2), m.cell_origin_px(GridCell::new(2, 0)));
        s.pointer_move(m.cell_origin_px(GridCell::new(1, 0)));
        s.pointer_move(m.cell_origin_px(GridCell::new(4, 0)));
        let t = s.pointer_up();
        assert!(matches!(t.effect, InteractionEffect::Committed { .. }));

        let rec = s.observer();
        assert_eq!(rec.previews, vec![(id(2), false), (id(2), true)]);
        assert_eq!(
            rec.committed,
            vec![WidgetPlacement::new(id(2), GridCell::new(4, 0), SizeLabel::S2x2)]
        );
        assert!(rec.rejected.is_empty());
    }

    #[test]
    fn rejected_release_reaches_observer() {
        let mut s = surface(1200.0);
        s.add_widget(id(1), SizeLabel::S2x2, None).expect("add");
        s.add_widget(id(2), SizeLabel::S2x2, None).expect("add");
        let m = *s.metrics();

        s.pointer_down_widget(id(2), m.cell_origin_px(GridCell::new(2, 0)));
        s.pointer_move(m.cell_origin_px(GridCell::new(1, 1)));
        s.pointer_up();
        assert_eq!(
            s.observer().rejected,
            vec![(id(2), RejectReason::Overlap { with: id(1) })]
        );
        assert_eq!(
            s.layout().get(id(2)).map(|p| p.position),
            Some(GridCell::new(2, 0))
        );
    }

    #[test]
    fn preview_is_rendered_during_gesture() {
        let mut s = surface(1200.0);
        s.add_widget(id(1), SizeLabel::S1x1, None).expect("add");
        let m = *s.metrics();
        s.pointer_down_widget(id(1), PixelPoint::ORIGIN);
        assert!(s.render_preview().is_none());
        assert!(s.render()[0].interacting);

        s.pointer_move(m.cell_origin_px(GridCell::new(0, 5)));
        let preview = s.render_preview().expect("preview");
        assert!(preview.valid);
        assert_eq!(preview.placement.position, GridCell::new(0, 5));
        assert_eq!(s.content_rows(), 6);

        s.cancel(CancelReason::EscapeKey);
        assert!(s.render_preview().is_none());
        assert_eq!(s.content_rows(), 1);
        assert_eq!(s.observer().canceled, vec![(id(1), CancelReason::EscapeKey)]);
    }

    #[test]
    fn removing_dragged_widget_cancels() {
        let mut s = surface(1200.0);
        s.add_widget(id(1), SizeLabel::S1x1, None).expect("add");
        s.pointer_down_widget(id(1), PixelPoint::ORIGIN);
        s.remove_widget(id(1)).expect("remove");
        assert_eq!(s.state(), InteractionState::Idle);
        assert_eq!(
            s.observer().canceled,
            vec![(id(1), CancelReason::Programmatic)]
        );
    }

    #[test]
    fn replace_layout_cancels_and_keeps_malformed_data() {
        let mut s = surface(1200.0);
        s.add_widget(id(1), SizeLabel::S1x1, None).expect("add");
        s.pointer_down_widget(id(1), PixelPoint::ORIGIN);

        let stale = Layout::from_placements([
            WidgetPlacement::new(id(5), GridCell::new(0, 0), SizeLabel::S2x2),
            WidgetPlacement::new(id(6), GridCell::new(1, 1), SizeLabel::S2x2),
        ])
        .expect("layout");
        let t = s.replace_layout(stale.clone()).expect("active gesture canceled");
        assert_eq!(t.to, InteractionState::Idle);
        assert_eq!(s.layout(), &stale);
    }

    #[test]
    fn view_mode_blocks_gestures() {
        let mut s = GridSurface::new(GridConfig::default(), 1200.0, EditMode::Viewing)
            .expect("surface");
        s.add_widget(id(1), SizeLabel::S1x1, None).expect("add");
        let t = s.pointer_down_widget(id(1), PixelPoint::ORIGIN);
        assert!(matches!(t.effect, InteractionEffect::Noop { .. }));
        assert!(s.set_mode(EditMode::Editing).is_none());
        let t = s.pointer_down_widget(id(1), PixelPoint::ORIGIN);
        assert!(matches!(t.effect, InteractionEffect::Started { .. }));
    }
}
