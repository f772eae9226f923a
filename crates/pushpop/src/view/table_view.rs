//! The table view controller.

use std::sync::Arc;

use pushpop_core::logging::{PerfSpan, span_names, targets};
use pushpop_core::{SharedTaskQueue, Signal, TaskId};
use serde_json::{Map, Value};

use crate::config::TableViewConfig;
use crate::error::{Error, Result};
use crate::model::{Item, ItemStore, SelectionState, ValueChange};
use crate::view::cell::CellRegistry;
use crate::view::recycle::{RecyclePool, Row};
use crate::view::scroll::ScrollContainer;
use crate::view::window::{RowSpan, ScrollMetrics, Window, plan_redraw};

/// Payload of [`TableViewSignals::did_select_row`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEvent {
    pub index: usize,
    /// Snapshot of the item at selection time.
    pub item: Item,
    pub has_child_store: bool,
}

/// What a selection request did.
#[derive(Debug)]
pub enum SelectOutcome {
    /// No data source, or the store refused the selection.
    Ignored,
    Selected,
    /// The row was selected and holds nested items. The caller decides how to
    /// present the child store.
    Descend(ItemStore),
}

/// Signals emitted by a [`TableView`].
///
/// `did_select_row` is delivered on the next turn of the view's task queue;
/// every other signal fires synchronously.
pub struct TableViewSignals {
    pub did_select_row: Signal<SelectionEvent>,
    pub did_deselect_row: Signal<usize>,
    /// The rendered span after a draw, `None` when nothing is rendered.
    pub did_draw_rows: Signal<Option<RowSpan>>,
    pub did_reload_data: Signal<()>,
    pub did_change_value: Signal<ValueChange>,
    pub did_change_data_source: Signal<()>,
}

impl TableViewSignals {
    fn new() -> Self {
        Self {
            did_select_row: Signal::new(),
            did_deselect_row: Signal::new(),
            did_draw_rows: Signal::new(),
            did_reload_data: Signal::new(),
            did_change_value: Signal::new(),
            did_change_data_source: Signal::new(),
        }
    }
}

/// A recycling, filterable list of rows inside a scroll container.
///
/// Only the rows near the viewport are bound to live cells. Scrolling past a
/// threshold redraws the window, releasing rows that left it and binding rows
/// that entered it, reusing released rows of the same style.
///
/// # Example
///
/// ```
/// use pushpop::{Item, ItemStore, ScrollState, SharedTaskQueue, TableView, TableViewConfig};
///
/// let items = (0..1000).map(|i| Item::titled(format!("Row {i}"))).collect();
/// let mut view = TableView::new(
///     TableViewConfig::default(),
///     ScrollState::new(440.0),
///     SharedTaskQueue::new(),
/// )?;
/// view.set_data_source(ItemStore::new(items));
///
/// assert_eq!(view.rendered_span().map(|s| (s.first, s.last)), Some((0, 19)));
///
/// view.scroll_to(4400.0);
/// assert_eq!(view.rendered_span().map(|s| (s.first, s.last)), Some((90, 119)));
/// # Ok::<(), pushpop::Error>(())
/// ```
pub struct TableView {
    config: TableViewConfig,
    store: Option<ItemStore>,
    registry: CellRegistry,
    pool: RecyclePool,
    selection: SelectionState,
    window: Window,
    drawing: bool,
    editing: bool,
    last_draw_cost: usize,
    scroll: Box<dyn ScrollContainer>,
    signals: Arc<TableViewSignals>,
    queue: SharedTaskQueue,
    pending_notifications: Vec<TaskId>,
}

impl TableView {
    /// Create an empty table view.
    ///
    /// `queue` is the host's deferred task queue; selection notifications are
    /// posted to it.
    pub fn new(
        config: TableViewConfig,
        scroll: impl ScrollContainer + 'static,
        queue: SharedTaskQueue,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: None,
            registry: CellRegistry::new(),
            pool: RecyclePool::new(),
            selection: SelectionState::new(),
            window: Window::EMPTY,
            drawing: false,
            editing: false,
            last_draw_cost: 0,
            scroll: Box::new(scroll),
            signals: Arc::new(TableViewSignals::new()),
            queue,
            pending_notifications: Vec::new(),
        })
    }

    /// Use a custom set of row styles.
    pub fn with_registry(mut self, registry: CellRegistry) -> Self {
        self.registry = registry;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &TableViewConfig {
        &self.config
    }

    pub fn signals(&self) -> &Arc<TableViewSignals> {
        &self.signals
    }

    pub fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    pub fn data_source(&self) -> Option<&ItemStore> {
        self.store.as_ref()
    }

    /// Number of rows in the filtered set, 0 without a data source.
    pub fn row_count(&self) -> usize {
        self.store.as_ref().map_or(0, ItemStore::count)
    }

    pub fn scroll(&self) -> &dyn ScrollContainer {
        self.scroll.as_ref()
    }

    pub fn scroll_mut(&mut self) -> &mut dyn ScrollContainer {
        self.scroll.as_mut()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn rendered_span(&self) -> Option<RowSpan> {
        self.window.rendered
    }

    pub fn visible_span(&self) -> Option<RowSpan> {
        self.window.visible
    }

    /// The `(min, max)` scroll thresholds, `None` where disabled.
    pub fn thresholds(&self) -> (Option<f32>, Option<f32>) {
        (self.window.min_threshold, self.window.max_threshold)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Acquire plus release operations performed by the most recent draw.
    pub fn last_draw_cost(&self) -> usize {
        self.last_draw_cost
    }

    pub fn pool(&self) -> &RecyclePool {
        &self.pool
    }

    /// Rendered rows in display order.
    pub fn rendered_rows(&self) -> impl Iterator<Item = &Row> {
        self.pool.rendered()
    }

    /// The rendered row bound to `index`, if it is in the window.
    pub fn rendered_row_at(&self, index: usize) -> Option<&Row> {
        self.pool.row_for_index(index)
    }

    /// Markup of every rendered row, in order.
    pub fn render_markup(&self) -> String {
        self.pool.rendered().map(Row::render_markup).collect()
    }

    /// A store over `items` configured from this view's settings.
    pub fn new_store(&self, items: Vec<Item>) -> ItemStore {
        ItemStore::new(items).with_config(&self.config)
    }

    // =========================================================================
    // Data source
    // =========================================================================

    /// Replace the data source and redraw from scratch.
    ///
    /// Clears the selection and drops selection notifications that have not
    /// been delivered yet.
    pub fn set_data_source(&mut self, store: ItemStore) {
        tracing::debug!(target: targets::VIEW, count = store.count(), "data source changed");
        self.cancel_pending_notifications();
        self.selection.deselect_all();
        self.store = Some(store);
        self.signals.did_change_data_source.emit(());
        self.reload_data();
    }

    /// Remove the data source, releasing every rendered row.
    pub fn take_data_source(&mut self) -> Option<ItemStore> {
        let store = self.store.take();
        if store.is_some() {
            self.cancel_pending_notifications();
            self.selection.deselect_all();
            self.signals.did_change_data_source.emit(());
            self.reload_data();
        }
        store
    }

    /// Filter the data source and reload if the visible set changed.
    ///
    /// Any selection is cleared when the set changes, since filtered indexes
    /// shift. Returns whether the set changed.
    pub fn set_filter_pattern(&mut self, pattern: &str, case_sensitive: bool) -> Result<bool> {
        let Some(store) = self.store.as_mut() else {
            return Ok(false);
        };
        let changed = store.set_pattern(pattern, case_sensitive)?;
        if changed {
            self.deselect_all_rows();
            self.reload_data();
        }
        Ok(changed)
    }

    /// [`set_filter_pattern`](Self::set_filter_pattern) with the configured
    /// case sensitivity.
    pub fn set_filter(&mut self, pattern: &str) -> Result<bool> {
        self.set_filter_pattern(pattern, self.config.case_sensitive_filter)
    }

    /// Set a field on the item at a filtered index and refresh its row.
    pub fn set_value(&mut self, index: usize, key: &str, value: Value) -> Result<Option<ValueChange>> {
        let Some(store) = self.store.as_mut() else {
            return Ok(None);
        };
        let change = store.set_value(index, key, value)?;
        if let Some(change) = &change {
            if let Some(row) = self.pool.row_for_index_mut(index) {
                let item = store.item_at(index)?;
                let (accessory, editing_accessory) = store.accessories_for(item);
                row.bind(index, item, accessory, editing_accessory);
            }
            self.signals.did_change_value.emit(change.clone());
        }
        Ok(change)
    }

    /// Assign form values by name, then reload. Returns the number of items
    /// updated.
    pub fn set_values_from_object(
        &mut self,
        object: &Map<String, Value>,
        key_field: &str,
        value_field: &str,
    ) -> usize {
        let Some(store) = self.store.as_mut() else {
            return 0;
        };
        let updated = store.set_values_from_object(object, key_field, value_field);
        self.reload_data();
        updated
    }

    /// Reset form values to their defaults, then reload.
    pub fn clear_values(&mut self, value_field: &str, default_field: &str) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        store.clear_values(value_field, default_field);
        self.reload_data();
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Move the scroll position and redraw if a threshold was crossed.
    pub fn scroll_to(&mut self, y: f32) -> bool {
        let (x, _) = self.scroll.scroll_position();
        self.scroll.set_scroll_position(x, y);
        self.handle_scroll()
    }

    /// React to a scroll event. Returns whether a redraw happened.
    pub fn handle_scroll(&mut self) -> bool {
        if self.drawing {
            tracing::trace!(target: targets::VIEW, "scroll during draw ignored");
            return false;
        }
        let (_, y) = self.scroll.scroll_position();
        if self.window.needs_redraw(y) {
            self.draw();
            true
        } else {
            false
        }
    }

    /// React to the container being scrolled to the top. Always redraws.
    pub fn handle_scrolled_to_top(&mut self) {
        self.draw();
    }

    /// Bring the rendered rows in line with the current scroll position.
    ///
    /// Only rows entering or leaving the window are touched. Released rows go
    /// back to their pool before new rows are acquired, so they can be reused
    /// within the same draw.
    pub fn draw(&mut self) {
        if self.drawing {
            tracing::trace!(target: targets::VIEW, "draw requested while drawing, dropped");
            return;
        }
        let Some(store) = self.store.as_ref() else {
            return;
        };
        self.drawing = true;
        let _perf = PerfSpan::new(span_names::DRAW);

        let count = store.count();
        let row_height = self.config.row_height;
        let next = Window::compute(ScrollMetrics {
            scroll_position: self.scroll.scroll_position().1,
            viewport_height: self.scroll.viewport_height(),
            row_height,
            item_count: count,
        });
        let plan = plan_redraw(self.window.rendered, next.rendered);

        for &index in &plan.release {
            if !self.pool.release(index) {
                tracing::warn!(target: targets::VIEW, index, "no rendered row to release");
            }
        }
        for (&index, at_front) in plan
            .prepend
            .iter()
            .map(|i| (i, true))
            .chain(plan.append.iter().map(|i| (i, false)))
        {
            let Ok(item) = store.item_at(index) else {
                tracing::warn!(target: targets::VIEW, index, count, "window index outside data source");
                continue;
            };
            let style = item
                .reuse_identifier()
                .unwrap_or(store.default_reuse_identifier());
            let row = if at_front {
                self.pool.acquire_front(&self.registry, style)
            } else {
                self.pool.acquire_back(&self.registry, style)
            };
            let (accessory, editing_accessory) = store.accessories_for(item);
            row.bind(index, item, accessory, editing_accessory);
            row.set_selected(self.selection.is_selected(index));
            row.set_editing(self.editing);
        }

        let (top, bottom) = next.blank_space(row_height, count);
        let margins = self.scroll.margins().with_vertical(top, bottom);
        self.scroll.set_margins(margins);

        tracing::debug!(
            target: targets::VIEW,
            rendered = ?next.rendered,
            released = plan.release.len(),
            bound = plan.prepend.len() + plan.append.len(),
            pooled = self.pool.pooled_count(),
            "drew rows"
        );

        self.window = next;
        self.last_draw_cost = plan.cost();
        self.drawing = false;
        self.signals.did_draw_rows.emit(next.rendered);
    }

    /// Release every rendered row and draw again at the same scroll position.
    pub fn reload_data(&mut self) {
        let _perf = PerfSpan::new(span_names::RELOAD);
        let (x, y) = self.scroll.scroll_position();

        let released = self.pool.release_all();
        self.window = Window::EMPTY;
        if self.store.is_none() {
            let margins = self.scroll.margins().with_vertical(0.0, 0.0);
            self.scroll.set_margins(margins);
        }
        self.draw();
        self.scroll.set_scroll_position(x, y);

        tracing::debug!(
            target: targets::VIEW,
            released,
            rendered = self.pool.rendered_count(),
            "reloaded data"
        );
        self.signals.did_reload_data.emit(());
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Enter or leave editing mode.
    ///
    /// While editing, every rendered row carries the `pp-table-view-editing`
    /// class and shows its editing accessory. Rows bound later follow the
    /// current mode.
    pub fn set_editing(&mut self, editing: bool) {
        if self.editing == editing {
            return;
        }
        self.editing = editing;
        for row in self.pool.rendered_mut() {
            row.set_editing(editing);
        }
        tracing::debug!(target: targets::VIEW, editing, "editing mode changed");
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn is_row_selected(&self, index: usize) -> bool {
        self.selection.is_selected(index)
    }

    pub fn selected_row_indexes(&self) -> Vec<usize> {
        self.selection.selected_indexes()
    }

    pub fn first_selected_row(&self) -> Option<usize> {
        self.selection.first_selected()
    }

    /// Select a row, replacing any previous selection.
    ///
    /// Rows the store refuses are ignored. `did_select_row` is posted to the
    /// task queue rather than emitted directly.
    pub fn select_row(&mut self, index: usize) -> Result<SelectOutcome> {
        let Some(store) = self.store.as_ref() else {
            return Ok(SelectOutcome::Ignored);
        };
        let count = store.count();
        if index >= count {
            return Err(Error::out_of_range(index, count));
        }
        if !store.can_select(index) {
            tracing::debug!(target: targets::VIEW, index, "selection refused by data source");
            return Ok(SelectOutcome::Ignored);
        }

        let child = if store.has_child_store(index) {
            store.derive_child_store(index)?
        } else {
            None
        };
        let item = store.item_at(index)?.clone();

        self.deselect_all_rows();
        self.selection.select(index);
        if let Some(row) = self.pool.row_for_index_mut(index) {
            row.set_selected(true);
        }

        let event = SelectionEvent {
            index,
            item,
            has_child_store: child.is_some(),
        };
        let signals = self.signals.clone();
        let queue = &self.queue;
        self.pending_notifications.retain(|id| queue.is_pending(*id));
        self.pending_notifications
            .push(queue.post(move || signals.did_select_row.emit(event)));

        Ok(match child {
            Some(child) => SelectOutcome::Descend(child),
            None => SelectOutcome::Selected,
        })
    }

    /// Deselect one row and notify, whether or not it was selected.
    pub fn deselect_row(&mut self, index: usize) {
        self.selection.deselect(index);
        self.mark_deselected(index);
    }

    pub fn deselect_all_rows(&mut self) {
        for index in self.selection.deselect_all() {
            self.mark_deselected(index);
        }
    }

    fn mark_deselected(&mut self, index: usize) {
        if let Some(row) = self.pool.row_for_index_mut(index) {
            row.set_selected(false);
        }
        self.signals.did_deselect_row.emit(index);
    }

    /// Entry point for a resolved tap from the gesture layer.
    ///
    /// Gives the row's cell a chance to react, then selects the row.
    pub fn tap_row(&mut self, index: usize) -> Result<SelectOutcome> {
        if let Some(row) = self.pool.row_for_index_mut(index) {
            row.cell_mut().on_tap();
        }
        self.select_row(index)
    }

    fn cancel_pending_notifications(&mut self) {
        for id in self.pending_notifications.drain(..) {
            if let Err(err) = self.queue.cancel(id) {
                tracing::trace!(target: targets::VIEW, %err, "notification already delivered");
            }
        }
    }
}

static_assertions::assert_impl_all!(TableView: Send);
static_assertions::assert_impl_all!(TableViewSignals: Send, Sync);
