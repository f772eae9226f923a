//! Row recycling.
//!
//! [`RecyclePool`] owns every row a table view has ever constructed. A row
//! lives either in the ordered rendered set or in the free list for its style,
//! never both: rows are moved between the two containers, so ownership
//! enforces the partition.

use std::collections::{HashMap, VecDeque};

use pushpop_core::logging::targets;

use crate::model::Item;
use crate::view::cell::{
    AccessoryType, CellRegistry, EditingAccessoryType, TableCell, escape_markup,
};

/// Identity of a constructed row, stable across reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A live row: a cell plus the table view's bookkeeping for it.
pub struct Row {
    id: RowId,
    style_key: String,
    bound_index: Option<usize>,
    selected: bool,
    editing: bool,
    accessory: AccessoryType,
    editing_accessory: EditingAccessoryType,
    cell: Box<dyn TableCell>,
}

impl Row {
    pub fn id(&self) -> RowId {
        self.id
    }

    /// The resolved style this row was constructed for.
    pub fn style_key(&self) -> &str {
        &self.style_key
    }

    /// Filtered index of the item shown, `None` while pooled.
    pub fn bound_index(&self) -> Option<usize> {
        self.bound_index
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the row shows its editing accessory.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn accessory(&self) -> AccessoryType {
        self.accessory
    }

    pub fn editing_accessory(&self) -> EditingAccessoryType {
        self.editing_accessory
    }

    pub fn cell(&self) -> &dyn TableCell {
        self.cell.as_ref()
    }

    pub fn cell_mut(&mut self) -> &mut dyn TableCell {
        self.cell.as_mut()
    }

    /// Full row markup: the cell body wrapped with style, selection and
    /// accessory classes.
    ///
    /// The editing accessory leads the body, and only while editing.
    pub fn render_markup(&self) -> String {
        let mut classes = format!("pp-table-view-cell {}", escape_markup(&self.style_key));
        if self.selected {
            classes.push_str(" pp-table-view-selected-state");
        }
        let mut editing_accessory = String::new();
        if self.editing {
            classes.push_str(" pp-table-view-editing");
            if let Some(class) = self.editing_accessory.css_class() {
                editing_accessory =
                    format!("<span class=\"pp-table-view-cell-editing-accessory {class}\"></span>");
            }
        }
        let accessory = self
            .accessory
            .css_class()
            .map(|class| format!("<span class=\"pp-table-view-cell-accessory {class}\"></span>"))
            .unwrap_or_default();
        format!(
            "<li class=\"{classes}\">{editing_accessory}{}{accessory}</li>",
            self.cell.render_markup()
        )
    }

    /// Bind the item at filtered `index`, with its accessories already
    /// resolved against the store defaults.
    pub(crate) fn bind(
        &mut self,
        index: usize,
        item: &Item,
        accessory: AccessoryType,
        editing_accessory: EditingAccessoryType,
    ) {
        self.bound_index = Some(index);
        self.accessory = accessory;
        self.editing_accessory = editing_accessory;
        self.cell.bind(item);
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub(crate) fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    fn unbind(&mut self) {
        self.bound_index = None;
        self.selected = false;
        self.editing = false;
        self.accessory = AccessoryType::None;
        self.editing_accessory = EditingAccessoryType::None;
        self.cell.prepare_for_reuse();
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.id)
            .field("style_key", &self.style_key)
            .field("bound_index", &self.bound_index)
            .field("selected", &self.selected)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

/// The rendered rows plus per-style free lists.
#[derive(Debug, Default)]
pub struct RecyclePool {
    /// Bound rows, ordered by ascending bound index.
    rendered: VecDeque<Row>,
    pooled: HashMap<String, Vec<Row>>,
    constructed: HashMap<String, usize>,
    next_id: u64,
}

impl RecyclePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a row for `style` and push it to the back of the rendered set.
    ///
    /// The returned row is not yet bound.
    pub fn acquire_back(&mut self, registry: &CellRegistry, style: &str) -> &mut Row {
        let row = self.take(registry, style);
        self.rendered.push_back(row);
        let last = self.rendered.len() - 1;
        &mut self.rendered[last]
    }

    /// Take a row for `style` and push it to the front of the rendered set.
    pub fn acquire_front(&mut self, registry: &CellRegistry, style: &str) -> &mut Row {
        let row = self.take(registry, style);
        self.rendered.push_front(row);
        &mut self.rendered[0]
    }

    fn take(&mut self, registry: &CellRegistry, style: &str) -> Row {
        let style = registry.resolve(style);
        if let Some(row) = self.pooled.get_mut(style).and_then(Vec::pop) {
            return row;
        }

        self.next_id += 1;
        *self.constructed.entry(style.to_string()).or_default() += 1;
        tracing::debug!(target: targets::VIEW, style, id = self.next_id, "constructing row");
        Row {
            id: RowId(self.next_id),
            style_key: style.to_string(),
            bound_index: None,
            selected: false,
            editing: false,
            accessory: AccessoryType::None,
            editing_accessory: EditingAccessoryType::None,
            cell: registry.construct(style),
        }
    }

    /// Unbind the rendered row showing `index` and return it to its free list.
    ///
    /// Returns `false` if no rendered row shows `index`.
    pub fn release(&mut self, index: usize) -> bool {
        let Some(position) = self.position_of(index) else {
            return false;
        };
        match self.rendered.remove(position) {
            Some(row) => {
                self.recycle(row);
                true
            }
            None => false,
        }
    }

    /// Release every rendered row. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.rendered.len();
        while let Some(row) = self.rendered.pop_front() {
            self.recycle(row);
        }
        count
    }

    fn recycle(&mut self, mut row: Row) {
        row.unbind();
        self.pooled.entry(row.style_key.clone()).or_default().push(row);
    }

    fn position_of(&self, index: usize) -> Option<usize> {
        // Rendered rows are contiguous and ascending, so the offset from the
        // first bound index is the position. Fall back to a scan otherwise.
        let first = self.rendered.front().and_then(|row| row.bound_index);
        if let Some(position) = first.and_then(|first| index.checked_sub(first))
            && self
                .rendered
                .get(position)
                .is_some_and(|row| row.bound_index == Some(index))
        {
            return Some(position);
        }
        self.rendered
            .iter()
            .position(|row| row.bound_index == Some(index))
    }

    /// The rendered row showing `index`.
    pub fn row_for_index(&self, index: usize) -> Option<&Row> {
        let position = self.position_of(index)?;
        self.rendered.get(position)
    }

    pub fn row_for_index_mut(&mut self, index: usize) -> Option<&mut Row> {
        let position = self.position_of(index)?;
        self.rendered.get_mut(position)
    }

    /// Rendered rows in display order.
    pub fn rendered(&self) -> impl Iterator<Item = &Row> {
        self.rendered.iter()
    }

    pub fn rendered_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rendered.iter_mut()
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    /// Rows waiting in the free list for `style`.
    pub fn pooled(&self, style: &str) -> &[Row] {
        self.pooled.get(style).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pooled_count(&self) -> usize {
        self.pooled.values().map(Vec::len).sum()
    }

    /// Rows ever constructed for `style`.
    pub fn constructed_count(&self, style: &str) -> usize {
        self.constructed.get(style).copied().unwrap_or(0)
    }

    pub fn total_constructed(&self) -> usize {
        self.constructed.values().sum()
    }

    /// Styles that have constructed at least one row.
    pub fn styles(&self) -> impl Iterator<Item = &str> {
        self.constructed.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REUSE_IDENTIFIER;

    fn bind_back(pool: &mut RecyclePool, registry: &CellRegistry, index: usize) -> RowId {
        let row = pool.acquire_back(registry, DEFAULT_REUSE_IDENTIFIER);
        row.bind(
            index,
            &Item::titled(format!("row {index}")),
            AccessoryType::None,
            EditingAccessoryType::None,
        );
        row.id()
    }

    #[test]
    fn test_release_then_acquire_reuses_row() {
        let registry = CellRegistry::new();
        let mut pool = RecyclePool::new();

        let first = bind_back(&mut pool, &registry, 0);
        bind_back(&mut pool, &registry, 1);
        assert_eq!(pool.total_constructed(), 2);

        assert!(pool.release(0));
        assert_eq!(pool.pooled(DEFAULT_REUSE_IDENTIFIER).len(), 1);
        assert_eq!(pool.pooled(DEFAULT_REUSE_IDENTIFIER)[0].bound_index(), None);

        let reused = bind_back(&mut pool, &registry, 2);
        assert_eq!(reused, first);
        assert_eq!(pool.total_constructed(), 2);
        assert_eq!(pool.pooled_count(), 0);
    }

    #[test]
    fn test_acquire_front_keeps_order() {
        let registry = CellRegistry::new();
        let mut pool = RecyclePool::new();
        bind_back(&mut pool, &registry, 5);
        pool.acquire_front(&registry, DEFAULT_REUSE_IDENTIFIER)
            .bind(4, &Item::titled("row 4"), AccessoryType::None, EditingAccessoryType::None);

        let order: Vec<_> = pool.rendered().filter_map(Row::bound_index).collect();
        assert_eq!(order, vec![4, 5]);
        assert!(pool.row_for_index(5).is_some());
    }

    #[test]
    fn test_release_unknown_index() {
        let registry = CellRegistry::new();
        let mut pool = RecyclePool::new();
        bind_back(&mut pool, &registry, 0);
        assert!(!pool.release(7));
        assert_eq!(pool.rendered_count(), 1);
    }

    #[test]
    fn test_release_clears_row_state() {
        let registry = CellRegistry::new();
        let mut pool = RecyclePool::new();
        let row = pool.acquire_back(&registry, DEFAULT_REUSE_IDENTIFIER);
        row.bind(
            0,
            &Item::titled("x"),
            AccessoryType::Checkmark,
            EditingAccessoryType::DeleteButton,
        );
        row.set_selected(true);
        row.set_editing(true);
        assert!(row.render_markup().contains("pp-table-view-selected-state"));
        assert!(row.render_markup().contains("accessory-checkmark"));

        assert_eq!(pool.release_all(), 1);
        let pooled = &pool.pooled(DEFAULT_REUSE_IDENTIFIER)[0];
        assert!(!pooled.is_selected());
        assert!(!pooled.is_editing());
        assert_eq!(pooled.accessory(), AccessoryType::None);
        assert_eq!(pooled.editing_accessory(), EditingAccessoryType::None);
        assert_eq!(pooled.cell().render_markup(), "<h1>&nbsp;</h1>");
    }

    #[test]
    fn test_editing_accessory_leads_only_while_editing() {
        let registry = CellRegistry::new();
        let mut pool = RecyclePool::new();
        let row = pool.acquire_back(&registry, DEFAULT_REUSE_IDENTIFIER);
        row.bind(
            0,
            &Item::titled("Milk"),
            AccessoryType::None,
            EditingAccessoryType::AddButton,
        );
        assert_eq!(
            row.render_markup(),
            "<li class=\"pp-table-view-cell default\"><h1>Milk</h1></li>"
        );

        row.set_editing(true);
        assert_eq!(
            row.render_markup(),
            "<li class=\"pp-table-view-cell default pp-table-view-editing\">\
             <span class=\"pp-table-view-cell-editing-accessory \
             pp-table-view-cell-editing-accessory-add-button\"></span>\
             <h1>Milk</h1></li>"
        );
    }

    #[test]
    fn test_unknown_style_pools_under_default() {
        let registry = CellRegistry::new();
        let mut pool = RecyclePool::new();
        let row = pool.acquire_back(&registry, "fancy");
        assert_eq!(row.style_key(), DEFAULT_REUSE_IDENTIFIER);
        assert_eq!(pool.constructed_count("fancy"), 0);
        assert_eq!(pool.constructed_count(DEFAULT_REUSE_IDENTIFIER), 1);
    }
}
