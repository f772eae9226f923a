//! End-to-end table view scenarios.

use std::sync::Arc;

use parking_lot::Mutex;
use pushpop::view::{RowSpan, TextCell};
use pushpop::{
    CellRegistry, Item, ItemStore, ScrollState, SelectOutcome, SharedTaskQueue, TableCell,
    TableView, TableViewConfig,
};
use serde_json::{Map, json};

fn setup(config: TableViewConfig) -> (TableView, SharedTaskQueue) {
    let queue = SharedTaskQueue::new();
    let view = TableView::new(config, ScrollState::new(440.0), queue.clone())
        .expect("valid config");
    (view, queue)
}

fn numbered(count: usize) -> Vec<Item> {
    (0..count).map(|i| Item::titled(format!("Row {i}"))).collect()
}

#[test]
fn test_scrolling_through_large_list() {
    let (mut view, _) = setup(TableViewConfig::default());
    let drawn = Arc::new(Mutex::new(Vec::new()));
    let drawn_clone = drawn.clone();
    view.signals().did_draw_rows.connect(move |span| {
        drawn_clone.lock().push(*span);
    });

    view.set_data_source(ItemStore::new(numbered(1000)));
    assert_eq!(view.rendered_span(), Some(RowSpan::new(0, 19)));
    assert_eq!(view.visible_span(), Some(RowSpan::new(0, 9)));

    view.scroll_to(4400.0);
    assert_eq!(view.rendered_span(), Some(RowSpan::new(90, 119)));
    assert_eq!(view.visible_span(), Some(RowSpan::new(100, 109)));
    assert_eq!(view.thresholds(), (Some(3960.0), Some(4840.0)));
    assert_eq!(view.scroll().margins().top, 90.0 * 44.0);
    assert_eq!(view.scroll().margins().bottom, 880.0 * 44.0);

    let markup = view.render_markup();
    assert!(markup.starts_with("<li class=\"pp-table-view-cell default\"><h1>Row 90</h1>"));
    assert_eq!(markup.matches("<li ").count(), 30);

    assert_eq!(
        *drawn.lock(),
        vec![Some(RowSpan::new(0, 19)), Some(RowSpan::new(90, 119))]
    );
}

#[test]
fn test_scrolling_to_the_end() {
    let (mut view, _) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(numbered(100)));

    view.scroll_to(100.0 * 44.0 - 440.0);
    assert_eq!(view.rendered_span(), Some(RowSpan::new(80, 99)));
    assert_eq!(view.thresholds().1, None);
    assert_eq!(view.scroll().margins().bottom, 0.0);
}

#[test]
fn test_reload_keeps_window() {
    let (mut view, _) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(numbered(1000)));
    view.scroll_to(4400.0);

    let reloads = Arc::new(Mutex::new(0));
    let reloads_clone = reloads.clone();
    view.signals().did_reload_data.connect(move |_| *reloads_clone.lock() += 1);

    view.reload_data();
    assert_eq!(view.scroll().scroll_position(), (0.0, 4400.0));
    assert_eq!(view.rendered_span(), Some(RowSpan::new(90, 119)));
    assert_eq!(view.pool().total_constructed(), 30);
    assert_eq!(*reloads.lock(), 1);
}

#[test]
fn test_filter_through_view() {
    let (mut view, _) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(vec![
        Item::titled("abc"),
        Item::titled("xab"),
        Item::titled("abz"),
    ]));

    assert!(!view.set_filter_pattern("ab", false).unwrap());
    assert_eq!(view.row_count(), 3);

    assert!(view.set_filter_pattern("abc", false).unwrap());
    assert_eq!(view.row_count(), 1);
    assert_eq!(view.rendered_span(), Some(RowSpan::new(0, 0)));
    assert!(view.render_markup().contains("<h1>abc</h1>"));

    assert!(view.set_filter_pattern("", false).unwrap());
    assert_eq!(view.row_count(), 3);
    assert_eq!(view.rendered_span(), Some(RowSpan::new(0, 2)));
}

#[test]
fn test_filter_clears_selection() {
    let (mut view, queue) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(vec![
        Item::titled("apple"),
        Item::titled("banana"),
        Item::titled("apricot"),
    ]));
    let deselected = Arc::new(Mutex::new(Vec::new()));
    let deselected_clone = deselected.clone();
    view.signals().did_deselect_row.connect(move |&index| {
        deselected_clone.lock().push(index);
    });

    view.select_row(1).unwrap();
    queue.process_pending();
    view.set_filter_pattern("ap", false).unwrap();

    assert!(view.selected_row_indexes().is_empty());
    assert_eq!(*deselected.lock(), vec![1]);
    assert!(view.rendered_rows().all(|row| !row.is_selected()));
}

#[test]
fn test_case_sensitive_filter() {
    let (mut view, _) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(vec![Item::titled("Apple"), Item::titled("apple")]));

    view.set_filter_pattern("App", true).unwrap();
    assert_eq!(view.row_count(), 1);
    view.set_filter_pattern("App", false).unwrap();
    assert_eq!(view.row_count(), 2);
}

#[test]
fn test_drill_down_from_json() {
    let config = TableViewConfig::from_toml_str("child_key = \"dataSource\"").unwrap();
    let (mut view, queue) = setup(config);

    let store = ItemStore::from_json_str(
        r#"[
            {"title": "Fruit", "accessoryType": "disclosure-indicator", "dataSource": [
                {"title": "Apple"},
                {"title": "Pear", "dataSource": [{"title": "Conference"}]}
            ]},
            {"title": "Settings"}
        ]"#,
    )
    .unwrap()
    .with_config(view.config());
    view.set_data_source(store);

    assert!(view.render_markup().contains(
        "<span class=\"pp-table-view-cell-accessory pp-table-view-cell-accessory-disclosure-indicator\"></span>"
    ));

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    view.signals().did_select_row.connect(move |event| {
        events_clone.lock().push((event.index, event.has_child_store));
    });

    let child = match view.select_row(0).unwrap() {
        SelectOutcome::Descend(child) => child,
        other => panic!("expected drill-down, got {other:?}"),
    };
    assert_eq!(child.count(), 2);
    assert_eq!(child.child_key(), Some("dataSource"));
    assert!(child.has_child_store(1));

    assert!(matches!(view.select_row(1), Ok(SelectOutcome::Selected)));
    queue.process_pending();
    assert_eq!(*events.lock(), vec![(0, true), (1, false)]);

    let (mut nested, _) = setup(view.config().clone());
    nested.set_data_source(child);
    assert_eq!(nested.row_count(), 2);
    assert!(matches!(nested.select_row(1), Ok(SelectOutcome::Descend(grandchild)) if grandchild.count() == 1));
}

#[test]
fn test_refused_selection() {
    let (mut view, queue) = setup(TableViewConfig::default());
    view.set_data_source(
        ItemStore::new(numbered(5)).with_can_select(|_, item| item.title() != Some("Row 2")),
    );

    assert!(matches!(view.select_row(2), Ok(SelectOutcome::Ignored)));
    assert!(view.selected_row_indexes().is_empty());
    assert!(!queue.has_pending());

    assert!(matches!(view.select_row(3), Ok(SelectOutcome::Selected)));
    assert_eq!(view.first_selected_row(), Some(3));
}

#[test]
fn test_deselect_row_always_notifies() {
    let (mut view, _) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(numbered(5)));
    let deselected = Arc::new(Mutex::new(Vec::new()));
    let deselected_clone = deselected.clone();
    view.signals().did_deselect_row.connect(move |&index| {
        deselected_clone.lock().push(index);
    });

    view.deselect_row(4);
    view.select_row(1).unwrap();
    view.deselect_row(1);

    assert_eq!(*deselected.lock(), vec![4, 1]);
    assert!(!view.is_row_selected(1));
}

struct SwitchCell {
    inner: TextCell,
    on: bool,
    taps: Arc<Mutex<usize>>,
}

impl TableCell for SwitchCell {
    fn bind(&mut self, item: &Item) {
        self.inner.bind(item);
        self.on = item.value().and_then(|v| v.as_bool()).unwrap_or(false);
    }

    fn prepare_for_reuse(&mut self) {
        self.inner.prepare_for_reuse();
        self.on = false;
    }

    fn render_markup(&self) -> String {
        let state = if self.on { "on" } else { "off" };
        format!("{}<span class=\"switch {state}\"></span>", self.inner.render_markup())
    }

    fn on_tap(&mut self) {
        self.on = !self.on;
        *self.taps.lock() += 1;
    }
}

#[test]
fn test_custom_cell_style() {
    let taps = Arc::new(Mutex::new(0));
    let taps_clone = taps.clone();
    let mut registry = CellRegistry::new();
    registry.register("switch", move || {
        Box::new(SwitchCell {
            inner: TextCell::default(),
            on: false,
            taps: taps_clone.clone(),
        })
    });

    let (view, _) = setup(TableViewConfig::default());
    let mut view = view.with_registry(registry);
    view.set_data_source(ItemStore::new(vec![
        Item::titled("Wi-Fi").with("reuseIdentifier", "switch").with("value", true),
        Item::titled("Unknown").with("reuseIdentifier", "missing"),
    ]));

    assert_eq!(view.rendered_row_at(0).unwrap().style_key(), "switch");
    assert_eq!(view.rendered_row_at(1).unwrap().style_key(), "default");
    assert!(view.render_markup().contains("switch on"));

    view.tap_row(0).unwrap();
    assert_eq!(*taps.lock(), 1);
    assert!(view.rendered_row_at(0).unwrap().is_selected());
    assert!(view.render_markup().contains("switch off"));
}

#[test]
fn test_form_values() {
    let (mut view, _) = setup(TableViewConfig::default());
    view.set_data_source(ItemStore::new(vec![
        Item::titled("Name").with("name", "name").with("reuseIdentifier", "value"),
        Item::titled("Volume")
            .with("name", "volume")
            .with("reuseIdentifier", "value")
            .with("defaultValue", 5),
    ]));

    let mut values = Map::new();
    values.insert("name".into(), json!("Ada"));
    values.insert("volume".into(), json!(8));
    values.insert("unknown".into(), json!(1));
    assert_eq!(view.set_values_from_object(&values, "name", "value"), 2);

    let store = view.data_source().unwrap();
    assert_eq!(store.values_object("name", "value").get("name"), Some(&json!("Ada")));
    assert!(view.render_markup().contains("<h2>Ada</h2>"));

    view.clear_values("value", "defaultValue");
    let object = view.data_source().unwrap().values_object("name", "value");
    assert_eq!(object.get("name"), Some(&json!(null)));
    assert_eq!(object.get("volume"), Some(&json!(5)));
}

#[test]
fn test_swapping_data_source() {
    let (mut view, _) = setup(TableViewConfig::default());
    let swaps = Arc::new(Mutex::new(0));
    let swaps_clone = swaps.clone();
    view.signals().did_change_data_source.connect(move |_| *swaps_clone.lock() += 1);

    view.set_data_source(ItemStore::new(numbered(1000)));
    view.scroll_to(4400.0);
    view.set_data_source(ItemStore::new(numbered(3)));

    assert_eq!(view.rendered_span(), Some(RowSpan::new(0, 2)));
    assert_eq!(view.rendered_rows().count(), 3);

    let old = view.take_data_source().unwrap();
    assert_eq!(old.count(), 3);
    assert!(view.rendered_span().is_none());
    assert_eq!(view.pool().rendered_count(), 0);
    assert_eq!(*swaps.lock(), 3);
}
