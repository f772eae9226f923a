//! Pushpop: a recycling, filterable table view core.
//!
//! Pushpop displays long lists inside a fixed-size viewport while keeping only
//! a small window of live rows. As the user scrolls, rows that leave the window
//! are returned to a per-style pool and rebound to the items entering it.
//! Selection and incremental text filtering are layered on top.
//!
//! The crate is headless: rows produce markup, and the scroll container is a
//! trait. Gesture recognition, navigation between nested lists and search-bar
//! chrome belong to the host.
//!
//! # Crate Layout
//!
//! - [`model`]: items, the filtered [`ItemStore`], selection state
//! - [`view`]: window arithmetic, row styles, recycling, and the [`TableView`]
//! - [`config`]: [`TableViewConfig`], loadable from TOML
//! - `source`: HTTP item sets (feature `networking`)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use pushpop::{Item, ScrollState, SharedTaskQueue, TableView, TableViewConfig};
//!
//! let queue = SharedTaskQueue::new();
//! let mut view = TableView::new(TableViewConfig::default(), ScrollState::new(440.0), queue.clone())?;
//!
//! let fruits = ["apple", "banana", "apricot", "cherry"];
//! let store = view.new_store(fruits.iter().map(|f| Item::titled(*f)).collect());
//! view.set_data_source(store);
//!
//! view.set_filter_pattern("ap", false)?;
//! assert_eq!(view.row_count(), 2);
//!
//! let picked = Arc::new(Mutex::new(None));
//! let picked_clone = picked.clone();
//! view.signals().did_select_row.connect(move |event| {
//!     *picked_clone.lock() = event.item.title().map(str::to_string);
//! });
//!
//! view.select_row(1)?;
//! queue.process_pending();
//! assert_eq!(picked.lock().as_deref(), Some("apricot"));
//! # Ok::<(), pushpop::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod model;
#[cfg(feature = "networking")]
pub mod source;
pub mod view;

pub use config::TableViewConfig;
pub use error::{Error, PredicateError, Result};
pub use model::{
    AccessoryType, EditingAccessoryType, Item, ItemStore, Matcher, SelectionState, ValueChange,
};
pub use pushpop_core::{ConnectionId, SharedTaskQueue, Signal};
#[cfg(feature = "networking")]
pub use source::{RemoteSource, fetch_store};
pub use view::{
    CellRegistry, Margins, ScrollContainer, ScrollState, SelectOutcome, SelectionEvent, TableCell,
    TableView, TableViewSignals,
};
