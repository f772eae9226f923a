//! Item data, filtering and selection.
//!
//! ```text
//! ┌──────────────────────────── ItemStore ───────────────────────────┐
//! │  full:      [ a ][ b ][ c ][ d ][ e ][ f ]                       │
//! │                    │         │    │                              │
//! │  filtered:  [ 1 ][ 3 ][ 4 ]  ◄── predicate(pattern, item)        │
//! └──────────────────────────────────────────────────────────────────┘
//!                      ▲
//!          filtered indexes address rows,
//!          selection and value edits
//! ```
//!
//! - [`Item`]: one JSON-object record
//! - [`ItemStore`]: the full set, the filtered view, and the predicate
//! - [`Matcher`] / [`FilterPredicate`]: pattern matching used by filters
//! - [`SelectionState`]: selected filtered indexes
//! - [`AccessoryType`] / [`EditingAccessoryType`]: row decorations items ask for
//!
//! # Incremental Filtering
//!
//! ```
//! use pushpop::model::{Item, ItemStore};
//!
//! let mut store = ItemStore::new(vec![
//!     Item::titled("abc"),
//!     Item::titled("xab"),
//!     Item::titled("abz"),
//! ]);
//!
//! store.set_pattern("ab", false)?;
//! assert_eq!(store.count(), 3);
//!
//! // "abc" extends "ab", so only the three previous matches are tested.
//! store.set_pattern("abc", false)?;
//! assert_eq!(store.item_at(0)?.title(), Some("abc"));
//! assert_eq!(store.count(), 1);
//! # Ok::<(), pushpop::Error>(())
//! ```

pub mod accessory;
pub mod filter;
pub mod item;
pub mod selection;
pub mod store;

pub use accessory::{AccessoryType, EditingAccessoryType};
pub use filter::{FilterPredicate, Matcher, title_contains};
pub use item::{Item, REUSE_IDENTIFIER_KEY, TITLE_KEY, VALUE_KEY};
pub use selection::SelectionState;
pub use store::{CanSelectFn, ItemStore, NamedValue, ValueChange};
