//! Windowed rendering of an item store.
//!
//! ```text
//!            scroll container
//!   ┌──────────────────────────────┐
//!   │  top margin  (rows 0..90)    │  blank space, no rows
//!   ├──────────────────────────────┤ ─┐
//!   │  rows 90..100   leading      │  │
//!   ├──────────────────────────────┤  │
//!   │  rows 100..110  visible      │  │ rendered set (bound rows)
//!   ├──────────────────────────────┤  │
//!   │  rows 110..120  trailing     │  │
//!   ├──────────────────────────────┤ ─┘
//!   │  bottom margin (rows 120..)  │  blank space, no rows
//!   └──────────────────────────────┘
//!
//!   released rows ──► RecyclePool { style → free list } ──► acquired rows
//! ```
//!
//! - [`window`]: pure arithmetic from scroll metrics to the rendered span
//! - [`cell`]: row styles and the registry that builds them
//! - [`recycle`]: the rendered set and the per-style free lists
//! - [`scroll`]: the scroll container seam
//! - [`TableView`]: the controller tying them together

pub mod cell;
pub mod recycle;
pub mod scroll;
pub mod table_view;
pub mod window;

pub use cell::{
    AccessoryType, CellRegistry, EditingAccessoryType, TableCell, TextCell, ValueCell,
};
pub use recycle::{RecyclePool, Row, RowId};
pub use scroll::{Margins, ScrollContainer, ScrollState};
pub use table_view::{SelectOutcome, SelectionEvent, TableView, TableViewSignals};
pub use window::{RedrawPlan, RowSpan, ScrollMetrics, Window, plan_redraw};
