//! Core systems for Pushpop.
//!
//! This crate provides the plumbing the table view is built on:
//!
//! - **Signal/Slot System**: Type-safe notifications with direct or queued delivery
//! - **Task Queue**: Deferred work that runs on the host's next event-loop turn
//! - **Logging**: `tracing` targets, span names and a timing guard
//!
//! # Deferred Notification Example
//!
//! ```
//! use pushpop_core::{ConnectionType, SharedTaskQueue, Signal};
//!
//! let queue = SharedTaskQueue::new();
//! let row_selected = Signal::<usize>::new();
//!
//! row_selected.connect_with_type(
//!     |index| println!("selected row {index}"),
//!     ConnectionType::Queued(queue.clone()),
//! );
//!
//! row_selected.emit(3);
//!
//! // Later, on the next turn of the host event loop:
//! queue.process_pending();
//! ```

pub mod error;
pub mod logging;
pub mod signal;
pub mod task;

pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, ConnectionType, Signal};
pub use task::{SharedTaskQueue, TaskId, TaskQueue};
