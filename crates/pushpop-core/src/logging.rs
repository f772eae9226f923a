//! Logging facilities for Pushpop.
//!
//! Pushpop uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("pushpop::view=debug,pushpop::model=trace")
//!         .init();
//! }
//! ```

use std::time::Instant;

/// Span names used throughout Pushpop for tracing.
pub mod span_names {
    /// A table view redraw.
    pub const DRAW: &str = "pushpop::draw";
    /// A full reload of the rendered rows.
    pub const RELOAD: &str = "pushpop::reload";
    /// A filter pass over an item store.
    pub const FILTER: &str = "pushpop::filter";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "pushpop_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "pushpop_core::signal";
    /// Deferred task queue target.
    pub const TASK: &str = "pushpop_core::task";
    /// Item store, filtering and selection target.
    pub const MODEL: &str = "pushpop::model";
    /// Windowing, recycling and rendering target.
    pub const VIEW: &str = "pushpop::view";
    /// Remote data source target.
    pub const SOURCE: &str = "pushpop::source";
    /// Performance spans target.
    pub const PERF: &str = "pushpop::perf";
}

/// A guard that measures an operation.
///
/// Enters a `perf` span on creation and logs the elapsed time at `trace`
/// level when dropped.
///
/// ```
/// use pushpop_core::logging::{span_names, PerfSpan};
///
/// {
///     let _perf = PerfSpan::new(span_names::DRAW);
///     // ... work ...
/// }
/// ```
pub struct PerfSpan {
    name: &'static str,
    started: Instant,
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span, active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!(target: targets::PERF, "perf", operation = name);
        Self {
            name,
            started: Instant::now(),
            _span: span.entered(),
        }
    }

    /// Time elapsed since the span was created.
    pub fn elapsed_micros(&self) -> u128 {
        self.started.elapsed().as_micros()
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::trace!(
            target: targets::PERF,
            operation = self.name,
            elapsed_us = self.elapsed_micros() as u64,
            "operation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let span = PerfSpan::new("test_operation");
        assert!(span.elapsed_micros() < 60_000_000);
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter("pushpop::perf=trace")
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::FILTER);
        });
    }
}
