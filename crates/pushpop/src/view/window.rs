//! Render-window arithmetic.
//!
//! Given the scroll position, viewport height, row height and item count, a
//! [`Window`] says which rows are visible, which rows should be materialized
//! (the visible rows plus up to one viewport of buffer on each side), and at
//! which scroll positions that choice goes stale.
//!
//! Everything here is pure. [`plan_redraw`] turns two consecutive windows into
//! the minimal list of rows to release and bind.

use std::ops::RangeInclusive;

/// An inclusive, non-empty range of row indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowSpan {
    pub first: usize,
    pub last: usize,
}

impl RowSpan {
    /// Create a span. `first` must not exceed `last`.
    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last, "RowSpan first {first} > last {last}");
        Self { first, last }
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    pub fn indexes(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    /// Whether the two spans share at least one row.
    pub fn overlaps(&self, other: &RowSpan) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

/// Inputs to the window computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_position: f32,
    pub viewport_height: f32,
    /// Must be positive.
    pub row_height: f32,
    pub item_count: usize,
}

/// The rows a table view should hold for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Window {
    /// Rows intersecting the viewport.
    pub visible: Option<RowSpan>,
    /// Rows that should be bound to live cells.
    pub rendered: Option<RowSpan>,
    /// Scrolling strictly above this position needs a redraw. `None` when the
    /// rendered span already starts at row 0.
    pub min_threshold: Option<f32>,
    /// Scrolling to or past this position needs a redraw. `None` when the
    /// rendered span already reaches the last row.
    pub max_threshold: Option<f32>,
}

impl Window {
    /// No rows rendered, no thresholds armed.
    pub const EMPTY: Window = Window {
        visible: None,
        rendered: None,
        min_threshold: None,
        max_threshold: None,
    };

    /// Compute the window for the given metrics.
    pub fn compute(metrics: ScrollMetrics) -> Self {
        let ScrollMetrics {
            scroll_position,
            viewport_height,
            row_height,
            item_count: n,
        } = metrics;

        if n == 0 || row_height.is_nan() || row_height <= 0.0 {
            return Self::EMPTY;
        }
        let last_index = n - 1;

        let first_visible = floor_to_index(scroll_position / row_height).min(last_index);
        let visible_count = ceil_to_count(viewport_height / row_height).min(n);
        let last_visible = (first_visible + visible_count)
            .saturating_sub(1)
            .clamp(first_visible, last_index);

        let leading = visible_count.min(first_visible);
        let trailing = visible_count.min(last_index - last_visible);
        let first_rendered = first_visible - leading;
        let last_rendered = last_visible + trailing;

        Self {
            visible: Some(RowSpan::new(first_visible, last_visible)),
            rendered: Some(RowSpan::new(first_rendered, last_rendered)),
            min_threshold: (first_rendered > 0).then(|| scroll_position - viewport_height),
            max_threshold: (last_rendered < last_index).then(|| scroll_position + viewport_height),
        }
    }

    /// Whether scrolling to `position` makes this window stale.
    pub fn needs_redraw(&self, position: f32) -> bool {
        self.min_threshold.is_some_and(|min| position < min)
            || self.max_threshold.is_some_and(|max| position >= max)
    }

    /// Blank space above and below the rendered rows that stands in for the
    /// rows that are not materialized.
    pub fn blank_space(&self, row_height: f32, item_count: usize) -> (f32, f32) {
        match self.rendered {
            Some(span) => (
                span.first as f32 * row_height,
                item_count.saturating_sub(span.last + 1) as f32 * row_height,
            ),
            None => (0.0, 0.0),
        }
    }
}

fn floor_to_index(value: f32) -> usize {
    let floored = value.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else {
        floored as usize
    }
}

fn ceil_to_count(value: f32) -> usize {
    let ceiled = value.ceil();
    if ceiled.is_nan() || ceiled <= 0.0 {
        0
    } else {
        ceiled as usize
    }
}

/// The row operations that take the rendered set from one span to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedrawPlan {
    /// Rows to unbind and return to the pool. Performed first.
    pub release: Vec<usize>,
    /// Rows to bind and prepend, in the order they are prepended (descending).
    pub prepend: Vec<usize>,
    /// Rows to bind and append, in the order they are appended (ascending).
    pub append: Vec<usize>,
}

impl RedrawPlan {
    /// Total acquire and release operations.
    pub fn cost(&self) -> usize {
        self.release.len() + self.prepend.len() + self.append.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cost() == 0
    }
}

/// Plan the transition from the `old` rendered span to the `new` one.
///
/// Rows in both spans stay bound. When the spans are disjoint every old row
/// is released and every new row is appended.
pub fn plan_redraw(old: Option<RowSpan>, new: Option<RowSpan>) -> RedrawPlan {
    match (old, new) {
        (None, None) => RedrawPlan::default(),
        (Some(old), None) => RedrawPlan {
            release: old.indexes().collect(),
            ..RedrawPlan::default()
        },
        (None, Some(new)) => RedrawPlan {
            append: new.indexes().collect(),
            ..RedrawPlan::default()
        },
        (Some(old), Some(new)) if !old.overlaps(&new) => RedrawPlan {
            release: old.indexes().collect(),
            prepend: Vec::new(),
            append: new.indexes().collect(),
        },
        (Some(old), Some(new)) => {
            let mut release: Vec<usize> = (old.first..new.first).collect();
            release.extend(new.last + 1..=old.last);
            RedrawPlan {
                release,
                prepend: (new.first..old.first).rev().collect(),
                append: (old.last + 1..=new.last).collect(),
            }
        }
    }
}
