//! The scroll container a table view lives in.

/// Blank space around the rendered rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Copy of these margins with new vertical values.
    pub fn with_vertical(self, top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom,
            ..self
        }
    }
}

/// The scrolling host of a table view.
///
/// The table view reads the scroll offset and viewport size from it and sizes
/// the blank space above and below the rendered rows through the margins, so
/// the host's scroll range always covers the full item set.
pub trait ScrollContainer: Send {
    /// Current scroll offset as `(x, y)`.
    fn scroll_position(&self) -> (f32, f32);

    fn set_scroll_position(&mut self, x: f32, y: f32);

    /// Height of the visible area.
    fn viewport_height(&self) -> f32;

    fn margins(&self) -> Margins;

    fn set_margins(&mut self, margins: Margins);
}

/// An in-memory [`ScrollContainer`] for headless use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollState {
    pub x: f32,
    pub y: f32,
    pub viewport_height: f32,
    pub margins: Margins,
}

impl ScrollState {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    /// Total scrollable content height: blank space plus rendered rows.
    pub fn content_height(&self, rendered_rows: usize, row_height: f32) -> f32 {
        self.margins.top + rendered_rows as f32 * row_height + self.margins.bottom
    }
}

impl ScrollContainer for ScrollState {
    fn scroll_position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn set_scroll_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn margins(&self) -> Margins {
        self.margins
    }

    fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }
}
