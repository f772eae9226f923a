//! Row styles.
//!
//! A row style is any type implementing [`TableCell`]. Styles are registered
//! under a reuse identifier in a [`CellRegistry`], which the table view uses to
//! construct cells when its pool for that identifier is empty.

use std::collections::HashMap;
use std::sync::Arc;

use pushpop_core::logging::targets;
use serde_json::Value;

use crate::config::DEFAULT_REUSE_IDENTIFIER;
use crate::model::Item;
pub use crate::model::accessory::{
    ACCESSORY_TYPE_KEY, AccessoryType, EDITING_ACCESSORY_TYPE_KEY, EditingAccessoryType,
};

/// Reuse identifier of [`ValueCell`] in [`CellRegistry::new`].
pub const VALUE_REUSE_IDENTIFIER: &str = "value";

/// The capability set of a row style.
pub trait TableCell: Send {
    /// Fill the cell from the item it now displays.
    fn bind(&mut self, item: &Item);

    /// Drop any item data before the cell goes back to the pool.
    fn prepare_for_reuse(&mut self);

    /// Markup for the cell body.
    fn render_markup(&self) -> String;

    /// Called when the row is tapped, before it is selected.
    fn on_tap(&mut self) {}
}

/// Builds a fresh cell for one style.
pub type CellConstructor = Arc<dyn Fn() -> Box<dyn TableCell> + Send + Sync>;

/// Maps reuse identifiers to cell constructors.
///
/// Unknown identifiers fall back to the default style. A fresh registry has a
/// [`TextCell`] under [`DEFAULT_REUSE_IDENTIFIER`] and a [`ValueCell`] under
/// [`VALUE_REUSE_IDENTIFIER`].
#[derive(Clone)]
pub struct CellRegistry {
    constructors: HashMap<String, CellConstructor>,
    default_style: String,
}

impl CellRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            constructors: HashMap::new(),
            default_style: DEFAULT_REUSE_IDENTIFIER.to_string(),
        };
        registry.register(DEFAULT_REUSE_IDENTIFIER, || Box::new(TextCell::default()));
        registry.register(VALUE_REUSE_IDENTIFIER, || Box::new(ValueCell::default()));
        registry
    }

    /// Register (or replace) the constructor for a style.
    pub fn register<F>(&mut self, style: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn TableCell> + Send + Sync + 'static,
    {
        self.constructors.insert(style.into(), Arc::new(constructor));
    }

    /// Use `style` for items whose identifier is unknown.
    ///
    /// Ignored unless `style` is registered.
    pub fn set_default_style(&mut self, style: impl Into<String>) {
        let style = style.into();
        if self.constructors.contains_key(&style) {
            self.default_style = style;
        } else {
            tracing::warn!(target: targets::VIEW, style = style.as_str(), "default style is not registered");
        }
    }

    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    pub fn is_registered(&self, style: &str) -> bool {
        self.constructors.contains_key(style)
    }

    /// The style actually used for `style`.
    pub fn resolve<'a>(&'a self, style: &'a str) -> &'a str {
        if self.constructors.contains_key(style) {
            style
        } else {
            tracing::debug!(
                target: targets::VIEW,
                style,
                fallback = self.default_style.as_str(),
                "unregistered style, using default"
            );
            &self.default_style
        }
    }

    /// Construct a cell for an already resolved style.
    pub(crate) fn construct(&self, resolved_style: &str) -> Box<dyn TableCell> {
        match self.constructors.get(resolved_style) {
            Some(constructor) => constructor(),
            None => Box::new(TextCell::default()),
        }
    }
}

impl Default for CellRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CellRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut styles: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        styles.sort_unstable();
        f.debug_struct("CellRegistry")
            .field("styles", &styles)
            .field("default_style", &self.default_style)
            .finish()
    }
}

/// The default style: the item title as a heading.
#[derive(Debug, Clone, Default)]
pub struct TextCell {
    title: Option<String>,
}

impl TableCell for TextCell {
    fn bind(&mut self, item: &Item) {
        self.title = item.title().map(str::to_string);
    }

    fn prepare_for_reuse(&mut self) {
        self.title = None;
    }

    fn render_markup(&self) -> String {
        format!("<h1>{}</h1>", heading_text(self.title.as_deref()))
    }
}

/// Title plus the item's `value` on the trailing side.
#[derive(Debug, Clone, Default)]
pub struct ValueCell {
    title: Option<String>,
    value: Option<String>,
}

impl TableCell for ValueCell {
    fn bind(&mut self, item: &Item) {
        self.title = item.title().map(str::to_string);
        self.value = item.value().and_then(|value| match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
    }

    fn prepare_for_reuse(&mut self) {
        self.title = None;
        self.value = None;
    }

    fn render_markup(&self) -> String {
        format!(
            "<h1>{}</h1><h2>{}</h2>",
            heading_text(self.title.as_deref()),
            heading_text(self.value.as_deref())
        )
    }
}

fn heading_text(text: Option<&str>) -> String {
    match text.map(str::trim) {
        Some(text) if !text.is_empty() => escape_markup(text),
        _ => "&nbsp;".to_string(),
    }
}

/// Escape text for inclusion in markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
