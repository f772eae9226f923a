//! The item record displayed by one row.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Field holding the display text.
pub const TITLE_KEY: &str = "title";
/// Field holding an editable value.
pub const VALUE_KEY: &str = "value";
/// Field naming the row style used to render the item.
pub const REUSE_IDENTIFIER_KEY: &str = "reuseIdentifier";

/// A single record in an item set.
///
/// Items are JSON objects. A few fields have meaning to the table view
/// (`title`, `value`, `reuseIdentifier`, and the configured child key); all
/// other fields are carried through untouched for cells to read. Items have
/// no identity of their own: they are addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// Create an empty item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an item with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new().with(TITLE_KEY, title.into())
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Convert a JSON value into an item. `position` is used for error reporting.
    pub fn from_value(value: Value, position: usize) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(Error::NotAnObject { index: position }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field, returning its previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// The display text, if the item has a string title.
    pub fn title(&self) -> Option<&str> {
        self.0.get(TITLE_KEY).and_then(Value::as_str)
    }

    pub fn value(&self) -> Option<&Value> {
        self.0.get(VALUE_KEY)
    }

    /// The row style this item asks for, if any.
    pub fn reuse_identifier(&self) -> Option<&str> {
        self.0
            .get(REUSE_IDENTIFIER_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The nested item array stored under `key`, if present.
    pub fn children(&self, key: &str) -> Option<&Vec<Value>> {
        self.0.get(key).and_then(Value::as_array)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Item {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Convert a JSON array of objects into items.
pub fn items_from_values(values: &[Value]) -> Result<Vec<Item>> {
    values
        .iter()
        .enumerate()
        .map(|(position, value)| Item::from_value(value.clone(), position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_known_fields() {
        let item = Item::titled("Inbox")
            .with(VALUE_KEY, 3)
            .with(REUSE_IDENTIFIER_KEY, "badge");

        assert_eq!(item.title(), Some("Inbox"));
        assert_eq!(item.value(), Some(&json!(3)));
        assert_eq!(item.reuse_identifier(), Some("badge"));
    }

    #[test]
    fn test_empty_reuse_identifier_is_none() {
        let item = Item::titled("x").with(REUSE_IDENTIFIER_KEY, "");
        assert_eq!(item.reuse_identifier(), None);
    }

    #[test]
    fn test_non_string_title() {
        let item = Item::new().with(TITLE_KEY, 42);
        assert_eq!(item.title(), None);
    }

    #[test]
    fn test_children() {
        let item: Item = serde_json::from_value(json!({
            "title": "Folder",
            "dataSource": [{ "title": "a" }, { "title": "b" }]
        }))
        .unwrap();

        assert_eq!(item.children("dataSource").map(Vec::len), Some(2));
        assert!(item.children("missing").is_none());
    }

    #[test]
    fn test_items_from_values_rejects_non_objects() {
        let values = vec![json!({ "title": "ok" }), json!("nope")];
        let err = items_from_values(&values).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { index: 1 }));
    }
}
