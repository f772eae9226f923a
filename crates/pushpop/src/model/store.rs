//! The in-memory item store.
//!
//! [`ItemStore`] owns the full item sequence and a filtered view of it. The
//! filtered view is kept as a list of indexes into the full sequence, so it is
//! always an order-preserving subsequence.

use std::sync::Arc;

use pushpop_core::Signal;
use pushpop_core::logging::{PerfSpan, span_names, targets};
use serde_json::{Map, Value};

use crate::config::{DEFAULT_REUSE_IDENTIFIER, TableViewConfig};
use crate::error::{Error, PredicateError, Result};
use crate::model::accessory::{AccessoryType, EditingAccessoryType};
use crate::model::filter::{FilterPredicate, Matcher, infallible, title_contains};
use crate::model::item::{Item, items_from_values};

/// Decides whether the item at a filtered index may be selected.
pub type CanSelectFn = Arc<dyn Fn(usize, &Item) -> bool + Send + Sync>;

/// Payload of [`ItemStore::value_changed`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    /// Filtered index of the changed item.
    pub index: usize,
    pub key: String,
    pub value: Value,
    /// `None` when the field did not exist before.
    pub previous: Option<Value>,
}

/// A `name`/`value` pair collected from the item set, typically a form field.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: Value,
}

/// Ordered item set with incremental text filtering.
///
/// # Filtering
///
/// [`set_pattern`](Self::set_pattern) recomputes the filtered set. When the
/// new pattern extends the previous one (and case sensitivity is unchanged)
/// only the previously matching items are tested again; otherwise every item
/// is. An empty pattern shows everything.
///
/// This refinement is only correct for monotonic predicates. A predicate that
/// can accept an item for `"abc"` after rejecting it for `"ab"` will see a
/// result that is too small until the pattern is cleared.
pub struct ItemStore {
    items: Vec<Item>,
    filtered: Vec<usize>,
    predicate: Option<FilterPredicate>,
    last_pattern: Option<String>,
    last_case_sensitive: bool,
    child_key: Option<String>,
    default_reuse_identifier: String,
    default_accessory_type: AccessoryType,
    default_editing_accessory_type: EditingAccessoryType,
    can_select: Option<CanSelectFn>,
    value_changed: Signal<ValueChange>,
}

impl ItemStore {
    /// Create a store over `items` with the default title filter.
    pub fn new(items: Vec<Item>) -> Self {
        let filtered = (0..items.len()).collect();
        Self {
            items,
            filtered,
            predicate: Some(title_contains()),
            last_pattern: None,
            last_case_sensitive: false,
            child_key: None,
            default_reuse_identifier: DEFAULT_REUSE_IDENTIFIER.to_string(),
            default_accessory_type: AccessoryType::None,
            default_editing_accessory_type: EditingAccessoryType::None,
            can_select: None,
            value_changed: Signal::new(),
        }
    }

    /// Parse a JSON array of item objects.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build a store from an already parsed JSON array.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(values) => Ok(Self::new(items_from_values(&values)?)),
            other => Err(Error::NotAnArray {
                found: json_kind(&other),
            }),
        }
    }

    /// Apply the store-related settings of a table view configuration.
    pub fn with_config(mut self, config: &TableViewConfig) -> Self {
        self.child_key = config.child_key.clone();
        self.default_reuse_identifier = config.default_reuse_identifier.clone();
        self.default_accessory_type = config.default_accessory_type;
        self.default_editing_accessory_type = config.default_editing_accessory_type;
        self
    }

    pub fn with_child_key(mut self, key: impl Into<String>) -> Self {
        self.child_key = Some(key.into());
        self
    }

    pub fn with_default_reuse_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.default_reuse_identifier = identifier.into();
        self
    }

    /// Accessory for items that do not name one.
    pub fn with_default_accessory_type(mut self, accessory: AccessoryType) -> Self {
        self.default_accessory_type = accessory;
        self
    }

    /// Editing accessory for items that do not name one.
    pub fn with_default_editing_accessory_type(mut self, accessory: EditingAccessoryType) -> Self {
        self.default_editing_accessory_type = accessory;
        self
    }

    pub fn with_can_select<F>(mut self, can_select: F) -> Self
    where
        F: Fn(usize, &Item) -> bool + Send + Sync + 'static,
    {
        self.can_select = Some(Arc::new(can_select));
        self
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Number of items in the filtered set.
    pub fn count(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// The item at a filtered index.
    pub fn item_at(&self, index: usize) -> Result<&Item> {
        let source = self.source_index(index)?;
        Ok(&self.items[source])
    }

    /// Iterate the filtered set in order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.filtered.iter().map(|&i| &self.items[i])
    }

    /// Number of items in the full, unfiltered set.
    pub fn full_count(&self) -> usize {
        self.items.len()
    }

    pub fn full_item_at(&self, index: usize) -> Result<&Item> {
        self.items
            .get(index)
            .ok_or_else(|| Error::out_of_range(index, self.items.len()))
    }

    /// Map a filtered index to its position in the full set.
    pub fn source_index(&self, index: usize) -> Result<usize> {
        self.filtered
            .get(index)
            .copied()
            .ok_or_else(|| Error::out_of_range(index, self.filtered.len()))
    }

    /// Positions in the full set of the filtered items, in order.
    pub fn filtered_indexes(&self) -> &[usize] {
        &self.filtered
    }

    /// The pattern the filtered set was last computed for.
    pub fn pattern(&self) -> Option<&str> {
        self.last_pattern.as_deref()
    }

    pub fn child_key(&self) -> Option<&str> {
        self.child_key.as_deref()
    }

    pub fn default_reuse_identifier(&self) -> &str {
        &self.default_reuse_identifier
    }

    /// Style key used to render the item at a filtered index.
    pub fn reuse_identifier_at(&self, index: usize) -> Result<&str> {
        let item = self.item_at(index)?;
        Ok(item
            .reuse_identifier()
            .unwrap_or(self.default_reuse_identifier.as_str()))
    }

    pub fn default_accessory_type(&self) -> AccessoryType {
        self.default_accessory_type
    }

    pub fn default_editing_accessory_type(&self) -> EditingAccessoryType {
        self.default_editing_accessory_type
    }

    /// Accessory of the item at a filtered index, falling back to the
    /// store default.
    pub fn accessory_type_at(&self, index: usize) -> Result<AccessoryType> {
        Ok(self.accessories_for(self.item_at(index)?).0)
    }

    /// Editing accessory of the item at a filtered index, falling back to
    /// the store default.
    pub fn editing_accessory_type_at(&self, index: usize) -> Result<EditingAccessoryType> {
        Ok(self.accessories_for(self.item_at(index)?).1)
    }

    /// Both accessories of `item`, each falling back to the store default.
    pub fn accessories_for(&self, item: &Item) -> (AccessoryType, EditingAccessoryType) {
        (
            AccessoryType::from_item(item).unwrap_or(self.default_accessory_type),
            EditingAccessoryType::from_item(item).unwrap_or(self.default_editing_accessory_type),
        )
    }

    /// Emitted after [`set_value`](Self::set_value) changes a field.
    pub fn value_changed(&self) -> &Signal<ValueChange> {
        &self.value_changed
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Replace the predicate and recompute the filtered set from scratch.
    ///
    /// Returns whether the filtered set changed.
    pub fn set_predicate<F>(&mut self, predicate: F) -> Result<bool>
    where
        F: Fn(&Matcher, &Item) -> bool + Send + Sync + 'static,
    {
        self.install_predicate(Some(infallible(predicate)))
    }

    /// Replace the predicate with one that may fail.
    pub fn set_fallible_predicate<F>(&mut self, predicate: F) -> Result<bool>
    where
        F: Fn(&Matcher, &Item) -> std::result::Result<bool, PredicateError> + Send + Sync + 'static,
    {
        self.install_predicate(Some(Arc::new(predicate)))
    }

    /// Remove the predicate. Every item is shown regardless of pattern.
    pub fn clear_predicate(&mut self) -> Result<bool> {
        self.install_predicate(None)
    }

    fn install_predicate(&mut self, predicate: Option<FilterPredicate>) -> Result<bool> {
        let previous = std::mem::replace(&mut self.predicate, predicate);
        let Some(pattern) = self.last_pattern.take() else {
            return Ok(false);
        };
        let case_sensitive = self.last_case_sensitive;
        match self.set_pattern(&pattern, case_sensitive) {
            Ok(changed) => Ok(changed),
            Err(err) => {
                self.predicate = previous;
                self.last_pattern = Some(pattern);
                Err(err)
            }
        }
    }

    /// Recompute the filtered set for `pattern`.
    ///
    /// Returns whether the filtered set differs from before. If the predicate
    /// fails, the error is returned and the store is left as it was.
    pub fn set_pattern(&mut self, pattern: &str, case_sensitive: bool) -> Result<bool> {
        let _perf = PerfSpan::new(span_names::FILTER);

        let predicate = match &self.predicate {
            Some(predicate) if !pattern.is_empty() => predicate.clone(),
            _ => {
                let changed = self.filtered.len() != self.items.len();
                self.filtered = (0..self.items.len()).collect();
                self.last_pattern = None;
                self.last_case_sensitive = case_sensitive;
                tracing::debug!(target: targets::MODEL, count = self.items.len(), "filter cleared");
                return Ok(changed);
            }
        };

        let matcher = Matcher::new(pattern, case_sensitive)?;
        let refine = case_sensitive == self.last_case_sensitive
            && self
                .last_pattern
                .as_deref()
                .is_some_and(|last| !last.is_empty() && pattern.starts_with(last));

        let mut next = Vec::new();
        if refine {
            for &source in &self.filtered {
                if predicate(&matcher, &self.items[source])? {
                    next.push(source);
                }
            }
        } else {
            for (source, item) in self.items.iter().enumerate() {
                if predicate(&matcher, item)? {
                    next.push(source);
                }
            }
        }

        tracing::debug!(
            target: targets::MODEL,
            pattern,
            refine,
            before = self.filtered.len(),
            after = next.len(),
            "filter applied"
        );

        let changed = next != self.filtered;
        self.filtered = next;
        self.last_pattern = Some(pattern.to_string());
        self.last_case_sensitive = case_sensitive;
        Ok(changed)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set a field on the item at a filtered index.
    ///
    /// Returns `None` without notifying when the field already holds `value`.
    /// The filtered set is not recomputed.
    pub fn set_value(
        &mut self,
        index: usize,
        key: &str,
        value: Value,
    ) -> Result<Option<ValueChange>> {
        let source = self.source_index(index)?;
        let item = &mut self.items[source];
        if item.get(key) == Some(&value) {
            return Ok(None);
        }

        let previous = item.set(key, value.clone());
        let change = ValueChange {
            index,
            key: key.to_string(),
            value,
            previous,
        };
        tracing::trace!(target: targets::MODEL, index, key, "item value changed");
        self.value_changed.emit(change.clone());
        Ok(Some(change))
    }

    // =========================================================================
    // Selection & drill-down
    // =========================================================================

    /// Whether the item at a filtered index may be selected.
    ///
    /// Out-of-range indexes are never selectable.
    pub fn can_select(&self, index: usize) -> bool {
        match (self.item_at(index), &self.can_select) {
            (Err(_), _) => false,
            (Ok(_), None) => true,
            (Ok(item), Some(can_select)) => can_select(index, item),
        }
    }

    /// Whether the item at a filtered index holds a nested array of item
    /// objects.
    ///
    /// An array with any non-object entry is not a child store.
    pub fn has_child_store(&self, index: usize) -> bool {
        match (&self.child_key, self.item_at(index)) {
            (Some(key), Ok(item)) => item
                .children(key)
                .is_some_and(|children| children.iter().all(Value::is_object)),
            _ => false,
        }
    }

    /// Build a store for the nested items of the item at a filtered index.
    ///
    /// The child inherits the predicate, the selectability rule, the child key
    /// and the defaults for reuse identifier and accessories, so drill-down
    /// works to any depth. It starts unfiltered.
    pub fn derive_child_store(&self, index: usize) -> Result<Option<ItemStore>> {
        let item = self.item_at(index)?;
        let Some(key) = self.child_key.as_deref() else {
            return Ok(None);
        };
        let Some(children) = item.children(key) else {
            return Ok(None);
        };

        let mut child = ItemStore::new(items_from_values(children)?);
        child.predicate = self.predicate.clone();
        child.can_select = self.can_select.clone();
        child.child_key = self.child_key.clone();
        child.default_reuse_identifier = self.default_reuse_identifier.clone();
        child.default_accessory_type = self.default_accessory_type;
        child.default_editing_accessory_type = self.default_editing_accessory_type;
        Ok(Some(child))
    }

    // =========================================================================
    // Form values
    // =========================================================================

    /// Collect `key_field`/`value_field` pairs from the full set, including
    /// items the current filter hides.
    ///
    /// Items without `value_field` are skipped. An item without a usable
    /// `key_field` is reported under the name `key_field`.
    pub fn values_array(&self, key_field: &str, value_field: &str) -> Vec<NamedValue> {
        self.items
            .iter()
            .filter_map(|item| {
                let value = item.get(value_field)?.clone();
                let name = match item.get(key_field) {
                    Some(Value::String(s)) if !s.is_empty() => s.clone(),
                    Some(Value::Null) | Some(Value::Bool(false)) | None => key_field.to_string(),
                    Some(Value::String(_)) => key_field.to_string(),
                    Some(other) => other.to_string(),
                };
                Some(NamedValue { name, value })
            })
            .collect()
    }

    /// Like [`values_array`](Self::values_array), folded into an object.
    ///
    /// Repeated names collect their values into an array.
    pub fn values_object(&self, key_field: &str, value_field: &str) -> Map<String, Value> {
        let mut object = Map::new();
        for NamedValue { name, value } in self.values_array(key_field, value_field) {
            match object.get_mut(&name) {
                Some(Value::Array(existing)) => existing.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    object.insert(name, value);
                }
            }
        }
        object
    }

    /// For each entry of `object`, set `value_field` on the first item of the
    /// full set whose `key_field` equals the entry's key.
    ///
    /// Returns the number of items updated.
    pub fn set_values_from_object(
        &mut self,
        object: &Map<String, Value>,
        key_field: &str,
        value_field: &str,
    ) -> usize {
        let mut updated = 0;
        for (key, value) in object {
            let target = self
                .items
                .iter_mut()
                .find(|item| item.get(key_field).and_then(Value::as_str) == Some(key.as_str()));
            if let Some(item) = target {
                item.set(value_field, value.clone());
                updated += 1;
            }
        }
        updated
    }

    /// Reset `value_field` on every item of the full set to its
    /// `default_field`, or `null` when there is no default.
    ///
    /// Items with neither a value nor a default are left alone.
    pub fn clear_values(&mut self, value_field: &str, default_field: &str) {
        for item in &mut self.items {
            let default = item
                .get(default_field)
                .filter(|v| is_truthy(v))
                .cloned();
            if item.get(value_field).is_some() || default.is_some() {
                item.set(value_field, default.unwrap_or(Value::Null));
            }
        }
    }
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore")
            .field("full_count", &self.items.len())
            .field("count", &self.filtered.len())
            .field("pattern", &self.last_pattern)
            .field("child_key", &self.child_key)
            .finish_non_exhaustive()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
