//! Row decorations an item can ask for.
//!
//! Items name their accessories by string under [`ACCESSORY_TYPE_KEY`] and
//! [`EDITING_ACCESSORY_TYPE_KEY`]. An item that names none falls back to the
//! store's default.

use pushpop_core::logging::targets;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::Item;

/// Field naming an item's accessory.
pub const ACCESSORY_TYPE_KEY: &str = "accessoryType";

/// Field naming an item's editing accessory.
pub const EDITING_ACCESSORY_TYPE_KEY: &str = "editingAccessoryType";

/// Decoration drawn at the trailing edge of a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessoryType {
    #[default]
    None,
    DisclosureIndicator,
    DetailDisclosureButton,
    Checkmark,
    ConfirmDeleteButton,
}

impl AccessoryType {
    /// Read the accessory an item asks for.
    ///
    /// `None` when the item names no accessory. A name that is not a known
    /// accessory reads as [`AccessoryType::None`].
    pub fn from_item(item: &Item) -> Option<Self> {
        named_in(item, ACCESSORY_TYPE_KEY)
    }

    /// CSS class for the accessory element, `None` for no accessory.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::DisclosureIndicator => Some("pp-table-view-cell-accessory-disclosure-indicator"),
            Self::DetailDisclosureButton => {
                Some("pp-table-view-cell-accessory-detail-disclosure-button")
            }
            Self::Checkmark => Some("pp-table-view-cell-accessory-checkmark"),
            Self::ConfirmDeleteButton => Some("pp-table-view-cell-accessory-confirm-delete-button"),
        }
    }
}

/// Control drawn at the leading edge of a row while the table is editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditingAccessoryType {
    #[default]
    None,
    AddButton,
    DeleteButton,
}

impl EditingAccessoryType {
    /// Read the editing accessory an item asks for, with the same fallback
    /// rules as [`AccessoryType::from_item`].
    pub fn from_item(item: &Item) -> Option<Self> {
        named_in(item, EDITING_ACCESSORY_TYPE_KEY)
    }

    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::AddButton => Some("pp-table-view-cell-editing-accessory-add-button"),
            Self::DeleteButton => Some("pp-table-view-cell-editing-accessory-delete-button"),
        }
    }
}

fn named_in<T>(item: &Item, key: &str) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    let value = item.get(key)?;
    if !value.is_string() {
        return None;
    }
    Some(serde_json::from_value(value.clone()).unwrap_or_else(|_| {
        tracing::debug!(target: targets::VIEW, key, ?value, "unknown accessory type");
        T::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessory_from_item() {
        let item = Item::titled("x").with(ACCESSORY_TYPE_KEY, "disclosure-indicator");
        assert_eq!(AccessoryType::from_item(&item), Some(AccessoryType::DisclosureIndicator));

        let item = Item::titled("x").with(ACCESSORY_TYPE_KEY, "sparkles");
        assert_eq!(AccessoryType::from_item(&item), Some(AccessoryType::None));
        assert_eq!(AccessoryType::None.css_class(), None);

        assert_eq!(AccessoryType::from_item(&Item::titled("x")), None);
    }

    #[test]
    fn test_editing_accessory_from_item() {
        let item = Item::titled("x").with(EDITING_ACCESSORY_TYPE_KEY, "delete-button");
        assert_eq!(
            EditingAccessoryType::from_item(&item),
            Some(EditingAccessoryType::DeleteButton)
        );
        assert_eq!(
            EditingAccessoryType::AddButton.css_class(),
            Some("pp-table-view-cell-editing-accessory-add-button")
        );

        let item = Item::titled("x").with(EDITING_ACCESSORY_TYPE_KEY, 3);
        assert_eq!(EditingAccessoryType::from_item(&item), None);
    }
}
