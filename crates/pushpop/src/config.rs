//! Table view configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! row_height = 44.0
//! default_reuse_identifier = "default"
//! child_key = "dataSource"
//! case_sensitive_filter = false
//! default_accessory_type = "none"
//! default_editing_accessory_type = "delete-button"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::accessory::{AccessoryType, EditingAccessoryType};

/// Default height in pixels of one row.
pub const DEFAULT_ROW_HEIGHT: f32 = 44.0;

/// Style key used for items without a `reuseIdentifier`.
pub const DEFAULT_REUSE_IDENTIFIER: &str = "default";

/// Settings for a [`TableView`](crate::view::TableView) and the stores it
/// creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableViewConfig {
    /// Fixed height of every row. Must be finite and positive.
    pub row_height: f32,
    /// Style key for items that do not name one.
    pub default_reuse_identifier: String,
    /// Field holding nested item arrays for drill-down.
    pub child_key: Option<String>,
    /// Whether the default text filter matches case-sensitively.
    pub case_sensitive_filter: bool,
    /// Accessory for items without an `accessoryType`.
    pub default_accessory_type: AccessoryType,
    /// Editing accessory for items without an `editingAccessoryType`.
    pub default_editing_accessory_type: EditingAccessoryType,
}

impl Default for TableViewConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            default_reuse_identifier: DEFAULT_REUSE_IDENTIFIER.to_string(),
            child_key: None,
            case_sensitive_filter: false,
            default_accessory_type: AccessoryType::None,
            default_editing_accessory_type: EditingAccessoryType::None,
        }
    }
}

impl TableViewConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config("*", e.to_string()))
    }

    /// Check the invariants every table view relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(Error::config(
                "row_height",
                format!("must be a positive number, got {}", self.row_height),
            ));
        }
        if self.default_reuse_identifier.is_empty() {
            return Err(Error::config("default_reuse_identifier", "must not be empty"));
        }
        if self.child_key.as_deref() == Some("") {
            return Err(Error::config("child_key", "must not be empty when set"));
        }
        Ok(())
    }

    pub fn with_row_height(mut self, row_height: f32) -> Self {
        self.row_height = row_height;
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

    pub fn with_case_sensitive_filter(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_filter = case_sensitive;
        self
    }

    pub fn with_default_accessory_type(mut self, accessory: AccessoryType) -> Self {
        self.default_accessory_type = accessory;
        self
    }

    pub fn with_default_editing_accessory_type(mut self, accessory: EditingAccessoryType) -> Self {
        self.default_editing_accessory_type = accessory;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TableViewConfig::default();
        assert_eq!(config.row_height, 44.0);
        assert_eq!(config.default_reuse_identifier, "default");
        assert!(config.child_key.is_none());
        assert!(!config.case_sensitive_filter);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TableViewConfig::from_toml_str("child_key = \"dataSource\"\n").unwrap();
        assert_eq!(config.child_key.as_deref(), Some("dataSource"));
        assert_eq!(config.row_height, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_rejects_non_positive_row_height() {
        let err = TableViewConfig::from_toml_str("row_height = 0.0").unwrap_err();
        assert!(matches!(err, Error::Config { field: "row_height", .. }));

        let err = TableViewConfig::default().with_row_height(f32::NAN).validate().unwrap_err();
        assert!(matches!(err, Error::Config { field: "row_height", .. }));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = TableViewConfig::from_toml_str("row_hieght = 10.0").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "row_height = 60.0").unwrap();
        writeln!(file, "case_sensitive_filter = true").unwrap();

        let config = TableViewConfig::load(file.path()).unwrap();
        assert_eq!(config.row_height, 60.0);
        assert!(config.case_sensitive_filter);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TableViewConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_accessory_defaults_from_toml() {
        let config = TableViewConfig::from_toml_str(
            "default_accessory_type = \"disclosure-indicator\"\n\
             default_editing_accessory_type = \"delete-button\"\n",
        )
        .unwrap();
        assert_eq!(config.default_accessory_type, AccessoryType::DisclosureIndicator);
        assert_eq!(
            config.default_editing_accessory_type,
            EditingAccessoryType::DeleteButton
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TableViewConfig::default()
            .with_child_key("children")
            .with_default_editing_accessory_type(EditingAccessoryType::AddButton);
        let text = config.to_toml_string().unwrap();
        assert_eq!(TableViewConfig::from_toml_str(&text).unwrap(), config);
    }
}
