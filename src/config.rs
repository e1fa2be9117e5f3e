use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};

pub const DEFAULT_KEY_COLUMN: &str = "ID";
pub const DEFAULT_COMPARE_COLUMN: &str = "Amount";
pub const DEFAULT_REPORT_FILE_NAME: &str = "Reconciliation_Report.xlsx";

/// Characters Excel refuses in worksheet names.
const INVALID_SHEET_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];
const MAX_SHEET_NAME_LEN: usize = 31;

/// Settings for one reconciliation run.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Column both inputs are joined on.
    pub key_column: String,
    /// Column whose values decide the row status.
    pub compare_column: String,
    /// Appended to every non-key column of the left input.
    pub left_suffix: String,
    /// Appended to every non-key column of the right input.
    pub right_suffix: String,
    pub status_column: String,
    /// Worksheet name used in the generated report.
    pub report_sheet: String,
    /// Suggested download name for the generated report.
    pub report_file_name: String,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            compare_column: DEFAULT_COMPARE_COLUMN.to_string(),
            left_suffix: "_A".to_string(),
            right_suffix: "_B".to_string(),
            status_column: "Status".to_string(),
            report_sheet: "Reconciliation".to_string(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
        }
    }
}

impl ReconConfig {
    /// Default configuration with the given key and compare columns.
    pub fn new(key_column: impl Into<String>, compare_column: impl Into<String>) -> Self {
        Self {
            key_column: key_column.into(),
            compare_column: compare_column.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)
            .map_err(|err| ReconError::InvalidConfig(format!("malformed JSON: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    /// Name of the left-hand copy of `column` in the report.
    pub fn left_column(&self, column: &str) -> String {
        format!("{column}{}", self.left_suffix)
    }

    /// Name of the right-hand copy of `column` in the report.
    pub fn right_column(&self, column: &str) -> String {
        format!("{column}{}", self.right_suffix)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key_column.trim().is_empty() {
            return Err(invalid("key column must not be blank"));
        }
        if self.compare_column.trim().is_empty() {
            return Err(invalid("compare column must not be blank"));
        }
        if self.key_column == self.compare_column {
            return Err(invalid(format!(
                "key and compare column are both '{}'",
                self.key_column
            )));
        }
        if self.left_suffix.is_empty() || self.right_suffix.is_empty() {
            return Err(invalid("column suffixes must not be empty"));
        }
        if self.left_suffix == self.right_suffix {
            return Err(invalid(format!(
                "left and right suffix are both '{}'",
                self.left_suffix
            )));
        }
        // A suffix ending in the other one lets `X_A` and `X_` + `A` coincide.
        if self.left_suffix.ends_with(&self.right_suffix)
            || self.right_suffix.ends_with(&self.left_suffix)
        {
            return Err(invalid(format!(
                "suffixes '{}' and '{}' overlap",
                self.left_suffix, self.right_suffix
            )));
        }
        if self.key_column.ends_with(&self.left_suffix)
            || self.key_column.ends_with(&self.right_suffix)
        {
            return Err(invalid(format!(
                "key column '{}' collides with a suffixed column name",
                self.key_column
            )));
        }
        if self.status_column.trim().is_empty() || self.status_column == self.key_column {
            return Err(invalid(format!(
                "status column '{}' must be non-blank and differ from the key column",
                self.status_column
            )));
        }
        // Suffixed columns always end in a suffix, so this keeps report headers unique.
        if self.status_column.ends_with(&self.left_suffix)
            || self.status_column.ends_with(&self.right_suffix)
        {
            return Err(invalid(format!(
                "status column '{}' collides with a suffixed column name",
                self.status_column
            )));
        }
        validate_sheet_name(&self.report_sheet)?;
        if self.report_file_name.trim().is_empty() {
            return Err(invalid("report file name must not be blank"));
        }
        Ok(())
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid("report sheet name must not be blank"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid(format!(
            "report sheet name '{name}' exceeds {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(ch) = name
        .chars()
        .find(|ch| INVALID_SHEET_CHARS.contains(ch) || ch.is_control())
    {
        return Err(invalid(format!(
            "report sheet name '{name}' contains invalid character {ch:?}"
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid(format!(
            "report sheet name '{name}' must not start or end with an apostrophe"
        )));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ReconError {
    ReconError::InvalidConfig(message.into())
}
