//! Run-level pagination switches.

use serde::{Deserialize, Serialize};

/// Options for one pagination run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginateOptions {
    /// Start a new section at every horizontal rule
    pub split_on_rules: bool,
}

impl PaginateOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable section splitting on horizontal rules.
    pub fn with_section_split(mut self, enabled: bool) -> Self {
        self.split_on_rules = enabled;
        self
    }
}

impl Default for PaginateOptions {
    fn default() -> Self {
        Self {
            split_on_rules: true,
        }
    }
}
