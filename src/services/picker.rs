//! Terminal fuzzy picker.

use crate::core::catalog::Picker;
use crate::models::config::PickerConfig;
use crate::{Error, Result};
use dialoguer::FuzzySelect;

/// Fuzzy selection on stderr, starting on the first item.
#[derive(Debug, Clone)]
pub struct FuzzyPicker {
    max_rows: usize,
}

impl FuzzyPicker {
    /// Create a picker with the given settings.
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            max_rows: config.max_rows.max(1),
        }
    }
}

impl Picker for FuzzyPicker {
    fn select(&mut self, labels: &[String]) -> Result<usize> {
        let choice = FuzzySelect::new()
            .with_prompt("Select")
            .items(labels)
            .default(0)
            .max_length(self.max_rows)
            .interact_opt()
            .map_err(|e| Error::other(format!("Picker failed: {}", e)))?;

        choice.ok_or(Error::SelectionCancelled)
    }
}
