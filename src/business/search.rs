//! Search functionality
//!
//! Name lookups and free-text search over the cached items.

use crate::SEARCH_MIN_LENGTH;
use crate::database::Item;
use crate::error::Result;
use super::inventory::Inventory;

/// Check if the search phrase meets the minimum length requirement
pub fn is_valid_search_phrase(phrase: &str) -> bool {
    phrase.trim().chars().count() >= SEARCH_MIN_LENGTH
}

/// Check if a string contains the search phrase (case-insensitive)
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.to_lowercase().contains(&phrase.to_lowercase())
}

impl Inventory {
    /// Find an item by its exact name, ignoring case
    pub fn find_item_by_name(&mut self, name: &str) -> Result<Option<Item>> {
        let wanted = name.trim().to_lowercase();
        let items = self.get_items()?;
        Ok(items.iter().find(|i| i.name.to_lowercase() == wanted).cloned())
    }

    /// Items whose name or description contains the phrase
    ///
    /// Phrases shorter than `SEARCH_MIN_LENGTH` return nothing.
    pub fn search_items(&mut self, phrase: &str) -> Result<Vec<Item>> {
        if !is_valid_search_phrase(phrase) {
            return Ok(Vec::new());
        }

        let phrase = phrase.trim();
        let items = self.get_items()?;
        Ok(items
            .iter()
            .filter(|i| contains_phrase(&i.name, phrase) || contains_phrase(&i.description, phrase))
            .cloned()
            .collect())
    }
}
