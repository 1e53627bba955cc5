//! Category operations
//!
//! This module provides category management operations for the Inventory.

use tracing::{debug, info};

use crate::database::{Category, queries};
use crate::error::{InventoryError, Result};
use crate::utils::generate_id;
use super::inventory::Inventory;

impl Inventory {
    /// Get all categories ordered by name
    pub fn get_categories(&mut self) -> Result<&[Category]> {
        self.load_categories_if_needed()?;
        Ok(self.categories_cache.as_deref().unwrap_or_default())
    }

    /// Get a category by ID
    pub fn get_category(&mut self, category_id: &str) -> Result<Option<Category>> {
        let categories = self.get_categories()?;
        Ok(categories.iter().find(|c| c.id == category_id).cloned())
    }

    /// Find a category by name, ignoring case
    pub fn get_category_by_name(&mut self, name: &str) -> Result<Option<Category>> {
        let wanted = name.trim().to_lowercase();
        let categories = self.get_categories()?;
        Ok(categories.iter().find(|c| c.name.to_lowercase() == wanted).cloned())
    }

    /// Load categories from database if not cached
    pub(crate) fn load_categories_if_needed(&mut self) -> Result<()> {
        if self.categories_cache.is_some() {
            return Ok(());
        }

        let categories = queries::get_all_categories(self.conn()?)?
            .into_iter()
            .map(|raw| Category {
                id: raw.category_id,
                name: raw.name,
            })
            .collect::<Vec<_>>();

        debug!(count = categories.len(), "Loaded categories");
        self.categories_cache = Some(categories);
        Ok(())
    }

    /// Add a category. Returns false when the name already exists.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = validate_name(name)?;
        let category_id = generate_id();

        let added = queries::insert_category(self.conn()?, &category_id, name)?;
        if added {
            info!(category = name, "Added category");
            self.categories_cache = None;
        } else {
            debug!(category = name, "Category already exists");
        }
        Ok(added)
    }

    /// Rename a category. Returns false when the name is unchanged, the
    /// category does not exist, or another category already has the name.
    pub fn update_category(&mut self, category_id: &str, new_name: &str) -> Result<bool> {
        let new_name = validate_name(new_name)?;

        let Some(current) = self.get_category(category_id)? else {
            return Ok(false);
        };
        if current.name == new_name {
            return Ok(false);
        }

        let renamed = queries::rename_category(self.conn()?, category_id, new_name)?;
        if renamed {
            info!(from = %current.name, to = new_name, "Renamed category");
            self.categories_cache = None;
        }
        Ok(renamed)
    }

    /// Delete a category. Items in it become uncategorised.
    pub fn delete_category(&mut self, category_id: &str) -> Result<bool> {
        let deleted = queries::delete_category(self.conn()?, category_id)?;
        if deleted {
            info!(category_id, "Deleted category");
            self.clear_caches();
        }
        Ok(deleted)
    }

    /// Fail unless the category exists
    pub(crate) fn ensure_category_exists(&mut self, category_id: &str) -> Result<()> {
        if self.get_category(category_id)?.is_none() {
            return Err(InventoryError::CategoryNotFound(category_id.to_string()));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::InvalidInput("category name must not be empty".to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use crate::NewItem;
    use crate::business::inventory::tests::create_test_inventory;

    #[test]
    fn test_add_category() {
        let (mut inventory, _temp) = create_test_inventory();
        assert!(inventory.add_category("Hardware").unwrap());
        assert!(inventory.add_category("  Garden ").unwrap());

        let names: Vec<&str> = inventory
            .get_categories()
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Garden", "Hardware"]);
    }

    #[test]
    fn test_duplicate_category_is_noop() {
        let (mut inventory, _temp) = create_test_inventory();
        assert!(inventory.add_category("Hardware").unwrap());
        assert!(!inventory.add_category("Hardware").unwrap());
        assert!(!inventory.add_category("hARDWARE").unwrap());
        assert_eq!(inventory.get_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_rename_respects_case_insensitive_names() {
        let (mut inventory, _temp) = create_test_inventory();
        inventory.add_category("Hardware").unwrap();
        inventory.add_category("Garden").unwrap();
        let id = inventory.get_category_by_name("Garden").unwrap().unwrap().id;

        assert!(!inventory.update_category(&id, "HARDWARE").unwrap());
        assert!(inventory.update_category(&id, "GARDEN").unwrap());
        assert_eq!(inventory.get_category(&id).unwrap().unwrap().name, "GARDEN");
    }

    #[test]
    fn test_empty_category_name() {
        let (mut inventory, _temp) = create_test_inventory();
        assert!(inventory.add_category("   ").is_err());
    }

    #[test]
    fn test_get_category_by_name_ignores_case() {
        let (mut inventory, _temp) = create_test_inventory();
        inventory.add_category("Hardware").unwrap();
        let category = inventory.get_category_by_name("hARDware").unwrap().unwrap();
        assert_eq!(category.name, "Hardware");
        assert!(inventory.get_category_by_name("Garden").unwrap().is_none());
    }

    #[test]
    fn test_update_category() {
        let (mut inventory, _temp) = create_test_inventory();
        inventory.add_category("Hardware").unwrap();
        inventory.add_category("Garden").unwrap();
        let id = inventory.get_category_by_name("Hardware").unwrap().unwrap().id;

        assert!(!inventory.update_category(&id, "Hardware").unwrap());
        assert!(!inventory.update_category(&id, "Garden").unwrap());
        assert!(!inventory.update_category("missing", "Tools").unwrap());
        assert!(inventory.update_category(&id, "Tools").unwrap());
        assert_eq!(inventory.get_category(&id).unwrap().unwrap().name, "Tools");
    }

    #[test]
    fn test_delete_category() {
        let (mut inventory, _temp) = create_test_inventory();
        inventory.add_category("Hardware").unwrap();
        let id = inventory.get_category_by_name("Hardware").unwrap().unwrap().id;
        let item_id = inventory
            .add_item(&NewItem::new("Bolt", 5, 10, 1).with_category(&id))
            .unwrap()
            .unwrap();

        assert!(inventory.delete_category(&id).unwrap());
        assert!(!inventory.delete_category(&id).unwrap());
        assert!(inventory.get_categories().unwrap().is_empty());

        let item = inventory.get_item(&item_id).unwrap().unwrap();
        assert!(item.category_id.is_none());
    }
}
