//! Item operations
//!
//! This module provides item management operations for the Inventory.
//! Stock and status are always recomputed here before a row is written.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::database::{Item, ItemStatus, ItemUpdate, NewItem, queries};
use crate::database::queries::{RawItem, now_timestamp, parse_timestamp};
use crate::error::{InventoryError, Result};
use crate::utils::generate_id;
use super::filter::Criteria;
use super::inventory::Inventory;
use super::status::{derive_status, derive_stock};

impl Inventory {
    /// Get all items ordered by name
    pub fn get_items(&mut self) -> Result<&[Item]> {
        self.load_items_if_needed()?;
        Ok(self.items_cache.as_deref().unwrap_or_default())
    }

    /// Get an item by ID
    pub fn get_item(&mut self, item_id: &str) -> Result<Option<Item>> {
        let items = self.get_items()?;
        Ok(items.iter().find(|i| i.id == item_id).cloned())
    }

    /// Get items in a category
    pub fn get_items_by_category(&mut self, category_id: &str) -> Result<Vec<Item>> {
        let items = self.get_items()?;
        Ok(items
            .iter()
            .filter(|i| i.category_id.as_deref() == Some(category_id))
            .cloned()
            .collect())
    }

    /// Load items from database if not cached
    pub(crate) fn load_items_if_needed(&mut self) -> Result<()> {
        if self.items_cache.is_some() {
            return Ok(());
        }

        let raw_items = queries::get_all_items_raw(self.conn()?)?;
        let items: Vec<Item> = raw_items.into_iter().map(item_from_raw).collect();

        debug!(count = items.len(), "Loaded items");
        self.items_cache = Some(items);
        Ok(())
    }

    /// Create a new item. Returns `None` when an item with the same name exists.
    pub fn add_item(&mut self, new_item: &NewItem) -> Result<Option<String>> {
        let name = validate_name(&new_item.name)?;
        let (stock, status) =
            stock_and_status(new_item.quantity, new_item.sold, new_item.min_quantity)?;

        if let Some(category_id) = &new_item.category_id {
            self.ensure_category_exists(category_id)?;
        }

        let item_id = generate_id();
        let now = now_timestamp();
        let raw = RawItem {
            item_id: item_id.clone(),
            name: name.to_string(),
            description: new_item.description.trim().to_string(),
            price: new_item.price,
            status: status.as_str().to_string(),
            quantity: new_item.quantity,
            sold: new_item.sold,
            min_quantity: new_item.min_quantity,
            stock,
            category_id: new_item.category_id.clone(),
            create_timestamp: Some(now.clone()),
            change_timestamp: Some(now),
        };

        if !queries::insert_item(self.conn()?, &raw)? {
            debug!(item = name, "Item already exists");
            return Ok(None);
        }

        info!(item = name, stock, %status, "Added item");
        self.items_cache = None;
        Ok(Some(item_id))
    }

    /// Apply a partial update. Returns false when the item does not exist or
    /// the new name belongs to another item.
    pub fn update_item(&mut self, item_id: &str, update: ItemUpdate) -> Result<bool> {
        let Some(current) = self.get_item(item_id)? else {
            return Ok(false);
        };
        if update.is_empty() {
            return Ok(true);
        }

        if let Some(Some(category_id)) = &update.category_id {
            self.ensure_category_exists(category_id)?;
        }

        let name = match &update.name {
            Some(name) => validate_name(name)?.to_string(),
            None => current.name.clone(),
        };
        let quantity = update.quantity.unwrap_or(current.quantity);
        let sold = update.sold.unwrap_or(current.sold);
        let min_quantity = update.min_quantity.unwrap_or(current.min_quantity);
        let (stock, status) = stock_and_status(quantity, sold, min_quantity)?;

        let raw = RawItem {
            item_id: current.id.clone(),
            name,
            description: update
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or(current.description),
            price: update.price.unwrap_or(current.price),
            status: status.as_str().to_string(),
            quantity,
            sold,
            min_quantity,
            stock,
            category_id: update.category_id.unwrap_or(current.category_id),
            create_timestamp: None,
            change_timestamp: None,
        };

        let updated = queries::update_item(self.conn()?, &raw)?;
        if updated {
            info!(item = %raw.name, stock, %status, "Updated item");
            self.items_cache = None;
        } else {
            debug!(item_id, name = %raw.name, "Item update skipped");
        }
        Ok(updated)
    }

    /// Set the quantity received
    pub fn update_quantity(&mut self, item_id: &str, quantity: u32) -> Result<bool> {
        self.update_item(item_id, ItemUpdate { quantity: Some(quantity), ..Default::default() })
    }

    /// Record `count` units as sold
    pub fn sell_item(&mut self, item_id: &str, count: u32) -> Result<bool> {
        let Some(current) = self.get_item(item_id)? else {
            return Ok(false);
        };

        let sold = current
            .sold
            .checked_add(count)
            .filter(|sold| *sold <= current.quantity)
            .ok_or_else(|| {
                InventoryError::InvalidInput(format!(
                    "cannot sell {} of '{}': only {} in stock",
                    count, current.name, current.stock
                ))
            })?;

        self.update_item(item_id, ItemUpdate { sold: Some(sold), ..Default::default() })
    }

    /// Move an item into a category, or out of all categories with `None`
    pub fn set_item_category(&mut self, item_id: &str, category_id: Option<&str>) -> Result<bool> {
        self.update_item(item_id, ItemUpdate {
            category_id: Some(category_id.map(str::to_string)),
            ..Default::default()
        })
    }

    /// Delete an item. Returns false when it does not exist.
    pub fn delete_item(&mut self, item_id: &str) -> Result<bool> {
        let deleted = queries::delete_item(self.conn()?, item_id)?;
        if deleted {
            info!(item_id, "Deleted item");
            self.items_cache = None;
        }
        Ok(deleted)
    }

    /// Items matching a criterion, ordered by name
    pub fn filter_items(&self, criteria: &Criteria) -> Result<Vec<Item>> {
        let (where_clause, values) = criteria.to_sql();
        debug!(field = %criteria.field(), op = %criteria.comparison(), "Filtering items");

        let raw_items = queries::query_items_where(self.conn()?, &where_clause, values)?;
        Ok(raw_items.into_iter().map(item_from_raw).collect())
    }

    /// Items that are low on stock or out of stock
    pub fn items_needing_restock(&mut self) -> Result<Vec<Item>> {
        let items = self.get_items()?;
        Ok(items.iter().filter(|i| i.needs_restock()).cloned().collect())
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InventoryError::InvalidInput("item name must not be empty".to_string()));
    }
    Ok(name)
}

fn stock_and_status(quantity: u32, sold: u32, min_quantity: u32) -> Result<(u32, ItemStatus)> {
    let stock = derive_stock(quantity, sold).ok_or_else(|| InventoryError::InvalidInput(format!(
        "sold ({}) exceeds quantity ({})",
        sold, quantity
    )))?;
    Ok((stock, derive_status(stock, min_quantity)))
}

fn item_from_raw(raw: RawItem) -> Item {
    let status = ItemStatus::parse_lenient(&raw.status);
    if status == ItemStatus::Unknown {
        warn!(item_id = %raw.item_id, status = %raw.status, "Unrecognised item status");
    }

    Item {
        id: raw.item_id,
        name: raw.name,
        description: raw.description,
        price: raw.price,
        status,
        quantity: raw.quantity,
        sold: raw.sold,
        min_quantity: raw.min_quantity,
        stock: raw.stock,
        category_id: raw.category_id,
        create_timestamp: raw.create_timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now),
        change_timestamp: raw.change_timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now),
    }
}
