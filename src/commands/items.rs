//! Item commands
//!
//! Items are addressed by name at the prompt; lookups ignore case.

use crate::business::Inventory;
use crate::database::{Item, ItemUpdate, NewItem};
use crate::error::{InventoryError, Result};
use super::console::Console;
use super::display::{format_item_details, format_item_list};

/// Prompt for a new item and add it
pub fn add_item(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    default_min_quantity: u32,
) -> Result<()> {
    let Some(name) = console.prompt("Item name: ")? else {
        return Ok(());
    };
    if inventory.find_item_by_name(&name)?.is_some() {
        console.say(&format!("{} item already exists", name));
        return Ok(());
    }

    let Some(description) = console.prompt("Description: ")? else {
        return Ok(());
    };
    let Some(price) = console.prompt_u32("Price: ", None)? else {
        return Ok(());
    };
    let Some(quantity) = console.prompt_u32("Quantity available: ", None)? else {
        return Ok(());
    };
    let Some(sold) = console.prompt_u32("Number of sold items [0]: ", Some(0))? else {
        return Ok(());
    };
    let Some(min_quantity) = console.prompt_u32(
        &format!("Minimum quantity to keep in stock [{}]: ", default_min_quantity),
        Some(default_min_quantity),
    )?
    else {
        return Ok(());
    };
    let Some(category) = console.prompt("Category (blank for none): ")? else {
        return Ok(());
    };

    let mut new_item = NewItem::new(&name, price, quantity, min_quantity)
        .with_description(&description)
        .with_sold(sold);
    if !category.is_empty() {
        let category = inventory
            .get_category_by_name(&category)?
            .ok_or(InventoryError::CategoryNotFound(category))?;
        new_item = new_item.with_category(&category.id);
    }

    match inventory.add_item(&new_item)? {
        Some(_) => console.say(&format!("{} added successfully", name)),
        None => console.say(&format!("Failed to add {}", name)),
    }
    Ok(())
}

/// Print every item
pub fn display_items(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let categories = inventory.get_categories()?.to_vec();
    let items = inventory.get_items()?;
    console.say(&format_item_list(items, &categories));
    Ok(())
}

/// Walk through the fields of an item, asking which to change
pub fn update_item(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let Some(item) = prompt_item(inventory, console, "Name of the item to update: ")? else {
        return Ok(());
    };

    let mut update = ItemUpdate::default();

    if ask(console, "Update the name?")? {
        update.name = console.prompt("New name: ")?.filter(|n| *n != item.name);
    }
    if ask(console, "Update the description?")? {
        update.description = console
            .prompt("New description: ")?
            .filter(|d| *d != item.description);
    }
    if ask(console, "Update the price?")? {
        update.price = console.prompt_u32("New price: ", None)?.filter(|p| *p != item.price);
    }
    if ask(console, "Update the quantity?")? {
        update.quantity = console
            .prompt_u32("New quantity: ", None)?
            .filter(|q| *q != item.quantity);
    }
    if ask(console, "Update the number of sold items?")? {
        update.sold = console.prompt_u32("New number sold: ", None)?.filter(|s| *s != item.sold);
    }
    if ask(console, "Update the minimum quantity?")? {
        update.min_quantity = console
            .prompt_u32("New minimum quantity: ", None)?
            .filter(|m| *m != item.min_quantity);
    }
    if ask(console, "Update the category?")? {
        if let Some(name) = console.prompt("New category (blank for none): ")? {
            let category_id = if name.is_empty() {
                None
            } else {
                let category = inventory
                    .get_category_by_name(&name)?
                    .ok_or(InventoryError::CategoryNotFound(name))?;
                Some(category.id)
            };
            if category_id != item.category_id {
                update.category_id = Some(category_id);
            }
        }
    }

    if update.is_empty() {
        console.say("No changes were made to the item.");
    } else if inventory.update_item(&item.id, update)? {
        console.say("Item updated successfully!");
    } else {
        console.say("Failed to update the item.");
    }
    Ok(())
}

/// Delete an item by name
pub fn delete_item(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let Some(item) = prompt_item(inventory, console, "Name of the item to delete: ")? else {
        return Ok(());
    };

    if inventory.delete_item(&item.id)? {
        console.say(&format!("{} deleted", item.name));
    } else {
        console.say("Item not found.");
    }
    Ok(())
}

/// Set the quantity received for an item
pub fn update_quantity(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let Some(item) = prompt_item(inventory, console, "Name of the item: ")? else {
        return Ok(());
    };
    let message = format!("New quantity (currently {}): ", item.quantity);
    let Some(quantity) = console.prompt_u32(&message, None)? else {
        return Ok(());
    };

    if inventory.update_quantity(&item.id, quantity)? {
        report_stock(inventory, console, &item.id)?;
    } else {
        console.say("Failed to update the quantity.");
    }
    Ok(())
}

/// Record a sale
pub fn sold_item(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let Some(item) = prompt_item(inventory, console, "Name of the sold item: ")? else {
        return Ok(());
    };
    let Some(count) = console.prompt_u32("How many were sold? ", None)? else {
        return Ok(());
    };

    if inventory.sell_item(&item.id, count)? {
        report_stock(inventory, console, &item.id)?;
    } else {
        console.say("Failed to record the sale.");
    }
    Ok(())
}

/// Look an item up by exact name, falling back to a phrase search
pub fn search_item(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let Some(phrase) = console.prompt("Item name: ")? else {
        return Ok(());
    };

    let categories = inventory.get_categories()?.to_vec();
    if let Some(item) = inventory.find_item_by_name(&phrase)? {
        console.say(&format!("{} item found:", item.name));
        console.say(&format_item_details(&item, &categories));
        return Ok(());
    }

    let matches = inventory.search_items(&phrase)?;
    if matches.is_empty() {
        console.say("The item does not exist!");
    } else {
        console.say(&format_item_list(&matches, &categories));
    }
    Ok(())
}

fn prompt_item(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    message: &str,
) -> Result<Option<Item>> {
    let Some(name) = console.prompt(message)? else {
        return Ok(None);
    };
    let item = inventory.find_item_by_name(&name)?;
    if item.is_none() {
        console.say(&format!("Item with name '{}' not found.", name));
    }
    Ok(item)
}

fn ask(console: &mut dyn Console, question: &str) -> Result<bool> {
    Ok(console.confirm(question)?.unwrap_or(false))
}

fn report_stock(inventory: &mut Inventory, console: &mut dyn Console, item_id: &str) -> Result<()> {
    let item = inventory
        .get_item(item_id)?
        .ok_or_else(|| InventoryError::ItemNotFound(item_id.to_string()))?;
    console.say(&format!("{}: {} in stock ({})", item.name, item.stock, item.status));
    Ok(())
}
