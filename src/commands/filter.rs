//! Filter commands (status, category, price, stock)

use crate::business::Inventory;
use crate::business::filter::{Criteria, FilterField};
use crate::error::Result;
use super::console::Console;
use super::display::format_item_list;

/// Prompt for a value (and an operator for numeric fields) and list matches
pub fn filter_items(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    field: FilterField,
) -> Result<()> {
    let operator = if field.is_numeric() {
        let Some(op) = console.prompt("Operator (=, !=, <, <=, >, >=) [=]: ")? else {
            return Ok(());
        };
        Some(op)
    } else {
        None
    };

    let message = match field {
        FilterField::Status => "Status (InStock, LowStock, OutOfStock, Unknown): ".to_string(),
        other => format!("{}: ", capitalize(&other.to_string())),
    };
    let Some(value) = console.prompt(&message)? else {
        return Ok(());
    };

    let criteria = Criteria::new(field, &value, operator.as_deref())?;
    let items = inventory.filter_items(&criteria)?;
    let categories = inventory.get_categories()?;
    if items.is_empty() {
        console.say("The criteria does not match any item!");
    } else {
        console.say(&format_item_list(&items, categories));
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
