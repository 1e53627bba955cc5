//! Text formatting for items and categories

use crate::database::{Category, Item};

/// Name of the item's category, or a marker when it has none
pub fn category_label<'a>(item: &Item, categories: &'a [Category]) -> &'a str {
    item.category_id
        .as_deref()
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("NOT CATEGORIZED")
}

/// Detail block for one item
pub fn format_item_details(item: &Item, categories: &[Category]) -> String {
    [
        format!("name: {}", item.name),
        format!("description: {}", item.description),
        format!("price: {}", item.price),
        format!("status: {}", item.status),
        format!("quantity: {}", item.quantity),
        format!("sold: {}", item.sold),
        format!("minimum quantity: {}", item.min_quantity),
        format!("quantity in stock: {}", item.stock),
        format!("category: {}", category_label(item, categories)),
    ]
    .join("\n")
}

/// Numbered list of items
pub fn format_item_list(items: &[Item], categories: &[Category]) -> String {
    if items.is_empty() {
        return "No items match.".to_string();
    }

    let mut out = String::from("Items:");
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!("\nItem {}:\n", index + 1));
        out.push_str(&format_item_details(item, categories));
        out.push_str("\n=================");
    }
    out
}

/// List of category names
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "There are no categories yet.".to_string();
    }

    let mut out = String::from("Categories:");
    for category in categories {
        out.push_str(&format!("\nCategory name: {}", category.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::database::ItemStatus;

    fn item(category_id: Option<&str>) -> Item {
        Item {
            id: "i1".to_string(),
            name: "Bolt".to_string(),
            description: "M8".to_string(),
            price: 5,
            status: ItemStatus::LowStock,
            quantity: 10,
            sold: 8,
            min_quantity: 5,
            stock: 2,
            category_id: category_id.map(str::to_string),
            create_timestamp: Utc::now(),
            change_timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_item_details() {
        let categories = vec![Category { id: "c1".to_string(), name: "Hardware".to_string() }];
        let text = format_item_details(&item(Some("c1")), &categories);
        assert!(text.contains("status: LowStock"));
        assert!(text.contains("quantity in stock: 2"));
        assert!(text.contains("category: Hardware"));

        let text = format_item_details(&item(None), &categories);
        assert!(text.contains("category: NOT CATEGORIZED"));
    }

    #[test]
    fn test_lists() {
        assert_eq!(format_item_list(&[], &[]), "No items match.");
        assert!(format_item_list(&[item(None)], &[]).starts_with("Items:\nItem 1:\nname: Bolt"));
        assert_eq!(format_category_list(&[]), "There are no categories yet.");
    }
}
