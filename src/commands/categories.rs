//! Category commands

use crate::business::Inventory;
use crate::database::Category;
use crate::error::Result;
use super::console::Console;
use super::display::format_category_list;

/// Print every category
pub fn display_categories(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let categories = inventory.get_categories()?;
    console.say(&format_category_list(categories));
    Ok(())
}

/// Prompt for a name and add the category
pub fn add_category(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let Some(name) = console.prompt("Category name: ")? else {
        return Ok(());
    };
    if name.is_empty() {
        console.say("Category name must not be empty");
        return Ok(());
    }

    if inventory.add_category(&name)? {
        console.say(&format!("{} category added", name));
    } else {
        console.say(&format!("{} category already exists.", name));
    }
    Ok(())
}

/// Rename a category chosen by name
pub fn update_category(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let message = "Name of the category to change: ";
    let Some(category) = prompt_category(inventory, console, message)? else {
        return Ok(());
    };
    let Some(new_name) = console.prompt("New name of the category: ")? else {
        return Ok(());
    };

    if inventory.update_category(&category.id, &new_name)? {
        console.say(&format!("{} renamed to {}", category.name, new_name.trim()));
    } else {
        console.say("Category was not renamed: the name is unchanged or already taken.");
    }
    Ok(())
}

/// Delete a category chosen by name
pub fn delete_category(inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
    let message = "Name of the category to delete: ";
    let Some(category) = prompt_category(inventory, console, message)? else {
        return Ok(());
    };

    if inventory.delete_category(&category.id)? {
        console.say(&format!("{} category deleted", category.name));
    } else {
        console.say("There is no category with this name.");
    }
    Ok(())
}

fn prompt_category(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    message: &str,
) -> Result<Option<Category>> {
    let Some(name) = console.prompt(message)? else {
        return Ok(None);
    };
    let category = inventory.get_category_by_name(&name)?;
    if category.is_none() {
        console.say("There is no category with this name.");
    }
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::inventory::tests::create_test_inventory;
    use crate::commands::console::ScriptedConsole;

    #[test]
    fn test_category_commands() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut console = ScriptedConsole::new([
            "Hardware", "Hardware", "",
            "hardware", "Tools",
            "tools", "Tools",
            "Garden",
            "TOOLS",
        ]);

        add_category(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "Hardware category added");
        add_category(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "Hardware category already exists.");
        add_category(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "Category name must not be empty");

        update_category(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "Hardware renamed to Tools");
        update_category(&mut inventory, &mut console).unwrap();
        assert!(console.output().last().unwrap().starts_with("Category was not renamed"));

        delete_category(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "There is no category with this name.");
        delete_category(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "Tools category deleted");

        display_categories(&mut inventory, &mut console).unwrap();
        assert_eq!(console.output().last().unwrap(), "There are no categories yet.");
    }
}
