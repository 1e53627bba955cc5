//! Authenticated console session
//!
//! Reads command tokens and dispatches them to the handlers in
//! [`crate::commands`], gated by the user's role.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::business::Inventory;
use crate::business::filter::FilterField;
use crate::commands::Console;
use crate::database::{User, UserRole};
use crate::error::{InventoryError, Result};

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Menu,
    Logout,
    ResetPassword,
    AddItem,
    DisplayItems,
    UpdateItem,
    DeleteItem,
    UpdateQuantity,
    SoldItem,
    DisplayCategories,
    AddCategory,
    UpdateCategory,
    DeleteCategory,
    SearchItem,
    FilterStatus,
    FilterCategory,
    FilterPrice,
    FilterStock,
}

impl MenuCommand {
    /// All commands, in menu order
    pub const ALL: [MenuCommand; 18] = [
        MenuCommand::AddItem,
        MenuCommand::DisplayItems,
        MenuCommand::UpdateItem,
        MenuCommand::DeleteItem,
        MenuCommand::UpdateQuantity,
        MenuCommand::SoldItem,
        MenuCommand::DisplayCategories,
        MenuCommand::AddCategory,
        MenuCommand::UpdateCategory,
        MenuCommand::DeleteCategory,
        MenuCommand::SearchItem,
        MenuCommand::FilterStatus,
        MenuCommand::FilterCategory,
        MenuCommand::FilterPrice,
        MenuCommand::FilterStock,
        MenuCommand::ResetPassword,
        MenuCommand::Menu,
        MenuCommand::Logout,
    ];

    /// Parse a command token; surrounding whitespace and case are ignored
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|cmd| cmd.token() == token)
    }

    /// Token typed at the prompt
    pub fn token(&self) -> &'static str {
        match self {
            MenuCommand::Menu => "menu",
            MenuCommand::Logout => "logout",
            MenuCommand::ResetPassword => "reset-password",
            MenuCommand::AddItem => "additem",
            MenuCommand::DisplayItems => "displayitems",
            MenuCommand::UpdateItem => "updateitem",
            MenuCommand::DeleteItem => "deleteitem",
            MenuCommand::UpdateQuantity => "updatequantity",
            MenuCommand::SoldItem => "solditem",
            MenuCommand::DisplayCategories => "displaycategories",
            MenuCommand::AddCategory => "addcategory",
            MenuCommand::UpdateCategory => "updatecategory",
            MenuCommand::DeleteCategory => "deletecategory",
            MenuCommand::SearchItem => "searchitem",
            MenuCommand::FilterStatus => "filterstatus",
            MenuCommand::FilterCategory => "filtercategory",
            MenuCommand::FilterPrice => "filterprice",
            MenuCommand::FilterStock => "filterstock",
        }
    }

    /// One-line description for the menu
    pub fn description(&self) -> &'static str {
        match self {
            MenuCommand::Menu => "Show this menu",
            MenuCommand::Logout => "Log out",
            MenuCommand::ResetPassword => "Change your password",
            MenuCommand::AddItem => "Add item",
            MenuCommand::DisplayItems => "Display all items",
            MenuCommand::UpdateItem => "Update item by name",
            MenuCommand::DeleteItem => "Delete item by name",
            MenuCommand::UpdateQuantity => "Update quantity of an item",
            MenuCommand::SoldItem => "Record sold items",
            MenuCommand::DisplayCategories => "Display all categories",
            MenuCommand::AddCategory => "Add category",
            MenuCommand::UpdateCategory => "Rename category",
            MenuCommand::DeleteCategory => "Delete category by name",
            MenuCommand::SearchItem => "Search item by name",
            MenuCommand::FilterStatus => "Filter items by status",
            MenuCommand::FilterCategory => "Filter items by category",
            MenuCommand::FilterPrice => "Filter items by price",
            MenuCommand::FilterStock => "Filter items by stock",
        }
    }

    /// Whether `role` may run this command
    pub fn allowed_for(&self, role: UserRole) -> bool {
        match role {
            UserRole::Admin => true,
            UserRole::User => matches!(
                self,
                MenuCommand::Menu
                    | MenuCommand::Logout
                    | MenuCommand::ResetPassword
                    | MenuCommand::DisplayItems
                    | MenuCommand::DisplayCategories
                    | MenuCommand::SearchItem
            ),
        }
    }
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for MenuCommand {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
            .ok_or_else(|| InventoryError::InvalidInput(format!("unknown command '{}'", s.trim())))
    }
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Logout,
}

/// Menu text listing the commands available to `role`
pub fn menu_text(role: UserRole) -> String {
    let mut out = String::from("====== Menu ======");
    for cmd in MenuCommand::ALL.iter().filter(|cmd| cmd.allowed_for(role)) {
        out.push_str(&format!("\n{:<28} => {}", cmd.description(), cmd.token()));
    }
    out
}

/// A logged-in user working against an inventory
pub struct Session {
    user: User,
    default_min_quantity: u32,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            default_min_quantity: 0,
        }
    }

    /// Minimum quantity offered when adding items
    pub fn with_default_min_quantity(mut self, default_min_quantity: u32) -> Self {
        self.default_min_quantity = default_min_quantity;
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Prompt shown before each command
    pub fn prompt(&self) -> String {
        match self.user.role {
            UserRole::Admin => format!("{}\\admin\\home> ", self.user.username),
            UserRole::User => format!("{}\\home> ", self.user.username),
        }
    }

    /// Fail unless the current user may run `cmd`
    pub fn authorize(&self, cmd: MenuCommand) -> Result<()> {
        if cmd.allowed_for(self.user.role) {
            Ok(())
        } else {
            Err(InventoryError::PermissionDenied(format!(
                "'{}' requires an admin account",
                cmd
            )))
        }
    }

    /// Run one command. User mistakes are reported on the console; storage
    /// failures are returned.
    pub fn dispatch(
        &mut self,
        inventory: &mut Inventory,
        console: &mut dyn Console,
        cmd: MenuCommand,
    ) -> Result<Flow> {
        debug!(command = %cmd, user = %self.user.email, "Dispatching");

        match self.run(inventory, console, cmd) {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_recoverable() => {
                if matches!(e, InventoryError::PermissionDenied(_)) {
                    warn!(command = %cmd, user = %self.user.email, "Refused command");
                }
                console.say(&e.to_string());
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    fn run(
        &mut self,
        inventory: &mut Inventory,
        console: &mut dyn Console,
        cmd: MenuCommand,
    ) -> Result<Flow> {
        use crate::commands::{auth, categories, filter, items};

        self.authorize(cmd)?;

        match cmd {
            MenuCommand::Menu => console.say(&menu_text(self.user.role)),
            MenuCommand::Logout => return Ok(Flow::Logout),
            MenuCommand::ResetPassword => auth::reset_password(inventory, console, &mut self.user)?,
            MenuCommand::AddItem => items::add_item(inventory, console, self.default_min_quantity)?,
            MenuCommand::DisplayItems => items::display_items(inventory, console)?,
            MenuCommand::UpdateItem => items::update_item(inventory, console)?,
            MenuCommand::DeleteItem => items::delete_item(inventory, console)?,
            MenuCommand::UpdateQuantity => items::update_quantity(inventory, console)?,
            MenuCommand::SoldItem => items::sold_item(inventory, console)?,
            MenuCommand::DisplayCategories => categories::display_categories(inventory, console)?,
            MenuCommand::AddCategory => categories::add_category(inventory, console)?,
            MenuCommand::UpdateCategory => categories::update_category(inventory, console)?,
            MenuCommand::DeleteCategory => categories::delete_category(inventory, console)?,
            MenuCommand::SearchItem => items::search_item(inventory, console)?,
            MenuCommand::FilterStatus => {
                filter::filter_items(inventory, console, FilterField::Status)?
            }
            MenuCommand::FilterCategory => {
                filter::filter_items(inventory, console, FilterField::Category)?
            }
            MenuCommand::FilterPrice => {
                filter::filter_items(inventory, console, FilterField::Price)?
            }
            MenuCommand::FilterStock => {
                filter::filter_items(inventory, console, FilterField::Stock)?
            }
        }
        Ok(Flow::Continue)
    }

    /// Parse and run one input line
    pub fn execute_line(
        &mut self,
        inventory: &mut Inventory,
        console: &mut dyn Console,
        line: &str,
    ) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        match MenuCommand::parse(line) {
            Some(cmd) => self.dispatch(inventory, console, cmd),
            None => {
                let line = line.trim();
                console.say(&format!("Unknown command '{}'. Type 'menu' for the list.", line));
                Ok(Flow::Continue)
            }
        }
    }

    /// Read and run commands until logout or end of input
    pub fn run_loop(&mut self, inventory: &mut Inventory, console: &mut dyn Console) -> Result<()> {
        console.say(&format!("Welcome, {}", self.user.username));

        loop {
            let Some(line) = console.prompt(&self.prompt())? else {
                debug!("Input closed");
                return Ok(());
            };
            if self.execute_line(inventory, console, &line)? == Flow::Logout {
                console.say("Logout successful");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewItem;
    use crate::business::inventory::tests::create_test_inventory;
    use crate::commands::ScriptedConsole;

    fn user(role: UserRole) -> User {
        User {
            id: "u1".to_string(),
            email: "ann@example.com".to_string(),
            username: "ann".to_string(),
            password: String::new(),
            address: String::new(),
            salt: String::new(),
            role,
        }
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(MenuCommand::parse("  AddItem "), Some(MenuCommand::AddItem));
        assert_eq!(MenuCommand::parse("RESET-PASSWORD"), Some(MenuCommand::ResetPassword));
        assert_eq!(MenuCommand::parse("filterstock"), Some(MenuCommand::FilterStock));
        assert_eq!(MenuCommand::parse("dance"), None);
        assert!("dance".parse::<MenuCommand>().is_err());

        for cmd in MenuCommand::ALL {
            assert_eq!(MenuCommand::parse(cmd.token()), Some(cmd));
        }
    }

    #[test]
    fn test_role_gating() {
        for cmd in MenuCommand::ALL {
            assert!(cmd.allowed_for(UserRole::Admin));
        }
        assert!(MenuCommand::DisplayItems.allowed_for(UserRole::User));
        assert!(MenuCommand::SearchItem.allowed_for(UserRole::User));
        assert!(!MenuCommand::AddItem.allowed_for(UserRole::User));
        assert!(!MenuCommand::DeleteCategory.allowed_for(UserRole::User));
        assert!(!MenuCommand::FilterPrice.allowed_for(UserRole::User));
    }

    #[test]
    fn test_menu_text_lists_allowed_commands() {
        let text = menu_text(UserRole::User);
        assert!(text.contains("displayitems"));
        assert!(!text.contains("additem"));
        assert!(menu_text(UserRole::Admin).contains("additem"));
    }

    #[test]
    fn test_user_is_refused_admin_commands() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut session = Session::new(user(UserRole::User));
        let mut console = ScriptedConsole::new(["Bolt"]);

        let flow = session.dispatch(&mut inventory, &mut console, MenuCommand::AddItem).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(console.transcript().contains("Permission denied"));
        assert_eq!(console.remaining(), 1);
        assert!(inventory.get_items().unwrap().is_empty());
    }

    #[test]
    fn test_recoverable_errors_are_reported() {
        let (mut inventory, _temp) = create_test_inventory();
        inventory.add_item(&NewItem::new("Bolt", 5, 1, 0)).unwrap();
        let mut session = Session::new(user(UserRole::Admin));
        let mut console = ScriptedConsole::new(["Bolt", "5"]);

        let flow = session.dispatch(&mut inventory, &mut console, MenuCommand::SoldItem).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert!(console.transcript().contains("Invalid input"));
    }

    #[test]
    fn test_run_loop() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut session = Session::new(user(UserRole::Admin)).with_default_min_quantity(2);
        let mut console = ScriptedConsole::new([
            "addcategory", "Hardware",
            "", "bogus",
            "additem", "Bolt", "", "5", "10", "9", "", "Hardware",
            "filterstatus", "LowStock",
            "logout",
            "displayitems",
        ]);

        session.run_loop(&mut inventory, &mut console).unwrap();

        let transcript = console.transcript();
        assert!(transcript.starts_with("Welcome, ann"));
        assert!(transcript.contains("Unknown command 'bogus'"));
        assert!(transcript.contains("Bolt added successfully"));
        assert!(transcript.contains("status: LowStock"));
        assert_eq!(console.output().last().unwrap(), "Logout successful");
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_run_loop_stops_at_end_of_input() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut session = Session::new(user(UserRole::User));
        let mut console = ScriptedConsole::new(["menu"]);
        session.run_loop(&mut inventory, &mut console).unwrap();
        assert!(console.transcript().contains("====== Menu ======"));
    }
}
