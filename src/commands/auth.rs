//! Login, signup and password reset commands

use crate::business::Inventory;
use crate::database::{NewUser, User, UserRole};
use crate::error::{InventoryError, Result};
use super::console::Console;

/// Check credentials and load the account on success
pub fn login(
    inventory: &Inventory,
    console: &mut dyn Console,
    email: &str,
    password: &str,
) -> Result<Option<User>> {
    if !inventory.login(email, password)? {
        console.say("Login failed");
        return Ok(None);
    }

    let user = inventory
        .get_user(email)?
        .ok_or_else(|| InventoryError::UserNotFound(email.to_string()))?;
    console.say("Login successful");
    Ok(Some(user))
}

/// Register a plain user with the given credentials and log them in
pub fn signup(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    email: &str,
    password: &str,
) -> Result<Option<User>> {
    register(inventory, console, email, password, UserRole::User)
}

/// Register an account with an explicit role and log it in
pub fn register(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<Option<User>> {
    let Some(username) = console.prompt("Username: ")? else {
        return Ok(None);
    };
    let Some(address) = console.prompt("Address: ")? else {
        return Ok(None);
    };

    let new_user = NewUser {
        email: email.to_string(),
        username,
        password: password.to_string(),
        address,
        role,
    };
    if !inventory.register(new_user)? {
        console.say("Email already exists!");
        return Ok(None);
    }

    login(inventory, console, email, password)
}

/// Ask for a new password and store it
pub fn reset_password(
    inventory: &mut Inventory,
    console: &mut dyn Console,
    user: &mut User,
) -> Result<()> {
    let Some(new_password) = console.prompt_password("New password: ")? else {
        return Ok(());
    };
    if new_password.is_empty() {
        return Err(InventoryError::InvalidInput("password must not be empty".to_string()));
    }

    if inventory.reset_password(user, &new_password)? {
        console.say("Password updated successfully");
    } else {
        console.say("New password same as current one!");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::inventory::tests::create_test_inventory;
    use crate::commands::console::ScriptedConsole;

    #[test]
    fn test_signup_then_login() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut console = ScriptedConsole::new(["ann", "1 Main St"]);

        let user = signup(&mut inventory, &mut console, "Ann@Example.com", "pw")
            .unwrap()
            .unwrap();
        assert_eq!(user.username, "ann");
        assert_eq!(user.role, UserRole::User);
        assert!(console.transcript().contains("Login successful"));

        let mut console = ScriptedConsole::new(Vec::<String>::new());
        assert!(login(&inventory, &mut console, "ann@example.com", "pw").unwrap().is_some());
        assert!(login(&inventory, &mut console, "ann@example.com", "nope").unwrap().is_none());
        assert_eq!(console.output().last().unwrap(), "Login failed");
    }

    #[test]
    fn test_signup_duplicate_email() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut console = ScriptedConsole::new(["ann", "", "ann2", ""]);
        signup(&mut inventory, &mut console, "ann@example.com", "pw").unwrap();

        let again = signup(&mut inventory, &mut console, "ann@example.com", "other").unwrap();
        assert!(again.is_none());
        assert_eq!(console.output().last().unwrap(), "Email already exists!");
    }

    #[test]
    fn test_signup_rejects_empty_password() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut console = ScriptedConsole::new(["ann", ""]);
        let result = signup(&mut inventory, &mut console, "ann@example.com", "");
        assert!(matches!(result, Err(InventoryError::InvalidInput(_))));
        assert!(inventory.get_user("ann@example.com").unwrap().is_none());
    }

    #[test]
    fn test_reset_password_messages() {
        let (mut inventory, _temp) = create_test_inventory();
        let mut console = ScriptedConsole::new(["ann", "", "pw", "fresh", ""]);
        let mut user = signup(&mut inventory, &mut console, "ann@example.com", "pw")
            .unwrap()
            .unwrap();

        reset_password(&mut inventory, &mut console, &mut user).unwrap();
        assert_eq!(console.output().last().unwrap(), "New password same as current one!");

        reset_password(&mut inventory, &mut console, &mut user).unwrap();
        assert_eq!(console.output().last().unwrap(), "Password updated successfully");
        assert!(inventory.login("ann@example.com", "fresh").unwrap());

        assert!(reset_password(&mut inventory, &mut console, &mut user).is_err());
    }
}
