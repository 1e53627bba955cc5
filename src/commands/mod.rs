//! Console command handlers
//!
//! One function per user action, bridging console input with the
//! Inventory API. Handlers talk to the user through [`Console`] only.

pub mod console;
pub mod display;
pub mod auth;
pub mod items;
pub mod categories;
pub mod filter;

pub use console::{Console, ScriptedConsole, Terminal};
