//! Console abstraction used by the command handlers
//!
//! Handlers never touch stdin/stdout directly. The binary drives them through
//! [`Terminal`]; tests use [`ScriptedConsole`].

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{InventoryError, Result};

/// Line-oriented user interaction
pub trait Console {
    /// Show `message` and read one trimmed line. `None` means input is closed.
    fn prompt(&mut self, message: &str) -> Result<Option<String>>;

    /// Like [`Console::prompt`] but without echoing the input
    fn prompt_password(&mut self, message: &str) -> Result<Option<String>>;

    /// Print one line of output
    fn say(&mut self, message: &str);

    /// Ask a Y/N question; anything starting with `y` is yes
    fn confirm(&mut self, question: &str) -> Result<Option<bool>> {
        Ok(self
            .prompt(&format!("{} (Y/N) ", question))?
            .map(|answer| answer.to_ascii_lowercase().starts_with('y')))
    }

    /// Ask for a non-negative number, or `default` on empty input
    fn prompt_u32(&mut self, message: &str, default: Option<u32>) -> Result<Option<u32>> {
        let Some(answer) = self.prompt(message)? else {
            return Ok(None);
        };
        if answer.is_empty()
            && let Some(default) = default
        {
            return Ok(Some(default));
        }
        answer
            .parse()
            .map(Some)
            .map_err(|_| {
                InventoryError::InvalidInput(format!("'{}' is not a valid number", answer))
            })
    }
}

/// Console backed by the process terminal
#[derive(Debug, Default)]
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }
}

impl Console for Terminal {
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_password(&mut self, message: &str) -> Result<Option<String>> {
        // Piped input has no terminal to hide the echo on
        if !io::stdin().is_terminal() {
            return self.prompt(message);
        }
        Ok(Some(rpassword::prompt_password(message)?))
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Console fed from a fixed list of answers, recording everything said
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    /// Lines printed so far
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// All output joined with newlines
    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, _message: &str) -> Result<Option<String>> {
        Ok(self.inputs.pop_front().map(|line| line.trim().to_string()))
    }

    fn prompt_password(&mut self, message: &str) -> Result<Option<String>> {
        self.prompt(message)
    }

    fn say(&mut self, message: &str) {
        self.output.extend(message.lines().map(str::to_string));
    }
}
