//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail with a
//! clear error message; callers decide which, this module just refuses to
//! read stdin when `interactive` is false.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Prompt for confirmation (yes/no).
///
/// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
/// An empty answer takes the default; end-of-input counts as cancellation.
///
/// # Errors
///
/// Returns `PromptError::NotInteractive` when `interactive` is false.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        print!("{} {} ", message, hint);
        io::stdout().flush()?;
        let Some(line) = read_line()? else {
            return Err(PromptError::Cancelled);
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer 'y' or 'n'."),
        }
    }
}

/// Prompt to select from a list of options.
///
/// Returns the index of the selected option. An empty answer takes the
/// default, when one is given.
///
/// # Errors
///
/// Returns `PromptError::NotInteractive` when `interactive` is false.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    default: Option<usize>,
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    println!("{}", message);
    for (i, option) in options.iter().enumerate() {
        let marker = if default == Some(i) { " (default)" } else { "" };
        println!("  {}) {}{}", i + 1, option.as_ref(), marker);
    }
    loop {
        print!("Enter number: ");
        io::stdout().flush()?;
        let Some(line) = read_line()? else {
            return Err(PromptError::Cancelled);
        };
        let answer = line.trim();
        if answer.is_empty() {
            if let Some(default) = default {
                return Ok(default);
            }
            continue;
        }
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= options.len() => return Ok(n - 1),
            _ => println!("Please enter a number between 1 and {}.", options.len()),
        }
    }
}

/// Read one line from stdin; `None` means end of input.
fn read_line() -> Result<Option<String>, PromptError> {
    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    Ok((bytes > 0).then_some(line))
}
