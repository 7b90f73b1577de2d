//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the workflow / Gerrit client to do the work
//! 3. Formats and displays output
//!
//! Network commands are async because they involve HTTP I/O; each handler
//! builds a tokio runtime and `block_on`s its async body so `main` stays
//! synchronous.

mod checkout;
mod comment;
mod completion;
mod list;
mod review;
mod show;

pub use checkout::checkout;
pub use comment::comment;
pub use completion::completion;
pub use list::list;
pub use review::review;
pub use show::show;

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List {
            query,
            limit,
            owner,
            project,
            format,
        } => list::list(
            ctx,
            &query,
            limit,
            owner.as_deref(),
            project.as_deref(),
            format,
        ),
        Command::Show {
            change,
            parts,
            format,
        } => show::show(ctx, &change, parts.as_deref(), format),
        Command::Checkout {
            change,
            branch,
            force,
            no_checkout,
            stash,
            no_stash,
            assume_match,
        } => checkout::checkout(
            ctx,
            &change,
            branch.as_deref(),
            force,
            no_checkout,
            stash,
            no_stash,
            assume_match,
        ),
        Command::Review {
            change,
            message,
            file,
            code_review,
            verified,
            inline_comment,
        } => review::review(
            ctx,
            &change,
            message.as_deref(),
            file.as_deref(),
            code_review.as_deref(),
            verified.as_deref(),
            &inline_comment,
        ),
        Command::Comment {
            change,
            message,
            file,
        } => comment::comment(ctx, &change, message.as_deref(), file.as_deref()),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Resolve a message from `-m` or `-f`, preferring the inline message.
pub(crate) fn message_from_args(
    message: Option<&str>,
    file: Option<&Path>,
) -> Result<Option<String>> {
    if let Some(message) = message {
        return Ok(Some(message.to_string()));
    }
    match file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read message file '{}'", path.display()))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}
