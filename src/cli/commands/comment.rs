//! comment command - Add a plain comment to a change

use std::path::Path;

use anyhow::{bail, Result};

use super::message_from_args;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::ChangeIdentifier;
use crate::gerrit::{Gerrit, GerritRest, ReviewInput};
use crate::ui::output;

/// Add a comment to a change.
pub fn comment(ctx: &Context, change: &str, message: Option<&str>, file: Option<&Path>) -> Result<()> {
    let id = ChangeIdentifier::parse(change)?;
    let Some(message) = message_from_args(message, file)? else {
        bail!("provide a comment with -m or -f");
    };

    let config = Config::load()?;
    let server = config.server()?;
    let gerrit = GerritRest::new(&server);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(gerrit.set_review(&id, "current", ReviewInput::message_only(message)))?;

    output::success(format!("Comment added to change {}", id), ctx.verbosity());
    Ok(())
}
