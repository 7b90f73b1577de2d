//! checkout command - Fetch a change into a local review branch
//!
//! # Design
//!
//! This handler is thin: it resolves all policy up front (the dirty-tree
//! policy from `--stash`/`--no-stash`, interactivity from the global flags)
//! and hands a fully-specified request to the
//! [`CheckoutOrchestrator`](crate::workflow::CheckoutOrchestrator). The
//! ordered safety checks live there, not here.

use anyhow::Result;

use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::{BranchName, ChangeIdentifier};
use crate::gerrit::GerritRest;
use crate::ui::output;
use crate::workflow::{CheckoutOrchestrator, CheckoutRequest, WorktreePolicy, REVIEW_REMOTE};

/// Check out a change.
#[allow(clippy::too_many_arguments)]
pub fn checkout(
    ctx: &Context,
    change: &str,
    branch: Option<&str>,
    force: bool,
    no_checkout: bool,
    stash: bool,
    no_stash: bool,
    assume_match: bool,
) -> Result<()> {
    let identifier = ChangeIdentifier::parse(change)?;
    let branch = branch.map(BranchName::new).transpose()?;
    let policy = if stash {
        WorktreePolicy::Stash
    } else if no_stash {
        WorktreePolicy::Force
    } else {
        WorktreePolicy::Prompt
    };

    let config = Config::load()?;
    let server = config.server()?;
    let gerrit = GerritRest::new(&server);

    let request = CheckoutRequest {
        identifier,
        branch,
        force,
        fetch_only: no_checkout,
        policy,
        assume_match,
        interactive: ctx.interactive,
    };
    let orchestrator = CheckoutOrchestrator::new(&gerrit, ctx.work_dir()?, ctx.verbosity());

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(orchestrator.run(&request))?;

    let v = ctx.verbosity();
    output::success(
        format!(
            "\nFetched {} into branch '{}'",
            outcome.ref_fetched, outcome.branch
        ),
        v,
    );
    if outcome.checked_out {
        output::print(format!("Current branch: {}", outcome.branch), v);
    } else {
        output::print(
            format!("Run 'git checkout {}' to switch to it", outcome.branch),
            v,
        );
    }
    if outcome.stashed {
        output::print(
            "Your previous changes are stashed; run 'git stash pop' to restore them",
            v,
        );
    }
    output::debug(format!("fetched via remote '{}'", REVIEW_REMOTE), v);
    Ok(())
}
