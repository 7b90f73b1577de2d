//! list command - Query changes

use anyhow::Result;

use crate::cli::args::OutputFormat;
use crate::cli::Context;
use crate::core::config::Config;
use crate::gerrit::{options, Gerrit, GerritRest};
use crate::ui::{format, output};

/// List changes matching a query.
///
/// The base query, `--owner`, and `--project` filters are joined into one
/// Gerrit search expression. `--owner me` expands to the configured
/// username.
pub fn list(
    ctx: &Context,
    query: &str,
    limit: u32,
    owner: Option<&str>,
    project: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let config = Config::load()?;
    let server = config.server()?;

    let mut query_parts = vec![query.to_string()];
    if let Some(owner) = owner {
        let owner = if owner == "me" {
            server.username.as_str()
        } else {
            owner
        };
        query_parts.push(format!("owner:{}", owner));
    }
    if let Some(project) = project {
        query_parts.push(format!("project:{}", project));
    }
    let query = query_parts.join(" ");
    output::debug(format!("query: {}", query), ctx.verbosity());

    let gerrit = GerritRest::new(&server);
    let rt = tokio::runtime::Runtime::new()?;
    let changes = rt.block_on(gerrit.query_changes(
        &query,
        limit,
        &[
            options::CURRENT_REVISION,
            options::LABELS,
            options::DETAILED_ACCOUNTS,
        ],
    ))?;

    match format {
        OutputFormat::Table => println!("{}", format::changes_table(&changes)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
    }
    Ok(())
}
