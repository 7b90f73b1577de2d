//! show command - Display change details

use anyhow::{anyhow, Result};

use crate::cli::args::OutputFormat;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::ChangeIdentifier;
use crate::gerrit::{options, Gerrit, GerritRest};
use crate::ui::format::{self, ShowParts};
use crate::ui::output;

/// Show a change's details, fetching only the data the selected parts need.
pub fn show(ctx: &Context, change: &str, parts: Option<&str>, format: OutputFormat) -> Result<()> {
    let id = ChangeIdentifier::parse(change)?;
    let parts = match parts {
        Some(spec) => ShowParts::parse(spec).map_err(|e| anyhow!(e))?,
        None => ShowParts::default(),
    };

    let config = Config::load()?;
    let server = config.server()?;
    let gerrit = GerritRest::new(&server);
    output::debug(format!("fetching change {}", id), ctx.verbosity());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(show_async(&gerrit, &id, parts, format))
}

async fn show_async(
    gerrit: &GerritRest,
    id: &ChangeIdentifier,
    parts: ShowParts,
    format: OutputFormat,
) -> Result<()> {
    let change = gerrit
        .get_change(
            id,
            &[
                options::CURRENT_REVISION,
                options::MESSAGES,
                options::DETAILED_LABELS,
                options::DETAILED_ACCOUNTS,
            ],
        )
        .await?;

    let files = if parts.files {
        Some(gerrit.get_change_files(id).await?)
    } else {
        None
    };
    let comments = if parts.comments {
        Some(gerrit.get_change_comments(id).await?)
    } else {
        None
    };

    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                format::change_detail(&change, files.as_ref(), comments.as_ref(), parts)
            );
        }
        OutputFormat::Json => {
            let mut body = serde_json::Map::new();
            body.insert("change".to_string(), serde_json::to_value(&change)?);
            if let Some(files) = &files {
                body.insert("files".to_string(), serde_json::to_value(files)?);
            }
            if let Some(comments) = &comments {
                body.insert("comments".to_string(), serde_json::to_value(comments)?);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(body))?
            );
        }
    }
    Ok(())
}
