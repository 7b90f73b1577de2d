//! review command - Send label scores, a message, and inline comments

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, Result};

use super::message_from_args;
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::types::ChangeIdentifier;
use crate::gerrit::{CommentInput, CommentRange, Gerrit, GerritRest, ReviewInput};
use crate::ui::output;

/// Send a review on the current patch set.
pub fn review(
    ctx: &Context,
    change: &str,
    message: Option<&str>,
    file: Option<&Path>,
    code_review: Option<&str>,
    verified: Option<&str>,
    inline_comment: &[String],
) -> Result<()> {
    let id = ChangeIdentifier::parse(change)?;
    let message = message_from_args(message, file)?;

    let mut labels = BTreeMap::new();
    if let Some(score) = code_review {
        labels.insert("Code-Review".to_string(), parse_score(score)?);
    }
    if let Some(score) = verified {
        labels.insert("Verified".to_string(), parse_score(score)?);
    }

    let comments = parse_inline_comments(inline_comment)?;

    let review = ReviewInput {
        message,
        labels: (!labels.is_empty()).then_some(labels),
        comments: (!comments.is_empty()).then_some(comments),
    };
    if review.is_empty() {
        bail!(
            "nothing to send: provide a message (-m or -f), a score \
             (--code-review or --verified), or --inline-comment"
        );
    }

    let config = Config::load()?;
    let server = config.server()?;
    let gerrit = GerritRest::new(&server);

    let rt = tokio::runtime::Runtime::new()?;
    let message_preview = review.message.clone();
    let result = rt.block_on(gerrit.set_review(&id, "current", review))?;

    let v = ctx.verbosity();
    output::success(format!("Review sent to change {}", id), v);
    if let Some(labels) = &result.labels {
        let rendered = labels
            .iter()
            .map(|(name, value)| format!("{}: {:+}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        output::print(format!("  Labels: {}", rendered), v);
    }
    if let Some(message) = message_preview {
        output::print(format!("  Message: {}", preview(&message)), v);
    }
    Ok(())
}

/// Parse a `+2`/`-1`-style score into its numeric value.
fn parse_score(score: &str) -> Result<i32> {
    score
        .trim_start_matches('+')
        .parse()
        .map_err(|_| anyhow!("invalid score '{}'", score))
}

/// Parse repeated `--inline-comment FILE#LOCATION MESSAGE` pairs.
fn parse_inline_comments(args: &[String]) -> Result<BTreeMap<String, Vec<CommentInput>>> {
    let mut comments: BTreeMap<String, Vec<CommentInput>> = BTreeMap::new();
    for pair in args.chunks(2) {
        let [location_spec, message] = pair else {
            bail!("--inline-comment needs a location and a message");
        };
        let Some((file, location)) = location_spec.rsplit_once('#') else {
            bail!(
                "invalid inline comment location '{}': expected 'file#location'",
                location_spec
            );
        };
        let (line, range) = parse_location(location)?;
        comments.entry(file.to_string()).or_default().push(CommentInput {
            line: Some(line),
            range,
            message: message.clone(),
        });
    }
    Ok(comments)
}

/// Parse a comment location: a line, a `start-end` line range, or an
/// `LnCm-LnCm` character range.
fn parse_location(location: &str) -> Result<(u32, Option<CommentRange>)> {
    if let Some(range) = parse_char_range(location) {
        return Ok((range.end_line, Some(range)));
    }
    if let Some((start, end)) = location.split_once('-') {
        let parse = |s: &str| -> Result<u32> {
            s.parse().map_err(|_| {
                anyhow!(
                    "invalid location '{}': expected 'line', 'start-end', or 'LnCm-LnCm'",
                    location
                )
            })
        };
        let (start, end) = (parse(start)?, parse(end)?);
        let range = CommentRange {
            start_line: start,
            start_character: 0,
            end_line: end,
            end_character: 10000,
        };
        return Ok((end, Some(range)));
    }
    let line = location
        .parse()
        .map_err(|_| anyhow!("invalid line number '{}'", location))?;
    Ok((line, None))
}

/// Parse `LnCm-LnCm` (case-insensitive), e.g. `L12C4-L12C19`.
fn parse_char_range(location: &str) -> Option<CommentRange> {
    let (start, end) = location.split_once('-')?;
    let (start_line, start_character) = parse_line_char(start)?;
    let (end_line, end_character) = parse_line_char(end)?;
    Some(CommentRange {
        start_line,
        start_character,
        end_line,
        end_character,
    })
}

fn parse_line_char(spec: &str) -> Option<(u32, u32)> {
    let rest = spec.strip_prefix(['L', 'l'])?;
    let (line, character) = rest.split_once(['C', 'c'])?;
    Some((line.parse().ok()?, character.parse().ok()?))
}

fn preview(message: &str) -> String {
    const LIMIT: usize = 100;
    let first = message.lines().next().unwrap_or("");
    if first.chars().count() > LIMIT {
        format!("{}...", first.chars().take(LIMIT).collect::<String>())
    } else if message.lines().count() > 1 {
        format!("{}...", first)
    } else {
        first.to_string()
    }
}
