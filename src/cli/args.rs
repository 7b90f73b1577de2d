//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// gerrit - a command-line client for Gerrit code review
#[derive(Parser, Debug)]
#[command(name = "gerrit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gerrit was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(long = "interactive", global = true, conflicts_with = "no_interactive")]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set AND stdin is a TTY
    pub fn interactive(&self) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Output format for data-producing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Machine-readable JSON
    Json,
}

/// Supported completion shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List changes matching a query
    #[command(
        name = "list",
        long_about = "List changes matching a Gerrit search query.\n\n\
            Without arguments this shows open changes. Filters compose: the query, \
            --owner, and --project are joined into one search expression.",
        after_help = "\
EXAMPLES:
    # Open changes (the default query)
    gerrit list

    # Merged changes you own
    gerrit list -q \"status:merged\" --owner me

    # Open changes on one project, as JSON
    gerrit list --project foo/bar --format json"
    )]
    List {
        /// Query conditions
        #[arg(long, default_value = "status:open")]
        query: String,

        /// Limit number of results
        #[arg(short = 'n', long, default_value_t = 25)]
        limit: u32,

        /// Filter by owner (use 'me' for yourself)
        #[arg(short, long)]
        owner: Option<String>,

        /// Filter by project
        #[arg(short, long)]
        project: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show details of one change
    #[command(
        name = "show",
        long_about = "Show details of a change.\n\n\
            The default view is metadata + files + messages, which stays fast. \
            Select other sections with --parts. CHANGE can be a numeric id, a \
            Change-Id, or a project~branch~Change-Id triplet.",
        after_help = "\
EXAMPLES:
    # Default view
    gerrit show 12345

    # Everything, including inline comments
    gerrit show 12345 --parts all

    # Just the metadata, short aliases
    gerrit show 12345 --parts m

AVAILABLE PARTS:
    metadata (m)   - subject, owner, status, labels
    files (f)      - changed files with statistics
    messages (msg) - review message history
    comments (c)   - inline comments
    all            - everything above

To read the actual diff, check the change out locally:
    gerrit checkout 12345"
    )]
    Show {
        /// Change to show
        change: String,

        /// Comma-separated parts to display (default: m,f,msg)
        #[arg(long)]
        parts: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Fetch a change into a local review branch
    #[command(
        name = "checkout",
        long_about = "Fetch a change from Gerrit and create a local branch for review.\n\n\
            Safety checks run before anything is touched: the current directory must \
            be a git repository, the change must resolve on the server, and the \
            'origin' remote is compared against the change's project. A dirty \
            working tree is stashed, aborted on, or overridden according to \
            --stash/--no-stash (interactive runs ask).",
        after_help = "\
EXAMPLES:
    # Fetch change 12345 into branch review/12345 and switch to it
    gerrit checkout 12345

    # Pick the branch name
    gerrit checkout 12345 -b my-review-branch

    # Recreate the branch if it already exists
    gerrit checkout 12345 --force

    # Fetch only; keep the current branch checked out
    gerrit checkout 12345 --no-checkout

    # Non-interactive use: pin the dirty-tree policy
    gerrit checkout 12345 --stash

AFTERWARDS:
    git log -1 --stat          # what you fetched
    git stash pop              # restore stashed changes (if any)
    git checkout -             # go back to the previous branch"
    )]
    Checkout {
        /// Change to check out
        change: String,

        /// Local branch name (default: review/<change-number>)
        #[arg(short, long)]
        branch: Option<String>,

        /// Delete and recreate the branch if it exists
        #[arg(long)]
        force: bool,

        /// Only fetch and create the branch, do not switch to it
        #[arg(long)]
        no_checkout: bool,

        /// Stash uncommitted changes without asking
        #[arg(long, conflicts_with = "no_stash")]
        stash: bool,

        /// Proceed without stashing (uncommitted changes may be overwritten)
        #[arg(long)]
        no_stash: bool,

        /// Proceed even if the 'origin' remote does not match the change's project
        #[arg(long)]
        assume_match: bool,
    },

    /// Send a review (scores and comments)
    #[command(
        name = "review",
        long_about = "Send a review on the current patch set: label scores, an \
            overall message, and inline comments.\n\n\
            Inline comment locations are 'file#line', 'file#start-end' for a line \
            range, or 'file#LnCm-LnCm' for a character-precise range.",
        after_help = "\
EXAMPLES:
    gerrit review 12345 --code-review +2 -m \"LGTM\"
    gerrit review 12345 --code-review -1 -m \"Needs work\"
    gerrit review 12345 -f review.txt --verified +1
    gerrit review 12345 --inline-comment src/main.rs#10 \"Fix typo\"
    gerrit review 12345 --inline-comment src/main.rs#10-20 \"Refactor this block\"
    gerrit review 12345 --inline-comment src/main.rs#L12C4-L12C19 \"Wrong operator\""
    )]
    Review {
        /// Change to review
        change: String,

        /// Review message
        #[arg(short, long)]
        message: Option<String>,

        /// Read the review message from a file
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,

        /// Code-Review score
        #[arg(
            long,
            allow_hyphen_values = true,
            value_parser = ["-2", "-1", "0", "+1", "+2"]
        )]
        code_review: Option<String>,

        /// Verified score
        #[arg(
            long,
            allow_hyphen_values = true,
            value_parser = ["-1", "0", "+1"]
        )]
        verified: Option<String>,

        /// Inline comment: <file#location> <message> (repeatable)
        #[arg(
            long = "inline-comment",
            num_args = 2,
            value_names = ["FILE#LOCATION", "MESSAGE"],
            action = clap::ArgAction::Append
        )]
        inline_comment: Vec<String>,
    },

    /// Add a comment to a change
    #[command(
        name = "comment",
        after_help = "\
EXAMPLES:
    gerrit comment 12345 -m \"Thanks, taking a look\"
    gerrit comment 12345 -f comment.txt"
    )]
    Comment {
        /// Change to comment on
        change: String,

        /// Comment message
        #[arg(short, long)]
        message: Option<String>,

        /// Read the comment from a file
        #[arg(short = 'f', long = "file")]
        file: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn checkout_flags_parse() {
        let cli = Cli::try_parse_from([
            "gerrit", "checkout", "12345", "-b", "mine", "--force", "--no-checkout", "--stash",
        ])
        .unwrap();
        match cli.command {
            Command::Checkout {
                change,
                branch,
                force,
                no_checkout,
                stash,
                no_stash,
                assume_match,
            } => {
                assert_eq!(change, "12345");
                assert_eq!(branch.as_deref(), Some("mine"));
                assert!(force && no_checkout && stash);
                assert!(!no_stash && !assume_match);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn stash_flags_conflict() {
        assert!(
            Cli::try_parse_from(["gerrit", "checkout", "1", "--stash", "--no-stash"]).is_err()
        );
    }

    #[test]
    fn review_scores_accept_signed_values() {
        let cli = Cli::try_parse_from([
            "gerrit",
            "review",
            "12345",
            "--code-review=-1",
            "--verified",
            "+1",
        ])
        .unwrap();
        match cli.command {
            Command::Review {
                code_review,
                verified,
                ..
            } => {
                assert_eq!(code_review.as_deref(), Some("-1"));
                assert_eq!(verified.as_deref(), Some("+1"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn inline_comments_collect_in_pairs() {
        let cli = Cli::try_parse_from([
            "gerrit",
            "review",
            "1",
            "--inline-comment",
            "src/main.rs#10",
            "Fix typo",
            "--inline-comment",
            "src/lib.rs#3-5",
            "Simplify",
        ])
        .unwrap();
        match cli.command {
            Command::Review { inline_comment, .. } => {
                assert_eq!(inline_comment.len(), 4);
                assert_eq!(inline_comment[0], "src/main.rs#10");
                assert_eq!(inline_comment[3], "Simplify");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn quiet_disables_interactive() {
        let cli = Cli::try_parse_from(["gerrit", "-q", "list"]).unwrap();
        assert!(!cli.interactive());
    }

    #[test]
    fn explicit_interactive_flag_wins() {
        let cli = Cli::try_parse_from(["gerrit", "--interactive", "list"]).unwrap();
        assert!(cli.interactive());
    }
}
