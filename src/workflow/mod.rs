//! workflow
//!
//! The checkout workflow: fetch a change from the review server into a
//! local branch without corrupting the working tree or fetching into the
//! wrong repository.
//!
//! # State machine
//!
//! One invocation walks a linear sequence with branch points:
//!
//! ```text
//! VALIDATE_REPO -> RESOLVE_CHANGE -> VERIFY_PROJECT -> HANDLE_WORKTREE
//!     -> COMPUTE_REF -> FETCH -> CREATE_OR_RESET_BRANCH -> CHECKOUT -> DONE
//! ```
//!
//! The order is load-bearing: nothing mutates the working tree until the
//! repository exists, the change resolved, and the project match was
//! acknowledged. The first mutation is the stash (or the fetch, on a clean
//! tree); from that point on, every failure reports whether a stash was
//! created so no work is silently lost. Nothing is retried here, and a
//! stash is never popped automatically: recovery stays in the user's
//! hands.
//!
//! # Modules
//!
//! - [`refspec`] - patch-set ref computation
//! - [`project`] - remote-URL / project-name match heuristic

pub mod project;
pub mod refspec;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{BranchName, ChangeIdentifier};
use crate::gerrit::models::ChangeInfo;
use crate::gerrit::{options, Gerrit, GerritError};
use crate::git::{GitError, GitShell, RepositoryInspector, WorktreeState};
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts::{self, PromptError};

pub use refspec::{change_ref, RefSpecError};

/// The remote changes are fetched from.
pub const REVIEW_REMOTE: &str = "origin";

/// Message tag on stashes this tool creates.
const STASH_MESSAGE: &str = "gerrit-cli: auto stash before fetch";

/// What to do with uncommitted changes in a dirty working tree.
///
/// `Prompt` resolves interactively to one of the other three; in a
/// non-interactive run it fails closed as
/// [`CheckoutError::AmbiguousWorktreePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorktreePolicy {
    /// Stash uncommitted changes before fetching.
    Stash,
    /// Abort without touching anything.
    Cancel,
    /// Proceed without stashing; changes may be overwritten.
    Force,
    /// Ask the user at runtime.
    Prompt,
}

/// Inputs to one checkout invocation.
///
/// All policy is resolved up front from CLI flags; the state machine only
/// blocks on the terminal where `policy` is [`WorktreePolicy::Prompt`] or a
/// project mismatch needs acknowledgement, and then only when
/// `interactive` is true.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Which change to fetch.
    pub identifier: ChangeIdentifier,
    /// Local branch name override; defaults to `review/<number>`.
    pub branch: Option<BranchName>,
    /// Delete and recreate the branch if it already exists.
    pub force: bool,
    /// Fetch and create the branch but skip the final checkout.
    pub fetch_only: bool,
    /// Dirty-worktree policy.
    pub policy: WorktreePolicy,
    /// Proceed past a remote/project mismatch without asking.
    pub assume_match: bool,
    /// Whether prompts may be shown at all.
    pub interactive: bool,
}

/// Successful result of a checkout invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// The branch that now points at the fetched patch set.
    pub branch: BranchName,
    /// The exact ref that was fetched.
    pub ref_fetched: String,
    /// Whether uncommitted changes were stashed along the way.
    pub stashed: bool,
    /// Whether the working tree was switched to the branch.
    pub checked_out: bool,
}

/// Terminal failures of the checkout workflow.
///
/// Variants reachable after the stash point carry `stashed` and mention the
/// stash in their rendered message, so a failure never hides that the
/// user's changes moved.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("not a git repository: {}", .path.display())]
    NotAGitRepository { path: PathBuf },

    #[error("change not found: {identifier}")]
    ChangeNotFound { identifier: String },

    #[error("could not resolve change {identifier}")]
    MetadataUnavailable {
        identifier: String,
        #[source]
        source: GerritError,
    },

    #[error("{}", mismatch_message(.project, .remote_url.as_deref()))]
    RemoteMismatch {
        project: String,
        remote_url: Option<String>,
    },

    #[error("operation cancelled")]
    CancelledByUser,

    #[error(
        "working tree has uncommitted changes and no stash policy was given; \
         pass --stash or --no-stash, or run interactively"
    )]
    AmbiguousWorktreePolicy,

    #[error("stash failed: {detail}")]
    StashFailed { detail: String },

    #[error("fetch failed: {detail}{}", stash_note(.stashed))]
    FetchFailed { detail: String, stashed: bool },

    #[error("branch '{branch}' already exists (use --force to recreate it, or -b for another name){}", stash_note(.stashed))]
    BranchExists { branch: BranchName, stashed: bool },

    #[error("could not update branch '{branch}': {detail}{}", stash_note(.stashed))]
    BranchUpdateFailed {
        branch: BranchName,
        detail: String,
        stashed: bool,
    },

    #[error("checkout of '{branch}' failed: {detail}{}", stash_note(.stashed))]
    CheckoutFailed {
        branch: BranchName,
        detail: String,
        stashed: bool,
    },

    #[error(transparent)]
    GitUnavailable(#[from] GitError),

    #[error(transparent)]
    InvalidChangeNumber(#[from] RefSpecError),
}

impl CheckoutError {
    /// Whether a stash was created before this failure.
    pub fn stashed(&self) -> bool {
        matches!(
            self,
            CheckoutError::FetchFailed { stashed: true, .. }
                | CheckoutError::BranchExists { stashed: true, .. }
                | CheckoutError::BranchUpdateFailed { stashed: true, .. }
                | CheckoutError::CheckoutFailed { stashed: true, .. }
        )
    }
}

fn stash_note(stashed: &bool) -> &'static str {
    if *stashed {
        "; your uncommitted changes are stashed, run 'git stash pop' to restore them"
    } else {
        ""
    }
}

fn mismatch_message(project: &str, remote_url: Option<&str>) -> String {
    match remote_url {
        Some(url) => format!(
            "remote '{}' ({}) does not look like project '{}'",
            REVIEW_REMOTE, url, project
        ),
        None => format!(
            "no '{}' remote configured (change belongs to project '{}')",
            REVIEW_REMOTE, project
        ),
    }
}

/// The checkout state machine.
///
/// Owns the git doorway for one repository and borrows the metadata
/// collaborator. Carries no state between invocations: every run starts
/// from a freshly inspected repository.
pub struct CheckoutOrchestrator<'a> {
    gerrit: &'a dyn Gerrit,
    shell: GitShell,
    inspector: RepositoryInspector,
    verbosity: Verbosity,
}

impl<'a> CheckoutOrchestrator<'a> {
    /// Create an orchestrator for the repository at `work_dir`.
    pub fn new(gerrit: &'a dyn Gerrit, work_dir: impl Into<PathBuf>, verbosity: Verbosity) -> Self {
        let shell = GitShell::new(work_dir);
        let inspector = RepositoryInspector::new(shell.clone());
        Self {
            gerrit,
            shell,
            inspector,
            verbosity,
        }
    }

    /// Run the full checkout workflow for one request.
    pub async fn run(&self, request: &CheckoutRequest) -> Result<CheckoutOutcome, CheckoutError> {
        let v = self.verbosity;

        // VALIDATE_REPO
        if !self.inspector.is_git_repository()? {
            return Err(CheckoutError::NotAGitRepository {
                path: self.shell.work_dir().to_path_buf(),
            });
        }
        if let Some(root) = self.inspector.repo_root()? {
            output::debug(format!("repository root: {}", root.display()), v);
        }

        // RESOLVE_CHANGE
        output::print(format!("Resolving change {}...", request.identifier), v);
        let change = self
            .gerrit
            .get_change(
                &request.identifier,
                &[options::CURRENT_REVISION, options::DETAILED_ACCOUNTS],
            )
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CheckoutError::ChangeNotFound {
                        identifier: request.identifier.to_string(),
                    }
                } else {
                    CheckoutError::MetadataUnavailable {
                        identifier: request.identifier.to_string(),
                        source: e,
                    }
                }
            })?;
        let patch_set = change.current_patch_set().ok_or_else(|| {
            CheckoutError::MetadataUnavailable {
                identifier: request.identifier.to_string(),
                source: GerritError::InvalidResponse(
                    "change has no current revision data".to_string(),
                ),
            }
        })?;
        self.describe_change(&change, patch_set);

        // VERIFY_PROJECT
        self.verify_project(&change, request)?;

        // HANDLE_WORKTREE
        let stashed = self.handle_worktree(request)?;

        // COMPUTE_REF
        let ref_fetched = refspec::change_ref(change.number, patch_set)?;

        // FETCH
        output::print(
            format!("Fetching {} from {}...", ref_fetched, REVIEW_REMOTE),
            v,
        );
        let fetch = self.shell.run(&["fetch", REVIEW_REMOTE, &ref_fetched])?;
        if !fetch.success {
            return Err(CheckoutError::FetchFailed {
                detail: fetch.text,
                stashed,
            });
        }

        // CREATE_OR_RESET_BRANCH
        let branch = match &request.branch {
            Some(branch) => branch.clone(),
            None => BranchName::for_review(change.number),
        };
        if self.inspector.branch_exists(branch.as_str())? {
            if !request.force {
                return Err(CheckoutError::BranchExists { branch, stashed });
            }
            if self.inspector.current_branch()?.as_deref() == Some(branch.as_str()) {
                return Err(CheckoutError::BranchUpdateFailed {
                    branch,
                    detail: "cannot recreate the currently checked out branch; switch away first"
                        .to_string(),
                    stashed,
                });
            }
            output::warn(format!("branch '{}' exists, recreating it", branch), v);
            let delete = self.shell.run(&["branch", "-D", branch.as_str()])?;
            if !delete.success {
                return Err(CheckoutError::BranchUpdateFailed {
                    branch,
                    detail: delete.text,
                    stashed,
                });
            }
        }
        let create = self.shell.run(&["branch", branch.as_str(), "FETCH_HEAD"])?;
        if !create.success {
            return Err(CheckoutError::BranchUpdateFailed {
                branch,
                detail: create.text,
                stashed,
            });
        }

        // CHECKOUT
        let mut checked_out = false;
        if request.fetch_only {
            output::print(
                format!("Branch '{}' created; checkout skipped", branch),
                v,
            );
        } else {
            let checkout = self.shell.run(&["checkout", branch.as_str()])?;
            if !checkout.success {
                return Err(CheckoutError::CheckoutFailed {
                    branch,
                    detail: checkout.text,
                    stashed,
                });
            }
            checked_out = true;
        }

        Ok(CheckoutOutcome {
            branch,
            ref_fetched,
            stashed,
            checked_out,
        })
    }

    fn describe_change(&self, change: &ChangeInfo, patch_set: u32) {
        let v = self.verbosity;
        output::print(format!("Change:    {}", change.subject), v);
        output::print(format!("Project:   {}", change.project), v);
        output::print(format!("Branch:    {}", change.branch), v);
        if let Some(owner) = &change.owner {
            output::print(format!("Owner:     {}", owner.display_name()), v);
        }
        output::print(format!("Patch set: {}", patch_set), v);
    }

    /// VERIFY_PROJECT: surface a missing remote or a mismatching one.
    ///
    /// The heuristic has known false negatives (forks, mirrors), so a
    /// mismatch is never silently fatal: the user can confirm, or pass
    /// `--assume-match` in non-interactive runs.
    fn verify_project(
        &self,
        change: &ChangeInfo,
        request: &CheckoutRequest,
    ) -> Result<(), CheckoutError> {
        let v = self.verbosity;
        let remote_url = self.inspector.origin_remote_url()?;

        match &remote_url {
            None => {
                output::warn(
                    format!(
                        "no '{}' remote configured; the fetch will likely fail",
                        REVIEW_REMOTE
                    ),
                    v,
                );
            }
            Some(url) => {
                output::debug(format!("{} remote: {}", REVIEW_REMOTE, url), v);
                if project::remote_matches_project(url, &change.project) {
                    return Ok(());
                }
                output::warn(
                    format!(
                        "remote URL does not look like project '{}'\n  \
                         change project: {}\n  remote URL:     {}\n\
                         you may be running this in the wrong repository",
                        change.project, change.project, url
                    ),
                    v,
                );
            }
        }

        if request.assume_match {
            output::warn("continuing anyway (--assume-match)", v);
            return Ok(());
        }

        match prompts::confirm("Continue with fetch anyway?", false, request.interactive) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CheckoutError::CancelledByUser),
            Err(PromptError::NotInteractive) => Err(CheckoutError::RemoteMismatch {
                project: change.project.clone(),
                remote_url,
            }),
            Err(_) => Err(CheckoutError::CancelledByUser),
        }
    }

    /// HANDLE_WORKTREE: decide what happens to uncommitted changes.
    ///
    /// Returns whether a stash was created, the one fact later failure
    /// paths must keep reporting.
    fn handle_worktree(&self, request: &CheckoutRequest) -> Result<bool, CheckoutError> {
        let v = self.verbosity;
        let state = self.inspector.worktree_state()?;
        let WorktreeState::Dirty(summary) = state else {
            return Ok(false);
        };

        output::warn(
            format!("uncommitted changes in working tree: {}", summary),
            v,
        );

        let policy = match request.policy {
            WorktreePolicy::Prompt => self.prompt_policy(request)?,
            policy => policy,
        };

        match policy {
            WorktreePolicy::Stash => {
                output::print("Stashing current changes...", v);
                let stash = self.shell.run(&[
                    "stash",
                    "push",
                    "--include-untracked",
                    "-m",
                    STASH_MESSAGE,
                ])?;
                if !stash.success {
                    return Err(CheckoutError::StashFailed { detail: stash.text });
                }
                output::print("Stashed; use 'git stash pop' to restore afterwards", v);
                Ok(true)
            }
            WorktreePolicy::Cancel => Err(CheckoutError::CancelledByUser),
            WorktreePolicy::Force => {
                output::warn("continuing with a dirty tree; changes may be overwritten", v);
                Ok(false)
            }
            WorktreePolicy::Prompt => Err(CheckoutError::AmbiguousWorktreePolicy),
        }
    }

    /// Resolve [`WorktreePolicy::Prompt`] to a concrete policy.
    fn prompt_policy(&self, request: &CheckoutRequest) -> Result<WorktreePolicy, CheckoutError> {
        let choices = [
            "Stash changes (recommended)",
            "Cancel operation",
            "Continue without stashing (changes may be overwritten)",
        ];
        match prompts::select(
            "How should uncommitted changes be handled?",
            &choices,
            Some(0),
            request.interactive,
        ) {
            Ok(0) => Ok(WorktreePolicy::Stash),
            Ok(1) => Ok(WorktreePolicy::Cancel),
            Ok(_) => Ok(WorktreePolicy::Force),
            Err(PromptError::NotInteractive) => Err(CheckoutError::AmbiguousWorktreePolicy),
            Err(_) => Err(CheckoutError::CancelledByUser),
        }
    }
}
