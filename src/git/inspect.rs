//! git::inspect
//!
//! Read-only repository queries built on [`GitShell`].
//!
//! # Design
//!
//! Every method is a side-effect-free read derived fresh from the live
//! repository; nothing is cached between calls. "Not a repository" and
//! "remote not configured" are ordinary answers, not errors. Only a git
//! binary that cannot be invoked propagates as [`GitError`].

use std::fmt;
use std::path::PathBuf;

use super::shell::{GitError, GitShell};

/// Working tree cleanliness, derived from `git status --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorktreeState {
    /// No staged, unstaged, or untracked changes.
    Clean,
    /// Uncommitted changes present.
    Dirty(DirtySummary),
}

impl WorktreeState {
    /// Whether the tree is clean.
    pub fn is_clean(&self) -> bool {
        matches!(self, WorktreeState::Clean)
    }
}

/// Counts of uncommitted changes, for user-facing warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySummary {
    /// Entries staged in the index.
    pub staged: usize,
    /// Tracked files modified or deleted in the working tree.
    pub unstaged: usize,
    /// Untracked files.
    pub untracked: usize,
}

impl fmt::Display for DirtySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.staged > 0 {
            parts.push(format!("{} staged", self.staged));
        }
        if self.unstaged > 0 {
            parts.push(format!("{} unstaged", self.unstaged));
        }
        if self.untracked > 0 {
            parts.push(format!("{} untracked", self.untracked));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Read-only inspector over one repository.
#[derive(Debug, Clone)]
pub struct RepositoryInspector {
    shell: GitShell,
}

impl RepositoryInspector {
    /// Create an inspector sharing the given shell's working directory.
    pub fn new(shell: GitShell) -> Self {
        Self { shell }
    }

    /// Whether the shell's working directory is inside a git work tree.
    pub fn is_git_repository(&self) -> Result<bool, GitError> {
        Ok(self.shell.run(&["rev-parse", "--git-dir"])?.success)
    }

    /// Absolute path of the repository root, if inside one.
    pub fn repo_root(&self) -> Result<Option<PathBuf>, GitError> {
        let out = self.shell.run(&["rev-parse", "--show-toplevel"])?;
        Ok(out.success.then(|| PathBuf::from(out.text)))
    }

    /// Whether the named remote is configured.
    pub fn remote_exists(&self, name: &str) -> Result<bool, GitError> {
        let out = self.shell.run(&["remote"])?;
        Ok(out.success && out.text.lines().any(|line| line.trim() == name))
    }

    /// URL of the named remote, or `None` if it is not configured.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        let out = self.shell.run(&["remote", "get-url", name])?;
        Ok(out.success.then(|| out.text))
    }

    /// URL of the `origin` remote.
    pub fn origin_remote_url(&self) -> Result<Option<String>, GitError> {
        self.remote_url("origin")
    }

    /// Fresh working-tree state from `git status --porcelain`.
    ///
    /// A status invocation that itself fails (e.g. not a repository) is
    /// conservatively reported as dirty; callers gate on
    /// [`is_git_repository`](Self::is_git_repository) first.
    pub fn worktree_state(&self) -> Result<WorktreeState, GitError> {
        let out = self.shell.run(&["status", "--porcelain"])?;
        if !out.success {
            return Ok(WorktreeState::Dirty(DirtySummary::default()));
        }
        if out.text.is_empty() {
            return Ok(WorktreeState::Clean);
        }

        let mut summary = DirtySummary::default();
        for line in out.text.lines() {
            let mut chars = line.chars();
            let index_status = chars.next().unwrap_or(' ');
            let tree_status = chars.next().unwrap_or(' ');
            if line.starts_with("??") {
                summary.untracked += 1;
                continue;
            }
            if "MADRC".contains(index_status) {
                summary.staged += 1;
            }
            if "MD".contains(tree_status) {
                summary.unstaged += 1;
            }
        }
        Ok(WorktreeState::Dirty(summary))
    }

    /// Whether a local branch with this name exists.
    pub fn branch_exists(&self, name: &str) -> Result<bool, GitError> {
        let refname = format!("refs/heads/{}", name);
        Ok(self
            .shell
            .run(&["rev-parse", "--verify", "--quiet", &refname])?
            .success)
    }

    /// Name of the current branch, or `None` on a detached HEAD.
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        let out = self.shell.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok((out.success && out.text != "HEAD").then(|| out.text))
    }
}
