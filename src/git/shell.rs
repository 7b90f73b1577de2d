//! git::shell
//!
//! Thin synchronous wrapper around the `git` binary.
//!
//! # Design
//!
//! `GitShell` is the single doorway to git in this crate: every git
//! invocation flows through [`GitShell::run`], which reports a nonzero exit
//! code through [`GitOutput::success`] rather than an error. Only
//! environment-level failures (binary missing, cannot spawn the process)
//! surface as [`GitError::Unavailable`]: those are not actionable by
//! workflow logic and must abort immediately instead of being read as
//! "operation failed".
//!
//! The working directory is an explicit constructor parameter, never the
//! ambient process cwd, so callers (and tests) control exactly which
//! repository is touched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from invoking git itself.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be invoked at all.
    #[error("git could not be invoked: {message}")]
    Unavailable {
        /// Description of the spawn failure.
        message: String,
    },
}

/// Result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Whether git exited with status 0.
    pub success: bool,
    /// Combined stdout and stderr, trimmed.
    pub text: String,
}

/// Runner for git subcommands against a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitShell {
    work_dir: PathBuf,
}

impl GitShell {
    /// Create a shell that runs git inside `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// The directory git commands run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run one git subcommand.
    ///
    /// A nonzero exit code is not an error: it comes back as
    /// `success == false` with the combined output available for
    /// diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Unavailable`] if the process cannot be spawned
    /// (git not installed, permission denied).
    pub fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| {
                let message = match e.kind() {
                    ErrorKind::NotFound => "git binary not found on PATH".to_string(),
                    ErrorKind::PermissionDenied => "permission denied running git".to_string(),
                    _ => e.to_string(),
                };
                GitError::Unavailable { message }
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }

        Ok(GitOutput {
            success: output.status.success(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn version_succeeds_anywhere() {
        let dir = TempDir::new().unwrap();
        let shell = GitShell::new(dir.path());
        let out = shell.run(&["--version"]).unwrap();
        assert!(out.success);
        assert!(out.text.contains("git version"));
    }

    #[test]
    fn failed_command_reports_through_flag() {
        let dir = TempDir::new().unwrap();
        let shell = GitShell::new(dir.path());
        let out = shell.run(&["rev-parse", "--git-dir"]).unwrap();
        assert!(!out.success);
        assert!(!out.text.is_empty());
    }

    #[test]
    fn stderr_is_captured_in_text() {
        let dir = TempDir::new().unwrap();
        let shell = GitShell::new(dir.path());
        let out = shell.run(&["status"]).unwrap();
        assert!(!out.success);
        // git prints "fatal: not a git repository ..." to stderr
        assert!(out.text.contains("not a git repository"));
    }
}
