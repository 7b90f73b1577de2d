//! git
//!
//! Git subprocess layer.
//!
//! # Architecture
//!
//! This crate orchestrates git, it does not reimplement it. All git
//! interaction flows through two types:
//!
//! - [`GitShell`] - runs one git subcommand, reporting exit status and
//!   combined output
//! - [`RepositoryInspector`] - read-only repository queries built on the
//!   shell
//!
//! No other module spawns git directly. Mutating invocations (stash, fetch,
//! branch, checkout) are issued by the workflow layer through [`GitShell`]
//! so the ordering guarantees live in one place.

pub mod inspect;
pub mod shell;

pub use inspect::{DirtySummary, RepositoryInspector, WorktreeState};
pub use shell::{GitError, GitOutput, GitShell};
