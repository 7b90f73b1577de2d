//! gerrit-cli - a command-line client for Gerrit code review
//!
//! Query, inspect, review, and locally check out Gerrit changes from the
//! terminal. The heart of the crate is the checkout workflow: fetching a
//! patch set into a local review branch behind a sequence of safety checks,
//! so a change is never pulled into the wrong repository and uncommitted
//! work is never silently lost.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to handlers)
//! - [`workflow`] - The checkout state machine and its pure helpers
//! - [`gerrit`] - Abstraction over the Gerrit REST API
//! - [`git`] - Single doorway to git subprocess invocations
//! - [`core`] - Domain types and configuration
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! The checkout workflow maintains the following invariants:
//!
//! 1. The working tree is never mutated before every precondition check
//!    (repository exists, change resolves, project match acknowledged) has
//!    passed
//! 2. Once a stash has been created, every failure path reports it
//! 3. Nothing is retried automatically and no stash is popped automatically;
//!    recovery is always explicit

pub mod cli;
pub mod core;
pub mod gerrit;
pub mod git;
pub mod ui;
pub mod workflow;
