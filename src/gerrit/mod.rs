//! gerrit
//!
//! Abstraction over the Gerrit REST API.
//!
//! # Architecture
//!
//! The [`Gerrit`] trait is the only doorway to the review server. Commands
//! and the checkout workflow consume `&dyn Gerrit`, so tests can substitute
//! [`mock::MockGerrit`] without touching the network.
//!
//! # Modules
//!
//! - `traits`: the [`Gerrit`] trait and [`GerritError`] taxonomy
//! - [`models`]: serde models for the API's JSON
//! - [`rest`]: production client over reqwest
//! - [`mock`]: deterministic in-memory implementation for tests

pub mod mock;
pub mod models;
pub mod rest;
mod traits;

pub use models::{
    AccountInfo, ChangeInfo, CommentInfo, CommentInput, CommentRange, FileInfo, LabelInfo,
    MessageInfo, ReviewInput, ReviewResult, RevisionInfo,
};
pub use rest::GerritRest;
pub use traits::{options, Gerrit, GerritError};
