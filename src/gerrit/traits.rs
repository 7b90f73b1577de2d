//! gerrit::traits
//!
//! The metadata-collaborator trait for talking to a Gerrit server.
//!
//! # Design
//!
//! The `Gerrit` trait is async because its operations involve network I/O.
//! The checkout workflow consumes it as an opaque collaborator: resolving an
//! identifier to change metadata is the only thing the workflow needs, and
//! it must be able to tell "no such change" apart from "the server call
//! failed". Retries, if any, belong behind this trait; the workflow never
//! retries.
//!
//! # Example
//!
//! ```ignore
//! use gerrit_cli::core::types::ChangeIdentifier;
//! use gerrit_cli::gerrit::{Gerrit, GerritError};
//!
//! async fn lookup(gerrit: &dyn Gerrit) -> Result<(), GerritError> {
//!     let id = ChangeIdentifier::parse("12345").unwrap();
//!     let change = gerrit.get_change(&id, &["CURRENT_REVISION"]).await?;
//!     println!("{} on {}", change.subject, change.branch);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::ChangeIdentifier;

use super::models::{ChangeInfo, CommentInfo, FileInfo, ReviewInput, ReviewResult};

/// Errors from Gerrit API operations.
///
/// `NotFound` is deliberately distinct from the transport/auth variants:
/// callers react differently to "the change does not exist" than to "the
/// server could not be asked".
#[derive(Debug, Clone, Error)]
pub enum GerritError {
    /// Authentication failed (bad credentials, expired token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The server answered with something this client cannot parse.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GerritError {
    /// Whether this error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GerritError::NotFound(_))
    }
}

/// Query options recognized by `/changes/` endpoints.
///
/// Kept as plain strings at the trait boundary; these constants name the
/// ones this tool requests.
pub mod options {
    pub const CURRENT_REVISION: &str = "CURRENT_REVISION";
    pub const DETAILED_ACCOUNTS: &str = "DETAILED_ACCOUNTS";
    pub const DETAILED_LABELS: &str = "DETAILED_LABELS";
    pub const LABELS: &str = "LABELS";
    pub const MESSAGES: &str = "MESSAGES";
}

/// The Gerrit server interface.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single client can serve the
/// whole command invocation.
#[async_trait]
pub trait Gerrit: Send + Sync {
    /// Fetch one change by identifier.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no change matches the identifier
    /// - `AuthFailed` / `NetworkError` / `ApiError` for server trouble
    async fn get_change(
        &self,
        id: &ChangeIdentifier,
        options: &[&str],
    ) -> Result<ChangeInfo, GerritError>;

    /// Query changes matching a Gerrit search expression.
    async fn query_changes(
        &self,
        query: &str,
        limit: u32,
        options: &[&str],
    ) -> Result<Vec<ChangeInfo>, GerritError>;

    /// Files touched by the current revision of a change.
    async fn get_change_files(
        &self,
        id: &ChangeIdentifier,
    ) -> Result<BTreeMap<String, FileInfo>, GerritError>;

    /// All inline comments on a change, keyed by file path.
    async fn get_change_comments(
        &self,
        id: &ChangeIdentifier,
    ) -> Result<BTreeMap<String, Vec<CommentInfo>>, GerritError>;

    /// Post a review (scores, message, inline comments) on a revision.
    ///
    /// Use `"current"` as the revision to target the latest patch set.
    async fn set_review(
        &self,
        id: &ChangeIdentifier,
        revision: &str,
        review: ReviewInput,
    ) -> Result<ReviewResult, GerritError>;
}
