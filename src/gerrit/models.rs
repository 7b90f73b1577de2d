//! gerrit::models
//!
//! Serde models for the Gerrit REST API.
//!
//! # Design
//!
//! Gerrit's JSON uses a handful of underscore-prefixed fields (`_number`,
//! `_account_id`) which are mapped via serde renames. Response models derive
//! `Serialize` too so `--format json` can re-emit them verbatim. Unknown
//! fields are ignored: the API returns far more than this tool consumes.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A Gerrit account reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountInfo {
    /// Numeric account id (`_account_id`).
    #[serde(rename = "_account_id", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AccountInfo {
    /// Best human-readable name available.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("Unknown")
    }
}

/// One revision (patch set) of a change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevisionInfo {
    /// Patch-set number (`_number`).
    #[serde(rename = "_number")]
    pub number: u32,
    /// Fetch ref for this patch set, when the server includes it.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
}

/// Change metadata as returned by `/changes/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeInfo {
    /// Server-assigned triplet id (`project~branch~Change-Id`).
    pub id: String,
    pub project: String,
    pub branch: String,
    pub change_id: String,
    pub subject: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub insertions: i64,
    #[serde(default)]
    pub deletions: i64,
    /// Numeric change number (`_number`).
    #[serde(rename = "_number")]
    pub number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<AccountInfo>,
    /// Commit id of the current patch set (requires `CURRENT_REVISION`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_revision: Option<String>,
    /// Revision map keyed by commit id (requires `CURRENT_REVISION` /
    /// `ALL_REVISIONS`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revisions: Option<HashMap<String, RevisionInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<MessageInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, LabelInfo>>,
}

impl ChangeInfo {
    /// Patch-set number of the current revision, if revision data is
    /// present.
    pub fn current_patch_set(&self) -> Option<u32> {
        let current = self.current_revision.as_deref()?;
        Some(self.revisions.as_ref()?.get(current)?.number)
    }

    /// Display id: the numeric change number.
    pub fn display_id(&self) -> String {
        self.number.to_string()
    }
}

/// Aggregate label state on a change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<AccountInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<AccountInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended: Option<AccountInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disliked: Option<AccountInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
}

/// One entry in a change's message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AccountInfo>,
    pub date: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Per-file statistics for a revision.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    /// Change type: `M`odified, `A`dded, `D`eleted, ... (absent means `M`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_inserted: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_deleted: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_delta: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// An inline comment as returned by `/changes/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_set: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AccountInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
}

/// Character-precise range for an inline comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRange {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

/// An inline comment to attach to a review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<CommentRange>,
    pub message: String,
}

/// Body of `POST /changes/{id}/revisions/{revision}/review`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<BTreeMap<String, Vec<CommentInput>>>,
}

impl ReviewInput {
    /// A review carrying only a message.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Whether the review carries nothing to send.
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.labels.as_ref().map_or(true, BTreeMap::is_empty)
            && self.comments.as_ref().map_or(true, BTreeMap::is_empty)
    }
}

/// Server response to a review submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReviewResult {
    /// Labels the server applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, i32>>,
}
