//! gerrit::mock
//!
//! Mock Gerrit implementation for deterministic testing.
//!
//! # Design
//!
//! Stores changes in memory, records every operation for later
//! verification, and can be configured to fail a specific method. The
//! checkout workflow tests lean on the operation log to prove ordering
//! properties (e.g. "a non-repository never triggers a metadata lookup").

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::types::ChangeIdentifier;

use super::models::{ChangeInfo, CommentInfo, FileInfo, ReviewInput, ReviewResult};
use super::traits::{Gerrit, GerritError};

/// Mock Gerrit server for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockGerrit {
    inner: Arc<Mutex<MockGerritInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockGerritInner {
    changes: Vec<ChangeInfo>,
    files: BTreeMap<u64, BTreeMap<String, FileInfo>>,
    comments: BTreeMap<u64, BTreeMap<String, Vec<CommentInfo>>>,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail `get_change` with the given error.
    GetChange(GerritError),
    /// Fail `query_changes` with the given error.
    QueryChanges(GerritError),
    /// Fail `get_change_files` with the given error.
    GetChangeFiles(GerritError),
    /// Fail `get_change_comments` with the given error.
    GetChangeComments(GerritError),
    /// Fail `set_review` with the given error.
    SetReview(GerritError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    GetChange {
        id: String,
    },
    QueryChanges {
        query: String,
        limit: u32,
    },
    GetChangeFiles {
        id: String,
    },
    GetChangeComments {
        id: String,
    },
    SetReview {
        id: String,
        revision: String,
        review: ReviewInput,
    },
}

impl MockGerrit {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock pre-loaded with one change.
    pub fn with_change(change: ChangeInfo) -> Self {
        let mock = Self::new();
        mock.add_change(change);
        mock
    }

    /// Add a change to the store.
    pub fn add_change(&self, change: ChangeInfo) {
        self.lock().changes.push(change);
    }

    /// Attach a file listing to a change number.
    pub fn add_files(&self, number: u64, files: BTreeMap<String, FileInfo>) {
        self.lock().files.insert(number, files);
    }

    /// Attach inline comments to a change number.
    pub fn add_comments(&self, number: u64, comments: BTreeMap<String, Vec<CommentInfo>>) {
        self.lock().comments.insert(number, comments);
    }

    /// Configure one method to fail.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        self.lock().fail_on = Some(fail_on);
    }

    /// Everything the mock was asked to do, in order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// A plausible change for tests: current patch set wired through the
    /// revisions map the way the live server reports it.
    pub fn sample_change(number: u64, project: &str, branch: &str, patch_set: u32) -> ChangeInfo {
        let revision = format!("{:040x}", number);
        let revisions = std::collections::HashMap::from([(
            revision.clone(),
            super::models::RevisionInfo {
                number: patch_set,
                ref_name: None,
            },
        )]);
        ChangeInfo {
            id: format!("{}~{}~I{:040x}", project.replace('/', "%2F"), branch, number),
            project: project.to_string(),
            branch: branch.to_string(),
            change_id: format!("I{:040x}", number),
            subject: format!("Change {}", number),
            status: "NEW".to_string(),
            created: Some("2024-01-10 09:00:00.000000000".to_string()),
            updated: Some("2024-01-15 10:30:00.000000000".to_string()),
            insertions: 10,
            deletions: 2,
            number,
            owner: Some(super::models::AccountInfo {
                account_id: Some(1000),
                name: Some("J. Doe".to_string()),
                email: Some("jdoe@example.com".to_string()),
                username: Some("jdoe".to_string()),
            }),
            current_revision: Some(revision),
            revisions: Some(revisions),
            messages: None,
            labels: None,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockGerritInner> {
        self.inner.lock().expect("mock gerrit lock poisoned")
    }

    fn find_change(inner: &MockGerritInner, id: &ChangeIdentifier) -> Option<ChangeInfo> {
        let raw = id.as_str();
        inner
            .changes
            .iter()
            .find(|c| match id {
                ChangeIdentifier::Number(n) => c.number == *n,
                ChangeIdentifier::ChangeId(_) => c.change_id == raw,
                ChangeIdentifier::Path(_) => c.id == raw,
            })
            .cloned()
    }
}

#[async_trait]
impl Gerrit for MockGerrit {
    async fn get_change(
        &self,
        id: &ChangeIdentifier,
        _options: &[&str],
    ) -> Result<ChangeInfo, GerritError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::GetChange {
            id: id.as_str().to_string(),
        });
        if let Some(FailOn::GetChange(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Self::find_change(&inner, id)
            .ok_or_else(|| GerritError::NotFound(format!("change {}", id)))
    }

    async fn query_changes(
        &self,
        query: &str,
        limit: u32,
        _options: &[&str],
    ) -> Result<Vec<ChangeInfo>, GerritError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::QueryChanges {
            query: query.to_string(),
            limit,
        });
        if let Some(FailOn::QueryChanges(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.changes.iter().take(limit as usize).cloned().collect())
    }

    async fn get_change_files(
        &self,
        id: &ChangeIdentifier,
    ) -> Result<BTreeMap<String, FileInfo>, GerritError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::GetChangeFiles {
            id: id.as_str().to_string(),
        });
        if let Some(FailOn::GetChangeFiles(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let change = Self::find_change(&inner, id)
            .ok_or_else(|| GerritError::NotFound(format!("change {}", id)))?;
        Ok(inner.files.get(&change.number).cloned().unwrap_or_default())
    }

    async fn get_change_comments(
        &self,
        id: &ChangeIdentifier,
    ) -> Result<BTreeMap<String, Vec<CommentInfo>>, GerritError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::GetChangeComments {
            id: id.as_str().to_string(),
        });
        if let Some(FailOn::GetChangeComments(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let change = Self::find_change(&inner, id)
            .ok_or_else(|| GerritError::NotFound(format!("change {}", id)))?;
        Ok(inner
            .comments
            .get(&change.number)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_review(
        &self,
        id: &ChangeIdentifier,
        revision: &str,
        review: ReviewInput,
    ) -> Result<ReviewResult, GerritError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::SetReview {
            id: id.as_str().to_string(),
            revision: revision.to_string(),
            review: review.clone(),
        });
        if let Some(FailOn::SetReview(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        if Self::find_change(&inner, id).is_none() {
            return Err(GerritError::NotFound(format!("change {}", id)));
        }
        Ok(ReviewResult {
            labels: review.labels,
        })
    }
}
