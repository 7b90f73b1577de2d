//! Integration tests for the checkout workflow.
//!
//! These tests run the orchestrator against real git repositories: a
//! tempdir working repo whose `origin` is a local bare repository carrying
//! `refs/changes/*` refs, so fetches work without any network. The Gerrit
//! side is always `MockGerrit`.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use gerrit_cli::core::types::{BranchName, ChangeIdentifier};
use gerrit_cli::gerrit::mock::MockGerrit;
use gerrit_cli::gerrit::GerritError;
use gerrit_cli::ui::output::Verbosity;
use gerrit_cli::workflow::{
    CheckoutError, CheckoutOrchestrator, CheckoutRequest, WorktreePolicy,
};

// =============================================================================
// Test Fixtures
// =============================================================================

/// A working repository whose `origin` is a local bare repo laid out so the
/// project-match heuristic sees project `foo/bar`.
struct TestRepo {
    _upstream_root: TempDir,
    work: TempDir,
    upstream_path: PathBuf,
}

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

impl TestRepo {
    fn new() -> Self {
        let upstream_root = TempDir::new().expect("failed to create upstream dir");
        let upstream_path = upstream_root.path().join("foo").join("bar.git");
        std::fs::create_dir_all(&upstream_path).unwrap();
        run_git(&upstream_path, &["init", "--bare"]);

        let work = TempDir::new().expect("failed to create work dir");
        run_git(work.path(), &["init", "-b", "main"]);
        run_git(work.path(), &["config", "user.email", "test@example.com"]);
        run_git(work.path(), &["config", "user.name", "Test User"]);
        std::fs::write(work.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(work.path(), &["add", "README.md"]);
        run_git(work.path(), &["commit", "-m", "Initial commit"]);
        run_git(
            work.path(),
            &["remote", "add", "origin", upstream_path.to_str().unwrap()],
        );

        Self {
            _upstream_root: upstream_root,
            work,
            upstream_path,
        }
    }

    fn path(&self) -> &Path {
        self.work.path()
    }

    /// Publish the given content as a patch-set ref on the upstream and
    /// return the commit id. The working branch is left where it was.
    fn publish_patch_set(&self, change: u64, patch_set: u32, file: &str) -> String {
        std::fs::write(self.path().join(file), format!("patch set {}\n", patch_set)).unwrap();
        run_git(self.path(), &["add", file]);
        run_git(
            self.path(),
            &["commit", "-m", &format!("Change {} patch set {}", change, patch_set)],
        );
        let commit = run_git(self.path(), &["rev-parse", "HEAD"]);
        let refspec = format!(
            "HEAD:refs/changes/{:02}/{}/{}",
            change % 100,
            change,
            patch_set
        );
        run_git(self.path(), &["push", "origin", &refspec]);
        run_git(self.path(), &["reset", "--hard", "HEAD~1"]);
        commit
    }

    fn current_branch(&self) -> String {
        run_git(self.path(), &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn head_of(&self, branch: &str) -> String {
        run_git(self.path(), &["rev-parse", &format!("refs/heads/{}", branch)])
    }

    fn branch_exists(&self, branch: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)])
            .current_dir(self.path())
            .status()
            .unwrap()
            .success()
    }

    fn stash_count(&self) -> usize {
        let out = run_git(self.path(), &["stash", "list"]);
        if out.is_empty() {
            0
        } else {
            out.lines().count()
        }
    }
}

fn request(identifier: &str) -> CheckoutRequest {
    CheckoutRequest {
        identifier: ChangeIdentifier::parse(identifier).unwrap(),
        branch: None,
        force: false,
        fetch_only: false,
        policy: WorktreePolicy::Prompt,
        assume_match: false,
        interactive: false,
    }
}

fn orchestrator<'a>(gerrit: &'a MockGerrit, repo: &TestRepo) -> CheckoutOrchestrator<'a> {
    CheckoutOrchestrator::new(gerrit, repo.path(), Verbosity::Quiet)
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[tokio::test]
async fn clean_tree_checkout_creates_review_branch() {
    let repo = TestRepo::new();
    let commit = repo.publish_patch_set(12345, 2, "feature.txt");
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let outcome = orchestrator(&gerrit, &repo)
        .run(&request("12345"))
        .await
        .unwrap();

    assert_eq!(outcome.branch.as_str(), "review/12345");
    assert_eq!(outcome.ref_fetched, "refs/changes/45/12345/2");
    assert!(!outcome.stashed);
    assert!(outcome.checked_out);

    assert_eq!(repo.current_branch(), "review/12345");
    assert_eq!(repo.head_of("review/12345"), commit);
}

#[tokio::test]
async fn branch_override_is_used() {
    let repo = TestRepo::new();
    repo.publish_patch_set(7, 1, "seven.txt");
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(7, "foo/bar", "main", 1));

    let mut req = request("7");
    req.branch = Some(BranchName::new("my-review").unwrap());
    let outcome = orchestrator(&gerrit, &repo).run(&req).await.unwrap();

    assert_eq!(outcome.branch.as_str(), "my-review");
    assert_eq!(outcome.ref_fetched, "refs/changes/07/7/1");
    assert_eq!(repo.current_branch(), "my-review");
}

#[tokio::test]
async fn fetch_only_creates_branch_without_switching() {
    let repo = TestRepo::new();
    let commit = repo.publish_patch_set(12345, 2, "feature.txt");
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let mut req = request("12345");
    req.fetch_only = true;
    let outcome = orchestrator(&gerrit, &repo).run(&req).await.unwrap();

    assert!(!outcome.checked_out);
    assert_eq!(repo.current_branch(), "main");
    assert_eq!(repo.head_of("review/12345"), commit);
}

#[tokio::test]
async fn change_id_identifier_resolves_and_checks_out() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    let sample = MockGerrit::sample_change(12345, "foo/bar", "main", 2);
    let change_id = sample.change_id.clone();
    let gerrit = MockGerrit::with_change(sample);

    let outcome = orchestrator(&gerrit, &repo)
        .run(&request(&change_id))
        .await
        .unwrap();
    assert_eq!(outcome.branch.as_str(), "review/12345");
}

// =============================================================================
// Branch collision handling
// =============================================================================

#[tokio::test]
async fn existing_branch_without_force_fails_untouched() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    run_git(repo.path(), &["branch", "review/12345"]);
    let original = repo.head_of("review/12345");
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let err = orchestrator(&gerrit, &repo)
        .run(&request("12345"))
        .await
        .unwrap_err();

    match &err {
        CheckoutError::BranchExists { branch, stashed } => {
            assert_eq!(branch.as_str(), "review/12345");
            assert!(!stashed);
        }
        other => panic!("expected BranchExists, got {other:?}"),
    }
    // The existing branch was not deleted or repointed.
    assert_eq!(repo.head_of("review/12345"), original);
    assert_eq!(repo.current_branch(), "main");
}

#[tokio::test]
async fn existing_branch_with_force_is_recreated() {
    let repo = TestRepo::new();
    let commit = repo.publish_patch_set(12345, 2, "feature.txt");
    run_git(repo.path(), &["branch", "review/12345"]);
    let original = repo.head_of("review/12345");
    assert_ne!(original, commit);
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let mut req = request("12345");
    req.force = true;
    let outcome = orchestrator(&gerrit, &repo).run(&req).await.unwrap();

    assert_eq!(outcome.branch.as_str(), "review/12345");
    assert_eq!(repo.head_of("review/12345"), commit);
}

#[tokio::test]
async fn force_refuses_to_recreate_current_branch() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    run_git(repo.path(), &["checkout", "-b", "review/12345"]);
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let mut req = request("12345");
    req.force = true;
    let err = orchestrator(&gerrit, &repo).run(&req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::BranchUpdateFailed { .. }));
    assert_eq!(repo.current_branch(), "review/12345");
}

// =============================================================================
// Dirty worktree handling
// =============================================================================

#[tokio::test]
async fn dirty_tree_with_stash_policy_stashes_then_checks_out() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    std::fs::write(repo.path().join("wip.txt"), "work in progress\n").unwrap();
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let mut req = request("12345");
    req.policy = WorktreePolicy::Stash;
    let outcome = orchestrator(&gerrit, &repo).run(&req).await.unwrap();

    assert!(outcome.stashed);
    assert_eq!(repo.stash_count(), 1);
    assert_eq!(repo.current_branch(), "review/12345");
    assert!(!repo.path().join("wip.txt").exists());
}

#[tokio::test]
async fn fetch_failure_after_stash_reports_the_stash() {
    let repo = TestRepo::new();
    // No patch-set ref is published for this change: the fetch will fail.
    std::fs::write(repo.path().join("wip.txt"), "work in progress\n").unwrap();
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(99901, "foo/bar", "main", 1));

    let mut req = request("99901");
    req.policy = WorktreePolicy::Stash;
    let err = orchestrator(&gerrit, &repo).run(&req).await.unwrap_err();

    match &err {
        CheckoutError::FetchFailed { stashed, .. } => assert!(stashed),
        other => panic!("expected FetchFailed, got {other:?}"),
    }
    assert!(err.stashed());
    assert!(err.to_string().contains("git stash pop"));
    // The stash exists and is not popped automatically.
    assert_eq!(repo.stash_count(), 1);
}

#[tokio::test]
async fn dirty_tree_with_cancel_policy_leaves_everything_alone() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    std::fs::write(repo.path().join("wip.txt"), "work in progress\n").unwrap();
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let mut req = request("12345");
    req.policy = WorktreePolicy::Cancel;
    let err = orchestrator(&gerrit, &repo).run(&req).await.unwrap_err();

    assert!(matches!(err, CheckoutError::CancelledByUser));
    assert_eq!(repo.stash_count(), 0);
    assert!(!repo.branch_exists("review/12345"));
    assert!(repo.path().join("wip.txt").exists());
    assert_eq!(repo.current_branch(), "main");
}

#[tokio::test]
async fn dirty_tree_with_force_policy_proceeds_unstashed() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    std::fs::write(repo.path().join("wip.txt"), "work in progress\n").unwrap();
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));

    let mut req = request("12345");
    req.policy = WorktreePolicy::Force;
    let outcome = orchestrator(&gerrit, &repo).run(&req).await.unwrap();

    assert!(!outcome.stashed);
    assert_eq!(repo.stash_count(), 0);
    // Untracked files survive the branch switch.
    assert!(repo.path().join("wip.txt").exists());
}

// =============================================================================
// Project verification
// =============================================================================

#[tokio::test]
async fn project_mismatch_fails_closed_when_not_interactive() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    let gerrit =
        MockGerrit::with_change(MockGerrit::sample_change(12345, "other/project", "main", 2));

    let err = orchestrator(&gerrit, &repo)
        .run(&request("12345"))
        .await
        .unwrap_err();

    match &err {
        CheckoutError::RemoteMismatch {
            project,
            remote_url,
        } => {
            assert_eq!(project, "other/project");
            assert!(remote_url.is_some());
        }
        other => panic!("expected RemoteMismatch, got {other:?}"),
    }
    // Mismatch is detected before any mutation.
    assert_eq!(repo.stash_count(), 0);
    assert!(!repo.branch_exists("review/12345"));
}

#[tokio::test]
async fn assume_match_overrides_project_mismatch() {
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    let gerrit =
        MockGerrit::with_change(MockGerrit::sample_change(12345, "other/project", "main", 2));

    let mut req = request("12345");
    req.assume_match = true;
    let outcome = orchestrator(&gerrit, &repo).run(&req).await.unwrap();
    assert_eq!(outcome.branch.as_str(), "review/12345");
}

// =============================================================================
// Metadata failures
// =============================================================================

#[tokio::test]
async fn metadata_without_revision_data_is_unusable() {
    let repo = TestRepo::new();
    let mut change = MockGerrit::sample_change(12345, "foo/bar", "main", 2);
    change.current_revision = None;
    change.revisions = None;
    let gerrit = MockGerrit::with_change(change);

    let err = orchestrator(&gerrit, &repo)
        .run(&request("12345"))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::MetadataUnavailable { .. }));
}

#[tokio::test]
async fn auth_failure_propagates_as_metadata_unavailable() {
    let repo = TestRepo::new();
    let gerrit = MockGerrit::new();
    gerrit.set_fail_on(gerrit_cli::gerrit::mock::FailOn::GetChange(
        GerritError::AuthFailed("invalid username or password".into()),
    ));

    let err = orchestrator(&gerrit, &repo)
        .run(&request("12345"))
        .await
        .unwrap_err();
    match err {
        CheckoutError::MetadataUnavailable { source, .. } => {
            assert!(matches!(source, GerritError::AuthFailed(_)));
        }
        other => panic!("expected MetadataUnavailable, got {other:?}"),
    }
}

// =============================================================================
// Ordering guarantees
// =============================================================================

#[tokio::test]
async fn worktree_is_not_inspected_before_project_verification_passes() {
    // With a mismatching project and a dirty tree, the mismatch failure
    // must win: policy handling only runs after verification.
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("wip.txt"), "x\n").unwrap();
    let gerrit =
        MockGerrit::with_change(MockGerrit::sample_change(12345, "other/project", "main", 2));

    let mut req = request("12345");
    req.policy = WorktreePolicy::Stash;
    let err = orchestrator(&gerrit, &repo).run(&req).await.unwrap_err();
    assert!(matches!(err, CheckoutError::RemoteMismatch { .. }));
    assert_eq!(repo.stash_count(), 0);
}

#[tokio::test]
async fn second_invocation_starts_fresh() {
    // A failed run leaves no state behind that breaks a retry by the
    // caller: the orchestrator re-inspects everything.
    let repo = TestRepo::new();
    repo.publish_patch_set(12345, 2, "feature.txt");
    let gerrit = MockGerrit::with_change(MockGerrit::sample_change(12345, "foo/bar", "main", 2));
    let orch = orchestrator(&gerrit, &repo);

    run_git(repo.path(), &["branch", "review/12345"]);
    let err = orch.run(&request("12345")).await.unwrap_err();
    assert!(matches!(err, CheckoutError::BranchExists { .. }));

    run_git(repo.path(), &["branch", "-D", "review/12345"]);
    let outcome = orch.run(&request("12345")).await.unwrap();
    assert_eq!(outcome.branch.as_str(), "review/12345");
}
