//! workflow::project
//!
//! Remote-URL / project-name match heuristic.
//!
//! # Design
//!
//! Answers "does this `origin` remote plausibly point at the change's
//! project?" before fetching into the wrong repository. It is a heuristic,
//! not a proof: both sides are normalized (protocol, host, `.git` suffix,
//! surrounding slashes stripped) and the project name must appear as a path
//! suffix of the remote URL.
//!
//! False negatives are expected (forks, mirrors, and URL rewrites all
//! defeat suffix matching), so callers treat a mismatch as a warning the
//! user can override, never as a hard gate.

/// Decide whether a remote URL plausibly refers to the named project.
///
/// Tolerates `ssh://host:port/path`, `http(s)://host/path`, and scp-like
/// `host:path` remote forms.
///
/// # Example
///
/// ```ignore
/// assert!(remote_matches_project(
///     "ssh://gerrit.example.com:29418/foo/bar.git",
///     "foo/bar",
/// ));
/// ```
pub fn remote_matches_project(remote_url: &str, project: &str) -> bool {
    let path = normalize_remote_path(remote_url);
    let project = normalize_path(project);
    if path.is_empty() || project.is_empty() {
        return false;
    }
    path == project || path.ends_with(&format!("/{}", project))
}

/// Extract and normalize the path portion of a remote URL.
fn normalize_remote_path(remote_url: &str) -> String {
    let url = remote_url.trim();

    // Scheme'd URL: strip scheme, then authority (user@host:port).
    for scheme in ["ssh://", "https://", "http://", "git://", "ftp://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            let path = match rest.find('/') {
                Some(idx) => &rest[idx + 1..],
                None => "",
            };
            return normalize_path(path);
        }
    }

    // scp-like form: user@host:path
    if let Some(idx) = url.find(':') {
        // A colon before any slash separates host from path; otherwise the
        // whole string is a local path.
        let before = &url[..idx];
        if !before.contains('/') {
            return normalize_path(&url[idx + 1..]);
        }
    }

    normalize_path(url)
}

/// Strip `.git`, surrounding slashes, and whitespace from a path.
fn normalize_path(path: &str) -> String {
    let path = path.trim().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    path.trim_matches('/').to_string()
}
