//! core::types
//!
//! Strongly-typed domain primitives.
//!
//! # Types
//!
//! - [`ChangeIdentifier`] - User-supplied change reference, parsed once
//! - [`BranchName`] - Validated Git branch name
//!
//! # Design
//!
//! Both types validate at construction so the rest of the crate can trust
//! them. A `ChangeIdentifier` classifies the raw string into the three forms
//! Gerrit accepts in `/changes/{id}` but keeps the original text for the
//! request path.
//!
//! # Example
//!
//! ```ignore
//! use gerrit_cli::core::types::ChangeIdentifier;
//!
//! let id = ChangeIdentifier::parse("12345")?;
//! assert_eq!(id.change_number(), Some(12345));
//! ```

use std::fmt;

use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Change identifier is empty or malformed.
    #[error("invalid change identifier: {0}")]
    InvalidChangeIdentifier(String),

    /// Branch name violates Git refname rules.
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),
}

/// A user-supplied reference to a change.
///
/// Gerrit accepts three identifier forms:
/// - a positive integer change number (`12345`)
/// - a Change-Id (`I` followed by 40 hex characters)
/// - a server-relative path fragment (`myproject~main~I...`)
///
/// The identifier is parsed once, when the request enters the CLI, and the
/// classified form travels with the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeIdentifier {
    /// Numeric change number.
    Number(u64),
    /// Stable Change-Id (`I` + 40 hex chars).
    ChangeId(String),
    /// Server-relative path fragment (e.g. `project~branch~Ideadbeef...`).
    Path(String),
}

impl ChangeIdentifier {
    /// Parse a raw identifier string.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidChangeIdentifier` if the string is empty
    /// or contains whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TypeError::InvalidChangeIdentifier(
                "identifier cannot be empty".into(),
            ));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidChangeIdentifier(format!(
                "identifier cannot contain whitespace: '{}'",
                raw
            )));
        }

        if raw.chars().all(|c| c.is_ascii_digit()) {
            let number: u64 = raw.parse().map_err(|_| {
                TypeError::InvalidChangeIdentifier(format!("change number out of range: '{}'", raw))
            })?;
            return Ok(ChangeIdentifier::Number(number));
        }

        if is_change_id(raw) {
            return Ok(ChangeIdentifier::ChangeId(raw.to_string()));
        }

        Ok(ChangeIdentifier::Path(raw.to_string()))
    }

    /// The string to place in a `/changes/{id}` request path.
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        match self {
            ChangeIdentifier::Number(n) => std::borrow::Cow::Owned(n.to_string()),
            ChangeIdentifier::ChangeId(s) | ChangeIdentifier::Path(s) => {
                std::borrow::Cow::Borrowed(s)
            }
        }
    }

    /// The numeric change number, if this identifier is one.
    pub fn change_number(&self) -> Option<u64> {
        match self {
            ChangeIdentifier::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check whether a string is a Change-Id: `I` followed by 40 hex characters.
fn is_change_id(s: &str) -> bool {
    if !s.starts_with('I') {
        return false;
    }
    let rest = &s[1..];
    rest.len() == 40 && rest.chars().all(|c| c.is_ascii_hexdigit())
}

/// A validated Git branch name.
///
/// # Example
///
/// ```ignore
/// use gerrit_cli::core::types::BranchName;
///
/// let name = BranchName::new("review/12345").unwrap();
/// assert_eq!(name.as_str(), "review/12345");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("bad..name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's
    /// refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Validate a branch name against Git's refname rules.
    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }
        if name == "@" {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be '@' (reserved)".into(),
            ));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '.' or '-'".into(),
            ));
        }
        if name.ends_with(".lock") || name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock' or '/'".into(),
            ));
        }
        for forbidden in ["..", "@{", "//"] {
            if name.contains(forbidden) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{}'",
                    forbidden
                )));
            }
        }
        if name.chars().any(|c| {
            c.is_ascii_control() || matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\')
        }) {
            return Err(TypeError::InvalidBranchName(
                "branch name contains forbidden characters".into(),
            ));
        }
        Ok(())
    }

    /// Default review branch for a change number (`review/<number>`).
    ///
    /// Infallible: digits after a fixed prefix always form a valid refname.
    pub fn for_review(change_number: u64) -> Self {
        Self(format!("review/{}", change_number))
    }

    /// Borrow the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
