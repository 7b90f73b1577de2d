//! workflow::refspec
//!
//! Patch-set ref computation.
//!
//! Gerrit exposes every patch set under a fixed ref layout:
//!
//! ```text
//! refs/changes/<NN>/<change-number>/<patch-set>
//! ```
//!
//! where `<NN>` is the change number modulo 100, zero-padded to two digits.
//! This layout is externally mandated; any deviation breaks the fetch.

use thiserror::Error;

/// Errors from ref computation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefSpecError {
    /// Change numbers start at 1.
    #[error("invalid change number: {0}")]
    InvalidChangeNumber(u64),
}

/// Compute the fetch ref for one patch set of a change.
///
/// # Errors
///
/// Returns [`RefSpecError::InvalidChangeNumber`] for change number 0.
///
/// # Example
///
/// ```ignore
/// assert_eq!(change_ref(12345, 3)?, "refs/changes/45/12345/3");
/// ```
pub fn change_ref(change_number: u64, patch_set: u32) -> Result<String, RefSpecError> {
    if change_number == 0 {
        return Err(RefSpecError::InvalidChangeNumber(change_number));
    }
    let shard = change_number % 100;
    Ok(format!(
        "refs/changes/{:02}/{}/{}",
        shard, change_number, patch_set
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_is_zero_padded() {
        assert_eq!(change_ref(100, 1).unwrap(), "refs/changes/00/100/1");
        assert_eq!(change_ref(7, 2).unwrap(), "refs/changes/07/7/2");
    }

    #[test]
    fn shard_is_last_two_digits() {
        assert_eq!(change_ref(12345, 3).unwrap(), "refs/changes/45/12345/3");
        assert_eq!(change_ref(99, 1).unwrap(), "refs/changes/99/99/1");
    }

    #[test]
    fn zero_change_number_rejected() {
        assert_eq!(
            change_ref(0, 1).unwrap_err(),
            RefSpecError::InvalidChangeNumber(0)
        );
    }
}
