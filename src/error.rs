//! Error types for tola-listdiff.
//!
//! None of these are recoverable input errors. A diff either produces a valid
//! edit script or reports that one of its own invariants broke, which almost
//! always means the data source changed while the diff was running.

use thiserror::Error;

/// Which of the two sequences a position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSide {
    /// The sequence being transformed.
    Old,
    /// The target sequence.
    New,
}

impl std::fmt::Display for ListSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// Errors that can occur while computing or dispatching a diff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The middle-snake search exhausted its distance bound without the
    /// forward and backward frontiers meeting.
    #[error(
        "no middle snake found for old {} / new {}; \
         make sure the data is not changing during the diff calculation",
        span(.old_range), span(.new_range)
    )]
    NoMiddleSnake {
        /// Old-list bounds of the sub-rectangle being searched
        old_range: (usize, usize),
        /// New-list bounds of the sub-rectangle being searched
        new_range: (usize, usize),
    },

    /// A gap position carried a status that only matched runs may carry.
    #[error("unexpected status {status} for {list} position {position}")]
    UnexpectedStatus {
        /// Position inside `list`
        position: usize,
        /// The list the position belongs to
        list: ListSide,
        /// Name of the offending status flag
        status: &'static str,
    },

    /// A moved item had no postponed counterpart to pair with.
    #[error("no postponed {} for moved item at position {position}", role(.removal))]
    MissingPostponedUpdate {
        /// Position of the counterpart in its owner list
        position: usize,
        /// Whether the missing counterpart is a removal
        removal: bool,
    },

    /// The data source reported different lengths after the search than before.
    #[error(
        "data source changed during diff: lengths were {expected_old}/{expected_new}, \
         now {found_old}/{found_new}"
    )]
    SourceMutated {
        /// Old-list length when the diff started
        expected_old: usize,
        /// New-list length when the diff started
        expected_new: usize,
        /// Old-list length when the search finished
        found_old: usize,
        /// New-list length when the search finished
        found_new: usize,
    },
}

fn span(range: &(usize, usize)) -> String {
    format!("{}..{}", range.0, range.1)
}

fn role(removal: &bool) -> &'static str {
    if *removal { "removal" } else { "insertion" }
}

impl DiffError {
    /// Whether this error signals a broken internal invariant (a library bug or
    /// an undetected mutation) rather than a caught precondition violation.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::SourceMutated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiffError::NoMiddleSnake {
            old_range: (0, 4),
            new_range: (1, 3),
        };
        assert!(err.to_string().starts_with("no middle snake found for old 0..4 / new 1..3"));

        let err = DiffError::UnexpectedStatus {
            position: 7,
            list: ListSide::New,
            status: "NOT_CHANGED",
        };
        assert_eq!(err.to_string(), "unexpected status NOT_CHANGED for new position 7");

        let err = DiffError::MissingPostponedUpdate {
            position: 2,
            removal: true,
        };
        assert_eq!(err.to_string(), "no postponed removal for moved item at position 2");
    }

    #[test]
    fn test_internal_classification() {
        let mutated = DiffError::SourceMutated {
            expected_old: 1,
            expected_new: 1,
            found_old: 2,
            found_new: 1,
        };
        assert!(!mutated.is_internal());
        assert!(DiffError::MissingPostponedUpdate { position: 0, removal: false }.is_internal());
    }

    #[test]
    fn test_error_is_send_sync() {
        static_assertions::assert_impl_all!(DiffError: Send, Sync, std::error::Error);
    }
}
