//! List Diff Entry Points
//!
//! Computes the edit script between two sequences exposed by a
//! [`DataSource`]. This is a **pure computation**: nothing is emitted until
//! the returned [`DiffResult`] is dispatched.
//!
//! # Architecture: Compute/Dispatch Separation
//!
//! ```text
//! calculate_diff(source) -> DiffResult       // any thread, sequences frozen
//!       |
//!       v
//! result.dispatch_updates_to(sink)          // thread owning the consumer
//! ```
//!
//! # Algorithm
//!
//! 1. Linear-space Myers search collects matching snakes
//! 2. Unmatched removals/insertions are paired into moves
//! 3. Dispatch replays everything back-to-front as batched updates
//!
//! # Complexity
//!
//! - Time: O((n + m) * d) for the search, plus O((adds + removes)^2) for
//!   move detection when enabled
//! - Space: O(n + m)

use tracing::{debug, error};

use super::myers::find_snakes;
use super::result::DiffResult;
use crate::error::DiffError;
use crate::source::DataSource;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a diff computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Pair unmatched removals and insertions of the same item into moves.
    /// Default: true
    pub detect_moves: bool,
    /// Re-read both lengths after the search and fail with
    /// [`DiffError::SourceMutated`] if they changed.
    /// Default: false
    pub verify_source: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            detect_moves: true,
            verify_source: false,
        }
    }
}

impl DiffConfig {
    /// Create config with move detection on or off.
    pub fn new(detect_moves: bool) -> Self {
        Self {
            detect_moves,
            ..Self::default()
        }
    }

    /// Create config for lists whose items never swap positions.
    ///
    /// Skips the quadratic move-pairing pass; swaps show up as a removal
    /// plus an insertion instead.
    pub fn without_moves() -> Self {
        Self::new(false)
    }

    /// Enable or disable the length check after the search.
    ///
    /// This only catches mutations that change a length. It is a cheap
    /// tripwire, not a guarantee that the source stayed frozen.
    pub fn with_source_verification(mut self, verify: bool) -> Self {
        self.verify_source = verify;
        self
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Calculate the updates that turn the old list into the new one, with move
/// detection enabled.
///
/// # Example
///
/// ```
/// use tola_listdiff::{calculate_diff, SliceSource};
///
/// let old = ["a", "b", "c"];
/// let new = ["b", "a", "c"];
/// let source = SliceSource::new(&old, &new);
///
/// let ops = calculate_diff(&source)?.updates()?;
/// assert_eq!(ops.len(), 1);
/// assert!(ops[0].is_move());
/// # Ok::<(), tola_listdiff::DiffError>(())
/// ```
pub fn calculate_diff<S>(source: &S) -> Result<DiffResult<'_, S>, DiffError>
where
    S: DataSource + ?Sized,
{
    calculate_diff_with_config(source, DiffConfig::default())
}

/// Calculate the updates with move detection switched on or off.
pub fn calculate_diff_with_moves<S>(
    source: &S,
    detect_moves: bool,
) -> Result<DiffResult<'_, S>, DiffError>
where
    S: DataSource + ?Sized,
{
    calculate_diff_with_config(source, DiffConfig::new(detect_moves))
}

/// Calculate the updates with custom configuration.
///
/// Both sequences must not change until this returns. Errors are internal
/// faults, never input validation: see [`DiffError::is_internal`].
pub fn calculate_diff_with_config<S>(
    source: &S,
    config: DiffConfig,
) -> Result<DiffResult<'_, S>, DiffError>
where
    S: DataSource + ?Sized,
{
    let old_len = source.old_len();
    let new_len = source.new_len();

    let snakes = find_snakes(source, old_len, new_len)?;

    if config.verify_source {
        let (found_old, found_new) = (source.old_len(), source.new_len());
        if (found_old, found_new) != (old_len, new_len) {
            error!(old_len, new_len, found_old, found_new, "data source changed during diff");
            return Err(DiffError::SourceMutated {
                expected_old: old_len,
                expected_new: new_len,
                found_old,
                found_new,
            });
        }
    }

    debug!(
        old_len,
        new_len,
        snakes = snakes.len(),
        detect_moves = config.detect_moves,
        "computed edit graph snakes"
    );

    Ok(DiffResult::new(source, snakes, old_len, new_len, config.detect_moves))
}

/// Calculate many independent diffs in parallel.
///
/// Each computation owns its own k-line buffers, so sources only need to be
/// `Sync`. Results keep the input order.
#[cfg(feature = "parallel")]
pub fn calculate_diffs_par<S>(
    sources: &[S],
    config: DiffConfig,
) -> Vec<Result<DiffResult<'_, S>, DiffError>>
where
    S: DataSource + Sync,
{
    use rayon::prelude::*;

    sources
        .par_iter()
        .map(|source| calculate_diff_with_config(source, config))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
