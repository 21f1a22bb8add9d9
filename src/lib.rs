//! tola-listdiff - Minimal edit scripts for ordered lists
//!
//! ## Core Concepts
//!
//! **Compute, then dispatch**: [`calculate_diff`] runs a linear-space Myers
//! search over two sequences described by a [`DataSource`], detects moved
//! items, and returns an immutable [`DiffResult`]. Dispatching that result
//! replays a minimal, ordered stream of insert/remove/move/change events into
//! any [`ListUpdateSink`].
//!
//! ## Modules
//! - `algo`: Myers search, move detection, dispatch
//! - `source`: the `DataSource` capability and ready-made sources
//! - `sink`: the `ListUpdateSink` capability, recording and batching sinks
//! - `error`: internal-fault error type
//!
//! ## Usage
//!
//! ```
//! use tola_listdiff::{calculate_diff, KeyedSource, UpdateOp};
//!
//! #[derive(PartialEq)]
//! struct Row { id: u32, title: &'static str }
//!
//! let old = [Row { id: 1, title: "a" }, Row { id: 2, title: "b" }];
//! let new = [Row { id: 2, title: "b" }, Row { id: 1, title: "A" }];
//!
//! let source = KeyedSource::new(&old, &new, |row: &Row| row.id);
//! let result = calculate_diff(&source)?;
//!
//! let mut ops: Vec<UpdateOp<()>> = Vec::new();
//! result.dispatch_updates_to(&mut ops)?;
//! assert!(ops.iter().any(UpdateOp::is_move));
//! assert!(ops.iter().any(UpdateOp::is_change));
//! # Ok::<(), tola_listdiff::DiffError>(())
//! ```
//!
//! ## Threading
//!
//! Computing is synchronous and can run off the thread that owns the lists,
//! provided neither list changes until it returns. Dispatch must run where
//! the consumer lives, and the consumer must not be read mid-dispatch since
//! intermediate states are only partially updated.

// =============================================================================
// Core modules
// =============================================================================

/// Algorithms: Myers search, move detection, dispatch
pub mod algo;

/// Data sources
pub mod source;

/// Update sinks
pub mod sink;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Algorithms
pub use algo::{
    calculate_diff, calculate_diff_with_config, calculate_diff_with_moves, DiffConfig, DiffResult,
    DiffStats, ItemStatus, Snake, StatusFlag,
};

#[cfg(feature = "parallel")]
pub use algo::calculate_diffs_par;

// Sources
pub use source::{DataSource, FnSource, KeyedSource, SliceSource, WithPayload};

// Sinks
pub use sink::{BatchingSink, ListUpdateSink, UpdateOp};

// Error types
pub use error::{DiffError, ListSide};
