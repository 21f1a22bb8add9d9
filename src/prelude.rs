//! Prelude module for common imports.
//!
//! ```
//! use tola_listdiff::prelude::*;
//! ```

// Algorithms
pub use crate::algo::{
    calculate_diff, calculate_diff_with_config, calculate_diff_with_moves, DiffConfig, DiffResult,
    DiffStats,
};

// Sources
pub use crate::source::{DataSource, FnSource, KeyedSource, SliceSource};

// Sinks
pub use crate::sink::{BatchingSink, ListUpdateSink, UpdateOp};

// Error
pub use crate::error::DiffError;
