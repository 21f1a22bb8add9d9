//! Algorithm implementations for list reconciliation.
//!
//! - `myers`: linear-space Myers search and snake assembly
//! - `result`: status classification and move detection
//! - `dispatch`: ordered, batched replay of a result
//! - `diff`: entry points and configuration

mod diff;
mod dispatch;
mod myers;
mod result;

#[cfg(feature = "parallel")]
pub use diff::calculate_diffs_par;
pub use diff::{calculate_diff, calculate_diff_with_config, calculate_diff_with_moves, DiffConfig};
pub use myers::Snake;
pub use result::{DiffResult, DiffStats, ItemStatus, StatusFlag};
