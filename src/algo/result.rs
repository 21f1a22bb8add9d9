//! Reconciliation result: ordered snakes plus per-position status.
//!
//! Built once from the snake list, then read-only. All expensive questions
//! (content equality, move pairing) are answered here so that dispatching,
//! which typically runs on the thread owning the consumer, only walks arrays.
//!
//! # Move Detection
//!
//! When several items swap places, Myers keeps one of them on the diagonal
//! and reports the others as removal + insertion pairs. Walking from the
//! bottom-right corner, every unmatched position is checked against the
//! unmatched positions of the *other* list that were already passed:
//!
//! ```text
//! old: a b c        new: b a c
//!      │                   │
//!      └── removal of a    └── insertion of a  ->  one move
//! ```
//!
//! The position found later in the walk (earlier in its list) is flagged
//! `Ignore`; the move is emitted when dispatch reaches its counterpart.
//!
//! This pairing costs O((adds + removes)^2) in the worst case. Disable it
//! via [`DiffConfig::without_moves`](crate::DiffConfig::without_moves) when
//! items are known to never swap positions.

use tracing::debug;

use super::myers::Snake;
use crate::source::DataSource;

// =============================================================================
// Item Status
// =============================================================================

/// Classification of one list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFlag {
    /// Real insertion or removal
    #[default]
    None,
    /// Matched in place, same contents
    NotChanged,
    /// Matched in place, contents changed
    Changed,
    /// Moved and contents changed
    MovedChanged,
    /// Moved, same contents
    MovedNotChanged,
    /// Moved; the move is dispatched when the counterpart is reached
    Ignore,
}

impl StatusFlag {
    /// Stable upper-case name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::NotChanged => "NOT_CHANGED",
            Self::Changed => "CHANGED",
            Self::MovedChanged => "MOVED_CHANGED",
            Self::MovedNotChanged => "MOVED_NOT_CHANGED",
            Self::Ignore => "IGNORE",
        }
    }
}

/// Status of one position and the counterpart position in the other list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemStatus {
    pub flag: StatusFlag,
    /// Meaningful only when `flag` is not [`StatusFlag::None`]
    pub matched: usize,
}

impl ItemStatus {
    fn new(flag: StatusFlag, matched: usize) -> Self {
        Self { flag, matched }
    }

    /// Counterpart position, or `None` for a real insertion/removal.
    pub fn matched_position(&self) -> Option<usize> {
        match self.flag {
            StatusFlag::None => None,
            _ => Some(self.matched),
        }
    }
}

// =============================================================================
// DiffStats
// =============================================================================

/// Counts derived from the status arrays.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    /// Items matched in place with unchanged contents
    pub kept: usize,
    /// Change events: in-place changes plus moves that also changed
    pub changed: usize,
    /// Moved items
    pub moved: usize,
    /// Real insertions
    pub inserted: usize,
    /// Real removals
    pub removed: usize,
}

impl DiffStats {
    /// Number of structural edits (insertions, removals, moves).
    pub fn edit_count(&self) -> usize {
        self.inserted + self.removed + self.moved
    }

    /// Whether dispatching would emit nothing.
    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0 && self.changed == 0
    }
}

// =============================================================================
// DiffResult
// =============================================================================

/// Outcome of [`calculate_diff`](crate::calculate_diff).
///
/// Immutable once built. It can be dispatched any number of times; each
/// dispatch replays the same event stream into a fresh sink.
pub struct DiffResult<'a, S: DataSource + ?Sized> {
    pub(super) source: &'a S,
    pub(super) snakes: Vec<Snake>,
    pub(super) old_statuses: Vec<ItemStatus>,
    pub(super) new_statuses: Vec<ItemStatus>,
    pub(super) old_len: usize,
    pub(super) new_len: usize,
    pub(super) detect_moves: bool,
}

impl<'a, S: DataSource + ?Sized> DiffResult<'a, S> {
    /// Build the result from sorted snakes and classify every position.
    pub(crate) fn new(
        source: &'a S,
        mut snakes: Vec<Snake>,
        old_len: usize,
        new_len: usize,
        detect_moves: bool,
    ) -> Self {
        // A root snake at (0, 0) lets every walk treat "no earlier snake"
        // like any other boundary.
        if snakes.first().is_none_or(|first| first.x != 0 || first.y != 0) {
            snakes.insert(0, Snake::default());
        }

        let mut result = Self {
            source,
            snakes,
            old_statuses: vec![ItemStatus::default(); old_len],
            new_statuses: vec![ItemStatus::default(); new_len],
            old_len,
            new_len,
            detect_moves,
        };
        result.find_matching_items();

        debug!(stats = ?result.stats(), "classified list positions");
        result
    }

    /// Walk from the bottom-right corner to (0, 0), classifying matched runs
    /// and pairing unmatched positions into moves.
    fn find_matching_items(&mut self) {
        let mut pos_old = self.old_len;
        let mut pos_new = self.new_len;

        for index in (0..self.snakes.len()).rev() {
            let snake = self.snakes[index];
            let end_x = snake.end_x();
            let end_y = snake.end_y();

            if self.detect_moves {
                while pos_old > end_x {
                    // a removal; look for an insertion already passed
                    if self.old_statuses[pos_old - 1].flag == StatusFlag::None {
                        self.find_matching_item(pos_old, pos_new, index, false);
                    }
                    pos_old -= 1;
                }
                while pos_new > end_y {
                    // an insertion; look for a removal already passed
                    if self.new_statuses[pos_new - 1].flag == StatusFlag::None {
                        self.find_matching_item(pos_old, pos_new, index, true);
                    }
                    pos_new -= 1;
                }
            }

            for offset in 0..snake.size {
                let old_pos = snake.x + offset;
                let new_pos = snake.y + offset;
                let flag = if self.source.are_contents_the_same(old_pos, new_pos) {
                    StatusFlag::NotChanged
                } else {
                    StatusFlag::Changed
                };
                self.old_statuses[old_pos] = ItemStatus::new(flag, new_pos);
                self.new_statuses[new_pos] = ItemStatus::new(flag, old_pos);
            }

            pos_old = snake.x;
            pos_new = snake.y;
        }
    }

    /// Search left of and above `(x, y)` for the counterpart of one unmatched
    /// position: the new item `y - 1` among removals when `removal` is set,
    /// else the old item `x - 1` among insertions.
    fn find_matching_item(&mut self, x: usize, y: usize, snake_index: usize, removal: bool) -> bool {
        let (my_pos, mut cur_x, mut cur_y) = if removal {
            (y - 1, x, y - 1)
        } else {
            (x - 1, x - 1, y)
        };

        for index in (0..=snake_index).rev() {
            let snake = self.snakes[index];
            let end_x = snake.end_x();
            let end_y = snake.end_y();

            if removal {
                for pos in (end_x..cur_x).rev() {
                    // already paired with another insertion of an equal item
                    if self.old_statuses[pos].flag != StatusFlag::None {
                        continue;
                    }
                    if self.source.are_items_the_same(pos, my_pos) {
                        let flag = self.moved_flag(pos, my_pos);
                        self.new_statuses[my_pos] = ItemStatus::new(StatusFlag::Ignore, pos);
                        self.old_statuses[pos] = ItemStatus::new(flag, my_pos);
                        return true;
                    }
                }
            } else {
                for pos in (end_y..cur_y).rev() {
                    if self.new_statuses[pos].flag != StatusFlag::None {
                        continue;
                    }
                    if self.source.are_items_the_same(my_pos, pos) {
                        let flag = self.moved_flag(my_pos, pos);
                        self.old_statuses[my_pos] = ItemStatus::new(StatusFlag::Ignore, pos);
                        self.new_statuses[pos] = ItemStatus::new(flag, my_pos);
                        return true;
                    }
                }
            }

            cur_x = snake.x;
            cur_y = snake.y;
        }
        false
    }

    fn moved_flag(&self, old_pos: usize, new_pos: usize) -> StatusFlag {
        if self.source.are_contents_the_same(old_pos, new_pos) {
            StatusFlag::MovedNotChanged
        } else {
            StatusFlag::MovedChanged
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Matched runs in `(x, y)` order, starting with the root snake at (0, 0).
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn old_len(&self) -> usize {
        self.old_len
    }

    pub fn new_len(&self) -> usize {
        self.new_len
    }

    pub fn detects_moves(&self) -> bool {
        self.detect_moves
    }

    /// Status of an old-list position, `None` if out of range.
    pub fn old_status(&self, pos: usize) -> Option<ItemStatus> {
        self.old_statuses.get(pos).copied()
    }

    /// Status of a new-list position, `None` if out of range.
    pub fn new_status(&self, pos: usize) -> Option<ItemStatus> {
        self.new_statuses.get(pos).copied()
    }

    /// Where an old-list item ended up in the new list.
    ///
    /// `None` if the item was removed or `pos` is out of range.
    pub fn convert_old_position_to_new(&self, pos: usize) -> Option<usize> {
        self.old_status(pos)?.matched_position()
    }

    /// Where a new-list item came from in the old list.
    ///
    /// `None` if the item was inserted or `pos` is out of range.
    pub fn convert_new_position_to_old(&self, pos: usize) -> Option<usize> {
        self.new_status(pos)?.matched_position()
    }

    /// Counts of kept, changed, moved, inserted and removed items.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for status in &self.old_statuses {
            match status.flag {
                StatusFlag::None => stats.removed += 1,
                StatusFlag::NotChanged => stats.kept += 1,
                StatusFlag::Changed => stats.changed += 1,
                StatusFlag::MovedChanged => {
                    stats.moved += 1;
                    stats.changed += 1;
                }
                StatusFlag::MovedNotChanged => stats.moved += 1,
                StatusFlag::Ignore => {}
            }
        }
        for status in &self.new_statuses {
            match status.flag {
                StatusFlag::None => stats.inserted += 1,
                StatusFlag::MovedChanged => {
                    stats.moved += 1;
                    stats.changed += 1;
                }
                StatusFlag::MovedNotChanged => stats.moved += 1,
                StatusFlag::NotChanged | StatusFlag::Changed | StatusFlag::Ignore => {}
            }
        }
        stats
    }
}

impl<S: DataSource + ?Sized> std::fmt::Debug for DiffResult<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffResult")
            .field("old_len", &self.old_len)
            .field("new_len", &self.new_len)
            .field("detect_moves", &self.detect_moves)
            .field("snakes", &self.snakes)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
