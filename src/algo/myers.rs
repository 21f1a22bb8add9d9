//! Linear-space Myers search over the edit graph.
//!
//! Implements the divide-and-conquer variant of Myers' algorithm: instead of
//! storing a full trace for backtracking, each step finds only the *middle
//! snake* of a sub-rectangle and splits the remaining work around it.
//!
//! # Edit Graph
//!
//! ```text
//!          new →
//!        b   a   c
//!   o  ┌───┬───┬───┐
//!   l a│   │ ╲ │   │    → : insertion (y + 1)
//!   d  ├───┼───┼───┤    ↓ : removal   (x + 1)
//!   ↓ b│ ╲ │   │   │    ╲ : match     (x + 1, y + 1)
//!      ├───┼───┼───┤
//!     c│   │   │ ╲ │    x = old position, y = new position
//!      └───┴───┴───┘    k = x - y (diagonal)
//! ```
//!
//! # Complexity
//!
//! - Time: O((n + m) * d) where d is the edit distance
//! - Space: O(n + m), two k-line buffers shared by every sub-problem
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986), section 4b

use tracing::{error, trace};

use crate::error::DiffError;
use crate::source::DataSource;

// =============================================================================
// Public Types
// =============================================================================

/// A run of matching items, optionally adjacent to one insertion or removal.
///
/// `(x, y)` is where the diagonal run starts in old/new index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snake {
    /// Start position in the old list
    pub x: usize,
    /// Start position in the new list
    pub y: usize,
    /// Number of matching items, may be 0
    pub size: usize,
    /// Whether the non-diagonal step removes from the old list (else inserts)
    pub removal: bool,
    /// Whether the non-diagonal step follows the diagonal run (else precedes it)
    pub reverse: bool,
}

impl Snake {
    /// Old-list position right after the matched run.
    pub fn end_x(&self) -> usize {
        self.x + self.size
    }

    /// New-list position right after the matched run.
    pub fn end_y(&self) -> usize {
        self.y + self.size
    }
}

// =============================================================================
// Internal Types
// =============================================================================

/// Sub-rectangle `[old_start, old_end) x [new_start, new_end)` still to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Range {
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Range {
    pub(crate) fn new(old_start: usize, old_end: usize, new_start: usize, new_end: usize) -> Self {
        Self {
            old_start,
            old_end,
            new_start,
            new_end,
        }
    }

    // A split past the edge of its parent leaves start > end: that is empty.
    fn old_size(&self) -> usize {
        self.old_end.saturating_sub(self.old_start)
    }

    fn new_size(&self) -> usize {
        self.new_end.saturating_sub(self.new_start)
    }
}

/// Furthest-reaching x per diagonal, for the forward and backward searches.
///
/// Sized once for the whole graph and reused by every sub-rectangle. Each
/// search resets the window it is about to use before reading it.
pub(crate) struct KLines {
    forward: Vec<isize>,
    backward: Vec<isize>,
    offset: isize,
}

impl KLines {
    pub(crate) fn new(old_len: usize, new_len: usize) -> Self {
        let max = old_len + new_len + old_len.abs_diff(new_len);
        Self {
            forward: vec![0; max * 2],
            backward: vec![0; max * 2],
            offset: max as isize,
        }
    }
}

// =============================================================================
// Middle Snake
// =============================================================================

/// Find one snake on a shortest edit path through `range`.
///
/// Returned coordinates are relative to the range's top-left corner.
/// Returns `Ok(None)` when the range is empty on either axis.
///
/// Forward and backward frontiers grow one edit at a time. With an odd
/// `delta` the paths can only meet after a forward step, with an even one
/// only after a backward step, so overlap is tested in that half alone.
pub(crate) fn middle_snake<S>(
    source: &S,
    range: &Range,
    lines: &mut KLines,
) -> Result<Option<Snake>, DiffError>
where
    S: DataSource + ?Sized,
{
    if range.old_size() < 1 || range.new_size() < 1 {
        return Ok(None);
    }
    let d_limit = (range.old_size() + range.new_size()).div_ceil(2);
    search(source, range, lines, d_limit as isize).map(Some)
}

/// Run both searches for at most `d_limit` edits on a non-empty `range`.
///
/// Each frontier only ever grows past where it would be with no matches at
/// all, so the full `d_limit` always finds an overlap. Running out means the
/// bound itself is wrong.
fn search<S>(source: &S, range: &Range, lines: &mut KLines, d_limit: isize) -> Result<Snake, DiffError>
where
    S: DataSource + ?Sized,
{
    let old_size = range.old_size() as isize;
    let new_size = range.new_size() as isize;
    let delta = old_size - new_size;

    let KLines {
        forward,
        backward,
        offset,
    } = lines;
    let offset = *offset;
    let at = |k: isize| (offset + k) as usize;

    forward[at(-d_limit - 1)..at(d_limit + 1)].fill(0);
    backward[at(-d_limit - 1 + delta)..at(d_limit + 1 + delta)].fill(old_size);

    let same = |x: isize, y: isize| {
        source.are_items_the_same(range.old_start + x as usize, range.new_start + y as usize)
    };
    let check_in_forward = delta % 2 != 0;

    for d in 0..=d_limit {
        for k in (-d..=d).step_by(2) {
            // Reach diagonal k from k + 1 (insertion) or k - 1 (removal),
            // whichever got further.
            let (mut x, removal) =
                if k == -d || (k != d && forward[at(k - 1)] < forward[at(k + 1)]) {
                    (forward[at(k + 1)], false)
                } else {
                    (forward[at(k - 1)] + 1, true)
                };
            let x_start = x;
            let mut y = x - k;
            while x < old_size && y < new_size && same(x, y) {
                x += 1;
                y += 1;
            }
            forward[at(k)] = x;

            if check_in_forward
                && k >= delta - d + 1
                && k <= delta + d - 1
                && forward[at(k)] >= backward[at(k)]
            {
                // only the run slid in this step is known to match
                let snake = Snake {
                    x: x_start as usize,
                    y: (x_start - k) as usize,
                    size: (x - x_start) as usize,
                    removal,
                    reverse: false,
                };
                trace!(?range, ?snake, d, "middle snake (forward)");
                return Ok(snake);
            }
        }

        for k in (-d..=d).step_by(2) {
            let backward_k = k + delta;
            let (mut x, removal) = if backward_k == d + delta
                || (backward_k != -d + delta
                    && backward[at(backward_k - 1)] < backward[at(backward_k + 1)])
            {
                (backward[at(backward_k - 1)], false)
            } else {
                (backward[at(backward_k + 1)] - 1, true)
            };
            let x_start = x;
            let mut y = x - backward_k;
            while x > 0 && y > 0 && same(x - 1, y - 1) {
                x -= 1;
                y -= 1;
            }
            backward[at(backward_k)] = x;

            if !check_in_forward
                && backward_k >= -d
                && backward_k <= d
                && forward[at(backward_k)] >= backward[at(backward_k)]
            {
                let snake = Snake {
                    x: x as usize,
                    y: (x - backward_k) as usize,
                    size: (x_start - x) as usize,
                    removal,
                    reverse: true,
                };
                trace!(?range, ?snake, d, "middle snake (backward)");
                return Ok(snake);
            }
        }
    }

    error!(?range, d_limit, "edit graph search exhausted its distance bound");
    Err(DiffError::NoMiddleSnake {
        old_range: (range.old_start, range.old_end),
        new_range: (range.new_start, range.new_end),
    })
}

// =============================================================================
// Snake Assembly
// =============================================================================

/// Collect every snake of the `old_len` x `new_len` edit graph, sorted by `(x, y)`.
///
/// Uses an explicit stack of ranges instead of recursion: edit distance can
/// grow with input length and so would call depth. Zero-size snakes still
/// split their range but are left out of the result.
pub(crate) fn find_snakes<S>(source: &S, old_len: usize, new_len: usize) -> Result<Vec<Snake>, DiffError>
where
    S: DataSource + ?Sized,
{
    let mut snakes = Vec::new();
    let mut lines = KLines::new(old_len, new_len);
    // Popped ranges are plain values; the stack's retained capacity is the
    // only storage split ranges ever need.
    let mut stack = vec![Range::new(0, old_len, 0, new_len)];

    while let Some(range) = stack.pop() {
        let Some(mut snake) = middle_snake(source, &range, &mut lines)? else {
            continue;
        };

        // offset into global coordinates
        snake.x += range.old_start;
        snake.y += range.new_start;

        let mut left = Range {
            old_start: range.old_start,
            new_start: range.new_start,
            ..Range::default()
        };
        if snake.reverse {
            left.old_end = snake.x;
            left.new_end = snake.y;
        } else if snake.removal {
            left.old_end = snake.x - 1;
            left.new_end = snake.y;
        } else {
            left.old_end = snake.x;
            left.new_end = snake.y - 1;
        }

        let mut right = range;
        if !snake.reverse {
            right.old_start = snake.end_x();
            right.new_start = snake.end_y();
        } else if snake.removal {
            right.old_start = snake.end_x() + 1;
            right.new_start = snake.end_y();
        } else {
            right.old_start = snake.end_x();
            right.new_start = snake.end_y() + 1;
        }

        // Only answers that disagree between the two searches can produce
        // a split that leaves the range as it was.
        if left == range || right == range {
            error!(?range, ?snake, "middle snake does not split its range");
            return Err(DiffError::NoMiddleSnake {
                old_range: (range.old_start, range.old_end),
                new_range: (range.new_start, range.new_end),
            });
        }

        if snake.size > 0 {
            snakes.push(snake);
        }
        stack.push(left);
        stack.push(right);
    }

    snakes.sort_unstable_by_key(|snake| (snake.x, snake.y));
    Ok(snakes)
}

// =============================================================================
// Tests
// =============================================================================
