//! Replay a [`DiffResult`] as an ordered stream of list updates.
//!
//! # Ordering
//!
//! Snakes are walked from the end of both lists toward the start. Working
//! back-to-front means an operation never shifts the positions of anything
//! still to be dispatched, except for moves whose far end was already passed.
//! Those are tracked as postponed updates:
//!
//! ```text
//! walk direction  <-------------------------------
//! old: a b c d e           new: a c d e b
//!        │                               │
//!        │                               └─ Ignore: postponed at current pos 5
//!        └─ MovedNotChanged: pair with the postponed entry
//!                           -> on_moved(1, 5 - 1)
//! ```
//!
//! Every real insertion or removal dispatched while an entry is postponed
//! shifts that entry's current position by one.

use smallvec::SmallVec;
use tracing::{error, trace};

use super::result::{DiffResult, StatusFlag};
use crate::error::{DiffError, ListSide};
use crate::sink::{BatchingSink, ListUpdateSink, UpdateOp};
use crate::source::DataSource;

/// A removal or insertion held back because it is half of a move.
#[derive(Debug, Clone, Copy)]
struct PostponedUpdate {
    /// Position in the list the update belongs to
    pos_in_owner_list: usize,
    /// Where the item sits in the consumer's list right now
    current_pos: usize,
    removal: bool,
}

type Postponed = SmallVec<[PostponedUpdate; 8]>;

impl<S: DataSource + ?Sized> DiffResult<'_, S> {
    /// Dispatch every update to `sink`, batching adjacent operations.
    ///
    /// Events are cumulative; apply each one immediately. No reader of the
    /// consumer's list should observe it until this call returns.
    pub fn dispatch_updates_to<K>(&self, sink: &mut K) -> Result<(), DiffError>
    where
        K: ListUpdateSink<S::Payload> + ?Sized,
    {
        let mut batching = BatchingSink::new(sink);
        self.dispatch_updates_to_batching(&mut batching)
    }

    /// Dispatch into an existing batching layer, flushing it at the end.
    ///
    /// Use this instead of [`dispatch_updates_to`](Self::dispatch_updates_to)
    /// when the sink is already a [`BatchingSink`], to avoid batching twice.
    pub fn dispatch_updates_to_batching<K>(
        &self,
        batching: &mut BatchingSink<K, S::Payload>,
    ) -> Result<(), DiffError>
    where
        K: ListUpdateSink<S::Payload>,
    {
        let mut postponed = Postponed::new();
        let mut pos_old = self.old_len;
        let mut pos_new = self.new_len;

        for snake in self.snakes.iter().rev() {
            let end_x = snake.end_x();
            let end_y = snake.end_y();

            if end_x < pos_old {
                self.dispatch_removals(&mut postponed, batching, end_x, pos_old - end_x, end_x)?;
            }
            if end_y < pos_new {
                self.dispatch_additions(&mut postponed, batching, end_x, pos_new - end_y, end_y)?;
            }

            for offset in (0..snake.size).rev() {
                let old_pos = snake.x + offset;
                if self.old_statuses[old_pos].flag == StatusFlag::Changed {
                    let payload = self.source.change_payload(old_pos, snake.y + offset);
                    batching.on_changed(old_pos, 1, payload);
                }
            }

            pos_old = snake.x;
            pos_new = snake.y;
        }

        batching.flush();
        trace!(postponed = postponed.len(), "dispatch complete");
        Ok(())
    }

    /// Collect the dispatched stream into a vector.
    pub fn updates(&self) -> Result<Vec<UpdateOp<S::Payload>>, DiffError> {
        let mut ops = Vec::new();
        self.dispatch_updates_to(&mut ops)?;
        Ok(ops)
    }

    fn dispatch_additions<K>(
        &self,
        postponed: &mut Postponed,
        sink: &mut K,
        start: usize,
        count: usize,
        global_index: usize,
    ) -> Result<(), DiffError>
    where
        K: ListUpdateSink<S::Payload>,
    {
        if !self.detect_moves {
            sink.on_inserted(start, count);
            return Ok(());
        }

        for offset in (0..count).rev() {
            let new_pos = global_index + offset;
            let status = self.new_statuses[new_pos];
            match status.flag {
                StatusFlag::None => {
                    sink.on_inserted(start, 1);
                    for update in postponed.iter_mut() {
                        update.current_pos += 1;
                    }
                }
                StatusFlag::MovedChanged | StatusFlag::MovedNotChanged => {
                    let old_pos = status.matched;
                    let update = remove_postponed_update(postponed, old_pos, true)?;
                    // the item was moved from that position
                    sink.on_moved(update.current_pos, start);
                    if status.flag == StatusFlag::MovedChanged {
                        sink.on_changed(start, 1, self.source.change_payload(old_pos, new_pos));
                    }
                }
                StatusFlag::Ignore => {
                    postponed.push(PostponedUpdate {
                        pos_in_owner_list: new_pos,
                        current_pos: start,
                        removal: false,
                    });
                }
                StatusFlag::NotChanged | StatusFlag::Changed => {
                    return Err(unexpected(new_pos, ListSide::New, status.flag));
                }
            }
        }
        Ok(())
    }

    fn dispatch_removals<K>(
        &self,
        postponed: &mut Postponed,
        sink: &mut K,
        start: usize,
        count: usize,
        global_index: usize,
    ) -> Result<(), DiffError>
    where
        K: ListUpdateSink<S::Payload>,
    {
        if !self.detect_moves {
            sink.on_removed(start, count);
            return Ok(());
        }

        for offset in (0..count).rev() {
            let old_pos = global_index + offset;
            let status = self.old_statuses[old_pos];
            match status.flag {
                StatusFlag::None => {
                    sink.on_removed(start + offset, 1);
                    for update in postponed.iter_mut() {
                        update.current_pos -= 1;
                    }
                }
                StatusFlag::MovedChanged | StatusFlag::MovedNotChanged => {
                    let new_pos = status.matched;
                    let update = remove_postponed_update(postponed, new_pos, false)?;
                    // Taking the item out shifts the postponed slot down by one.
                    let to = update.current_pos - 1;
                    sink.on_moved(start + offset, to);
                    if status.flag == StatusFlag::MovedChanged {
                        sink.on_changed(to, 1, self.source.change_payload(old_pos, new_pos));
                    }
                }
                StatusFlag::Ignore => {
                    postponed.push(PostponedUpdate {
                        pos_in_owner_list: old_pos,
                        current_pos: start + offset,
                        removal: true,
                    });
                }
                StatusFlag::NotChanged | StatusFlag::Changed => {
                    return Err(unexpected(old_pos, ListSide::Old, status.flag));
                }
            }
        }
        Ok(())
    }
}

/// Pop the postponed update for `pos`, re-offsetting the entries after it.
fn remove_postponed_update(
    updates: &mut Postponed,
    pos: usize,
    removal: bool,
) -> Result<PostponedUpdate, DiffError> {
    let Some(index) = updates
        .iter()
        .rposition(|update| update.pos_in_owner_list == pos && update.removal == removal)
    else {
        error!(pos, removal, "moved item has no postponed counterpart");
        return Err(DiffError::MissingPostponedUpdate {
            position: pos,
            removal,
        });
    };

    let update = updates.remove(index);
    for other in &mut updates[index..] {
        if removal {
            other.current_pos += 1;
        } else {
            other.current_pos -= 1;
        }
    }
    Ok(update)
}

fn unexpected(position: usize, list: ListSide, flag: StatusFlag) -> DiffError {
    error!(position, %list, status = flag.name(), "unexpected status in unmatched gap");
    DiffError::UnexpectedStatus {
        position,
        list,
        status: flag.name(),
    }
}

// =============================================================================
// Tests
// =============================================================================
