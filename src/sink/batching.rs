//! Coalescing layer between the dispatcher and a consumer sink.
//!
//! Back-to-front dispatch emits single-item events at shifting positions.
//! Runs of them that describe one contiguous range are merged here:
//!
//! ```text
//! on_removed(4, 1), on_removed(3, 1), on_removed(2, 1)  ->  on_removed(2, 3)
//! on_inserted(5, 1), on_inserted(5, 1)                   ->  on_inserted(5, 2)
//! on_changed(3, 1, p), on_changed(2, 1, p)               ->  on_changed(2, 2, p)
//! ```
//!
//! Moves are never merged; they flush whatever is pending and pass through.

use tracing::trace;

use super::ListUpdateSink;

/// The one operation held back while waiting for a possible merge.
#[derive(Debug)]
enum Pending<P> {
    Insert { position: usize, count: usize },
    Remove { position: usize, count: usize },
    Change {
        position: usize,
        count: usize,
        payload: Option<P>,
    },
}

/// Wraps a sink and merges adjacent same-kind operations before forwarding.
///
/// Call [`flush`](Self::flush) once the stream is complete. Dropping a
/// `BatchingSink` with a pending operation discards it.
#[derive(Debug)]
pub struct BatchingSink<K, P> {
    inner: K,
    pending: Option<Pending<P>>,
}

impl<K, P> BatchingSink<K, P>
where
    K: ListUpdateSink<P>,
    P: PartialEq,
{
    /// Wrap `inner`.
    pub fn new(inner: K) -> Self {
        Self {
            inner,
            pending: None,
        }
    }

    /// Forward the pending operation, if any.
    pub fn flush(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        match pending {
            Pending::Insert { position, count } => {
                trace!(position, count, "flush insert");
                self.inner.on_inserted(position, count);
            }
            Pending::Remove { position, count } => {
                trace!(position, count, "flush remove");
                self.inner.on_removed(position, count);
            }
            Pending::Change {
                position,
                count,
                payload,
            } => {
                trace!(position, count, "flush change");
                self.inner.on_changed(position, count, payload);
            }
        }
    }

    /// Flush and return the wrapped sink.
    pub fn into_inner(mut self) -> K {
        self.flush();
        self.inner
    }

    /// The wrapped sink. Operations still pending are not visible in it.
    pub fn get_ref(&self) -> &K {
        &self.inner
    }
}

impl<K, P> ListUpdateSink<P> for BatchingSink<K, P>
where
    K: ListUpdateSink<P>,
    P: PartialEq,
{
    fn on_inserted(&mut self, position: usize, count: usize) {
        if let Some(Pending::Insert {
            position: last_position,
            count: last_count,
        }) = &mut self.pending
            && position >= *last_position
            && position <= *last_position + *last_count
        {
            *last_count += count;
            *last_position = position.min(*last_position);
            return;
        }
        self.flush();
        self.pending = Some(Pending::Insert { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        if let Some(Pending::Remove {
            position: last_position,
            count: last_count,
        }) = &mut self.pending
            && *last_position >= position
            && *last_position <= position + count
        {
            *last_count += count;
            *last_position = position;
            return;
        }
        self.flush();
        self.pending = Some(Pending::Remove { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.flush();
        self.inner.on_moved(from, to);
    }

    fn on_changed(&mut self, position: usize, count: usize, payload: Option<P>) {
        if let Some(Pending::Change {
            position: last_position,
            count: last_count,
            payload: last_payload,
        }) = &mut self.pending
            && position <= *last_position + *last_count
            && position + count >= *last_position
            && *last_payload == payload
        {
            let previous_end = *last_position + *last_count;
            *last_position = position.min(*last_position);
            *last_count = previous_end.max(position + count) - *last_position;
            return;
        }
        self.flush();
        self.pending = Some(Pending::Change {
            position,
            count,
            payload,
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
