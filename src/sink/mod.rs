//! Update sinks: consumers of the dispatched event stream.
//!
//! Events are cumulative. Every position argument assumes that all earlier
//! events in the same stream have already been applied.
//!
//! ```text
//! old: [a, b, c]      on_removed(0, 1)   -> [b, c]
//!                     on_inserted(2, 1)  -> [b, c, _]
//!                     on_moved(0, 1)     -> [c, b, _]
//! ```

mod batching;

pub use batching::BatchingSink;

// =============================================================================
// ListUpdateSink
// =============================================================================

/// Receives list update operations in dispatch order.
pub trait ListUpdateSink<P> {
    /// `count` items were inserted at `position`.
    fn on_inserted(&mut self, position: usize, count: usize);

    /// `count` items were removed starting at `position`.
    fn on_removed(&mut self, position: usize, count: usize);

    /// The item at `from` was moved to `to`.
    fn on_moved(&mut self, from: usize, to: usize);

    /// `count` items starting at `position` changed in place.
    fn on_changed(&mut self, position: usize, count: usize, payload: Option<P>);
}

impl<P, K: ListUpdateSink<P> + ?Sized> ListUpdateSink<P> for &mut K {
    fn on_inserted(&mut self, position: usize, count: usize) {
        (**self).on_inserted(position, count);
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        (**self).on_removed(position, count);
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        (**self).on_moved(from, to);
    }

    fn on_changed(&mut self, position: usize, count: usize, payload: Option<P>) {
        (**self).on_changed(position, count, payload);
    }
}

// =============================================================================
// UpdateOp
// =============================================================================

/// A recorded update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOp<P> {
    /// `count` items inserted at `position`
    Inserted { position: usize, count: usize },
    /// `count` items removed at `position`
    Removed { position: usize, count: usize },
    /// One item moved from `from` to `to`
    Moved { from: usize, to: usize },
    /// `count` items changed at `position`
    Changed {
        position: usize,
        count: usize,
        payload: Option<P>,
    },
}

impl<P> UpdateOp<P> {
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Apply the structural effect of this op to `items`.
    ///
    /// Inserted slots are produced by `fill`. `Changed` has no structural
    /// effect and leaves `items` untouched; callers that mirror contents
    /// refresh those positions themselves.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds for `items`, as `Vec::insert`
    /// and `Vec::remove` do.
    pub fn apply_to<T>(&self, items: &mut Vec<T>, mut fill: impl FnMut() -> T) {
        match *self {
            Self::Inserted { position, count } => {
                for offset in 0..count {
                    items.insert(position + offset, fill());
                }
            }
            Self::Removed { position, count } => {
                items.drain(position..position + count);
            }
            Self::Moved { from, to } => {
                let item = items.remove(from);
                items.insert(to, item);
            }
            Self::Changed { .. } => {}
        }
    }
}

/// Recording sink: every event is appended as an [`UpdateOp`].
impl<P> ListUpdateSink<P> for Vec<UpdateOp<P>> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        self.push(UpdateOp::Inserted { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.push(UpdateOp::Removed { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.push(UpdateOp::Moved { from, to });
    }

    fn on_changed(&mut self, position: usize, count: usize, payload: Option<P>) {
        self.push(UpdateOp::Changed {
            position,
            count,
            payload,
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
