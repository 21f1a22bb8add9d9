//! Data sources: the capability the diff asks identity and content questions of.
//!
//! The diff never touches items directly. It only knows two lengths and asks
//! positional questions, so any backing storage works: slices, keyed records,
//! rows behind an index, and so on.
//!
//! # Preconditions
//!
//! Both sequences must stay unchanged for the whole computation. This is not
//! checked by default; a source that mutates mid-diff yields undefined edit
//! scripts or a [`DiffError::NoMiddleSnake`](crate::DiffError::NoMiddleSnake).
//! See [`DiffConfig::with_source_verification`](crate::DiffConfig::with_source_verification)
//! for an opt-in length check.

use std::marker::PhantomData;

// =============================================================================
// DataSource
// =============================================================================

/// Answers identity, equality and payload questions about two sequences.
///
/// `are_contents_the_same` is only called for pairs where
/// `are_items_the_same` already returned `true`.
pub trait DataSource {
    /// Extra information attached to a change event.
    ///
    /// Adjacent changes are merged only when their payloads compare equal.
    type Payload: PartialEq;

    /// Length of the old sequence.
    fn old_len(&self) -> usize;

    /// Length of the new sequence.
    fn new_len(&self) -> usize;

    /// Whether the two positions hold the same logical item (e.g. equal ids).
    fn are_items_the_same(&self, old_pos: usize, new_pos: usize) -> bool;

    /// Whether two items that are the same logical item also carry the same data.
    fn are_contents_the_same(&self, old_pos: usize, new_pos: usize) -> bool;

    /// Payload describing the change between two same-item positions.
    fn change_payload(&self, _old_pos: usize, _new_pos: usize) -> Option<Self::Payload> {
        None
    }

    /// Attach a payload function to this source.
    fn with_payload<F, P>(self, payload: F) -> WithPayload<Self, F, P>
    where
        Self: Sized,
        F: Fn(usize, usize) -> Option<P>,
        P: PartialEq,
    {
        WithPayload {
            inner: self,
            payload,
            _payload: PhantomData,
        }
    }
}

impl<S: DataSource + ?Sized> DataSource for &S {
    type Payload = S::Payload;

    fn old_len(&self) -> usize {
        (**self).old_len()
    }

    fn new_len(&self) -> usize {
        (**self).new_len()
    }

    fn are_items_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        (**self).are_items_the_same(old_pos, new_pos)
    }

    fn are_contents_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        (**self).are_contents_the_same(old_pos, new_pos)
    }

    fn change_payload(&self, old_pos: usize, new_pos: usize) -> Option<Self::Payload> {
        (**self).change_payload(old_pos, new_pos)
    }
}

// =============================================================================
// SliceSource
// =============================================================================

/// Two slices compared with `==` for both identity and contents.
///
/// With plain equality an item is either the same or different, so no change
/// events are ever produced.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a, T> {
    old: &'a [T],
    new: &'a [T],
}

impl<'a, T: PartialEq> SliceSource<'a, T> {
    /// Create a source over two slices.
    pub fn new(old: &'a [T], new: &'a [T]) -> Self {
        Self { old, new }
    }
}

impl<T: PartialEq> DataSource for SliceSource<'_, T> {
    type Payload = ();

    fn old_len(&self) -> usize {
        self.old.len()
    }

    fn new_len(&self) -> usize {
        self.new.len()
    }

    fn are_items_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        self.old[old_pos] == self.new[new_pos]
    }

    fn are_contents_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        self.old[old_pos] == self.new[new_pos]
    }
}

// =============================================================================
// KeyedSource
// =============================================================================

/// Two slices whose items are identified by a key and compared by `==`.
///
/// Items with equal keys but unequal values produce change events.
pub struct KeyedSource<'a, T, K, F> {
    old: &'a [T],
    new: &'a [T],
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<'a, T, K, F> KeyedSource<'a, T, K, F>
where
    T: PartialEq,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    /// Create a source identifying items by `key`.
    pub fn new(old: &'a [T], new: &'a [T], key: F) -> Self {
        Self {
            old,
            new,
            key,
            _key: PhantomData,
        }
    }
}

impl<T, K, F> std::fmt::Debug for KeyedSource<'_, T, K, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedSource")
            .field("old_len", &self.old.len())
            .field("new_len", &self.new.len())
            .finish_non_exhaustive()
    }
}

impl<T, K, F> DataSource for KeyedSource<'_, T, K, F>
where
    T: PartialEq,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    type Payload = ();

    fn old_len(&self) -> usize {
        self.old.len()
    }

    fn new_len(&self) -> usize {
        self.new.len()
    }

    fn are_items_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        (self.key)(&self.old[old_pos]) == (self.key)(&self.new[new_pos])
    }

    fn are_contents_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        self.old[old_pos] == self.new[new_pos]
    }
}

// =============================================================================
// FnSource
// =============================================================================

/// A source backed by two lengths and two positional predicates.
///
/// ```
/// use tola_listdiff::{calculate_diff, FnSource};
///
/// let old = [1, 2, 3];
/// let new = [1, 3];
/// let source = FnSource::new(
///     old.len(),
///     new.len(),
///     |o, n| old[o] == new[n],
///     |_, _| true,
/// );
/// let result = calculate_diff(&source).unwrap();
/// assert_eq!(result.stats().removed, 1);
/// ```
pub struct FnSource<I, C> {
    old_len: usize,
    new_len: usize,
    same_item: I,
    same_content: C,
}

impl<I, C> FnSource<I, C>
where
    I: Fn(usize, usize) -> bool,
    C: Fn(usize, usize) -> bool,
{
    /// Create a source from lengths and predicates.
    pub fn new(old_len: usize, new_len: usize, same_item: I, same_content: C) -> Self {
        Self {
            old_len,
            new_len,
            same_item,
            same_content,
        }
    }
}

impl<I, C> std::fmt::Debug for FnSource<I, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource")
            .field("old_len", &self.old_len)
            .field("new_len", &self.new_len)
            .finish_non_exhaustive()
    }
}

impl<I, C> DataSource for FnSource<I, C>
where
    I: Fn(usize, usize) -> bool,
    C: Fn(usize, usize) -> bool,
{
    type Payload = ();

    fn old_len(&self) -> usize {
        self.old_len
    }

    fn new_len(&self) -> usize {
        self.new_len
    }

    fn are_items_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        (self.same_item)(old_pos, new_pos)
    }

    fn are_contents_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        (self.same_content)(old_pos, new_pos)
    }
}

// =============================================================================
// WithPayload
// =============================================================================

/// A source with its change payloads supplied by a function.
///
/// Created by [`DataSource::with_payload`].
pub struct WithPayload<S, F, P> {
    inner: S,
    payload: F,
    _payload: PhantomData<fn() -> P>,
}

impl<S: std::fmt::Debug, F, P> std::fmt::Debug for WithPayload<S, F, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithPayload")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S, F, P> DataSource for WithPayload<S, F, P>
where
    S: DataSource,
    F: Fn(usize, usize) -> Option<P>,
    P: PartialEq,
{
    type Payload = P;

    fn old_len(&self) -> usize {
        self.inner.old_len()
    }

    fn new_len(&self) -> usize {
        self.inner.new_len()
    }

    fn are_items_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        self.inner.are_items_the_same(old_pos, new_pos)
    }

    fn are_contents_the_same(&self, old_pos: usize, new_pos: usize) -> bool {
        self.inner.are_contents_the_same(old_pos, new_pos)
    }

    fn change_payload(&self, old_pos: usize, new_pos: usize) -> Option<P> {
        (self.payload)(old_pos, new_pos)
    }
}

// =============================================================================
// Tests
// =============================================================================
