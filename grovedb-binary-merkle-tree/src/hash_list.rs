//! Ordered list of data items, each stored with its digest.
//!
//! The digest of an item is computed once, when the item is inserted, and is
//! never recomputed. Every structural change bumps a modification counter that
//! fail-fast [`Cursor`]s compare against the value they were created with.

use std::{
    collections::VecDeque,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use log::warn;

use crate::{
    hash::{digest_of, Digest, Hashable},
    IterationError,
};

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    digest: Digest,
}

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(0);

fn next_list_id() -> u64 {
    NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)
}

/// Ordered container of data items and their cached digests.
#[derive(Debug)]
pub struct OrderedHashList<T> {
    id: u64,
    entries: VecDeque<Entry<T>>,
    modifications: u64,
}

// A clone is a separate list: cursors of the original do not carry over.
impl<T: Clone> Clone for OrderedHashList<T> {
    fn clone(&self) -> Self {
        Self {
            id: next_list_id(),
            entries: self.entries.clone(),
            modifications: self.modifications,
        }
    }
}

impl<T> Default for OrderedHashList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of a fail-fast traversal over an [`OrderedHashList`].
///
/// A cursor does not borrow its list, so the list may be mutated while the
/// cursor is alive; the next [`OrderedHashList::advance`] then reports
/// [`IterationError::ConcurrentModification`]. A cursor only advances on the
/// list that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    list_id: u64,
    expected_modifications: u64,
    position: usize,
}

impl Cursor {
    /// Number of elements yielded so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<T> OrderedHashList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            id: next_list_id(),
            entries: VecDeque::new(),
            modifications: 0,
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of structural modifications made so far.
    pub fn modification_count(&self) -> u64 {
        self.modifications
    }

    /// Digests of all items, in list order.
    pub fn all_digests(&self) -> Vec<Digest> {
        self.entries.iter().map(|e| e.digest.clone()).collect()
    }

    /// Item and digest at `index`.
    pub fn get(&self, index: usize) -> Option<(&T, &Digest)> {
        self.entries.get(index).map(|e| (&e.item, &e.digest))
    }

    /// Borrowing traversal in list order.
    ///
    /// The borrow prevents mutation for the iterator's lifetime, so this
    /// traversal can never go stale. Use [`cursor`](Self::cursor) for a
    /// traversal that may be interleaved with mutation.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Start a fail-fast traversal at the head of the list.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            list_id: self.id,
            expected_modifications: self.modifications,
            position: 0,
        }
    }

    /// Whether `cursor` has an element left to yield.
    ///
    /// Says nothing about staleness; that is only checked by
    /// [`advance`](Self::advance).
    pub fn has_next(&self, cursor: &Cursor) -> bool {
        cursor.position < self.entries.len()
    }

    /// Yield the next item of a fail-fast traversal.
    pub fn advance(&self, cursor: &mut Cursor) -> Result<&T, IterationError> {
        if cursor.list_id != self.id {
            warn!("cursor of list {} used on list {}", cursor.list_id, self.id);
            return Err(IterationError::ForeignCursor);
        }
        if cursor.expected_modifications != self.modifications {
            warn!(
                "stale cursor at position {}: list modified {} -> {}",
                cursor.position, cursor.expected_modifications, self.modifications
            );
            return Err(IterationError::ConcurrentModification {
                expected: cursor.expected_modifications,
                actual: self.modifications,
            });
        }
        let entry = self
            .entries
            .get(cursor.position)
            .ok_or(IterationError::EndOfSequence)?;
        cursor.position += 1;
        Ok(&entry.item)
    }

    /// Remove the first item equal to `item`.
    ///
    /// Returns whether an item was removed.
    pub fn remove_first_match(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.entries.iter().position(|e| &e.item == item) {
            Some(index) => {
                self.entries.remove(index);
                self.modifications += 1;
                true
            }
            None => false,
        }
    }
}

impl<T: Hashable> OrderedHashList<T> {
    /// Insert `item` before every other item.
    pub fn insert_head(&mut self, item: T) {
        let digest = digest_of(&item);
        self.entries.push_front(Entry { item, digest });
        self.modifications += 1;
    }

    /// Insert `item` after every other item.
    pub fn insert_tail(&mut self, item: T) {
        let digest = digest_of(&item);
        self.entries.push_back(Entry { item, digest });
        self.modifications += 1;
    }
}

impl<T: Hashable> FromIterator<T> for OrderedHashList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = OrderedHashList::new();
        for item in iter {
            list.insert_tail(item);
        }
        list
    }
}

/// Borrowing iterator returned by [`OrderedHashList::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    inner: std::collections::vec_deque::Iter<'a, Entry<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| &e.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a OrderedHashList<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display> fmt::Display for OrderedHashList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "Data: {}, Hash: {}", entry.item, entry.digest)?;
        }
        Ok(())
    }
}
