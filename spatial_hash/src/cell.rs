// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cell membership list.
//!
//! A [`Cell`] is a doubly linked list whose nodes live in a shared
//! [`EntryPool`]. The cell itself only stores head, tail and length, so it is
//! `Copy` and costs nothing to create or drop. Every list operation takes the
//! pool explicitly; a handle must only be used with the cell and pool that
//! produced it.

use core::ops::ControlFlow;

use crate::pool::{EntryHandle, EntryPool, NIL};

/// Doubly linked membership list addressed by [`EntryHandle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    head: u32,
    tail: u32,
    len: u32,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    /// True if the cell holds no entries.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of entries in the cell.
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Append `payload` at the tail. O(1).
    pub fn insert_end<K>(&mut self, pool: &mut EntryPool<K>, payload: K) -> EntryHandle {
        let handle = pool.acquire(payload);
        let idx = handle.raw();
        pool.node_mut(idx).prev = self.tail;
        if self.tail == NIL {
            self.head = idx;
        } else {
            pool.node_mut(self.tail).next = idx;
        }
        self.tail = idx;
        self.len += 1;
        handle
    }

    /// Unlink the entry at `handle` and return its payload to the caller. O(1).
    ///
    /// Returns `None` (and leaves the list untouched) if the handle is not live.
    pub fn remove<K>(&mut self, pool: &mut EntryPool<K>, handle: EntryHandle) -> Option<K> {
        if !pool.is_live(handle) {
            return None;
        }
        debug_assert!(self.len > 0, "removing from an empty cell");
        let idx = handle.raw();
        let (prev, next) = {
            let node = pool.node(idx);
            (node.prev, node.next)
        };
        if prev == NIL {
            debug_assert_eq!(self.head, idx, "handle does not belong to this cell");
            self.head = next;
        } else {
            pool.node_mut(prev).next = next;
        }
        if next == NIL {
            debug_assert_eq!(self.tail, idx, "handle does not belong to this cell");
            self.tail = prev;
        } else {
            pool.node_mut(next).prev = prev;
        }
        self.len -= 1;
        pool.release(handle)
    }

    /// Visit payloads from head to tail, stopping as soon as `visit` breaks.
    pub fn traverse<K, B>(
        &self,
        pool: &EntryPool<K>,
        mut visit: impl FnMut(&K) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        for payload in self.iter(pool) {
            visit(payload)?;
        }
        ControlFlow::Continue(())
    }

    /// Lazy head-to-tail iterator over payloads.
    pub fn iter<'a, K>(&self, pool: &'a EntryPool<K>) -> CellIter<'a, K> {
        CellIter {
            pool,
            cursor: self.head,
            remaining: self.len(),
        }
    }
}

/// Iterator over the payloads of one [`Cell`], in insertion order.
#[derive(Debug)]
pub struct CellIter<'a, K> {
    pool: &'a EntryPool<K>,
    cursor: u32,
    remaining: usize,
}

impl<'a, K> Iterator for CellIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = self.pool.node(self.cursor);
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        node.payload.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for CellIter<'_, K> {}
