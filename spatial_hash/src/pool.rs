// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena of membership-entry nodes shared by every cell of one index.
//!
//! Nodes live in a single `Vec` and are addressed by [`EntryHandle`]. Released
//! slots go on a free list and are handed out again before the arena grows, so
//! steady-state movement does not allocate. A released node is wiped (payload
//! and links) before it is pushed on the free list.

use core::fmt::Debug;

/// Sentinel link value meaning "no node".
pub(crate) const NIL: u32 = u32::MAX;

/// Handle to a membership entry inside an [`EntryPool`].
///
/// Handles are plain slot indices. A handle is valid from
/// [`Cell::insert_end`](crate::Cell::insert_end) until the matching
/// [`Cell::remove`](crate::Cell::remove); after that the slot may be reused for
/// an unrelated entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryHandle(u32);

impl EntryHandle {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn raw(self) -> u32 {
        self.0
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone)]
pub(crate) struct Node<K> {
    pub(crate) payload: Option<K>,
    pub(crate) prev: u32,
    pub(crate) next: u32,
}

impl<K> Node<K> {
    const VACANT: Self = Self {
        payload: None,
        prev: NIL,
        next: NIL,
    };
}

/// Counters describing pool usage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Entry slots ever allocated by the arena.
    pub entry_slots: usize,
    /// Entry slots currently on the free list.
    pub free_entries: usize,
    /// Spare per-object membership lists kept for reuse.
    pub spare_lists: usize,
}

impl PoolStats {
    /// Entry slots currently holding a live membership.
    pub const fn live_entries(&self) -> usize {
        self.entry_slots - self.free_entries
    }
}

/// Free-list arena of entry nodes.
pub struct EntryPool<K> {
    nodes: Vec<Node<K>>,
    free: Vec<u32>,
}

impl<K> Default for EntryPool<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EntryPool<K> {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Create a pool with room for `n` entries before it needs to grow.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n),
            free: Vec::new(),
        }
    }

    /// Take a node from the free list (or grow the arena) and store `payload`.
    ///
    /// The returned node is unlinked.
    pub(crate) fn acquire(&mut self, payload: K) -> EntryHandle {
        if let Some(idx) = self.free.pop() {
            let node = &mut self.nodes[idx as usize];
            debug_assert!(node.payload.is_none(), "free-listed node still holds a payload");
            node.payload = Some(payload);
            return EntryHandle::new(idx);
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Entry handles are intentionally 32-bit; u32::MAX is reserved as the nil link."
        )]
        let idx = self.nodes.len() as u32;
        assert!(idx != NIL, "entry pool exhausted");
        self.nodes.push(Node {
            payload: Some(payload),
            prev: NIL,
            next: NIL,
        });
        EntryHandle::new(idx)
    }

    /// Wipe the node and put it on the free list. Returns the payload it held,
    /// or `None` if the slot was already vacant.
    pub(crate) fn release(&mut self, handle: EntryHandle) -> Option<K> {
        let node = self.nodes.get_mut(handle.idx())?;
        let payload = node.payload.take()?;
        *node = Node::VACANT;
        self.free.push(handle.raw());
        Some(payload)
    }

    /// Payload stored at `handle`, if the slot is live.
    pub fn get(&self, handle: EntryHandle) -> Option<&K> {
        self.nodes.get(handle.idx())?.payload.as_ref()
    }

    pub(crate) fn node(&self, idx: u32) -> &Node<K> {
        &self.nodes[idx as usize]
    }

    pub(crate) fn node_mut(&mut self, idx: u32) -> &mut Node<K> {
        &mut self.nodes[idx as usize]
    }

    /// Whether `handle` refers to a live node.
    pub fn is_live(&self, handle: EntryHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live entries.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Release every node at once.
    ///
    /// All slots go back on the free list; capacity is kept.
    pub fn reset(&mut self) {
        self.free.clear();
        for (idx, node) in self.nodes.iter_mut().enumerate().rev() {
            *node = Node::VACANT;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Slot count never exceeds u32::MAX; enforced by acquire."
            )]
            self.free.push(idx as u32);
        }
    }

    /// Usage counters. `spare_lists` is filled in by the owning index.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            entry_slots: self.nodes.len(),
            free_entries: self.free.len(),
            spare_lists: 0,
        }
    }
}

impl<K> Debug for EntryPool<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntryPool")
            .field("total_slots", &self.nodes.len())
            .field("free", &self.free.len())
            .finish_non_exhaustive()
    }
}
