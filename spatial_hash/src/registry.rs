// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object registry: per-object box and cell memberships.

use core::hash::Hash;

use rustc_hash::FxHashMap;

use crate::pool::EntryHandle;
use crate::types::{Aabb, CellCoord, CellSpan};

/// One membership: the cell an object occupies and its entry in that cell.
pub(crate) type Membership = (CellCoord, EntryHandle);

/// State kept for each registered object.
#[derive(Clone, Debug)]
pub(crate) struct ObjectRecord<T> {
    pub(crate) bbox: Aabb<T>,
    /// Span implied by `bbox`; cached so updates can compare spans cheaply.
    pub(crate) span: CellSpan,
    /// Exactly one membership per cell of `span`.
    pub(crate) entries: Vec<Membership>,
}

/// Map from object key to its record, plus a stash of emptied membership
/// lists for reuse by later inserts.
#[derive(Clone, Debug)]
pub(crate) struct Registry<K, T> {
    records: FxHashMap<K, ObjectRecord<T>>,
    spare: Vec<Vec<Membership>>,
}

impl<K, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self {
            records: FxHashMap::default(),
            spare: Vec::new(),
        }
    }
}

impl<K, T> Registry<K, T> {
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

impl<K: Copy + Eq + Hash, T> Registry<K, T> {
    pub(crate) fn reserve(&mut self, additional: usize) {
        self.records.reserve(additional);
    }

    pub(crate) fn contains(&self, obj: &K) -> bool {
        self.records.contains_key(obj)
    }

    pub(crate) fn get(&self, obj: &K) -> Option<&ObjectRecord<T>> {
        self.records.get(obj)
    }

    pub(crate) fn get_mut(&mut self, obj: &K) -> Option<&mut ObjectRecord<T>> {
        self.records.get_mut(obj)
    }

    pub(crate) fn insert(&mut self, obj: K, record: ObjectRecord<T>) {
        let previous = self.records.insert(obj, record);
        debug_assert!(previous.is_none(), "object registered twice");
    }

    pub(crate) fn remove(&mut self, obj: &K) -> Option<ObjectRecord<T>> {
        self.records.remove(obj)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &ObjectRecord<T>)> + '_ {
        self.records.iter()
    }

    /// An empty membership list, reused if one is available.
    pub(crate) fn take_list(&mut self) -> Vec<Membership> {
        self.spare.pop().unwrap_or_default()
    }

    /// Return a membership list for reuse. It is cleared here so no stale
    /// handles survive into the next record.
    pub(crate) fn recycle_list(&mut self, mut list: Vec<Membership>) {
        list.clear();
        self.spare.push(list);
    }

    pub(crate) fn spare_lists(&self) -> usize {
        self.spare.len()
    }

    /// Drop all records. Their lists go to the spare stash.
    pub(crate) fn clear(&mut self) {
        let spare = &mut self.spare;
        for (_, record) in self.records.drain() {
            let mut list = record.entries;
            list.clear();
            spare.push(list);
        }
    }
}
