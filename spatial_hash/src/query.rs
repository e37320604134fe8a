// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicated query results.

use core::fmt::Debug;
use core::hash::Hash;

use rustc_hash::FxHashSet;

/// Reusable result set for range queries.
///
/// Each object is recorded at most once no matter how many of its cells the
/// query touches. The container is meant to be kept and passed to
/// [`SpatialHash::query_into`](crate::SpatialHash::query_into) again: every
/// query clears it first but keeps the allocated capacity.
///
/// Iteration order is unspecified.
#[derive(Clone)]
pub struct QueryResults<K> {
    hits: Vec<K>,
    // Objects already accepted by the current query.
    visited: FxHashSet<K>,
}

impl<K> Default for QueryResults<K> {
    fn default() -> Self {
        Self {
            hits: Vec::new(),
            visited: FxHashSet::default(),
        }
    }
}

impl<K: Copy + Eq + Hash> QueryResults<K> {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct objects found.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True if the query found nothing.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Whether `obj` is part of the result.
    pub fn contains(&self, obj: &K) -> bool {
        self.visited.contains(obj)
    }

    /// Iterate the objects found.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.hits.iter()
    }

    /// The objects found, as a slice.
    pub fn as_slice(&self) -> &[K] {
        &self.hits
    }

    /// Copy the results out, so the index can be mutated while they are used.
    pub fn to_vec(&self) -> Vec<K> {
        self.hits.clone()
    }

    /// Forget every result and visit mark, keeping capacity.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.visited.clear();
    }

    /// Record a candidate. Objects already accepted are skipped; a rejected
    /// object is offered to `filter` again when it shows up in another cell.
    pub(crate) fn offer(&mut self, obj: K, filter: &mut impl FnMut(&K) -> bool) {
        if self.visited.contains(&obj) || !filter(&obj) {
            return;
        }
        self.visited.insert(obj);
        self.hits.push(obj);
    }
}

impl<'a, K> IntoIterator for &'a QueryResults<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

impl<K: Debug> Debug for QueryResults<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.hits.iter()).finish()
    }
}
