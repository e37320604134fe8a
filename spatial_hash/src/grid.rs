// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse grid of cells keyed by packed cell coordinates.
//!
//! Only non-empty cells are stored. Callers create cells on demand with
//! [`Grid::get_or_create`] and must call [`Grid::delete_if_empty`] after
//! removing entries, which keeps the map free of empty cells.

use core::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::cell::Cell;
use crate::types::{CellCoord, CellSpan};

/// Sparse map from [`CellCoord`] to [`Cell`].
#[derive(Clone, Default)]
pub struct Grid {
    cells: FxHashMap<u64, Cell>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at `coord`, created empty if it does not exist yet.
    pub fn get_or_create(&mut self, coord: CellCoord) -> &mut Cell {
        self.cells.entry(coord.pack()).or_insert_with(|| {
            log::trace!("creating cell ({}, {})", coord.cx, coord.cy);
            Cell::new()
        })
    }

    /// Cell at `coord` if it exists. Never allocates.
    pub fn get_existing(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord.pack())
    }

    /// Mutable cell at `coord` if it exists. Never allocates.
    pub fn get_existing_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(&coord.pack())
    }

    /// Drop the cell at `coord` if it holds no entries. Returns true if a cell
    /// was removed.
    pub fn delete_if_empty(&mut self, coord: CellCoord) -> bool {
        let key = coord.pack();
        if self.cells.get(&key).is_some_and(Cell::is_empty) {
            self.cells.remove(&key);
            log::trace!("pruned cell ({}, {})", coord.cx, coord.cy);
            true
        } else {
            false
        }
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if no cell is live.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate live cells with their coordinates, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> + '_ {
        self.cells
            .iter()
            .map(|(&key, cell)| (CellCoord::unpack(key), cell))
    }

    /// Live cells inside `span`.
    ///
    /// Probes each coordinate of the span, or scans the live cells when the
    /// span is larger than the grid, whichever touches fewer cells.
    pub fn cells_in(&self, span: CellSpan) -> impl Iterator<Item = &Cell> + '_ {
        let probe = span.cell_count() <= self.cells.len() as u64;
        let probed = probe.then(|| {
            span.iter()
                .filter_map(move |coord| self.get_existing(coord))
        });
        let scanned = (!probe).then(|| {
            self.iter()
                .filter(move |(coord, _)| span.contains(*coord))
                .map(|(_, cell)| cell)
        });
        probed
            .into_iter()
            .flatten()
            .chain(scanned.into_iter().flatten())
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let entries: usize = self.cells.values().map(Cell::len).sum();
        f.debug_struct("Grid")
            .field("cells", &self.cells.len())
            .field("entries", &entries)
            .finish_non_exhaustive()
    }
}
