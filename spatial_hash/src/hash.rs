// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`SpatialHash`] facade: registry, grid and pools behind one API.

use core::fmt::Debug;
use core::hash::Hash;

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::pool::{EntryPool, PoolStats};
use crate::query::QueryResults;
use crate::registry::{Membership, ObjectRecord, Registry};
use crate::types::{Aabb, CellCoord, CellSpan, Scalar};

/// Sparse fixed-grid spatial hash over dynamic 2D boxes.
///
/// `K` is the caller's object key: a small `Copy` identity such as an entity
/// id. `T` is the coordinate scalar (`f64` by default; `f32`, `i32` and `i64`
/// are also supported).
///
/// Every object occupies one entry in each cell its box spans. Moving an
/// object only touches the cells it leaves and enters, and moving within the
/// same span touches no cell at all. Queries return cell-level candidates;
/// exact overlap checks are left to the caller (see [`Aabb::intersects`]).
pub struct SpatialHash<K, T = f64> {
    cell_size: T,
    grid: Grid,
    pool: EntryPool<K>,
    registry: Registry<K, T>,
    scratch: QueryResults<K>,
}

impl<K, T> SpatialHash<K, T>
where
    K: Copy + Eq + Hash,
    T: Scalar,
{
    /// Create an empty index with square cells of `cell_size`.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive and finite. Use
    /// [`SpatialHash::try_new`] to get an error instead.
    pub fn new(cell_size: T) -> Self {
        assert!(
            valid_cell_size(cell_size),
            "cell size must be positive and finite"
        );
        Self::build(cell_size, 0)
    }

    /// Create an empty index, rejecting a zero, negative or non-finite cell size.
    pub fn try_new(cell_size: T) -> Result<Self> {
        if !valid_cell_size(cell_size) {
            return Err(Error::InvalidCellSize);
        }
        Ok(Self::build(cell_size, 0))
    }

    /// Create an index with room for about `objects` single-cell objects.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not positive and finite.
    pub fn with_capacity(cell_size: T, objects: usize) -> Self {
        assert!(
            valid_cell_size(cell_size),
            "cell size must be positive and finite"
        );
        Self::build(cell_size, objects)
    }

    fn build(cell_size: T, objects: usize) -> Self {
        log::debug!("creating spatial hash: cell_size={cell_size:?} capacity={objects}");
        let mut registry = Registry::default();
        registry.reserve(objects);
        Self {
            cell_size,
            grid: Grid::new(),
            pool: EntryPool::with_capacity(objects),
            registry,
            scratch: QueryResults::default(),
        }
    }

    /// Side length of every cell.
    pub fn cell_size(&self) -> T {
        self.cell_size
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if no object is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Whether `obj` is registered.
    pub fn contains(&self, obj: K) -> bool {
        self.registry.contains(&obj)
    }

    /// Number of live (non-empty) cells.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Reserve room for at least `additional` more objects.
    pub fn reserve(&mut self, additional: usize) {
        self.registry.reserve(additional);
    }

    /// Register `obj` with the box `(x, y, w, h)`. Returns `obj`.
    ///
    /// Fails with [`Error::DuplicateObject`] if `obj` is already registered and
    /// with [`Error::InvalidRegion`] for a malformed box.
    pub fn add(&mut self, obj: K, x: T, y: T, w: T, h: T) -> Result<K> {
        let (bbox, span) = self.region(x, y, w, h)?;
        if self.registry.contains(&obj) {
            return Err(Error::DuplicateObject);
        }
        let mut entries = self.registry.take_list();
        entries.extend(
            span.iter()
                .map(|coord| attach(&mut self.grid, &mut self.pool, obj, coord)),
        );
        self.registry.insert(obj, ObjectRecord {
            bbox,
            span,
            entries,
        });
        Ok(obj)
    }

    /// Unregister `obj`, releasing every cell entry it held. Returns `obj`.
    ///
    /// Fails with [`Error::UnknownObject`] if `obj` is not registered.
    pub fn remove(&mut self, obj: K) -> Result<K> {
        let record = self.registry.remove(&obj).ok_or(Error::UnknownObject)?;
        for &membership in &record.entries {
            detach(&mut self.grid, &mut self.pool, membership);
        }
        self.registry.recycle_list(record.entries);
        Ok(obj)
    }

    /// Move or resize `obj` to the box `(x, y, w, h)`. Returns `obj`.
    ///
    /// If the new box covers the same cells as the old one only the stored box
    /// changes. Otherwise entries are dropped from cells the object left and
    /// added to cells it entered; cells shared by both spans are untouched.
    ///
    /// Fails with [`Error::UnknownObject`] if `obj` is not registered and with
    /// [`Error::InvalidRegion`] for a malformed box.
    pub fn update(&mut self, obj: K, x: T, y: T, w: T, h: T) -> Result<K> {
        let (bbox, span) = self.region(x, y, w, h)?;
        let record = self.registry.get_mut(&obj).ok_or(Error::UnknownObject)?;
        record.bbox = bbox;
        let old = record.span;
        if old == span {
            return Ok(obj);
        }

        let (grid, pool) = (&mut self.grid, &mut self.pool);
        record.entries.retain(|&membership| {
            let keep = span.contains(membership.0);
            if !keep {
                detach(grid, pool, membership);
            }
            keep
        });
        for coord in span.iter().filter(|&coord| !old.contains(coord)) {
            record.entries.push(attach(grid, pool, obj, coord));
        }
        record.span = span;
        log::trace!("object migrated from {old:?} to {span:?}");
        Ok(obj)
    }

    /// Box currently stored for `obj`.
    pub fn get_bbox(&self, obj: K) -> Option<Aabb<T>> {
        self.registry.get(&obj).map(|record| record.bbox)
    }

    /// Cells currently occupied by `obj`.
    pub fn cells_of(&self, obj: K) -> Option<CellSpan> {
        self.registry.get(&obj).map(|record| record.span)
    }

    /// Cells a box `(x, y, w, h)` would occupy in this index.
    pub fn cell_span(&self, x: T, y: T, w: T, h: T) -> Result<CellSpan> {
        self.region(x, y, w, h).map(|(_, span)| span)
    }

    /// Objects registered in any cell overlapping the rectangle `(x, y, w, h)`.
    ///
    /// Each object appears once. The result borrows the index's internal,
    /// reused result set, so it must be dropped (or copied with
    /// [`QueryResults::to_vec`]) before the index is used again. Use
    /// [`SpatialHash::query_into`] to keep results in a container you own.
    pub fn query(&mut self, x: T, y: T, w: T, h: T) -> Result<&QueryResults<K>> {
        self.query_filtered(x, y, w, h, |_| true)
    }

    /// Like [`SpatialHash::query`], keeping only objects accepted by `filter`.
    ///
    /// An accepted object is never offered to `filter` again within the same
    /// query. A rejected one is offered again for every other cell it shares
    /// with the query rectangle.
    pub fn query_filtered(
        &mut self,
        x: T,
        y: T,
        w: T,
        h: T,
        filter: impl FnMut(&K) -> bool,
    ) -> Result<&QueryResults<K>> {
        let mut results = core::mem::take(&mut self.scratch);
        let outcome = self.query_into(x, y, w, h, filter, &mut results);
        self.scratch = results;
        outcome.map(|()| &self.scratch)
    }

    /// Run a filtered query into a caller-owned result set.
    ///
    /// `out` is cleared first (only once the region has been validated) and
    /// keeps its capacity across calls. The index is only borrowed shared, so
    /// lookups such as [`SpatialHash::get_bbox`] remain available while the
    /// results are processed.
    pub fn query_into(
        &self,
        x: T,
        y: T,
        w: T,
        h: T,
        mut filter: impl FnMut(&K) -> bool,
        out: &mut QueryResults<K>,
    ) -> Result<()> {
        let (_, span) = self.region(x, y, w, h)?;
        out.clear();
        for cell in self.grid.cells_in(span) {
            for &obj in cell.iter(&self.pool) {
                out.offer(obj, &mut filter);
            }
        }
        Ok(())
    }

    /// Objects registered in the cell containing the point `(x, y)`.
    pub fn query_point(&mut self, x: T, y: T) -> Result<&QueryResults<K>> {
        self.query(x, y, T::zero(), T::zero())
    }

    /// Like [`SpatialHash::query_point`], keeping only objects accepted by `filter`.
    pub fn query_point_filtered(
        &mut self,
        x: T,
        y: T,
        filter: impl FnMut(&K) -> bool,
    ) -> Result<&QueryResults<K>> {
        self.query_filtered(x, y, T::zero(), T::zero(), filter)
    }

    /// Iterate registered objects with their boxes, in unspecified order.
    pub fn objects(&self) -> impl Iterator<Item = (K, Aabb<T>)> + '_ {
        self.registry.iter().map(|(&obj, record)| (obj, record.bbox))
    }

    /// Iterate the coordinates of live cells, in unspecified order.
    pub fn live_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.grid.iter().map(|(coord, _)| coord)
    }

    /// Remove every object and cell. Pooled storage is kept for reuse.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing spatial hash: {} objects, {} cells",
            self.registry.len(),
            self.grid.len()
        );
        self.registry.clear();
        self.grid.clear();
        self.pool.reset();
        self.scratch.clear();
    }

    /// Entry-pool and membership-list reuse counters.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            spare_lists: self.registry.spare_lists(),
            ..self.pool.stats()
        }
    }

    fn region(&self, x: T, y: T, w: T, h: T) -> Result<(Aabb<T>, CellSpan)> {
        let bbox = Aabb::new(x, y, w, h);
        if !bbox.is_valid() {
            return Err(Error::InvalidRegion);
        }
        Ok((bbox, CellSpan::of(&bbox, self.cell_size)))
    }
}

fn valid_cell_size<T: Scalar>(cell_size: T) -> bool {
    cell_size.is_finite() && T::zero() < cell_size
}

fn attach<K>(grid: &mut Grid, pool: &mut EntryPool<K>, obj: K, coord: CellCoord) -> Membership {
    (coord, grid.get_or_create(coord).insert_end(pool, obj))
}

fn detach<K>(grid: &mut Grid, pool: &mut EntryPool<K>, (coord, handle): Membership) {
    let removed = grid
        .get_existing_mut(coord)
        .and_then(|cell: &mut Cell| cell.remove(pool, handle));
    debug_assert!(removed.is_some(), "membership points at a missing entry");
    grid.delete_if_empty(coord);
}

impl<K, T: Debug> Debug for SpatialHash<K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialHash")
            .field("cell_size", &self.cell_size)
            .field("objects", &self.registry.len())
            .field("grid", &self.grid)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
